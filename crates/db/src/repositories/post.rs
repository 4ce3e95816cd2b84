//! Post repository for database operations.
//!
//! Posts are loaded with their media and their author (with avatar). Authors
//! are fetched in one extra query per call, not per post.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::{NotSet, Unchanged},
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use super::{db_err, direction, now, to_media, updated};
use crate::entities::{employees, files, posts};
use petcare_core::post::{
    NewPost, Post, PostAuthor, PostChanges, PostRecord, PostRepository as PostRepoTrait,
};
use petcare_core::resource::{ListParams, RepositoryError};

/// Post repository implementation.
#[derive(Debug, Clone)]
pub struct PostRepository {
    db: DatabaseConnection,
}

impl PostRepository {
    /// Create a new post repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Attach authors to loaded posts.
    async fn detail(
        &self,
        rows: Vec<(posts::Model, Option<files::Model>)>,
    ) -> Result<Vec<PostRecord>, RepositoryError> {
        let mut author_ids: Vec<i32> = rows.iter().map(|(p, _)| p.employee_id).collect();
        author_ids.sort_unstable();
        author_ids.dedup();

        let authors: HashMap<i32, PostAuthor> = if author_ids.is_empty() {
            HashMap::new()
        } else {
            employees::Entity::find()
                .filter(employees::Column::Id.is_in(author_ids))
                .find_also_related(files::Entity)
                .all(&self.db)
                .await
                .map_err(db_err)?
                .into_iter()
                .map(|(employee, avatar)| {
                    (
                        employee.id,
                        PostAuthor {
                            id: employee.id,
                            name: employee.name,
                            avatar: avatar.map(to_media),
                        },
                    )
                })
                .collect()
        };

        Ok(rows
            .into_iter()
            .map(|(post, midia)| PostRecord {
                author: authors.get(&post.employee_id).cloned(),
                midia: midia.map(to_media),
                post: to_domain(post),
            })
            .collect())
    }
}

#[async_trait]
impl PostRepoTrait for PostRepository {
    async fn create(&self, input: NewPost) -> Result<Post, RepositoryError> {
        let now = now();
        let model = posts::ActiveModel {
            title: Set(input.title),
            employee_id: Set(input.employee_id),
            midia_id: Set(input.midia_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;

        Ok(to_domain(model))
    }

    async fn find_detailed(&self, id: i32) -> Result<Option<PostRecord>, RepositoryError> {
        let row = posts::Entity::find_by_id(id)
            .find_also_related(files::Entity)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let Some(row) = row else {
            return Ok(None);
        };
        Ok(self.detail(vec![row]).await?.pop())
    }

    async fn list(&self, params: &ListParams) -> Result<Vec<PostRecord>, RepositoryError> {
        let mut query = posts::Entity::find();
        if let Some(author) = params.owner {
            query = query.filter(posts::Column::EmployeeId.eq(author));
        }

        let rows = query
            .find_also_related(files::Entity)
            .order_by(posts::Column::CreatedAt, direction(params.order))
            .order_by(posts::Column::Id, direction(params.order))
            .offset(params.page.offset())
            .limit(params.page.limit())
            .all(&self.db)
            .await
            .map_err(db_err)?;

        self.detail(rows).await
    }

    async fn list_by_author(&self, employee_id: i32) -> Result<Vec<PostRecord>, RepositoryError> {
        let rows = posts::Entity::find()
            .filter(posts::Column::EmployeeId.eq(employee_id))
            .find_also_related(files::Entity)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        self.detail(rows).await
    }

    async fn update(&self, id: i32, changes: PostChanges) -> Result<Option<Post>, RepositoryError> {
        let result = posts::ActiveModel {
            id: Unchanged(id),
            title: changes.title.map_or(NotSet, |t| Set(Some(t))),
            midia_id: changes.midia_id.map_or(NotSet, |m| Set(Some(m))),
            updated_at: Set(now()),
            ..Default::default()
        }
        .update(&self.db)
        .await;

        Ok(updated(result)?.map(to_domain))
    }

    async fn delete(&self, id: i32) -> Result<bool, RepositoryError> {
        let result = posts::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected > 0)
    }
}

/// Convert database model to domain model.
fn to_domain(model: posts::Model) -> Post {
    Post {
        id: model.id,
        title: model.title,
        employee_id: model.employee_id,
        midia_id: model.midia_id,
        created_at: model.created_at.with_timezone(&chrono::Utc),
        updated_at: model.updated_at.with_timezone(&chrono::Utc),
    }
}
