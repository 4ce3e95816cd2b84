//! Post repository seam and service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::types::{
    NewPost, Post, PostAuthorView, PostChanges, PostPayload, PostRecord, PostView,
};
use crate::resource::{
    ListParams, ListQuery, MediaSaga, OwnerContext, RepositoryError, ResourceError, Submission,
};
use crate::validation::non_blank;

/// Repository trait for post persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Insert a post.
    async fn create(&self, input: NewPost) -> Result<Post, RepositoryError>;

    /// Find a post with its media, author and author avatar.
    async fn find_detailed(&self, id: i32) -> Result<Option<PostRecord>, RepositoryError>;

    /// One page of posts, detailed.
    async fn list(&self, params: &ListParams) -> Result<Vec<PostRecord>, RepositoryError>;

    /// Every post of one employee, detailed.
    async fn list_by_author(&self, employee_id: i32)
    -> Result<Vec<PostRecord>, RepositoryError>;

    /// Apply a partial update. `None` if the row is gone.
    async fn update(&self, id: i32, changes: PostChanges)
    -> Result<Option<Post>, RepositoryError>;

    /// Delete a post. Returns `false` if it did not exist.
    async fn delete(&self, id: i32) -> Result<bool, RepositoryError>;
}

/// Post operations.
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    saga: MediaSaga,
}

impl PostService {
    /// Create a post service.
    #[must_use]
    pub fn new(posts: Arc<dyn PostRepository>, saga: MediaSaga) -> Self {
        Self { posts, saga }
    }

    /// Publish a post. A title, a media file or both must be present.
    pub async fn create(
        &self,
        author: OwnerContext,
        submission: Submission,
    ) -> Result<PostView, ResourceError> {
        let cleanup = self.saga.cleanup();
        let admitted = submission.admit::<PostPayload>(cleanup).await?;
        let title = non_blank(admitted.payload.title.clone());
        if title.is_none() && admitted.file.is_none() {
            return Err(ResourceError::NoContent);
        }

        let (post, _) = self
            .saga
            .run(admitted.file, move |midia_id| async move {
                let post = self
                    .posts
                    .create(NewPost {
                        title,
                        employee_id: author.owner_id(),
                        midia_id,
                    })
                    .await?;
                Ok(post)
            })
            .await?;

        info!(post_id = post.id, employee_id = author.owner_id(), "Post created");
        self.show(post.id).await
    }

    /// One page of posts, optionally for one author.
    pub async fn list(&self, query: ListQuery) -> Result<Vec<PostView>, ResourceError> {
        let params = query.into_params()?;
        let posts = self.posts.list(&params).await?;
        Ok(posts.into_iter().map(|p| self.view(p)).collect())
    }

    /// A single post.
    pub async fn show(&self, id: i32) -> Result<PostView, ResourceError> {
        let post = self
            .posts
            .find_detailed(id)
            .await?
            .ok_or(ResourceError::NotFound("Post"))?;
        Ok(self.view(post))
    }

    /// Change the title and/or replace the media of a post `author` wrote.
    ///
    /// A new media file replaces the old one, which is reclaimed once the
    /// post points at the new row.
    pub async fn update(
        &self,
        author: OwnerContext,
        id: i32,
        submission: Submission,
    ) -> Result<PostView, ResourceError> {
        let cleanup = self.saga.cleanup();
        let admitted = submission.admit::<PostPayload>(cleanup).await?;

        let existing = match self.owned(author, id).await {
            Ok(post) => post,
            Err(e) => return Err(admitted.reject(cleanup, e).await),
        };

        let title = non_blank(admitted.payload.title.clone());
        if title.is_none() && admitted.file.is_none() {
            return Err(ResourceError::NoContent);
        }

        self.saga
            .replace(
                admitted.file,
                existing.midia.as_ref(),
                move |midia_id| async move {
                    self.posts
                        .update(id, PostChanges { title, midia_id })
                        .await?
                        .ok_or(ResourceError::NotFound("Post"))
                },
            )
            .await?;

        info!(post_id = id, employee_id = author.owner_id(), "Post updated");
        self.show(id).await
    }

    /// Delete a post `author` wrote, reclaiming its media.
    pub async fn delete(&self, author: OwnerContext, id: i32) -> Result<(), ResourceError> {
        let post = self.owned(author, id).await?;

        if !self.posts.delete(id).await? {
            return Err(ResourceError::NotFound("Post"));
        }
        self.saga.cleanup().reclaim_all(&[post.midia.as_ref()]).await;

        info!(post_id = id, employee_id = author.owner_id(), "Post deleted");
        Ok(())
    }

    async fn owned(&self, author: OwnerContext, id: i32) -> Result<PostRecord, ResourceError> {
        self.posts
            .find_detailed(id)
            .await?
            .filter(|p| author.owns(p.post.employee_id))
            .ok_or(ResourceError::NotFound("Post"))
    }

    fn view(&self, record: PostRecord) -> PostView {
        let store = self.saga.store();
        let midia = store.view_opt(record.midia.as_ref());
        let employee = record.author.map(|author| PostAuthorView {
            avatar: store.view_opt(author.avatar.as_ref()),
            name: author.name,
        });
        let post = record.post;
        PostView {
            id: post.id,
            title: post.title,
            employee_id: post.employee_id,
            midia_id: post.midia_id,
            midia,
            employee,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}
