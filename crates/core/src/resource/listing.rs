//! List query parameters.

use petcare_shared::types::{PageRequest, SortOrder};
use serde::Deserialize;

use super::error::ResourceError;

/// Raw `page`, `order` and owner filter from the query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    /// 1-based page number.
    pub page: Option<u32>,
    /// `newest` or `oldest`.
    pub order: Option<String>,
    /// Restrict to one owner.
    #[serde(alias = "u")]
    pub owner: Option<i32>,
}

/// Checked list parameters handed to repositories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListParams {
    /// Page window.
    pub page: PageRequest,
    /// Creation-time ordering.
    pub order: SortOrder,
    /// Owner filter.
    pub owner: Option<i32>,
}

impl ListQuery {
    /// Check the query, rejecting unknown `order` values.
    pub fn into_params(self) -> Result<ListParams, ResourceError> {
        let order = match self.order.as_deref() {
            None => SortOrder::default(),
            Some(raw) => SortOrder::parse(raw).ok_or(ResourceError::InvalidOrder)?,
        };

        Ok(ListParams {
            page: PageRequest::new(self.page.unwrap_or(1)),
            order,
            owner: self.owner,
        })
    }
}

impl ListParams {
    /// Apply these parameters to an in-memory list of `(created_at, id, owner, item)`.
    ///
    /// Used by in-memory repositories; database repositories translate the
    /// same parameters to SQL.
    #[cfg(any(test, feature = "testing"))]
    #[must_use]
    pub fn apply<T, K: Ord>(&self, mut rows: Vec<(K, i32, T)>) -> Vec<T> {
        rows.sort_by(|a, b| (&a.0, a.1).cmp(&(&b.0, b.1)));
        if self.order.is_descending() {
            rows.reverse();
        }
        let offset = usize::try_from(self.page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(self.page.limit()).unwrap_or(usize::MAX);
        rows.into_iter()
            .skip(offset)
            .take(limit)
            .map(|(_, _, item)| item)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = ListQuery::default().into_params().unwrap();
        assert_eq!(params.page.page, 1);
        assert_eq!(params.order, SortOrder::Newest);
        assert_eq!(params.owner, None);
    }

    #[test]
    fn test_invalid_order() {
        let query = ListQuery {
            order: Some("random".into()),
            ..ListQuery::default()
        };
        assert!(matches!(query.into_params(), Err(ResourceError::InvalidOrder)));
    }

    #[test]
    fn test_owner_alias() {
        let query: ListQuery = serde_json::from_str(r#"{"u": 5, "order": "oldest"}"#).unwrap();
        let params = query.into_params().unwrap();
        assert_eq!(params.owner, Some(5));
        assert_eq!(params.order, SortOrder::Oldest);
    }

    #[test]
    fn test_apply_orders_and_pages() {
        let rows: Vec<(i32, i32, i32)> = (1..=60).map(|i| (i, i, i)).collect();

        let newest = ListParams::default().apply(rows.clone());
        assert_eq!(newest.len(), 25);
        assert_eq!(newest[0], 60);

        let page3_oldest = ListParams {
            page: PageRequest::new(3),
            order: SortOrder::Oldest,
            owner: None,
        }
        .apply(rows);
        assert_eq!(page3_oldest, (51..=60).collect::<Vec<_>>());
    }
}
