//! Listing predicates shared by every post query.

use chrono::{DateTime, Utc};

use super::HashtagFilter;

/// Raw listing request as received from a client.
#[derive(Debug, Clone, Default)]
pub struct PostListQuery {
    pub page: Option<u64>,
    pub take: Option<u64>,
    pub category: Option<String>,
    pub hashtag: Option<HashtagFilter>,
    pub keyword: Option<String>,
}

/// Predicates for a post listing. Soft-deleted posts are always excluded.
#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    /// Restrict to these ids. `Some(vec![])` matches nothing.
    pub ids: Option<Vec<i32>>,
    pub category: Option<String>,
    /// Matches when the title or the content contains the keyword.
    pub keyword: Option<String>,
    /// Inclusive lower bound on `created_at`.
    pub created_after: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `created_at`.
    pub created_before: Option<DateTime<Utc>>,
}

impl PostFilter {
    pub fn ids(ids: Vec<i32>) -> Self {
        Self {
            ids: Some(ids),
            ..Default::default()
        }
    }

    pub fn category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            ..Default::default()
        }
    }

    /// Whether a filter on ids can match anything at all.
    pub fn is_empty_match(&self) -> bool {
        matches!(&self.ids, Some(ids) if ids.is_empty())
    }
}

/// Ordering for a post listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostSort {
    Newest,
    MostViewed,
    MostLiked,
    /// `like_count DESC, created_at DESC` - the refresher's candidate order.
    MostLikedThenNewest,
}

const MAX_OFFSET: u64 = i64::MAX as u64;

/// Limit/offset window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub take: u64,
    pub skip: u64,
}

impl Pagination {
    pub fn first(take: u64) -> Self {
        Self { take, skip: 0 }
    }

    /// Build a window from a 1-based page number. Missing or zero values fall
    /// back to the first page of `default_take` items; `take` is capped at
    /// `max_take` and the offset saturates at the largest SQL `BIGINT`.
    pub fn from_page(
        page: Option<u64>,
        take: Option<u64>,
        default_take: u64,
        max_take: u64,
    ) -> Self {
        let take = take
            .filter(|t| *t > 0)
            .unwrap_or(default_take)
            .min(max_take.max(1));
        let skip = match page {
            Some(page) if page > 1 => (page - 1).saturating_mul(take).min(MAX_OFFSET),
            _ => 0,
        };
        Self { take, skip }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults_to_first_page() {
        assert_eq!(
            Pagination::from_page(None, None, 20, 100),
            Pagination { take: 20, skip: 0 }
        );
        assert_eq!(
            Pagination::from_page(Some(0), Some(0), 20, 100),
            Pagination { take: 20, skip: 0 }
        );
    }

    #[test]
    fn pagination_skips_previous_pages() {
        assert_eq!(
            Pagination::from_page(Some(3), Some(10), 20, 100),
            Pagination { take: 10, skip: 20 }
        );
    }

    #[test]
    fn pagination_caps_take_and_saturates_offset() {
        assert_eq!(
            Pagination::from_page(Some(2), Some(1_000_000), 20, 100),
            Pagination { take: 100, skip: 100 }
        );

        let far = Pagination::from_page(Some(u64::MAX), Some(2), 20, 100);
        assert_eq!(far.take, 2);
        assert_eq!(far.skip, i64::MAX as u64);

        let far = Pagination::from_page(Some(u64::MAX), Some(u64::MAX), 20, 100);
        assert_eq!(far.take, 100);
        assert_eq!(far.skip, i64::MAX as u64);
    }

    #[test]
    fn empty_id_filter_matches_nothing() {
        assert!(PostFilter::ids(vec![]).is_empty_match());
        assert!(!PostFilter::ids(vec![1]).is_empty_match());
        assert!(!PostFilter::default().is_empty_match());
    }
}
