/// Database models and query operations
///
/// One module per entity family. Each model is a `sqlx::FromRow` struct with
/// its query operations as associated functions taking a `&PgPool`, plus
/// `Create*`/`Update*` input structs.
///
/// - `user`: accounts and profile data
/// - `refresh_token`: persisted refresh-token records
/// - `question`: interview questions and category associations
/// - `answer`: user answers to questions
/// - `comment`: threaded comments on posts and answers (soft-deleted)
/// - `post`: community posts
/// - `favorite`: per-user favorites with target counters
/// - `report`: content reports
/// - `category`: content categories
/// - `ranking`: leaderboard aggregation queries
/// - `trending`: trailing-window popularity queries

pub mod answer;
pub mod category;
pub mod comment;
pub mod favorite;
pub mod post;
pub mod question;
pub mod ranking;
pub mod refresh_token;
pub mod report;
pub mod trending;
pub mod user;

/// Page-based pagination translated to LIMIT/OFFSET
///
/// Pages are 1-based; limits are capped so a single request cannot ask for
/// an unbounded result set.
#[derive(Debug, Clone, Copy, serde::Deserialize)]
pub struct Pagination {
    /// Maximum rows per page
    #[serde(default = "Pagination::default_limit")]
    pub limit: i64,

    /// 1-based page number
    #[serde(default = "Pagination::default_page")]
    pub page: i64,
}

impl Pagination {
    const MAX_LIMIT: i64 = 100;

    fn default_limit() -> i64 {
        20
    }

    fn default_page() -> i64 {
        1
    }

    /// Effective LIMIT after clamping
    pub fn limit(&self) -> i64 {
        self.limit.clamp(1, Self::MAX_LIMIT)
    }

    /// Effective OFFSET (skip) for the requested page
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1) * self.limit()
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self { limit: 20, page: 1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults() {
        let p = Pagination::default();
        assert_eq!(p.limit(), 20);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn test_pagination_offset_translation() {
        let p = Pagination { limit: 10, page: 3 };
        assert_eq!(p.limit(), 10);
        assert_eq!(p.offset(), 20);
    }

    #[test]
    fn test_pagination_clamps_bad_input() {
        let p = Pagination {
            limit: 5000,
            page: 0,
        };
        assert_eq!(p.limit(), 100);
        assert_eq!(p.offset(), 0);

        let p = Pagination { limit: 0, page: 2 };
        assert_eq!(p.limit(), 1);
        assert_eq!(p.offset(), 1);
    }
}
