/// API route handlers
///
/// One module per resource:
///
/// - `health`: health check
/// - `auth`: signup, login, refresh, logout, availability
/// - `users`: profile and credential management
/// - `questions`: question browsing and creation
/// - `answers`: answers to questions
/// - `comments`: threaded comments on posts and answers
/// - `posts`: community posts
/// - `favorites`: favorite/unfavorite
/// - `rankings`: leaderboards
/// - `trending`: trailing-window popularity
/// - `reports`: content reports
/// - `categories`: content categories
/// - `uploads`: presigned upload URLs

use prepstack_shared::models::Pagination;

/// Builds pagination from optional query params
///
/// Query strings carry `limit` and `page` as separate optional fields
/// (serde_urlencoded cannot flatten typed structs).
pub(crate) fn pagination(limit: Option<i64>, page: Option<i64>) -> Pagination {
    let defaults = Pagination::default();
    Pagination {
        limit: limit.unwrap_or(defaults.limit),
        page: page.unwrap_or(defaults.page),
    }
}

pub mod answers;
pub mod auth;
pub mod categories;
pub mod comments;
pub mod favorites;
pub mod health;
pub mod posts;
pub mod questions;
pub mod rankings;
pub mod reports;
pub mod trending;
pub mod uploads;
pub mod users;
