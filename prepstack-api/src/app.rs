/// Application state and router builder
///
/// `AppState` wires the services together once at startup: the pool, the
/// token service, and the auth service are constructed here and cloned into
/// handlers via Axum's `State` extractor.
///
/// # Router Layout
///
/// ```text
/// /
/// ├── /health                          # Health check (public)
/// └── /api/
///     ├── /auth/       signup, login, refresh, availability (public)
///     │                logout (authenticated)
///     ├── /users/      me, change-nickname, change-password,
///     │                change-position, profile-image (authenticated)
///     ├── /questions/  list, detail (public); create (authenticated)
///     ├── /answers/    list, detail (public); create/update/delete
///     │                (authenticated + owner)
///     ├── /comments/   list (public); create/update/delete
///     │                (authenticated + owner)
///     ├── /posts/      list, detail (public); create/update/delete
///     │                (authenticated + owner)
///     ├── /favorites/  list own, add, remove (authenticated)
///     ├── /rankings/   likes, answers, score, me (authenticated)
///     ├── /trending/   questions, posts (public)
///     ├── /reports/    create, list, update status (authenticated)
///     ├── /categories/ list (public); create (authenticated)
///     └── /uploads/    presign (authenticated)
/// ```
///
/// # Middleware Stack
///
/// Applied in order: security headers, CORS, request tracing, then
/// authentication per route group (or per handler where a path mixes public
/// and protected methods).

use crate::{config::Config, middleware::security::SecurityHeadersLayer};
use axum::{
    handler::Handler,
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, patch, post},
    Router,
};
use prepstack_shared::auth::{service::AuthService, tokens::TokenService};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned per request; all fields are cheaply cloneable handles.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Token pair lifecycle service
    pub tokens: TokenService,

    /// Account service
    pub auth: AuthService,
}

impl AppState {
    /// Creates application state, constructing services with their
    /// dependencies injected
    pub fn new(db: PgPool, config: Config) -> Self {
        let tokens = TokenService::new(db.clone(), config.jwt.clone());
        let auth = AuthService::new(db.clone(), tokens.clone());

        Self {
            db,
            config: Arc::new(config),
            tokens,
            auth,
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Per-handler auth for paths that mix public and protected methods;
    // per-group auth everywhere else.
    let protect = from_fn_with_state(state.clone(), crate::middleware::auth::require_auth);

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let auth_routes = Router::new()
        .route("/signup", post(routes::auth::signup))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh))
        .route("/availability", get(routes::auth::availability))
        .route(
            "/logout",
            post(routes::auth::logout.layer(protect.clone())),
        );

    let user_routes = Router::new()
        .route("/me", get(routes::users::me))
        .route("/positions", get(routes::users::list_positions))
        .route("/change-nickname", patch(routes::users::change_nickname))
        .route("/change-password", patch(routes::users::change_password))
        .route("/change-position", patch(routes::users::change_position))
        .route("/profile-image", patch(routes::users::change_profile_image))
        .layer(protect.clone());

    let question_routes = Router::new()
        .route(
            "/",
            get(routes::questions::list_questions)
                .post(routes::questions::create_question.layer(protect.clone())),
        )
        .route("/:id", get(routes::questions::get_question));

    let answer_routes = Router::new()
        .route("/question/:id", get(routes::answers::list_by_question))
        .route(
            "/:id",
            get(routes::answers::get_answer)
                .post(routes::answers::create_answer.layer(protect.clone()))
                .patch(routes::answers::update_answer.layer(protect.clone()))
                .delete(routes::answers::delete_answer.layer(protect.clone())),
        );

    let comment_routes = Router::new().route(
        "/:id",
        get(routes::comments::list_comments)
            .post(routes::comments::create_comment.layer(protect.clone()))
            .patch(routes::comments::update_comment.layer(protect.clone()))
            .delete(routes::comments::delete_comment.layer(protect.clone())),
    );

    let post_routes = Router::new()
        .route(
            "/",
            get(routes::posts::list_posts)
                .post(routes::posts::create_post.layer(protect.clone())),
        )
        .route(
            "/:id",
            get(routes::posts::get_post)
                .patch(routes::posts::update_post.layer(protect.clone()))
                .delete(routes::posts::delete_post.layer(protect.clone())),
        );

    let favorite_routes = Router::new()
        .route("/", get(routes::favorites::list_favorites))
        .route(
            "/:id",
            post(routes::favorites::add_favorite).delete(routes::favorites::remove_favorite),
        )
        .layer(protect.clone());

    let ranking_routes = Router::new()
        .route("/likes", get(routes::rankings::by_likes))
        .route("/answers", get(routes::rankings::by_answers))
        .route("/score", get(routes::rankings::by_score))
        .route("/me", get(routes::rankings::my_rank))
        .layer(protect.clone());

    let trending_routes = Router::new()
        .route("/questions", get(routes::trending::questions))
        .route("/posts", get(routes::trending::posts));

    let report_routes = Router::new()
        .route(
            "/",
            post(routes::reports::create_report).get(routes::reports::list_reports),
        )
        .route("/:id", patch(routes::reports::update_report_status))
        .layer(protect.clone());

    let category_routes = Router::new().route(
        "/",
        get(routes::categories::list_categories)
            .post(routes::categories::create_category.layer(protect.clone())),
    );

    let upload_routes = Router::new()
        .route("/presign", post(routes::uploads::presign_upload))
        .layer(protect.clone());

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/users", user_routes)
        .nest("/questions", question_routes)
        .nest("/answers", answer_routes)
        .nest("/comments", comment_routes)
        .nest("/posts", post_routes)
        .nest("/favorites", favorite_routes)
        .nest("/rankings", ranking_routes)
        .nest("/trending", trending_routes)
        .nest("/reports", report_routes)
        .nest("/categories", category_routes)
        .nest("/uploads", upload_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::COOKIE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}
