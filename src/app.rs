use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    response::{IntoResponse, Json},
    routing::{delete, get, patch, post, MethodRouter},
    Router,
};
use serde_json::{json, Value};
use sqlx::PgPool;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::database::DatabaseManager;
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;

/// Process-wide dependencies handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(pool: PgPool, config: AppConfig) -> Self {
        Self {
            pool,
            config: Arc::new(config),
        }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_routes(&state))
        .merge(movie_routes(&state))
        .merge(profile_routes(&state))
        // Global middleware
        .layer(cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Wrap a method router so it only runs for a verified caller
fn authenticated(state: &AppState, route: MethodRouter<AppState>) -> MethodRouter<AppState> {
    route.route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth_middleware))
}

fn auth_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(public::auth::register_post))
        .route("/auth/login", post(public::auth::login_post))
        .route(
            "/auth/create-profile",
            authenticated(state, post(protected::auth::create_profile_post)),
        )
}

fn movie_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/movies",
            get(public::movies::movies_get).merge(authenticated(state, post(protected::movies::movie_post))),
        )
        .route("/movies/search", get(public::movies::movies_search))
        .route(
            "/movies/:id",
            get(public::movies::movie_get).merge(authenticated(
                state,
                patch(protected::movies::movie_patch).delete(protected::movies::movie_delete),
            )),
        )
}

fn profile_routes(state: &AppState) -> Router<AppState> {
    use protected::profiles;

    Router::new()
        .route("/profiles", authenticated(state, get(profiles::profiles_get)))
        .route(
            "/profiles/getmyprofiles",
            authenticated(state, get(profiles::my_profiles_get)),
        )
        .route(
            "/profiles/:id",
            authenticated(
                state,
                get(profiles::profile_get)
                    .patch(profiles::profile_patch)
                    .delete(profiles::profile_delete),
            ),
        )
        .route(
            "/profiles/:id/watchlist",
            authenticated(
                state,
                get(profiles::watchlist_get).post(profiles::watchlist_post),
            ),
        )
        .route(
            "/profiles/:id/watchlist/:movie_id",
            authenticated(state, delete(profiles::watchlist_delete)),
        )
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

async fn root() -> Json<Value> {
    Json(json!({
        "status": "success",
        "data": {
            "name": "MovieStream API",
            "version": env!("CARGO_PKG_VERSION"),
            "endpoints": {
                "auth": "/auth/register, /auth/login (public), /auth/create-profile (account owner)",
                "movies": "/movies[/:id], /movies/search (public reads, account owner writes)",
                "profiles": "/profiles[/:id], /profiles/getmyprofiles, /profiles/:id/watchlist (protected)",
                "health": "/health"
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "success",
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "error",
                    "message": "Database unavailable",
                    "code": "SERVICE_UNAVAILABLE",
                    "data": {
                        "status": "degraded",
                        "timestamp": now
                    }
                })),
            )
        }
    }
}
