pub mod admin;
pub mod movies;

use axum::{
    Extension, Router,
    http::{HeaderValue, Method, header},
    routing::get,
};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::SharedState;
use crate::config::AppConfig;

pub fn create_router(state: SharedState) -> Router {
    use crate::api::{admin, movies};

    let cors = cors_layer(&state.config);

    Router::new()
        // public
        .route("/", get(movies::home))
        .route("/health", get(movies::health))
        .route("/movies", get(movies::all_movies))
        .route("/movies/{id}", get(movies::one_movie))
        // authenticated
        .route("/admin/me", get(admin::me))
        .route("/admin/movies/{id}", get(admin::movie_for_edit))
        .route("/admin/users/{id}", get(admin::user_by_id))
        .layer(Extension(state))
        .layer(cors)
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origin = if config.allows_any_origin() {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| match HeaderValue::from_str(o) {
                Ok(v) => Some(v),
                Err(_) => {
                    tracing::warn!("ignoring invalid allowed origin '{o}'");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
}
