use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use super::middleware::{metrics_middleware, require_session};
use super::{auth, handlers, insights, profile, search, works, ws};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Front-end static files path (configurable via env)
    let ui_dir = std::env::var("UI_DIR").unwrap_or_else(|_| "ui".to_string());

    // Routes that need a signed-in user
    let protected_routes = Router::new()
        // Profile
        .route(
            "/profile",
            get(profile::get_profile).patch(profile::update_profile),
        )
        // Shelf
        .route(
            "/works",
            get(works::list_works)
                .post(works::create_work)
                .delete(works::clear_works),
        )
        .route("/works/from-search", post(works::add_from_search))
        .route(
            "/works/{id}",
            get(works::get_work)
                .patch(works::update_work)
                .delete(works::delete_work),
        )
        .route("/works/{id}/like", post(works::toggle_liked))
        .route("/works/{id}/wishlist", post(works::toggle_wishlisted))
        // Insights
        .route("/stats", get(insights::get_stats))
        .route("/affinities", get(insights::get_affinities))
        // External catalogs
        .route("/search", get(search::search))
        .route("/trending", get(search::trending))
        // Change feed, closed when the session ends
        .route("/ws", get(ws::ws_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    // API routes
    let api_routes = Router::new()
        // Health, config and metrics
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/metrics", get(handlers::get_metrics))
        // Session
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/session", get(auth::get_session))
        .merge(protected_routes)
        .with_state(state);

    // Serve the front-end with SPA fallback
    let index_path = format!("{}/index.html", ui_dir);
    let serve_dir = ServeDir::new(&ui_dir).fallback(ServeFile::new(&index_path));

    Router::new()
        .nest("/api/v1", api_routes)
        .fallback_service(serve_dir)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
