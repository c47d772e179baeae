//! Axum-based HTTP server: shortcode endpoints, content expansion and admin UI

pub mod admin;

use crate::error::StromError;
use crate::service::StromService;
use crate::shortcode::ShortcodeAttrs;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    middleware,
    response::{Html, IntoResponse},
    routing::{get, post},
};
use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<StromService>,
}

async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "ok",
            "version": env!("APP_VERSION"),
        })),
    )
}

async fn tariffs_shortcode(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Html<String> {
    let attrs = ShortcodeAttrs::from_pairs(params);
    Html(state.service.display_strom_tariffs(&attrs).await)
}

async fn graph_shortcode(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Html<String> {
    let attrs = ShortcodeAttrs::from_pairs(params);
    Html(state.service.stromgraph(&attrs).await)
}

/// Expand every shortcode in the posted content body
async fn render_content(State(state): State<AppState>, body: String) -> Html<String> {
    Html(state.service.expand_shortcodes(&body).await)
}

pub fn build_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/", get(|| async { axum::response::Redirect::to("/admin") }))
        .route("/api/health", get(health))
        .route("/shortcode/display_strom_tariffs", get(tariffs_shortcode))
        .route("/shortcode/stromgraph", get(graph_shortcode))
        .route("/render", post(render_content))
        .layer(CorsLayer::permissive());

    // no CORS on the admin routes: browsers must not reach them cross-origin
    let admin = Router::new()
        .route("/admin", get(admin::admin_page))
        .route("/admin/settings", post(admin::save_settings))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            admin::require_admin,
        ));

    let router = public
        .merge(admin)
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    #[cfg(feature = "compression")]
    let router = router.layer(tower_http::compression::CompressionLayer::new());

    router
}

pub async fn serve(service: Arc<StromService>, host: &str, port: u16) -> anyhow::Result<()> {
    let logger = crate::logging::get_logger("web");
    if service.config().web.admin_token.is_none() {
        logger.warn("web.admin_token is not set; /admin is open to anyone who can reach this port");
    }
    let router = build_router(AppState { service });

    logger.info(&format!(
        "Starting web server; requested host={}, port={}",
        host, port
    ));

    let addr = match host.parse::<IpAddr>() {
        Ok(ip) => SocketAddr::new(ip, port),
        Err(_) => {
            logger.warn(&format!(
                "Invalid host '{}'; falling back to 127.0.0.1",
                host
            ));
            ([127, 0, 0, 1], port).into()
        }
    };

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| StromError::web(format!("Failed to bind {}: {}", addr, e)))?;
    let local_addr = listener.local_addr()?;
    logger.info(&format!(
        "Web server listening at http://{}:{} (admin /admin, shortcodes /shortcode)",
        local_addr.ip(),
        local_addr.port()
    ));

    axum::serve(listener, router).await?;
    Ok(())
}
