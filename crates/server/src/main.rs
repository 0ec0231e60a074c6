use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    extract::{Path, RawQuery, State},
    http::{header, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use catalog::Catalog;
use server_api::{get_product, get_vendor, list_products, list_vendors, ApiContext};
use shared::{
    domain::Vendor,
    error::{ApiError, ErrorCode},
    protocol::RawQueryParams,
};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;

use config::{load_settings, Settings};

#[derive(Clone)]
struct AppState {
    api: ApiContext,
    cache_control: HeaderValue,
}

type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings()?;
    let state = build_state(&settings)?;
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings
        .server_bind
        .parse()
        .with_context(|| format!("invalid bind address '{}'", settings.server_bind))?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

fn build_state(settings: &Settings) -> anyhow::Result<AppState> {
    let catalog = match settings.catalog_path.as_deref() {
        Some(path) => Catalog::load(path).with_context(|| format!("loading catalog {path}"))?,
        None => {
            info!("no catalog_path configured; serving built-in demo catalog");
            Catalog::demo()?
        }
    };
    let cache_control = HeaderValue::from_str(&settings.cache_control())
        .context("cache settings produce an invalid Cache-Control header")?;
    Ok(AppState {
        api: ApiContext::new(catalog),
        cache_control,
    })
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/vendors", get(http_list_vendors))
        .route("/vendors/:vendor_slug", get(http_get_vendor))
        .route(server_api::products_route(), get(http_list_products))
        .route("/product/:product_id", get(http_get_product))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(%error, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

async fn healthz() -> &'static str {
    "ok"
}

async fn http_list_vendors(State(state): State<Arc<AppState>>) -> Json<Vec<Vendor>> {
    Json(list_vendors(&state.api).await)
}

async fn http_get_vendor(
    State(state): State<Arc<AppState>>,
    Path(vendor_slug): Path<String>,
) -> ApiResult<Json<Vendor>> {
    get_vendor(&state.api, &vendor_slug)
        .await
        .map(Json)
        .map_err(error_response)
}

async fn http_list_products(
    State(state): State<Arc<AppState>>,
    Path(vendor_slug): Path<String>,
    RawQuery(query): RawQuery,
) -> ApiResult<impl IntoResponse> {
    // Repeated keys resolve to their first occurrence instead of a 400.
    let params =
        RawQueryParams::from_query_string(query.as_deref().unwrap_or_default()).normalize();
    let result = list_products(&state.api, &vendor_slug, &params)
        .await
        .map_err(error_response)?;
    Ok((
        [(header::CACHE_CONTROL, state.cache_control.clone())],
        Json(result),
    ))
}

async fn http_get_product(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let product = get_product(&state.api, &product_id)
        .await
        .map_err(error_response)?;
    Ok((
        [(header::CACHE_CONTROL, state.cache_control.clone())],
        Json(product),
    ))
}

fn error_response(err: ApiError) -> (StatusCode, Json<ApiError>) {
    let status = match err.code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Internal => {
            warn!(message = %err.message, "internal error while serving request");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(err))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
