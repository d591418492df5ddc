//! HTTP front end for the binary
//!
//! Routes:
//!
//! | Route | Response |
//! |-------|----------|
//! | `GET /api/chart/{symbol}` | `image/png`, last day of prices |
//! | `GET /api/prices/{symbol}[/{timeframe}]` | `{"prices": [...]}` |
//! | `GET /api/stats/{symbol}` | `{"stats": {...}}` |
//! | `GET /api/coins` | `{"coins": [...]}` |
//!
//! Errors are JSON bodies of the form `{"error": kind, "message": text}`.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::config::{constants, CoinchartConfig};
use crate::errors::{CoinchartError, ErrorKind, MarketDataError};
use crate::service::MarketDataService;
use crate::types::{symbol::Symbol, timeframe::Timeframe};

/// Main entry point for the application.
pub async fn run() -> anyhow::Result<()> {
    let config = CoinchartConfig::from_env()?;

    let port = match dotenvy::var(constants::env::PORT) {
        Ok(raw) => raw.trim().parse::<u16>().map_err(|e| {
            anyhow::anyhow!("Invalid {}: {raw:?} ({e})", constants::env::PORT)
        })?,
        Err(_) => constants::DEFAULT_PORT,
    };
    let listener = TcpListener::bind(("0.0.0.0", port)).await?;

    info!(
        base_url = %config.base_url,
        cache_ttl_secs = config.cache_ttl.as_secs(),
        sweeper = config.sweep_interval.is_some(),
        "Starting market data service"
    );
    let service = Arc::new(MarketDataService::from_config(&config)?);

    serve_api(listener, service).await
}

/// Build the router over a shared service
pub fn router(service: Arc<MarketDataService>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::ORIGIN, header::CONTENT_TYPE]);

    Router::new()
        .route("/api/chart/:symbol", get(get_chart))
        .route("/api/prices/:symbol", get(get_prices))
        .route("/api/prices/:symbol/:timeframe", get(get_prices_for_timeframe))
        .route("/api/stats/:symbol", get(get_stats))
        .route("/api/coins", get(list_coins))
        .route("/api/chart/", get(missing_symbol))
        .route("/api/prices/", get(missing_symbol))
        .route("/api/stats/", get(missing_symbol))
        .layer(cors)
        .with_state(service)
}

/// Starts the API server.
pub async fn serve_api(listener: TcpListener, service: Arc<MarketDataService>) -> anyhow::Result<()> {
    let app = router(service);

    let addr = listener.local_addr()?;
    info!(address = ?addr, "Starting server");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Error response with a machine-readable kind
#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    kind: &'static str,
    message: String,
}

impl ApiError {
    fn missing_symbol() -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            kind: "missing_symbol",
            message: "Missing symbol".to_string(),
        }
    }

    fn from_kind(kind: ErrorKind, message: String) -> Self {
        let status = match kind {
            ErrorKind::NoData | ErrorKind::EmptySeries => StatusCode::NOT_FOUND,
            ErrorKind::RenderFailed => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::UpstreamUnavailable
            | ErrorKind::UpstreamBadStatus
            | ErrorKind::MalformedResponse
            | ErrorKind::MissingSection => StatusCode::BAD_GATEWAY,
        };
        Self {
            status,
            kind: kind.as_str(),
            message,
        }
    }
}

impl From<MarketDataError> for ApiError {
    fn from(e: MarketDataError) -> Self {
        Self::from_kind(e.kind(), e.to_string())
    }
}

impl From<CoinchartError> for ApiError {
    fn from(e: CoinchartError) -> Self {
        Self::from_kind(e.kind(), e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            warn!(status = self.status.as_u16(), kind = self.kind, message = %self.message, "Request failed");
        }
        let body = Json(json!({ "error": self.kind, "message": self.message }));
        (self.status, body).into_response()
    }
}

fn parse_symbol(raw: &str) -> Result<Symbol, ApiError> {
    let symbol = Symbol::new(raw);
    if symbol.is_empty() {
        return Err(ApiError::missing_symbol());
    }
    Ok(symbol)
}

async fn missing_symbol() -> ApiError {
    ApiError::missing_symbol()
}

async fn get_chart(
    State(service): State<Arc<MarketDataService>>,
    Path(symbol): Path<String>,
) -> Result<Response, ApiError> {
    let symbol = parse_symbol(&symbol)?;
    let png = service.get_chart(symbol).await?;
    Ok((
        [(header::CONTENT_TYPE, HeaderValue::from_static("image/png"))],
        png,
    )
        .into_response())
}

async fn get_prices(
    State(service): State<Arc<MarketDataService>>,
    Path(symbol): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    prices_response(&service, &symbol, Timeframe::default()).await
}

async fn get_prices_for_timeframe(
    State(service): State<Arc<MarketDataService>>,
    Path((symbol, timeframe)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    prices_response(&service, &symbol, Timeframe::parse_or_default(&timeframe)).await
}

async fn prices_response(
    service: &MarketDataService,
    symbol: &str,
    timeframe: Timeframe,
) -> Result<Json<serde_json::Value>, ApiError> {
    let symbol = parse_symbol(symbol)?;
    let prices = service.get_prices(symbol, timeframe).await?;
    Ok(Json(json!({ "prices": prices })))
}

async fn get_stats(
    State(service): State<Arc<MarketDataService>>,
    Path(symbol): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let symbol = parse_symbol(&symbol)?;
    let stats = service.get_statistics(symbol).await?;
    Ok(Json(json!({ "stats": stats })))
}

async fn list_coins(State(service): State<Arc<MarketDataService>>) -> Json<serde_json::Value> {
    Json(json!({ "coins": service.list_default_coins() }))
}
