//! HTTP-level tests for CoinGeckoClient against a local stand-in server
//!
//! The server mimics the two provider endpoints the client uses and records
//! what it was asked for.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path, RawQuery, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use coinchart::{
    CoinGeckoClient, CoinchartConfigBuilder, ErrorKind, MarketDataError, MarketDataSource, Symbol,
    Timeframe,
};
use tokio::net::TcpListener;

#[derive(Debug, Clone, PartialEq)]
struct Recorded {
    path: String,
    query: Option<String>,
    api_key: Option<String>,
}

#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<Vec<Recorded>>>);

impl Recorder {
    fn record(&self, path: String, query: Option<String>, headers: &HeaderMap) {
        let api_key = headers
            .get("x-cg-demo-api-key")
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        self.0.lock().unwrap().push(Recorded {
            path,
            query,
            api_key,
        });
    }

    fn all(&self) -> Vec<Recorded> {
        self.0.lock().unwrap().clone()
    }
}

fn json(body: &'static str) -> Response {
    ([("content-type", "application/json")], body).into_response()
}

async fn market_chart(
    State(recorder): State<Recorder>,
    Path(id): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    recorder.record(format!("/coins/{id}/market_chart"), query, &headers);
    match id.as_str() {
        "bitcoin" => json(r#"{"prices":[[0,100.0],[1,105.5],[2,98.2]],"market_caps":[],"total_volumes":[]}"#),
        "empty" => json(r#"{"prices":[]}"#),
        "garbage" => json("<html>not json</html>"),
        "slow" => {
            tokio::time::sleep(Duration::from_secs(5)).await;
            json(r#"{"prices":[[0,1.0]]}"#)
        }
        "limited" => (StatusCode::TOO_MANY_REQUESTS, "slow down").into_response(),
        _ => (StatusCode::NOT_FOUND, r#"{"error":"coin not found"}"#).into_response(),
    }
}

async fn coin_detail(
    State(recorder): State<Recorder>,
    Path(id): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    recorder.record(format!("/coins/{id}"), query, &headers);
    match id.as_str() {
        "bitcoin" => json(
            r#"{
                "id": "bitcoin",
                "market_data": {
                    "market_cap": {"usd": 1300000000000.0},
                    "total_volume": {"usd": 25000000000.0},
                    "circulating_supply": 19500000.0,
                    "total_supply": null,
                    "ath": {"usd": 69045},
                    "ath_date": {"usd": "2021-11-10T14:24:11.849Z"},
                    "price_change_percentage_24h": 1.5,
                    "price_change_percentage_7d": "n/a"
                }
            }"#,
        ),
        "bare" => json(r#"{"id":"bare","name":"Bare"}"#),
        _ => (StatusCode::NOT_FOUND, r#"{"error":"coin not found"}"#).into_response(),
    }
}

/// Start the stand-in server; returns its `/api/v3` root and the recorder
async fn start_server() -> (String, Recorder) {
    let recorder = Recorder::default();
    let app = Router::new()
        .route("/api/v3/coins/:id/market_chart", get(market_chart))
        .route("/api/v3/coins/:id", get(coin_detail))
        .with_state(recorder.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}/api/v3"), recorder)
}

fn client_for(base_url: &str) -> CoinGeckoClient {
    let config = CoinchartConfigBuilder::with_defaults()
        .base_url(base_url)
        .request_timeout(Duration::from_secs(2))
        .build();
    CoinGeckoClient::new(&config).unwrap()
}

#[tokio::test]
async fn test_fetch_price_series() {
    let (base, recorder) = start_server().await;
    let client = client_for(&base);

    let series = client
        .fetch_price_series(&Symbol::new("bitcoin"), Timeframe::Week1)
        .await
        .unwrap();
    assert_eq!(series.as_slice(), &[100.0, 105.5, 98.2]);

    let requests = recorder.all();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/coins/bitcoin/market_chart");
    assert_eq!(requests[0].query.as_deref(), Some("vs_currency=usd&days=7"));
    assert_eq!(requests[0].api_key, None);
}

#[tokio::test]
async fn test_symbol_is_normalized_before_request() {
    let (base, recorder) = start_server().await;
    let client = client_for(&base);

    client
        .fetch_price_series(&Symbol::new("  BitCoin "), Timeframe::Hour1)
        .await
        .unwrap();

    let requests = recorder.all();
    assert_eq!(requests[0].path, "/coins/bitcoin/market_chart");
    assert_eq!(requests[0].query.as_deref(), Some("vs_currency=usd&days=0.04"));
}

#[tokio::test]
async fn test_api_key_header_is_sent() {
    let (base, recorder) = start_server().await;
    let config = CoinchartConfigBuilder::with_defaults()
        .base_url(&base)
        .api_key("demo-key")
        .build();
    let client = CoinGeckoClient::new(&config).unwrap();

    client.fetch_statistics(&Symbol::new("bitcoin")).await.unwrap();

    assert_eq!(recorder.all()[0].api_key.as_deref(), Some("demo-key"));
}

#[tokio::test]
async fn test_empty_series_is_no_data() {
    let (base, _) = start_server().await;
    let err = client_for(&base)
        .fetch_price_series(&Symbol::new("empty"), Timeframe::Day1)
        .await
        .unwrap_err();
    assert!(matches!(err, MarketDataError::NoData { ref symbol, ref timeframe } if symbol == "empty" && timeframe == "1d"));
}

#[tokio::test]
async fn test_malformed_body() {
    let (base, _) = start_server().await;
    let err = client_for(&base)
        .fetch_price_series(&Symbol::new("garbage"), Timeframe::Day1)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_bad_status_carries_code_and_reason() {
    let (base, _) = start_server().await;
    let client = client_for(&base);

    let err = client
        .fetch_price_series(&Symbol::new("unknown"), Timeframe::Day1)
        .await
        .unwrap_err();
    match &err {
        MarketDataError::UpstreamBadStatus { status, reason, .. } => {
            assert_eq!(*status, 404);
            assert_eq!(reason, "Not Found");
        }
        other => panic!("expected UpstreamBadStatus, got {other:?}"),
    }
    assert!(err.to_string().contains("404 Not Found"), "{err}");

    let err = client
        .fetch_price_series(&Symbol::new("limited"), Timeframe::Day1)
        .await
        .unwrap_err();
    assert!(matches!(err, MarketDataError::UpstreamBadStatus { status: 429, .. }));
}

#[tokio::test]
async fn test_fetch_statistics_permissive() {
    let (base, recorder) = start_server().await;
    let stats = client_for(&base)
        .fetch_statistics(&Symbol::new("BITCOIN"))
        .await
        .unwrap();

    assert_eq!(stats.market_cap, 1.3e12);
    assert_eq!(stats.volume_24h, 2.5e10);
    assert_eq!(stats.circulating_supply, 19_500_000.0);
    assert_eq!(stats.total_supply, 0.0);
    assert_eq!(stats.all_time_high, 69045.0);
    assert_eq!(stats.all_time_high_date, "2021-11-10T14:24:11.849Z");
    assert_eq!(stats.price_change_percent.day, 1.5);
    assert_eq!(stats.price_change_percent.week, 0.0);
    assert_eq!(stats.price_change_percent.year, 0.0);

    let requests = recorder.all();
    assert_eq!(requests[0].path, "/coins/bitcoin");
    assert_eq!(
        requests[0].query.as_deref(),
        Some("localization=false&tickers=false&market_data=true&community_data=false&developer_data=false")
    );
}

#[tokio::test]
async fn test_statistics_without_market_data() {
    let (base, _) = start_server().await;
    let err = client_for(&base)
        .fetch_statistics(&Symbol::new("bare"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        MarketDataError::MissingSection {
            section: "market_data",
            ..
        }
    ));
}

#[tokio::test]
async fn test_statistics_not_found() {
    let (base, _) = start_server().await;
    let err = client_for(&base)
        .fetch_statistics(&Symbol::new("nope"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UpstreamBadStatus);
}

#[tokio::test]
async fn test_timeout_is_unavailable() {
    let (base, _) = start_server().await;
    let config = CoinchartConfigBuilder::with_defaults()
        .base_url(&base)
        .request_timeout(Duration::from_millis(200))
        .build();
    let client = CoinGeckoClient::new(&config).unwrap();

    let err = client
        .fetch_price_series(&Symbol::new("slow"), Timeframe::Day1)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UpstreamUnavailable);
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_connection_refused_is_unavailable() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client_for(&format!("http://{addr}/api/v3"))
        .fetch_statistics(&Symbol::new("bitcoin"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UpstreamUnavailable);
    assert!(std::error::Error::source(&err).is_some());
}
