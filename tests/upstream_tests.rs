use anyhow::Result;
use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Router, routing::get};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::time::Duration;

use trendproxy::config::Config;
use trendproxy::data_models::{Timeframe, TrendRequest};
use trendproxy::error::UpstreamError;
use trendproxy::upstream::{GoogleTrendsClient, TrendSource, UpstreamOutcome, fetch_outcome};

mod test_helpers {
    use super::*;

    fn widget(id: &str, token: &str, keyword: &str) -> Value {
        json!({
            "id": id,
            "token": token,
            "request": {
                "restriction": {
                    "complexKeywordsRestriction": {
                        "keyword": [{"type": "BROAD", "value": keyword}]
                    }
                }
            }
        })
    }

    async fn explore(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
        let req: Value = serde_json::from_str(&params["req"]).unwrap_or(Value::Null);
        let widgets: Vec<Value> = req["comparisonItem"]
            .as_array()
            .cloned()
            .unwrap_or_default()
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let keyword = item["keyword"].as_str().unwrap_or_default();
                widget("RELATED_QUERIES", &format!("token-{keyword}-{i}"), keyword)
            })
            .collect();
        format!(")]}}'\n{}", json!({ "widgets": widgets }))
    }

    async fn related(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
        let token = params.get("token").cloned().unwrap_or_default();
        if token.starts_with("token-broken") {
            return (StatusCode::INTERNAL_SERVER_ERROR, "widget backend down".to_string());
        }
        let body = if token.starts_with("token-rust") {
            json!({"default": {"rankedList": [
                {"rankedKeyword": [
                    {"query": "rust lang", "value": 100, "formattedValue": "100"},
                    {"query": "rust game", "value": 55, "formattedValue": "55"}
                ]},
                {"rankedKeyword": [
                    {"query": "rust 2024 edition", "value": 4750, "formattedValue": "Breakout"}
                ]}
            ]}})
        } else {
            json!({"default": {"rankedList": [{"rankedKeyword": []}, {"rankedKeyword": []}]}})
        };
        (StatusCode::OK, format!(")]}}',\n{body}"))
    }

    pub fn provider() -> Router {
        Router::new()
            .route("/", get(|| async { "ok" }))
            .route("/trends/api/explore", get(explore))
            .route("/trends/api/widgetdata/relatedsearches", get(related))
    }

    pub fn rate_limited_provider() -> Router {
        Router::new().route(
            "/trends/api/explore",
            get(|| async { (StatusCode::TOO_MANY_REQUESTS, "slow down") }),
        )
    }

    pub async fn spawn(router: Router) -> Result<String> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        Ok(format!("http://{addr}"))
    }

    pub fn client_for(base_url: String) -> Result<GoogleTrendsClient> {
        let config = Config {
            upstream_url: base_url,
            upstream_timeout: Duration::from_secs(5),
            ..Config::default()
        };
        Ok(GoogleTrendsClient::new(&config)?)
    }

    pub fn request(keywords: &[&str]) -> TrendRequest {
        TrendRequest {
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
            timeframe: Timeframe::LastWeek,
            language: "en".to_string(),
            country: "US".to_string(),
        }
    }
}

use test_helpers::*;

#[tokio::test]
async fn test_client_collects_tables_per_keyword() -> Result<()> {
    let client = client_for(spawn(provider()).await?)?;
    let raw = client.related_queries(&request(&["rust"])).await?;

    // "rust" plus the filler term
    assert_eq!(raw.len(), 2);
    let rust = raw["rust"].as_ref().expect("rust has data");
    assert_eq!(rust.top.as_ref().unwrap()[1]["query"], "rust game");
    assert_eq!(rust.rising.as_ref().unwrap()[0]["value"], 4750);
    assert!(raw["news"].is_none());
    Ok(())
}

#[tokio::test]
async fn test_failed_widget_keeps_other_keywords() -> Result<()> {
    let client = client_for(spawn(provider()).await?)?;
    let raw = client.related_queries(&request(&["rust", "broken"])).await?;

    assert!(raw["broken"].is_none());
    let rust = raw["rust"].as_ref().expect("rust has data");
    assert_eq!(rust.top.as_ref().unwrap()[0]["query"], "rust lang");
    Ok(())
}

#[tokio::test]
async fn test_outcome_is_empty_when_no_keyword_has_data() -> Result<()> {
    let client = client_for(spawn(provider()).await?)?;
    let outcome = fetch_outcome(&client, &request(&["zig", "go"]), Duration::from_secs(5)).await;
    assert!(matches!(outcome, UpstreamOutcome::Empty));
    Ok(())
}

#[tokio::test]
async fn test_non_success_status_is_a_failure() -> Result<()> {
    let client = client_for(spawn(rate_limited_provider()).await?)?;
    let outcome = fetch_outcome(&client, &request(&["rust"]), Duration::from_secs(5)).await;
    match outcome {
        UpstreamOutcome::Failure(UpstreamError::Status { status, .. }) => {
            assert_eq!(status.as_u16(), 429);
        }
        other => panic!("expected status failure, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_unreachable_provider_is_a_failure() -> Result<()> {
    // Bind then drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);

    let client = client_for(format!("http://{addr}"))?;
    let outcome = fetch_outcome(&client, &request(&["rust"]), Duration::from_secs(5)).await;
    assert!(matches!(outcome, UpstreamOutcome::Failure(UpstreamError::Http(_))));
    Ok(())
}
