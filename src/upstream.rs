use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::config::Config;
use crate::data_models::TrendRequest;
use crate::error::UpstreamError;
use crate::normalizer::{RawKeywordTables, RawRelatedQueries};

const EXPLORE_PATH: &str = "/trends/api/explore";
const RELATED_PATH: &str = "/trends/api/widgetdata/relatedsearches";
const RELATED_WIDGET_PREFIX: &str = "RELATED_QUERIES";
const USER_AGENT: &str = concat!("trendproxy/", env!("CARGO_PKG_VERSION"));

#[async_trait]
pub trait TrendSource: Send + Sync {
    async fn related_queries(
        &self,
        request: &TrendRequest,
    ) -> Result<RawRelatedQueries, UpstreamError>;
}

#[derive(Debug)]
pub enum UpstreamOutcome {
    Success(RawRelatedQueries),
    /// The call worked but carried nothing for any keyword.
    Empty,
    Failure(UpstreamError),
}

pub async fn fetch_outcome(
    source: &dyn TrendSource,
    request: &TrendRequest,
    timeout: Duration,
) -> UpstreamOutcome {
    match tokio::time::timeout(timeout, source.related_queries(request)).await {
        Err(_) => UpstreamOutcome::Failure(UpstreamError::Timeout(timeout)),
        Ok(Err(e)) => UpstreamOutcome::Failure(e),
        Ok(Ok(raw)) if raw.values().all(Option::is_none) => UpstreamOutcome::Empty,
        Ok(Ok(raw)) => UpstreamOutcome::Success(raw),
    }
}

/// Stand-in used when the real client could not be built. Every call fails,
/// so every request is served from the synthetic generator.
pub struct UnavailableSource {
    reason: String,
}

impl UnavailableSource {
    pub fn new(reason: impl Into<String>) -> Self {
        UnavailableSource {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl TrendSource for UnavailableSource {
    async fn related_queries(&self, _: &TrendRequest) -> Result<RawRelatedQueries, UpstreamError> {
        Err(UpstreamError::Unavailable(self.reason.clone()))
    }
}

#[derive(Debug, Deserialize)]
struct ExploreResponse {
    #[serde(default)]
    widgets: Vec<Widget>,
}

#[derive(Debug, Deserialize)]
struct Widget {
    #[serde(default)]
    id: String,
    #[serde(default)]
    token: String,
    #[serde(default)]
    request: Value,
}

/// Client for the Google Trends web endpoints.
///
/// The provider wants a session cookie, then an `explore` call that hands out one
/// token per widget, then one `relatedsearches` call per keyword widget.
pub struct GoogleTrendsClient {
    http: reqwest::Client,
    base_url: String,
    tz_offset: i32,
}

impl GoogleTrendsClient {
    pub fn new(config: &Config) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .user_agent(USER_AGENT)
            .timeout(config.upstream_timeout)
            .build()?;
        Ok(GoogleTrendsClient {
            http,
            base_url: config.upstream_url.trim_end_matches('/').to_string(),
            tz_offset: config.tz_offset,
        })
    }

    async fn prime_cookies(&self, country: &str) {
        let res = self
            .http
            .get(format!("{}/", self.base_url))
            .query(&[("geo", country)])
            .send()
            .await;
        if let Err(e) = res {
            tracing::debug!("cookie priming failed, continuing without: {}", e);
        }
    }

    async fn get_text(
        &self,
        endpoint: &'static str,
        params: &[(&str, String)],
    ) -> Result<String, UpstreamError> {
        let res = self
            .http
            .get(format!("{}{}", self.base_url, endpoint))
            .query(params)
            .send()
            .await?;
        let status = res.status();
        if !status.is_success() {
            return Err(UpstreamError::Status { endpoint, status });
        }
        Ok(res.text().await?)
    }

    async fn explore(&self, request: &TrendRequest) -> Result<Vec<Widget>, UpstreamError> {
        let comparison: Vec<Value> = request
            .upstream_keywords()
            .iter()
            .map(|kw| json!({"keyword": kw, "time": request.timeframe.as_str(), "geo": request.country}))
            .collect();
        let req = json!({"comparisonItem": comparison, "category": 0, "property": ""});

        let body = self
            .get_text(
                EXPLORE_PATH,
                &[
                    ("hl", request.locale()),
                    ("tz", self.tz_offset.to_string()),
                    ("req", req.to_string()),
                ],
            )
            .await?;
        parse_explore(&body)
    }

    async fn related_for_widget(
        &self,
        widget: &Widget,
        locale: &str,
    ) -> Result<RawKeywordTables, UpstreamError> {
        let body = self
            .get_text(
                RELATED_PATH,
                &[
                    ("hl", locale.to_string()),
                    ("tz", self.tz_offset.to_string()),
                    ("req", widget.request.to_string()),
                    ("token", widget.token.clone()),
                ],
            )
            .await?;
        parse_related(&body)
    }
}

#[async_trait]
impl TrendSource for GoogleTrendsClient {
    async fn related_queries(
        &self,
        request: &TrendRequest,
    ) -> Result<RawRelatedQueries, UpstreamError> {
        self.prime_cookies(&request.country).await;

        let widgets = self.explore(request).await?;
        let locale = request.locale();
        let mut out = RawRelatedQueries::new();

        for widget in &widgets {
            let Some(keyword) = widget_keyword(&widget.request) else {
                tracing::warn!(widget = %widget.id, "related-query widget without keyword");
                continue;
            };
            let tables = match self.related_for_widget(widget, &locale).await {
                Ok(tables) if tables.top.is_some() || tables.rising.is_some() => Some(tables),
                Ok(_) => None,
                Err(e) => {
                    tracing::warn!(%keyword, error = %e, "related queries failed for keyword");
                    None
                }
            };
            out.insert(keyword, tables);
        }

        Ok(out)
    }
}

fn json_body(text: &str) -> Result<Value, UpstreamError> {
    let start = text.find('{').ok_or(UpstreamError::MissingBody)?;
    Ok(serde_json::from_str(&text[start..])?)
}

fn parse_explore(text: &str) -> Result<Vec<Widget>, UpstreamError> {
    let explore: ExploreResponse = serde_json::from_value(json_body(text)?)?;
    let widgets: Vec<Widget> = explore
        .widgets
        .into_iter()
        .filter(|w| w.id.starts_with(RELATED_WIDGET_PREFIX))
        .collect();
    if widgets.is_empty() {
        return Err(UpstreamError::MissingWidgets);
    }
    Ok(widgets)
}

fn parse_related(text: &str) -> Result<RawKeywordTables, UpstreamError> {
    let body = json_body(text)?;
    Ok(RawKeywordTables {
        top: ranked_table(&body, 0),
        rising: ranked_table(&body, 1),
    })
}

/// An empty ranked list is reported as missing, matching how the provider
/// signals "no data" for a keyword.
fn ranked_table(body: &Value, index: usize) -> Option<Value> {
    let table = body.pointer(&format!("/default/rankedList/{index}/rankedKeyword"))?;
    match table {
        Value::Array(rows) if rows.is_empty() => None,
        Value::Null => None,
        other => Some(other.clone()),
    }
}

fn widget_keyword(request: &Value) -> Option<String> {
    request
        .pointer("/restriction/complexKeywordsRestriction/keyword/0/value")
        .and_then(Value::as_str)
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPLORE_BODY: &str = r#")]}'
{"widgets":[
  {"id":"TIMESERIES","token":"t0","request":{}},
  {"id":"RELATED_QUERIES","token":"t1","request":{"restriction":{"complexKeywordsRestriction":{"keyword":[{"type":"BROAD","value":"AI"}]}}}},
  {"id":"RELATED_QUERIES_1","token":"t2","request":{"restriction":{"complexKeywordsRestriction":{"keyword":[{"type":"BROAD","value":"ChatGPT"}]}}}}
]}"#;

    const RELATED_BODY: &str = r#")]}',
{"default":{"rankedList":[
  {"rankedKeyword":[{"query":"ai tools","value":100,"formattedValue":"100","hasData":true}]},
  {"rankedKeyword":[]}
]}}"#;

    #[test]
    fn test_parse_explore_keeps_related_widgets_only() {
        let widgets = parse_explore(EXPLORE_BODY).unwrap();
        let tokens: Vec<&str> = widgets.iter().map(|w| w.token.as_str()).collect();
        assert_eq!(tokens, vec!["t1", "t2"]);
        assert_eq!(widget_keyword(&widgets[1].request).as_deref(), Some("ChatGPT"));
    }

    #[test]
    fn test_parse_explore_without_related_widgets_fails() {
        let err = parse_explore(r#")]}'{"widgets":[{"id":"GEO_MAP"}]}"#).unwrap_err();
        assert!(matches!(err, UpstreamError::MissingWidgets));
    }

    #[test]
    fn test_parse_garbage_is_an_error() {
        assert!(matches!(
            parse_explore("<html>rate limited</html>"),
            Err(UpstreamError::MissingBody)
        ));
        assert!(matches!(parse_related(")]}' {oops"), Err(UpstreamError::Decode(_))));
    }

    #[test]
    fn test_parse_related_reports_empty_table_as_missing() {
        let tables = parse_related(RELATED_BODY).unwrap();
        assert_eq!(tables.top.unwrap()[0]["query"], "ai tools");
        assert!(tables.rising.is_none());
    }

    #[test]
    fn test_widget_keyword_missing_path() {
        assert_eq!(widget_keyword(&json!({"restriction": {}})), None);
    }
}
