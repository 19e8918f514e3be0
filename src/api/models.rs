use crate::data_models::{
    DEFAULT_COUNTRY, DEFAULT_KEYWORDS, DEFAULT_LANGUAGE, Timeframe, TrendRequest, parse_keywords,
};

use super::error::ApiError;

#[derive(Debug, Default)]
pub struct TrendsQuery {
    pub keywords: Option<String>,
    pub timeframe: Option<String>,
    pub language: Option<String>,
    pub country: Option<String>,
}

impl TrendsQuery {
    /// The first occurrence of a repeated parameter wins; unknown keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = TrendsQuery::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "keywords" => &mut query.keywords,
                "timeframe" => &mut query.timeframe,
                "language" => &mut query.language,
                "country" => &mut query.country,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }

    pub fn into_request(self) -> Result<TrendRequest, ApiError> {
        let keywords = parse_keywords(self.keywords.as_deref().unwrap_or(DEFAULT_KEYWORDS));
        if keywords.is_empty() {
            return Err(ApiError::BadRequest(
                "At least one non-empty keyword is required".to_string(),
            ));
        }

        let timeframe = match self.timeframe.as_deref() {
            None => Timeframe::default(),
            Some(raw) => raw.parse::<Timeframe>().map_err(|e| {
                ApiError::BadRequest(format!(
                    "Invalid timeframe '{}'. Valid options: {}",
                    e.0,
                    Timeframe::valid_options()
                ))
            })?,
        };

        Ok(TrendRequest {
            keywords,
            timeframe,
            language: locale_part(self.language, DEFAULT_LANGUAGE).to_lowercase(),
            country: locale_part(self.country, DEFAULT_COUNTRY).to_uppercase(),
        })
    }
}

fn locale_part(value: Option<String>, default: &str) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}
