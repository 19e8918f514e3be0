//! Synthetic related-query data, used whenever genuine upstream data is unavailable.
//!
//! Output is shaped exactly like a normalized upstream result so callers cannot
//! tell the two apart.

use once_cell::sync::Lazy;

use crate::data_models::{RelatedQueryEntry, RelatedQueryResult, TrendsResponse};

pub const DEFAULT_CATEGORY: &str = "general";

pub const TOP_LEN: usize = 5;
pub const RISING_LEN: usize = 4;

const TOP_START_MIN: i64 = 90;
const TOP_START_MAX: i64 = 100;
const TOP_STEP_MIN: i64 = 5;
const TOP_STEP_MAX: i64 = 12;
const RISING_MIN: i64 = 110;
const RISING_MAX: i64 = 5000;

pub struct Category {
    pub name: &'static str,
    pub terms: &'static [&'static str],
}

/// Lookup order matters for substring matching: earlier categories win.
pub static CATEGORIES: Lazy<Vec<Category>> = Lazy::new(|| {
    vec![
        Category {
            name: "tech",
            terms: &[
                "news", "reviews", "release date", "price", "specs", "vs", "update",
                "launch", "deals", "features",
            ],
        },
        Category {
            name: "AI",
            terms: &[
                "tools", "chatbot", "image generator", "news", "jobs", "regulation",
                "model", "art", "stocks", "course",
            ],
        },
        Category {
            name: "sports",
            terms: &[
                "scores", "schedule", "highlights", "tickets", "standings", "live stream",
                "results", "players", "transfer news",
            ],
        },
        Category {
            name: "finance",
            terms: &[
                "stock price", "forecast", "news", "dividend", "earnings", "chart",
                "analysis", "market cap", "crypto",
            ],
        },
        Category {
            name: "health",
            terms: &[
                "symptoms", "treatment", "diet", "benefits", "side effects", "causes",
                "exercise", "vitamins", "doctor near me",
            ],
        },
        Category {
            name: "entertainment",
            terms: &[
                "trailer", "cast", "release date", "streaming", "box office", "review",
                "soundtrack", "season 2", "tickets",
            ],
        },
        Category {
            name: "travel",
            terms: &[
                "flights", "hotels", "things to do", "weather", "map", "visa",
                "best time to visit", "itinerary", "cheap deals",
            ],
        },
        Category {
            name: "food",
            terms: &[
                "recipe", "near me", "delivery", "calories", "restaurant", "menu",
                "ingredients", "healthy", "easy",
            ],
        },
    ]
});

pub static GENERAL: Category = Category {
    name: DEFAULT_CATEGORY,
    terms: &[
        "meaning", "news", "today", "near me", "how to", "best", "synonym",
        "definition", "examples",
    ],
};

/// Pick the category for a keyword: exact match, then substring either way, then default.
pub fn match_category(keyword: &str) -> &'static Category {
    let needle = keyword.trim().to_lowercase();
    if needle.is_empty() || needle == DEFAULT_CATEGORY {
        return &GENERAL;
    }

    if let Some(category) = CATEGORIES
        .iter()
        .find(|c| c.name.to_lowercase() == needle)
    {
        return category;
    }

    CATEGORIES
        .iter()
        .find(|c| {
            let name = c.name.to_lowercase();
            needle.contains(&name) || name.contains(&needle)
        })
        .unwrap_or(&GENERAL)
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SyntheticGenerator;

impl SyntheticGenerator {
    pub fn new() -> Self {
        SyntheticGenerator
    }

    /// One result per distinct keyword. Never touches the network.
    pub fn generate(&self, keywords: &[String], rng: &mut fastrand::Rng) -> TrendsResponse {
        keywords
            .iter()
            .map(|kw| (kw.clone(), self.generate_one(kw, rng)))
            .collect()
    }

    pub fn generate_one(&self, keyword: &str, rng: &mut fastrand::Rng) -> RelatedQueryResult {
        let category = match_category(keyword);
        let mut terms: Vec<&str> = category.terms.to_vec();
        rng.shuffle(&mut terms);

        let mut value = rng.i64(TOP_START_MIN..=TOP_START_MAX);
        let top = terms
            .iter()
            .take(TOP_LEN)
            .map(|term| {
                let entry = RelatedQueryEntry::new(format!("{keyword} {term}"), value);
                value = (value - rng.i64(TOP_STEP_MIN..=TOP_STEP_MAX)).max(1);
                entry
            })
            .collect();

        let rising_from = terms.len().saturating_sub(RISING_LEN);
        let rising = terms[rising_from..]
            .iter()
            .map(|term| {
                RelatedQueryEntry::new(
                    format!("{keyword} {term}"),
                    rng.i64(RISING_MIN..=RISING_MAX),
                )
            })
            .collect();

        RelatedQueryResult { top, rising }
    }
}
