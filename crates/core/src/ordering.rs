//! Ranking policies for recipe and rating listings.
//!
//! Unrecognized or absent names fall back to the default policy of each
//! listing instead of failing the request.

use serde::Serialize;

/// How recipe listings and searches are ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipeOrder {
    /// Creation timestamp, newest first.
    Recent,
    /// Creation timestamp, oldest first.
    Oldest,
    /// Live mean rating score, highest first. Unrated recipes rank as 0.
    /// Ties fall back to newest first.
    #[default]
    Rating,
}

impl RecipeOrder {
    /// Resolve a query-string value. Accepts `recent`/`newer`,
    /// `oldest`/`older` and `rating`; anything else is [`RecipeOrder::Rating`].
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("recent" | "newer") => Self::Recent,
            Some("oldest" | "older") => Self::Oldest,
            _ => Self::Rating,
        }
    }
}

/// How the ratings of a single recipe are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingOrder {
    /// Score descending.
    Highest,
    /// Score ascending.
    Lowest,
    /// Creation timestamp, newest first.
    #[default]
    Recent,
}

impl RatingOrder {
    /// Resolve a query-string value; anything unrecognized is
    /// [`RatingOrder::Recent`].
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("highest") => Self::Highest,
            Some("lowest") => Self::Lowest,
            _ => Self::Recent,
        }
    }
}
