//! Display helpers shared by the pinned cards and the detail view.

use std::fmt::{self, Display, Formatter};
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::place::Attraction;
use crate::types::Category;

static AND: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\band\b").unwrap());
static WORD_START: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w").unwrap());

/// A curated destination, e.g. an entry of a "top ten" list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    #[serde(default)]
    pub rank: Option<u32>,
    pub city: String,
    #[serde(default)]
    pub country: String,
}

/// The average rating of one category, shown on a pinned card.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CategorySummary {
    pub category: Category,
    pub average_rating: f64,
}

/// Formats a category key in title case, with `&` for the word `and`.
///
/// `FOOD_AND_DRINK` becomes `Food & Drink`. Already formatted text is returned unchanged.
pub fn format_category(text: &str) -> String {
    let lower = text.to_lowercase().replace('_', " ");
    let lower = AND.replace_all(&lower, "&");
    WORD_START
        .replace_all(&lower, |caps: &Captures<'_>| caps[0].to_uppercase())
        .into_owned()
}

/// Averages the ratings of `attractions`, rounded to one decimal place.
///
/// Attractions without a rating are left out rather than counted as zero.
/// Returns `0.0` when nothing is rated.
pub fn average_rating(attractions: &[Attraction]) -> f64 {
    let (total, count) = attractions
        .iter()
        .filter_map(|a| a.rating)
        .fold((0.0, 0u32), |(total, count), r| (total + r, count + 1));

    if count == 0 {
        return 0.0;
    }

    (total / f64::from(count) * 10.0).round() / 10.0
}

/// Formats a destination as `City, Country`, or just `City` without a country.
pub fn format_destination(destination: &Destination) -> String {
    if destination.country.is_empty() {
        destination.city.clone()
    } else {
        format!("{}, {}", destination.city, destination.country)
    }
}

/// Whether a destination matches one of the highlight labels of the pinned results.
pub fn is_highlighted<S: AsRef<str>>(destination: &Destination, highlights: &[S]) -> bool {
    let formatted = format_destination(destination);
    highlights
        .iter()
        .any(|label| formatted.contains(label.as_ref()))
}

impl Display for CategorySummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.category.label(), self.average_rating)
    }
}
