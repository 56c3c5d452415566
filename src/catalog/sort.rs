//! Admin sort keys and listing order.
//!
//! Sort keys arrive as strings from the settings form (`date_desc`,
//! `price_asc`, `random`, ...). Malformed keys fall back to newest-first
//! rather than erroring, so a stale saved setting can never break the page.

use std::cmp::Ordering;

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::catalog::types::RawProduct;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Asc,
    Desc,
}

/// Listing order for category products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    /// Manual position within the category.
    Position(Direction),

    /// Unit price.
    Price(Direction),

    /// Date the product was added.
    Date(Direction),

    /// Shuffled on every listing.
    Random,
}

impl SortOrder {
    /// Parse an admin sort key, falling back to `date_desc` for unknown
    /// fields and `desc` for unknown directions.
    pub fn parse(key: &str) -> Self {
        if key == "random" {
            return SortOrder::Random;
        }

        let mut parts = key.splitn(2, '_');
        let field = parts.next().unwrap_or("date");
        let direction = match parts.next() {
            Some("asc") => Direction::Asc,
            _ => Direction::Desc,
        };

        match field {
            "position" => SortOrder::Position(direction),
            "price" => SortOrder::Price(direction),
            "date" => SortOrder::Date(direction),
            _ => SortOrder::Date(Direction::Desc),
        }
    }

    /// The canonical key string, round-tripping [`SortOrder::parse`].
    /// Used verbatim in fetch cache keys.
    pub fn key(&self) -> String {
        let (field, direction) = match self {
            SortOrder::Position(d) => ("position", d),
            SortOrder::Price(d) => ("price", d),
            SortOrder::Date(d) => ("date", d),
            SortOrder::Random => return "random".to_string(),
        };
        let dir = match direction {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        };
        format!("{field}_{dir}")
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Order a product listing in place.
///
/// Non-random sorts break ties by product ID so listings are stable across
/// calls; random shuffles fresh on every call.
pub fn apply(products: &mut [RawProduct], sort: SortOrder) {
    match sort {
        SortOrder::Random => {
            products.shuffle(&mut rand::thread_rng());
        }
        _ => {
            products.sort_by(|a, b| compare(a, b, sort));
        }
    }
}

fn compare(a: &RawProduct, b: &RawProduct, sort: SortOrder) -> Ordering {
    let (ord, direction) = match sort {
        SortOrder::Position(d) => (a.position.cmp(&b.position), d),
        SortOrder::Price(d) => (
            a.price.partial_cmp(&b.price).unwrap_or(Ordering::Equal),
            d,
        ),
        SortOrder::Date(d) => (a.date_add.cmp(&b.date_add), d),
        SortOrder::Random => (Ordering::Equal, Direction::Asc),
    };

    let ord = match direction {
        Direction::Asc => ord,
        Direction::Desc => ord.reverse(),
    };

    ord.then_with(|| a.id.cmp(&b.id))
}
