use regex::{Regex, RegexBuilder};
use thiserror::Error;
use time::OffsetDateTime;
use tracing::debug;

use super::repo_types::Toy;

#[derive(Debug, Error)]
pub enum ToyError {
    #[error("No such toy")]
    NotFound,
    #[error("Not your toy")]
    NotOwner,
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Listing filter. `labels` and `in_stock` are accepted but not applied.
#[derive(Debug, Clone, Default)]
pub struct ToyFilter {
    pub txt: Option<String>,
    pub max_price: Option<f64>,
    pub labels: Vec<String>,
    pub in_stock: Option<bool>,
}

impl ToyFilter {
    /// Keeps storage order.
    pub fn apply(&self, toys: &[Toy]) -> Vec<Toy> {
        if !self.labels.is_empty() || self.in_stock.is_some() {
            debug!(labels = ?self.labels, in_stock = ?self.in_stock, "label/stock filters ignored");
        }
        let name_re = match self.txt.as_deref().filter(|t| !t.is_empty()) {
            Some(txt) => match name_pattern(txt) {
                Some(re) => Some(re),
                None => {
                    debug!(len = txt.len(), "name filter too large, matching nothing");
                    return Vec::new();
                }
            },
            None => None,
        };

        toys.iter()
            .filter(|t| name_re.as_ref().map_or(true, |re| re.is_match(&t.name)))
            .filter(|t| self.max_price.map_or(true, |max| t.price <= max))
            .cloned()
            .collect()
    }
}

const NAME_PATTERN_SIZE_LIMIT: usize = 1 << 16;

/// Case-insensitive regex; an invalid pattern is matched literally instead.
/// `None` when even the literal does not fit the size limit.
fn name_pattern(txt: &str) -> Option<Regex> {
    let build = |pattern: &str| {
        RegexBuilder::new(pattern)
            .case_insensitive(true)
            .size_limit(NAME_PATTERN_SIZE_LIMIT)
            .build()
    };
    build(txt).or_else(|_| build(&regex::escape(txt))).ok()
}

pub fn now_millis() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy(id: &str, name: &str, price: f64) -> Toy {
        Toy {
            id: id.into(),
            name: name.into(),
            price,
            in_stock: true,
            labels: vec![],
            created_at: None,
            owner: None,
        }
    }

    fn catalog() -> Vec<Toy> {
        vec![
            toy("a1", "Talking Doll", 120.0),
            toy("a2", "Teddy Bear", 10.0),
            toy("a3", "Bear Puzzle", 45.5),
            toy("a4", "Racing Car", 45.5),
        ]
    }

    fn ids(toys: &[Toy]) -> Vec<&str> {
        toys.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn empty_filter_returns_everything_in_order() {
        let out = ToyFilter::default().apply(&catalog());
        assert_eq!(ids(&out), vec!["a1", "a2", "a3", "a4"]);
    }

    #[test]
    fn text_is_case_insensitive() {
        let filter = ToyFilter {
            txt: Some("bEAr".into()),
            ..Default::default()
        };
        assert_eq!(ids(&filter.apply(&catalog())), vec!["a2", "a3"]);
    }

    #[test]
    fn text_is_a_regex() {
        let filter = ToyFilter {
            txt: Some("^(teddy|racing)".into()),
            ..Default::default()
        };
        assert_eq!(ids(&filter.apply(&catalog())), vec!["a2", "a4"]);
    }

    #[test]
    fn invalid_regex_falls_back_to_substring() {
        let mut toys = catalog();
        toys.push(toy("a5", "Robot (v2", 5.0));
        let filter = ToyFilter {
            txt: Some("(v2".into()),
            ..Default::default()
        };
        assert_eq!(ids(&filter.apply(&toys)), vec!["a5"]);
    }

    #[test]
    fn oversized_text_matches_nothing() {
        let filter = ToyFilter {
            txt: Some("Bear".repeat(20_000)),
            ..Default::default()
        };
        assert!(filter.apply(&catalog()).is_empty());
    }

    #[test]
    fn max_price_is_inclusive() {
        let filter = ToyFilter {
            max_price: Some(45.5),
            ..Default::default()
        };
        let out = filter.apply(&catalog());
        assert_eq!(ids(&out), vec!["a2", "a3", "a4"]);
        assert!(out.iter().all(|t| t.price <= 45.5));
    }

    #[test]
    fn text_and_price_combine() {
        let filter = ToyFilter {
            txt: Some("bear".into()),
            max_price: Some(20.0),
            ..Default::default()
        };
        assert_eq!(ids(&filter.apply(&catalog())), vec!["a2"]);
    }

    #[test]
    fn labels_and_stock_do_not_filter() {
        let filter = ToyFilter {
            labels: vec!["Outdoor".into()],
            in_stock: Some(false),
            ..Default::default()
        };
        assert_eq!(filter.apply(&catalog()).len(), 4);
    }
}
