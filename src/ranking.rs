//! Pluggable selection of the listings handed to the narrative stage.

use crate::models::{PropertyCollection, PropertyRecord, SearchCriteria};
use std::cmp::Ordering;
use tracing::debug;

/// Most listings a deterministic selection keeps
pub const MAX_SELECTED: usize = 6;

/// Listings split into what should be analysed and what is over budget
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub selected: PropertyCollection,
    pub over_budget: PropertyCollection,
}

/// Decides which extracted listings go into the property narrative
pub trait RankingStrategy: Send + Sync {
    fn select(&self, properties: PropertyCollection, criteria: &SearchCriteria) -> Selection;

    fn name(&self) -> &'static str;
}

/// Hands every listing to the narrative model, which picks the 5-6 closest
/// to budget itself
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelRanking;

impl RankingStrategy for ModelRanking {
    fn select(&self, properties: PropertyCollection, _criteria: &SearchCriteria) -> Selection {
        Selection {
            selected: properties,
            over_budget: Vec::new(),
        }
    }

    fn name(&self) -> &'static str {
        "model"
    }
}

/// Keeps the in-budget listings closest to the price ceiling.
///
/// Listings whose price cannot be read are kept after the priced ones.
#[derive(Debug, Clone, Copy)]
pub struct PriceProximityRanking {
    pub limit: usize,
}

impl Default for PriceProximityRanking {
    fn default() -> Self {
        Self {
            limit: MAX_SELECTED,
        }
    }
}

impl RankingStrategy for PriceProximityRanking {
    fn select(&self, properties: PropertyCollection, criteria: &SearchCriteria) -> Selection {
        let ceiling = criteria.max_price;
        let mut priced: Vec<(f64, PropertyRecord)> = Vec::new();
        let mut unpriced = Vec::new();
        let mut over_budget = Vec::new();

        for property in properties {
            match parse_price_millions(&property.price) {
                Some(price) if price > ceiling => over_budget.push(property),
                Some(price) => priced.push(((ceiling - price).abs(), property)),
                None => unpriced.push(property),
            }
        }

        // stable sort keeps extraction order for equal distances
        priced.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

        let selected: PropertyCollection = priced
            .into_iter()
            .map(|(_, property)| property)
            .chain(unpriced)
            .take(self.limit)
            .collect();

        debug!(
            selected = selected.len(),
            over_budget = over_budget.len(),
            ceiling,
            "Ranked listings by price proximity"
        );

        Selection {
            selected,
            over_budget,
        }
    }

    fn name(&self) -> &'static str {
        "price"
    }
}

/// Read a listing price as millions.
///
/// Handles `"AED 3,200,000"`, `"3.2M"`, `"4.8 million"`, `"750K"` and
/// `"2bn"`. Numbers followed by a unit (`"2 Bedrooms"`, `"1,100 sqft"`) are
/// skipped, and a number tagged with a currency wins over an untagged one.
/// A currency-tagged bare number is a full amount; an untagged one is a full
/// amount from 10,000 up and already in millions below that.
pub fn parse_price_millions(raw: &str) -> Option<f64> {
    let text = raw.to_lowercase().replace(',', "");

    let mut tagged = None;
    let mut first = None;
    let mut cursor = 0;
    while let Some(offset) = text[cursor..].find(|c: char| c.is_ascii_digit()) {
        let start = cursor + offset;
        let len = text[start..]
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(text.len() - start);
        cursor = start + len;

        let Ok(number) = text[start..cursor].trim_end_matches('.').parse::<f64>() else {
            continue;
        };
        let suffix = text[cursor..].trim_start();
        if NON_PRICE_UNITS.iter().any(|unit| suffix.starts_with(unit)) {
            continue;
        }

        let prefix = text[..start].trim_end();
        let leading = CURRENCY_MARKERS.iter().any(|m| prefix.ends_with(m));
        let trailing = CURRENCY_MARKERS.iter().any(|m| suffix.starts_with(m));
        let millions = scale_to_millions(number, suffix, leading || trailing);

        // "AED 2,750,000" beats "2,750,000 AED" beats an untagged number
        if leading {
            return Some(millions);
        }
        if trailing {
            tagged.get_or_insert(millions);
        }
        first.get_or_insert(millions);
    }

    tagged.or(first)
}

const CURRENCY_MARKERS: [&str; 7] = ["aed", "dhs", "dh", "usd", "$", "€", "£"];

const NON_PRICE_UNITS: [&str; 13] = [
    "bed", "br", "bath", "bhk", "room", "sq", "ft", "m²", "m2", "floor", "%", "min", "month",
];

fn scale_to_millions(number: f64, suffix: &str, tagged: bool) -> f64 {
    if suffix.starts_with("bn") || suffix.starts_with("billion") {
        number * 1_000.0
    } else if suffix.starts_with('m') {
        number
    } else if suffix.starts_with('k') || suffix.starts_with("thousand") {
        number / 1_000.0
    } else if tagged || number >= 10_000.0 {
        number / 1_000_000.0
    } else {
        number
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PropertyCategory;

    fn listing(name: &str, price: &str) -> PropertyRecord {
        PropertyRecord {
            building_name: name.to_string(),
            property_type: "Apartment".to_string(),
            location_address: "Dubai Marina".to_string(),
            price: price.to_string(),
            size: String::new(),
            description: String::new(),
            property_link: String::new(),
        }
    }

    fn criteria(max_price: f64) -> SearchCriteria {
        SearchCriteria::new("Dubai Marina", max_price, PropertyCategory::Residential, "Apartments")
    }

    #[test]
    fn test_parse_price_formats() {
        assert_eq!(parse_price_millions("AED 3,200,000"), Some(3.2));
        assert_eq!(parse_price_millions("3.2M"), Some(3.2));
        assert_eq!(parse_price_millions("4.8 Million AED"), Some(4.8));
        assert_eq!(parse_price_millions("750K"), Some(0.75));
        assert_eq!(parse_price_millions("2bn"), Some(2000.0));
        assert_eq!(parse_price_millions("5"), Some(5.0));
        assert_eq!(parse_price_millions("AED 3.2M"), Some(3.2));
        assert_eq!(parse_price_millions("Price on request"), None);
        assert_eq!(parse_price_millions(""), None);
    }

    #[test]
    fn test_parse_price_skips_leading_unit_counts() {
        assert_eq!(parse_price_millions("2 Bedrooms, AED 3,200,000"), Some(3.2));
        assert_eq!(parse_price_millions("3 BR | 1,450 sqft | 2.9M"), Some(2.9));
        assert_eq!(parse_price_millions("120 m² apartment, 1.5 million"), Some(1.5));
        assert_eq!(parse_price_millions("4 bed"), None);
    }

    #[test]
    fn test_parse_price_currency_tagged_amounts_are_full_amounts() {
        assert_eq!(parse_price_millions("AED 9,500"), Some(0.0095));
        assert_eq!(parse_price_millions("9,500 AED"), Some(0.0095));
        assert_eq!(parse_price_millions("Unit 12, Dhs 2,750,000"), Some(2.75));
    }

    #[test]
    fn test_model_ranking_passes_everything() {
        let listings = vec![listing("a", "9M"), listing("b", "1M")];
        let selection = ModelRanking.select(listings.clone(), &criteria(5.0));

        assert_eq!(selection.selected, listings);
        assert!(selection.over_budget.is_empty());
    }

    #[test]
    fn test_price_proximity_splits_over_budget() {
        let listings = vec![
            listing("a", "3.2M"),
            listing("b", "4.8M"),
            listing("c", "5.0M"),
            listing("d", "6.1M"),
        ];

        let selection = PriceProximityRanking::default().select(listings, &criteria(5.0));
        let names: Vec<&str> = selection
            .selected
            .iter()
            .map(|p| p.building_name.as_str())
            .collect();

        assert_eq!(names, vec!["c", "b", "a"]);
        assert_eq!(selection.over_budget.len(), 1);
        assert_eq!(selection.over_budget[0].building_name, "d");
    }

    #[test]
    fn test_price_proximity_limit_and_unpriced() {
        let mut listings: Vec<PropertyRecord> = (1..=8)
            .map(|i| listing(&format!("p{}", i), &format!("{}.0M", i)))
            .collect();
        listings.insert(0, listing("ask", "Price on request"));

        let selection = PriceProximityRanking::default().select(listings, &criteria(10.0));

        assert_eq!(selection.selected.len(), MAX_SELECTED);
        assert_eq!(selection.selected[0].building_name, "p8");
        assert!(selection.selected.iter().all(|p| p.building_name != "ask"));

        let selection = PriceProximityRanking { limit: 10 }.select(
            vec![listing("ask", "on request"), listing("x", "2M")],
            &criteria(10.0),
        );
        assert_eq!(selection.selected[1].building_name, "ask");
    }
}
