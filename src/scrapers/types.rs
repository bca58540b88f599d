use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Everything the extraction service needs for one call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionQuery {
    /// Listing pages to extract from
    pub urls: Vec<String>,
    /// Natural-language extraction instructions
    pub prompt: String,
    /// JSON schema the extracted payload must follow
    pub schema: serde_json::Value,
}

/// Listing sites we know how to build search URLs for.
///
/// All sources take path segments already normalized by the query builder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ListingSource {
    PropertyFinder,
    Bayut,
    FamProperties,
}

impl ListingSource {
    pub fn base_url(&self) -> &'static str {
        match self {
            ListingSource::PropertyFinder => "https://www.propertyfinder.ae",
            ListingSource::Bayut => "https://www.bayut.com",
            ListingSource::FamProperties => "https://famproperties.com",
        }
    }

    /// Search results page for `property_type` in `city`
    pub fn listing_url(&self, region: &str, city: &str, property_type: &str) -> String {
        match self {
            ListingSource::PropertyFinder => format!(
                "{}/en/buy/{}/{}-for-sale-{}.html",
                self.base_url(),
                region,
                property_type,
                city
            ),
            ListingSource::Bayut => format!(
                "{}/for-sale/{}/{}/{}/",
                self.base_url(),
                property_type,
                region,
                city
            ),
            ListingSource::FamProperties => format!(
                "{}/{}-for-sale-in-{}-{}",
                self.base_url(),
                property_type,
                city,
                region
            ),
        }
    }

    /// Area insights page, if the site publishes one
    pub fn trend_url(&self, region: &str, city: &str) -> Option<String> {
        match self {
            ListingSource::PropertyFinder => Some(format!(
                "{}/en/area-insights/{}/{}",
                self.base_url(),
                region,
                city
            )),
            ListingSource::Bayut | ListingSource::FamProperties => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ListingSource::PropertyFinder => "PropertyFinder",
            ListingSource::Bayut => "Bayut",
            ListingSource::FamProperties => "FamProperties",
        }
    }
}

impl FromStr for ListingSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "propertyfinder" => Ok(ListingSource::PropertyFinder),
            "bayut" => Ok(ListingSource::Bayut),
            "famproperties" | "fam" => Ok(ListingSource::FamProperties),
            other => Err(format!("unknown listing source: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_urls_per_source() {
        assert_eq!(
            ListingSource::PropertyFinder.listing_url("dubai", "business-bay", "apartments"),
            "https://www.propertyfinder.ae/en/buy/dubai/apartments-for-sale-business-bay.html"
        );
        assert_eq!(
            ListingSource::Bayut.listing_url("dubai", "business-bay", "apartments"),
            "https://www.bayut.com/for-sale/apartments/dubai/business-bay/"
        );
        assert_eq!(
            ListingSource::FamProperties.listing_url("dubai", "business-bay", "apartments"),
            "https://famproperties.com/apartments-for-sale-in-business-bay-dubai"
        );
    }

    #[test]
    fn test_only_propertyfinder_has_area_insights() {
        assert!(ListingSource::PropertyFinder
            .trend_url("dubai", "jvc")
            .is_some());
        assert!(ListingSource::Bayut.trend_url("dubai", "jvc").is_none());
    }

    #[test]
    fn test_source_names_parse_back() {
        for source in [
            ListingSource::PropertyFinder,
            ListingSource::Bayut,
            ListingSource::FamProperties,
        ] {
            assert_eq!(source.name().parse::<ListingSource>(), Ok(source));
        }
        assert!("dubizzle".parse::<ListingSource>().is_err());
    }
}
