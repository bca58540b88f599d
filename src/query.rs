//! Turns search criteria into extraction queries.

use crate::models::{LocationsResponse, PropertiesResponse, SearchCriteria};
use crate::schema::ExtractionSchema;
use crate::scrapers::{ExtractionQuery, ListingSource};
use tracing::debug;

/// Builds extraction queries for the configured listing sources
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    sources: Vec<ListingSource>,
    region: String,
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new(vec![ListingSource::PropertyFinder], "dubai")
    }
}

impl QueryBuilder {
    pub fn new(sources: Vec<ListingSource>, region: impl Into<String>) -> Self {
        Self {
            sources,
            region: slugify(&region.into()),
        }
    }

    /// One listing URL per source, plus the property extraction prompt and schema
    pub fn build_property_query(&self, criteria: &SearchCriteria) -> ExtractionQuery {
        let city = slugify(&criteria.city);
        let property_type = slugify(&criteria.property_type);

        let urls: Vec<String> = self
            .sources
            .iter()
            .map(|source| {
                let url = source.listing_url(&self.region, &city, &property_type);
                debug!(source = source.name(), %url, "Built listing URL");
                url
            })
            .collect();

        ExtractionQuery {
            urls,
            prompt: property_prompt(criteria),
            schema: PropertiesResponse::extraction_schema(),
        }
    }

    /// Area-insights URL from the first source that has one
    pub fn build_trend_query(&self, city: &str) -> ExtractionQuery {
        let slug = slugify(city);
        let urls: Vec<String> = self
            .sources
            .iter()
            .find_map(|source| source.trend_url(&self.region, &slug))
            .into_iter()
            .collect();

        debug!(?urls, "Built trend query");

        ExtractionQuery {
            urls,
            prompt: TREND_PROMPT.to_string(),
            schema: LocationsResponse::extraction_schema(),
        }
    }
}

/// Lowercase, trim, and join whitespace-separated words with single hyphens
pub fn slugify(input: &str) -> String {
    input
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

fn property_prompt(criteria: &SearchCriteria) -> String {
    let category = criteria.property_category;
    let property_type = criteria.property_type.trim();
    let city = criteria.city.trim();
    let max_price = criteria.max_price;

    format!(
        "Extract ONLY 10 OR LESS different {category} {property_type} along with property link from {city} that cost less than {max_price} millions.

Requirements:
- Property Category: {category} properties only
- Property Type: {property_type} only
- Location: {city}
- Maximum Price: {max_price} Millions
- Include complete property details with exact location
- IMPORTANT: Return data for at least 3 different properties. MAXIMUM 10. must mix the property list from all urls.
- Format as a list of properties with their respective details
"
    )
}

const TREND_PROMPT: &str = "Extract price trends data for ALL major localities in the city.
IMPORTANT:
- Return data for at least 5-10 different localities
- Include both premium and affordable areas
- Do not skip any locality mentioned in the source
- Format as a list of locations with their respective data
";
