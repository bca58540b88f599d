use crate::error::ScoutError;
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Broad class of property the user is looking for
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PropertyCategory {
    Residential,
    Commercial,
}

impl PropertyCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyCategory::Residential => "Residential",
            PropertyCategory::Commercial => "Commercial",
        }
    }
}

impl fmt::Display for PropertyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "residential" => Ok(PropertyCategory::Residential),
            "commercial" => Ok(PropertyCategory::Commercial),
            other => Err(format!("unknown property category: {}", other)),
        }
    }
}

pub const MIN_PRICE_MILLIONS: f64 = 0.1;
pub const MAX_PRICE_MILLIONS: f64 = 100.0;

/// What the user typed into the search form, fixed for one search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchCriteria {
    /// Area or city to search in (free text)
    pub city: String,
    /// Budget ceiling in millions
    pub max_price: f64,
    pub property_category: PropertyCategory,
    /// Listing type, e.g. "Apartments" or "Villas"
    pub property_type: String,
}

impl SearchCriteria {
    pub fn new(
        city: impl Into<String>,
        max_price: f64,
        property_category: PropertyCategory,
        property_type: impl Into<String>,
    ) -> Self {
        Self {
            city: city.into(),
            max_price,
            property_category,
            property_type: property_type.into(),
        }
    }

    /// Form-level checks, run before any network call
    pub fn validate(&self) -> Result<(), ScoutError> {
        if self.city.trim().is_empty() {
            return Err(ScoutError::InvalidCriteria(
                "please enter an area name".to_string(),
            ));
        }
        if !(MIN_PRICE_MILLIONS..=MAX_PRICE_MILLIONS).contains(&self.max_price) {
            return Err(ScoutError::InvalidCriteria(format!(
                "maximum price must be between {} and {} millions",
                MIN_PRICE_MILLIONS, MAX_PRICE_MILLIONS
            )));
        }
        Ok(())
    }
}

/// One listing as returned by the extraction service.
///
/// Every field is free text; prices and sizes keep whatever formatting the
/// listing site used.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct PropertyRecord {
    /// Name of the building/property
    #[serde(rename = "Building_name", default, deserialize_with = "lenient_string")]
    #[schemars(with = "String")]
    pub building_name: String,
    /// Type of property (commercial, residential, etc)
    #[serde(rename = "Property_type", default, deserialize_with = "lenient_string")]
    #[schemars(with = "String")]
    pub property_type: String,
    /// Complete address of the property
    #[serde(default, deserialize_with = "lenient_string")]
    #[schemars(with = "String")]
    pub location_address: String,
    /// Price of the property
    #[serde(rename = "Price", default, deserialize_with = "lenient_string")]
    #[schemars(with = "String")]
    pub price: String,
    /// Size of the property
    #[serde(rename = "Size", default, deserialize_with = "lenient_string")]
    #[schemars(with = "String")]
    pub size: String,
    /// Detailed description of the property
    #[serde(rename = "Description", default, deserialize_with = "lenient_string")]
    #[schemars(with = "String")]
    pub description: String,
    /// Link to the property
    #[serde(default, deserialize_with = "lenient_string")]
    #[schemars(with = "String")]
    pub property_link: String,
}

pub type PropertyCollection = Vec<PropertyRecord>;

/// Price statistics for one locality
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct LocationTrend {
    #[serde(default, deserialize_with = "lenient_string")]
    #[schemars(with = "String")]
    pub location: String,
    #[serde(deserialize_with = "lenient_number")]
    #[schemars(with = "f64")]
    pub price_per_sqft: f64,
    #[serde(deserialize_with = "lenient_number")]
    #[schemars(with = "f64")]
    pub percent_increase: f64,
    #[serde(deserialize_with = "lenient_number")]
    #[schemars(with = "f64")]
    pub rental_yield: f64,
}

// Extraction models fill fields with whatever JSON type they like: null,
// numbers where text was asked for, or "1,850" where a number was.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    })
}

fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| de::Error::custom("number out of range")),
        serde_json::Value::String(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '-'))
                .collect();
            cleaned
                .parse()
                .map_err(|_| de::Error::custom(format!("not a number: {}", s)))
        }
        other => Err(de::Error::custom(format!("not a number: {}", other))),
    }
}

/// Extraction payload shape for listings
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PropertiesResponse {
    /// List of property details
    pub properties: Vec<PropertyRecord>,
}

/// Extraction payload shape for locality trends
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LocationsResponse {
    /// List of location data points
    pub locations: Vec<LocationTrend>,
}

/// Envelope returned by the extraction service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: serde_json::Value,
    #[serde(default)]
    pub status: String,
    #[serde(rename = "expiresAt", default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl ExtractionResult {
    /// Envelope carrying a successful payload
    pub fn completed(data: serde_json::Value) -> Self {
        Self {
            success: true,
            data,
            status: "completed".to_string(),
            expires_at: None,
        }
    }

    /// Envelope standing in for an unreachable or failed extraction
    pub fn unavailable(status: impl Into<String>) -> Self {
        Self {
            success: false,
            data: serde_json::Value::Null,
            status: status.into(),
            expires_at: None,
        }
    }
}

/// Markdown text shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Narrative(pub String);

impl Narrative {
    pub fn as_str(&self) -> &str {
        &self.0
    }

}

impl fmt::Display for Narrative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_property_record_uses_listing_field_names() {
        let record: PropertyRecord = serde_json::from_value(json!({
            "Building_name": "Marina Gate",
            "Property_type": "Apartment",
            "location_address": "Dubai Marina",
            "Price": "AED 3,200,000",
            "Size": "1,100 sqft",
            "Description": "Sea view",
            "property_link": "https://example.com/1"
        }))
        .unwrap();

        assert_eq!(record.building_name, "Marina Gate");
        assert_eq!(record.price, "AED 3,200,000");
    }

    #[test]
    fn test_property_record_tolerates_missing_fields() {
        let record: PropertyRecord =
            serde_json::from_value(json!({ "Building_name": "Cayan Tower" })).unwrap();

        assert_eq!(record.building_name, "Cayan Tower");
        assert!(record.property_link.is_empty());
    }

    #[test]
    fn test_property_record_coerces_null_and_numbers() {
        let record: PropertyRecord = serde_json::from_value(json!({
            "Building_name": "Marina Gate",
            "Price": 5000000,
            "Size": null,
            "Description": true
        }))
        .unwrap();

        assert_eq!(record.price, "5000000");
        assert_eq!(record.size, "");
        assert_eq!(record.description, "true");
    }

    #[test]
    fn test_location_trend_reads_formatted_numbers() {
        let trend: LocationTrend = serde_json::from_value(json!({
            "location": "JVC",
            "price_per_sqft": "1,850",
            "percent_increase": "12.5%",
            "rental_yield": 7.1
        }))
        .unwrap();

        assert_eq!(trend.price_per_sqft, 1850.0);
        assert_eq!(trend.percent_increase, 12.5);

        let missing: Result<LocationTrend, _> = serde_json::from_value(json!({
            "location": "JVC",
            "price_per_sqft": "n/a",
            "percent_increase": 1.0,
            "rental_yield": 1.0
        }));
        assert!(missing.is_err());
    }

    #[test]
    fn test_envelope_without_success_key_is_not_successful() {
        let envelope: ExtractionResult =
            serde_json::from_value(json!({ "data": { "properties": [] } })).unwrap();

        assert!(!envelope.success);
    }

    #[test]
    fn test_validate_rejects_blank_city_and_out_of_range_price() {
        let ok = SearchCriteria::new("Business Bay", 10.0, PropertyCategory::Residential, "Villas");
        assert!(ok.validate().is_ok());

        let blank = SearchCriteria::new("   ", 10.0, PropertyCategory::Residential, "Villas");
        assert!(matches!(blank.validate(), Err(ScoutError::InvalidCriteria(_))));

        let cheap = SearchCriteria::new("JVC", 0.05, PropertyCategory::Residential, "Villas");
        assert!(cheap.validate().is_err());

        let pricey = SearchCriteria::new("JVC", 100.5, PropertyCategory::Residential, "Villas");
        assert!(pricey.validate().is_err());
    }

    #[test]
    fn test_category_parses_case_insensitively() {
        assert_eq!(
            " commercial ".parse::<PropertyCategory>().unwrap(),
            PropertyCategory::Commercial
        );
        assert!("industrial".parse::<PropertyCategory>().is_err());
    }
}
