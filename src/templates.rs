//! Narrative instruction templates.
//!
//! Each template is versioned and lists the section headers the model is
//! asked to produce, so a change to the wording shows up in tests on its own.

use crate::models::{LocationTrend, PropertyRecord, SearchCriteria};
use crate::ranking::Selection;

/// Text shown when no trend data could be extracted
pub const NO_TRENDS_PLACEHOLDER: &str = "No price trends data available";

/// Persona given to the text-generation model as its system message
pub const EXPERT_PERSONA: &str = "I am a real estate expert who helps find and analyze properties based on user preferences. Use markdown to format your answers.";

pub trait NarrativeTemplate {
    fn name(&self) -> &'static str;

    fn version(&self) -> &'static str;

    /// Section headers the rendered instruction asks for, in order
    fn sections(&self) -> &'static [&'static str];
}

/// Inputs for the property recommendation narrative
#[derive(Debug, Clone, Copy)]
pub struct PropertyAnalysisInputs<'a> {
    /// Listings the model should choose from
    pub properties: &'a [PropertyRecord],
    /// Listings already known to exceed the budget
    pub over_budget: &'a [PropertyRecord],
    pub criteria: &'a SearchCriteria,
}

impl<'a> PropertyAnalysisInputs<'a> {
    pub fn from_selection(selection: &'a Selection, criteria: &'a SearchCriteria) -> Self {
        Self {
            properties: &selection.selected,
            over_budget: &selection.over_budget,
            criteria,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PropertyAnalysisTemplate;

impl PropertyAnalysisTemplate {
    pub const SELECTED_PROPERTIES: &'static str = "🏠 SELECTED PROPERTIES";
    pub const BEST_VALUE_ANALYSIS: &'static str = "💰 BEST VALUE ANALYSIS";
    pub const LOCATION_INSIGHTS: &'static str = "📍 LOCATION INSIGHTS";
    pub const RECOMMENDATIONS: &'static str = "💡 RECOMMENDATIONS";
    pub const NEGOTIATION_TIPS: &'static str = "🤝 NEGOTIATION TIPS";

    pub fn render(&self, inputs: PropertyAnalysisInputs<'_>) -> String {
        let criteria = inputs.criteria;
        let category = criteria.property_category;
        let property_type = criteria.property_type.trim();
        let max_price = criteria.max_price;
        let properties = records_json(inputs.properties);

        let mut instruction = format!(
            "As a real estate expert, analyze these properties and market trends:

Properties Found in json format:
{properties}

**IMPORTANT INSTRUCTIONS:**
1. ONLY analyze properties from the above JSON data that match the user's requirements:
   - Property Category: {category}
   - Property Type: {property_type}
   - Maximum Price: {max_price} millions
2. DO NOT create new categories or property types
3. From the matching properties, select 5-6 properties with prices closest to {max_price} millions
"
        );

        if inputs.properties.is_empty() {
            instruction.push_str(
                "4. No matching properties were found. Still produce every section below and state under each one that no matching properties were found. Do not invent listings.
",
            );
        }

        if !inputs.over_budget.is_empty() {
            instruction.push_str(&format!(
                "
These listings are OVER the {max_price} millions budget. Do not select them; if you mention them, flag them as over budget:
{}
",
                records_json(inputs.over_budget)
            ));
        }

        instruction.push_str(&format!(
            "
Please provide your analysis in this format:

{}
• List only 5-6 best matching properties with prices closest to {max_price} millions
• For each property include:
  - Name and Location along with link to the property as cta button
  - Price (with value analysis)
  - Key Features
  - Pros and Cons

{}
• Compare the selected properties based on:
  - Price per sq ft
  - Location advantage
  - Amenities offered

{}
• Specific advantages of the areas where selected properties are located

{}
• Top 3 properties from the selection with reasoning
• Investment potential
• Points to consider before purchase

{}
• Property-specific negotiation strategies

Format your response in a clear, structured way using the above sections.
",
            Self::SELECTED_PROPERTIES,
            Self::BEST_VALUE_ANALYSIS,
            Self::LOCATION_INSIGHTS,
            Self::RECOMMENDATIONS,
            Self::NEGOTIATION_TIPS,
        ));

        instruction
    }
}

impl NarrativeTemplate for PropertyAnalysisTemplate {
    fn name(&self) -> &'static str {
        "property-analysis"
    }

    fn version(&self) -> &'static str {
        "1.0"
    }

    fn sections(&self) -> &'static [&'static str] {
        &PROPERTY_SECTIONS
    }
}

const PROPERTY_SECTIONS: [&str; 5] = [
    PropertyAnalysisTemplate::SELECTED_PROPERTIES,
    PropertyAnalysisTemplate::BEST_VALUE_ANALYSIS,
    PropertyAnalysisTemplate::LOCATION_INSIGHTS,
    PropertyAnalysisTemplate::RECOMMENDATIONS,
    PropertyAnalysisTemplate::NEGOTIATION_TIPS,
];

/// Inputs for the locality trend narrative
#[derive(Debug, Clone, Copy)]
pub struct TrendAnalysisInputs<'a> {
    pub trends: &'a [LocationTrend],
    pub city: &'a str,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TrendAnalysisTemplate;

impl TrendAnalysisTemplate {
    pub const SUMMARY: &'static str = "📊 LOCATION TRENDS SUMMARY";
    pub const TOP_PERFORMERS: &'static str = "🏆 TOP PERFORMING AREAS";
    pub const INSIGHTS: &'static str = "💡 INVESTMENT INSIGHTS";
    pub const RECOMMENDATIONS: &'static str = "🎯 RECOMMENDATIONS";

    pub fn render(&self, inputs: TrendAnalysisInputs<'_>) -> String {
        let city = inputs.city.trim();
        let locations =
            serde_json::to_string_pretty(inputs.trends).unwrap_or_else(|_| "[]".to_string());

        format!(
            "As a real estate expert, analyze these location price trends for {city}:

{locations}

Please provide:
1. A bullet-point summary of the price trends for each location
2. Identify the top 3 locations with:
   - Highest price appreciation
   - Best rental yields
   - Best value for money
3. Investment recommendations:
   - Best locations for long-term investment
   - Best locations for rental income
   - Areas showing emerging potential
4. Specific advice for investors based on these trends

Format the response as follows:

{}
• [Bullet points for each location]

{}
• [Bullet points for best areas]

{}
• [Bullet points with investment advice]

{}
• [Bullet points with specific recommendations]
",
            Self::SUMMARY,
            Self::TOP_PERFORMERS,
            Self::INSIGHTS,
            Self::RECOMMENDATIONS,
        )
    }
}

impl NarrativeTemplate for TrendAnalysisTemplate {
    fn name(&self) -> &'static str {
        "location-trends"
    }

    fn version(&self) -> &'static str {
        "1.0"
    }

    fn sections(&self) -> &'static [&'static str] {
        &TREND_SECTIONS
    }
}

const TREND_SECTIONS: [&str; 4] = [
    TrendAnalysisTemplate::SUMMARY,
    TrendAnalysisTemplate::TOP_PERFORMERS,
    TrendAnalysisTemplate::INSIGHTS,
    TrendAnalysisTemplate::RECOMMENDATIONS,
];

fn records_json(records: &[PropertyRecord]) -> String {
    serde_json::to_string_pretty(records).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PropertyCategory;

    fn criteria() -> SearchCriteria {
        SearchCriteria::new("Dubai Marina", 5.0, PropertyCategory::Residential, "Apartments")
    }

    fn listing(name: &str, price: &str) -> PropertyRecord {
        PropertyRecord {
            building_name: name.to_string(),
            property_type: "Apartment".to_string(),
            location_address: "Dubai Marina".to_string(),
            price: price.to_string(),
            size: "1,000 sqft".to_string(),
            description: "Marina view".to_string(),
            property_link: "https://example.com/listing".to_string(),
        }
    }

    #[test]
    fn test_property_instruction_has_all_sections() {
        let template = PropertyAnalysisTemplate;
        let selection = Selection {
            selected: vec![listing("Marina Gate", "4.8M")],
            over_budget: vec![],
        };
        let criteria = criteria();
        let text = template.render(PropertyAnalysisInputs::from_selection(&selection, &criteria));

        assert_eq!(template.sections().len(), 5);
        for section in template.sections() {
            assert!(text.contains(section), "missing section {}", section);
        }
        assert!(text.contains("\"Building_name\": \"Marina Gate\""));
        assert!(text.contains("Property Category: Residential"));
        assert!(text.contains("Property Type: Apartments"));
        assert!(text.contains("select 5-6 properties with prices closest to 5 millions"));
        assert!(text.contains("DO NOT create new categories or property types"));
        assert!(!text.contains("No matching properties were found"));
    }

    #[test]
    fn test_empty_selection_asks_for_explicit_empty_sections() {
        let template = PropertyAnalysisTemplate;
        let selection = Selection::default();
        let criteria = criteria();
        let text = template.render(PropertyAnalysisInputs::from_selection(&selection, &criteria));

        assert!(text.contains("No matching properties were found"));
        assert!(text.contains("[]"));
        for section in template.sections() {
            assert!(text.contains(section));
        }
    }

    #[test]
    fn test_over_budget_block() {
        let selection = Selection {
            selected: vec![listing("Marina Gate", "4.8M")],
            over_budget: vec![listing("Cayan Tower", "6.1M")],
        };
        let criteria = criteria();
        let text = PropertyAnalysisTemplate.render(PropertyAnalysisInputs::from_selection(&selection, &criteria));

        assert!(text.contains("OVER the 5 millions budget"));
        assert!(text.contains("Cayan Tower"));
    }

    #[test]
    fn test_trend_instruction() {
        let template = TrendAnalysisTemplate;
        let trends = vec![LocationTrend {
            location: "JVC".to_string(),
            price_per_sqft: 1100.0,
            percent_increase: 12.5,
            rental_yield: 7.1,
        }];
        let text = template.render(TrendAnalysisInputs {
            trends: &trends,
            city: " Dubai ",
        });

        assert_eq!(template.sections().len(), 4);
        for section in template.sections() {
            assert!(text.contains(section));
        }
        assert!(text.contains("location price trends for Dubai:"));
        assert!(text.contains("\"location\": \"JVC\""));
    }
}
