//! Narrative generation for listings and locality trends.

use crate::error::Result;
use crate::generators::TextGenerator;
use crate::models::{LocationTrend, Narrative, PropertyRecord, SearchCriteria};
use crate::ranking::Selection;
use crate::templates::{
    NarrativeTemplate, PropertyAnalysisInputs, PropertyAnalysisTemplate, TrendAnalysisInputs,
    TrendAnalysisTemplate,
};
use tracing::info;

/// Sends rendered instructions to the text generator, one request per call.
///
/// The returned narrative is not checked against the requested sections.
pub struct AnalysisOrchestrator<'a> {
    generator: &'a dyn TextGenerator,
    property_template: PropertyAnalysisTemplate,
    trend_template: TrendAnalysisTemplate,
}

impl<'a> AnalysisOrchestrator<'a> {
    pub fn new(generator: &'a dyn TextGenerator) -> Self {
        Self {
            generator,
            property_template: PropertyAnalysisTemplate,
            trend_template: TrendAnalysisTemplate,
        }
    }

    /// Narrative over the raw collection; the model does all the selecting
    pub async fn analyze_properties(
        &self,
        properties: &[PropertyRecord],
        criteria: &SearchCriteria,
    ) -> Result<Narrative> {
        self.analyze(PropertyAnalysisInputs {
            properties,
            over_budget: &[],
            criteria,
        })
        .await
    }

    /// Narrative over a ranked selection, with over-budget listings flagged
    pub async fn analyze_selection(
        &self,
        selection: &Selection,
        criteria: &SearchCriteria,
    ) -> Result<Narrative> {
        self.analyze(PropertyAnalysisInputs::from_selection(selection, criteria))
            .await
    }

    async fn analyze(&self, inputs: PropertyAnalysisInputs<'_>) -> Result<Narrative> {
        let instruction = self.property_template.render(inputs);

        info!(
            template = self.property_template.name(),
            version = self.property_template.version(),
            listings = inputs.properties.len(),
            model = self.generator.model_name(),
            "Generating property narrative"
        );

        let generated = self.generator.run(&instruction).await?;
        Ok(Narrative(generated.content))
    }

    pub async fn analyze_location_trends(
        &self,
        trends: &[LocationTrend],
        city: &str,
    ) -> Result<Narrative> {
        let instruction = self
            .trend_template
            .render(TrendAnalysisInputs { trends, city });

        info!(
            template = self.trend_template.name(),
            version = self.trend_template.version(),
            localities = trends.len(),
            model = self.generator.model_name(),
            "Generating trend narrative"
        );

        let generated = self.generator.run(&instruction).await?;
        Ok(Narrative(generated.content))
    }
}
