//! The two search pipelines: listings first, then locality trends.
//!
//! Build one `SearchPipeline` per search. It holds no mutable state, so
//! nothing leaks from one search into the next.

use crate::analysis::AnalysisOrchestrator;
use crate::config::Config;
use crate::error::Result;
use crate::generators::{OpenAIGenerator, TextGenerator};
use crate::models::{Narrative, SearchCriteria};
use crate::normalize::{normalize, normalize_trends};
use crate::query::QueryBuilder;
use crate::ranking::{ModelRanking, RankingStrategy};
use crate::scrapers::{ExtractionClient, FirecrawlExtractor};
use crate::templates::NO_TRENDS_PLACEHOLDER;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Both narratives produced by one search
#[derive(Debug, Clone)]
pub struct SearchReport {
    pub properties: Narrative,
    pub trends: Narrative,
}

impl fmt::Display for SearchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "🏘️ Property Recommendations\n")?;
        writeln!(f, "{}", self.properties)?;
        writeln!(f, "\n---\n")?;
        writeln!(f, "📈 Location Trends Analysis of the city\n")?;
        write!(f, "{}", self.trends)
    }
}

pub struct SearchPipeline {
    queries: QueryBuilder,
    extractor: Arc<dyn ExtractionClient>,
    generator: Arc<dyn TextGenerator>,
    ranking: Box<dyn RankingStrategy>,
}

impl SearchPipeline {
    pub fn new(
        queries: QueryBuilder,
        extractor: Arc<dyn ExtractionClient>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            queries,
            extractor,
            generator,
            ranking: Box::new(ModelRanking),
        }
    }

    /// Wire the Firecrawl and chat-completions backends from configuration
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::new(
            QueryBuilder::new(config.listing_sources.clone(), &config.market_region),
            Arc::new(FirecrawlExtractor::from_config(config)?),
            Arc::new(OpenAIGenerator::from_config(config)?),
        ))
    }

    pub fn with_ranking(mut self, ranking: Box<dyn RankingStrategy>) -> Self {
        self.ranking = ranking;
        self
    }

    /// Listings narrative for `criteria`.
    ///
    /// Extraction problems leave the collection empty; only a generation
    /// failure makes this return an error.
    pub async fn find_properties(&self, criteria: &SearchCriteria) -> Result<Narrative> {
        let query = self.queries.build_property_query(criteria);
        info!(
            city = %criteria.city,
            backend = self.extractor.source_name(),
            urls = query.urls.len(),
            "Searching for properties"
        );

        let result = self
            .extractor
            .extract(&query.urls, &query.prompt, &query.schema)
            .await;
        let properties = normalize(&result);
        info!(count = properties.len(), "Processed properties");

        let selection = self.ranking.select(properties, criteria);
        debug!(
            strategy = self.ranking.name(),
            selected = selection.selected.len(),
            over_budget = selection.over_budget.len(),
            "Ranked properties"
        );

        AnalysisOrchestrator::new(self.generator.as_ref())
            .analyze_selection(&selection, criteria)
            .await
    }

    /// Locality trend narrative for `city`, or the fixed placeholder when no
    /// trend data could be extracted
    pub async fn location_trends(&self, city: &str) -> Result<Narrative> {
        let query = self.queries.build_trend_query(city);
        debug!(%city, urls = query.urls.len(), "Extracting location trends");

        let result = self
            .extractor
            .extract(&query.urls, &query.prompt, &query.schema)
            .await;

        if !result.success {
            warn!(status = %result.status, "No trend data, using placeholder");
            return Ok(Narrative(NO_TRENDS_PLACEHOLDER.to_string()));
        }

        let trends = normalize_trends(&result);
        debug!(localities = trends.len(), "Analyzing location trends");

        AnalysisOrchestrator::new(self.generator.as_ref())
            .analyze_location_trends(&trends, city)
            .await
    }

    /// Run the property pipeline to completion, then the trend pipeline
    pub async fn run(&self, criteria: &SearchCriteria) -> Result<SearchReport> {
        let properties = self.find_properties(criteria).await?;
        info!("Property search completed");

        let trends = self.location_trends(&criteria.city).await?;
        info!("Location analysis completed");

        Ok(SearchReport { properties, trends })
    }
}
