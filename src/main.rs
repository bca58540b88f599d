use clap::{Parser, ValueEnum};
use estate_scout::ranking::{ModelRanking, PriceProximityRanking, RankingStrategy};
use estate_scout::{Config, PropertyCategory, SearchCriteria, SearchPipeline};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Category {
    Residential,
    Commercial,
}

impl From<Category> for PropertyCategory {
    fn from(category: Category) -> Self {
        match category {
            Category::Residential => PropertyCategory::Residential,
            Category::Commercial => PropertyCategory::Commercial,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Ranking {
    /// Let the narrative model pick the listings
    Model,
    /// Keep the in-budget listings closest to the maximum price
    Price,
}

/// Find properties in an area and summarize local price trends
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Area to search in, e.g. "Business Bay"
    #[arg(long)]
    city: String,

    /// Maximum price in millions
    #[arg(long, default_value_t = 10.0, value_parser = parse_max_price)]
    max_price: f64,

    #[arg(long, value_enum, default_value_t = Category::Residential)]
    category: Category,

    /// Property type, e.g. Apartments or Villas
    #[arg(long, default_value = "Apartments")]
    property_type: String,

    #[arg(long, value_enum, default_value_t = Ranking::Model)]
    ranking: Ranking,
}

fn parse_max_price(raw: &str) -> Result<f64, String> {
    let value: f64 = raw.parse().map_err(|_| format!("`{}` is not a number", raw))?;
    if (0.1..=100.0).contains(&value) {
        Ok(value)
    } else {
        Err("maximum price must be between 0.1 and 100.0 millions".to_string())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();

    let criteria = SearchCriteria::new(
        args.city.trim(),
        args.max_price,
        args.category.into(),
        args.property_type.trim(),
    );
    criteria.validate()?;

    info!("🏠 Estate Scout");
    info!("==========================================");

    let config = Config::from_env()?;
    let ranking: Box<dyn RankingStrategy> = match args.ranking {
        Ranking::Model => Box::new(ModelRanking),
        Ranking::Price => Box::new(PriceProximityRanking::default()),
    };

    // One pipeline per search
    let pipeline = SearchPipeline::from_config(&config)?.with_ranking(ranking);

    info!("🔍 Searching for properties and location trends...");
    let report = match pipeline.run(&criteria).await {
        Ok(report) => report,
        Err(e) => {
            error!("❌ An error occurred: {}", e);
            return Err(e.into());
        }
    };
    info!("✅ Search completed!");

    println!("{}", report);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_price_bounds() {
        assert_eq!(parse_max_price("5.5"), Ok(5.5));
        assert!(parse_max_price("0.05").is_err());
        assert!(parse_max_price("250").is_err());
        assert!(parse_max_price("cheap").is_err());
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "estate-scout",
            "--city",
            "Business Bay",
            "--max-price",
            "3.5",
            "--category",
            "commercial",
            "--ranking",
            "price",
        ])
        .unwrap();

        assert_eq!(args.city, "Business Bay");
        assert_eq!(args.max_price, 3.5);
        assert!(matches!(args.category, Category::Commercial));
        assert_eq!(args.property_type, "Apartments");
    }
}
