pub mod firecrawl;
pub mod traits;
pub mod types;

pub use firecrawl::FirecrawlExtractor;
pub use traits::ExtractionClient;
pub use types::{ExtractionQuery, ListingSource};
