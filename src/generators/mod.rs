pub mod openai;
pub mod traits;

pub use openai::OpenAIGenerator;
pub use traits::{Generated, TextGenerator};
