pub mod composer;
pub mod extractor;
pub mod matcher;
pub mod normalizer;
pub mod pipeline;
pub mod prompts;

pub use crate::domain::model::{
    ColdEmail, JobPosting, MatchedLinks, NormalizedText, Portfolio, PortfolioEntry, RawDocument,
};
pub use crate::domain::ports::{CompletionModel, PageFetcher};
pub use crate::utils::error::Result;
