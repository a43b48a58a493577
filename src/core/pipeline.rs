use crate::core::composer::{EmailComposer, SenderProfile};
use crate::core::extractor::JobExtractor;
use crate::core::matcher::{match_portfolio, DEFAULT_MATCH_LIMIT};
use crate::core::normalizer::normalize;
use crate::domain::model::{ColdEmail, JobPosting, MatchedLinks, Portfolio};
use crate::domain::ports::{CompletionModel, PageFetcher};
use crate::utils::error::Result;
use std::sync::Arc;
use url::Url;

/// Result for one posting. A failed email does not affect the other postings.
#[derive(Debug)]
pub struct JobOutcome {
    pub job: JobPosting,
    pub links: MatchedLinks,
    pub email: Result<ColdEmail>,
}

/// fetch → normalize → extract → match → compose, run sequentially for one URL.
pub struct ColdMailPipeline<F: PageFetcher, M: CompletionModel> {
    fetcher: F,
    model: M,
    portfolio: Arc<Portfolio>,
    sender: SenderProfile,
    match_limit: usize,
}

impl<F: PageFetcher, M: CompletionModel> ColdMailPipeline<F, M> {
    pub fn new(fetcher: F, model: M, portfolio: Arc<Portfolio>) -> Self {
        Self {
            fetcher,
            model,
            portfolio,
            sender: SenderProfile::default(),
            match_limit: DEFAULT_MATCH_LIMIT,
        }
    }

    pub fn with_sender(mut self, sender: SenderProfile) -> Self {
        self.sender = sender;
        self
    }

    pub fn with_match_limit(mut self, limit: usize) -> Self {
        self.match_limit = limit;
        self
    }

    /// Fetch, normalize or extraction failures abort the run. Composition
    /// failures are reported per posting in `JobOutcome::email`.
    pub async fn run(&self, url: &Url) -> Result<Vec<JobOutcome>> {
        tracing::info!("🌐 Fetching {}", url);
        let document = self.fetcher.fetch(url).await?;
        tracing::debug!("Fetched {} bytes", document.body.len());

        let text = normalize(&document.body);
        tracing::debug!("Normalized page text to {} chars", text.as_str().len());

        let jobs = JobExtractor::new(&self.model).extract(&text).await?;
        if jobs.is_empty() {
            tracing::info!("No job postings found on {}", url);
            return Ok(Vec::new());
        }

        let composer = EmailComposer::new(&self.model, &self.sender);
        let mut outcomes = Vec::with_capacity(jobs.len());
        for job in jobs {
            let links = match_portfolio(
                job.skills.as_slice(),
                self.portfolio.entries(),
                self.match_limit,
            );
            tracing::debug!("'{}' matched {} portfolio link(s)", job.role, links.len());

            let email = composer.compose(&job, &links).await;
            if let Err(e) = &email {
                tracing::warn!("⚠️ {}", e);
            }
            outcomes.push(JobOutcome { job, links, email });
        }

        Ok(outcomes)
    }
}
