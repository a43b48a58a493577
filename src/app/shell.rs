use crate::core::pipeline::{ColdMailPipeline, JobOutcome};
use crate::domain::ports::{CompletionModel, PageFetcher};
use crate::utils::error::{ColdMailError, ErrorCategory};
use crate::utils::validation::parse_absolute_url;
use std::fmt;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// An error as shown to the user. Only the shell turns pipeline errors into these.
#[derive(Debug)]
pub struct DisplayedError {
    pub message: String,
    pub suggestion: &'static str,
    pub error: ColdMailError,
}

impl DisplayedError {
    pub fn category(&self) -> ErrorCategory {
        self.error.category()
    }
}

impl From<ColdMailError> for DisplayedError {
    fn from(error: ColdMailError) -> Self {
        Self {
            message: error.user_friendly_message(),
            suggestion: error.recovery_suggestion(),
            error,
        }
    }
}

impl fmt::Display for DisplayedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

pub type Submission = Result<Vec<JobOutcome>, DisplayedError>;

pub struct Shell<F: PageFetcher, M: CompletionModel> {
    pipeline: ColdMailPipeline<F, M>,
}

impl<F: PageFetcher, M: CompletionModel> Shell<F, M> {
    pub fn new(pipeline: ColdMailPipeline<F, M>) -> Self {
        Self { pipeline }
    }

    /// Validates `input` and runs the pipeline. An invalid URL is reported
    /// without touching any pipeline stage.
    pub async fn handle_submit(&self, input: &str) -> Submission {
        let url = match parse_absolute_url(input) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("❌ Rejected input: {}", e);
                return Err(e.into());
            }
        };

        match self.pipeline.run(&url).await {
            Ok(outcomes) => {
                let written = outcomes.iter().filter(|o| o.email.is_ok()).count();
                tracing::info!("✅ Generated {}/{} email(s)", written, outcomes.len());
                Ok(outcomes)
            }
            Err(e) => {
                tracing::error!("❌ Pipeline failed for {}: {} (Category: {:?})", url, e, e.category());
                Err(e.into())
            }
        }
    }

    /// Prompts for URLs until EOF or `quit`, writing rendered results to `output`.
    pub async fn run_session<R, W>(&self, input: R, mut output: W) -> std::io::Result<usize>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        let mut handled = 0;

        loop {
            output.write_all(b"Enter a URL: ").await?;
            output.flush().await?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if matches!(line, "quit" | "exit") {
                break;
            }

            let submission = self.handle_submit(line).await;
            output.write_all(render(&submission).as_bytes()).await?;
            output.flush().await?;
            handled += 1;
        }

        Ok(handled)
    }
}

/// Renders a submission as Markdown-ish terminal text.
pub fn render(submission: &Submission) -> String {
    let outcomes = match submission {
        Ok(outcomes) => outcomes,
        Err(e) => return format!("❌ {}\n💡 {}\n", e.message, e.suggestion),
    };

    if outcomes.is_empty() {
        return "No job postings found on this page.\n".to_string();
    }

    let mut out = String::new();
    for outcome in outcomes {
        out.push_str(&format!("## {}\n", outcome.job.role));
        if !outcome.links.is_empty() {
            out.push_str(&format!("Portfolio: {}\n", outcome.links.as_slice().join(", ")));
        }
        match &outcome.email {
            Ok(email) => out.push_str(&format!("```markdown\n{}\n```\n", email.body)),
            Err(e) => out.push_str(&format!("❌ {}\n", e.user_friendly_message())),
        }
        out.push('\n');
    }
    out
}
