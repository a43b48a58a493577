use crate::core::normalizer::normalize;
use crate::core::prompts::EXTRACT_JOBS_PROMPT_TEMPLATE;
use crate::domain::model::{dedup_skills, JobPosting, NormalizedText};
use crate::domain::ports::CompletionModel;
use crate::utils::error::{ColdMailError, Result, Stage};
use serde::Deserialize;

/// Shape the model is asked to produce for every posting.
#[derive(Debug, Deserialize)]
struct RawPosting {
    role: String,
    description: String,
    skills: Vec<String>,
    #[serde(default)]
    experience: Option<String>,
}

pub struct JobExtractor<'a, M: CompletionModel> {
    model: &'a M,
}

impl<'a, M: CompletionModel> JobExtractor<'a, M> {
    pub fn new(model: &'a M) -> Self {
        Self { model }
    }

    /// Returns every posting found in `text`. An empty vector means the page
    /// held no discernible job and is not an error.
    pub async fn extract(&self, text: &NormalizedText) -> Result<Vec<JobPosting>> {
        if text.is_empty() {
            tracing::debug!("Empty page text, skipping model call");
            return Ok(Vec::new());
        }

        let prompt = EXTRACT_JOBS_PROMPT_TEMPLATE.replace("{page_data}", text.as_str());
        tracing::debug!("Requesting job extraction ({} chars of page text)", text.as_str().len());

        let response = self
            .model
            .complete(&prompt)
            .await
            .map_err(|source| ColdMailError::Model {
                stage: Stage::Extract,
                source,
            })?;

        let jobs = parse_postings(&response)?;
        tracing::info!("Extracted {} job posting(s)", jobs.len());
        Ok(jobs)
    }
}

/// Parses a model response into postings.
///
/// The whole response is rejected when any record has the wrong shape. Records
/// that parse but have a blank role or description are skipped with a warning.
pub fn parse_postings(response: &str) -> Result<Vec<JobPosting>> {
    let body = strip_code_fence(response);

    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| ColdMailError::MalformedModelOutput {
            reason: format!("response is not valid JSON: {}", e),
        })?;

    if !value.is_array() {
        return Err(ColdMailError::MalformedModelOutput {
            reason: format!("expected a JSON array of postings, got {}", json_kind(&value)),
        });
    }

    let raw: Vec<RawPosting> =
        serde_json::from_value(value).map_err(|e| ColdMailError::MalformedModelOutput {
            reason: e.to_string(),
        })?;

    let mut jobs = Vec::with_capacity(raw.len());
    for (index, posting) in raw.into_iter().enumerate() {
        let role = normalize(&posting.role).into_string();
        let description = normalize(&posting.description).into_string();

        if role.is_empty() || description.is_empty() {
            tracing::warn!(
                "Skipping posting #{}: blank {}",
                index,
                if role.is_empty() { "role" } else { "description" }
            );
            continue;
        }

        let experience = posting
            .experience
            .map(|e| normalize(&e).into_string())
            .filter(|e| !e.is_empty());

        jobs.push(JobPosting {
            role,
            description,
            skills: dedup_skills(posting.skills.iter().map(|s| normalize(s))),
            experience,
        });
    }

    Ok(jobs)
}

/// 去掉模型常包在外面的 Markdown 程式碼區塊
fn strip_code_fence(response: &str) -> &str {
    let trimmed = response.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // 跳過語言標記，例如 ```json
    let rest = match rest.find('\n') {
        Some(pos) => &rest[pos + 1..],
        None => rest,
    };
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ModelError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedModel {
        response: std::result::Result<String, u16>,
        calls: AtomicUsize,
    }

    impl ScriptedModel {
        fn ok(response: &str) -> Self {
            Self {
                response: Ok(response.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                response: Err(status),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl CompletionModel for ScriptedModel {
        async fn complete(&self, _prompt: &str) -> std::result::Result<String, ModelError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.response {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(ModelError::Api {
                    status: *status,
                    message: "quota exceeded".to_string(),
                }),
            }
        }
    }

    #[tokio::test]
    async fn test_empty_text_returns_no_jobs_without_model_call() {
        let model = ScriptedModel::ok("not json");
        let jobs = JobExtractor::new(&model).extract(&normalize("")).await.unwrap();
        assert!(jobs.is_empty());
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_extracts_and_normalizes_postings() {
        let model = ScriptedModel::ok(
            r#"[{"role": " Senior  Engineer ", "description": "Build data pipelines",
                 "skills": ["Python", "SQL", "python"], "experience": "5+ years"}]"#,
        );
        let jobs = JobExtractor::new(&model)
            .extract(&normalize("Senior Engineer skills: Python, SQL"))
            .await
            .unwrap();

        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].role, "Senior Engineer");
        assert_eq!(jobs[0].skills, vec!["python", "sql"]);
        assert_eq!(jobs[0].experience.as_deref(), Some("5+ years"));
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_model_error_carries_stage() {
        let model = ScriptedModel::failing(429);
        let err = JobExtractor::new(&model)
            .extract(&normalize("Careers page"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ColdMailError::Model {
                stage: Stage::Extract,
                ..
            }
        ));

        // 原始的 ModelError 要能從 source() 取回，才分得出額度不足與逾時
        let source = std::error::Error::source(&err)
            .and_then(|s| s.downcast_ref::<ModelError>())
            .expect("model error should be the source");
        assert!(matches!(source, ModelError::Api { status: 429, .. }));
    }

    #[test]
    fn test_empty_array_is_success() {
        assert!(parse_postings("[]").unwrap().is_empty());
    }

    #[test]
    fn test_rejects_non_list_top_level() {
        let err = parse_postings(r#"{"role": "Engineer", "description": "x", "skills": []}"#)
            .unwrap_err();
        assert!(matches!(err, ColdMailError::MalformedModelOutput { .. }));
    }

    #[test]
    fn test_rejects_missing_field() {
        let err = parse_postings(r#"[{"role": "Engineer", "skills": ["rust"]}]"#).unwrap_err();
        assert!(matches!(err, ColdMailError::MalformedModelOutput { .. }));
    }

    #[test]
    fn test_rejects_wrong_value_type() {
        let err = parse_postings(r#"[{"role": "Engineer", "description": "x", "skills": "rust, go"}]"#)
            .unwrap_err();
        assert!(matches!(err, ColdMailError::MalformedModelOutput { .. }));

        let err = parse_postings(
            r#"[{"role": "Engineer", "description": "x", "skills": [], "experience": 5}]"#,
        )
        .unwrap_err();
        assert!(matches!(err, ColdMailError::MalformedModelOutput { .. }));
    }

    #[test]
    fn test_one_bad_record_fails_whole_response() {
        let response = r#"[
            {"role": "Engineer", "description": "Build things", "skills": ["rust"]},
            {"role": "Designer", "skills": ["figma"]}
        ]"#;
        assert!(matches!(
            parse_postings(response),
            Err(ColdMailError::MalformedModelOutput { .. })
        ));
    }

    #[test]
    fn test_rejects_prose() {
        assert!(matches!(
            parse_postings("Sure! Here are the jobs I found."),
            Err(ColdMailError::MalformedModelOutput { .. })
        ));
    }

    #[test]
    fn test_blank_role_or_description_is_skipped() {
        let response = r#"[
            {"role": "  ", "description": "Cookie banner", "skills": []},
            {"role": "Data Engineer", "description": "<p> </p>", "skills": ["sql"]},
            {"role": "Platform Engineer", "description": "Run Kubernetes", "skills": ["k8s"]}
        ]"#;
        let jobs = parse_postings(response).unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].role, "Platform Engineer");
    }

    #[test]
    fn test_unwraps_code_fence() {
        let response = "```json\n[{\"role\": \"QA\", \"description\": \"Test apps\", \"skills\": [\"Selenium\"]}]\n```";
        let jobs = parse_postings(response).unwrap();
        assert_eq!(jobs[0].skills, vec!["selenium"]);
    }

    #[test]
    fn test_null_experience_is_none() {
        let jobs = parse_postings(
            r#"[{"role": "QA", "description": "Test apps", "skills": [], "experience": null}]"#,
        )
        .unwrap();
        assert_eq!(jobs[0].experience, None);
    }
}
