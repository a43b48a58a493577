use crate::core::prompts::WRITE_EMAIL_PROMPT_TEMPLATE;
use crate::domain::model::{ColdEmail, JobPosting, MatchedLinks};
use crate::domain::ports::CompletionModel;
use crate::utils::error::{ColdMailError, Result};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{(\w+)\}").unwrap());

/// Who the generated email is written as.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SenderProfile {
    pub sender_name: String,
    pub sender_title: String,
    pub company: String,
    pub company_pitch: String,
}

impl Default for SenderProfile {
    fn default() -> Self {
        Self {
            sender_name: "Alex".to_string(),
            sender_title: "business development executive".to_string(),
            company: "Northwind Software".to_string(),
            company_pitch: "Northwind Software is a software consultancy that builds and \
                automates business systems for clients, helping them scale while cutting \
                operating cost."
                .to_string(),
        }
    }
}

pub struct EmailComposer<'a, M: CompletionModel> {
    model: &'a M,
    sender: &'a SenderProfile,
}

impl<'a, M: CompletionModel> EmailComposer<'a, M> {
    pub fn new(model: &'a M, sender: &'a SenderProfile) -> Self {
        Self { model, sender }
    }

    pub async fn compose(&self, job: &JobPosting, links: &MatchedLinks) -> Result<ColdEmail> {
        let prompt = build_prompt(job, links, self.sender);
        tracing::debug!("Composing email for '{}' with {} link(s)", job.role, links.len());

        let body = self
            .model
            .complete(&prompt)
            .await
            .map_err(|e| ColdMailError::GenerationFailed {
                role: job.role.clone(),
                reason: e.to_string(),
                source: Some(e),
            })?;

        let body = body.trim();
        if body.is_empty() {
            return Err(ColdMailError::GenerationFailed {
                role: job.role.clone(),
                reason: "model returned empty content".to_string(),
                source: None,
            });
        }

        Ok(ColdEmail {
            role: job.role.clone(),
            body: body.to_string(),
        })
    }
}

fn build_prompt(job: &JobPosting, links: &MatchedLinks, sender: &SenderProfile) -> String {
    let experience_line = job
        .experience
        .as_deref()
        .map(|e| format!("Experience: {}\n", e))
        .unwrap_or_default();

    let skills = if job.skills.is_empty() {
        "not specified".to_string()
    } else {
        job.skills.join(", ")
    };

    let link_list = if links.is_empty() {
        "(no matching portfolio links)".to_string()
    } else {
        links
            .iter()
            .map(|l| format!("- {}", l))
            .collect::<Vec<_>>()
            .join("\n")
    };

    // 只掃描樣板本身一次，職缺內容裡的 {role} 之類字樣不會再被展開
    PLACEHOLDER
        .replace_all(WRITE_EMAIL_PROMPT_TEMPLATE, |caps: &Captures| {
            let value = match &caps[1] {
                "sender_name" => &sender.sender_name,
                "sender_title" => &sender.sender_title,
                "company" => &sender.company,
                "company_pitch" => &sender.company_pitch,
                "link_list" => &link_list,
                "experience_line" => &experience_line,
                "skills" => &skills,
                "role" => &job.role,
                "description" => &job.description,
                _ => return caps[0].to_string(),
            };
            value.clone()
        })
        .into_owned()
}
