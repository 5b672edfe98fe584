use crate::config::Config;
use crate::error::{AppError, InputField};
use crate::fetch::Fetcher;
use crate::llm::CompletionProvider;
use crate::prompt;
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

/// The tailoring pipeline: validate, normalize both inputs, build the
/// prompt, request one completion. Stateless across requests; everything
/// here is a function of the incoming pair of fields.
pub struct TailorEngine {
    fetcher: Fetcher,
    provider: Arc<dyn CompletionProvider>,
    max_input_chars: usize,
}

impl TailorEngine {
    pub fn new(config: &Config, provider: Arc<dyn CompletionProvider>) -> Result<Self> {
        let fetcher = Fetcher::new(&config.fetch)?;
        Ok(Self {
            fetcher,
            provider,
            max_input_chars: config.limits.max_input_chars,
        })
    }

    pub async fn tailor(&self, resume: &str, job_description: &str) -> Result<String, AppError> {
        let resume = resume.trim();
        let job_description = job_description.trim();

        if resume.is_empty() || job_description.is_empty() {
            return Err(AppError::Validation(
                "missing resume or job description".to_string(),
            ));
        }

        // Checked before normalization so an oversized literal never costs
        // a fetch or a provider call.
        self.check_length(resume, InputField::Resume)?;
        self.check_length(job_description, InputField::JobDescription)?;

        // The two fields are independent; both must be plain text before
        // the single completion call. First failure short-circuits.
        let (resume_text, job_text) = tokio::try_join!(
            self.fetcher.normalize(resume, InputField::Resume),
            self.fetcher
                .normalize(job_description, InputField::JobDescription),
        )?;

        info!(
            resume_chars = resume_text.len(),
            job_chars = job_text.len(),
            "Inputs normalized, requesting completion"
        );

        let prompt = prompt::build(&resume_text, &job_text);
        let result = self.provider.complete(prompt.system, &prompt.user).await?;

        if result.trim().is_empty() {
            return Err(AppError::Completion(
                "provider returned empty completion text".to_string(),
            ));
        }

        info!(result_chars = result.len(), "Tailored resume generated");

        Ok(result)
    }

    fn check_length(&self, input: &str, field: InputField) -> Result<(), AppError> {
        if self.max_input_chars == 0 {
            return Ok(());
        }
        let chars = input.chars().count();
        if chars > self.max_input_chars {
            return Err(AppError::Validation(format!(
                "{} exceeds the {} character limit",
                field, self.max_input_chars
            )));
        }
        Ok(())
    }
}
