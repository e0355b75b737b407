use crate::analysis::local;
use crate::analysis::model::{CompletionRequest, LanguageModel};
use crate::analysis::prompt;
use crate::defaults;
use crate::error::{Result, SignstreamError};
use crate::lexicon;
use crate::pipeline::types::DetectionResult;
use crate::settings::Language;
use std::sync::Arc;
use std::time::Duration;

/// Confidence attached to language-model interpretations.
pub const MODEL_CONFIDENCE: f32 = 0.9;

/// Confidence attached to canned local interpretations.
pub const LOCAL_CONFIDENCE: f32 = 0.7;

/// Request parameters for the language model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyzerConfig {
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_tokens: defaults::ANALYSIS_MAX_TOKENS,
            temperature: defaults::ANALYSIS_TEMPERATURE,
            timeout: Duration::from_millis(defaults::ANALYSIS_TIMEOUT_MS),
        }
    }
}

/// Turns buffered labels into a sentence.
///
/// Tries the language model when one is configured and falls back to local
/// pattern analysis on any failure. Each call starts fresh; there are no retries.
pub struct SemanticAnalyzer {
    model: Option<Arc<dyn LanguageModel>>,
    config: AnalyzerConfig,
}

impl SemanticAnalyzer {
    pub fn new(model: Option<Arc<dyn LanguageModel>>, config: AnalyzerConfig) -> Self {
        match &model {
            Some(m) => tracing::info!(model = m.name(), "semantic analysis via language model"),
            None => tracing::warn!(
                "no language model configured; sentences use local pattern analysis only"
            ),
        }
        Self { model, config }
    }

    /// Analyzer that never leaves the process.
    pub fn local_only() -> Self {
        Self::new(None, AnalyzerConfig::default())
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    pub fn config(&self) -> AnalyzerConfig {
        self.config
    }

    /// Interprets `labels`; `None` when neither path produces anything.
    pub async fn analyze(&self, labels: &[String], language: Language) -> Option<DetectionResult> {
        if labels.is_empty() {
            return None;
        }

        if let Some(model) = &self.model {
            let glosses: Vec<String> = labels
                .iter()
                .map(|label| lexicon::relocalize(label, language))
                .collect();
            match self.ask(model.as_ref(), &glosses, language).await {
                Ok(sentence) => {
                    tracing::debug!(%sentence, "language model interpretation");
                    return Some(DetectionResult::sentence(sentence, MODEL_CONFIDENCE));
                }
                Err(e) => {
                    tracing::debug!(error = %e, "language model unavailable, using local analysis");
                }
            }
        }

        local::interpret(labels, language)
            .map(|sentence| DetectionResult::sentence(sentence, LOCAL_CONFIDENCE))
    }

    async fn ask(
        &self,
        model: &dyn LanguageModel,
        labels: &[String],
        language: Language,
    ) -> Result<String> {
        let request = CompletionRequest {
            system_prompt: prompt::system_prompt(language),
            user_prompt: prompt::user_prompt(labels),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let raw = tokio::time::timeout(self.config.timeout, model.complete(&request))
            .await
            .map_err(|_| SignstreamError::Analysis {
                message: format!("timed out after {:?}", self.config.timeout),
            })??;

        prompt::parse_completion(&raw).ok_or_else(|| SignstreamError::Analysis {
            message: "empty completion".to_string(),
        })
    }
}
