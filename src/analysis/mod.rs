//! Semantic analysis of buffered sign labels.
//!
//! A remote language model is tried first when configured; local pattern
//! analysis covers every failure so a sentence result never depends on the
//! network.

pub mod analyzer;
pub mod local;
pub mod model;
#[cfg(feature = "remote-analysis")]
pub mod openai;
pub mod prompt;

pub use analyzer::{AnalyzerConfig, SemanticAnalyzer};
pub use model::{CompletionRequest, LanguageModel, MockLanguageModel};
#[cfg(feature = "remote-analysis")]
pub use openai::OpenAiClient;

use crate::config::AnalysisConfig;
use std::sync::Arc;
use std::time::Duration;

impl From<&AnalysisConfig> for AnalyzerConfig {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            timeout: Duration::from_millis(config.timeout_ms),
        }
    }
}

/// Builds the remote model described by `config`, if any.
///
/// Returns `None` when analysis is disabled, no API key is configured, or the
/// crate was built without the `remote-analysis` feature.
pub fn build_model(config: &AnalysisConfig) -> Option<Arc<dyn LanguageModel>> {
    if !config.enabled {
        return None;
    }
    let api_key = config.api_key.as_deref().filter(|key| !key.is_empty())?;

    #[cfg(feature = "remote-analysis")]
    {
        Some(Arc::new(OpenAiClient::new(
            &config.base_url,
            &config.model,
            api_key,
        )))
    }

    #[cfg(not(feature = "remote-analysis"))]
    {
        let _ = api_key;
        tracing::warn!("API key configured but remote analysis is not compiled in");
        None
    }
}
