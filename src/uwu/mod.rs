pub mod gemini;
pub mod rules;

use async_trait::async_trait;

use crate::config::UwuMode;
use crate::error::TransformError;

pub use gemini::GeminiUwuifier;
pub use rules::RuleUwuifier;

/// Rewrites a message in uwu speak. Callers only pass non-blank text.
#[async_trait]
pub trait Uwuifier: Send + Sync {
    fn name(&self) -> &'static str;

    async fn uwuify(&self, text: &str) -> Result<String, TransformError>;
}

/// Builds the transformer the deployment asked for.
pub fn from_mode(mode: &UwuMode) -> Result<Box<dyn Uwuifier>, TransformError> {
    Ok(match mode {
        UwuMode::Gemini { api_key, model } => {
            Box::new(GeminiUwuifier::new(api_key.clone(), model.clone())?)
        }
        UwuMode::Rules => Box::new(RuleUwuifier),
    })
}
