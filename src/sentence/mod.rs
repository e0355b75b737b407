//! Sentence buffering and the trigger that decides when to interpret it.

mod buffer;
mod trigger;

pub use buffer::SentenceBuffer;
pub use trigger::SentenceTrigger;
