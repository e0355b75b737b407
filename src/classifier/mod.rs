//! Geometric gesture classifier.
//!
//! A five-tier cascade over the first hand in a frame; the first tier that
//! matches wins:
//!
//! 1. canonical static poses ([`poses`])
//! 2. letters then numerals ([`alphabet`], [`numbers`])
//! 3. named vocabulary patterns ([`vocabulary`])
//! 4. per-language overlay ([`overlay`]), non-ASL only
//! 5. coarse-feature fallback ([`fallback`])
//!
//! Classification is total: malformed input yields `None`, never an error.

pub mod alphabet;
pub mod fallback;
pub mod numbers;
pub mod overlay;
pub mod poses;
pub mod vocabulary;

use crate::hand::{HandPose, HandSample};
use crate::lexicon;
use crate::pipeline::types::{DetectionResult, GestureType, Tier};
use crate::settings::Language;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Confidence for canonical poses, letters and numerals.
pub const STATIC_CONFIDENCE: f32 = 0.85;

/// Confidence for vocabulary patterns.
pub const VOCABULARY_CONFIDENCE: f32 = 0.8;

/// Confidence for language-overlay matches and localized labels.
pub const OVERLAY_CONFIDENCE: f32 = 0.75;

#[derive(Debug, Clone)]
struct Match {
    label: String,
    confidence: f32,
    gesture_type: GestureType,
    tier: Tier,
}

impl Match {
    fn new(label: &str, confidence: f32, gesture_type: GestureType, tier: Tier) -> Self {
        Self {
            label: label.to_string(),
            confidence,
            gesture_type,
            tier,
        }
    }
}

/// Turns hand landmarks into sign labels.
#[derive(Debug, Clone)]
pub struct Classifier {
    language: Language,
    rng: StdRng,
}

impl Classifier {
    /// Creates a classifier with an entropy-seeded fallback PRNG.
    pub fn new(language: Language) -> Self {
        Self::with_rng(StdRng::from_entropy(), language)
    }

    /// Creates a classifier whose fallback choices are reproducible.
    pub fn with_seed(seed: u64, language: Language) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), language)
    }

    pub fn with_rng(rng: StdRng, language: Language) -> Self {
        Self { language, rng }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// Classifies the first hand in `hands`.
    ///
    /// Returns `None` for an empty frame or when the first hand has fewer than
    /// 21 landmarks.
    pub fn classify(&mut self, hands: &[HandSample]) -> Option<DetectionResult> {
        let first = hands.first()?;
        let pose = HandPose::new(first)?;
        let matched = self.cascade(&pose);

        tracing::trace!(
            sign = %matched.label,
            tier = matched.tier.name(),
            confidence = matched.confidence,
            "classified hand"
        );

        Some(DetectionResult {
            sign: matched.label,
            confidence: matched.confidence,
            landmarks: Some(hands.to_vec()),
            gesture_type: matched.gesture_type,
            hand_shape: Some(pose.shape().tag().to_string()),
            tier: Some(matched.tier),
        })
    }

    fn cascade(&mut self, pose: &HandPose) -> Match {
        let language = self.language;
        if !language.is_default() {
            if let Some(label) = overlay::recognize(pose, language) {
                return Match::new(
                    &label,
                    OVERLAY_CONFIDENCE,
                    GestureType::Static,
                    Tier::LanguageOverlay,
                );
            }
            if let Some(m) = positive_match(pose) {
                return Match {
                    label: lexicon::localize(&m.label, language),
                    confidence: OVERLAY_CONFIDENCE,
                    tier: Tier::LanguageOverlay,
                    ..m
                };
            }
        } else if let Some(m) = positive_match(pose) {
            return m;
        }

        let guess = fallback::guess(pose, &mut self.rng);
        Match::new(
            &lexicon::localize(guess.label, language),
            guess.confidence,
            GestureType::Static,
            Tier::Fallback,
        )
    }
}

/// Tiers 1-3, in order.
fn positive_match(pose: &HandPose) -> Option<Match> {
    if let Some(label) = poses::recognize(pose) {
        return Some(Match::new(
            label,
            STATIC_CONFIDENCE,
            GestureType::Static,
            Tier::CanonicalPose,
        ));
    }
    if let Some(label) = alphabet::recognize(pose).or_else(|| numbers::recognize(pose)) {
        return Some(Match::new(
            label,
            STATIC_CONFIDENCE,
            GestureType::Static,
            Tier::Alphabet,
        ));
    }
    vocabulary::recognize(pose).map(|label| {
        Match::new(
            label,
            VOCABULARY_CONFIDENCE,
            GestureType::Dynamic,
            Tier::Vocabulary,
        )
    })
}
