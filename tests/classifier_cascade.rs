use signstream::analysis::{AnalyzerConfig, MockLanguageModel, SemanticAnalyzer};
use signstream::clock::{Clock, MockClock};
use signstream::hand::{Finger, FingerForm, HandBuilder, HandSample, Landmark};
use signstream::lexicon;
use signstream::{
    Classifier, GestureType, Language, SentenceBuffer, SentenceTrigger, Tier,
};
use std::sync::Arc;
use std::time::Duration;

fn labels(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn letter_i() -> HandSample {
    HandBuilder::fist()
        .finger(Finger::Pinky, FingerForm::Extended)
        .build()
}

fn love() -> HandSample {
    HandBuilder::fist()
        .fingers(&[Finger::Index, Finger::Pinky], FingerForm::Extended)
        .build()
}

fn you() -> HandSample {
    HandBuilder::fist()
        .finger(Finger::Index, FingerForm::Horizontal)
        .build()
}

#[test]
fn fewer_than_21_landmarks_is_not_classified() {
    let mut classifier = Classifier::with_seed(1, Language::Asl);
    let partial = HandSample::new(vec![Landmark::new(0.5, 0.5, 0.0); 12]);
    assert!(classifier.classify(&[partial]).is_none());
    assert!(classifier.classify(&[]).is_none());
}

#[test]
fn open_hand_is_a_canonical_pose() {
    let mut classifier = Classifier::with_seed(1, Language::Asl);
    let result = classifier
        .classify(&[HandBuilder::open_hand().build()])
        .unwrap();
    assert_eq!(result.sign, "Open Hand");
    assert!((result.confidence - 0.85).abs() < f32::EPSILON);
    assert_eq!(result.gesture_type, GestureType::Static);
    assert_eq!(result.tier, Some(Tier::CanonicalPose));
}

#[test]
fn distance_from_camera_does_not_change_the_label() {
    let mut classifier = Classifier::with_seed(1, Language::Asl);
    let far = HandBuilder::open_hand().scaled(0.6).build();
    assert_eq!(classifier.classify(&[far]).unwrap().sign, "Open Hand");
}

#[test]
fn localized_labels_follow_language() {
    let open = HandBuilder::open_hand().build();

    let mut ksl = Classifier::with_seed(1, Language::Ksl);
    assert_eq!(ksl.classify(std::slice::from_ref(&open)).unwrap().sign, "손바닥");

    let mut bsl = Classifier::with_seed(1, Language::Bsl);
    let result = bsl.classify(&[open]).unwrap();
    assert_eq!(result.sign, "Flat Hand");
    assert_eq!(result.tier, Some(Tier::LanguageOverlay));
}

#[test]
fn classified_stream_fills_the_buffer_once_per_sign() {
    let mut classifier = Classifier::with_seed(5, Language::Asl);
    let mut buffer = SentenceBuffer::default();
    let stream = [letter_i(), letter_i(), love(), love(), love(), you()];

    for hand in stream {
        let result = classifier.classify(&[hand]).unwrap();
        buffer.push(result.sign);
    }
    assert_eq!(buffer.labels(), labels(&["I", "Love", "You"]));
}

#[test]
fn buffer_keeps_the_most_recent_labels() {
    let mut buffer = SentenceBuffer::default();
    for n in 0..14 {
        buffer.push(n.to_string());
    }
    assert_eq!(buffer.len(), 10);
    assert_eq!(buffer.labels().first().map(String::as_str), Some("4"));
    assert_eq!(buffer.last(), Some("13"));
}

#[test]
fn trigger_waits_for_two_labels_and_the_interval() {
    let clock = MockClock::new();
    let mut trigger = SentenceTrigger::default();
    let mut buffer = SentenceBuffer::default();

    buffer.push("Hello");
    assert!(!trigger.fire(&buffer, clock.now()));

    buffer.push("How are you?");
    assert!(trigger.fire(&buffer, clock.now()));

    clock.advance(Duration::from_millis(2999));
    assert!(!trigger.is_due(&buffer, clock.now()));
    clock.advance(Duration::from_millis(1));
    assert!(trigger.is_due(&buffer, clock.now()));
}

#[tokio::test]
async fn local_analysis_without_credentials() {
    let analyzer = SemanticAnalyzer::local_only();
    let result = analyzer
        .analyze(&labels(&["I", "Love", "You"]), Language::Asl)
        .await
        .unwrap();
    assert_eq!(result.sign, "I love you.");
    assert_eq!(result.gesture_type, GestureType::Sentence);
    assert!((result.confidence - 0.7).abs() < f32::EPSILON);
}

#[tokio::test]
async fn localized_labels_match_local_patterns() {
    let ksl: Vec<String> = ["I", "Love", "You"]
        .iter()
        .map(|label| lexicon::localize(label, Language::Ksl))
        .collect();
    assert_eq!(ksl, labels(&["나", "사랑", "당신"]));

    let analyzer = SemanticAnalyzer::local_only();
    let result = analyzer.analyze(&ksl, Language::Ksl).await.unwrap();
    assert_eq!(result.sign, "I love you.");
}

#[tokio::test]
async fn unknown_runs_get_an_ordering_hint() {
    let analyzer = SemanticAnalyzer::local_only();
    let result = analyzer
        .analyze(&labels(&["Water", "Stop", "Peace"]), Language::Asl)
        .await
        .unwrap();
    assert_eq!(result.sign, "3 signs detected, check ordering");

    let none = analyzer
        .analyze(&labels(&["Water", "Stop"]), Language::Asl)
        .await;
    assert!(none.is_none());
}

#[tokio::test]
async fn model_answer_is_trimmed_and_trusted() {
    let model = MockLanguageModel::new().with_response("  Hello, how are you?  \n");
    let analyzer = SemanticAnalyzer::new(Some(Arc::new(model.clone())), AnalyzerConfig::default());
    let result = analyzer
        .analyze(&labels(&["Hello", "How are you?"]), Language::Asl)
        .await
        .unwrap();
    assert_eq!(result.sign, "Hello, how are you?");
    assert!((result.confidence - 0.9).abs() < f32::EPSILON);
    assert_eq!(model.calls(), 1);
}
