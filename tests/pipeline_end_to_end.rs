use glyphmatch::io::encode_png;
use glyphmatch::{
    GlyphMatchError, OwnedImage, Recognizer, RecognizerConfig, RejectConfig, UNKNOWN_SYMBOL,
};
use std::path::Path;

mod common;

const LABEL: &str = "K3x9";

fn recognizer_at(dir: &Path) -> Recognizer {
    let mut cfg = RecognizerConfig::default();
    cfg.store.template_dir = dir.to_path_buf();
    Recognizer::open(cfg).unwrap()
}

fn sample() -> OwnedImage {
    common::captcha(&common::SHAPES, 0)
}

#[test]
fn labeled_captcha_is_recognized_exactly() {
    let dir = tempfile::tempdir().unwrap();
    let recognizer = recognizer_at(dir.path());
    recognizer.add_templates(LABEL, sample().view()).unwrap();

    let recognition = recognizer.recognize(sample().view()).unwrap();
    assert_eq!(recognition.text, LABEL);
    assert_eq!(recognition.confidence, 100);
    assert_eq!(recognition.glyphs.len(), 4);
    assert!(recognition.glyphs.iter().all(|g| g.confidence == 100.0));
}

#[test]
fn empty_store_yields_question_marks() {
    let dir = tempfile::tempdir().unwrap();
    let recognizer = recognizer_at(dir.path());
    let recognition = recognizer.recognize(sample().view()).unwrap();
    assert_eq!(recognition.text, "????");
    assert_eq!(recognition.confidence, 0);
}

#[test]
fn shuffled_captcha_reuses_templates() {
    let dir = tempfile::tempdir().unwrap();
    let recognizer = recognizer_at(dir.path());
    recognizer.add_templates(LABEL, sample().view()).unwrap();

    let shuffled = common::captcha(
        &[common::STEPS, common::BAR, common::BAR, common::RING],
        2,
    );
    let recognition = recognizer.recognize(shuffled.view()).unwrap();
    assert_eq!(recognition.text, "9KKx");
    assert_eq!(recognition.confidence, 100);
}

#[test]
fn ranked_recognition_agrees_with_its_text() {
    let dir = tempfile::tempdir().unwrap();
    let debug = tempfile::tempdir().unwrap();
    let mut cfg = RecognizerConfig::default();
    cfg.store.template_dir = dir.path().to_path_buf();
    let recognizer = Recognizer::open(cfg.clone()).unwrap();
    recognizer.add_templates(LABEL, sample().view()).unwrap();

    cfg.segment.debug_dir = Some(debug.path().to_path_buf());
    let recognizer = Recognizer::open(cfg).unwrap();
    let (recognition, rankings) = recognizer.recognize_ranked(sample().view(), 2).unwrap();
    assert_eq!(recognition, recognizer.recognize(sample().view()).unwrap());
    assert_eq!(recognition.text, LABEL);
    assert_eq!(rankings.len(), 4);
    for (ranked, c) in rankings.iter().zip(LABEL.chars()) {
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].label.as_char(), c);
        assert_eq!(ranked[0].score, 0.0);
        assert!(ranked[1].score >= ranked[0].score);
    }
    assert_eq!(
        common::list_dir(debug.path()),
        vec!["char_0.png", "char_1.png", "char_2.png", "char_3.png"]
    );

    let (_, empty) = recognizer.recognize_ranked(sample().view(), 0).unwrap();
    assert!(empty.iter().all(Vec::is_empty));
}

#[test]
fn encoded_bytes_round_trip_through_recognition() {
    let dir = tempfile::tempdir().unwrap();
    let recognizer = recognizer_at(dir.path());
    let png = encode_png(sample().view()).unwrap();
    let files = recognizer.add_templates_bytes(LABEL, &png).unwrap();
    assert_eq!(files, vec!["K_0.png", "3_0.png", "x_0.png", "9_0.png"]);

    let recognition = recognizer.recognize_bytes(&png).unwrap();
    assert_eq!(recognition.text, LABEL);
    assert_eq!(recognition.confidence, 100);
}

#[test]
fn undecodable_bytes_are_a_user_error() {
    let dir = tempfile::tempdir().unwrap();
    let recognizer = recognizer_at(dir.path());
    let err = recognizer.recognize_bytes(b"definitely not an image").unwrap_err();
    assert!(matches!(err, GlyphMatchError::ImageIo { .. }));
    assert!(err.is_user_error());
    assert!(recognizer
        .add_templates_bytes(LABEL, b"still not an image")
        .is_err());
    assert!(common::list_dir(dir.path()).is_empty());
}

#[test]
fn narrow_captcha_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let recognizer = recognizer_at(dir.path());
    let img = OwnedImage::filled(3, 50, 0).unwrap();
    assert!(matches!(
        recognizer.recognize(img.view()),
        Err(GlyphMatchError::ImageTooNarrow { .. })
    ));
}

#[test]
fn reject_config_marks_unseen_glyphs_unknown() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = RecognizerConfig::default();
    cfg.store.template_dir = dir.path().to_path_buf();
    cfg.matching.reject = Some(RejectConfig::default());
    let recognizer = Recognizer::open(cfg).unwrap();

    let partial = common::captcha(&[common::BAR, common::HBAR], 0);
    let two = RecognizerConfig {
        segment: glyphmatch::SegmentConfig {
            num_chars: 2,
            debug_dir: None,
        },
        store: recognizer.store_config().clone(),
        ..RecognizerConfig::default()
    };
    Recognizer::new(two)
        .unwrap()
        .add_templates("IH", partial.view())
        .unwrap();
    recognizer.reload().unwrap();

    let recognition = recognizer.recognize(sample().view()).unwrap();
    assert_eq!(recognition.text, format!("IH{UNKNOWN_SYMBOL}{UNKNOWN_SYMBOL}"));
    assert_eq!(recognition.confidence, 50);
}
