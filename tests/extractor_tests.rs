use form_autofill::field::extractor::{
    SURROUNDING_TEXT_MAX, build_selector, classify_kind, extract_descriptors, resolve_label,
    surrounding_text, synthetic_id,
};
use form_autofill::field::field_model::{FieldKind, PathStep};

use crate::common::fixtures::raw_control;

mod common;

fn step(tag: &str, id: Option<&str>, nth: u32) -> PathStep {
    PathStep {
        tag: tag.to_string(),
        id: id.map(|s| s.to_string()),
        nth_of_type: nth,
    }
}

// =========================================================================
// Kind classification and exclusion
// =========================================================================

#[test]
fn supported_kinds_are_classified() {
    assert_eq!(classify_kind(&raw_control("input", None)), Some(FieldKind::Text));
    assert_eq!(classify_kind(&raw_control("input", Some("text"))), Some(FieldKind::Text));
    assert_eq!(classify_kind(&raw_control("input", Some("email"))), Some(FieldKind::Email));
    assert_eq!(classify_kind(&raw_control("input", Some("tel"))), Some(FieldKind::Tel));
    assert_eq!(classify_kind(&raw_control("input", Some("number"))), Some(FieldKind::Number));
    assert_eq!(classify_kind(&raw_control("input", Some("password"))), Some(FieldKind::Password));
    assert_eq!(classify_kind(&raw_control("textarea", None)), Some(FieldKind::Textarea));
}

#[test]
fn unsupported_kinds_are_excluded() {
    for t in ["submit", "button", "hidden", "checkbox", "radio", "file", "search"] {
        assert_eq!(classify_kind(&raw_control("input", Some(t))), None, "type={}", t);
    }
    assert_eq!(classify_kind(&raw_control("select", None)), None);
    assert_eq!(classify_kind(&raw_control("button", None)), None);
}

#[test]
fn hidden_controls_are_dropped() {
    let mut visible = raw_control("input", Some("text"));
    visible.id = Some("a".into());
    let mut hidden = raw_control("input", Some("text"));
    hidden.id = Some("b".into());
    hidden.visible = false;

    let descriptors = extract_descriptors(&[visible, hidden]);
    assert_eq!(descriptors.len(), 1);
    assert_eq!(descriptors[0].id, "a");
}

// =========================================================================
// Label priority chain
// =========================================================================

#[test]
fn explicit_label_wins() {
    let mut control = raw_control("input", Some("text"));
    control.label_text = Some("  お名前  ".into());
    control.for_label_text = Some("for-label".into());
    control.aria_label = Some("aria".into());
    control.preceding_text = Some("preceding".into());

    assert_eq!(resolve_label(&control), "お名前");
}

#[test]
fn label_chain_falls_through_in_order() {
    let mut control = raw_control("input", Some("text"));
    control.for_label_text = Some("for-label".into());
    control.aria_label = Some("aria".into());
    assert_eq!(resolve_label(&control), "for-label");

    control.for_label_text = None;
    assert_eq!(resolve_label(&control), "aria");

    control.aria_label = None;
    control.labelled_by_text = Some("labelled-by".into());
    assert_eq!(resolve_label(&control), "labelled-by");

    control.labelled_by_text = None;
    control.preceding_text = Some("  preceding text  ".into());
    assert_eq!(resolve_label(&control), "preceding text");

    control.preceding_text = None;
    assert_eq!(resolve_label(&control), "");
}

#[test]
fn empty_candidates_are_skipped() {
    let mut control = raw_control("input", Some("text"));
    control.label_text = Some("   ".into());
    control.aria_label = Some("メールアドレス".into());

    assert_eq!(resolve_label(&control), "メールアドレス");
}

// =========================================================================
// Surrounding text
// =========================================================================

#[test]
fn surrounding_text_joins_siblings_and_parent() {
    let mut control = raw_control("input", Some("text"));
    control.preceding_siblings = vec!["one".into(), "two".into(), "three".into(), "four".into()];
    control.parent_text = Some("parent".into());
    control.following_siblings = vec!["after1".into(), "after2".into(), "after3".into()];

    // Only 3 preceding and 2 following are taken.
    assert_eq!(
        surrounding_text(&control),
        "one two three parent after1 after2"
    );
}

#[test]
fn surrounding_text_is_bounded() {
    let mut control = raw_control("input", Some("text"));
    control.parent_text = Some("x".repeat(500));

    let text = surrounding_text(&control);
    assert_eq!(text.chars().count(), SURROUNDING_TEXT_MAX);
}

#[test]
fn surrounding_text_is_best_effort() {
    let control = raw_control("input", Some("text"));
    assert_eq!(surrounding_text(&control), "");
}

// =========================================================================
// Selector composition
// =========================================================================

#[test]
fn selector_anchors_at_nearest_id() {
    let path = vec![
        step("body", None, 1),
        step("div", Some("checkout"), 1),
        step("form", None, 1),
        step("input", None, 2),
    ];

    // The walk stops at the id anchor; body never appears.
    assert_eq!(build_selector(&path), "div#checkout > form > input:nth-of-type(2)");
}

#[test]
fn selector_uses_nth_of_type_without_ids() {
    let path = vec![
        step("body", None, 1),
        step("div", None, 3),
        step("input", None, 1),
    ];

    assert_eq!(build_selector(&path), "body > div:nth-of-type(3) > input");
}

// =========================================================================
// Id resolution
// =========================================================================

#[test]
fn native_id_preferred_then_name() {
    let mut with_id = raw_control("input", Some("text"));
    with_id.id = Some("email".into());
    with_id.name = Some("mail_field".into());

    let mut with_name = raw_control("input", Some("text"));
    with_name.name = Some("phone".into());

    let descriptors = extract_descriptors(&[with_id, with_name]);
    assert_eq!(descriptors[0].id, "email");
    assert_eq!(descriptors[1].id, "phone");
}

#[test]
fn synthetic_ids_are_deterministic_across_scans() {
    let mut control = raw_control("input", Some("text"));
    control.path = vec![step("form", Some("f"), 1), step("input", None, 1)];

    let first = extract_descriptors(std::slice::from_ref(&control));
    let second = extract_descriptors(std::slice::from_ref(&control));

    assert!(first[0].id.starts_with('_'));
    assert_eq!(first[0].id, second[0].id, "same structural path, same id");
    assert_eq!(first[0].id, synthetic_id(&first[0].selector, FieldKind::Text));
}

#[test]
fn ids_are_unique_within_a_scan() {
    let mut a = raw_control("input", Some("text"));
    a.id = Some("dup".into());
    let mut b = raw_control("input", Some("text"));
    b.id = Some("dup".into());
    let mut c = raw_control("input", Some("text"));
    c.id = Some("dup".into());

    let descriptors = extract_descriptors(&[a, b, c]);
    assert_eq!(descriptors[0].id, "dup");
    assert_eq!(descriptors[1].id, "dup-2");
    assert_eq!(descriptors[2].id, "dup-3");
}
