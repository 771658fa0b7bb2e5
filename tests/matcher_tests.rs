use form_autofill::matcher::profile::{MAX_PROFILE_ENTRIES, Profile, ProfileEntry};
use form_autofill::matcher::resolver::{ADMISSION_THRESHOLD, COMPOSITE_NAME_SCORE, resolve};
use form_autofill::matcher::scorer::match_score;

use crate::common::fixtures::{descriptor, descriptor_full};

mod common;

// =========================================================================
// Scorer weights
// =========================================================================

#[test]
fn label_match_scores_three() {
    let d = descriptor("f1", "メールアドレスを入力");
    assert_eq!(match_score(&d, "メールアドレス"), 3);
}

#[test]
fn label_and_placeholder_score_five() {
    let d = descriptor_full("f1", "Email address", "email here", "", "");
    assert_eq!(match_score(&d, "email"), 5);
}

#[test]
fn all_signals_sum_uncapped() {
    let mut d = descriptor_full(
        "email_field",
        "Email address",
        "your email",
        "email input",
        "enter your email below",
    );
    d.attributes.insert("name".into(), "email".into());

    // 3 + 2 + 2 + 1 + 1; id and name together still count once.
    assert_eq!(match_score(&d, "email"), 9);
}

#[test]
fn matching_is_case_folded() {
    let d = descriptor("f1", "EMAIL ADDRESS");
    assert_eq!(match_score(&d, "Email"), 3);
}

#[test]
fn key_is_matched_into_attributes_not_the_reverse() {
    // The attribute being a substring of the key scores nothing.
    let d = descriptor("f1", "mail");
    assert_eq!(match_score(&d, "メールアドレス mail address"), 0);
}

#[test]
fn missing_attributes_contribute_zero() {
    let d = descriptor("f1", "");
    assert_eq!(match_score(&d, "email"), 0);
    assert_eq!(match_score(&d, ""), 0);
}

#[test]
fn name_attribute_alone_scores_one() {
    let mut d = descriptor("f1", "無関係なラベル");
    d.attributes.insert("name".into(), "user_email".into());
    assert_eq!(match_score(&d, "email"), 1);
}

// =========================================================================
// Resolver admission threshold
// =========================================================================

#[test]
fn score_one_is_rejected() {
    // id-only match: score 1, below the admission threshold of 2.
    let d = descriptor_full("mail-1", "お問い合わせ内容", "", "", "");
    let profile = Profile::from_entries([ProfileEntry::new("mail", "a@b.com")]);

    assert_eq!(match_score(&d, "mail"), 1);
    assert!(resolve(&d, &profile).is_none());
}

#[test]
fn score_two_is_admitted() {
    // placeholder-only match: score exactly 2.
    let d = descriptor_full("f1", "お問い合わせ内容", "email", "", "");
    let profile = Profile::from_entries([ProfileEntry::new("email", "a@b.com")]);

    let candidate = resolve(&d, &profile).expect("score 2 clears the threshold");
    assert_eq!(candidate.score, ADMISSION_THRESHOLD);
    assert_eq!(candidate.key, "email");
    assert_eq!(candidate.value, "a@b.com");
}

#[test]
fn best_score_wins() {
    let d = descriptor_full("f1", "電話番号", "phone", "", "");
    let profile = Profile::from_entries([
        ProfileEntry::new("phone", "555-0100"),
        ProfileEntry::new("電話番号", "03-1234-5678"),
    ]);

    // "phone" scores 2 (placeholder), "電話番号" scores 3 (label).
    let candidate = resolve(&d, &profile).unwrap();
    assert_eq!(candidate.key, "電話番号");
    assert_eq!(candidate.value, "03-1234-5678");
}

#[test]
fn ties_break_to_profile_order() {
    // Both keys hit the label only: score 3 each.
    let d = descriptor("f1", "email or phone");
    let profile = Profile::from_entries([
        ProfileEntry::new("phone", "555-0100"),
        ProfileEntry::new("email", "a@b.com"),
    ]);

    let candidate = resolve(&d, &profile).unwrap();
    assert_eq!(candidate.key, "phone", "first-seen wins on ties");
}

#[test]
fn empty_profile_resolves_to_none() {
    let d = descriptor("f1", "メールアドレス");
    assert!(resolve(&d, &Profile::new()).is_none());
}

// =========================================================================
// Composite full-name rule
// =========================================================================

#[test]
fn combined_name_field_gets_concatenated_parts() {
    let d = descriptor("f1", "お名前");
    let profile = Profile::from_entries([
        ProfileEntry::new("性", "山田"),
        ProfileEntry::new("名", "太郎"),
    ]);

    let candidate = resolve(&d, &profile).unwrap();
    assert_eq!(candidate.value, "山田太郎");
    assert_eq!(candidate.score, COMPOSITE_NAME_SCORE);
}

#[test]
fn composite_outranks_single_key_matches() {
    // 名 alone would hit the label (お名前 contains 名) for score 3;
    // the composite path takes precedence.
    let d = descriptor_full("f1", "お名前", "名前を入力", "", "");
    let profile = Profile::from_entries([
        ProfileEntry::new("名", "太郎"),
        ProfileEntry::new("姓", "山田"),
    ]);

    let candidate = resolve(&d, &profile).unwrap();
    assert_eq!(candidate.value, "山田太郎");
    assert_eq!(candidate.score, 5);
}

#[test]
fn composite_triggers_on_placeholder_too() {
    let d = descriptor_full("f1", "", "full name", "", "");
    let profile = Profile::from_entries([
        ProfileEntry::new("surname", "Yamada"),
        ProfileEntry::new("first name", "Taro"),
    ]);

    assert_eq!(resolve(&d, &profile).unwrap().value, "YamadaTaro");
}

#[test]
fn bare_name_label_triggers_the_composite() {
    let d = descriptor("f1", "  Name  ");
    let profile = Profile::from_entries([
        ProfileEntry::new("surname", "Yamada"),
        ProfileEntry::new("first name", "Taro"),
    ]);

    assert_eq!(resolve(&d, &profile).unwrap().value, "YamadaTaro");
}

#[test]
fn full_name_matches_on_word_boundaries() {
    let d = descriptor("f1", "Your Full Name (required)");
    let profile = Profile::from_entries([
        ProfileEntry::new("surname", "Yamada"),
        ProfileEntry::new("first name", "Taro"),
    ]);

    assert_eq!(resolve(&d, &profile).unwrap().value, "YamadaTaro");
}

#[test]
fn non_person_name_fields_never_get_the_composite() {
    let profile = Profile::from_entries([
        ProfileEntry::new("surname", "Yamada"),
        ProfileEntry::new("first name", "Taro"),
    ]);

    // "name" embedded in a larger word or phrase is not a full-name
    // field; with no ordinary key match either, these stay unfilled.
    for label in ["Username", "Company Name", "Nickname", "hostname"] {
        let d = descriptor("f1", label);
        assert!(resolve(&d, &profile).is_none(), "label={}", label);
    }
}

#[test]
fn composite_needs_both_parts_non_empty() {
    let d = descriptor("f1", "お名前");
    let profile = Profile::from_entries([
        ProfileEntry::new("性", "山田"),
        ProfileEntry::new("名", ""),
    ]);

    // Falls back to ordinary scoring: 名 hits the label, score 3.
    let candidate = resolve(&d, &profile).unwrap();
    assert_eq!(candidate.key, "名");
}

#[test]
fn name_part_keys_are_matched_exactly() {
    // A profile key of 氏名 is not a surname/given-name part; no
    // composite is synthesized from it.
    let d = descriptor("f1", "氏名");
    let profile = Profile::from_entries([ProfileEntry::new("氏名", "山田太郎")]);

    let candidate = resolve(&d, &profile).unwrap();
    assert_eq!(candidate.key, "氏名");
    assert_eq!(candidate.score, 3, "ordinary label match, not composite");
}

// =========================================================================
// Profile semantics
// =========================================================================

#[test]
fn key_collisions_resolve_to_last_writer() {
    let profile = Profile::from_entries([
        ProfileEntry::new("email", "old@b.com"),
        ProfileEntry::new("phone", "555-0100"),
        ProfileEntry::new("email", "new@b.com"),
    ]);

    assert_eq!(profile.len(), 2);
    assert_eq!(profile.value_for_key("email"), Some("new@b.com"));
    assert_eq!(profile.entries()[0].key, "email", "position of first write kept");
}

#[test]
fn profile_is_capped() {
    let profile = Profile::from_entries(
        (0..30).map(|i| ProfileEntry::new(format!("key{}", i), format!("v{}", i))),
    );
    assert_eq!(profile.len(), MAX_PROFILE_ENTRIES);
}

#[test]
fn default_template_has_the_original_keys() {
    let profile = Profile::default_template();
    assert_eq!(profile.len(), 8);
    assert_eq!(profile.entries()[0].key, "性");
    assert!(profile.value_for_key("メールアドレス").is_some());
}
