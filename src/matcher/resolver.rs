use crate::field::field_model::FieldDescriptor;
use crate::matcher::profile::Profile;
use crate::matcher::scorer::match_score;

/// Minimum score a winning key needs to be admitted.
pub const ADMISSION_THRESHOLD: u32 = 2;

/// Fixed score of a synthesized composite full-name candidate. Chosen
/// to outrank any ordinary single-key match of 4 or less.
pub const COMPOSITE_NAME_SCORE: u32 = 5;

/// Label/placeholder indicators of a combined full-name field. The
/// Japanese terms match as substrings; the English ones are matched on
/// word boundaries, and bare "name" only when it is the whole label,
/// so "username" and "company name" never trigger the composite rule.
const NAME_INDICATORS_JA: [&str; 3] = ["氏名", "お名前", "名前"];

/// Profile keys recognized as the surname part. The original default
/// profile used 性, so it is accepted alongside 姓.
const SURNAME_KEYS: [&str; 5] = ["姓", "性", "surname", "last name", "family name"];

/// Profile keys recognized as the given-name part.
const GIVEN_NAME_KEYS: [&str; 3] = ["名", "first name", "given name"];

/// A candidate match for one field: the profile key that won, its
/// score, and the value the field would be filled with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchCandidate {
    pub key: String,
    pub score: u32,
    pub value: String,
}

/// Pick the best profile key for a descriptor, or None if nothing
/// clears the admission threshold.
///
/// The composite full-name rule is checked first: a field labeled as a
/// combined name, against a profile storing surname and given name
/// separately, resolves to the concatenation of both parts and
/// outranks any single-key match. Otherwise every profile key is
/// scored and the strictly greatest score wins, with profile order as
/// the tie-break.
pub fn resolve(descriptor: &FieldDescriptor, profile: &Profile) -> Option<MatchCandidate> {
    if let Some(composite) = composite_name_candidate(descriptor, profile) {
        return Some(composite);
    }

    let mut best: Option<MatchCandidate> = None;
    let mut best_score = 0;

    for entry in profile.entries() {
        let score = match_score(descriptor, &entry.key);
        if score > best_score {
            best_score = score;
            best = Some(MatchCandidate {
                key: entry.key.clone(),
                score,
                value: entry.value.clone(),
            });
        }
    }

    best.filter(|c| c.score >= ADMISSION_THRESHOLD)
}

/// Composite rule for single combined-name fields: label or
/// placeholder carries a name indicator, and the profile holds
/// non-empty surname and given-name parts under known keys.
fn composite_name_candidate(
    descriptor: &FieldDescriptor,
    profile: &Profile,
) -> Option<MatchCandidate> {
    let label = descriptor.label.to_lowercase();
    let placeholder = descriptor.placeholder.to_lowercase();

    if !is_name_indicated(&label) && !is_name_indicated(&placeholder) {
        return None;
    }

    let surname = lookup_any(profile, &SURNAME_KEYS)?;
    let given = lookup_any(profile, &GIVEN_NAME_KEYS)?;

    Some(MatchCandidate {
        key: "氏名".to_string(),
        score: COMPOSITE_NAME_SCORE,
        value: format!("{}{}", surname, given),
    })
}

/// True when `text` (already lowercased) names a combined full-name
/// field.
fn is_name_indicated(text: &str) -> bool {
    NAME_INDICATORS_JA.iter().any(|hint| text.contains(hint))
        || contains_word(text, "full name")
        || text.trim() == "name"
}

/// `needle` occurs in `haystack` with no ASCII alphanumeric directly
/// adjacent on either side.
fn contains_word(haystack: &str, needle: &str) -> bool {
    let mut from = 0;
    while let Some(pos) = haystack[from..].find(needle) {
        let begin = from + pos;
        let end = begin + needle.len();

        let clear_before = haystack[..begin]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_ascii_alphanumeric());
        let clear_after = haystack[end..]
            .chars()
            .next()
            .is_none_or(|c| !c.is_ascii_alphanumeric());
        if clear_before && clear_after {
            return true;
        }
        from = end;
    }
    false
}

/// First non-empty value among entries whose key exactly matches one
/// of `keys` (trimmed, case-folded). Exact equality, not substring:
/// 名 must not collide with 氏名.
fn lookup_any<'a>(profile: &'a Profile, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|k| profile.value_for_key(k))
        .find(|v| !v.trim().is_empty())
}
