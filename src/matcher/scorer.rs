use crate::field::field_model::FieldDescriptor;

/// Per-attribute weights for the substring scorer.
pub const WEIGHT_LABEL: u32 = 3;
pub const WEIGHT_PLACEHOLDER: u32 = 2;
pub const WEIGHT_ACCESSIBLE_NAME: u32 = 2;
pub const WEIGHT_ID_NAME: u32 = 1;
pub const WEIGHT_SURROUNDING_TEXT: u32 = 1;

/// Weighted affinity between a descriptor and a candidate profile key.
///
/// Each signal is a case-folded substring containment test of the key
/// against one descriptor attribute. Weights are additive and uncapped.
/// The id/name signal counts once even if both the id and the name
/// attribute match.
pub fn match_score(descriptor: &FieldDescriptor, candidate_key: &str) -> u32 {
    let key = candidate_key.trim().to_lowercase();
    if key.is_empty() {
        return 0;
    }

    let mut score = 0;

    if contains(&descriptor.label, &key) {
        score += WEIGHT_LABEL;
    }
    if contains(&descriptor.placeholder, &key) {
        score += WEIGHT_PLACEHOLDER;
    }
    if contains(&descriptor.accessible_name, &key) {
        score += WEIGHT_ACCESSIBLE_NAME;
    }

    let name_attr = descriptor.attributes.get("name").map(String::as_str);
    if contains(&descriptor.id, &key) || name_attr.is_some_and(|n| contains(n, &key)) {
        score += WEIGHT_ID_NAME;
    }

    if contains(&descriptor.surrounding_text, &key) {
        score += WEIGHT_SURROUNDING_TEXT;
    }

    score
}

fn contains(attribute: &str, key_lower: &str) -> bool {
    !attribute.is_empty() && attribute.to_lowercase().contains(key_lower)
}
