use serde::{Deserialize, Serialize};

use crate::field::field_model::FieldDescriptor;

/// Base confidence every attribute-overlap estimate starts from.
pub const BASE_CONFIDENCE: f32 = 0.2;

pub const BONUS_LABEL: f32 = 0.3;
pub const BONUS_PLACEHOLDER: f32 = 0.2;
pub const BONUS_ACCESSIBLE_NAME: f32 = 0.2;
pub const BONUS_SURROUNDING_TEXT: f32 = 0.1;

/// Vocabulary-mode confidences.
pub const VOCABULARY_HIT_CONFIDENCE: f32 = 0.8;
pub const VOCABULARY_MISS_CONFIDENCE: f32 = 0.6;

/// Common field purposes, bilingual. A purpose label containing any of
/// these is considered well-known in vocabulary mode.
const COMMON_FIELD_TERMS: [&str; 11] = [
    "姓",
    "名",
    "メールアドレス",
    "電話番号",
    "住所",
    "郵便番号",
    "name",
    "email",
    "phone",
    "address",
    "postal",
];

/// How purpose confidence is estimated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConfidenceMode {
    /// Overlap of the purpose label with descriptor attributes.
    /// Strictly more informative; the default when a descriptor exists.
    #[default]
    AttributeOverlap,
    /// Fixed confidence from a known-purpose vocabulary; usable when
    /// only the label is available.
    Vocabulary,
}

/// Estimate confidence in [0,1] for a purpose label.
///
/// Attribute-overlap mode needs a descriptor; without one it degrades
/// to vocabulary mode.
pub fn estimate(
    mode: ConfidenceMode,
    purpose: &str,
    descriptor: Option<&FieldDescriptor>,
) -> f32 {
    match (mode, descriptor) {
        (ConfidenceMode::AttributeOverlap, Some(descriptor)) => {
            attribute_overlap(purpose, descriptor)
        }
        _ => vocabulary(purpose),
    }
}

/// Base 0.2 plus a bonus per attribute containing the purpose label,
/// capped at 1.0.
pub fn attribute_overlap(purpose: &str, descriptor: &FieldDescriptor) -> f32 {
    let purpose_lower = purpose.trim().to_lowercase();
    if purpose_lower.is_empty() {
        return BASE_CONFIDENCE;
    }

    let mut score = 0.0;

    if contains(&descriptor.label, &purpose_lower) {
        score += BONUS_LABEL;
    }
    if contains(&descriptor.placeholder, &purpose_lower) {
        score += BONUS_PLACEHOLDER;
    }
    if contains(&descriptor.accessible_name, &purpose_lower) {
        score += BONUS_ACCESSIBLE_NAME;
    }
    if contains(&descriptor.surrounding_text, &purpose_lower) {
        score += BONUS_SURROUNDING_TEXT;
    }

    (score + BASE_CONFIDENCE).min(1.0)
}

/// 0.8 when the purpose names a common field, else 0.6.
pub fn vocabulary(purpose: &str) -> f32 {
    let purpose_lower = purpose.to_lowercase();
    let known = COMMON_FIELD_TERMS
        .iter()
        .any(|term| purpose_lower.contains(&term.to_lowercase()));

    if known {
        VOCABULARY_HIT_CONFIDENCE
    } else {
        VOCABULARY_MISS_CONFIDENCE
    }
}

fn contains(attribute: &str, purpose_lower: &str) -> bool {
    !attribute.is_empty() && attribute.to_lowercase().contains(purpose_lower)
}
