use std::collections::BTreeMap;

use serde::Serialize;

/// Fill threshold: minimum confidence an assignment needs before its
/// profile value is written into the page. Boundary inclusive.
pub const FILL_THRESHOLD: f32 = 0.6;

/// A purpose assigned to one field, heuristically or by the model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurposeAssignment {
    #[serde(rename = "fieldId")]
    pub field_id: String,
    pub purpose: String,
    /// Normalized to [0,1].
    pub confidence: f32,
}

/// Final field-id → value mapping. Only entries that passed the
/// admission gate are present; iteration order is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FillPlan {
    entries: BTreeMap<String, String>,
}

impl FillPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field_id: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(field_id.into(), value.into());
    }

    pub fn get(&self, field_id: &str) -> Option<&str> {
        self.entries.get(field_id).map(String::as_str)
    }

    pub fn contains(&self, field_id: &str) -> bool {
        self.entries.contains_key(field_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Drop entries whose field id fails the predicate. Used to
    /// enforce the invariant that every plan key was seen in the
    /// current scan.
    pub fn retain_fields(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.entries.retain(|k, _| keep(k));
    }
}

impl FromIterator<(String, String)> for FillPlan {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Outcome of the analysis stage.
#[derive(Debug, Clone)]
pub enum Analysis {
    /// Purpose labels per field; values still need profile matching.
    Purposes(Vec<PurposeAssignment>),
    /// Values already resolved against the profile (heuristic path,
    /// score gate applied).
    Direct(FillPlan),
}

/// One plan entry joined with its descriptor's selector, ready for the
/// filling collaborator. Keyed by native id where present, selector as
/// the relocation fallback.
#[derive(Debug, Clone, Serialize)]
pub struct FillInstruction {
    #[serde(rename = "fieldId")]
    pub field_id: String,
    pub selector: String,
    pub value: String,
}
