use std::collections::HashMap;

use crate::error::FillError;
use crate::field::field_model::FieldDescriptor;
use crate::matcher::confidence::{ConfidenceMode, estimate};
use crate::matcher::profile::Profile;
use crate::matcher::resolver::resolve;
use crate::plan::plan_model::{Analysis, FillPlan, PurposeAssignment};

/// Turns a scan's descriptors into an analysis outcome: purpose labels
/// to be matched against the profile, or directly resolved values.
pub trait FieldAnalyzer {
    fn analyze(
        &self,
        descriptors: &[FieldDescriptor],
        profile: &Profile,
    ) -> Result<Analysis, FillError>;
}

/// Convert a model-produced field-id → purpose map into assignments
/// with estimated confidences. Unknown field ids get vocabulary-mode
/// confidence since no descriptor context exists for them.
pub fn assignments_from_purposes(
    purposes: HashMap<String, String>,
    descriptors: &[FieldDescriptor],
    mode: ConfidenceMode,
) -> Vec<PurposeAssignment> {
    let mut assignments: Vec<PurposeAssignment> = purposes
        .into_iter()
        .map(|(field_id, purpose)| {
            let descriptor = descriptors.iter().find(|d| d.id == field_id);
            let confidence = estimate(mode, &purpose, descriptor).clamp(0.0, 1.0);
            PurposeAssignment {
                field_id,
                purpose,
                confidence,
            }
        })
        .collect();

    // Deterministic output regardless of map iteration order.
    assignments.sort_by(|a, b| a.field_id.cmp(&b.field_id));
    assignments
}

// ============================================================================
// HeuristicAnalyzer — pure resolver over the profile, no network
// ============================================================================

/// Offline analyzer: scores every profile key against each descriptor
/// and emits a direct plan from the admitted candidates. The score
/// gate (admission threshold) replaces the confidence gate on this
/// path.
pub struct HeuristicAnalyzer;

impl FieldAnalyzer for HeuristicAnalyzer {
    fn analyze(
        &self,
        descriptors: &[FieldDescriptor],
        profile: &Profile,
    ) -> Result<Analysis, FillError> {
        let mut plan = FillPlan::new();

        for descriptor in descriptors {
            if let Some(candidate) = resolve(descriptor, profile) {
                plan.insert(descriptor.id.clone(), candidate.value);
            }
        }

        Ok(Analysis::Direct(plan))
    }
}

// ============================================================================
// MockAnalyzer — canned purposes (for testing without the API)
// ============================================================================

pub struct MockAnalyzer {
    pub purposes: HashMap<String, String>,
    pub mode: ConfidenceMode,
}

impl MockAnalyzer {
    pub fn new(purposes: HashMap<String, String>, mode: ConfidenceMode) -> Self {
        Self { purposes, mode }
    }
}

impl FieldAnalyzer for MockAnalyzer {
    fn analyze(
        &self,
        descriptors: &[FieldDescriptor],
        _profile: &Profile,
    ) -> Result<Analysis, FillError> {
        Ok(Analysis::Purposes(assignments_from_purposes(
            self.purposes.clone(),
            descriptors,
            self.mode,
        )))
    }
}
