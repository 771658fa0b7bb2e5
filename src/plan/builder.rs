use crate::matcher::profile::Profile;
use crate::plan::plan_model::{FILL_THRESHOLD, FillPlan, PurposeAssignment};

/// Combine purpose assignments with the user profile into a fill plan.
///
/// For each assignment at or above the fill threshold, the first
/// profile entry (in profile order) whose key is a case-folded
/// substring of the purpose label contributes its value. At most one
/// entry per field; fields with no qualifying match are silently
/// omitted. Pure: inputs are not mutated, identical inputs yield an
/// identical plan.
pub fn build_plan(assignments: &[PurposeAssignment], profile: &Profile) -> FillPlan {
    let mut plan = FillPlan::new();

    for assignment in assignments {
        if assignment.confidence < FILL_THRESHOLD {
            continue;
        }

        let purpose = assignment.purpose.to_lowercase();
        let matched = profile.entries().iter().find(|entry| {
            let key = entry.key.trim().to_lowercase();
            !key.is_empty() && purpose.contains(&key)
        });

        if let Some(entry) = matched {
            plan.insert(assignment.field_id.clone(), entry.value.clone());
        }
    }

    plan
}
