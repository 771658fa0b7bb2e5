use std::collections::HashSet;

use crate::error::FillError;
use crate::field::field_model::FieldDescriptor;
use crate::matcher::profile::Profile;
use crate::plan::builder::build_plan;
use crate::plan::plan_model::{Analysis, FillInstruction, FillPlan};

/// Stages of one fill cycle. Each stage is one-shot; a new
/// user-initiated request restarts from Idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleStage {
    Idle,
    Scanned,
    Analyzed,
    Planned,
    Filled,
    Failed,
}

impl CycleStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            CycleStage::Idle => "idle",
            CycleStage::Scanned => "scanned",
            CycleStage::Analyzed => "analyzed",
            CycleStage::Planned => "planned",
            CycleStage::Filled => "filled",
            CycleStage::Failed => "failed",
        }
    }

    /// A cycle is in flight between SCANNED and PLANNED; starting a
    /// new one then must be rejected.
    pub fn in_flight(&self) -> bool {
        matches!(
            self,
            CycleStage::Scanned | CycleStage::Analyzed | CycleStage::Planned
        )
    }
}

/// Owns the per-cycle data: descriptors from the scan, the analysis
/// outcome, and the final plan. Each cycle gets fresh instances; the
/// profile stays read-only throughout.
#[derive(Debug)]
pub struct FillCycle {
    stage: CycleStage,
    descriptors: Vec<FieldDescriptor>,
    analysis: Option<Analysis>,
    plan: Option<FillPlan>,
}

impl Default for FillCycle {
    fn default() -> Self {
        Self::new()
    }
}

impl FillCycle {
    pub fn new() -> Self {
        Self {
            stage: CycleStage::Idle,
            descriptors: Vec::new(),
            analysis: None,
            plan: None,
        }
    }

    pub fn stage(&self) -> CycleStage {
        self.stage
    }

    pub fn descriptors(&self) -> &[FieldDescriptor] {
        &self.descriptors
    }

    pub fn plan(&self) -> Option<&FillPlan> {
        self.plan.as_ref()
    }

    /// Begin a new cycle. Rejected while a prior cycle is in flight;
    /// terminal stages (Filled, Failed) reset back to Idle.
    pub fn start(&mut self) -> Result<(), FillError> {
        if self.stage.in_flight() {
            return Err(FillError::CycleInProgress {
                stage: self.stage.as_str().to_string(),
            });
        }
        self.stage = CycleStage::Idle;
        self.descriptors.clear();
        self.analysis = None;
        self.plan = None;
        Ok(())
    }

    /// Idle → Scanned.
    pub fn record_scan(&mut self, descriptors: Vec<FieldDescriptor>) -> Result<(), FillError> {
        self.expect(CycleStage::Idle)?;
        self.descriptors = descriptors;
        self.stage = CycleStage::Scanned;
        Ok(())
    }

    /// Scanned → Analyzed.
    pub fn record_analysis(&mut self, analysis: Analysis) -> Result<(), FillError> {
        self.expect(CycleStage::Scanned)?;
        self.analysis = Some(analysis);
        self.stage = CycleStage::Analyzed;
        Ok(())
    }

    /// Analyzed → Planned. Purposes are matched against the profile;
    /// Direct plans pass through. Either way, entries whose field id
    /// was not seen in this scan are dropped.
    pub fn build_plan(&mut self, profile: &Profile) -> Result<&FillPlan, FillError> {
        self.expect(CycleStage::Analyzed)?;

        let analysis = self.analysis.take().ok_or_else(|| FillError::InvalidStage {
            expected: "analysis present".to_string(),
            actual: "analysis missing".to_string(),
        })?;

        let mut plan = match analysis {
            Analysis::Purposes(assignments) => build_plan(&assignments, profile),
            Analysis::Direct(plan) => plan,
        };

        let known: HashSet<&str> = self.descriptors.iter().map(|d| d.id.as_str()).collect();
        plan.retain_fields(|id| known.contains(id));

        self.plan = Some(plan);
        self.stage = CycleStage::Planned;
        Ok(self.plan.as_ref().unwrap())
    }

    /// Join the plan with descriptor selectors for the filling
    /// collaborator.
    pub fn fill_instructions(&self) -> Vec<FillInstruction> {
        let Some(plan) = &self.plan else {
            return Vec::new();
        };

        self.descriptors
            .iter()
            .filter_map(|descriptor| {
                plan.get(&descriptor.id).map(|value| FillInstruction {
                    field_id: descriptor.id.clone(),
                    selector: descriptor.selector.clone(),
                    value: value.to_string(),
                })
            })
            .collect()
    }

    /// Planned → Filled.
    pub fn mark_filled(&mut self) -> Result<(), FillError> {
        self.expect(CycleStage::Planned)?;
        self.stage = CycleStage::Filled;
        Ok(())
    }

    /// Any stage → Failed (terminal).
    pub fn fail(&mut self) {
        self.stage = CycleStage::Failed;
    }

    /// Discard an in-flight cycle deliberately (dry run finished, user
    /// cancelled). The next request starts fresh from Idle.
    pub fn close(&mut self) {
        self.stage = CycleStage::Idle;
    }

    fn expect(&self, expected: CycleStage) -> Result<(), FillError> {
        if self.stage == expected {
            Ok(())
        } else {
            Err(FillError::InvalidStage {
                expected: expected.as_str().to_string(),
                actual: self.stage.as_str().to_string(),
            })
        }
    }
}
