use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::plan::cycle::CycleStage;

/// One JSONL trace record per cycle-stage transition.
#[derive(Debug, Serialize)]
pub struct CycleEvent {
    pub timestamp_ms: u128,
    pub stage: String,

    pub fields_detected: Option<usize>,
    pub plan_size: Option<usize>,
    pub filled: Option<u32>,

    pub detail: Option<String>,
    pub error: Option<String>,
}

impl CycleEvent {
    pub fn now(stage: CycleStage) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_millis(),
            stage: stage.as_str().to_string(),
            fields_detected: None,
            plan_size: None,
            filled: None,
            detail: None,
            error: None,
        }
    }

    pub fn with_fields(mut self, count: usize) -> Self {
        self.fields_detected = Some(count);
        self
    }

    pub fn with_plan_size(mut self, size: usize) -> Self {
        self.plan_size = Some(size);
        self
    }

    pub fn with_filled(mut self, count: u32) -> Self {
        self.filled = Some(count);
        self
    }

    pub fn with_detail(mut self, detail: impl ToString) -> Self {
        self.detail = Some(detail.to_string());
        self
    }

    pub fn with_error(mut self, error: impl ToString) -> Self {
        self.error = Some(error.to_string());
        self
    }
}
