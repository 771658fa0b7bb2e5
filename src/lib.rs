use crate::analyzer::analyzer::FieldAnalyzer;
use crate::error::FillError;
use crate::field::extractor::extract_descriptors;
use crate::matcher::confidence::ConfidenceMode;
use crate::matcher::profile::Profile;
use crate::page::session::PageDriver;
use crate::plan::cycle::{CycleStage, FillCycle};
use crate::plan::plan_model::FillPlan;
use crate::trace::{logger::TraceLogger, trace::CycleEvent};

pub mod analyzer;
pub mod cli;
pub mod error;
pub mod field;
pub mod matcher;
pub mod page;
pub mod plan;
pub mod trace;

/// Read-only inputs for one fill cycle. Passed explicitly into the
/// entry points; nothing here is global or mutated mid-cycle.
#[derive(Debug, Clone)]
pub struct FillContext {
    pub profile: Profile,
    pub confidence_mode: ConfidenceMode,
}

/// What a completed cycle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillSummary {
    pub fields_detected: usize,
    pub planned: usize,
    pub filled: u32,
}

/// Drive one full fill cycle: wait for page readiness, scan, analyze,
/// build the plan, write values back.
///
/// All-or-nothing: any failure marks the cycle FAILED, is traced, and
/// leaves the page untouched. A request while a prior cycle is in
/// flight fails with `CycleInProgress` without disturbing it.
pub fn run_fill_cycle(
    cycle: &mut FillCycle,
    ctx: &FillContext,
    session: &mut dyn PageDriver,
    analyzer: &dyn FieldAnalyzer,
    tracer: &TraceLogger,
) -> Result<FillSummary, FillError> {
    cycle.start()?;

    match drive_to_filled(cycle, ctx, session, analyzer, tracer) {
        Ok(summary) => Ok(summary),
        Err(e) => {
            cycle.fail();
            tracer.log(&CycleEvent::now(CycleStage::Failed).with_error(&e));
            Err(e)
        }
    }
}

/// Dry run: everything up to the plan, nothing written to the page.
/// The cycle is closed afterwards so a new request can start.
pub fn plan_fill(
    cycle: &mut FillCycle,
    ctx: &FillContext,
    session: &mut dyn PageDriver,
    analyzer: &dyn FieldAnalyzer,
    tracer: &TraceLogger,
) -> Result<FillPlan, FillError> {
    cycle.start()?;

    match drive_to_planned(cycle, ctx, session, analyzer, tracer) {
        Ok(plan) => {
            cycle.close();
            Ok(plan)
        }
        Err(e) => {
            cycle.fail();
            tracer.log(&CycleEvent::now(CycleStage::Failed).with_error(&e));
            Err(e)
        }
    }
}

fn drive_to_planned(
    cycle: &mut FillCycle,
    ctx: &FillContext,
    session: &mut dyn PageDriver,
    analyzer: &dyn FieldAnalyzer,
    tracer: &TraceLogger,
) -> Result<FillPlan, FillError> {
    session.wait_ready()?;

    let raw = session.scan()?;
    let descriptors = extract_descriptors(&raw);
    cycle.record_scan(descriptors)?;
    tracer.log(&CycleEvent::now(CycleStage::Scanned).with_fields(cycle.descriptors().len()));

    let analysis = analyzer.analyze(cycle.descriptors(), &ctx.profile)?;
    cycle.record_analysis(analysis)?;
    tracer.log(&CycleEvent::now(CycleStage::Analyzed));

    let plan = cycle.build_plan(&ctx.profile)?.clone();
    tracer.log(&CycleEvent::now(CycleStage::Planned).with_plan_size(plan.len()));

    Ok(plan)
}

fn drive_to_filled(
    cycle: &mut FillCycle,
    ctx: &FillContext,
    session: &mut dyn PageDriver,
    analyzer: &dyn FieldAnalyzer,
    tracer: &TraceLogger,
) -> Result<FillSummary, FillError> {
    let plan = drive_to_planned(cycle, ctx, session, analyzer, tracer)?;

    let instructions = cycle.fill_instructions();
    let filled = session.fill(instructions)?;
    cycle.mark_filled()?;
    tracer.log(&CycleEvent::now(CycleStage::Filled).with_filled(filled));

    Ok(FillSummary {
        fields_detected: cycle.descriptors().len(),
        planned: plan.len(),
        filled,
    })
}
