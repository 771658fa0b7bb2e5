use std::fs;

use form_autofill::plan::cycle::CycleStage;
use form_autofill::trace::logger::TraceLogger;
use form_autofill::trace::trace::CycleEvent;

fn temp_trace_path(tag: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("fill_trace_{}_{}.jsonl", tag, std::process::id()))
}

#[test]
fn events_are_appended_as_jsonl() {
    let path = temp_trace_path("append");
    let _ = fs::remove_file(&path);

    let logger = TraceLogger::new(path.to_str().unwrap());
    logger.log(&CycleEvent::now(CycleStage::Scanned).with_fields(3));
    logger.log(&CycleEvent::now(CycleStage::Planned).with_plan_size(2));
    drop(logger);

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);

    let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(first["stage"], "scanned");
    assert_eq!(first["fields_detected"], 3);

    let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
    assert_eq!(second["stage"], "planned");
    assert_eq!(second["plan_size"], 2);

    let _ = fs::remove_file(&path);
}

#[test]
fn disabled_logger_writes_nothing() {
    // No path, no file; logging is a no-op rather than an error.
    let logger = TraceLogger::disabled();
    logger.log(&CycleEvent::now(CycleStage::Failed).with_error("boom"));
}

#[test]
fn failure_events_carry_the_error_text() {
    let path = temp_trace_path("failure");
    let _ = fs::remove_file(&path);

    let logger = TraceLogger::new(path.to_str().unwrap());
    logger.log(&CycleEvent::now(CycleStage::Failed).with_error("Page not ready after 5000ms"));
    drop(logger);

    let content = fs::read_to_string(&path).unwrap();
    let event: serde_json::Value = serde_json::from_str(content.trim()).unwrap();
    assert_eq!(event["stage"], "failed");
    assert_eq!(event["error"], "Page not ready after 5000ms");
    assert!(event["timestamp_ms"].as_u64().is_some());

    let _ = fs::remove_file(&path);
}
