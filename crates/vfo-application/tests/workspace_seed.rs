use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use tempfile::TempDir;
use vfo_application::{DispatchOutcome, Workspace};
use vfo_core::config::AppConfig;
use vfo_core::store::KeyValueStore;
use vfo_infrastructure::{ConfigService, JsonFileStore, MemoryStore};

fn memory_workspace() -> Workspace {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    Workspace::new(AppConfig::default(), store)
}

#[test]
fn test_seed_twice_adds_nothing_the_second_time() {
    let ws = memory_workspace();

    let first = ws.init().unwrap().unwrap();
    assert_eq!(first.bookings, 3);
    assert!(first.templates > 0);
    assert!(first.rules > 0);

    let counts = |ws: &Workspace| {
        (
            ws.records.list().unwrap().len(),
            ws.templates.list().unwrap().len(),
            ws.sequences.list().unwrap().len(),
            ws.rules.list().unwrap().len(),
        )
    };
    let after_first = counts(&ws);

    let second = ws.seed().unwrap();
    assert_eq!(second.inserted(), 0);
    assert_eq!(counts(&ws), after_first);
}

#[test]
fn test_seed_keeps_user_edits() {
    let ws = memory_workspace();
    ws.seed().unwrap();

    let mut welcome = ws.templates.get("welcome").unwrap().unwrap();
    welcome.subject = "Edited".to_string();
    ws.templates.upsert(welcome).unwrap();
    ws.rules.delete("rule-booked-welcome").unwrap();

    ws.seed().unwrap();
    assert_eq!(ws.templates.get("welcome").unwrap().unwrap().subject, "Edited");
    // deleted seeded records come back only because their ids are free again
    assert!(ws.rules.list().unwrap().iter().any(|r| r.id == "rule-booked-welcome"));
}

#[test]
fn test_seeded_bookings_land_in_kanban_columns() {
    let ws = memory_workspace();
    ws.seed().unwrap();

    let columns = ws.pipeline.kanban().unwrap();
    let ids = |key: &str| {
        columns
            .iter()
            .find(|c| c.key == key)
            .map(|c| c.booking_ids.clone())
            .unwrap_or_default()
    };
    assert_eq!(ids("book-consults"), vec!["seed-3"]);
    assert_eq!(ids("pre-engagement"), vec!["seed-1"]);
    assert_eq!(ids("engaged"), vec!["seed-2"]);
    assert!(ids("questionnaire").is_empty());

    assert_eq!(ws.site.get().logo_path.as_deref(), Some("/wy-apt-logo.png"));
}

#[test]
fn test_init_respects_seed_flag() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let config = AppConfig {
        seed_on_init: false,
        ..AppConfig::default()
    };
    let ws = Workspace::new(config, store);
    assert!(ws.init().unwrap().is_none());
    assert!(ws.records.list().unwrap().is_empty());
}

#[test]
fn test_sequence_editing_and_dispatch() {
    let ws = memory_workspace();
    ws.seed().unwrap();
    let seq = "lead-paid-consult";

    let copy = ws.sequences.duplicate_step(seq, "email-welcome").unwrap().unwrap();
    let steps: Vec<String> = ws
        .sequences
        .get(seq)
        .unwrap()
        .unwrap()
        .steps
        .into_iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(steps[0], "email-welcome");
    assert_eq!(steps[1], copy);
    assert_eq!(steps.len(), 4);

    // unlinked email steps do nothing
    let outcome = ws.sequences.dispatch_step(seq, "email-welcome", "seed-1").unwrap();
    assert!(matches!(outcome, DispatchOutcome::Skipped { .. }));

    ws.sequences.link_template(seq, "email-welcome", "welcome").unwrap();
    let outcome = ws.sequences.dispatch_step(seq, "email-welcome", "seed-1").unwrap();
    assert_eq!(
        outcome,
        DispatchOutcome::Sent {
            template_id: "welcome".to_string()
        }
    );
    assert_eq!(ws.activity.outbox().len(), 1);
    assert!(ws.activity.outbox()[0].subject.contains("Jane"));

    // the seeded SMS step starts disabled
    let outcome = ws.sequences.dispatch_step(seq, "sms-nudge", "seed-1").unwrap();
    assert_eq!(
        outcome,
        DispatchOutcome::Skipped {
            reason: "step disabled".to_string()
        }
    );

    ws.sequences.toggle_sequence(seq).unwrap();
    let outcome = ws.sequences.dispatch_step(seq, "email-welcome", "seed-1").unwrap();
    assert!(matches!(outcome, DispatchOutcome::Skipped { .. }));
    assert_eq!(ws.activity.outbox().len(), 1);

    let err = ws.sequences.dispatch_step(seq, "email-welcome", "nobody").unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_plan_uses_label_offsets() {
    let ws = memory_workspace();
    let anchor = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();

    let plan = ws.sequences.plan("lead-paid-consult", anchor).unwrap();
    assert_eq!(plan.len(), 2);
    assert_eq!(plan[0].due_at, Some(anchor));
    assert_eq!(plan[1].due_at, Some(anchor + Duration::days(2)));

    assert!(ws.sequences.plan("missing", anchor).unwrap().is_empty());
}

#[test]
fn test_workspace_persists_across_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    let data_path = temp_dir.path().join("data").join("store.json");
    std::fs::write(
        &config_path,
        format!("data_file = {:?}\nnamespace = \"test_\"\n", data_path.display().to_string()),
    )
    .unwrap();

    let config_service = ConfigService::with_path(config_path.clone());
    let ws = Workspace::open(&config_service).unwrap();
    ws.init().unwrap();
    ws.pipeline.transition("seed-3", "Booked").unwrap();
    drop(ws);

    let reopened = Workspace::open(&ConfigService::with_path(config_path)).unwrap();
    assert_eq!(reopened.records.require("seed-3").unwrap().stage, "Booked");
    assert_eq!(reopened.records.list().unwrap().len(), 3);

    let raw = JsonFileStore::new(data_path, "test_");
    assert!(raw.keys().unwrap().contains(&"bookings".to_string()));
}
