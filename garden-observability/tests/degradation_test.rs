use chrono::Utc;
use garden_core::models::DegradationEvent;
use garden_observability::{DegradationTracker, RecoveryStatus};

fn event(component: &str) -> DegradationEvent {
    DegradationEvent {
        component: component.to_string(),
        failure: "completion request timed out".to_string(),
        fallback_used: "heuristic".to_string(),
        timestamp: Utc::now(),
    }
}

#[test]
fn records_and_recovers_per_component() {
    let mut tracker = DegradationTracker::new();
    tracker.record(event("classifier"));
    tracker.record(event("classifier"));
    tracker.record(event("cache"));

    assert_eq!(tracker.active_degradations().len(), 3);
    assert!(tracker.is_degraded("classifier"));
    assert!(tracker.degraded_duration("classifier").is_some());

    assert_eq!(tracker.mark_recovered("classifier"), 2);
    assert!(!tracker.is_degraded("classifier"));
    assert!(tracker.is_degraded("cache"));
    assert_eq!(tracker.degraded_duration("classifier"), None);
    assert!(tracker
        .events()
        .iter()
        .filter(|t| t.event.component == "classifier")
        .all(|t| t.recovery_status == RecoveryStatus::Recovered && t.recovered_at.is_some()));
}

#[test]
fn recovering_a_healthy_component_is_a_no_op() {
    let mut tracker = DegradationTracker::new();
    assert_eq!(tracker.mark_recovered("classifier"), 0);
    assert!(tracker.events().is_empty());
}

#[test]
fn tracked_events_serialize() {
    let mut tracker = DegradationTracker::new();
    tracker.record(event("classifier"));
    let json = serde_json::to_value(&tracker.events()[0]).unwrap();
    assert_eq!(json["recovery_status"], "active");
    assert_eq!(json["event"]["fallback_used"], "heuristic");
}

#[test]
fn history_is_bounded_and_drops_recovered_first() {
    let mut tracker = DegradationTracker::with_capacity(3);
    tracker.record(event("cache"));
    tracker.mark_recovered("cache");
    for _ in 0..10 {
        tracker.record(event("classifier"));
    }

    assert_eq!(tracker.events().len(), 3);
    assert!(tracker.events().iter().all(|t| t.event.component == "classifier"));
    assert!(tracker.is_degraded("classifier"));

    tracker.mark_recovered("classifier");
    tracker.record(event("cache"));
    assert_eq!(tracker.events().len(), 3);
    assert_eq!(tracker.active_degradations().len(), 1);
    assert!(tracker.is_degraded("cache"));
}

#[test]
fn zero_capacity_still_keeps_the_latest_event() {
    let mut tracker = DegradationTracker::with_capacity(0);
    tracker.record(event("classifier"));
    tracker.record(event("classifier"));
    assert_eq!(tracker.capacity(), 1);
    assert_eq!(tracker.events().len(), 1);
}
