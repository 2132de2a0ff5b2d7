//! Tests for audit sink

use std::sync::Arc;

use solve_scheduler::core::{
    AuditAction, AuditEvent, AuditSink, AuditTrail, InMemoryAuditSink, TaskId,
};

#[test]
fn test_in_memory_audit_sink() {
    let sink = InMemoryAuditSink::new(10);
    let id = TaskId::new();

    sink.record(AuditEvent::now(id, AuditAction::Submit, Some("queued".to_string())));
    assert_eq!(sink.events().len(), 1);

    let events = sink.events();
    assert_eq!(events[0].task_id, id);
    assert_eq!(events[0].action, AuditAction::Submit);
    assert_eq!(events[0].detail.as_deref(), Some("queued"));
}

#[test]
fn test_audit_sink_overflow() {
    let sink = InMemoryAuditSink::new(2);
    let ids = [TaskId::new(), TaskId::new(), TaskId::new()];

    for id in ids {
        sink.record(AuditEvent::now(id, AuditAction::Submit, None));
    }

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].task_id, ids[1]); // First one popped
    assert_eq!(events[1].task_id, ids[2]);
}

#[test]
fn test_audit_trail_filters_by_task() {
    let sink = Arc::new(InMemoryAuditSink::new(16));
    let trail = AuditTrail::new(sink.clone());
    let a = TaskId::new();
    let b = TaskId::new();

    trail.record(a, AuditAction::Submit, None);
    trail.record(b, AuditAction::Submit, None);
    trail.record(a, AuditAction::Start, None);
    trail.record(a, AuditAction::Complete, None);

    assert_eq!(
        sink.actions_for(&a),
        vec![AuditAction::Submit, AuditAction::Start, AuditAction::Complete]
    );
    assert_eq!(sink.actions_for(&b), vec![AuditAction::Submit]);
}

#[test]
fn test_audit_action_names() {
    assert_eq!(AuditAction::Expire.to_string(), "expire");
    assert_eq!(
        serde_json::to_value(AuditAction::Reject).unwrap(),
        serde_json::json!("reject")
    );
}
