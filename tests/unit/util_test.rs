//! Tests for utility functions

use std::time::Duration;

use solve_scheduler::core::TaskId;
use solve_scheduler::util::{now_ms, round_secs, secs_between};

#[test]
fn test_now_ms_is_after_2020() {
    assert!(now_ms() > 1_577_836_800_000);
}

#[test]
fn test_round_secs_two_decimals() {
    assert!((round_secs(Duration::from_millis(1_234)) - 1.23).abs() < 1e-9);
    assert!((round_secs(Duration::from_millis(1_236)) - 1.24).abs() < 1e-9);
}

#[test]
fn test_secs_between_saturates() {
    assert!((secs_between(5_000, 1_000)).abs() < f64::EPSILON);
    assert!((secs_between(1_000, 3_500) - 2.5).abs() < 1e-9);
}

#[test]
fn test_task_id_parse() {
    let id = TaskId::new();
    let parsed: TaskId = format!(" {id} ").parse().unwrap();
    assert_eq!(parsed, id);
    assert!("not-a-uuid".parse::<TaskId>().is_err());
}
