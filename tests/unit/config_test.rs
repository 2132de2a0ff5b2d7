//! Tests for configuration validation

use std::time::Duration;

use solve_scheduler::config::{SchedulerConfig, ServiceConfig};

#[test]
fn test_scheduler_config_defaults() {
    let cfg = SchedulerConfig::default();
    assert_eq!(cfg.max_parallel_tasks, 5);
    assert_eq!(cfg.max_queue_depth, None);
    assert_eq!(cfg.task_ttl_secs, 3600);
    assert_eq!(cfg.cleanup_interval_secs, 900);
    assert!(cfg.include_timings);
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_scheduler_config_invalid_parallelism() {
    let cfg = SchedulerConfig {
        max_parallel_tasks: 0,
        ..SchedulerConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn test_scheduler_config_invalid_queue_depth() {
    let cfg = SchedulerConfig {
        max_queue_depth: Some(0),
        ..SchedulerConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn test_scheduler_config_invalid_ttl() {
    let cfg = SchedulerConfig {
        task_ttl_secs: 0,
        ..SchedulerConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn test_scheduler_config_from_json_partial() {
    let cfg = SchedulerConfig::from_json_str(r#"{"max_parallel_tasks": 2, "max_queue_depth": 10}"#)
        .unwrap();
    assert_eq!(cfg.max_parallel_tasks, 2);
    assert_eq!(cfg.max_queue_depth, Some(10));
    assert_eq!(cfg.task_ttl_secs, 3600);
}

#[test]
fn test_scheduler_config_from_json_rejects_invalid() {
    let err = SchedulerConfig::from_json_str(r#"{"max_parallel_tasks": 0}"#).unwrap_err();
    assert!(err.contains("max_parallel_tasks"));
    assert!(SchedulerConfig::from_json_str("not json").is_err());
}

#[test]
fn test_scheduler_config_limits() {
    let cfg = SchedulerConfig {
        max_parallel_tasks: 3,
        task_ttl_secs: 60,
        cleanup_interval_secs: 10,
        ..SchedulerConfig::default()
    };
    let limits = cfg.limits();
    assert_eq!(limits.max_parallel, 3);
    assert_eq!(limits.task_ttl, Duration::from_secs(60));
    assert_eq!(limits.sweep_interval, Duration::from_secs(10));
}

#[test]
fn test_service_config_from_json() {
    let cfg = ServiceConfig::from_json_str(
        r#"{"port": 4000, "api_keys": ["k1"], "scheduler": {"max_parallel_tasks": 1}}"#,
    )
    .unwrap();
    assert_eq!(cfg.port, 4000);
    assert_eq!(cfg.api_keys, vec!["k1"]);
    assert_eq!(cfg.scheduler.max_parallel_tasks, 1);
}

#[test]
fn test_service_config_requires_keys() {
    let cfg = ServiceConfig::default();
    assert!(cfg.validate().is_err());
}
