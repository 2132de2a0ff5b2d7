//! Tests for builder modules

use std::sync::Arc;
use std::time::Duration;

use solve_scheduler::builders::SchedulerBuilder;
use solve_scheduler::config::SchedulerConfig;
use solve_scheduler::core::{Outcome, SchedulerError, SchedulerLimits, SolveRequest, Solver};
use solve_scheduler::infra::BlockingSolver;

fn solver() -> Arc<dyn Solver> {
    Arc::new(BlockingSolver::new(|req: &SolveRequest| {
        Ok(Outcome::Success {
            token: req.sitekey.clone(),
        })
    }))
}

#[test]
fn test_scheduler_builder_limits() {
    let config = SchedulerConfig {
        max_parallel_tasks: 7,
        max_queue_depth: Some(20),
        ..SchedulerConfig::default()
    };
    let builder = SchedulerBuilder::new(config, solver());
    assert_eq!(builder.limits().max_parallel, 7);
    assert_eq!(builder.limits().max_queue_depth, Some(20));
}

#[tokio::test]
async fn test_scheduler_builder_rejects_invalid_config() {
    let config = SchedulerConfig {
        max_parallel_tasks: 0,
        ..SchedulerConfig::default()
    };
    let err = SchedulerBuilder::new(config, solver()).build().unwrap_err();
    assert!(matches!(err, SchedulerError::InvalidConfig(_)));
}

#[tokio::test]
async fn test_scheduler_builder_rejects_invalid_limits() {
    let cases = [
        (
            SchedulerLimits {
                sweep_interval: Duration::ZERO,
                ..SchedulerLimits::default()
            },
            "sweep_interval",
        ),
        (
            SchedulerLimits {
                task_ttl: Duration::ZERO,
                ..SchedulerLimits::default()
            },
            "task_ttl",
        ),
        (
            SchedulerLimits {
                max_queue_depth: Some(0),
                ..SchedulerLimits::default()
            },
            "max_queue_depth",
        ),
        (
            SchedulerLimits {
                max_parallel: 0,
                ..SchedulerLimits::default()
            },
            "max_parallel",
        ),
    ];
    for (limits, field) in cases {
        match SchedulerBuilder::from_limits(limits, solver()).build() {
            Err(SchedulerError::InvalidConfig(msg)) => assert!(msg.contains(field), "{msg}"),
            other => panic!("expected InvalidConfig for {field}, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_scheduler_builder_accepts_short_sweep_interval() {
    let limits = SchedulerLimits {
        sweep_interval: Duration::from_millis(1),
        task_ttl: Duration::from_millis(1),
        ..SchedulerLimits::default()
    };
    let scheduler = SchedulerBuilder::from_limits(limits, solver()).build().unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(!scheduler.is_shut_down());
    scheduler.shutdown();
}

#[tokio::test]
async fn test_scheduler_builder_starts_scheduler() {
    let scheduler = SchedulerBuilder::new(SchedulerConfig::default(), solver())
        .build()
        .unwrap();
    let stats = scheduler.stats();
    assert_eq!(stats.max_parallel, 5);
    assert_eq!(stats.in_flight, 0);
    assert!(!scheduler.is_shut_down());
}
