//! Scheduler configuration structures.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::SchedulerLimits;

/// Capacity, retention and reporting settings for the scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Maximum concurrent solve calls.
    pub max_parallel_tasks: usize,
    /// Maximum pending jobs before rejection; `None` keeps the queue unbounded.
    pub max_queue_depth: Option<usize>,
    /// Seconds a task record is kept after creation.
    pub task_ttl_secs: u64,
    /// Seconds between reaper sweeps.
    pub cleanup_interval_secs: u64,
    /// Report `elapsedTime` / `solveTime` in poll responses.
    pub include_timings: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_parallel_tasks: 5,
            max_queue_depth: None,
            task_ttl_secs: 3600,
            cleanup_interval_secs: 900,
            include_timings: true,
        }
    }
}

impl SchedulerConfig {
    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// A description of the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_parallel_tasks == 0 {
            return Err("max_parallel_tasks must be greater than 0".into());
        }
        if self.max_queue_depth == Some(0) {
            return Err("max_queue_depth must be greater than 0 when set".into());
        }
        if self.task_ttl_secs == 0 {
            return Err("task_ttl_secs must be greater than 0".into());
        }
        if self.cleanup_interval_secs == 0 {
            return Err("cleanup_interval_secs must be greater than 0".into());
        }
        Ok(())
    }

    /// Parse scheduler configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// Parse or validation failure.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Core limits derived from this configuration.
    pub const fn limits(&self) -> SchedulerLimits {
        SchedulerLimits {
            max_parallel: self.max_parallel_tasks,
            max_queue_depth: self.max_queue_depth,
            task_ttl: Duration::from_secs(self.task_ttl_secs),
            sweep_interval: Duration::from_secs(self.cleanup_interval_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = SchedulerConfig::default();
        assert!(cfg.validate().is_ok());
        let limits = cfg.limits();
        assert_eq!(limits, SchedulerLimits::default());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg = SchedulerConfig::from_json_str(r#"{"max_parallel_tasks": 2}"#).unwrap();
        assert_eq!(cfg.max_parallel_tasks, 2);
        assert_eq!(cfg.task_ttl_secs, 3600);
        assert!(cfg.include_timings);
    }

    #[test]
    fn zero_depth_cap_is_invalid() {
        let cfg = SchedulerConfig {
            max_queue_depth: Some(0),
            ..SchedulerConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
