//! Application configuration: HTTP server, worker pool, and simulated work.

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind host (`HTTP_HOST`, default `0.0.0.0`).
    pub host: String,
    /// Bind port (`HTTP_PORT`, default `8080`).
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
        }
    }
}

/// Worker pool settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Worker threads started (`WORKERS`, default `5`).
    pub workers: usize,
    /// Admission queue capacity (`POOL_SIZE`, default `10`).
    pub queue_capacity: usize,
    /// Seconds allowed for draining on shutdown (`SHUTDOWN_TIMEOUT`, default `10`).
    pub shutdown_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            workers: 5,
            queue_capacity: 10,
            shutdown_timeout_secs: 10,
        }
    }
}

/// Range of simulated work assigned to new tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskConfig {
    /// Lower bound in milliseconds (`WORK_MIN_MS`, default `1000`).
    pub work_min_ms: u64,
    /// Upper bound in milliseconds (`WORK_MAX_MS`, default `5000`).
    pub work_max_ms: u64,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            work_min_ms: 1000,
            work_max_ms: 5000,
        }
    }
}

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener.
    pub server: ServerConfig,
    /// Worker pool.
    pub pool: PoolConfig,
    /// Simulated work.
    pub task: TaskConfig,
}

impl AppConfig {
    /// Load configuration from the environment, reading `.env` first if present.
    ///
    /// | Env Var            | Default   |
    /// |--------------------|-----------|
    /// | `HTTP_HOST`        | `0.0.0.0` |
    /// | `HTTP_PORT`        | `8080`    |
    /// | `WORKERS`          | `5`       |
    /// | `POOL_SIZE`        | `10`      |
    /// | `SHUTDOWN_TIMEOUT` | `10`      |
    /// | `WORK_MIN_MS`      | `1000`    |
    /// | `WORK_MAX_MS`      | `5000`    |
    ///
    /// Blank, unparseable, or non-positive values keep the default.
    #[must_use]
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(host) = lookup("HTTP_HOST")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
        {
            cfg.server.host = host;
        }
        if let Some(port) = positive(lookup("HTTP_PORT")) {
            cfg.server.port = port;
        }
        if let Some(workers) = positive(lookup("WORKERS")) {
            cfg.pool.workers = workers;
        }
        if let Some(size) = positive(lookup("POOL_SIZE")) {
            cfg.pool.queue_capacity = size;
        }
        if let Some(secs) = positive(lookup("SHUTDOWN_TIMEOUT")) {
            cfg.pool.shutdown_timeout_secs = secs;
        }
        if let Some(ms) = positive(lookup("WORK_MIN_MS")) {
            cfg.task.work_min_ms = ms;
        }
        if let Some(ms) = positive(lookup("WORK_MAX_MS")) {
            cfg.task.work_max_ms = ms;
        }

        cfg
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid value.
    pub fn validate(&self) -> Result<(), String> {
        if self.pool.workers == 0 {
            return Err("workers must be greater than 0".into());
        }
        if self.pool.queue_capacity == 0 {
            return Err("queue_capacity must be greater than 0".into());
        }
        if self.pool.shutdown_timeout_secs == 0 {
            return Err("shutdown_timeout_secs must be greater than 0".into());
        }
        if self.task.work_min_ms == 0 {
            return Err("work_min_ms must be greater than 0".into());
        }
        if self.task.work_min_ms > self.task.work_max_ms {
            return Err(format!(
                "work_min_ms ({}) must not exceed work_max_ms ({})",
                self.task.work_min_ms, self.task.work_max_ms
            ));
        }
        Ok(())
    }

    /// Parse configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// Returns a description of the parse or validation failure.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// `host:port` for the HTTP listener.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Time allowed for draining the pool on shutdown.
    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.pool.shutdown_timeout_secs)
    }

    /// Shortest simulated work.
    #[must_use]
    pub const fn work_min(&self) -> Duration {
        Duration::from_millis(self.task.work_min_ms)
    }

    /// Longest simulated work.
    #[must_use]
    pub const fn work_max(&self) -> Duration {
        Duration::from_millis(self.task.work_max_ms)
    }
}

fn positive<T>(raw: Option<String>) -> Option<T>
where
    T: FromStr + PartialOrd + Default,
{
    let value: T = raw?.trim().parse().ok()?;
    (value > T::default()).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::from_lookup(lookup(&[]));
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.pool.workers, 5);
        assert_eq!(cfg.pool.queue_capacity, 10);
        assert_eq!(cfg.shutdown_timeout(), Duration::from_secs(10));
        assert_eq!(cfg.bind_addr(), "0.0.0.0:8080");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("HTTP_HOST", "127.0.0.1"),
            ("HTTP_PORT", " 9090 "),
            ("WORKERS", "3"),
            ("POOL_SIZE", "20"),
            ("SHUTDOWN_TIMEOUT", "4"),
            ("WORK_MIN_MS", "10"),
            ("WORK_MAX_MS", "50"),
        ]));
        assert_eq!(cfg.bind_addr(), "127.0.0.1:9090");
        assert_eq!(cfg.pool.workers, 3);
        assert_eq!(cfg.pool.queue_capacity, 20);
        assert_eq!(cfg.shutdown_timeout(), Duration::from_secs(4));
        assert_eq!(cfg.work_min(), Duration::from_millis(10));
        assert_eq!(cfg.work_max(), Duration::from_millis(50));
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("HTTP_HOST", "   "),
            ("HTTP_PORT", "not-a-port"),
            ("WORKERS", "0"),
            ("POOL_SIZE", "-3"),
            ("SHUTDOWN_TIMEOUT", ""),
        ]));
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let mut cfg = AppConfig::default();
        cfg.pool.queue_capacity = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_inverted_work_range() {
        let mut cfg = AppConfig::default();
        cfg.task.work_min_ms = 600;
        cfg.task.work_max_ms = 500;
        assert!(cfg.validate().unwrap_err().contains("work_min_ms"));
    }

    #[test]
    fn test_from_json_partial() {
        let cfg = AppConfig::from_json_str(r#"{ "pool": { "workers": 2 } }"#).unwrap();
        assert_eq!(cfg.pool.workers, 2);
        assert_eq!(cfg.pool.queue_capacity, 10);
        assert_eq!(cfg.server, ServerConfig::default());
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(AppConfig::from_json_str(r#"{ "pool": { "queue_capacity": 0 } }"#).is_err());
        assert!(AppConfig::from_json_str("not json").unwrap_err().starts_with("parse error"));
    }
}
