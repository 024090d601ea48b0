//! Keyed collection of endpoint monitors.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::monitor::EndpointMonitor;
use super::stats::MonitorStats;
use crate::config::MonitorConfig;

/// Owns every monitor of a process, keyed by explicit name or URL.
///
/// Mapping changes and registry-wide start/stop take turns on a lifecycle
/// lock, so a monitor removed mid `start_all` is never restarted behind the
/// registry's back. The map lock itself is never held across an await;
/// reads such as [`snapshot`](Self::snapshot) only wait for it.
#[derive(Default)]
pub struct MonitorRegistry {
    monitors: RwLock<HashMap<String, EndpointMonitor>>,
    lifecycle: Mutex<()>,
}

impl MonitorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a monitor from `config` and register it under its key.
    ///
    /// A monitor already registered under the same key is stopped and
    /// replaced; use [`insert`](Self::insert) to get it back.
    pub async fn add(&self, config: MonitorConfig) -> crate::Result<EndpointMonitor> {
        let monitor = EndpointMonitor::new(config)?;
        self.insert(monitor.key().to_string(), monitor.clone()).await;
        Ok(monitor)
    }

    /// Register a prebuilt monitor. A monitor it displaces is stopped before
    /// being handed back, since nothing else can reach it once unregistered.
    pub async fn insert(
        &self,
        key: impl Into<String>,
        monitor: EndpointMonitor,
    ) -> Option<EndpointMonitor> {
        let key = key.into();
        let _lifecycle = self.lifecycle.lock().await;

        let replaced = self.write().insert(key.clone(), monitor);
        match &replaced {
            Some(previous) => {
                warn!(key = %key, "Replaced existing monitor: {}", key);
                previous.stop().await;
            }
            None => info!(key = %key, "Added monitor: {}", key),
        }
        replaced
    }

    /// Unregister and stop the monitor under `key`. Unknown keys are ignored.
    pub async fn remove(&self, key: &str) -> Option<EndpointMonitor> {
        let _lifecycle = self.lifecycle.lock().await;

        let monitor = self.write().remove(key)?;
        monitor.stop().await;

        info!(key = %key, "Removed monitor: {}", key);
        Some(monitor)
    }

    pub fn get(&self, key: &str) -> Option<EndpointMonitor> {
        self.read().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Registered keys in sorted order
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub async fn start_all(&self) {
        let _lifecycle = self.lifecycle.lock().await;
        let monitors = self.monitors();
        info!("Starting {} monitors", monitors.len());

        for monitor in monitors {
            monitor.start().await;
        }
    }

    pub async fn stop_all(&self) {
        let _lifecycle = self.lifecycle.lock().await;
        let monitors = self.monitors();
        info!("Stopping all monitors");

        join_all(monitors.iter().map(|monitor| monitor.stop())).await;
    }

    /// Copies of every monitor's stats at the time of the call, in key order
    pub fn snapshot(&self) -> Vec<MonitorStats> {
        self.sorted().into_iter().map(|(_, monitor)| monitor.stats()).collect()
    }

    /// Shortest poll interval across registered monitors
    pub fn min_interval(&self) -> Option<Duration> {
        self.read().values().map(|monitor| monitor.config().interval()).min()
    }

    fn monitors(&self) -> Vec<EndpointMonitor> {
        self.sorted().into_iter().map(|(_, monitor)| monitor).collect()
    }

    fn sorted(&self) -> Vec<(String, EndpointMonitor)> {
        let mut entries: Vec<(String, EndpointMonitor)> =
            self.read().iter().map(|(key, monitor)| (key.clone(), monitor.clone())).collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, EndpointMonitor>> {
        self.monitors.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, EndpointMonitor>> {
        self.monitors.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_add_uses_url_as_key_without_name() {
        let registry = MonitorRegistry::new();
        registry.add(MonitorConfig::new("https://example.com")).await.unwrap();

        assert!(registry.get("https://example.com").is_some());
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_add_uses_name_as_key() {
        let registry = MonitorRegistry::new();
        let config = MonitorConfig::new("https://example.com").with_name("My API");
        registry.add(config).await.unwrap();

        assert!(registry.get("My API").is_some());
        assert!(registry.get("https://example.com").is_none());
    }

    #[tokio::test]
    async fn test_add_propagates_validation_failure() {
        let registry = MonitorRegistry::new();
        let result = registry.add(MonitorConfig::new("ftp://example.com")).await;

        assert!(result.is_err());
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_key_replaces_slot() {
        let registry = MonitorRegistry::new();
        let first = MonitorConfig::new("https://a.example.com").with_name("api");
        let second = MonitorConfig::new("https://b.example.com").with_name("api");
        registry.add(first).await.unwrap();
        registry.add(second).await.unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("api").unwrap().config().url, "https://b.example.com");
    }

    #[tokio::test]
    async fn test_snapshot_and_keys_are_sorted() {
        let registry = MonitorRegistry::new();
        for name in ["b", "a"] {
            let config = MonitorConfig::new(format!("https://{name}.example.com")).with_name(name);
            registry.add(config).await.unwrap();
        }

        assert_eq!(registry.keys(), vec!["a".to_string(), "b".to_string()]);

        let names: Vec<String> = registry.snapshot().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn test_min_interval() {
        let registry = MonitorRegistry::new();
        assert_eq!(registry.min_interval(), None);

        let slow = MonitorConfig::new("https://a.example.com").with_interval(60);
        let fast = MonitorConfig::new("https://b.example.com").with_interval(15);
        registry.add(slow).await.unwrap();
        registry.add(fast).await.unwrap();
        assert_eq!(registry.min_interval(), Some(Duration::from_secs(15)));
    }

    #[tokio::test]
    async fn test_remove_unknown_key_is_noop() {
        let registry = MonitorRegistry::new();
        assert!(registry.remove("non-existent").await.is_none());
    }
}
