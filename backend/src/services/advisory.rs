//! Advisory workflow
//!
//! Decides, per request, whether an advisory or weekly plan comes from the AI
//! service, from the cache, or from a fixed placeholder. Every successful
//! fetch is written through to the cache before it is returned.
//!
//! Requests for the same artifact may overlap. Each one takes a generation
//! token when it starts; a response is only written through if no newer
//! request has already written, so among successful responses the latest
//! *issued* one owns the cache. A newer request that fails leaves the slot
//! open for an older one that succeeds.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use shared::{
    now_epoch_millis, AdvisoryRecord, AdvisoryResult, FarmerContext, Language, WeatherSnapshot,
    WeeklyPlan,
};

use crate::config::WorkflowConfig;
use crate::error::{AdvisoryError, WorkflowResult};
use crate::external::AdvisoryClient;
use crate::services::cache::{
    read_json, write_json, CacheStore, ADVISORY_CACHE_KEY, WEEKLY_CACHE_KEY,
};
use crate::services::connectivity::ConnectivityMonitor;

/// Orchestrates the AI client, the cache and the connectivity monitor
pub struct AdvisoryService {
    client: Arc<dyn AdvisoryClient>,
    cache: Arc<dyn CacheStore>,
    connectivity: Arc<ConnectivityMonitor>,
    options: WorkflowConfig,
    clock: fn() -> i64,
    advisory_generation: AtomicU64,
    weekly_generation: AtomicU64,
    advisory_written: AtomicU64,
    weekly_written: AtomicU64,
    write_lock: Mutex<()>,
}

impl AdvisoryService {
    pub fn new(
        client: Arc<dyn AdvisoryClient>,
        cache: Arc<dyn CacheStore>,
        connectivity: Arc<ConnectivityMonitor>,
    ) -> Self {
        Self {
            client,
            cache,
            connectivity,
            options: WorkflowConfig::default(),
            clock: now_epoch_millis,
            advisory_generation: AtomicU64::new(0),
            weekly_generation: AtomicU64::new(0),
            advisory_written: AtomicU64::new(0),
            weekly_written: AtomicU64::new(0),
            write_lock: Mutex::new(()),
        }
    }

    pub fn with_options(mut self, options: WorkflowConfig) -> Self {
        self.options = options;
        self
    }

    /// Replace the time source used to stamp fresh results
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    pub fn connectivity(&self) -> &ConnectivityMonitor {
        &self.connectivity
    }

    /// Produce an advisory. Never fails: degrades to saved data or a placeholder.
    pub async fn get_advisory(
        &self,
        context: &FarmerContext,
        weather: &WeatherSnapshot,
        language: Language,
    ) -> AdvisoryResult {
        if !self.connectivity.is_online() {
            tracing::info!("Offline, serving saved advisory");
            return match self.cached_advisory_record() {
                Ok(record) => record.into_cached(),
                Err(e) => {
                    tracing::debug!(error = %e, "Offline placeholder served");
                    AdvisoryResult::no_connection_placeholder()
                }
            };
        }

        self.fetch_advisory_online(context, weather, language).await
    }

    /// Re-fetch with updated weather. Rejected while offline; the caller keeps
    /// showing what it already has.
    pub async fn refresh_advisory(
        &self,
        context: &FarmerContext,
        weather: &WeatherSnapshot,
        language: Language,
    ) -> WorkflowResult<AdvisoryResult> {
        if !self.connectivity.is_online() {
            tracing::info!("Refresh rejected while offline");
            return Err(AdvisoryError::Offline);
        }

        Ok(self.fetch_advisory_online(context, weather, language).await)
    }

    /// Produce a weekly plan, or `None` when nothing is available
    pub async fn get_weekly_plan(
        &self,
        context: &FarmerContext,
        language: Language,
    ) -> Option<WeeklyPlan> {
        if !self.connectivity.is_online() {
            tracing::info!("Offline, serving saved weekly plan");
            return self.get_cached_weekly_plan();
        }

        let token = self.weekly_generation.fetch_add(1, Ordering::SeqCst) + 1;

        match self.client.fetch_weekly_plan(context, language).await {
            Ok(content) => {
                let plan = WeeklyPlan::new(content, (self.clock)());
                self.write_through(&self.weekly_written, token, WEEKLY_CACHE_KEY, &plan);
                Some(plan)
            }
            Err(e) => {
                tracing::error!(error = %e, "Weekly plan fetch failed");
                if self.options.weekly_plan_cache_fallback {
                    self.get_cached_weekly_plan()
                } else {
                    None
                }
            }
        }
    }

    /// The saved weekly plan, if any. Reads only.
    pub fn get_cached_weekly_plan(&self) -> Option<WeeklyPlan> {
        read_json(self.cache.as_ref(), WEEKLY_CACHE_KEY)
    }

    /// The saved advisory marked as cached. Reads only.
    pub fn get_cached_advisory(&self) -> WorkflowResult<AdvisoryResult> {
        self.cached_advisory_record().map(AdvisoryRecord::into_cached)
    }

    async fn fetch_advisory_online(
        &self,
        context: &FarmerContext,
        weather: &WeatherSnapshot,
        language: Language,
    ) -> AdvisoryResult {
        let token = self.advisory_generation.fetch_add(1, Ordering::SeqCst) + 1;

        match self.client.fetch_advisory(context, weather, language).await {
            Ok(content) => {
                let result = AdvisoryResult::fresh(content, (self.clock)());
                if let Some(record) = result.to_record() {
                    self.write_through(&self.advisory_written, token, ADVISORY_CACHE_KEY, &record);
                }
                result
            }
            Err(e) => {
                tracing::error!(error = %e, "Advisory fetch failed");
                let reason = e.fallback_reason();
                match self.cached_advisory_record() {
                    Ok(record) => {
                        tracing::warn!(reason, "Falling back to saved advisory");
                        record.into_cached().with_fallback_notice(reason)
                    }
                    Err(_) => AdvisoryResult::service_unreachable_placeholder(),
                }
            }
        }
    }

    fn cached_advisory_record(&self) -> WorkflowResult<AdvisoryRecord> {
        read_json(self.cache.as_ref(), ADVISORY_CACHE_KEY)
            .ok_or(AdvisoryError::NoCacheAvailable("advisory"))
    }

    /// Persist `value` unless a newer request for the same key already wrote
    fn write_through<T: serde::Serialize>(
        &self,
        written: &AtomicU64,
        token: u64,
        key: &'static str,
        value: &T,
    ) {
        let _guard = self.write_lock.lock().unwrap_or_else(|p| p.into_inner());

        let last_written = written.load(Ordering::SeqCst);
        if token <= last_written {
            tracing::debug!(key, token, last_written, "Discarding stale response");
            return;
        }

        match write_json(self.cache.as_ref(), key, value) {
            Ok(()) => {
                written.store(token, Ordering::SeqCst);
                tracing::debug!(key, token, "Cache updated");
            }
            Err(e) => tracing::error!(key, error = %e, "Failed to write cache"),
        }
    }
}

impl std::fmt::Debug for AdvisoryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdvisoryService")
            .field("connectivity", &self.connectivity)
            .field("options", &self.options)
            .finish()
    }
}
