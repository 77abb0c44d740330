//! Test doubles shared by the integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use kisan_advisory_backend::services::cache::{write_json, ADVISORY_CACHE_KEY, WEEKLY_CACHE_KEY};
use kisan_advisory_backend::{
    AdvisoryClient, AdvisoryError, AdvisoryService, ConnectivityMonitor, MemoryCacheStore,
    WorkflowResult,
};
use rust_decimal::Decimal;
use shared::{
    AdvisoryContent, AdvisoryRecord, AlertLevel, DayPlan, FarmerContext, Language,
    WeatherCondition, WeatherSnapshot, WeeklyPlan, WeeklyPlanContent,
};
use tokio::sync::oneshot;

/// Fetch time of the entries seeded into the cache
pub const SEEDED_AT: i64 = 1_600_000_000_000;

/// Time reported by the fixed test clock
pub const NOW: i64 = 1_700_000_000_000;

pub fn fixed_clock() -> i64 {
    NOW
}

/// What the fake AI service does on a call
#[derive(Debug, Clone)]
pub enum Outcome<T> {
    Success(T),
    Unavailable,
    Malformed,
}

impl<T: Clone> Outcome<T> {
    fn resolve(&self) -> WorkflowResult<T> {
        match self {
            Outcome::Success(value) => Ok(value.clone()),
            Outcome::Unavailable => Err(AdvisoryError::RemoteUnavailable(
                "connection refused".to_string(),
            )),
            Outcome::Malformed => Err(AdvisoryError::MalformedResponse(
                "No response from AI".to_string(),
            )),
        }
    }
}

/// A scripted advisory call that waits on `gate` before answering
pub struct Gated {
    pub gate: oneshot::Receiver<()>,
    pub outcome: Outcome<AdvisoryContent>,
}

/// Scriptable stand-in for the AI service
pub struct FakeClient {
    advisory: Mutex<Outcome<AdvisoryContent>>,
    weekly: Mutex<Outcome<WeeklyPlanContent>>,
    gated: Mutex<VecDeque<Gated>>,
    pub advisory_calls: AtomicUsize,
    pub weekly_calls: AtomicUsize,
}

impl FakeClient {
    pub fn new() -> Self {
        Self {
            advisory: Mutex::new(Outcome::Success(sample_advisory("Water now"))),
            weekly: Mutex::new(Outcome::Success(sample_plan("Stay resilient."))),
            gated: Mutex::new(VecDeque::new()),
            advisory_calls: AtomicUsize::new(0),
            weekly_calls: AtomicUsize::new(0),
        }
    }

    pub fn set_advisory(&self, outcome: Outcome<AdvisoryContent>) {
        *self.advisory.lock().unwrap() = outcome;
    }

    pub fn set_weekly(&self, outcome: Outcome<WeeklyPlanContent>) {
        *self.weekly.lock().unwrap() = outcome;
    }

    /// Queue an advisory answer released by the returned sender
    pub fn push_gated(&self, outcome: Outcome<AdvisoryContent>) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gated
            .lock()
            .unwrap()
            .push_back(Gated { gate: rx, outcome });
        tx
    }
}

#[async_trait]
impl AdvisoryClient for FakeClient {
    async fn fetch_advisory(
        &self,
        _context: &FarmerContext,
        _weather: &WeatherSnapshot,
        _language: Language,
    ) -> WorkflowResult<AdvisoryContent> {
        self.advisory_calls.fetch_add(1, Ordering::SeqCst);
        let gated = self.gated.lock().unwrap().pop_front();
        match gated {
            Some(Gated { gate, outcome }) => {
                let _ = gate.await;
                outcome.resolve()
            }
            None => {
                let outcome = self.advisory.lock().unwrap().clone();
                outcome.resolve()
            }
        }
    }

    async fn fetch_weekly_plan(
        &self,
        _context: &FarmerContext,
        _language: Language,
    ) -> WorkflowResult<WeeklyPlanContent> {
        self.weekly_calls.fetch_add(1, Ordering::SeqCst);
        let outcome = self.weekly.lock().unwrap().clone();
        outcome.resolve()
    }
}

/// A workflow wired to in-memory collaborators
pub struct Harness {
    pub service: AdvisoryService,
    pub client: Arc<FakeClient>,
    pub cache: Arc<MemoryCacheStore>,
    pub connectivity: Arc<ConnectivityMonitor>,
}

impl Harness {
    pub fn new(online: bool) -> Self {
        let client = Arc::new(FakeClient::new());
        let cache = Arc::new(MemoryCacheStore::new());
        let connectivity = Arc::new(ConnectivityMonitor::new(online));
        let service = AdvisoryService::new(client.clone(), cache.clone(), connectivity.clone())
            .with_clock(fixed_clock);

        Self {
            service,
            client,
            cache,
            connectivity,
        }
    }

    /// Seed the cache with an advisory fetched at `SEEDED_AT`
    pub fn seed_advisory(&self, title: &str) -> AdvisoryRecord {
        let record = AdvisoryRecord {
            content: sample_advisory(title),
            fetched_at_epoch_millis: SEEDED_AT,
        };
        write_json(self.cache.as_ref(), ADVISORY_CACHE_KEY, &record).unwrap();
        record
    }

    /// Seed the cache with a weekly plan generated at `SEEDED_AT`
    pub fn seed_plan(&self, advice: &str) -> WeeklyPlan {
        let plan = WeeklyPlan::new(sample_plan(advice), SEEDED_AT);
        write_json(self.cache.as_ref(), WEEKLY_CACHE_KEY, &plan).unwrap();
        plan
    }
}

pub fn context() -> FarmerContext {
    FarmerContext::new("Nashik, Maharashtra", "Onion", "Bulbing")
}

pub fn weather() -> WeatherSnapshot {
    WeatherSnapshot {
        condition: WeatherCondition::Rainy,
        temperature_celsius: Decimal::from(27),
        humidity_percent: 84,
        forecast: "Heavy rain expected next 24h".to_string(),
    }
}

pub fn sample_advisory(title: &str) -> AdvisoryContent {
    AdvisoryContent {
        title: title.to_string(),
        action_items: vec!["a".to_string(), "b".to_string(), "c".to_string()],
        alert_level: AlertLevel::High,
        alert_message: Some("Heavy rain expected".to_string()),
        reasoning: "r".to_string(),
    }
}

pub fn sample_plan(advice: &str) -> WeeklyPlanContent {
    let days = [
        "Monday",
        "Tuesday",
        "Wednesday",
        "Thursday",
        "Friday",
        "Saturday",
        "Sunday",
    ]
    .iter()
    .map(|day| DayPlan {
        day_label: day.to_string(),
        activity: "Inspect field drainage".to_string(),
        risk_level: "Low".to_string(),
    })
    .collect();

    WeeklyPlanContent {
        days,
        general_advice: advice.to_string(),
    }
}
