//! Business logic services for the KisanSahayak advisory backend

pub mod advisory;
pub mod cache;
pub mod connectivity;

pub use advisory::AdvisoryService;
pub use cache::{CacheStore, FileCacheStore, MemoryCacheStore};
pub use connectivity::{ConnectivityMonitor, ConnectivityTransition, SubscriptionId};
