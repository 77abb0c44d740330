//! External API integrations

pub mod gemini;

use async_trait::async_trait;
use shared::{AdvisoryContent, FarmerContext, Language, WeatherSnapshot, WeeklyPlanContent};

use crate::error::WorkflowResult;

pub use gemini::GeminiClient;

/// Source of generated advisories and weekly plans
///
/// Implementations only talk to the remote service; caching and fallback
/// belong to the workflow.
#[async_trait]
pub trait AdvisoryClient: Send + Sync {
    /// Fails with `RemoteUnavailable` on transport problems and
    /// `MalformedResponse` when the payload is empty or off-schema.
    async fn fetch_advisory(
        &self,
        context: &FarmerContext,
        weather: &WeatherSnapshot,
        language: Language,
    ) -> WorkflowResult<AdvisoryContent>;

    async fn fetch_weekly_plan(
        &self,
        context: &FarmerContext,
        language: Language,
    ) -> WorkflowResult<WeeklyPlanContent>;
}
