//! Farmer context supplied by onboarding

use serde::{Deserialize, Serialize};
use validator::Validate;

/// What the advisor needs to know about the farmer for one request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FarmerContext {
    #[validate(length(min = 1, max = 120))]
    pub location: String,
    #[validate(length(min = 1, max = 80))]
    pub crop: String,
    #[serde(alias = "stage")]
    #[validate(length(min = 1, max = 80))]
    pub growth_stage: String,
}

impl FarmerContext {
    pub fn new(
        location: impl Into<String>,
        crop: impl Into<String>,
        growth_stage: impl Into<String>,
    ) -> Self {
        Self {
            location: location.into(),
            crop: crop.into(),
            growth_stage: growth_stage.into(),
        }
    }
}
