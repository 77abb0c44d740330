//! Validation of content returned by the AI service
//!
//! Serde enforces the schema's types and required fields; these checks reject
//! payloads that parse but carry nothing a farmer could act on.

use crate::models::{AdvisoryContent, WeeklyPlanContent};

// ============================================================================
// Advisory Validations
// ============================================================================

/// Validate an advisory has a title, reasoning and at least one usable action
pub fn validate_advisory_content(content: &AdvisoryContent) -> Result<(), &'static str> {
    if content.title.trim().is_empty() {
        return Err("Advisory title is empty");
    }
    if content.reasoning.trim().is_empty() {
        return Err("Advisory reasoning is empty");
    }
    validate_action_items(&content.action_items)
}

/// Validate action items: at least one, none blank
pub fn validate_action_items(items: &[String]) -> Result<(), &'static str> {
    if items.is_empty() {
        return Err("Advisory has no action items");
    }
    if items.iter().any(|item| item.trim().is_empty()) {
        return Err("Advisory contains a blank action item");
    }
    Ok(())
}

/// Treat a blank alert message as absent
pub fn normalize_alert_message(message: Option<String>) -> Option<String> {
    message
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
}

// ============================================================================
// Weekly Plan Validations
// ============================================================================

/// Validate a weekly plan has days and a summary
pub fn validate_weekly_plan_content(content: &WeeklyPlanContent) -> Result<(), &'static str> {
    if content.days.is_empty() {
        return Err("Weekly plan has no days");
    }
    if content.general_advice.trim().is_empty() {
        return Err("Weekly plan summary is empty");
    }
    if content
        .days
        .iter()
        .any(|d| d.day_label.trim().is_empty() || d.activity.trim().is_empty())
    {
        return Err("Weekly plan contains a day without label or activity");
    }
    Ok(())
}
