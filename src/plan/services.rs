//! Plan generation and reconciliation. One assistant round-trip per
//! operation; on success the previous plan is replaced in its entirety, on
//! any failure it is left untouched. No partial merges.

use serde::Serialize;
use tracing::{info, instrument};

use super::dto::{GroceryItem, PlanResult};
use super::parser::parse_plan;
use super::prompt::{build_impact_prompt, build_plan_prompt};
use crate::error::ApiError;
use crate::session::today;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Low,
    High,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImpactVerdict {
    pub impact: Impact,
    pub warning: String,
}

/// Lenient by design: the impact gate is advisory, so a missing impact line
/// defaults to low and a missing warning to a generic notice. The plan
/// parser is the strict one.
fn parse_impact(text: &str) -> ImpactVerdict {
    let mut impact = Impact::Low;
    let mut warning = "No specific warning.".to_string();
    for line in text.lines() {
        let line = line.trim_start();
        if let Some(value) = line.strip_prefix("impact:") {
            if value.trim().eq_ignore_ascii_case("high") {
                impact = Impact::High;
            }
        } else if let Some(value) = line.strip_prefix("warning:") {
            let value = value.trim();
            if !value.is_empty() {
                warning = value.to_string();
            }
        }
    }
    ImpactVerdict { impact, warning }
}

/// One full assistant round-trip: snapshot the session, build the prompt,
/// submit, parse, and only then swap in the new plan.
async fn run_plan_request(
    state: &AppState,
    existing: Option<Vec<GroceryItem>>,
) -> Result<PlanResult, ApiError> {
    let prompt = {
        let session = state.session.read().await;
        let goals = session.goals(today());
        build_plan_prompt(
            &session.profile,
            &session.workouts,
            session.macro_split,
            goals,
            &session.request,
            existing.as_deref(),
            today(),
        )
    };

    let text = state.assistant.submit(&prompt).await?;
    let plan = parse_plan(&text)?;

    info!(
        items = plan.grocery_list.len(),
        total_cost = plan.total_cost,
        recalculation = existing.is_some(),
        "plan updated"
    );
    state.session.write().await.plan = Some(plan.clone());
    Ok(plan)
}

#[instrument(skip(state))]
pub async fn generate_plan(state: &AppState) -> Result<PlanResult, ApiError> {
    let _permit = state.try_begin_assistant_call()?;
    {
        let session = state.session.read().await;
        if !session.profile_saved {
            return Err(ApiError::IncompleteProfile);
        }
        session.request.validate()?;
    }
    run_plan_request(state, None).await
}

#[instrument(skip(state))]
pub async fn remove_ingredient(state: &AppState, id: &str) -> Result<PlanResult, ApiError> {
    let _permit = state.try_begin_assistant_call()?;
    let filtered = {
        let session = state.session.read().await;
        let plan = session.plan.as_ref().ok_or(ApiError::NoPlan)?;
        let filtered: Vec<GroceryItem> = plan
            .grocery_list
            .iter()
            .filter(|item| item.id != id)
            .cloned()
            .collect();
        if filtered.len() == plan.grocery_list.len() {
            return Err(ApiError::NotFound(format!("grocery item {id}")));
        }
        filtered
    };
    run_plan_request(state, Some(filtered)).await
}

#[derive(Debug)]
pub enum ReplaceOutcome {
    Replaced(PlanResult),
    /// High-impact verdict; nothing was mutated. The caller repeats the
    /// request with `confirmed` to proceed anyway.
    NeedsConfirmation(ImpactVerdict),
}

#[instrument(skip(state, new_name))]
pub async fn replace_ingredient(
    state: &AppState,
    id: &str,
    new_name: &str,
    confirmed: bool,
) -> Result<ReplaceOutcome, ApiError> {
    let new_name = new_name.trim();
    if new_name.is_empty() {
        return Err(ApiError::InvalidRequest(
            "replacement ingredient name must not be empty".into(),
        ));
    }

    let _permit = state.try_begin_assistant_call()?;
    let (old_name, updated) = {
        let session = state.session.read().await;
        let plan = session.plan.as_ref().ok_or(ApiError::NoPlan)?;
        let old = plan
            .grocery_list
            .iter()
            .find(|item| item.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("grocery item {id}")))?;
        // Replaced items get their price reset; the recalculation re-prices.
        let updated: Vec<GroceryItem> = plan
            .grocery_list
            .iter()
            .map(|item| {
                if item.id == id {
                    GroceryItem {
                        id: item.id.clone(),
                        name: new_name.to_string(),
                        quantity: item.quantity.clone(),
                        price: 0.0,
                    }
                } else {
                    item.clone()
                }
            })
            .collect();
        (old.name.clone(), updated)
    };

    let verdict = {
        let text = state
            .assistant
            .submit(&build_impact_prompt(&old_name, new_name))
            .await?;
        parse_impact(&text)
    };

    if verdict.impact == Impact::High && !confirmed {
        info!(%id, "high-impact substitution gated behind confirmation");
        return Ok(ReplaceOutcome::NeedsConfirmation(verdict));
    }

    let plan = run_plan_request(state, Some(updated)).await?;
    Ok(ReplaceOutcome::Replaced(plan))
}
