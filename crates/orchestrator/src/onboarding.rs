//! Onboarding: collect the nine profile fields before anything else.

use brain_core::{Generation, GenerationRequest, ToolChoice};
use nutrition_store::{estimate_for_user, Message, StoreError, User};
use tracing::{debug, info, warn};

use crate::actions::{ActionKind, ActionOutcome, ActionResult, ToolCall};
use crate::context::TurnContext;
use crate::drafts::ProfileDraft;
use crate::error::Result;
use crate::history::chat_history;
use crate::messages;
use crate::prompts;
use crate::services::Services;
use crate::tools;

/// Run one onboarding decision for an incomplete profile.
pub async fn run(
    services: &Services,
    user: &User,
    recent: &[Message],
    ctx: &mut TurnContext,
) -> Result<()> {
    let request = GenerationRequest::new(prompts::onboarding_system(user))
        .with_messages(chat_history(recent))
        .with_tools(tools::onboarding_tools(), ToolChoice::Required);
    let generation = services.generate(request).await?;

    let mut next = Some(decide(generation));
    while let Some(call) = next.take() {
        let kind = call.kind();
        if !ctx.begin(kind).is_proceed() {
            debug!("Skipping repeated {}", kind);
            break;
        }

        let result = match call {
            ToolCall::SaveProfileData(draft) => save_profile_data(services, ctx.phone(), draft).await?,
            _ => request_missing_information(services, ctx.phone()).await?,
        };

        if let ActionOutcome::Continue {
            next: Some(ActionKind::RequestMissingInformation),
        } = result.outcome
        {
            next = Some(ToolCall::RequestMissingInformation);
        }
    }

    Ok(())
}

/// Pick the single onboarding action a generation asks for.
///
/// Only the first call counts; anything undecodable falls back to asking
/// for the missing fields.
fn decide(generation: Generation) -> ToolCall {
    let mut calls = generation.tool_calls.into_iter();
    let Some(first) = calls.next() else {
        debug!("No onboarding tool call, asking for missing information");
        return ToolCall::RequestMissingInformation;
    };
    let dropped = calls.count();
    if dropped > 0 {
        warn!("Ignoring {} extra onboarding tool call(s)", dropped);
    }

    match ToolCall::from_request(&first) {
        Ok(call) if call.kind().is_onboarding() => call,
        Ok(call) => {
            warn!("Tool {} is not available during onboarding", call.kind());
            ToolCall::RequestMissingInformation
        }
        Err(e) => {
            warn!("Could not decode onboarding call: {}", e);
            ToolCall::RequestMissingInformation
        }
    }
}

/// Ask for whatever the profile still lacks, or explain how to log food if
/// nothing is missing.
pub async fn request_missing_information(services: &Services, phone: &str) -> Result<ActionResult> {
    let user = services.require_user(phone).await?;
    let missing = user.missing_fields();

    if missing.is_empty() {
        services.reply(phone, messages::INSTRUCTIONS).await;
        return Ok(ActionResult::end(
            "Ya se enviaron las instrucciones, NO LLAMAR A MAS TOOLS",
        ));
    }

    debug!("Asking {} for {} missing field(s)", phone, missing.len());
    services
        .reply(phone, &messages::missing_fields_message(&missing))
        .await;
    Ok(ActionResult::end(
        "Ya se le pidieron al usuario los datos faltantes, NO LLAMAR A MAS TOOLS",
    ))
}

/// Merge extracted profile data and finish onboarding when complete.
pub async fn save_profile_data(
    services: &Services,
    phone: &str,
    draft: ProfileDraft,
) -> Result<ActionResult> {
    if draft.is_empty() {
        debug!("No profile data supplied by {}", phone);
        return Ok(ActionResult::continue_with(
            Some(ActionKind::RequestMissingInformation),
            "No se recibieron datos nuevos, utiliza la tool request_missing_information",
        ));
    }

    let user = match services.store.update_user(phone, draft.into_update()).await {
        Ok(user) => user,
        Err(StoreError::Validation(e)) => {
            warn!("Rejected profile data from {}: {}", phone, e);
            services.reply(phone, messages::PROFILE_SAVE_FAILED).await;
            return Ok(ActionResult::continue_with(
                Some(ActionKind::RequestMissingInformation),
                format!("Datos inválidos: {}", e),
            ));
        }
        Err(e) => return Err(e.into()),
    };

    if !user.is_complete() {
        return Ok(ActionResult::continue_with(
            Some(ActionKind::RequestMissingInformation),
            "Campos faltantes, utiliza la tool request_missing_information",
        ));
    }

    store_daily_target(services, &user).await;
    info!(phone = %phone, "Profile complete");
    services.reply(phone, messages::WELCOME).await;
    Ok(ActionResult::end(
        "Usuario registrado correctamente, NO LLAMAR A MAS TOOLS",
    ))
}

async fn store_daily_target(services: &Services, user: &User) {
    match estimate_for_user(user, services.config.use_reported_age) {
        Ok(estimate) => {
            let target = estimate.target_for(user.goals());
            services
                .store
                .set_daily_target(&user.phone_number, target)
                .await;
            info!(
                "Daily target for {}: {} kcal (maintenance {})",
                user.phone_number, target, estimate.maintenance
            );
        }
        Err(e) => warn!("Could not estimate calories for {}: {}", user.phone_number, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brain_core::ToolRequest;
    use serde_json::json;

    #[test]
    fn test_decide_takes_first_call() {
        let generation = Generation::tool_calls(vec![
            ToolRequest::new("1", "save_profile_data", json!({"name": "Ana"})),
            ToolRequest::new("2", "request_missing_information", json!({})),
        ]);
        assert!(matches!(decide(generation), ToolCall::SaveProfileData(_)));
    }

    #[test]
    fn test_decide_falls_back() {
        assert_eq!(decide(Generation::text("hola")), ToolCall::RequestMissingInformation);

        let foreign = Generation::tool_calls(vec![ToolRequest::new(
            "1",
            "food_log_entry_confirmation",
            json!({}),
        )]);
        assert_eq!(decide(foreign), ToolCall::RequestMissingInformation);

        let garbage = Generation::tool_calls(vec![ToolRequest::new(
            "1",
            "save_profile_data",
            json!("{not json"),
        )]);
        assert_eq!(decide(garbage), ToolCall::RequestMissingInformation);
    }
}
