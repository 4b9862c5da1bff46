//! Food logging: the tool-calling loop for users with a complete profile.

use brain_core::{ChatMessage, GenerationRequest, ToolChoice, ToolRequest, ToolResult};
use chrono::Local;
use nutrition_store::{FoodLogUpdate, Message, StoreError, User};
use tracing::{debug, info, warn};

use crate::actions::{ActionKind, ActionResult, ToolCall};
use crate::context::{TurnContext, END_OF_FLOW_RESULT};
use crate::drafts::FoodLogDraft;
use crate::error::{OrchestratorError, Result};
use crate::history::{chat_history, latest_user_message, render_conversation, user_image_urls};
use crate::insight;
use crate::messages;
use crate::prompts;
use crate::report;
use crate::services::Services;
use crate::tasks::BackgroundTasks;
use crate::tools;

/// How the extraction call should read the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// A new food mention.
    New,
    /// An amendment to the pending entry, with its description if there is one.
    Correction { previous: Option<String> },
}

/// Run the decision loop for one turn.
pub async fn run(
    services: &Services,
    background: &BackgroundTasks,
    user: &User,
    recent: &[Message],
    ctx: &mut TurnContext,
) -> Result<()> {
    let phone = user.phone_number.as_str();
    let pending = services.store.last_pending_food_log(phone).await;
    let system = prompts::food_logging_system(user, Local::now().date_naive(), pending.as_ref());
    let mut conversation = chat_history(recent);

    for step in 1..=services.config.max_steps {
        let request = GenerationRequest::new(system.clone())
            .with_messages(conversation.clone())
            .with_tools(tools::food_logging_tools(), ToolChoice::Auto);
        let generation = services.generate(request).await?;

        if !generation.has_tool_calls() {
            match generation.non_empty_text() {
                Some(text) => services.reply(phone, text).await,
                None => debug!("Step {}: no tool calls and no text", step),
            }
            return Ok(());
        }

        conversation.push(ChatMessage::assistant_tool_calls(
            generation.text.clone().unwrap_or_default(),
            generation.tool_calls.clone(),
        ));

        let mut end_turn = false;
        for request in &generation.tool_calls {
            let (result, ends) =
                execute_tool_call(services, background, user, recent, ctx, request).await?;
            end_turn |= ends;
            conversation.push(ChatMessage::tool_result(&result));
        }

        if end_turn {
            return Ok(());
        }
    }

    debug!("Step limit reached for {}", phone);
    Ok(())
}

/// Decode, guard and execute one tool call.
///
/// Returns the result for the model and whether the turn should end.
async fn execute_tool_call(
    services: &Services,
    background: &BackgroundTasks,
    user: &User,
    recent: &[Message],
    ctx: &mut TurnContext,
    request: &ToolRequest,
) -> Result<(ToolResult, bool)> {
    let phone = user.phone_number.as_str();
    let call = match ToolCall::from_request(request) {
        Ok(call) if call.kind().is_onboarding() => {
            warn!("Tool {} is not available after onboarding", call.kind());
            return Ok((
                ToolResult::error(&request.id, "tool not available for this user"),
                false,
            ));
        }
        Ok(call) => call,
        Err(e) => {
            warn!("Rejected tool call from model: {}", e);
            return Ok((ToolResult::error(&request.id, e.to_string()), false));
        }
    };

    let decision = ctx.begin(call.kind());
    if !decision.is_proceed() {
        info!("Blocked {} ({:?})", call.kind(), decision);
        return Ok((ToolResult::success(&request.id, END_OF_FLOW_RESULT), true));
    }

    info!("Executing {}", call.description());
    let outcome = match call {
        ToolCall::NewPendingFoodLogEntry => {
            log_food(services, phone, recent, ctx, Extraction::New).await
        }
        ToolCall::PendingFoodLogEntryCorrection => {
            let previous = services
                .store
                .last_pending_food_log(phone)
                .await
                .map(|log| log.description);
            log_food(services, phone, recent, ctx, Extraction::Correction { previous }).await
        }
        ToolCall::FoodLogEntryConfirmation => confirm_entry(services, background, phone).await,
        ToolCall::GenerateReport(range) => report::generate_report(services, user, &range).await,
        ToolCall::RequestMissingInformation | ToolCall::SaveProfileData(_) => {
            return Ok((ToolResult::error(&request.id, "unexpected tool"), false))
        }
    };

    match outcome {
        Ok(result) => {
            let ends = result.ends_turn();
            Ok((ToolResult::success(&request.id, result.content), ends))
        }
        Err(OrchestratorError::NoPendingEntry) => {
            info!("{} confirmed with nothing pending", phone);
            services.reply(phone, messages::NO_PENDING_ENTRY).await;
            Ok((ToolResult::error(&request.id, "no pending entry"), true))
        }
        Err(e) => Err(e),
    }
}

/// Extract food from the window and store it as a pending entry.
///
/// User-facing failures (nothing found, bad model output) are answered
/// here and end the turn; only store lookups that fail propagate.
pub async fn log_food(
    services: &Services,
    phone: &str,
    recent: &[Message],
    ctx: &mut TurnContext,
    extraction: Extraction,
) -> Result<ActionResult> {
    let latest = latest_user_message(recent);
    let is_image = latest
        .and_then(|m| m.content.media.as_ref())
        .is_some_and(|media| media.is_image());
    let notice = if is_image {
        messages::PROCESSING_IMAGE
    } else {
        messages::PROCESSING_FOOD
    };
    services.reply(phone, notice).await;

    let conversation = render_conversation(recent);
    let system = match &extraction {
        Extraction::New => prompts::extraction_system(&conversation),
        Extraction::Correction { previous } => {
            prompts::correction_system(&conversation, previous.as_deref())
        }
    };
    let mut message = ChatMessage::user(
        latest
            .and_then(|m| m.content.text.clone())
            .unwrap_or_default(),
    );
    for url in user_image_urls(recent) {
        message = message.with_image(url);
    }
    let request = GenerationRequest::new(system)
        .with_message(message)
        .with_response_format(tools::food_log_format());

    let draft: FoodLogDraft = match services.generate_object(request).await {
        Ok(draft) => draft,
        Err(e) => {
            warn!("Food extraction failed for {}: {}", phone, e);
            services.reply(phone, messages::FOOD_PROCESSING_ERROR).await;
            return Ok(ActionResult::end("Error al procesar la entrada de alimento."));
        }
    };

    let new_log = match draft.into_new_log() {
        Ok(log) => log,
        Err(OrchestratorError::ExtractionAmbiguous) => {
            info!("No food identified for {}", phone);
            services.reply(phone, messages::NO_FOOD_FOUND).await;
            return Ok(ActionResult::end("No se identificó ningún alimento. Se respondió al usuario."));
        }
        Err(e) => {
            warn!("Extracted food for {} is invalid: {}", phone, e);
            services.reply(phone, messages::FOOD_PROCESSING_ERROR).await;
            return Ok(ActionResult::end("Error al procesar la entrada de alimento."));
        }
    };

    let log = match services.store.add_food_log(phone, new_log).await {
        Ok(log) => log,
        Err(StoreError::Validation(e)) => {
            warn!("Store rejected food log for {}: {}", phone, e);
            services.reply(phone, messages::FOOD_PROCESSING_ERROR).await;
            return Ok(ActionResult::end("Error al procesar la entrada de alimento."));
        }
        Err(e) => return Err(e.into()),
    };

    info!(phone = %phone, id = %log.id, "Pending food entry: {}", log.description);
    services
        .reply(phone, &messages::food_log_summary(&log))
        .await;
    ctx.forbid(ActionKind::FoodLogEntryConfirmation);

    Ok(ActionResult::end(
        "Se registró el alimento como pendiente. No llamar a mas tools, específicamente no llamar a food_log_entry_confirmation.",
    ))
}

/// Validate the latest pending entry and queue an insight about it.
///
/// Fails with [`OrchestratorError::NoPendingEntry`] when there is nothing to
/// confirm; no message is sent in that case.
pub async fn confirm_entry(
    services: &Services,
    background: &BackgroundTasks,
    phone: &str,
) -> Result<ActionResult> {
    let pending = services
        .store
        .last_pending_food_log(phone)
        .await
        .ok_or(OrchestratorError::NoPendingEntry)?;

    let confirmed = services
        .store
        .update_food_log(phone, &pending.id, FoodLogUpdate::validate_entry())
        .await?;
    info!(phone = %phone, id = %confirmed.id, "Validated food entry");

    let thanks = messages::thanks_message(&confirmed.description);
    services.reply(phone, &thanks).await;

    background
        .spawn(insight::send_insight(
            services.clone(),
            phone.to_string(),
            confirmed.description.clone(),
        ))
        .await;

    Ok(ActionResult::end(format!("{} ✅", thanks)))
}
