//! Action kinds and decoded tool calls.

use std::fmt;

use brain_core::ToolRequest;
use serde::{Deserialize, Serialize};

use crate::drafts::ProfileDraft;
use crate::error::OrchestratorError;

/// The kind of an action the model can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Ask the user for the profile fields still missing.
    RequestMissingInformation,
    /// Merge profile data extracted from the conversation.
    SaveProfileData,
    /// Create a pending food-log entry.
    NewPendingFoodLogEntry,
    /// Create a corrected pending entry from the user's amendment.
    PendingFoodLogEntryCorrection,
    /// Validate the latest pending entry.
    FoodLogEntryConfirmation,
    /// Summarize logged food over a date range.
    GenerateReport,
}

impl ActionKind {
    /// Tool name exposed to the model.
    pub fn tool_name(&self) -> &'static str {
        match self {
            ActionKind::RequestMissingInformation => "request_missing_information",
            ActionKind::SaveProfileData => "save_profile_data",
            ActionKind::NewPendingFoodLogEntry => "new_pending_food_log_entry",
            ActionKind::PendingFoodLogEntryCorrection => "pending_food_log_entry_correction",
            ActionKind::FoodLogEntryConfirmation => "food_log_entry_confirmation",
            ActionKind::GenerateReport => "generate_report",
        }
    }

    /// Look up a kind by tool name. Camel-case names are accepted too.
    pub fn from_tool_name(name: &str) -> Option<Self> {
        let normalized: String = name
            .trim()
            .chars()
            .filter(|c| *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "requestmissinginformation" | "requestuserinformation" => {
                Some(ActionKind::RequestMissingInformation)
            }
            "saveprofiledata" | "saveuserdata" => Some(ActionKind::SaveProfileData),
            "newpendingfoodlogentry" => Some(ActionKind::NewPendingFoodLogEntry),
            "pendingfoodlogentrycorrection" => Some(ActionKind::PendingFoodLogEntryCorrection),
            "foodlogentryconfirmation" => Some(ActionKind::FoodLogEntryConfirmation),
            "generatereport" => Some(ActionKind::GenerateReport),
            _ => None,
        }
    }

    /// Whether the action belongs to onboarding.
    pub fn is_onboarding(&self) -> bool {
        matches!(
            self,
            ActionKind::RequestMissingInformation | ActionKind::SaveProfileData
        )
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tool_name())
    }
}

/// Raw report bounds as the model sent them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRange {
    pub start_date: String,
    pub end_date: String,
}

/// A tool call decoded into its typed form.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolCall {
    RequestMissingInformation,
    SaveProfileData(ProfileDraft),
    NewPendingFoodLogEntry,
    PendingFoodLogEntryCorrection,
    FoodLogEntryConfirmation,
    GenerateReport(ReportRange),
}

impl ToolCall {
    /// Decode a model tool request.
    pub fn from_request(request: &ToolRequest) -> Result<Self, OrchestratorError> {
        let kind = ActionKind::from_tool_name(&request.name).ok_or_else(|| {
            OrchestratorError::InvalidToolCall(format!("unknown tool '{}'", request.name))
        })?;

        Ok(match kind {
            ActionKind::RequestMissingInformation => ToolCall::RequestMissingInformation,
            ActionKind::SaveProfileData => {
                ToolCall::SaveProfileData(ProfileDraft::from_arguments(&request.arguments)?)
            }
            ActionKind::NewPendingFoodLogEntry => ToolCall::NewPendingFoodLogEntry,
            ActionKind::PendingFoodLogEntryCorrection => ToolCall::PendingFoodLogEntryCorrection,
            ActionKind::FoodLogEntryConfirmation => ToolCall::FoodLogEntryConfirmation,
            ActionKind::GenerateReport => {
                let start_date = request
                    .require_string("startDate")
                    .map_err(OrchestratorError::InvalidToolCall)?;
                let end_date = request
                    .require_string("endDate")
                    .map_err(OrchestratorError::InvalidToolCall)?;
                ToolCall::GenerateReport(ReportRange {
                    start_date: start_date.trim().to_string(),
                    end_date: end_date.trim().to_string(),
                })
            }
        })
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            ToolCall::RequestMissingInformation => ActionKind::RequestMissingInformation,
            ToolCall::SaveProfileData(_) => ActionKind::SaveProfileData,
            ToolCall::NewPendingFoodLogEntry => ActionKind::NewPendingFoodLogEntry,
            ToolCall::PendingFoodLogEntryCorrection => ActionKind::PendingFoodLogEntryCorrection,
            ToolCall::FoodLogEntryConfirmation => ActionKind::FoodLogEntryConfirmation,
            ToolCall::GenerateReport(_) => ActionKind::GenerateReport,
        }
    }

    /// Get a human-readable description of this call.
    pub fn description(&self) -> String {
        match self {
            ToolCall::GenerateReport(range) => {
                format!("generate_report: {} to {}", range.start_date, range.end_date)
            }
            other => other.kind().tool_name().to_string(),
        }
    }
}

/// What the flow should do after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Stop the turn; no more tools.
    EndTurn,
    /// Keep going, optionally with a preferred next action.
    Continue { next: Option<ActionKind> },
}

/// Outcome plus the text reported back to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResult {
    pub outcome: ActionOutcome,
    pub content: String,
}

impl ActionResult {
    pub fn end(content: impl Into<String>) -> Self {
        Self {
            outcome: ActionOutcome::EndTurn,
            content: content.into(),
        }
    }

    pub fn continue_with(next: Option<ActionKind>, content: impl Into<String>) -> Self {
        Self {
            outcome: ActionOutcome::Continue { next },
            content: content.into(),
        }
    }

    pub fn ends_turn(&self) -> bool {
        self.outcome == ActionOutcome::EndTurn
    }
}
