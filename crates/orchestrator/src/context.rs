//! Per-turn bookkeeping for tool calls.

use indexmap::IndexSet;

use crate::actions::ActionKind;

/// Result text returned to the model for a blocked tool call.
pub const END_OF_FLOW_RESULT: &str = "Flujo finalizado. No llamar a mas tools.";

/// Whether an action may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Proceed,
    /// Already invoked in this turn.
    Duplicate,
    /// Ruled out by an earlier action in this turn.
    Forbidden,
}

impl GuardDecision {
    pub fn is_proceed(&self) -> bool {
        matches!(self, GuardDecision::Proceed)
    }
}

/// State carried through every action of one turn.
///
/// Each action kind runs at most once per turn, and an action may forbid
/// others (a new pending entry forbids confirming it in the same turn).
#[derive(Debug, Clone)]
pub struct TurnContext {
    phone: String,
    invoked: IndexSet<ActionKind>,
    forbidden: IndexSet<ActionKind>,
}

impl TurnContext {
    pub fn new(phone: impl Into<String>) -> Self {
        Self {
            phone: phone.into(),
            invoked: IndexSet::new(),
            forbidden: IndexSet::new(),
        }
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Record an attempt to run `kind` and say whether it may proceed.
    ///
    /// Blocked attempts are not recorded as invoked.
    pub fn begin(&mut self, kind: ActionKind) -> GuardDecision {
        if self.forbidden.contains(&kind) {
            return GuardDecision::Forbidden;
        }
        if !self.invoked.insert(kind) {
            return GuardDecision::Duplicate;
        }
        GuardDecision::Proceed
    }

    /// Rule out `kind` for the rest of the turn.
    pub fn forbid(&mut self, kind: ActionKind) {
        self.forbidden.insert(kind);
    }

    pub fn was_invoked(&self, kind: ActionKind) -> bool {
        self.invoked.contains(&kind)
    }

    /// Invoked kinds in invocation order.
    pub fn invoked(&self) -> Vec<ActionKind> {
        self.invoked.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_is_blocked() {
        let mut ctx = TurnContext::new("+5491187654321");
        assert_eq!(
            ctx.begin(ActionKind::FoodLogEntryConfirmation),
            GuardDecision::Proceed
        );
        assert_eq!(
            ctx.begin(ActionKind::FoodLogEntryConfirmation),
            GuardDecision::Duplicate
        );
        assert_eq!(ctx.invoked(), vec![ActionKind::FoodLogEntryConfirmation]);
    }

    #[test]
    fn test_forbidden_is_blocked_and_not_recorded() {
        let mut ctx = TurnContext::new("+5491187654321");
        assert!(ctx.begin(ActionKind::NewPendingFoodLogEntry).is_proceed());
        ctx.forbid(ActionKind::FoodLogEntryConfirmation);

        assert_eq!(
            ctx.begin(ActionKind::FoodLogEntryConfirmation),
            GuardDecision::Forbidden
        );
        assert!(!ctx.was_invoked(ActionKind::FoodLogEntryConfirmation));
    }

    #[test]
    fn test_invocation_order() {
        let mut ctx = TurnContext::new("+1");
        ctx.begin(ActionKind::SaveProfileData);
        ctx.begin(ActionKind::RequestMissingInformation);
        assert_eq!(
            ctx.invoked(),
            vec![
                ActionKind::SaveProfileData,
                ActionKind::RequestMissingInformation
            ]
        );
        assert_eq!(ctx.phone(), "+1");
    }
}
