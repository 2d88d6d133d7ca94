use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Keep,
    Refresh,
    Consolidate,
    Prune,
    Redirect,
}

impl ActionType {
    pub const ALL: [ActionType; 5] = [
        ActionType::Keep,
        ActionType::Refresh,
        ActionType::Consolidate,
        ActionType::Prune,
        ActionType::Redirect,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Keep => "keep",
            ActionType::Refresh => "refresh",
            ActionType::Consolidate => "consolidate",
            ActionType::Prune => "prune",
            ActionType::Redirect => "redirect",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ActionType::Keep => "Keep",
            ActionType::Refresh => "Refresh",
            ActionType::Consolidate => "Consolidate",
            ActionType::Prune => "Prune",
            ActionType::Redirect => "Redirect",
        }
    }

    /// Whether applying this action takes the URL out of the index.
    pub fn removes_from_index(&self) -> bool {
        matches!(
            self,
            ActionType::Prune | ActionType::Redirect | ActionType::Consolidate
        )
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The chosen action. Only consolidate/redirect carry a target and only refresh carries a brief.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Action {
    Keep,
    Refresh {
        #[serde(rename = "refreshBrief")]
        refresh_brief: String,
    },
    Consolidate {
        #[serde(rename = "targetUrl")]
        target_url: String,
    },
    Prune,
    Redirect {
        #[serde(rename = "targetUrl")]
        target_url: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionDecision {
    #[serde(flatten)]
    pub action: Action,
    pub rationale: String,
    pub risk: u8,
    pub confidence: u8,
}

impl ActionDecision {
    pub fn new(action: Action, rationale: impl Into<String>, risk: u8, confidence: u8) -> Self {
        Self {
            action,
            rationale: rationale.into(),
            risk,
            confidence,
        }
    }

    pub fn action_type(&self) -> ActionType {
        match self.action {
            Action::Keep => ActionType::Keep,
            Action::Refresh { .. } => ActionType::Refresh,
            Action::Consolidate { .. } => ActionType::Consolidate,
            Action::Prune => ActionType::Prune,
            Action::Redirect { .. } => ActionType::Redirect,
        }
    }

    pub fn target_url(&self) -> Option<&str> {
        match &self.action {
            Action::Consolidate { target_url } | Action::Redirect { target_url } => {
                Some(target_url)
            }
            _ => None,
        }
    }

    pub fn refresh_brief(&self) -> Option<&str> {
        match &self.action {
            Action::Refresh { refresh_brief } => Some(refresh_brief),
            _ => None,
        }
    }
}

/// Review lifecycle of a decision once handed to the persistence layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    #[default]
    Pending,
    Approved,
    Applied,
    RolledBack,
}

impl ActionStatus {
    pub fn can_transition_to(&self, next: ActionStatus) -> bool {
        matches!(
            (self, next),
            (ActionStatus::Pending, ActionStatus::Approved)
                | (ActionStatus::Approved, ActionStatus::Pending)
                | (ActionStatus::Approved, ActionStatus::Applied)
                | (ActionStatus::Applied, ActionStatus::RolledBack)
        )
    }

    pub fn transition(self, next: ActionStatus) -> Result<ActionStatus, String> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(format!("Invalid action status transition: {self:?} -> {next:?}"))
        }
    }
}
