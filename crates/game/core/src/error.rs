//! Common error infrastructure for delve-core.
//!
//! The rules layer is defensive by default: malformed modifiers, unknown
//! elite ids and cramped rooms degrade to no-ops or shorter results rather
//! than errors. The only fallible surface is a hook handler, whose failure is
//! contained by [`crate::stats::ModifierEngine::emit_game_event`].

use crate::stats::{GameEvent, HookCriticality, ModifierId, ModifierSource};

/// Severity level of an error, used for categorization and logging priority.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// The effect did not apply this time; later calls may succeed.
    Recoverable,

    /// Invalid input from a content definition or call site.
    Validation,

    /// Unexpected state inconsistency; indicates a bug.
    Internal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Common trait for all delve errors.
pub trait GameError: std::fmt::Display + std::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Static identifier for metrics and tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Failure reported by a hook handler.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum HookError {
    /// The payload lacked a field this hook needs.
    #[error("payload for {event} is missing {field}")]
    MissingPayload {
        event: GameEvent,
        field: &'static str,
    },

    /// The hook ran but decided it could not apply.
    #[error("hook rejected event: {0}")]
    Rejected(String),
}

impl GameError for HookError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::MissingPayload { .. } => ErrorSeverity::Internal,
            Self::Rejected(_) => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingPayload { .. } => "HOOK_MISSING_PAYLOAD",
            Self::Rejected(_) => "HOOK_REJECTED",
        }
    }
}

/// A hook failure, with the identity of the modifier whose handler failed.
#[derive(Clone, Debug, PartialEq)]
pub struct HookFailure {
    pub id: ModifierId,
    pub source: ModifierSource,
    pub event: GameEvent,
    pub criticality: HookCriticality,
    pub error: HookError,
}
