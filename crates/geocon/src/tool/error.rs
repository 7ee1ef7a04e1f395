use std::fmt;

use crate::doc::{Ref, RefKind};

/// Authoring and replay failures of the custom tool subsystem.
#[derive(Clone, Debug, PartialEq)]
pub enum ToolError {
    /// The output is an input, a free point, or reaches no input at all.
    NotDerived,
    ZeroRadius,
    /// A relation with no step representation (too many constraints, unrealizable hint).
    Unsupported { reason: String },
    UnknownObject(Ref),
    InputMismatch { expected: Vec<RefKind>, reason: String },
    /// A step whose geometry does not exist for the replay inputs.
    Degenerate { step: usize, reason: String },
    /// Every candidate root violates a recorded hint.
    Unresolved { step: usize },
}

impl ToolError {
    pub(crate) fn unsupported(reason: impl Into<String>) -> Self {
        Self::Unsupported {
            reason: reason.into(),
        }
    }

    pub(crate) fn degenerate(step: usize, reason: impl Into<String>) -> Self {
        Self::Degenerate {
            step,
            reason: reason.into(),
        }
    }

    pub(crate) fn mismatch(expected: &[RefKind], reason: impl Into<String>) -> Self {
        Self::InputMismatch {
            expected: expected.to_vec(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotDerived => f.write_str("Output must be derived from inputs."),
            Self::ZeroRadius => f.write_str("Circle radius must be nonzero."),
            Self::Unsupported { .. } => f.write_str("Unsupported geometry."),
            Self::UnknownObject(r) => write!(f, "unknown object {r}"),
            Self::InputMismatch { expected, reason } => {
                let kinds: Vec<&str> = expected.iter().map(|k| k.as_str()).collect();
                write!(f, "tool expects inputs [{}]: {reason}", kinds.join(", "))
            }
            Self::Degenerate { step, reason } => write!(f, "step {step} is degenerate: {reason}"),
            Self::Unresolved { step } => write!(f, "step {step}: no intersection satisfies the recorded hints"),
        }
    }
}

impl std::error::Error for ToolError {}
