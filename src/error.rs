//! Structured error types for the simulation kernel.
//!
//! All fallible public APIs return `Result<T, KineticaError>`. Everything
//! here is a *configuration* error in the sense of the error taxonomy:
//! it is detected while building rules, surfaces, or parsing input, and
//! aborts construction before a single reaction fires. Numerical
//! degeneracies during sampling (rate-zero waiting times) are recovered
//! locally and never surface as errors; queue exhaustion is normal
//! termination, signalled through `done()` / `None`, not through `Err`.

use crate::surface::{NodeId, Position};

/// The top-level error type for the kinetica simulation kernel.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum KineticaError {
    // ── Rule errors ───────────────────────────────────────

    /// A rule was declared with a reactant count other than 1 or 2.
    UnsupportedArity { rule: String, arity: usize },

    /// A rule's product list does not match its reactant list in length.
    MismatchedOutputs {
        rule: String,
        inputs: usize,
        outputs: usize,
    },

    /// A rule was declared with a rate that is zero, negative, or non-finite.
    InvalidRate { rule: String, rate: f64 },

    // ── Surface errors ────────────────────────────────────

    /// Two nodes were added at the same position.
    DuplicatePosition(Position),

    /// A node ID was referenced but does not exist on the surface.
    UnknownNode(NodeId),

    /// A global-state entry referenced a position with no node.
    UnknownPosition(Position),

    /// An adjacency edge was declared with a zero, negative, or
    /// non-finite weight.
    InvalidWeight { weight: f64 },

    // ── Reader errors ─────────────────────────────────────

    /// A constraint line could not be parsed.
    MalformedConstraint { line: String, reason: String },

    /// A transition-rule line could not be parsed.
    MalformedRule { line: String, reason: String },

    // ── Output errors ─────────────────────────────────────

    /// Writing tabular profiler output failed.
    OutputError(String),
}

impl std::fmt::Display for KineticaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KineticaError::UnsupportedArity { rule, arity } => write!(
                f,
                "rule \"{}\": only rules with one or two reactants are allowed (got {})",
                rule, arity
            ),
            KineticaError::MismatchedOutputs {
                rule,
                inputs,
                outputs,
            } => write!(
                f,
                "rule \"{}\": {} reactants but {} products",
                rule, inputs, outputs
            ),
            KineticaError::InvalidRate { rule, rate } => write!(
                f,
                "rule \"{}\": rate must be positive and finite (got {})",
                rule, rate
            ),
            KineticaError::DuplicatePosition(pos) => {
                write!(f, "a node already exists at {}", pos)
            }
            KineticaError::UnknownNode(id) => write!(f, "node {} not found", id),
            KineticaError::UnknownPosition(pos) => {
                write!(f, "no node at {}", pos)
            }
            KineticaError::InvalidWeight { weight } => write!(
                f,
                "edge weight must be positive and finite (got {})",
                weight
            ),
            KineticaError::MalformedConstraint { line, reason } => {
                write!(f, "invalid constraint \"{}\": {}", line, reason)
            }
            KineticaError::MalformedRule { line, reason } => {
                write!(f, "invalid transition rule \"{}\": {}", line, reason)
            }
            KineticaError::OutputError(msg) => write!(f, "output error: {}", msg),
        }
    }
}

impl std::error::Error for KineticaError {}

/// Convenience alias for `Result<T, KineticaError>`.
pub type KineticaResult<T> = Result<T, KineticaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_unsupported_arity() {
        let e = KineticaError::UnsupportedArity {
            rule: "A + B + C -> D + E + F".into(),
            arity: 3,
        };
        let s = e.to_string();
        assert!(s.contains("A + B + C"));
        assert!(s.contains("got 3"));
    }

    #[test]
    fn test_display_invalid_rate() {
        let e = KineticaError::InvalidRate {
            rule: "A -> B".into(),
            rate: -1.0,
        };
        assert!(e.to_string().contains("-1"));
    }

    #[test]
    fn test_display_unknown_node() {
        let e = KineticaError::UnknownNode(NodeId::new(7));
        assert_eq!(e.to_string(), "node N7 not found");
    }

    #[test]
    fn test_display_malformed_constraint() {
        let e = KineticaError::MalformedConstraint {
            line: "A,B".into(),
            reason: "must have exactly three parts".into(),
        };
        assert!(e.to_string().contains("A,B"));
        assert!(e.to_string().contains("three parts"));
    }

    #[test]
    fn test_error_is_std_error() {
        let e: Box<dyn std::error::Error> =
            Box::new(KineticaError::UnknownNode(NodeId::new(0)));
        assert!(!e.to_string().is_empty());
    }

    #[test]
    fn test_result_alias() {
        let ok: KineticaResult<u32> = Ok(3);
        assert_eq!(ok.unwrap(), 3);
        let err: KineticaResult<u32> =
            Err(KineticaError::DuplicatePosition(Position::new(0, 0)));
        assert!(err.is_err());
    }
}
