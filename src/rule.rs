//! Reaction rules: species labels, validated reaction templates, and the
//! per-state rule index used during reaction discovery.

use std::collections::HashMap;

use crate::error::{KineticaError, KineticaResult};

// ── Species ───────────────────────────────────────────────────────────

/// An opaque chemical species label.
///
/// `Species` is intentionally a newtype around `String` rather than a
/// bare string to prevent accidental confusion with other textual
/// values (positions, rule descriptions) at compile time. Labels have
/// no internal structure; equality and hashing are all the kernel
/// needs from them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Species(String);

impl Species {
    /// Create a species label.
    pub fn new(label: impl Into<String>) -> Self {
        Species(label.into())
    }

    /// Return the label as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Species {
    fn from(label: &str) -> Self {
        Species(label.to_owned())
    }
}

impl From<String> for Species {
    fn from(label: String) -> Self {
        Species(label)
    }
}

impl std::fmt::Display for Species {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ── Rule ──────────────────────────────────────────────────────────────

/// An immutable reaction template.
///
/// A rule maps one or two reactant species to positionally corresponding
/// product species at a fixed rate constant. Fields are private and the
/// constructor validates, so every `Rule` in existence satisfies the
/// arity and rate invariants — the scheduler never has to re-check them
/// at runtime.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Rule {
    inputs: Vec<Species>,
    outputs: Vec<Species>,
    rate: f64,
}

impl Rule {
    /// Create a validated rule.
    ///
    /// Fails if the reactant count is not 1 or 2, if the product list
    /// length differs from the reactant list length, or if the rate is
    /// not a positive finite number.
    pub fn new(
        inputs: Vec<Species>,
        outputs: Vec<Species>,
        rate: f64,
    ) -> KineticaResult<Self> {
        let description = format_reaction(&inputs, &outputs);
        if inputs.is_empty() || inputs.len() > 2 {
            return Err(KineticaError::UnsupportedArity {
                rule: description,
                arity: inputs.len(),
            });
        }
        if outputs.len() != inputs.len() {
            return Err(KineticaError::MismatchedOutputs {
                rule: description,
                inputs: inputs.len(),
                outputs: outputs.len(),
            });
        }
        if !(rate.is_finite() && rate > 0.0) {
            return Err(KineticaError::InvalidRate {
                rule: description,
                rate,
            });
        }
        Ok(Rule {
            inputs,
            outputs,
            rate,
        })
    }

    /// Convenience constructor for a unimolecular rule `A -> B`.
    pub fn unimolecular(
        input: impl Into<Species>,
        output: impl Into<Species>,
        rate: f64,
    ) -> KineticaResult<Self> {
        Rule::new(vec![input.into()], vec![output.into()], rate)
    }

    /// Convenience constructor for a bimolecular rule `A + B -> C + D`.
    pub fn bimolecular(
        inputs: (impl Into<Species>, impl Into<Species>),
        outputs: (impl Into<Species>, impl Into<Species>),
        rate: f64,
    ) -> KineticaResult<Self> {
        Rule::new(
            vec![inputs.0.into(), inputs.1.into()],
            vec![outputs.0.into(), outputs.1.into()],
            rate,
        )
    }

    /// The reactant species, in slot order.
    #[inline]
    pub fn inputs(&self) -> &[Species] {
        &self.inputs
    }

    /// The product species, positionally corresponding to the reactants.
    #[inline]
    pub fn outputs(&self) -> &[Species] {
        &self.outputs
    }

    /// The reaction rate constant.
    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Number of reactants (1 or 2).
    #[inline]
    pub fn arity(&self) -> usize {
        self.inputs.len()
    }

    /// Returns `true` for single-reactant rules.
    #[inline]
    pub fn is_unimolecular(&self) -> bool {
        self.inputs.len() == 1
    }

    /// Returns `true` when both reactant slots carry the same species.
    /// Such rules are combinatorially symmetric and are sampled with
    /// multiplicity 2 during discovery.
    #[inline]
    pub fn is_symmetric(&self) -> bool {
        self.inputs.len() == 2 && self.inputs[0] == self.inputs[1]
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (k = {})",
            format_reaction(&self.inputs, &self.outputs),
            self.rate
        )
    }
}

/// Render `A + B -> C + D` from reactant and product lists.
fn format_reaction(inputs: &[Species], outputs: &[Species]) -> String {
    let side = |species: &[Species]| {
        species
            .iter()
            .map(Species::as_str)
            .collect::<Vec<_>>()
            .join(" + ")
    };
    format!("{} -> {}", side(inputs), side(outputs))
}

// ── Rule ID ───────────────────────────────────────────────────────────

/// A lightweight handle into the scheduler-owned rule table.
///
/// Events reference the rule that would fire through a `RuleId` rather
/// than an owning pointer, keeping events `Copy`-cheap and the rule set
/// immutable and exclusively owned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct RuleId(usize);

impl RuleId {
    /// Wrap a raw index into a `RuleId`.
    #[inline]
    pub fn new(index: usize) -> Self {
        RuleId(index)
    }

    /// Return the raw table index.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "R#{}", self.0)
    }
}

// ── Rule Index ────────────────────────────────────────────────────────

/// Mapping from species label to the rules in which it appears as a
/// reactant. Built once at scheduler construction, read-only afterward.
#[derive(Debug, Clone, Default)]
pub struct RuleIndex {
    by_state: HashMap<Species, Vec<RuleId>>,
}

impl RuleIndex {
    /// Build the index over a rule table. Each rule is listed at most
    /// once per species, even when both its reactant slots carry the
    /// same label.
    pub fn build(rules: &[Rule]) -> Self {
        let mut by_state: HashMap<Species, Vec<RuleId>> = HashMap::new();
        for (index, rule) in rules.iter().enumerate() {
            let id = RuleId::new(index);
            for input in rule.inputs() {
                let candidates = by_state.entry(input.clone()).or_default();
                if !candidates.contains(&id) {
                    candidates.push(id);
                }
            }
        }
        RuleIndex { by_state }
    }

    /// Rules whose reactants include `state`. Empty when the state
    /// participates in no rule.
    pub fn rules_for(&self, state: &Species) -> &[RuleId] {
        self.by_state.get(state).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unimolecular_rule() {
        let rule = Rule::unimolecular("A", "B", 2.0).unwrap();
        assert_eq!(rule.arity(), 1);
        assert!(rule.is_unimolecular());
        assert!(!rule.is_symmetric());
        assert_eq!(rule.rate(), 2.0);
        assert_eq!(rule.inputs(), &[Species::from("A")]);
        assert_eq!(rule.outputs(), &[Species::from("B")]);
    }

    #[test]
    fn test_bimolecular_rule() {
        let rule = Rule::bimolecular(("A", "B"), ("C", "D"), 1.5).unwrap();
        assert_eq!(rule.arity(), 2);
        assert!(!rule.is_unimolecular());
        assert!(!rule.is_symmetric());
    }

    #[test]
    fn test_symmetric_rule() {
        let rule = Rule::bimolecular(("A", "A"), ("B", "C"), 1.0).unwrap();
        assert!(rule.is_symmetric());
    }

    #[test]
    fn test_zero_arity_rejected() {
        let err = Rule::new(vec![], vec![], 1.0).unwrap_err();
        assert!(matches!(
            err,
            KineticaError::UnsupportedArity { arity: 0, .. }
        ));
    }

    #[test]
    fn test_arity_three_rejected() {
        let inputs = vec!["A".into(), "B".into(), "C".into()];
        let outputs = vec!["D".into(), "E".into(), "F".into()];
        let err = Rule::new(inputs, outputs, 1.0).unwrap_err();
        assert!(matches!(
            err,
            KineticaError::UnsupportedArity { arity: 3, .. }
        ));
    }

    #[test]
    fn test_mismatched_outputs_rejected() {
        let err = Rule::new(vec!["A".into()], vec!["B".into(), "C".into()], 1.0)
            .unwrap_err();
        assert!(matches!(err, KineticaError::MismatchedOutputs { .. }));
    }

    #[test]
    fn test_bad_rates_rejected() {
        for rate in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = Rule::unimolecular("A", "B", rate).unwrap_err();
            assert!(
                matches!(err, KineticaError::InvalidRate { .. }),
                "rate {} should be rejected",
                rate
            );
        }
    }

    #[test]
    fn test_rule_display() {
        let rule = Rule::bimolecular(("A", "B"), ("C", "D"), 0.5).unwrap();
        assert_eq!(format!("{}", rule), "A + B -> C + D (k = 0.5)");
    }

    #[test]
    fn test_index_lookup() {
        let rules = vec![
            Rule::unimolecular("A", "B", 1.0).unwrap(),
            Rule::bimolecular(("A", "B"), ("C", "D"), 1.0).unwrap(),
        ];
        let index = RuleIndex::build(&rules);

        let for_a = index.rules_for(&Species::from("A"));
        assert_eq!(for_a, &[RuleId::new(0), RuleId::new(1)]);

        let for_b = index.rules_for(&Species::from("B"));
        assert_eq!(for_b, &[RuleId::new(1)]);

        assert!(index.rules_for(&Species::from("Z")).is_empty());
    }

    #[test]
    fn test_index_deduplicates_symmetric_inputs() {
        let rules = vec![Rule::bimolecular(("A", "A"), ("B", "B"), 1.0).unwrap()];
        let index = RuleIndex::build(&rules);
        // "A" appears in both slots but the rule is listed once.
        assert_eq!(index.rules_for(&Species::from("A")), &[RuleId::new(0)]);
    }
}
