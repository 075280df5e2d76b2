//! Text readers for rule and constraint files.
//!
//! These sit at the boundary of the kernel: they turn already-loaded
//! text into the `Rule` and constraint values the scheduler is
//! constructed from. Both formats share the same line discipline —
//! lines beginning with `#` or `%` are comments, blank lines are
//! skipped, and an optional sentinel line ends the section (anything
//! after it is left for other readers).
//!
//! Constraint lines:
//!
//! ```text
//! name1, name2, <distance>
//! ```
//!
//! Transition-rule lines:
//!
//! ```text
//! A + B -> C + D, <rate>
//! A -> B, <rate>
//! ```
//!
//! Species names are alphanumeric (underscores allowed). Malformed
//! lines are configuration errors carrying the offending line.

use crate::error::{KineticaError, KineticaResult};
use crate::rule::{Rule, Species};

/// Sentinel terminating a constraints section.
pub const END_CONSTRAINTS: &str = "!END_CONSTRAINTS";

/// Sentinel terminating a transition-rules section.
pub const END_TRANSITION_RULES: &str = "!END_TRANSITION_RULES";

/// A pairwise distance constraint between two species.
///
/// The transition between `first` and `second` cannot happen when the
/// two are more than `distance` apart.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct DistanceConstraint {
    pub first: Species,
    pub second: Species,
    pub distance: f64,
}

/// Parse a constraints section from text.
pub fn parse_constraints(input: &str) -> KineticaResult<Vec<DistanceConstraint>> {
    let mut constraints = Vec::new();
    for line in section_lines(input, END_CONSTRAINTS) {
        constraints.push(parse_constraint_line(line)?);
    }
    Ok(constraints)
}

/// Parse a transition-rules section from text.
pub fn parse_rules(input: &str) -> KineticaResult<Vec<Rule>> {
    let mut rules = Vec::new();
    for line in section_lines(input, END_TRANSITION_RULES) {
        rules.push(parse_rule_line(line)?);
    }
    Ok(rules)
}

/// Content lines of a section: comments and blanks skipped, stopping at
/// the sentinel.
fn section_lines<'a>(
    input: &'a str,
    sentinel: &'a str,
) -> impl Iterator<Item = &'a str> {
    input
        .lines()
        .map(str::trim)
        .take_while(move |line| !line.starts_with(sentinel))
        .filter(|line| {
            !(line.is_empty() || line.starts_with('#') || line.starts_with('%'))
        })
}

fn parse_constraint_line(line: &str) -> KineticaResult<DistanceConstraint> {
    let malformed = |reason: &str| KineticaError::MalformedConstraint {
        line: line.to_owned(),
        reason: reason.to_owned(),
    };

    let tokens: Vec<&str> = line.split(',').collect();
    if tokens.len() != 3 {
        return Err(malformed("must have exactly three parts"));
    }
    let first = parse_species_token(tokens[0])
        .ok_or_else(|| malformed("species names must be alphanumeric"))?;
    let second = parse_species_token(tokens[1])
        .ok_or_else(|| malformed("species names must be alphanumeric"))?;
    let distance: f64 = tokens[2]
        .trim()
        .parse()
        .map_err(|_| malformed("distance must be a number"))?;
    if !(distance.is_finite() && distance >= 0.0) {
        return Err(malformed("distance must be finite and non-negative"));
    }
    Ok(DistanceConstraint {
        first,
        second,
        distance,
    })
}

fn parse_rule_line(line: &str) -> KineticaResult<Rule> {
    let malformed = |reason: String| KineticaError::MalformedRule {
        line: line.to_owned(),
        reason,
    };

    // Rate comes after the last comma; the reaction before it.
    let (reaction, rate_token) = line
        .rsplit_once(',')
        .ok_or_else(|| malformed("missing rate (expected \"A -> B, <rate>\")".into()))?;
    let rate: f64 = rate_token
        .trim()
        .parse()
        .map_err(|_| malformed("rate must be a number".into()))?;

    let (lhs, rhs) = reaction
        .split_once("->")
        .ok_or_else(|| malformed("missing \"->\"".into()))?;
    let inputs = parse_species_list(lhs)
        .ok_or_else(|| malformed("species names must be alphanumeric".into()))?;
    let outputs = parse_species_list(rhs)
        .ok_or_else(|| malformed("species names must be alphanumeric".into()))?;

    Rule::new(inputs, outputs, rate)
}

/// One side of a reaction: species joined by `+`.
fn parse_species_list(side: &str) -> Option<Vec<Species>> {
    side.split('+').map(parse_species_token).collect()
}

/// A single species name: non-empty, alphanumeric or underscore.
fn parse_species_token(token: &str) -> Option<Species> {
    let token = token.trim();
    let valid = !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    valid.then(|| Species::from(token))
}
