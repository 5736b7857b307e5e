//! Pre-submission well-formedness validation.
//!
//! The gate normalizes premise/conclusion input through the external
//! parser before a proof may be constructed or saved. It is a pure
//! boundary: no catalog or session state is touched here.

use std::sync::Arc;

use proofdeck_error::{FormulaRole, ValidationError, ValidationResult};
use proofdeck_types::ProofType;

use crate::traits::FormulaParser;

//-----------------------------------------------------------------------------
// Separator Policy
//-----------------------------------------------------------------------------

/// How raw premise text is split into segments.
///
/// The defaults match the classic entry format: segments are divided by
/// commas or semicolons with surrounding whitespace absorbed into the
/// divider. Whitespace runs alone can be made dividers too, but formulas
/// may legitimately contain spaces, so that is opt-in.
#[derive(Debug, Clone)]
pub struct SeparatorPolicy {
    /// Characters that divide segments
    separators: Vec<char>,

    /// Whether a bare whitespace run also divides segments
    whitespace_splits: bool,
}

impl Default for SeparatorPolicy {
    fn default() -> Self {
        Self {
            separators: vec![',', ';'],
            whitespace_splits: false,
        }
    }
}

impl SeparatorPolicy {
    /// A policy where bare whitespace runs also divide segments
    pub fn with_whitespace() -> Self {
        Self {
            whitespace_splits: true,
            ..Self::default()
        }
    }

    fn is_separator(&self, c: char) -> bool {
        self.separators.contains(&c)
    }

    /// Split raw input into trimmed, non-empty segments.
    ///
    /// Leading and trailing separator noise is dropped; a run of
    /// separators and whitespace counts as a single divider.
    pub fn split<'a>(&self, raw: &'a str) -> Vec<&'a str> {
        let mut segments = Vec::new();
        let mut start: Option<usize> = None;
        let mut content_end = 0;

        let mut iter = raw.char_indices().peekable();
        while let Some((i, c)) = iter.next() {
            let divides =
                self.is_separator(c) || (self.whitespace_splits && c.is_whitespace());

            if divides {
                if let Some(s) = start.take() {
                    segments.push(&raw[s..content_end]);
                }
                // Consume the rest of the divider run
                while let Some(&(_, next)) = iter.peek() {
                    if self.is_separator(next) || next.is_whitespace() {
                        iter.next();
                    } else {
                        break;
                    }
                }
            } else if !c.is_whitespace() {
                if start.is_none() {
                    start = Some(i);
                }
                content_end = i + c.len_utf8();
            }
        }

        if let Some(s) = start {
            segments.push(&raw[s..content_end]);
        }

        segments.retain(|s| !s.is_empty());
        segments
    }
}

//-----------------------------------------------------------------------------
// Validation Gate
//-----------------------------------------------------------------------------

/// Validates premise and conclusion input through the external parser
pub struct ValidationGate {
    /// The well-formedness checker
    parser: Arc<dyn FormulaParser>,

    /// Premise splitting configuration
    policy: SeparatorPolicy,
}

impl ValidationGate {
    /// Create a gate with the default separator policy
    pub fn new(parser: Arc<dyn FormulaParser>) -> Self {
        Self {
            parser,
            policy: SeparatorPolicy::default(),
        }
    }

    /// Create a gate with a custom separator policy
    pub fn with_policy(parser: Arc<dyn FormulaParser>, policy: SeparatorPolicy) -> Self {
        Self { parser, policy }
    }

    /// Validate raw premise text; returns the canonical renderings.
    ///
    /// Fails fast on the first bad segment. Premise indices in errors are
    /// 1-based. The closure check only applies in predicate logic.
    pub fn validate_premises(
        &self,
        raw: &str,
        proof_type: ProofType,
    ) -> ValidationResult<Vec<String>> {
        let mut validated = Vec::new();

        for (position, segment) in self.policy.split(raw).iter().enumerate() {
            let index = position + 1;
            let normalized = self.parser.normalize(segment);

            let parsed = self.parser.parse(&normalized).ok_or_else(|| {
                ValidationError::MalformedPremise {
                    index,
                    text: normalized.clone(),
                }
            })?;

            if proof_type.is_predicate() && !parsed.is_closed() {
                return Err(ValidationError::UnclosedFormula {
                    role: FormulaRole::Premise,
                    index: Some(index),
                });
            }

            validated.push(parsed.rendered);
        }

        Ok(validated)
    }

    /// Validate the conclusion; returns the canonical rendering
    pub fn validate_conclusion(
        &self,
        raw: &str,
        proof_type: ProofType,
    ) -> ValidationResult<String> {
        let normalized = self.parser.normalize(raw);

        let parsed = self.parser.parse(&normalized).ok_or_else(|| {
            ValidationError::MalformedConclusion {
                text: normalized.clone(),
            }
        })?;

        if proof_type.is_predicate() && !parsed.is_closed() {
            return Err(ValidationError::UnclosedFormula {
                role: FormulaRole::Conclusion,
                index: None,
            });
        }

        Ok(parsed.rendered)
    }

    /// Validate a whole argument, conclusion first, then premises in order
    pub fn validate_argument(
        &self,
        premises_raw: &str,
        conclusion_raw: &str,
        proof_type: ProofType,
    ) -> ValidationResult<ValidatedArgument> {
        let conclusion = self.validate_conclusion(conclusion_raw, proof_type)?;
        let premises = self.validate_premises(premises_raw, proof_type)?;

        Ok(ValidatedArgument {
            premises,
            conclusion,
        })
    }
}

/// A validated argument, ready for proof construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedArgument {
    /// Canonical premise renderings, in input order
    pub premises: Vec<String>,

    /// Canonical conclusion rendering
    pub conclusion: String,
}
