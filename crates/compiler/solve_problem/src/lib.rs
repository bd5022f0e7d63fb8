//! Provides types to describe problems that can occur during unification.
//!
//! None of these abort a unification: they are collected while the traversal carries on, and
//! the pair that produced one is left un-unified.
use std::fmt;

use tvar_error_macros::unimplemented_message;
use tvar_types::ident::Lowercase;
use tvar_types::subs::{Kind, Variable};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    /// The two nodes are different variants.
    ClassMismatch {
        left: Variable,
        right: Variable,
        left_type: String,
        right_type: String,
    },
    /// Two functions whose parameter or return counts differ.
    ArityMismatch {
        left: Variable,
        right: Variable,
        left_type: String,
        right_type: String,
    },
    /// A closed struct lacked a field that the instantiated scheme requires. The field was
    /// filled with a `Miss` node.
    MissingField {
        record: Variable,
        field: Lowercase,
        record_type: String,
    },
    /// Unification of these variants is not defined.
    Unimplemented {
        kind: Kind,
        left: Variable,
        right: Variable,
        left_type: String,
        right_type: String,
    },
}

impl Mismatch {
    /// The pair of nodes the problem was found at.
    pub fn variables(&self) -> (Variable, Variable) {
        match self {
            Mismatch::ClassMismatch { left, right, .. }
            | Mismatch::ArityMismatch { left, right, .. }
            | Mismatch::Unimplemented { left, right, .. } => (*left, *right),
            Mismatch::MissingField { record, .. } => (*record, *record),
        }
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Mismatch::ClassMismatch {
                left_type,
                right_type,
                ..
            } => write!(f, "cannot unify {left_type} and {right_type}"),
            Mismatch::ArityMismatch {
                left_type,
                right_type,
                ..
            } => write!(
                f,
                "cannot unify {left_type} and {right_type}: they take or return a different number of values"
            ),
            Mismatch::MissingField {
                field, record_type, ..
            } => write!(f, "missing field `{field}` in {record_type}"),
            Mismatch::Unimplemented {
                kind,
                left_type,
                right_type,
                ..
            } => write!(
                f,
                "cannot unify {left_type} and {right_type}: {}",
                unimplemented_message!(format!("unification of two {kind}s"))
            ),
        }
    }
}

/// Every mismatch found by one top-level call, in the order they were found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostics {
    mismatches: Vec<Mismatch>,
}

impl Diagnostics {
    /// `None` when there is nothing to report.
    pub fn from_mismatches(mismatches: Vec<Mismatch>) -> Option<Self> {
        if mismatches.is_empty() {
            None
        } else {
            Some(Diagnostics { mismatches })
        }
    }

    pub fn mismatches(&self) -> &[Mismatch] {
        &self.mismatches
    }

    pub fn len(&self) -> usize {
        self.mismatches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mismatches.is_empty()
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (index, mismatch) in self.mismatches.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }

            write!(f, "{mismatch}")?;
        }

        Ok(())
    }
}

impl std::error::Error for Diagnostics {}
