//! Implements unification over a graph of type variables, the heart of
//! [type inference](https://en.wikipedia.org/wiki/Type_inference).
//!
//! Four entry points share one arena, [`tvar_types::subs::Subs`]:
//!
//! - [`unify`] merges two types in place;
//! - [`fresh`] instantiates a generic type, sharing whatever is non-generic;
//! - [`fresh_unify`] instantiates and unifies in one pass;
//! - [`trial_unify_ok`] answers "could these unify?" without touching anything.
//!
//! Each call builds its own session holding the scratch state (seen pairs, collected
//! mismatches, copies), so nothing leaks from one call into the next. The `&mut Subs` borrow
//! rules out reentrant or concurrent use of one arena.
#![warn(clippy::dbg_macro)]

/// Records a mismatch in the env. With `TVAR_PRINT_MISMATCHES` set, also prints where it was
/// raised.
macro_rules! mismatch {
    ($env:expr, $mismatch:expr) => {{
        let mismatch = $mismatch;
        tvar_debug_flags::dbg_do!(tvar_debug_flags::TVAR_PRINT_MISMATCHES, {
            eprintln!(
                "Mismatch in {} Line {} Column {}: {}",
                file!(),
                line!(),
                column!(),
                mismatch
            );
        });
        $env.push_mismatch(mismatch);
    }};
}

mod deep_copy;
mod env;
mod trial;
pub mod unify;

pub use deep_copy::{fresh, fresh_unify};
pub use trial::trial_unify_ok;
pub use unify::{add_field, unify};
