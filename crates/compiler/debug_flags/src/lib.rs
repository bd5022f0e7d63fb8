//! Flags for debugging the unification engine.
//!
//! Lists environment variable flags that can be enabled for verbose debugging features in debug
//! builds.
//!
//! For example, the following alias runs cargo with every top-level unification and every
//! mismatch printed:
//!
//! ```bash
//! alias cargo="\
//!   TVAR_PRINT_UNIFICATIONS=1 \
//!     TVAR_PRINT_MISMATCHES=1 \
//!   cargo"
//! ```
//!
//! Setting a flag to `0` is the same as leaving it unset.

#[macro_export]
macro_rules! dbg_set {
    ($flag:path) => {{
        #[cfg(not(debug_assertions))]
        {
            false
        }
        #[cfg(debug_assertions)]
        {
            let flag = std::env::var($flag);
            flag.is_ok() && flag.as_deref() != Ok("0")
        }
    }};
}

#[macro_export]
macro_rules! dbg_do {
    ($flag:path, $expr:expr) => {
        #[cfg(debug_assertions)]
        {
            if $crate::dbg_set!($flag) {
                $expr
            }
        }
    };
}

macro_rules! flags {
    ($($(#[doc = $doc:expr])+ $flag:ident)*) => {$(
        $(#[doc = $doc])+
        pub static $flag: &str = stringify!($flag);
    )*};
}

flags! {
    // ===Types===

    /// Prints every type with uid-based names (`V<uid>`, `X<uid>`) instead of letters.
    TVAR_PRETTY_PRINT_UIDS

    // ===Unify===

    /// Prints both sides of each top-level unification, before and after it happens.
    /// Only use this in single-threaded mode!
    TVAR_PRINT_UNIFICATIONS

    /// Prints all mismatches hit during unification, with the location that raised them.
    TVAR_PRINT_MISMATCHES

    // ===Generalize===

    /// Prints the source and the result of every `fresh` copy.
    TVAR_PRINT_FRESH

    /// Prints the non-generic closure computed for each generalization.
    TVAR_PRINT_NONGENERIC
}
