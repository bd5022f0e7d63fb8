//! Provides macros for consistent reporting of errors in tvar's rust code.

/// `internal_error!` should be used whenever an invariant of the unification engine is broken.
/// It indicates a bug in the engine or in the driver calling it, never a type error in the
/// program being checked.
#[macro_export]
macro_rules! internal_error {
    ($($arg:tt)*) => ({
        eprintln!("An internal expectation of the type-variable engine was broken.");
        eprintln!("This is a bug in the engine or in the driver calling it.");
        #[allow(clippy::panic)] {
            panic!($($arg)*);
        }
    })
}

/// Marks a unification that is known to be undefined. Unlike `todo!`, the caller decides how
/// loudly to surface it; the macro only produces the message text.
#[macro_export]
macro_rules! unimplemented_message {
    ($what:expr) => {
        format!("{} is not defined yet", $what)
    };
}
