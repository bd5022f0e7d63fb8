mod unify;

pub use unify::UnificationMode;
