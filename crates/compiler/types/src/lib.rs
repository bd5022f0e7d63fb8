//! Provides the arena of type variables, [`subs::Subs`], together with its union-find
//! table and a cycle-safe pretty printer.
#![warn(clippy::dbg_macro)]
pub mod ident;
pub mod pretty_print;
pub mod subs;
mod unification_table;
