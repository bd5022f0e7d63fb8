//! Builders and assertions shared by the unification engine's test suites.
//!
//! The builders allocate straight into a [`Subs`], so a test reads like the type it builds:
//! `record(&mut subs, Some("P"), &[("x", int)], false)` is `P{x: Int}`.

use tvar_types::ident::{Lowercase, Term, Uppercase};
use tvar_types::pretty_print::{name_and_print_var, DebugPrint};
use tvar_types::subs::{Subs, Variable};

#[doc(hidden)]
pub use pretty_assertions::assert_eq as _pretty_assert_eq;

/// Makes `assert_eq!` show a `Display` value as its text, so multi-line output diffs line by
/// line.
#[derive(PartialEq, Eq)]
pub struct DebugAsDisplay<T>(pub T);

impl<T: std::fmt::Display> std::fmt::Debug for DebugAsDisplay<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[macro_export]
macro_rules! assert_multiline_str_eq {
    ($a:expr, $b:expr) => {
        $crate::_pretty_assert_eq!($crate::DebugAsDisplay($a), $crate::DebugAsDisplay($b))
    };
}

// PRINTING

pub fn print(subs: &Subs, var: Variable) -> String {
    name_and_print_var(var, subs, DebugPrint::NOTHING)
}

pub fn print_uids(subs: &Subs, var: Variable) -> String {
    name_and_print_var(var, subs, DebugPrint::VARIABLES)
}

pub fn field_names(subs: &Subs, var: Variable) -> Vec<String> {
    subs.fields(var)
        .map(|(name, _)| name.as_str().to_string())
        .collect()
}

// BUILDING

pub fn base(subs: &mut Subs, name: &str) -> Variable {
    subs.new_base(Term::new(name))
}

pub fn int(subs: &mut Subs) -> Variable {
    base(subs, "Int")
}

pub fn str(subs: &mut Subs) -> Variable {
    base(subs, "Str")
}

/// A struct with the given fields, all filled in.
pub fn record(
    subs: &mut Subs,
    name: Option<&str>,
    fields: &[(&str, Variable)],
    open: bool,
) -> Variable {
    let fields: Vec<(Lowercase, Variable)> = fields
        .iter()
        .map(|(field, var)| (Lowercase::from(*field), *var))
        .collect();

    subs.new_struct(name.map(Uppercase::from), fields, open)
}

/// `name{next: <itself>, value: value}`, closed.
pub fn linked_list(subs: &mut Subs, name: &str, value: Variable) -> Variable {
    let hole = subs.new_leaf();
    let node = record(subs, Some(name), &[("next", hole), ("value", value)], false);

    subs.union(hole, node);

    node
}

#[cfg(test)]
mod test {
    use super::{field_names, linked_list, print, print_uids, record};
    use tvar_types::subs::Subs;

    #[test]
    fn multiline_strings_compare_as_text() {
        assert_multiline_str_eq!("a\nb", "a\nb");
    }

    #[test]
    fn builders_produce_what_they_print() {
        let mut subs = Subs::new();
        let value = subs.new_leaf();
        let list = linked_list(&mut subs, "List", value);
        let empty = record(&mut subs, Some("Unit"), &[], false);

        assert_eq!(print(&subs, list), "$A=List{next: $A, value: B}");
        assert_eq!(print_uids(&subs, list), "X2=List{next: X2, value: V0}");
        assert_eq!(field_names(&subs, list), vec!["next", "value"]);
        assert_eq!(print(&subs, empty), "Unit{}");
    }
}
