use crate::subs::{Content, OptVariable, Subs, Variable};
use std::fmt;
use tvar_collections::{MutMap, VisitedSet};
use tvar_debug_flags::{dbg_set, TVAR_PRETTY_PRINT_UIDS};

static ABSENT: &str = "_";
static MISSING: &str = "<missing>";
static OPEN_ROW: &str = "...";

#[derive(Clone, Copy, Debug)]
pub struct DebugPrint {
    /// Name leaves `V<uid>` and recursion points `X<uid>` instead of handing out letters.
    pub print_variables: bool,
}

impl DebugPrint {
    pub const NOTHING: DebugPrint = DebugPrint {
        print_variables: false,
    };

    pub const VARIABLES: DebugPrint = DebugPrint {
        print_variables: true,
    };
}

struct Env<'a> {
    subs: &'a Subs,
    debug: DebugPrint,
    names: MutMap<Variable, String>,
    letters_taken: u32,
    /// Structures currently being printed, with the offset in the buffer where each began.
    in_progress: MutMap<Variable, usize>,
    /// Structures that were referred to from inside themselves.
    recursive: VisitedSet,
}

/// The `index`th display name: `A` .. `Z`, then `A1` .. `Z1`, and so on.
pub fn name_type_var(index: u32) -> String {
    let letter = (b'A' + (index % 26) as u8) as char;
    let round = index / 26;

    if round == 0 {
        letter.to_string()
    } else {
        format!("{letter}{round}")
    }
}

impl Env<'_> {
    fn leaf_name(&mut self, root: Variable) -> String {
        if self.debug.print_variables {
            return format!("V{}", root.uid());
        }

        self.letter_for(root)
    }

    fn recursion_name(&mut self, root: Variable) -> String {
        self.recursive.insert(root.index());

        if self.debug.print_variables {
            return format!("X{}", root.uid());
        }

        format!("${}", self.letter_for(root))
    }

    fn letter_for(&mut self, root: Variable) -> String {
        if let Some(name) = self.names.get(&root) {
            return name.clone();
        }

        let name = name_type_var(self.letters_taken);
        self.letters_taken += 1;
        self.names.insert(root, name.clone());

        name
    }
}

/// Prints the graph reachable from `var`. Display names are handed out in order of first
/// appearance, so the output is stable for golden tests. A structure that is reached again
/// from inside itself is printed once, prefixed with its name (`$A=`), and referred to by
/// that name afterwards.
pub fn name_and_print_var(var: Variable, subs: &Subs, debug: DebugPrint) -> String {
    let [printed] = name_and_print_vars([var], subs, debug);

    printed
}

/// Prints several graphs with one naming, so a leaf they share has the same name in each
/// and distinct leaves never do.
pub fn name_and_print_vars<const N: usize>(
    vars: [Variable; N],
    subs: &Subs,
    debug: DebugPrint,
) -> [String; N] {
    let debug = if dbg_set!(TVAR_PRETTY_PRINT_UIDS) {
        DebugPrint::VARIABLES
    } else {
        debug
    };

    let mut env = Env {
        subs,
        debug,
        names: MutMap::default(),
        letters_taken: 0,
        in_progress: MutMap::default(),
        recursive: VisitedSet::default(),
    };

    vars.map(|var| {
        let mut buf = String::new();
        write_var(&mut env, var, &mut buf);

        buf
    })
}

fn write_slot(env: &mut Env<'_>, slot: OptVariable, buf: &mut String) {
    match slot.into_variable() {
        Some(var) => write_var(env, var, buf),
        None => buf.push_str(ABSENT),
    }
}

fn write_var(env: &mut Env<'_>, var: Variable, buf: &mut String) {
    let subs = env.subs;
    let root = subs.find_without_compacting(var);

    if env.in_progress.contains_key(&root) {
        let name = env.recursion_name(root);
        buf.push_str(&name);
        return;
    }

    match subs.get_content_unchecked(root) {
        Content::Leaf => {
            let name = env.leaf_name(root);
            buf.push_str(&name);
        }
        Content::Base(term) => buf.push_str(term.name()),
        Content::Miss => buf.push_str(MISSING),
        _ => {
            let start = buf.len();
            env.in_progress.insert(root, start);

            write_structure(env, root, buf);

            env.in_progress.remove(&root);

            if env.recursive.contains(root.index()) {
                let name = env.recursion_name(root);
                buf.insert_str(start, &format!("{name}="));
            }
        }
    }
}

fn write_structure(env: &mut Env<'_>, root: Variable, buf: &mut String) {
    let subs = env.subs;
    let args = subs.get_args_unchecked(root);

    match subs.get_content_unchecked(root) {
        Content::Immut => {
            buf.push_str("immut ");
            write_slot(env, args[0], buf);
        }
        Content::Isa => {
            buf.push_str("isa ");
            write_slot(env, args[0], buf);
        }
        Content::Lambda { nargs } => {
            let (params, returns) = args.split_at(*nargs as usize);

            buf.push_str("fn(");
            write_sequence(env, params, buf);
            buf.push_str(") -> (");
            write_sequence(env, returns, buf);
            buf.push(')');
        }
        Content::Struct(content) => {
            let mut aliases: Vec<_> = content.aliases.iter().map(|name| name.as_str()).collect();
            aliases.sort_unstable();
            buf.push_str(&aliases.join(":"));

            buf.push('{');

            let mut entries = content
                .fields
                .iter()
                .zip(args.iter().copied())
                .collect::<Vec<_>>();
            // the owner goes first; everything else keeps table order
            entries.sort_by_key(|(name, _)| !name.is_owner());

            let mut first = true;
            for (name, slot) in entries {
                if !first {
                    buf.push_str(", ");
                }
                first = false;

                buf.push_str(name.as_str());
                buf.push_str(": ");
                write_slot(env, slot, buf);
            }

            if content.open {
                if !first {
                    buf.push_str(", ");
                }
                buf.push_str(OPEN_ROW);
            }

            buf.push('}');
        }
        Content::Leaf | Content::Base(_) | Content::Miss => {
            unreachable!("flat content is printed by write_var")
        }
    }
}

fn write_sequence(env: &mut Env<'_>, slots: &[OptVariable], buf: &mut String) {
    for (index, slot) in slots.iter().enumerate() {
        if index > 0 {
            buf.push_str(", ");
        }

        write_slot(env, *slot, buf);
    }
}

/// Formats a variable for `Debug` output (e.g. tracing fields) with uid-based names.
pub struct SubsFmtVar<'a>(pub Variable, pub &'a Subs);

impl fmt::Debug for SubsFmtVar<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let printed = name_and_print_var(self.0, self.1, DebugPrint::VARIABLES);

        write!(f, "{}: {}", self.0.uid(), printed)
    }
}

#[cfg(test)]
mod test {
    use super::{
        name_and_print_var, name_and_print_vars, name_type_var, DebugPrint, SubsFmtVar,
    };
    use crate::ident::{Lowercase, Term};
    use crate::subs::Subs;
    use pretty_assertions::assert_eq;

    fn print(subs: &Subs, var: crate::subs::Variable) -> String {
        name_and_print_var(var, subs, DebugPrint::NOTHING)
    }

    #[test]
    fn letters_roll_over_after_z() {
        assert_eq!(name_type_var(0), "A");
        assert_eq!(name_type_var(25), "Z");
        assert_eq!(name_type_var(26), "A1");
        assert_eq!(name_type_var(53), "B2");
    }

    #[test]
    fn shared_leaves_share_a_name() {
        let mut subs = Subs::new();
        let a = subs.new_leaf();
        let b = subs.new_leaf();
        let int = subs.new_base(Term::new("Int"));
        let f = subs.new_lambda(&[a, b, int], &[a]);

        assert_eq!(print(&subs, f), "fn(A, B, Int) -> (A)");
        assert_eq!(
            name_and_print_var(f, &subs, DebugPrint::VARIABLES),
            "fn(V0, V1, Int) -> (V0)"
        );
    }

    #[test]
    fn graphs_printed_together_share_one_naming() {
        let mut subs = Subs::new();
        let a = subs.new_leaf();
        let b = subs.new_leaf();
        let isa_a = subs.new_isa(a);
        let isa_b = subs.new_isa(b);
        let f = subs.new_lambda(&[b], &[a]);

        assert_eq!(
            name_and_print_vars([isa_a, isa_b], &subs, DebugPrint::NOTHING),
            ["isa A", "isa B"]
        );
        assert_eq!(
            name_and_print_vars([isa_b, f], &subs, DebugPrint::NOTHING),
            ["isa A", "fn(A) -> (B)"]
        );
    }

    #[test]
    fn absent_slots_and_wrappers() {
        let mut subs = Subs::new();
        let a = subs.new_leaf();
        let imm = subs.new_immut(a);
        let isa = subs.new_isa(imm);
        let f = subs.new_lambda_slots(1, 0);

        assert_eq!(print(&subs, isa), "isa immut A");
        assert_eq!(print(&subs, f), "fn(_) -> ()");
    }

    #[test]
    fn struct_prints_owner_first_and_openness_last() {
        let mut subs = Subs::new();
        let int = subs.new_base(Term::new("Int"));
        let class = subs.new_base(Term::new("Point"));
        let miss = subs.new_miss();
        let s = subs.new_struct(
            Some("Q".into()),
            [(Lowercase::from("x"), int), (Lowercase::from("y"), miss)],
            true,
        );
        subs.set_owner(s, class);
        subs.add_alias(s, "P".into());

        assert_eq!(print(&subs, s), "P:Q{.: Point, x: Int, y: <missing>, ...}");

        let empty_open = subs.new_struct(None, [], true);
        let empty_closed = subs.new_struct(None, [], false);
        assert_eq!(print(&subs, empty_open), "{...}");
        assert_eq!(print(&subs, empty_closed), "{}");
    }

    #[test]
    fn self_referential_struct_prints_finitely() {
        let mut subs = Subs::new();
        let hole = subs.new_leaf();
        let value = subs.new_leaf();
        let node = subs.new_struct(
            Some("List".into()),
            [(Lowercase::from("next"), hole), (Lowercase::from("value"), value)],
            false,
        );
        subs.union(hole, node);

        assert_eq!(print(&subs, node), "$A=List{next: $A, value: B}");
        assert_eq!(
            name_and_print_var(node, &subs, DebugPrint::VARIABLES),
            "X2=List{next: X2, value: V1}"
        );
        assert_eq!(
            format!("{:?}", SubsFmtVar(hole, &subs)),
            "0: X2=List{next: X2, value: V1}"
        );
    }
}
