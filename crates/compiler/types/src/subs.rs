use crate::ident::{Lowercase, Term, Uppercase, OWNER_FIELD};
use crate::unification_table::UnificationTable;
use std::fmt;
use tvar_collections::{VecSet, VisitedSet};
use tvar_error_macros::internal_error;

pub use crate::unification_table::Snapshot;

/// A reference to a node of [`Subs`]. The index doubles as the node's uid: it is dense,
/// unique within one `Subs`, and breaks ties between merge directions.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable(u32);

impl Variable {
    #[inline(always)]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn from_index(index: u32) -> Self {
        Variable(index)
    }

    pub const fn uid(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Variable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A child slot. An absent slot is different from a slot holding an unbound leaf.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct OptVariable(u32);

impl OptVariable {
    pub const NONE: OptVariable = OptVariable(u32::MAX);

    pub fn is_none(self) -> bool {
        self == OptVariable::NONE
    }

    pub fn is_some(self) -> bool {
        self != OptVariable::NONE
    }

    pub fn into_variable(self) -> Option<Variable> {
        if self.is_none() {
            None
        } else {
            Some(Variable(self.0))
        }
    }
}

impl fmt::Debug for OptVariable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        (*self).into_variable().fmt(f)
    }
}

impl From<Variable> for OptVariable {
    fn from(var: Variable) -> Self {
        OptVariable(var.0)
    }
}

impl From<Option<Variable>> for OptVariable {
    fn from(opt: Option<Variable>) -> Self {
        match opt {
            Some(var) => var.into(),
            None => OptVariable::NONE,
        }
    }
}

impl From<OptVariable> for Option<Variable> {
    fn from(opt: OptVariable) -> Self {
        opt.into_variable()
    }
}

/// What a node is. The child slots live next to the content in the table; how they are read
/// depends on the variant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Content {
    /// An unbound type variable. No slots.
    Leaf,
    /// An opaque ground term. No slots.
    Base(Term),
    /// Stands in for a struct field that was required but absent. No slots.
    Miss,
    /// One slot.
    Immut,
    /// One slot.
    Isa,
    /// Slots `[0, nargs)` are parameters, the rest are returns.
    Lambda { nargs: u32 },
    /// One slot per field, parallel to the field-name table.
    Struct(StructContent),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StructContent {
    pub fields: Vec<Lowercase>,
    /// Whether fields not yet listed may still show up.
    pub open: bool,
    /// Every type name this struct has been known by.
    pub aliases: VecSet<Uppercase>,
}

impl StructContent {
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.as_str() == name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Leaf,
    Base,
    Miss,
    Immut,
    Isa,
    Lambda,
    Struct,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Kind::Leaf => "type variable",
            Kind::Base => "ground type",
            Kind::Miss => "missing field",
            Kind::Immut => "immutable type",
            Kind::Isa => "isa type",
            Kind::Lambda => "function",
            Kind::Struct => "struct",
        };

        f.write_str(name)
    }
}

impl Content {
    pub fn kind(&self) -> Kind {
        match self {
            Content::Leaf => Kind::Leaf,
            Content::Base(_) => Kind::Base,
            Content::Miss => Kind::Miss,
            Content::Immut => Kind::Immut,
            Content::Isa => Kind::Isa,
            Content::Lambda { .. } => Kind::Lambda,
            Content::Struct(_) => Kind::Struct,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Content::Leaf)
    }
}

#[derive(Clone, Default)]
pub struct Subs {
    utable: UnificationTable,
}

impl fmt::Debug for Subs {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Subs").field("len", &self.len()).finish()
    }
}

impl Subs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.utable.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utable.is_empty()
    }

    /// Allocates a node. The slots must match what `content` expects.
    pub fn fresh(&mut self, content: Content, args: Vec<OptVariable>) -> Variable {
        self.utable.push(content, args)
    }

    pub fn new_leaf(&mut self) -> Variable {
        self.fresh(Content::Leaf, Vec::new())
    }

    pub fn new_base(&mut self, term: Term) -> Variable {
        self.fresh(Content::Base(term), Vec::new())
    }

    pub fn new_miss(&mut self) -> Variable {
        self.fresh(Content::Miss, Vec::new())
    }

    pub fn new_immut(&mut self, child: Variable) -> Variable {
        self.fresh(Content::Immut, vec![child.into()])
    }

    pub fn new_isa(&mut self, child: Variable) -> Variable {
        self.fresh(Content::Isa, vec![child.into()])
    }

    pub fn new_lambda(&mut self, params: &[Variable], returns: &[Variable]) -> Variable {
        let args = params
            .iter()
            .chain(returns.iter())
            .map(|var| OptVariable::from(*var))
            .collect();

        self.fresh(
            Content::Lambda {
                nargs: params.len() as u32,
            },
            args,
        )
    }

    /// A function of the given shape whose slots are all absent.
    pub fn new_lambda_slots(&mut self, nargs: usize, nrets: usize) -> Variable {
        self.fresh(
            Content::Lambda {
                nargs: nargs as u32,
            },
            vec![OptVariable::NONE; nargs + nrets],
        )
    }

    pub fn new_struct<I>(&mut self, name: Option<Uppercase>, fields: I, open: bool) -> Variable
    where
        I: IntoIterator<Item = (Lowercase, Variable)>,
    {
        let mut content = StructContent {
            fields: Vec::new(),
            open,
            aliases: name.into_iter().collect(),
        };
        let mut args = Vec::new();

        for (field, var) in fields {
            if content.position(field.as_str()).is_some() {
                internal_error!("Struct was constructed with the field `{}` twice", field);
            }

            content.fields.push(field);
            args.push(var.into());
        }

        self.fresh(Content::Struct(content), args)
    }

    // UNION-FIND

    /// The leader of `var`'s class. Compacts the path it walked.
    pub fn find(&mut self, var: Variable) -> Variable {
        self.utable.root_key(var)
    }

    /// The leader of `var`'s class, without touching the table.
    pub fn find_without_compacting(&self, var: Variable) -> Variable {
        self.utable.root_key_without_compacting(var)
    }

    pub fn equivalent(&mut self, left: Variable, right: Variable) -> bool {
        self.utable.unioned(left, right)
    }

    /// Whether `var` has been unified into another node.
    pub fn redundant(&self, var: Variable) -> bool {
        self.utable.is_redirect(var)
    }

    /// Redirects `from` into `to` after folding `from`'s struct bookkeeping (openness, alias
    /// names) into `to`. Both must be leaders. Self-union is a no-op.
    pub fn union(&mut self, from: Variable, to: Variable) {
        if from == to {
            return;
        }

        if self.redundant(from) || self.redundant(to) {
            internal_error!(
                "Cannot union {:?} into {:?}: both must be leaders",
                from,
                to
            );
        }

        let absorbed = match self.utable.get_content_unchecked(from) {
            Content::Struct(absorbed) => Some((absorbed.open, absorbed.aliases.clone())),
            _ => None,
        };

        if let (Some((open, aliases)), Content::Struct(survivor)) =
            (absorbed, self.utable.get_content_mut_unchecked(to))
        {
            survivor.open &= open;
            survivor.aliases.union_with(&aliases);
        }

        self.utable.redirect(from, to);
    }

    // CONTENT

    pub fn content(&self, var: Variable) -> &Content {
        self.utable
            .get_content_unchecked(self.find_without_compacting(var))
    }

    pub fn kind(&self, var: Variable) -> Kind {
        self.content(var).kind()
    }

    pub fn args(&self, var: Variable) -> &[OptVariable] {
        self.utable
            .get_args_unchecked(self.find_without_compacting(var))
    }

    /// Content of a leader.
    pub fn get_content_unchecked(&self, root: Variable) -> &Content {
        self.utable.get_content_unchecked(root)
    }

    /// Slots of a leader.
    pub fn get_args_unchecked(&self, root: Variable) -> &[OptVariable] {
        self.utable.get_args_unchecked(root)
    }

    pub fn set_arg_unchecked(&mut self, root: Variable, index: usize, value: Variable) {
        self.utable.get_args_mut_unchecked(root)[index] = value.into();
    }

    /// Overwrites a leader's content and slots, e.g. to fill in a copy that was allocated
    /// before its children were known.
    pub fn set_node_unchecked(&mut self, root: Variable, content: Content, args: Vec<OptVariable>) {
        let node = self.utable.get_node_mut_unchecked(root);

        *node.0 = content;
        *node.1 = args;
    }

    /// The child of an `Immut` or `Isa` node.
    pub fn child(&self, var: Variable) -> Option<Variable> {
        match self.content(var) {
            Content::Immut | Content::Isa => self.args(var)[0].into_variable(),
            other => internal_error!("{:?} is a {}, not a wrapper", var, other.kind()),
        }
    }

    // LAMBDA

    pub fn nargs(&self, var: Variable) -> usize {
        match self.content(var) {
            Content::Lambda { nargs } => *nargs as usize,
            other => internal_error!("{:?} is a {}, not a function", var, other.kind()),
        }
    }

    pub fn lambda_params(&self, var: Variable) -> &[OptVariable] {
        let nargs = self.nargs(var);
        &self.args(var)[..nargs]
    }

    pub fn lambda_returns(&self, var: Variable) -> &[OptVariable] {
        let nargs = self.nargs(var);
        &self.args(var)[nargs..]
    }

    // STRUCT

    pub fn get_struct_unchecked(&self, root: Variable) -> &StructContent {
        match self.utable.get_content_unchecked(root) {
            Content::Struct(content) => content,
            other => internal_error!("{:?} is a {}, not a struct", root, other.kind()),
        }
    }

    fn get_struct_mut(&mut self, var: Variable) -> (&mut StructContent, &mut Vec<OptVariable>) {
        let root = self.find(var);

        match self.utable.get_node_mut_unchecked(root) {
            (Content::Struct(content), args) => (content, args),
            (other, _) => internal_error!("{:?} is a {}, not a struct", root, other.kind()),
        }
    }

    /// The value of field `name`, if the struct has it and the slot is filled.
    pub fn field(&self, var: Variable, name: &str) -> Option<Variable> {
        let root = self.find_without_compacting(var);
        let position = self.get_struct_unchecked(root).position(name)?;

        self.utable.get_args_unchecked(root)[position].into_variable()
    }

    pub fn has_field(&self, var: Variable, name: &str) -> bool {
        let root = self.find_without_compacting(var);

        self.get_struct_unchecked(root).position(name).is_some()
    }

    /// Field names and slots, in table order.
    pub fn fields(&self, var: Variable) -> impl Iterator<Item = (&Lowercase, OptVariable)> {
        let root = self.find_without_compacting(var);
        let names = self.get_struct_unchecked(root).fields.iter();
        let slots = self.utable.get_args_unchecked(root).iter().copied();

        names.zip(slots)
    }

    /// Appends a field without checking whether the name is already present. Use
    /// `tvar_unify::add_field` to get unify-in-place on duplicates.
    pub fn push_field_unchecked(&mut self, root: Variable, name: Lowercase, value: OptVariable) {
        match self.utable.get_node_mut_unchecked(root) {
            (Content::Struct(content), args) => {
                content.fields.push(name);
                args.push(value);
            }
            (other, _) => internal_error!("{:?} is a {}, not a struct", root, other.kind()),
        }
    }

    /// Swap-removes field `name`, returning its value. The order of the remaining fields is
    /// not preserved. The owner field can never be removed.
    pub fn remove_field(&mut self, var: Variable, name: &str) -> Option<Variable> {
        if name == OWNER_FIELD {
            internal_error!("The owner field of {:?} cannot be removed", var);
        }

        let (content, args) = self.get_struct_mut(var);
        let position = content.position(name)?;

        content.fields.swap_remove(position);
        args.swap_remove(position).into_variable()
    }

    pub fn is_open(&self, var: Variable) -> bool {
        let root = self.find_without_compacting(var);

        self.get_struct_unchecked(root).open
    }

    pub fn close(&mut self, var: Variable) {
        self.get_struct_mut(var).0.open = false;
    }

    pub fn set_open_unchecked(&mut self, root: Variable, open: bool) {
        match self.utable.get_content_mut_unchecked(root) {
            Content::Struct(content) => content.open = open,
            other => internal_error!("{:?} is a {}, not a struct", root, other.kind()),
        }
    }

    pub fn aliases(&self, var: Variable) -> &VecSet<Uppercase> {
        let root = self.find_without_compacting(var);

        &self.get_struct_unchecked(root).aliases
    }

    pub fn add_alias(&mut self, var: Variable, name: Uppercase) {
        self.get_struct_mut(var).0.aliases.insert(name);
    }

    pub fn extend_aliases_unchecked(&mut self, root: Variable, names: &VecSet<Uppercase>) {
        match self.utable.get_content_mut_unchecked(root) {
            Content::Struct(content) => content.aliases.union_with(names),
            other => internal_error!("{:?} is a {}, not a struct", root, other.kind()),
        }
    }

    /// The owning class or type, held in the reserved `.` field.
    pub fn owner(&self, var: Variable) -> Option<Variable> {
        self.field(var, OWNER_FIELD)
    }

    pub fn set_owner(&mut self, var: Variable, owner: Variable) {
        let root = self.find(var);

        if self.has_field(root, OWNER_FIELD) {
            internal_error!("The owner of {:?} was already set", root);
        }

        self.push_field_unchecked(root, Lowercase::owner(), owner.into());
    }

    // GRAPH

    /// Whether a cycle is reachable from `var`.
    pub fn is_cyclic(&self, var: Variable) -> bool {
        let root = self.find_without_compacting(var);

        let mut on_stack = VisitedSet::default();
        let mut done = VisitedSet::default();
        let mut stack = vec![(root, 0usize)];
        on_stack.insert(root.index());

        while let Some(top) = stack.last_mut() {
            let (node, position) = *top;
            let args = self.utable.get_args_unchecked(node);

            if position < args.len() {
                top.1 += 1;

                if let Some(child) = args[position].into_variable() {
                    let child = self.find_without_compacting(child);

                    if on_stack.contains(child.index()) {
                        return true;
                    }

                    if !done.contains(child.index()) {
                        on_stack.insert(child.index());
                        stack.push((child, 0));
                    }
                }
            } else {
                stack.pop();
                on_stack.remove(node.index());
                done.insert(node.index());
            }
        }

        false
    }

    // SNAPSHOTS

    pub fn snapshot(&self) -> Snapshot {
        self.utable.snapshot()
    }

    pub fn rollback_to(&mut self, snapshot: Snapshot) {
        self.utable.rollback_to(snapshot)
    }

    pub fn vars_since_snapshot(&self, snapshot: &Snapshot) -> impl Iterator<Item = Variable> {
        self.utable.vars_since_snapshot(snapshot)
    }
}

#[cfg(test)]
mod test {
    use super::{Content, Kind, OptVariable, Subs};
    use crate::ident::{Lowercase, Term, Uppercase};

    fn int(subs: &mut Subs) -> super::Variable {
        subs.new_base(Term::new("Int"))
    }

    #[test]
    fn lambda_slots_split_at_nargs() {
        let mut subs = Subs::new();
        let a = subs.new_leaf();
        let b = subs.new_leaf();
        let r = int(&mut subs);
        let f = subs.new_lambda(&[a, b], &[r]);

        assert_eq!(subs.nargs(f), 2);
        assert_eq!(
            subs.lambda_params(f),
            &[OptVariable::from(a), OptVariable::from(b)]
        );
        assert_eq!(subs.lambda_returns(f), &[OptVariable::from(r)]);

        let g = subs.new_lambda_slots(1, 2);
        assert!(subs.args(g).iter().all(|slot| slot.is_none()));
        assert_eq!(subs.lambda_returns(g).len(), 2);
    }

    #[test]
    fn remove_field_swaps_with_last() {
        let mut subs = Subs::new();
        let (x, y, z) = (int(&mut subs), int(&mut subs), int(&mut subs));
        let s = subs.new_struct(
            None,
            [
                (Lowercase::from("x"), x),
                (Lowercase::from("y"), y),
                (Lowercase::from("z"), z),
            ],
            false,
        );

        assert_eq!(subs.remove_field(s, "x"), Some(x));
        assert_eq!(subs.remove_field(s, "x"), None);

        let names: Vec<_> = subs.fields(s).map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["z", "y"]);
        assert_eq!(subs.field(s, "z"), Some(z));
    }

    #[test]
    #[should_panic(expected = "owner field")]
    fn owner_field_cannot_be_removed() {
        let mut subs = Subs::new();
        let owner = int(&mut subs);
        let s = subs.new_struct(None, [], true);

        subs.set_owner(s, owner);
        assert_eq!(subs.owner(s), Some(owner));

        subs.remove_field(s, ".");
    }

    #[test]
    #[should_panic(expected = "twice")]
    fn duplicate_fields_at_construction_panic() {
        let mut subs = Subs::new();
        let x = int(&mut subs);

        subs.new_struct(
            None,
            [(Lowercase::from("x"), x), (Lowercase::from("x"), x)],
            true,
        );
    }

    #[test]
    fn union_folds_struct_bookkeeping_into_survivor() {
        let mut subs = Subs::new();
        let p = subs.new_struct(Some(Uppercase::from("P")), [], false);
        let q = subs.new_struct(Some(Uppercase::from("Q")), [], true);

        subs.union(p, q);

        assert_eq!(subs.find(p), q);
        assert!(!subs.is_open(q));
        assert_eq!(
            subs.aliases(p).as_slice(),
            &[Uppercase::from("Q"), Uppercase::from("P")]
        );
    }

    #[test]
    fn self_union_is_a_noop() {
        let mut subs = Subs::new();
        let a = subs.new_leaf();

        subs.union(a, a);

        assert!(!subs.redundant(a));
        assert_eq!(subs.find(a), a);
    }

    #[test]
    #[should_panic(expected = "both must be leaders")]
    fn union_of_a_redirected_node_panics() {
        let mut subs = Subs::new();
        let a = subs.new_leaf();
        let b = subs.new_leaf();
        let c = subs.new_leaf();

        subs.union(a, b);
        subs.union(a, c);
    }

    #[test]
    fn find_is_idempotent() {
        let mut subs = Subs::new();
        let vars: Vec<_> = (0..5).map(|_| subs.new_leaf()).collect();

        for pair in vars.windows(2) {
            let (from, to) = (subs.find(pair[0]), subs.find(pair[1]));
            subs.union(from, to);
        }

        for var in vars.iter().copied() {
            let once = subs.find(var);
            assert_eq!(subs.find(once), once);
            assert_eq!(once, vars[4]);
        }
    }

    #[test]
    fn self_referential_struct_is_cyclic() {
        let mut subs = Subs::new();
        let hole = subs.new_leaf();
        let node = subs.new_struct(
            Some("Node".into()),
            [(Lowercase::from("next"), hole)],
            false,
        );
        let plain = subs.new_struct(None, [(Lowercase::from("v"), hole)], false);

        assert!(!subs.is_cyclic(node));

        subs.union(hole, node);

        assert!(subs.is_cyclic(node));
        assert!(subs.is_cyclic(plain));
        assert_eq!(subs.kind(hole), Kind::Struct);
    }

    #[test]
    fn snapshot_undoes_a_union() {
        let mut subs = Subs::new();
        let a = subs.new_leaf();
        let b = int(&mut subs);
        let snapshot = subs.snapshot();

        subs.union(a, b);
        let extra = subs.new_miss();
        assert_eq!(subs.vars_since_snapshot(&snapshot).collect::<Vec<_>>(), vec![extra]);

        subs.rollback_to(snapshot);

        assert!(!subs.redundant(a));
        assert_eq!(subs.content(a), &Content::Leaf);
        assert_eq!(subs.len(), 2);
    }
}
