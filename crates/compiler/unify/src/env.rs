use tvar_collections::{MutMap, MutSet, VisitedSet};
use tvar_solve_problem::{Diagnostics, Mismatch};
use tvar_solve_schema::UnificationMode;
use tvar_types::pretty_print::{name_and_print_var, name_and_print_vars, DebugPrint};
use tvar_types::subs::{Subs, Variable};

/// The scratch state of one top-level call: which pairs are being unified (so cycles
/// terminate), what went wrong so far, and, while generalizing, what each original node was
/// copied to and which nodes must be shared rather than copied.
pub(crate) struct Env<'a> {
    subs: &'a mut Subs,
    mode: UnificationMode,
    seen_recursion: MutSet<(Variable, Variable)>,
    mismatches: Vec<Mismatch>,
    copies: MutMap<Variable, Variable>,
    nongeneric: VisitedSet,
}

impl std::ops::Deref for Env<'_> {
    type Target = Subs;

    fn deref(&self) -> &Self::Target {
        self.subs
    }
}

impl std::ops::DerefMut for Env<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.subs
    }
}

impl<'a> Env<'a> {
    pub fn new(subs: &'a mut Subs, mode: UnificationMode) -> Self {
        Self {
            subs,
            mode,
            seen_recursion: Default::default(),
            mismatches: Vec::new(),
            copies: Default::default(),
            nongeneric: VisitedSet::default(),
        }
    }

    pub(crate) fn mode(&self) -> UnificationMode {
        self.mode
    }

    pub(crate) fn set_mode(&mut self, mode: UnificationMode) {
        self.mode = mode;
    }

    /// Returns false if the pair was already being unified. The pair is stored in uid order,
    /// so `(a, b)` and `(b, a)` count as the same pair.
    pub(crate) fn add_recursion_pair(&mut self, var1: Variable, var2: Variable) -> bool {
        let pair = if var1 <= var2 {
            (var1, var2)
        } else {
            (var2, var1)
        };

        self.seen_recursion.insert(pair)
    }

    pub(crate) fn push_mismatch(&mut self, mismatch: Mismatch) {
        self.mismatches.push(mismatch);
    }

    pub(crate) fn print(&self, var: Variable) -> String {
        name_and_print_var(var, &*self.subs, DebugPrint::NOTHING)
    }

    /// Prints both sides of a mismatch with one naming, so distinct leaves get distinct names.
    pub(crate) fn print_pair(&self, left: Variable, right: Variable) -> (String, String) {
        let [left, right] = name_and_print_vars([left, right], &*self.subs, DebugPrint::NOTHING);

        (left, right)
    }

    /// Redirects `from` into `to`, both leaders.
    pub(crate) fn merge(&mut self, from: Variable, to: Variable) {
        tvar_tracing::trace!(?from, ?to, mode = self.mode.pretty_print(), "merge");

        self.subs.union(from, to);

        if self.nongeneric.contains(from.index()) && !self.nongeneric.contains(to.index()) {
            self.extend_nongeneric([to]);
        }
    }

    // GENERALIZATION

    /// Marks everything reachable from `roots` as non-generic.
    pub(crate) fn extend_nongeneric<I>(&mut self, roots: I)
    where
        I: IntoIterator<Item = Variable>,
    {
        let mut stack: Vec<Variable> = roots
            .into_iter()
            .map(|var| self.subs.find(var))
            .collect();

        while let Some(var) = stack.pop() {
            if !self.nongeneric.insert(var.index()) {
                continue;
            }

            let children = self.subs.get_args_unchecked(var).iter();
            stack.extend(
                children
                    .filter_map(|slot| slot.into_variable())
                    .map(|child| self.subs.find_without_compacting(child)),
            );
        }

        tvar_debug_flags::dbg_do!(tvar_debug_flags::TVAR_PRINT_NONGENERIC, {
            eprintln!(
                "non-generic closure: {:?}",
                self.nongeneric.iter().collect::<Vec<_>>()
            );
        });
    }

    /// Whether `var` (or its leader) is reachable from the non-generic set.
    pub(crate) fn is_nongeneric(&self, var: Variable) -> bool {
        self.nongeneric.contains(var.index())
            || self
                .nongeneric
                .contains(self.subs.find_without_compacting(var).index())
    }

    pub(crate) fn copy_of(&self, var: Variable) -> Option<Variable> {
        self.copies.get(&var).copied()
    }

    pub(crate) fn record_copy(&mut self, original: Variable, copy: Variable) {
        self.copies.insert(original, copy);
    }

    /// Ends the call, handing back everything that went wrong.
    pub fn finish(self) -> Result<(), Diagnostics> {
        match Diagnostics::from_mismatches(self.mismatches) {
            None => Ok(()),
            Some(diagnostics) => Err(diagnostics),
        }
    }
}
