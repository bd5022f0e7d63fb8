use crate::subs::{Content, OptVariable, Variable};
use tvar_error_macros::internal_error;

/// Storage for every node of a [`crate::subs::Subs`]: its content, its ordered child slots and
/// its union-find redirect. A node without a redirect is the leader of its class.
#[derive(Clone, Default)]
pub struct UnificationTable {
    contents: Vec<Content>,
    args: Vec<Vec<OptVariable>>,
    redirects: Vec<OptVariable>,
}

pub struct Snapshot(UnificationTable);

impl UnificationTable {
    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    pub fn push(&mut self, content: Content, args: Vec<OptVariable>) -> Variable {
        let variable = Variable::from_index(self.len() as u32);

        self.contents.push(content);
        self.args.push(args);
        self.redirects.push(OptVariable::NONE);

        variable
    }

    // GET UNCHECKED
    //
    // "Unchecked" accessors take a leader; handing them a redirected node is a bug.

    #[inline(always)]
    pub fn get_content_unchecked(&self, key: Variable) -> &Content {
        self.assert_root(key);
        &self.contents[key.index()]
    }

    #[inline(always)]
    pub fn get_args_unchecked(&self, key: Variable) -> &[OptVariable] {
        self.assert_root(key);
        &self.args[key.index()]
    }

    // SET UNCHECKED

    #[inline(always)]
    pub fn get_content_mut_unchecked(&mut self, key: Variable) -> &mut Content {
        self.assert_root(key);
        &mut self.contents[key.index()]
    }

    #[inline(always)]
    pub fn get_args_mut_unchecked(&mut self, key: Variable) -> &mut Vec<OptVariable> {
        self.assert_root(key);
        &mut self.args[key.index()]
    }

    /// Both the content and the slots of a leader, mutably. Struct field edits need both
    /// at once to keep the name table parallel to the slots.
    #[inline(always)]
    pub fn get_node_mut_unchecked(
        &mut self,
        key: Variable,
    ) -> (&mut Content, &mut Vec<OptVariable>) {
        self.assert_root(key);
        (&mut self.contents[key.index()], &mut self.args[key.index()])
    }

    // ROOT KEY

    /// Finds the leader of `key`, pointing every node on the way directly at it.
    pub fn root_key(&mut self, key: Variable) -> Variable {
        let root = self.root_key_without_compacting(key);

        let mut current = key;
        while let Some(next) = self.redirects[current.index()].into_variable() {
            self.redirects[current.index()] = OptVariable::from(root);
            current = next;
        }

        root
    }

    #[inline(always)]
    pub fn root_key_without_compacting(&self, mut key: Variable) -> Variable {
        while let Some(redirect) = self.redirects[key.index()].into_variable() {
            key = redirect;
        }

        key
    }

    pub fn is_redirect(&self, key: Variable) -> bool {
        self.redirects[key.index()].is_some()
    }

    pub fn unioned(&mut self, a: Variable, b: Variable) -> bool {
        self.root_key(a) == self.root_key(b)
    }

    /// NOTE: assumes both variables are roots
    pub fn redirect(&mut self, from: Variable, to: Variable) {
        if self.is_redirect(from) || self.is_redirect(to) {
            internal_error!("Cannot redirect {:?} to {:?}: both must be leaders", from, to);
        }

        if from != to {
            self.redirects[from.index()] = OptVariable::from(to);
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot(self.clone())
    }

    pub fn rollback_to(&mut self, snapshot: Snapshot) {
        *self = snapshot.0;
    }

    pub fn vars_since_snapshot(&self, snapshot: &Snapshot) -> impl Iterator<Item = Variable> {
        (snapshot.0.len() as u32..self.len() as u32).map(Variable::from_index)
    }

    #[inline(always)]
    fn assert_root(&self, key: Variable) {
        if self.is_redirect(key) {
            internal_error!(
                "Structural state of {:?} was accessed after it was unified into {:?}",
                key,
                self.root_key_without_compacting(key)
            );
        }
    }
}

#[cfg(test)]
mod test {
    use super::UnificationTable;
    use crate::subs::{Content, Variable};

    fn leaves(table: &mut UnificationTable, n: usize) -> Vec<Variable> {
        (0..n).map(|_| table.push(Content::Leaf, Vec::new())).collect()
    }

    #[test]
    fn root_key_compresses_the_whole_path() {
        let mut table = UnificationTable::default();
        let vars = leaves(&mut table, 4);

        table.redirect(vars[0], vars[1]);
        table.redirect(vars[1], vars[2]);
        table.redirect(vars[2], vars[3]);

        assert_eq!(table.root_key(vars[0]), vars[3]);

        for var in &vars[..3] {
            assert_eq!(table.redirects[var.index()].into_variable(), Some(vars[3]));
        }
        let once = table.root_key(vars[0]);
        assert_eq!(table.root_key(once), vars[3]);
    }

    #[test]
    fn rollback_forgets_new_nodes_and_redirects() {
        let mut table = UnificationTable::default();
        let vars = leaves(&mut table, 2);
        let snapshot = table.snapshot();

        table.redirect(vars[0], vars[1]);
        let extra = table.push(Content::Miss, Vec::new());

        assert_eq!(table.vars_since_snapshot(&snapshot).collect::<Vec<_>>(), vec![extra]);

        table.rollback_to(snapshot);

        assert_eq!(table.len(), 2);
        assert!(!table.is_redirect(vars[0]));
    }

    #[test]
    #[should_panic(expected = "was accessed after it was unified")]
    fn reading_a_redirected_node_panics() {
        let mut table = UnificationTable::default();
        let vars = leaves(&mut table, 2);

        table.redirect(vars[0], vars[1]);

        let _ = table.get_content_unchecked(vars[0]);
    }

    #[test]
    #[should_panic(expected = "both must be leaders")]
    fn redirecting_a_redirected_node_panics() {
        let mut table = UnificationTable::default();
        let vars = leaves(&mut table, 3);

        table.redirect(vars[0], vars[1]);
        table.redirect(vars[0], vars[2]);
    }
}
