use tvar_collections::MutSet;
use tvar_error_macros::internal_error;
use tvar_solve_schema::UnificationMode;
use tvar_types::subs::{Kind, StructContent, Subs, Variable};

use crate::unify::{lambda_shapes_match, slot_pairs};

/// Whether `var1` and `var2` could be unified. Nothing is merged, copied or compacted.
///
/// A `true` answer is only a "maybe": leaves and ground terms are taken on trust. Field rules
/// are stricter than [`crate::unify()`]: two closed structs with different fields, or with
/// disjoint alias names, are rejected here, while unifying them drops the unmatched fields and
/// unions the aliases.
pub fn trial_unify_ok(subs: &Subs, var1: Variable, var2: Variable) -> bool {
    let mut trial = Trial {
        subs,
        seen: MutSet::default(),
    };

    let ok = trial.unify(var1, var2);

    tvar_tracing::debug!(
        ?var1,
        ?var2,
        ok,
        mode = UnificationMode::TRIAL.pretty_print(),
        "trial_unify_ok"
    );

    ok
}

struct Trial<'a> {
    subs: &'a Subs,
    seen: MutSet<(Variable, Variable)>,
}

impl Trial<'_> {
    fn unify(&mut self, var1: Variable, var2: Variable) -> bool {
        let subs = self.subs;
        let left = subs.find_without_compacting(var1);
        let right = subs.find_without_compacting(var2);

        if left == right {
            return true;
        }

        let left_kind = subs.get_content_unchecked(left).kind();
        let right_kind = subs.get_content_unchecked(right).kind();

        match (left_kind, right_kind) {
            (Kind::Leaf, _) | (_, Kind::Leaf) => return true,
            _ if left_kind != right_kind => return false,
            _ => {}
        }

        let pair = if left < right {
            (left, right)
        } else {
            (right, left)
        };

        if !self.seen.insert(pair) {
            return true;
        }

        match left_kind {
            // equality of ground terms is up to the driver
            Kind::Base | Kind::Miss => true,
            Kind::Immut | Kind::Isa | Kind::Lambda => {
                if left_kind == Kind::Lambda && !lambda_shapes_match(subs, left, right) {
                    return false;
                }

                slot_pairs(subs, left, right).all(|(slot1, slot2)| {
                    match (slot1.into_variable(), slot2.into_variable()) {
                        (Some(child1), Some(child2)) => self.unify(child1, child2),
                        _ => true,
                    }
                })
            }
            Kind::Struct => self.unify_struct(left, right),
            Kind::Leaf => internal_error!("leaves answer before the cycle guard"),
        }
    }

    fn unify_struct(&mut self, left: Variable, right: Variable) -> bool {
        let subs = self.subs;
        let left_struct = subs.get_struct_unchecked(left);
        let right_struct = subs.get_struct_unchecked(right);

        if !aliases_compatible(left_struct, right_struct) {
            return false;
        }

        let right_lacks = |name: &str| right_struct.position(name).is_none();
        let left_lacks = |name: &str| left_struct.position(name).is_none();

        if !right_struct.open && left_struct.fields.iter().any(|name| right_lacks(name.as_str())) {
            return false;
        }

        if !left_struct.open && right_struct.fields.iter().any(|name| left_lacks(name.as_str())) {
            return false;
        }

        for (name, slot) in subs.fields(left) {
            let other = right_struct
                .position(name.as_str())
                .and_then(|position| subs.get_args_unchecked(right)[position].into_variable());

            if let (Some(child1), Some(child2)) = (slot.into_variable(), other) {
                if !self.unify(child1, child2) {
                    return false;
                }
            }
        }

        true
    }
}

/// Alias names only have to agree when both structs are closed and both have been named.
fn aliases_compatible(left: &StructContent, right: &StructContent) -> bool {
    left.aliases.is_empty()
        || right.aliases.is_empty()
        || left.open
        || right.open
        || left.aliases.intersects(&right.aliases)
}
