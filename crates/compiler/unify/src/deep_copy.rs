use std::ops::ControlFlow;

use bumpalo::Bump;
use tvar_debug_flags::{dbg_do, TVAR_PRINT_FRESH};
use tvar_error_macros::internal_error;
use tvar_solve_problem::{Diagnostics, Mismatch};
use tvar_solve_schema::UnificationMode;
use tvar_types::pretty_print::SubsFmtVar;
use tvar_types::subs::{Kind, OptVariable, Subs, Variable};

use crate::env::Env;
use crate::unify::{
    arity_mismatch, class_mismatch, lambda_shapes_match, unify_pool, unimplemented,
};

/// Instantiates the generic type `var`: everything reachable from it is copied, except what is
/// reachable from `nongeneric`, which is shared with the original.
///
/// Cycles in the original come out as cycles in the copy.
pub fn fresh(subs: &mut Subs, var: Variable, nongeneric: &[Variable]) -> Variable {
    let mut env = Env::new(subs, UnificationMode::FRESH);
    env.extend_nongeneric(nongeneric.iter().copied());

    let arena = Bump::new();
    let copy = deep_copy_var_in(&mut env, var, &arena);

    dbg_do!(TVAR_PRINT_FRESH, {
        eprintln!(
            "fresh {:?}\n   => {:?}",
            SubsFmtVar(var, &env),
            SubsFmtVar(copy, &env)
        );
    });

    tvar_tracing::debug!(?var, ?copy, "fresh");

    copy
}

/// Unifies a fresh instance of the generic type `var` with `target`, without building the
/// instance first. Only the parts of the instance that `target` does not already provide are
/// copied.
pub fn fresh_unify(
    subs: &mut Subs,
    var: Variable,
    target: Variable,
    nongeneric: &[Variable],
) -> Result<(), Diagnostics> {
    let mut env = Env::new(subs, UnificationMode::FRESH);
    env.extend_nongeneric(nongeneric.iter().copied());

    dbg_do!(TVAR_PRINT_FRESH, {
        eprintln!(
            "{:?} {} {:?}",
            SubsFmtVar(var, &env),
            UnificationMode::FRESH.pretty_print(),
            SubsFmtVar(target, &env)
        );
    });

    let arena = Bump::new();
    fresh_unify_pool(&mut env, var, target, &arena);

    dbg_do!(TVAR_PRINT_FRESH, {
        eprintln!("  => {:?}", SubsFmtVar(target, &env));
    });

    let outcome = env.finish();

    tvar_tracing::debug!(?var, ?target, ok = outcome.is_ok(), "fresh_unify");

    outcome
}

// DEEP COPY

pub(crate) fn deep_copy_var_in(env: &mut Env, var: Variable, arena: &Bump) -> Variable {
    let mut stack = bumpalo::collections::Vec::with_capacity_in(64, arena);

    match deep_copy_var_decision(env, var) {
        ControlFlow::Break(copy) => copy,
        ControlFlow::Continue(copy) => {
            stack.push(DeepCopyVarWork {
                source: env.find(var),
                copy,
            });

            deep_copy_var_help(env, &mut stack);

            copy
        }
    }
}

struct DeepCopyVarWork {
    source: Variable,
    copy: Variable,
}

#[inline]
fn deep_copy_var_decision(env: &mut Env, var: Variable) -> ControlFlow<Variable, Variable> {
    let var = env.find(var);

    if let Some(copy) = env.copy_of(var) {
        ControlFlow::Break(copy)
    } else if env.is_nongeneric(var) {
        ControlFlow::Break(var)
    } else {
        // filled in once the children are copied
        let copy = env.new_leaf();

        // Need to do this before copying the children to avoid looping.
        env.record_copy(var, copy);

        ControlFlow::Continue(copy)
    }
}

fn deep_copy_var_help(
    env: &mut Env,
    stack: &mut bumpalo::collections::Vec<'_, DeepCopyVarWork>,
) {
    while let Some(DeepCopyVarWork { source, copy }) = stack.pop() {
        let content = env.get_content_unchecked(source).clone();
        let args = env.get_args_unchecked(source).to_vec();

        let mut new_args = Vec::with_capacity(args.len());

        for slot in args {
            let new_slot = match slot.into_variable() {
                None => OptVariable::NONE,
                Some(child) => match deep_copy_var_decision(env, child) {
                    ControlFlow::Break(child_copy) => child_copy.into(),
                    ControlFlow::Continue(child_copy) => {
                        stack.push(DeepCopyVarWork {
                            source: env.find(child),
                            copy: child_copy,
                        });

                        child_copy.into()
                    }
                },
            };

            new_args.push(new_slot);
        }

        env.set_node_unchecked(copy, content, new_args);
    }
}

// FRESH UNIFY

fn fresh_unify_pool(env: &mut Env, this: Variable, that: Variable, arena: &Bump) {
    let this = env.find(this);

    if let Some(counterpart) = env.copy_of(this) {
        unify_pool_as_eq(env, counterpart, that);
        return;
    }

    if env.is_nongeneric(this) {
        unify_pool_as_eq(env, this, that);
        return;
    }

    let that = env.find(that);
    let this_kind = env.get_content_unchecked(this).kind();
    let that_kind = env.get_content_unchecked(that).kind();

    match (this_kind, that_kind) {
        (Kind::Leaf, _) => env.record_copy(this, that),
        (_, Kind::Leaf) => {
            let copy = deep_copy_var_in(env, this, arena);
            let copy = env.find(copy);

            if copy != that {
                env.merge(that, copy);
            }
        }
        _ if this_kind != that_kind => {
            mismatch!(env, class_mismatch(env, this, that));
        }
        _ => {
            env.record_copy(this, that);

            fresh_unify_structure(env, this, that, arena);
        }
    }
}

/// Plain unification inside a fresh-unification; merges made here are logged as `~`.
fn unify_pool_as_eq(env: &mut Env, var1: Variable, var2: Variable) {
    let mode = env.mode();
    debug_assert!(mode.is_fresh());

    env.set_mode(mode.as_eq());
    unify_pool(env, var1, var2);
    env.set_mode(mode);
}

fn fresh_unify_structure(env: &mut Env, this: Variable, that: Variable, arena: &Bump) {
    match env.get_content_unchecked(this).kind() {
        Kind::Miss => {}
        Kind::Base | Kind::Immut | Kind::Isa => {
            mismatch!(env, unimplemented(env, this, that));
        }
        Kind::Lambda => fresh_unify_lambda(env, this, that, arena),
        Kind::Struct => fresh_unify_struct(env, this, that, arena),
        Kind::Leaf => internal_error!("generic leaves are recorded, not copied"),
    }
}

fn fresh_unify_lambda(env: &mut Env, this: Variable, that: Variable, arena: &Bump) {
    if !lambda_shapes_match(env, this, that) {
        mismatch!(env, arity_mismatch(env, this, that));
        return;
    }

    let this_args = env.get_args_unchecked(this).to_vec();
    let mut pairs = Vec::with_capacity(this_args.len());

    for (index, slot) in this_args.into_iter().enumerate() {
        let other = env.get_args_unchecked(that)[index];

        match (slot.into_variable(), other.into_variable()) {
            (Some(var1), Some(var2)) => pairs.push((var1, var2)),
            (Some(var1), None) => {
                let copy = deep_copy_var_in(env, var1, arena);
                env.set_arg_unchecked(that, index, copy);
            }
            (None, _) => {}
        }
    }

    for (var1, var2) in pairs {
        fresh_unify_pool(env, var1, var2, arena);
    }
}

/// Fields of `this` that `that` lacks are copied over when either side is open. Otherwise they
/// are filled with `Miss` and reported. When `this` is closed, fields of `that` it lacks are
/// deleted.
fn fresh_unify_struct(env: &mut Env, this: Variable, that: Variable, arena: &Bump) {
    let this_struct = env.get_struct_unchecked(this).clone();
    let this_args = env.get_args_unchecked(this).to_vec();
    let that_open = env.get_struct_unchecked(that).open;

    let mut pairs = Vec::new();

    for (name, slot) in this_struct.fields.iter().zip(this_args) {
        let position = env.get_struct_unchecked(that).position(name.as_str());

        match position {
            Some(position) => {
                let other = env.get_args_unchecked(that)[position];

                match (slot.into_variable(), other.into_variable()) {
                    (Some(var1), Some(var2)) => pairs.push((var1, var2)),
                    (Some(var1), None) => {
                        let copy = deep_copy_var_in(env, var1, arena);
                        env.set_arg_unchecked(that, position, copy);
                    }
                    (None, _) => {}
                }
            }
            None if this_struct.open || that_open => {
                let copy = slot
                    .into_variable()
                    .map(|var| deep_copy_var_in(env, var, arena));

                env.push_field_unchecked(that, name.clone(), copy.into());
            }
            None => {
                let miss = env.new_miss();
                env.push_field_unchecked(that, name.clone(), miss.into());

                mismatch!(
                    env,
                    Mismatch::MissingField {
                        record: that,
                        field: name.clone(),
                        record_type: env.print(that),
                    }
                );
            }
        }
    }

    if !this_struct.open {
        let doomed: Vec<_> = env
            .get_struct_unchecked(that)
            .fields
            .iter()
            .filter(|name| !name.is_owner() && this_struct.position(name.as_str()).is_none())
            .cloned()
            .collect();

        for name in doomed {
            env.remove_field(that, name.as_str());
        }
    }

    env.set_open_unchecked(that, that_open && this_struct.open);
    env.extend_aliases_unchecked(that, &this_struct.aliases);

    for (var1, var2) in pairs {
        fresh_unify_pool(env, var1, var2, arena);
    }
}

#[cfg(test)]
mod test {
    use super::unify_pool_as_eq;
    use crate::env::Env;
    use tvar_solve_schema::UnificationMode;
    use tvar_types::subs::Subs;

    #[test]
    fn plain_unify_inside_fresh_restores_the_mode() {
        let mut subs = Subs::new();
        let a = subs.new_leaf();
        let b = subs.new_leaf();

        let mut env = Env::new(&mut subs, UnificationMode::FRESH);
        unify_pool_as_eq(&mut env, a, b);

        assert_eq!(env.mode(), UnificationMode::FRESH);
        assert!(env.equivalent(a, b));
        assert_eq!(env.finish(), Ok(()));
    }
}
