use tvar_debug_flags::{dbg_do, TVAR_PRINT_UNIFICATIONS};
use tvar_error_macros::internal_error;
use tvar_solve_problem::{Diagnostics, Mismatch};
use tvar_solve_schema::UnificationMode;
use tvar_types::ident::Lowercase;
use tvar_types::pretty_print::SubsFmtVar;
use tvar_types::subs::{Kind, OptVariable, Subs, Variable};

use crate::env::Env;

/// Two leaders of the same variant. `first` is folded into `second`.
struct Context {
    first: Variable,
    second: Variable,
}

/// Unifies `var1` and `var2` in place.
///
/// Every mismatch found on the way is reported; the traversal does not stop at the first one.
/// Pairs that mismatched stay apart, so later unifications involving them may fail again.
pub fn unify(subs: &mut Subs, var1: Variable, var2: Variable) -> Result<(), Diagnostics> {
    let mut env = Env::new(subs, UnificationMode::EQ);

    dbg_do!(TVAR_PRINT_UNIFICATIONS, {
        eprintln!(
            "{:?} {} {:?}",
            SubsFmtVar(var1, &env),
            UnificationMode::EQ.pretty_print(),
            SubsFmtVar(var2, &env)
        );
    });

    unify_pool(&mut env, var1, var2);

    dbg_do!(TVAR_PRINT_UNIFICATIONS, {
        eprintln!("  => {:?}", SubsFmtVar(var1, &env));
    });

    let outcome = env.finish();

    tvar_tracing::debug!(?var1, ?var2, ok = outcome.is_ok(), "unify");

    outcome
}

/// Sets field `name` of the struct `var` to `value`. If the field is already there, its value
/// is unified with `value` instead.
pub fn add_field(
    subs: &mut Subs,
    var: Variable,
    name: Lowercase,
    value: Variable,
) -> Result<(), Diagnostics> {
    let root = subs.find(var);
    let position = subs.get_struct_unchecked(root).position(name.as_str());

    match position {
        Some(position) => match subs.get_args_unchecked(root)[position].into_variable() {
            Some(existing) => unify(subs, existing, value),
            None => {
                subs.set_arg_unchecked(root, position, value);
                Ok(())
            }
        },
        None => {
            subs.push_field_unchecked(root, name, value.into());
            Ok(())
        }
    }
}

pub(crate) fn unify_pool(env: &mut Env, var1: Variable, var2: Variable) {
    let left = env.find(var1);
    let right = env.find(var2);

    if left == right {
        return;
    }

    let left_kind = env.get_content_unchecked(left).kind();
    let right_kind = env.get_content_unchecked(right).kind();

    match (left_kind, right_kind) {
        (Kind::Leaf, Kind::Leaf) => {
            let (from, to) = by_uid(left, right);
            env.merge(from, to);
        }
        (Kind::Leaf, _) => env.merge(left, right),
        (_, Kind::Leaf) => env.merge(right, left),
        _ if left_kind != right_kind => {
            mismatch!(env, class_mismatch(env, left, right));
        }
        _ => {
            if !env.add_recursion_pair(left, right) {
                return;
            }

            let (first, second) = by_uid(left, right);
            unify_structure(env, &Context { first, second });
        }
    }
}

/// The lower uid first.
fn by_uid(var1: Variable, var2: Variable) -> (Variable, Variable) {
    if var1 < var2 {
        (var1, var2)
    } else {
        (var2, var1)
    }
}

fn unify_structure(env: &mut Env, ctx: &Context) {
    match env.get_content_unchecked(ctx.second).kind() {
        Kind::Miss => env.merge(ctx.first, ctx.second),
        Kind::Base | Kind::Immut | Kind::Isa => {
            mismatch!(env, unimplemented(env, ctx.first, ctx.second));
        }
        Kind::Lambda => unify_lambda(env, ctx),
        Kind::Struct => unify_struct(env, ctx),
        Kind::Leaf => internal_error!("leaves are merged before reaching structure"),
    }
}

fn unify_lambda(env: &mut Env, ctx: &Context) {
    if !lambda_shapes_match(env, ctx.first, ctx.second) {
        mismatch!(env, arity_mismatch(env, ctx.first, ctx.second));
        return;
    }

    let first_args = env.get_args_unchecked(ctx.first).to_vec();
    let mut pairs = Vec::with_capacity(first_args.len());

    for (index, slot) in first_args.into_iter().enumerate() {
        let other = env.get_args_unchecked(ctx.second)[index];

        match (slot.into_variable(), other.into_variable()) {
            (Some(var1), Some(var2)) => pairs.push((var1, var2)),
            (Some(var1), None) => env.set_arg_unchecked(ctx.second, index, var1),
            (None, _) => {}
        }
    }

    unify_pairs(env, pairs);
    merge_after_children(env, ctx);
}

/// Folds struct `first` into struct `second`.
///
/// A field of `first` missing from `second` is carried over when `second` is open and dropped
/// when it is closed. When `first` is closed, fields of `second` that `first` lacks are
/// deleted (the owner field stays).
fn unify_struct(env: &mut Env, ctx: &Context) {
    let first = env.get_struct_unchecked(ctx.first).clone();
    let first_args = env.get_args_unchecked(ctx.first).to_vec();
    let second_open = env.get_struct_unchecked(ctx.second).open;

    let mut pairs = Vec::new();

    for (name, slot) in first.fields.iter().zip(first_args) {
        let position = env.get_struct_unchecked(ctx.second).position(name.as_str());

        match position {
            Some(position) => {
                let other = env.get_args_unchecked(ctx.second)[position];

                match (slot.into_variable(), other.into_variable()) {
                    (Some(var1), Some(var2)) => pairs.push((var1, var2)),
                    (Some(var1), None) => env.set_arg_unchecked(ctx.second, position, var1),
                    (None, _) => {}
                }
            }
            None if second_open => env.push_field_unchecked(ctx.second, name.clone(), slot),
            None => {}
        }
    }

    if !first.open {
        let doomed: Vec<Lowercase> = env
            .get_struct_unchecked(ctx.second)
            .fields
            .iter()
            .filter(|name| !name.is_owner() && first.position(name.as_str()).is_none())
            .cloned()
            .collect();

        for name in doomed {
            env.remove_field(ctx.second, name.as_str());
        }
    }

    unify_pairs(env, pairs);
    merge_after_children(env, ctx);
}

fn unify_pairs(env: &mut Env, pairs: Vec<(Variable, Variable)>) {
    for (var1, var2) in pairs {
        unify_pool(env, var1, var2);
    }
}

/// Children may already have merged either side into something else through a cycle, so the
/// leaders are looked up again.
fn merge_after_children(env: &mut Env, ctx: &Context) {
    let from = env.find(ctx.first);
    let to = env.find(ctx.second);

    if from != to {
        env.merge(from, to);
    }
}

// MISMATCHES

pub(crate) fn class_mismatch(env: &Env, left: Variable, right: Variable) -> Mismatch {
    let (left_type, right_type) = env.print_pair(left, right);

    Mismatch::ClassMismatch {
        left,
        right,
        left_type,
        right_type,
    }
}

pub(crate) fn arity_mismatch(env: &Env, left: Variable, right: Variable) -> Mismatch {
    let (left_type, right_type) = env.print_pair(left, right);

    Mismatch::ArityMismatch {
        left,
        right,
        left_type,
        right_type,
    }
}

pub(crate) fn unimplemented(env: &Env, left: Variable, right: Variable) -> Mismatch {
    let (left_type, right_type) = env.print_pair(left, right);

    Mismatch::Unimplemented {
        kind: env.kind(left),
        left,
        right,
        left_type,
        right_type,
    }
}

pub(crate) fn lambda_shapes_match(subs: &Subs, var1: Variable, var2: Variable) -> bool {
    subs.content(var1) == subs.content(var2) && subs.args(var1).len() == subs.args(var2).len()
}

pub(crate) fn slot_pairs(
    subs: &Subs,
    var1: Variable,
    var2: Variable,
) -> impl Iterator<Item = (OptVariable, OptVariable)> + '_ {
    subs.args(var1)
        .iter()
        .copied()
        .zip(subs.args(var2).iter().copied())
}
