#[macro_use]
extern crate pretty_assertions;

extern crate tvar_types;
extern crate tvar_unify;

#[cfg(test)]
mod test_trial {
    use tvar_test_utils::{int, linked_list, print, record, str};
    use tvar_types::subs::Subs;
    use tvar_unify::{trial_unify_ok, unify};

    #[test]
    fn leaves_might_be_anything() {
        let mut subs = Subs::new();
        let a = subs.new_leaf();
        let int = int(&mut subs);
        let s = record(&mut subs, None, &[], false);

        assert!(trial_unify_ok(&subs, a, int));
        assert!(trial_unify_ok(&subs, s, a));
    }

    #[test]
    fn different_variants_never_unify() {
        let mut subs = Subs::new();
        let int = int(&mut subs);
        let f = subs.new_lambda(&[], &[int]);
        let s = record(&mut subs, None, &[], true);
        let miss = subs.new_miss();

        assert!(!trial_unify_ok(&subs, f, s));
        assert!(!trial_unify_ok(&subs, int, f));
        assert!(!trial_unify_ok(&subs, miss, s));
    }

    #[test]
    fn trial_leaves_the_graph_alone() {
        let mut subs = Subs::new();
        let a = subs.new_leaf();
        let b = subs.new_leaf();
        let f = subs.new_lambda(&[a], &[b]);
        let int = int(&mut subs);
        let g = subs.new_lambda(&[int], &[int]);

        assert!(trial_unify_ok(&subs, f, g));

        assert!(!subs.redundant(a));
        assert!(!subs.redundant(b));
        assert!(!subs.redundant(f));
        assert_eq!(print(&subs, f), "fn(A) -> (B)");
    }

    #[test]
    fn lambda_shapes_must_agree() {
        let mut subs = Subs::new();
        let a = subs.new_leaf();
        let f = subs.new_lambda(&[a], &[a]);
        let g = subs.new_lambda(&[a, a], &[]);
        let h = subs.new_lambda(&[a], &[a, a]);

        assert!(!trial_unify_ok(&subs, f, g));
        assert!(!trial_unify_ok(&subs, f, h));
    }

    #[test]
    fn children_are_checked() {
        let mut subs = Subs::new();
        let int = int(&mut subs);
        let thunk = subs.new_lambda(&[], &[]);
        let f = subs.new_lambda(&[int], &[]);
        let g = subs.new_lambda(&[thunk], &[]);
        let imm_int = subs.new_immut(int);
        let imm_thunk = subs.new_immut(thunk);

        assert!(!trial_unify_ok(&subs, f, g));
        assert!(!trial_unify_ok(&subs, imm_int, imm_thunk));
        assert!(trial_unify_ok(&subs, imm_int, imm_int));
    }

    #[test]
    fn ground_types_are_taken_on_trust() {
        let mut subs = Subs::new();
        let int = int(&mut subs);
        let str = str(&mut subs);

        assert!(trial_unify_ok(&subs, int, str));
    }

    #[test]
    fn closed_struct_must_know_every_field() {
        let mut subs = Subs::new();
        let int = int(&mut subs);
        let xy = record(&mut subs, None, &[("x", int), ("y", int)], false);
        let x_closed = record(&mut subs, None, &[("x", int)], false);
        let x_open = record(&mut subs, None, &[("x", int)], true);

        assert!(!trial_unify_ok(&subs, xy, x_closed));
        assert!(!trial_unify_ok(&subs, x_closed, xy));
        assert!(trial_unify_ok(&subs, xy, x_open));
        assert!(trial_unify_ok(&subs, x_open, xy));
    }

    #[test]
    fn closed_structs_with_different_fields_are_rejected_though_unify_accepts_them() {
        let mut subs = Subs::new();
        let int1 = int(&mut subs);
        let left = record(&mut subs, None, &[("x", int1)], false);
        let int2 = int(&mut subs);
        let right = record(&mut subs, None, &[("y", int2)], false);

        assert!(!trial_unify_ok(&subs, left, right));
        assert_eq!(unify(&mut subs, left, right), Ok(()));
    }

    #[test]
    fn field_values_are_checked() {
        let mut subs = Subs::new();
        let int = int(&mut subs);
        let thunk = subs.new_lambda(&[], &[]);
        let left = record(&mut subs, None, &[("x", int)], true);
        let right = record(&mut subs, None, &[("x", thunk)], true);

        assert!(!trial_unify_ok(&subs, left, right));
    }

    #[test]
    fn alias_names_must_meet_when_both_sides_are_closed() {
        let mut subs = Subs::new();
        let int = int(&mut subs);
        let p = record(&mut subs, Some("P"), &[("x", int)], false);
        let q = record(&mut subs, Some("Q"), &[("x", int)], false);
        let q_open = record(&mut subs, Some("Q"), &[("x", int)], true);
        let anonymous = record(&mut subs, None, &[("x", int)], false);

        assert!(!trial_unify_ok(&subs, p, q));
        assert!(trial_unify_ok(&subs, p, q_open));
        assert!(trial_unify_ok(&subs, p, anonymous));

        let pq = record(&mut subs, Some("P"), &[("x", int)], false);
        subs.add_alias(pq, "Q".into());
        assert!(trial_unify_ok(&subs, pq, q));
    }

    #[test]
    fn closed_structs_with_disjoint_aliases_are_rejected_though_unify_accepts_them() {
        let mut subs = Subs::new();
        let int = int(&mut subs);
        let p = record(&mut subs, Some("P"), &[("x", int)], false);
        let q = record(&mut subs, Some("Q"), &[("x", int)], false);

        assert!(!trial_unify_ok(&subs, p, q));
        assert_eq!(unify(&mut subs, p, q), Ok(()));

        assert!(subs.equivalent(p, q));
        assert_eq!(print(&subs, p), "P:Q{x: Int}");
    }

    #[test]
    fn cycles_terminate() {
        let mut subs = Subs::new();
        let a = subs.new_leaf();
        let left = linked_list(&mut subs, "List", a);
        let int = int(&mut subs);
        let right = linked_list(&mut subs, "List", int);
        let thunk = subs.new_lambda(&[], &[]);
        let wrong = linked_list(&mut subs, "List", thunk);

        assert!(trial_unify_ok(&subs, left, right));
        assert!(trial_unify_ok(&subs, left, left));
        assert!(!trial_unify_ok(&subs, right, wrong));
    }

    #[test]
    fn false_means_unify_fails() {
        let mut subs = Subs::new();
        let int = int(&mut subs);
        let f = subs.new_lambda(&[int], &[]);
        let s = record(&mut subs, None, &[("x", int)], true);
        let a = subs.new_leaf();
        let g = subs.new_lambda(&[a, a], &[]);

        for (left, right) in [(f, s), (f, g)] {
            assert!(!trial_unify_ok(&subs, left, right));
            assert!(unify(&mut subs, left, right).is_err());
        }
    }
}
