//! Property-based tests for the diff engine and commit plan
//!
//! Trees are random; the properties hold for any shape.

use ensab::family_tree::{compute_diff, CommitPlan};
use ensab::shared::RawMember;
use proptest::prelude::*;
use proptest::sample::Index;
use uuid::Uuid;

fn name() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{1,6}"
}

fn tree() -> impl Strategy<Value = RawMember> {
    let leaf = (name(), any::<bool>())
        .prop_map(|(name, is_male)| RawMember::new(Uuid::new_v4(), name, is_male));
    leaf.prop_recursive(4, 40, 4, |inner| {
        (name(), any::<bool>(), prop::collection::vec(inner, 0..4)).prop_map(
            |(name, is_male, sons)| RawMember::new(Uuid::new_v4(), name, is_male).with_sons(sons),
        )
    })
}

/// Fold a plan into `baseline` the way a confirmed commit does
fn apply_plan(baseline: &mut RawMember, live: &RawMember) {
    let plan = CommitPlan::from_diff(compute_diff(baseline, live));
    for call in plan {
        assert!(call.apply_to(baseline), "call {:?} did not apply", call);
    }
}

proptest! {
    #[test]
    fn test_self_diff_is_empty(family in tree()) {
        prop_assert!(compute_diff(&family, &family).is_empty());
    }

    #[test]
    fn test_rename_is_single_update(family in tree(), pick in any::<Index>()) {
        let target = family.ids()[pick.index(family.len())];
        let mut live = family.clone();
        let member = live.find_son_mut(target).unwrap();
        member.name.push('x');

        let diff = compute_diff(&family, &live);
        prop_assert_eq!(diff.updates.len(), 1);
        prop_assert_eq!(diff.updates[0].id, target);
        prop_assert!(diff.creates.is_empty());
        prop_assert!(diff.deletes.is_empty());
    }

    #[test]
    fn test_added_subtree_is_single_create(
        family in tree(),
        subtree in tree(),
        pick in any::<Index>(),
    ) {
        let parent = family.ids()[pick.index(family.len())];
        let mut live = family.clone();
        live.find_son_mut(parent).unwrap().sons.push(subtree.clone());

        let diff = compute_diff(&family, &live);
        prop_assert!(diff.updates.is_empty());
        prop_assert!(diff.deletes.is_empty());
        prop_assert_eq!(diff.creates.len(), 1);
        prop_assert_eq!(&diff.creates[&parent], &vec![subtree]);
    }

    #[test]
    fn test_removal_reports_only_subtree_root(family in tree(), pick in any::<Index>()) {
        prop_assume!(family.len() > 1);
        let ids = family.ids();
        // skip the root, which can't be removed
        let target = ids[1 + pick.index(ids.len() - 1)];
        let mut live = family.clone();
        let removed = live.remove_son(target).unwrap();

        let diff = compute_diff(&family, &live);
        prop_assert!(diff.updates.is_empty());
        prop_assert!(diff.creates.is_empty());
        prop_assert_eq!(diff.deletes.len(), 1);
        prop_assert!(diff.deletes.contains(&target));
        for descendant in removed.ids().into_iter().skip(1) {
            prop_assert!(!diff.deletes.contains(&descendant));
        }
    }

    #[test]
    fn test_applied_plan_closes_the_diff(
        family in tree(),
        subtree in tree(),
        rename in any::<Index>(),
        parent in any::<Index>(),
    ) {
        let ids = family.ids();
        let mut live = family.clone();
        live.find_son_mut(ids[rename.index(ids.len())]).unwrap().is_male ^= true;
        live.find_son_mut(ids[parent.index(ids.len())]).unwrap().sons.push(subtree);
        if let Some(&last) = ids.last().filter(|&&id| id != family.id) {
            live.remove_son(last);
        }

        let mut baseline = family.clone();
        apply_plan(&mut baseline, &live);
        prop_assert!(compute_diff(&baseline, &live).is_empty());
    }
}
