//! Property-based tests for the member tree

use ensab::family_tree::Member;
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_lineage_builds_one_member_per_name(
        names in prop::collection::vec("[A-Za-z]{1,8}", 1..6),
    ) {
        let member = Member::from_lineage(&names.join("/"), "/");
        prop_assert_eq!(member.len(), names.len());
        prop_assert_eq!(&member.name, names.last().unwrap());

        // walking down the chain reads the names back to front
        let walked: Vec<&str> = member.iter().map(|m| m.name.as_str()).collect();
        let expected: Vec<&str> = names.iter().rev().map(String::as_str).collect();
        prop_assert_eq!(walked, expected);
    }

    #[test]
    fn test_lineage_ignores_padding(names in prop::collection::vec("[a-z]{1,8}", 1..5)) {
        let padded = names.iter().map(|n| format!("  {} ", n)).collect::<Vec<_>>().join("->");
        let member = Member::from_lineage(&format!("->{}->", padded), "->");
        prop_assert_eq!(member.len(), names.len());
    }

    #[test]
    fn test_adding_same_lineage_twice_is_idempotent(
        names in prop::collection::vec("[A-Z][a-z]{1,5}", 1..5),
    ) {
        let lineage = names.join("/");
        let mut root = Member::new("Root");
        root.add_son(Member::from_lineage(&lineage, "/"));
        let once = root.len();
        root.add_son(Member::from_lineage(&lineage, "/"));
        prop_assert_eq!(root.len(), once);
    }
}
