//! Editing session flows: member actions, focus and discard

use ensab::family_tree::{Action, EditSession, Member};
use pretty_assertions::assert_eq;
use uuid::Uuid;

use crate::common::{find_id, hassan_family, stored_session, test_config, RecordingTransport};

#[test]
fn test_lineage_chain_orientation() {
    let me = Member::from_lineage("Grandpa/Dad/Me", "/");
    assert_eq!(me.name, "Me");
    crate::assert_son_names!(me, ["Dad"]);
    crate::assert_son_names!(me.sons()[0], ["Grandpa"]);

    let grandpa = find_id(&me, "Grandpa");
    let dad = me.parent_of(grandpa).expect("Grandpa has a parent");
    assert_eq!(dad.name, "Dad");
    let top = me.parent_of(dad.id()).expect("Dad has a parent");
    assert_eq!(top.id(), me.id());
}

#[test]
fn test_add_merges_overlapping_lineage() {
    let mut session = stored_session();
    let root = session.root_id();

    // "Omar/Ali" reads "Omar son of Ali": merges into the existing Ali
    assert_eq!(session.add_sons(root, "Omar/Ali", true), 1);

    let ali = session.live().find(find_id(session.live(), "Ali")).unwrap();
    crate::assert_son_names!(session.live(), ["Ali", "Omar"]);
    crate::assert_son_names!(ali, ["Sara", "Nour", "Omar"]);

    let diff = session.pending();
    assert_eq!(diff.creates.len(), 1);
    assert_eq!(diff.creates[&ali.id()].len(), 1);
    assert!(diff.updates.is_empty());
    assert!(diff.deletes.is_empty());
}

#[test]
fn test_add_sets_sex_on_each_new_member() {
    let mut session = stored_session();
    let root = session.root_id();
    session.add_sons(root, "Huda, Mona", false);

    for name in ["Huda", "Mona"] {
        let id = find_id(session.live(), name);
        assert!(!session.live().find(id).unwrap().is_male);
    }
}

#[test]
fn test_rename_reports_single_update() {
    let mut session = stored_session();
    let nour = find_id(session.live(), "Nour");
    assert!(session.rename(nour, "Noor"));

    let diff = session.pending();
    assert_eq!(diff.updates.len(), 1);
    assert_eq!(diff.updates[0].id, nour);
    assert_eq!(diff.updates[0].name, "Noor");
    assert!(diff.creates.is_empty());
    assert!(diff.deletes.is_empty());
}

#[test]
fn test_remove_reports_only_subtree_root() {
    let mut session = stored_session();
    let root = session.root_id();
    let ali = find_id(session.live(), "Ali");
    let sara = find_id(session.live(), "Sara");

    assert_eq!(session.remove_sons(root, &[ali]), 1);
    let diff = session.pending();
    assert!(diff.deletes.contains(&ali));
    assert!(!diff.deletes.contains(&sara));
    assert_eq!(diff.len(), 1);
}

#[test]
fn test_add_then_remove_cancels_out() {
    let mut session = stored_session();
    let root = session.root_id();
    session.add_sons(root, "Zaid", true);
    let zaid = find_id(session.live(), "Zaid");
    session.remove_sons(root, &[zaid]);
    assert!(!session.is_dirty());
}

#[test]
fn test_rename_back_is_clean() {
    let mut session = stored_session();
    let omar = find_id(session.live(), "Omar");
    session.rename(omar, "Umar");
    assert!(session.is_dirty());
    session.rename(omar, "Omar");
    assert!(!session.is_dirty());
}

#[test]
fn test_focus_follows_latest_action() {
    let mut session = stored_session();
    let ali = find_id(session.live(), "Ali");
    let omar = find_id(session.live(), "Omar");

    assert!(session.begin_action(ali, Action::Add));
    assert!(session.begin_action(omar, Action::Update));
    assert!(session.is_focused(omar));
    assert!(!session.live().find(ali).unwrap().is_focused(session.waitlist()));

    session.cancel_action(omar);
    assert!(session.is_focused(ali));
    assert_eq!(session.waitlist().action_of(omar), Action::Preview);
    assert_eq!(session.waitlist().action_of(ali), Action::Add);
}

#[test]
fn test_completed_action_returns_to_preview() {
    let mut session = stored_session();
    let omar = find_id(session.live(), "Omar");
    session.begin_action(omar, Action::Update);
    session.rename(omar, "Umar");
    assert_eq!(session.waitlist().action_of(omar), Action::Preview);
    assert!(session.waitlist().is_empty());
}

#[test]
fn test_discard_drops_edits_and_focus() {
    let mut session = stored_session();
    let root = session.root_id();
    let original = session.baseline().clone();

    session.begin_action(root, Action::Add);
    session.add_sons(root, "Zaid/Yusuf", true);
    session.set_sex(find_id(session.live(), "Omar"), false);
    session.discard();

    assert!(!session.is_dirty());
    assert_eq!(session.live().to_raw(), original);
    assert!(session.waitlist().is_empty());
}

#[test]
fn test_unknown_member_is_ignored() {
    let mut session = stored_session();
    let stranger = Uuid::new_v4();
    assert_eq!(session.add_sons(stranger, "Zaid", true), 0);
    assert!(!session.rename(stranger, "Zaid"));
    assert!(!session.set_sex(stranger, false));
    assert_eq!(session.remove_sons(stranger, &[stranger]), 0);
    assert!(!session.is_dirty());
}

#[tokio::test]
async fn test_load_from_transport() {
    let family = hassan_family();
    let transport = RecordingTransport::new().with_family(family.clone());

    let session = crate::assert_ok!(
        EditSession::load(&transport, family.id, test_config("http://localhost:8080")).await
    );
    assert_eq!(session.live().to_raw(), family);
    assert!(!session.is_dirty());
    assert!(session.last_synced_at().is_some());
}

#[tokio::test]
async fn test_load_missing_family() {
    let transport = RecordingTransport::new();
    let result =
        EditSession::load(&transport, Uuid::new_v4(), test_config("http://localhost:8080")).await;
    assert!(result.is_err());
}
