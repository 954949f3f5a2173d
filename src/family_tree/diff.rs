//! # Tree Diff
//!
//! Compares the live tree against the baseline snapshot and produces the
//! three batches the member API understands:
//!
//! - `updates` - members whose name or sex changed
//! - `creates` - new subtrees, grouped by the id of the parent they hang under
//! - `deletes` - ids of baseline subtrees that are gone
//!
//! Members are paired by id, never by position. Only ids present on both
//! sides are descended into: a new subtree is sent whole under its parent,
//! and a deleted subtree is identified by its root id alone.
//!
//! A member that changed parent shows up twice: inside a created subtree and
//! under a deleted one. Those deletes are listed again in `detaching`, and
//! they have to land before the creates that re-add the moved members.

use std::collections::{BTreeMap, BTreeSet};

use uuid::Uuid;

use crate::shared::member::{RawMember, SonlessRawMember};

/// Pending remote changes between two trees
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diff {
    pub updates: Vec<SonlessRawMember>,
    pub creates: BTreeMap<Uuid, Vec<RawMember>>,
    pub deletes: BTreeSet<Uuid>,
    /// Subset of `deletes` whose baseline subtree holds members that
    /// reappear in `creates`
    pub detaching: BTreeSet<Uuid>,
}

impl Diff {
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Count of individual instructions: updated members, created subtrees
    /// and deleted subtrees
    pub fn len(&self) -> usize {
        self.updates.len() + self.creates.values().map(Vec::len).sum::<usize>() + self.deletes.len()
    }
}

/// Diff `live` against `baseline`.
///
/// Both roots are compared field by field regardless of their ids; the
/// caller is expected to pass two snapshots of the same family.
pub fn compute_diff(baseline: &RawMember, live: &RawMember) -> Diff {
    let mut diff = Diff::default();
    walk(baseline, live, &mut diff);

    let recreated: BTreeSet<Uuid> = diff
        .creates
        .values()
        .flatten()
        .flat_map(RawMember::ids)
        .filter(|id| baseline.contains(*id))
        .collect();
    if !recreated.is_empty() {
        diff.detaching = diff
            .deletes
            .iter()
            .copied()
            .filter(|id| {
                baseline
                    .find_son(*id)
                    .is_some_and(|gone| gone.ids().iter().any(|id| recreated.contains(id)))
            })
            .collect();
    }

    tracing::debug!(
        updates = diff.updates.len(),
        creates = diff.creates.len(),
        deletes = diff.deletes.len(),
        moved = recreated.len(),
        "computed tree diff"
    );
    diff
}

fn walk(baseline: &RawMember, live: &RawMember, diff: &mut Diff) {
    let mut created = Vec::new();
    for live_son in &live.sons {
        match baseline.sons.iter().find(|son| son.id == live_son.id) {
            Some(baseline_son) => walk(baseline_son, live_son, diff),
            None => created.push(live_son.clone()),
        }
    }

    for baseline_son in &baseline.sons {
        if !live.sons.iter().any(|son| son.id == baseline_son.id) {
            diff.deletes.insert(baseline_son.id);
        }
    }

    if !created.is_empty() {
        diff.creates.insert(live.id, created);
    }

    if baseline.name != live.name || baseline.is_male != live.is_male {
        diff.updates.push(live.sonless());
    }
}
