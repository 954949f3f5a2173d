//! # Commit Plan
//!
//! Turns a [`Diff`] into the remote calls that apply it:
//!
//! - one `POST member/{parent_id}` per parent that gained sons
//! - one `PUT member` carrying every field update, if there are any
//! - one `DELETE member/{id}` per removed subtree
//!
//! A family that was never saved goes out as a single `POST member` instead.
//! Deletes that detach a moved member come first, ahead of the creates.
//!
//! The calls are independent of each other; nothing here makes them atomic.

use std::fmt;

use thiserror::Error;
use uuid::Uuid;

use crate::family_tree::diff::Diff;
use crate::shared::member::{RawMember, SonlessRawMember};

/// One request against the member API
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCall {
    /// Store a family that has never been saved, root included
    CreateFamily(RawMember),
    /// Append whole subtrees under an existing member
    AppendChildren {
        parent_id: Uuid,
        sons: Vec<RawMember>,
    },
    /// Bulk field update
    UpdateFields(Vec<SonlessRawMember>),
    /// Remove a member and everything below it
    Delete(Uuid),
}

/// HTTP verb of a [`RemoteCall`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        })
    }
}

impl RemoteCall {
    pub fn method(&self) -> Method {
        match self {
            RemoteCall::CreateFamily(_) | RemoteCall::AppendChildren { .. } => Method::Post,
            RemoteCall::UpdateFields(_) => Method::Put,
            RemoteCall::Delete(_) => Method::Delete,
        }
    }

    /// Path relative to the API root
    pub fn path(&self) -> String {
        match self {
            RemoteCall::AppendChildren { parent_id, .. } => format!("member/{}", parent_id),
            RemoteCall::CreateFamily(_) | RemoteCall::UpdateFields(_) => "member".to_string(),
            RemoteCall::Delete(id) => format!("member/{}", id),
        }
    }

    /// Fold a confirmed call into a snapshot so that it matches the remote
    /// store again.
    ///
    /// Returns `false` when the call refers to members the snapshot doesn't
    /// hold; the snapshot is left untouched for those parts.
    pub fn apply_to(&self, snapshot: &mut RawMember) -> bool {
        match self {
            RemoteCall::CreateFamily(family) => {
                *snapshot = family.clone();
                true
            }
            RemoteCall::AppendChildren { parent_id, sons } => {
                match snapshot.find_son_mut(*parent_id) {
                    Some(parent) => {
                        parent.sons.extend(sons.iter().cloned());
                        true
                    }
                    None => false,
                }
            }
            RemoteCall::UpdateFields(updates) => {
                let mut applied = true;
                for fields in updates {
                    match snapshot.find_son_mut(fields.id) {
                        Some(member) => member.apply_fields(fields),
                        None => applied = false,
                    }
                }
                applied
            }
            RemoteCall::Delete(id) => snapshot.remove_son(*id).is_some(),
        }
    }
}

/// Ordered list of calls for one commit: creates, then the update, then
/// deletes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitPlan {
    pub calls: Vec<RemoteCall>,
}

impl CommitPlan {
    pub fn from_diff(diff: Diff) -> Self {
        let Diff {
            updates,
            creates,
            deletes,
            detaching,
        } = diff;

        let mut calls: Vec<RemoteCall> = detaching.iter().copied().map(RemoteCall::Delete).collect();
        calls.extend(
            creates
                .into_iter()
                .map(|(parent_id, sons)| RemoteCall::AppendChildren { parent_id, sons }),
        );
        if !updates.is_empty() {
            calls.push(RemoteCall::UpdateFields(updates));
        }
        calls.extend(
            deletes
                .into_iter()
                .filter(|id| !detaching.contains(id))
                .map(RemoteCall::Delete),
        );

        Self { calls }
    }

    /// Plan for a family the remote store has never seen
    pub fn create_family(family: RawMember) -> Self {
        Self {
            calls: vec![RemoteCall::CreateFamily(family)],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RemoteCall> {
        self.calls.iter()
    }
}

impl IntoIterator for CommitPlan {
    type Item = RemoteCall;
    type IntoIter = std::vec::IntoIter<RemoteCall>;

    fn into_iter(self) -> Self::IntoIter {
        self.calls.into_iter()
    }
}

/// Outcome of a confirmed commit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitReport {
    pub confirmed: Vec<RemoteCall>,
}

/// Errors raised by a confirmed commit
#[derive(Debug, Error)]
pub enum CommitError {
    /// Some calls never succeeded; the confirmed ones are already part of the
    /// baseline
    #[error("{} of {} remote calls failed", failed.len(), failed.len() + confirmed.len())]
    Partial {
        failed: Vec<(RemoteCall, String)>,
        confirmed: Vec<RemoteCall>,
    },
}
