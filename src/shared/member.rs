//! Member Transfer Forms
//!
//! Plain, fully-owned records that cross the wire boundary between the
//! editing layer and the remote member store.
//!
//! - `RawMember` - a whole subtree, used to hydrate a tree, to capture the
//!   baseline snapshot and to append new children remotely.
//! - `SonlessRawMember` - field-only record, used by the bulk update call.
//!
//! The JSON field names (`id`, `name`, `is_male`, `sons`) are the ones the
//! member API reads and writes.
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::SharedError;

/// Full recursive snapshot of one member and everything below it.
#[derive(Serialize, Deserialize, Clone, Default, PartialEq, Eq, Debug)]
pub struct RawMember {
    pub id: Uuid,
    pub name: String,
    pub is_male: bool,
    pub sons: Vec<RawMember>,
}

/// A member's own fields, without its sons.
#[derive(Serialize, Deserialize, Clone, Default, PartialEq, Eq, Debug)]
pub struct SonlessRawMember {
    pub id: Uuid,
    pub name: String,
    pub is_male: bool,
}

impl RawMember {
    /// Create a leaf record
    pub fn new(id: Uuid, name: impl Into<String>, is_male: bool) -> Self {
        Self {
            id,
            name: name.into(),
            is_male,
            sons: Vec::new(),
        }
    }

    /// Builder-style helper used mostly when assembling fixtures
    pub fn with_sons(mut self, sons: Vec<RawMember>) -> Self {
        self.sons = sons;
        self
    }

    /// Depth-first lookup, `self` included.
    pub fn find_son(&self, id: Uuid) -> Option<&RawMember> {
        if self.id == id {
            return Some(self);
        }
        self.sons.iter().find_map(|son| son.find_son(id))
    }

    pub fn find_son_mut(&mut self, id: Uuid) -> Option<&mut RawMember> {
        if self.id == id {
            return Some(self);
        }
        self.sons.iter_mut().find_map(|son| son.find_son_mut(id))
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.find_son(id).is_some()
    }

    /// Detach the subtree rooted at `id` from anywhere below `self`.
    ///
    /// The root itself can't be removed this way.
    pub fn remove_son(&mut self, id: Uuid) -> Option<RawMember> {
        if let Some(position) = self.sons.iter().position(|son| son.id == id) {
            return Some(self.sons.remove(position));
        }
        self.sons.iter_mut().find_map(|son| son.remove_son(id))
    }

    /// Overwrite this record's own fields from a field-only record
    pub fn apply_fields(&mut self, fields: &SonlessRawMember) {
        self.name = fields.name.clone();
        self.is_male = fields.is_male;
    }

    /// Number of members in this subtree
    pub fn len(&self) -> usize {
        1 + self.sons.iter().map(RawMember::len).sum::<usize>()
    }

    /// A subtree always holds at least its root
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Every id in this subtree, pre-order
    pub fn ids(&self) -> Vec<Uuid> {
        let mut ids = Vec::with_capacity(self.len());
        self.collect_ids(&mut ids);
        ids
    }

    fn collect_ids(&self, ids: &mut Vec<Uuid>) {
        ids.push(self.id);
        for son in &self.sons {
            son.collect_ids(ids);
        }
    }

    pub fn sonless(&self) -> SonlessRawMember {
        SonlessRawMember {
            id: self.id,
            name: self.name.clone(),
            is_male: self.is_male,
        }
    }

    /// Parse a subtree from the JSON the member API returns
    pub fn from_json(json: &str) -> Result<Self, SharedError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, SharedError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn into_sonless(self) -> SonlessRawMember {
        SonlessRawMember {
            id: self.id,
            name: self.name,
            is_male: self.is_male,
        }
    }
}

impl From<RawMember> for SonlessRawMember {
    fn from(raw: RawMember) -> Self {
        raw.into_sonless()
    }
}
