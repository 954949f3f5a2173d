//! # Family Member Tree
//!
//! The live, editable tree. Every `Member` exclusively owns its sons; there
//! are no parent pointers, so "who is the parent of X" is answered by
//! walking down from the root.
//!
//! Insertion takes the son by value, so a subtree can only ever hang under
//! one parent at a time.

use uuid::Uuid;

use crate::family_tree::waitlist::Waitlist;
use crate::shared::member::{RawMember, SonlessRawMember};

/// One person in the family tree
#[derive(Debug)]
pub struct Member {
    id: Uuid,
    pub name: String,
    pub is_male: bool,
    sons: Vec<Member>,
}

impl Member {
    /// New childless member with a fresh id, male by default
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), name, true)
    }

    pub fn with_id(id: Uuid, name: impl Into<String>, is_male: bool) -> Self {
        Self {
            id,
            name: name.into(),
            is_male,
            sons: Vec::new(),
        }
    }

    /// Build a linear chain from a lineage string.
    ///
    /// The last name becomes the returned node, which is the root of the
    /// chain; each earlier name is the only son of the name that follows it.
    /// `"Omar->Ali->Hassan"` therefore reads "Omar son of Ali son of Hassan"
    /// and yields `Hassan { Ali { Omar } }`.
    ///
    /// Names are trimmed and empty ones skipped. With no names at all the
    /// result is a single member with an empty name.
    pub fn from_lineage(path: &str, separator: &str) -> Self {
        let mut names: Vec<&str> = path
            .split(separator)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect();

        let Some(root_name) = names.pop() else {
            return Member::new("");
        };

        let mut root = Member::new(root_name);
        let mut chain: Option<Member> = None;
        for name in names {
            let mut node = Member::new(name);
            if let Some(below) = chain.take() {
                node.sons.push(below);
            }
            chain = Some(node);
        }
        if let Some(chain) = chain {
            root.sons.push(chain);
        }
        root
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn sons(&self) -> &[Member] {
        &self.sons
    }

    /// Attach `son` under this member.
    ///
    /// If a son with exactly the same name already exists, the incoming
    /// node is dropped and its own sons are merged into the existing one,
    /// recursively. Nothing already in the tree is ever removed.
    pub fn add_son(&mut self, son: Member) {
        match self.sons.iter_mut().find(|existing| existing.name == son.name) {
            Some(same_person) => {
                for grandson in son.sons {
                    same_person.add_son(grandson);
                }
            }
            None => self.sons.push(son),
        }
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_sex(&mut self, is_male: bool) {
        self.is_male = is_male;
    }

    /// Detach a direct son, keeping the order of the remaining ones
    pub fn remove_son(&mut self, id: Uuid) -> Option<Member> {
        let position = self.sons.iter().position(|son| son.id == id)?;
        Some(self.sons.remove(position))
    }

    /// Detach every direct son whose id is listed
    pub fn remove_sons(&mut self, ids: &[Uuid]) -> Vec<Member> {
        let (removed, kept) = std::mem::take(&mut self.sons)
            .into_iter()
            .partition(|son| ids.contains(&son.id));
        self.sons = kept;
        removed
    }

    /// Depth-first lookup, `self` included
    pub fn find(&self, id: Uuid) -> Option<&Member> {
        if self.id == id {
            return Some(self);
        }
        self.sons.iter().find_map(|son| son.find(id))
    }

    pub fn find_mut(&mut self, id: Uuid) -> Option<&mut Member> {
        if self.id == id {
            return Some(self);
        }
        self.sons.iter_mut().find_map(|son| son.find_mut(id))
    }

    /// The member that directly owns `id`, found by walking from `self`
    pub fn parent_of(&self, id: Uuid) -> Option<&Member> {
        if self.sons.iter().any(|son| son.id == id) {
            return Some(self);
        }
        self.sons.iter().find_map(|son| son.parent_of(id))
    }

    /// Number of members in this subtree
    pub fn len(&self) -> usize {
        1 + self.sons.iter().map(Member::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Pre-order walk over this subtree
    pub fn iter(&self) -> Iter<'_> {
        Iter { stack: vec![self] }
    }

    /// Whether this member holds the single editing focus
    pub fn is_focused(&self, waitlist: &Waitlist) -> bool {
        waitlist.is_focused(self.id)
    }

    pub fn to_raw(&self) -> RawMember {
        RawMember {
            id: self.id,
            name: self.name.clone(),
            is_male: self.is_male,
            sons: self.sons.iter().map(Member::to_raw).collect(),
        }
    }

    pub fn to_sonless_raw(&self) -> SonlessRawMember {
        SonlessRawMember {
            id: self.id,
            name: self.name.clone(),
            is_male: self.is_male,
        }
    }
}

impl From<RawMember> for Member {
    fn from(
        RawMember {
            id,
            name,
            is_male,
            sons,
        }: RawMember,
    ) -> Self {
        Self {
            id,
            name,
            is_male,
            sons: sons.into_iter().map(Member::from).collect(),
        }
    }
}

/// Sons are compared as a set keyed by id; their order doesn't matter.
impl PartialEq for Member {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.is_male == other.is_male
            && self.sons.len() == other.sons.len()
            && self.sons.iter().all(|son| {
                other
                    .sons
                    .iter()
                    .find(|candidate| candidate.id == son.id)
                    .is_some_and(|candidate| candidate == son)
            })
    }
}

impl Eq for Member {}

/// Pre-order iterator returned by [`Member::iter`]
pub struct Iter<'a> {
    stack: Vec<&'a Member>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Member;

    fn next(&mut self) -> Option<Self::Item> {
        let member = self.stack.pop()?;
        self.stack.extend(member.sons.iter().rev());
        Some(member)
    }
}
