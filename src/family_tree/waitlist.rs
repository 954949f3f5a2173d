//! # Single-Focus Waitlist
//!
//! At most one member's edit form is active at a time. Focus requests are
//! kept as a stack of member ids; only the most recent request is focused.
//!
//! Releasing removes the first occurrence of the id wherever it sits in the
//! stack, not only at the top. Since earlier requests stay on the stack,
//! releasing the focused member hands focus back to the previous requester.
//!
//! The waitlist also remembers which action each member is showing. Whether
//! a non-focused member may actually display its action is left to the UI.

use std::collections::HashMap;

use uuid::Uuid;

/// What a member's editing panel is currently showing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Action {
    #[default]
    Preview,
    Add,
    Remove,
    Update,
}

#[derive(Debug, Default)]
pub struct Waitlist {
    stack: Vec<Uuid>,
    actions: HashMap<Uuid, Action>,
}

impl Waitlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_focus(&mut self, id: Uuid) {
        self.stack.push(id);
    }

    pub fn is_focused(&self, id: Uuid) -> bool {
        self.stack.last() == Some(&id)
    }

    pub fn focused(&self) -> Option<Uuid> {
        self.stack.last().copied()
    }

    /// Drop the first request made by `id` and put it back in preview
    pub fn release_focus(&mut self, id: Uuid) {
        if let Some(position) = self.stack.iter().position(|queued| *queued == id) {
            self.stack.remove(position);
        }
        self.actions.remove(&id);
    }

    /// Drop every request made by `id`, for members that left the tree
    pub fn forget(&mut self, id: Uuid) {
        self.stack.retain(|queued| *queued != id);
        self.actions.remove(&id);
    }

    /// Open an action panel for `id`, requesting focus for it
    pub fn begin(&mut self, id: Uuid, action: Action) {
        if action == Action::Preview {
            self.finish(id);
            return;
        }
        tracing::debug!(%id, ?action, "member action started");
        self.actions.insert(id, action);
        self.request_focus(id);
    }

    /// Close the panel for `id` after completion or cancellation
    pub fn finish(&mut self, id: Uuid) {
        self.release_focus(id);
    }

    pub fn action_of(&self, id: Uuid) -> Action {
        self.actions.get(&id).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn clear(&mut self) {
        self.stack.clear();
        self.actions.clear();
    }
}
