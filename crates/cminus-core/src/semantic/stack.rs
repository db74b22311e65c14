//! Active scope stack
//!
//! Mirrors the nesting of the walk in progress. Each entry carries the slot
//! counter for declarations made while that scope is innermost; the counter
//! restarts at zero on every push.

use super::scope::ScopeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Frame {
    scope: ScopeId,
    next_slot: u32,
}

#[derive(Debug, Default)]
pub struct ScopeStack {
    frames: Vec<Frame>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, scope: ScopeId) {
        self.frames.push(Frame {
            scope,
            next_slot: 0,
        });
    }

    pub fn pop(&mut self) -> Option<ScopeId> {
        self.frames.pop().map(|frame| frame.scope)
    }

    pub fn top(&self) -> Option<ScopeId> {
        self.frames.last().map(|frame| frame.scope)
    }

    /// Returns the innermost scope's next slot and advances its counter.
    pub fn next_slot(&mut self) -> Option<u32> {
        let frame = self.frames.last_mut()?;
        let slot = frame.next_slot;
        frame.next_slot += 1;
        Some(slot)
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::scope::{GLOBAL_SCOPE_NAME, ScopeKind, ScopeTable};

    fn two_scopes() -> (ScopeId, ScopeId) {
        let mut table = ScopeTable::new();
        let global = table.create_scope(ScopeKind::Global, GLOBAL_SCOPE_NAME, None);
        let func = table.create_scope(ScopeKind::Function, "f", Some(global));
        (global, func)
    }

    #[test]
    fn push_and_pop_track_top() {
        let (global, func) = two_scopes();
        let mut stack = ScopeStack::new();
        assert!(stack.top().is_none());

        stack.push(global);
        stack.push(func);
        assert_eq!(stack.top(), Some(func));
        assert_eq!(stack.depth(), 2);

        assert_eq!(stack.pop(), Some(func));
        assert_eq!(stack.top(), Some(global));
        assert_eq!(stack.pop(), Some(global));
        assert!(stack.is_empty());
        assert_eq!(stack.pop(), None);
    }

    #[test]
    fn slots_count_per_frame() {
        let (global, func) = two_scopes();
        let mut stack = ScopeStack::new();

        stack.push(global);
        assert_eq!(stack.next_slot(), Some(0));
        assert_eq!(stack.next_slot(), Some(1));

        stack.push(func);
        assert_eq!(stack.next_slot(), Some(0));

        stack.pop();
        assert_eq!(stack.next_slot(), Some(2));
    }

    #[test]
    fn repush_resets_counter() {
        let (global, _) = two_scopes();
        let mut stack = ScopeStack::new();

        stack.push(global);
        stack.next_slot();
        stack.pop();
        stack.push(global);

        assert_eq!(stack.next_slot(), Some(0));
    }

    #[test]
    fn empty_stack_has_no_slot() {
        let mut stack = ScopeStack::new();
        assert_eq!(stack.next_slot(), None);
    }
}
