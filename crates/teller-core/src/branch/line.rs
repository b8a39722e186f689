//! Line: one teller's FIFO of waiting customers.

use std::collections::VecDeque;

use crate::domain::LineId;

/// Authoritative contents of one line.
///
/// The selector only ever sees `(len, index)`; customers live here.
#[derive(Debug, Clone)]
pub struct Line<T> {
    id: LineId,
    waiting: VecDeque<T>,
}

impl<T> Line<T> {
    pub fn new(id: LineId) -> Self {
        Self {
            id,
            waiting: VecDeque::new(),
        }
    }

    pub fn id(&self) -> LineId {
        self.id
    }

    pub fn len(&self) -> usize {
        self.waiting.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waiting.is_empty()
    }

    pub fn push(&mut self, item: T) {
        self.waiting.push_back(item);
    }

    pub fn pop(&mut self) -> Option<T> {
        self.waiting.pop_front()
    }

    pub fn front(&self) -> Option<&T> {
        self.waiting.front()
    }
}
