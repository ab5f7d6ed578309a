use std::collections::VecDeque;

use sleeper_domain::{PassengerId, TicketId};

use crate::error::EngineError;

/// One queued passenger. Queue membership is per passenger, not per
/// ticket: a partially promoted ticket keeps its remaining entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueEntry {
    pub ticket_id: TicketId,
    pub passenger_id: PassengerId,
}

/// Bounded FIFO with contiguous 1-based positions. Positions are derived
/// from the entry's index, so removing an entry renumbers everything
/// behind it with no separate compaction step.
#[derive(Debug)]
pub struct PositionQueue {
    capacity: usize,
    entries: VecDeque<QueueEntry>,
}

impl PositionQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.capacity - self.entries.len()
    }

    /// Append an entry and return its 1-based position
    pub fn push_back(&mut self, entry: QueueEntry) -> Result<usize, EngineError> {
        if self.entries.len() >= self.capacity {
            return Err(EngineError::Inconsistent(format!(
                "queue already holds {} of {} entries",
                self.entries.len(),
                self.capacity
            )));
        }
        self.entries.push_back(entry);
        Ok(self.entries.len())
    }

    pub fn pop_front(&mut self) -> Option<QueueEntry> {
        self.entries.pop_front()
    }

    pub fn front(&self) -> Option<&QueueEntry> {
        self.entries.front()
    }

    /// Drop every entry belonging to `ticket_id`; returns how many were
    /// removed. Later entries shift forward, keeping positions contiguous.
    pub fn remove_ticket(&mut self, ticket_id: TicketId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.ticket_id != ticket_id);
        before - self.entries.len()
    }

    /// 1-based position of a passenger, if queued
    pub fn position_of(&self, passenger_id: PassengerId) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.passenger_id == passenger_id)
            .map(|i| i + 1)
    }

    pub fn contains_ticket(&self, ticket_id: TicketId) -> bool {
        self.entries.iter().any(|e| e.ticket_id == ticket_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &QueueEntry> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(ticket_id: TicketId, passenger_id: PassengerId) -> QueueEntry {
        QueueEntry {
            ticket_id,
            passenger_id,
        }
    }

    #[test]
    fn test_positions_are_contiguous() {
        let mut q = PositionQueue::new(5);
        assert_eq!(q.push_back(entry(1, 10)).unwrap(), 1);
        assert_eq!(q.push_back(entry(1, 11)).unwrap(), 2);
        assert_eq!(q.push_back(entry(2, 20)).unwrap(), 3);
        assert_eq!(q.position_of(20), Some(3));
    }

    #[test]
    fn test_remove_ticket_compacts_positions() {
        let mut q = PositionQueue::new(5);
        q.push_back(entry(1, 10)).unwrap();
        q.push_back(entry(2, 20)).unwrap();
        q.push_back(entry(1, 11)).unwrap();
        q.push_back(entry(3, 30)).unwrap();

        assert_eq!(q.remove_ticket(1), 2);
        assert_eq!(q.len(), 2);
        assert_eq!(q.position_of(20), Some(1));
        assert_eq!(q.position_of(30), Some(2));
        assert_eq!(q.position_of(10), None);
    }

    #[test]
    fn test_pop_front_shifts_everyone_up() {
        let mut q = PositionQueue::new(3);
        q.push_back(entry(1, 10)).unwrap();
        q.push_back(entry(2, 20)).unwrap();

        let head = q.pop_front().unwrap();
        assert_eq!(head.passenger_id, 10);
        assert_eq!(q.position_of(20), Some(1));
    }

    #[test]
    fn test_capacity_is_enforced() {
        let mut q = PositionQueue::new(1);
        q.push_back(entry(1, 10)).unwrap();
        assert!(q.push_back(entry(2, 20)).is_err());
        assert_eq!(q.remaining(), 0);
    }
}
