//! Per-pool event log.
//!
//! Records are buffered until drained. Without a capacity the buffer grows
//! with every call; with one, the oldest records are dropped once a call
//! commits. Sequence numbers are never reused either way, so a consumer
//! that sees a gap knows records were dropped.

use pairswap_types::{EventRecord, PoolEvent, PoolId};

/// Position in the log, used to discard events of a call that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventMark {
    len: usize,
    next_sequence: u64,
}

/// Append-only (until drained) list of [`EventRecord`]s for one pool.
#[derive(Debug, Clone)]
pub struct EventLog {
    pool: PoolId,
    next_sequence: u64,
    records: Vec<EventRecord>,
    capacity: Option<usize>,
    dropped: u64,
}

impl EventLog {
    #[must_use]
    pub fn new(pool: PoolId) -> Self {
        Self {
            pool,
            next_sequence: 0,
            records: Vec::new(),
            capacity: None,
            dropped: 0,
        }
    }

    pub fn set_capacity(&mut self, capacity: Option<usize>) {
        self.capacity = capacity;
        self.enforce_capacity();
    }

    #[must_use]
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Records dropped to stay within capacity.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Drop the oldest records beyond capacity. Only called between calls,
    /// so a mark taken at the start of a call stays valid.
    pub fn enforce_capacity(&mut self) {
        let Some(capacity) = self.capacity else {
            return;
        };
        let excess = self.records.len().saturating_sub(capacity);
        if excess > 0 {
            self.records.drain(..excess);
            self.dropped += excess as u64;
            tracing::debug!(pool = %self.pool, dropped = excess, "Event buffer trimmed");
        }
    }

    pub fn emit(&mut self, event: PoolEvent, timestamp: u64) {
        tracing::trace!(
            pool = %self.pool,
            sequence = self.next_sequence,
            kind = %event.kind(),
            "event"
        );
        self.records.push(EventRecord {
            pool: self.pool,
            sequence: self.next_sequence,
            timestamp,
            event,
        });
        self.next_sequence += 1;
    }

    #[must_use]
    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    /// Take all buffered records. Sequence numbers keep counting.
    pub fn drain(&mut self) -> Vec<EventRecord> {
        std::mem::take(&mut self.records)
    }

    #[must_use]
    pub fn mark(&self) -> EventMark {
        EventMark {
            len: self.records.len(),
            next_sequence: self.next_sequence,
        }
    }

    /// Drop everything emitted since `mark`.
    pub fn rollback(&mut self, mark: EventMark) {
        self.records.truncate(mark.len);
        self.next_sequence = mark.next_sequence;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sync(r: u128) -> PoolEvent {
        PoolEvent::Sync {
            reserve0: r,
            reserve1: r,
        }
    }

    #[test]
    fn sequence_survives_drain() {
        let mut log = EventLog::new(PoolId([1u8; 32]));
        log.emit(sync(1), 10);
        log.emit(sync(2), 10);
        let drained = log.drain();
        assert_eq!(drained.len(), 2);
        log.emit(sync(3), 11);
        assert_eq!(log.records()[0].sequence, 2);
    }

    #[test]
    fn capacity_drops_oldest() {
        let mut log = EventLog::new(PoolId([1u8; 32]));
        log.set_capacity(Some(2));
        for r in 1..=5 {
            log.emit(sync(r), 10);
            log.enforce_capacity();
        }
        assert_eq!(log.records().len(), 2);
        assert_eq!(log.records()[0].sequence, 3);
        assert_eq!(log.dropped(), 3);

        // Lowering the capacity trims immediately.
        log.set_capacity(Some(1));
        assert_eq!(log.records()[0].sequence, 4);
        assert_eq!(log.dropped(), 4);
    }

    #[test]
    fn unbounded_until_drained() {
        let mut log = EventLog::new(PoolId([1u8; 32]));
        for r in 0..100 {
            log.emit(sync(r), 10);
        }
        log.enforce_capacity();
        assert_eq!(log.capacity(), None);
        assert_eq!(log.records().len(), 100);
        assert_eq!(log.drain().len(), 100);
        assert_eq!(log.dropped(), 0);
    }

    #[test]
    fn rollback_discards_and_rewinds() {
        let mut log = EventLog::new(PoolId([1u8; 32]));
        log.emit(sync(1), 10);
        let mark = log.mark();
        log.emit(sync(2), 10);
        log.emit(sync(3), 10);
        log.rollback(mark);
        assert_eq!(log.records().len(), 1);
        log.emit(sync(4), 12);
        assert_eq!(log.records()[1].sequence, 1);
    }
}
