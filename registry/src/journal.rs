//! Append-only journal of committed domain events.
//!
//! Sequence numbers are global and gap-free, starting at 1. Observers that
//! lose their connection re-sync with [`EventJournal::since`].

use jury_types::{DisputeId, DomainEvent, EventRecord, Timestamp};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JournalError {
    #[error("journal encoding failed: {0}")]
    Encode(String),

    #[error("journal decoding failed: {0}")]
    Decode(String),

    #[error("journal sequence gap: expected {expected}, found {found}")]
    SequenceGap { expected: u64, found: u64 },
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventJournal {
    records: Vec<EventRecord>,
}

impl EventJournal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sequence number of the newest record, 0 when empty.
    pub fn last_sequence(&self) -> u64 {
        self.records.last().map(|r| r.sequence).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn append(&mut self, at: Timestamp, event: DomainEvent) -> &EventRecord {
        let sequence = self.last_sequence() + 1;
        tracing::debug!(sequence, event = event.name(), "event journaled");
        self.records.push(EventRecord {
            sequence,
            at,
            event,
        });
        &self.records[self.records.len() - 1]
    }

    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    pub fn for_dispute(&self, dispute: DisputeId) -> impl Iterator<Item = &EventRecord> + '_ {
        self.records
            .iter()
            .filter(move |r| r.event.dispute_id() == Some(dispute))
    }

    /// Records with a sequence number strictly greater than `sequence`.
    pub fn since(&self, sequence: u64) -> &[EventRecord] {
        let start = self.records.partition_point(|r| r.sequence <= sequence);
        &self.records[start..]
    }

    pub fn encode(&self) -> Result<Vec<u8>, JournalError> {
        bincode::serialize(&self.records).map_err(|e| JournalError::Encode(e.to_string()))
    }

    /// Decode a journal and check that its sequence numbers run 1, 2, 3, …
    pub fn decode(bytes: &[u8]) -> Result<Self, JournalError> {
        let records: Vec<EventRecord> =
            bincode::deserialize(bytes).map_err(|e| JournalError::Decode(e.to_string()))?;
        for (i, record) in records.iter().enumerate() {
            let expected = i as u64 + 1;
            if record.sequence != expected {
                return Err(JournalError::SequenceGap {
                    expected,
                    found: record.sequence,
                });
            }
        }
        Ok(Self { records })
    }
}
