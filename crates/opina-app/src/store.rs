// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::ids::FeedbackId;
use crate::model::FeedbackRecord;

/// In-memory ordered mirror of the remote feedback collection.
///
/// The store never touches the network. The controller issues the remote call
/// first and commits the matching mutation here only after the service
/// confirms success, so the store always holds the last known-good snapshot.
/// Insertion order is preserved and ids are unique within the sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackStore {
    records: Vec<FeedbackRecord>,
}

impl FeedbackStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wholesale replacement with a fresh remote snapshot. Later duplicates of
    /// an id already present are dropped to keep the uniqueness invariant.
    pub fn replace_all(&mut self, records: Vec<FeedbackRecord>) {
        self.records.clear();
        for record in records {
            if !self.contains(record.id) {
                self.records.push(record);
            }
        }
    }

    /// Appends a record confirmed by a remote create. A duplicate id is
    /// ignored rather than breaking the uniqueness invariant.
    pub fn append(&mut self, record: FeedbackRecord) {
        if !self.contains(record.id) {
            self.records.push(record);
        }
    }

    /// Replaces the record at `position` after a confirmed remote update.
    pub fn replace_at(&mut self, position: usize, record: FeedbackRecord) {
        if let Some(slot) = self.records.get_mut(position) {
            *slot = record;
        }
    }

    /// Removes the record at `position` after a confirmed remote delete,
    /// preserving the relative order of all other records.
    pub fn remove_at(&mut self, position: usize) -> Option<FeedbackRecord> {
        if position < self.records.len() {
            Some(self.records.remove(position))
        } else {
            None
        }
    }

    pub fn get(&self, position: usize) -> Option<&FeedbackRecord> {
        self.records.get(position)
    }

    pub fn records(&self) -> &[FeedbackRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn contains(&self, id: FeedbackId) -> bool {
        self.records.iter().any(|record| record.id == id)
    }
}
