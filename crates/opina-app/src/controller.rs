// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;

use crate::form::{EditTarget, FormState};
use crate::ids::{FeedbackId, IdSource};
use crate::model::{FeedbackRecord, Field, Notice};
use crate::store::FeedbackStore;

/// The remote feedback collection, as seen by the controller. The HTTP
/// implementation lives in opina-api; tests substitute in-memory fakes.
///
/// Every call is all-or-nothing: `Ok` means the service confirmed the
/// operation with HTTP 200, any other status or transport failure is `Err`.
pub trait RemoteCollection {
    fn fetch_all(&mut self) -> Result<Vec<FeedbackRecord>>;
    fn create(&mut self, record: &FeedbackRecord) -> Result<()>;
    fn update(&mut self, record: &FeedbackRecord) -> Result<()>;
    fn delete(&mut self, id: FeedbackId) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(usize),
    Failed,
    Busy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created,
    Updated,
    Invalid,
    Failed,
    Busy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Failed,
    Busy,
}

/// Binds the form, the store, and the remote collection together.
///
/// Errors never escape this type: validation failures land in the form's
/// per-field errors, network failures become error notices, and in both
/// cases the store keeps its last confirmed snapshot. One remote mutation
/// may be in flight at a time; overlapping calls are refused as `Busy`
/// instead of racing against a stale store position.
pub struct Controller<R, I> {
    store: FeedbackStore,
    form: FormState,
    remote: R,
    ids: I,
    busy: bool,
    notices: Vec<Notice>,
}

impl<R: RemoteCollection, I: IdSource> Controller<R, I> {
    pub fn new(remote: R, ids: I) -> Self {
        Self {
            store: FeedbackStore::new(),
            form: FormState::new(),
            remote,
            ids,
            busy: false,
            notices: Vec::new(),
        }
    }

    pub fn store(&self) -> &FeedbackStore {
        &self.store
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.form.set_field(field, value);
    }

    /// Drains accumulated notices for display. Oldest first.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Replaces the store wholesale with the remote snapshot. On failure the
    /// store keeps its prior contents and the failure surfaces only as a
    /// notice, never as an error to the caller.
    pub fn load_all(&mut self) -> LoadOutcome {
        if self.busy {
            return self.refuse_busy(LoadOutcome::Busy);
        }

        match self.with_remote(|remote| remote.fetch_all()) {
            Ok(records) => {
                let count = records.len();
                self.store.replace_all(records);
                LoadOutcome::Loaded(count)
            }
            Err(error) => {
                self.notices
                    .push(Notice::error(format!("could not load feedback: {error:#}")));
                LoadOutcome::Failed
            }
        }
    }

    /// Creates or updates depending on the edit target. Validation failure
    /// returns before any network call; a confirmed success commits the store
    /// mutation, resets the form to creation mode, and posts a notice.
    pub fn submit(&mut self) -> SubmitOutcome {
        if self.busy {
            return self.refuse_busy(SubmitOutcome::Busy);
        }

        if !self.form.validate() {
            self.notices
                .push(Notice::warning("fix the highlighted fields and retry"));
            return SubmitOutcome::Invalid;
        }

        match self.form.edit_target() {
            EditTarget::Creating => self.submit_create(),
            EditTarget::Editing(position) => self.submit_update(position),
        }
    }

    /// Copies the record at `position` into the form and switches the next
    /// submit to update-in-place.
    pub fn begin_edit(&mut self, position: usize) -> bool {
        match self.store.get(position) {
            Some(record) => {
                let record = record.clone();
                self.form.begin_edit(position, &record);
                true
            }
            None => false,
        }
    }

    /// Abandons an in-place edit and clears the fields.
    pub fn cancel_edit(&mut self) {
        self.form.reset();
    }

    /// Deletes the record at `position` remotely, then locally on confirmed
    /// success. Deleting the record currently being edited resets the form.
    pub fn delete_at(&mut self, position: usize) -> DeleteOutcome {
        if self.busy {
            return self.refuse_busy(DeleteOutcome::Busy);
        }

        let Some(record) = self.store.get(position) else {
            self.notices
                .push(Notice::error("that entry no longer exists"));
            return DeleteOutcome::Failed;
        };
        let id = record.id;

        match self.with_remote(|remote| remote.delete(id)) {
            Ok(()) => {
                self.store.remove_at(position);
                self.form.record_removed(position);
                self.notices.push(Notice::success("feedback deleted"));
                DeleteOutcome::Deleted
            }
            Err(error) => {
                self.notices
                    .push(Notice::error(format!("delete failed: {error:#}")));
                DeleteOutcome::Failed
            }
        }
    }

    fn submit_create(&mut self) -> SubmitOutcome {
        let record = FeedbackRecord::new(
            self.ids.next_id(),
            self.form.title(),
            self.form.description(),
        );

        match self.with_remote(|remote| remote.create(&record)) {
            Ok(()) => {
                self.store.append(record);
                self.form.reset();
                self.notices.push(Notice::success("feedback added"));
                SubmitOutcome::Created
            }
            Err(error) => {
                self.notices
                    .push(Notice::error(format!("add failed: {error:#}")));
                SubmitOutcome::Failed
            }
        }
    }

    fn submit_update(&mut self, position: usize) -> SubmitOutcome {
        let Some(existing) = self.store.get(position) else {
            self.notices
                .push(Notice::error("the entry being edited no longer exists"));
            self.form.reset();
            return SubmitOutcome::Failed;
        };

        let mut updated = existing.clone();
        updated.title = self.form.title().to_owned();
        updated.description = self.form.description().to_owned();

        match self.with_remote(|remote| remote.update(&updated)) {
            Ok(()) => {
                self.store.replace_at(position, updated);
                self.form.reset();
                self.notices.push(Notice::success("feedback updated"));
                SubmitOutcome::Updated
            }
            Err(error) => {
                self.notices
                    .push(Notice::error(format!("update failed: {error:#}")));
                SubmitOutcome::Failed
            }
        }
    }

    fn with_remote<T>(&mut self, call: impl FnOnce(&mut R) -> Result<T>) -> Result<T> {
        self.busy = true;
        let result = call(&mut self.remote);
        self.busy = false;
        result
    }

    fn refuse_busy<T>(&mut self, outcome: T) -> T {
        self.notices
            .push(Notice::warning("another request is still in flight"));
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::{Controller, DeleteOutcome, LoadOutcome, RemoteCollection, SubmitOutcome};
    use crate::form::EditTarget;
    use crate::ids::{FeedbackId, IdSource};
    use crate::model::{Field, FeedbackRecord, NoticeLevel};
    use anyhow::{Result, bail};

    struct FixedIds(i64);

    impl IdSource for FixedIds {
        fn next_id(&mut self) -> FeedbackId {
            self.0 += 1;
            FeedbackId::new(self.0)
        }
    }

    /// In-memory stand-in for the remote service with one-shot failure
    /// injection and call counting.
    #[derive(Default)]
    struct ScriptedRemote {
        records: Vec<FeedbackRecord>,
        fail_next: bool,
        calls: usize,
    }

    impl ScriptedRemote {
        fn with_records(records: Vec<FeedbackRecord>) -> Self {
            Self {
                records,
                ..Self::default()
            }
        }

        fn take_failure(&mut self) -> Result<()> {
            self.calls += 1;
            if self.fail_next {
                self.fail_next = false;
                bail!("server returned 500");
            }
            Ok(())
        }
    }

    impl RemoteCollection for ScriptedRemote {
        fn fetch_all(&mut self) -> Result<Vec<FeedbackRecord>> {
            self.take_failure()?;
            Ok(self.records.clone())
        }

        fn create(&mut self, record: &FeedbackRecord) -> Result<()> {
            self.take_failure()?;
            self.records.push(record.clone());
            Ok(())
        }

        fn update(&mut self, record: &FeedbackRecord) -> Result<()> {
            self.take_failure()?;
            if let Some(slot) = self.records.iter_mut().find(|slot| slot.id == record.id) {
                *slot = record.clone();
            }
            Ok(())
        }

        fn delete(&mut self, id: FeedbackId) -> Result<()> {
            self.take_failure()?;
            self.records.retain(|record| record.id != id);
            Ok(())
        }
    }

    fn seeded_controller(records: Vec<FeedbackRecord>) -> Controller<ScriptedRemote, FixedIds> {
        let mut controller = Controller::new(ScriptedRemote::with_records(records), FixedIds(100));
        assert!(matches!(controller.load_all(), LoadOutcome::Loaded(_)));
        controller
    }

    #[test]
    fn valid_submit_in_creating_mode_appends_one_record() {
        let mut controller = seeded_controller(Vec::new());
        controller.set_field(Field::Title, "Amy");
        controller.set_field(Field::Description, "Loved the app!");

        assert_eq!(controller.submit(), SubmitOutcome::Created);
        assert_eq!(controller.store().len(), 1);
        assert_eq!(controller.store().get(0).map(|r| r.id.get()), Some(101));
        assert_eq!(controller.form().edit_target(), EditTarget::Creating);
        assert!(controller.form().title().is_empty());
        assert!(controller.form().description().is_empty());

        let notices = controller.drain_notices();
        assert!(
            notices
                .iter()
                .any(|notice| notice.level == NoticeLevel::Success)
        );
    }

    #[test]
    fn short_description_blocks_submit_before_any_network_call() {
        let mut controller = seeded_controller(Vec::new());
        let baseline_calls = 1; // the initial load
        controller.set_field(Field::Title, "Amy");
        controller.set_field(Field::Description, "too short");

        assert_eq!(controller.submit(), SubmitOutcome::Invalid);
        assert!(controller.form().field_error(Field::Description).is_some());
        assert_eq!(controller.store().len(), 0);

        // no create call reached the remote
        let remote_calls = controller.remote.calls;
        assert_eq!(remote_calls, baseline_calls);
    }

    #[test]
    fn edit_then_submit_replaces_in_place_without_growing_the_store() {
        let mut controller = seeded_controller(vec![
            FeedbackRecord::new(1, "Amy", "Loved the app!"),
            FeedbackRecord::new(2, "Bo", "Quick and simple to use."),
        ]);

        assert!(controller.begin_edit(1));
        controller.set_field(Field::Description, "Quick, simple, and reliable.");
        assert_eq!(controller.submit(), SubmitOutcome::Updated);

        assert_eq!(controller.store().len(), 2);
        assert_eq!(
            controller.store().get(1).map(|r| r.description.as_str()),
            Some("Quick, simple, and reliable.")
        );
        assert_eq!(controller.form().edit_target(), EditTarget::Creating);
    }

    #[test]
    fn amy_rename_scenario() {
        let mut controller =
            seeded_controller(vec![FeedbackRecord::new(1, "Amy", "Loved the app!")]);

        assert!(controller.begin_edit(0));
        assert_eq!(controller.form().title(), "Amy");
        assert_eq!(controller.form().description(), "Loved the app!");
        assert_eq!(controller.form().edit_target(), EditTarget::Editing(0));

        controller.set_field(Field::Title, "Amy K");
        assert_eq!(controller.submit(), SubmitOutcome::Updated);

        let record = controller.store().get(0).expect("record survives");
        assert_eq!(record.id, FeedbackId::new(1));
        assert_eq!(record.title, "Amy K");
        assert_eq!(record.description, "Loved the app!");
        assert_eq!(controller.form().edit_target(), EditTarget::Creating);
    }

    #[test]
    fn delete_removes_exactly_one_position_and_keeps_order() {
        let mut controller = seeded_controller(vec![
            FeedbackRecord::new(1, "Amy", "Loved the app!"),
            FeedbackRecord::new(2, "Bo", "Quick and simple to use."),
            FeedbackRecord::new(3, "Cleo", "Would recommend to a friend."),
        ]);

        assert_eq!(controller.delete_at(1), DeleteOutcome::Deleted);
        let ids: Vec<i64> = controller
            .store()
            .records()
            .iter()
            .map(|record| record.id.get())
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn failed_remote_submit_leaves_the_store_untouched() {
        let mut controller =
            seeded_controller(vec![FeedbackRecord::new(1, "Amy", "Loved the app!")]);
        let before = controller.store().clone();

        controller.set_field(Field::Title, "Bo");
        controller.set_field(Field::Description, "Quick and simple to use.");
        controller.remote.fail_next = true;

        assert_eq!(controller.submit(), SubmitOutcome::Failed);
        assert_eq!(controller.store(), &before);

        let notices = controller.drain_notices();
        assert!(
            notices
                .iter()
                .any(|notice| notice.level == NoticeLevel::Error)
        );
    }

    #[test]
    fn failed_load_keeps_the_prior_snapshot() {
        let mut controller =
            seeded_controller(vec![FeedbackRecord::new(1, "Amy", "Loved the app!")]);

        controller.remote.fail_next = true;
        assert_eq!(controller.load_all(), LoadOutcome::Failed);
        assert_eq!(controller.store().len(), 1);
    }

    #[test]
    fn failed_update_keeps_editing_mode_for_a_retry() {
        let mut controller =
            seeded_controller(vec![FeedbackRecord::new(1, "Amy", "Loved the app!")]);

        assert!(controller.begin_edit(0));
        controller.set_field(Field::Title, "Amy K");
        controller.remote.fail_next = true;

        assert_eq!(controller.submit(), SubmitOutcome::Failed);
        assert_eq!(controller.form().edit_target(), EditTarget::Editing(0));
        assert_eq!(controller.form().title(), "Amy K");
        assert_eq!(
            controller.store().get(0).map(|r| r.title.as_str()),
            Some("Amy")
        );
    }

    #[test]
    fn deleting_the_edited_record_resets_the_form() {
        let mut controller = seeded_controller(vec![
            FeedbackRecord::new(1, "Amy", "Loved the app!"),
            FeedbackRecord::new(2, "Bo", "Quick and simple to use."),
        ]);

        assert!(controller.begin_edit(1));
        assert_eq!(controller.delete_at(1), DeleteOutcome::Deleted);
        assert_eq!(controller.form().edit_target(), EditTarget::Creating);
        assert!(controller.form().title().is_empty());
    }

    #[test]
    fn deleting_an_earlier_record_shifts_the_edit_target() {
        let mut controller = seeded_controller(vec![
            FeedbackRecord::new(1, "Amy", "Loved the app!"),
            FeedbackRecord::new(2, "Bo", "Quick and simple to use."),
            FeedbackRecord::new(3, "Cleo", "Would recommend to a friend."),
        ]);

        assert!(controller.begin_edit(2));
        assert_eq!(controller.delete_at(0), DeleteOutcome::Deleted);
        assert_eq!(controller.form().edit_target(), EditTarget::Editing(1));

        controller.set_field(Field::Description, "Still recommending it widely.");
        assert_eq!(controller.submit(), SubmitOutcome::Updated);
        assert_eq!(
            controller.store().get(1).map(|r| r.title.as_str()),
            Some("Cleo")
        );
    }

    #[test]
    fn cancel_edit_returns_to_creating_without_touching_the_store() {
        let mut controller =
            seeded_controller(vec![FeedbackRecord::new(1, "Amy", "Loved the app!")]);

        assert!(controller.begin_edit(0));
        controller.set_field(Field::Title, "Scratch this");
        controller.cancel_edit();

        assert_eq!(controller.form().edit_target(), EditTarget::Creating);
        assert_eq!(
            controller.store().get(0).map(|r| r.title.as_str()),
            Some("Amy")
        );
    }

    #[test]
    fn begin_edit_out_of_range_is_refused() {
        let mut controller = seeded_controller(Vec::new());
        assert!(!controller.begin_edit(0));
        assert_eq!(controller.form().edit_target(), EditTarget::Creating);
    }

    #[test]
    fn delete_out_of_range_fails_without_a_network_call() {
        let mut controller = seeded_controller(Vec::new());
        let baseline_calls = controller.remote.calls;
        assert_eq!(controller.delete_at(3), DeleteOutcome::Failed);
        assert_eq!(controller.remote.calls, baseline_calls);
    }

    #[test]
    fn busy_controller_refuses_overlapping_mutations() {
        let mut controller = seeded_controller(Vec::new());
        controller.busy = true;

        assert_eq!(controller.submit(), SubmitOutcome::Busy);
        assert_eq!(controller.delete_at(0), DeleteOutcome::Busy);
        assert_eq!(controller.load_all(), LoadOutcome::Busy);

        let notices = controller.drain_notices();
        assert_eq!(notices.len(), 3);
        assert!(
            notices
                .iter()
                .all(|notice| notice.level == NoticeLevel::Warning)
        );
    }

    #[test]
    fn drain_notices_empties_the_queue() {
        let mut controller = seeded_controller(Vec::new());
        controller.set_field(Field::Title, "x");
        controller.submit();

        assert!(!controller.drain_notices().is_empty());
        assert!(controller.drain_notices().is_empty());
    }
}
