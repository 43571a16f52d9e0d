// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeMap;

use crate::model::{FeedbackRecord, Field};

pub const MIN_TITLE_CHARS: usize = 3;
pub const MIN_DESCRIPTION_CHARS: usize = 10;

/// What the next submit does: create a new record, or update the record at a
/// known store position in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EditTarget {
    #[default]
    Creating,
    Editing(usize),
}

/// Buffered form fields plus per-field validation results.
///
/// Field lengths are measured on the trimmed value in characters, not bytes.
/// `set_field` re-validates only the touched field; `validate` checks both
/// fields and records a message for every failing one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    title: String,
    description: String,
    edit_target: EditTarget,
    field_errors: BTreeMap<Field, String>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Description => &self.description,
        }
    }

    pub fn edit_target(&self) -> EditTarget {
        self.edit_target
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.edit_target, EditTarget::Editing(_))
    }

    pub fn field_error(&self, field: Field) -> Option<&str> {
        self.field_errors.get(&field).map(String::as_str)
    }

    /// Updates one field buffer and re-validates that field alone; the other
    /// field's error state is left untouched.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        match field {
            Field::Title => self.title = value.into(),
            Field::Description => self.description = value.into(),
        }
        self.validate_field(field);
    }

    /// Validates both fields without short-circuiting, so every failing field
    /// ends up with a message. Returns true iff the form can be submitted.
    pub fn validate(&mut self) -> bool {
        let mut ok = true;
        for field in Field::ALL {
            if !self.validate_field(field) {
                ok = false;
            }
        }
        ok
    }

    /// Loads an existing record into the buffers and switches to edit mode.
    pub fn begin_edit(&mut self, position: usize, record: &FeedbackRecord) {
        self.title = record.title.clone();
        self.description = record.description.clone();
        self.edit_target = EditTarget::Editing(position);
        self.field_errors.clear();
    }

    /// Back to creation mode with empty fields and no errors.
    pub fn reset(&mut self) {
        self.title.clear();
        self.description.clear();
        self.edit_target = EditTarget::Creating;
        self.field_errors.clear();
    }

    /// Called after a record is removed from the store so the edit target
    /// keeps naming the same record: deleting the target resets the form,
    /// deleting an earlier position shifts the target down by one.
    pub fn record_removed(&mut self, position: usize) {
        match self.edit_target {
            EditTarget::Editing(target) if target == position => self.reset(),
            EditTarget::Editing(target) if target > position => {
                self.edit_target = EditTarget::Editing(target - 1);
            }
            _ => {}
        }
    }

    fn validate_field(&mut self, field: Field) -> bool {
        let (value, minimum) = match field {
            Field::Title => (&self.title, MIN_TITLE_CHARS),
            Field::Description => (&self.description, MIN_DESCRIPTION_CHARS),
        };

        if value.trim().chars().count() < minimum {
            self.field_errors.insert(
                field,
                format!("{} must be at least {minimum} characters", field.label()),
            );
            false
        } else {
            self.field_errors.remove(&field);
            true
        }
    }
}
