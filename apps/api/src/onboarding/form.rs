//! Step-local form state with touched tracking.
//!
//! Errors for a field stay hidden until that field has been edited or blurred
//! once. `submit` ignores touched state and checks everything.

use std::collections::BTreeSet;

use super::validation::{Field, FieldErrors};

/// Values collected by one wizard step.
pub trait StepValues: Clone {
    /// Full error set for every field of the step.
    fn validate(&self) -> FieldErrors;

    fn is_complete(&self) -> bool {
        self.validate().is_clean()
    }
}

#[derive(Debug, Clone)]
pub struct StepForm<T> {
    values: T,
    touched: BTreeSet<Field>,
    external: FieldErrors,
}

impl<T: StepValues> StepForm<T> {
    /// Starts from values already held by the wizard (empty on first visit).
    pub fn new(values: T) -> Self {
        Self {
            values,
            touched: BTreeSet::new(),
            external: FieldErrors::new(),
        }
    }

    pub fn values(&self) -> &T {
        &self.values
    }

    pub(crate) fn values_mut(&mut self) -> &mut T {
        &mut self.values
    }

    /// Applies a change to `field` and marks it touched.
    pub fn edit(&mut self, field: Field, apply: impl FnOnce(&mut T)) {
        apply(&mut self.values);
        self.touched.insert(field);
    }

    pub fn blur(&mut self, field: Field) {
        self.touched.insert(field);
    }

    pub fn is_touched(&self, field: Field) -> bool {
        self.touched.contains(&field)
    }

    /// Error reported by something outside the values themselves (e.g. an
    /// asynchronous lookup). Overrides the value-level message when set.
    pub fn set_external_error(&mut self, field: Field, message: Option<String>) {
        self.external.set(field, message.unwrap_or_default());
    }

    /// Every error, touched or not.
    pub fn all_errors(&self) -> FieldErrors {
        let mut errors = self.values.validate();
        errors.extend_failures(&self.external);
        errors
    }

    /// Errors the user should currently see.
    pub fn visible_errors(&self) -> FieldErrors {
        let mut errors = self.all_errors();
        errors.retain(|field| self.touched.contains(&field));
        errors
    }

    pub fn is_complete(&self) -> bool {
        self.all_errors().is_clean()
    }

    /// The "continue" action: re-validates all fields, touching every one of
    /// them so their messages become visible, and hands back the values only
    /// when nothing fails.
    pub fn submit(&mut self) -> Result<T, FieldErrors> {
        let errors = self.all_errors();
        self.touched.extend(errors.fields());
        if errors.is_clean() {
            Ok(self.values.clone())
        } else {
            Err(errors)
        }
    }
}
