//! Bug report form
//!
//! Holds the raw text a user typed and turns it into a `BugSubmission`
//! only when every required field is present and every choice is one the
//! service understands. Validation never touches the network.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use bug_sdk::{BugModule, BugSubmission, Frequency, UserType};
use thiserror::Error;

/// Form inputs, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    Title,
    Description,
    Module,
    Frequency,
    UserType,
    Logs,
}

impl FormField {
    pub fn label(self) -> &'static str {
        match self {
            FormField::Title => "Title",
            FormField::Description => "Description",
            FormField::Module => "Module",
            FormField::Frequency => "Frequency",
            FormField::UserType => "User type",
            FormField::Logs => "Logs",
        }
    }

    pub fn is_required(self) -> bool {
        !matches!(self, FormField::Logs)
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One message per offending field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<FormField, String>);

impl FieldErrors {
    pub fn get(&self, field: FormField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn insert(&mut self, field: FormField, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, message) in self.0.values().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            f.write_str(message)?;
        }
        Ok(())
    }
}

/// Raised before any request is made when the form is incomplete
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{fields}")]
pub struct ValidationError {
    fields: FieldErrors,
}

impl ValidationError {
    pub fn fields(&self) -> &FieldErrors {
        &self.fields
    }

    pub fn message_for(&self, field: FormField) -> Option<&str> {
        self.fields.get(field)
    }
}

/// Raw form values as entered
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BugForm {
    pub title: String,
    pub description: String,
    pub module: String,
    pub frequency: String,
    pub user_type: String,
    pub logs: String,
}

impl BugForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::Title => self.title = value,
            FormField::Description => self.description = value,
            FormField::Module => self.module = value,
            FormField::Frequency => self.frequency = value,
            FormField::UserType => self.user_type = value,
            FormField::Logs => self.logs = value,
        }
    }

    /// Builder-style `set`
    pub fn with(mut self, field: FormField, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Title => &self.title,
            FormField::Description => &self.description,
            FormField::Module => &self.module,
            FormField::Frequency => &self.frequency,
            FormField::UserType => &self.user_type,
            FormField::Logs => &self.logs,
        }
    }

    /// Clear every field, as after a successful submission
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Check every field and build the request payload.
    ///
    /// Whitespace-only text counts as missing. Title and description are
    /// sent as typed.
    pub fn validate(&self) -> Result<BugSubmission, ValidationError> {
        let mut errors = FieldErrors::default();

        for field in [FormField::Title, FormField::Description] {
            if self.value(field).trim().is_empty() {
                errors.insert(field, format!("{} is required", field.label()));
            }
        }

        let module = parse_choice::<BugModule>(FormField::Module, &self.module, &mut errors);
        let frequency = parse_choice::<Frequency>(FormField::Frequency, &self.frequency, &mut errors);
        let user_type = parse_choice::<UserType>(FormField::UserType, &self.user_type, &mut errors);

        match (module, frequency, user_type) {
            (Some(module), Some(frequency), Some(user_type)) if errors.is_empty() => Ok(BugSubmission {
                title: self.title.clone(),
                description: self.description.clone(),
                module,
                frequency,
                user_type,
                logs: self.logs.clone(),
            }),
            _ => Err(ValidationError { fields: errors }),
        }
    }
}

fn parse_choice<T>(field: FormField, raw: &str, errors: &mut FieldErrors) -> Option<T>
where
    T: FromStr<Err = String>,
{
    if raw.trim().is_empty() {
        errors.insert(field, format!("{} is required", field.label()));
        return None;
    }

    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(message) => {
            errors.insert(field, message);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_form() -> BugForm {
        BugForm::new()
            .with(FormField::Title, "Login button not responding")
            .with(FormField::Description, "Tapping login does nothing on iOS")
            .with(FormField::Module, "Authentication")
            .with(FormField::Frequency, "Often")
            .with(FormField::UserType, "End User")
    }

    #[test]
    fn test_complete_form_validates() {
        let submission = complete_form().validate().expect("form should be valid");
        assert_eq!(submission.title, "Login button not responding");
        assert_eq!(submission.module, BugModule::Authentication);
        assert_eq!(submission.frequency, Frequency::Often);
        assert_eq!(submission.user_type, UserType::EndUser);
        assert_eq!(submission.logs, "");
    }

    #[test]
    fn test_empty_form_reports_every_required_field() {
        let err = BugForm::new().validate().unwrap_err();
        assert_eq!(err.fields().len(), 5);
        assert_eq!(err.message_for(FormField::Title), Some("Title is required"));
        assert_eq!(err.message_for(FormField::Description), Some("Description is required"));
        assert_eq!(err.message_for(FormField::Module), Some("Module is required"));
        assert_eq!(err.message_for(FormField::Frequency), Some("Frequency is required"));
        assert_eq!(err.message_for(FormField::UserType), Some("User type is required"));
        assert_eq!(err.message_for(FormField::Logs), None);
    }

    #[test]
    fn test_whitespace_title_is_missing() {
        let err = complete_form().with(FormField::Title, "   ").validate().unwrap_err();
        assert_eq!(err.fields().len(), 1);
        assert_eq!(err.to_string(), "Title is required");
    }

    #[test]
    fn test_unknown_choice_is_rejected() {
        let err = complete_form().with(FormField::Module, "Billing").validate().unwrap_err();
        assert_eq!(err.message_for(FormField::Module), Some("Unknown module: Billing"));
    }

    #[test]
    fn test_choices_are_case_insensitive() {
        let submission = complete_form()
            .with(FormField::Module, "api")
            .with(FormField::UserType, "end_user")
            .validate()
            .expect("form should be valid");
        assert_eq!(submission.module, BugModule::Api);
        assert_eq!(submission.user_type, UserType::EndUser);
    }

    #[test]
    fn test_logs_are_optional_and_kept() {
        let submission = complete_form()
            .with(FormField::Logs, "NullPointerException at Login.kt:42")
            .validate()
            .expect("form should be valid");
        assert_eq!(submission.logs, "NullPointerException at Login.kt:42");
    }

    #[test]
    fn test_messages_join_in_field_order() {
        let err = complete_form()
            .with(FormField::UserType, "")
            .with(FormField::Title, "")
            .validate()
            .unwrap_err();
        assert_eq!(err.to_string(), "Title is required; User type is required");
    }

    #[test]
    fn test_reset_clears_fields() {
        let mut form = complete_form();
        form.reset();
        assert_eq!(form, BugForm::default());
    }
}
