//! Form payloads and their validation rules

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::db::TaskStatus;

pub const REQUIRED: &str = "This field is required.";
pub const PASSWORDS_MUST_MATCH: &str = "Passwords must match";
pub const INVALID_EMAIL: &str = "Invalid email address.";
pub const INVALID_DATE: &str = "Not a valid date value.";
pub const INVALID_CHOICE: &str = "Not a valid choice.";

/// Date format accepted by the task form
pub const DATE_FORMAT: &str = "%m/%d/%Y";

/// Per-field validation messages, keyed by form field name
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn field(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    fn into_result<T>(self, value: T) -> Result<T, FormErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

fn length_message(min: usize, max: usize) -> String {
    format!("Field must be between {} and {} characters long.", min, max)
}

/// Required field with a length range. Returns the trimmed value when present.
fn check_length<'a>(
    errors: &mut FormErrors,
    field: &str,
    value: &'a str,
    min: usize,
    max: usize,
) -> &'a str {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, REQUIRED);
        return value;
    }
    let len = value.chars().count();
    if len < min || len > max {
        errors.add(field, length_message(min, max));
    }
    value
}

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
            .expect("Invalid regex pattern - this is a bug in the codebase")
    })
}

/// Registration form fields
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    #[serde(skip_serializing)]
    pub password: String,
    #[serde(default)]
    #[serde(skip_serializing)]
    pub confirm: String,
}

impl RegisterForm {
    pub fn new(name: &str, email: &str, password: &str, confirm: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            confirm: confirm.to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::default();

        check_length(&mut errors, "name", &self.name, 6, 25);

        let email = check_length(&mut errors, "email", &self.email, 6, 40);
        if !email.is_empty() && !email_pattern().is_match(email) {
            errors.add("email", INVALID_EMAIL);
        }

        // Passwords are compared untrimmed
        if self.password.is_empty() {
            errors.add("password", REQUIRED);
        } else {
            let len = self.password.chars().count();
            if !(6..=40).contains(&len) {
                errors.add("password", length_message(6, 40));
            }
        }

        if self.confirm.is_empty() {
            errors.add("confirm", REQUIRED);
        } else if self.confirm != self.password {
            errors.add("confirm", PASSWORDS_MUST_MATCH);
        }

        errors.into_result(())
    }
}

/// Login form fields
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LoginForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    #[serde(skip_serializing)]
    pub password: String,
}

impl LoginForm {
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.password.is_empty()
    }
}

/// Task form fields as submitted
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub due_date: String,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub posted_date: String,
    #[serde(default)]
    pub status: String,
}

/// A task form that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidTask {
    pub name: String,
    pub due_date: NaiveDate,
    pub priority: i64,
    pub posted_date: NaiveDate,
    pub status: TaskStatus,
}

impl TaskForm {
    /// Field names in display order
    pub const FIELDS: [&'static str; 5] = ["name", "due_date", "priority", "posted_date", "status"];

    pub fn label(field: &str) -> &str {
        match field {
            "name" => "Task Name",
            "due_date" => "Date Due (mm/dd/yyyy)",
            "priority" => "Priority",
            "posted_date" => "Posted Date (mm/dd/yyyy)",
            "status" => "Status",
            other => other,
        }
    }

    /// Validate and convert. `today` fills in a missing posted date.
    pub fn validate(&self, today: NaiveDate) -> Result<ValidTask, FormErrors> {
        let mut errors = FormErrors::default();

        let name = self.name.trim();
        if name.is_empty() {
            errors.add("name", REQUIRED);
        }

        let due_date = match self.due_date.trim() {
            "" => {
                errors.add("due_date", REQUIRED);
                None
            }
            raw => NaiveDate::parse_from_str(raw, DATE_FORMAT)
                .map_err(|_| errors.add("due_date", INVALID_DATE))
                .ok(),
        };

        let priority = match self.priority.trim() {
            "" => {
                errors.add("priority", REQUIRED);
                None
            }
            raw => match raw.parse::<i64>() {
                Ok(p) if (1..=10).contains(&p) => Some(p),
                _ => {
                    errors.add("priority", INVALID_CHOICE);
                    None
                }
            },
        };

        let posted_date = match self.posted_date.trim() {
            "" => Some(today),
            raw => NaiveDate::parse_from_str(raw, DATE_FORMAT)
                .map_err(|_| errors.add("posted_date", INVALID_DATE))
                .ok(),
        };

        let status = match self.status.trim() {
            "" => Some(TaskStatus::Open),
            raw => {
                let status = raw.parse::<i64>().ok().and_then(TaskStatus::from_code);
                if status.is_none() {
                    errors.add("status", INVALID_CHOICE);
                }
                status
            }
        };

        match (due_date, priority, posted_date, status) {
            (Some(due_date), Some(priority), Some(posted_date), Some(status))
                if errors.is_empty() =>
            {
                Ok(ValidTask {
                    name: name.to_string(),
                    due_date,
                    priority,
                    posted_date,
                    status,
                })
            }
            _ => Err(errors),
        }
    }
}

/// One "Error in the <label> field - <message>" line per error, in field order
pub fn task_error_messages(errors: &FormErrors) -> Vec<String> {
    TaskForm::FIELDS
        .iter()
        .flat_map(|field| {
            errors
                .field(field)
                .iter()
                .map(move |message| {
                    format!("Error in the {} field - {}", TaskForm::label(field), message)
                })
        })
        .collect()
}
