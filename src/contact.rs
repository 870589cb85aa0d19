//! Contact form validation and simulated submission.

use chrono::{DateTime, Utc};
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::info;

/// Fields of the contact form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Per-field validation messages, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactErrors(BTreeMap<&'static str, &'static str>);

impl ContactErrors {
    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.0.get(field).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }
}

impl fmt::Display for ContactErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.values().copied().collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ContactErrors {}

/// Acknowledgement of an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactReceipt {
    pub name: String,
    pub email: String,
    pub received_at: DateTime<Utc>,
}

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"))
}

impl ContactForm {
    pub fn validate(&self) -> Result<(), ContactErrors> {
        let mut errors = BTreeMap::new();

        if self.name.trim().is_empty() {
            errors.insert("name", "Name is required");
        }

        if self.email.trim().is_empty() {
            errors.insert("email", "Email is required");
        } else if !email_pattern().is_match(&self.email) {
            errors.insert("email", "Please enter a valid email address");
        }

        if self.message.trim().is_empty() {
            errors.insert("message", "Message is required");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ContactErrors(errors))
        }
    }
}

/// Validate the form and, if valid, wait out the simulated send.
///
/// Invalid forms return immediately without starting the timer.
pub async fn submit(form: &ContactForm, delay: Duration) -> Result<ContactReceipt, ContactErrors> {
    form.validate()?;

    info!("Submitting contact form for {}", form.email);
    tokio::time::sleep(delay).await;

    Ok(ContactReceipt {
        name: form.name.trim().to_string(),
        email: form.email.trim().to_string(),
        received_at: Utc::now(),
    })
}
