//! Waitlist form submission rules.
//!
//! [`submit`] applies the local checks (consent checkbox, required
//! email), performs the single [`WaitlistApi`] call, and maps the result
//! to the message the page shows.

use serde::Deserialize;

use crate::client::WaitlistApi;
use crate::error::ClientError;

pub const CONSENT_REQUIRED: &str =
    "Please consent to our data storage policy to join the waitlist.";
pub const EMAIL_REQUIRED: &str = "Please enter your email address.";
pub const ALREADY_ON_WAITLIST: &str = "This email is already on the waitlist!";
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Submission {
    #[serde(default)]
    pub email: String,
    /// Checkbox value; browsers send `on` when checked and omit it otherwise.
    #[serde(default, deserialize_with = "checkbox")]
    pub consent: bool,
}

fn checkbox<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.is_some_and(|v| !v.is_empty() && v != "off" && v != "false"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    Success,
    /// Blocked locally; no request was made.
    Invalid(String),
    /// The waitlist call failed.
    Failed(String),
}

impl FormOutcome {
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success => None,
            Self::Invalid(msg) | Self::Failed(msg) => Some(msg),
        }
    }
}

/// Map a client error to what the user should read.
#[must_use]
pub fn user_message(err: &ClientError) -> String {
    match err {
        ClientError::Rejected { message, .. } => {
            if message.to_lowercase().contains("already registered") {
                ALREADY_ON_WAITLIST.to_string()
            } else {
                message.clone()
            }
        }
        ClientError::Transport { .. } => GENERIC_FAILURE.to_string(),
    }
}

pub async fn submit<A: WaitlistApi + ?Sized>(api: &A, submission: &Submission) -> FormOutcome {
    if !submission.consent {
        return FormOutcome::Invalid(CONSENT_REQUIRED.to_string());
    }
    let email = submission.email.trim();
    if email.is_empty() {
        return FormOutcome::Invalid(EMAIL_REQUIRED.to_string());
    }

    match api.join_waitlist(email).await {
        Ok(()) => FormOutcome::Success,
        Err(e) => FormOutcome::Failed(user_message(&e)),
    }
}
