//! `launchpad join` — submit an email to the waitlist of a running instance.
//!
//! Applies the same rules as the page form and goes through the
//! instance's `/api/proxy` route, like the browser does.

use std::time::Duration;

use crate::cli::JoinArgs;
use crate::client::ProxyClient;
use crate::config::model::DEFAULT_TIMEOUT_MS;
use crate::error::LaunchpadError;
use crate::form::{self, FormOutcome, Submission};
use crate::server::build_http_client;

/// Must exceed the proxy's backend timeout.
const JOIN_TIMEOUT: Duration = Duration::from_millis(DEFAULT_TIMEOUT_MS + 5_000);

pub async fn execute(args: JoinArgs) -> Result<(), LaunchpadError> {
    let client = ProxyClient::new(build_http_client(), &args.url, JOIN_TIMEOUT);
    let submission = Submission {
        email: args.email,
        consent: args.consent,
    };

    match form::submit(&client, &submission).await {
        FormOutcome::Success => {
            println!(
                "\u{2713} {} is on the list! We'll notify you as soon as we launch.",
                submission.email.trim()
            );
            Ok(())
        }
        FormOutcome::Invalid(message) | FormOutcome::Failed(message) => {
            Err(LaunchpadError::Waitlist(message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_waits_longer_than_the_proxy() {
        assert!(JOIN_TIMEOUT > Duration::from_millis(DEFAULT_TIMEOUT_MS));
        assert_eq!(JOIN_TIMEOUT, Duration::from_secs(35));
    }
}
