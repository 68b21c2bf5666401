//! The two outside services a run talks to, each behind a small trait: a `RecordSource` that
//! answers SOQL queries (Salesforce) and a `Notifier` that posts text to a channel (Slack).
//!
//! `Mode::Test` swaps both for in-memory stand-ins so the whole program can run top-to-bottom
//! without network access.

mod crm;
mod salesforce;
mod slack;
mod test_client;

use crate::model::QueryResponse;
use crate::{Config, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use crm::{Crm, CrmData, CONTACTS_QUERY, DONATIONS_QUERY};
pub use test_client::{Post, TestNotifier, TestRecordSource};

/// The environment variable that, when set to a non-empty value, selects `Mode::Test`.
pub const TEST_MODE_VAR: &str = "GIVING_LEVELS_IN_TEST_MODE";

/// Something that can run a SOQL query and return every matching row.
#[async_trait::async_trait]
pub trait RecordSource {
    /// Runs `soql` and returns all of its rows, following pagination if there is any.
    ///
    /// # Errors
    /// A request refused by the service (e.g. because the password expired) must be returned as a
    /// `RefusedRequest`, so that the caller can recognize it.
    async fn query(&mut self, soql: &str) -> Result<QueryResponse>;
}

/// Something that can post a text message to a channel.
#[async_trait::async_trait]
pub trait Notifier {
    async fn post(&mut self, channel: &str, text: &str) -> Result<()>;
}

/// Whether to talk to the real services or to the in-memory ones.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Salesforce,
    Test,
}

serde_plain::derive_display_from_serialize!(Mode);
serde_plain::derive_fromstr_from_deserialize!(Mode);

impl Mode {
    /// `Mode::Test` if `GIVING_LEVELS_IN_TEST_MODE` is set and non-empty, otherwise
    /// `Mode::Salesforce`.
    pub fn from_env() -> Self {
        match std::env::var(TEST_MODE_VAR) {
            Ok(value) if !value.is_empty() => Mode::Test,
            _ => Mode::Salesforce,
        }
    }
}

/// Creates the `RecordSource` for `mode`. For `Mode::Salesforce` this logs in, so it fails early
/// when the credentials are missing or wrong.
pub async fn record_source(config: &Config, mode: Mode) -> Result<Box<dyn RecordSource + Send>> {
    Ok(match mode {
        Mode::Salesforce => Box::new(salesforce::Salesforce::login(config).await?),
        Mode::Test => Box::new(TestRecordSource::default()),
    })
}

/// Creates the `Notifier` for `mode`. The Slack token is optional; it is only used when a
/// request is refused.
pub fn notifier(config: &Config, mode: Mode) -> Box<dyn Notifier + Send> {
    match mode {
        Mode::Salesforce => {
            let token = config.slack_token();
            if token.is_none() {
                debug!("No Slack access token, refused requests will only be logged");
            }
            Box::new(slack::Slack::new(token))
        }
        Mode::Test => Box::new(TestNotifier::default()),
    }
}

/// Creates a `Crm` for `mode`, with notifications going to the configured channel.
pub async fn crm(config: &Config, mode: Mode) -> Result<Crm> {
    let notifier = notifier(config, mode);
    let source = record_source(config, mode).await?;
    Ok(Crm::new(source, notifier, config.slack_channel()))
}
