//! In-memory implementations of `RecordSource` and `Notifier`.
//!
//! Note: this is compiled even in the "production" version of this app so that we can run the whole
//! app, top-to-bottom, without Salesforce or Slack.

use crate::api::{Notifier, RecordSource, CONTACTS_QUERY, DONATIONS_QUERY};
use crate::model::{QueryResponse, Record};
use crate::{ApiMessage, RefusedRequest, Result};
use anyhow::{anyhow, Context};
use serde_json::Value;
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Arc, Mutex};
use tracing::info;

/// A `RecordSource` that answers queries from memory. The map key is the exact query text. By
/// default it is seeded with sample donations and contacts for both of the donor queries.
#[derive(Debug, Clone)]
pub struct TestRecordSource {
    data: HashMap<String, Vec<Record>>,
    refusal: Option<Vec<ApiMessage>>,
}

impl TestRecordSource {
    pub fn new(data: HashMap<String, Vec<Record>>) -> Self {
        Self {
            data,
            refusal: None,
        }
    }

    /// A source that refuses every query with `errors`, the way Salesforce does once the password
    /// has expired.
    pub fn refusing(errors: Vec<ApiMessage>) -> Self {
        Self {
            data: HashMap::new(),
            refusal: Some(errors),
        }
    }
}

#[async_trait::async_trait]
impl RecordSource for TestRecordSource {
    async fn query(&mut self, soql: &str) -> Result<QueryResponse> {
        if let Some(errors) = &self.refusal {
            return Err(RefusedRequest::new("test://query", 403, errors.clone()).into());
        }
        self.data
            .get(soql)
            .with_context(|| format!("No test data for query '{}'", soql.trim()))
            .map(|records| QueryResponse::new(records.clone()))
    }
}

impl Default for TestRecordSource {
    /// Loads seed data from this module.
    fn default() -> Self {
        Self::new(default_data())
    }
}

/// A message sent through a `TestNotifier`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Post {
    pub channel: String,
    pub text: String,
}

impl Post {
    pub fn new(channel: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            text: text.into(),
        }
    }
}

/// A `Notifier` that logs each message and remembers it. Clones share the same list of posts, so
/// a test can keep a clone to inspect what was sent.
#[derive(Debug, Clone, Default)]
pub struct TestNotifier {
    posts: Arc<Mutex<Vec<Post>>>,
}

impl TestNotifier {
    /// Everything posted so far, oldest first.
    pub fn posts(&self) -> Vec<Post> {
        self.posts
            .lock()
            .map(|posts| posts.clone())
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl Notifier for TestNotifier {
    async fn post(&mut self, channel: &str, text: &str) -> Result<()> {
        info!("#{channel}: {text}");
        self.posts
            .lock()
            .map_err(|_| anyhow!("The test notifier lock is poisoned"))?
            .push(Post::new(channel, text));
        Ok(())
    }
}

/// Provides the seed data from this module.
fn default_data() -> HashMap<String, Vec<Record>> {
    let mut map = HashMap::new();
    map.insert(
        DONATIONS_QUERY.to_string(),
        load_csv(OPPORTUNITY_DATA).unwrap_or_default(),
    );
    map.insert(
        CONTACTS_QUERY.to_string(),
        load_csv(CONTACT_DATA).unwrap_or_default(),
    );
    map
}

/// Loads records from a CSV-formatted string. The header row supplies the field names and every
/// value is a string, which is also how a CSV export from Salesforce would look.
fn load_csv(csv_data: &str) -> Result<Vec<Record>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(Cursor::new(csv_data.as_bytes()));
    let headers = rdr.headers()?.clone();

    let mut records = Vec::new();
    for result in rdr.records() {
        let row = result?;
        let record: Record = headers
            .iter()
            .zip(row.iter())
            .map(|(header, field)| (header.to_string(), Value::String(field.to_string())))
            .collect();
        records.push(record);
    }
    Ok(records)
}

/// Seed opportunity data. Account 001E has no contacts and the last donation is pledged far in
/// the future, so both are dropped by the join.
const OPPORTUNITY_DATA: &str = r##"Amount,CloseDate,AccountId
500,2019-03-14,001A
250.75,2019-11-02,001B
1000,2021-06-30,001A
45,2021-12-24,001C
2600,2022-01-15,001D
75,2022-04-01,001B
30,2022-09-09,001E
5000,2999-01-01,001A
"##;

/// Seed contact data. Account 001F has not given anything.
const CONTACT_DATA: &str = r##"AccountId,Name
001A,John Doe
001A,Jane Doe
001B,Ada Lovelace
001C,Grace Hopper
001D,Ann Poe
001D,Bo Li
001D,Cy Zed
001F,Nobody Gave
"##;
