//! Runs the two donor queries against a `RecordSource`, telling the notification channel when
//! the CRM refuses a request.

use crate::api::{Notifier, RecordSource};
use crate::model::{QueryResponse, Record};
use crate::{RefusedRequest, Result};
use tracing::{debug, warn};

/// Donations from households and foundations that are closed, invoiced or pledged. The
/// Opportunity and Contact tables are not related in Salesforce, so contacts are fetched
/// separately and joined by account.
pub const DONATIONS_QUERY: &str = "
    SELECT Amount, CloseDate, AccountId
    FROM Opportunity
    WHERE AccountId IN (
        SELECT Id
        FROM Account
        WHERE Type IN ('Household', 'Foundation')
    )
    AND StageName IN ('Closed Won', 'Invoiced', 'Pledged')
    AND Amount != NULL
    AND npsp__Primary_Contact__c != NULL
    AND Amount > 0";

pub const CONTACTS_QUERY: &str = "
    SELECT AccountId, Name
    FROM Contact";

/// The raw rows of both queries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrmData {
    pub opportunities: Vec<Record>,
    pub contacts: Vec<Record>,
}

/// Wraps a `RecordSource` and a `Notifier`.
pub struct Crm {
    source: Box<dyn RecordSource + Send>,
    notifier: Box<dyn Notifier + Send>,
    channel: String,
}

impl Crm {
    /// Creates a `Crm` that queries `source` and reports refused requests to `channel` through
    /// `notifier`.
    pub fn new(
        source: Box<dyn RecordSource + Send>,
        notifier: Box<dyn Notifier + Send>,
        channel: impl Into<String>,
    ) -> Self {
        Self {
            source,
            notifier,
            channel: channel.into(),
        }
    }

    /// Runs `soql`. If the request is refused, every message in the refusal is posted to the
    /// channel and then the original error is returned. Any other error is returned as-is.
    pub async fn query(&mut self, soql: &str) -> Result<QueryResponse> {
        let error = match self.source.query(soql).await {
            Ok(response) => return Ok(response),
            Err(e) => e,
        };
        if let Some(refused) = error.downcast_ref::<RefusedRequest>() {
            for entry in refused.errors() {
                let text = format!("ERROR: {}. @channel", entry.message);
                if let Err(e) = self.notifier.post(&self.channel, &text).await {
                    warn!("Unable to post to {}: {e:#}", self.channel);
                }
            }
        }
        Err(error)
    }

    /// Fetches the opportunities, then the contacts.
    pub async fn get_data(&mut self) -> Result<CrmData> {
        let opportunities = self.query(DONATIONS_QUERY).await?.records;
        debug!("Fetched {} opportunities", opportunities.len());
        let contacts = self.query(CONTACTS_QUERY).await?.records;
        debug!("Fetched {} contacts", contacts.len());
        Ok(CrmData {
            opportunities,
            contacts,
        })
    }
}
