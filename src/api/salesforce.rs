//! Implements the `RecordSource` trait against the Salesforce REST API.
//!
//! Login uses the SOAP `login` call with username, password and security token, which returns a
//! session id and the URL of the org's instance. Queries then go to the REST `query` endpoint
//! with the session id as a bearer token.

use crate::api::RecordSource;
use crate::model::QueryResponse;
use crate::{ApiMessage, Config, RefusedRequest, Result};
use anyhow::{bail, Context};
use reqwest::StatusCode;
use tracing::{debug, trace};
use url::Url;

const API_VERSION: &str = "59.0";

/// A logged-in Salesforce session.
pub(super) struct Salesforce {
    client: reqwest::Client,
    session_id: String,
    instance_url: Url,
}

impl Salesforce {
    /// Logs in with the credentials in `config`.
    pub(super) async fn login(config: &Config) -> Result<Self> {
        let credentials = config.salesforce()?;
        let client = reqwest::Client::new();
        let url = format!(
            "https://{}.salesforce.com/services/Soap/u/{API_VERSION}",
            config.salesforce_domain()
        );
        let body = login_envelope(
            credentials.username(),
            &format!(
                "{}{}",
                credentials.password(),
                credentials.security_token()
            ),
        );

        debug!("Logging in to Salesforce as {}", credentials.username());
        let response = client
            .post(&url)
            .header("Content-Type", "text/xml; charset=UTF-8")
            .header("SOAPAction", "login")
            .body(body)
            .send()
            .await
            .context("Failed to send login request to Salesforce")?;

        let status = response.status();
        let text = response
            .text()
            .await
            .context("Unable to read the Salesforce login response")?;
        if !status.is_success() {
            let fault = extract_tag(&text, "faultstring").unwrap_or(&text);
            bail!("Salesforce login failed with status {status}: {fault}");
        }

        let session = parse_login_response(&text)?;
        debug!("Logged in to Salesforce instance {}", session.1);
        Ok(Self {
            client,
            session_id: session.0,
            instance_url: session.1,
        })
    }

    /// GETs one batch of query results from `url`.
    async fn fetch(&self, url: Url) -> Result<QueryResponse> {
        trace!("GET {url}");
        let response = self
            .client
            .get(url.clone())
            .bearer_auth(&self.session_id)
            .send()
            .await
            .with_context(|| format!("Failed to send query request to {url}"))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json()
                .await
                .context("Failed to parse the Salesforce query response");
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read response body".to_string());
        if status == StatusCode::FORBIDDEN {
            return Err(RefusedRequest::new(url, status.as_u16(), parse_errors(&body)).into());
        }
        bail!("Salesforce query failed with status {status}: {body}")
    }
}

#[async_trait::async_trait]
impl RecordSource for Salesforce {
    async fn query(&mut self, soql: &str) -> Result<QueryResponse> {
        let mut url = self
            .instance_url
            .join(&format!("/services/data/v{API_VERSION}/query/"))
            .context("Unable to build the query URL")?;
        url.query_pairs_mut().append_pair("q", soql);

        let mut response = self.fetch(url).await?;
        while let Some(next) = next_batch(&response) {
            let url = self
                .instance_url
                .join(next)
                .with_context(|| format!("Invalid nextRecordsUrl '{next}'"))?;
            let batch = self.fetch(url).await?;
            response = append_batch(response, batch);
        }
        debug!(
            "Query returned {} of {} records",
            response.records.len(),
            response.total_size
        );
        Ok(response)
    }
}

/// The path of the batch that follows `response`, if there is one.
fn next_batch(response: &QueryResponse) -> Option<&str> {
    if response.done {
        return None;
    }
    response.next_records_url.as_deref()
}

/// Adds the records of `batch` to `response`, which then points where `batch` points.
fn append_batch(mut response: QueryResponse, batch: QueryResponse) -> QueryResponse {
    response.records.extend(batch.records);
    response.done = batch.done;
    response.next_records_url = batch.next_records_url;
    response
}

/// Builds the SOAP envelope for the partner API `login` call.
fn login_envelope(username: &str, password: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8" ?>
<env:Envelope
        xmlns:xsd="http://www.w3.org/2001/XMLSchema"
        xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
        xmlns:env="http://schemas.xmlsoap.org/soap/envelope/"
        xmlns:urn="urn:partner.soap.sforce.com">
    <env:Body>
        <n1:login xmlns:n1="urn:partner.soap.sforce.com">
            <n1:username>{}</n1:username>
            <n1:password>{}</n1:password>
        </n1:login>
    </env:Body>
</env:Envelope>"#,
        xml_escape(username),
        xml_escape(password)
    )
}

/// Pulls the session id and the instance URL (scheme and host of `serverUrl`) out of a
/// successful login response.
fn parse_login_response(xml: &str) -> Result<(String, Url)> {
    let session_id = extract_tag(xml, "sessionId")
        .context("The Salesforce login response has no sessionId")?
        .to_string();
    let server_url = extract_tag(xml, "serverUrl")
        .context("The Salesforce login response has no serverUrl")?;
    let server_url = Url::parse(server_url)
        .with_context(|| format!("Invalid serverUrl '{server_url}'"))?;
    let host = server_url
        .host_str()
        .with_context(|| format!("The serverUrl '{server_url}' has no host"))?;
    let instance_url = Url::parse(&format!("{}://{host}/", server_url.scheme()))
        .context("Unable to build the instance URL")?;
    Ok((session_id, instance_url))
}

/// Parses the error list in the body of a refused request. A body that is not the usual JSON
/// list becomes a single message.
fn parse_errors(body: &str) -> Vec<ApiMessage> {
    match serde_json::from_str::<Vec<ApiMessage>>(body) {
        Ok(errors) if !errors.is_empty() => errors,
        _ => vec![ApiMessage::new(body.trim())],
    }
}

/// Returns the text between the first `<tag>` and the following `</tag>`.
fn extract_tag<'a>(xml: &'a str, tag: &str) -> Option<&'a str> {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");
    let start = xml.find(&open)? + open.len();
    let end = start + xml[start..].find(&close)?;
    Some(&xml[start..end])
}

fn xml_escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
