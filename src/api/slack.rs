//! Implements the `Notifier` trait with the Slack Web API.

use crate::api::Notifier;
use crate::config::SLACK_ACCESS_TOKEN;
use crate::Result;
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use tracing::debug;

const POST_MESSAGE_URL: &str = "https://slack.com/api/chat.postMessage";

/// Posts with a bot token. Without a token every post fails, which `Crm` logs and moves past.
pub(super) struct Slack {
    client: reqwest::Client,
    token: Option<String>,
}

impl Slack {
    pub(super) fn new(token: Option<&str>) -> Self {
        Self {
            client: reqwest::Client::new(),
            token: token.map(str::to_string),
        }
    }
}

#[derive(Debug, Serialize)]
struct PostMessage<'a> {
    channel: &'a str,
    text: &'a str,
    /// Lets `@channel` in the text notify everyone in the channel.
    link_names: bool,
}

/// Slack answers HTTP 200 even when the call failed; `ok` says whether it worked.
#[derive(Debug, Deserialize)]
struct SlackResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

impl SlackResponse {
    fn check(self) -> Result<()> {
        if self.ok {
            return Ok(());
        }
        bail!(
            "Slack refused the message: {}",
            self.error.as_deref().unwrap_or("unknown error")
        )
    }
}

#[async_trait::async_trait]
impl Notifier for Slack {
    async fn post(&mut self, channel: &str, text: &str) -> Result<()> {
        let token = match &self.token {
            Some(token) => token,
            None => bail!("Unable to post to Slack, please set {SLACK_ACCESS_TOKEN}"),
        };
        debug!("Posting to Slack channel {channel}");
        let response = self
            .client
            .post(POST_MESSAGE_URL)
            .bearer_auth(token)
            .json(&PostMessage {
                channel,
                text,
                link_names: true,
            })
            .send()
            .await
            .context("Failed to send message to Slack")?;

        let status = response.status();
        if !status.is_success() {
            bail!("Slack returned status {status}");
        }
        response
            .json::<SlackResponse>()
            .await
            .context("Failed to parse the Slack response")?
            .check()
    }
}
