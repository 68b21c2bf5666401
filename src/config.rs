//! Configuration for a run.
//!
//! Credentials and the notification channel come from environment variables. The project
//! directory, whose `data` subdirectory receives the reports, comes from the command line.

use crate::{utils, Result};
use anyhow::bail;
use std::fmt::{Debug, Formatter};
use std::path::{Path, PathBuf};

pub const SALESFORCE_USERNAME: &str = "OK_WATCH_SALESFORCE_USERNAME";
pub const SALESFORCE_PASSWORD: &str = "OK_WATCH_SALESFORCE_PASSWORD";
pub const SALESFORCE_SECURITY_TOKEN: &str = "OK_WATCH_SALESFORCE_SECURITY_TOKEN";
pub const SALESFORCE_DOMAIN: &str = "OK_WATCH_SALESFORCE_DOMAIN";
pub const SLACK_ACCESS_TOKEN: &str = "SLACK_THOMASTHOREN_ACCESS_TOKEN";
pub const SLACK_CHANNEL: &str = "OK_WATCH_SLACK_CHANNEL";

const DEFAULT_SLACK_CHANNEL: &str = "ok_watch_salesforce";
const DEFAULT_SALESFORCE_DOMAIN: &str = "login";

/// The `Config` object holds everything a run needs to know that is not data: where to write
/// reports, how to log in to Salesforce and where to send notifications. Credentials are
/// optional here because a run in test mode does not need them; asking for a missing one is an
/// error.
#[derive(Debug, Clone)]
pub struct Config {
    project_dir: PathBuf,
    salesforce: Option<SalesforceCredentials>,
    salesforce_domain: String,
    slack_token: Option<Secret>,
    slack_channel: String,
}

impl Config {
    /// Canonicalizes `project_dir`, which must exist, and reads the rest of the configuration from
    /// environment variables.
    pub async fn load(project_dir: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = project_dir.into();
        let project_dir = utils::canonicalize(&maybe_relative).await?;
        Ok(Self::from_lookup(project_dir, env_var))
    }

    /// Builds a `Config` using `lookup` to resolve variable names. Empty values count as unset.
    pub fn from_lookup<F>(project_dir: impl Into<PathBuf>, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.is_empty());
        let salesforce = match (
            get(SALESFORCE_USERNAME),
            get(SALESFORCE_PASSWORD),
            get(SALESFORCE_SECURITY_TOKEN),
        ) {
            (Some(username), Some(password), Some(security_token)) => {
                Some(SalesforceCredentials {
                    username,
                    password: Secret(password),
                    security_token: Secret(security_token),
                })
            }
            _ => None,
        };
        Self {
            project_dir: project_dir.into(),
            salesforce,
            salesforce_domain: get(SALESFORCE_DOMAIN)
                .unwrap_or_else(|| DEFAULT_SALESFORCE_DOMAIN.to_string()),
            slack_token: get(SLACK_ACCESS_TOKEN).map(Secret),
            slack_channel: get(SLACK_CHANNEL).unwrap_or_else(|| DEFAULT_SLACK_CHANNEL.to_string()),
        }
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// The Salesforce login credentials.
    ///
    /// # Errors
    /// - Returns an error naming the variables if any of them was not set.
    pub fn salesforce(&self) -> Result<&SalesforceCredentials> {
        match &self.salesforce {
            Some(credentials) => Ok(credentials),
            None => bail!(
                "Salesforce credentials are missing, please set {SALESFORCE_USERNAME}, \
                {SALESFORCE_PASSWORD} and {SALESFORCE_SECURITY_TOKEN}"
            ),
        }
    }

    /// The subdomain of `salesforce.com` to log in at: `login` for production, `test` for a
    /// sandbox.
    pub fn salesforce_domain(&self) -> &str {
        &self.salesforce_domain
    }

    /// The Slack bot token, if one was set. A run can go without it.
    pub fn slack_token(&self) -> Option<&str> {
        self.slack_token.as_ref().map(Secret::expose)
    }

    pub fn slack_channel(&self) -> &str {
        &self.slack_channel
    }
}

/// Username, password and security token for the Salesforce SOAP login.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SalesforceCredentials {
    username: String,
    password: Secret,
    security_token: Secret,
}

impl SalesforceCredentials {
    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        self.password.expose()
    }

    pub fn security_token(&self) -> &str {
        self.security_token.expose()
    }
}

/// A string that is kept out of `Debug` output, and therefore out of the logs.
#[derive(Clone, Eq, PartialEq)]
struct Secret(String);

impl Secret {
    fn expose(&self) -> &str {
        &self.0
    }
}

impl Debug for Secret {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("<redacted>")
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    fn full() -> Vec<(&'static str, &'static str)> {
        vec![
            (SALESFORCE_USERNAME, "someone@example.com"),
            (SALESFORCE_PASSWORD, "hunter2"),
            (SALESFORCE_SECURITY_TOKEN, "t0k3n"),
            (SLACK_ACCESS_TOKEN, "xoxb-123"),
        ]
    }

    #[test]
    fn test_from_lookup() {
        let config = Config::from_lookup("/tmp/project", lookup(&full()));
        let credentials = config.salesforce().unwrap();
        assert_eq!(credentials.username(), "someone@example.com");
        assert_eq!(credentials.password(), "hunter2");
        assert_eq!(credentials.security_token(), "t0k3n");
        assert_eq!(config.slack_token(), Some("xoxb-123"));
        assert_eq!(config.project_dir(), Path::new("/tmp/project"));
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup("/tmp/project", lookup(&full()));
        assert_eq!(config.slack_channel(), "ok_watch_salesforce");
        assert_eq!(config.salesforce_domain(), "login");
    }

    #[test]
    fn test_overrides() {
        let mut vars = full();
        vars.push((SLACK_CHANNEL, "donors"));
        vars.push((SALESFORCE_DOMAIN, "test"));
        let config = Config::from_lookup("/tmp/project", lookup(&vars));
        assert_eq!(config.slack_channel(), "donors");
        assert_eq!(config.salesforce_domain(), "test");
    }

    #[test]
    fn test_missing_credentials() {
        let vars = [
            (SALESFORCE_USERNAME, "someone@example.com"),
            (SALESFORCE_PASSWORD, ""),
            (SALESFORCE_SECURITY_TOKEN, "t0k3n"),
        ];
        let config = Config::from_lookup("/tmp/project", lookup(&vars));
        let err = config.salesforce().unwrap_err();
        assert!(err.to_string().contains(SALESFORCE_PASSWORD));
        assert!(config.slack_token().is_none());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = Config::from_lookup("/tmp/project", lookup(&full()));
        let debug = format!("{config:?}");
        assert!(debug.contains("someone@example.com"));
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("t0k3n"));
        assert!(!debug.contains("xoxb-123"));
    }

    #[tokio::test]
    async fn test_load_canonicalizes() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("project");
        utils::make_dir(&nested).await.unwrap();
        let config = Config::load(nested.join("..").join("project")).await.unwrap();
        assert_eq!(
            config.project_dir(),
            utils::canonicalize(&nested).await.unwrap()
        );
    }

    #[tokio::test]
    async fn test_load_missing_dir() {
        let dir = TempDir::new().unwrap();
        assert!(Config::load(dir.path().join("nope")).await.is_err());
    }
}
