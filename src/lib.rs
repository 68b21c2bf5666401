//! giving-levels: downloads donations and contacts from Salesforce, sorts donors into giving
//! levels and writes one CSV report per year plus an all-time report.

pub mod api;
pub mod args;
pub mod commands;
mod config;
mod error;
pub mod merge;
pub mod model;
pub mod report;
pub mod shape;
mod utils;

#[cfg(test)]
mod test;

pub use api::Mode;
pub use config::{Config, SalesforceCredentials};
pub use error::{ApiMessage, Error, RefusedRequest, Result};
