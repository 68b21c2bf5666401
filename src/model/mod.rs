//! Types that represent the data moving through the pipeline, from raw CRM `Record`s to
//! `TieredAggregate`s ready for a report.
mod aggregate;
mod amount;
mod donation;
mod record;
mod tier;

pub use aggregate::{Aggregate, Period, TieredAggregate};
pub use amount::Amount;
pub use donation::{Contact, Donation, Donor, JoinedDonation};
pub use record::{QueryResponse, Record};
pub use tier::Tier;
