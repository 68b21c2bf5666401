//! Turns raw CRM rows into typed `Donation` and `Contact` values.

use crate::model::{Amount, Contact, Donation, Record};
use crate::Result;
use anyhow::Context;
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, trace};

const CLOSE_DATE_FORMAT: &str = "%Y-%m-%d";

/// The fields of an `Opportunity` row that a `Donation` is built from.
#[derive(Debug, Deserialize)]
struct OpportunityRow {
    #[serde(rename = "Amount")]
    amount: Value,
    #[serde(rename = "CloseDate")]
    close_date: Option<String>,
    #[serde(rename = "AccountId")]
    account_id: String,
}

/// The fields of a `Contact` row. Private contacts have no account.
#[derive(Debug, Deserialize)]
struct ContactRow {
    #[serde(rename = "AccountId")]
    account_id: Option<String>,
    #[serde(rename = "Name")]
    name: Option<String>,
}

/// Converts opportunity rows to donations: the amount becomes whole dollars (truncated) and the
/// close date is reduced to its year.
///
/// # Errors
/// Fails on the first row whose amount is not numeric, whose close date is missing or is not a
/// `YYYY-MM-DD` date, or that lacks one of the expected fields.
pub fn shape_donations(records: &[Record]) -> Result<Vec<Donation>> {
    records
        .iter()
        .enumerate()
        .map(|(ix, record)| shape_donation(ix, record))
        .collect()
}

fn shape_donation(ix: usize, record: &Record) -> Result<Donation> {
    let row: OpportunityRow = serde_json::from_value(Value::Object(record.clone()))
        .with_context(|| format!("Unable to read opportunity at row {ix}"))?;

    let amount = Amount::coerce(&row.amount).with_context(|| {
        format!(
            "Cannot convert amount {} of opportunity at row {ix} to an integer",
            row.amount
        )
    })?;

    let close_date = row
        .close_date
        .with_context(|| format!("Opportunity at row {ix} has no close date"))?;
    let date = NaiveDate::parse_from_str(&close_date, CLOSE_DATE_FORMAT).with_context(|| {
        format!("Unable to parse close date '{close_date}' of opportunity at row {ix}")
    })?;

    Ok(Donation::new(
        Amount::new(amount),
        date.year(),
        row.account_id,
    ))
}

/// Projects contact rows to (account, name) pairs. Rows with a null or missing account or name
/// cannot belong to a donor and are skipped.
pub fn shape_contacts(records: &[Record]) -> Result<Vec<Contact>> {
    let mut contacts = Vec::with_capacity(records.len());
    for (ix, record) in records.iter().enumerate() {
        let row: ContactRow = serde_json::from_value(Value::Object(record.clone()))
            .with_context(|| format!("Unable to read contact at row {ix}"))?;
        match (row.account_id, row.name) {
            (Some(account_id), Some(name)) => contacts.push(Contact::new(account_id, name)),
            _ => trace!("Skipping contact at row {ix}, it has no account or no name"),
        }
    }
    let skipped = records.len() - contacts.len();
    if skipped > 0 {
        debug!("Skipped {skipped} contacts without an account or a name");
    }
    Ok(contacts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("test records must be objects"),
        }
    }

    #[test]
    fn test_shape_donations() {
        let records = vec![
            record(json!({"Amount": "1", "CloseDate": "2016-10-31", "AccountId": "1"})),
            record(json!({"Amount": 2, "CloseDate": "2015-12-25", "AccountId": "2"})),
        ];
        let donations = shape_donations(&records).unwrap();
        assert_eq!(
            donations,
            vec![
                Donation::new(Amount::from_dollars(1), 2016, "1"),
                Donation::new(Amount::from_dollars(2), 2015, "2"),
            ]
        );
    }

    #[test]
    fn test_shape_donations_truncates() {
        let records = vec![
            record(json!({"Amount": 99.99, "CloseDate": "2017-01-01", "AccountId": "1"})),
            record(json!({"Amount": "49.5", "CloseDate": "2017-06-30", "AccountId": "1"})),
        ];
        let donations = shape_donations(&records).unwrap();
        assert_eq!(donations[0].amount(), Amount::from_dollars(99));
        assert_eq!(donations[1].amount(), Amount::from_dollars(49));
    }

    #[test]
    fn test_shape_donations_ignores_other_fields() {
        let records = vec![record(json!({
            "attributes": {"type": "Opportunity", "url": "/services/data/v59.0/sobjects/Opportunity/006"},
            "Amount": 100.0,
            "CloseDate": "2014-03-01",
            "AccountId": "0013t00001abcDE",
            "X": "Y"
        }))];
        let donations = shape_donations(&records).unwrap();
        assert_eq!(
            donations,
            vec![Donation::new(Amount::from_dollars(100), 2014, "0013t00001abcDE")]
        );
        let json = serde_json::to_value(&donations[0]).unwrap();
        assert!(json.get("close_date").is_none());
    }

    #[test]
    fn test_shape_donations_non_numeric_amount() {
        let records = vec![
            record(json!({"Amount": "10", "CloseDate": "2016-01-01", "AccountId": "1"})),
            record(json!({"Amount": "ten", "CloseDate": "2016-01-01", "AccountId": "1"})),
        ];
        let err = shape_donations(&records).unwrap_err();
        assert!(err.to_string().contains("row 1"), "{err}");
    }

    #[test]
    fn test_shape_donations_null_amount() {
        let records = vec![record(
            json!({"Amount": null, "CloseDate": "2016-01-01", "AccountId": "1"}),
        )];
        assert!(shape_donations(&records).is_err());
    }

    #[test]
    fn test_shape_donations_bad_date() {
        let records = vec![record(
            json!({"Amount": 10, "CloseDate": "10/31/2016", "AccountId": "1"}),
        )];
        assert!(shape_donations(&records).is_err());

        let records = vec![record(
            json!({"Amount": 10, "CloseDate": null, "AccountId": "1"}),
        )];
        assert!(shape_donations(&records).is_err());
    }

    #[test]
    fn test_shape_contacts() {
        let records = vec![
            record(json!({"Name": "John", "AccountId": "1", "X": "Y"})),
            record(json!({"Name": "Jane", "AccountId": "2", "X": "Z"})),
        ];
        let contacts = shape_contacts(&records).unwrap();
        assert_eq!(
            contacts,
            vec![Contact::new("1", "John"), Contact::new("2", "Jane")]
        );
    }

    #[test]
    fn test_shape_contacts_skips_private_contacts() {
        let records = vec![
            record(json!({"AccountId": "1", "Name": "John Doe"})),
            record(json!({"AccountId": null, "Name": "Private Contact"})),
            record(json!({"Name": "No Account Field"})),
            record(json!({"AccountId": "2", "Name": null})),
            record(json!({"AccountId": "2", "Name": "Jane Doe"})),
        ];
        let contacts = shape_contacts(&records).unwrap();
        assert_eq!(
            contacts,
            vec![Contact::new("1", "John Doe"), Contact::new("2", "Jane Doe")]
        );
    }

    #[test]
    fn test_shape_contacts_wrong_type() {
        let records = vec![record(json!({"AccountId": 7, "Name": "John"}))];
        assert!(shape_contacts(&records).is_err());
    }
}
