//! Combines contacts into donors and matches donations with them.

use crate::model::{Contact, Donation, Donor, JoinedDonation};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Builds an AP style series, i.e. no serial comma, from a list of values.
///
/// ```
/// # use giving_levels::merge::build_series;
/// assert_eq!(build_series(&["X", "Y", "Z"]), "X, Y and Z");
/// assert_eq!(build_series(&["X", "Y"]), "X and Y");
/// assert_eq!(build_series(&["X"]), "X");
/// assert_eq!(build_series::<&str>(&[]), "");
/// ```
pub fn build_series<S: AsRef<str>>(names: &[S]) -> String {
    match names {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [all_but_final @ .., last] => {
            let all_but_final: Vec<&str> = all_but_final.iter().map(AsRef::as_ref).collect();
            format!("{} and {}", all_but_final.join(", "), last.as_ref())
        }
    }
}

/// Combines contacts sharing an account into a single `Donor` per account. Names are kept in
/// the order the contacts were given. Donors come back ordered by account.
pub fn merge_contacts(contacts: &[Contact]) -> Vec<Donor> {
    let mut by_account: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for contact in contacts {
        by_account
            .entry(contact.account_id())
            .or_default()
            .push(contact.name());
    }
    by_account
        .into_iter()
        .map(|(account_id, names)| Donor::new(account_id, build_series(&names)))
        .collect()
}

/// Matches each donation with its donor and drops donations pledged for years after
/// `current_year`. Donations whose account has no donor are dropped too.
pub fn join(donations: &[Donation], donors: &[Donor], current_year: i32) -> Vec<JoinedDonation> {
    let names: HashMap<&str, &str> = donors
        .iter()
        .map(|donor| (donor.account_id(), donor.name()))
        .collect();

    let matched: Vec<JoinedDonation> = donations
        .iter()
        .filter_map(|donation| {
            names.get(donation.account_id()).map(|name| {
                JoinedDonation::new(
                    donation.amount(),
                    donation.year(),
                    donation.account_id(),
                    *name,
                )
            })
        })
        .collect();
    let unmatched = donations.len() - matched.len();

    let joined: Vec<JoinedDonation> = matched
        .into_iter()
        .filter(|donation| donation.year() <= current_year)
        .collect();
    let future = donations.len() - unmatched - joined.len();

    debug!(
        "Joined {} donations, dropped {unmatched} without a donor and {future} pledged after {current_year}",
        joined.len()
    );
    joined
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Amount;

    #[test]
    fn test_build_series() {
        assert_eq!(build_series(&["Ann", "Bo", "Cy", "Di"]), "Ann, Bo, Cy and Di");
        assert_eq!(build_series(&["X", "Y", "Z"]), "X, Y and Z");
        assert_eq!(build_series(&["X", "Y"]), "X and Y");
        assert_eq!(build_series(&["X"]), "X");
        assert_eq!(build_series::<String>(&[]), "");
    }

    #[test]
    fn test_merge_contacts() {
        let contacts = vec![
            Contact::new("2", "Jane Doe"),
            Contact::new("1", "John Doe"),
            Contact::new("2", "Jim Doe"),
            Contact::new("3", "A"),
            Contact::new("3", "B"),
            Contact::new("3", "C"),
        ];
        assert_eq!(
            merge_contacts(&contacts),
            vec![
                Donor::new("1", "John Doe"),
                Donor::new("2", "Jane Doe and Jim Doe"),
                Donor::new("3", "A, B and C"),
            ]
        );
    }

    #[test]
    fn test_merge_contacts_empty() {
        assert!(merge_contacts(&[]).is_empty());
    }

    #[test]
    fn test_join() {
        let donations = vec![
            Donation::new(Amount::from_dollars(500), 2015, "1"),
            Donation::new(Amount::from_dollars(20), 2016, "9"),
            Donation::new(Amount::from_dollars(1000), 2016, "2"),
        ];
        let donors = vec![Donor::new("1", "John Doe"), Donor::new("2", "Jane Doe")];
        assert_eq!(
            join(&donations, &donors, 2020),
            vec![
                JoinedDonation::new(Amount::from_dollars(500), 2015, "1", "John Doe"),
                JoinedDonation::new(Amount::from_dollars(1000), 2016, "2", "Jane Doe"),
            ]
        );
    }

    #[test]
    fn test_join_drops_future_years() {
        let donations = vec![
            Donation::new(Amount::from_dollars(100), 2019, "1"),
            Donation::new(Amount::from_dollars(100), 2020, "1"),
            Donation::new(Amount::from_dollars(100), 2021, "1"),
            Donation::new(Amount::from_dollars(100), 2030, "1"),
        ];
        let donors = merge_contacts(&[Contact::new("1", "John Doe")]);
        let joined = join(&donations, &donors, 2020);
        let years: Vec<i32> = joined.iter().map(|d| d.year()).collect();
        assert_eq!(years, vec![2019, 2020]);
    }

    #[test]
    fn test_join_uses_merged_name() {
        let contacts = vec![Contact::new("1", "John Doe"), Contact::new("1", "Jane Doe")];
        let donors = merge_contacts(&contacts);
        let donations = vec![Donation::new(Amount::from_dollars(5), 2010, "1")];
        let joined = join(&donations, &donors, 2010);
        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0].name(), "John Doe and Jane Doe");
    }
}
