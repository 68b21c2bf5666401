use crate::model::Amount;
use serde::Serialize;

/// A single closed, invoiced or pledged donation.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Donation {
    amount: Amount,
    year: i32,
    account_id: String,
}

impl Donation {
    pub fn new(amount: Amount, year: i32, account_id: impl Into<String>) -> Self {
        Self {
            amount,
            year,
            account_id: account_id.into(),
        }
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }
}

/// A person as stored in the CRM. Members of a household share an account.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Contact {
    account_id: String,
    name: String,
}

impl Contact {
    pub fn new(account_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            name: name.into(),
        }
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// One account with the names of all of its contacts combined, e.g. "John Doe and Jane Doe".
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Donor {
    account_id: String,
    name: String,
}

impl Donor {
    pub fn new(account_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            name: name.into(),
        }
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A donation matched with the donor that gave it.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct JoinedDonation {
    amount: Amount,
    year: i32,
    account_id: String,
    name: String,
}

impl JoinedDonation {
    pub fn new(
        amount: Amount,
        year: i32,
        account_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            amount,
            year,
            account_id: account_id.into(),
            name: name.into(),
        }
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
