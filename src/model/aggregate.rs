use crate::model::{Amount, Tier};
use serde::{Serialize, Serializer};
use std::fmt::{Display, Formatter};

/// The span of time an `Aggregate` sums over.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Period {
    Year(i32),
    AllTime,
}

impl Display for Period {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Period::Year(year) => write!(f, "{year}"),
            Period::AllTime => f.write_str("all-time"),
        }
    }
}

impl Serialize for Period {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// The total given by one donor over a `Period`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Aggregate {
    period: Period,
    account_id: String,
    name: String,
    amount: Amount,
}

impl Aggregate {
    pub fn new(
        period: Period,
        account_id: impl Into<String>,
        name: impl Into<String>,
        amount: Amount,
    ) -> Self {
        Self {
            period,
            account_id: account_id.into(),
            name: name.into(),
            amount,
        }
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }
}

/// An `Aggregate` placed in its giving level.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct TieredAggregate {
    #[serde(flatten)]
    aggregate: Aggregate,
    tier: Tier,
    last_name: String,
}

impl TieredAggregate {
    /// Places `aggregate` in `tier`. The last name is the final word of the donor's display name;
    /// for a household such as "John Doe and Jane Roe" that is the last name of the last person.
    pub fn new(aggregate: Aggregate, tier: Tier) -> Self {
        let last_name = aggregate
            .name()
            .split_whitespace()
            .last()
            .unwrap_or_default()
            .to_string();
        Self {
            aggregate,
            tier,
            last_name,
        }
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn name(&self) -> &str {
        self.aggregate.name()
    }

    pub fn period(&self) -> Period {
        self.aggregate.period()
    }
}
