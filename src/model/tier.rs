use crate::model::Amount;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// A giving level. Variants are declared in band order, lowest first, so the derived `Ord` sorts
/// by amount band rather than by name.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Friend,
    Supporter,
    Patron,
    Champion,
    Ambassador,
    EditorsCircle,
    PublishersCircle,
}

impl Tier {
    /// All tiers, lowest band first.
    pub const ALL: [Tier; 7] = [
        Tier::Friend,
        Tier::Supporter,
        Tier::Patron,
        Tier::Champion,
        Tier::Ambassador,
        Tier::EditorsCircle,
        Tier::PublishersCircle,
    ];

    /// The inclusive lower bound of the band, in dollars. Each band ends where the next one
    /// begins. The top band has no upper bound.
    pub fn lower_bound(self) -> Decimal {
        Decimal::from(match self {
            Tier::Friend => 0,
            Tier::Supporter => 50,
            Tier::Patron => 100,
            Tier::Champion => 250,
            Tier::Ambassador => 500,
            Tier::EditorsCircle => 1000,
            Tier::PublishersCircle => 2500,
        })
    }

    /// Finds the band that `amount` falls in. Negative amounts are below every band.
    pub fn for_amount(amount: Amount) -> Option<Tier> {
        let value = amount.value();
        Tier::ALL
            .iter()
            .rev()
            .find(|tier| value >= tier.lower_bound())
            .copied()
    }

    /// The label printed above the donors of this tier in a report. These are shown as-is on the
    /// website, hence the markup and the line break.
    pub fn label(self) -> &'static str {
        match self {
            Tier::Friend => "<strong>Friend\n$1-$49</strong>",
            Tier::Supporter => "<strong>Supporter\n$50-$99</strong>",
            Tier::Patron => "<strong>Patron\n$100-$249</strong>",
            Tier::Champion => "<strong>Champion Level\n$250-$499</strong>",
            Tier::Ambassador => "<strong>Ambassador\n$500-$999</strong>",
            Tier::EditorsCircle => "<strong>Editor's Circle\n$1,000-$2,499</strong>",
            Tier::PublishersCircle => "<strong>Publisher's Circle\n$2,500-$4,999</strong>",
        }
    }
}

impl Display for Tier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
