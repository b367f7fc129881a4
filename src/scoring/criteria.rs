use std::fmt;

/// The six evaluation criteria every centre is scored on.
///
/// Column and weight names are case-sensitive and match [`Criterion::name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Criterion {
    Cost,
    Education,
    Staff,
    Facilities,
    Reputation,
    Nqs,
}

pub const CRITERIA_COUNT: usize = 6;

impl Criterion {
    /// All criteria in column order.
    pub const ALL: [Criterion; CRITERIA_COUNT] = [
        Criterion::Cost,
        Criterion::Education,
        Criterion::Staff,
        Criterion::Facilities,
        Criterion::Reputation,
        Criterion::Nqs,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Criterion::Cost => "Cost",
            Criterion::Education => "Education",
            Criterion::Staff => "Staff",
            Criterion::Facilities => "Facilities",
            Criterion::Reputation => "Reputation",
            Criterion::Nqs => "NQS",
        }
    }

    /// Exact, case-sensitive lookup by column name.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
