use crate::utils::error::{LookupError, OrderTallyError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Retail brand whose tracking backend is queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Store {
    Footpatrol,
    Size,
    JdSports,
}

impl Store {
    pub const ALL: [Store; 3] = [Store::Footpatrol, Store::Size, Store::JdSports];

    pub fn code(&self) -> &'static str {
        match self {
            Store::Footpatrol => "footpatrol",
            Store::Size => "size",
            Store::JdSports => "jdsports",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Store::Footpatrol => "Footpatrol",
            Store::Size => "Size",
            Store::JdSports => "JDsports",
        }
    }
}

impl fmt::Display for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Accepts the wire code (`size`) or the 1-based menu number (`2`).
impl FromStr for Store {
    type Err = OrderTallyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_ascii_lowercase();
        let found = match input.parse::<usize>() {
            Ok(n) if (1..=Store::ALL.len()).contains(&n) => Some(Store::ALL[n - 1]),
            Ok(_) => None,
            Err(_) => Store::ALL.into_iter().find(|store| store.code() == input),
        };

        found.ok_or_else(|| OrderTallyError::InvalidConfigValueError {
            field: "store".to_string(),
            value: s.to_string(),
            reason: "expected footpatrol, size, jdsports or 1-3".to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    Uk,
    Nl,
    De,
    Dk,
    Be,
    It,
    Es,
    Fr,
}

impl Locale {
    pub const ALL: [Locale; 8] = [
        Locale::Uk,
        Locale::Nl,
        Locale::De,
        Locale::Dk,
        Locale::Be,
        Locale::It,
        Locale::Es,
        Locale::Fr,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Locale::Uk => "uk",
            Locale::Nl => "nl",
            Locale::De => "de",
            Locale::Dk => "dk",
            Locale::Be => "be",
            Locale::It => "it",
            Locale::Es => "es",
            Locale::Fr => "fr",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = OrderTallyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_ascii_lowercase();
        let found = match input.parse::<usize>() {
            Ok(n) if (1..=Locale::ALL.len()).contains(&n) => Some(Locale::ALL[n - 1]),
            Ok(_) => None,
            Err(_) => Locale::ALL
                .into_iter()
                .find(|locale| locale.code() == input),
        };

        found.ok_or_else(|| OrderTallyError::InvalidConfigValueError {
            field: "locale".to_string(),
            value: s.to_string(),
            reason: "expected one of uk, nl, de, dk, be, it, es, fr or 1-8".to_string(),
        })
    }
}

/// One unit of work for the aggregator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    pub store: Store,
    pub locale: Locale,
    pub postal_code: String,
    pub order_id: String,
}

impl LookupRequest {
    pub fn new(
        store: Store,
        locale: Locale,
        postal_code: impl Into<String>,
        order_id: impl Into<String>,
    ) -> Self {
        Self {
            store,
            locale,
            postal_code: postal_code.into(),
            order_id: order_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Success { raw_text: String },
    Failure { cause: LookupError },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusCategory {
    Placed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Unrecognized,
    LookupFailed,
}

impl StatusCategory {
    pub const ALL: [StatusCategory; 7] = [
        StatusCategory::Placed,
        StatusCategory::Processing,
        StatusCategory::Shipped,
        StatusCategory::Delivered,
        StatusCategory::Cancelled,
        StatusCategory::Unrecognized,
        StatusCategory::LookupFailed,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            StatusCategory::Placed => "placed",
            StatusCategory::Processing => "processing",
            StatusCategory::Shipped => "shipped",
            StatusCategory::Delivered => "delivered",
            StatusCategory::Cancelled => "cancelled",
            StatusCategory::Unrecognized => "unrecognized",
            StatusCategory::LookupFailed => "error",
        }
    }

    /// Position in `ALL`, used to index per-category counters.
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for StatusCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What a unit of work hands to the result sink once it completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderResult {
    pub order_id: String,
    pub category: StatusCategory,
    pub outcome: LookupOutcome,
}

impl OrderResult {
    /// `<order_id> <label>`, e.g. `A3 error`.
    pub fn line(&self) -> String {
        format!("{} {}", self.order_id, self.category.label())
    }
}

/// Final per-category counts, read only after every unit has finished.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    counts: [u64; StatusCategory::ALL.len()],
}

impl Tally {
    pub fn from_counts(counts: [u64; StatusCategory::ALL.len()]) -> Self {
        Self { counts }
    }

    pub fn get(&self, category: StatusCategory) -> u64 {
        self.counts[category.index()]
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StatusCategory, u64)> + '_ {
        StatusCategory::ALL
            .into_iter()
            .map(move |category| (category, self.get(category)))
    }
}
