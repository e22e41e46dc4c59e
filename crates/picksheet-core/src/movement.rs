//! Inbound and outbound stock movements.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::Record;

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Goods received into the warehouse.
    Inbound,
    /// Goods shipped out of the warehouse.
    Outbound,
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "inbound" | "in" | "entradas" => Ok(Self::Inbound),
            "outbound" | "out" | "salidas" => Ok(Self::Outbound),
            _ => Err(format!("unknown movement direction: {s}")),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inbound => write!(f, "inbound"),
            Self::Outbound => write!(f, "outbound"),
        }
    }
}

/// One row of the inbound or outbound movement table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementRow {
    /// Whether stock came in or went out.
    pub direction: Direction,
    /// Movement date, if the source had a parseable one.
    pub date: Option<NaiveDate>,
    /// The SKU moved.
    pub sku: String,
    /// Quantity moved.
    pub quantity: Decimal,
    /// Account the movement belongs to.
    pub account: Option<String>,
    /// Remaining source columns, in header order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<(String, String)>,
}

impl MovementRow {
    /// Create a movement with only a direction, SKU and quantity.
    #[must_use]
    pub fn new(direction: Direction, sku: impl Into<String>, quantity: Decimal) -> Self {
        Self {
            direction,
            date: None,
            sku: sku.into(),
            quantity,
            account: None,
            attributes: Vec::new(),
        }
    }

    /// Set the movement date.
    #[must_use]
    pub const fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Set the account.
    #[must_use]
    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    /// Append an extra source column.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }
}

impl Record for MovementRow {
    fn account(&self) -> Option<&str> {
        self.account.as_deref()
    }

    fn quantity(&self) -> Decimal {
        self.quantity
    }

    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        let mut fields: Vec<Cow<'_, str>> = vec![
            Cow::Borrowed(self.sku.as_str()),
            Cow::Owned(self.quantity.to_string()),
        ];
        if let Some(date) = self.date {
            fields.push(Cow::Owned(date.to_string()));
        }
        fields.extend(self.account.as_deref().map(Cow::Borrowed));
        fields.extend(self.attributes.iter().map(|(_, v)| Cow::Borrowed(v.as_str())));
        fields
    }
}

/// Inclusive date window. Missing ends are unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    /// First day included.
    pub start: Option<NaiveDate>,
    /// Last day included.
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// A range with no bounds; matches every row, dated or not.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    /// A range from `start` to `end`, both included.
    #[must_use]
    pub const fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Whether both ends are open.
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Whether a row with this date falls inside the range.
    ///
    /// Undated rows only match an unbounded range.
    #[must_use]
    pub fn contains(&self, date: Option<NaiveDate>) -> bool {
        let Some(date) = date else {
            return self.is_unbounded();
        };
        self.start.map_or(true, |start| date >= start) && self.end.map_or(true, |end| date <= end)
    }

    /// Movements inside the range, in their original order.
    #[must_use]
    pub fn filter<'a>(&self, rows: &'a [MovementRow]) -> Vec<&'a MovementRow> {
        rows.iter().filter(|r| self.contains(r.date)).collect()
    }
}
