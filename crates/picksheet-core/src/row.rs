//! Inventory row type representing one on-hand stock record.
//!
//! An [`InventoryRow`] is a quantity of a SKU held in one lot at one
//! location. Lot and location are optional in the source spreadsheets; when
//! they are missing the row renders them as [`NOT_AVAILABLE`].

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

use crate::Record;

/// Placeholder used for a missing lot or location.
pub const NOT_AVAILABLE: &str = "N/A";

/// Largest quantity (10^15) an imported row may hold.
///
/// Sums over any realistic table of rows within this bound stay far below
/// [`Decimal::MAX`].
pub const MAX_QUANTITY: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

/// One on-hand stock record: a quantity of a SKU in a lot at a location.
///
/// # Examples
///
/// ```
/// use picksheet_core::InventoryRow;
/// use rust_decimal_macros::dec;
///
/// let row = InventoryRow::new("A-100", dec!(5))
///     .with_lot("L1")
///     .with_location("X-01");
/// assert!(row.is_available());
/// assert_eq!(row.lot_or_default(), "L1");
///
/// let bare = InventoryRow::new("A-100", dec!(0));
/// assert!(!bare.is_available());
/// assert_eq!(bare.location_or_default(), "N/A");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InventoryRow {
    /// Stock-keeping unit, matched exactly and case-sensitively.
    pub sku: String,
    /// Lot or batch identifier.
    pub lot: Option<String>,
    /// Storage location (bin, shelf, zone).
    pub location: Option<String>,
    /// Quantity on hand. Rows at or below zero are never allocated.
    pub quantity: Decimal,
    /// Grouping tag (client account). Not used by the allocator.
    pub account: Option<String>,
    /// Receipt date, when the source carries one.
    pub received: Option<NaiveDate>,
    /// Remaining source columns, in header order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<(String, String)>,
}

impl InventoryRow {
    /// Create a row with only a SKU and a quantity.
    #[must_use]
    pub fn new(sku: impl Into<String>, quantity: Decimal) -> Self {
        Self {
            sku: sku.into(),
            lot: None,
            location: None,
            quantity,
            account: None,
            received: None,
            attributes: Vec::new(),
        }
    }

    /// Set the lot.
    #[must_use]
    pub fn with_lot(mut self, lot: impl Into<String>) -> Self {
        self.lot = Some(lot.into());
        self
    }

    /// Set the location.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Set the account.
    #[must_use]
    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    /// Set the receipt date.
    #[must_use]
    pub const fn with_received(mut self, date: NaiveDate) -> Self {
        self.received = Some(date);
        self
    }

    /// Append an extra source column.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Lot, or [`NOT_AVAILABLE`] when missing.
    #[must_use]
    pub fn lot_or_default(&self) -> &str {
        self.lot.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    /// Location, or [`NOT_AVAILABLE`] when missing.
    #[must_use]
    pub fn location_or_default(&self) -> &str {
        self.location.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    /// Whether this row can supply stock (quantity strictly positive).
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.quantity > Decimal::ZERO
    }
}

impl Record for InventoryRow {
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
        fields.extend(self.lot.as_deref().map(Cow::Borrowed));
        fields.extend(self.location.as_deref().map(Cow::Borrowed));
        fields.extend(self.account.as_deref().map(Cow::Borrowed));
        if let Some(date) = self.received {
            fields.push(Cow::Owned(date.to_string()));
        }
        fields.extend(self.attributes.iter().map(|(_, v)| Cow::Borrowed(v.as_str())));
        fields
    }
}

impl fmt::Display for InventoryRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}@{}",
            self.quantity,
            self.sku,
            self.lot_or_default(),
            self.location_or_default()
        )
    }
}
