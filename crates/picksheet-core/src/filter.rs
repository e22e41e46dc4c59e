//! Account selection and free-text search over table rows.
//!
//! The account selection is a plain value handed to whoever renders the
//! table, never process-wide state.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::Record;

/// Label for the "every account" selection.
pub const ALL_ACCOUNTS: &str = "Todas";

/// Which account's rows to show.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountFilter {
    /// Every row, tagged or not.
    #[default]
    All,
    /// Only rows tagged with exactly this account.
    Only(String),
}

impl AccountFilter {
    /// Whether a row with this account passes the filter.
    #[must_use]
    pub fn matches(&self, account: Option<&str>) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => account == Some(wanted.as_str()),
        }
    }
}

impl FromStr for AccountFilter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case(ALL_ACCOUNTS) {
            Ok(Self::All)
        } else {
            Ok(Self::Only(s.to_string()))
        }
    }
}

impl fmt::Display for AccountFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "{ALL_ACCOUNTS}"),
            Self::Only(account) => write!(f, "{account}"),
        }
    }
}

/// Account selection plus an optional search query.
///
/// # Examples
///
/// ```
/// use picksheet_core::{AccountFilter, InventoryRow, RowFilter};
/// use rust_decimal_macros::dec;
///
/// let rows = vec![
///     InventoryRow::new("TORN-3", dec!(5)).with_account("Acme"),
///     InventoryRow::new("TUER-8", dec!(2)).with_account("Acme"),
///     InventoryRow::new("TORN-5", dec!(1)).with_account("Other"),
/// ];
///
/// let filter = RowFilter::new()
///     .with_account(AccountFilter::Only("Acme".into()))
///     .with_query("torn");
/// let shown = filter.apply(&rows);
/// assert_eq!(shown.len(), 1);
/// assert_eq!(shown[0].sku, "TORN-3");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowFilter {
    /// Account selection.
    pub account: AccountFilter,
    /// Lowercased search text; `None` matches everything.
    query: Option<String>,
}

impl RowFilter {
    /// A filter that keeps every row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to an account.
    #[must_use]
    pub fn with_account(mut self, account: AccountFilter) -> Self {
        self.account = account;
        self
    }

    /// Search every field for `query`, ignoring case. Blank text clears the search.
    #[must_use]
    pub fn with_query(mut self, query: impl AsRef<str>) -> Self {
        let query = query.as_ref().trim();
        self.query = (!query.is_empty()).then(|| query.to_lowercase());
        self
    }

    /// The active search text, lowercased.
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Whether a record passes both the account filter and the search.
    pub fn matches<R: Record>(&self, record: &R) -> bool {
        self.account.matches(record.account())
            && self
                .query
                .as_deref()
                .map_or(true, |q| record.matches_query(q))
    }

    /// Records that pass, in their original order.
    pub fn apply<'a, R: Record>(&self, records: &'a [R]) -> Vec<&'a R> {
        records.iter().filter(|r| self.matches(*r)).collect()
    }
}
