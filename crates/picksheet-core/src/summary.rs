//! Per-account quantity totals.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::Record;

/// Total quantity held or moved for one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountTotal {
    /// Account name.
    pub account: String,
    /// Sum of quantities for the account.
    pub quantity: Decimal,
}

/// Quantity totals grouped by account, sorted by account name.
///
/// Rows without an account are not grouped but still count toward
/// [`AccountTotals::grand_total`].
///
/// # Examples
///
/// ```
/// use picksheet_core::{AccountTotals, InventoryRow};
/// use rust_decimal_macros::dec;
///
/// let rows = vec![
///     InventoryRow::new("A", dec!(5)).with_account("Beta"),
///     InventoryRow::new("B", dec!(2)).with_account("Alpha"),
///     InventoryRow::new("C", dec!(1)).with_account("Beta"),
///     InventoryRow::new("D", dec!(4)),
/// ];
///
/// let totals = AccountTotals::from_records(&rows);
/// assert_eq!(totals.accounts[0].account, "Alpha");
/// assert_eq!(totals.get("Beta"), Some(dec!(6)));
/// assert_eq!(totals.grand_total, dec!(12));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AccountTotals {
    /// One entry per account, sorted by name.
    pub accounts: Vec<AccountTotal>,
    /// Sum over every row, tagged or not.
    pub grand_total: Decimal,
}

impl AccountTotals {
    /// Group and sum any records.
    ///
    /// Sums saturate at [`Decimal::MAX`] instead of overflowing.
    pub fn from_records<'a, R, I>(records: I) -> Self
    where
        R: Record + 'a,
        I: IntoIterator<Item = &'a R>,
    {
        let mut grouped: BTreeMap<&str, Decimal> = BTreeMap::new();
        let mut grand_total = Decimal::ZERO;

        for record in records {
            let quantity = record.quantity();
            grand_total = grand_total.saturating_add(quantity);
            if let Some(account) = record.account() {
                let total = grouped.entry(account).or_default();
                *total = total.saturating_add(quantity);
            }
        }

        Self {
            accounts: grouped
                .into_iter()
                .map(|(account, quantity)| AccountTotal {
                    account: account.to_string(),
                    quantity,
                })
                .collect(),
            grand_total,
        }
    }

    /// Total for one account.
    #[must_use]
    pub fn get(&self, account: &str) -> Option<Decimal> {
        self.accounts
            .iter()
            .find(|t| t.account == account)
            .map(|t| t.quantity)
    }

    /// Number of distinct accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Whether no row carried an account.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}
