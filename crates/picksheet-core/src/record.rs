//! The [`Record`] trait shared by inventory and movement rows.

use rust_decimal::Decimal;
use std::borrow::Cow;

/// A table row that carries an account tag and a quantity and can be searched.
///
/// Account totals and row filters work on anything implementing this trait,
/// so the inventory table and the movement tables share them.
pub trait Record {
    /// The account (client) this row belongs to, if tagged.
    fn account(&self) -> Option<&str>;

    /// The row's quantity.
    fn quantity(&self) -> Decimal;

    /// Every field rendered as text, for free-text search.
    fn search_fields(&self) -> Vec<Cow<'_, str>>;

    /// Case-insensitive substring match over [`Record::search_fields`].
    ///
    /// `needle` must already be lowercase.
    fn matches_query(&self, needle: &str) -> bool {
        needle.is_empty()
            || self
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(needle))
    }
}
