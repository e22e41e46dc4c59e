//! Allocation requests and their validation errors.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when an allocation request is malformed.
///
/// Running out of stock is never an error: it is reported as a shortfall on
/// the [`AllocationResult`](crate::AllocationResult).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid request: {kind}")]
pub struct InvalidRequest {
    /// What was wrong with the request.
    pub kind: InvalidRequestKind,
}

/// The kind of request validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidRequestKind {
    /// The SKU is empty or blank.
    #[error("SKU is empty")]
    EmptySku,
    /// No quantity was given.
    #[error("quantity is missing")]
    MissingQuantity,
    /// The quantity is zero or negative.
    #[error("quantity must be positive, got {0}")]
    NonPositiveQuantity(Decimal),
    /// The quantity is NaN or infinite.
    #[error("quantity is not a finite number")]
    NonFiniteQuantity,
    /// The quantity text is not a number.
    #[error("cannot parse quantity '{0}'")]
    UnparsableQuantity(String),
}

impl InvalidRequest {
    /// Create a new request error.
    pub const fn new(kind: InvalidRequestKind) -> Self {
        Self { kind }
    }
}

impl From<InvalidRequestKind> for InvalidRequest {
    fn from(kind: InvalidRequestKind) -> Self {
        Self::new(kind)
    }
}

/// A validated demand: a SKU and a strictly positive quantity.
///
/// Fields are private so that every constructed request is valid.
///
/// # Examples
///
/// ```
/// use picksheet_core::{AllocationRequest, InvalidRequestKind};
/// use rust_decimal_macros::dec;
///
/// let request = AllocationRequest::new("A", dec!(6)).unwrap();
/// assert_eq!(request.quantity(), dec!(6));
///
/// let err = AllocationRequest::new("A", dec!(0)).unwrap_err();
/// assert_eq!(err.kind, InvalidRequestKind::NonPositiveQuantity(dec!(0)));
///
/// let parsed = AllocationRequest::parse("A", " 2.5 ").unwrap();
/// assert_eq!(parsed.quantity(), dec!(2.5));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AllocationRequest {
    sku: String,
    quantity: Decimal,
}

impl AllocationRequest {
    /// Create a request, rejecting a blank SKU or a non-positive quantity.
    pub fn new(sku: impl Into<String>, quantity: Decimal) -> Result<Self, InvalidRequest> {
        let sku = sku.into();
        if sku.trim().is_empty() {
            return Err(InvalidRequestKind::EmptySku.into());
        }
        if quantity <= Decimal::ZERO {
            return Err(InvalidRequestKind::NonPositiveQuantity(quantity).into());
        }
        Ok(Self { sku, quantity })
    }

    /// Create a request from a floating-point quantity.
    ///
    /// NaN and infinities are rejected as non-finite.
    pub fn from_f64(sku: impl Into<String>, quantity: f64) -> Result<Self, InvalidRequest> {
        if !quantity.is_finite() {
            return Err(InvalidRequestKind::NonFiniteQuantity.into());
        }
        let quantity = Decimal::from_f64(quantity)
            .ok_or_else(|| InvalidRequestKind::UnparsableQuantity(quantity.to_string()))?;
        Self::new(sku, quantity)
    }

    /// Create a request from quantity text, as typed into a form.
    pub fn parse(sku: impl Into<String>, quantity: &str) -> Result<Self, InvalidRequest> {
        let text = quantity.trim();
        if text.is_empty() {
            return Err(InvalidRequestKind::MissingQuantity.into());
        }

        match Decimal::from_str(text).or_else(|_| Decimal::from_scientific(text)) {
            Ok(number) => Self::new(sku, number),
            Err(_) => match text.parse::<f64>() {
                Ok(value) if !value.is_finite() => {
                    Err(InvalidRequestKind::NonFiniteQuantity.into())
                }
                _ => Err(InvalidRequestKind::UnparsableQuantity(text.to_string()).into()),
            },
        }
    }

    /// The requested SKU.
    #[must_use]
    pub fn sku(&self) -> &str {
        &self.sku
    }

    /// The requested quantity (always positive).
    #[must_use]
    pub const fn quantity(&self) -> Decimal {
        self.quantity
    }
}

impl fmt::Display for AllocationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.quantity, self.sku)
    }
}
