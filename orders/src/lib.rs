//! Order validation for asset transfers.
//!
//! A transfer transaction may embed exchange orders that reassign asset
//! ownership along a declared from/to ratio. This crate owns the full
//! accept/reject decision: outpoint consistency, origin-output folio
//! equality, maker authorization, output-count bounds, ratio arithmetic,
//! and plain per-asset conservation for order-free transfers.
//!
//! There is no resting order book. Every order is fully specified and
//! settled inside the single transaction that carries it; partial fills
//! chain client-side via [`ember_transactions::Order::consumed`].

pub mod error;
pub mod validator;

pub use error::OrderError;
pub use validator::verify_transfer;
