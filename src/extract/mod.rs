//! Field extractors
//!
//! Pure, total functions over the normalized signal text. None of them
//! fail: "nothing found" is `None`. Each module evaluator composes the
//! extractors it needs.
//!
//! ## Extractors
//!
//! - [`amount`] - monetary amount, explicit euro marker first
//! - [`merchant`] - five-stage merchant pipeline backed by [`crate::fuzzy`]
//! - [`wallet`] - payment-method hint
//! - [`todo`] - task title and actionability
//! - [`crypto`] - symbol, action, quantity, price and quote currency
//! - [`link`] - validated URL and link title

pub mod amount;
pub mod crypto;
pub mod link;
pub mod merchant;
pub mod todo;
pub mod wallet;

pub use amount::{extract_amount, has_amount, AmountMatch};
pub use crypto::{extract_crypto, CryptoExtraction};
pub use link::{extract_link_title, extract_url, has_url, LinkMatch};
pub use merchant::{extract_merchant, extract_merchant_with, has_known_brand, MerchantFinding};
pub use todo::{extract_todo_title, is_actionable};
pub use wallet::extract_wallet;
