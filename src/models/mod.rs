//! Data models for the Fennel API.
//!
//! Models are organized by domain:
//!
//! - [`primitives`] - Identifier newtypes and the backend [`Revision`]
//! - [`enums`] - Account status and order enums
//! - [`account`] - Account listing
//! - [`portfolio`] - Portfolio summary and holdings
//! - [`market_data`] - Quotes, NBBO and search results
//! - [`order`] - Order requests, orders and acknowledgements
//!
//! All models are request-scoped values; every backend revision maps its own
//! wire format onto these types.

pub mod primitives;
pub mod enums;
pub mod account;
pub mod portfolio;
pub mod market_data;
pub mod order;

pub use primitives::*;
pub use enums::*;
pub use account::Account;
pub use portfolio::*;
pub use market_data::*;
pub use order::*;
