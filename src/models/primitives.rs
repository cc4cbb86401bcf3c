//! Primitive types and newtypes for type-safe API interactions.
//!
//! This module provides strongly-typed wrappers around string identifiers
//! to prevent mixing up different types of IDs at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A strongly-typed account identifier.
///
/// # Example
///
/// ```
/// use fennel_invest::AccountId;
///
/// let account = AccountId::new("acc-1234");
/// println!("Account: {}", account);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    /// Create a new account id from a string.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the account id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for AccountId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for AccountId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A strongly-typed order ID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Create a new order ID.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the order ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for OrderId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A ticker symbol (e.g., "AAPL", "SPY").
///
/// Symbols are upper-cased on construction; the backend matches tickers
/// case-sensitively.
///
/// # Example
///
/// ```
/// use fennel_invest::Symbol;
///
/// let symbol = Symbol::new("aapl");
/// assert_eq!(symbol.as_str(), "AAPL");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Create a new symbol.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into().trim().to_uppercase())
    }

    /// Get the symbol as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// International Securities Identification Number.
///
/// The GraphQL backend identifies instruments by ISIN rather than ticker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Isin(String);

impl Isin {
    /// Create a new ISIN.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the ISIN as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Isin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Isin {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Backend revision to talk to.
///
/// The Fennel backend has gone through several shapes. Each revision exposes
/// a slightly different capability set; calling an operation the revision
/// lacks fails with [`Error::Unsupported`](crate::Error::Unsupported).
///
/// # Example
///
/// ```
/// use fennel_invest::Revision;
///
/// assert!(Revision::GraphQl.is_graphql());
/// assert!(!Revision::Protobuf.is_graphql());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Revision {
    /// GraphQL API with multiple accounts per user.
    GraphQl,
    /// Older GraphQL API where each user owns exactly one implicit account.
    GraphQlSingleAccount,
    /// HTTP+protobuf API, one URL per operation.
    #[default]
    Protobuf,
}

impl Revision {
    /// Returns `true` for either GraphQL revision.
    pub fn is_graphql(&self) -> bool {
        matches!(self, Revision::GraphQl | Revision::GraphQlSingleAccount)
    }

    /// Returns `true` if the revision exposes more than one account per user.
    pub fn is_multi_account(&self) -> bool {
        !matches!(self, Revision::GraphQlSingleAccount)
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Revision::GraphQl => write!(f, "graphql"),
            Revision::GraphQlSingleAccount => write!(f, "graphql-single-account"),
            Revision::Protobuf => write!(f, "protobuf"),
        }
    }
}
