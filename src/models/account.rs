//! Account models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::AccountStatus;
use super::primitives::AccountId;

/// A brokerage account owned by the authenticated user.
///
/// Produced by the account listing call; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Account identifier used by every account-scoped call
    pub id: AccountId,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// When the account was created; accounts are listed oldest first
    pub created: DateTime<Utc>,
    /// Onboarding status
    pub status: AccountStatus,
    /// Whether this is the user's primary account
    #[serde(default)]
    pub is_primary: bool,
}

impl Account {
    /// Returns `true` if the account can be used for trading.
    pub fn is_tradable(&self) -> bool {
        self.status.is_approved()
    }
}

/// Keep only approved accounts and order them by creation time, oldest first.
pub(crate) fn tradable_accounts(mut accounts: Vec<Account>) -> Vec<Account> {
    accounts.retain(Account::is_tradable);
    accounts.sort_by_key(|a| a.created);
    accounts
}
