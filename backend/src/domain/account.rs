//! Balance-holding accounts and the resolved session identity.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{AccountId, User, UserId};

/// Balance granted to every account at registration.
pub const DEFAULT_BALANCE: f64 = 1000.0;

/// Single-currency account owned by one user.
///
/// Balances are plain floating point values; no rounding is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[schema(value_type = i32)]
    id: AccountId,
    #[schema(value_type = i32)]
    user_id: UserId,
    balance: f64,
}

impl Account {
    /// Build an account snapshot.
    pub fn new(id: AccountId, user_id: UserId, balance: f64) -> Self {
        Self {
            id,
            user_id,
            balance,
        }
    }

    /// Account key.
    pub fn id(&self) -> AccountId {
        self.id
    }

    /// Owning user key.
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Current balance.
    pub fn balance(&self) -> f64 {
        self.balance
    }

    /// Whether the balance covers `amount`.
    pub fn can_cover(&self, amount: f64) -> bool {
        self.balance >= amount
    }
}

/// Authenticated user together with their account.
///
/// Produced by resolving the session's user key; every protected route works
/// from this pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    user: User,
    account: Account,
}

impl Identity {
    /// Pair a user with their account.
    pub fn new(user: User, account: Account) -> Self {
        Self { user, account }
    }

    /// The authenticated user.
    pub fn user(&self) -> &User {
        &self.user
    }

    /// The user's account.
    pub fn account(&self) -> &Account {
        &self.account
    }

    /// Shortcut for the account balance.
    pub fn balance(&self) -> f64 {
        self.account.balance()
    }
}
