//! In-process store implementing every driven port.
//!
//! All collections sit behind one [`Mutex`], so each port call is a single
//! critical section: registration creates user and account together, and
//! ledger settlements apply their paired debit and credit without another
//! operation observing the intermediate state. Used when no database URL is
//! configured and throughout the HTTP tests.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use zeroize::Zeroizing;

use crate::domain::ports::{
    AccountPersistenceError, AccountRepository, LedgerPersistenceError, LedgerRepository,
    NotificationPersistenceError, NotificationRepository, ProductPersistenceError,
    ProductRepository, UserPersistenceError, UserRepository,
};
use crate::domain::{
    Account, AccountId, CreditOutcome, DEFAULT_BALANCE, Identity, LoginCredentials,
    NewNotification, NewProduct, Notification, NotificationId, Product, ProductId, PurchaseOrder,
    PurchaseOutcome, PurchaseRejection, Registration, Settlement, TransferOrder, TransferOutcome,
    TransferRejection, User, UserId, admin_on_registration,
};

const POISONED: &str = "in-memory store lock poisoned";

struct UserRow {
    user: User,
    password: Zeroizing<String>,
}

struct AccountRow {
    user_id: UserId,
    balance: f64,
}

#[derive(Default)]
struct StoreState {
    users: BTreeMap<UserId, UserRow>,
    accounts: BTreeMap<AccountId, AccountRow>,
    products: BTreeMap<ProductId, Product>,
    notifications: Vec<Notification>,
    last_user: i32,
    last_account: i32,
    last_product: i32,
    last_notification: i32,
}

fn next_key(last: &mut i32) -> i32 {
    *last += 1;
    *last
}

impl StoreState {
    fn account_for(&self, user: UserId) -> Option<Account> {
        self.accounts
            .iter()
            .find(|(_, row)| row.user_id == user)
            .map(|(id, row)| Account::new(*id, row.user_id, row.balance))
    }

    fn balance_of(&self, account: AccountId) -> f64 {
        self.accounts.get(&account).map_or(0.0, |row| row.balance)
    }

    fn append_notification(&mut self, note: NewNotification, clock: &dyn Clock) -> Notification {
        let id = NotificationId::new(next_key(&mut self.last_notification));
        let stored = note.into_notification(id, clock.utc());
        self.notifications.push(stored.clone());
        stored
    }

    fn apply(&mut self, settlement: Settlement, clock: &dyn Clock) {
        for change in settlement.changes() {
            if let Some(row) = self.accounts.get_mut(&change.account_id) {
                row.balance += change.delta;
            }
        }
        if let Some(product) = settlement.removed_listing() {
            self.products.remove(&product);
        }
        if let Some(note) = settlement.notification() {
            self.append_notification(note.clone(), clock);
        }
    }
}

/// Mutex-guarded store for users, accounts, listings and notifications.
pub struct InMemoryStore {
    state: Mutex<StoreState>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new(Arc::new(DefaultClock))
    }
}

impl InMemoryStore {
    /// Create an empty store stamping notifications with `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(StoreState::default()),
            clock,
        }
    }

    fn state(&self) -> Result<MutexGuard<'_, StoreState>, &'static str> {
        self.state.lock().map_err(|_| POISONED)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn register(&self, registration: &Registration) -> Result<Identity, UserPersistenceError> {
        let mut state = self.state().map_err(UserPersistenceError::query)?;
        if state
            .users
            .values()
            .any(|row| row.user.login_id() == registration.login_id())
        {
            return Err(UserPersistenceError::duplicate_login(
                registration.login_id().as_ref(),
            ));
        }

        let existing = i64::try_from(state.users.len())
            .map_err(|err| UserPersistenceError::query(err.to_string()))?;
        let user_id = UserId::new(next_key(&mut state.last_user));
        let user = User::new(
            user_id,
            registration.login_id().clone(),
            registration.display_name().clone(),
            admin_on_registration(existing),
        );
        state.users.insert(
            user_id,
            UserRow {
                user: user.clone(),
                password: Zeroizing::new(registration.password().to_owned()),
            },
        );

        let account_id = AccountId::new(next_key(&mut state.last_account));
        state.accounts.insert(
            account_id,
            AccountRow {
                user_id,
                balance: DEFAULT_BALANCE,
            },
        );
        Ok(Identity::new(
            user,
            Account::new(account_id, user_id, DEFAULT_BALANCE),
        ))
    }

    async fn find_by_credentials(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<Option<User>, UserPersistenceError> {
        let state = self.state().map_err(UserPersistenceError::query)?;
        Ok(state
            .users
            .values()
            .find(|row| {
                row.user.login_id() == credentials.login_id()
                    && row.password.as_str() == credentials.password()
            })
            .map(|row| row.user.clone()))
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let state = self.state().map_err(UserPersistenceError::query)?;
        Ok(state.users.get(&id).map(|row| row.user.clone()))
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        let state = self.state().map_err(UserPersistenceError::query)?;
        Ok(state.users.values().map(|row| row.user.clone()).collect())
    }

    async fn promote(&self, id: UserId) -> Result<bool, UserPersistenceError> {
        let mut state = self.state().map_err(UserPersistenceError::query)?;
        let Some(row) = state.users.get_mut(&id) else {
            return Ok(false);
        };
        let promoted = User::new(
            row.user.id(),
            row.user.login_id().clone(),
            row.user.display_name().clone(),
            true,
        );
        row.user = promoted;
        Ok(true)
    }
}

#[async_trait]
impl AccountRepository for InMemoryStore {
    async fn find_by_user(&self, user: UserId) -> Result<Option<Account>, AccountPersistenceError> {
        let state = self.state().map_err(AccountPersistenceError::query)?;
        Ok(state.account_for(user))
    }
}

#[async_trait]
impl ProductRepository for InMemoryStore {
    async fn list(&self) -> Result<Vec<Product>, ProductPersistenceError> {
        let state = self.state().map_err(ProductPersistenceError::query)?;
        Ok(state.products.values().cloned().collect())
    }

    async fn create(&self, product: &NewProduct) -> Result<Product, ProductPersistenceError> {
        let mut state = self.state().map_err(ProductPersistenceError::query)?;
        let id = ProductId::new(next_key(&mut state.last_product));
        let stored = Product::new(id, product.clone());
        state.products.insert(id, stored.clone());
        Ok(stored)
    }
}

#[async_trait]
impl NotificationRepository for InMemoryStore {
    async fn post(
        &self,
        notification: &NewNotification,
    ) -> Result<Notification, NotificationPersistenceError> {
        let mut state = self.state().map_err(NotificationPersistenceError::query)?;
        Ok(state.append_notification(notification.clone(), self.clock.as_ref()))
    }

    async fn visible_to(
        &self,
        viewer: UserId,
    ) -> Result<Vec<Notification>, NotificationPersistenceError> {
        let state = self.state().map_err(NotificationPersistenceError::query)?;
        Ok(state
            .notifications
            .iter()
            .filter(|note| note.is_visible_to(viewer))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl LedgerRepository for InMemoryStore {
    async fn transfer(
        &self,
        order: &TransferOrder,
    ) -> Result<TransferOutcome, LedgerPersistenceError> {
        let mut state = self.state().map_err(LedgerPersistenceError::query)?;
        let Some(sender) = state.account_for(order.sender()) else {
            return Ok(TransferOutcome::Rejected(TransferRejection::UnknownSender));
        };
        let target = state.account_for(order.target());
        match order.settle(&sender, target.as_ref()) {
            Ok(settlement) => {
                state.apply(settlement, self.clock.as_ref());
                Ok(TransferOutcome::Completed {
                    sender_balance: state.balance_of(sender.id()),
                })
            }
            Err(reason) => Ok(TransferOutcome::Rejected(reason)),
        }
    }

    async fn purchase(
        &self,
        order: &PurchaseOrder,
    ) -> Result<PurchaseOutcome, LedgerPersistenceError> {
        let mut state = self.state().map_err(LedgerPersistenceError::query)?;
        let Some(buyer) = state.account_for(order.buyer()) else {
            return Ok(PurchaseOutcome::Rejected(PurchaseRejection::UnknownBuyer));
        };
        let Some(product) = state.products.get(&order.product()).cloned() else {
            return Ok(PurchaseOutcome::Rejected(PurchaseRejection::ListingGone));
        };
        let seller = state.account_for(product.seller_id());
        match order.settle(&buyer, &product, seller.as_ref()) {
            Ok(settlement) => {
                state.apply(settlement, self.clock.as_ref());
                Ok(PurchaseOutcome::Completed {
                    price: product.price(),
                    seller_credited: seller.is_some(),
                })
            }
            Err(reason) => Ok(PurchaseOutcome::Rejected(reason)),
        }
    }

    async fn credit(
        &self,
        user: UserId,
        amount: f64,
    ) -> Result<CreditOutcome, LedgerPersistenceError> {
        let mut state = self.state().map_err(LedgerPersistenceError::query)?;
        let Some(account) = state.account_for(user) else {
            return Ok(CreditOutcome::UnknownAccount);
        };
        state.apply(Settlement::credit(&account, amount), self.clock.as_ref());
        Ok(CreditOutcome::Credited {
            balance: state.balance_of(account.id()),
        })
    }
}

#[cfg(test)]
mod tests;
