//! Pure ledger rules.
//!
//! Every balance mutation is decided here from row snapshots that the
//! persistence adapter has already locked, and expressed as a [`Settlement`]
//! that the adapter applies as one unit. Adapters never compute balances
//! themselves, so the in-memory and PostgreSQL stores share one rulebook.

use serde::Serialize;

use super::{Account, AccountId, Identity, NewNotification, Product, ProductId, UserId};

/// Signed change to one account balance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BalanceChange {
    /// Account to adjust.
    pub account_id: AccountId,
    /// Amount added to the balance; negative for debits.
    pub delta: f64,
}

/// Effects of one ledger operation, applied atomically by the store.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Settlement {
    changes: Vec<BalanceChange>,
    removed_listing: Option<ProductId>,
    notification: Option<NewNotification>,
}

impl Settlement {
    /// Unpaired credit used by the admin console.
    pub fn credit(account: &Account, amount: f64) -> Self {
        Self {
            changes: vec![BalanceChange {
                account_id: account.id(),
                delta: amount,
            }],
            ..Self::default()
        }
    }

    fn debit(mut self, account: &Account, amount: f64) -> Self {
        self.changes.push(BalanceChange {
            account_id: account.id(),
            delta: -amount,
        });
        self
    }

    fn and_credit(mut self, account: &Account, amount: f64) -> Self {
        self.changes.push(BalanceChange {
            account_id: account.id(),
            delta: amount,
        });
        self
    }

    fn removing(mut self, product: ProductId) -> Self {
        self.removed_listing = Some(product);
        self
    }

    fn notifying(mut self, notification: NewNotification) -> Self {
        self.notification = Some(notification);
        self
    }

    /// Balance adjustments in application order.
    pub fn changes(&self) -> &[BalanceChange] {
        &self.changes
    }

    /// Listing deleted by this settlement, if any.
    pub fn removed_listing(&self) -> Option<ProductId> {
        self.removed_listing
    }

    /// Notification emitted by this settlement, if any.
    pub fn notification(&self) -> Option<&NewNotification> {
        self.notification.as_ref()
    }

    /// Net change applied to `account`.
    pub fn net_change_for(&self, account: AccountId) -> f64 {
        self.changes
            .iter()
            .filter(|change| change.account_id == account)
            .map(|change| change.delta)
            .sum()
    }
}

/// Reasons a transfer leaves every balance untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum TransferRejection {
    /// Amount was zero, negative or not a number.
    #[error("transfer amount must be positive")]
    NonPositiveAmount,
    /// Sender and target are the same user.
    #[error("cannot transfer to yourself")]
    SelfTransfer,
    /// No account exists for the target user.
    #[error("transfer target has no account")]
    UnknownTarget,
    /// The sender's own account could not be found.
    #[error("sender has no account")]
    UnknownSender,
    /// Sender balance is below the amount.
    #[error("insufficient funds")]
    InsufficientFunds,
}

/// Request to move funds from the caller to another user.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferOrder {
    sender: UserId,
    sender_name: String,
    target: UserId,
    amount: f64,
}

impl TransferOrder {
    /// Build an order on behalf of the authenticated sender.
    pub fn new(sender: &Identity, target: UserId, amount: f64) -> Self {
        Self {
            sender: sender.user().id(),
            sender_name: sender.user().display_name().to_string(),
            target,
            amount,
        }
    }

    /// Sending user.
    pub fn sender(&self) -> UserId {
        self.sender
    }

    /// Receiving user.
    pub fn target(&self) -> UserId {
        self.target
    }

    /// Amount to move.
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// Checks that need no stored state.
    pub fn precheck(&self) -> Result<(), TransferRejection> {
        if self.amount.is_nan() || self.amount <= 0.0 {
            return Err(TransferRejection::NonPositiveAmount);
        }
        if self.sender == self.target {
            return Err(TransferRejection::SelfTransfer);
        }
        Ok(())
    }

    /// Decide the transfer against locked account snapshots.
    ///
    /// # Examples
    /// ```
    /// use bazaar::domain::{Account, AccountId, Identity, TransferOrder, User, UserId};
    ///
    /// let ada = User::try_from_strings(UserId::new(1), "ada", "Ada", true).unwrap();
    /// let sender = Account::new(AccountId::new(1), UserId::new(1), 1000.0);
    /// let target = Account::new(AccountId::new(2), UserId::new(2), 1000.0);
    /// let order = TransferOrder::new(&Identity::new(ada, sender.clone()), UserId::new(2), 200.0);
    ///
    /// let settlement = order.settle(&sender, Some(&target)).unwrap();
    /// assert_eq!(settlement.net_change_for(sender.id()), -200.0);
    /// assert_eq!(settlement.net_change_for(target.id()), 200.0);
    /// ```
    pub fn settle(
        &self,
        sender: &Account,
        target: Option<&Account>,
    ) -> Result<Settlement, TransferRejection> {
        self.precheck()?;
        let target = target.ok_or(TransferRejection::UnknownTarget)?;
        if !sender.can_cover(self.amount) {
            return Err(TransferRejection::InsufficientFunds);
        }
        Ok(Settlement::default()
            .debit(sender, self.amount)
            .and_credit(target, self.amount)
            .notifying(NewNotification::transfer_received(
                self.target,
                &self.sender_name,
                self.amount,
            )))
    }
}

/// Result of a transfer attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransferOutcome {
    /// Funds moved; carries the sender's new balance.
    Completed { sender_balance: f64 },
    /// Nothing changed.
    Rejected(TransferRejection),
}

/// Reasons a purchase leaves every balance untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseRejection {
    /// The listing was already sold or never existed.
    #[error("listing is no longer available")]
    ListingGone,
    /// The buyer's own account could not be found.
    #[error("buyer has no account")]
    UnknownBuyer,
    /// Buyer balance is below the price.
    #[error("insufficient funds")]
    InsufficientFunds,
}

/// Request to buy a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseOrder {
    buyer: UserId,
    buyer_name: String,
    product: ProductId,
}

impl PurchaseOrder {
    /// Build an order on behalf of the authenticated buyer.
    pub fn new(buyer: &Identity, product: ProductId) -> Self {
        Self {
            buyer: buyer.user().id(),
            buyer_name: buyer.user().display_name().to_string(),
            product,
        }
    }

    /// Buying user.
    pub fn buyer(&self) -> UserId {
        self.buyer
    }

    /// Listing to buy.
    pub fn product(&self) -> ProductId {
        self.product
    }

    /// Decide the purchase against locked snapshots.
    ///
    /// When the seller has no account the buyer is still debited and the
    /// listing removed, but the price is credited nowhere and no seller
    /// notification is emitted.
    pub fn settle(
        &self,
        buyer: &Account,
        product: &Product,
        seller: Option<&Account>,
    ) -> Result<Settlement, PurchaseRejection> {
        let price = product.price();
        if !buyer.can_cover(price) {
            return Err(PurchaseRejection::InsufficientFunds);
        }
        let settlement = Settlement::default()
            .debit(buyer, price)
            .removing(product.id());
        Ok(match seller {
            Some(seller) => settlement
                .and_credit(seller, price)
                .notifying(NewNotification::listing_sold(
                    product.seller_id(),
                    product.title(),
                    price,
                    &self.buyer_name,
                )),
            None => settlement,
        })
    }
}

/// Result of a purchase attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PurchaseOutcome {
    /// Buyer paid; `seller_credited` is false when the price was burned.
    Completed { price: f64, seller_credited: bool },
    /// Nothing changed.
    Rejected(PurchaseRejection),
}

/// Result of an admin credit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CreditOutcome {
    /// Balance adjusted; carries the new balance.
    Credited { balance: f64 },
    /// The target user has no account; nothing changed.
    UnknownAccount,
}
