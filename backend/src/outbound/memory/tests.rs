//! Behavioural coverage for the in-memory store.

use super::*;
use crate::domain::{LoginCredentials, NewListing};
use rstest::{fixture, rstest};

fn registration(login: &str, name: &str) -> Registration {
    Registration::try_from_parts(login, name, "pw").expect("registration")
}

async fn register(store: &InMemoryStore, login: &str, name: &str) -> Identity {
    store
        .register(&registration(login, name))
        .await
        .expect("registered")
}

async fn balance(store: &InMemoryStore, user: UserId) -> f64 {
    store
        .find_by_user(user)
        .await
        .expect("lookup")
        .expect("account")
        .balance()
}

async fn list_for_sale(
    store: &InMemoryStore,
    seller: &Identity,
    title: &str,
    price: f64,
) -> Product {
    let listing = NewListing::new(title, price, "contact").expect("listing");
    store
        .create(&listing.listed_by(seller))
        .await
        .expect("listed")
}

#[fixture]
fn store() -> InMemoryStore {
    InMemoryStore::default()
}

#[rstest]
#[tokio::test]
async fn only_the_first_registrant_is_admin(store: InMemoryStore) {
    let ada = register(&store, "ada", "Ada").await;
    let bob = register(&store, "bob", "Bob").await;
    let cy = register(&store, "cy", "Cy").await;

    assert!(ada.user().is_admin());
    assert!(!bob.user().is_admin());
    assert!(!cy.user().is_admin());
    for identity in [&ada, &bob, &cy] {
        assert_eq!(identity.balance(), DEFAULT_BALANCE);
        assert_eq!(balance(&store, identity.user().id()).await, DEFAULT_BALANCE);
    }
}

#[rstest]
#[tokio::test]
async fn duplicate_login_creates_nothing(store: InMemoryStore) {
    register(&store, "ada", "Ada").await;
    let err = store
        .register(&registration("ada", "Impostor"))
        .await
        .expect_err("duplicate");

    assert_eq!(err, UserPersistenceError::duplicate_login("ada"));
    assert_eq!(UserRepository::list(&store).await.expect("users").len(), 1);
}

#[rstest]
#[tokio::test]
async fn credentials_must_match_exactly(store: InMemoryStore) {
    let ada = register(&store, "ada", "Ada").await;
    let good = LoginCredentials::try_from_parts("ada", "pw").expect("creds");
    let bad = LoginCredentials::try_from_parts("ada", "PW").expect("creds");

    let found = store.find_by_credentials(&good).await.expect("lookup");
    assert_eq!(found.map(|user| user.id()), Some(ada.user().id()));
    assert!(store.find_by_credentials(&bad).await.expect("lookup").is_none());
}

#[rstest]
#[tokio::test]
async fn transfer_pairs_debit_and_credit(store: InMemoryStore) {
    let ada = register(&store, "ada", "Ada").await;
    let bob = register(&store, "bob", "Bob").await;

    let order = TransferOrder::new(&ada, bob.user().id(), 200.0);
    let outcome = store.transfer(&order).await.expect("transfer");

    assert_eq!(
        outcome,
        TransferOutcome::Completed {
            sender_balance: 800.0
        }
    );
    assert_eq!(balance(&store, bob.user().id()).await, 1200.0);
    let bob_notes = store.visible_to(bob.user().id()).await.expect("notes");
    assert_eq!(bob_notes.len(), 1);
    assert!(store.visible_to(ada.user().id()).await.expect("notes").is_empty());
}

#[rstest]
#[case(0.0)]
#[case(-10.0)]
#[case(1000.5)]
#[tokio::test]
async fn rejected_transfers_leave_balances_alone(store: InMemoryStore, #[case] amount: f64) {
    let ada = register(&store, "ada", "Ada").await;
    let bob = register(&store, "bob", "Bob").await;

    let order = TransferOrder::new(&ada, bob.user().id(), amount);
    let outcome = store.transfer(&order).await.expect("transfer");

    assert!(matches!(outcome, TransferOutcome::Rejected(_)));
    assert_eq!(balance(&store, ada.user().id()).await, 1000.0);
    assert_eq!(balance(&store, bob.user().id()).await, 1000.0);
    assert!(store.visible_to(bob.user().id()).await.expect("notes").is_empty());
}

#[rstest]
#[tokio::test]
async fn transfer_to_unknown_user_is_rejected(store: InMemoryStore) {
    let ada = register(&store, "ada", "Ada").await;
    let order = TransferOrder::new(&ada, UserId::new(77), 5.0);

    assert_eq!(
        store.transfer(&order).await.expect("transfer"),
        TransferOutcome::Rejected(TransferRejection::UnknownTarget)
    );
    assert_eq!(balance(&store, ada.user().id()).await, 1000.0);
}

#[rstest]
#[tokio::test]
async fn purchase_settles_and_removes_listing(store: InMemoryStore) {
    let ada = register(&store, "ada", "Ada").await;
    let bob = register(&store, "bob", "Bob").await;
    let widget = list_for_sale(&store, &bob, "Widget", 100.0).await;

    let order = PurchaseOrder::new(&ada, widget.id());
    let outcome = store.purchase(&order).await.expect("purchase");

    assert_eq!(
        outcome,
        PurchaseOutcome::Completed {
            price: 100.0,
            seller_credited: true
        }
    );
    assert_eq!(balance(&store, ada.user().id()).await, 900.0);
    assert_eq!(balance(&store, bob.user().id()).await, 1100.0);
    assert!(ProductRepository::list(&store).await.expect("listings").is_empty());

    let again = store.purchase(&order).await.expect("second attempt");
    assert_eq!(
        again,
        PurchaseOutcome::Rejected(PurchaseRejection::ListingGone)
    );
    assert_eq!(balance(&store, ada.user().id()).await, 900.0);
}

#[rstest]
#[tokio::test]
async fn purchase_with_short_balance_keeps_listing(store: InMemoryStore) {
    let ada = register(&store, "ada", "Ada").await;
    let bob = register(&store, "bob", "Bob").await;
    let yacht = list_for_sale(&store, &bob, "Yacht", 5000.0).await;

    let outcome = store
        .purchase(&PurchaseOrder::new(&ada, yacht.id()))
        .await
        .expect("purchase");

    assert_eq!(
        outcome,
        PurchaseOutcome::Rejected(PurchaseRejection::InsufficientFunds)
    );
    assert_eq!(ProductRepository::list(&store).await.expect("listings").len(), 1);
    assert!(store.visible_to(bob.user().id()).await.expect("notes").is_empty());
}

#[rstest]
#[tokio::test]
async fn purchase_from_seller_without_account_burns_price(store: InMemoryStore) {
    let ada = register(&store, "ada", "Ada").await;
    let ghost = NewProduct {
        title: "Relic".to_owned(),
        price: 50.0,
        seller_name: "Ghost".to_owned(),
        contact: String::new(),
        seller_id: UserId::new(404),
    };
    let relic = store.create(&ghost).await.expect("listed");

    let outcome = store
        .purchase(&PurchaseOrder::new(&ada, relic.id()))
        .await
        .expect("purchase");

    assert_eq!(
        outcome,
        PurchaseOutcome::Completed {
            price: 50.0,
            seller_credited: false
        }
    );
    assert_eq!(balance(&store, ada.user().id()).await, 950.0);
    assert!(ProductRepository::list(&store).await.expect("listings").is_empty());
    assert!(store.visible_to(UserId::new(404)).await.expect("notes").is_empty());
}

#[rstest]
#[tokio::test]
async fn credit_touches_only_the_target(store: InMemoryStore) {
    let ada = register(&store, "ada", "Ada").await;
    let bob = register(&store, "bob", "Bob").await;

    let outcome = store.credit(bob.user().id(), 250.0).await.expect("credit");
    assert_eq!(outcome, CreditOutcome::Credited { balance: 1250.0 });
    assert_eq!(balance(&store, ada.user().id()).await, 1000.0);
    assert!(store.visible_to(bob.user().id()).await.expect("notes").is_empty());

    let missing = store.credit(UserId::new(99), 250.0).await.expect("credit");
    assert_eq!(missing, CreditOutcome::UnknownAccount);
}

#[rstest]
#[tokio::test]
async fn promote_is_sticky_and_reports_unknown_users(store: InMemoryStore) {
    register(&store, "ada", "Ada").await;
    let bob = register(&store, "bob", "Bob").await;

    assert!(store.promote(bob.user().id()).await.expect("promote"));
    assert!(store.promote(bob.user().id()).await.expect("promote again"));
    assert!(!store.promote(UserId::new(99)).await.expect("unknown"));
    let reloaded = store
        .find_by_id(bob.user().id())
        .await
        .expect("lookup")
        .expect("user");
    assert!(reloaded.is_admin());
}

#[rstest]
#[tokio::test]
async fn broadcasts_reach_everyone(store: InMemoryStore) {
    let ada = register(&store, "ada", "Ada").await;
    let bob = register(&store, "bob", "Bob").await;
    store
        .post(&NewNotification::broadcast("Market day"))
        .await
        .expect("posted");
    store
        .post(&NewNotification::personal(ada.user().id(), "For Ada"))
        .await
        .expect("posted");

    let for_bob = store.visible_to(bob.user().id()).await.expect("notes");
    let for_ada = store.visible_to(ada.user().id()).await.expect("notes");
    assert_eq!(for_bob.len(), 1);
    assert_eq!(for_ada.len(), 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_transfers_conserve_total_balance() {
    let store = Arc::new(InMemoryStore::default());
    let ada = register(&store, "ada", "Ada").await;
    let bob = register(&store, "bob", "Bob").await;

    let mut handles = Vec::new();
    for round in 0..40 {
        let store = Arc::clone(&store);
        let (from, to) = if round % 2 == 0 {
            (ada.clone(), bob.user().id())
        } else {
            (bob.clone(), ada.user().id())
        };
        handles.push(tokio::spawn(async move {
            store
                .transfer(&TransferOrder::new(&from, to, 75.0))
                .await
                .expect("transfer")
        }));
    }
    for handle in handles {
        handle.await.expect("task");
    }

    let total = balance(&store, ada.user().id()).await + balance(&store, bob.user().id()).await;
    assert_eq!(total, 2000.0);
    assert!(balance(&store, ada.user().id()).await >= 0.0);
    assert!(balance(&store, bob.user().id()).await >= 0.0);
}
