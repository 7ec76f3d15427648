//! Marketplace listings.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Identity, ProductId, UserId};

/// Maximum length accepted for listing titles and contact strings.
pub const LISTING_TEXT_MAX: usize = 100;

/// Validation errors for listing input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListingValidationError {
    /// Title exceeded [`LISTING_TEXT_MAX`].
    #[error("title must be at most {max} characters")]
    TitleTooLong { max: usize },
    /// Contact exceeded [`LISTING_TEXT_MAX`].
    #[error("contact must be at most {max} characters")]
    ContactTooLong { max: usize },
}

/// Item currently for sale.
///
/// Existence implies the item is still available; a purchase deletes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[schema(value_type = i32)]
    id: ProductId,
    title: String,
    price: f64,
    seller_name: String,
    contact: String,
    #[schema(value_type = i32)]
    seller_id: UserId,
}

impl Product {
    /// Snapshot a stored listing.
    pub fn new(id: ProductId, listing: NewProduct) -> Self {
        let NewProduct {
            title,
            price,
            seller_name,
            contact,
            seller_id,
        } = listing;
        Self {
            id,
            title,
            price,
            seller_name,
            contact,
            seller_id,
        }
    }

    /// Listing key.
    pub fn id(&self) -> ProductId {
        self.id
    }

    /// Listing title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Asking price.
    pub fn price(&self) -> f64 {
        self.price
    }

    /// Seller display name captured at listing time.
    pub fn seller_name(&self) -> &str {
        &self.seller_name
    }

    /// Free-form seller contact string.
    pub fn contact(&self) -> &str {
        &self.contact
    }

    /// Seller user key.
    pub fn seller_id(&self) -> UserId {
        self.seller_id
    }
}

/// Seller-supplied listing details.
///
/// Prices are not range-checked: zero or negative prices are accepted as
/// given.
#[derive(Debug, Clone, PartialEq)]
pub struct NewListing {
    title: String,
    price: f64,
    contact: String,
}

impl NewListing {
    /// Validate the free-text fields of a listing.
    pub fn new(
        title: impl Into<String>,
        price: f64,
        contact: impl Into<String>,
    ) -> Result<Self, ListingValidationError> {
        let title = title.into();
        let contact = contact.into();
        if title.chars().count() > LISTING_TEXT_MAX {
            return Err(ListingValidationError::TitleTooLong {
                max: LISTING_TEXT_MAX,
            });
        }
        if contact.chars().count() > LISTING_TEXT_MAX {
            return Err(ListingValidationError::ContactTooLong {
                max: LISTING_TEXT_MAX,
            });
        }
        Ok(Self {
            title,
            price,
            contact,
        })
    }

    /// Attach the seller identity taken from the session, never from input.
    pub fn listed_by(self, seller: &Identity) -> NewProduct {
        NewProduct {
            title: self.title,
            price: self.price,
            seller_name: seller.user().display_name().to_string(),
            contact: self.contact,
            seller_id: seller.user().id(),
        }
    }
}

/// Listing ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    /// Listing title.
    pub title: String,
    /// Asking price.
    pub price: f64,
    /// Seller display name.
    pub seller_name: String,
    /// Seller contact string.
    pub contact: String,
    /// Seller user key.
    pub seller_id: UserId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Account, AccountId, User};
    use rstest::rstest;

    fn seller() -> Identity {
        let user = User::try_from_strings(UserId::new(9), "bob", "Bob", false).expect("user");
        Identity::new(user, Account::new(AccountId::new(9), UserId::new(9), 10.0))
    }

    #[rstest]
    fn seller_identity_comes_from_session() {
        let listing = NewListing::new("Widget", 100.0, "bob@example.com").expect("listing");
        let product = listing.listed_by(&seller());
        assert_eq!(product.seller_id, UserId::new(9));
        assert_eq!(product.seller_name, "Bob");
    }

    #[rstest]
    fn accepts_non_positive_prices() {
        assert!(NewListing::new("Freebie", 0.0, "").is_ok());
        assert!(NewListing::new("Rebate", -5.0, "").is_ok());
    }

    #[rstest]
    fn rejects_overlong_title() {
        let err = NewListing::new("x".repeat(LISTING_TEXT_MAX + 1), 1.0, "")
            .expect_err("too long");
        assert_eq!(
            err,
            ListingValidationError::TitleTooLong {
                max: LISTING_TEXT_MAX
            }
        );
    }
}
