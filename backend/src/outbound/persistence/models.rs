//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain types live here so
//! every repository validates rows the same way.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::{
    Account, AccountId, NewProduct, Notification, NotificationId, Product, ProductId, User,
    UserId, UserValidationError,
};

use super::schema::{accounts, notifications, products, users};

/// Row struct for reading from the users table. The password is never selected.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i32,
    pub login_id: String,
    pub display_name: String,
    pub is_admin: bool,
}

impl UserRow {
    pub(crate) fn into_domain(self) -> Result<User, UserValidationError> {
        User::try_from_strings(
            UserId::new(self.id),
            &self.login_id,
            &self.display_name,
            self.is_admin,
        )
    }
}

/// Insertable struct for creating user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub login_id: &'a str,
    pub password: &'a str,
    pub display_name: &'a str,
    pub is_admin: bool,
}

/// Row struct for reading from the accounts table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AccountRow {
    pub id: i32,
    pub user_id: i32,
    pub balance: f64,
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Account::new(
            AccountId::new(row.id),
            UserId::new(row.user_id),
            row.balance,
        )
    }
}

/// Insertable struct for creating account records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = accounts)]
pub(crate) struct NewAccountRow {
    pub user_id: i32,
    pub balance: f64,
}

/// Row struct for reading from the products table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProductRow {
    pub id: i32,
    pub title: String,
    pub price: f64,
    pub seller_name: String,
    pub contact: String,
    pub seller_id: i32,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product::new(
            ProductId::new(row.id),
            NewProduct {
                title: row.title,
                price: row.price,
                seller_name: row.seller_name,
                contact: row.contact,
                seller_id: UserId::new(row.seller_id),
            },
        )
    }
}

/// Insertable struct for creating listings.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = products)]
pub(crate) struct NewProductRow<'a> {
    pub title: &'a str,
    pub price: f64,
    pub seller_name: &'a str,
    pub contact: &'a str,
    pub seller_id: i32,
}

impl<'a> From<&'a NewProduct> for NewProductRow<'a> {
    fn from(product: &'a NewProduct) -> Self {
        Self {
            title: &product.title,
            price: product.price,
            seller_name: &product.seller_name,
            contact: &product.contact,
            seller_id: product.seller_id.get(),
        }
    }
}

/// Row struct for reading from the notifications table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct NotificationRow {
    pub id: i32,
    pub message: String,
    pub user_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl From<NotificationRow> for Notification {
    fn from(row: NotificationRow) -> Self {
        Notification::new(
            NotificationId::new(row.id),
            row.message,
            row.user_id.map(UserId::new),
            row.created_at,
        )
    }
}

/// Insertable struct for appending notifications.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = notifications)]
pub(crate) struct NewNotificationRow<'a> {
    pub message: &'a str,
    pub user_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}
