//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. The
//! `diesel print-schema` command can regenerate them from a live database.

diesel::table! {
    /// Registered users.
    users (id) {
        /// Primary key assigned by the database.
        id -> Int4,
        /// Unique login identifier (max 50 characters).
        login_id -> Varchar,
        /// Password compared verbatim at login.
        password -> Text,
        /// Name shown to other users (max 100 characters).
        display_name -> Varchar,
        /// Administrator flag; never reset once set.
        is_admin -> Bool,
    }
}

diesel::table! {
    /// Balance-holding accounts, one per user in practice.
    accounts (id) {
        id -> Int4,
        user_id -> Int4,
        balance -> Float8,
    }
}

diesel::table! {
    /// Listings currently for sale.
    products (id) {
        id -> Int4,
        title -> Varchar,
        price -> Float8,
        seller_name -> Varchar,
        contact -> Varchar,
        /// Seller user key; not a foreign key.
        seller_id -> Int4,
    }
}

diesel::table! {
    /// Broadcast (`user_id IS NULL`) and personal notifications.
    notifications (id) {
        id -> Int4,
        message -> Varchar,
        user_id -> Nullable<Int4>,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(accounts -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(accounts, notifications, products, users);
