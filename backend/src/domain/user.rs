//! User data model.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::UserId;

/// Maximum allowed length for a login identifier.
pub const LOGIN_ID_MAX: usize = 50;
/// Maximum allowed length for a display name.
pub const DISPLAY_NAME_MAX: usize = 100;

/// Validation errors returned by the user value constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Login identifier was blank once trimmed.
    #[error("login id must not be empty")]
    EmptyLoginId,
    /// Login identifier exceeded [`LOGIN_ID_MAX`].
    #[error("login id must be at most {max} characters")]
    LoginIdTooLong { max: usize },
    /// Display name was blank once trimmed.
    #[error("display name must not be empty")]
    EmptyDisplayName,
    /// Display name exceeded [`DISPLAY_NAME_MAX`].
    #[error("display name must be at most {max} characters")]
    DisplayNameTooLong { max: usize },
}

/// Unique identifier a user types to log in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LoginId(String);

impl LoginId {
    /// Validate and construct a [`LoginId`], trimming surrounding whitespace.
    pub fn new(login_id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = login_id.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyLoginId);
        }
        if trimmed.chars().count() > LOGIN_ID_MAX {
            return Err(UserValidationError::LoginIdTooLong { max: LOGIN_ID_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for LoginId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for LoginId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<LoginId> for String {
    fn from(value: LoginId) -> Self {
        value.0
    }
}

impl TryFrom<String> for LoginId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Human readable display name for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// Validate and construct a [`DisplayName`], trimming surrounding whitespace.
    pub fn new(display_name: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = display_name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyDisplayName);
        }
        if trimmed.chars().count() > DISPLAY_NAME_MAX {
            return Err(UserValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Registered application user.
///
/// The password never appears here; it stays inside the persistence adapters
/// and the credential types in [`crate::domain::auth`].
///
/// ## Invariants
/// - `is_admin` is monotonic: nothing resets it to `false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[schema(value_type = i32, example = 1)]
    id: UserId,
    #[schema(value_type = String, example = "ada")]
    login_id: LoginId,
    #[schema(value_type = String, example = "Ada Lovelace")]
    display_name: DisplayName,
    is_admin: bool,
}

impl User {
    /// Build a user from validated parts.
    pub fn new(id: UserId, login_id: LoginId, display_name: DisplayName, is_admin: bool) -> Self {
        Self {
            id,
            login_id,
            display_name,
            is_admin,
        }
    }

    /// Build a user from raw strings, validating the login id and name.
    ///
    /// # Examples
    /// ```
    /// use bazaar::domain::{User, UserId};
    ///
    /// let user = User::try_from_strings(UserId::new(1), "ada", "Ada Lovelace", true).unwrap();
    /// assert!(user.is_admin());
    /// ```
    pub fn try_from_strings(
        id: UserId,
        login_id: &str,
        display_name: &str,
        is_admin: bool,
    ) -> Result<Self, UserValidationError> {
        Ok(Self::new(
            id,
            LoginId::new(login_id)?,
            DisplayName::new(display_name)?,
            is_admin,
        ))
    }

    /// Stable user key.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Login identifier.
    pub fn login_id(&self) -> &LoginId {
        &self.login_id
    }

    /// Name shown to other users.
    pub fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    /// Whether the user may use the admin console.
    pub fn is_admin(&self) -> bool {
        self.is_admin
    }
}

/// Decide the admin flag for a newly registered user.
///
/// The very first registrant becomes the administrator.
pub fn admin_on_registration(existing_users: i64) -> bool {
    existing_users == 0
}
