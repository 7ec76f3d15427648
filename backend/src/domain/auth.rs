//! Authentication primitives: login credentials and registration requests.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.
//! Passwords are compared verbatim by the persistence adapters; they are
//! zeroised on drop but otherwise opaque.

use zeroize::Zeroizing;

use super::{DisplayName, LoginId, UserValidationError};

/// Domain error returned when login or registration values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsValidationError {
    /// Login identifier failed validation.
    #[error(transparent)]
    LoginId(UserValidationError),
    /// Display name failed validation.
    #[error(transparent)]
    DisplayName(UserValidationError),
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

fn password_from(raw: &str) -> Result<Zeroizing<String>, CredentialsValidationError> {
    if raw.is_empty() {
        return Err(CredentialsValidationError::EmptyPassword);
    }
    Ok(Zeroizing::new(raw.to_owned()))
}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `login_id` is trimmed and must not be empty after trimming.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
///
/// # Examples
/// ```
/// use bazaar::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("ada", "s3cret").unwrap();
/// assert_eq!(creds.login_id().as_ref(), "ada");
/// assert_eq!(creds.password(), "s3cret");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    login_id: LoginId,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw login/password inputs.
    pub fn try_from_parts(login_id: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        let login_id = LoginId::new(login_id).map_err(CredentialsValidationError::LoginId)?;
        let password = password_from(password)?;
        Ok(Self { login_id, password })
    }

    /// Login identifier suitable for user lookups.
    pub fn login_id(&self) -> &LoginId {
        &self.login_id
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    login_id: LoginId,
    display_name: DisplayName,
    password: Zeroizing<String>,
}

impl Registration {
    /// Construct a registration from raw form values.
    ///
    /// # Examples
    /// ```
    /// use bazaar::domain::Registration;
    ///
    /// let registration = Registration::try_from_parts("ada", "Ada Lovelace", "pw").unwrap();
    /// assert_eq!(registration.display_name().as_ref(), "Ada Lovelace");
    /// ```
    pub fn try_from_parts(
        login_id: &str,
        display_name: &str,
        password: &str,
    ) -> Result<Self, CredentialsValidationError> {
        Ok(Self {
            login_id: LoginId::new(login_id).map_err(CredentialsValidationError::LoginId)?,
            display_name: DisplayName::new(display_name)
                .map_err(CredentialsValidationError::DisplayName)?,
            password: password_from(password)?,
        })
    }

    /// Requested login identifier.
    pub fn login_id(&self) -> &LoginId {
        &self.login_id
    }

    /// Requested display name.
    pub fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    /// Password to store.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", CredentialsValidationError::LoginId(UserValidationError::EmptyLoginId))]
    #[case("   ", "pw", CredentialsValidationError::LoginId(UserValidationError::EmptyLoginId))]
    #[case("ada", "", CredentialsValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] login_id: &str,
        #[case] password: &str,
        #[case] expected: CredentialsValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(login_id, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("  ada  ", " secret ")]
    #[case("grace", "correct horse battery staple")]
    fn valid_credentials_trim_login_only(#[case] login_id: &str, #[case] password: &str) {
        let creds = LoginCredentials::try_from_parts(login_id, password)
            .expect("valid inputs should succeed");
        assert_eq!(creds.login_id().as_ref(), login_id.trim());
        assert_eq!(creds.password(), password);
    }

    #[rstest]
    fn registration_keeps_long_passwords_intact() {
        let password = "p".repeat(4096);
        let registration =
            Registration::try_from_parts("ada", "Ada", &password).expect("no password cap");
        assert_eq!(registration.password(), password);
    }

    #[rstest]
    fn registration_requires_display_name() {
        let err = Registration::try_from_parts("ada", "  ", "pw").expect_err("blank name");
        assert_eq!(
            err,
            CredentialsValidationError::DisplayName(UserValidationError::EmptyDisplayName)
        );
    }
}
