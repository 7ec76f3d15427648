//! Form bodies accepted by the page handlers and their typed commands.
//!
//! Every field is optional at the wire level so a missing value surfaces as a
//! field-level `invalid_request` error instead of an opaque extractor failure.

use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{
    CredentialsValidationError, Error, ListingValidationError, LoginCredentials, NewListing,
    ProductId, Registration, UserId,
};

use super::validation::{
    FieldName, parse_amount, parse_amount_or_zero, parse_key, require, unknown_action_error,
};

const ACTION: FieldName = FieldName::new("action");
const TITLE: FieldName = FieldName::new("title");
const PRICE: FieldName = FieldName::new("price");
const CONTACT: FieldName = FieldName::new("contact");
const PRODUCT_ID: FieldName = FieldName::new("product_id");
const TARGET_ID: FieldName = FieldName::new("target_id");
const AMOUNT: FieldName = FieldName::new("amount");
const NEWS_TEXT: FieldName = FieldName::new("news_text");
const USER_ID: FieldName = FieldName::new("user_id");

/// `POST /login` body.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct LoginForm {
    pub login_id: Option<String>,
    pub password: Option<String>,
}

impl LoginForm {
    /// Credentials to check; blank values fail validation.
    pub fn credentials(&self) -> Result<LoginCredentials, CredentialsValidationError> {
        LoginCredentials::try_from_parts(
            self.login_id.as_deref().unwrap_or_default(),
            self.password.as_deref().unwrap_or_default(),
        )
    }
}

/// `POST /register` body.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RegisterForm {
    pub login_id: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
}

impl TryFrom<RegisterForm> for Registration {
    type Error = Error;

    fn try_from(form: RegisterForm) -> Result<Self, Self::Error> {
        Registration::try_from_parts(
            form.login_id.as_deref().unwrap_or_default(),
            form.name.as_deref().unwrap_or_default(),
            form.password.as_deref().unwrap_or_default(),
        )
        .map_err(map_credentials_error)
    }
}

fn map_credentials_error(err: CredentialsValidationError) -> Error {
    let field = match &err {
        CredentialsValidationError::LoginId(_) => "login_id",
        CredentialsValidationError::DisplayName(_) => "name",
        CredentialsValidationError::EmptyPassword => "password",
    };
    Error::invalid_request(err.to_string()).with_details(json!({
        "field": field,
        "code": "invalid_value",
    }))
}

fn map_listing_error(err: ListingValidationError) -> Error {
    let field = match &err {
        ListingValidationError::TitleTooLong { .. } => TITLE,
        ListingValidationError::ContactTooLong { .. } => CONTACT,
    };
    Error::invalid_request(err.to_string()).with_details(json!({
        "field": field.as_str(),
        "code": "too_long",
    }))
}

/// `POST /payments` body. `action` selects between selling and buying.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PaymentsForm {
    /// `sell` or `buy`.
    pub action: Option<String>,
    pub title: Option<String>,
    pub price: Option<String>,
    pub contact: Option<String>,
    pub product_id: Option<String>,
}

/// Marketplace action requested through [`PaymentsForm`].
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentsCommand {
    Sell(NewListing),
    Buy(ProductId),
}

impl TryFrom<PaymentsForm> for PaymentsCommand {
    type Error = Error;

    fn try_from(form: PaymentsForm) -> Result<Self, Self::Error> {
        let action = require(form.action, ACTION)?;
        match action.as_str() {
            "sell" => {
                let title = require(form.title, TITLE)?;
                let price = parse_amount(&require(form.price, PRICE)?, PRICE)?;
                let contact = require(form.contact, CONTACT)?;
                NewListing::new(title, price, contact)
                    .map(Self::Sell)
                    .map_err(map_listing_error)
            }
            "buy" => parse_key(form.product_id, PRODUCT_ID).map(Self::Buy),
            other => Err(unknown_action_error(ACTION, other)),
        }
    }
}

/// `POST /transfers` body.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct TransferForm {
    pub target_id: Option<String>,
    /// Decimal amount; treated as zero when absent.
    pub amount: Option<String>,
}

/// Transfer requested through [`TransferForm`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransferCommand {
    pub target: UserId,
    pub amount: f64,
}

impl TryFrom<TransferForm> for TransferCommand {
    type Error = Error;

    fn try_from(form: TransferForm) -> Result<Self, Self::Error> {
        let amount = parse_amount_or_zero(form.amount.as_deref(), AMOUNT)?;
        let target = parse_key(form.target_id, TARGET_ID)?;
        Ok(Self { target, amount })
    }
}

/// `POST /admin` body.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct AdminForm {
    /// `post_news`, `add_money` or `make_admin`.
    pub action: Option<String>,
    pub news_text: Option<String>,
    pub user_id: Option<String>,
    pub amount: Option<String>,
}

/// Administrator action requested through [`AdminForm`].
#[derive(Debug, Clone, PartialEq)]
pub enum AdminCommand {
    PostNews(String),
    AddMoney { user: UserId, amount: f64 },
    MakeAdmin(UserId),
}

impl TryFrom<AdminForm> for AdminCommand {
    type Error = Error;

    fn try_from(form: AdminForm) -> Result<Self, Self::Error> {
        let action = require(form.action, ACTION)?;
        match action.as_str() {
            "post_news" => require(form.news_text, NEWS_TEXT).map(Self::PostNews),
            "add_money" => Ok(Self::AddMoney {
                user: parse_key(form.user_id, USER_ID)?,
                amount: parse_amount_or_zero(form.amount.as_deref(), AMOUNT)?,
            }),
            "make_admin" => parse_key(form.user_id, USER_ID).map(Self::MakeAdmin),
            other => Err(unknown_action_error(ACTION, other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    fn field_of(err: &Error) -> String {
        err.details()
            .and_then(|details| details.get("field"))
            .and_then(serde_json::Value::as_str)
            .expect("field detail")
            .to_owned()
    }

    #[rstest]
    fn sell_builds_a_listing() {
        let form = PaymentsForm {
            action: Some("sell".into()),
            title: Some("Widget".into()),
            price: Some("100".into()),
            contact: Some("b@example.com".into()),
            product_id: None,
        };
        let expected = NewListing::new("Widget", 100.0, "b@example.com").expect("listing");
        assert_eq!(
            PaymentsCommand::try_from(form).expect("sell command"),
            PaymentsCommand::Sell(expected)
        );
    }

    #[rstest]
    fn buy_reads_the_product_key() {
        let form = PaymentsForm {
            action: Some("buy".into()),
            product_id: Some("3".into()),
            ..PaymentsForm::default()
        };
        assert_eq!(
            PaymentsCommand::try_from(form).expect("buy command"),
            PaymentsCommand::Buy(ProductId::new(3))
        );
    }

    #[rstest]
    #[case(PaymentsForm { action: Some("sell".into()), title: Some("Widget".into()), price: Some("cheap".into()), contact: Some("c".into()), product_id: None }, "price")]
    #[case(PaymentsForm { action: Some("sell".into()), price: Some("1".into()), contact: Some("c".into()), ..PaymentsForm::default() }, "title")]
    #[case(PaymentsForm { action: Some("sell".into()), title: Some("x".repeat(101)), price: Some("1".into()), contact: Some("c".into()), product_id: None }, "title")]
    #[case(PaymentsForm { action: Some("buy".into()), product_id: Some("one".into()), ..PaymentsForm::default() }, "product_id")]
    #[case(PaymentsForm { action: Some("barter".into()), ..PaymentsForm::default() }, "action")]
    #[case(PaymentsForm::default(), "action")]
    fn malformed_payments_forms_name_the_field(#[case] form: PaymentsForm, #[case] field: &str) {
        let err = PaymentsCommand::try_from(form).expect_err("invalid form");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(field_of(&err), field);
    }

    #[rstest]
    fn transfer_amount_defaults_to_zero() {
        let form = TransferForm {
            target_id: Some("2".into()),
            amount: None,
        };
        assert_eq!(
            TransferCommand::try_from(form).expect("transfer command"),
            TransferCommand {
                target: UserId::new(2),
                amount: 0.0
            }
        );
    }

    #[rstest]
    #[case(TransferForm { target_id: None, amount: Some("5".into()) }, "target_id")]
    #[case(TransferForm { target_id: Some("2".into()), amount: Some("lots".into()) }, "amount")]
    fn malformed_transfer_forms_name_the_field(#[case] form: TransferForm, #[case] field: &str) {
        let err = TransferCommand::try_from(form).expect_err("invalid form");
        assert_eq!(field_of(&err), field);
    }

    #[rstest]
    #[case(AdminForm { action: Some("post_news".into()), news_text: Some("Hello".into()), ..AdminForm::default() }, AdminCommand::PostNews("Hello".into()))]
    #[case(AdminForm { action: Some("add_money".into()), user_id: Some("4".into()), amount: Some("-50".into()), ..AdminForm::default() }, AdminCommand::AddMoney { user: UserId::new(4), amount: -50.0 })]
    #[case(AdminForm { action: Some("add_money".into()), user_id: Some("4".into()), ..AdminForm::default() }, AdminCommand::AddMoney { user: UserId::new(4), amount: 0.0 })]
    #[case(AdminForm { action: Some("make_admin".into()), user_id: Some("9".into()), ..AdminForm::default() }, AdminCommand::MakeAdmin(UserId::new(9)))]
    fn admin_forms_map_to_commands(#[case] form: AdminForm, #[case] expected: AdminCommand) {
        assert_eq!(AdminCommand::try_from(form).expect("admin command"), expected);
    }

    #[rstest]
    fn unknown_admin_actions_are_rejected() {
        let form = AdminForm {
            action: Some("delete_everything".into()),
            ..AdminForm::default()
        };
        let err = AdminCommand::try_from(form).expect_err("unknown action");
        assert_eq!(
            err.details().and_then(|d| d.get("code")).and_then(serde_json::Value::as_str),
            Some("unknown_action")
        );
    }

    #[rstest]
    #[case(RegisterForm { login_id: Some("  ".into()), name: Some("Ada".into()), password: Some("pw".into()) }, "login_id")]
    #[case(RegisterForm { login_id: Some("ada".into()), name: None, password: Some("pw".into()) }, "name")]
    #[case(RegisterForm { login_id: Some("ada".into()), name: Some("Ada".into()), password: Some(String::new()) }, "password")]
    fn blank_registration_fields_are_invalid(#[case] form: RegisterForm, #[case] field: &str) {
        let err = Registration::try_from(form).expect_err("invalid registration");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(field_of(&err), field);
    }

    #[rstest]
    fn blank_login_fields_fail_validation() {
        assert!(LoginForm::default().credentials().is_err());
    }
}
