//! Form values and the rules they must satisfy before submission
//!
//! Rules are declared with `validator` attributes; [`Validate::validate`]
//! reports at most one message per field, in form order.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use validator::ValidationError;

pub const MIN_PASSWORD_LEN: usize = 8;

/// One rejected field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every field that failed, in form order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// Pick one message per failed field, walking `fields` in form order.
    ///
    /// A missing value outranks every other rule on the same field.
    fn from_rules(fields: &[&'static str], failed: &validator::ValidationErrors) -> Self {
        let by_field = failed.field_errors();
        let errors = fields
            .iter()
            .filter_map(|field| {
                let rejected = by_field.get(*field)?;
                let error = rejected.iter().min_by_key(|e| rank(&e.code))?;
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| error.code.to_string());
                Some(FieldError {
                    field: *field,
                    message,
                })
            })
            .collect();
        Self { errors }
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Message for `field`, if it failed.
    pub fn message(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn first(&self) -> Option<&FieldError> {
        self.errors.first()
    }
}

fn rank(code: &str) -> u8 {
    match code {
        "length" => 0,
        "password_length" => 1,
        _ => 2,
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.errors.iter().map(|e| e.message.as_str()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Forms that can check themselves.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// A form whose rules are declared with `validator` attributes.
pub trait FormRules: validator::Validate {
    /// Field names in the order the form presents them.
    const FIELDS: &'static [&'static str];
}

impl<T: FormRules> Validate for T {
    fn validate(&self) -> Result<(), ValidationErrors> {
        validator::Validate::validate(self)
            .map_err(|failed| ValidationErrors::from_rules(T::FIELDS, &failed))
    }
}

fn rejected(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

/// Blank passwords are reported by the required rule instead.
fn password_length(value: &str) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len == 0 || len >= MIN_PASSWORD_LEN {
        Ok(())
    } else {
        Err(rejected(
            "password_length",
            format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
        ))
    }
}

/// Text of an optional amount field.
trait AmountText {
    fn amount_text(&self) -> Option<&str>;
}

impl AmountText for String {
    fn amount_text(&self) -> Option<&str> {
        Some(self)
    }
}

impl<T: AmountText + ?Sized> AmountText for &T {
    fn amount_text(&self) -> Option<&str> {
        (**self).amount_text()
    }
}

impl AmountText for Option<String> {
    fn amount_text(&self) -> Option<&str> {
        self.as_deref()
    }
}

/// Absent or blank means "not given".
fn positive_amount<T: AmountText + ?Sized>(value: &T) -> Result<(), ValidationError> {
    let value = match value.amount_text().map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => return Ok(()),
    };
    match value.parse::<f64>() {
        Ok(amount) if amount > 0.0 => Ok(()),
        _ => Err(rejected("amount", "Please enter a valid amount")),
    }
}

/// Employer's new job posting (`POST jobs/create/`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, validator::Validate)]
pub struct JobPosting {
    #[validate(length(min = 1, message = "Company Number is required"))]
    pub company_number: String,
    #[validate(length(min = 1, message = "Company Name is required"))]
    pub company_name: String,
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Please enter a valid email address")
    )]
    pub company_email: String,
    #[validate(length(min = 1, message = "Website address is required"))]
    pub company_website: String,
    #[validate(length(min = 1, message = "Country is required"))]
    pub country: String,
    #[validate(length(min = 1, message = "state is a required field"))]
    pub state: String,
    #[validate(length(min = 1, message = "City is Required"))]
    pub city: String,
    #[validate(length(min = 1, message = "Title is Required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Please provide a job description"))]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_salary: Option<String>,
}

impl FormRules for JobPosting {
    const FIELDS: &'static [&'static str] = &[
        "company_number",
        "company_name",
        "company_email",
        "company_website",
        "country",
        "state",
        "city",
        "title",
        "description",
    ];
}

/// Job seeker profile edit (`PUT users/profile/`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, validator::Validate)]
pub struct ProfileUpdate {
    #[validate(length(min = 1, message = "First Name is required"))]
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Please enter a valid email address")
    )]
    pub email: String,
    #[validate(length(min = 1, message = "Country is required"))]
    pub country: String,
    #[validate(length(min = 1, message = "State is required"))]
    pub state: String,
    #[validate(length(min = 1, message = "City is Required"))]
    pub city: String,
    #[validate(length(min = 1, message = "Please provide a description of yourself"))]
    pub about: String,
    #[validate(length(min = 1, message = "Please provide your experience level"))]
    pub experience_level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "positive_amount"))]
    pub salary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_dev_role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cv: Option<String>,
}

impl FormRules for ProfileUpdate {
    const FIELDS: &'static [&'static str] = &[
        "first_name",
        "email",
        "country",
        "state",
        "city",
        "about",
        "experience_level",
        "salary",
    ];
}

/// Account registration (`POST auth/registration/`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, validator::Validate)]
pub struct SignupForm {
    #[validate(length(min = 1, message = "UserName is required"))]
    pub username: String,
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "email must be a valid email")
    )]
    pub email: String,
    #[validate(
        length(min = 1, message = "Password is required"),
        custom(function = "password_length")
    )]
    pub password1: String,
    #[validate(
        length(min = 1, message = "Confirm Password is required"),
        custom(function = "password_length"),
        must_match(other = "password1", message = "Password does not match")
    )]
    pub password2: String,
}

impl FormRules for SignupForm {
    const FIELDS: &'static [&'static str] = &["username", "email", "password1", "password2"];
}

/// Credentials for `POST auth/login/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, validator::Validate)]
pub struct LoginForm {
    #[validate(length(min = 1, message = "UserName is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl FormRules for LoginForm {
    const FIELDS: &'static [&'static str] = &["username", "password"];
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posting() -> JobPosting {
        JobPosting {
            company_number: "+234 800 000 0000".into(),
            company_name: "Acme".into(),
            company_email: "hr@acme.example".into(),
            company_website: "https://acme.example".into(),
            country: "Nigeria".into(),
            state: "Lagos".into(),
            city: "Ikeja".into(),
            title: "Engineer".into(),
            description: "Build things".into(),
            experience_level: None,
            expected_salary: None,
        }
    }

    #[test]
    fn complete_posting_passes() {
        assert!(posting().validate().is_ok());
    }

    #[test]
    fn posting_reports_every_missing_field() {
        let errors = JobPosting::default().validate().unwrap_err();
        assert_eq!(errors.len(), 9);
        assert_eq!(errors.first().map(|e| e.field), Some("company_number"));
        assert_eq!(errors.message("title"), Some("Title is Required"));
    }

    #[test]
    fn posting_rejects_bad_email() {
        let mut form = posting();
        form.company_email = "not-an-email".into();
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.message("company_email"),
            Some("Please enter a valid email address")
        );
    }

    #[test]
    fn signup_password_rules() {
        let mut form = SignupForm {
            username: "ada".into(),
            email: "ada@example.com".into(),
            password1: "short".into(),
            password2: "short".into(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.message("password1"),
            Some("Password must be at least 8 characters")
        );

        form.password1 = "correct horse".into();
        form.password2 = "battery staple".into();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.message("password2"), Some("Password does not match"));

        form.password2 = "correct horse".into();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn blank_fields_report_required_before_other_rules() {
        let form = SignupForm {
            username: "ada".into(),
            email: String::new(),
            password1: String::new(),
            password2: "short".into(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.message("email"), Some("Email is required"));
        assert_eq!(errors.message("password1"), Some("Password is required"));
        assert_eq!(
            errors.message("password2"),
            Some("Password must be at least 8 characters")
        );
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, ["email", "password1", "password2"]);
    }

    #[test]
    fn profile_salary_must_be_positive() {
        let mut form = ProfileUpdate {
            first_name: "Ada".into(),
            last_name: None,
            email: "ada@example.com".into(),
            country: "UK".into(),
            state: "London".into(),
            city: "London".into(),
            about: "Engineer".into(),
            experience_level: "Senior".into(),
            salary: Some("-5".into()),
            ..Default::default()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.message("salary"), Some("Please enter a valid amount"));

        form.salary = Some("".into());
        assert!(form.validate().is_ok());
        form.salary = Some("120000".into());
        assert!(form.validate().is_ok());
    }

    #[test]
    fn display_joins_messages() {
        let errors = LoginForm::default().validate().unwrap_err();
        assert_eq!(
            errors.to_string(),
            "UserName is required; Password is required"
        );
    }
}
