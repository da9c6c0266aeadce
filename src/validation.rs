//! Structural checks on untrusted payloads. Nothing here touches storage.

use validator::{Validate, ValidationErrors};

use crate::{
    error::{AppError, AppResult},
    models::{
        CreateMessageRequest, CreateRoomRequest, LoginRequest, RegisterRequest, UpdateRoomRequest,
    },
};

/// A request payload with a declared field order and a normalisation step.
pub trait Schema: Validate + Sized {
    /// `(field, label)` in declaration order; the first failing field is reported.
    const FIELDS: &'static [(&'static str, &'static str)];

    fn normalize(self) -> Self;

    /// Required fields left empty (absent fields deserialize as empty).
    fn missing(&self) -> Vec<&'static str> {
        Vec::new()
    }

    /// Whole-document rules the field validators can't express.
    fn check_document(&self) -> AppResult<()> {
        Ok(())
    }
}

/// Normalises then validates `payload`, stopping at the first violation.
pub fn validate<T: Schema>(payload: T) -> AppResult<T> {
    let payload = payload.normalize();
    let missing = payload.missing();
    let errors = payload.validate().err();

    if !missing.is_empty() || errors.is_some() {
        return Err(AppError::InvalidInput(first_violation(
            T::FIELDS,
            &missing,
            errors.as_ref(),
        )));
    }
    payload.check_document()?;
    Ok(payload)
}

fn first_violation(
    fields: &[(&str, &str)],
    missing: &[&str],
    errors: Option<&ValidationErrors>,
) -> String {
    let field_errors = errors.map(ValidationErrors::field_errors).unwrap_or_default();
    let describe = |err: &validator::ValidationError| match &err.message {
        Some(message) => message.to_string(),
        None => format!("Invalid value ({}).", err.code),
    };

    for (field, label) in fields {
        if missing.contains(field) {
            return format!("{label} is required.");
        }
        if let Some(err) = field_errors.get(*field).and_then(|errs| errs.first()) {
            return describe(err);
        }
    }

    field_errors
        .values()
        .flat_map(|errs| errs.iter())
        .map(describe)
        .next()
        .unwrap_or_else(|| "Invalid input.".to_string())
}

/// Names of the fields in `values` that are empty.
fn empty_fields(values: &[(&'static str, &str)]) -> Vec<&'static str> {
    values
        .iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| *field)
        .collect()
}

fn trimmed(value: String) -> String {
    value.trim().to_string()
}

impl Schema for RegisterRequest {
    const FIELDS: &'static [(&'static str, &'static str)] = &[
        ("username", "Username"),
        ("email", "Email"),
        ("password", "Password"),
    ];

    fn normalize(self) -> Self {
        Self {
            username: trimmed(self.username),
            email: trimmed(self.email).to_lowercase(),
            password: self.password,
        }
    }

    fn missing(&self) -> Vec<&'static str> {
        empty_fields(&[
            ("username", self.username.as_str()),
            ("email", self.email.as_str()),
            ("password", self.password.as_str()),
        ])
    }
}

impl Schema for LoginRequest {
    const FIELDS: &'static [(&'static str, &'static str)] =
        &[("email", "Email"), ("password", "Password")];

    fn normalize(self) -> Self {
        Self {
            email: trimmed(self.email).to_lowercase(),
            password: self.password,
        }
    }

    fn missing(&self) -> Vec<&'static str> {
        empty_fields(&[("email", self.email.as_str()), ("password", self.password.as_str())])
    }
}

impl Schema for CreateRoomRequest {
    const FIELDS: &'static [(&'static str, &'static str)] =
        &[("name", "Room name"), ("description", "Room description")];

    fn normalize(self) -> Self {
        Self {
            name: trimmed(self.name),
            description: trimmed(self.description),
        }
    }

    fn missing(&self) -> Vec<&'static str> {
        empty_fields(&[
            ("name", self.name.as_str()),
            ("description", self.description.as_str()),
        ])
    }
}

impl Schema for UpdateRoomRequest {
    const FIELDS: &'static [(&'static str, &'static str)] =
        &[("name", "Room name"), ("description", "Room description")];

    fn normalize(self) -> Self {
        Self {
            name: self.name.map(trimmed),
            description: self.description.map(trimmed),
        }
    }

    fn check_document(&self) -> AppResult<()> {
        if self.name.is_none() && self.description.is_none() {
            return Err(AppError::InvalidInput(
                "At least one field (name or description) must be provided for update."
                    .to_string(),
            ));
        }
        Ok(())
    }
}

impl Schema for CreateMessageRequest {
    const FIELDS: &'static [(&'static str, &'static str)] = &[("content", "Message content")];

    fn normalize(self) -> Self {
        Self {
            content: trimmed(self.content),
        }
    }

    fn missing(&self) -> Vec<&'static str> {
        empty_fields(&[("content", self.content.as_str())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(err: AppError) -> String {
        match err {
            AppError::InvalidInput(message) => message,
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    fn register(username: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn register_normalizes_before_checking() {
        let req = validate(register("  alice ", " Alice@Example.COM ", "hunter22")).unwrap();
        assert_eq!(req.username, "alice");
        assert_eq!(req.email, "alice@example.com");
        assert_eq!(req.password, "hunter22");
    }

    #[test]
    fn first_field_in_declaration_order_wins() {
        let err = validate(register("al", "nope", "123")).unwrap_err();
        assert_eq!(
            message(err),
            "Username must be between 3 and 30 characters long."
        );

        let err = validate(register("alice", "nope", "123")).unwrap_err();
        assert_eq!(message(err), "Please enter a valid email address.");

        let err = validate(register("alice", "a@b.io", "123")).unwrap_err();
        assert_eq!(message(err), "Password must be at least 6 characters long.");
    }

    #[test]
    fn absent_and_too_short_read_differently() {
        let err = validate(register("", "a@b.io", "secret")).unwrap_err();
        assert_eq!(message(err), "Username is required.");

        let err = validate(register("   ", "a@b.io", "secret")).unwrap_err();
        assert_eq!(message(err), "Username is required.");

        let err = validate(register("ab", "a@b.io", "secret")).unwrap_err();
        assert_eq!(
            message(err),
            "Username must be between 3 and 30 characters long."
        );
    }

    #[test]
    fn missing_field_keeps_declaration_order() {
        let err = validate(register("al", "", "")).unwrap_err();
        assert_eq!(
            message(err),
            "Username must be between 3 and 30 characters long."
        );

        let err = validate(register("alice", "", "123")).unwrap_err();
        assert_eq!(message(err), "Email is required.");

        let err = validate(CreateRoomRequest {
            name: "general".to_string(),
            description: String::new(),
        })
        .unwrap_err();
        assert_eq!(message(err), "Room description is required.");
    }

    #[test]
    fn username_upper_bound() {
        assert!(validate(register(&"a".repeat(30), "a@b.io", "secret")).is_ok());
        assert!(validate(register(&"a".repeat(31), "a@b.io", "secret")).is_err());
    }

    #[test]
    fn login_requires_password() {
        let err = validate(LoginRequest {
            email: "a@b.io".to_string(),
            password: String::new(),
        })
        .unwrap_err();
        assert_eq!(message(err), "Password is required.");
    }

    #[test]
    fn room_bounds() {
        let ok = CreateRoomRequest {
            name: "general".to_string(),
            description: "a place to talk".to_string(),
        };
        assert!(validate(ok.clone()).is_ok());

        let short_desc = CreateRoomRequest {
            description: "too short".to_string(),
            ..ok.clone()
        };
        assert_eq!(
            message(validate(short_desc).unwrap_err()),
            "Room description must be between 10 and 200 characters long."
        );

        let padded_name = CreateRoomRequest {
            name: "  ab   ".to_string(),
            ..ok
        };
        assert!(validate(padded_name).is_err());
    }

    #[test]
    fn partial_update_needs_a_field() {
        let err = validate(UpdateRoomRequest::default()).unwrap_err();
        assert_eq!(
            message(err),
            "At least one field (name or description) must be provided for update."
        );

        let only_name = UpdateRoomRequest {
            name: Some(" lounge ".to_string()),
            description: None,
        };
        assert_eq!(validate(only_name).unwrap().name.as_deref(), Some("lounge"));

        let bad_name = UpdateRoomRequest {
            name: Some("x".to_string()),
            description: None,
        };
        assert!(validate(bad_name).is_err());
    }

    #[test]
    fn message_content_is_trimmed_and_bounded() {
        let blank = CreateMessageRequest {
            content: "   ".to_string(),
        };
        assert_eq!(
            message(validate(blank).unwrap_err()),
            "Message content is required."
        );

        let max = CreateMessageRequest {
            content: "é".repeat(500),
        };
        assert!(validate(max).is_ok());

        let over = CreateMessageRequest {
            content: "x".repeat(501),
        };
        assert!(validate(over).is_err());

        let padded = CreateMessageRequest {
            content: "  hi  ".to_string(),
        };
        assert_eq!(validate(padded).unwrap().content, "hi");
    }
}
