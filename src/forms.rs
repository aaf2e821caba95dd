//! Typed form payloads and their validators.
//!
//! Each form validates with explicit per-field checks and reports failures as
//! `validator::ValidationErrors`, which the error layer flattens into
//! field -> [messages] JSON. `spec()` describes the empty form (names,
//! required flags, widget hints) and is what the GET form endpoints serve in
//! place of rendered HTML.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use utoipa::ToSchema;
use validator::{ValidationError, ValidationErrors};

use crate::validators;

/// Maximum title length, matching the posts.title column.
pub const TITLE_MAX_LENGTH: usize = 200;

fn field_error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

/// One field of a form descriptor.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FieldSpec {
    pub name: &'static str,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    pub widget: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_text: Option<&'static str>,
}

/// Serializable description of an empty form.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FormSpec {
    pub form: &'static str,
    pub fields: Vec<FieldSpec>,
}

// ---------------------------------------------------------------------------
// PostForm
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PostForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl PostForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if !validators::validate_required(&self.title) {
            errors.add("title", field_error("required", "This field is required."));
        } else if self.title.chars().count() > TITLE_MAX_LENGTH {
            errors.add(
                "title",
                field_error(
                    "max_length",
                    format!(
                        "Ensure this value has at most {} characters.",
                        TITLE_MAX_LENGTH
                    ),
                ),
            );
        }

        if !validators::validate_required(&self.content) {
            errors.add("content", field_error("required", "This field is required."));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn spec() -> FormSpec {
        FormSpec {
            form: "post",
            fields: vec![
                FieldSpec {
                    name: "title",
                    required: true,
                    max_length: Some(TITLE_MAX_LENGTH),
                    widget: "text",
                    help_text: None,
                },
                FieldSpec {
                    name: "content",
                    required: true,
                    max_length: None,
                    widget: "textarea",
                    help_text: None,
                },
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// CommentForm
// ---------------------------------------------------------------------------

// No route serves this form yet; it is validated and described like the others
// so comment creation can be wired up without touching validation.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CommentForm {
    #[serde(default)]
    pub text: String,
}

impl CommentForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if !validators::validate_required(&self.text) {
            errors.add("text", field_error("required", "This field is required."));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn spec() -> FormSpec {
        FormSpec {
            form: "comment",
            fields: vec![FieldSpec {
                name: "text",
                required: true,
                max_length: None,
                widget: "textarea",
                help_text: None,
            }],
        }
    }
}

// ---------------------------------------------------------------------------
// RegisterForm
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password_confirm: String,
}

impl RegisterForm {
    /// Shape checks only. Username uniqueness needs the database and is
    /// reported through [`RegisterForm::username_taken`] by the handler.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if !validators::validate_required(&self.username) {
            errors.add("username", field_error("required", "This field is required."));
        } else if !validators::validate_username(&self.username) {
            errors.add(
                "username",
                field_error(
                    "invalid_username",
                    "Enter a valid username: 3-32 characters, letters, digits, - and _ only.",
                ),
            );
        }

        if !validators::validate_required(&self.password) {
            errors.add("password", field_error("required", "This field is required."));
        } else {
            for failure in validators::password_policy(&self.password, &self.username) {
                errors.add("password", field_error("password_policy", failure));
            }
        }

        if self.password_confirm != self.password {
            errors.add(
                "password_confirm",
                field_error(
                    "password_mismatch",
                    "The two password fields didn't match.",
                ),
            );
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Field error for a username that already has an account.
    pub fn username_taken() -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.add(
            "username",
            field_error(
                "unique",
                "A user with that username already exists.",
            ),
        );
        errors
    }

    pub fn spec() -> FormSpec {
        FormSpec {
            form: "register",
            fields: vec![
                FieldSpec {
                    name: "username",
                    required: true,
                    max_length: Some(32),
                    widget: "text",
                    help_text: Some("3-32 characters. Letters, digits, - and _ only."),
                },
                FieldSpec {
                    name: "password",
                    required: true,
                    max_length: None,
                    widget: "password",
                    help_text: Some("At least 8 characters. Not entirely numeric."),
                },
                FieldSpec {
                    name: "password_confirm",
                    required: true,
                    max_length: None,
                    widget: "password",
                    help_text: Some("Enter the same password as before, for verification."),
                },
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// LoginForm
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if !validators::validate_required(&self.username) {
            errors.add("username", field_error("required", "This field is required."));
        }
        if !validators::validate_required(&self.password) {
            errors.add("password", field_error("required", "This field is required."));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn spec() -> FormSpec {
        FormSpec {
            form: "login",
            fields: vec![
                FieldSpec {
                    name: "username",
                    required: true,
                    max_length: Some(32),
                    widget: "text",
                    help_text: None,
                },
                FieldSpec {
                    name: "password",
                    required: true,
                    max_length: None,
                    widget: "password",
                    help_text: None,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages_for(errors: &ValidationErrors, field: &str) -> Vec<String> {
        errors
            .field_errors()
            .get(field)
            .map(|errs| {
                errs.iter()
                    .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                    .collect()
            })
            .unwrap_or_default()
    }

    #[test]
    fn test_post_form_valid() {
        let form = PostForm {
            title: "A title".to_string(),
            content: "Some content".to_string(),
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_post_form_empty_title_invalid_regardless_of_content() {
        let form = PostForm {
            title: "".to_string(),
            content: "Plenty of content here".to_string(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(
            messages_for(&errors, "title"),
            vec!["This field is required."]
        );

        let form = PostForm {
            title: "   ".to_string(),
            content: "Whitespace title is still empty".to_string(),
        };
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_post_form_title_max_length() {
        let form = PostForm {
            title: "t".repeat(TITLE_MAX_LENGTH + 1),
            content: "Content".to_string(),
        };
        let errors = form.validate().unwrap_err();
        assert!(messages_for(&errors, "title")[0].contains("at most 200"));

        let form = PostForm {
            title: "t".repeat(TITLE_MAX_LENGTH),
            content: "Content".to_string(),
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_post_form_empty_content() {
        let form = PostForm {
            title: "Title".to_string(),
            content: "".to_string(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(
            messages_for(&errors, "content"),
            vec!["This field is required."]
        );
    }

    #[test]
    fn test_comment_form_requires_text() {
        assert!(CommentForm {
            text: "Nice post".to_string()
        }
        .validate()
        .is_ok());
        assert!(CommentForm {
            text: " ".to_string()
        }
        .validate()
        .is_err());
    }

    #[test]
    fn test_register_form_valid() {
        let form = RegisterForm {
            username: "alice".to_string(),
            password: "correct-horse-battery".to_string(),
            password_confirm: "correct-horse-battery".to_string(),
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_register_form_password_mismatch() {
        let form = RegisterForm {
            username: "alice".to_string(),
            password: "correct-horse-battery".to_string(),
            password_confirm: "correct-horse-battery!".to_string(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(
            messages_for(&errors, "password_confirm"),
            vec!["The two password fields didn't match."]
        );
    }

    #[test]
    fn test_register_form_weak_password() {
        let form = RegisterForm {
            username: "alice".to_string(),
            password: "1234567".to_string(),
            password_confirm: "1234567".to_string(),
        };
        let errors = form.validate().unwrap_err();
        let messages = messages_for(&errors, "password");
        assert!(messages.iter().any(|m| m.contains("too short")));
        assert!(messages.iter().any(|m| m.contains("entirely numeric")));
    }

    #[test]
    fn test_register_form_bad_username_shape() {
        let form = RegisterForm {
            username: "a b".to_string(),
            password: "correct-horse-battery".to_string(),
            password_confirm: "correct-horse-battery".to_string(),
        };
        let errors = form.validate().unwrap_err();
        assert!(!messages_for(&errors, "username").is_empty());
    }

    #[test]
    fn test_username_taken_error_shape() {
        let errors = RegisterForm::username_taken();
        assert_eq!(
            messages_for(&errors, "username"),
            vec!["A user with that username already exists."]
        );
    }

    #[test]
    fn test_login_form_requires_both_fields() {
        let form = LoginForm {
            username: "alice".to_string(),
            password: "".to_string(),
        };
        let errors = form.validate().unwrap_err();
        assert!(!messages_for(&errors, "password").is_empty());
    }

    #[test]
    fn test_form_specs_describe_fields() {
        let spec = PostForm::spec();
        assert_eq!(spec.form, "post");
        assert_eq!(spec.fields.len(), 2);
        assert_eq!(spec.fields[0].name, "title");
        assert_eq!(spec.fields[0].max_length, Some(TITLE_MAX_LENGTH));

        let spec = CommentForm::spec();
        assert_eq!(spec.fields[0].widget, "textarea");

        let spec = RegisterForm::spec();
        assert_eq!(spec.fields.len(), 3);
    }
}
