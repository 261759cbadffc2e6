//! Reader-submitted forms and their validation.
//!
//! Every field is whitespace-trimmed before validation. A rejected form hands
//! back the submitted data together with the messages for each failing field.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

/// Field name -> error messages.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// A form that failed validation.
#[derive(Debug, Clone, Serialize)]
pub struct RejectedForm<F> {
    pub data: F,
    pub errors: FieldErrors,
}

/// Outcome of a form-gated operation.
#[derive(Debug, Clone)]
pub enum Submission<T, F> {
    Accepted(T),
    Rejected(RejectedForm<F>),
}

pub trait FormInput: Validate + Sized {
    /// Trim and otherwise canonicalize the raw input.
    fn normalized(self) -> Self;

    fn clean(self) -> Result<Self, RejectedForm<Self>> {
        let data = self.normalized();
        match data.validate() {
            Ok(()) => Ok(data),
            Err(errors) => Err(RejectedForm {
                errors: field_errors(&errors),
                data,
            }),
        }
    }
}

fn field_errors(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

/// A reader's comment on a post.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct CommentForm {
    #[serde(default)]
    #[validate(length(min = 1, max = 80, message = "Name is required (80 characters max)."))]
    pub name: String,
    #[serde(default)]
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required."))]
    pub body: String,
}

impl FormInput for CommentForm {
    fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            body: self.body.trim().to_string(),
        }
    }
}

/// Recommend a post to someone by email.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct EmailPostForm {
    #[serde(default)]
    #[validate(length(min = 1, max = 25, message = "Name is required (25 characters max)."))]
    pub name: String,
    #[serde(default)]
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    #[serde(default)]
    #[validate(email(message = "Enter a valid email address."))]
    pub to: String,
    #[serde(default)]
    pub comments: String,
}

impl FormInput for EmailPostForm {
    fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            to: self.to.trim().to_string(),
            comments: self.comments.trim().to_string(),
        }
    }
}

/// Free-text title search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct SearchForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required."))]
    pub query: String,
}

impl FormInput for SearchForm {
    fn normalized(self) -> Self {
        Self {
            query: self.query.trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_form_trims_and_accepts() {
        let form = CommentForm {
            name: "  Ada ".into(),
            email: " ada@example.com ".into(),
            body: " Nice post ".into(),
        };
        let clean = form.clean().unwrap();
        assert_eq!(clean.name, "Ada");
        assert_eq!(clean.email, "ada@example.com");
        assert_eq!(clean.body, "Nice post");
    }

    #[test]
    fn comment_form_reports_bad_email() {
        let form = CommentForm {
            name: "Ada".into(),
            email: "not-an-email".into(),
            body: "Hi".into(),
        };
        let rejected = form.clean().unwrap_err();
        assert_eq!(rejected.errors.keys().collect::<Vec<_>>(), vec!["email"]);
        assert_eq!(rejected.data.email, "not-an-email");
    }

    #[test]
    fn blank_fields_are_required() {
        let rejected = CommentForm::default().clean().unwrap_err();
        assert!(rejected.errors.contains_key("name"));
        assert!(rejected.errors.contains_key("email"));
        assert!(rejected.errors.contains_key("body"));
    }

    #[test]
    fn share_form_comments_are_optional() {
        let form = EmailPostForm {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            to: "bob@example.com".into(),
            comments: String::new(),
        };
        assert!(form.clean().is_ok());

        let long_name = EmailPostForm {
            name: "x".repeat(26),
            email: "ada@example.com".into(),
            to: "bob".into(),
            comments: String::new(),
        };
        let rejected = long_name.clean().unwrap_err();
        assert!(rejected.errors.contains_key("name"));
        assert!(rejected.errors.contains_key("to"));
    }

    #[test]
    fn search_form_requires_query() {
        assert!(SearchForm { query: "  ".into() }.clean().is_err());
        assert_eq!(
            SearchForm { query: " rust ".into() }.clean().unwrap().query,
            "rust"
        );
    }
}
