//! Form validation
//!
//! Runs synchronously before any request. Field rules live on the form
//! structs (`validator` derive); this module adds the category allow-lists,
//! the expiration-date rule and a flat, ordered error list for display.

use std::borrow::Cow;

use chrono::NaiveDate;
use serde::Serialize;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::constants::{ANEXOS_SOA_CATEGORIES, NORMATIVAS_CATEGORIES};
use crate::models::{CreateAnexo, CreateNormativa, LoginCredentials, UpdateAnexo, UpdateNormativa};

const NORMATIVA_FIELDS: [&str; 5] = ["name", "category", "description", "location", "expires_at"];
const ANEXO_FIELDS: [&str; 5] = ["control_name", "category", "description", "location", "notes"];
const LOGIN_FIELDS: [&str; 2] = ["email", "password"];

/// One failed rule on one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// All failed rules of a form, in field declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormErrors {
    pub errors: Vec<FieldError>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn for_field(&self, field: &str) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.message.as_str())
            .collect()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    pub fn first_message(&self) -> Option<&str> {
        self.errors.first().map(|e| e.message.as_str())
    }

    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.message.clone()).collect()
    }

    fn into_result(self) -> Result<(), FormErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Flatten `validator` output, ordering fields as listed in `order`
    fn from_validation(errors: &ValidationErrors, order: &[&str]) -> Self {
        let mut fields: Vec<(usize, String, Vec<String>)> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let field = field.to_string();
                let rank = order.iter().position(|f| *f == field).unwrap_or(order.len());
                let messages = errs.iter().map(message_of).collect();
                (rank, field, messages)
            })
            .collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

        let mut out = FormErrors::default();
        for (_, field, messages) in fields {
            for message in messages {
                out.push(&field, message);
            }
        }
        out
    }
}

impl std::fmt::Display for FormErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let joined: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", joined.join("; "))
    }
}

fn message_of(error: &ValidationError) -> String {
    error
        .message
        .as_ref()
        .map(|m| m.to_string())
        .unwrap_or_else(|| format!("Valor no válido ({})", error.code))
}

fn rule_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

fn check<T: Validate>(form: &T, order: &[&str]) -> FormErrors {
    match form.validate() {
        Ok(()) => FormErrors::default(),
        Err(errors) => FormErrors::from_validation(&errors, order),
    }
}

// ============================================================================
// CUSTOM RULES (referenced from the form derives)
// ============================================================================

pub fn normativa_category(category: &str) -> Result<(), ValidationError> {
    category_in(category, &NORMATIVAS_CATEGORIES)
}

pub fn anexo_category(category: &str) -> Result<(), ValidationError> {
    category_in(category, &ANEXOS_SOA_CATEGORIES)
}

fn category_in(category: &str, allowed: &[&str]) -> Result<(), ValidationError> {
    if category.trim().is_empty() {
        return Err(rule_error("required", "La categoría es requerida"));
    }
    if !allowed.contains(&category) {
        return Err(rule_error("category", "La categoría no es válida"));
    }
    Ok(())
}

fn check_expiration(expires_at: Option<NaiveDate>, today: NaiveDate, errors: &mut FormErrors) {
    match expires_at {
        None => errors.push("expires_at", "La fecha de vencimiento es requerida"),
        Some(date) if date <= today => {
            errors.push("expires_at", "La fecha de vencimiento debe ser posterior a hoy")
        }
        Some(_) => {}
    }
}

// ============================================================================
// FORMS
// ============================================================================

/// New normativa; the expiration date must be after `today`
pub fn validate_create_normativa(form: &CreateNormativa, today: NaiveDate) -> Result<(), FormErrors> {
    let mut errors = check(form, &NORMATIVA_FIELDS);
    check_expiration(form.expires_at, today, &mut errors);
    errors.into_result()
}

/// Edit; only present fields are checked
pub fn validate_update_normativa(form: &UpdateNormativa, today: NaiveDate) -> Result<(), FormErrors> {
    let mut errors = check(form, &NORMATIVA_FIELDS);
    if form.expires_at.is_some() {
        check_expiration(form.expires_at, today, &mut errors);
    }
    errors.into_result()
}

pub fn validate_create_anexo(form: &CreateAnexo) -> Result<(), FormErrors> {
    check(form, &ANEXO_FIELDS).into_result()
}

pub fn validate_update_anexo(form: &UpdateAnexo) -> Result<(), FormErrors> {
    check(form, &ANEXO_FIELDS).into_result()
}

pub fn validate_login(credentials: &LoginCredentials) -> Result<(), FormErrors> {
    check(credentials, &LOGIN_FIELDS).into_result()
}
