//! Field-rule checking as pure functions: input in, list of violations out.
//! Callers collect every message instead of stopping at the first.

use lazy_static::lazy_static;
use regex::Regex;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub const MIN_PASSWORD_LEN: usize = 8;

pub fn validate_registration(
    name: &str,
    email: &str,
    password: &str,
    password_confirmation: &str,
) -> Vec<String> {
    let mut errors = Vec::new();
    if name.trim().is_empty() {
        errors.push("El Nombre no puede ir vacio".into());
    }
    if !is_valid_email(email) {
        errors.push("Eso no parece un email".into());
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        errors.push("El Password debe ser de al menos 8 caracteres".into());
    }
    if password != password_confirmation {
        errors.push("Los Passwords deben ser iguales".into());
    }
    errors
}

pub fn validate_login(email: &str, password: &str) -> Vec<String> {
    let mut errors = Vec::new();
    if !is_valid_email(email) {
        errors.push("El Email es obligatorio".into());
    }
    if password.is_empty() {
        errors.push("El Password es obligatorio".into());
    }
    errors
}

pub fn validate_email(email: &str) -> Vec<String> {
    if is_valid_email(email) {
        Vec::new()
    } else {
        vec!["Eso no parece un email".into()]
    }
}

pub fn validate_new_password(password: &str) -> Vec<String> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        vec!["El Password debe ser de al menos 8 caracteres".into()]
    } else {
        Vec::new()
    }
}
