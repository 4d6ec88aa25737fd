use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::countries;
use super::domain::{Application, CompanyApplication, EmployeeApplication, MAX_SKILLS};

pub static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

pub static PHONE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+]?[(]?[0-9]{3}[)]?[-\s.]?[0-9]{3}[-\s.]?[0-9]{4,6}$").unwrap()
});

/// Field name to message. Empty means the form may be submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }
}

pub fn validate(application: &Application) -> FieldErrors {
    match application {
        Application::Company(company) => validate_company(company),
        Application::Employee(employee) => validate_employee(employee),
    }
}

pub fn validate_company(company: &CompanyApplication) -> FieldErrors {
    let mut errors = FieldErrors::default();

    if is_blank(&company.company_name) {
        errors.insert("companyName", "Company name is required.");
    }
    check_email(
        &mut errors,
        "companyEmail",
        &company.company_email,
        "Company email is required.",
    );
    if is_blank(&company.role) {
        errors.insert("role", "Role is required.");
    }
    if company.skills.len() > MAX_SKILLS {
        errors.insert(
            "skills",
            format!("Please list at most {MAX_SKILLS} skills."),
        );
    }
    if !is_blank(&company.country) && !countries::is_listed(company.country.trim()) {
        errors.insert("country", "Please select a country from the list.");
    }

    errors
}

pub fn validate_employee(employee: &EmployeeApplication) -> FieldErrors {
    let mut errors = FieldErrors::default();

    if is_blank(&employee.full_name) {
        errors.insert("fullName", "Full name is required.");
    }
    check_email(&mut errors, "email", &employee.email, "Email is required.");
    // Matched as entered: the value is forwarded untrimmed.
    if !employee.phone.is_empty() && !PHONE_REGEX.is_match(&employee.phone) {
        errors.insert("phone", "Invalid phone number format.");
    }
    if employee.resume.is_none() {
        errors.insert("resume", "Resume is required.");
    }

    errors
}

fn check_email(errors: &mut FieldErrors, field: &'static str, value: &str, required: &str) {
    if is_blank(value) {
        errors.insert(field, required);
    } else if !EMAIL_REGEX.is_match(value) {
        errors.insert(field, "Invalid email format.");
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
