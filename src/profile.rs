//! Profile Input - the fields of one submission

use serde::{Deserialize, Serialize};
use std::fmt;

/// A form field. Order matches the order fields appear on the form and in
/// the rendered document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    PhoneNumber,
    Email,
    Qualification,
    Skills,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Name,
        Field::PhoneNumber,
        Field::Email,
        Field::Qualification,
        Field::Skills,
    ];

    /// Label used on the form and in the document.
    pub fn label(&self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::PhoneNumber => "Number",
            Field::Email => "Email",
            Field::Qualification => "Qualification",
            Field::Skills => "Skills",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// User-entered values for one portfolio.
///
/// Built fresh for every submission and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub qualification: String,
    #[serde(default)]
    pub skills: String,
}

impl ProfileInput {
    /// Build from raw form values. Single-line values are kept exactly as
    /// typed; only the skills block is trimmed, as a whole, so inner line
    /// breaks survive.
    pub fn from_form(
        name: &str,
        phone_number: &str,
        email: &str,
        qualification: &str,
        skills: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            phone_number: phone_number.to_string(),
            email: email.to_string(),
            qualification: qualification.to_string(),
            skills: skills.trim().to_string(),
        }
    }

    /// Same normalisation as [`ProfileInput::from_form`], for values that
    /// arrived some other way (e.g. a JSON payload).
    pub fn normalized(self) -> Self {
        Self::from_form(
            &self.name,
            &self.phone_number,
            &self.email,
            &self.qualification,
            &self.skills,
        )
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::PhoneNumber => &self.phone_number,
            Field::Email => &self.email,
            Field::Qualification => &self.qualification,
            Field::Skills => &self.skills,
        }
    }

    /// Fields that are empty or whitespace-only, in form order.
    pub fn missing_fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|f| self.get(*f).trim().is_empty())
            .collect()
    }
}
