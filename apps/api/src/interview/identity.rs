//! Candidate Profile Resolver: structured identity extracted from a résumé and
//! the completion loop that asks for whatever the extractor could not find.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The three identity fields, in the fixed order they are asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Email,
    Phone,
}

impl Field {
    pub const PRIORITY: [Field; 3] = [Field::Name, Field::Email, Field::Phone];
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Phone => "phone",
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateIdentity {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Outcome of checking an identity for completeness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Complete,
    Missing(Field),
}

impl CandidateIdentity {
    /// Trims every field and drops the ones left empty.
    pub fn normalized(self) -> Self {
        Self {
            name: non_blank(self.name),
            email: non_blank(self.email),
            phone: non_blank(self.phone),
        }
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::Name => self.name.as_deref(),
            Field::Email => self.email.as_deref(),
            Field::Phone => self.phone.as_deref(),
        }
    }

    fn slot(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::Phone => &mut self.phone,
        }
    }

    /// Merge-patch: fields present in `patch` overwrite, absent ones are kept.
    pub fn merge(&mut self, patch: CandidateIdentity) {
        let patch = patch.normalized();
        for field in Field::PRIORITY {
            if let Some(value) = patch.get(field) {
                *self.slot(field) = Some(value.to_string());
            }
        }
    }

    /// Sets one field. A blank value never satisfies a required field.
    pub fn supply(&mut self, field: Field, value: &str) -> Result<(), BlankValue> {
        let value = value.trim();
        if value.is_empty() {
            return Err(BlankValue(field));
        }
        *self.slot(field) = Some(value.to_string());
        Ok(())
    }

    pub fn first_missing(&self) -> Option<Field> {
        Field::PRIORITY.into_iter().find(|field| {
            self.get(*field)
                .map(|v| v.trim().is_empty())
                .unwrap_or(true)
        })
    }

    pub fn classify(&self) -> Classification {
        match self.first_missing() {
            Some(field) => Classification::Missing(field),
            None => Classification::Complete,
        }
    }
}

/// A blank value was offered for a required field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlankValue(pub Field);

/// The conversational prompt shown while a field is missing.
pub fn gathering_prompt(field: Field) -> String {
    format!(
        "Thanks for the resume! I found some details, but I'm missing your {field}. \
         Could you please provide it?"
    )
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
