//! Declarative form schemas
//!
//! A schema lists a form's fields in display order together with the rules
//! each field must satisfy. Both forms run through the same pipeline; only the
//! schema differs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::error::Error;

/// Bookable time slots
pub const TIME_SLOTS: &[&str] = &["12:00", "12:30", "13:00", "18:00", "18:30", "19:00", "20:00"];

/// Accepted party sizes
pub const GUEST_COUNTS: &[&str] = &["1", "2", "3", "4", "5", "6", "7", "8"];

/// Terms that mark a contact message as spam
pub const SPAM_KEYWORDS: &[&str] = &["viagra", "casino", "lottery", "prize", "winner"];

/// How far ahead a table can be booked
pub const BOOKING_WINDOW_MONTHS: u32 = 3;

/// Forms handled by the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormType {
    /// General enquiry form
    Contact,
    /// Table reservation form
    Booking,
}

impl FormType {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            FormType::Contact => "contact",
            FormType::Booking => "booking",
        }
    }

    /// Schema describing this form
    pub fn schema(&self) -> &'static FormSchema {
        match self {
            FormType::Contact => contact_schema(),
            FormType::Booking => booking_schema(),
        }
    }
}

impl FromStr for FormType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "contact" => Ok(FormType::Contact),
            "booking" => Ok(FormType::Booking),
            other => Err(Error::validation(format!(
                "Unknown form type '{}' (expected: contact or booking)",
                other
            ))),
        }
    }
}

impl fmt::Display for FormType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single check applied to a field value.
///
/// Rules run in the order they are declared on the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Trimmed length at least `min`; fires when the value is absent
    MinLength { min: usize, message: &'static str },
    /// Length at most `max`; skipped when the value is absent
    MaxLength { max: usize, message: &'static str },
    /// Simple `local@domain.tld` shape; fires when absent
    Email { message: &'static str },
    /// UK landline or mobile number; fires when absent
    UkPhone { message: &'static str },
    /// Exact match against a fixed set; fires when absent
    OneOf {
        allowed: &'static [&'static str],
        message: &'static str,
    },
    /// Calendar date between today and today + `max_months_ahead`
    DateWindow {
        max_months_ahead: u32,
        missing: &'static str,
        past: &'static str,
        too_far: &'static str,
    },
    /// None of the terms may appear, ignoring case
    Blocklist {
        terms: &'static [&'static str],
        message: &'static str,
    },
}

/// One declared field of a form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub required: bool,
    pub rules: Vec<Rule>,
}

impl FieldSpec {
    fn new(name: &'static str, required: bool, rules: Vec<Rule>) -> Self {
        Self {
            name,
            required,
            rules,
        }
    }
}

/// Ordered field declarations for one form type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSchema {
    pub form_type: FormType,
    pub fields: Vec<FieldSpec>,
}

impl FormSchema {
    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Field names in declaration order
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }
}

static CONTACT_SCHEMA: OnceLock<FormSchema> = OnceLock::new();
static BOOKING_SCHEMA: OnceLock<FormSchema> = OnceLock::new();

fn name_rules() -> Vec<Rule> {
    vec![
        Rule::MinLength {
            min: 2,
            message: "Name must be at least 2 characters long",
        },
        Rule::MaxLength {
            max: 100,
            message: "Name must not exceed 100 characters",
        },
    ]
}

fn email_rules() -> Vec<Rule> {
    vec![Rule::Email {
        message: "Please provide a valid email address",
    }]
}

/// Schema of the contact form
pub fn contact_schema() -> &'static FormSchema {
    CONTACT_SCHEMA.get_or_init(|| FormSchema {
        form_type: FormType::Contact,
        fields: vec![
            FieldSpec::new("name", true, name_rules()),
            FieldSpec::new("email", true, email_rules()),
            FieldSpec::new(
                "subject",
                true,
                vec![
                    Rule::MinLength {
                        min: 3,
                        message: "Subject must be at least 3 characters long",
                    },
                    Rule::MaxLength {
                        max: 200,
                        message: "Subject must not exceed 200 characters",
                    },
                ],
            ),
            FieldSpec::new(
                "message",
                true,
                vec![
                    Rule::MinLength {
                        min: 10,
                        message: "Message must be at least 10 characters long",
                    },
                    Rule::MaxLength {
                        max: 5000,
                        message: "Message must not exceed 5000 characters",
                    },
                    Rule::Blocklist {
                        terms: SPAM_KEYWORDS,
                        message: "Message contains prohibited content",
                    },
                ],
            ),
        ],
    })
}

/// Schema of the table booking form
pub fn booking_schema() -> &'static FormSchema {
    BOOKING_SCHEMA.get_or_init(|| FormSchema {
        form_type: FormType::Booking,
        fields: vec![
            FieldSpec::new("name", true, name_rules()),
            FieldSpec::new("email", true, email_rules()),
            FieldSpec::new(
                "phone",
                true,
                vec![Rule::UkPhone {
                    message: "Please provide a valid UK phone number",
                }],
            ),
            FieldSpec::new(
                "date",
                true,
                vec![Rule::DateWindow {
                    max_months_ahead: BOOKING_WINDOW_MONTHS,
                    missing: "Please select a date",
                    past: "Booking date cannot be in the past",
                    too_far: "Bookings can only be made up to 3 months in advance",
                }],
            ),
            FieldSpec::new(
                "time",
                true,
                vec![Rule::OneOf {
                    allowed: TIME_SLOTS,
                    message: "Please select a valid time slot",
                }],
            ),
            FieldSpec::new(
                "guests",
                true,
                vec![Rule::OneOf {
                    allowed: GUEST_COUNTS,
                    message: "Please select number of guests",
                }],
            ),
            FieldSpec::new(
                "notes",
                false,
                vec![Rule::MaxLength {
                    max: 1000,
                    message: "Special requests must not exceed 1000 characters",
                }],
            ),
        ],
    })
}
