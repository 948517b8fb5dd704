//! Contact page: form validation and the FAQ accordion.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Subject,
    Message,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Name, Field::Email, Field::Subject, Field::Message];
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: &'static str,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactForm {
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Subject => &self.subject,
            Field::Message => &self.message,
        }
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

pub const NAME_MIN_CHARS: usize = 2;
pub const MESSAGE_MIN_CHARS: usize = 10;

fn check(field: Field, value: &str) -> Result<(), FieldError> {
    let message = match field {
        Field::Name if value.chars().count() < NAME_MIN_CHARS => {
            "Le nom doit contenir au moins 2 caractères"
        }
        Field::Email if !is_valid_email(value) => "Veuillez entrer une adresse email valide",
        Field::Subject if value.is_empty() => "Veuillez sélectionner un sujet",
        Field::Message if value.chars().count() < MESSAGE_MIN_CHARS => {
            "Le message doit contenir au moins 10 caractères"
        }
        _ => return Ok(()),
    };
    Err(FieldError { field, message })
}

/// Checks one field the way the form does on blur. `value` is trimmed first.
pub fn validate_field(field: Field, value: &str) -> Result<(), FieldError> {
    check(field, value.trim())
}

/// Every failing field, in form order.
///
/// On submit only the name and the message are trimmed; the email and the
/// subject are checked as typed.
pub fn validate(form: &ContactForm) -> Result<(), Vec<FieldError>> {
    let errors: Vec<FieldError> = Field::ALL
        .iter()
        .filter_map(|&field| {
            let value = form.value(field);
            let value = match field {
                Field::Name | Field::Message => value.trim(),
                Field::Email | Field::Subject => value,
            };
            check(field, value).err()
        })
        .collect();
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Live counter shown under the message box while typing. `len` counts the
/// raw characters, spaces included.
pub fn message_counter(len: usize) -> String {
    match MESSAGE_MIN_CHARS.checked_sub(len) {
        Some(remaining) if remaining > 0 => format!("{remaining} caractères minimum restants"),
        _ => format!("{len} caractères"),
    }
}

/// FAQ list where at most one answer is open.
#[derive(Debug, Clone, Default)]
pub struct Faq {
    open: Option<usize>,
}

impl Faq {
    pub fn toggle(&mut self, item: usize) {
        self.open = if self.open == Some(item) { None } else { Some(item) };
    }

    pub fn is_open(&self, item: usize) -> bool {
        self.open == Some(item)
    }

    pub fn open_item(&self) -> Option<usize> {
        self.open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> ContactForm {
        ContactForm {
            name: "Léa".into(),
            email: "lea@studio.fr".into(),
            subject: "partenariat".into(),
            message: "Bonjour, j'aimerais en savoir plus.".into(),
        }
    }

    #[test]
    fn valid_form_passes() {
        assert_eq!(validate(&valid_form()), Ok(()));
    }

    #[test]
    fn collects_errors_in_field_order() {
        let form = ContactForm { name: " a ".into(), email: "nope".into(), ..Default::default() };
        let fields: Vec<_> = validate(&form).unwrap_err().iter().map(|e| e.field).collect();
        assert_eq!(fields, vec![Field::Name, Field::Email, Field::Subject, Field::Message]);
    }

    #[test]
    fn email_rules() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.fr"));
        assert!(!is_valid_email("@c.fr"));
    }

    #[test]
    fn message_length_counts_after_trim() {
        assert!(validate_field(Field::Message, "   court   ").is_err());
        let err = validate_field(Field::Message, "court").unwrap_err();
        assert_eq!(err.to_string(), "Le message doit contenir au moins 10 caractères");
        assert!(validate_field(Field::Message, "assez long ici").is_ok());
    }

    #[test]
    fn submit_checks_email_as_typed() {
        let form = ContactForm { email: " lea@studio.fr ".into(), ..valid_form() };
        let errors = validate(&form).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, Field::Email);
        assert!(validate_field(Field::Email, &form.email).is_ok());

        let padded = ContactForm { name: "  Léa  ".into(), ..valid_form() };
        assert_eq!(validate(&padded), Ok(()));
    }

    #[test]
    fn counter_switches_at_the_minimum() {
        assert_eq!(message_counter(0), "10 caractères minimum restants");
        assert_eq!(message_counter(9), "1 caractères minimum restants");
        assert_eq!(message_counter(10), "10 caractères");
        assert_eq!(message_counter(42), "42 caractères");
    }

    #[test]
    fn faq_keeps_one_item_open() {
        let mut faq = Faq::default();
        faq.toggle(1);
        faq.toggle(3);
        assert!(faq.is_open(3));
        assert!(!faq.is_open(1));
        faq.toggle(3);
        assert_eq!(faq.open_item(), None);
    }
}
