//! Declarative form validation.
//!
//! Each entity declares a [`Schema`]: an ordered list of [`Field`]s, each an
//! ordered list of sanitize and check steps. [`Schema::validate`] runs them
//! against raw form input and never fails; invalid input comes back as an
//! ordered list of [`FieldError`]s next to the sanitized values, so the form
//! can be re-rendered with what the user typed.

mod extract;

use serde::Serialize;

use crate::utils::dates;

/// Raw `application/x-www-form-urlencoded` input. A key may repeat
/// (checkbox groups); values keep submission order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    fields: Vec<(String, String)>,
}

impl FormData {
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// First value submitted for `name`, or `""` when absent.
    pub fn get<'a>(&'a self, name: &'a str) -> &'a str {
        self.all(name).next().unwrap_or_default()
    }

    /// Every value submitted for `name`.
    pub fn all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.fields
            .iter()
            .filter(move |(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|(key, _)| key == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sanitizer {
    Trim,
    /// Replace HTML-significant characters with entities.
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// Non-empty.
    Required,
    /// At most this many characters.
    MaxLength(usize),
    /// `YYYY-MM-DD` or an RFC 3339 date-time.
    IsoDate,
    OneOf(&'static [&'static str]),
}

impl Check {
    fn passes(self, value: &str) -> bool {
        match self {
            Check::Required => !value.is_empty(),
            Check::MaxLength(max) => value.chars().count() <= max,
            Check::IsoDate => dates::parse_iso_date(value).is_some(),
            Check::OneOf(allowed) => allowed.contains(&value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Sanitize(Sanitizer),
    Check {
        check: Check,
        message: &'static str,
    },
}

/// Rules for one form field, applied in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    name: &'static str,
    optional: bool,
    steps: Vec<Step>,
}

impl Field {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            optional: false,
            steps: Vec::new(),
        }
    }

    /// Skip every step when the submitted value is empty.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn trim(self) -> Self {
        self.step(Step::Sanitize(Sanitizer::Trim))
    }

    pub fn escape(self) -> Self {
        self.step(Step::Sanitize(Sanitizer::Escape))
    }

    pub fn required(self, message: &'static str) -> Self {
        self.check(Check::Required, message)
    }

    pub fn max_length(self, max: usize, message: &'static str) -> Self {
        self.check(Check::MaxLength(max), message)
    }

    pub fn iso_date(self, message: &'static str) -> Self {
        self.check(Check::IsoDate, message)
    }

    pub fn one_of(self, allowed: &'static [&'static str], message: &'static str) -> Self {
        self.check(Check::OneOf(allowed), message)
    }

    fn check(self, check: Check, message: &'static str) -> Self {
        self.step(Step::Check { check, message })
    }

    fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Run the steps over one value. Sanitizers always run; only the first
    /// failed check is reported, carrying the fully sanitized value.
    fn apply(&self, raw: &str) -> (String, Option<FieldError>) {
        let mut value = raw.to_string();
        if self.optional && value.is_empty() {
            return (value, None);
        }
        let mut failed = None;
        for step in &self.steps {
            match *step {
                Step::Sanitize(Sanitizer::Trim) => value = value.trim().to_string(),
                Step::Sanitize(Sanitizer::Escape) => value = escape(&value),
                Step::Check { check, message } => {
                    if failed.is_none() && !check.passes(&value) {
                        failed = Some(message);
                    }
                }
            }
        }
        let error = failed.map(|message| FieldError {
            field: self.name,
            message,
            value: value.clone(),
        });
        (value, error)
    }
}

/// One failed check, reported in field declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Sanitize and check `form`. Fields the schema does not name pass through
    /// untouched; a declared field that was not submitted is checked as `""`.
    pub fn validate(&self, form: &FormData) -> Validated {
        let mut values: Vec<(String, String)> = form
            .fields
            .iter()
            .filter(|(key, _)| !self.declares(key))
            .cloned()
            .collect();
        let mut errors = Vec::new();

        for field in &self.fields {
            let raw: Vec<&str> = if form.contains(field.name) {
                form.all(field.name).collect()
            } else {
                vec![""]
            };
            for value in raw {
                let (clean, error) = field.apply(value);
                values.push((field.name.to_string(), clean));
                errors.extend(error);
            }
        }

        Validated {
            values: FormData { fields: values },
            errors,
        }
    }

    fn declares(&self, name: &str) -> bool {
        self.fields.iter().any(|field| field.name == name)
    }
}

/// Outcome of [`Schema::validate`]: sanitized values plus any errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validated {
    values: FormData,
    errors: Vec<FieldError>,
}

impl Validated {
    pub fn values(&self) -> &FormData {
        &self.values
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Entity-encode characters that are significant in HTML, including the
/// backslash and backtick.
pub fn escape(value: &str) -> String {
    tera::escape_html(value)
        .replace('\\', "&#x5C;")
        .replace('`', "&#96;")
}
