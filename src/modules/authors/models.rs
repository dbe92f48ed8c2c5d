use libris_db::{Id, Model};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use time::Date;

use crate::forms::{Field, FormData, Schema};
use crate::utils::dates;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Author {
    #[serde(rename = "_id", default, skip_serializing_if = "Id::is_unassigned")]
    pub id: Id<Author>,
    pub first_name: String,
    pub family_name: String,
    #[serde(with = "dates::optional", default)]
    pub date_of_birth: Option<Date>,
    #[serde(with = "dates::optional", default)]
    pub date_of_death: Option<Date>,
}

impl Model for Author {
    const COLLECTION: &'static str = "authors";

    fn id(&self) -> &Id<Self> {
        &self.id
    }

    fn assign_id(&mut self, id: Id<Self>) {
        self.id = id;
    }
}

impl Author {
    pub fn schema() -> Schema {
        Schema::new(vec![
            Field::new("first_name")
                .trim()
                .required("First name must be specified.")
                .max_length(100, "First name must be at most 100 characters.")
                .escape(),
            Field::new("family_name")
                .trim()
                .required("Family name must be specified.")
                .max_length(100, "Family name must be at most 100 characters.")
                .escape(),
            Field::new("date_of_birth")
                .optional()
                .iso_date("Invalid date of birth")
                .escape(),
            Field::new("date_of_death")
                .optional()
                .iso_date("Invalid date of death")
                .escape(),
        ])
    }

    /// Build an unsaved author from sanitized form values. Unparseable dates
    /// are dropped; the schema has already reported them.
    pub fn from_form(values: &FormData) -> Self {
        Self {
            id: Id::unassigned(),
            first_name: values.get("first_name").to_string(),
            family_name: values.get("family_name").to_string(),
            date_of_birth: dates::parse_iso_date(values.get("date_of_birth")),
            date_of_death: dates::parse_iso_date(values.get("date_of_death")),
        }
    }

    /// "first family", or empty when either part is missing.
    pub fn name(&self) -> String {
        if self.first_name.is_empty() || self.family_name.is_empty() {
            return String::new();
        }
        format!("{} {}", self.first_name, self.family_name)
    }

    pub fn url(&self) -> String {
        format!("/catalog/author/{}", self.id)
    }

    pub fn date_of_birth_formatted(&self) -> String {
        self.date_of_birth.map(dates::short).unwrap_or_default()
    }

    pub fn date_of_death_formatted(&self) -> String {
        self.date_of_death.map(dates::short).unwrap_or_default()
    }

    pub fn lifespan(&self) -> String {
        format!(
            "{} - {}",
            self.date_of_birth_formatted(),
            self.date_of_death_formatted()
        )
    }

    pub fn present(&self) -> Value {
        json!({
            "id": self.id,
            "first_name": self.first_name,
            "family_name": self.family_name,
            "name": self.name(),
            "url": self.url(),
            "date_of_birth": self.date_of_birth.map(dates::iso),
            "date_of_death": self.date_of_death.map(dates::iso),
            "date_of_birth_formatted": self.date_of_birth_formatted(),
            "date_of_death_formatted": self.date_of_death_formatted(),
            "lifespan": self.lifespan(),
        })
    }
}
