use libris_db::{Id, Model};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::forms::{Field, FormData, Schema};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Genre {
    #[serde(rename = "_id", default, skip_serializing_if = "Id::is_unassigned")]
    pub id: Id<Genre>,
    pub name: String,
}

impl Model for Genre {
    const COLLECTION: &'static str = "genres";

    fn id(&self) -> &Id<Self> {
        &self.id
    }

    fn assign_id(&mut self, id: Id<Self>) {
        self.id = id;
    }
}

impl Genre {
    pub fn schema() -> Schema {
        Schema::new(vec![Field::new("name")
            .trim()
            .required("Genre name required")
            .escape()])
    }

    /// Build an unsaved genre from sanitized form values.
    pub fn from_form(values: &FormData) -> Self {
        Self {
            id: Id::unassigned(),
            name: values.get("name").to_string(),
        }
    }

    pub fn url(&self) -> String {
        format!("/catalog/genre/{}", self.id)
    }

    /// Stored fields plus virtuals, as handed to the views.
    pub fn present(&self) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "url": self.url(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_is_derived_from_id() {
        let genre = Genre {
            id: Id::new("g1"),
            name: "Poetry".into(),
        };
        assert_eq!(genre.url(), "/catalog/genre/g1");
        assert_eq!(genre.present()["url"], "/catalog/genre/g1");
    }

    #[test]
    fn schema_trims_and_escapes_name() {
        let form = FormData::from_pairs([("name", "  Sci-Fi & <Fantasy> ")]);
        let validated = Genre::schema().validate(&form);
        assert!(validated.is_valid());
        assert_eq!(
            Genre::from_form(validated.values()).name,
            "Sci-Fi &amp; &lt;Fantasy&gt;"
        );
    }

    #[test]
    fn blank_name_is_rejected() {
        let validated = Genre::schema().validate(&FormData::from_pairs([("name", " ")]));
        assert_eq!(validated.errors()[0].message, "Genre name required");
    }
}
