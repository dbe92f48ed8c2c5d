use libris_db::{Id, Model};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use strum::{Display, EnumIter, EnumString, VariantNames};
use time::Date;

use crate::forms::{Field, FormData, Schema};
use crate::modules::books::models::Book;
use crate::utils::dates;

/// Circulation state of a physical copy.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    VariantNames,
)]
pub enum Status {
    Available,
    #[default]
    Maintenance,
    Loaned,
    Reserved,
}

/// One physical copy of a [`Book`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookInstance {
    #[serde(rename = "_id", default, skip_serializing_if = "Id::is_unassigned")]
    pub id: Id<BookInstance>,
    pub book: Id<Book>,
    pub imprint: String,
    #[serde(default)]
    pub status: Status,
    #[serde(with = "dates::optional", default)]
    pub due_back: Option<Date>,
}

impl Model for BookInstance {
    const COLLECTION: &'static str = "bookinstances";

    fn id(&self) -> &Id<Self> {
        &self.id
    }

    fn assign_id(&mut self, id: Id<Self>) {
        self.id = id;
    }
}

impl BookInstance {
    pub fn schema() -> Schema {
        Schema::new(vec![
            Field::new("book")
                .trim()
                .required("Book must be specified")
                .escape(),
            Field::new("imprint")
                .trim()
                .required("Imprint must be specified")
                .escape(),
            Field::new("status")
                .optional()
                .one_of(Status::VARIANTS, "Invalid status")
                .escape(),
            Field::new("due_back")
                .optional()
                .iso_date("Invalid date")
                .escape(),
        ])
    }

    /// Build an unsaved copy from sanitized form values. A missing or
    /// unknown status falls back to the default.
    pub fn from_form(values: &FormData) -> Self {
        Self {
            id: Id::unassigned(),
            book: Id::new(values.get("book")),
            imprint: values.get("imprint").to_string(),
            status: values.get("status").parse().unwrap_or_default(),
            due_back: dates::parse_iso_date(values.get("due_back")),
        }
    }

    pub fn url(&self) -> String {
        format!("/catalog/bookinstance/{}", self.id)
    }

    pub fn due_back_formatted(&self) -> String {
        self.due_back.map(dates::medium).unwrap_or_default()
    }

    pub fn present(&self) -> Value {
        self.present_with(None)
    }

    /// Stored fields and virtuals with the referenced book inlined. A missing
    /// book renders as null.
    pub fn present_with(&self, book: Option<&Book>) -> Value {
        json!({
            "id": self.id,
            "imprint": self.imprint,
            "status": self.status,
            "due_back": self.due_back.map(dates::iso),
            "due_back_formatted": self.due_back_formatted(),
            "url": self.url(),
            "book_id": self.book,
            "book": book.map(Book::present),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn status_names_match_stored_values() {
        assert_eq!(
            Status::VARIANTS,
            ["Available", "Maintenance", "Loaned", "Reserved"]
        );
        assert_eq!("Loaned".parse::<Status>().unwrap(), Status::Loaned);
        assert_eq!(serde_json::to_value(Status::Reserved).unwrap(), "Reserved");
        assert_eq!(Status::default(), Status::Maintenance);
    }

    #[test]
    fn missing_status_defaults_to_maintenance() {
        let form = FormData::from_pairs([("book", "b1"), ("imprint", "Gollancz, 2011")]);
        let validated = BookInstance::schema().validate(&form);
        assert!(validated.is_valid());
        let copy = BookInstance::from_form(validated.values());
        assert_eq!(copy.status, Status::Maintenance);
        assert_eq!(copy.due_back, None);
    }

    #[test]
    fn unknown_status_and_bad_date_are_rejected() {
        let form = FormData::from_pairs([
            ("book", "b1"),
            ("imprint", "Gollancz"),
            ("status", "Lost"),
            ("due_back", "2024-13-01"),
        ]);
        let messages: Vec<_> = BookInstance::schema()
            .validate(&form)
            .errors()
            .iter()
            .map(|e| e.message)
            .collect();
        assert_eq!(messages, ["Invalid status", "Invalid date"]);
    }

    #[test]
    fn virtuals_follow_stored_fields() {
        let copy = BookInstance {
            id: Id::new("i1"),
            book: Id::new("b1"),
            imprint: "Gollancz".into(),
            status: Status::Loaned,
            due_back: Some(date!(2024 - 03 - 09)),
        };
        assert_eq!(copy.url(), "/catalog/bookinstance/i1");
        assert_eq!(copy.due_back_formatted(), "Mar 9, 2024");
        let view = copy.present();
        assert_eq!(view["status"], "Loaned");
        assert_eq!(view["due_back"], "2024-03-09");
        assert!(view["book"].is_null());
    }
}
