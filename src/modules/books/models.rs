use libris_db::{Id, Model};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::forms::{Field, FormData, Schema};
use crate::modules::authors::models::Author;
use crate::modules::genres::models::Genre;

/// A catalogued title. `author` and `genre` are plain references that may
/// dangle once the referenced document is deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Book {
    #[serde(rename = "_id", default, skip_serializing_if = "Id::is_unassigned")]
    pub id: Id<Book>,
    pub title: String,
    pub author: Id<Author>,
    pub summary: String,
    pub isbn: String,
    #[serde(default)]
    pub genre: Vec<Id<Genre>>,
}

impl Model for Book {
    const COLLECTION: &'static str = "books";

    fn id(&self) -> &Id<Self> {
        &self.id
    }

    fn assign_id(&mut self, id: Id<Self>) {
        self.id = id;
    }
}

impl Book {
    pub fn schema() -> Schema {
        Schema::new(vec![
            Field::new("title")
                .trim()
                .required("Title must not be empty.")
                .escape(),
            Field::new("author")
                .trim()
                .required("Author must not be empty.")
                .escape(),
            Field::new("summary")
                .trim()
                .required("Summary must not be empty.")
                .escape(),
            Field::new("isbn")
                .trim()
                .required("ISBN must not be empty")
                .escape(),
            Field::new("genre").escape(),
        ])
    }

    pub fn from_form(values: &FormData) -> Self {
        Self {
            id: Id::unassigned(),
            title: values.get("title").to_string(),
            author: Id::new(values.get("author")),
            summary: values.get("summary").to_string(),
            isbn: values.get("isbn").to_string(),
            genre: values
                .all("genre")
                .filter(|genre| !genre.is_empty())
                .map(Id::new)
                .collect(),
        }
    }

    pub fn url(&self) -> String {
        format!("/catalog/book/{}", self.id)
    }

    /// Stored fields and virtuals, with references left unresolved.
    pub fn present(&self) -> Value {
        self.present_with(None, &[])
    }

    /// Stored fields and virtuals with the referenced author and genres
    /// inlined. A missing author renders as null.
    pub fn present_with(&self, author: Option<&Author>, genres: &[&Genre]) -> Value {
        json!({
            "id": self.id,
            "title": self.title,
            "summary": self.summary,
            "isbn": self.isbn,
            "url": self.url(),
            "author_id": self.author,
            "author": author.map(Author::present),
            "genres": genres.iter().map(|genre| genre.present()).collect::<Vec<_>>(),
        })
    }
}
