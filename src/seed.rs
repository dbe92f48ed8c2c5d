//! A small sample library for empty stores.

use libris_db::{Id, Storage, StoreResult};
use serde::Serialize;
use time::macros::date;
use time::Date;

use crate::modules::authors::models::Author;
use crate::modules::bookinstances::models::{BookInstance, Status};
use crate::modules::books::models::Book;
use crate::modules::genres::models::Genre;

/// How many records [`populate`] inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub genres: usize,
    pub authors: usize,
    pub books: usize,
    pub copies: usize,
}

const GENRES: &[&str] = &["Fantasy", "Science Fiction", "French Poetry"];

const AUTHORS: &[(&str, &str, Option<Date>, Option<Date>)] = &[
    ("Patrick", "Rothfuss", Some(date!(1973 - 06 - 06)), None),
    ("Ben", "Bova", Some(date!(1932 - 11 - 08)), None),
    (
        "Isaac",
        "Asimov",
        Some(date!(1920 - 01 - 02)),
        Some(date!(1992 - 04 - 06)),
    ),
    ("Bob", "Billings", None, None),
    ("Jim", "Jones", Some(date!(1971 - 12 - 16)), None),
];

/// (title, summary, isbn, author index, genre indexes)
const BOOKS: &[(&str, &str, &str, usize, &[usize])] = &[
    (
        "The Name of the Wind (The Kingkiller Chronicle, #1)",
        "I have stolen princesses back from sleeping barrow kings.",
        "9781473211896",
        0,
        &[0],
    ),
    (
        "The Wise Man's Fear (The Kingkiller Chronicle, #2)",
        "Picking up the tale of Kvothe Kingkiller once again.",
        "9788401352836",
        0,
        &[0],
    ),
    (
        "Apes and Angels",
        "Humankind headed out to the stars not for conquest, nor exploration.",
        "9780765379528",
        1,
        &[1],
    ),
    (
        "Death Wave",
        "In Ben Bova's previous novel New Earth, Jordan Kell led the first human mission.",
        "9780765379504",
        1,
        &[1],
    ),
    (
        "Test Book 1",
        "Summary of test book 1",
        "ISBN111111",
        4,
        &[0, 1],
    ),
];

/// (book index, imprint, status, due back)
const COPIES: &[(usize, &str, Status, Option<Date>)] = &[
    (0, "London Gollancz, 2014.", Status::Available, None),
    (1, "Gollancz, 2011.", Status::Loaned, Some(date!(2024 - 06 - 01))),
    (2, "Gollancz, 2015.", Status::Available, None),
    (3, "New York Tom Doherty Associates, 2016.", Status::Available, None),
    (3, "New York Tom Doherty Associates, 2016.", Status::Maintenance, None),
    (4, "Imprint XXX2", Status::Reserved, None),
];

/// Insert the sample library, references wired by the ids the store assigns.
pub async fn populate(storage: &Storage) -> StoreResult<SeedReport> {
    let mut genres = Vec::with_capacity(GENRES.len());
    for name in GENRES {
        let mut genre = Genre {
            id: Id::unassigned(),
            name: name.to_string(),
        };
        genres.push(storage.insert(&mut genre).await?);
    }

    let mut authors = Vec::with_capacity(AUTHORS.len());
    for (first_name, family_name, date_of_birth, date_of_death) in AUTHORS {
        let mut author = Author {
            id: Id::unassigned(),
            first_name: first_name.to_string(),
            family_name: family_name.to_string(),
            date_of_birth: *date_of_birth,
            date_of_death: *date_of_death,
        };
        authors.push(storage.insert(&mut author).await?);
    }

    let mut books = Vec::with_capacity(BOOKS.len());
    for (title, summary, isbn, author, genre) in BOOKS {
        let mut book = Book {
            id: Id::unassigned(),
            title: title.to_string(),
            author: authors[*author].clone(),
            summary: summary.to_string(),
            isbn: isbn.to_string(),
            genre: genre.iter().map(|index| genres[*index].clone()).collect(),
        };
        books.push(storage.insert(&mut book).await?);
    }

    for (book, imprint, status, due_back) in COPIES {
        let mut copy = BookInstance {
            id: Id::unassigned(),
            book: books[*book].clone(),
            imprint: imprint.to_string(),
            status: *status,
            due_back: *due_back,
        };
        storage.insert(&mut copy).await?;
    }

    let report = SeedReport {
        genres: genres.len(),
        authors: authors.len(),
        books: books.len(),
        copies: COPIES.len(),
    };
    tracing::info!(?report, "sample library inserted");
    Ok(report)
}
