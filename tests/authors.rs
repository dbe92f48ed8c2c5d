mod common;

use axum::http::StatusCode;
use common::{create, TestApp};
use libris_app::modules::authors::models::Author;
use libris_db::{Filter, Id};
use time::macros::date;

#[tokio::test]
async fn create_stores_escaped_names_and_dates() {
    let app = TestApp::new();

    let id = create(
        &app,
        "author",
        &[
            ("first_name", " Flannery "),
            ("family_name", "O'Connor"),
            ("date_of_birth", "1925-03-25"),
            ("date_of_death", "1964-08-03"),
        ],
    )
    .await;

    let author = app.storage.get(&Id::<Author>::new(&*id)).await.unwrap().unwrap();
    assert_eq!(author.first_name, "Flannery");
    assert_eq!(author.family_name, "O&#x27;Connor");
    assert_eq!(author.date_of_birth, Some(date!(1925 - 03 - 25)));

    let detail = app.get(&format!("/catalog/author/{id}")).await;
    assert_eq!(detail.view(), "author_detail");
    assert_eq!(detail.data()["author"]["lifespan"], "3/25/1925 - 8/3/1964");
}

#[tokio::test]
async fn invalid_input_lists_each_error_and_keeps_entries() {
    let app = TestApp::new();

    let response = app
        .post(
            "/catalog/author/create",
            &[
                ("first_name", ""),
                ("family_name", "Woolf"),
                ("date_of_birth", "someday"),
            ],
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.view(), "author_form");
    assert_eq!(
        response.error_messages(),
        ["First name must be specified.", "Invalid date of birth"]
    );
    let draft = response.data()["author"].clone();
    assert_eq!(draft["family_name"], "Woolf");
    assert_eq!(draft["date_of_birth"], "someday");
    assert_eq!(app.storage.count::<Author>(Filter::All).await.unwrap(), 0);
}

#[tokio::test]
async fn list_is_sorted_by_family_name() {
    let app = TestApp::new();
    for (first, family) in [("Jane", "Austen"), ("Emily", "Bronte"), ("Douglas", "Adams")] {
        create(&app, "author", &[("first_name", first), ("family_name", family)]).await;
    }

    let response = app.get("/catalog/authors").await;
    let names: Vec<_> = response.data()["author_list"]
        .as_array()
        .unwrap()
        .iter()
        .map(|author| author["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["Douglas Adams", "Jane Austen", "Emily Bronte"]);
}

#[tokio::test]
async fn detail_lists_their_books_and_missing_author_is_404() {
    let app = TestApp::new();
    let author = create(&app, "author", &[("first_name", "Jim"), ("family_name", "Jones")]).await;
    create(
        &app,
        "book",
        &[("title", "T"), ("author", author.as_str()), ("summary", "s"), ("isbn", "i")],
    )
    .await;

    let detail = app.get(&format!("/catalog/author/{author}")).await;
    assert_eq!(detail.data()["author_books"].as_array().unwrap().len(), 1);

    let missing = app.get("/catalog/author/nope").await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_an_author_leaves_their_books() {
    let app = TestApp::new();
    let author = create(&app, "author", &[("first_name", "Jim"), ("family_name", "Jones")]).await;
    let book = create(
        &app,
        "book",
        &[("title", "T"), ("author", author.as_str()), ("summary", "s"), ("isbn", "i")],
    )
    .await;

    let confirm = app.get(&format!("/catalog/author/{author}/delete")).await;
    assert_eq!(confirm.view(), "author_delete");
    assert_eq!(confirm.data()["author_books"][0]["title"], "T");

    let response = app.post(&format!("/catalog/author/{author}/delete"), &[]).await;
    assert_eq!(response.redirect_target(), "/catalog/authors");

    let list = app.get("/catalog/authors").await;
    assert_eq!(list.data()["author_list"], serde_json::json!([]));

    let detail = app.get(&format!("/catalog/book/{book}")).await;
    assert_eq!(detail.status, StatusCode::OK);
    assert!(detail.data()["book"]["author"].is_null());
}

#[tokio::test]
async fn update_replaces_whole_record() {
    let app = TestApp::new();
    let id = create(
        &app,
        "author",
        &[
            ("first_name", "Ben"),
            ("family_name", "Bova"),
            ("date_of_birth", "1932-11-08"),
        ],
    )
    .await;

    let form = app.get(&format!("/catalog/author/{id}/update")).await;
    assert_eq!(form.data()["author"]["date_of_birth"], "1932-11-08");

    let response = app
        .post(
            &format!("/catalog/author/{id}/update"),
            &[("first_name", "Benjamin"), ("family_name", "Bova")],
        )
        .await;
    assert_eq!(response.redirect_target(), format!("/catalog/author/{id}"));

    let author = app.storage.get(&Id::<Author>::new(id)).await.unwrap().unwrap();
    assert_eq!(author.first_name, "Benjamin");
    assert_eq!(author.date_of_birth, None);
}

#[tokio::test]
async fn rejected_values_come_back_escaped() {
    let app = TestApp::new();
    let long = format!("\"><script>alert(1)</script>{}", "x".repeat(100));

    let response = app
        .post(
            "/catalog/author/create",
            &[
                ("first_name", long.as_str()),
                ("family_name", "Smith"),
                ("date_of_birth", "\"><script>alert(2)</script>"),
            ],
        )
        .await;

    assert_eq!(
        response.error_messages(),
        ["First name must be at most 100 characters.", "Invalid date of birth"]
    );
    assert!(!response.body.contains("<script>"), "body: {}", response.body);
    let draft = response.data()["author"].clone();
    assert!(draft["first_name"]
        .as_str()
        .unwrap()
        .starts_with("&quot;&gt;&lt;script&gt;"));
    assert_eq!(
        draft["date_of_birth"],
        "&quot;&gt;&lt;script&gt;alert(2)&lt;&#x2F;script&gt;"
    );
}

#[tokio::test]
async fn failed_update_re_renders_with_the_same_author() {
    let app = TestApp::new();
    let id = create(&app, "author", &[("first_name", "Mary"), ("family_name", "Shelley")]).await;

    let response = app
        .post(
            &format!("/catalog/author/{id}/update"),
            &[("first_name", "Mary"), ("family_name", "")],
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.view(), "author_form");
    assert_eq!(response.data()["title"], "Update Author");
    assert_eq!(response.error_messages(), ["Family name must be specified."]);
    let draft = response.data()["author"].clone();
    assert_eq!(draft["id"], id.as_str());
    assert_eq!(draft["url"], format!("/catalog/author/{id}"));

    let stored = app.storage.get(&Id::<Author>::new(&*id)).await.unwrap().unwrap();
    assert_eq!(stored.family_name, "Shelley");
}
