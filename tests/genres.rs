mod common;

use axum::http::StatusCode;
use common::{create, TestApp};
use libris_app::modules::genres::models::Genre;
use libris_db::{Filter, Id};

#[tokio::test]
async fn create_persists_and_redirects_to_detail() {
    let app = TestApp::new();

    let response = app.post("/catalog/genre/create", &[("name", "Fantasy")]).await;
    let id = response.redirected_id();
    assert_eq!(response.redirect_target(), format!("/catalog/genre/{id}"));

    let stored = app.storage.get(&Id::<Genre>::new(id)).await.unwrap().unwrap();
    assert_eq!(stored.name, "Fantasy");
}

#[tokio::test]
async fn duplicate_name_redirects_to_existing_genre() {
    let app = TestApp::new();
    let first = app.post("/catalog/genre/create", &[("name", "Fantasy")]).await;
    let second = app.post("/catalog/genre/create", &[("name", "Fantasy")]).await;

    assert_eq!(first.redirect_target(), second.redirect_target());
    assert_eq!(app.storage.count::<Genre>(Filter::All).await.unwrap(), 1);

    // names are matched exactly
    app.post("/catalog/genre/create", &[("name", "fantasy")]).await.redirect_target();
    assert_eq!(app.storage.count::<Genre>(Filter::All).await.unwrap(), 2);
}

#[tokio::test]
async fn blank_name_re_renders_form() {
    let app = TestApp::new();

    let response = app.post("/catalog/genre/create", &[("name", "   ")]).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.view(), "genre_form");
    assert_eq!(response.error_messages(), ["Genre name required"]);
    assert_eq!(app.storage.count::<Genre>(Filter::All).await.unwrap(), 0);
}

#[tokio::test]
async fn list_is_sorted_by_name_descending() {
    let app = TestApp::new();
    for name in ["Horror", "Poetry", "Fantasy"] {
        create(&app, "genre", &[("name", name)]).await;
    }

    let response = app.get("/catalog/genres").await;
    assert_eq!(response.view(), "genre_list");
    let names: Vec<_> = response.data()["genre_list"]
        .as_array()
        .unwrap()
        .iter()
        .map(|genre| genre["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["Poetry", "Horror", "Fantasy"]);
}

#[tokio::test]
async fn empty_list_renders_normally() {
    let response = TestApp::new().get("/catalog/genres").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["genre_list"], serde_json::json!([]));
}

#[tokio::test]
async fn detail_shows_books_in_genre() {
    let app = TestApp::new();
    let fantasy = create(&app, "genre", &[("name", "Fantasy")]).await;
    let poetry = create(&app, "genre", &[("name", "Poetry")]).await;
    let author = create(
        &app,
        "author",
        &[("first_name", "Ursula"), ("family_name", "Le Guin")],
    )
    .await;
    for (title, genre) in [("Earthsea", fantasy.as_str()), ("Hard Words", poetry.as_str())] {
        create(
            &app,
            "book",
            &[
                ("title", title),
                ("author", author.as_str()),
                ("summary", "s"),
                ("isbn", "i"),
                ("genre", genre),
            ],
        )
        .await;
    }

    let response = app.get(&format!("/catalog/genre/{fantasy}")).await;
    assert_eq!(response.view(), "genre_detail");
    let data = response.data();
    assert_eq!(data["genre"]["name"], "Fantasy");
    let books = data["genre_books"].as_array().unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["title"], "Earthsea");
}

#[tokio::test]
async fn missing_genre_is_not_found() {
    let response = TestApp::new().get("/catalog/genre/nope").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.view(), "error");
    assert_eq!(response.data()["message"], "Genre not found");
}

#[tokio::test]
async fn delete_flow_removes_genre_from_list() {
    let app = TestApp::new();
    let id = create(&app, "genre", &[("name", "Fantasy")]).await;

    let confirm = app.get(&format!("/catalog/genre/{id}/delete")).await;
    assert_eq!(confirm.view(), "genre_delete");
    assert_eq!(confirm.data()["genre"]["id"], id.as_str());

    let response = app.post(&format!("/catalog/genre/{id}/delete"), &[]).await;
    assert_eq!(response.redirect_target(), "/catalog/genres");

    let list = app.get("/catalog/genres").await;
    assert_eq!(list.data()["genre_list"], serde_json::json!([]));

    // deleting again is not an error
    let again = app.post(&format!("/catalog/genre/{id}/delete"), &[]).await;
    assert_eq!(again.redirect_target(), "/catalog/genres");
}

#[tokio::test]
async fn delete_confirmation_for_missing_genre_redirects_to_list() {
    let response = TestApp::new().get("/catalog/genre/nope/delete").await;
    assert_eq!(response.redirect_target(), "/catalog/genres");
}

#[tokio::test]
async fn update_replaces_name() {
    let app = TestApp::new();
    let id = create(&app, "genre", &[("name", "Fantsy")]).await;

    let form = app.get(&format!("/catalog/genre/{id}/update")).await;
    assert_eq!(form.view(), "genre_form");
    assert_eq!(form.data()["genre"]["name"], "Fantsy");

    let invalid = app
        .post(&format!("/catalog/genre/{id}/update"), &[("name", "")])
        .await;
    assert_eq!(invalid.status, StatusCode::OK);
    assert_eq!(invalid.data()["genre"]["id"], id.as_str());

    let response = app
        .post(&format!("/catalog/genre/{id}/update"), &[("name", "Fantasy")])
        .await;
    assert_eq!(response.redirect_target(), format!("/catalog/genre/{id}"));
    let stored = app.storage.get(&Id::<Genre>::new(id)).await.unwrap().unwrap();
    assert_eq!(stored.name, "Fantasy");
}

#[tokio::test]
async fn store_failure_renders_server_error() {
    let app = TestApp::unavailable();

    let response = app.get("/catalog/genres").await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.view(), "error");
    assert_eq!(response.data()["message"], "database unavailable");

    let response = app.post("/catalog/genre/create", &[("name", "Fantasy")]).await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
}
