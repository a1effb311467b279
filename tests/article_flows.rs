mod common;

use std::time::Duration;

use common::mock_backend::{MockBackend, MockResponse};
use common::{article_json, make_app, make_signed_in_app};
use kata_blog::articles::{ArticleError, EditorForm, PublishOutcome};
use kata_blog::validation::FieldName;

#[tokio::test]
async fn detail_is_fetched_once_then_served_from_store() {
    let mock = MockBackend::start().await;
    mock.enqueue_response(MockResponse::json(&article_json("hello", "bob", false, 2)))
        .await;
    let (_dir, app) = make_app(&mock.base_url());

    let first = app.load_article("hello").await.unwrap();
    let second = app.load_article("hello").await.unwrap();

    assert_eq!(first, second);
    let requests = mock.captured_requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/articles/hello");
    assert_eq!(app.store().state().articles[0].slug, "hello");
}

#[tokio::test]
async fn slug_is_sent_as_one_path_segment() {
    let mock = MockBackend::start().await;
    mock.enqueue_response(MockResponse::json(&article_json("a/b?c#d", "bob", false, 0)))
        .await;
    let (_dir, app) = make_app(&mock.base_url());

    app.load_article("a/b?c#d").await.unwrap();

    let requests = mock.captured_requests().await;
    assert_eq!(requests[0].path, "/articles/a%2Fb%3Fc%23d");
    assert_eq!(requests[0].query, None);
}

#[tokio::test]
async fn missing_article_is_terminal() {
    let mock = MockBackend::start().await;
    mock.enqueue_response(MockResponse::error(404, "")).await;
    let (_dir, app) = make_app(&mock.base_url());

    let err = app.load_article("gone").await.unwrap_err();

    assert!(matches!(err, ArticleError::NotFound));
    assert_eq!(err.to_string(), "Requested resource not found");
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn favorite_shows_new_value_while_in_flight() {
    let mock = MockBackend::start().await;
    mock.enqueue_response(MockResponse::json(&article_json("hello", "bob", false, 2)))
        .await;
    mock.enqueue_response(
        MockResponse::json(&article_json("hello", "bob", true, 5)).with_delay(300),
    )
    .await;
    let (_dir, app) = make_signed_in_app(&mock.base_url(), "alice");
    app.load_article("hello").await.unwrap();

    let (result, during) = tokio::join!(app.toggle_favorite("hello"), async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        app.store().state().article("hello").cloned().unwrap()
    });

    assert!(during.favorited);
    assert_eq!(during.favorites_count, 3);

    let article = result.unwrap();
    assert_eq!(article.favorites_count, 5);
    assert_eq!(app.store().state().article("hello"), Some(&article));

    let requests = mock.captured_requests().await;
    assert_eq!(requests[1].method, "POST");
    assert_eq!(requests[1].path, "/articles/hello/favorite");
}

#[tokio::test]
async fn unfavorite_keeps_count_until_server_answers() {
    let mock = MockBackend::start().await;
    mock.enqueue_response(MockResponse::json(&article_json("hello", "bob", true, 4)))
        .await;
    mock.enqueue_response(
        MockResponse::json(&article_json("hello", "bob", false, 3)).with_delay(300),
    )
    .await;
    let (_dir, app) = make_signed_in_app(&mock.base_url(), "alice");
    app.load_article("hello").await.unwrap();

    let (result, during) = tokio::join!(app.toggle_favorite("hello"), async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        app.store().state().article("hello").cloned().unwrap()
    });

    assert!(!during.favorited);
    assert_eq!(during.favorites_count, 4);
    assert_eq!(result.unwrap().favorites_count, 3);
    assert_eq!(mock.captured_requests().await[1].method, "DELETE");
}

#[tokio::test]
async fn failed_favorite_restores_previous_entry() {
    let mock = MockBackend::start().await;
    mock.enqueue_response(MockResponse::json(&article_json("hello", "bob", false, 2)))
        .await;
    mock.enqueue_response(MockResponse::error(500, "down")).await;
    let (_dir, app) = make_signed_in_app(&mock.base_url(), "alice");
    let before = app.load_article("hello").await.unwrap();

    let err = app.toggle_favorite("hello").await.unwrap_err();

    assert_eq!(err.to_string(), "Server error (500)");
    assert_eq!(app.store().state().article("hello"), Some(&before));
    assert_eq!(app.store().state().articles.len(), 1);
}

#[tokio::test]
async fn favorite_requires_session() {
    let mock = MockBackend::start().await;
    let (_dir, app) = make_app(&mock.base_url());

    let err = app.toggle_favorite("hello").await.unwrap_err();
    assert!(matches!(err, ArticleError::NotSignedIn));
    assert!(mock.captured_requests().await.is_empty());
}

#[tokio::test]
async fn only_the_author_may_edit() {
    let mock = MockBackend::start().await;
    mock.enqueue_response(MockResponse::json(&article_json("hello", "bob", false, 0)))
        .await;
    let (_dir, app) = make_signed_in_app(&mock.base_url(), "alice");

    let err = app.open_editor("hello").await.err().unwrap();

    assert!(matches!(err, ArticleError::NotAuthor));
    assert_eq!(
        err.to_string(),
        "You are not author of this article so you can't edit it"
    );
}

#[tokio::test]
async fn author_edit_updates_cached_entry() {
    let mock = MockBackend::start().await;
    mock.enqueue_response(MockResponse::json(&article_json("hello", "alice", false, 0)))
        .await;
    let mut updated: serde_json::Value =
        serde_json::from_str(&article_json("hello", "alice", false, 0)).unwrap();
    updated["article"]["title"] = "New title".into();
    mock.enqueue_response(MockResponse::json(&updated.to_string())).await;
    let (_dir, app) = make_signed_in_app(&mock.base_url(), "alice");

    let mut editor = app.open_editor("hello").await.unwrap();
    assert_eq!(editor.form.value(FieldName::Title), "Title of hello");
    assert_eq!(editor.form.values().tags(), ["rust".to_string()]);
    editor.form.change(FieldName::Title, "New title").await;

    let outcome = app.publish_article(&mut editor).await.unwrap();

    let requests = mock.captured_requests().await;
    assert_eq!(requests[1].method, "PUT");
    assert_eq!(requests[1].path, "/articles/hello");
    let body = requests[1].json();
    assert_eq!(body["article"]["title"], "New title");
    assert_eq!(body["article"]["tagList"], serde_json::json!(["rust"]));

    assert!(matches!(outcome, PublishOutcome::Published(_)));
    assert_eq!(
        app.store().state().article("hello").map(|a| a.title.as_str()),
        Some("New title")
    );
}

#[tokio::test]
async fn new_article_is_posted() {
    let mock = MockBackend::start().await;
    mock.enqueue_response(MockResponse::json(&article_json("fresh", "alice", false, 0)))
        .await;
    let (_dir, app) = make_signed_in_app(&mock.base_url(), "alice");

    let mut editor = EditorForm::new();
    editor.form.change(FieldName::Title, "Fresh").await;
    editor.form.change(FieldName::Description, "New").await;
    editor.form.change(FieldName::Body, "Text").await;

    let outcome = app.publish_article(&mut editor).await.unwrap();

    let requests = mock.captured_requests().await;
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].path, "/articles");
    let PublishOutcome::Published(article) = outcome else {
        panic!("expected published");
    };
    assert_eq!(article.slug, "fresh");
}

#[tokio::test]
async fn incomplete_article_is_not_sent() {
    let mock = MockBackend::start().await;
    let (_dir, app) = make_signed_in_app(&mock.base_url(), "alice");

    let mut editor = EditorForm::new();
    editor.form.change(FieldName::Title, "Only a title").await;

    assert_eq!(
        app.publish_article(&mut editor).await.unwrap(),
        PublishOutcome::Invalid
    );
    assert!(mock.captured_requests().await.is_empty());
}

#[tokio::test]
async fn delete_failure_carries_response_text() {
    let mock = MockBackend::start().await;
    mock.enqueue_response(MockResponse::error(403, "not yours")).await;
    let (_dir, app) = make_signed_in_app(&mock.base_url(), "alice");

    let err = app.delete_article("hello").await.unwrap_err();

    assert_eq!(err.to_string(), "Wrong request (403)");
    assert_eq!(err.details(), Some("not yours"));
    let requests = mock.captured_requests().await;
    assert_eq!(requests[0].method, "DELETE");
    assert_eq!(requests[0].path, "/articles/hello");
}

#[tokio::test]
async fn delete_success() {
    let mock = MockBackend::start().await;
    mock.enqueue_response(MockResponse::empty(204)).await;
    let (_dir, app) = make_signed_in_app(&mock.base_url(), "alice");

    app.delete_article("hello").await.unwrap();
}
