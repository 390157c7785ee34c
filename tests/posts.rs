mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;
use tokio::task::JoinSet;
use uuid::Uuid;

use common::{app, create_post, register, send, user_id};

#[tokio::test]
async fn test_post_shows_author_in_feed() {
    let app = app().await;
    let ann = register(&app, "Ann", "a@x.com").await;

    create_post(&app, &ann, "Hello").await;

    let (status, body) = send(&app, Method::GET, "/api/post", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let posts = body.as_array().unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["text"], "Hello");
    assert_eq!(posts[0]["name"], "Ann");
    assert_eq!(posts[0]["user"], user_id(&app, &ann).await);
    assert!(posts[0]["avatar"].as_str().unwrap().contains("gravatar.com"));
}

#[tokio::test]
async fn test_feed_is_newest_first() {
    let app = app().await;
    let ann = register(&app, "Ann", "a@x.com").await;

    create_post(&app, &ann, "first").await;
    create_post(&app, &ann, "second").await;
    create_post(&app, &ann, "third").await;

    let (_, body) = send(&app, Method::GET, "/api/post", None, None).await;
    let texts: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["text"].as_str().unwrap().to_string())
        .collect();

    assert_eq!(texts, ["third", "second", "first"]);
}

#[tokio::test]
async fn test_create_post_requires_text_and_token() {
    let app = app().await;
    let ann = register(&app, "Ann", "a@x.com").await;

    let (status, body) = send(&app, Method::POST, "/api/post", Some(&ann), Some(json!({ "text": "" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["param"], "text");

    let (status, _) = send(&app, Method::POST, "/api/post", Some(&ann), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, Method::POST, "/api/post", None, Some(json!({ "text": "Hi" }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["msg"].is_string());
}

#[tokio::test]
async fn test_get_post_by_id() {
    let app = app().await;
    let ann = register(&app, "Ann", "a@x.com").await;
    let post_id = create_post(&app, &ann, "Hello").await;

    let (status, body) = send(&app, Method::GET, &format!("/api/post/{post_id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["_id"], post_id.as_str());
    assert_eq!(body["likes"], json!([]));
    assert_eq!(body["comments"], json!([]));

    let missing = Uuid::new_v4();
    let (status, body) = send(&app, Method::GET, &format!("/api/post/{missing}"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["msg"], "Post not found");

    let (status, body) = send(&app, Method::GET, "/api/post/not-an-id", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["param"], "post_id");
}

#[tokio::test]
async fn test_only_author_can_delete_post() {
    let app = app().await;
    let ann = register(&app, "Ann", "a@x.com").await;
    let bob = register(&app, "Bob", "b@x.com").await;
    let post_id = create_post(&app, &ann, "Hello").await;
    let uri = format!("/api/post/{post_id}");

    let (status, body) = send(&app, Method::DELETE, &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["msg"], "User not authorized");

    let (status, body) = send(&app, Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "Hello");

    let (status, body) = send(&app, Method::DELETE, &uri, Some(&ann), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["msg"], "Post deleted");

    let (status, _) = send(&app, Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, &uri, Some(&ann), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_like_unlike_cycle() {
    let app = app().await;
    let ann = register(&app, "Ann", "a@x.com").await;
    let bob = register(&app, "Bob", "b@x.com").await;
    let bob_id = user_id(&app, &bob).await;
    let post_id = create_post(&app, &ann, "Hello").await;
    let uri = format!("/api/post/like/{post_id}");

    let (status, body) = send(&app, Method::POST, &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{ "user": bob_id }]));

    let (status, body) = send(&app, Method::POST, &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["msg"], "Post already liked");

    let (_, post) = send(&app, Method::GET, &format!("/api/post/{post_id}"), None, None).await;
    assert_eq!(post["likes"].as_array().unwrap().len(), 1);

    let (status, body) = send(&app, Method::DELETE, &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    // Unliking again is not an error
    let (status, body) = send(&app, Method::DELETE, &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_unlike_keeps_other_likes() {
    let app = app().await;
    let ann = register(&app, "Ann", "a@x.com").await;
    let bob = register(&app, "Bob", "b@x.com").await;
    let ann_id = user_id(&app, &ann).await;
    let post_id = create_post(&app, &ann, "Hello").await;
    let uri = format!("/api/post/like/{post_id}");

    send(&app, Method::POST, &uri, Some(&ann), None).await;
    send(&app, Method::POST, &uri, Some(&bob), None).await;

    let (status, body) = send(&app, Method::DELETE, &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{ "user": ann_id }]));
}

#[tokio::test]
async fn test_concurrent_likes_by_same_user_count_once() {
    let app = app().await;
    let ann = register(&app, "Ann", "a@x.com").await;
    let bob = register(&app, "Bob", "b@x.com").await;
    let post_id = create_post(&app, &ann, "Hello").await;
    let uri = format!("/api/post/like/{post_id}");

    let (first, second) = tokio::join!(
        send(&app, Method::POST, &uri, Some(&bob), None),
        send(&app, Method::POST, &uri, Some(&bob), None),
    );

    let mut statuses = [first.0, second.0];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::OK, StatusCode::BAD_REQUEST]);

    let (_, post) = send(&app, Method::GET, &format!("/api/post/{post_id}"), None, None).await;
    assert_eq!(post["likes"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_concurrent_likes_and_comments_from_many_users() {
    let app = app().await;
    let ann = register(&app, "Ann", "a@x.com").await;
    let post_id = create_post(&app, &ann, "Hello").await;

    let mut tokens = Vec::new();
    for i in 0..16 {
        tokens.push(register(&app, &format!("User {i}"), &format!("user{i}@x.com")).await);
    }

    let mut tasks = JoinSet::new();
    for token in tokens {
        let app = app.clone();
        let like = format!("/api/post/like/{post_id}");
        let comment = format!("/api/post/comment/{post_id}");
        tasks.spawn(async move {
            let (liked, _) = send(&app, Method::POST, &like, Some(&token), None).await;
            let (commented, _) =
                send(&app, Method::POST, &comment, Some(&token), Some(json!({ "text": "Nice" }))).await;
            (liked, commented)
        });
    }

    while let Some(result) = tasks.join_next().await {
        let (liked, commented) = result.unwrap();
        assert_eq!(liked, StatusCode::OK);
        assert_eq!(commented, StatusCode::OK);
    }

    let (_, post) = send(&app, Method::GET, &format!("/api/post/{post_id}"), None, None).await;
    assert_eq!(post["likes"].as_array().unwrap().len(), 16);
    assert_eq!(post["comments"].as_array().unwrap().len(), 16);
}

#[tokio::test]
async fn test_like_missing_post() {
    let app = app().await;
    let bob = register(&app, "Bob", "b@x.com").await;

    let uri = format!("/api/post/like/{}", Uuid::new_v4());
    let (status, _) = send(&app, Method::POST, &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::POST, &uri, None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_comment_lifecycle() {
    let app = app().await;
    let ann = register(&app, "Ann", "a@x.com").await;
    let bob = register(&app, "Bob", "b@x.com").await;
    let bob_id = user_id(&app, &bob).await;
    let post_id = create_post(&app, &ann, "Hello").await;

    let (status, comments) = send(
        &app,
        Method::POST,
        &format!("/api/post/comment/{post_id}"),
        Some(&bob),
        Some(json!({ "text": "Nice post" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(comments.as_array().unwrap().len(), 1);
    assert_eq!(comments[0]["user"], bob_id.as_str());
    assert_eq!(comments[0]["name"], "Bob");
    assert_eq!(comments[0]["text"], "Nice post");

    let comment_id = comments[0]["_id"].as_str().unwrap().to_string();
    let uri = format!("/api/post/comment/{post_id}/{comment_id}");

    // The post author does not own the comment
    let (status, body) = send(&app, Method::DELETE, &uri, Some(&ann), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["msg"], "User not authorized");

    let (status, body) = send(&app, Method::DELETE, &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, body) = send(&app, Method::DELETE, &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["msg"], "Comment not found");
}

#[tokio::test]
async fn test_comment_validation_and_missing_post() {
    let app = app().await;
    let bob = register(&app, "Bob", "b@x.com").await;
    let missing = Uuid::new_v4();

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/post/comment/{missing}"),
        Some(&bob),
        Some(json!({ "text": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["param"], "text");

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/api/post/comment/{missing}"),
        Some(&bob),
        Some(json!({ "text": "Hi" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["msg"], "Post not found");

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/post/comment/{missing}/{}", Uuid::new_v4()),
        Some(&bob),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
