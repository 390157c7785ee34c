mod common;

use chrono::NaiveDate;

use devconnector::client::{actions, ApiClient, AuthAction, ExperienceForm, PostAction, ProfileAction, ProfileForm, Store};

use common::spawn_server;

fn profile_form() -> ProfileForm {
    ProfileForm {
        status: "Developer".to_string(),
        skills: "rust, sql".to_string(),
        company: Some("Acme".to_string()),
        githubusername: Some("octocat".to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_auth_flow() {
    let base_url = spawn_server().await;
    let mut api = ApiClient::new(&base_url);
    let mut store = Store::default();
    assert!(store.auth.loading);

    let action = actions::register(&mut api, "Ann", "a@x.com", "secret1").await;
    store.dispatch(action);
    assert!(store.auth.is_authenticated);
    assert!(api.token().is_some());

    store.dispatch(actions::load_user(&api).await);
    assert_eq!(store.auth.user.as_ref().map(|u| u.name.as_str()), Some("Ann"));

    store.dispatch(actions::logout(&mut api));
    assert!(!store.auth.is_authenticated);
    assert_eq!(api.token(), None);

    let action = actions::login(&mut api, "a@x.com", "wrong99").await;
    match &action {
        AuthAction::AuthError(failure) => {
            assert_eq!(failure.status, 400);
            assert_eq!(failure.msg, "Invalid user credentials");
        }
        other => panic!("expected AuthError, got {:?}", other),
    }
    store.dispatch(action);
    assert!(!store.auth.is_authenticated);

    store.dispatch(actions::login(&mut api, "a@x.com", "secret1").await);
    assert!(store.auth.is_authenticated);
}

#[tokio::test]
async fn test_profile_flow() {
    let base_url = spawn_server().await;
    let mut api = ApiClient::new(&base_url);
    let mut store = Store::default();

    store.dispatch(actions::register(&mut api, "Ann", "a@x.com", "secret1").await);

    store.dispatch(actions::get_current_profile(&api).await);
    let error = store.profile.error.clone().unwrap();
    assert_eq!(error.status, 400);
    assert_eq!(error.msg, "There is no profile for this user");

    store.dispatch(actions::create_profile(&api, &profile_form()).await);
    let profile = store.profile.profile.clone().unwrap();
    assert_eq!(profile.skills, ["rust", "sql"]);
    assert_eq!(profile.user.name.as_deref(), Some("Ann"));

    let form = ExperienceForm {
        title: "Engineer".to_string(),
        company: "Acme".to_string(),
        location: None,
        from: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
        to: None,
        current: true,
        description: None,
    };
    store.dispatch(actions::add_experience(&api, &form).await);
    let experience = store.profile.profile.as_ref().unwrap().experience.clone();
    assert_eq!(experience.len(), 1);
    assert!(experience[0].current);

    store.dispatch(actions::delete_experience(&api, &experience[0].id).await);
    assert!(store.profile.profile.as_ref().unwrap().experience.is_empty());

    for action in actions::get_all_profiles(&api).await {
        store.dispatch(action);
    }
    assert_eq!(store.profile.profile, None);
    assert_eq!(store.profile.profiles.len(), 1);

    // The test server points GitHub at a closed port
    let action = actions::get_github_repos(&api, "octocat").await;
    match action {
        ProfileAction::ProfileError(ref failure) => assert_eq!(failure.status, 500),
        ref other => panic!("expected ProfileError, got {:?}", other),
    }

    let action = actions::delete_account(&mut api).await;
    store.dispatch(action);
    assert!(!store.auth.is_authenticated);
    assert_eq!(api.token(), None);

    let action = actions::login(&mut api, "a@x.com", "secret1").await;
    assert!(matches!(action, AuthAction::AuthError(_)));
}

#[tokio::test]
async fn test_post_flow() {
    let base_url = spawn_server().await;
    let mut ann = ApiClient::new(&base_url);
    let mut bob = ApiClient::new(&base_url);
    let mut store = Store::default();

    actions::register(&mut ann, "Ann", "a@x.com", "secret1").await;
    actions::register(&mut bob, "Bob", "b@x.com", "secret1").await;

    store.dispatch(actions::get_posts(&bob).await);
    assert!(store.post.posts.is_empty());

    store.dispatch(actions::add_post(&ann, "Hello").await);
    let post_id = store.post.posts[0].id.clone();

    store.dispatch(actions::add_like(&bob, &post_id).await);
    assert_eq!(store.post.posts[0].likes.len(), 1);

    let action = actions::add_like(&bob, &post_id).await;
    assert!(matches!(action, PostAction::PostError(ref f) if f.msg == "Post already liked"));
    store.dispatch(action);
    assert_eq!(store.post.posts[0].likes.len(), 1);

    store.dispatch(actions::remove_like(&bob, &post_id).await);
    assert!(store.post.posts[0].likes.is_empty());

    store.dispatch(actions::get_post(&bob, &post_id).await);
    store.dispatch(actions::add_comment(&bob, &post_id, "Nice post").await);
    let comments = store.post.post.as_ref().unwrap().comments.clone();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].name, "Bob");

    let action = actions::delete_comment(&ann, &post_id, &comments[0].id).await;
    assert!(matches!(action, PostAction::PostError(ref f) if f.status == 401));

    store.dispatch(actions::delete_comment(&bob, &post_id, &comments[0].id).await);
    assert!(store.post.post.as_ref().unwrap().comments.is_empty());

    let action = actions::delete_post(&bob, &post_id).await;
    assert!(matches!(action, PostAction::PostError(ref f) if f.msg == "User not authorized"));

    store.dispatch(actions::delete_post(&ann, &post_id).await);
    assert!(store.post.posts.is_empty());
}
