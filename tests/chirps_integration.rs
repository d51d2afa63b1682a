mod common;

use common::spawn_app;
use serde_json::{json, Value};
use uuid::Uuid;

#[tokio::test]
async fn create_chirp_returns_201_and_records_author() {
    let app = spawn_app().await;
    let user = app.signed_in_user("walt@breakingbad.com", "04234").await;

    let response = app
        .post_chirp(user["token"].as_str().unwrap(), "I'm the one who knocks!")
        .await;
    assert_eq!(201, response.status().as_u16());

    let chirp: Value = response.json().await.unwrap();
    assert_eq!(chirp["body"], "I'm the one who knocks!");
    assert_eq!(chirp["user_id"], user["id"]);
    assert!(chirp.get("id").is_some());
}

#[tokio::test]
async fn create_chirp_ignores_user_id_in_body() {
    let app = spawn_app().await;
    let user = app.signed_in_user("walt@breakingbad.com", "04234").await;

    let response = app
        .client
        .post(app.url("/api/chirps"))
        .bearer_auth(user["token"].as_str().unwrap())
        .json(&json!({ "body": "hello", "user_id": Uuid::new_v4() }))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(201, response.status().as_u16());

    let chirp: Value = response.json().await.unwrap();
    assert_eq!(chirp["user_id"], user["id"]);
}

#[tokio::test]
async fn create_chirp_censors_profanity() {
    let app = spawn_app().await;
    let user = app.signed_in_user("walt@breakingbad.com", "04234").await;

    let chirp: Value = app
        .post_chirp(
            user["token"].as_str().unwrap(),
            "I hear Mastodon is better than Chirpy. sharbert I need to migrate",
        )
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(
        chirp["body"],
        "I hear Mastodon is better than Chirpy. **** I need to migrate"
    );
}

#[tokio::test]
async fn create_chirp_rejects_long_body() {
    let app = spawn_app().await;
    let user = app.signed_in_user("walt@breakingbad.com", "04234").await;

    let response = app
        .post_chirp(user["token"].as_str().unwrap(), &"a".repeat(141))
        .await;

    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn create_chirp_rejects_malformed_json() {
    let app = spawn_app().await;
    let user = app.signed_in_user("walt@breakingbad.com", "04234").await;

    let response = app
        .client
        .post(app.url("/api/chirps"))
        .bearer_auth(user["token"].as_str().unwrap())
        .header("Content-Type", "application/json")
        .body("{\"body\":")
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn list_chirps_is_public_and_oldest_first() {
    let app = spawn_app().await;
    let user = app.signed_in_user("walt@breakingbad.com", "04234").await;
    let token = user["token"].as_str().unwrap();

    for body in ["first", "second", "third"] {
        app.post_chirp(token, body).await;
    }

    let response = app
        .client
        .get(app.url("/api/chirps"))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(200, response.status().as_u16());

    let chirps: Vec<Value> = response.json().await.unwrap();
    let bodies: Vec<&str> = chirps.iter().filter_map(|c| c["body"].as_str()).collect();
    assert_eq!(bodies, vec!["first", "second", "third"]);
}

#[tokio::test]
async fn get_chirp_by_id() {
    let app = spawn_app().await;
    let user = app.signed_in_user("walt@breakingbad.com", "04234").await;
    let created: Value = app
        .post_chirp(user["token"].as_str().unwrap(), "say my name")
        .await
        .json()
        .await
        .unwrap();

    let response = app
        .client
        .get(app.url(&format!("/api/chirps/{}", created["id"].as_str().unwrap())))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(200, response.status().as_u16());

    let chirp: Value = response.json().await.unwrap();
    assert_eq!(chirp, created);
}

#[tokio::test]
async fn get_chirp_distinguishes_bad_id_from_missing() {
    let app = spawn_app().await;

    let bad_id = app
        .client
        .get(app.url("/api/chirps/not-a-uuid"))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(400, bad_id.status().as_u16());

    let missing = app
        .client
        .get(app.url(&format!("/api/chirps/{}", Uuid::new_v4())))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(404, missing.status().as_u16());
}
