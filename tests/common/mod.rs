#![allow(dead_code)]

use chrono::Duration;
use serde_json::{json, Value};
use std::net::TcpListener;
use std::sync::Arc;

use chirpy::clock::ManualClock;
use chirpy::configuration::{ApplicationSettings, AuthSettings, Platform};
use chirpy::startup::{run, Services};

pub struct TestApp {
    pub address: String,
    pub clock: ManualClock,
    pub client: reqwest::Client,
}

pub async fn spawn_app() -> TestApp {
    spawn_app_on(Platform::Dev).await
}

pub async fn spawn_app_on(platform: Platform) -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let clock = ManualClock::starting_now();
    // Lowest bcrypt cost keeps the suite fast
    let auth = AuthSettings::new("integration-test-secret").with_password_hash_cost(4);
    let services =
        Services::in_memory(&auth, Arc::new(clock.clone())).expect("Failed to build services");

    let application = ApplicationSettings {
        host: "127.0.0.1".to_string(),
        port,
        platform,
        static_dir: env!("CARGO_MANIFEST_DIR").to_string(),
    };

    let server = run(listener, services, application).expect("Failed to bind address");
    let _ = tokio::spawn(server);

    TestApp {
        address,
        clock,
        client: reqwest::Client::new(),
    }
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn create_user(&self, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/users"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn login(&self, body: Value) -> reqwest::Response {
        self.client
            .post(self.url("/api/login"))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Register and log in, returning the login response body.
    pub async fn signed_in_user(&self, email: &str, password: &str) -> Value {
        let created = self.create_user(email, password).await;
        assert_eq!(201, created.status().as_u16());

        let response = self
            .login(json!({ "email": email, "password": password }))
            .await;
        assert_eq!(200, response.status().as_u16());
        response.json().await.expect("Failed to parse response")
    }

    pub async fn post_with_bearer(&self, path: &str, token: &str) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_chirp(&self, token: &str, body: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/chirps"))
            .bearer_auth(token)
            .json(&json!({ "body": body }))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub fn advance_clock(&self, by: Duration) {
        self.clock.advance(by);
    }
}
