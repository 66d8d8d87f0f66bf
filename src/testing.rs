use axum::http::HeaderMap;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use uuid::Uuid;

use crate::auth::password;
use crate::config::Config;
use crate::models::{city, faculty, major, province, role, user};

/// A test application builder for integration testing.
///
/// Spins up the API server with an in-memory SQLite database.
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_register() {
///     let app = TestApp::new().await;
///     let refs = app.seed_reference_data().await;
///     let res = app
///         .client
///         .post(&app.url("/api/auth/register"), &app.register_payload(&refs, "12345678", "a@b.com", "0812345678901"))
///         .await;
///     assert_eq!(res.status, 201);
/// }
/// ```
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: TestClient,
    pub db: DatabaseConnection,
    pub config: Config,
}

/// IDs of the reference rows seeded by [`TestApp::seed_reference_data`].
#[derive(Debug, Clone, Copy)]
pub struct ReferenceIds {
    pub province_id: Uuid,
    pub city_id: Uuid,
    pub faculty_id: Uuid,
    pub major_id: Uuid,
    /// A second province the seeded city does not belong to.
    pub other_province_id: Uuid,
}

impl TestApp {
    /// Create a new test app with an in-memory SQLite database.
    pub async fn new() -> Self {
        let config = Config {
            database_url: "sqlite::memory:".to_string(),
            access_token_secret: "test-access-secret".to_string(),
            refresh_token_secret: "test-refresh-secret".to_string(),
            access_token_expiry_hours: 24,
            refresh_token_expiry_days: 7,
            // bcrypt's minimum cost keeps tests fast
            bcrypt_cost: 4,
            server_host: "127.0.0.1".to_string(),
            server_port: 0, // OS assigns a random port
            environment: "test".to_string(),
            redis_url: None,
        };

        Self::with_config(config).await
    }

    /// Create a new test app with a custom config.
    pub async fn with_config(config: Config) -> Self {
        let app = crate::App::with_config(config)
            .await
            .expect("Failed to create test app");

        let router = app.router();
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test server");
        let addr = listener.local_addr().expect("Failed to get local addr");

        // Spawn the server in the background
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let client = TestClient::new(addr);

        TestApp {
            addr,
            client,
            db: app.db,
            config: app.config,
        }
    }

    /// Get the base URL for the test server.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Insert the location and faculty rows registrations refer to.
    pub async fn seed_reference_data(&self) -> ReferenceIds {
        let province_id = Uuid::new_v4();
        province::ActiveModel {
            id: Set(province_id),
            name: Set("Jawa Barat".to_string()),
        }
        .insert(&self.db)
        .await
        .expect("Failed to seed province");

        let other_province_id = Uuid::new_v4();
        province::ActiveModel {
            id: Set(other_province_id),
            name: Set("Jawa Timur".to_string()),
        }
        .insert(&self.db)
        .await
        .expect("Failed to seed province");

        let city_id = Uuid::new_v4();
        city::ActiveModel {
            id: Set(city_id),
            name: Set("Bandung".to_string()),
            province_id: Set(province_id),
        }
        .insert(&self.db)
        .await
        .expect("Failed to seed city");

        let faculty_id = Uuid::new_v4();
        faculty::ActiveModel {
            id: Set(faculty_id),
            name: Set("Engineering".to_string()),
        }
        .insert(&self.db)
        .await
        .expect("Failed to seed faculty");

        let major_id = Uuid::new_v4();
        major::ActiveModel {
            id: Set(major_id),
            name: Set("Computer Science".to_string()),
            faculty_id: Set(faculty_id),
        }
        .insert(&self.db)
        .await
        .expect("Failed to seed major");

        ReferenceIds {
            province_id,
            city_id,
            faculty_id,
            major_id,
            other_province_id,
        }
    }

    /// Build a valid registration body with password `password123`.
    pub fn register_payload(&self, refs: &ReferenceIds, nim: &str, email: &str, phone: &str) -> String {
        serde_json::json!({
            "nim": nim,
            "name": "Test Alumni",
            "email": email,
            "password": "password123",
            "phone_number": phone,
            "enrollment_year": 2018,
            "graduation_year": 2022,
            "province_id": refs.province_id,
            "city_id": refs.city_id,
            "faculty_id": refs.faculty_id,
            "major_id": refs.major_id,
            "verification_file_url": "https://example.com/ijazah.pdf",
        })
        .to_string()
    }

    /// Register a user through the API, returning the created user JSON.
    pub async fn register_user(
        &self,
        refs: &ReferenceIds,
        nim: &str,
        email: &str,
        phone: &str,
    ) -> serde_json::Value {
        let res = self
            .client
            .post(
                &self.url("/api/auth/register"),
                &self.register_payload(refs, nim, email, phone),
            )
            .await;
        assert_eq!(res.status, 201, "Register failed: {}", res.body);
        res.data()
    }

    /// Login and return (access_token, refresh_token).
    pub async fn login(&self, nim: &str, plain_password: &str) -> (String, String) {
        let body = serde_json::json!({
            "nim": nim,
            "password": plain_password,
        });

        let res = self
            .client
            .post(&self.url("/api/auth/login"), &body.to_string())
            .await;
        assert_eq!(res.status, 200, "Login failed: {}", res.body);

        let data = res.data();
        (
            data["access_token"].as_str().unwrap().to_string(),
            data["refresh_token"].as_str().unwrap().to_string(),
        )
    }

    /// Insert an admin account directly and log it in through the API.
    /// Returns (access_token, user_id).
    pub async fn create_admin(
        &self,
        refs: &ReferenceIds,
        nim: &str,
        plain_password: &str,
    ) -> (String, Uuid) {
        let admin_role = role::Entity::find()
            .filter(role::Column::Name.eq("Admin"))
            .one(&self.db)
            .await
            .expect("Failed to query roles")
            .expect("Admin role not seeded");

        let user_id = Uuid::new_v4();
        let now = Utc::now().naive_utc();
        user::ActiveModel {
            id: Set(user_id),
            nim: Set(nim.to_string()),
            name: Set("Test Admin".to_string()),
            email: Set(format!("{}@admin.test", nim)),
            password_hash: Set(password::hash_password(plain_password, 4)
                .expect("Failed to hash password")),
            phone_number: Set(format!("08{}", nim)),
            enrollment_year: Set(2010),
            graduation_year: Set(2014),
            role_id: Set(admin_role.id),
            province_id: Set(refs.province_id),
            city_id: Set(refs.city_id),
            faculty_id: Set(refs.faculty_id),
            major_id: Set(refs.major_id),
            verification_file_url: Set("https://example.com/admin.pdf".to_string()),
            refresh_token: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .expect("Failed to insert admin");

        let (access, _) = self.login(nim, plain_password).await;
        (access, user_id)
    }
}

/// A simple HTTP test client with helper methods.
#[derive(Clone)]
pub struct TestClient {
    inner: reqwest::Client,
    base_addr: SocketAddr,
}

impl TestClient {
    /// Create a new test client pointing at the given address.
    pub fn new(addr: SocketAddr) -> Self {
        TestClient {
            inner: reqwest::Client::new(),
            base_addr: addr,
        }
    }

    /// Send a GET request.
    pub async fn get(&self, url: &str) -> TestResponse {
        let res: reqwest::Response = self
            .inner
            .get(url)
            .send()
            .await
            .expect("GET request failed");
        TestResponse::from_response(res).await
    }

    /// Send a GET request with an auth token.
    pub async fn get_with_auth(&self, url: &str, token: &str) -> TestResponse {
        let res: reqwest::Response = self
            .inner
            .get(url)
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .expect("GET request failed");
        TestResponse::from_response(res).await
    }

    /// Send a POST request with a JSON body.
    pub async fn post(&self, url: &str, body: &str) -> TestResponse {
        let res: reqwest::Response = self
            .inner
            .post(url)
            .header("Content-Type", "application/json")
            .body(body.to_string())
            .send()
            .await
            .expect("POST request failed");
        TestResponse::from_response(res).await
    }

    /// Send a POST request with auth token and JSON body.
    pub async fn post_with_auth(&self, url: &str, token: &str, body: &str) -> TestResponse {
        let res: reqwest::Response = self
            .inner
            .post(url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", token))
            .body(body.to_string())
            .send()
            .await
            .expect("POST request failed");
        TestResponse::from_response(res).await
    }

    /// Send a PUT request with auth token and JSON body.
    pub async fn put_with_auth(&self, url: &str, token: &str, body: &str) -> TestResponse {
        let res: reqwest::Response = self
            .inner
            .put(url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", token))
            .body(body.to_string())
            .send()
            .await
            .expect("PUT request failed");
        TestResponse::from_response(res).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, url: &str) -> TestResponse {
        let res: reqwest::Response = self
            .inner
            .delete(url)
            .send()
            .await
            .expect("DELETE request failed");
        TestResponse::from_response(res).await
    }

    /// Send a DELETE request with auth token.
    pub async fn delete_with_auth(&self, url: &str, token: &str) -> TestResponse {
        let res: reqwest::Response = self
            .inner
            .delete(url)
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .expect("DELETE request failed");
        TestResponse::from_response(res).await
    }

    /// Get the base URL.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.base_addr)
    }
}

/// A simplified HTTP response for test assertions.
#[derive(Debug)]
pub struct TestResponse {
    pub status: u16,
    pub body: String,
    pub headers: HeaderMap,
}

impl TestResponse {
    async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let headers = res.headers().clone();
        let body = res.text().await.unwrap_or_default();
        TestResponse {
            status,
            body,
            headers,
        }
    }

    /// Parse the body as JSON.
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("Failed to parse response as JSON")
    }

    /// Check if the response indicates success.
    pub fn is_success(&self) -> bool {
        let json = self.json();
        json["success"].as_bool().unwrap_or(false)
    }

    /// Get the data field from the response.
    pub fn data(&self) -> serde_json::Value {
        self.json()["data"].clone()
    }

    /// Get the error field from the response.
    pub fn error(&self) -> serde_json::Value {
        self.json()["error"].clone()
    }
}
