pub mod health;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};

use crate::applications::handlers as application_handlers;
use crate::auth::handlers as auth_handlers;
use crate::errors::AppError;
use crate::middleware::auth_rate_limit;
use crate::state::AppState;

async fn handle_not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}

pub fn build_router(state: AppState) -> Router {
    // route_layer applies to the routes added before it, so only
    // register/login sit behind the limiter; /me is token-gated instead.
    let auth_routes = Router::new()
        .route("/register", post(auth_handlers::handle_register))
        .route("/login", post(auth_handlers::handle_login))
        .route_layer(from_fn_with_state(state.clone(), auth_rate_limit))
        .route(
            "/me",
            get(auth_handlers::handle_get_me).put(auth_handlers::handle_update_me),
        );

    let application_routes = Router::new()
        .route(
            "/",
            get(application_handlers::handle_list).post(application_handlers::handle_create),
        )
        .route(
            "/:id",
            put(application_handlers::handle_update).delete(application_handlers::handle_delete),
        );

    Router::new()
        .route("/api/health", get(health::health_handler))
        .nest("/api/auth", auth_routes)
        .nest("/api/applications", application_routes)
        .fallback(handle_not_found)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::extract::connect_info::MockConnectInfo;
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::middleware::RateLimiter;
    use crate::state::AppState;
    use crate::store::memory::MemoryStore;

    use super::build_router;

    fn test_config() -> Config {
        Config {
            database_url: String::new(),
            jwt_secret: "test-secret".to_string(),
            port: 0,
            rust_log: "info".to_string(),
        }
    }

    fn test_app_with_limiter(limiter: RateLimiter) -> Router {
        let store = Arc::new(MemoryStore::new());
        let state = AppState {
            users: store.clone(),
            applications: store,
            auth_limiter: Arc::new(limiter),
            config: test_config(),
        };
        build_router(state).layer(MockConnectInfo(SocketAddr::from(([127, 0, 0, 1], 4000))))
    }

    fn test_app() -> Router {
        test_app_with_limiter(RateLimiter::new(1000, Duration::from_secs(900)))
    }

    async fn request(
        app: &Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    async fn register(app: &Router, name: &str, email: &str, password: &str) -> (StatusCode, Value) {
        request(
            app,
            "POST",
            "/api/auth/register",
            None,
            Some(json!({ "name": name, "email": email, "password": password })),
        )
        .await
    }

    fn error_message(body: &Value) -> &str {
        body["error"]["message"].as_str().unwrap_or_default()
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app();
        let (status, body) = request(&app, "GET", "/api/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let app = test_app();
        let (status, body) = request(&app, "GET", "/api/nope", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(error_message(&body), "Route not found");
    }

    #[tokio::test]
    async fn test_register_then_token_authenticates() {
        let app = test_app();
        let (status, body) = register(&app, "Ann", "ann@x.com", "secret1").await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["user"]["name"], "Ann");
        assert_eq!(body["user"]["email"], "ann@x.com");
        assert!(body["user"].get("passwordHash").is_none());
        assert!(body["user"].get("password_hash").is_none());

        let token = body["token"].as_str().unwrap().to_string();
        let (status, body) = request(&app, "GET", "/api/auth/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["email"], "ann@x.com");
        // Unset profile fields come back as empty strings, camelCased.
        assert_eq!(body["user"]["currentRole"], "");
    }

    #[tokio::test]
    async fn test_register_validation() {
        let app = test_app();

        let (status, body) = register(&app, "Ann", "", "secret1").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_message(&body), "All fields are required");

        let (status, body) = register(&app, "Ann", "ann@x.com", "pw").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_message(&body), "Password must be at least 6 characters");
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let app = test_app();
        register(&app, "Ann", "ann@x.com", "secret1").await;

        let (status, body) = register(&app, "Bob", "ann@x.com", "different").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_message(&body), "User already exists");
    }

    #[tokio::test]
    async fn test_login_failure_bodies_are_identical() {
        let app = test_app();
        register(&app, "Ann", "ann@x.com", "secret1").await;

        let (wrong_status, wrong_body) = request(
            &app,
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": "ann@x.com", "password": "wrong00" })),
        )
        .await;
        let (unknown_status, unknown_body) = request(
            &app,
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": "ghost@x.com", "password": "secret1" })),
        )
        .await;

        assert_eq!(wrong_status, StatusCode::BAD_REQUEST);
        assert_eq!(unknown_status, StatusCode::BAD_REQUEST);
        assert_eq!(wrong_body, unknown_body);
        assert_eq!(error_message(&wrong_body), "Invalid credentials");
    }

    #[tokio::test]
    async fn test_missing_or_bad_token_is_unauthorized() {
        let app = test_app();

        let (status, _) = request(&app, "GET", "/api/applications", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) =
            request(&app, "GET", "/api/applications", Some("not-a-token"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_profile_update_applies_only_present_fields() {
        let app = test_app();
        let (_, body) = register(&app, "Ann", "ann@x.com", "secret1").await;
        let token = body["token"].as_str().unwrap().to_string();

        let (status, body) = request(
            &app,
            "PUT",
            "/api/auth/me",
            Some(&token),
            Some(json!({ "currentRole": "Backend Engineer", "location": "Berlin" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["name"], "Ann");
        assert_eq!(body["user"]["currentRole"], "Backend Engineer");
        assert_eq!(body["user"]["location"], "Berlin");
        assert_eq!(body["user"]["targetRole"], "");
    }

    #[tokio::test]
    async fn test_profile_email_conflict() {
        let app = test_app();
        register(&app, "Ann", "ann@x.com", "secret1").await;
        let (_, body) = register(&app, "Bob", "bob@x.com", "secret1").await;
        let token = body["token"].as_str().unwrap().to_string();

        let (status, body) = request(
            &app,
            "PUT",
            "/api/auth/me",
            Some(&token),
            Some(json!({ "email": "ann@x.com" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_message(&body), "Email already in use by another account");
    }

    #[tokio::test]
    async fn test_application_lifecycle_scenario() {
        let app = test_app();
        let (status, body) = register(&app, "Ann", "ann@x.com", "secret1").await;
        assert_eq!(status, StatusCode::CREATED);
        let token = body["token"].as_str().unwrap().to_string();

        // Create: status defaults to Applied.
        let (status, created) = request(
            &app,
            "POST",
            "/api/applications",
            Some(&token),
            Some(json!({ "company": "Google", "position": "SWE" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["status"], "Applied");
        let id = created["id"].as_str().unwrap().to_string();

        // List includes it.
        let (status, listed) = request(&app, "GET", "/api/applications", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed.as_array().unwrap().len(), 1);

        // Partial update changes status only.
        let (status, updated) = request(
            &app,
            "PUT",
            &format!("/api/applications/{id}"),
            Some(&token),
            Some(json!({ "status": "Offer" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["status"], "Offer");
        assert_eq!(updated["company"], "Google");
        assert_eq!(updated["position"], "SWE");

        // Delete, then the list is empty again.
        let (status, body) = request(
            &app,
            "DELETE",
            &format!("/api/applications/{id}"),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Application deleted successfully");

        let (_, listed) = request(&app, "GET", "/api/applications", Some(&token), None).await;
        assert!(listed.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_foreign_application_is_masked_as_not_found() {
        let app = test_app();
        let (_, ann) = register(&app, "Ann", "ann@x.com", "secret1").await;
        let ann_token = ann["token"].as_str().unwrap().to_string();
        let (_, bob) = register(&app, "Bob", "bob@x.com", "secret1").await;
        let bob_token = bob["token"].as_str().unwrap().to_string();

        let (_, created) = request(
            &app,
            "POST",
            "/api/applications",
            Some(&ann_token),
            Some(json!({ "company": "Google", "position": "SWE" })),
        )
        .await;
        let id = created["id"].as_str().unwrap().to_string();

        // Bob never sees Ann's record.
        let (_, listed) = request(&app, "GET", "/api/applications", Some(&bob_token), None).await;
        assert!(listed.as_array().unwrap().is_empty());

        let (status, body) = request(
            &app,
            "PUT",
            &format!("/api/applications/{id}"),
            Some(&bob_token),
            Some(json!({ "status": "Offer" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(error_message(&body), "Application not found for this user");

        let (status, _) = request(
            &app,
            "DELETE",
            &format!("/api/applications/{id}"),
            Some(&bob_token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        // The record survives for its owner.
        let (_, listed) = request(&app, "GET", "/api/applications", Some(&ann_token), None).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_requires_company_and_position() {
        let app = test_app();
        let (_, body) = register(&app, "Ann", "ann@x.com", "secret1").await;
        let token = body["token"].as_str().unwrap().to_string();

        let (status, body) = request(
            &app,
            "POST",
            "/api/applications",
            Some(&token),
            Some(json!({ "company": "   " })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_message(&body), "Company and position are required");
    }

    #[tokio::test]
    async fn test_auth_routes_are_rate_limited() {
        let app = test_app_with_limiter(RateLimiter::new(3, Duration::from_secs(900)));

        for _ in 0..3 {
            let (status, _) = request(
                &app,
                "POST",
                "/api/auth/login",
                None,
                Some(json!({ "email": "ann@x.com", "password": "secret1" })),
            )
            .await;
            assert_ne!(status, StatusCode::TOO_MANY_REQUESTS);
        }

        let (status, body) = request(
            &app,
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": "ann@x.com", "password": "secret1" })),
        )
        .await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            error_message(&body),
            "Too many auth requests, please try again later."
        );
    }
}
