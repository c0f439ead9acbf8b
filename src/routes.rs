// src/routes.rs

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    config::AppState,
    docs::ApiDoc,
    handlers,
    middleware::recover::panic_response,
};

// Tabela de despacho da API. Segmentos com formato (YYYY-MM, \d+) são conferidos nos handlers.
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/login", post(handlers::auth::login))
        // Painéis
        .route("/api/dashboard", get(handlers::dashboard::get_dashboard))
        .route("/api/vendor-dashboard", get(handlers::dashboard::get_vendor_dashboard))
        // Administração (stored procedures)
        .route("/api/vendors-permissions", get(handlers::permissions::list_vendors))
        .route("/api/update-permission", post(handlers::permissions::update_permission))
        .route("/api/months-status", get(handlers::permissions::months_status))
        .route(
            "/api/update-month-visibility",
            post(handlers::permissions::update_month_visibility),
        )
        // Períodos (estado em memória)
        .route(
            "/api/periods",
            get(handlers::periods::get_periods).post(handlers::periods::update_periods),
        )
        .route("/api/periods/{year_month}/weeks", post(handlers::periods::set_weeks))
        // Usuários
        .route("/api/sellers", get(handlers::users::list_sellers))
        .route("/api/users", get(handlers::users::list_users))
        .route("/api/users/{id}/active", post(handlers::users::set_active))
        .route("/api/users/{id}/visibility", post(handlers::users::set_visibility))
}

fn with_layers(routes: Router<AppState>, app_state: AppState) -> Router {
    routes
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Nenhuma rota casou (ou casou o path mas não o método)
        .fallback(handlers::static_files::fallback)
        .method_not_allowed_fallback(handlers::static_files::fallback)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

pub fn build_router(app_state: AppState) -> Router {
    with_layers(api_routes(), app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{BackendMode, Config},
        db::MockBackend,
        models::periods::YearMonth,
    };
    use axum::{
        body::{Body, Bytes},
        http::{header, Method, Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use std::{fs, sync::Arc};
    use tempfile::TempDir;
    use tower::ServiceExt;

    const LOGIN_PAGE: &str = "<!doctype html><title>Ingreso</title>";

    struct TestApp {
        router: Router,
        backend: Arc<MockBackend>,
        _web: TempDir,
    }

    fn app_with(extra: Router<AppState>) -> TestApp {
        let web = tempfile::tempdir().unwrap();
        fs::write(web.path().join("login.html"), LOGIN_PAGE).unwrap();
        fs::write(web.path().join("admin.js"), "console.log('admin')").unwrap();

        let config = Config {
            port: 0,
            static_dir: web.path().to_path_buf(),
            backend: BackendMode::Mock,
        };
        let backend = Arc::new(MockBackend::seeded());
        let state = AppState::with_backend(config, backend.clone());

        TestApp {
            router: with_layers(api_routes().merge(extra), state),
            backend,
            _web: web,
        }
    }

    fn app() -> TestApp {
        app_with(Router::new())
    }

    impl TestApp {
        async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Bytes) {
            let request = Request::builder()
                .method(method)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
                .unwrap();

            let response = self.router.clone().oneshot(request).await.unwrap();
            let status = response.status();
            (status, response.into_body().collect().await.unwrap().to_bytes())
        }

        async fn json(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
            let (status, bytes) = self.send(method, uri, body).await;
            (status, serde_json::from_slice(&bytes).unwrap())
        }
    }

    #[tokio::test]
    async fn admin_login_returns_administrador() {
        let app = app();
        let (status, body) = app
            .json(
                Method::POST,
                "/api/login",
                Some(json!({ "username": "henryoo", "password": "Admin*2025!" })),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
        assert_eq!(body["user"]["role"], "Administrador");
        assert_eq!(body["user"]["userId"], 1);
        assert!(body["user"]["lastLoginAt"].is_string());
    }

    #[tokio::test]
    async fn every_mock_credential_logs_in_with_its_role() {
        let app = app();
        for (username, password, role) in [
            ("henryoo", "Admin*2025!", "Administrador"),
            ("harold", "Venta*2025!", "Vendedor"),
        ] {
            let (status, body) = app
                .json(Method::POST, "/api/login", Some(json!({ "username": username, "password": password })))
                .await;
            assert_eq!(status, StatusCode::OK, "{username}");
            assert_eq!(body["user"]["role"], role);
        }
    }

    #[tokio::test]
    async fn wrong_credentials_never_echo_the_password() {
        let app = app();
        let attempts = [
            ("henryoo", "Venta*2025!"),
            ("harold", "Admin*2025!"),
            ("henryoo", "admin*2025!"),
            ("nadie", "Clave-Secreta-123"),
            ("luis", "cualquiera"),
        ];
        for (username, password) in attempts {
            let (status, bytes) = app
                .send(Method::POST, "/api/login", Some(json!({ "username": username, "password": password })))
                .await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{username}/{password}");
            assert!(!String::from_utf8_lossy(&bytes).contains(password));
        }
    }

    #[tokio::test]
    async fn login_validation_names_the_missing_field() {
        let app = app();

        let (status, body) = app.json(Method::POST, "/api/login", Some(json!({ "username": "henryoo" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("password"));

        let (status, body) = app.json(Method::POST, "/api/login", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["ok"], false);

        let (status, bytes) = app.send(Method::POST, "/api/login", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!bytes.is_empty());
    }

    #[tokio::test]
    async fn malformed_json_is_a_bad_request() {
        let app = app();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/login")
            .body(Body::from("{\"username\": "))
            .unwrap();

        let response = app.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_slice(&response.into_body().collect().await.unwrap().to_bytes()).unwrap();
        assert_eq!(body["error"], "JSON inválido");
    }

    #[tokio::test]
    async fn weeks_are_stored_under_their_month() {
        let app = app();
        let weeks = json!({ "weeks": [{ "name": "S1", "from": "2025-11-01", "to": "2025-11-07" }] });

        let (status, body) = app.json(Method::POST, "/api/periods/2025-11/weeks", Some(weeks)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "ok": true }));

        let (status, state) = app.json(Method::GET, "/api/periods", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(state["weeks"]["2025-11"][0]["name"], "S1");
        assert_eq!(state["weeks"]["2025-11"][0]["to"], "2025-11-07");
    }

    #[tokio::test]
    async fn malformed_month_segment_is_an_unknown_route() {
        let app = app();
        let (status, body) = app
            .json(Method::POST, "/api/periods/noviembre/weeks", Some(json!({ "weeks": [] })))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["ok"], false);

        let (status, _) = app
            .json(Method::POST, "/api/periods/2025-13/weeks", Some(json!({ "weeks": [] })))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = app.json(Method::POST, "/api/users/abc/active", Some(json!({ "active": true }))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn periods_update_keeps_default_inside_allowed() {
        let app = app();
        let (status, body) = app
            .json(Method::POST, "/api/periods", Some(json!({ "allowed": [], "default": "2019-01" })))
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
        let current = YearMonth::current_utc().to_string();
        assert_eq!(body["state"]["allowed"], json!([current]));
        assert_eq!(body["state"]["default"], json!(current));
    }

    #[tokio::test]
    async fn vendor_dashboard_requires_user_id() {
        let app = app();
        let (status, body) = app.json(Method::GET, "/api/vendor-dashboard?month=2025-11", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("userId"));

        let (status, _) = app.json(Method::GET, "/api/vendor-dashboard?userId=abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn dashboards_are_served_from_the_mock_and_sessions_closed() {
        let app = app();

        let (status, body) = app.json(Method::GET, "/api/dashboard?month=2025-11", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["period"]["month"], "NOVIEMBRE");
        assert_eq!(body["period"]["year"], 2025);
        assert!(body["performance"].as_array().unwrap().len() > 1);

        let (status, body) = app.json(Method::GET, "/api/vendor-dashboard?userId=2&month=2025-11", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["permission"], "datos_personales");
        assert!(body["weeks"].as_array().is_some());

        assert_eq!(app.backend.open_sessions(), 0);
    }

    #[tokio::test]
    async fn repeated_query_parameters_use_the_first_value() {
        let app = app();

        let (status, body) = app
            .json(Method::GET, "/api/dashboard?month=2025-11&month=2025-10", None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["period"]["month"], "NOVIEMBRE");

        let (status, body) = app
            .json(Method::GET, "/api/vendor-dashboard?userId=2&userId=abc&month=2025-11", None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["period"]["month"], "NOVIEMBRE");

        let (status, months) = app
            .json(Method::GET, "/api/months-status?year=2024&year=2023", None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(months.as_array().unwrap().len(), 12);
        assert!(months[0]["yearMonth"].as_str().unwrap().starts_with("2024-"));
    }

    #[tokio::test]
    async fn admin_endpoints_round_trip_through_the_backend() {
        let app = app();

        let (status, _) = app
            .json(
                Method::POST,
                "/api/update-permission",
                Some(json!({ "userId": 2, "permission": "todos_vendedores" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        let (_, vendors) = app.json(Method::GET, "/api/vendors-permissions", None).await;
        let harold = vendors.as_array().unwrap().iter().find(|v| v["userId"] == 2).unwrap();
        assert_eq!(harold["permission"], "todos_vendedores");

        let (status, body) = app.json(Method::POST, "/api/update-permission", Some(json!({ "userId": 2 }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("permission"));

        let (status, _) = app
            .json(
                Method::POST,
                "/api/update-month-visibility",
                Some(json!({ "yearMonth": "2024-02", "isVisible": true })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        let (_, months) = app.json(Method::GET, "/api/months-status?year=2024", None).await;
        let february = months.as_array().unwrap().iter().find(|m| m["yearMonth"] == "2024-02").unwrap();
        assert_eq!(february["isVisible"], true);

        let (status, body) = app.json(Method::POST, "/api/update-permission", Some(json!({ "userId": 50, "permission": "x" }))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Error al actualizar permiso");
    }

    #[tokio::test]
    async fn user_directory_changes_are_listed() {
        let app = app();

        let (status, _) = app
            .json(Method::POST, "/api/users/2/visibility", Some(json!({ "mode": "todos" })))
            .await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = app.json(Method::POST, "/api/users/3/active", Some(json!({ "active": true }))).await;
        assert_eq!(status, StatusCode::OK);

        let (_, users) = app.json(Method::GET, "/api/users", None).await;
        assert_eq!(users[1]["visibility"], "todos");
        assert_eq!(users[2]["active"], true);

        let (status, _) = app.json(Method::POST, "/api/users/9/active", Some(json!({ "active": false }))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, sellers) = app.json(Method::GET, "/api/sellers", None).await;
        assert_eq!(sellers, json!(["Ana Pérez", "Juan Gómez", "Luis Soto"]));
    }

    #[tokio::test]
    async fn unknown_get_paths_return_the_login_page() {
        let app = app();
        let (_, login) = app.send(Method::GET, "/login.html", None).await;
        assert_eq!(login, Bytes::from_static(LOGIN_PAGE.as_bytes()));

        for uri in ["/", "/dashboard/vendedor", "/../../etc/passwd", "/api/login", "/api/nada"] {
            let (status, body) = app.send(Method::GET, uri, None).await;
            assert_eq!(status, StatusCode::OK, "{uri}");
            assert_eq!(body, login, "{uri}");
        }

        let (status, body) = app.send(Method::GET, "/admin.js", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Bytes::from_static(b"console.log('admin')"));
    }

    #[tokio::test]
    async fn unknown_non_get_routes_are_json_404() {
        let app = app();
        for (method, uri) in [(Method::POST, "/api/nada"), (Method::DELETE, "/api/periods"), (Method::PUT, "/")] {
            let (status, body) = app.json(method, uri, None).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert_eq!(body["error"], "Ruta no encontrada");
        }
    }

    #[tokio::test]
    async fn health_and_openapi_are_exposed() {
        let app = app();
        let (status, body) = app.send(Method::GET, "/api/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Bytes::from_static(b"OK"));

        let (status, doc) = app.json(Method::GET, "/api-docs/openapi.json", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(doc["paths"]["/api/login"].is_object());
    }

    #[tokio::test]
    async fn panicking_handler_becomes_500_and_server_keeps_serving() {
        async fn boom() -> &'static str {
            panic!("fallo inesperado")
        }

        let app = app_with(Router::new().route("/api/boom", get(boom)));
        let (status, body) = app.json(Method::GET, "/api/boom", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Error del servidor");
        assert_eq!(body["details"], "fallo inesperado");

        let (status, _) = app.send(Method::GET, "/api/health", None).await;
        assert_eq!(status, StatusCode::OK);
    }
}
