use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;
use tower_sessions::cookie::SameSite;
use tower_sessions::{MemoryStore, SessionManagerLayer};

use crate::{handlers, middleware, state::AppState};

pub fn build_router(state: AppState) -> Router {
    // Cookie session only carries flashed toasts
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_name("session");

    Router::new()
        .route("/", get(handlers::home))
        // Auth routes
        .route("/login", get(handlers::serve_login_page).post(handlers::handle_login))
        .route("/register", post(handlers::handle_register))
        .route("/logout", post(handlers::handle_logout))

        // Dashboard routes
        .route("/profile", get(handlers::serve_user_dashboard).post(handlers::submit_profile))
        .route("/services", post(handlers::create_service))
        .route("/services/:id", post(handlers::update_service))
        .route("/services/:id/delete", post(handlers::delete_service))

        .nest_service("/static", ServeDir::new("static"))
        .layer(from_fn_with_state(state.clone(), middleware::require_session))
        .layer(session_layer)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::models::ServiceForm;
    use crate::services::storage::{SERVICES_KEY, TOKEN_KEY, USER_KEY};
    use crate::services::{MemoryStorage, ServiceCatalog, Storage};

    const SELLER: &str = r#"{"name":"Asha Rao","email":"asha@example.com","role":"earner","skills":["Logo"]}"#;
    const BUYER: &str = r#"{"name":"Ravi","role":"buyer"}"#;

    async fn app_with(user: Option<&str>) -> (Router, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        if let Some(user) = user {
            storage.set_item(TOKEN_KEY, "tok").await.unwrap();
            storage.set_item(USER_KEY, user).await.unwrap();
        }
        let state = AppState::new(storage.clone(), Config::for_tests());
        (build_router(state), storage)
    }

    fn service_form(title: &str, price: &str) -> ServiceForm {
        ServiceForm {
            title: title.into(),
            category: "design".into(),
            description: "Vector logo".into(),
            price: price.into(),
            delivery: "3".into(),
            image: String::new(),
        }
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_form(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn location(response: &Response) -> &str {
        response.headers().get(header::LOCATION).unwrap().to_str().unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn profile_without_session_redirects_to_login() {
        let (app, _) = app_with(None).await;
        let response = app.oneshot(get_req("/profile")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/login");
    }

    #[tokio::test]
    async fn malformed_user_counts_as_logged_out() {
        let (app, storage) = app_with(None).await;
        storage.set_item(TOKEN_KEY, "tok").await.unwrap();
        storage.set_item(USER_KEY, "{not json").await.unwrap();
        let response = app.oneshot(get_req("/profile")).await.unwrap();
        assert_eq!(location(&response), "/login");
    }

    #[tokio::test]
    async fn login_page_is_public() {
        let (app, _) = app_with(None).await;
        let response = app.oneshot(get_req("/login?tab=signup")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains(r#"id="signupFormContainer" style="display: block""#));
        assert!(html.contains(r#"class="active" href="/login""#));
    }

    #[tokio::test]
    async fn seller_sees_services_and_not_orders() {
        let (app, storage) = app_with(Some(SELLER)).await;
        storage
            .set_item(
                SERVICES_KEY,
                r#"[{"id":1,"title":"Logo Design","category":"design","description":"d","price":500,"delivery":3,"image":null}]"#,
            )
            .await
            .unwrap();

        let response = app.oneshot(get_req("/profile")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Logo Design"));
        assert!(html.contains("Service Provider"));
        assert!(html.contains(">AR<"));
        assert!(html.contains("sellerSection"));
        assert!(!html.contains("buyerSection"));
    }

    #[tokio::test]
    async fn buyer_sees_orders() {
        let (app, storage) = app_with(Some(BUYER)).await;
        storage.set_item("userOrders", r#"[{"id":"o1","serviceName":"Logo"}]"#).await.unwrap();
        let html = body_text(app.oneshot(get_req("/profile")).await.unwrap()).await;
        assert!(html.contains("buyerSection"));
        assert!(html.contains("PENDING"));
        assert!(!html.contains("sellerSection"));
    }

    #[tokio::test]
    async fn edit_link_prefills_the_service_editor() {
        let (app, storage) = app_with(Some(SELLER)).await;
        let catalog = ServiceCatalog::new(storage.clone());
        let service = catalog.create(&service_form("Logo Design", "500")).await.unwrap();

        let uri = format!("/profile?modal=service&edit={}", service.id);
        let html = body_text(app.oneshot(get_req(&uri)).await.unwrap()).await;
        assert!(html.contains("Edit Service"));
        assert!(html.contains(&format!(r#"action="/services/{}""#, service.id)));
        assert!(html.contains(r#"value="Logo Design""#));
    }

    #[tokio::test]
    async fn creating_a_service_persists_and_redirects() {
        let (app, storage) = app_with(Some(SELLER)).await;
        let response = app
            .oneshot(post_form(
                "/services",
                "title=Logo+Design&category=design&description=Vector+logo&price=500&delivery=3&image=",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/profile");

        let services = ServiceCatalog::new(storage).load().await;
        assert_eq!(services.len(), 1);
        assert_eq!(services[0].title, "Logo Design");
    }

    #[tokio::test]
    async fn invalid_service_keeps_editor_open() {
        let (app, storage) = app_with(Some(SELLER)).await;
        let response = app
            .oneshot(post_form(
                "/services",
                "title=Logo+Design&category=design&description=Vector+logo&price=99&delivery=3",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("List New Service"));
        assert!(html.contains(r#"value="99""#));
        assert!(html.contains("Price must be numeric and at least ₹100"));
        assert_eq!(storage.get_item(SERVICES_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_needs_confirmation() {
        let (app, storage) = app_with(Some(SELLER)).await;
        let catalog = ServiceCatalog::new(storage.clone());
        let service = catalog.create(&service_form("Banner", "300")).await.unwrap();
        let uri = format!("/services/{}/delete", service.id);

        let response = app.clone().oneshot(post_form(&uri, "")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(catalog.load().await.len(), 1);

        app.oneshot(post_form(&uri, "confirm=yes")).await.unwrap();
        assert!(catalog.load().await.is_empty());
    }

    #[tokio::test]
    async fn invalid_profile_edit_shows_field_errors() {
        let (app, storage) = app_with(Some(SELLER)).await;
        let before = storage.get_item(USER_KEY).await.unwrap();
        let response = app
            .oneshot(post_form("/profile", "name=&email=nope"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Name is required"));
        assert!(html.contains("Valid email is required"));
        assert_eq!(storage.get_item(USER_KEY).await.unwrap(), before);
    }

    #[tokio::test]
    async fn profile_edit_saves_user() {
        let (app, storage) = app_with(Some(SELLER)).await;
        let response = app
            .oneshot(post_form("/profile", "name=Asha+R&email=asha%40example.com&skills=Logo%2C+SEO"))
            .await
            .unwrap();
        assert_eq!(location(&response), "/profile");

        let saved: serde_json::Value =
            serde_json::from_str(&storage.get_item(USER_KEY).await.unwrap().unwrap()).unwrap();
        assert_eq!(saved["name"], "Asha R");
        assert_eq!(saved["skills"], serde_json::json!(["Logo", "SEO"]));
        assert_eq!(saved["role"], "earner");
    }

    #[tokio::test]
    async fn logout_clears_session() {
        let (app, storage) = app_with(Some(SELLER)).await;
        storage.set_item(SERVICES_KEY, "[]").await.unwrap();
        let response = app.oneshot(post_form("/logout", "")).await.unwrap();
        assert_eq!(location(&response), "/login");
        assert_eq!(storage.get_item(TOKEN_KEY).await.unwrap(), None);
        assert_eq!(storage.get_item(SERVICES_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn login_with_unreachable_api_returns_to_form() {
        let (app, storage) = app_with(None).await;
        let response = app
            .oneshot(post_form("/login", "email=asha%40example.com&password=pw"))
            .await
            .unwrap();
        assert_eq!(location(&response), "/login");
        assert_eq!(storage.get_item(TOKEN_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn update_route_changes_only_the_matched_service() {
        let (app, storage) = app_with(Some(SELLER)).await;
        let catalog = ServiceCatalog::new(storage.clone());
        let first = catalog.create(&service_form("Logo Design", "500")).await.unwrap();
        let second = catalog.create(&service_form("Banner", "300")).await.unwrap();

        let response = app
            .oneshot(post_form(
                &format!("/services/{}", second.id),
                "title=Wide+Banner&category=design&description=Web+banner&price=450&delivery=2&image=",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/profile");

        let services = catalog.load().await;
        assert_eq!(services.len(), 2);
        assert_eq!(services[0], first);
        assert_eq!(services[1].id, second.id);
        assert_eq!(services[1].title, "Wide Banner");
        assert_eq!(services[1].price, 450);
        assert_eq!(services[1].created_at, second.created_at);
    }

    #[tokio::test]
    async fn unknown_service_ids_show_not_found() {
        let (app, _) = app_with(Some(SELLER)).await;
        for uri in ["/profile?confirm_delete=999", "/profile?modal=service&edit=999"] {
            let response = app.clone().oneshot(get_req(uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            let html = body_text(response).await;
            assert!(html.contains("Service not found"), "{uri}");
            assert!(!html.contains(r#"id="serviceModal""#), "{uri}");
        }
    }

    #[tokio::test]
    async fn buyers_cannot_change_services() {
        let (app, storage) = app_with(Some(BUYER)).await;
        let response = app
            .clone()
            .oneshot(post_form(
                "/services",
                "title=Logo+Design&category=design&description=Vector+logo&price=500&delivery=3",
            ))
            .await
            .unwrap();
        assert_eq!(location(&response), "/profile");
        assert_eq!(storage.get_item(SERVICES_KEY).await.unwrap(), None);

        let catalog = ServiceCatalog::new(storage.clone());
        let service = catalog.create(&service_form("Banner", "300")).await.unwrap();
        let before = storage.get_item(SERVICES_KEY).await.unwrap();

        let update = format!("/services/{}", service.id);
        let body = "title=Changed&category=design&description=d&price=900&delivery=1";
        app.clone().oneshot(post_form(&update, body)).await.unwrap();
        let delete = format!("/services/{}/delete", service.id);
        app.oneshot(post_form(&delete, "confirm=yes")).await.unwrap();

        assert_eq!(storage.get_item(SERVICES_KEY).await.unwrap(), before);
    }

    #[tokio::test]
    async fn placeholder_like_titles_render_literally() {
        let (app, storage) = app_with(Some(SELLER)).await;
        storage
            .set_item(
                SERVICES_KEY,
                r#"[{"id":1,"title":"{{modals}}","category":"design","description":"d","price":500,"delivery":3}]"#,
            )
            .await
            .unwrap();

        let html = body_text(app.oneshot(get_req("/profile?modal=service")).await.unwrap()).await;
        assert!(html.contains("{{modals}}"));
        assert_eq!(html.matches(r#"id="serviceModal""#).count(), 1);
    }
}
