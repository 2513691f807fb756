use axum::Router;
use tokio::net::TcpListener;
use tracing::{error, info};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::infrastructure::settings::Settings;
use crate::presentation::middleware::cors::apply_cors;
use crate::presentation::middleware::limits::apply_limits;
use crate::presentation::middleware::trace::apply_trace;
use crate::presentation::openapi::ApiDoc;
use crate::presentation::{AppState, routes};

pub(crate) async fn run_http(settings: &Settings, state: AppState) -> anyhow::Result<()> {
    let app = build_router(state);
    let app = apply_limits(app, settings);
    let app = apply_trace(app);
    let app = apply_cors(app, settings)?;

    let listener = TcpListener::bind(&settings.http_addr).await?;

    info!(addr = %settings.http_addr, "HTTP server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("HTTP server stopped");
    Ok(())
}

pub(crate) fn build_router(state: AppState) -> Router {
    routes::app(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
        response::Response,
    };
    use chrono::{Duration, Utc};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::build_router;
    use crate::application::account_controller::AccountController;
    use crate::application::membership_service::AccountMembershipService;
    use crate::application::post_service::PostService;
    use crate::domain::post::{Post, PostRecord};
    use crate::infrastructure::forms_auth::CookieFormsAuthentication;
    use crate::infrastructure::jwt::JwtService;
    use crate::presentation::AppState;
    use crate::test_support::{FakeMembershipProvider, FakePostRepository, sample_user};

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn app() -> (Router, Arc<JwtService>) {
        let jwt = Arc::new(JwtService::new(SECRET));
        let forms_auth = Arc::new(CookieFormsAuthentication::new(jwt.clone(), 1800, 86_400));
        let membership = AccountMembershipService::new(Arc::new(FakeMembershipProvider::new()));
        let account = Arc::new(AccountController::new(forms_auth, membership));

        let now = Utc::now();
        let published_by = sample_user("author").user_id;
        let post = Post::new(PostRecord {
            id: 1,
            title: "Hello".to_string(),
            is_published: true,
            published_at: Some(now - Duration::days(1)),
            expires_at: None,
            content: "First post".to_string(),
            is_comments_enabled: true,
            published_by,
        })
        .expect("post must be valid");
        let posts = Arc::new(PostService::new(Arc::new(FakePostRepository::with_posts(
            vec![post],
        ))));

        let state = AppState::new(account, posts, jwt.clone(), false);
        (build_router(state), jwt)
    }

    fn form_post(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::post(uri).header(
            header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        );
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder
            .body(Body::from(body.to_string()))
            .expect("request must build")
    }

    fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::get(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).expect("request must build")
    }

    async fn json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body must be readable");
        serde_json::from_slice(&bytes).expect("body must be JSON")
    }

    fn header_str<'a>(response: &'a Response, name: header::HeaderName) -> &'a str {
        response
            .headers()
            .get(name)
            .expect("header must be present")
            .to_str()
            .expect("header must be ascii")
    }

    #[tokio::test]
    async fn healthz_reports_ok() {
        let (app, _) = app();

        let response = app.oneshot(get("/healthz", None)).await.expect("infallible");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn register_signs_in_and_redirects_home() {
        let (app, jwt) = app();

        let response = app
            .oneshot(form_post(
                "/Account/Register",
                "username=someUser&email=email&password=goodPass&confirmPassword=goodPass",
                None,
            ))
            .await
            .expect("infallible");

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(header_str(&response, header::LOCATION), "/");
        let cookie = header_str(&response, header::SET_COOKIE);
        let token = cookie
            .strip_prefix("ki_auth=")
            .and_then(|rest| rest.split(';').next())
            .expect("session cookie must be set");
        assert_eq!(
            jwt.verify_token(token).expect("token must verify").sub,
            "someUser"
        );
        assert!(!cookie.contains("Max-Age"));
    }

    #[tokio::test]
    async fn register_with_mismatched_passwords_redisplays_form() {
        let (app, _) = app();

        let response = app
            .oneshot(form_post(
                "/Account/Register",
                "username=someUser&email=email&password=goodPass&confirmPassword=otherPass",
                None,
            ))
            .await
            .expect("infallible");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
        let body = json(response).await;
        assert_eq!(body["view"], "Register");
        assert_eq!(body["password_length"], 6);
        assert_eq!(
            body["errors"]["_FORM"][0],
            "The new password and confirmation password do not match."
        );
    }

    #[tokio::test]
    async fn log_on_uses_return_url_from_query() {
        let (app, _) = app();

        let response = app
            .oneshot(form_post(
                "/Account/LogOn?ReturnUrl=%2Fsomeurl",
                "username=someUser&password=goodPass&rememberMe=true",
                None,
            ))
            .await
            .expect("infallible");

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(header_str(&response, header::LOCATION), "/someurl");
        assert!(header_str(&response, header::SET_COOKIE).contains("Max-Age=86400"));
    }

    #[tokio::test]
    async fn log_on_with_bad_password_shows_credential_error() {
        let (app, _) = app();

        let response = app
            .oneshot(form_post(
                "/Account/LogOn",
                "username=someUser&password=badPass",
                None,
            ))
            .await
            .expect("infallible");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json(response).await;
        assert_eq!(body["view"], "LogOn");
        assert_eq!(
            body["errors"]["_FORM"][0],
            "The username or password provided is incorrect."
        );
    }

    #[tokio::test]
    async fn log_off_clears_cookie() {
        let (app, _) = app();

        let response = app
            .oneshot(get("/Account/LogOff", None))
            .await
            .expect("infallible");

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(header_str(&response, header::LOCATION), "/");
        assert!(header_str(&response, header::SET_COOKIE).starts_with("ki_auth=;"));
    }

    #[tokio::test]
    async fn change_password_requires_session() {
        let (app, _) = app();

        let response = app
            .oneshot(get("/Account/ChangePassword", None))
            .await
            .expect("infallible");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn change_password_rejects_forged_cookie() {
        let (app, _) = app();

        let response = app
            .oneshot(get("/Account/ChangePassword", Some("ki_auth=not-a-token")))
            .await
            .expect("infallible");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn change_password_form_shows_password_length() {
        let (app, jwt) = app();
        let token = jwt.generate_token("someUser", 600).expect("token");
        let cookie = format!("ki_auth={token}");

        let response = app
            .oneshot(get("/Account/ChangePassword", Some(&cookie)))
            .await
            .expect("infallible");

        assert_eq!(response.status(), StatusCode::OK);
        let body = json(response).await;
        assert_eq!(body["view"], "ChangePassword");
        assert_eq!(body["password_length"], 6);
    }

    #[tokio::test]
    async fn change_password_redirects_to_success() {
        let (app, jwt) = app();
        let token = jwt.generate_token("someUser", 600).expect("token");
        let cookie = format!("ki_auth={token}");

        let response = app
            .oneshot(form_post(
                "/Account/ChangePassword",
                "currentPassword=oldPass&newPassword=newPass&confirmPassword=newPass",
                Some(&cookie),
            ))
            .await
            .expect("infallible");

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            header_str(&response, header::LOCATION),
            "/Account/ChangePasswordSuccess"
        );
        assert!(response.headers().get(header::SET_COOKIE).is_none());
    }

    #[tokio::test]
    async fn home_lists_published_posts() {
        let (app, _) = app();

        let response = app.oneshot(get("/?limit=5", None)).await.expect("infallible");

        assert_eq!(response.status(), StatusCode::OK);
        let body = json(response).await;
        assert_eq!(body["limit"], 5);
        assert_eq!(body["total"], 1);
        assert_eq!(body["posts"][0]["title"], "Hello");
    }

    #[tokio::test]
    async fn home_rejects_out_of_range_limit() {
        let (app, _) = app();

        let response = app
            .oneshot(get("/Home/Index?limit=500", None))
            .await
            .expect("infallible");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_post_is_not_found() {
        let (app, _) = app();

        let response = app
            .oneshot(get("/Posts/Details/42", None))
            .await
            .expect("infallible");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
