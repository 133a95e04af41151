mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use rust_aqms::models::users::entities::AccountType;
use serde_json::{Value, json};

use common::{ADMIN_PASSWORD, bearer, create_user, setup};

fn peer(n: u8) -> std::net::SocketAddr {
    std::net::SocketAddr::from(([10, 0, 0, n], 40000))
}

#[actix_web::test]
async fn health_is_public() {
    let ctx = setup().await;
    let app = test_app!(ctx);

    let req = test::TestRequest::get()
        .uri("/api/v1/system/health")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn login_issues_token_accepted_by_protected_routes() {
    let ctx = setup().await;
    let app = test_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .peer_addr(peer(1))
        .set_json(json!({"username": "admin", "password": ADMIN_PASSWORD}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let token = body["data"]["access_token"]
        .as_str()
        .expect("access token")
        .to_string();
    assert_eq!(body["data"]["user"]["username"], "admin");

    let req = test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn wrong_password_is_rejected() {
    let ctx = setup().await;
    let app = test_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .peer_addr(peer(2))
        .set_json(json!({"username": "admin", "password": "not-the-password"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn protected_routes_require_a_token() {
    let ctx = setup().await;
    let app = test_app!(ctx);

    for uri in ["/api/v1/users", "/api/v1/frameworks", "/api/v1/surveys"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }
}

#[actix_web::test]
async fn students_cannot_reach_staff_routes() {
    let ctx = setup().await;
    let student = create_user(&ctx.storage, "s1001", AccountType::Student, "Student@123").await;
    let app = test_app!(ctx);

    for uri in ["/api/v1/users", "/api/v1/frameworks", "/api/v1/evaluations/campaigns"] {
        let req = test::TestRequest::get()
            .uri(uri)
            .insert_header(bearer(&student))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN, "{uri}");
    }

    // 评价待办只要求登录
    let req = test::TestRequest::get()
        .uri("/api/v1/evaluations/requests/mine")
        .insert_header(bearer(&student))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn staff_without_grants_is_forbidden_from_user_management() {
    let ctx = setup().await;
    let staff = create_user(&ctx.storage, "lecturer1", AccountType::Staff, "Staff@1234").await;
    let app = test_app!(ctx);

    let req = test::TestRequest::get()
        .uri("/api/v1/users")
        .insert_header(bearer(&staff))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get()
        .uri("/api/v1/users")
        .insert_header(bearer(&ctx.admin))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}
