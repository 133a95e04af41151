mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::{Value, json};

use common::{bearer, setup};

fn peer(n: u8) -> std::net::SocketAddr {
    std::net::SocketAddr::from(([10, 0, 2, n], 40000))
}

#[actix_web::test]
async fn public_survey_accepts_one_response_per_invitation() {
    let ctx = setup().await;
    let app = test_app!(ctx);
    let auth = bearer(&ctx.admin);

    macro_rules! send {
        ($req:expr) => {{
            let resp = test::call_service(&app, $req.to_request()).await;
            let status = resp.status();
            let body: Value = test::read_body_json(resp).await;
            (status, body)
        }};
    }

    let (status, survey) = send!(
        test::TestRequest::post()
            .uri("/api/v1/surveys")
            .insert_header(auth.clone())
            .set_json(json!({"title": "Course exit survey"}))
    );
    assert_eq!(status, StatusCode::CREATED, "{survey}");
    let survey_id = survey["data"]["id"].as_i64().expect("survey id");

    // 没有题目不能发布
    let (status, _) = send!(
        test::TestRequest::put()
            .uri(&format!("/api/v1/surveys/{survey_id}"))
            .insert_header(auth.clone())
            .set_json(json!({"status": "published"}))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, rating) = send!(
        test::TestRequest::post()
            .uri(&format!("/api/v1/surveys/{survey_id}/questions"))
            .insert_header(auth.clone())
            .set_json(json!({"kind": "rating", "prompt": "Overall satisfaction", "scale": 5}))
    );
    assert_eq!(status, StatusCode::CREATED, "{rating}");
    let rating_id = rating["data"]["id"].as_i64().expect("question id");

    let (status, comment) = send!(
        test::TestRequest::post()
            .uri(&format!("/api/v1/surveys/{survey_id}/questions"))
            .insert_header(auth.clone())
            .set_json(json!({"kind": "text", "prompt": "What should change?", "required": false}))
    );
    assert_eq!(status, StatusCode::CREATED, "{comment}");
    let comment_id = comment["data"]["id"].as_i64().expect("question id");

    let (status, _) = send!(
        test::TestRequest::put()
            .uri(&format!("/api/v1/surveys/{survey_id}"))
            .insert_header(auth.clone())
            .set_json(json!({"status": "published"}))
    );
    assert_eq!(status, StatusCode::OK);

    let (status, invitations) = send!(
        test::TestRequest::post()
            .uri(&format!("/api/v1/surveys/{survey_id}/assignments"))
            .insert_header(auth.clone())
            .set_json(json!({"emails": ["Graduate@Example.edu", "graduate@example.edu", "alumni@example.edu"]}))
    );
    assert_eq!(status, StatusCode::CREATED, "{invitations}");
    let invitations = invitations["data"].as_array().expect("invitations").clone();
    assert_eq!(invitations.len(), 2);
    let token = invitations[0]["token"].as_str().expect("token").to_string();

    let (status, detail) = send!(
        test::TestRequest::get()
            .uri(&format!("/api/v1/public/surveys/{token}"))
            .peer_addr(peer(1))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["data"]["questions"].as_array().map(Vec::len), Some(2));

    // 评分越界
    let (status, _) = send!(
        test::TestRequest::post()
            .uri(&format!("/api/v1/public/surveys/{token}/responses"))
            .peer_addr(peer(1))
            .set_json(json!({"answers": [{"question_id": rating_id, "value": 9}]}))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let answers = json!({"answers": [
        {"question_id": rating_id, "value": 4},
        {"question_id": comment_id, "value": "More lab time"}
    ]});
    let (status, first) = send!(
        test::TestRequest::post()
            .uri(&format!("/api/v1/public/surveys/{token}/responses"))
            .peer_addr(peer(1))
            .set_json(answers.clone())
    );
    assert_eq!(status, StatusCode::CREATED, "{first}");

    let (status, _) = send!(
        test::TestRequest::post()
            .uri(&format!("/api/v1/public/surveys/{token}/responses"))
            .peer_addr(peer(1))
            .set_json(answers)
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, results) = send!(
        test::TestRequest::get()
            .uri(&format!("/api/v1/surveys/{survey_id}/results"))
            .insert_header(auth.clone())
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(results["data"]["invited"], 2);
    assert_eq!(results["data"]["responded"], 1);
    assert_eq!(results["data"]["response_rate"], 50.0);
    assert_eq!(results["data"]["questions"][0]["average"], 4.0);
}

#[actix_web::test]
async fn unknown_and_revoked_tokens_are_rejected() {
    let ctx = setup().await;
    let app = test_app!(ctx);
    let auth = bearer(&ctx.admin);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/public/surveys/{}", "0".repeat(32)))
        .peer_addr(peer(2))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri("/api/v1/public/surveys/not-a-token")
        .peer_addr(peer(2))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/v1/surveys")
        .insert_header(auth.clone())
        .set_json(json!({"title": "Alumni survey", "anonymous": true}))
        .to_request();
    let survey: Value = test::call_and_read_body_json(&app, req).await;
    let survey_id = survey["data"]["id"].as_i64().expect("survey id");

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/surveys/{survey_id}/questions"))
        .insert_header(auth.clone())
        .set_json(json!({"kind": "single_choice", "prompt": "Employed?", "options": ["Yes", "No"]}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/surveys/{survey_id}"))
        .insert_header(auth.clone())
        .set_json(json!({"status": "published"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/surveys/{survey_id}/assignments"))
        .insert_header(auth.clone())
        .set_json(json!({"emails": ["alumni@example.edu"]}))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let assignment_id = created["data"][0]["id"].as_i64().expect("assignment id");
    let token = created["data"][0]["token"]
        .as_str()
        .expect("token")
        .to_string();

    let req = test::TestRequest::delete()
        .uri(&format!(
            "/api/v1/surveys/{survey_id}/assignments/{assignment_id}"
        ))
        .insert_header(auth.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/public/surveys/{token}"))
        .peer_addr(peer(2))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
