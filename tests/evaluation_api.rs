mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use chrono::{Duration, Utc};
use serde_json::{Value, json};

use common::{bearer, csv_multipart, setup};

fn peer(n: u8) -> std::net::SocketAddr {
    std::net::SocketAddr::from(([10, 0, 1, n], 40000))
}

fn id_of(body: &Value) -> i64 {
    body["data"]["id"].as_i64().expect("id in response data")
}

#[actix_web::test]
async fn evaluation_can_only_be_submitted_once() {
    let ctx = setup().await;
    let app = test_app!(ctx);
    let auth = bearer(&ctx.admin);

    macro_rules! post_json {
        ($uri:expr, $body:expr) => {{
            let req = test::TestRequest::post()
                .uri(&$uri)
                .insert_header(auth.clone())
                .set_json($body)
                .to_request();
            let resp = test::call_service(&app, req).await;
            let status = resp.status();
            let body: Value = test::read_body_json(resp).await;
            (status, body)
        }};
    }

    let (status, framework) = post_json!(
        "/api/v1/frameworks".to_string(),
        json!({
            "code": "SE-2024",
            "name": "Software Engineering",
            "major": "Software Engineering",
            "cohort": "K2024",
            "academic_year": "2024-2025"
        })
    );
    assert_eq!(status, StatusCode::CREATED, "{framework}");
    let framework_id = id_of(&framework);

    let (status, course) = post_json!(
        format!("/api/v1/frameworks/{framework_id}/courses"),
        json!({"code": "SE101", "name": "Intro to Software Engineering", "credits": 3})
    );
    assert_eq!(status, StatusCode::CREATED, "{course}");
    let course_id = id_of(&course);

    let (status, clo) = post_json!(
        format!("/api/v1/frameworks/{framework_id}/outcomes/clos"),
        json!({"code": "CLO1", "description": "Communicate designs clearly", "course_id": course_id})
    );
    assert_eq!(status, StatusCode::CREATED, "{clo}");
    let clo_id = id_of(&clo);

    let (status, rubric) = post_json!(
        "/api/v1/rubrics".to_string(),
        json!({
            "framework_id": framework_id,
            "course_id": course_id,
            "title": "Presentation rubric",
            "definition": {
                "rows": [
                    {"key": "clarity", "label": "Clarity", "clo_id": clo_id},
                    {"key": "teamwork", "label": "Teamwork"}
                ],
                "columns": [
                    {"label": "Weak", "score": 1},
                    {"label": "Good", "score": 3},
                    {"label": "Excellent", "score": 4}
                ]
            }
        })
    );
    assert_eq!(status, StatusCode::CREATED, "{rubric}");
    let rubric_id = id_of(&rubric);

    let (status, student) = post_json!(
        format!("/api/v1/frameworks/{framework_id}/students"),
        json!({
            "student_code": "SE001",
            "full_name": "Linh Tran",
            "email": "linh.tran@example.edu",
            "username": "se001",
            "password": "Student@1234"
        })
    );
    assert_eq!(status, StatusCode::CREATED, "{student}");
    let student_id = student["data"]["student"]["id"].as_i64().expect("student id");

    let (status, campaign) = post_json!(
        "/api/v1/evaluations/campaigns".to_string(),
        json!({
            "framework_id": framework_id,
            "rubric_id": rubric_id,
            "title": "Capstone 360",
            "start_at": Utc::now() - Duration::days(1),
            "end_at": Utc::now() + Duration::days(7),
            "status": "open"
        })
    );
    assert_eq!(status, StatusCode::CREATED, "{campaign}");
    let campaign_id = id_of(&campaign);

    let (status, requests) = post_json!(
        format!("/api/v1/evaluations/campaigns/{campaign_id}/requests"),
        json!({
            "evaluatee_id": student_id,
            "evaluators": [{"evaluator_id": ctx.admin.id, "group_role": "faculty"}]
        })
    );
    assert_eq!(status, StatusCode::CREATED, "{requests}");
    let request_id = requests["data"]["created"][0]["id"]
        .as_i64()
        .expect("request id");

    let submission = json!({
        "items": [
            {"row_key": "clarity", "score": 4},
            {"row_key": "teamwork", "score": 3}
        ],
        "comment": "Clear structure and good pacing"
    });
    let (status, first) = post_json!(
        format!("/api/v1/evaluations/requests/{request_id}/submit"),
        submission.clone()
    );
    assert_eq!(status, StatusCode::OK, "{first}");

    let (status, second) = post_json!(
        format!("/api/v1/evaluations/requests/{request_id}/submit"),
        submission
    );
    assert_eq!(status, StatusCode::BAD_REQUEST, "{second}");

    // 评价生成的观察挂在已提交请求上，不能单独删除
    let observation_id = first["data"]["observation"]["id"]
        .as_i64()
        .expect("observation id");
    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/observations/{observation_id}"))
        .insert_header(auth.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/evaluations/requests/{request_id}"))
        .insert_header(auth.clone())
        .to_request();
    let detail: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(detail["data"]["request"]["status"], "submitted");
    assert_eq!(detail["data"]["request"]["observation_id"], observation_id);

    // 量表仍引用该 CLO，CLO 与其课程都不能删除
    for uri in [
        format!("/api/v1/frameworks/{framework_id}/outcomes/clos/{clo_id}"),
        format!("/api/v1/frameworks/{framework_id}/courses/{course_id}"),
    ] {
        let req = test::TestRequest::delete()
            .uri(&uri)
            .insert_header(auth.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
    }

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/evaluations/campaigns/{campaign_id}/progress"))
        .insert_header(auth.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/students/{student_id}/attainment"))
        .insert_header(auth.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn self_evaluation_by_another_user_is_reported_per_row() {
    let ctx = setup().await;
    let app = test_app!(ctx);
    let auth = bearer(&ctx.admin);

    let req = test::TestRequest::post()
        .uri("/api/v1/frameworks")
        .insert_header(auth.clone())
        .set_json(json!({
            "code": "IT-2024",
            "name": "Information Technology",
            "major": "Information Technology",
            "cohort": "K2024",
            "academic_year": "2024-2025"
        }))
        .to_request();
    let framework: Value = test::call_and_read_body_json(&app, req).await;
    let framework_id = id_of(&framework);

    let req = test::TestRequest::post()
        .uri("/api/v1/rubrics")
        .insert_header(auth.clone())
        .set_json(json!({
            "framework_id": framework_id,
            "title": "Peer review",
            "definition": {
                "rows": [{"key": "effort", "label": "Effort"}],
                "columns": [{"label": "Low", "score": 1}, {"label": "High", "score": 5}]
            }
        }))
        .to_request();
    let rubric: Value = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/frameworks/{framework_id}/students"))
        .insert_header(auth.clone())
        .set_json(json!({
            "student_code": "IT001",
            "full_name": "Minh Pham",
            "email": "minh.pham@example.edu",
            "username": "it001"
        }))
        .to_request();
    let student: Value = test::call_and_read_body_json(&app, req).await;
    assert!(student["data"]["generated_password"].is_string());
    let student_id = student["data"]["student"]["id"].as_i64().expect("student id");

    let req = test::TestRequest::post()
        .uri("/api/v1/evaluations/campaigns")
        .insert_header(auth.clone())
        .set_json(json!({
            "framework_id": framework_id,
            "rubric_id": id_of(&rubric),
            "title": "Teamwork 360",
            "start_at": Utc::now() - Duration::days(1),
            "end_at": Utc::now() + Duration::days(1)
        }))
        .to_request();
    let campaign: Value = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::post()
        .uri(&format!(
            "/api/v1/evaluations/campaigns/{}/requests",
            id_of(&campaign)
        ))
        .insert_header(auth.clone())
        .set_json(json!({
            "evaluatee_id": student_id,
            "evaluators": [
                {"evaluator_id": ctx.admin.id, "group_role": "self"},
                {"evaluator_id": ctx.admin.id, "group_role": "supervisor"}
            ]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["created"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["data"]["errors"][0]["field"], "group_role");
}

#[actix_web::test]
async fn student_import_requires_all_columns() {
    let ctx = setup().await;
    let app = test_app!(ctx);
    let auth = bearer(&ctx.admin);

    let req = test::TestRequest::post()
        .uri("/api/v1/frameworks")
        .insert_header(auth.clone())
        .set_json(json!({
            "code": "CS-2024",
            "name": "Computer Science",
            "major": "Computer Science",
            "cohort": "K2024",
            "academic_year": "2024-2025"
        }))
        .to_request();
    let framework: Value = test::call_and_read_body_json(&app, req).await;
    let framework_id = id_of(&framework);
    let uri = format!("/api/v1/frameworks/{framework_id}/students/import");

    let (content_type, payload) = csv_multipart("student_code,full_name\nCS001,Hoa Le\n");
    let req = test::TestRequest::post()
        .uri(&uri)
        .peer_addr(peer(1))
        .insert_header(auth.clone())
        .insert_header(("Content-Type", content_type))
        .set_payload(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let (content_type, payload) = csv_multipart(
        "student_code,full_name,email\n\
         CS001,Hoa Le,hoa.le@example.edu\n\
         CS002,Quang Vo,not-an-email\n\
         CS001,Hoa Le,hoa.le@example.edu\n",
    );
    let req = test::TestRequest::post()
        .uri(&uri)
        .peer_addr(peer(1))
        .insert_header(auth.clone())
        .insert_header(("Content-Type", content_type))
        .set_payload(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["total"], 3);
    assert_eq!(body["data"]["success"], 1);
    assert_eq!(body["data"]["failed"], 1);
    assert_eq!(body["data"]["credentials"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["data"]["skipped"], 1);
}
