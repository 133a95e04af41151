mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use chrono::{Duration, Utc};
use serde_json::{Value, json};

use common::{bearer, csv_multipart, setup};

fn id_of(body: &Value) -> i64 {
    body["data"]["id"].as_i64().expect("id in response data")
}

#[actix_web::test]
async fn outcome_import_requires_all_columns() {
    let ctx = setup().await;
    let app = test_app!(ctx);
    let auth = bearer(&ctx.admin);

    let req = test::TestRequest::post()
        .uri("/api/v1/frameworks")
        .insert_header(auth.clone())
        .set_json(json!({
            "code": "EE-2024",
            "name": "Electrical Engineering",
            "major": "Electrical Engineering",
            "cohort": "K2024",
            "academic_year": "2024-2025"
        }))
        .to_request();
    let framework: Value = test::call_and_read_body_json(&app, req).await;
    let framework_id = id_of(&framework);

    for (kind, csv) in [
        ("plos", "code\nPLO1\n"),
        ("clos", "code,description\nCLO1,Analyse circuits\n"),
    ] {
        let (content_type, payload) = csv_multipart(csv);
        let req = test::TestRequest::post()
            .uri(&format!(
                "/api/v1/frameworks/{framework_id}/outcomes/{kind}/import"
            ))
            .insert_header(auth.clone())
            .insert_header(("Content-Type", content_type))
            .set_payload(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{kind}");
    }

    let (content_type, payload) = csv_multipart(
        "code,description\n\
         PLO1,Apply engineering knowledge\n\
         PLO2,Design systems\n",
    );
    let req = test::TestRequest::post()
        .uri(&format!(
            "/api/v1/frameworks/{framework_id}/outcomes/plos/import"
        ))
        .insert_header(auth.clone())
        .insert_header(("Content-Type", content_type))
        .set_payload(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["total"], 2);
    assert_eq!(body["data"]["success"], 2);
    assert_eq!(body["data"]["failed"], 0);
}

#[actix_web::test]
async fn attainment_summary_uses_most_recent_observation() {
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
            assert_eq!(status, StatusCode::CREATED, "{body}");
            body
        }};
    }

    let framework = post_json!(
        "/api/v1/frameworks".to_string(),
        json!({
            "code": "ME-2024",
            "name": "Mechanical Engineering",
            "major": "Mechanical Engineering",
            "cohort": "K2024",
            "academic_year": "2024-2025"
        })
    );
    let framework_id = id_of(&framework);
    let base = format!("/api/v1/frameworks/{framework_id}");

    let course = post_json!(
        format!("{base}/courses"),
        json!({"code": "ME201", "name": "Machine Design", "credits": 3})
    );
    let course_id = id_of(&course);
    let plo = post_json!(
        format!("{base}/outcomes/plos"),
        json!({"code": "PLO1", "description": "Design mechanical systems"})
    );
    let pi = post_json!(
        format!("{base}/outcomes/pis"),
        json!({"code": "PI1", "description": "Select suitable components"})
    );
    let clo = post_json!(
        format!("{base}/outcomes/clos"),
        json!({"code": "CLO1", "description": "Size a gearbox", "course_id": course_id})
    );
    let clo_id = id_of(&clo);

    post_json!(
        format!("{base}/links/plo-pi"),
        json!({"source_id": id_of(&plo), "target_id": id_of(&pi), "level": 3})
    );
    post_json!(
        format!("{base}/links/pi-clo"),
        json!({"source_id": id_of(&pi), "target_id": clo_id, "level": 2})
    );

    let rubric = post_json!(
        "/api/v1/rubrics".to_string(),
        json!({
            "framework_id": framework_id,
            "course_id": course_id,
            "title": "Design review",
            "definition": {
                "rows": [{"key": "design", "label": "Design quality", "clo_id": clo_id}],
                "columns": [
                    {"label": "Poor", "score": 1},
                    {"label": "Fair", "score": 2},
                    {"label": "Good", "score": 3},
                    {"label": "Excellent", "score": 4}
                ],
                "pass_threshold": 60
            }
        })
    );
    let rubric_id = id_of(&rubric);

    let student = post_json!(
        format!("{base}/students"),
        json!({
            "student_code": "ME001",
            "full_name": "Bao Nguyen",
            "email": "bao.nguyen@example.edu",
            "username": "me001"
        })
    );
    let student_id = student["data"]["student"]["id"]
        .as_i64()
        .expect("student id");

    post_json!(
        "/api/v1/observations".to_string(),
        json!({
            "student_id": student_id,
            "rubric_id": rubric_id,
            "items": [{"row_key": "design", "score": 3}]
        })
    );
    // 补录一条更早的观察，不应覆盖较新的结果
    post_json!(
        "/api/v1/observations".to_string(),
        json!({
            "student_id": student_id,
            "rubric_id": rubric_id,
            "items": [{"row_key": "design", "score": 1}],
            "observed_at": Utc::now() - Duration::days(30)
        })
    );

    let req = test::TestRequest::get()
        .uri(&format!("{base}/attainment"))
        .insert_header(auth.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let summary = &body["data"];

    assert_eq!(summary["student_count"], 1);
    assert_eq!(summary["clos"][0]["evaluated"], 1);
    assert_eq!(summary["clos"][0]["achieved"], 1);
    assert_eq!(summary["clos"][0]["attainment_rate"], 100.0);
    assert_eq!(summary["clos"][0]["average_percent"], 75.0);
    assert_eq!(summary["pis"][0]["average_percent"], 75.0);
    assert_eq!(summary["pis"][0]["achieved"], 1);
    assert_eq!(summary["plos"][0]["average_percent"], 75.0);
    assert_eq!(summary["plos"][0]["achieved"], 1);

    let coverage = &summary["coverage"];
    assert_eq!(coverage["plos"][0]["clo_count"], 1);
    assert_eq!(coverage["plos"][0]["course_count"], 1);
    assert_eq!(coverage["plos"][0]["max_level"], 3);
    assert_eq!(coverage["pis"][0]["max_level"], 2);
    assert_eq!(coverage["plo_coverage_rate"], 100.0);
    assert_eq!(coverage["pi_coverage_rate"], 100.0);
    assert_eq!(coverage["clo_mapped_rate"], 100.0);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/students/{student_id}/attainment"))
        .insert_header(auth.clone())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["clos"][0]["score_percent"], 75.0);
    assert_eq!(body["data"]["plos"][0]["achieved"], true);
}
