use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;

fn app() -> Router {
    quiz_backend::routes::router(quiz_backend::AppState::in_memory())
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<String>) -> (StatusCode, JsonValue) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(raw) => {
            builder = builder.header("content-type", "application/json");
            Body::from(raw)
        }
        None => Body::empty(),
    };
    let resp = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let json = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn post_json(app: &Router, uri: &str, body: JsonValue) -> (StatusCode, JsonValue) {
    send(app, "POST", uri, Some(body.to_string())).await
}

async fn get(app: &Router, uri: &str) -> (StatusCode, JsonValue) {
    send(app, "GET", uri, None).await
}

/// Creates the three-question quiz used by the submission scenarios and
/// returns `(quiz_id, [q1, q2, q3])`.
async fn seed_quiz(app: &Router) -> (String, Vec<String>) {
    let (status, body) = post_json(
        app,
        "/api/quizzes/",
        json!({
            "title": "Submission Test Quiz",
            "questions": [
                {"question_text": "What is 2 + 2?", "question_type": "mcq", "options": ["3", "4", "5", "6"], "correct_answer": "4"},
                {"question_text": "The sky is blue.", "question_type": "tf", "options": ["True", "False"], "correct_answer": "True"},
                {"question_text": "What is 10 - 5?", "question_type": "mcq", "options": ["3", "4", "5", "6"], "correct_answer": "5"}
            ]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let ids = body["questions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|q| q["id"].as_str().unwrap().to_string())
        .collect();
    (body["id"].as_str().unwrap().to_string(), ids)
}

#[tokio::test]
async fn create_quiz_returns_full_quiz_with_positional_order() {
    let app = app();
    let (status, body) = post_json(
        &app,
        "/api/quizzes/",
        json!({
            "title": "Quiz with Order",
            "questions": [
                {"question_text": "First question", "question_type": "mcq", "options": ["A", "B", "C"], "correct_answer": "A", "order": 7},
                {"question_text": "Second question", "question_type": "tf", "options": ["True", "False"], "correct_answer": "True", "order": 7}
            ]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["title"], "Quiz with Order");
    assert!(body["id"].is_string());
    assert!(body["created_at"].is_string());
    let questions = body["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 2);
    assert_eq!(questions[0]["order"], 0);
    assert_eq!(questions[1]["order"], 1);
    assert_eq!(questions[0]["question_type"], "mcq");
    assert_eq!(questions[1]["question_type"], "tf");
    assert_eq!(questions[0]["correct_answer"], "A");
}

#[tokio::test]
async fn create_quiz_without_trailing_slash_and_long_type_names() {
    let app = app();
    let (status, body) = post_json(
        &app,
        "/api/quizzes",
        json!({
            "title": "Long names",
            "questions": [
                {"question_text": "Capital of France?", "question_type": "multiple_choice", "options": ["London", "Paris"], "correct_answer": "Paris"},
                {"question_text": "Rust is a language.", "question_type": "true_false", "correct_answer": "True"}
            ]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["questions"][0]["question_type"], "mcq");
    assert_eq!(body["questions"][1]["options"], json!(["True", "False"]));
}

#[tokio::test]
async fn create_quiz_validation_failures_are_400() {
    let app = app();
    let cases = [
        (json!({"title": "Empty Quiz", "questions": []}), "questions"),
        (json!({"questions": []}), "title"),
        (
            json!({"title": "", "questions": [{"question_text": "Test", "question_type": "mcq", "options": ["A", "B"], "correct_answer": "A"}]}),
            "title",
        ),
        (
            json!({"title": "Invalid Quiz", "questions": [{"question_text": "Single option", "question_type": "mcq", "options": ["Only one"], "correct_answer": "Only one"}]}),
            "questions",
        ),
    ];

    for (payload, field) in cases {
        let (status, body) = post_json(&app, "/api/quizzes/", payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["errors"][field].is_array(), "missing `{}` in {}", field, body);
    }
}

#[tokio::test]
async fn invalid_question_type_and_bad_json_are_400() {
    let app = app();
    let (status, body) = post_json(
        &app,
        "/api/quizzes/",
        json!({
            "title": "Test Quiz",
            "questions": [{"question_text": "Test", "question_type": "invalid_type", "options": ["A", "B"], "correct_answer": "A"}]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["errors"]["questions"],
        json!(["Question 1: \"invalid_type\" is not a valid choice."])
    );

    let (status, body) = send(&app, "POST", "/api/quizzes/", Some("invalid json".to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn null_fields_and_overlong_values_are_field_errors() {
    let app = app();
    let question = json!({"question_text": "Test", "question_type": "tf", "correct_answer": "True"});

    let (status, body) = post_json(&app, "/api/quizzes/", json!({"title": null, "questions": null})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["title"].is_array());
    assert!(body["errors"]["questions"].is_array());

    let (status, body) = post_json(
        &app,
        "/api/quizzes/",
        json!({"title": "x".repeat(300), "questions": [question]}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["errors"]["title"],
        json!(["Ensure this field has no more than 255 characters."])
    );

    let long = "y".repeat(300);
    let (status, body) = post_json(
        &app,
        "/api/quizzes/",
        json!({
            "title": "Long answer",
            "questions": [{"question_text": "Pick", "question_type": "mcq", "options": [long.clone(), "n"], "correct_answer": long}]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["questions"][0]
        .as_str()
        .unwrap()
        .starts_with("Question 1: correct answer may not be longer"));
}

#[tokio::test]
async fn get_quiz_hides_correct_answers() {
    let app = app();
    let (quiz_id, _) = seed_quiz(&app).await;

    let (status, body) = get(&app, &format!("/api/quizzes/{}/", quiz_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Submission Test Quiz");
    let questions = body["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 3);
    for (i, q) in questions.iter().enumerate() {
        assert_eq!(q["order"], i);
        assert!(q.get("correct_answer").is_none());
    }
    assert_eq!(questions[0]["options"].as_array().unwrap().len(), 4);
    assert!(!body.to_string().contains("correct_answer"));

    let (status, _) = get(&app, &format!("/api/quizzes/{}", quiz_id)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn get_unknown_quiz_is_404() {
    let app = app();
    let (status, _) = get(&app, "/api/quizzes/99999/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = get(&app, &format!("/api/quizzes/{}/", uuid::Uuid::new_v4())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn submit_all_correct() {
    let app = app();
    let (quiz_id, q) = seed_quiz(&app).await;

    let (status, body) = post_json(
        &app,
        &format!("/api/quizzes/{}/submit/", quiz_id),
        json!({"answers": {q[0].clone(): "4", q[1].clone(): "True", q[2].clone(): "5"}}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["score"], 3);
    assert_eq!(body["total_questions"], 3);
    assert_eq!(body["percentage"].as_f64(), Some(100.0));
}

#[tokio::test]
async fn submit_partially_correct_returns_detailed_results() {
    let app = app();
    let (quiz_id, q) = seed_quiz(&app).await;

    let (status, body) = post_json(
        &app,
        &format!("/api/quizzes/{}/submit", quiz_id),
        json!({"answers": {q[0].clone(): "4", q[1].clone(): "False", q[2].clone(): "3"}}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["score"], 1);
    assert_eq!(body["total_questions"], 3);
    let pct = body["percentage"].as_f64().unwrap();
    assert!((pct - 33.33).abs() < 0.01);

    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0]["question_id"], q[0].as_str());
    assert_eq!(results[0]["question_text"], "What is 2 + 2?");
    assert_eq!(results[0]["user_answer"], "4");
    assert_eq!(results[0]["is_correct"], true);
    assert_eq!(results[1]["user_answer"], "False");
    assert_eq!(results[1]["correct_answer"], "True");
    assert_eq!(results[1]["is_correct"], false);
}

#[tokio::test]
async fn submit_with_unanswered_questions_reports_null() {
    let app = app();
    let (quiz_id, q) = seed_quiz(&app).await;

    let (status, body) = post_json(
        &app,
        &format!("/api/quizzes/{}/submit/", quiz_id),
        json!({"answers": {q[0].clone(): "4", q[2].clone(): ""}}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["score"], 1);
    assert_eq!(body["total_questions"], 3);
    let results = body["results"].as_array().unwrap();
    assert!(results[1]["user_answer"].is_null());
    assert_eq!(results[1]["is_correct"], false);
    assert_eq!(results[2]["user_answer"], "");
    assert_eq!(results[2]["is_correct"], false);
}

#[tokio::test]
async fn submit_to_unknown_quiz_is_404() {
    let app = app();
    let (status, _) = post_json(
        &app,
        &format!("/api/quizzes/{}/submit/", uuid::Uuid::new_v4()),
        json!({"answers": {}}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = post_json(&app, "/api/quizzes/99999/submit/", json!({"answers": {}})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/quizzes/{}/submit/", uuid::Uuid::new_v4()),
        Some("invalid json".to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_answers_are_400() {
    let app = app();
    let (quiz_id, q) = seed_quiz(&app).await;
    let uri = format!("/api/quizzes/{}/submit/", quiz_id);

    for payload in [
        json!({}),
        json!({"answers": ["4"]}),
        json!({"answers": "4"}),
        json!({"answers": {q[0].clone(): 4}}),
    ] {
        let (status, body) = post_json(&app, &uri, payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["errors"]["answers"].is_array());
    }

    let (status, body) = send(&app, "POST", &uri, Some("invalid json".to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (_, attempts) = get(&app, &format!("/api/quizzes/{}/attempts/", quiz_id)).await;
    assert_eq!(attempts.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn every_submission_appends_an_attempt() {
    let app = app();
    let (quiz_id, q) = seed_quiz(&app).await;
    let uri = format!("/api/quizzes/{}/submit/", quiz_id);
    let answers = json!({"answers": {q[0].clone(): "4", q[1].clone(): "True", q[2].clone(): "5"}});

    for _ in 0..2 {
        let (status, body) = post_json(&app, &uri, answers.clone()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["score"], 3);
    }

    let (status, attempts) = get(&app, &format!("/api/quizzes/{}/attempts", quiz_id)).await;
    assert_eq!(status, StatusCode::OK);
    let attempts = attempts.as_array().unwrap();
    assert_eq!(attempts.len(), 2);
    for attempt in attempts {
        assert_eq!(attempt["quiz_id"], quiz_id.as_str());
        assert_eq!(attempt["score"], 3);
        assert_eq!(attempt["total_questions"], 3);
        assert_eq!(attempt["answers"], answers["answers"]);
    }

    let (status, _) = get(&app, &format!("/api/quizzes/{}/attempts/", uuid::Uuid::new_v4())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_and_openapi_are_served() {
    let app = app();
    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, doc) = get(&app, "/api/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/api/quizzes/{id}/submit/"].is_object());
}
