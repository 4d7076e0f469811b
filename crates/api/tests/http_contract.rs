use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use api::{
    ApiConfig, ApiError, CodeSubmission, HttpInterviewApi, InterviewApi, StartSessionRequest,
};
use interview_core::model::{Difficulty, QuestionId, SessionId, SessionStatus, SessionType};

#[derive(Clone, Default)]
struct Recorded {
    bodies: Arc<Mutex<Vec<(String, Value)>>>,
}

impl Recorded {
    fn push(&self, route: &str, body: Value) {
        self.bodies.lock().unwrap().push((route.to_string(), body));
    }

    fn last(&self, route: &str) -> Option<Value> {
        self.bodies
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(r, _)| r == route)
            .map(|(_, body)| body.clone())
    }
}

async fn start(State(rec): State<Recorded>, Json(body): Json<Value>) -> Json<Value> {
    rec.push("start", body);
    Json(json!({
        "id": 41,
        "session_type": "coding",
        "status": "in_progress",
        "start_time": "2023-11-14T22:13:20.5",
        "end_time": null,
        "duration_minutes": 45
    }))
}

async fn generate(
    State(rec): State<Recorded>,
    Path(difficulty): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    rec.push(
        "generate",
        json!({ "difficulty": difficulty, "topic": params.get("topic") }),
    );
    Json(json!({
        "success": true,
        "ai_generated": true,
        "question": {
            "id": "q-9",
            "title": "Merge Intervals",
            "description": "Merge all overlapping intervals.",
            "examples": [{"input": "[[1,3],[2,6]]", "output": "[[1,6]]", "explanation": ""}],
            "constraints": [],
            "difficulty": difficulty,
            "time_limit_minutes": 25,
            "hints": ["Sort first"],
            "tags": ["arrays"]
        }
    }))
}

async fn submit(State(rec): State<Recorded>, Json(body): Json<Value>) -> Json<Value> {
    rec.push("submit", body);
    Json(json!({
        "success": true,
        "ai_powered": false,
        "submission_id": "sub_3",
        "analysis": {
            "overall_score": 64,
            "correctness_score": 70,
            "efficiency_score": 60,
            "code_quality_score": 65,
            "time_management_score": 60,
            "time_complexity": "O(n log n)",
            "space_complexity": "O(n)",
            "feedback": ["Handles overlap"],
            "improvements": ["Check empty input"],
            "interview_tips": []
        }
    }))
}

async fn end(Path(id): Path<String>) -> (StatusCode, Json<Value>) {
    if id == "missing" {
        return (StatusCode::NOT_FOUND, Json(json!({"detail": "Session not found"})));
    }
    (
        StatusCode::OK,
        Json(json!({"message": "Interview session ended successfully"})),
    )
}

async fn categories() -> Json<Value> {
    Json(json!({"categories": ["arrays", " graphs ", ""]}))
}

async fn broken_health() -> StatusCode {
    StatusCode::SERVICE_UNAVAILABLE
}

async fn serve() -> (SocketAddr, Recorded) {
    let recorded = Recorded::default();
    let app = Router::new()
        .route("/interview/start", post(start))
        .route("/questions/generate/{difficulty}", get(generate))
        .route("/questions/submit", post(submit))
        .route("/interview/session/{id}/end", post(end))
        .route("/questions/categories", get(categories))
        .route("/health", get(broken_health))
        .with_state(recorded.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, recorded)
}

fn client(addr: SocketAddr) -> HttpInterviewApi {
    let config = ApiConfig {
        base_url: ApiConfig::parse_base_url(&format!("http://{addr}")).unwrap(),
        ..ApiConfig::default()
    };
    HttpInterviewApi::new(config).unwrap()
}

#[tokio::test]
async fn start_session_sends_settings_and_decodes_backend_shape() {
    let (addr, recorded) = serve().await;
    let api = client(addr);

    let session = api
        .start_session(&StartSessionRequest {
            session_type: SessionType::Coding,
            duration_minutes: 45,
        })
        .await
        .unwrap();

    assert_eq!(session.id, SessionId::new("41"));
    assert_eq!(session.status, SessionStatus::Active);
    assert_eq!(session.duration_minutes, 45);
    assert!(session.start_time.is_some());
    assert_eq!(
        recorded.last("start").unwrap(),
        json!({"session_type": "coding", "duration_minutes": 45})
    );
}

#[tokio::test]
async fn generate_question_puts_difficulty_in_path_and_topic_in_query() {
    let (addr, recorded) = serve().await;
    let api = client(addr);

    let response = api
        .generate_question(Difficulty::Hard, Some("intervals"))
        .await
        .unwrap();

    let question = response.question.unwrap();
    assert_eq!(question.id, QuestionId::new("q-9"));
    assert_eq!(question.difficulty, Difficulty::Hard);
    assert_eq!(question.hints, vec!["Sort first".to_string()]);
    assert_eq!(
        recorded.last("generate").unwrap(),
        json!({"difficulty": "hard", "topic": "intervals"})
    );
}

#[tokio::test]
async fn submit_code_posts_submission() {
    let (addr, recorded) = serve().await;
    let api = client(addr);

    let result = api
        .submit_code(&CodeSubmission {
            question_id: QuestionId::new("q-9"),
            user_code: "def merge(xs):\n    return xs".into(),
            time_taken_seconds: 300,
            session_id: Some(SessionId::new("41")),
        })
        .await
        .unwrap();

    assert_eq!(result.submission_id.as_str(), "sub_3");
    assert_eq!(result.analysis.time_complexity, "O(n log n)");
    let body = recorded.last("submit").unwrap();
    assert_eq!(body["time_taken_seconds"], 300);
    assert_eq!(body["session_id"], "41");
    assert_eq!(body["question_id"], "q-9");
}

#[tokio::test]
async fn end_session_acknowledgement_without_session_is_none() {
    let (addr, _) = serve().await;
    let api = client(addr);

    let ended = api.end_session(&SessionId::new("41")).await.unwrap();
    assert!(ended.is_none());

    let missing = api.end_session(&SessionId::new("missing")).await;
    assert!(matches!(missing, Err(ApiError::NotFound)));
}

#[tokio::test]
async fn categories_are_trimmed_and_blank_entries_dropped() {
    let (addr, _) = serve().await;
    let api = client(addr);

    let categories = api.question_categories().await.unwrap();
    assert_eq!(categories, vec!["arrays".to_string(), "graphs".to_string()]);
}

#[tokio::test]
async fn unavailable_service_is_a_server_error() {
    let (addr, _) = serve().await;
    let api = client(addr);

    assert!(matches!(api.health().await, Err(ApiError::Server(_))));
}

#[tokio::test]
async fn closed_port_is_unreachable() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = client(addr);
    let err = api.health().await.unwrap_err();
    assert!(matches!(err, ApiError::Unreachable(_)), "got {err:?}");
}
