use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use civics_core::GradeVerdict;
use civics_core::model::Question;
use services::{
    ClassifierConfig, ClassifierGrader, EndpointConfig, EndpointGrader, GRADE_PATH, Grader,
    GradingError, UpstreamError, grade_router,
};

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn question() -> Question {
    Question::new(
        "What is the supreme law of the land?",
        ["the Constitution"],
    )
    .unwrap()
}

//
// ─── CHAT-COMPLETIONS UPSTREAM ─────────────────────────────────────────────────
//

#[derive(Clone)]
struct FakeClassifier {
    status: StatusCode,
    body: Value,
    seen: Arc<Mutex<Vec<(Option<String>, Value)>>>,
}

impl FakeClassifier {
    fn replying(content: Value) -> Self {
        Self::raw(
            StatusCode::OK,
            json!({ "choices": [{ "message": { "role": "assistant", "content": content } }] }),
        )
    }

    fn raw(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            body,
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

async fn completions(
    State(fake): State<FakeClassifier>,
    headers: HeaderMap,
    Json(request): Json<Value>,
) -> Response {
    let auth = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    fake.seen.lock().unwrap().push((auth, request));
    (fake.status, Json(fake.body.clone())).into_response()
}

async fn classifier_for(fake: FakeClassifier, api_key: Option<&str>) -> ClassifierGrader {
    let app = Router::new()
        .route("/v1/chat/completions", post(completions))
        .with_state(fake);
    let addr = serve(app).await;
    let config = ClassifierConfig::new(api_key.map(str::to_string))
        .with_base_url(format!("http://{addr}/v1"))
        .with_model("test-model");
    ClassifierGrader::new(config).unwrap()
}

#[tokio::test]
async fn classifier_sends_prompt_and_parses_yes() {
    let fake = FakeClassifier::replying(json!("Yes, that's correct.\nThe Constitution is the supreme law."));
    let seen = fake.seen.clone();
    let grader = classifier_for(fake, Some("sk-test")).await;

    let verdict = grader.grade(&question(), "The Constitution").await.unwrap();
    assert!(verdict.is_correct);
    assert!(verdict.rationale.starts_with("Yes, that's correct."));

    let seen = seen.lock().unwrap();
    let (auth, body) = &seen[0];
    assert_eq!(auth.as_deref(), Some("Bearer sk-test"));
    assert_eq!(body["model"], "test-model");
    assert_eq!(body["max_tokens"], 100);
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][0]["content"], "You are a helpful assistant.");
    let prompt = body["messages"][1]["content"].as_str().unwrap();
    assert!(prompt.contains("What is the supreme law of the land?"));
    assert!(prompt.contains("the Constitution"));
    assert!(prompt.contains("The user answered: The Constitution"));
}

#[tokio::test]
async fn classifier_no_reply_is_incorrect() {
    let grader = classifier_for(FakeClassifier::replying(json!("No.\nIt is the Constitution.")), Some("k")).await;
    let verdict = grader.grade(&question(), "the flag").await.unwrap();
    assert!(!verdict.is_correct);
}

#[tokio::test]
async fn classifier_empty_content_is_incorrect_not_an_error() {
    let grader = classifier_for(FakeClassifier::replying(Value::Null), Some("k")).await;
    let verdict = grader.grade(&question(), "anything").await.unwrap();
    assert!(!verdict.is_correct);
    assert_eq!(verdict.rationale, "");
}

#[tokio::test]
async fn classifier_non_success_status_is_upstream_error() {
    let fake = FakeClassifier::raw(
        StatusCode::TOO_MANY_REQUESTS,
        json!({ "error": { "message": "rate limited" } }),
    );
    let grader = classifier_for(fake, Some("k")).await;
    let err = grader.grade(&question(), "anything").await.unwrap_err();
    match err {
        GradingError::Upstream(UpstreamError::HttpStatus { status, message }) => {
            assert_eq!(status.as_u16(), 429);
            assert!(message.contains("rate limited"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn classifier_malformed_body_is_upstream_error() {
    let fake = FakeClassifier::raw(StatusCode::OK, json!({ "choices": "nope" }));
    let grader = classifier_for(fake, Some("k")).await;
    let err = grader.grade(&question(), "anything").await.unwrap_err();
    assert!(matches!(
        err,
        GradingError::Upstream(UpstreamError::Decode(_))
    ));
}

#[tokio::test]
async fn classifier_without_key_makes_no_request() {
    let fake = FakeClassifier::replying(json!("yes"));
    let seen = fake.seen.clone();
    let grader = classifier_for(fake, None).await;
    let err = grader.grade(&question(), "anything").await.unwrap_err();
    assert!(err.is_configuration());
    assert!(seen.lock().unwrap().is_empty());
}

//
// ─── GRADING ENDPOINT ──────────────────────────────────────────────────────────
//

struct Echo;

#[async_trait]
impl Grader for Echo {
    async fn grade(
        &self,
        question: &Question,
        user_answer: &str,
    ) -> Result<GradeVerdict, GradingError> {
        let correct = question
            .accepted_answers()
            .iter()
            .any(|answer| answer.eq_ignore_ascii_case(user_answer));
        let reply = if correct { "yes\nmatches" } else { "no\ndoes not match" };
        Ok(GradeVerdict::from_reply(reply))
    }
}

async fn endpoint_for(grader: Arc<dyn Grader>) -> (SocketAddr, EndpointGrader) {
    let addr = serve(grade_router(grader)).await;
    let client =
        EndpointGrader::new(EndpointConfig::new(format!("http://{addr}{GRADE_PATH}"))).unwrap();
    (addr, client)
}

#[tokio::test]
async fn endpoint_round_trips_verdicts() {
    let (_, grader) = endpoint_for(Arc::new(Echo)).await;

    let verdict = grader.grade(&question(), "THE CONSTITUTION").await.unwrap();
    assert!(verdict.is_correct);
    assert_eq!(verdict.rationale, "yes\nmatches");

    let verdict = grader.grade(&question(), "the flag").await.unwrap();
    assert!(!verdict.is_correct);
}

#[tokio::test]
async fn endpoint_reports_missing_credential_as_server_error() {
    let unconfigured = ClassifierGrader::new(ClassifierConfig::new(None)).unwrap();
    let (_, grader) = endpoint_for(Arc::new(unconfigured)).await;

    let err = grader.grade(&question(), "anything").await.unwrap_err();
    match err {
        GradingError::Upstream(UpstreamError::HttpStatus { status, message }) => {
            assert_eq!(status.as_u16(), 500);
            assert!(message.contains("not configured"), "message: {message}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn endpoint_rejects_invalid_requests() {
    let (addr, _) = endpoint_for(Arc::new(Echo)).await;
    let client = reqwest::Client::new();
    let url = format!("http://{addr}{GRADE_PATH}");

    let blank = client
        .post(&url)
        .json(&json!({ "question": "Q?", "answers": ["A"], "userAnswer": "  " }))
        .send()
        .await
        .unwrap();
    assert_eq!(blank.status().as_u16(), 400);
    let body: Value = blank.json().await.unwrap();
    assert_eq!(body["error"], "userAnswer is empty");

    let no_answers = client
        .post(&url)
        .json(&json!({ "question": "Q?", "answers": [], "userAnswer": "A" }))
        .send()
        .await
        .unwrap();
    assert_eq!(no_answers.status().as_u16(), 400);

    let malformed = client
        .post(&url)
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(malformed.status().as_u16(), 400);
    let body: Value = malformed.json().await.unwrap();
    assert!(body["error"].is_string());
}
