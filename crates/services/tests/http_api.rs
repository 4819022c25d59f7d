use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use learn_core::model::{
    AnswerEntry, ChallengeId, InterviewSubmission, QuestionKind, RoadmapId, SessionId,
    SessionStatus,
};
use services::{ApiConfig, ApiError, Credentials, HttpPracticeApi, PracticeApi};

fn api(server: &MockServer, credentials: Credentials) -> HttpPracticeApi {
    HttpPracticeApi::new(ApiConfig::new(server.uri()), credentials)
}

fn id(raw: &str) -> SessionId {
    SessionId::parse(raw).unwrap()
}

#[tokio::test]
async fn interview_read_sends_bearer_and_normalizes_legacy_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/interviews/iv-1"))
        .and(header("authorization", "Bearer t0ken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": "iv-1",
            "ownerId": "user-7",
            "topic": "Rust",
            "status": "in_progress",
            "started_at": "2024-05-01T10:00:00.123",
            "questions": [
                {"question_type": "theory", "question_text": "What is ownership?"},
                {
                    "question_type": "live_coding",
                    "question_text": "Reverse a list",
                    "template_code": "fn reverse() {}"
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = api(&server, Credentials::bearer("t0ken"))
        .interview(&id("iv-1"))
        .await
        .unwrap();

    assert_eq!(session.id(), &id("iv-1"));
    assert_eq!(session.owner_id(), Some("user-7"));
    assert_eq!(session.status(), SessionStatus::InProgress);
    assert!(session.started_at().is_some());
    assert_eq!(session.questions()[1].kind, QuestionKind::LiveCoding);
    assert_eq!(
        session.questions()[1].starter_code.as_deref(),
        Some("fn reverse() {}")
    );
}

#[tokio::test]
async fn submission_posts_the_answer_list() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/interviews/iv-1/submit"))
        .and(body_json(json!({
            "answers": [
                {"question_text": "Q1", "user_answer": ""},
                {"question_text": "Q2", "user_answer": "yes"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "completed"})))
        .expect(1)
        .mount(&server)
        .await;

    let payload = InterviewSubmission {
        answers: vec![
            AnswerEntry {
                question_text: "Q1".into(),
                user_answer: String::new(),
            },
            AnswerEntry {
                question_text: "Q2".into(),
                user_answer: "yes".into(),
            },
        ],
    };
    api(&server, Credentials::anonymous())
        .submit_interview(&id("iv-1"), &payload)
        .await
        .unwrap();
}

#[tokio::test]
async fn not_found_carries_the_server_detail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/assessments/gone"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"detail": "Assessment not found"})),
        )
        .mount(&server)
        .await;

    let err = api(&server, Credentials::anonymous())
        .assessment(&id("gone"))
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.detail(), Some("Assessment not found"));
}

#[tokio::test]
async fn start_accepts_either_id_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/assessments/start"))
        .and(body_json(json!({"topic": "Python"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"_id": "as-3"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/interviews/start"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"topic": "Rust"})))
        .mount(&server)
        .await;

    let api = api(&server, Credentials::anonymous());
    assert_eq!(api.start_assessment("Python").await.unwrap(), id("as-3"));
    assert!(matches!(
        api.start_interview("Rust").await,
        Err(ApiError::MissingSessionId)
    ));
}

#[tokio::test]
async fn flashcards_and_hints_use_their_endpoints() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/flash-cards/generate"))
        .and(body_json(json!({"roadmapId": "rm-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "topic": "Rust",
            "cards": [{"card_type": "cloze", "front": "A ___ owns", "back": "variable"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/challenges/c1/hint"))
        .and(body_json(json!({"user_code": "pass"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"hint": "Use a loop."})))
        .mount(&server)
        .await;

    let api = api(&server, Credentials::anonymous());
    let deck = api
        .generate_flashcards(&RoadmapId::parse("rm-1").unwrap())
        .await
        .unwrap();
    assert_eq!(deck.cards.len(), 1);

    let hint = api
        .request_hint(&ChallengeId::parse("c1").unwrap(), "pass")
        .await
        .unwrap();
    assert_eq!(hint, "Use a loop.");
}

#[tokio::test]
async fn challenges_without_ids_are_skipped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/challenges/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"_id": "c1", "title": "FizzBuzz"},
            {"title": "Orphan"}
        ])))
        .mount(&server)
        .await;

    let challenges = api(&server, Credentials::anonymous())
        .challenges()
        .await
        .unwrap();

    assert_eq!(challenges.len(), 1);
    assert_eq!(challenges[0].title, "FizzBuzz");
}

#[tokio::test]
async fn login_exchanges_form_credentials_for_a_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/token"))
        .and(body_string_contains("username=ada%40example.com"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": "jwt", "token_type": "bearer"})),
        )
        .mount(&server)
        .await;

    let credentials = HttpPracticeApi::login(
        &ApiConfig::new(server.uri()),
        "ada@example.com",
        "hunter2",
    )
    .await
    .unwrap();

    assert!(credentials.is_authenticated());
}

#[tokio::test]
async fn profile_lists_graded_sessions() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/users/me/profile"))
        .and(header("authorization", "Bearer t0ken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user_details": {"_id": "u1", "email": "ada@example.com", "username": "ada"},
            "roadmaps": [{"_id": "rm-1", "title": "Rust", "progress": 40, "nodes": []}],
            "interviews": [{
                "_id": "iv-1",
                "topic": "Rust",
                "status": "completed",
                "score": 77,
                "feedback": "Good grasp of borrowing."
            }],
            "assessments": [{
                "_id": "as-1",
                "topic": "SQL",
                "status": "completed",
                "final_report": "Ready for production work."
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let profile = api(&server, Credentials::bearer("t0ken"))
        .profile()
        .await
        .unwrap();

    assert_eq!(profile.user.username, "ada");
    assert_eq!(profile.roadmaps[0].progress, 40);
    assert_eq!(profile.interviews[0].id(), &id("iv-1"));
    assert_eq!(profile.interviews[0].score(), Some(77));
    assert_eq!(
        profile.assessments[0].final_report(),
        Some("Ready for production work.")
    );
}

#[tokio::test]
async fn ongoing_roadmaps_accept_either_id_field() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/roadmaps/ongoing"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "rm-1", "title": "Rust", "progress": 100, "nodes": [{"nodeId": "a"}]},
            {"_id": "rm-2", "title": "Go", "nodes": []},
            {"title": "Broken"}
        ])))
        .mount(&server)
        .await;

    let roadmaps = api(&server, Credentials::anonymous())
        .ongoing_roadmaps()
        .await
        .unwrap();

    let ids: Vec<_> = roadmaps.iter().map(|roadmap| roadmap.id.as_str()).collect();
    assert_eq!(ids, vec!["rm-1", "rm-2"]);
    assert_eq!(roadmaps[0].topic_count, 1);
    assert_eq!(roadmaps[1].progress, 0);
}

#[tokio::test]
async fn unreachable_server_is_a_connection_error() {
    let api = HttpPracticeApi::new(ApiConfig::new("http://127.0.0.1:9"), Credentials::anonymous());

    let err = api.interview(&id("iv-1")).await.unwrap_err();

    assert!(matches!(err, ApiError::Connection(_)));
}
