use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::api::router::router;
use crate::core::config::Settings;
use crate::core::state::AppState;
use crate::db::types::{DifficultyLevel, UserRole};
use crate::repositories;
use crate::services::storage::StorageService;
use crate::test_support::{self, question};

#[tokio::test]
async fn admin_routes_require_token_and_role() {
    let ctx = test_support::setup_test_context().await;
    let student = test_support::insert_profile(ctx.state.db(), "Student", UserRole::Student).await;
    let token = test_support::bearer_token(&student.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, "/api/admin/subjects", None, None))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, "/api/admin/subjects", Some(&token), None))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = test_support::read_json(response).await;
    assert_eq!(body["message"], "Admin access required");
}

#[tokio::test]
async fn catalog_crud_and_conflicts() {
    let ctx = test_support::setup_test_context().await;
    let admin = test_support::insert_profile(ctx.state.db(), "Admin", UserRole::Admin).await;
    let token = test_support::bearer_token(&admin.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/admin/subjects",
            Some(&token),
            Some(json!({"name": "Physics"})),
        ))
        .await
        .expect("create subject");
    assert_eq!(response.status(), StatusCode::CREATED);
    let subject = test_support::read_json(response).await;
    let subject_id = subject["id"].as_str().expect("subject id").to_string();

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/admin/chapters",
            Some(&token),
            Some(json!({"name": "Motion", "chapterNo": 1, "subjectId": subject_id})),
        ))
        .await
        .expect("create chapter");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/admin/chapters?subject_id={subject_id}"),
            Some(&token),
            None,
        ))
        .await
        .expect("list chapters");
    assert_eq!(response.status(), StatusCode::OK);
    let chapters = test_support::read_json(response).await;
    assert_eq!(chapters.as_array().map(Vec::len), Some(1));
    assert_eq!(chapters[0]["name"], "Motion");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/admin/chapters",
            Some(&token),
            Some(json!({"name": "Orphan", "subjectId": "missing-subject"})),
        ))
        .await
        .expect("orphan chapter");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::DELETE,
            &format!("/api/admin/subjects/{subject_id}"),
            Some(&token),
            None,
        ))
        .await
        .expect("delete subject");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::PUT,
            "/api/admin/subjects/unknown",
            Some(&token),
            Some(json!({"name": "Chemistry"})),
        ))
        .await
        .expect("update subject");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn mcq_writes_are_validated() {
    let ctx = test_support::setup_test_context().await;
    let admin = test_support::insert_profile(ctx.state.db(), "Admin", UserRole::Admin).await;
    let token = test_support::bearer_token(&admin.id, ctx.state.settings());
    let subject = test_support::insert_subject(ctx.state.db(), "Math").await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/admin/questions",
            Some(&token),
            Some(json!({
                "questionText": "2 + 2?",
                "questionType": "mcq",
                "subjectId": subject.id,
                "optionA": "3",
                "optionB": "",
                "correctOption": "B"
            })),
        ))
        .await
        .expect("invalid mcq");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/admin/questions",
            Some(&token),
            Some(json!({
                "questionText": "2 + 2?",
                "questionType": "mcq",
                "subjectId": subject.id,
                "optionA": "3",
                "optionB": "4",
                "correctOption": "b",
                "difficulty": "easy"
            })),
        ))
        .await
        .expect("valid mcq");
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = test_support::read_json(response).await;
    assert_eq!(created["correct_option"], "B");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/admin/questions",
            Some(&token),
            Some(json!({
                "questionText": "Explain inertia.",
                "questionType": "short",
                "subjectId": subject.id
            })),
        ))
        .await
        .expect("short question");
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn question_list_filters_and_paginates() {
    let ctx = test_support::setup_test_context().await;
    let admin = test_support::insert_profile(ctx.state.db(), "Admin", UserRole::Admin).await;
    let token = test_support::bearer_token(&admin.id, ctx.state.settings());
    let subject = test_support::insert_subject(ctx.state.db(), "Math").await;
    for id in ["e1", "e2", "e3"] {
        test_support::insert_question(
            ctx.state.db(),
            &question(id, &subject.id).difficulty(DifficultyLevel::Easy).build(),
        )
        .await;
    }
    test_support::insert_question(
        ctx.state.db(),
        &question("h1", &subject.id).text("Hard integral").difficulty(DifficultyLevel::Hard).build(),
    )
    .await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/admin/questions?difficulty=easy&limit=2",
            Some(&token),
            None,
        ))
        .await
        .expect("list");
    assert_eq!(response.status(), StatusCode::OK);
    let body = test_support::read_json(response).await;
    assert_eq!(body["total_count"], 3);
    assert_eq!(body["items"].as_array().map(Vec::len), Some(2));

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/admin/questions?search=integral",
            Some(&token),
            None,
        ))
        .await
        .expect("search");
    let body = test_support::read_json(response).await;
    assert_eq!(body["total_count"], 1);
    assert_eq!(body["items"][0]["id"], "h1");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/admin/questions?difficulty=impossible",
            Some(&token),
            None,
        ))
        .await
        .expect("bad filter");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn teachers_can_read_and_delete_papers() {
    let ctx = test_support::setup_test_context().await;
    let teacher = test_support::insert_profile(ctx.state.db(), "Teacher", UserRole::Teacher).await;
    let token = test_support::bearer_token(&teacher.id, ctx.state.settings());
    let subject = test_support::insert_subject(ctx.state.db(), "Urdu").await;
    let paper = repositories::papers::create(
        ctx.state.db(),
        repositories::papers::CreatePaper {
            id: "paper-1",
            title: "Monthly Test",
            subject_id: &subject.id,
            class_id: None,
            question_ids: Default::default(),
            settings: json!({}),
            now: crate::core::time::primitive_now_utc(),
        },
    )
    .await
    .expect("paper");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, "/api/admin/papers", Some(&token), None))
        .await
        .expect("list papers");
    assert_eq!(response.status(), StatusCode::OK);
    let body = test_support::read_json(response).await;
    assert_eq!(body["total_count"], 1);
    assert_eq!(body["items"][0]["subject_name"], "Urdu");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/admin/papers/{}", paper.id),
            Some(&token),
            None,
        ))
        .await
        .expect("get paper");
    assert_eq!(response.status(), StatusCode::OK);
    let body = test_support::read_json(response).await;
    assert_eq!(body["title"], "Monthly Test");
    assert!(body["paper_download_url"].is_null());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::DELETE,
            &format!("/api/admin/papers/{}", paper.id),
            Some(&token),
            None,
        ))
        .await
        .expect("delete paper");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/admin/papers/{}", paper.id),
            Some(&token),
            None,
        ))
        .await
        .expect("get deleted paper");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn paper_delete_succeeds_when_storage_cleanup_fails() {
    let ctx = test_support::setup_test_context().await;
    test_support::set_test_storage_env();
    std::env::set_var("S3_ENDPOINT", "http://127.0.0.1:9");
    let settings = Settings::load().expect("settings");
    test_support::set_test_env();
    let storage = StorageService::from_settings(&settings).await.expect("storage");
    assert!(storage.is_some());
    let app = router(AppState::new(settings, ctx.state.db().clone(), storage));

    let teacher = test_support::insert_profile(ctx.state.db(), "Teacher", UserRole::Teacher).await;
    let token = test_support::bearer_token(&teacher.id, ctx.state.settings());
    let subject = test_support::insert_subject(ctx.state.db(), "Physics").await;
    repositories::papers::create(
        ctx.state.db(),
        repositories::papers::CreatePaper {
            id: "paper-2",
            title: "Stored Test",
            subject_id: &subject.id,
            class_id: None,
            question_ids: Default::default(),
            settings: json!({}),
            now: crate::core::time::primitive_now_utc(),
        },
    )
    .await
    .expect("paper");

    let response = app
        .oneshot(test_support::json_request(
            Method::DELETE,
            "/api/admin/papers/paper-2",
            Some(&token),
            None,
        ))
        .await
        .expect("delete paper");

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let paper = repositories::papers::find_by_id(ctx.state.db(), "paper-2").await.expect("query");
    assert!(paper.is_none());
}
