use std::collections::HashMap;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::errors::ApiError;
use crate::api::validation::{required_text, validate_payload, ApiJson};
use crate::core::state::AppState;
use crate::db::types::{DifficultyLevel, QuestionSource, QuestionType};
use crate::schemas::quiz::{
    QuizQuestion, StartQuizRequest, StartQuizResponse, SubmitQuizRequest, SubmitQuizResponse,
};
use crate::services::question_selection::{
    fetch_in_order, normalize_ids, select_questions, SelectionCriteria,
};
use crate::services::quiz;

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/start", post(start_quiz)).route("/submit", post(submit_quiz))
}

async fn start_quiz(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<StartQuizRequest>,
) -> Result<Json<StartQuizResponse>, ApiError> {
    validate_payload(&payload)?;
    let subject_id = required_text(payload.subject_id.as_deref(), "subjectId")?;
    let max = state.settings().generation().max_questions_per_type;
    if payload.count > max {
        return Err(ApiError::BadRequest(format!("count must be at most {max}")));
    }

    let criteria = SelectionCriteria {
        question_type: QuestionType::Mcq,
        subject_id,
        chapter_ids: normalize_ids(&payload.chapter_ids),
        source_type: QuestionSource::parse_filter(payload.source_type.as_deref())
            .map_err(ApiError::BadRequest)?,
        difficulty: DifficultyLevel::parse_filter(payload.difficulty.as_deref())
            .map_err(ApiError::BadRequest)?,
        count: payload.count,
    };
    let (_, questions) = select_questions(state.db(), &criteria)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to select quiz questions"))?;

    if questions.is_empty() {
        return Err(ApiError::NotFound("No MCQs found for the given criteria".to_string()));
    }

    let questions = questions.into_iter().map(QuizQuestion::from).collect::<Vec<_>>();
    Ok(Json(StartQuizResponse { total: questions.len(), questions }))
}

async fn submit_quiz(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<SubmitQuizRequest>,
) -> Result<Json<SubmitQuizResponse>, ApiError> {
    validate_payload(&payload)?;

    let mut ids = Vec::with_capacity(payload.answers.len());
    let mut first_answers = HashMap::new();
    for answer in payload.answers {
        let id = answer.question_id.trim().to_string();
        first_answers.entry(id.clone()).or_insert(answer.selected_option);
        ids.push(id);
    }
    // The first answer per question counts, even when it left the question blank.
    let selections: HashMap<String, String> = first_answers
        .into_iter()
        .filter_map(|(id, selected)| selected.map(|selected| (id, selected)))
        .collect();

    let questions = fetch_in_order(state.db(), &ids)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load quiz questions"))?;
    if questions.is_empty() {
        return Err(ApiError::NotFound("None of the submitted questions exist".to_string()));
    }

    let outcome = quiz::grade(&questions, &selections);
    tracing::info!(score = outcome.score, total = outcome.total, "Graded quiz submission");
    Ok(Json(SubmitQuizResponse::from(outcome)))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    use crate::test_support::{self, question};

    #[tokio::test]
    async fn start_withholds_answers_and_submit_grades() {
        let ctx = test_support::setup_test_context().await;
        let subject = test_support::insert_subject(ctx.state.db(), "Math").await;
        test_support::insert_question(
            ctx.state.db(),
            &question("q1", &subject.id).options(["2", "4", "", ""]).correct("B").build(),
        )
        .await;
        test_support::insert_question(
            ctx.state.db(),
            &question("q2", &subject.id).options(["", "", "", ""]).correct("A").build(),
        )
        .await;

        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/quizzes/start",
                None,
                Some(json!({"subjectId": subject.id, "count": 5})),
            ))
            .await
            .expect("start");

        assert_eq!(response.status(), StatusCode::OK);
        let body = test_support::read_json(response).await;
        assert_eq!(body["total"], 2);
        assert_eq!(body["questions"][0]["id"], "q2");
        assert!(body["questions"][0].get("correctOption").is_none());
        assert_eq!(body["questions"][1]["options"]["B"], "4");
        assert_eq!(body["questions"][1]["questionText"], "Question q1");

        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/quizzes/submit",
                None,
                Some(json!({"answers": [
                    {"questionId": "q1", "selectedOption": "b"},
                    {"questionId": "q2", "selectedOption": "A"},
                    {"questionId": "unknown", "selectedOption": "A"}
                ]})),
            ))
            .await
            .expect("submit");

        assert_eq!(response.status(), StatusCode::OK);
        let body = test_support::read_json(response).await;
        assert_eq!(body["score"], 1);
        assert_eq!(body["total"], 2);
        assert_eq!(body["results"][0]["isCorrect"], true);
        assert_eq!(body["results"][0]["correctOption"], "B");
        assert_eq!(body["results"][1]["answerAvailable"], false);
    }

    #[tokio::test]
    async fn start_without_questions_is_not_found() {
        let ctx = test_support::setup_test_context().await;
        let subject = test_support::insert_subject(ctx.state.db(), "Art").await;

        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/quizzes/start",
                None,
                Some(json!({"subjectId": subject.id, "count": 3})),
            ))
            .await
            .expect("start");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn duplicate_answers_keep_the_first_even_when_blank() {
        let ctx = test_support::setup_test_context().await;
        let subject = test_support::insert_subject(ctx.state.db(), "Chemistry").await;
        test_support::insert_question(
            ctx.state.db(),
            &question("q1", &subject.id).options(["H2O", "CO2", "", ""]).correct("A").build(),
        )
        .await;

        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/quizzes/submit",
                None,
                Some(json!({"answers": [
                    {"questionId": "q1"},
                    {"questionId": "q1", "selectedOption": "A"}
                ]})),
            ))
            .await
            .expect("submit");

        assert_eq!(response.status(), StatusCode::OK);
        let body = test_support::read_json(response).await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["score"], 0);
        assert_eq!(body["results"][0]["questionId"], "q1");
        assert!(body["results"][0]["selectedOption"].is_null());
        assert_eq!(body["results"][0]["isCorrect"], false);
    }
}
