use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::db::models::Question;
use crate::db::types::DifficultyLevel;
use crate::services::quiz::{GradedAnswer, QuizOutcome};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StartQuizRequest {
    #[serde(default, alias = "subject_id")]
    pub(crate) subject_id: Option<String>,
    #[serde(default, alias = "chapter_ids")]
    pub(crate) chapter_ids: Vec<String>,
    #[serde(default)]
    pub(crate) difficulty: Option<String>,
    #[serde(default, alias = "source_type")]
    pub(crate) source_type: Option<String>,
    #[validate(range(min = 1, message = "count must be positive"))]
    pub(crate) count: i64,
}

/// MCQ as shown to a quiz taker; the correct option is withheld.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QuizQuestion {
    pub(crate) id: String,
    pub(crate) question_text: String,
    pub(crate) question_text_ur: Option<String>,
    pub(crate) options: QuizOptions,
    pub(crate) options_ur: QuizOptions,
    pub(crate) difficulty: DifficultyLevel,
}

#[derive(Debug, Serialize)]
pub(crate) struct QuizOptions {
    #[serde(rename = "A")]
    pub(crate) a: Option<String>,
    #[serde(rename = "B")]
    pub(crate) b: Option<String>,
    #[serde(rename = "C")]
    pub(crate) c: Option<String>,
    #[serde(rename = "D")]
    pub(crate) d: Option<String>,
}

impl From<Question> for QuizQuestion {
    fn from(question: Question) -> Self {
        Self {
            id: question.id,
            question_text: question.question_text,
            question_text_ur: question.question_text_ur,
            options: QuizOptions {
                a: question.option_a,
                b: question.option_b,
                c: question.option_c,
                d: question.option_d,
            },
            options_ur: QuizOptions {
                a: question.option_a_ur,
                b: question.option_b_ur,
                c: question.option_c_ur,
                d: question.option_d_ur,
            },
            difficulty: question.difficulty,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StartQuizResponse {
    pub(crate) questions: Vec<QuizQuestion>,
    pub(crate) total: usize,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct SubmitQuizRequest {
    #[validate(length(min = 1, message = "answers must not be empty"))]
    pub(crate) answers: Vec<SubmittedAnswer>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SubmittedAnswer {
    #[serde(alias = "question_id")]
    pub(crate) question_id: String,
    #[serde(default, alias = "selected_option")]
    pub(crate) selected_option: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QuizAnswerResult {
    pub(crate) question_id: String,
    pub(crate) selected_option: Option<&'static str>,
    pub(crate) correct_option: Option<&'static str>,
    pub(crate) correct_answer: Option<String>,
    pub(crate) is_correct: bool,
    pub(crate) answer_available: bool,
}

impl From<GradedAnswer> for QuizAnswerResult {
    fn from(graded: GradedAnswer) -> Self {
        Self {
            question_id: graded.question_id,
            selected_option: graded.selected_option.map(|letter| letter.as_str()),
            correct_option: graded.correct_option.map(|letter| letter.as_str()),
            correct_answer: graded.correct_text,
            is_correct: graded.is_correct,
            answer_available: graded.answer_available,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SubmitQuizResponse {
    pub(crate) results: Vec<QuizAnswerResult>,
    pub(crate) score: u32,
    pub(crate) total: u32,
}

impl From<QuizOutcome> for SubmitQuizResponse {
    fn from(outcome: QuizOutcome) -> Self {
        Self {
            results: outcome.results.into_iter().map(QuizAnswerResult::from).collect(),
            score: outcome.score,
            total: outcome.total,
        }
    }
}
