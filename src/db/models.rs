use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use time::PrimitiveDateTime;

use crate::db::types::{DifficultyLevel, QuestionSource, QuestionType, UserRole};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Profile {
    pub(crate) id: String,
    pub(crate) full_name: String,
    pub(crate) role: UserRole,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Class {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Subject {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct ClassSubject {
    pub(crate) id: String,
    pub(crate) class_id: String,
    pub(crate) subject_id: String,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Chapter {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) chapter_no: Option<i32>,
    pub(crate) subject_id: String,
    pub(crate) class_subject_id: Option<String>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Topic {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) chapter_id: String,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Question {
    pub(crate) id: String,
    pub(crate) question_text: String,
    pub(crate) question_text_ur: Option<String>,
    pub(crate) option_a: Option<String>,
    pub(crate) option_b: Option<String>,
    pub(crate) option_c: Option<String>,
    pub(crate) option_d: Option<String>,
    pub(crate) option_a_ur: Option<String>,
    pub(crate) option_b_ur: Option<String>,
    pub(crate) option_c_ur: Option<String>,
    pub(crate) option_d_ur: Option<String>,
    pub(crate) correct_option: Option<String>,
    pub(crate) answer_text: Option<String>,
    pub(crate) difficulty: DifficultyLevel,
    pub(crate) question_type: QuestionType,
    pub(crate) source_type: QuestionSource,
    pub(crate) subject_id: String,
    pub(crate) chapter_id: Option<String>,
    pub(crate) topic_id: Option<String>,
    pub(crate) class_subject_id: Option<String>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

/// Ordered question ids a paper was built from, per question type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct PaperQuestionIds {
    #[serde(default)]
    pub(crate) mcq: Vec<String>,
    #[serde(default)]
    pub(crate) short: Vec<String>,
    #[serde(default)]
    pub(crate) long: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Paper {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) subject_id: String,
    pub(crate) class_id: Option<String>,
    pub(crate) paper_pdf_url: Option<String>,
    pub(crate) key_pdf_url: Option<String>,
    pub(crate) question_ids: Json<PaperQuestionIds>,
    pub(crate) settings: Json<serde_json::Value>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}
