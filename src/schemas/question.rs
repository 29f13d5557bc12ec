use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::pagination::default_limit;
use crate::core::time::format_primitive;
use crate::db::models::Question;
use crate::db::types::{DifficultyLevel, QuestionSource, QuestionType};

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct QuestionWrite {
    #[serde(alias = "questionText")]
    #[validate(length(min = 1, message = "question_text must not be empty"))]
    pub(crate) question_text: String,
    #[serde(default, alias = "questionTextUr")]
    pub(crate) question_text_ur: Option<String>,
    #[serde(default, alias = "optionA")]
    pub(crate) option_a: Option<String>,
    #[serde(default, alias = "optionB")]
    pub(crate) option_b: Option<String>,
    #[serde(default, alias = "optionC")]
    pub(crate) option_c: Option<String>,
    #[serde(default, alias = "optionD")]
    pub(crate) option_d: Option<String>,
    #[serde(default, alias = "optionAUr")]
    pub(crate) option_a_ur: Option<String>,
    #[serde(default, alias = "optionBUr")]
    pub(crate) option_b_ur: Option<String>,
    #[serde(default, alias = "optionCUr")]
    pub(crate) option_c_ur: Option<String>,
    #[serde(default, alias = "optionDUr")]
    pub(crate) option_d_ur: Option<String>,
    #[serde(default, alias = "correctOption")]
    pub(crate) correct_option: Option<String>,
    #[serde(default, alias = "answerText")]
    pub(crate) answer_text: Option<String>,
    #[serde(default = "default_difficulty")]
    pub(crate) difficulty: DifficultyLevel,
    #[serde(alias = "questionType")]
    pub(crate) question_type: QuestionType,
    #[serde(default = "default_source", alias = "sourceType")]
    pub(crate) source_type: QuestionSource,
    #[serde(alias = "subjectId")]
    #[validate(length(min = 1, message = "subject_id must not be empty"))]
    pub(crate) subject_id: String,
    #[serde(default, alias = "chapterId")]
    pub(crate) chapter_id: Option<String>,
    #[serde(default, alias = "topicId")]
    pub(crate) topic_id: Option<String>,
    #[serde(default, alias = "classSubjectId")]
    pub(crate) class_subject_id: Option<String>,
}

fn default_difficulty() -> DifficultyLevel {
    DifficultyLevel::Medium
}

fn default_source() -> QuestionSource {
    QuestionSource::Book
}

impl QuestionWrite {
    pub(crate) fn options(&self) -> [Option<&str>; 4] {
        [
            self.option_a.as_deref(),
            self.option_b.as_deref(),
            self.option_c.as_deref(),
            self.option_d.as_deref(),
        ]
    }

    pub(crate) fn options_ur(&self) -> [Option<&str>; 4] {
        [
            self.option_a_ur.as_deref(),
            self.option_b_ur.as_deref(),
            self.option_c_ur.as_deref(),
            self.option_d_ur.as_deref(),
        ]
    }

    /// Stored letter is normalized to upper case.
    pub(crate) fn normalized_correct_option(&self) -> Option<String> {
        self.correct_option
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_ascii_uppercase)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListQuestionsQuery {
    #[serde(default, alias = "subjectId")]
    pub(crate) subject_id: Option<String>,
    #[serde(default, alias = "chapterId")]
    pub(crate) chapter_id: Option<String>,
    #[serde(default, alias = "topicId")]
    pub(crate) topic_id: Option<String>,
    #[serde(default, alias = "questionType")]
    pub(crate) question_type: Option<QuestionType>,
    #[serde(default)]
    pub(crate) difficulty: Option<String>,
    #[serde(default, alias = "sourceType")]
    pub(crate) source_type: Option<String>,
    #[serde(default)]
    pub(crate) search: Option<String>,
    #[serde(default)]
    pub(crate) skip: i64,
    #[serde(default = "default_limit")]
    pub(crate) limit: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct QuestionResponse {
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
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl From<Question> for QuestionResponse {
    fn from(question: Question) -> Self {
        Self {
            id: question.id,
            question_text: question.question_text,
            question_text_ur: question.question_text_ur,
            option_a: question.option_a,
            option_b: question.option_b,
            option_c: question.option_c,
            option_d: question.option_d,
            option_a_ur: question.option_a_ur,
            option_b_ur: question.option_b_ur,
            option_c_ur: question.option_c_ur,
            option_d_ur: question.option_d_ur,
            correct_option: question.correct_option,
            answer_text: question.answer_text,
            difficulty: question.difficulty,
            question_type: question.question_type,
            source_type: question.source_type,
            subject_id: question.subject_id,
            chapter_id: question.chapter_id,
            topic_id: question.topic_id,
            class_subject_id: question.class_subject_id,
            created_at: format_primitive(question.created_at),
            updated_at: format_primitive(question.updated_at),
        }
    }
}
