use serde::Deserialize;
use validator::Validate;

/// Explicitly chosen question ids per type.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct SelectedQuestions {
    pub(crate) mcq: Vec<String>,
    pub(crate) short: Vec<String>,
    pub(crate) long: Vec<String>,
}

/// Body of `POST /generate-mcq-key`. Fields are optional so a missing `subjectId` is reported as
/// a plain 400 rather than a deserialization failure.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct GenerateMcqKeyRequest {
    #[serde(alias = "subject_id")]
    pub(crate) subject_id: Option<String>,
    #[serde(alias = "selected_chapters")]
    pub(crate) selected_chapters: Vec<String>,
    #[serde(alias = "paper_title")]
    #[validate(length(max = 200, message = "paperTitle must be at most 200 characters"))]
    pub(crate) paper_title: Option<String>,
    #[serde(alias = "chapter_option")]
    pub(crate) chapter_option: Option<String>,
    #[serde(alias = "selection_method")]
    pub(crate) selection_method: Option<String>,
    #[serde(alias = "selected_questions")]
    pub(crate) selected_questions: Option<SelectedQuestions>,
    #[serde(alias = "mcq_count")]
    pub(crate) mcq_count: i64,
    #[serde(alias = "mcq_difficulty")]
    pub(crate) mcq_difficulty: Option<String>,
    #[serde(alias = "source_type")]
    pub(crate) source_type: Option<String>,
    #[serde(alias = "paper_id")]
    pub(crate) paper_id: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct GeneratePaperRequest {
    #[serde(alias = "subject_id")]
    pub(crate) subject_id: Option<String>,
    #[serde(alias = "class_id")]
    pub(crate) class_id: Option<String>,
    #[serde(alias = "selected_chapters")]
    pub(crate) selected_chapters: Vec<String>,
    #[serde(alias = "paper_title")]
    #[validate(length(max = 200, message = "paperTitle must be at most 200 characters"))]
    pub(crate) paper_title: Option<String>,
    #[serde(alias = "chapter_option")]
    pub(crate) chapter_option: Option<String>,
    #[serde(alias = "selection_method")]
    pub(crate) selection_method: Option<String>,
    #[serde(alias = "selected_questions")]
    pub(crate) selected_questions: Option<SelectedQuestions>,
    #[serde(alias = "mcq_count")]
    pub(crate) mcq_count: i64,
    #[serde(alias = "short_count")]
    pub(crate) short_count: i64,
    #[serde(alias = "long_count")]
    pub(crate) long_count: i64,
    #[serde(alias = "mcq_difficulty")]
    pub(crate) mcq_difficulty: Option<String>,
    #[serde(alias = "short_difficulty")]
    pub(crate) short_difficulty: Option<String>,
    #[serde(alias = "long_difficulty")]
    pub(crate) long_difficulty: Option<String>,
    #[serde(alias = "source_type")]
    pub(crate) source_type: Option<String>,
    #[serde(alias = "time_minutes")]
    #[validate(range(min = 1, max = 600, message = "timeMinutes must be between 1 and 600"))]
    pub(crate) time_minutes: u32,
    #[serde(alias = "mcq_marks")]
    #[validate(range(min = 1, max = 100, message = "mcqMarks must be between 1 and 100"))]
    pub(crate) mcq_marks: u32,
    #[serde(alias = "short_marks")]
    #[validate(range(min = 1, max = 100, message = "shortMarks must be between 1 and 100"))]
    pub(crate) short_marks: u32,
    #[serde(alias = "long_marks")]
    #[validate(range(min = 1, max = 100, message = "longMarks must be between 1 and 100"))]
    pub(crate) long_marks: u32,
}

impl Default for GeneratePaperRequest {
    fn default() -> Self {
        Self {
            subject_id: None,
            class_id: None,
            selected_chapters: Vec::new(),
            paper_title: None,
            chapter_option: None,
            selection_method: None,
            selected_questions: None,
            mcq_count: 0,
            short_count: 0,
            long_count: 0,
            mcq_difficulty: None,
            short_difficulty: None,
            long_difficulty: None,
            source_type: None,
            time_minutes: 60,
            mcq_marks: 1,
            short_marks: 2,
            long_marks: 5,
        }
    }
}
