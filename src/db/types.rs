use serde::{Deserialize, Serialize};
use sqlx::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "userrole", rename_all = "lowercase")]
pub(crate) enum UserRole {
    Admin,
    Teacher,
    Student,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "difficultylevel", rename_all = "lowercase")]
pub(crate) enum DifficultyLevel {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "questiontype", rename_all = "lowercase")]
pub(crate) enum QuestionType {
    Mcq,
    Short,
    Long,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "questionsource", rename_all = "snake_case")]
pub(crate) enum QuestionSource {
    Book,
    PastPaper,
    ModelPaper,
    Custom,
}

impl DifficultyLevel {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    /// `None` means "any difficulty"; unknown values are `Err`.
    pub(crate) fn parse_filter(raw: Option<&str>) -> Result<Option<Self>, String> {
        let Some(value) = raw.map(|value| value.trim().to_ascii_lowercase()) else {
            return Ok(None);
        };
        match value.as_str() {
            "" | "any" | "all" | "mixed" => Ok(None),
            "easy" => Ok(Some(Self::Easy)),
            "medium" => Ok(Some(Self::Medium)),
            "hard" => Ok(Some(Self::Hard)),
            _ => Err(format!("Unknown difficulty '{value}'")),
        }
    }
}

impl QuestionType {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Mcq => "mcq",
            Self::Short => "short",
            Self::Long => "long",
        }
    }
}

impl QuestionSource {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Book => "book",
            Self::PastPaper => "past_paper",
            Self::ModelPaper => "model_paper",
            Self::Custom => "custom",
        }
    }

    /// `None` means "all sources". Accepts the short aliases the paper forms send.
    pub(crate) fn parse_filter(raw: Option<&str>) -> Result<Option<Self>, String> {
        let Some(value) = raw.map(|value| value.trim().to_ascii_lowercase()) else {
            return Ok(None);
        };
        match value.as_str() {
            "" | "all" | "any" => Ok(None),
            "book" => Ok(Some(Self::Book)),
            "past" | "past_paper" | "pastpaper" => Ok(Some(Self::PastPaper)),
            "model" | "model_paper" | "modelpaper" => Ok(Some(Self::ModelPaper)),
            "custom" => Ok(Some(Self::Custom)),
            _ => Err(format!("Unknown source type '{value}'")),
        }
    }
}
