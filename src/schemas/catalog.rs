use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::{Chapter, Class, ClassSubject, Subject, Topic};

/// Body shared by classes and subjects.
#[derive(Debug, Deserialize, Validate)]
pub(crate) struct NamedEntityWrite {
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) description: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ClassResponse {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl From<Class> for ClassResponse {
    fn from(class: Class) -> Self {
        Self {
            id: class.id,
            name: class.name,
            description: class.description,
            created_at: format_primitive(class.created_at),
            updated_at: format_primitive(class.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SubjectResponse {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl From<Subject> for SubjectResponse {
    fn from(subject: Subject) -> Self {
        Self {
            id: subject.id,
            name: subject.name,
            description: subject.description,
            created_at: format_primitive(subject.created_at),
            updated_at: format_primitive(subject.updated_at),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct ClassSubjectCreate {
    #[serde(alias = "classId")]
    #[validate(length(min = 1, message = "class_id must not be empty"))]
    pub(crate) class_id: String,
    #[serde(alias = "subjectId")]
    #[validate(length(min = 1, message = "subject_id must not be empty"))]
    pub(crate) subject_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ClassSubjectListQuery {
    #[serde(default, alias = "classId")]
    pub(crate) class_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ClassSubjectResponse {
    pub(crate) id: String,
    pub(crate) class_id: String,
    pub(crate) subject_id: String,
    pub(crate) created_at: String,
}

impl From<ClassSubject> for ClassSubjectResponse {
    fn from(link: ClassSubject) -> Self {
        Self {
            id: link.id,
            class_id: link.class_id,
            subject_id: link.subject_id,
            created_at: format_primitive(link.created_at),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct ChapterWrite {
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub(crate) name: String,
    #[serde(default, alias = "chapterNo")]
    #[validate(range(min = 0, message = "chapter_no must be non-negative"))]
    pub(crate) chapter_no: Option<i32>,
    #[serde(alias = "subjectId")]
    #[validate(length(min = 1, message = "subject_id must not be empty"))]
    pub(crate) subject_id: String,
    #[serde(default, alias = "classSubjectId")]
    pub(crate) class_subject_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChapterListQuery {
    #[serde(default, alias = "subjectId")]
    pub(crate) subject_id: Option<String>,
    #[serde(default, alias = "classSubjectId")]
    pub(crate) class_subject_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChapterResponse {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) chapter_no: Option<i32>,
    pub(crate) subject_id: String,
    pub(crate) class_subject_id: Option<String>,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl From<Chapter> for ChapterResponse {
    fn from(chapter: Chapter) -> Self {
        Self {
            id: chapter.id,
            name: chapter.name,
            chapter_no: chapter.chapter_no,
            subject_id: chapter.subject_id,
            class_subject_id: chapter.class_subject_id,
            created_at: format_primitive(chapter.created_at),
            updated_at: format_primitive(chapter.updated_at),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct TopicWrite {
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub(crate) name: String,
    #[serde(alias = "chapterId")]
    #[validate(length(min = 1, message = "chapter_id must not be empty"))]
    pub(crate) chapter_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TopicListQuery {
    #[serde(default, alias = "chapterId")]
    pub(crate) chapter_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TopicResponse {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) chapter_id: String,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl From<Topic> for TopicResponse {
    fn from(topic: Topic) -> Self {
        Self {
            id: topic.id,
            name: topic.name,
            chapter_id: topic.chapter_id,
            created_at: format_primitive(topic.created_at),
            updated_at: format_primitive(topic.updated_at),
        }
    }
}
