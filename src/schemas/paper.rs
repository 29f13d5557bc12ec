use serde::{Deserialize, Serialize};

use crate::api::pagination::default_limit;
use crate::core::time::format_primitive;
use crate::db::models::{Paper, PaperQuestionIds};
use crate::repositories::papers::PaperSummaryRow;

#[derive(Debug, Deserialize)]
pub(crate) struct ListPapersQuery {
    #[serde(default, alias = "subjectId")]
    pub(crate) subject_id: Option<String>,
    #[serde(default)]
    pub(crate) skip: i64,
    #[serde(default = "default_limit")]
    pub(crate) limit: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct PaperSummaryResponse {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) subject_id: String,
    pub(crate) subject_name: String,
    pub(crate) paper_pdf_url: Option<String>,
    pub(crate) key_pdf_url: Option<String>,
    pub(crate) created_at: String,
}

impl From<PaperSummaryRow> for PaperSummaryResponse {
    fn from(row: PaperSummaryRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            subject_id: row.subject_id,
            subject_name: row.subject_name,
            paper_pdf_url: row.paper_pdf_url,
            key_pdf_url: row.key_pdf_url,
            created_at: format_primitive(row.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct PaperResponse {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) subject_id: String,
    pub(crate) class_id: Option<String>,
    pub(crate) paper_pdf_url: Option<String>,
    pub(crate) key_pdf_url: Option<String>,
    /// Short-lived signed links, present when object storage is configured.
    pub(crate) paper_download_url: Option<String>,
    pub(crate) key_download_url: Option<String>,
    pub(crate) question_ids: PaperQuestionIds,
    pub(crate) settings: serde_json::Value,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl PaperResponse {
    pub(crate) fn from_paper(paper: Paper) -> Self {
        Self {
            id: paper.id,
            title: paper.title,
            subject_id: paper.subject_id,
            class_id: paper.class_id,
            paper_pdf_url: paper.paper_pdf_url,
            key_pdf_url: paper.key_pdf_url,
            paper_download_url: None,
            key_download_url: None,
            question_ids: paper.question_ids.0,
            settings: paper.settings.0,
            created_at: format_primitive(paper.created_at),
            updated_at: format_primitive(paper.updated_at),
        }
    }
}
