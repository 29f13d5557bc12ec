mod catalog;
mod papers;
mod questions;

use axum::routing::{delete, get, put};
use axum::Router;

use crate::core::state::AppState;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/classes", get(catalog::list_classes).post(catalog::create_class))
        .route("/classes/:class_id", put(catalog::update_class).delete(catalog::delete_class))
        .route("/subjects", get(catalog::list_subjects).post(catalog::create_subject))
        .route(
            "/subjects/:subject_id",
            put(catalog::update_subject).delete(catalog::delete_subject),
        )
        .route(
            "/class-subjects",
            get(catalog::list_class_subjects).post(catalog::create_class_subject),
        )
        .route("/class-subjects/:link_id", delete(catalog::delete_class_subject))
        .route("/chapters", get(catalog::list_chapters).post(catalog::create_chapter))
        .route(
            "/chapters/:chapter_id",
            put(catalog::update_chapter).delete(catalog::delete_chapter),
        )
        .route("/topics", get(catalog::list_topics).post(catalog::create_topic))
        .route(
            "/topics/:topic_id",
            put(catalog::update_topic).delete(catalog::delete_topic),
        )
        .route("/questions", get(questions::list_questions).post(questions::create_question))
        .route(
            "/questions/:question_id",
            get(questions::get_question)
                .put(questions::update_question)
                .delete(questions::delete_question),
        )
        .route("/papers", get(papers::list_papers))
        .route("/papers/:paper_id", get(papers::get_paper).delete(papers::delete_paper))
}

#[cfg(test)]
mod tests;
