use sqlx::{PgPool, Postgres, QueryBuilder};
use time::PrimitiveDateTime;

use crate::db::models::Question;
use crate::db::types::{DifficultyLevel, QuestionSource, QuestionType};

pub(crate) const COLUMNS: &str = "\
    id, question_text, question_text_ur, option_a, option_b, option_c, option_d, \
    option_a_ur, option_b_ur, option_c_ur, option_d_ur, correct_option, answer_text, \
    difficulty, question_type, source_type, subject_id, chapter_id, topic_id, class_subject_id, \
    created_at, updated_at";

/// Filter set of one selection query. Empty `chapter_ids` and `None` fields are not applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct QuestionFilter {
    pub(crate) question_type: QuestionType,
    pub(crate) subject_id: String,
    pub(crate) chapter_ids: Vec<String>,
    pub(crate) source_type: Option<QuestionSource>,
    pub(crate) difficulty: Option<DifficultyLevel>,
}

impl QuestionFilter {
    pub(crate) fn matches(&self, question: &Question) -> bool {
        question.question_type == self.question_type
            && question.subject_id == self.subject_id
            && (self.chapter_ids.is_empty()
                || question
                    .chapter_id
                    .as_ref()
                    .is_some_and(|chapter_id| self.chapter_ids.contains(chapter_id)))
            && self.source_type.map_or(true, |source| question.source_type == source)
            && self.difficulty.map_or(true, |difficulty| question.difficulty == difficulty)
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct QuestionListRow {
    #[sqlx(flatten)]
    pub(crate) question: Question,
    pub(crate) total_count: i64,
}

pub(crate) async fn list_ids_by_filter(
    pool: &PgPool,
    filter: &QuestionFilter,
    limit: i64,
) -> Result<Vec<String>, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new("SELECT id FROM questions WHERE question_type = ");
    builder.push_bind(filter.question_type);
    builder.push(" AND subject_id = ");
    builder.push_bind(&filter.subject_id);

    if !filter.chapter_ids.is_empty() {
        builder.push(" AND chapter_id = ANY(");
        builder.push_bind(&filter.chapter_ids);
        builder.push(")");
    }
    if let Some(source_type) = filter.source_type {
        builder.push(" AND source_type = ");
        builder.push_bind(source_type);
    }
    if let Some(difficulty) = filter.difficulty {
        builder.push(" AND difficulty = ");
        builder.push_bind(difficulty);
    }

    // Byte order, so every database locale agrees with the in-memory store.
    builder.push(" ORDER BY id COLLATE \"C\" DESC LIMIT ");
    builder.push_bind(limit.max(0));

    builder.build_query_scalar::<String>().fetch_all(pool).await
}

/// Rows come back in the order of `ids`; unknown ids are skipped.
pub(crate) async fn list_by_ids(
    pool: &PgPool,
    ids: &[String],
) -> Result<Vec<Question>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    sqlx::query_as::<_, Question>(&format!(
        "SELECT {COLUMNS}
         FROM questions
         WHERE id = ANY($1)
         ORDER BY array_position($1::text[], id)"
    ))
    .bind(ids)
    .fetch_all(pool)
    .await
}

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Question>, sqlx::Error> {
    sqlx::query_as::<_, Question>(&format!("SELECT {COLUMNS} FROM questions WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) struct ListQuestionsParams {
    pub(crate) subject_id: Option<String>,
    pub(crate) chapter_id: Option<String>,
    pub(crate) topic_id: Option<String>,
    pub(crate) question_type: Option<QuestionType>,
    pub(crate) difficulty: Option<DifficultyLevel>,
    pub(crate) source_type: Option<QuestionSource>,
    pub(crate) search: Option<String>,
    pub(crate) skip: i64,
    pub(crate) limit: i64,
}

pub(crate) async fn list(
    pool: &PgPool,
    params: ListQuestionsParams,
) -> Result<Vec<QuestionListRow>, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new(format!(
        "SELECT {COLUMNS}, COUNT(*) OVER() AS total_count FROM questions WHERE TRUE"
    ));

    if let Some(subject_id) = params.subject_id {
        builder.push(" AND subject_id = ");
        builder.push_bind(subject_id);
    }
    if let Some(chapter_id) = params.chapter_id {
        builder.push(" AND chapter_id = ");
        builder.push_bind(chapter_id);
    }
    if let Some(topic_id) = params.topic_id {
        builder.push(" AND topic_id = ");
        builder.push_bind(topic_id);
    }
    if let Some(question_type) = params.question_type {
        builder.push(" AND question_type = ");
        builder.push_bind(question_type);
    }
    if let Some(difficulty) = params.difficulty {
        builder.push(" AND difficulty = ");
        builder.push_bind(difficulty);
    }
    if let Some(source_type) = params.source_type {
        builder.push(" AND source_type = ");
        builder.push_bind(source_type);
    }
    if let Some(search) = params.search {
        builder.push(" AND (question_text ILIKE ");
        builder.push_bind(format!("%{search}%"));
        builder.push(" OR question_text_ur ILIKE ");
        builder.push_bind(format!("%{search}%"));
        builder.push(")");
    }

    builder.push(" ORDER BY created_at DESC, id DESC OFFSET ");
    builder.push_bind(params.skip.max(0));
    builder.push(" LIMIT ");
    builder.push_bind(params.limit.clamp(1, 1000));

    builder.build_query_as::<QuestionListRow>().fetch_all(pool).await
}

pub(crate) struct QuestionWrite<'a> {
    pub(crate) question_text: &'a str,
    pub(crate) question_text_ur: Option<&'a str>,
    pub(crate) options: [Option<&'a str>; 4],
    pub(crate) options_ur: [Option<&'a str>; 4],
    pub(crate) correct_option: Option<&'a str>,
    pub(crate) answer_text: Option<&'a str>,
    pub(crate) difficulty: DifficultyLevel,
    pub(crate) question_type: QuestionType,
    pub(crate) source_type: QuestionSource,
    pub(crate) subject_id: &'a str,
    pub(crate) chapter_id: Option<&'a str>,
    pub(crate) topic_id: Option<&'a str>,
    pub(crate) class_subject_id: Option<&'a str>,
}

pub(crate) async fn create(
    executor: impl sqlx::PgExecutor<'_>,
    id: &str,
    params: QuestionWrite<'_>,
    now: PrimitiveDateTime,
) -> Result<Question, sqlx::Error> {
    sqlx::query_as::<_, Question>(&format!(
        "INSERT INTO questions (
            id, question_text, question_text_ur, option_a, option_b, option_c, option_d,
            option_a_ur, option_b_ur, option_c_ur, option_d_ur, correct_option, answer_text,
            difficulty, question_type, source_type, subject_id, chapter_id, topic_id,
            class_subject_id, created_at, updated_at
         ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13,$14,$15,$16,$17,$18,$19,$20,$21,$22)
         RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(params.question_text)
    .bind(params.question_text_ur)
    .bind(params.options[0])
    .bind(params.options[1])
    .bind(params.options[2])
    .bind(params.options[3])
    .bind(params.options_ur[0])
    .bind(params.options_ur[1])
    .bind(params.options_ur[2])
    .bind(params.options_ur[3])
    .bind(params.correct_option)
    .bind(params.answer_text)
    .bind(params.difficulty)
    .bind(params.question_type)
    .bind(params.source_type)
    .bind(params.subject_id)
    .bind(params.chapter_id)
    .bind(params.topic_id)
    .bind(params.class_subject_id)
    .bind(now)
    .bind(now)
    .fetch_one(executor)
    .await
}

pub(crate) async fn update(
    pool: &PgPool,
    id: &str,
    params: QuestionWrite<'_>,
    now: PrimitiveDateTime,
) -> Result<Option<Question>, sqlx::Error> {
    sqlx::query_as::<_, Question>(&format!(
        "UPDATE questions
         SET question_text = $2,
             question_text_ur = $3,
             option_a = $4,
             option_b = $5,
             option_c = $6,
             option_d = $7,
             option_a_ur = $8,
             option_b_ur = $9,
             option_c_ur = $10,
             option_d_ur = $11,
             correct_option = $12,
             answer_text = $13,
             difficulty = $14,
             question_type = $15,
             source_type = $16,
             subject_id = $17,
             chapter_id = $18,
             topic_id = $19,
             class_subject_id = $20,
             updated_at = $21
         WHERE id = $1
         RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(params.question_text)
    .bind(params.question_text_ur)
    .bind(params.options[0])
    .bind(params.options[1])
    .bind(params.options[2])
    .bind(params.options[3])
    .bind(params.options_ur[0])
    .bind(params.options_ur[1])
    .bind(params.options_ur[2])
    .bind(params.options_ur[3])
    .bind(params.correct_option)
    .bind(params.answer_text)
    .bind(params.difficulty)
    .bind(params.question_type)
    .bind(params.source_type)
    .bind(params.subject_id)
    .bind(params.chapter_id)
    .bind(params.topic_id)
    .bind(params.class_subject_id)
    .bind(now)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn delete_by_id(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM questions WHERE id = $1").bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use crate::db::types::QuestionType;
    use crate::repositories::questions::QuestionFilter;
    use crate::services::question_selection::QuestionStore;
    use crate::test_support::{self, question, InMemoryQuestionStore};

    #[tokio::test]
    async fn id_order_is_bytewise_like_the_in_memory_store() {
        let ctx = test_support::setup_test_context().await;
        let subject = test_support::insert_subject(ctx.state.db(), "Biology").await;
        let rows = ["B1", "a1", "b2", "A2", "_x", "9z"]
            .into_iter()
            .map(|id| question(id, &subject.id).build())
            .collect::<Vec<_>>();
        for row in &rows {
            test_support::insert_question(ctx.state.db(), row).await;
        }
        let filter = QuestionFilter {
            question_type: QuestionType::Mcq,
            subject_id: subject.id.clone(),
            chapter_ids: Vec::new(),
            source_type: None,
            difficulty: None,
        };

        let from_db = super::list_ids_by_filter(ctx.state.db(), &filter, 10).await.expect("ids");
        let from_memory =
            InMemoryQuestionStore::new(rows).find_ids(&filter, 10).await.expect("ids");

        assert_eq!(from_db, vec!["b2", "a1", "_x", "B1", "A2", "9z"]);
        assert_eq!(from_db, from_memory);
    }
}
