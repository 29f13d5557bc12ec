//! Question selection shared by paper generation, answer keys and quizzes.
//!
//! Every consumer goes through [`select_questions`] so a regenerated key picks exactly the
//! questions the paper picked for the same inputs: same filters, same `id DESC` order, same limit.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use sqlx::PgPool;

use crate::db::models::Question;
use crate::db::types::{DifficultyLevel, QuestionSource, QuestionType};
use crate::repositories;
use crate::repositories::questions::QuestionFilter;

/// Read access to the question bank.
#[async_trait]
pub(crate) trait QuestionStore: Send + Sync {
    /// Ids matching `filter`, ordered by id descending, at most `limit`.
    async fn find_ids(&self, filter: &QuestionFilter, limit: i64)
        -> Result<Vec<String>, sqlx::Error>;

    /// Full rows for `ids`. Order is not guaranteed; missing ids are skipped.
    async fn fetch_by_ids(&self, ids: &[String]) -> Result<Vec<Question>, sqlx::Error>;
}

#[async_trait]
impl QuestionStore for PgPool {
    async fn find_ids(
        &self,
        filter: &QuestionFilter,
        limit: i64,
    ) -> Result<Vec<String>, sqlx::Error> {
        repositories::questions::list_ids_by_filter(self, filter, limit).await
    }

    async fn fetch_by_ids(&self, ids: &[String]) -> Result<Vec<Question>, sqlx::Error> {
        repositories::questions::list_by_ids(self, ids).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum SelectionTier {
    /// Every requested filter applied.
    FullyFiltered,
    /// Difficulty dropped.
    AnyDifficulty,
    /// Difficulty and source type dropped.
    AnySource,
    /// Only subject and question type.
    SubjectWide,
}

impl SelectionTier {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::FullyFiltered => "fully_filtered",
            Self::AnyDifficulty => "any_difficulty",
            Self::AnySource => "any_source",
            Self::SubjectWide => "subject_wide",
        }
    }

    pub(crate) fn number(self) -> u8 {
        match self {
            Self::FullyFiltered => 1,
            Self::AnyDifficulty => 2,
            Self::AnySource => 3,
            Self::SubjectWide => 4,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct SelectionCriteria {
    pub(crate) question_type: QuestionType,
    pub(crate) subject_id: String,
    pub(crate) chapter_ids: Vec<String>,
    pub(crate) source_type: Option<QuestionSource>,
    pub(crate) difficulty: Option<DifficultyLevel>,
    pub(crate) count: i64,
}

/// Outcome of a selection run. `tier` is `None` when nothing was queried.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Selection {
    pub(crate) ids: Vec<String>,
    pub(crate) tier: Option<SelectionTier>,
    /// The chosen tier is not the first query of the plan.
    pub(crate) relaxed: bool,
}

/// Ordered list of queries to try. Consecutive tiers with the same effective filter collapse into
/// the later (less filtered) tier so no query runs twice.
pub(crate) fn fallback_plan(criteria: &SelectionCriteria) -> Vec<(SelectionTier, QuestionFilter)> {
    let full = QuestionFilter {
        question_type: criteria.question_type,
        subject_id: criteria.subject_id.clone(),
        chapter_ids: criteria.chapter_ids.clone(),
        source_type: criteria.source_type,
        difficulty: criteria.difficulty,
    };
    let any_difficulty = QuestionFilter { difficulty: None, ..full.clone() };
    let subject_wide = QuestionFilter {
        chapter_ids: Vec::new(),
        source_type: None,
        difficulty: None,
        ..full.clone()
    };

    let mut candidates = vec![
        (SelectionTier::FullyFiltered, full),
        (SelectionTier::AnyDifficulty, any_difficulty.clone()),
    ];
    if criteria.source_type.is_some() {
        candidates.push((SelectionTier::AnySource, QuestionFilter { source_type: None, ..any_difficulty }));
    }
    candidates.push((SelectionTier::SubjectWide, subject_wide));

    let mut plan: Vec<(SelectionTier, QuestionFilter)> = Vec::with_capacity(candidates.len());
    for (tier, filter) in candidates {
        match plan.last_mut() {
            Some(last) if last.1 == filter => last.0 = tier,
            _ => plan.push((tier, filter)),
        }
    }
    plan
}

/// Runs the fallback tiers until one yields `count` ids, otherwise returns the last tier's rows.
pub(crate) async fn select_question_ids<S: QuestionStore + ?Sized>(
    store: &S,
    criteria: &SelectionCriteria,
) -> Result<Selection, sqlx::Error> {
    if criteria.count <= 0 {
        return Ok(Selection::default());
    }

    let mut selection = Selection::default();
    for (position, (tier, filter)) in fallback_plan(criteria).into_iter().enumerate() {
        let ids = store.find_ids(&filter, criteria.count).await?;
        let satisfied = ids.len() as i64 >= criteria.count;
        tracing::debug!(
            question_type = criteria.question_type.as_str(),
            tier = tier.number(),
            found = ids.len(),
            wanted = criteria.count,
            "question selection tier evaluated"
        );
        selection = Selection { ids, tier: Some(tier), relaxed: position > 0 };
        if satisfied {
            break;
        }
    }

    if let Some(tier) = selection.tier {
        if selection.relaxed {
            tracing::info!(
                question_type = criteria.question_type.as_str(),
                subject_id = %criteria.subject_id,
                tier = tier.as_str(),
                found = selection.ids.len(),
                wanted = criteria.count,
                "question selection relaxed filters"
            );
        }
        metrics::counter!(
            "question_selection_tier_total",
            "question_type" => criteria.question_type.as_str(),
            "tier" => tier.as_str()
        )
        .increment(1);
    }

    Ok(selection)
}

/// Trims, drops blanks and keeps the first occurrence of each id.
pub(crate) fn normalize_ids(raw_ids: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut normalized = Vec::new();
    for raw in raw_ids {
        let id = raw.trim();
        if id.is_empty() {
            continue;
        }
        if seen.insert(id.to_string()) {
            normalized.push(id.to_string());
        }
    }
    normalized
}

/// Loads `ids` and returns them in exactly that order, whatever order the store answers in.
pub(crate) async fn fetch_in_order<S: QuestionStore + ?Sized>(
    store: &S,
    ids: &[String],
) -> Result<Vec<Question>, sqlx::Error> {
    let ids = normalize_ids(ids);
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut by_id = store
        .fetch_by_ids(&ids)
        .await?
        .into_iter()
        .map(|question| (question.id.clone(), question))
        .collect::<HashMap<_, _>>();

    Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
}

/// Selects with fallback, then re-fetches the full rows in selection order.
pub(crate) async fn select_questions<S: QuestionStore + ?Sized>(
    store: &S,
    criteria: &SelectionCriteria,
) -> Result<(Selection, Vec<Question>), sqlx::Error> {
    let selection = select_question_ids(store, criteria).await?;
    let questions = fetch_in_order(store, &selection.ids).await?;
    Ok((selection, questions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{question, InMemoryQuestionStore};

    fn criteria(count: i64) -> SelectionCriteria {
        SelectionCriteria {
            question_type: QuestionType::Mcq,
            subject_id: "S".to_string(),
            chapter_ids: Vec::new(),
            source_type: None,
            difficulty: None,
            count,
        }
    }

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[tokio::test]
    async fn satisfied_first_tier_runs_single_query() {
        let store = InMemoryQuestionStore::new(vec![
            question("q1", "S").difficulty(DifficultyLevel::Hard).build(),
            question("q2", "S").difficulty(DifficultyLevel::Hard).build(),
            question("q3", "S").difficulty(DifficultyLevel::Easy).build(),
        ]);
        let criteria = SelectionCriteria { difficulty: Some(DifficultyLevel::Hard), ..criteria(2) };

        let selection = select_question_ids(&store, &criteria).await.expect("selection");

        assert_eq!(selection.ids, ids(&["q2", "q1"]));
        assert_eq!(selection.tier, Some(SelectionTier::FullyFiltered));
        assert!(!selection.relaxed);
        assert_eq!(store.queries().len(), 1);
    }

    #[tokio::test]
    async fn unfiltered_request_is_not_a_relaxation() {
        let store = InMemoryQuestionStore::new(vec![question("q1", "S").build()]);

        let selection = select_question_ids(&store, &criteria(3)).await.expect("selection");

        assert_eq!(selection.tier, Some(SelectionTier::SubjectWide));
        assert_eq!(selection.ids, ids(&["q1"]));
        assert!(!selection.relaxed);
        assert_eq!(store.queries().len(), 1);
    }

    #[tokio::test]
    async fn model_hard_scenario_falls_back_to_subject_wide() {
        let mut rows = vec![
            question("m1", "S")
                .difficulty(DifficultyLevel::Hard)
                .source(QuestionSource::ModelPaper)
                .build(),
            question("m2", "S")
                .difficulty(DifficultyLevel::Hard)
                .source(QuestionSource::ModelPaper)
                .build(),
        ];
        for index in 0..8 {
            rows.push(question(&format!("b{index}"), "S").build());
        }
        rows.push(question("other", "T").build());
        rows.push(question("zz-short", "S").kind(QuestionType::Short).build());
        let store = InMemoryQuestionStore::new(rows);
        let criteria = SelectionCriteria {
            source_type: Some(QuestionSource::ModelPaper),
            difficulty: Some(DifficultyLevel::Hard),
            ..criteria(5)
        };

        let selection = select_question_ids(&store, &criteria).await.expect("selection");

        assert_eq!(selection.tier, Some(SelectionTier::SubjectWide));
        assert!(selection.relaxed);
        assert_eq!(selection.ids, ids(&["m2", "m1", "b7", "b6", "b5"]));
        let queries = store.queries();
        assert_eq!(queries.len(), 3);
        assert_eq!(queries[2].source_type, None);
        assert_eq!(queries[2].difficulty, None);
    }

    #[tokio::test]
    async fn chapter_filter_is_kept_until_last_tier() {
        let store = InMemoryQuestionStore::new(vec![
            question("a1", "S").chapter("c1").source(QuestionSource::Book).build(),
            question("a2", "S").chapter("c1").source(QuestionSource::PastPaper).build(),
            question("a3", "S").chapter("c2").source(QuestionSource::PastPaper).build(),
        ]);
        let criteria = SelectionCriteria {
            chapter_ids: ids(&["c1"]),
            source_type: Some(QuestionSource::PastPaper),
            ..criteria(2)
        };

        let selection = select_question_ids(&store, &criteria).await.expect("selection");

        assert_eq!(selection.tier, Some(SelectionTier::AnySource));
        assert_eq!(selection.ids, ids(&["a2", "a1"]));
    }

    #[tokio::test]
    async fn empty_first_tier_still_finds_subject_rows() {
        let store = InMemoryQuestionStore::new(vec![question("x1", "S").chapter("c9").build()]);
        let criteria = SelectionCriteria {
            chapter_ids: ids(&["c1"]),
            difficulty: Some(DifficultyLevel::Hard),
            source_type: Some(QuestionSource::Custom),
            ..criteria(3)
        };

        let selection = select_question_ids(&store, &criteria).await.expect("selection");

        assert_eq!(selection.ids, ids(&["x1"]));
        assert_eq!(selection.tier, Some(SelectionTier::SubjectWide));
        assert_eq!(store.queries().len(), 4);
    }

    #[tokio::test]
    async fn nothing_anywhere_returns_empty_best_effort() {
        let store = InMemoryQuestionStore::new(vec![question("x1", "T").build()]);

        let selection = select_question_ids(&store, &criteria(5)).await.expect("selection");

        assert!(selection.ids.is_empty());
        assert_eq!(selection.tier, Some(SelectionTier::SubjectWide));
    }

    #[tokio::test]
    async fn zero_count_does_not_query() {
        let store = InMemoryQuestionStore::new(vec![question("x1", "S").build()]);

        let selection = select_question_ids(&store, &criteria(0)).await.expect("selection");

        assert_eq!(selection, Selection::default());
        assert!(store.queries().is_empty());
    }

    #[tokio::test]
    async fn repeated_runs_return_same_sequence() {
        let store = InMemoryQuestionStore::new(
            (0..6).map(|index| question(&format!("q{index}"), "S").build()).collect(),
        );

        let first = select_question_ids(&store, &criteria(4)).await.expect("first");
        let second = select_question_ids(&store, &criteria(4)).await.expect("second");

        assert_eq!(first, second);
        assert_eq!(first.ids, ids(&["q5", "q4", "q3", "q2"]));
    }

    #[tokio::test]
    async fn store_error_aborts_selection() {
        let store = InMemoryQuestionStore::failing();

        let result = select_question_ids(&store, &criteria(2)).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn fetch_in_order_follows_input_order() {
        let store = InMemoryQuestionStore::new(vec![
            question("q1", "S").build(),
            question("q2", "S").build(),
            question("q3", "S").build(),
        ]);

        let questions = fetch_in_order(&store, &ids(&["q3", "q1", "missing", "q2", "q3"]))
            .await
            .expect("questions");

        let ordered = questions.iter().map(|question| question.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ordered, vec!["q3", "q1", "q2"]);
    }

    #[test]
    fn plan_collapses_identical_tiers() {
        let plan = fallback_plan(&criteria(5));
        let tiers = plan.iter().map(|(tier, _)| *tier).collect::<Vec<_>>();
        assert_eq!(tiers, vec![SelectionTier::SubjectWide]);

        let plan = fallback_plan(&SelectionCriteria {
            chapter_ids: ids(&["c1"]),
            source_type: Some(QuestionSource::Book),
            difficulty: Some(DifficultyLevel::Easy),
            ..criteria(5)
        });
        let tiers = plan.iter().map(|(tier, _)| *tier).collect::<Vec<_>>();
        assert_eq!(
            tiers,
            vec![
                SelectionTier::FullyFiltered,
                SelectionTier::AnyDifficulty,
                SelectionTier::AnySource,
                SelectionTier::SubjectWide,
            ]
        );
    }

    #[test]
    fn normalize_ids_trims_and_dedupes() {
        assert_eq!(normalize_ids(&ids(&[" q1", "", "q2", "q1 "])), ids(&["q1", "q2"]));
    }
}
