use std::collections::HashMap;

use crate::db::models::Question;
use crate::services::answers::{resolve_correct_answer, OptionLetter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GradedAnswer {
    pub(crate) question_id: String,
    pub(crate) selected_option: Option<OptionLetter>,
    pub(crate) correct_option: Option<OptionLetter>,
    pub(crate) correct_text: Option<String>,
    pub(crate) is_correct: bool,
    pub(crate) answer_available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct QuizOutcome {
    pub(crate) results: Vec<GradedAnswer>,
    pub(crate) score: u32,
    pub(crate) total: u32,
}

/// Grades `questions` (already in submission order) against the selected letters keyed by
/// question id. Unparseable selections count as unanswered.
pub(crate) fn grade(questions: &[Question], selections: &HashMap<String, String>) -> QuizOutcome {
    let results = questions
        .iter()
        .map(|question| {
            let selected_option = selections
                .get(&question.id)
                .and_then(|raw| OptionLetter::parse(raw));
            let resolved = resolve_correct_answer(question);
            let is_correct = matches!(
                (selected_option, resolved),
                (Some(selected), Some(answer)) if selected == answer.letter
            );

            GradedAnswer {
                question_id: question.id.clone(),
                selected_option,
                correct_option: resolved.map(|answer| answer.letter),
                correct_text: resolved.map(|answer| answer.text.to_string()),
                is_correct,
                answer_available: resolved.is_some(),
            }
        })
        .collect::<Vec<_>>();

    let score = results.iter().filter(|result| result.is_correct).count() as u32;
    let total = results.len() as u32;
    QuizOutcome { results, score, total }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::question;

    fn selections(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(id, option)| (id.to_string(), option.to_string())).collect()
    }

    #[test]
    fn grades_each_question_and_totals_score() {
        let questions = vec![
            question("q1", "S").options(["a", "b", "", ""]).correct("B").build(),
            question("q2", "S").options(["a", "b", "c", ""]).correct("c").build(),
            question("q3", "S").options(["", "", "", ""]).correct("A").build(),
        ];

        let outcome = grade(&questions, &selections(&[("q1", "b"), ("q2", "A"), ("q3", "A")]));

        assert_eq!(outcome.score, 1);
        assert_eq!(outcome.total, 3);
        assert!(outcome.results[0].is_correct);
        assert!(!outcome.results[1].is_correct);
        assert_eq!(outcome.results[1].correct_option, Some(OptionLetter::C));
        assert!(!outcome.results[2].is_correct);
        assert!(!outcome.results[2].answer_available);
    }

    #[test]
    fn substituted_answer_is_used_for_grading() {
        let questions = vec![question("q1", "S").options(["", "real", "", ""]).correct("C").build()];

        let outcome = grade(&questions, &selections(&[("q1", "B")]));

        assert_eq!(outcome.score, 1);
        assert_eq!(outcome.results[0].correct_text.as_deref(), Some("real"));
    }

    #[test]
    fn missing_or_invalid_selection_is_incorrect() {
        let questions = vec![
            question("q1", "S").options(["a", "b", "", ""]).correct("A").build(),
            question("q2", "S").options(["a", "b", "", ""]).correct("A").build(),
        ];

        let outcome = grade(&questions, &selections(&[("q2", "Z")]));

        assert_eq!(outcome.score, 0);
        assert_eq!(outcome.results[0].selected_option, None);
        assert_eq!(outcome.results[1].selected_option, None);
    }
}
