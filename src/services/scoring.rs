use crate::db::models::{Answer, Question};
use crate::db::types::OptionLabel;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct DerivedAnswer {
    pub(crate) is_correct: bool,
    pub(crate) marks_obtained: f64,
}

/// Correctness and marks are always recomputed from the question; never taken from input.
pub(crate) fn derive_answer(question: &Question, selected: OptionLabel) -> DerivedAnswer {
    let is_correct = question.correct_answer == selected;
    DerivedAnswer { is_correct, marks_obtained: if is_correct { question.marks } else { 0.0 } }
}

pub(crate) fn total_marks<'a>(questions: impl IntoIterator<Item = &'a Question>) -> f64 {
    questions.into_iter().map(|question| question.marks).sum()
}

/// Unanswered questions have no row and contribute nothing.
pub(crate) fn score(answers: &[Answer]) -> f64 {
    answers.iter().map(|answer| answer.marks_obtained).sum()
}

pub(crate) fn percentage(score: f64, total_marks: f64) -> f64 {
    if total_marks > 0.0 {
        score / total_marks * 100.0
    } else {
        0.0
    }
}

pub(crate) fn passed(percentage: f64, pass_percentage: f64) -> bool {
    percentage >= pass_percentage
}
