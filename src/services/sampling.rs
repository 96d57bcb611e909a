use rand::seq::SliceRandom;
use rand::Rng;

use crate::db::models::Question;

/// Picks `min(questions.len(), target)` distinct questions in random order.
pub(crate) fn sample_questions<'a, R: Rng + ?Sized>(
    questions: &'a [Question],
    target: i32,
    rng: &mut R,
) -> Vec<&'a Question> {
    let count = usize::try_from(target.max(0)).unwrap_or(0).min(questions.len());
    let mut pool: Vec<&Question> = questions.iter().collect();
    let (picked, _) = pool.partial_shuffle(rng, count);
    picked.to_vec()
}
