use crate::models::mcq::Mcq;
use crate::models::quiz_result::AnswerReview;

pub struct GradingService;

impl GradingService {
    /// Scores one point per question whose selection equals the correct index.
    /// Unanswered questions count as incorrect.
    pub fn grade(questions: &[Mcq], selections: &[Option<usize>]) -> (usize, Vec<AnswerReview>) {
        let mut score = 0;
        let mut reviews = Vec::with_capacity(questions.len());

        for (idx, q) in questions.iter().enumerate() {
            let selected_option = selections.get(idx).copied().flatten();
            let is_correct = selected_option == Some(q.correct_option_index());
            if is_correct {
                score += 1;
            }

            reviews.push(AnswerReview {
                question: q.question_text().to_string(),
                selected_option,
                correct_option: q.correct_option_index(),
                selected: selected_option.and_then(|i| q.options().get(i).cloned()),
                correct: q.correct_option().to_string(),
                is_correct,
            });
        }

        (score, reviews)
    }
}
