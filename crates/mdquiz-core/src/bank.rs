//! The validated question bank.

use std::sync::Arc;

use crate::error::QuizError;
use crate::model::Question;
use crate::parser::ParseOutcome;

/// Immutable collection of parsed questions.
///
/// Cloning is cheap; clones share the same question storage.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    questions: Arc<[Question]>,
}

impl QuestionBank {
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions: questions.into(),
        }
    }

    /// Build a bank from parser output, failing when nothing was recovered.
    pub fn from_outcome(outcome: ParseOutcome) -> Result<Self, QuizError> {
        if outcome.questions.is_empty() {
            return Err(QuizError::NoQuestions);
        }
        Ok(Self::new(outcome.questions))
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Question> {
        self.questions.iter()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Number of questions that require more than one selection.
    pub fn multiple_choice_count(&self) -> usize {
        self.questions.iter().filter(|q| q.is_multiple_choice).count()
    }
}

impl<'a> IntoIterator for &'a QuestionBank {
    type Item = &'a Question;
    type IntoIter = std::slice::Iter<'a, Question>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;
    use crate::parser::parse_markup;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn outcome(text: &str) -> ParseOutcome {
        parse_markup(text, &mut SequentialIds::new(), &mut StdRng::seed_from_u64(0))
    }

    #[test]
    fn empty_outcome_is_no_questions() {
        let err = QuestionBank::from_outcome(outcome("nothing here\nat all")).unwrap_err();
        assert_eq!(err, QuizError::NoQuestions);
    }

    #[test]
    fn bank_preserves_parse_order() {
        let bank = QuestionBank::from_outcome(outcome(
            "**Question 2** b\na. **x**\nb. **y**\n**Question 1** a\na. **x**\nb. y",
        ))
        .unwrap();
        assert_eq!(bank.len(), 2);
        assert_eq!(bank.multiple_choice_count(), 1);
        let order: Vec<u64> = bank.iter().map(|q| q.original_index).collect();
        assert_eq!(order, vec![2, 1]);

        let clone = bank.clone();
        assert_eq!(clone.questions().as_ptr(), bank.questions().as_ptr());
    }
}
