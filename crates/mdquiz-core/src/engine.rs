//! Session engine.
//!
//! Builds sessions from a question bank, records answers, and finalizes
//! attempts. A session moves `Active → Archived` exactly once:
//! [`ActiveSession::finalize`] consumes the active session and hands back the
//! immutable [`QuizSession`] record, so an archived session can never accept
//! another answer.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::bank::QuestionBank;
use crate::config::QuizConfig;
use crate::error::QuizError;
use crate::ids::{IdSource, RandomIds, SequentialIds};
use crate::model::{OptionId, Question, QuizSession, SessionStatus, UserAnswer};
use crate::parser::{parse_markup, ParseOutcome};
use crate::shuffle::shuffled;

/// Owns the randomness and id generation behind parsing and session building.
pub struct SessionEngine {
    config: QuizConfig,
    ids: Box<dyn IdSource>,
    rng: StdRng,
}

impl std::fmt::Debug for SessionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SessionEngine {
    /// Engine with random ids and an entropy-seeded RNG.
    pub fn new(config: QuizConfig) -> Self {
        Self::with_parts(config, Box::new(RandomIds), StdRng::from_entropy())
    }

    /// Deterministic engine: sequential ids and a fixed seed.
    pub fn seeded(config: QuizConfig, seed: u64) -> Self {
        Self::with_parts(
            config,
            Box::new(SequentialIds::new()),
            StdRng::seed_from_u64(seed),
        )
    }

    pub fn with_parts(config: QuizConfig, ids: Box<dyn IdSource>, rng: StdRng) -> Self {
        Self { config, ids, rng }
    }

    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    /// Random source shared with the caller (e.g. for feedback messages).
    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Parse markdown into questions plus diagnostics.
    pub fn parse(&mut self, text: &str) -> ParseOutcome {
        parse_markup(text, self.ids.as_mut(), &mut self.rng)
    }

    /// Parse markdown into a bank, failing if no question survives.
    pub fn load_bank(&mut self, text: &str) -> Result<QuestionBank, QuizError> {
        QuestionBank::from_outcome(self.parse(text))
    }

    /// Start a session using the configured sample size.
    pub fn start(&mut self, bank: &QuestionBank) -> Result<ActiveSession, QuizError> {
        self.start_with_size(bank, self.config.sample_size)
    }

    /// Start a session drawing at most `sample_size` shuffled questions.
    pub fn start_with_size(
        &mut self,
        bank: &QuestionBank,
        sample_size: usize,
    ) -> Result<ActiveSession, QuizError> {
        if bank.is_empty() {
            return Err(QuizError::EmptyBank);
        }
        if sample_size == 0 {
            return Err(QuizError::InvalidSampleSize);
        }

        let mut questions: Vec<Question> = shuffled(bank.questions(), &mut self.rng);
        questions.truncate(bank.len().min(sample_size));

        let session = QuizSession {
            id: self.ids.next_id("session"),
            date: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            total_questions: questions.len(),
            questions,
            user_answers: Vec::new(),
            score: 0,
            status: SessionStatus::Failed,
            time_spent: None,
        };

        tracing::info!(
            "started session {} with {} of {} questions",
            session.id,
            session.total_questions,
            bank.len()
        );

        Ok(ActiveSession {
            session,
            duration_secs: self.config.duration_secs,
            pass_threshold: self.config.pass_threshold,
        })
    }
}

/// A session that is still accepting answers.
#[derive(Debug, Clone)]
pub struct ActiveSession {
    session: QuizSession,
    duration_secs: u32,
    pass_threshold: u32,
}

impl ActiveSession {
    /// Read-only view of the session so far.
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    /// Time allowed for this session in seconds.
    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    /// Index of the next question to answer.
    pub fn current_index(&self) -> usize {
        self.session.user_answers.len()
    }

    /// The next question to answer, or `None` once every question is answered.
    pub fn current_question(&self) -> Option<&Question> {
        self.session.questions.get(self.current_index())
    }

    pub fn is_complete(&self) -> bool {
        self.session.is_complete()
    }

    /// Grade and append the answer for `question_index`.
    ///
    /// Only the next unanswered question may be answered; anything else is
    /// rejected without touching the session. Repeated ids in `selected` are
    /// collapsed, keeping the first occurrence.
    pub fn record_answer(
        &mut self,
        question_index: usize,
        mut selected: Vec<OptionId>,
    ) -> Result<&UserAnswer, QuizError> {
        if self.is_complete() {
            return Err(QuizError::SessionComplete);
        }
        let expected = self.current_index();
        if question_index != expected {
            return Err(QuizError::AnswerOutOfOrder {
                expected,
                got: question_index,
            });
        }
        if selected.is_empty() {
            return Err(QuizError::EmptySelection);
        }

        let mut seen = HashSet::new();
        selected.retain(|id| seen.insert(id.clone()));

        let question = &self.session.questions[expected];
        if let Some(unknown) = selected.iter().find(|id| question.option(id).is_none()) {
            return Err(QuizError::UnknownOption(unknown.clone()));
        }

        let answer = UserAnswer {
            question_id: question.id.clone(),
            is_correct: question.grade(&selected),
            selected_option_ids: selected,
        };
        tracing::debug!(
            "session {}: question {} answered, correct={}",
            self.session.id,
            expected + 1,
            answer.is_correct
        );

        self.session.user_answers.push(answer);
        Ok(&self.session.user_answers[expected])
    }

    /// Score the attempt and archive it.
    ///
    /// `remaining_secs` is what was left on the countdown; time spent is the
    /// configured duration minus that, never negative. Unanswered questions
    /// count as incorrect against the full question total.
    pub fn finalize(self, remaining_secs: u32) -> QuizSession {
        let mut session = self.session;
        let score = score_percent(session.correct_count(), session.total_questions);

        session.score = score;
        session.status = if score >= self.pass_threshold {
            SessionStatus::Passed
        } else {
            SessionStatus::Failed
        };
        session.time_spent = Some(self.duration_secs.saturating_sub(remaining_secs));

        tracing::info!(
            "finalized session {}: {}% ({}/{} correct, {} unanswered) {}",
            session.id,
            session.score,
            session.correct_count(),
            session.total_questions,
            session.unanswered_count(),
            session.status
        );
        session
    }

    /// Discard the attempt without scoring or recording it.
    pub fn abandon(self) {
        tracing::info!(
            "abandoned session {} after {} answer(s)",
            self.session.id,
            self.session.user_answers.len()
        );
    }
}

/// `round(100 * correct / total)`, rounding halves up. Zero questions score 0.
pub fn score_percent(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((200 * correct + total) / (2 * total)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn bank_text(n: usize) -> String {
        (1..=n)
            .map(|i| format!("**Question {i}** Q{i}?\na. **right {i}**\nb. wrong {i}\nc. other {i}\n\n"))
            .collect()
    }

    fn engine() -> SessionEngine {
        SessionEngine::seeded(QuizConfig::default(), 99)
    }

    fn correct_ids(q: &Question) -> Vec<OptionId> {
        q.correct_option_ids().cloned().collect()
    }

    fn wrong_id(q: &Question) -> OptionId {
        q.options.iter().find(|o| !o.is_correct).unwrap().id.clone()
    }

    /// Answer every remaining question: the first `correct` right, the rest wrong.
    fn answer(active: &mut ActiveSession, correct: usize, count: usize) {
        for _ in 0..count {
            let idx = active.current_index();
            let q = active.current_question().unwrap().clone();
            let ids = if idx < correct {
                correct_ids(&q)
            } else {
                vec![wrong_id(&q)]
            };
            active.record_answer(idx, ids).unwrap();
        }
    }

    #[test]
    fn start_samples_without_repeats() {
        let mut engine = engine();
        let bank = engine.load_bank(&bank_text(60)).unwrap();
        let active = engine.start(&bank).unwrap();
        let session = active.session();

        assert_eq!(session.total_questions, 40);
        assert_eq!(session.questions.len(), 40);
        assert_eq!(session.score, 0);
        assert_eq!(session.status, SessionStatus::Failed);
        assert!(session.time_spent.is_none());
        assert!(session.user_answers.is_empty());

        let unique: HashSet<_> = session.questions.iter().map(|q| &q.id).collect();
        assert_eq!(unique.len(), 40);
    }

    #[test]
    fn small_bank_uses_every_question() {
        let mut engine = engine();
        let bank = engine.load_bank(&bank_text(5)).unwrap();
        let active = engine.start(&bank).unwrap();
        assert_eq!(active.session().total_questions, 5);
    }

    #[test]
    fn empty_bank_cannot_start() {
        let mut engine = engine();
        let err = engine.start(&QuestionBank::default()).unwrap_err();
        assert_eq!(err, QuizError::EmptyBank);

        let bank = engine.load_bank(&bank_text(3)).unwrap();
        assert_eq!(
            engine.start_with_size(&bank, 0).unwrap_err(),
            QuizError::InvalidSampleSize
        );
    }

    #[test]
    fn eighty_percent_passes() {
        let mut engine = engine();
        let bank = engine.load_bank(&bank_text(40)).unwrap();
        let mut active = engine.start(&bank).unwrap();
        answer(&mut active, 32, 40);

        let done = active.finalize(1200);
        assert_eq!(done.score, 80);
        assert_eq!(done.status, SessionStatus::Passed);
        assert_eq!(done.time_spent, Some(2400));
    }

    #[test]
    fn thirty_one_of_forty_fails() {
        let mut engine = engine();
        let bank = engine.load_bank(&bank_text(40)).unwrap();
        let mut active = engine.start(&bank).unwrap();
        answer(&mut active, 31, 40);

        let done = active.finalize(0);
        assert_eq!(done.score, 78);
        assert_eq!(done.status, SessionStatus::Failed);
        assert_eq!(done.time_spent, Some(3600));
    }

    #[test]
    fn timeout_scores_against_full_total() {
        let mut engine = engine();
        let bank = engine.load_bank(&bank_text(40)).unwrap();
        let mut active = engine.start(&bank).unwrap();
        answer(&mut active, 10, 10);

        let done = active.finalize(0);
        assert_eq!(done.total_questions, 40);
        assert_eq!(done.user_answers.len(), 10);
        assert_eq!(done.unanswered_count(), 30);
        assert_eq!(done.score, 25);
        assert_eq!(done.status, SessionStatus::Failed);
    }

    #[test]
    fn time_spent_never_negative() {
        let mut engine = SessionEngine::seeded(
            QuizConfig {
                duration_secs: 60,
                ..QuizConfig::default()
            },
            1,
        );
        let bank = engine.load_bank(&bank_text(2)).unwrap();
        let active = engine.start(&bank).unwrap();
        assert_eq!(active.finalize(500).time_spent, Some(0));
    }

    #[test]
    fn rejects_bad_answers_without_mutation() {
        let mut engine = engine();
        let bank = engine.load_bank(&bank_text(2)).unwrap();
        let mut active = engine.start(&bank).unwrap();
        let q = active.current_question().unwrap().clone();

        assert_eq!(
            active.record_answer(0, vec![]).unwrap_err(),
            QuizError::EmptySelection
        );
        assert_eq!(
            active.record_answer(1, correct_ids(&q)).unwrap_err(),
            QuizError::AnswerOutOfOrder {
                expected: 0,
                got: 1
            }
        );
        assert!(matches!(
            active.record_answer(0, vec![OptionId::new("nope")]),
            Err(QuizError::UnknownOption(_))
        ));
        assert!(active.session().user_answers.is_empty());

        answer(&mut active, 2, 2);
        assert!(active.is_complete());
        assert!(active.current_question().is_none());
        assert_eq!(
            active.record_answer(2, correct_ids(&q)).unwrap_err(),
            QuizError::SessionComplete
        );
        assert_eq!(active.session().user_answers.len(), 2);
    }

    #[test]
    fn multi_select_subset_is_wrong() {
        let mut engine = engine();
        let bank = engine
            .load_bank("**Question 1** Pick\na. **A**\nb. **B**\nc. C")
            .unwrap();
        let mut active = engine.start(&bank).unwrap();
        let q = active.current_question().unwrap().clone();
        let ids = correct_ids(&q);

        let answer = active.record_answer(0, vec![ids[0].clone()]).unwrap();
        assert!(!answer.is_correct);
        assert_eq!(active.finalize(0).score, 0);
    }

    #[test]
    fn repeated_correct_id_does_not_complete_the_set() {
        let mut engine = engine();
        let bank = engine
            .load_bank("**Question 1** Pick\na. **A**\nb. **B**\nc. C")
            .unwrap();
        let mut active = engine.start(&bank).unwrap();
        let q = active.current_question().unwrap().clone();
        let first = correct_ids(&q)[0].clone();

        let answer = active
            .record_answer(0, vec![first.clone(), first.clone()])
            .unwrap();
        assert!(!answer.is_correct);
        assert_eq!(answer.selected_option_ids, vec![first]);

        let finished = active.finalize(0);
        assert_eq!(finished.score, 0);
        assert_eq!(finished.status, SessionStatus::Failed);
    }

    #[test]
    fn score_rounding() {
        assert_eq!(score_percent(0, 0), 0);
        assert_eq!(score_percent(1, 3), 33);
        assert_eq!(score_percent(2, 3), 67);
        assert_eq!(score_percent(1, 8), 13);
        assert_eq!(score_percent(40, 40), 100);
    }

    #[test]
    fn seeded_engines_are_deterministic() {
        let text = bank_text(30);
        let run = || {
            let mut engine = engine();
            let bank = engine.load_bank(&text).unwrap();
            let active = engine.start(&bank).unwrap();
            active
                .session()
                .questions
                .iter()
                .map(|q| q.original_index)
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }
}
