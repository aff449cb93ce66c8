//! Application state and transitions.
//!
//! All interactive state lives in [`AppState`] and changes only through
//! [`AppState::update`]. Front ends translate user input and timer ticks into
//! [`Action`]s and render whatever view the state is in afterwards. Actions
//! that make no sense in the current view are ignored, which is how an empty
//! selection, a start without questions, or a second finalize are prevented.

use rand::seq::SliceRandom;

use crate::bank::QuestionBank;
use crate::engine::{ActiveSession, SessionEngine};
use crate::history::{History, HistoryStore};
use crate::model::{OptionId, Question, QuizSession};
use crate::storage::Storage;
use crate::timer::{Countdown, Tick};

/// Feedback shown after a correct answer.
pub const PRAISES: [&str; 4] = [
    "Correct!",
    "Awesome! You did it!",
    "Nailed it!",
    "Wonderful!",
];

/// Shown when a loaded document yields no questions.
pub const NO_QUESTIONS_NOTICE: &str =
    "No valid questions found! Check the Markdown file formatting.";

/// Which screen the application is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Home,
    Quiz,
    Summary,
    Review,
    History,
}

/// Everything a user (or the timer) can do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Replace the bank with questions parsed from this document.
    LoadMarkup(String),
    /// Begin a session from the current bank.
    Start,
    /// Begin a fresh session from the same bank after finishing one.
    Retry,
    /// Select or deselect an option of the current question.
    ToggleOption(OptionId),
    /// Lock in the current selection and show whether it was right.
    Confirm,
    /// Record the confirmed answer and move on (or finish).
    Next,
    /// One second elapsed.
    Tick,
    RequestExit,
    CancelExit,
    /// Abandon the running session without recording it.
    ConfirmExit,
    ShowHistory,
    /// Open the `n`-th most recent history entry.
    OpenRecord(usize),
    ClearHistory,
    ShowReview,
    BackToSummary,
    Home,
}

/// What an update did, for front ends that print instead of re-render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// The action does not apply in the current state.
    Ignored,
    Changed,
    BankLoaded { questions: usize, skipped: usize },
    LoadFailed,
    Graded { correct: bool },
    Finished { timed_out: bool },
    Abandoned,
}

/// Explicit application state driven by [`Action`]s.
pub struct AppState<S: Storage> {
    engine: SessionEngine,
    history: HistoryStore<S>,
    view: View,
    bank: QuestionBank,
    active: Option<ActiveSession>,
    finished: Option<QuizSession>,
    selection: Vec<OptionId>,
    answered: bool,
    praise: Option<&'static str>,
    exit_prompt: bool,
    countdown: Countdown,
    notice: Option<String>,
}

impl<S: Storage> AppState<S> {
    /// Fresh state on the home view, with history read from `storage`.
    pub fn new(engine: SessionEngine, storage: S) -> Self {
        let config = engine.config();
        let history = HistoryStore::load(storage, config.storage_key.clone(), config.history_cap);
        let countdown = Countdown::new(config.duration_secs);
        Self {
            engine,
            history,
            view: View::Home,
            bank: QuestionBank::default(),
            active: None,
            finished: None,
            selection: Vec::new(),
            answered: false,
            praise: None,
            exit_prompt: false,
            countdown,
            notice: None,
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn history(&self) -> &History {
        self.history.history()
    }

    pub fn history_store(&self) -> &HistoryStore<S> {
        &self.history
    }

    /// The running session, if the quiz view is active.
    pub fn active(&self) -> Option<&ActiveSession> {
        self.active.as_ref()
    }

    /// The session shown on the summary and review views.
    pub fn finished(&self) -> Option<&QuizSession> {
        self.finished.as_ref()
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.active.as_ref().and_then(|a| a.current_question())
    }

    pub fn selection(&self) -> &[OptionId] {
        &self.selection
    }

    pub fn is_answered(&self) -> bool {
        self.answered
    }

    pub fn praise(&self) -> Option<&'static str> {
        self.praise
    }

    pub fn exit_prompt(&self) -> bool {
        self.exit_prompt
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    /// Message for the user after a failed load.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Start is only offered when there is something to ask.
    pub fn can_start(&self) -> bool {
        !self.bank.is_empty() && self.view != View::Quiz
    }

    /// Confirm is only offered with a selection on an unanswered question.
    pub fn can_confirm(&self) -> bool {
        self.view == View::Quiz && !self.answered && !self.selection.is_empty()
    }

    /// Apply one action.
    pub fn update(&mut self, action: Action) -> Event {
        let in_quiz = self.view == View::Quiz;

        match action {
            Action::LoadMarkup(text) if !in_quiz => self.load(&text),
            Action::Start | Action::Retry if self.can_start() => self.start(),
            Action::ToggleOption(id) if in_quiz && !self.answered && !self.exit_prompt => {
                self.toggle(id)
            }
            Action::Confirm if self.can_confirm() && !self.exit_prompt => self.confirm(),
            Action::Next if in_quiz && self.answered && !self.exit_prompt => self.next(),
            Action::Tick => self.tick(),
            Action::RequestExit if in_quiz => {
                self.exit_prompt = true;
                Event::Changed
            }
            Action::CancelExit if self.exit_prompt => {
                self.exit_prompt = false;
                Event::Changed
            }
            Action::ConfirmExit if in_quiz && self.exit_prompt => self.abandon(),
            Action::ShowHistory if !in_quiz => {
                self.view = View::History;
                Event::Changed
            }
            Action::OpenRecord(index) if self.view == View::History => {
                match self.history.history().get(index) {
                    Some(session) => {
                        self.finished = Some(session.clone());
                        self.view = View::Summary;
                        Event::Changed
                    }
                    None => Event::Ignored,
                }
            }
            Action::ClearHistory if self.view == View::History => {
                self.history.clear();
                Event::Changed
            }
            Action::ShowReview if self.view == View::Summary && self.finished.is_some() => {
                self.view = View::Review;
                Event::Changed
            }
            Action::BackToSummary if self.view == View::Review => {
                self.view = View::Summary;
                Event::Changed
            }
            Action::Home if !in_quiz => {
                self.view = View::Home;
                Event::Changed
            }
            _ => Event::Ignored,
        }
    }

    fn load(&mut self, text: &str) -> Event {
        let outcome = self.engine.parse(text);
        let skipped = outcome.skipped.len();
        if outcome.questions.is_empty() {
            tracing::warn!("loaded document has no valid questions ({} blocks skipped)", skipped);
            self.notice = Some(NO_QUESTIONS_NOTICE.to_string());
            return Event::LoadFailed;
        }

        self.bank = QuestionBank::new(outcome.questions);
        self.notice = None;
        self.view = View::Home;
        tracing::info!("loaded {} question(s), {} block(s) skipped", self.bank.len(), skipped);
        Event::BankLoaded {
            questions: self.bank.len(),
            skipped,
        }
    }

    fn start(&mut self) -> Event {
        let active = match self.engine.start(&self.bank) {
            Ok(active) => active,
            Err(e) => {
                tracing::warn!("could not start session: {}", e);
                return Event::Ignored;
            }
        };

        self.countdown = Countdown::new(active.duration_secs());
        self.countdown.arm();
        self.active = Some(active);
        self.finished = None;
        self.reset_question_state();
        self.exit_prompt = false;
        self.view = View::Quiz;
        Event::Changed
    }

    fn toggle(&mut self, id: OptionId) -> Event {
        let multiple = match self.current_question() {
            Some(question) if question.option(&id).is_some() => question.is_multiple_choice,
            _ => return Event::Ignored,
        };

        if multiple {
            if let Some(pos) = self.selection.iter().position(|s| s == &id) {
                self.selection.remove(pos);
            } else {
                self.selection.push(id);
            }
        } else {
            self.selection = vec![id];
        }
        Event::Changed
    }

    fn confirm(&mut self) -> Event {
        let Some(question) = self.current_question() else {
            return Event::Ignored;
        };
        let correct = question.grade(&self.selection);

        self.answered = true;
        self.praise = if correct {
            PRAISES.choose(self.engine.rng()).copied()
        } else {
            None
        };
        Event::Graded { correct }
    }

    fn next(&mut self) -> Event {
        let Some(active) = self.active.as_mut() else {
            return Event::Ignored;
        };

        let index = active.current_index();
        let selection = std::mem::take(&mut self.selection);
        if let Err(e) = active.record_answer(index, selection) {
            if e.is_input_rejection() {
                tracing::debug!("answer rejected: {}", e);
            } else {
                tracing::warn!("answer rejected: {}", e);
            }
            return Event::Ignored;
        }

        if active.is_complete() {
            self.finish(false)
        } else {
            self.reset_question_state();
            Event::Changed
        }
    }

    fn tick(&mut self) -> Event {
        match self.countdown.tick() {
            Tick::Running(_) => Event::Changed,
            Tick::Expired if self.view == View::Quiz && self.active.is_some() => {
                tracing::info!("time is up");
                self.finish(true)
            }
            Tick::Expired | Tick::Idle => Event::Ignored,
        }
    }

    fn finish(&mut self, timed_out: bool) -> Event {
        self.countdown.disarm();
        let Some(active) = self.active.take() else {
            return Event::Ignored;
        };

        let session = active.finalize(self.countdown.remaining());
        self.history.record(session.clone());
        self.finished = Some(session);
        self.reset_question_state();
        self.exit_prompt = false;
        self.view = View::Summary;
        Event::Finished { timed_out }
    }

    fn abandon(&mut self) -> Event {
        self.countdown.disarm();
        if let Some(active) = self.active.take() {
            active.abandon();
        }
        self.reset_question_state();
        self.exit_prompt = false;
        self.view = View::Home;
        Event::Abandoned
    }

    fn reset_question_state(&mut self) {
        self.selection.clear();
        self.answered = false;
        self.praise = None;
    }
}
