use crate::models::mcq::{Mcq, OPTION_COUNT};
use crate::models::quiz_result::QuizResult;
use crate::models::session::{Direction, Phase, SessionMeta, SessionState};
use crate::services::grading_service::GradingService;
use crate::utils::time;

pub const DEFAULT_SECONDS_PER_QUESTION: u32 = 60;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("A session needs at least one question")]
    NoQuestions,
    #[error("Question index {index} is out of range (session has {len} questions)")]
    QuestionOutOfRange { index: usize, len: usize },
    #[error("Option index {index} is out of range (must be 0-3)")]
    OptionOutOfRange { index: usize },
    #[error("Please answer all questions ({count} unanswered)")]
    UnansweredQuestions { count: usize },
    #[error("Session has already been submitted")]
    AlreadySubmitted,
    #[error("Session not found")]
    NotFound,
    #[error("Session is no longer running")]
    Closed,
}

/// Timed assessment state machine.
///
/// All mutation goes through the named operations below; the caller is responsible for
/// invoking [`SessionEngine::tick`] once per second and for serialising calls.
#[derive(Debug, Clone)]
pub struct SessionEngine {
    state: SessionState,
    meta: SessionMeta,
    result: Option<QuizResult>,
}

impl SessionEngine {
    /// Creates a session in `Setup` with a budget of one minute per question.
    pub fn setup(questions: Vec<Mcq>, meta: SessionMeta) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::NoQuestions);
        }
        let len = questions.len();
        Ok(Self {
            state: SessionState {
                questions,
                current_index: 0,
                selected_option_by_question: vec![None; len],
                remaining_seconds: budget(len, DEFAULT_SECONDS_PER_QUESTION),
                phase: Phase::Setup,
            },
            meta,
            result: None,
        })
    }

    /// Creates a session and makes it `Active` immediately.
    pub fn start(questions: Vec<Mcq>, meta: SessionMeta) -> Result<Self, SessionError> {
        let mut engine = Self::setup(questions, meta)?;
        engine.begin();
        Ok(engine)
    }

    /// Only affects a session still in `Setup`.
    pub fn with_seconds_per_question(mut self, seconds: u32) -> Self {
        if self.state.phase == Phase::Setup {
            self.state.remaining_seconds = budget(self.state.questions.len(), seconds);
        }
        self
    }

    pub fn begin(&mut self) {
        if self.state.phase == Phase::Setup {
            self.state.phase = Phase::Active;
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn meta(&self) -> &SessionMeta {
        &self.meta
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn result(&self) -> Option<&QuizResult> {
        self.result.as_ref()
    }

    pub fn select_option(
        &mut self,
        question_index: usize,
        option_index: usize,
    ) -> Result<(), SessionError> {
        self.ensure_open()?;
        let len = self.state.questions.len();
        if question_index >= len {
            return Err(SessionError::QuestionOutOfRange {
                index: question_index,
                len,
            });
        }
        if option_index >= OPTION_COUNT {
            return Err(SessionError::OptionOutOfRange {
                index: option_index,
            });
        }
        self.state.selected_option_by_question[question_index] = Some(option_index);
        Ok(())
    }

    pub fn advance(&mut self, direction: Direction) -> Result<(), SessionError> {
        self.ensure_open()?;
        let last = self.state.questions.len() - 1;
        self.state.current_index = match direction {
            Direction::Next => (self.state.current_index + 1).min(last),
            Direction::Previous => self.state.current_index.saturating_sub(1),
        };
        Ok(())
    }

    /// Counts down one second. Returns the result when this tick ran the clock out.
    pub fn tick(&mut self) -> Option<QuizResult> {
        if self.state.phase != Phase::Active {
            return None;
        }
        self.state.remaining_seconds = self.state.remaining_seconds.saturating_sub(1);
        if self.state.remaining_seconds == 0 {
            return Some(self.finish());
        }
        None
    }

    /// Explicit submission; refused while any question is unanswered.
    pub fn submit(&mut self) -> Result<QuizResult, SessionError> {
        if let Some(result) = &self.result {
            return Ok(result.clone());
        }
        let unanswered = self.state.unanswered_count();
        if unanswered > 0 {
            return Err(SessionError::UnansweredQuestions { count: unanswered });
        }
        Ok(self.finish())
    }

    /// Timer-driven submission; always succeeds and scores unanswered questions as wrong.
    pub fn force_submit(&mut self) -> QuizResult {
        self.finish()
    }

    fn finish(&mut self) -> QuizResult {
        if let Some(result) = &self.result {
            return result.clone();
        }
        let (score, answers) = GradingService::grade(
            &self.state.questions,
            &self.state.selected_option_by_question,
        );
        let result = QuizResult {
            quiz_id: self.meta.quiz_id.clone(),
            quiz_name: self.meta.quiz_name.clone(),
            topic: self.meta.topic.clone(),
            difficulty: self.meta.difficulty,
            date: time::now(),
            score,
            total: self.state.questions.len(),
            answers,
        };
        self.state.phase = Phase::Submitted;
        self.result = Some(result.clone());
        result
    }

    fn ensure_open(&self) -> Result<(), SessionError> {
        if self.state.phase == Phase::Submitted {
            return Err(SessionError::AlreadySubmitted);
        }
        Ok(())
    }
}

fn budget(questions: usize, seconds_per_question: u32) -> u32 {
    u32::try_from(questions)
        .unwrap_or(u32::MAX)
        .saturating_mul(seconds_per_question)
}
