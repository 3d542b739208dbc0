use crate::models::mcq::{Mcq, OPTION_COUNT};
use crate::models::quiz_result::QuizResult;
use crate::models::session::{Direction, Phase, SessionMeta};
use crate::services::result_service::ResultStore;
use crate::services::session_engine::{SessionEngine, SessionError};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{interval_at, sleep_until, Instant};
use uuid::Uuid;

pub const SUBMITTED_RETENTION: Duration = Duration::from_secs(300);

/// A question as shown to a participant, without its answer.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub index: usize,
    pub question: String,
    pub options: [String; OPTION_COUNT],
}

impl QuestionView {
    pub fn of(index: usize, mcq: &Mcq) -> Self {
        Self {
            index,
            question: mcq.question_text().to_string(),
            options: mcq.options().clone(),
        }
    }
}

/// What a participant may see of a session. Correct answers only appear in `result`.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub quiz_id: String,
    pub quiz_name: String,
    pub phase: Phase,
    pub current_index: usize,
    pub remaining_seconds: u32,
    pub total_questions: usize,
    pub questions: Vec<QuestionView>,
    pub selected: Vec<Option<usize>>,
    pub result: Option<QuizResult>,
}

impl SessionSnapshot {
    fn of(id: Uuid, engine: &SessionEngine) -> Self {
        let state = engine.state();
        Self {
            id,
            quiz_id: engine.meta().quiz_id.clone(),
            quiz_name: engine.meta().quiz_name.clone(),
            phase: state.phase,
            current_index: state.current_index,
            remaining_seconds: state.remaining_seconds,
            total_questions: state.questions.len(),
            questions: state
                .questions
                .iter()
                .enumerate()
                .map(|(index, q)| QuestionView::of(index, q))
                .collect(),
            selected: state.selected_option_by_question.clone(),
            result: engine.result().cloned(),
        }
    }
}

type Registry = Arc<Mutex<HashMap<Uuid, SessionHandle>>>;

type Reply<T> = oneshot::Sender<Result<T, SessionError>>;

enum SessionCommand {
    Select {
        question_index: usize,
        option_index: usize,
        reply: Reply<SessionSnapshot>,
    },
    Advance {
        direction: Direction,
        reply: Reply<SessionSnapshot>,
    },
    Submit {
        reply: Reply<QuizResult>,
    },
    Snapshot {
        reply: Reply<SessionSnapshot>,
    },
}

#[derive(Clone)]
struct SessionHandle {
    tx: mpsc::Sender<SessionCommand>,
}

/// Registry of running sessions. Each session is owned by its own task, which
/// serialises the countdown against user commands. A submitted session stays
/// readable for [`SUBMITTED_RETENTION`] after its result is stored, then its task
/// exits and it leaves the registry.
#[derive(Clone)]
pub struct SessionService {
    sessions: Registry,
    results: Arc<dyn ResultStore>,
    seconds_per_question: u32,
    tick_period: Duration,
    retention: Duration,
}

impl SessionService {
    pub fn new(results: Arc<dyn ResultStore>, seconds_per_question: u32) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            results,
            seconds_per_question,
            tick_period: Duration::from_secs(1),
            retention: SUBMITTED_RETENTION,
        }
    }

    pub fn active_sessions(&self) -> usize {
        self.sessions
            .lock()
            .expect("session registry mutex poisoned")
            .len()
    }

    pub fn start(
        &self,
        questions: Vec<Mcq>,
        meta: SessionMeta,
    ) -> Result<SessionSnapshot, SessionError> {
        let mut engine = SessionEngine::setup(questions, meta)?
            .with_seconds_per_question(self.seconds_per_question);
        engine.begin();

        let id = Uuid::new_v4();
        let snapshot = SessionSnapshot::of(id, &engine);
        let (tx, rx) = mpsc::channel(32);
        self.sessions
            .lock()
            .expect("session registry mutex poisoned")
            .insert(id, SessionHandle { tx });

        tokio::spawn(run_session(
            SessionTask {
                id,
                results: self.results.clone(),
                sessions: self.sessions.clone(),
                tick_period: self.tick_period,
                retention: self.retention,
            },
            engine,
            rx,
        ));
        tracing::info!(session_id = %id, questions = snapshot.total_questions, remaining_seconds = snapshot.remaining_seconds, "Session started");
        Ok(snapshot)
    }

    pub async fn snapshot(&self, id: Uuid) -> Result<SessionSnapshot, SessionError> {
        self.request(id, |reply| SessionCommand::Snapshot { reply })
            .await
    }

    pub async fn select_option(
        &self,
        id: Uuid,
        question_index: usize,
        option_index: usize,
    ) -> Result<SessionSnapshot, SessionError> {
        self.request(id, |reply| SessionCommand::Select {
            question_index,
            option_index,
            reply,
        })
        .await
    }

    pub async fn advance(
        &self,
        id: Uuid,
        direction: Direction,
    ) -> Result<SessionSnapshot, SessionError> {
        self.request(id, |reply| SessionCommand::Advance { direction, reply })
            .await
    }

    pub async fn submit(&self, id: Uuid) -> Result<QuizResult, SessionError> {
        self.request(id, |reply| SessionCommand::Submit { reply })
            .await
    }

    /// Drops the session without submitting it. Nothing is persisted.
    pub fn abandon(&self, id: Uuid) -> Result<(), SessionError> {
        let removed = self
            .sessions
            .lock()
            .expect("session registry mutex poisoned")
            .remove(&id);
        match removed {
            Some(_) => {
                tracing::info!(session_id = %id, "Session abandoned");
                Ok(())
            }
            None => Err(SessionError::NotFound),
        }
    }

    fn handle(&self, id: Uuid) -> Result<SessionHandle, SessionError> {
        self.sessions
            .lock()
            .expect("session registry mutex poisoned")
            .get(&id)
            .cloned()
            .ok_or(SessionError::NotFound)
    }

    async fn request<T>(
        &self,
        id: Uuid,
        command: impl FnOnce(Reply<T>) -> SessionCommand,
    ) -> Result<T, SessionError> {
        let handle = self.handle(id)?;
        let (reply, rx) = oneshot::channel();
        handle
            .tx
            .send(command(reply))
            .await
            .map_err(|_| SessionError::Closed)?;
        rx.await.map_err(|_| SessionError::Closed)?
    }
}

struct SessionTask {
    id: Uuid,
    results: Arc<dyn ResultStore>,
    sessions: Registry,
    tick_period: Duration,
    retention: Duration,
}

async fn run_session(
    task: SessionTask,
    mut engine: SessionEngine,
    mut rx: mpsc::Receiver<SessionCommand>,
) {
    let id = task.id;
    let mut ticker = interval_at(Instant::now() + task.tick_period, task.tick_period);
    let mut persisted = false;
    let mut expires_at: Option<Instant> = None;

    loop {
        // Ticks drive the countdown while active and retry a failed save afterwards.
        let ticking = engine.phase() == Phase::Active
            || (engine.phase() == Phase::Submitted && !persisted);

        tokio::select! {
            _ = ticker.tick(), if ticking => {
                if engine.phase() == Phase::Active {
                    if let Some(result) = engine.tick() {
                        tracing::info!(session_id = %id, score = result.score, total = result.total, "Time expired, session submitted automatically");
                    }
                }
                if engine.phase() == Phase::Submitted {
                    persist_once(id, &engine, task.results.as_ref(), &mut persisted).await;
                }
            }
            _ = sleep_until(expires_at.unwrap_or_else(Instant::now)), if expires_at.is_some() => {
                task.sessions
                    .lock()
                    .expect("session registry mutex poisoned")
                    .remove(&id);
                tracing::debug!(session_id = %id, "Submitted session expired");
                break;
            }
            command = rx.recv() => {
                let Some(command) = command else {
                    if engine.phase() == Phase::Submitted {
                        persist_once(id, &engine, task.results.as_ref(), &mut persisted).await;
                    }
                    tracing::debug!(session_id = %id, "Session handle dropped, stopping");
                    break;
                };
                match command {
                    SessionCommand::Select { question_index, option_index, reply } => {
                        let outcome = engine
                            .select_option(question_index, option_index)
                            .map(|_| SessionSnapshot::of(id, &engine));
                        let _ = reply.send(outcome);
                    }
                    SessionCommand::Advance { direction, reply } => {
                        let outcome = engine
                            .advance(direction)
                            .map(|_| SessionSnapshot::of(id, &engine));
                        let _ = reply.send(outcome);
                    }
                    SessionCommand::Submit { reply } => {
                        let outcome = engine.submit();
                        if outcome.is_ok() {
                            persist_once(id, &engine, task.results.as_ref(), &mut persisted).await;
                        }
                        let _ = reply.send(outcome);
                    }
                    SessionCommand::Snapshot { reply } => {
                        let _ = reply.send(Ok(SessionSnapshot::of(id, &engine)));
                    }
                }
            }
        }

        if persisted && expires_at.is_none() {
            expires_at = Some(Instant::now() + task.retention);
        }
    }
}

async fn persist_once(
    id: Uuid,
    engine: &SessionEngine,
    results: &dyn ResultStore,
    persisted: &mut bool,
) {
    if *persisted {
        return;
    }
    let Some(result) = engine.result() else {
        return;
    };
    match results.append(result).await {
        Ok(()) => *persisted = true,
        Err(e) => tracing::error!(session_id = %id, error = %e, "Failed to save session result, will retry"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::kv::MemoryKvStore;
    use crate::error::{Error, Result};
    use crate::services::result_service::{KvResultStore, ResultPredicate};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn mcq(text: &str, correct: usize) -> Mcq {
        Mcq::from_json(&json!([text, ["a", "b", "c", "d"], correct])).unwrap()
    }

    fn meta() -> SessionMeta {
        SessionMeta {
            quiz_id: "mock-1".to_string(),
            quiz_name: "Mock Quiz: test".to_string(),
            topic: Some("test".to_string()),
            difficulty: None,
        }
    }

    fn service() -> (SessionService, Arc<KvResultStore>) {
        let store = Arc::new(KvResultStore::new(Arc::new(MemoryKvStore::new())));
        (SessionService::new(store.clone(), 60), store)
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_submits_and_persists_exactly_once() {
        let (service, store) = service();
        let snapshot = service
            .start(vec![mcq("Q1", 0), mcq("Q2", 1)], meta())
            .unwrap();
        assert_eq!(snapshot.remaining_seconds, 120);

        tokio::time::sleep(Duration::from_millis(60_500)).await;
        let mid = service.snapshot(snapshot.id).await.unwrap();
        assert_eq!(mid.phase, Phase::Active);
        assert_eq!(mid.remaining_seconds, 60);

        tokio::time::sleep(Duration::from_secs(61)).await;
        let done = service.snapshot(snapshot.id).await.unwrap();
        assert_eq!(done.phase, Phase::Submitted);
        assert_eq!(done.remaining_seconds, 0);
        let result = done.result.unwrap();
        assert_eq!(result.total, 2);
        assert_eq!(result.score, 0);

        let again = service.submit(snapshot.id).await.unwrap();
        assert_eq!(again, result);
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn explicit_submit_persists_result() {
        let (service, store) = service();
        let id = service.start(vec![mcq("Q1", 3)], meta()).unwrap().id;

        assert_eq!(
            service.submit(id).await.unwrap_err(),
            SessionError::UnansweredQuestions { count: 1 }
        );
        service.select_option(id, 0, 3).await.unwrap();
        let result = service.submit(id).await.unwrap();
        assert_eq!(result.score, 1);

        let stored = store.list_all().await.unwrap();
        assert_eq!(stored, vec![result]);
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_session_is_gone_and_not_persisted() {
        let (service, store) = service();
        let id = service.start(vec![mcq("Q1", 0)], meta()).unwrap().id;
        service.abandon(id).unwrap();

        assert_eq!(service.snapshot(id).await.unwrap_err(), SessionError::NotFound);
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn submitted_sessions_expire_from_the_registry() {
        let (service, store) = service();
        let explicit = service.start(vec![mcq("Q1", 0)], meta()).unwrap().id;
        let timed = service.start(vec![mcq("Q1", 0)], meta()).unwrap().id;
        assert_eq!(service.active_sessions(), 2);

        service.select_option(explicit, 0, 0).await.unwrap();
        service.submit(explicit).await.unwrap();

        tokio::time::sleep(Duration::from_secs(61)).await;
        let done = service.snapshot(timed).await.unwrap();
        assert_eq!(done.phase, Phase::Submitted);
        assert!(service.snapshot(explicit).await.unwrap().result.is_some());

        tokio::time::sleep(SUBMITTED_RETENTION + Duration::from_secs(2)).await;
        assert_eq!(service.active_sessions(), 0);
        assert_eq!(service.snapshot(explicit).await.unwrap_err(), SessionError::NotFound);
        assert_eq!(service.snapshot(timed).await.unwrap_err(), SessionError::NotFound);
        assert_eq!(store.list_all().await.unwrap().len(), 2);
    }

    struct FlakyStore {
        inner: KvResultStore,
        failures_left: AtomicUsize,
    }

    #[async_trait]
    impl ResultStore for FlakyStore {
        async fn append(&self, result: &QuizResult) -> Result<()> {
            if self.failures_left.load(Ordering::SeqCst) > 0 {
                self.failures_left.fetch_sub(1, Ordering::SeqCst);
                return Err(Error::Internal("store unavailable".to_string()));
            }
            self.inner.append(result).await
        }

        async fn list_all(&self) -> Result<Vec<QuizResult>> {
            self.inner.list_all().await
        }

        async fn delete_where(&self, predicate: ResultPredicate<'_>) -> Result<usize> {
            self.inner.delete_where(predicate).await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn failed_save_after_timeout_is_retried() {
        let store = Arc::new(FlakyStore {
            inner: KvResultStore::new(Arc::new(MemoryKvStore::new())),
            failures_left: AtomicUsize::new(2),
        });
        let service = SessionService::new(store.clone(), 60);
        let id = service.start(vec![mcq("Q1", 0)], meta()).unwrap().id;

        tokio::time::sleep(Duration::from_millis(60_500)).await;
        assert_eq!(service.snapshot(id).await.unwrap().phase, Phase::Submitted);
        assert!(store.list_all().await.unwrap().is_empty());

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(store.list_all().await.unwrap().len(), 1);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(store.list_all().await.unwrap().len(), 1);
        assert_eq!(store.failures_left.load(Ordering::SeqCst), 0);
    }
}
