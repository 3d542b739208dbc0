use crate::database::kv::KvStore;
use crate::error::Result;
use crate::models::quiz_result::{QuizResult, ResultKey};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

pub const RESULTS_KEY: &str = "testResults";

pub type ResultPredicate<'a> = &'a (dyn Fn(&QuizResult) -> bool + Send + Sync);

/// Append-only history of completed sessions.
#[async_trait]
pub trait ResultStore: Send + Sync {
    async fn append(&self, result: &QuizResult) -> Result<()>;

    async fn list_all(&self) -> Result<Vec<QuizResult>>;

    /// Removes every result matching `predicate`, returning how many were removed.
    async fn delete_where(&self, predicate: ResultPredicate<'_>) -> Result<usize>;

    async fn delete_by_key(&self, key: &ResultKey) -> Result<usize> {
        self.delete_where(&|result: &QuizResult| key.matches(result))
            .await
    }
}

/// Keeps the whole history as one JSON array under [`RESULTS_KEY`].
#[derive(Clone)]
pub struct KvResultStore {
    kv: Arc<dyn KvStore>,
    write_lock: Arc<Mutex<()>>,
}

impl KvResultStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self {
            kv,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    async fn load(&self) -> Result<Vec<QuizResult>> {
        match self.kv.get(RESULTS_KEY).await? {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(Vec::new()),
        }
    }

    async fn store(&self, results: &[QuizResult]) -> Result<()> {
        self.kv.set(RESULTS_KEY, serde_json::to_value(results)?).await
    }
}

#[async_trait]
impl ResultStore for KvResultStore {
    async fn append(&self, result: &QuizResult) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut results = self.load().await?;
        results.push(result.clone());
        self.store(&results).await?;
        tracing::info!(quiz_id = %result.quiz_id, score = result.score, total = result.total, "Result saved");
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<QuizResult>> {
        self.load().await
    }

    async fn delete_where(&self, predicate: ResultPredicate<'_>) -> Result<usize> {
        let _guard = self.write_lock.lock().await;
        let results = self.load().await?;
        let before = results.len();
        let kept: Vec<QuizResult> = results.into_iter().filter(|r| !predicate(r)).collect();
        let removed = before - kept.len();
        if removed > 0 {
            self.store(&kept).await?;
        }
        Ok(removed)
    }
}
