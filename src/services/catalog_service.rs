use crate::database::kv::KvStore;
use crate::error::{Error, Result};
use crate::models::quiz::Quiz;
use std::sync::Arc;
use tokio::sync::Mutex;

pub const QUIZZES_KEY: &str = "quizzes";

/// Named quizzes that sessions can be started from.
#[derive(Clone)]
pub struct CatalogService {
    kv: Arc<dyn KvStore>,
    write_lock: Arc<Mutex<()>>,
}

impl CatalogService {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self {
            kv,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub async fn list(&self) -> Result<Vec<Quiz>> {
        match self.kv.get(QUIZZES_KEY).await? {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(Vec::new()),
        }
    }

    pub async fn get(&self, id: &str) -> Result<Quiz> {
        self.list()
            .await?
            .into_iter()
            .find(|q| q.id == id)
            .ok_or_else(|| Error::NotFound(format!("Quiz {} not found", id)))
    }

    /// Inserts the quiz, or replaces the one with the same id.
    pub async fn save(&self, quiz: Quiz) -> Result<Quiz> {
        let _guard = self.write_lock.lock().await;
        let mut quizzes = self.list().await?;
        match quizzes.iter_mut().find(|q| q.id == quiz.id) {
            Some(existing) => *existing = quiz.clone(),
            None => quizzes.push(quiz.clone()),
        }
        self.kv
            .set(QUIZZES_KEY, serde_json::to_value(&quizzes)?)
            .await?;
        tracing::info!(quiz_id = %quiz.id, questions = quiz.questions.len(), "Quiz saved");
        Ok(quiz)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut quizzes = self.list().await?;
        let before = quizzes.len();
        quizzes.retain(|q| q.id != id);
        if quizzes.len() == before {
            return Err(Error::NotFound(format!("Quiz {} not found", id)));
        }
        self.kv
            .set(QUIZZES_KEY, serde_json::to_value(&quizzes)?)
            .await
    }
}
