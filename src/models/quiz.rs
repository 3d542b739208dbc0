use crate::models::generation::Difficulty;
use crate::models::mcq::Mcq;
use crate::models::session::SessionMeta;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    pub id: String,
    pub name: String,
    pub topic: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    pub questions: Vec<Mcq>,
}

impl Quiz {
    pub fn session_meta(&self) -> SessionMeta {
        SessionMeta {
            quiz_id: self.id.clone(),
            quiz_name: self.name.clone(),
            topic: Some(self.topic.clone()),
            difficulty: Some(self.difficulty),
        }
    }
}
