use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

#[derive(Debug, Clone)]
pub struct MockUser {
    pub username: &'static str,
    pub password: &'static str,
    pub role: Role,
    pub name: &'static str,
}

pub const MOCK_USERS: &[MockUser] = &[
    MockUser {
        username: "admin",
        password: "admin123",
        role: Role::Admin,
        name: "Administrator",
    },
    MockUser {
        username: "user",
        password: "user123",
        role: Role::User,
        name: "Regular User",
    },
];
