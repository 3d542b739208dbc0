pub mod generation;
pub mod mcq;
pub mod quiz;
pub mod quiz_result;
pub mod session;
pub mod user;
