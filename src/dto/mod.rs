pub mod auth_dto;
pub mod generation_dto;
pub mod quiz_dto;
pub mod session_dto;
