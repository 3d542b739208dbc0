pub mod ai_service;
pub mod auth_service;
pub mod catalog_service;
pub mod extract_service;
pub mod generation_service;
pub mod grading_service;
pub mod reference_service;
pub mod result_service;
pub mod session_engine;
pub mod session_service;
pub mod validation_service;
