pub mod extraction_service;
pub mod ics_service;
pub mod openai_service;
