pub mod document;
pub mod job;
pub mod resume;
pub mod user;
