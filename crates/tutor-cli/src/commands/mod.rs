pub mod chat;
pub mod courses;
