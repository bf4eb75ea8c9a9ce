pub mod job;
pub mod text;
pub mod vocabulary;

pub use job::{ExperienceLevel, JobDocument, JobSource, WorkType};
