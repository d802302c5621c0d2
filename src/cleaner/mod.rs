pub mod clean_content_job;

pub use clean_content_job::CleanContentJob;

pub const JOB_TYPE: &str = "clean";
