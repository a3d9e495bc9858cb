pub mod accounts;
pub mod applications;
pub mod courses;
pub mod job_listings;
pub mod messages;
pub mod posts;
pub mod programs;
pub mod settings;
