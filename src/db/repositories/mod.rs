pub mod account;
pub mod course;
pub mod inbox;
pub mod job;
pub mod post;
pub mod program;
pub mod settings;
