pub mod appointment;
pub mod auth;
pub mod care;
pub mod error;
pub mod user;
pub mod video;
