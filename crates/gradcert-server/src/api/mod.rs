pub mod auth;
pub mod certificates;
pub mod courses;
pub mod health;
pub mod students;
