pub mod configs;
pub mod departments;
pub mod health;
pub mod roles;
