pub mod admin;
pub mod app;
pub mod error;
pub mod health;
pub mod login;
pub mod security;
pub mod tags;
