pub mod api;
pub mod comments;
pub mod config;
pub mod credentials;
pub mod db;
pub mod error;
pub mod tank;
pub mod users;
