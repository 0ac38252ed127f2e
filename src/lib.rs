pub mod app;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod tmdb;
