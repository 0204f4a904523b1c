pub mod api;
pub mod app;
pub mod auth;
pub mod dto;
pub mod error;
pub mod models;
pub mod repositories;
pub mod telemetry;
pub mod usecases;
