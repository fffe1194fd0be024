pub mod api;
pub mod catalog;
pub mod config;
pub mod dashboard;
pub mod dto;
pub mod error;
pub mod form;
pub mod middleware;
pub mod models;
pub mod normalize;
pub mod response;
pub mod routes;
pub mod search;
pub mod services;
pub mod state;
pub mod upload;
