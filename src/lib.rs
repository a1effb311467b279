pub mod account;
pub mod api;
pub mod app;
pub mod articles;
pub mod cli;
pub mod config;
pub mod logging;
pub mod mvi;
pub mod store;
pub mod validation;
