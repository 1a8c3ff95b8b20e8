pub mod clients;
pub mod commands;
pub mod config;
pub mod error;
pub mod repl;
pub mod session;
