pub mod api_client;
pub mod cli;
pub mod commands;
pub mod config;
pub mod errors;
pub mod format;
pub mod models;
pub mod paths;

#[cfg(test)]
mod tests;
