pub mod delete;
pub mod deploy;
