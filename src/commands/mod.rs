pub mod app_command;
pub mod domain_command;
pub mod site_command;
pub mod whoami;
