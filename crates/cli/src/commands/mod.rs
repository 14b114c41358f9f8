pub mod config;
pub mod emails;
pub mod inbox;
pub mod pension;
pub mod settings;

pub use config::ConfigCommand;
pub use emails::EmailsCommand;
pub use pension::PensionCommand;
pub use settings::SettingsCommand;
