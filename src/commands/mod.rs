pub mod app_command;
pub mod lookup;
pub mod submit;

pub use app_command::AppCommand;
