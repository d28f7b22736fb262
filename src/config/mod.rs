mod defaults;
mod env;
mod io;
mod schema;
mod validate;


pub use io::load_config;
pub use schema::{Config, ScheduleSettings, SmtpConfig, StoreConfig};
pub use validate::ConfigError;
