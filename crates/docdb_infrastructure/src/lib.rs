pub mod database_connection;
pub mod services;
pub mod settings;
