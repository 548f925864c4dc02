pub mod auth_settings;
