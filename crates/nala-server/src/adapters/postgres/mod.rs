//! PostgreSQL Adapters

mod user_config_repository;

pub use user_config_repository::PgUserConfigRepository;
