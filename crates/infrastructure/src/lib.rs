//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod in_memory_audit_log_repository;
mod in_memory_ban_request_repository;
mod in_memory_staff_account_repository;
mod postgres_audit_log_repository;
mod postgres_ban_request_repository;
mod postgres_staff_account_repository;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use in_memory_audit_log_repository::InMemoryAuditLogRepository;
pub use in_memory_ban_request_repository::InMemoryBanRequestRepository;
pub use in_memory_staff_account_repository::InMemoryStaffAccountRepository;
pub use postgres_audit_log_repository::PostgresAuditLogRepository;
pub use postgres_ban_request_repository::PostgresBanRequestRepository;
pub use postgres_staff_account_repository::PostgresStaffAccountRepository;

/// Embedded schema migrations for every PostgreSQL adapter in this crate.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
