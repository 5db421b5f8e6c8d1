//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the repository ports backed by PostgreSQL via
//! `diesel-async` with `bb8` pooling.
//!
//! - **Thin adapters**: repositories only translate between rows and domain
//!   types. No business logic resides here.
//! - **Internal models**: row structs (`models.rs`) and the schema
//!   (`schema.rs`) never reach the domain layer.
//! - **Typed errors**: every driver failure becomes a port error variant.
//!
//! # Example
//!
//! ```ignore
//! use catalog_backend::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/catalog")).await?;
//! let users = DieselUserRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_enrollment_repository;
mod diesel_helpers;
mod diesel_program_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_enrollment_repository::DieselEnrollmentRepository;
pub use diesel_program_repository::DieselProgramRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
