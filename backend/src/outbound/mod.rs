//! Outbound adapters implementing the domain's driven ports.
//!
//! - **memory**: single-lock in-process store, used without a database and
//!   in tests
//! - **persistence**: PostgreSQL repositories using Diesel ORM
//! - **security**: Argon2 password hashing and JWT bearer credentials
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod memory;
pub mod persistence;
pub mod security;
