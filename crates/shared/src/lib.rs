//! Shared utilities for the helper admin backend.
//!
//! Used by every other crate in the workspace:
//! - Snowflake id generation
//! - Admin session tokens (HS256 JWT)
//! - Argon2id password hashing
//! - Offset pagination and request validation helpers
//! - Date rendering used by the legacy clients

pub mod datetime;
pub mod jwt;
pub mod pagination;
pub mod password;
pub mod snowflake;
pub mod validation;
