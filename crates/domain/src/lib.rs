//! Domain layer for the helper admin service.
//!
//! This crate contains:
//! - Content models (banners, announcements, changelogs, versions, configs, terms)
//! - Admin account models
//! - The content status lifecycle and partial-update types
//! - The public config payload builder

pub mod models;
pub mod services;
