//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Hashing utilities (SHA-256, uppercase hex digests)
//! - Bearer token verification (HS256 JWT)
//! - Blob storage abstraction with a local filesystem backend

pub mod blob;
pub mod crypto;
pub mod token;
