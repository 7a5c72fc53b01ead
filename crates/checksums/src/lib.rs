//! Checksum primitives shared by the signature, matching and transfer crates.
//!
//! Two checksums drive block matching over the wire:
//!
//! - [`RollingChecksum`], a fast, incrementally updatable weak checksum used
//!   to slide a window over the sender's file and reject non-matching
//!   offsets in O(1) per byte.
//! - [`strong`], the cryptographic confirmation checksum (MD4) run over a
//!   candidate window once the rolling checksum hits, and over whole files
//!   for end-to-end verification.
//!
//! Both checksums are seeded with the session's 32-bit checksum seed so that
//! two peers negotiating independently still agree on the same digests.

pub mod rolling;
pub mod strong;

pub use rolling::{hash_fast, RollingChecksum};
pub use strong::{hash_file, hash_slow, FileDigest, Seed};
