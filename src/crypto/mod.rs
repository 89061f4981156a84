//! The crypto module wraps the cryptographic primitives the darc system is
//! built on: hashing for content addressing and public-key signatures for
//! authorization proofs.

pub mod base;
