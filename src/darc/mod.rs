//! The darc module defines the data types and operations that make up a
//! Decentralized Access Rights Control document.
//!
//! A darc names owners (who may evolve it) and users (who may exercise it),
//! identifies itself by a hash of its canonical serialization, and can
//! delegate either audience to other darcs by reference. The pieces:
//!
//! - [Identity]: a verifiable principal, either a raw public key or a
//!   reference to another darc.
//! - [Signer]: the private signing capability behind a key identity.
//! - [Darc]: the document itself, with its content ID and evolution
//!   protocol.
//! - [SignaturePath]/[DarcSignature]: a delegation route through the darc
//!   graph and a signature bound to it.

pub mod darc;
pub mod identity;
pub mod signature;

pub use darc::*;
pub use identity::*;
pub use signature::*;
