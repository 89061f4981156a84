//! Welcome to the darc core, a reference implementation of Decentralized
//! Access Rights Control documents.
//!
//! A darc is a versioned, content-addressed authorization document. It names
//! two audiences: *owners*, who may evolve the document into new versions,
//! and *users*, who may exercise the rights the document grants. Every darc
//! has an ID derived from a hash of its canonical serialization, so two
//! logically-identical documents always agree on their identity no matter
//! where they were built.
//!
//! The interesting parts of the system are:
//!
//! 1. Content addressing. A darc's ID covers its owners, users, description,
//! and version. It is recomputed on demand, never cached, so any mutation
//! immediately invalidates previously-derived IDs.
//! 1. Evolution. An owner can produce a new version of a darc that carries a
//! signature proving it legitimately descends from its predecessor. The
//! signature covers the new document's own content ID, binding it to the
//! exact content present at signing time: touch a single field afterward and
//! verification fails.
//! 1. Delegation. An identity inside a darc can be a reference to *another*
//! darc rather than a raw public key. A signature then carries the path of
//! darc IDs it traveled, and verification walks that path against live darc
//! state, resolving each hop through a caller-supplied lookup, before
//! checking the terminal key's signature.
//!
//! The crate is a pure computation library. It consumes a signing capability
//! ([Signer][darc::Signer]) and a resolution capability (any
//! `Fn(&DarcID) -> Option<Darc>`), and it defines one wire format: the
//! canonical ASN.1 DER encoding used for hashing, signing, and storage.
//! Transport, persistence, and key management live elsewhere.

pub mod error;
pub mod util;
pub mod crypto;
pub mod darc;
