//! Identities and signers.
//!
//! An [Identity] is the public face of a principal: something a darc can list
//! in its owners or users and a verifier can check a signature against. A
//! [Signer] is the private counterpart, and the only thing in the system
//! capable of producing signatures. The two are linked by `Signer::identity`,
//! never by shared storage: identities are plain values, and two identities
//! are equal whenever their variant and payload are, no matter which signer
//! produced them.

use crate::{
    crypto::base::{SignKeypair, SignKeypairPublic, SignKeypairSignature},
    darc::darc::DarcID,
    error::Result,
    util::ser::SerdeBinary,
};
use rand::{CryptoRng, RngCore};
use rasn::{AsnType, Decode, Encode};
use serde_derive::{Deserialize, Serialize};

/// A verifiable principal: either a raw public key, or a reference to another
/// darc (by content ID), which delegates to whatever principals that darc
/// authorizes.
///
/// Verification matches exhaustively on the variant: only a [Key][Self::Key]
/// can terminate a delegation chain, while a [Darc][Self::Darc] extends it.
#[derive(Debug, Clone, PartialEq, AsnType, Encode, Decode, Serialize, Deserialize)]
#[rasn(choice)]
pub enum Identity {
    /// A signing public key.
    #[rasn(tag(explicit(0)))]
    Key(SignKeypairPublic),
    /// A reference to another darc's identity.
    #[rasn(tag(explicit(1)))]
    Darc(DarcID),
}

impl From<SignKeypairPublic> for Identity {
    fn from(pubkey: SignKeypairPublic) -> Self {
        Self::Key(pubkey)
    }
}

impl From<DarcID> for Identity {
    fn from(id: DarcID) -> Self {
        Self::Darc(id)
    }
}

impl SerdeBinary for Identity {}

/// The holder of a private signing capability, paired with the [Identity] it
/// proves.
///
/// A signer owns its key material exclusively and is never serialized; darcs
/// only ever carry the public identity.
#[derive(Debug, Clone)]
pub enum Signer {
    /// An ed25519 signing keypair.
    Ed25519(SignKeypair),
}

impl Signer {
    /// Create a new ed25519 signer.
    pub fn new_ed25519<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Self::Ed25519(SignKeypair::new_ed25519(rng))
    }

    /// Create a new ed25519 signer from a cryptographic seed.
    pub fn new_ed25519_from_seed(seed: [u8; 32]) -> Self {
        Self::Ed25519(SignKeypair::new_ed25519_from_seed(seed))
    }

    /// The public identity this signer can prove.
    pub fn identity(&self) -> Identity {
        match self {
            Self::Ed25519(keypair) => Identity::Key(keypair.clone().into()),
        }
    }

    /// Sign a message.
    pub fn sign(&self, message: &[u8]) -> Result<SignKeypairSignature> {
        match self {
            Self::Ed25519(keypair) => keypair.sign(message),
        }
    }
}
