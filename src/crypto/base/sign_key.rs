use crate::{
    error::{Error, Result},
    util::ser::{Binary, BinarySecret, SerdeBinary},
};
use rand::{CryptoRng, RngCore};
use rasn::{AsnType, Decode, Encode};
use serde_derive::{Deserialize, Serialize};
use std::ops::Deref;

/// A signature derived from a signing keypair.
#[derive(Debug, Clone, PartialEq, AsnType, Encode, Decode, Serialize, Deserialize)]
#[rasn(choice)]
pub enum SignKeypairSignature {
    #[rasn(tag(explicit(0)))]
    Ed25519(Binary<64>),
}

impl AsRef<[u8]> for SignKeypairSignature {
    fn as_ref(&self) -> &[u8] {
        match self {
            Self::Ed25519(sig) => sig.as_ref(),
        }
    }
}

/// An asymmetric signing keypair.
///
/// The secret half is held in a [BinarySecret] that wipes itself on drop, and
/// the keypair as a whole has no serialization impls: signing keys live and
/// die inside the process that generated them. Only [SignKeypairPublic] and
/// [SignKeypairSignature] travel.
#[derive(Debug, Clone)]
pub enum SignKeypair {
    /// Ed25519 signing keypair
    Ed25519 {
        public: Binary<32>,
        secret: BinarySecret<32>,
    },
}

impl SignKeypair {
    fn new_ed25519_from_secret(secret: ed25519_consensus::SigningKey) -> Self {
        let public = secret.verification_key();
        Self::Ed25519 {
            public: Binary::new(public.to_bytes()),
            secret: BinarySecret::new(secret.to_bytes()),
        }
    }

    /// Create a new ed25519 keypair
    pub fn new_ed25519<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut randbuf = [0u8; 32];
        rng.fill_bytes(&mut randbuf);
        Self::new_ed25519_from_secret(ed25519_consensus::SigningKey::from(randbuf))
    }

    /// Create a new ed25519 keypair from a cryptographic seed
    pub fn new_ed25519_from_seed(seed: [u8; 32]) -> Self {
        Self::new_ed25519_from_secret(ed25519_consensus::SigningKey::from(seed))
    }

    /// Sign a message, returning a detached signature.
    pub fn sign(&self, message: &[u8]) -> Result<SignKeypairSignature> {
        match self {
            Self::Ed25519 { secret, .. } => {
                let seckey = ed25519_consensus::SigningKey::from(*secret.expose_secret());
                let sig = seckey.sign(message);
                Ok(SignKeypairSignature::Ed25519(Binary::new(sig.to_bytes())))
            }
        }
    }

    /// Verify a message with a detached signature against this keypair's
    /// public half.
    pub fn verify(&self, signature: &SignKeypairSignature, message: &[u8]) -> Result<()> {
        SignKeypairPublic::from(self.clone()).verify(signature, message)
    }
}

impl PartialEq for SignKeypair {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Ed25519 { public: public1, .. }, Self::Ed25519 { public: public2, .. }) => public1 == public2,
        }
    }
}

/// An asymmetric signing public key.
#[derive(Debug, Clone, PartialEq, AsnType, Encode, Decode, Serialize, Deserialize)]
#[rasn(choice)]
pub enum SignKeypairPublic {
    /// Ed25519 signing public key
    #[rasn(tag(explicit(0)))]
    Ed25519(Binary<32>),
}

impl SignKeypairPublic {
    /// Verify a value with a detached signature given the public key of the
    /// signer.
    pub fn verify(&self, signature: &SignKeypairSignature, message: &[u8]) -> Result<()> {
        match (self, signature) {
            (Self::Ed25519(pubkey_bytes), SignKeypairSignature::Ed25519(sig_bytes)) => {
                let pubkey = ed25519_consensus::VerificationKey::try_from(*pubkey_bytes.deref())
                    .map_err(|_| Error::CryptoSignatureVerificationFailed)?;
                let sig_arr: [u8; 64] = *sig_bytes.deref();
                let sig = ed25519_consensus::Signature::from(sig_arr);
                pubkey.verify(&sig, message).map_err(|_| Error::CryptoSignatureVerificationFailed)?;
                Ok(())
            }
        }
    }
}

impl From<SignKeypair> for SignKeypairPublic {
    fn from(kp: SignKeypair) -> Self {
        match kp {
            SignKeypair::Ed25519 { public, .. } => Self::Ed25519(public),
        }
    }
}

impl SerdeBinary for SignKeypairPublic {}
impl SerdeBinary for SignKeypairSignature {}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    #[test]
    fn signkeypair_ed25519_sign_verify() {
        let mut rng = crate::util::test::rng();
        let our_keypair = SignKeypair::new_ed25519(&mut rng);

        let msg_real =
            String::from("the old man leaned back in his chair, his face weathered by the ceaseless march of time, pondering his...");
        let msg_fake = String::from(
            "the old man leaned back in his chair, his face weathered by the ceaseless march of NATUREFRESH MILK, pondering his...",
        );
        let sig = our_keypair.sign(msg_real.as_bytes()).unwrap();
        let verify_real = our_keypair.verify(&sig, msg_real.as_bytes());
        let verify_fake = our_keypair.verify(&sig, msg_fake.as_bytes());
        assert_eq!(verify_real, Ok(()));
        assert_eq!(verify_fake, Err(Error::CryptoSignatureVerificationFailed));
    }

    #[test]
    fn signkeypair_ed25519_seed_deterministic() {
        let seed = [
            233, 229, 76, 13, 231, 38, 253, 27, 53, 2, 235, 174, 151, 186, 192, 33, 16, 2, 57, 32, 170, 23, 13, 47, 44, 234, 231, 35, 38,
            107, 93, 198,
        ];
        let keypair1 = SignKeypair::new_ed25519_from_seed(seed);
        let keypair2 = SignKeypair::new_ed25519_from_seed(seed);
        assert_eq!(keypair1, keypair2);

        let msg = b"get a job";
        let sig1 = keypair1.sign(&msg[..]).unwrap();
        let sig2 = keypair2.sign(&msg[..]).unwrap();
        assert_eq!(sig1, sig2);
        assert_eq!(SignKeypairPublic::from(keypair1).verify(&sig2, &msg[..]), Ok(()));
    }

    #[test]
    fn signkeypair_ed25519_eq() {
        let mut rng = crate::util::test::rng();
        let keypair1 = SignKeypair::new_ed25519(&mut rng);
        let keypair2 = keypair1.clone();
        assert_eq!(keypair1, keypair2);
        let keypair3 = SignKeypair::new_ed25519(&mut rng);
        assert!(keypair1 != keypair3);
    }

    #[test]
    fn signkeypair_public_verifies_without_secret() {
        let mut rng = crate::util::test::rng();
        let keypair = SignKeypair::new_ed25519(&mut rng);
        let public = SignKeypairPublic::from(keypair.clone());
        let sig = keypair.sign(&b"document"[..]).unwrap();
        assert_eq!(public.verify(&sig, &b"document"[..]), Ok(()));
        assert_eq!(public.verify(&sig, &b"documont"[..]), Err(Error::CryptoSignatureVerificationFailed));
    }
}
