//! The main error enum for the project lives here, and documents the various
//! conditions that can arise while interacting with the system.

use crate::darc::darc::DarcID;
use thiserror::Error;

/// This is our error enum. It contains an entry for any part of the system in
/// which an expectation is not met or a problem occurs.
#[derive(Error, Debug)]
pub enum Error {
    /// An error while engaging in ASN.1 deserialization.
    #[error("ASN.1 deserialization error")]
    ASNDeserialize,

    /// An error while engaging in ASN.1 serialization.
    #[error("ASN.1 serialization error")]
    ASNSerialize,

    /// A byte slice does not have the length a fixed-width value requires.
    #[error("bad length")]
    BadLength,

    /// A tagged value names a cryptographic algorithm we don't know about.
    #[error("cryptographic algorithm mismatch")]
    CryptoAlgoMismatch,

    /// Failed to produce a signature.
    #[error("failed to create a signature")]
    CryptoSignatureFailed,

    /// A signature failed to verify.
    #[error("the given signature/public key/data combo does not verify")]
    CryptoSignatureVerificationFailed,

    /// A signature path names a darc that does not delegate to the next darc
    /// in the path.
    #[error("delegation chain is broken")]
    DarcDelegationBroken,

    /// A darc claims to evolve from a previous version but the evolution
    /// checks (version increment, chain root ID, owner-role signature) do not
    /// hold.
    #[error("darc evolution verification failed")]
    DarcEvolutionInvalid,

    /// A darc referenced by ID could not be resolved.
    #[error("darc {0} could not be resolved")]
    DarcNotFound(DarcID),

    /// An evolved darc's version does not follow its predecessor's.
    #[error("darc version transition is invalid")]
    DarcTransitionInvalid,

    /// An error while decoding base64.
    #[error("base64 decoding error")]
    DeserializeBase64(#[from] base64::DecodeError),

    /// The identity at the end of a signature path is not in the darc
    /// audience the path claims.
    #[error("identity is not authorized by the terminal darc")]
    IdentityNotAuthorized,

    /// An error while engaging in yaml serialization.
    #[error("yaml serialization error")]
    SerializeYaml(#[from] serde_yaml::Error),

    /// We're trying to verify a signature on a value, but it's missing.
    #[error("signature missing on a value")]
    SignatureMissing,

    /// A signature path does not start at the darc it is being verified
    /// against.
    #[error("signature path does not match the given darc")]
    SignaturePathMismatch,

    /// The terminal identity of a signature path is a darc reference, which
    /// cannot act as a verification key.
    #[error("terminal identity cannot verify a signature")]
    TerminalIdentityInvalid,
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        // serde_yaml's error type is not comparable, so neither are we. Debug
        // output is stable enough for the equality our tests need.
        format!("{:?}", self) == format!("{:?}", other)
    }
}

/// Wraps `std::result::Result` around our `Error` enum
pub type Result<T> = std::result::Result<T, Error>;
