//! The darc document itself: a versioned, content-addressed record of who
//! owns a resource and who may use it.
//!
//! A [Darc] has an [ID][DarcID] computed from a hash of the canonical
//! serialization of its content (owners, users, description, version). The
//! ID is recomputed on every call, so mutation immediately invalidates any
//! previously-derived ID. `base_id` and `signature` are evolution metadata:
//! they describe how this version relates to its predecessors and are
//! excluded from the content hash.
//!
//! Evolution produces a *new* document at version N+1 whose signature covers
//! its own content ID, signed along a path rooted at version N. The
//! predecessor stays valid and untouched; there is no in-place history
//! rewriting.

use crate::{
    crypto::base::Hash,
    darc::{
        identity::{Identity, Signer},
        signature::{DarcSignature, Role, SignaturePath},
    },
    error::{Error, Result},
    util::ser::{self, BinaryVec, SerdeBinary},
};
use rasn::{AsnType, Decode, Encode};
use serde_derive::{Deserialize, Serialize};
use std::hash::{Hash as StdHash, Hasher};
use std::ops::Deref;

/// A darc's content ID: a [Hash] of the canonical serialization of the
/// darc's owners, users, description, and version.
#[derive(Debug, Clone, PartialEq, AsnType, Encode, Decode, Serialize, Deserialize)]
#[rasn(delegate)]
pub struct DarcID(Hash);

impl From<Hash> for DarcID {
    fn from(hash: Hash) -> Self {
        Self(hash)
    }
}

impl Deref for DarcID {
    type Target = Hash;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<&DarcID> for String {
    type Error = Error;

    fn try_from(id: &DarcID) -> std::result::Result<Self, Self::Error> {
        String::try_from(id.deref())
    }
}

impl TryFrom<&str> for DarcID {
    type Error = Error;

    fn try_from(string: &str) -> std::result::Result<Self, Self::Error> {
        Ok(DarcID::from(Hash::try_from(string)?))
    }
}

impl StdHash for DarcID {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.deref().as_bytes().hash(state);
    }
}

impl Eq for DarcID {}

impl std::fmt::Display for DarcID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.deref())
    }
}

impl std::cmp::PartialOrd for DarcID {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl std::cmp::Ord for DarcID {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.deref().as_bytes().cmp(other.deref().as_bytes())
    }
}

impl SerdeBinary for DarcID {}

#[cfg(test)]
impl DarcID {
    pub(crate) fn random() -> Self {
        Self(Hash::random_blake3())
    }
}

/// The hashed content of a darc. Evolution metadata (base ID, signature) is
/// deliberately absent: two darcs with identical content carry identical IDs
/// no matter how they got there.
#[derive(Debug, Clone, AsnType, Encode, Decode, Serialize, Deserialize)]
pub(crate) struct DarcEntry {
    #[rasn(tag(explicit(0)))]
    owners: Vec<Identity>,
    #[rasn(tag(explicit(1)))]
    users: Vec<Identity>,
    #[rasn(tag(explicit(2)))]
    description: Option<BinaryVec>,
    #[rasn(tag(explicit(3)))]
    version: u64,
}

/// A Decentralized Access Rights Control document.
///
/// Owners may evolve the document; users may exercise the rights it grants.
/// Either audience can contain [darc references][Identity::Darc], delegating
/// that audience to another document. Cloning a darc yields a fully
/// independent value.
#[derive(Debug, Clone, PartialEq, AsnType, Encode, Decode, Serialize, Deserialize, getset::Getters, getset::MutGetters, getset::Setters)]
#[getset(get = "pub", get_mut = "pub(crate)", set = "pub(crate)")]
pub struct Darc {
    /// The identities allowed to evolve this document.
    #[rasn(tag(explicit(0)))]
    owners: Vec<Identity>,
    /// The identities allowed to exercise this document's rights.
    #[rasn(tag(explicit(1)))]
    users: Vec<Identity>,
    /// Free-form description bytes.
    #[rasn(tag(explicit(2)))]
    description: Option<BinaryVec>,
    /// The version of this document within its evolution chain. Starts at 0.
    #[rasn(tag(explicit(3)))]
    version: u64,
    /// The ID of version 0 of this evolution chain. `None` only at version 0.
    #[rasn(tag(explicit(4)))]
    base_id: Option<DarcID>,
    /// Proof that this version legitimately evolved from its predecessor.
    #[rasn(tag(explicit(5)))]
    signature: Option<DarcSignature>,
}

impl Darc {
    /// Create a new darc at version 0.
    pub fn new(owners: Vec<Identity>, users: Vec<Identity>, description: Option<BinaryVec>) -> Self {
        Self {
            owners,
            users,
            description,
            version: 0,
            base_id: None,
            signature: None,
        }
    }

    fn entry(&self) -> DarcEntry {
        DarcEntry {
            owners: self.owners.clone(),
            users: self.users.clone(),
            description: self.description.clone(),
            version: self.version,
        }
    }

    /// Compute this darc's content ID.
    ///
    /// The ID is recomputed from the current content on every call and never
    /// cached: any mutation to owners, users, description, or version yields
    /// a different ID, which is what invalidates signatures produced over an
    /// older snapshot.
    pub fn id(&self) -> Result<DarcID> {
        let serialized = ser::serialize(&self.entry())?;
        Ok(DarcID::from(Hash::new_blake3(&serialized)?))
    }

    /// The ID of version 0 of this darc's evolution chain: `base_id` if this
    /// darc has evolved, otherwise its own ID.
    pub fn chain_root_id(&self) -> Result<DarcID> {
        match self.base_id() {
            Some(id) => Ok(id.clone()),
            None => self.id(),
        }
    }

    /// The audience list the given role selects.
    pub fn audience(&self, role: &Role) -> &[Identity] {
        match role {
            Role::Owner => &self.owners,
            Role::User => &self.users,
        }
    }

    /// Append an identity to the owners.
    pub fn add_owner(&mut self, identity: Identity) {
        self.owners.push(identity);
    }

    /// Append an identity to the users.
    pub fn add_user(&mut self, identity: Identity) {
        self.users.push(identity);
    }

    /// Remove the first owner equal to the given identity. Removing an
    /// identity that isn't present is a no-op, and the owners list is allowed
    /// to end up empty (an owner-less darc just can't evolve any further).
    pub fn remove_owner(&mut self, identity: &Identity) {
        remove_identity(&mut self.owners, identity);
    }

    /// Remove the first user equal to the given identity. Removing an
    /// identity that isn't present is a no-op.
    pub fn remove_user(&mut self, identity: &Identity) {
        remove_identity(&mut self.users, identity);
    }

    /// Bump the version. Leaves `base_id`/`signature` alone; those are set by
    /// [set_evolution][Self::set_evolution].
    pub fn increment_version(&mut self) {
        self.version += 1;
    }

    /// Mark this darc as the successor of `previous`, signing its content ID
    /// with the given signer.
    ///
    /// The version must already have been incremented to exactly one past
    /// `previous`. If no path is given, a single-hop owner path rooted at
    /// `previous` is synthesized. The signature covers this darc's own
    /// content ID, so any later mutation unbinds it.
    ///
    /// Whether the signer is actually authorized is NOT checked here; signing
    /// is cheap and local, while authorization may require resolving other
    /// darcs. [verify_evolution_from][Self::verify_evolution_from] does the
    /// expensive half.
    pub fn set_evolution(&mut self, previous: &Darc, path: Option<SignaturePath>, signer: &Signer) -> Result<()> {
        if self.version != previous.version + 1 {
            Err(Error::DarcTransitionInvalid)?;
        }
        let base_id = previous.chain_root_id()?;
        let path = match path {
            Some(path) => path,
            None => SignaturePath::new(vec![previous.id()?], signer.identity(), Role::Owner),
        };
        let message = ser::serialize(self.id()?.deref())?;
        let signature = DarcSignature::new(&message, path, signer)?;
        self.base_id = Some(base_id);
        self.signature = Some(signature);
        Ok(())
    }

    /// Check that this darc is a legitimate successor of `previous`.
    ///
    /// A `None` previous always succeeds: a version-0 document needs no
    /// evolution proof. Otherwise the version must follow the predecessor's,
    /// the base ID must name the chain root, and the stored signature must
    /// verify -- over this darc's *current* content ID, through an owner-role
    /// path rooted at `previous`. Because the signature was bound to the
    /// exact content present at signing time, any mutation since then makes
    /// this fail.
    pub fn verify_evolution_from(&self, previous: Option<&Darc>) -> Result<()> {
        match previous {
            Some(previous) => self.verify_evolution_from_with(previous, |_| None),
            None => Ok(()),
        }
    }

    /// Like [verify_evolution_from][Self::verify_evolution_from], but with a
    /// caller-supplied lookup so the evolution path may run through owner
    /// entries that are themselves darc references.
    pub fn verify_evolution_from_with<F>(&self, previous: &Darc, lookup: F) -> Result<()>
    where
        F: Fn(&DarcID) -> Option<Darc>,
    {
        if self.version != previous.version + 1 {
            Err(Error::DarcEvolutionInvalid)?;
        }
        if self.base_id.as_ref() != Some(&previous.chain_root_id()?) {
            Err(Error::DarcEvolutionInvalid)?;
        }
        let signature = self.signature.as_ref().ok_or(Error::SignatureMissing)?;
        if signature.path().role() != &Role::Owner {
            Err(Error::DarcEvolutionInvalid)?;
        }
        let message = ser::serialize(self.id()?.deref())?;
        signature.verify(&message, previous, lookup)
    }

    /// Serialize this darc into a human readable format.
    pub fn serialize_human(&self) -> Result<String> {
        ser::serialize_human(self)
    }

    /// Deserialize a darc from its human readable format.
    pub fn deserialize_human(slice: &[u8]) -> Result<Self> {
        ser::deserialize_human(slice)
    }
}

impl SerdeBinary for Darc {}

fn remove_identity(list: &mut Vec<Identity>, identity: &Identity) {
    if let Some(idx) = list.iter().position(|entry| entry == identity) {
        list.remove(idx);
    }
}
