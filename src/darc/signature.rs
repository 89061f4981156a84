//! Signature paths and darc signatures: the portable proof that some
//! principal, possibly several delegation hops removed, is authorized by a
//! darc.
//!
//! A [SignaturePath] records the route a signature claims: the chain of darc
//! IDs it traveled (root first) and the identity/role pair at the end. A
//! [DarcSignature] binds raw signature bytes to that path. Verification is
//! where the work happens: the path is walked against *live* darc state,
//! resolving each hop through a caller-supplied lookup, because membership
//! can change after a signature is produced. Nothing about the walk is
//! cached in the signature itself.

use crate::{
    crypto::base::SignKeypairSignature,
    darc::{
        darc::{Darc, DarcID},
        identity::{Identity, Signer},
    },
    error::{Error, Result},
    util::ser::SerdeBinary,
};
use rasn::{AsnType, Decode, Encode};
use serde_derive::{Deserialize, Serialize};

/// Which audience of a darc a signature claims to exercise.
#[derive(Debug, Clone, PartialEq, AsnType, Encode, Decode, Serialize, Deserialize)]
#[rasn(choice)]
pub enum Role {
    /// The signature exercises the right to evolve the darc.
    #[rasn(tag(explicit(0)))]
    Owner,
    /// The signature exercises the rights the darc grants.
    #[rasn(tag(explicit(1)))]
    User,
}

/// An ordered delegation route through the darc graph: the chain of darc IDs
/// (root first, terminal last), the leaf identity exercising the path, and
/// the role it claims on the terminal darc.
///
/// Construction stores the chain exactly as given. Nothing is validated
/// here; reachability is checked at verification time against whatever the
/// darcs look like *then*, which may differ from when the path was built.
#[derive(Debug, Clone, PartialEq, AsnType, Encode, Decode, Serialize, Deserialize, getset::Getters)]
#[getset(get = "pub")]
pub struct SignaturePath {
    /// The chain of darc IDs, delegation source first.
    #[rasn(tag(explicit(0)))]
    darcs: Vec<DarcID>,
    /// The principal exercising this path.
    #[rasn(tag(explicit(1)))]
    identity: Identity,
    /// The audience the principal claims membership of on the terminal darc.
    #[rasn(tag(explicit(2)))]
    role: Role,
}

impl SignaturePath {
    /// Create a new signature path.
    pub fn new(darcs: Vec<DarcID>, identity: Identity, role: Role) -> Self {
        Self { darcs, identity, role }
    }
}

impl SerdeBinary for SignaturePath {}

/// A raw cryptographic signature bound to the [SignaturePath] it was
/// produced under.
#[derive(Debug, Clone, PartialEq, AsnType, Encode, Decode, Serialize, Deserialize, getset::Getters)]
#[getset(get = "pub")]
pub struct DarcSignature {
    /// The signature over the message.
    #[rasn(tag(explicit(0)))]
    signature: SignKeypairSignature,
    /// The delegation route the signature claims.
    #[rasn(tag(explicit(1)))]
    path: SignaturePath,
}

impl DarcSignature {
    /// Sign a message under the given path.
    ///
    /// The caller is responsible for handing us the signer whose identity the
    /// path names; nothing cross-checks that here. A mismatched signer simply
    /// produces a signature that will never verify.
    pub fn new(message: &[u8], path: SignaturePath, signer: &Signer) -> Result<Self> {
        let signature = signer.sign(message)?;
        Ok(Self { signature, path })
    }

    /// Verify this signature over `message` against the darc graph rooted at
    /// `root`, resolving referenced darcs through `lookup`.
    ///
    /// The path must start at `root`'s current content ID. Each hop must be
    /// delegated by the previous darc: the next darc's ID has to appear as a
    /// darc-reference identity in the previous darc's audiences -- either
    /// audience for intermediate hops, the role-selected audience for the
    /// hop onto the terminal darc. The terminal darc must list the path's
    /// identity in its role-selected audience, and that identity must be a
    /// raw key, which then verifies the signature bytes.
    ///
    /// The walk is deterministic and performs no I/O of its own; `lookup` is
    /// the only thing that may reach out to storage. A darc it cannot
    /// resolve fails the verification with [Error::DarcNotFound].
    pub fn verify<F>(&self, message: &[u8], root: &Darc, lookup: F) -> Result<()>
    where
        F: Fn(&DarcID) -> Option<Darc>,
    {
        let darcs = self.path().darcs();
        let first = darcs.first().ok_or(Error::SignaturePathMismatch)?;
        if first != &root.id()? {
            Err(Error::SignaturePathMismatch)?;
        }

        // the root resolves to the darc we were handed: content addressing
        // guarantees any darc carrying that ID has identical content.
        let mut current = root.clone();
        for (idx, next_id) in darcs.iter().enumerate().skip(1) {
            let reference = Identity::from(next_id.clone());
            let is_terminal_hop = idx == darcs.len() - 1;
            let delegated = if is_terminal_hop {
                current.audience(self.path().role()).contains(&reference)
            } else {
                current.owners().contains(&reference) || current.users().contains(&reference)
            };
            if !delegated {
                Err(Error::DarcDelegationBroken)?;
            }
            current = lookup(next_id).ok_or_else(|| Error::DarcNotFound(next_id.clone()))?;
        }

        if !current.audience(self.path().role()).contains(self.path().identity()) {
            Err(Error::IdentityNotAuthorized)?;
        }
        match self.path().identity() {
            Identity::Key(pubkey) => pubkey.verify(self.signature(), message),
            Identity::Darc(..) => Err(Error::TerminalIdentityInvalid),
        }
    }
}

impl SerdeBinary for DarcSignature {}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::darc::darc::tests::create_darc;
    use std::collections::HashMap;

    fn store(darcs: &[&Darc]) -> HashMap<DarcID, Darc> {
        darcs.iter().map(|darc| (darc.id().unwrap(), (*darc).clone())).collect()
    }

    #[test]
    fn darc_signature_verify() {
        let msg = b"document";
        let td = create_darc("testdarc");
        let user = &td.users[0];
        let path = SignaturePath::new(vec![td.darc.id().unwrap()], user.identity(), Role::User);
        let sig = DarcSignature::new(&msg[..], path, user).unwrap();

        sig.verify(&msg[..], &td.darc, |_| None).unwrap();

        // the signature binds one exact message
        assert_eq!(
            sig.verify(&b"documont"[..], &td.darc, |_| None).err(),
            Some(Error::CryptoSignatureVerificationFailed)
        );

        // a version bump changes the content ID, so the path no longer
        // matches even though the audiences are untouched
        let mut bumped = td.darc.clone();
        bumped.increment_version();
        assert_eq!(sig.verify(&msg[..], &bumped, |_| None).err(), Some(Error::SignaturePathMismatch));
    }

    #[test]
    fn darc_signature_role_selects_audience() {
        let msg = b"document";
        let td = create_darc("testdarc");
        let user = &td.users[0];
        // the signer is a user, but the path claims the owner audience
        let path = SignaturePath::new(vec![td.darc.id().unwrap()], user.identity(), Role::Owner);
        let sig = DarcSignature::new(&msg[..], path, user).unwrap();
        assert_eq!(sig.verify(&msg[..], &td.darc, |_| None).err(), Some(Error::IdentityNotAuthorized));
    }

    #[test]
    fn darc_signature_empty_path() {
        let msg = b"document";
        let td = create_darc("testdarc");
        let user = &td.users[0];
        let path = SignaturePath::new(vec![], user.identity(), Role::User);
        let sig = DarcSignature::new(&msg[..], path, user).unwrap();
        assert_eq!(sig.verify(&msg[..], &td.darc, |_| None).err(), Some(Error::SignaturePathMismatch));
    }

    #[test]
    fn darc_signature_delegation() {
        let msg = b"document";
        let d1 = create_darc("darc1");
        let d2 = create_darc("darc2");
        let mut delegator = d1.darc.clone();
        delegator.add_user(Identity::from(d2.darc.id().unwrap()));

        let path = SignaturePath::new(
            vec![delegator.id().unwrap(), d2.darc.id().unwrap()],
            d2.users[0].identity(),
            Role::User,
        );
        let sig = DarcSignature::new(&msg[..], path, &d2.users[0]).unwrap();

        let darcs = store(&[&delegator, &d2.darc]);
        sig.verify(&msg[..], &delegator, |id| darcs.get(id).cloned()).unwrap();

        // the lookup must actually produce the delegated darc
        assert_eq!(
            sig.verify(&msg[..], &delegator, |_| None).err(),
            Some(Error::DarcNotFound(d2.darc.id().unwrap()))
        );
    }

    #[test]
    fn darc_signature_three_hop_chain() {
        let msg = b"document";
        let d1 = create_darc("darc1");
        let d2 = create_darc("darc2");
        let d3 = create_darc("darc3");
        let mut top = d1.darc.clone();
        let mut mid = d2.darc.clone();
        // an intermediate hop may be delegated from either audience; here the
        // top darc delegates through its owners while the path exercises the
        // user role
        top.add_owner(Identity::from(mid.id().unwrap()));
        mid.add_user(Identity::from(d3.darc.id().unwrap()));

        let path = SignaturePath::new(
            vec![top.id().unwrap(), mid.id().unwrap(), d3.darc.id().unwrap()],
            d3.users[0].identity(),
            Role::User,
        );
        let sig = DarcSignature::new(&msg[..], path, &d3.users[0]).unwrap();

        let darcs = store(&[&top, &mid, &d3.darc]);
        sig.verify(&msg[..], &top, |id| darcs.get(id).cloned()).unwrap();
    }

    #[test]
    fn darc_signature_broken_chain() {
        let msg = b"document";
        let d1 = create_darc("darc1");
        let d2 = create_darc("darc2");
        // d1 never delegated anything to d2
        let path = SignaturePath::new(
            vec![d1.darc.id().unwrap(), d2.darc.id().unwrap()],
            d2.users[0].identity(),
            Role::User,
        );
        let sig = DarcSignature::new(&msg[..], path, &d2.users[0]).unwrap();
        let darcs = store(&[&d1.darc, &d2.darc]);
        assert_eq!(
            sig.verify(&msg[..], &d1.darc, |id| darcs.get(id).cloned()).err(),
            Some(Error::DarcDelegationBroken)
        );
    }

    #[test]
    fn darc_signature_terminal_hop_respects_role() {
        let msg = b"document";
        let d1 = create_darc("darc1");
        let d2 = create_darc("darc2");
        let mut delegator = d1.darc.clone();
        // delegation lives in the users list, but the path claims owners all
        // the way to the terminal darc
        delegator.add_user(Identity::from(d2.darc.id().unwrap()));

        let path = SignaturePath::new(
            vec![delegator.id().unwrap(), d2.darc.id().unwrap()],
            d2.owners[0].identity(),
            Role::Owner,
        );
        let sig = DarcSignature::new(&msg[..], path, &d2.owners[0]).unwrap();
        let darcs = store(&[&delegator, &d2.darc]);
        assert_eq!(
            sig.verify(&msg[..], &delegator, |id| darcs.get(id).cloned()).err(),
            Some(Error::DarcDelegationBroken)
        );
    }

    #[test]
    fn darc_signature_terminal_identity_must_be_key() {
        let msg = b"document";
        let d1 = create_darc("darc1");
        let d2 = create_darc("darc2");
        let mut delegator = d1.darc.clone();
        delegator.add_user(Identity::from(d2.darc.id().unwrap()));

        // a path ending on the darc reference itself names nothing that can
        // hold a verification key
        let path = SignaturePath::new(
            vec![delegator.id().unwrap()],
            Identity::from(d2.darc.id().unwrap()),
            Role::User,
        );
        let sig = DarcSignature::new(&msg[..], path, &d2.users[0]).unwrap();
        assert_eq!(
            sig.verify(&msg[..], &delegator, |_| None).err(),
            Some(Error::TerminalIdentityInvalid)
        );
    }

    #[test]
    fn darc_signature_serde() {
        let msg = b"document";
        let td = create_darc("testdarc");
        let user = &td.users[0];
        let path = SignaturePath::new(vec![td.darc.id().unwrap()], user.identity(), Role::User);
        let sig = DarcSignature::new(&msg[..], path, user).unwrap();

        let bytes = sig.serialize_binary().unwrap();
        let sig2 = DarcSignature::deserialize_binary(&bytes).unwrap();
        assert_eq!(sig, sig2);
        sig2.verify(&msg[..], &td.darc, |_| None).unwrap();
    }
}
