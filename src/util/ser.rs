//! Helpful serialization tools.
//!
//! The canonical format for anything that gets hashed or signed is ASN.1 DER:
//! fields are encoded in declaration order with explicit tags and length
//! prefixes, so two logically-identical values always serialize to the same
//! bytes. A human-readable YAML representation rides alongside for inspection
//! and export, with binary payloads rendered as URL-safe base64.

use crate::error::{Error, Result};
use rasn::{
    types::{Constraints, Tag},
    AsnType, Decode, Decoder, Encode, Encoder,
};
use serde::{de::DeserializeOwned, Serialize};
use std::ops::Deref;

/// Serialize a value into its canonical (DER) byte representation.
pub(crate) fn serialize<T: Encode>(obj: &T) -> Result<Vec<u8>> {
    rasn::der::encode(obj).map_err(|_| Error::ASNSerialize)
}

/// Deserialize a value from its canonical (DER) byte representation.
pub(crate) fn deserialize<T: Decode>(bytes: &[u8]) -> Result<T> {
    rasn::der::decode(bytes).map_err(|_| Error::ASNDeserialize)
}

/// Serialize a value into a human-readable format.
pub(crate) fn serialize_human<T: Serialize>(obj: &T) -> Result<String> {
    Ok(serde_yaml::to_string(obj)?)
}

/// Deserialize a value from its human-readable format.
pub(crate) fn deserialize_human<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    Ok(serde_yaml::from_slice(bytes)?)
}

/// Convert bytes to base64
pub fn base64_encode<T: AsRef<[u8]>>(bytes: T) -> String {
    use base64::Engine;
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes.as_ref())
}

/// Convert base64 to bytes
pub fn base64_decode<T: AsRef<[u8]>>(bytes: T) -> Result<Vec<u8>> {
    use base64::Engine;
    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.decode(bytes.as_ref())?)
}

/// A default implementation for (de)serializing an object to or from binary
/// format.
pub trait SerdeBinary: Encode + Decode {
    /// Serialize this object
    fn serialize_binary(&self) -> Result<Vec<u8>> {
        serialize(self)
    }

    /// Deserialize this object
    fn deserialize_binary(slice: &[u8]) -> Result<Self> {
        deserialize(slice)
    }
}

/// A fixed-length byte container that encodes as an ASN.1 OCTET STRING and
/// renders as base64 in human-readable formats.
#[derive(Clone, PartialEq, Eq)]
pub struct Binary<const N: usize>([u8; N]);

impl<const N: usize> Binary<N> {
    /// Create a new fixed-length binary container.
    pub fn new(bytes: [u8; N]) -> Self {
        Self(bytes)
    }
}

impl<const N: usize> Deref for Binary<N> {
    type Target = [u8; N];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<const N: usize> AsRef<[u8]> for Binary<N> {
    fn as_ref(&self) -> &[u8] {
        &self.0[..]
    }
}

impl<const N: usize> std::fmt::Debug for Binary<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Binary({})", base64_encode(&self.0[..]))
    }
}

impl<const N: usize> AsnType for Binary<N> {
    const TAG: Tag = Tag::OCTET_STRING;
}

impl<const N: usize> Encode for Binary<N> {
    fn encode_with_tag_and_constraints<E: Encoder>(
        &self,
        encoder: &mut E,
        tag: Tag,
        constraints: Constraints,
    ) -> std::result::Result<(), E::Error> {
        encoder.encode_octet_string(tag, constraints, &self.0[..]).map(|_| ())
    }
}

impl<const N: usize> Decode for Binary<N> {
    fn decode_with_tag_and_constraints<D: Decoder>(
        decoder: &mut D,
        tag: Tag,
        constraints: Constraints,
    ) -> std::result::Result<Self, D::Error> {
        let bytes = decoder.decode_octet_string(tag, constraints)?;
        let arr: [u8; N] = (&bytes[..])
            .try_into()
            .map_err(|_| rasn::de::Error::custom("invalid fixed-width binary length", decoder.codec()))?;
        Ok(Self::new(arr))
    }
}

impl<const N: usize> serde::Serialize for Binary<N> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&base64_encode(&self.0[..]))
        } else {
            serializer.serialize_bytes(&self.0[..])
        }
    }
}

impl<'de, const N: usize> serde::Deserialize<'de> for Binary<N> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct BinaryVisitor<const N: usize>;
        impl<'de, const N: usize> serde::de::Visitor<'de> for BinaryVisitor<N> {
            type Value = Binary<N>;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "a {} byte binary value", N)
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> std::result::Result<Self::Value, E> {
                let vec = base64_decode(v).map_err(serde::de::Error::custom)?;
                let arr: [u8; N] = vec
                    .as_slice()
                    .try_into()
                    .map_err(|_| serde::de::Error::custom("invalid fixed-width binary length"))?;
                Ok(Binary::new(arr))
            }

            fn visit_bytes<E: serde::de::Error>(self, v: &[u8]) -> std::result::Result<Self::Value, E> {
                let arr: [u8; N] = v
                    .try_into()
                    .map_err(|_| serde::de::Error::custom("invalid fixed-width binary length"))?;
                Ok(Binary::new(arr))
            }
        }
        if deserializer.is_human_readable() {
            deserializer.deserialize_str(BinaryVisitor::<N>)
        } else {
            deserializer.deserialize_bytes(BinaryVisitor::<N>)
        }
    }
}

/// A variable-length byte container with the same encodings as [Binary].
#[derive(Clone, PartialEq, Eq)]
pub struct BinaryVec(Vec<u8>);

impl BinaryVec {
    /// Create a new byte container.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<Vec<u8>> for BinaryVec {
    fn from(vec: Vec<u8>) -> Self {
        Self(vec)
    }
}

impl From<&[u8]> for BinaryVec {
    fn from(slice: &[u8]) -> Self {
        Self(Vec::from(slice))
    }
}

impl Deref for BinaryVec {
    type Target = Vec<u8>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<[u8]> for BinaryVec {
    fn as_ref(&self) -> &[u8] {
        &self.0[..]
    }
}

impl std::fmt::Debug for BinaryVec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BinaryVec({})", base64_encode(&self.0[..]))
    }
}

impl AsnType for BinaryVec {
    const TAG: Tag = Tag::OCTET_STRING;
}

impl Encode for BinaryVec {
    fn encode_with_tag_and_constraints<E: Encoder>(
        &self,
        encoder: &mut E,
        tag: Tag,
        constraints: Constraints,
    ) -> std::result::Result<(), E::Error> {
        encoder.encode_octet_string(tag, constraints, &self.0[..]).map(|_| ())
    }
}

impl Decode for BinaryVec {
    fn decode_with_tag_and_constraints<D: Decoder>(
        decoder: &mut D,
        tag: Tag,
        constraints: Constraints,
    ) -> std::result::Result<Self, D::Error> {
        let bytes = decoder.decode_octet_string(tag, constraints)?;
        Ok(Self(bytes.into()))
    }
}

impl serde::Serialize for BinaryVec {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&base64_encode(&self.0[..]))
        } else {
            serializer.serialize_bytes(&self.0[..])
        }
    }
}

impl<'de> serde::Deserialize<'de> for BinaryVec {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct BinaryVecVisitor;
        impl<'de> serde::de::Visitor<'de> for BinaryVecVisitor {
            type Value = BinaryVec;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "a byte sequence")
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> std::result::Result<Self::Value, E> {
                let vec = base64_decode(v).map_err(serde::de::Error::custom)?;
                Ok(BinaryVec::from(vec))
            }

            fn visit_bytes<E: serde::de::Error>(self, v: &[u8]) -> std::result::Result<Self::Value, E> {
                Ok(BinaryVec::from(v))
            }
        }
        if deserializer.is_human_readable() {
            deserializer.deserialize_str(BinaryVecVisitor)
        } else {
            deserializer.deserialize_bytes(BinaryVecVisitor)
        }
    }
}

/// A fixed-length container for secret bytes. Zeroed on drop, redacted in
/// debug output, and deliberately missing every serialization impl: secret
/// key material never leaves the process.
#[derive(Clone, zeroize::Zeroize, zeroize::ZeroizeOnDrop)]
pub struct BinarySecret<const N: usize>([u8; N]);

impl<const N: usize> BinarySecret<N> {
    /// Create a new secret container.
    pub fn new(bytes: [u8; N]) -> Self {
        Self(bytes)
    }

    /// Grab the inner secret bytes.
    pub fn expose_secret(&self) -> &[u8; N] {
        &self.0
    }
}

impl<const N: usize> std::fmt::Debug for BinarySecret<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BinarySecret(<secret>)")
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    #[test]
    fn base64_encode_decode() {
        let bytes = b"you don't have to be a swell dancer to get a job at the cannery";
        let enc = base64_encode(&bytes[..]);
        assert!(!enc.contains('='));
        let dec = base64_decode(enc.as_str()).unwrap();
        assert_eq!(&dec[..], &bytes[..]);
        assert!(base64_decode("not!!valid!!base64!!").is_err());
    }

    #[test]
    fn binary_canonical_encoding_is_stable() {
        let bin = Binary::new([4u8, 8, 15, 16, 23, 42]);
        let ser1 = serialize(&bin).unwrap();
        let ser2 = serialize(&bin.clone()).unwrap();
        assert_eq!(ser1, ser2);
        let bin2: Binary<6> = deserialize(&ser1).unwrap();
        assert_eq!(bin, bin2);
        // a six-byte octet string cannot decode into a four-byte container
        assert_eq!(deserialize::<Binary<4>>(&ser1).err(), Some(crate::error::Error::ASNDeserialize));
    }

    #[test]
    fn binaryvec_human_readable_is_base64() {
        let bin = BinaryVec::from(vec![190u8, 239, 202, 254]);
        let human = serialize_human(&bin).unwrap();
        assert!(human.contains(&base64_encode(&[190u8, 239, 202, 254][..])));
        let back: BinaryVec = deserialize_human(human.as_bytes()).unwrap();
        assert_eq!(bin, back);
    }

    #[test]
    fn binarysecret_debug_redacts() {
        let secret = BinarySecret::new([42u8; 32]);
        assert_eq!(format!("{:?}", secret), "BinarySecret(<secret>)");
    }
}
