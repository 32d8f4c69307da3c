//! Validator identities and earning accounts

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::KeyError;

/// Length of a compressed BLS public key
pub const PUBLIC_KEY_SIZE: usize = 48;

/// Length of an earning account address
pub const ADDRESS_SIZE: usize = 20;

/// Serialized BLS public key, the identity used for weight lookup
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SerializedPublicKey(pub [u8; PUBLIC_KEY_SIZE]);

impl SerializedPublicKey {
    /// Lowercase hex without prefix, stable across nodes
    pub fn hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Decode key material from hex, with or without `0x`
    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        let bytes = decode_prefixed(s)?;
        let key: [u8; PUBLIC_KEY_SIZE] =
            bytes
                .as_slice()
                .try_into()
                .map_err(|_| KeyError::InvalidLength {
                    expected: PUBLIC_KEY_SIZE,
                    got: bytes.len(),
                })?;
        Ok(Self(key))
    }

    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_SIZE] {
        &self.0
    }
}

impl fmt::Display for SerializedPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex())
    }
}

impl fmt::Debug for SerializedPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SerializedPublicKey({})", self.hex())
    }
}

impl FromStr for SerializedPublicKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

/// Earning account of a slot
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(pub [u8; ADDRESS_SIZE]);

impl Address {
    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        let bytes = decode_prefixed(s)?;
        let addr: [u8; ADDRESS_SIZE] =
            bytes
                .as_slice()
                .try_into()
                .map_err(|_| KeyError::InvalidLength {
                    expected: ADDRESS_SIZE,
                    got: bytes.len(),
                })?;
        Ok(Self(addr))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl FromStr for Address {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

fn decode_prefixed(s: &str) -> Result<Vec<u8>, KeyError> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(s).map_err(|e| KeyError::InvalidHex(e.to_string()))
}

macro_rules! hex_serde {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

hex_serde!(SerializedPublicKey);
hex_serde!(Address);
