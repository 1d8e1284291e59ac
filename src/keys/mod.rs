// Key generation and address checking
//
// Both concerns sit behind a trait so the placeholder implementations used by
// the lessons and the secp256k1/Base58Check ones can be swapped freely.

mod address;
pub mod hash;
mod provider;

pub use address::{Base58CheckValidator, PrefixValidator};
pub use provider::{MockKeyProvider, Secp256k1KeyProvider};

use serde::{Deserialize, Serialize};

/// Mainnet P2PKH version byte
pub const P2PKH_VERSION: u8 = 0x00;
/// Mainnet P2SH version byte
pub const P2SH_VERSION: u8 = 0x05;

/// Generated key material, hex encoded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedKeys {
    pub private_key_hex: String,
    pub public_key_hex: String,
    pub address: String,
}

/// Source of key material
pub trait KeyProvider {
    /// Short name for display
    fn name(&self) -> &'static str;

    /// Produce a fresh keypair and address
    fn generate(&self) -> GeneratedKeys;
}

/// Address type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddressKind {
    /// Pay to public key hash, starts with `1`
    P2pkh,
    /// Pay to script hash, starts with `3`
    P2sh,
    /// Native segwit, starts with `bc1`
    Bech32,
}

impl std::fmt::Display for AddressKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            AddressKind::P2pkh => write!(f, "Legacy (P2PKH)"),
            AddressKind::P2sh => write!(f, "Script (P2SH)"),
            AddressKind::Bech32 => write!(f, "Native SegWit (Bech32)"),
        }
    }
}

/// Address error types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    Empty,
    /// Does not start with a known prefix
    UnknownPrefix,
    /// Not valid Base58
    InvalidEncoding(String),
    /// Decoded payload has the wrong size
    InvalidLength(usize),
    ChecksumMismatch,
    /// Version byte is not mainnet P2PKH or P2SH
    UnknownVersion(u8),
    /// Format recognised but not checked by this validator
    Unsupported(&'static str),
}

impl std::fmt::Display for AddressError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            AddressError::Empty => write!(f, "Address is empty"),
            AddressError::UnknownPrefix => write!(f, "Address must start with 1, 3 or bc1"),
            AddressError::InvalidEncoding(e) => write!(f, "Invalid Base58: {}", e),
            AddressError::InvalidLength(len) => {
                write!(f, "Invalid address length: expected 25 bytes, got {}", len)
            }
            AddressError::ChecksumMismatch => write!(f, "Checksum mismatch"),
            AddressError::UnknownVersion(v) => write!(f, "Unknown version byte 0x{:02x}", v),
            AddressError::Unsupported(format) => {
                write!(f, "{} addresses are not checked by this validator", format)
            }
        }
    }
}

impl std::error::Error for AddressError {}

/// Source of address validation
pub trait AddressValidator {
    /// Classify an address, or explain why it is rejected
    fn validate(&self, address: &str) -> Result<AddressKind, AddressError>;
}
