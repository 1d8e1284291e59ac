// Address checks

use crate::keys::hash::{checksum, CHECKSUM_LEN};
use crate::keys::{AddressError, AddressKind, AddressValidator, P2PKH_VERSION, P2SH_VERSION};

const BECH32_PREFIX: &str = "bc1";

fn has_bech32_prefix(address: &str) -> bool {
    address
        .get(..BECH32_PREFIX.len())
        .is_some_and(|p| p.eq_ignore_ascii_case(BECH32_PREFIX))
}

/// Classifies an address by its leading characters only.
/// Says nothing about whether the address is well formed.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrefixValidator;

impl AddressValidator for PrefixValidator {
    fn validate(&self, address: &str) -> Result<AddressKind, AddressError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(AddressError::Empty);
        }

        if has_bech32_prefix(address) {
            Ok(AddressKind::Bech32)
        } else if address.starts_with('1') {
            Ok(AddressKind::P2pkh)
        } else if address.starts_with('3') {
            Ok(AddressKind::P2sh)
        } else {
            Err(AddressError::UnknownPrefix)
        }
    }
}

/// Decodes a legacy address and checks its length, checksum and version byte.
/// Bech32 addresses are reported as unsupported.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base58CheckValidator;

impl AddressValidator for Base58CheckValidator {
    fn validate(&self, address: &str) -> Result<AddressKind, AddressError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(AddressError::Empty);
        }
        if has_bech32_prefix(address) {
            return Err(AddressError::Unsupported("bech32"));
        }

        let data = bs58::decode(address)
            .into_vec()
            .map_err(|e| AddressError::InvalidEncoding(e.to_string()))?;

        // version (1) + hash160 (20) + checksum (4)
        if data.len() != 1 + 20 + CHECKSUM_LEN {
            return Err(AddressError::InvalidLength(data.len()));
        }

        let (body, sum) = data.split_at(data.len() - CHECKSUM_LEN);
        if checksum(body) != sum {
            return Err(AddressError::ChecksumMismatch);
        }

        match body[0] {
            P2PKH_VERSION => Ok(AddressKind::P2pkh),
            P2SH_VERSION => Ok(AddressKind::P2sh),
            other => Err(AddressError::UnknownVersion(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::hash::base58check_encode;

    const GENESIS: &str = "1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa";
    const P2SH: &str = "3J98t1WpEZ73CNmQviecrnyiWrnqRhWNLy";
    const SEGWIT: &str = "bc1qar0srrr7xfkvy5l643lydnw9re59gtzzwf5mdq";

    #[test]
    fn test_prefix_classification() {
        assert_eq!(PrefixValidator.validate(GENESIS), Ok(AddressKind::P2pkh));
        assert_eq!(PrefixValidator.validate(P2SH), Ok(AddressKind::P2sh));
        assert_eq!(PrefixValidator.validate(SEGWIT), Ok(AddressKind::Bech32));
        assert_eq!(PrefixValidator.validate("BC1QAR0SRRR7"), Ok(AddressKind::Bech32));
        assert_eq!(PrefixValidator.validate("  "), Err(AddressError::Empty));
        assert_eq!(PrefixValidator.validate("2N3o"), Err(AddressError::UnknownPrefix));
    }

    #[test]
    fn test_prefix_accepts_garbage_with_right_prefix() {
        // The prefix check is all the mock ever did
        assert_eq!(PrefixValidator.validate("1notanaddress"), Ok(AddressKind::P2pkh));
        assert!(Base58CheckValidator.validate("1notanaddress").is_err());
    }

    #[test]
    fn test_base58check_valid() {
        assert_eq!(Base58CheckValidator.validate(GENESIS), Ok(AddressKind::P2pkh));
        assert_eq!(Base58CheckValidator.validate(P2SH), Ok(AddressKind::P2sh));
    }

    #[test]
    fn test_base58check_corrupted() {
        let corrupted = GENESIS.replace("DivfNa", "DivfNb");
        assert_eq!(
            Base58CheckValidator.validate(&corrupted),
            Err(AddressError::ChecksumMismatch)
        );
    }

    #[test]
    fn test_base58check_bad_input() {
        assert_eq!(Base58CheckValidator.validate(""), Err(AddressError::Empty));
        assert_eq!(
            Base58CheckValidator.validate(SEGWIT),
            Err(AddressError::Unsupported("bech32"))
        );
        // '0' is not in the Base58 alphabet
        assert!(matches!(
            Base58CheckValidator.validate("10OIl"),
            Err(AddressError::InvalidEncoding(_))
        ));
        assert!(matches!(
            Base58CheckValidator.validate("1111"),
            Err(AddressError::InvalidLength(4))
        ));
    }

    #[test]
    fn test_base58check_unknown_version() {
        // Testnet P2PKH version byte
        let testnet = base58check_encode(0x6f, &[0x11; 20]);
        assert_eq!(
            Base58CheckValidator.validate(&testnet),
            Err(AddressError::UnknownVersion(0x6f))
        );
    }
}
