// Key generation

use rand::rngs::OsRng;
use rand::{Rng, RngCore};
use secp256k1::{Secp256k1, SecretKey};

use crate::keys::hash::{base58check_encode, hash160};
use crate::keys::{GeneratedKeys, KeyProvider, P2PKH_VERSION};

const BASE58_ALPHABET: &[u8] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Placeholder keys built from random bytes.
///
/// The values only look like keys: the public key is not derived from the
/// private key and the address has no valid checksum.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockKeyProvider;

impl MockKeyProvider {
    /// Generate with a caller-supplied random source
    pub fn generate_with<R: Rng + ?Sized>(&self, rng: &mut R) -> GeneratedKeys {
        let mut private_key = [0u8; 32];
        rng.fill_bytes(&mut private_key);

        let mut public_key = [0u8; 33];
        rng.fill_bytes(&mut public_key);
        public_key[0] = if rng.gen_bool(0.5) { 0x02 } else { 0x03 };

        let mut address = String::with_capacity(34);
        address.push('1');
        for _ in 0..33 {
            let c = BASE58_ALPHABET[rng.gen_range(0..BASE58_ALPHABET.len())];
            address.push(c as char);
        }

        GeneratedKeys {
            private_key_hex: hex::encode(private_key),
            public_key_hex: hex::encode(public_key),
            address,
        }
    }
}

impl KeyProvider for MockKeyProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn generate(&self) -> GeneratedKeys {
        log::debug!("Generating mock keys");
        self.generate_with(&mut rand::thread_rng())
    }
}

/// Real secp256k1 keypair with a mainnet P2PKH address
#[derive(Debug, Clone, Copy, Default)]
pub struct Secp256k1KeyProvider;

impl Secp256k1KeyProvider {
    /// Build keys from an existing secret key
    pub fn from_secret_key(secret_key: &SecretKey) -> GeneratedKeys {
        let secp = Secp256k1::new();
        let public_key = secret_key.public_key(&secp);

        let pubkey_bytes = public_key.serialize();
        let pubkey_hash = hash160(&pubkey_bytes);

        GeneratedKeys {
            private_key_hex: hex::encode(secret_key.secret_bytes()),
            public_key_hex: hex::encode(pubkey_bytes),
            address: base58check_encode(P2PKH_VERSION, &pubkey_hash),
        }
    }
}

impl KeyProvider for Secp256k1KeyProvider {
    fn name(&self) -> &'static str {
        "secp256k1"
    }

    fn generate(&self) -> GeneratedKeys {
        let mut rng = OsRng;
        let secret_key = SecretKey::new(&mut rng);
        log::debug!("Generated secp256k1 keypair");
        Self::from_secret_key(&secret_key)
    }
}
