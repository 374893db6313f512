//! BIP32 extended key serialization and child derivation.

use std::fmt;
use std::str::FromStr;

use rand::{CryptoRng, RngCore};

use crate::base58;
use crate::ec::{PrivateKey, PublicKey};
use crate::hash::sha512_hmac;
use crate::PrimitivesError;

use super::HARDENED_KEY_START;

/// Length of a serialized extended key payload (without checksum).
const SERIALIZED_LEN: usize = 78;

/// HMAC key used to turn a seed into a master key.
const MASTER_KEY_HMAC: &[u8] = b"Bitcoin seed";

/// Recommended seed length for freshly generated master keys.
const RECOMMENDED_SEED_LEN: usize = 32;

const MAINNET_PRIVATE: [u8; 4] = [0x04, 0x88, 0xad, 0xe4];
const MAINNET_PUBLIC: [u8; 4] = [0x04, 0x88, 0xb2, 0x1e];
const TESTNET_PRIVATE: [u8; 4] = [0x04, 0x35, 0x83, 0x94];
const TESTNET_PUBLIC: [u8; 4] = [0x04, 0x35, 0x87, 0xcf];

/// Network an extended key is serialized for (`xprv`/`xpub` or `tprv`/`tpub`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Network {
    /// Mainnet (`xprv` / `xpub`).
    #[default]
    Mainnet,
    /// Testnet (`tprv` / `tpub`).
    Testnet,
}

impl Network {
    fn version(self, private: bool) -> [u8; 4] {
        match (self, private) {
            (Network::Mainnet, true) => MAINNET_PRIVATE,
            (Network::Mainnet, false) => MAINNET_PUBLIC,
            (Network::Testnet, true) => TESTNET_PRIVATE,
            (Network::Testnet, false) => TESTNET_PUBLIC,
        }
    }

    fn from_version(version: [u8; 4]) -> Option<(Self, bool)> {
        match version {
            MAINNET_PRIVATE => Some((Network::Mainnet, true)),
            MAINNET_PUBLIC => Some((Network::Mainnet, false)),
            TESTNET_PRIVATE => Some((Network::Testnet, true)),
            TESTNET_PUBLIC => Some((Network::Testnet, false)),
            _ => None,
        }
    }
}

/// Key material held by an extended key.
#[derive(Clone, Debug, PartialEq, Eq)]
enum KeyMaterial {
    Private(PrivateKey),
    Public(PublicKey),
}

/// A BIP32 extended key.
///
/// Immutable once built; every derivation returns a new key, so a single
/// root can be shared read-only between threads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtendedKey {
    network: Network,
    depth: u8,
    parent_fingerprint: [u8; 4],
    child_number: u32,
    chain_code: [u8; 32],
    key: KeyMaterial,
}

impl ExtendedKey {
    /// Create a master private key from a seed.
    ///
    /// `I = HMAC-SHA512("Bitcoin seed", seed)`; the left half is the key,
    /// the right half the chain code.
    pub fn from_seed(seed: &[u8], network: Network) -> Result<Self, PrimitivesError> {
        if !(16..=64).contains(&seed.len()) {
            return Err(PrimitivesError::InvalidExtendedKey(format!(
                "seed length must be between 16 and 64 bytes, got {}",
                seed.len()
            )));
        }
        let i = sha512_hmac(MASTER_KEY_HMAC, seed);
        let (il, ir) = split_hmac(&i);
        let key = PrivateKey::from_bytes(&il).map_err(|_| {
            PrimitivesError::InvalidExtendedKey("seed produced an unusable master key".to_string())
        })?;
        Ok(ExtendedKey {
            network,
            depth: 0,
            parent_fingerprint: [0u8; 4],
            child_number: 0,
            chain_code: ir,
            key: KeyMaterial::Private(key),
        })
    }

    /// Generate a master private key from a fresh random seed.
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R, network: Network) -> Result<Self, PrimitivesError> {
        let mut seed = [0u8; RECOMMENDED_SEED_LEN];
        rng.fill_bytes(&mut seed);
        let key = Self::from_seed(&seed, network);
        {
            use zeroize::Zeroize;
            seed.zeroize();
        }
        key
    }

    /// Whether this key holds private key material.
    pub fn is_private(&self) -> bool {
        matches!(self.key, KeyMaterial::Private(_))
    }

    /// Network this key serializes for.
    pub fn network(&self) -> Network {
        self.network
    }

    /// Depth in the tree (0 for a master key).
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Index this key was derived at.
    pub fn child_number(&self) -> u32 {
        self.child_number
    }

    /// First four bytes of the parent's public key Hash160.
    pub fn parent_fingerprint(&self) -> [u8; 4] {
        self.parent_fingerprint
    }

    /// Chain code.
    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    /// The EC private key, or `NotPrivate` for the public flavor.
    pub fn private_key(&self) -> Result<&PrivateKey, PrimitivesError> {
        match &self.key {
            KeyMaterial::Private(k) => Ok(k),
            KeyMaterial::Public(_) => Err(PrimitivesError::NotPrivate),
        }
    }

    /// The EC public key.
    pub fn public_key(&self) -> PublicKey {
        match &self.key {
            KeyMaterial::Private(k) => k.pub_key(),
            KeyMaterial::Public(k) => k.clone(),
        }
    }

    /// Fingerprint of this key, used as the parent fingerprint of its children.
    pub fn fingerprint(&self) -> [u8; 4] {
        let h = self.public_key().hash160();
        [h[0], h[1], h[2], h[3]]
    }

    /// Return the public flavor of this key.
    pub fn neuter(&self) -> ExtendedKey {
        ExtendedKey {
            key: KeyMaterial::Public(self.public_key()),
            ..self.clone()
        }
    }

    /// Derive the child at `index`.
    ///
    /// Indices at or above [`HARDENED_KEY_START`] are hardened and need the
    /// private flavor. A private parent yields a private child; a public
    /// parent yields a public child.
    pub fn derive_child(&self, index: u32) -> Result<ExtendedKey, PrimitivesError> {
        if self.depth == u8::MAX {
            return Err(PrimitivesError::DepthExceeded);
        }
        let hardened = index >= HARDENED_KEY_START;

        let mut data = Vec::with_capacity(37);
        match (&self.key, hardened) {
            (KeyMaterial::Public(_), true) => return Err(PrimitivesError::HardenedFromPublic),
            (KeyMaterial::Private(k), true) => {
                data.push(0x00);
                data.extend_from_slice(&k.to_bytes());
            }
            (_, false) => data.extend_from_slice(&self.public_key().to_compressed()),
        }
        data.extend_from_slice(&index.to_be_bytes());

        let i = sha512_hmac(&self.chain_code, &data);
        let (il, ir) = split_hmac(&i);

        // IL >= n or a zero/infinite child means this index is skipped.
        let key = match &self.key {
            KeyMaterial::Private(k) => KeyMaterial::Private(
                k.add_tweak(&il)
                    .map_err(|_| PrimitivesError::InvalidChild(index))?,
            ),
            KeyMaterial::Public(k) => KeyMaterial::Public(
                k.add_tweak(&il)
                    .map_err(|_| PrimitivesError::InvalidChild(index))?,
            ),
        };

        Ok(ExtendedKey {
            network: self.network,
            depth: self.depth + 1,
            parent_fingerprint: self.fingerprint(),
            child_number: index,
            chain_code: ir,
            key,
        })
    }

    /// Derive successive children along `path`.
    pub fn derive_path(&self, path: &[u32]) -> Result<ExtendedKey, PrimitivesError> {
        let mut key = self.clone();
        for &index in path {
            key = key.derive_child(index)?;
        }
        Ok(key)
    }

    /// Serialize to the 78-byte BIP32 payload.
    fn to_payload(&self) -> [u8; SERIALIZED_LEN] {
        let mut out = [0u8; SERIALIZED_LEN];
        out[0..4].copy_from_slice(&self.network.version(self.is_private()));
        out[4] = self.depth;
        out[5..9].copy_from_slice(&self.parent_fingerprint);
        out[9..13].copy_from_slice(&self.child_number.to_be_bytes());
        out[13..45].copy_from_slice(&self.chain_code);
        match &self.key {
            KeyMaterial::Private(k) => out[46..78].copy_from_slice(&k.to_bytes()),
            KeyMaterial::Public(k) => out[45..78].copy_from_slice(&k.to_compressed()),
        }
        out
    }

    /// Parse a Base58Check serialized extended key (`xprv`, `xpub`, `tprv`, `tpub`).
    pub fn from_string(s: &str) -> Result<Self, PrimitivesError> {
        if s.is_empty() {
            return Err(PrimitivesError::InvalidExtendedKey("key string is empty".to_string()));
        }
        let payload = base58::check_decode(s)?;
        if payload.len() != SERIALIZED_LEN {
            return Err(PrimitivesError::InvalidExtendedKey(format!(
                "expected {} bytes, got {}",
                SERIALIZED_LEN,
                payload.len()
            )));
        }

        let mut version = [0u8; 4];
        version.copy_from_slice(&payload[0..4]);
        let (network, private) = Network::from_version(version).ok_or_else(|| {
            PrimitivesError::InvalidExtendedKey(format!("unknown version {}", hex::encode(version)))
        })?;

        let depth = payload[4];
        let mut parent_fingerprint = [0u8; 4];
        parent_fingerprint.copy_from_slice(&payload[5..9]);
        let mut child_number_bytes = [0u8; 4];
        child_number_bytes.copy_from_slice(&payload[9..13]);
        let child_number = u32::from_be_bytes(child_number_bytes);
        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&payload[13..45]);

        let key_data = &payload[45..78];
        let key = if private {
            if key_data[0] != 0x00 {
                return Err(PrimitivesError::InvalidExtendedKey(
                    "private key data must start with 0x00".to_string(),
                ));
            }
            KeyMaterial::Private(PrivateKey::from_bytes(&key_data[1..])?)
        } else {
            if key_data[0] != 0x02 && key_data[0] != 0x03 {
                return Err(PrimitivesError::InvalidExtendedKey(
                    "public key data must be compressed".to_string(),
                ));
            }
            KeyMaterial::Public(PublicKey::from_bytes(key_data)?)
        };

        if depth == 0 && (parent_fingerprint != [0u8; 4] || child_number != 0) {
            return Err(PrimitivesError::InvalidExtendedKey(
                "master key with non-zero parent fingerprint or index".to_string(),
            ));
        }

        Ok(ExtendedKey {
            network,
            depth,
            parent_fingerprint,
            child_number,
            chain_code,
            key,
        })
    }
}

impl fmt::Display for ExtendedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&base58::check_encode(&self.to_payload()))
    }
}

impl FromStr for ExtendedKey {
    type Err = PrimitivesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s)
    }
}

fn split_hmac(i: &[u8; 64]) -> ([u8; 32], [u8; 32]) {
    let mut il = [0u8; 32];
    let mut ir = [0u8; 32];
    il.copy_from_slice(&i[..32]);
    ir.copy_from_slice(&i[32..]);
    (il, ir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    // BIP32 test vector 1.
    const SEED_1: &str = "000102030405060708090a0b0c0d0e0f";
    const M_XPRV: &str = "xprv9s21ZrQH143K3QTDL4LXw2F7HEK3wJUD2nW2nRk4stbPy6cq3jPPqjiChkVvvNKmPGJxWUtg6LnF5kejMRNNU3TGtRBeJgk33yuGBxrMPHi";
    const M_XPUB: &str = "xpub661MyMwAqRbcFtXgS5sYJABqqG9YLmC4Q1Rdap9gSE8NqtwybGhePY2gZ29ESFjqJoCu1Rupje8YtGqsefD265TMg7usUDFdp6W1EGMcet8";
    const M_0H_XPRV: &str = "xprv9uHRZZhk6KAJC1avXpDAp4MDc3sQKNxDiPvvkX8Br5ngLNv1TxvUxt4cV1rGL5hj6KCesnDYUhd7oWgT11eZG7XnxHrnYeSvkzY7d2bhkJ7";
    const M_0H_XPUB: &str = "xpub68Gmy5EdvgibQVfPdqkBBCHxA5htiqg55crXYuXoQRKfDBFA1WEjWgP6LHhwBZeNK1VTsfTFUHCdrfp1bgwQ9xv5ski8PX9rL2dZXvgGDnw";
    const M_0H_1_XPRV: &str = "xprv9wTYmMFdV23N2TdNG573QoEsfRrWKQgWeibmLntzniatZvR9BmLnvSxqu53Kw1UmYPxLgboyZQaXwTCg8MSY3H2EU4pWcQDnRnrVA1xe8fs";
    const M_0H_1_XPUB: &str = "xpub6ASuArnXKPbfEwhqN6e3mwBcDTgzisQN1wXN9BJcM47sSikHjJf3UFHKkNAWbWMiGj7Wf5uMash7SyYq527Hqck2AxYysAA7xmALppuCkwQ";

    fn master() -> ExtendedKey {
        ExtendedKey::from_seed(&hex::decode(SEED_1).unwrap(), Network::Mainnet).unwrap()
    }

    #[test]
    fn test_master_from_seed() {
        let m = master();
        assert!(m.is_private());
        assert_eq!(m.depth(), 0);
        assert_eq!(m.to_string(), M_XPRV);
        assert_eq!(m.neuter().to_string(), M_XPUB);
    }

    #[test]
    fn test_private_derivation_vector_1() {
        let m_0h = master().derive_child(HARDENED_KEY_START).unwrap();
        assert_eq!(m_0h.to_string(), M_0H_XPRV);
        assert_eq!(m_0h.neuter().to_string(), M_0H_XPUB);

        let m_0h_1 = m_0h.derive_child(1).unwrap();
        assert_eq!(m_0h_1.to_string(), M_0H_1_XPRV);
        assert_eq!(m_0h_1.neuter().to_string(), M_0H_1_XPUB);
        assert_eq!(m_0h_1.depth(), 2);
        assert_eq!(m_0h_1.child_number(), 1);
        assert_eq!(m_0h_1.parent_fingerprint(), m_0h.fingerprint());
    }

    #[test]
    fn test_public_derivation_matches_private() {
        let xpub = ExtendedKey::from_string(M_0H_XPUB).unwrap();
        assert!(!xpub.is_private());
        assert_eq!(xpub.derive_child(1).unwrap().to_string(), M_0H_1_XPUB);
    }

    #[test]
    fn test_hardened_from_public_fails() {
        let xpub = ExtendedKey::from_string(M_XPUB).unwrap();
        assert!(matches!(
            xpub.derive_child(HARDENED_KEY_START),
            Err(PrimitivesError::HardenedFromPublic)
        ));
    }

    #[test]
    fn test_public_key_has_no_private_key() {
        let xpub = ExtendedKey::from_string(M_XPUB).unwrap();
        assert!(matches!(xpub.private_key(), Err(PrimitivesError::NotPrivate)));
        assert_eq!(xpub.public_key(), master().public_key());
    }

    #[test]
    fn test_string_round_trip() {
        for s in [M_XPRV, M_XPUB, M_0H_1_XPRV, M_0H_1_XPUB] {
            let key: ExtendedKey = s.parse().unwrap();
            assert_eq!(key.to_string(), s);
        }
    }

    #[test]
    fn test_testnet_versions() {
        let key = ExtendedKey::from_seed(&hex::decode(SEED_1).unwrap(), Network::Testnet).unwrap();
        assert!(key.to_string().starts_with("tprv"));
        assert!(key.neuter().to_string().starts_with("tpub"));
        let parsed = ExtendedKey::from_string(&key.neuter().to_string()).unwrap();
        assert_eq!(parsed.network(), Network::Testnet);
    }

    #[test]
    fn test_invalid_strings() {
        assert!(ExtendedKey::from_string("").is_err());
        assert!(ExtendedKey::from_string("not-a-key").is_err());
        // Truncated key fails the checksum or length check.
        assert!(ExtendedKey::from_string(&M_XPRV[..M_XPRV.len() - 1]).is_err());
        // A valid Base58Check string of the wrong length.
        assert!(ExtendedKey::from_string("16UwLL9Risc3QfPqBUvKofHmBQ7wMtjvM").is_err());
    }

    #[test]
    fn test_generate_is_seedable() {
        let a = ExtendedKey::generate(&mut StdRng::seed_from_u64(1), Network::Mainnet).unwrap();
        let b = ExtendedKey::generate(&mut StdRng::seed_from_u64(1), Network::Mainnet).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, ExtendedKey::generate(&mut StdRng::seed_from_u64(2), Network::Mainnet).unwrap());
    }
}
