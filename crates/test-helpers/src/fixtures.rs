// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use anyhow::{anyhow, Result};
use fhe::bfv::{BfvParameters, PublicKey, SecretKey};
use gf_fhe::{BfvEncryptor, BfvParamSet, Ciphertext, Encryptor, PlaintextAdapter};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::sync::Arc;

/// Well known development keys (the default anvil/hardhat accounts).
const DEV_KEYS: [&str; 4] = [
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
    "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d",
    "0x5de4111afa1a4b94908f83103eb1f1706367c2e68ca870fc3fb9a804cdab365a",
    "0x7c852118294e51e653712a81e05800f5f8cf9d08c46fb0c3f0ea8d7e05e1e5d1",
];

/// Deterministic signer for index `n` (0..4).
pub fn dev_signer(n: usize) -> Result<PrivateKeySigner> {
    let key = DEV_KEYS
        .get(n)
        .ok_or_else(|| anyhow!("No development key at index {n}"))?;
    Ok(key.parse()?)
}

/// Signer the local decryption oracle uses unless told otherwise.
pub fn oracle_signer() -> Result<PrivateKeySigner> {
    dev_signer(1)
}

/// Distinct participant address for `n`.
pub fn member(n: u8) -> Address {
    let mut bytes = [0u8; 20];
    bytes[0] = 0xf0;
    bytes[19] = n;
    Address::from(bytes)
}

/// BFV key material generated from a fixed seed.
pub struct BfvFixture {
    pub params: Arc<BfvParameters>,
    pub secret_key: SecretKey,
    pub public_key: PublicKey,
}

impl BfvFixture {
    pub fn generate(param_set: &BfvParamSet, seed: u64) -> Result<Self> {
        let params = param_set.build()?;
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let secret_key = SecretKey::random(&params, &mut rng);
        let public_key = PublicKey::new(&secret_key, &mut rng);
        Ok(Self {
            params,
            secret_key,
            public_key,
        })
    }
}

/// Participant side encryption for whichever scheme a system runs.
pub enum SchemeEncryptor {
    Plaintext(PlaintextAdapter),
    Bfv(BfvEncryptor),
}

impl Encryptor for SchemeEncryptor {
    fn encrypt(&self, value: u64) -> Result<Ciphertext> {
        match self {
            SchemeEncryptor::Plaintext(inner) => inner.encrypt(value),
            SchemeEncryptor::Bfv(inner) => inner.encrypt(value),
        }
    }
}
