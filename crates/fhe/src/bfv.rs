// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{Ciphertext, Encryptor, HomomorphicAdapter, InputContext, InputProof};
use alloy::primitives::Address;
use anyhow::{anyhow, Context, Result};
use fhe::bfv::{
    BfvParameters, BfvParametersBuilder, Ciphertext as BfvCiphertext, Encoding, Plaintext,
    PublicKey,
};
use fhe_traits::{DeserializeParametrized, FheEncoder, FheEncrypter, Serialize};
use rand::thread_rng;
use std::sync::Arc;

/// BFV parameter set description. Kept separate from [`BfvParameters`] so it can come from
/// configuration.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BfvParamSet {
    pub degree: usize,
    pub plaintext_modulus: u64,
    pub moduli: Vec<u64>,
}

impl BfvParamSet {
    /// Small insecure parameters suitable for tests and local runs. DO NOT USE IN PRODUCTION
    pub fn insecure_512() -> Self {
        Self {
            degree: 512,
            plaintext_modulus: 1032193,
            moduli: vec![0xffffee001, 0xffffc4001],
        }
    }

    pub fn build(&self) -> Result<Arc<BfvParameters>> {
        BfvParametersBuilder::new()
            .set_degree(self.degree)
            .set_plaintext_modulus(self.plaintext_modulus)
            .set_moduli(&self.moduli)
            .build_arc()
            .map_err(|e| anyhow!("Failed to build BFV parameters: {e}"))
    }
}

impl Default for BfvParamSet {
    fn default() -> Self {
        Self::insecure_512()
    }
}

/// Accumulates BFV ciphertexts with ciphertext-level addition.
#[derive(Clone)]
pub struct BfvAdapter {
    params: Arc<BfvParameters>,
}

impl BfvAdapter {
    pub fn new(params: Arc<BfvParameters>) -> Self {
        Self { params }
    }

    pub fn from_param_set(set: &BfvParamSet) -> Result<Self> {
        Ok(Self::new(set.build()?))
    }

    pub fn params(&self) -> Arc<BfvParameters> {
        self.params.clone()
    }

    fn decode(&self, ciphertext: &Ciphertext) -> Result<BfvCiphertext> {
        BfvCiphertext::from_bytes(ciphertext.as_bytes(), &self.params)
            .map_err(|e| anyhow!("Error deserializing ciphertext: {e}"))
    }
}

impl HomomorphicAdapter for BfvAdapter {
    fn name(&self) -> &'static str {
        "bfv"
    }

    fn validate(
        &self,
        ciphertext: &Ciphertext,
        proof: &InputProof,
        submitter: &Address,
        context: &InputContext,
    ) -> Result<bool> {
        self.decode(ciphertext)?;
        Ok(proof.binds(ciphertext, submitter, context))
    }

    fn add(&self, lhs: &Ciphertext, rhs: &Ciphertext) -> Result<Ciphertext> {
        let mut sum = self.decode(lhs).context("left operand")?;
        let rhs = self.decode(rhs).context("right operand")?;
        sum += &rhs;
        Ok(Ciphertext::from_bytes(&sum.to_bytes()))
    }
}

/// Client side BFV encryption under a public key.
pub struct BfvEncryptor {
    params: Arc<BfvParameters>,
    public_key: PublicKey,
}

impl BfvEncryptor {
    pub fn new(params: Arc<BfvParameters>, public_key: PublicKey) -> Self {
        Self { params, public_key }
    }

    pub fn from_bytes(params: Arc<BfvParameters>, public_key: &[u8]) -> Result<Self> {
        let public_key = PublicKey::from_bytes(public_key, &params)
            .map_err(|e| anyhow!("Error deserializing public key: {e}"))?;
        Ok(Self::new(params, public_key))
    }
}

impl Encryptor for BfvEncryptor {
    fn encrypt(&self, value: u64) -> Result<Ciphertext> {
        let pt = Plaintext::try_encode(&[value], Encoding::poly(), &self.params)
            .map_err(|e| anyhow!("Error encoding plaintext: {e}"))?;
        let ct = self
            .public_key
            .try_encrypt(&pt, &mut thread_rng())
            .map_err(|e| anyhow!("Error encrypting data: {e}"))?;
        Ok(Ciphertext::from_bytes(&ct.to_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fhe::bfv::SecretKey;
    use fhe_traits::{FheDecoder, FheDecrypter};
    use gf_events::SessionId;

    fn decrypt(params: &Arc<BfvParameters>, sk: &SecretKey, ct: &Ciphertext) -> u64 {
        let ct = BfvCiphertext::from_bytes(ct.as_bytes(), params).unwrap();
        let pt = sk.try_decrypt(&ct).unwrap();
        Vec::<u64>::try_decode(&pt, Encoding::poly()).unwrap()[0]
    }

    #[test]
    fn sums_encrypted_scores() -> Result<()> {
        let params = BfvParamSet::insecure_512().build()?;
        let mut rng = thread_rng();
        let sk = SecretKey::random(&params, &mut rng);
        let pk = PublicKey::new(&sk, &mut rng);
        let encryptor = BfvEncryptor::new(params.clone(), pk);
        let adapter = BfvAdapter::new(params.clone());

        let mut total = encryptor.encrypt(8)?;
        for score in [9, 7, 10, 6] {
            total = adapter.add(&total, &encryptor.encrypt(score)?)?;
        }

        assert_eq!(decrypt(&params, &sk, &total), 40);
        Ok(())
    }

    #[test]
    fn validates_binding_and_encoding() -> Result<()> {
        let params = BfvParamSet::insecure_512().build()?;
        let mut rng = thread_rng();
        let sk = SecretKey::random(&params, &mut rng);
        let encryptor = BfvEncryptor::new(params.clone(), PublicKey::new(&sk, &mut rng));
        let adapter = BfvAdapter::new(params);
        let alice = Address::repeat_byte(0xa1);
        let ctx = InputContext::new(Address::repeat_byte(0xcc), SessionId::new(2));

        let ct = encryptor.encrypt(5)?;
        let proof = InputProof::bind(&ct, &alice, &ctx);
        assert!(adapter.validate(&ct, &proof, &alice, &ctx)?);
        assert!(!adapter.validate(&ct, &proof, &Address::repeat_byte(0xb0), &ctx)?);

        let junk = Ciphertext::from_bytes(&[0xff; 16]);
        let junk_proof = InputProof::bind(&junk, &alice, &ctx);
        assert!(adapter.validate(&junk, &junk_proof, &alice, &ctx).is_err());
        Ok(())
    }
}
