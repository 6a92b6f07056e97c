// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::{anyhow, bail, Result};
use fhe::bfv::{BfvParameters, Ciphertext as BfvCiphertext, Encoding, SecretKey};
use fhe_traits::{DeserializeParametrized, FheDecoder, FheDecrypter};
use gf_fhe::{Ciphertext, PlaintextAdapter};
use std::sync::Arc;

/// Reveals the cleartext behind an accumulated score.
pub trait Decryptor: Send + Sync + 'static {
    fn decrypt(&self, ciphertext: &Ciphertext) -> Result<u64>;
}

/// Counterpart of [`PlaintextAdapter`].
#[derive(Clone, Debug, Default)]
pub struct PlaintextDecryptor;

impl Decryptor for PlaintextDecryptor {
    fn decrypt(&self, ciphertext: &Ciphertext) -> Result<u64> {
        PlaintextAdapter::decode(ciphertext)
    }
}

/// Holds the BFV secret key matching the public key scores were encrypted under.
pub struct BfvDecryptor {
    params: Arc<BfvParameters>,
    secret_key: SecretKey,
}

impl BfvDecryptor {
    pub fn new(params: Arc<BfvParameters>, secret_key: SecretKey) -> Self {
        Self { params, secret_key }
    }
}

impl Decryptor for BfvDecryptor {
    fn decrypt(&self, ciphertext: &Ciphertext) -> Result<u64> {
        let ct = BfvCiphertext::from_bytes(ciphertext.as_bytes(), &self.params)
            .map_err(|e| anyhow!("Error deserializing ciphertext: {e}"))?;
        let pt = self
            .secret_key
            .try_decrypt(&ct)
            .map_err(|e| anyhow!("Error decrypting ciphertext: {e}"))?;
        let decoded = Vec::<u64>::try_decode(&pt, Encoding::poly())
            .map_err(|e| anyhow!("Error decoding plaintext: {e}"))?;
        let Some(total) = decoded.first() else {
            bail!("Decrypted plaintext is empty");
        };
        Ok(*total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fhe::bfv::PublicKey;
    use gf_fhe::{BfvAdapter, BfvEncryptor, BfvParamSet, Encryptor, HomomorphicAdapter};
    use rand::thread_rng;

    #[test]
    fn decrypts_bfv_sums() -> Result<()> {
        let params = BfvParamSet::insecure_512().build()?;
        let mut rng = thread_rng();
        let sk = SecretKey::random(&params, &mut rng);
        let encryptor = BfvEncryptor::new(params.clone(), PublicKey::new(&sk, &mut rng));
        let adapter = BfvAdapter::new(params.clone());

        let total = adapter.add(&encryptor.encrypt(21)?, &encryptor.encrypt(19)?)?;
        assert_eq!(BfvDecryptor::new(params, sk).decrypt(&total)?, 40);
        Ok(())
    }

    #[test]
    fn plaintext_decryptor_reads_le_bytes() -> Result<()> {
        assert_eq!(
            PlaintextDecryptor.decrypt(&PlaintextAdapter::encode(13))?,
            13
        );
        assert!(PlaintextDecryptor
            .decrypt(&Ciphertext::from_bytes(&[1]))
            .is_err());
        Ok(())
    }
}
