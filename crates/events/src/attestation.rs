// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Signed decryption results.
//!
//! The decryption service reports a revealed total as a [`DecryptionAttestation`]: an ECDSA
//! signature over the canonical encoding of a [`DecryptionPayload`]. The payload names the
//! contract, session, request and ciphertext handle it answers, so a signature produced for
//! one request cannot be replayed against another.

use crate::{CiphertextHandle, SessionId};
use alloy::primitives::{keccak256, Address, Signature, U256};
use alloy::signers::{local::PrivateKeySigner, SignerSync};
use alloy::sol_types::SolValue;
use anyhow::{anyhow, Result};
use derivative::Derivative;
use gf_utils::ArcBytes;
use serde::{Deserialize, Serialize};

/// What the decryption service vouches for.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DecryptionPayload {
    /// Contract context the ciphertext was accumulated under.
    pub contract: Address,
    pub session_id: SessionId,
    /// Request this result answers.
    pub request_id: u64,
    /// Handle of the ciphertext that was decrypted.
    pub handle: CiphertextHandle,
    /// Revealed cleartext total.
    pub total: u64,
}

impl DecryptionPayload {
    /// keccak256(abi.encodePacked(contract, sessionId, requestId, handle, total))
    pub fn digest(&self) -> [u8; 32] {
        let encoded = (
            self.contract,
            U256::from(self.session_id.value()),
            U256::from(self.request_id),
            self.handle.as_b256(),
            U256::from(self.total),
        )
            .abi_encode_packed();

        keccak256(&encoded).into()
    }
}

/// Signed wrapper around a [`DecryptionPayload`]. The signature is an EIP-191 personal message
/// signature over the payload digest.
#[derive(Derivative, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derivative(Debug)]
pub struct DecryptionAttestation {
    pub payload: DecryptionPayload,
    /// 65-byte ECDSA signature (r ‖ s ‖ v)
    #[derivative(Debug(format_with = "gf_utils::formatters::hexf"))]
    pub signature: ArcBytes,
}

impl DecryptionAttestation {
    pub fn sign(payload: DecryptionPayload, signer: &PrivateKeySigner) -> Result<Self> {
        let digest = payload.digest();
        let sig = signer
            .sign_message_sync(&digest)
            .map_err(|e| anyhow!("Failed to sign decryption payload: {e}"))?;

        Ok(Self {
            payload,
            signature: ArcBytes::from_bytes(&sig.as_bytes()),
        })
    }

    /// Recover the address that produced this signature.
    pub fn recover_signer(&self) -> Result<Address> {
        let sig = Signature::try_from(&self.signature[..])
            .map_err(|e| anyhow!("Invalid signature: {e}"))?;

        let digest = self.payload.digest();
        sig.recover_address_from_msg(&digest)
            .map_err(|e| anyhow!("Failed to recover signer address: {e}"))
    }

    /// Whether the recovered signer is `expected`. Malformed signatures count as a mismatch.
    pub fn is_signed_by(&self, expected: &Address) -> bool {
        matches!(self.recover_signer(), Ok(recovered) if recovered == *expected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_signer() -> PrivateKeySigner {
        "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"
            .parse()
            .unwrap()
    }

    fn test_payload() -> DecryptionPayload {
        DecryptionPayload {
            contract: Address::repeat_byte(0xcc),
            session_id: SessionId::new(4),
            request_id: 1,
            handle: CiphertextHandle::of(&[1, 2, 3]),
            total: 40,
        }
    }

    #[test]
    fn sign_and_recover() {
        let signer = test_signer();
        let signed = DecryptionAttestation::sign(test_payload(), &signer).unwrap();
        assert_eq!(signed.recover_signer().unwrap(), signer.address());
        assert!(signed.is_signed_by(&signer.address()));
    }

    #[test]
    fn other_signers_do_not_match() {
        let signed = DecryptionAttestation::sign(test_payload(), &test_signer()).unwrap();
        assert!(!signed.is_signed_by(&PrivateKeySigner::random().address()));
    }

    #[test]
    fn tampered_total_breaks_the_signature() {
        let signer = test_signer();
        let mut signed = DecryptionAttestation::sign(test_payload(), &signer).unwrap();
        signed.payload.total = 41;
        assert!(!signed.is_signed_by(&signer.address()));
    }

    #[test]
    fn garbage_signature_is_rejected() {
        let mut signed = DecryptionAttestation::sign(test_payload(), &test_signer()).unwrap();
        signed.signature = ArcBytes::from_bytes(&[0u8; 12]);
        assert!(signed.recover_signer().is_err());
        assert!(!signed.is_signed_by(&test_signer().address()));
    }

    #[test]
    fn digest_binds_every_field() {
        let base = test_payload();
        let mut other = base.clone();
        other.request_id = 2;
        assert_ne!(base.digest(), other.digest());
        let mut other = base.clone();
        other.session_id = SessionId::new(5);
        assert_ne!(base.digest(), other.digest());
    }
}
