// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::primitives::{keccak256, Address, Bytes, B256, U256};
use alloy::sol_types::SolValue;
use derivative::Derivative;
use gf_events::{CiphertextHandle, SessionId};
use gf_utils::ArcBytes;
use serde::{Deserialize, Serialize};

const INPUT_BINDING_DOMAIN: &[u8] = b"gf:input-binding:v1";

/// Opaque encrypted value. The session core only moves these around and hands them to a
/// [`crate::HomomorphicAdapter`]; it never looks inside.
#[derive(Derivative, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derivative(Debug)]
pub struct Ciphertext(
    #[derivative(Debug(format_with = "gf_utils::formatters::hexf"))] ArcBytes,
);

impl Ciphertext {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(ArcBytes::from_bytes(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_arc_bytes(&self) -> ArcBytes {
        self.0.clone()
    }

    pub fn handle(&self) -> CiphertextHandle {
        CiphertextHandle::of(&self.0)
    }
}

impl From<ArcBytes> for Ciphertext {
    fn from(value: ArcBytes) -> Self {
        Self(value)
    }
}

/// Where a ciphertext is allowed to be spent: one session of one contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputContext {
    pub contract: Address,
    pub session_id: SessionId,
}

impl InputContext {
    pub fn new(contract: Address, session_id: SessionId) -> Self {
        Self {
            contract,
            session_id,
        }
    }
}

/// Evidence supplied with an encrypted input that it was produced for a given
/// contract/session/submitter triple.
#[derive(Derivative, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derivative(Debug)]
pub struct InputProof(
    #[derivative(Debug(format_with = "gf_utils::formatters::hexf"))] ArcBytes,
);

impl InputProof {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(ArcBytes::from_bytes(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Produce the binding proof for `ciphertext` as encrypted by `submitter` for `context`.
    pub fn bind(ciphertext: &Ciphertext, submitter: &Address, context: &InputContext) -> Self {
        let binding = input_binding(ciphertext, submitter, context);
        Self::from_bytes(binding.as_slice())
    }

    /// Whether this proof binds `ciphertext` to `submitter` and `context`.
    pub fn binds(
        &self,
        ciphertext: &Ciphertext,
        submitter: &Address,
        context: &InputContext,
    ) -> bool {
        self.as_bytes() == input_binding(ciphertext, submitter, context).as_slice()
    }
}

/// keccak256(abi.encodePacked(domain, contract, sessionId, submitter, keccak256(ciphertext)))
fn input_binding(ciphertext: &Ciphertext, submitter: &Address, context: &InputContext) -> B256 {
    let encoded = (
        Bytes::from_static(INPUT_BINDING_DOMAIN),
        context.contract,
        U256::from(context.session_id.value()),
        *submitter,
        ciphertext.handle().as_b256(),
    )
        .abi_encode_packed();
    keccak256(encoded)
}
