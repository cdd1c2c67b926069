//! On-chain publication tuple for the aura oracle
//!
//! The oracle contract exposes `pushAura(address vault, uint256 aura, string ipfsHash)`.
//! Signing and submission belong to an external signer; this module only
//! produces the tuple and its ABI-encoded calldata.

use auravault_common::{format_address, Address, AuraScore, U256};
use keccak_hash::keccak;
use serde::{Serialize, Serializer};

/// Solidity signature of the oracle update
pub const PUSH_AURA_SIGNATURE: &str = "pushAura(address,uint256,string)";

const WORD: usize = 32;

/// `(vault, aura, evidence)` as pushed to the oracle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuraUpdate {
    #[serde(serialize_with = "serialize_address")]
    pub vault: Address,
    pub aura: AuraScore,
    pub evidence_hash: String,
}

fn serialize_address<S: Serializer>(address: &Address, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_address(address))
}

/// First four bytes of the keccak-256 of a function signature
pub fn function_selector(signature: &str) -> [u8; 4] {
    let hash = keccak(signature.as_bytes());
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&hash.as_bytes()[..4]);
    selector
}

impl AuraUpdate {
    pub fn new(vault: Address, aura: AuraScore, evidence_hash: impl Into<String>) -> Self {
        Self {
            vault,
            aura,
            evidence_hash: evidence_hash.into(),
        }
    }

    /// ABI-encoded `pushAura` call
    ///
    /// Layout: selector, address word, uint256 word, offset of the string
    /// (three head words), string length, string bytes right-padded to a word.
    pub fn encode_calldata(&self) -> Vec<u8> {
        let evidence = self.evidence_hash.as_bytes();
        let padded_len = evidence.len().div_ceil(WORD) * WORD;

        let mut data = Vec::with_capacity(4 + WORD * 4 + padded_len);
        data.extend_from_slice(&function_selector(PUSH_AURA_SIGNATURE));

        let mut vault_word = [0u8; WORD];
        vault_word[12..].copy_from_slice(self.vault.as_bytes());
        data.extend_from_slice(&vault_word);

        data.extend_from_slice(&uint_word(U256::from(self.aura.value())));
        data.extend_from_slice(&uint_word(U256::from(3 * WORD)));
        data.extend_from_slice(&uint_word(U256::from(evidence.len())));

        data.extend_from_slice(evidence);
        data.resize(4 + WORD * 4 + padded_len, 0);
        data
    }

    /// `0x`-prefixed hex calldata
    pub fn calldata_hex(&self) -> String {
        format!("0x{}", hex::encode(self.encode_calldata()))
    }
}

fn uint_word(value: U256) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    value.to_big_endian(&mut word);
    word
}
