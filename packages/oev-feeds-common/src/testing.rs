//! Off-chain signing helpers for tests.

use cosmwasm_std::{Binary, HexBinary, Int256};
use k256::ecdsa::SigningKey;

use crate::signature::{
    base_update_digest, bid_digest, dapp_update_digest, signer_id_from_pubkey,
    to_signed_message_hash, OevUpdateContext,
};
use crate::types::{PackedOevUpdateSignature, SignedData};
use crate::value::encode_value;

/// A deterministic secp256k1 key standing in for an off-chain signer.
pub struct TestSigner {
    key: SigningKey,
}

impl TestSigner {
    /// `seed` must be non-zero.
    pub fn new(seed: u8) -> Self {
        let key = SigningKey::from_bytes(&[seed; 32].into()).expect("valid secret key");
        TestSigner { key }
    }

    pub fn id(&self) -> [u8; 20] {
        let point = self.key.verifying_key().to_encoded_point(false);
        signer_id_from_pubkey(point.as_bytes())
    }

    pub fn id_hex(&self) -> HexBinary {
        HexBinary::from(self.id().to_vec())
    }

    /// 65-byte `r || s || v` signature with `v` in `{27, 28}`.
    pub fn sign(&self, digest: &[u8; 32]) -> Vec<u8> {
        let prehash = to_signed_message_hash(digest);
        let (signature, recovery_id) = self
            .key
            .sign_prehash_recoverable(&prehash)
            .expect("signing never fails for a 32-byte prehash");
        let mut out = signature.to_bytes().to_vec();
        out.push(27 + recovery_id.to_byte());
        out
    }

    pub fn sign_base_update(&self, template_id: &[u8; 32], timestamp: u32, data: &[u8]) -> Binary {
        Binary::from(self.sign(&base_update_digest(template_id, timestamp, data)))
    }

    pub fn sign_bid(
        &self,
        chain_id: &str,
        dapp_id: u64,
        updater: &str,
        bid_amount: u128,
        cutoff: u32,
    ) -> Binary {
        Binary::from(self.sign(&bid_digest(chain_id, dapp_id, updater, bid_amount, cutoff)))
    }

    pub fn sign_oev_update(
        &self,
        ctx: &OevUpdateContext,
        template_id: &[u8; 32],
    ) -> PackedOevUpdateSignature {
        PackedOevUpdateSignature {
            airnode: self.id_hex(),
            template_id: HexBinary::from(template_id.to_vec()),
            signature: Binary::from(self.sign(&ctx.member_digest(template_id))),
        }
    }

    /// A dApp overlay entry carrying `value` signed at `timestamp`.
    pub fn signed_data(&self, template_id: &[u8; 32], timestamp: u32, value: i128) -> SignedData {
        let data = encode_value(Int256::from(value));
        SignedData {
            airnode: self.id_hex(),
            template_id: HexBinary::from(template_id.to_vec()),
            timestamp,
            data: Binary::from(data.to_vec()),
            signature: Binary::from(self.sign(&dapp_update_digest(template_id, timestamp, &data))),
        }
    }

    /// A dApp overlay entry where this signer abstains.
    pub fn abstention(&self, template_id: &[u8; 32]) -> SignedData {
        SignedData {
            airnode: self.id_hex(),
            template_id: HexBinary::from(template_id.to_vec()),
            timestamp: 0,
            data: Binary::default(),
            signature: Binary::default(),
        }
    }
}

/// 32-byte `data` for `value`.
pub fn value_data(value: i128) -> Binary {
    Binary::from(encode_value(Int256::from(value)).to_vec())
}
