use cosmwasm_std::Api;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Prepended to every digest before it is signed or recovered.
const SIGNED_MESSAGE_PREFIX: &[u8] = b"\x19OEV Feeds Signed Message:\n32";

#[derive(Error, Debug, PartialEq)]
pub enum SignatureError {
    #[error("invalid signature length: expected 65 bytes, got {got}")]
    InvalidLength { got: usize },

    #[error("invalid recovery byte {v}")]
    InvalidRecoveryByte { v: u8 },

    #[error("public key recovery failed")]
    RecoveryFailed,
}

/// `sha256(prefix || digest)`
pub fn to_signed_message_hash(digest: &[u8; 32]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(SIGNED_MESSAGE_PREFIX);
    hasher.update(digest);
    hasher.finalize().into()
}

/// Last 20 bytes of `sha256(x || y)` for an uncompressed SEC1 public key.
pub fn signer_id_from_pubkey(pubkey: &[u8]) -> [u8; 20] {
    let body = match pubkey.first() {
        Some(0x04) => &pubkey[1..],
        _ => pubkey,
    };
    let hash: [u8; 32] = Sha256::digest(body).into();
    let mut id = [0u8; 20];
    id.copy_from_slice(&hash[12..]);
    id
}

/// Recovers the signer id of a 65-byte `r || s || v` signature over `digest`.
pub fn recover_signer(
    api: &dyn Api,
    digest: &[u8; 32],
    signature: &[u8],
) -> Result<[u8; 20], SignatureError> {
    if signature.len() != 65 {
        return Err(SignatureError::InvalidLength {
            got: signature.len(),
        });
    }
    let v = signature[64];
    let recovery_param = match v {
        0 | 1 => v,
        27 | 28 => v - 27,
        _ => return Err(SignatureError::InvalidRecoveryByte { v }),
    };
    let message_hash = to_signed_message_hash(digest);
    let pubkey = api
        .secp256k1_recover_pubkey(&message_hash, &signature[..64], recovery_param)
        .map_err(|_| SignatureError::RecoveryFailed)?;
    Ok(signer_id_from_pubkey(&pubkey))
}

/// Variable-length strings enter hashes as their digest.
fn string_digest(s: &str) -> [u8; 32] {
    Sha256::digest(s.as_bytes()).into()
}

/// Digest signed for a direct Beacon update:
/// `sha256(template_id || timestamp || data)`
pub fn base_update_digest(template_id: &[u8; 32], timestamp: u32, data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(template_id);
    hasher.update(timestamp.to_be_bytes());
    hasher.update(data);
    hasher.finalize().into()
}

/// Digest signed for a dApp overlay update:
/// `sha256(sha256(template_id) || timestamp || data)`
///
/// Never equal to `base_update_digest` of the same inputs.
pub fn dapp_update_digest(template_id: &[u8; 32], timestamp: u32, data: &[u8]) -> [u8; 32] {
    let template_hash: [u8; 32] = Sha256::digest(template_id).into();
    let mut hasher = Sha256::new();
    hasher.update(template_hash);
    hasher.update(timestamp.to_be_bytes());
    hasher.update(data);
    hasher.finalize().into()
}

/// Digest an auctioneer signs to award a bid:
/// `sha256(chain_id || dapp_id || updater || bid_amount || cutoff)`
pub fn bid_digest(
    chain_id: &str,
    dapp_id: u64,
    updater: &str,
    bid_amount: u128,
    signed_data_timestamp_cutoff: u32,
) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(string_digest(chain_id));
    hasher.update(dapp_id.to_be_bytes());
    hasher.update(string_digest(updater));
    hasher.update(bid_amount.to_be_bytes());
    hasher.update(signed_data_timestamp_cutoff.to_be_bytes());
    hasher.finalize().into()
}

/// Call context a legacy OEV update signature commits to.
#[derive(Debug, Clone)]
pub struct OevUpdateContext<'a> {
    pub chain_id: &'a str,
    pub store: &'a str,
    pub oev_proxy: &'a str,
    pub data_feed_id: &'a [u8; 32],
    pub update_id: &'a [u8; 32],
    pub timestamp: u32,
    pub data: &'a [u8],
    pub updater: &'a str,
    pub payment: u128,
}

impl OevUpdateContext<'_> {
    pub fn update_hash(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(string_digest(self.chain_id));
        hasher.update(string_digest(self.store));
        hasher.update(string_digest(self.oev_proxy));
        hasher.update(self.data_feed_id);
        hasher.update(self.update_id);
        hasher.update(self.timestamp.to_be_bytes());
        hasher.update(self.data);
        hasher.update(string_digest(self.updater));
        hasher.update(self.payment.to_be_bytes());
        hasher.finalize().into()
    }

    /// `sha256(update_hash || template_id)`, signed by each member.
    pub fn member_digest(&self, template_id: &[u8; 32]) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(self.update_hash());
        hasher.update(template_id);
        hasher.finalize().into()
    }
}
