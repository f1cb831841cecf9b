use sha2::{Digest, Sha256};

/// `beacon_id = sha256(signer_id || template_id)`
pub fn derive_beacon_id(airnode: &[u8; 20], template_id: &[u8; 32]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(airnode);
    hasher.update(template_id);
    hasher.finalize().into()
}

/// `beacon_set_id = sha256(beacon_id_0 || beacon_id_1 || ...)`
///
/// Member order is part of the identity.
pub fn derive_beacon_set_id(beacon_ids: &[[u8; 32]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for id in beacon_ids {
        hasher.update(id);
    }
    hasher.finalize().into()
}

/// True for the all-zero 32-byte id, used to clear name bindings.
pub fn is_zero_id(id: &[u8; 32]) -> bool {
    id.iter().all(|b| *b == 0)
}
