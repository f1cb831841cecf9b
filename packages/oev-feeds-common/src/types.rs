use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Binary, HexBinary, Int256};

/// A stored feed reading. A zero timestamp means the feed was never written.
#[cw_serde]
#[derive(Copy)]
pub struct DataFeed {
    pub value: Int256,
    pub timestamp: u32,
}

impl DataFeed {
    pub const fn uninitialized() -> Self {
        DataFeed {
            value: Int256::zero(),
            timestamp: 0,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.timestamp != 0
    }
}

/// A signed observation submitted for a dApp overlay update.
/// An empty `signature` marks the member as abstaining.
#[cw_serde]
pub struct SignedData {
    /// 20-byte signer id
    pub airnode: HexBinary,
    /// 32-byte template id
    pub template_id: HexBinary,
    pub timestamp: u32,
    /// 32-byte big-endian two's-complement value
    pub data: Binary,
    /// 65-byte `r || s || v` signature, empty to abstain
    pub signature: Binary,
}

impl SignedData {
    pub fn is_abstention(&self) -> bool {
        self.signature.is_empty()
    }
}

/// One member's signature over a legacy OEV proxy update.
#[cw_serde]
pub struct PackedOevUpdateSignature {
    pub airnode: HexBinary,
    pub template_id: HexBinary,
    pub signature: Binary,
}
