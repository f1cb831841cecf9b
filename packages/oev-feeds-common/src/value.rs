use cosmwasm_std::Int256;
use thiserror::Error;

/// Signed data may be timestamped at most this far past the block time.
pub const TIMESTAMP_VALIDITY_WINDOW_SECS: u64 = 60 * 60;

/// 2^223 - 1
pub const INT224_MAX: Int256 = Int256::from_be_bytes(int224_max_bytes());
/// -2^223
pub const INT224_MIN: Int256 = Int256::from_be_bytes(int224_min_bytes());

const fn int224_max_bytes() -> [u8; 32] {
    let mut bytes = [0xffu8; 32];
    bytes[0] = 0;
    bytes[1] = 0;
    bytes[2] = 0;
    bytes[3] = 0;
    bytes[4] = 0x7f;
    bytes
}

const fn int224_min_bytes() -> [u8; 32] {
    let mut bytes = [0u8; 32];
    bytes[0] = 0xff;
    bytes[1] = 0xff;
    bytes[2] = 0xff;
    bytes[3] = 0xff;
    bytes[4] = 0x80;
    bytes
}

#[derive(Error, Debug, PartialEq)]
pub enum ValueError {
    #[error("Data length not correct")]
    DataLength,

    #[error("Value typecasting error")]
    Typecast,
}

/// Decodes a 32-byte big-endian two's-complement value that must fit in 224 bits.
pub fn decode_value(data: &[u8]) -> Result<Int256, ValueError> {
    let bytes: [u8; 32] = data.try_into().map_err(|_| ValueError::DataLength)?;
    let value = Int256::from_be_bytes(bytes);
    if value > INT224_MAX || value < INT224_MIN {
        return Err(ValueError::Typecast);
    }
    Ok(value)
}

/// Inverse of [`decode_value`], used by signers to build `data`.
pub fn encode_value(value: Int256) -> [u8; 32] {
    value.to_be_bytes()
}

/// `0 < timestamp <= now + 1h`
pub fn timestamp_is_valid(timestamp: u32, now_seconds: u64) -> bool {
    timestamp != 0 && u64::from(timestamp) <= now_seconds + TIMESTAMP_VALIDITY_WINDOW_SECS
}

/// Latest cut-off a bid placed at `now_seconds` may authorize.
pub fn max_cutoff(now_seconds: u64) -> u32 {
    u32::try_from(now_seconds + TIMESTAMP_VALIDITY_WINDOW_SECS).unwrap_or(u32::MAX)
}
