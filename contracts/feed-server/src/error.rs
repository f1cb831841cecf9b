use cosmwasm_std::StdError;
use oev_feeds_common::{AggregationError, PaymentError, ValueError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Value(#[from] ValueError),

    #[error("{0}")]
    Payment(#[from] PaymentError),

    #[error("{0}")]
    Aggregation(#[from] AggregationError),

    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("Signature mismatch")]
    SignatureMismatch,

    #[error("Timestamp not valid")]
    TimestampNotValid,

    #[error("Does not update timestamp")]
    DoesNotUpdateTimestamp,

    #[error("Specified less than two Beacons")]
    LessThanTwoBeacons,

    #[error("Does not update Beacon set")]
    DoesNotUpdateBeaconSet,

    #[error("dAPI name zero")]
    DapiNameZero,

    #[error("dAPI name longer than 32 bytes ({len})")]
    DapiNameTooLong { len: usize },

    #[error("Specified no signatures")]
    NoSignatures,

    #[error("Beacon ID mismatch")]
    BeaconIdMismatch,

    #[error("Beacon set ID mismatch")]
    BeaconSetIdMismatch,

    #[error("Missing signature")]
    MissingSignature,

    #[error("Not enough signatures")]
    NotEnoughSignatures,

    #[error("Beneficiary address zero")]
    BeneficiaryAddressZero,

    #[error("OEV proxy balance zero")]
    OevProxyBalanceZero,

    #[error("Withdrawal reverted")]
    WithdrawalReverted,
}
