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

    #[error("reentrant call")]
    ReentrantCall,

    #[error("dApp ID zero")]
    DappIdZero,

    #[error("Cut-off zero")]
    CutoffZero,

    #[error("Cut-off too far in the future")]
    CutoffTooFarInFuture,

    #[error("Signature mismatch")]
    SignatureMismatch,

    #[error("Cut-off not more recent")]
    CutoffNotMoreRecent,

    #[error("OEV bid payment amount short")]
    BidPaymentShort,

    #[error("Sender not last bid updater")]
    SenderNotLastBidUpdater,

    #[error("Signed data empty")]
    SignedDataEmpty,

    #[error("Timestamp exceeds cut-off")]
    TimestampExceedsCutoff,

    #[error("Does not update timestamp")]
    DoesNotUpdateTimestamp,

    #[error("Does not update Beacon set")]
    DoesNotUpdateBeaconSet,

    #[error("Recipient address zero")]
    RecipientAddressZero,

    #[error("Amount zero")]
    AmountZero,

    #[error("Withdrawal reverted")]
    WithdrawalReverted,

    #[error("unknown reply id {id}")]
    UnknownReplyId { id: u64 },
}
