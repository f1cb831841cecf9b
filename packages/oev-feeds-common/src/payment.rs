use cosmwasm_std::{MessageInfo, Uint128};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum PaymentError {
    #[error("must send {expected} as payment, got {denom}")]
    WrongDenom { expected: String, denom: String },
}

/// Amount of `denom` attached to the call. Zero when nothing is attached,
/// an error when any other denomination is sent.
pub fn attached_payment(info: &MessageInfo, denom: &str) -> Result<Uint128, PaymentError> {
    let mut amount = Uint128::zero();
    for coin in &info.funds {
        if coin.denom != denom {
            return Err(PaymentError::WrongDenom {
                expected: denom.to_string(),
                denom: coin.denom.clone(),
            });
        }
        amount += coin.amount;
    }
    Ok(amount)
}
