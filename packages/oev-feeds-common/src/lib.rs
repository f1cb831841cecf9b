pub mod aggregation;
pub mod collaborators;
pub mod feed_id;
pub mod payment;
pub mod signature;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod types;
pub mod value;

pub use aggregation::{aggregate, average, median, AggregationError};
pub use feed_id::{derive_beacon_id, derive_beacon_set_id};
pub use payment::{attached_payment, PaymentError};
pub use signature::{recover_signer, SignatureError};
pub use types::{DataFeed, PackedOevUpdateSignature, SignedData};
pub use value::{decode_value, timestamp_is_valid, ValueError};
