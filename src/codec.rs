//! Value codecs for the chain's string carrier.
//!
//! Every tier of a chain moves the same carrier type, a serialized string.
//! Domain adapters encode their records into that carrier on the way in and
//! decode on the way out; the [`CacheCodec`] trait makes the serialization
//! backend pluggable.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt::Debug;

use crate::error::Result;

/// Pluggable serialization between domain values and the string carrier.
///
/// Implementations must be `Send + Sync + Debug` so adapters holding them
/// stay usable across async tasks.
pub trait CacheCodec: Send + Sync + Debug {
    /// Serialize a value to the carrier string.
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<String>;

    /// Deserialize a carrier string back to a value.
    fn decode<T: DeserializeOwned>(&self, payload: &str) -> Result<T>;

    /// Codec name, for logs.
    fn name(&self) -> &'static str;
}

/// JSON codec backed by `serde_json`. The default for both adapters.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonCodec;

impl CacheCodec for JsonCodec {
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        Ok(serde_json::to_string(value)?)
    }

    fn decode<T: DeserializeOwned>(&self, payload: &str) -> Result<T> {
        Ok(serde_json::from_str(payload)?)
    }

    fn name(&self) -> &'static str {
        "serde_json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_round_trip() {
        let codec = JsonCodec;
        let encoded = codec.encode(&vec![1_u32, 2, 3]).unwrap();
        let decoded: Vec<u32> = codec.decode(&encoded).unwrap();
        assert_eq!(decoded, vec![1, 2, 3]);
    }

    #[test]
    fn decode_rejects_malformed_payloads() {
        let codec = JsonCodec;
        let err = codec.decode::<Vec<u32>>("not json").unwrap_err();
        assert!(!err.is_not_found());
    }
}
