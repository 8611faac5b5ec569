//! Byte codecs used to dump and load store snapshots.
//!
//! A [`Codec`] turns any serde value into bytes and back. The store only
//! relies on that contract, so the persisted format can be swapped without
//! touching store logic. [`MessagePack`] is the default; [`Json`] is handy
//! for fixtures and debugging.

use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure reported by a codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{codec}: {message}")]
pub struct CodecError {
    /// Name of the codec that failed.
    pub codec: &'static str,
    /// Underlying error message.
    pub message: String,
}

impl CodecError {
    fn new(codec: &'static str, err: impl std::fmt::Display) -> Self {
        Self {
            codec,
            message: err.to_string(),
        }
    }
}

/// Encode/decode capability for structured values.
pub trait Codec: Send + Sync {
    /// Short identifier used in logs and errors.
    fn name(&self) -> &'static str;

    /// Encodes `value` into a byte buffer.
    fn encode<V: Serialize + ?Sized>(&self, value: &V) -> Result<Vec<u8>, CodecError>;

    /// Decodes `bytes` into a typed value.
    fn decode<V: DeserializeOwned>(&self, bytes: &[u8]) -> Result<V, CodecError>;

    /// Checks that `bytes` hold one well-formed value, whatever its shape.
    ///
    /// Lets callers tell unreadable bytes apart from readable bytes of the
    /// wrong shape.
    fn check(&self, bytes: &[u8]) -> Result<(), CodecError> {
        self.decode::<IgnoredAny>(bytes).map(|_| ())
    }
}

/// MessagePack encoding via `rmp-serde`.
///
/// Structs are written as maps keyed by field name, so buffers are
/// self-describing and tolerate field reordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessagePack;

impl Codec for MessagePack {
    fn name(&self) -> &'static str {
        "msgpack"
    }

    fn encode<V: Serialize + ?Sized>(&self, value: &V) -> Result<Vec<u8>, CodecError> {
        rmp_serde::to_vec_named(value).map_err(|e| CodecError::new(self.name(), e))
    }

    /// Decodes exactly one value; leftover bytes are an error.
    fn decode<V: DeserializeOwned>(&self, bytes: &[u8]) -> Result<V, CodecError> {
        let mut rest = bytes;
        let value = {
            let mut de = rmp_serde::Deserializer::new(&mut rest);
            V::deserialize(&mut de).map_err(|e| CodecError::new(self.name(), e))?
        };
        if !rest.is_empty() {
            return Err(CodecError::new(
                self.name(),
                format!("{} trailing bytes after value", rest.len()),
            ));
        }
        Ok(value)
    }
}

/// JSON encoding via `serde_json`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Json;

impl Codec for Json {
    fn name(&self) -> &'static str {
        "json"
    }

    fn encode<V: Serialize + ?Sized>(&self, value: &V) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec(value).map_err(|e| CodecError::new(self.name(), e))
    }

    fn decode<V: DeserializeOwned>(&self, bytes: &[u8]) -> Result<V, CodecError> {
        serde_json::from_slice(bytes).map_err(|e| CodecError::new(self.name(), e))
    }
}
