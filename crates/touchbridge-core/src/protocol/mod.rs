//! Protocol module containing inbound event types and the decoder.

pub mod codec;
pub mod messages;

pub use codec::{
    decode_key_message, decode_pointer, encode_key_message, ProtocolError, MAX_SEQUENCE_LEN,
};
pub use messages::*;
