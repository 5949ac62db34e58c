//! A bidirectional STUN message codec
//! ([RFC5389](https://tools.ietf.org/html/rfc5389)) with support for the
//! attribute extensions of ICE ([RFC8445](https://tools.ietf.org/html/rfc8445))
//! and TURN ([RFC5766](https://tools.ietf.org/html/rfc5766)), plus a G.711
//! μ-law companion codec in [`mulaw`].
//!
//! The codec is a pair of pure functions over byte buffers:
//! [`StunMessage::decode`] turns wire bytes into a structured message and
//! [`StunMessage::encode`] turns a message back into bytes. MESSAGE-INTEGRITY
//! (HMAC-SHA1) and FINGERPRINT (CRC-32) trailers are computed and verified by
//! the codec itself; whether a trailer verified is reported through flags on
//! the message, never as a decode error, so callers stay in charge of policy.
//!
//! There is no connection state and no I/O. The only process-wide data is the
//! fixed attribute [`registry`]; decoding and encoding may run concurrently
//! from any number of threads.
//!
//! # Examples
//!
//! Decoding a Binding request and answering it:
//!
//! ```no_run
//! use stun_wire::{AttributeValue, StunAttribute, StunMessage};
//!
//! # fn handle(packet: &[u8], peer: std::net::SocketAddr) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
//! let request = StunMessage::decode(packet, None)?;
//!
//! let response = StunMessage::create_success_response()
//!     .set_transaction_id(request.transaction_id())
//!     .add_attribute(
//!         StunAttribute::new("xor_mapped_address", AttributeValue::Address(peer)).unwrap(),
//!     )
//!     .set_fingerprint(true);
//!
//! Ok(response.encode()?)
//! # }
//! ```

mod attribute;
mod definitions;
mod header;
mod message;
pub mod mulaw;
pub mod registry;
mod utils;

pub use attribute::{AttributeDecodeError, AttributeEncodeError, AttributeValue, StunAttribute};
pub use definitions::{StunTransactionId, STUN_HEADER_SIZE, STUN_MAGIC_COOKIE_U32};
pub use header::{
    HeaderDecodeError, HeaderEncodeError, StunHeader, StunMessageClass, StunMessageMethod,
};
pub use message::{
    long_term_integrity_key, IntegrityKeyError, MessageDecodeError, MessageEncodeError,
    StunMessage,
};
pub use utils::{check_for_stun_message_header, generate_transaction_id};
