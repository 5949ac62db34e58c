mod decode;
mod encode;
mod errors;
mod message;
mod trailers;

pub use errors::{IntegrityKeyError, MessageDecodeError, MessageEncodeError};
pub use message::StunMessage;
pub use trailers::long_term_integrity_key;
