use crate::definitions::StunTransactionId;
use crate::header::StunHeader;
use rand::Rng;
use std::io::Cursor;

/// Checks whether a byte sequence starts with a plausible STUN message header.
///
/// Useful for demultiplexing STUN from other protocols sharing a port: only
/// the first 20 bytes are inspected, and a header is returned when the
/// marker bits and magic cookie check out.
pub fn check_for_stun_message_header(data_bytes: &[u8]) -> Option<StunHeader> {
    StunHeader::decode(&mut Cursor::new(data_bytes)).ok()
}

/// Picks a fresh 96-bit transaction id.
///
/// [RFC5389 Section 3](https://tools.ietf.org/html/rfc5389#section-3) wants
/// ids chosen uniformly at random over the whole range; messages built
/// without an explicit id get one from here.
pub fn generate_transaction_id() -> StunTransactionId {
    let mut rng = rand::thread_rng();
    let buf: StunTransactionId = rng.gen();

    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::{StunMessageClass, StunMessageMethod};

    #[test]
    fn recognizes_a_stun_header_in_a_longer_stream() {
        let mut stream = vec![0x00, 0x01, 0x00, 0x00, 0x21, 0x12, 0xa4, 0x42];
        stream.extend_from_slice(&[0x42; 12]);
        stream.extend_from_slice(b"trailing payload");

        let header = check_for_stun_message_header(&stream).unwrap();
        assert_eq!(header.message_class, StunMessageClass::Request);
        assert_eq!(header.message_method, StunMessageMethod::Binding);
        assert_eq!(header.transaction_id, [0x42; 12]);
    }

    #[test]
    fn rejects_non_stun_traffic() {
        assert!(check_for_stun_message_header(b"GET / HTTP/1.1\r\nHost: a\r\n\r\n").is_none());
        assert!(check_for_stun_message_header(&[]).is_none());
    }
}
