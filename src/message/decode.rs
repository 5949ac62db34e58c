use byteorder::{ByteOrder, NetworkEndian};
use std::io::Cursor;

use super::errors::MessageDecodeError;
use super::message::StunMessage;
use super::trailers;

use crate::attribute::decode_attribute_stream;
use crate::definitions::{
    STUN_FINGERPRINT_ATTR_SIZE, STUN_HEADER_SIZE, STUN_INTEGRITY_ATTR_SIZE,
    STUN_INTEGRITY_HMAC_SIZE,
};
use crate::registry::{ATTR_FINGERPRINT, ATTR_MESSAGE_INTEGRITY};
use crate::StunHeader;

impl StunMessage {
    /// Decodes and returns the STUN message
    ///
    /// Arguments:
    ///
    /// * `bytes`: binary encoded message to decode from
    /// * `key`: optional opaque key used for MESSAGE-INTEGRITY verification.
    ///   For long-term credentials derive it with
    ///   [`long_term_integrity_key`](crate::long_term_integrity_key).
    ///
    /// A FINGERPRINT trailer is verified and stripped first (its CRC covers
    /// the MESSAGE-INTEGRITY trailer when both are present), then a
    /// MESSAGE-INTEGRITY trailer whenever a key is supplied. Verification
    /// failures are not errors: they leave the corresponding flag cleared and
    /// the unverified trailer in place, where it decodes as a raw attribute.
    /// The caller is responsible for refusing to act on unauthenticated
    /// messages.
    pub fn decode(bytes: &[u8], key: Option<&[u8]>) -> Result<Self, MessageDecodeError> {
        let mut buf = bytes.to_vec();

        let fingerprint = Self::check_fingerprint(&mut buf);

        let integrity = match key {
            Some(key) if !key.is_empty() => Self::check_integrity(&mut buf, key),
            _ => false,
        };

        let mut cursor = Cursor::new(buf.as_slice());
        let header = StunHeader::decode(&mut cursor)?;

        let attributes = decode_attribute_stream(
            &buf[STUN_HEADER_SIZE..],
            header.message_len,
            header.transaction_id,
        )?;

        Ok(Self {
            header,
            attributes,
            integrity,
            fingerprint,
            key: key.map(|key| key.to_vec()),
        })
    }

    // Verifies and strips a trailing FINGERPRINT attribute.
    //
    // The received length field counts the trailer, which is exactly the
    // state the sender's CRC ran over, so the check hashes the buffer as-is
    // minus the trailer. The length is shrunk back only after a successful
    // strip.
    fn check_fingerprint(buf: &mut Vec<u8>) -> bool {
        let len = buf.len();
        if len < STUN_HEADER_SIZE + STUN_FINGERPRINT_ATTR_SIZE {
            return false;
        }

        let trailer = &buf[len - STUN_FINGERPRINT_ATTR_SIZE..];
        if NetworkEndian::read_u16(&trailer[0..2]) != ATTR_FINGERPRINT
            || NetworkEndian::read_u16(&trailer[2..4]) != 4
        {
            return false;
        }

        let stored = NetworkEndian::read_u32(&trailer[4..8]);
        let computed =
            trailers::message_fingerprint(&buf[..len - STUN_FINGERPRINT_ATTR_SIZE]);

        if stored != computed {
            log::warn!(
                "fingerprint mismatch: stored {:#010x}, computed {:#010x}",
                stored,
                computed
            );
            return false;
        }

        buf.truncate(len - STUN_FINGERPRINT_ATTR_SIZE);
        trailers::rewrite_message_length(buf, 0);

        true
    }

    // Verifies and strips a trailing MESSAGE-INTEGRITY attribute.
    //
    // Runs after fingerprint stripping, at which point the length field
    // counts up to and including this trailer (either straight off the wire
    // or restored by the fingerprint strip) and therefore matches what the
    // sender signed. No length adjustment is needed before hashing.
    fn check_integrity(buf: &mut Vec<u8>, key: &[u8]) -> bool {
        let len = buf.len();
        if len < STUN_HEADER_SIZE + STUN_INTEGRITY_ATTR_SIZE {
            return false;
        }

        let trailer = &buf[len - STUN_INTEGRITY_ATTR_SIZE..];
        if NetworkEndian::read_u16(&trailer[0..2]) != ATTR_MESSAGE_INTEGRITY
            || NetworkEndian::read_u16(&trailer[2..4]) != STUN_INTEGRITY_HMAC_SIZE as u16
        {
            return false;
        }

        let stored = &trailer[4..];
        let computed = trailers::message_hmac(key, &buf[..len - STUN_INTEGRITY_ATTR_SIZE]);

        if stored != computed.as_slice() {
            log::warn!("message integrity mismatch, leaving trailer in place");
            return false;
        }

        buf.truncate(len - STUN_INTEGRITY_ATTR_SIZE);
        trailers::rewrite_message_length(buf, 0);

        true
    }
}
