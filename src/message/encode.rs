use byteorder::{NetworkEndian, WriteBytesExt};

use super::errors::MessageEncodeError;
use super::message::StunMessage;
use super::trailers;

use crate::attribute::encode_attribute_stream;
use crate::definitions::{
    STUN_FINGERPRINT_ATTR_SIZE, STUN_INTEGRITY_ATTR_SIZE, STUN_INTEGRITY_HMAC_SIZE,
};
use crate::registry::{ATTR_FINGERPRINT, ATTR_MESSAGE_INTEGRITY};

impl StunMessage {
    /// Encodes the STUN message into its binary representation
    ///
    /// The attribute section is emitted in the order the attributes were
    /// added. A MESSAGE-INTEGRITY trailer is appended whenever a non-empty
    /// key is set, and a FINGERPRINT trailer whenever the fingerprint flag is
    /// set; before each trailer's MAC/CRC runs, the header length field is
    /// bumped to the value it will hold once that trailer is present.
    pub fn encode(&self) -> Result<Vec<u8>, MessageEncodeError> {
        let attr_bytes = encode_attribute_stream(&self.attributes, self.header.transaction_id)?;

        let mut header = self.header;
        header.message_len = attr_bytes.len() as u16;

        let mut buf = header.encode()?;
        buf.extend_from_slice(&attr_bytes);

        if let Some(key) = &self.key {
            if !key.is_empty() {
                Self::append_integrity(&mut buf, key)?;
            }
        }

        if self.fingerprint {
            Self::append_fingerprint(&mut buf)?;
        }

        Ok(buf)
    }

    // Appends the MESSAGE-INTEGRITY trailer. The length field is bumped by
    // the trailer size up front, so once the 24 TLV bytes land the
    // accounting is already correct.
    fn append_integrity(buf: &mut Vec<u8>, key: &[u8]) -> Result<(), MessageEncodeError> {
        trailers::rewrite_message_length(buf, STUN_INTEGRITY_ATTR_SIZE);
        let mac = trailers::message_hmac(key, buf);

        buf.write_u16::<NetworkEndian>(ATTR_MESSAGE_INTEGRITY)?;
        buf.write_u16::<NetworkEndian>(STUN_INTEGRITY_HMAC_SIZE as u16)?;
        buf.extend_from_slice(&mac);

        Ok(())
    }

    // Appends the FINGERPRINT trailer, with the same bump-then-hash order.
    fn append_fingerprint(buf: &mut Vec<u8>) -> Result<(), MessageEncodeError> {
        trailers::rewrite_message_length(buf, STUN_FINGERPRINT_ATTR_SIZE);
        let fingerprint = trailers::message_fingerprint(buf);

        buf.write_u16::<NetworkEndian>(ATTR_FINGERPRINT)?;
        buf.write_u16::<NetworkEndian>(4)?;
        buf.write_u32::<NetworkEndian>(fingerprint)?;

        Ok(())
    }
}
