//! Checksum and length accounting for the two trailer attributes.
//!
//! Both trailers sign a message whose header length field already counts
//! the trailer itself. Rather than patching lengths inside the checksum
//! helpers, the append/strip sites own the fixup: the encoder bumps the
//! length in place right before hashing, and the decoder shrinks it back
//! after a verified strip. The checksums below therefore run over their
//! input as given.

use byteorder::{ByteOrder, NetworkEndian};
use crc::crc32;
use crypto::digest::Digest;
use crypto::hmac::Hmac;
use crypto::mac::Mac;
use crypto::md5::Md5;
use crypto::sha1::Sha1;

use super::errors::IntegrityKeyError;
use crate::definitions::{STUN_FINGERPRINT_XOR, STUN_HEADER_SIZE};

/// Rewrites the header length field to the attribute section size plus
/// `pending` bytes of trailer not yet present in `buf`.
///
/// `pending = 0` restores the plain accounting after a strip or append.
pub(super) fn rewrite_message_length(buf: &mut [u8], pending: usize) {
    let section_len = (buf.len() - STUN_HEADER_SIZE + pending) as u16;
    NetworkEndian::write_u16(&mut buf[2..4], section_len);
}

/// CRC-32 of the message up to the FINGERPRINT trailer, masked with the
/// STUN marker constant ([RFC5389 Section 15.5](https://tools.ietf.org/html/rfc5389#section-15.5)).
pub(super) fn message_fingerprint(bytes: &[u8]) -> u32 {
    crc32::checksum_ieee(bytes) ^ STUN_FINGERPRINT_XOR
}

/// HMAC-SHA1 of the message up to the MESSAGE-INTEGRITY trailer
/// ([RFC5389 Section 15.4](https://tools.ietf.org/html/rfc5389#section-15.4)).
///
/// The length field inside `bytes` must already count the trailer.
pub(super) fn message_hmac(key: &[u8], bytes: &[u8]) -> Vec<u8> {
    let mut mac = Hmac::new(Sha1::new(), key);
    mac.input(bytes);
    mac.result().code().to_vec()
}

/// Derives a long-term credential integrity key according to [RFC5389](https://tools.ietf.org/html/rfc5389#section-15.4)
///
/// The key is `MD5(username ":" realm ":" SASLprep(password))`. The username
/// and realm are used as provided (the username is expected to have been
/// SASLprep'd already). Pass the result to
/// [`StunMessage::set_integrity_key`](crate::StunMessage::set_integrity_key)
/// or as the `key` argument of [`StunMessage::decode`](crate::StunMessage::decode).
///
/// For short-term credentials no derivation is needed: the key is the
/// SASLprep'd password bytes themselves.
pub fn long_term_integrity_key(
    username: &str,
    realm: &str,
    password: &str,
) -> Result<Vec<u8>, IntegrityKeyError> {
    let credentials = format!("{}:{}:{}", username, realm, stringprep::saslprep(password)?);

    let mut md5 = Md5::new();
    md5.input_str(&credentials);

    let mut key = vec![0u8; 16];
    md5.result(&mut key);

    Ok(key)
}
