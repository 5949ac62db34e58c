//! Attribute registry: the fixed table mapping attribute type codes to their
//! names and wire shapes.
//!
//! Every attribute carried in a STUN message is decoded and encoded by
//! dispatching on the shape registered here. Codes missing from the table are
//! passed through as raw byte values so that extension attributes survive a
//! decode/encode round trip.
//!
//! The method and class registries are the [`StunMessageMethod`] and
//! [`StunMessageClass`] enumerations in the header module.
//!
//! [`StunMessageMethod`]: crate::StunMessageMethod
//! [`StunMessageClass`]: crate::StunMessageClass

/// Wire shape of an attribute payload.
///
/// Determines how the payload bytes between the TLV header and the next
/// attribute are interpreted.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AttributeShape {
    /// Opaque bytes, carried unmodified.
    Value,
    /// Address family, port and IP address ([RFC5389 Section 15.1](https://tools.ietf.org/html/rfc5389#section-15.1)).
    Address,
    /// Same framing as `Address` but obfuscated with the magic cookie and,
    /// for IPv6, the transaction id ([RFC5389 Section 15.2](https://tools.ietf.org/html/rfc5389#section-15.2)).
    XorAddress,
    /// Numeric error code plus UTF-8 reason phrase ([RFC5389 Section 15.6](https://tools.ietf.org/html/rfc5389#section-15.6)).
    ErrorCode,
    /// RFC3489 CHANGE-REQUEST flag word ([RFC3489 Section 11.2.4](https://tools.ietf.org/html/rfc3489#section-11.2.4)).
    ChangeRequest,
}

/// A single registry row.
#[derive(Debug, Copy, Clone)]
pub struct AttributeSpec {
    /// Attribute type code as it appears on the wire.
    pub code: u16,
    /// Symbolic attribute name.
    pub name: &'static str,
    /// Payload shape used for codec dispatch.
    pub shape: AttributeShape,
}

/// Attribute type code of MESSAGE-INTEGRITY.
pub const ATTR_MESSAGE_INTEGRITY: u16 = 0x0008;
/// Attribute type code of FINGERPRINT.
pub const ATTR_FINGERPRINT: u16 = 0x8028;

// MESSAGE-INTEGRITY and FINGERPRINT are registered with the `Value` shape:
// their verification happens in the message codec before the attribute stream
// is walked, so by the time they reach the attribute codec (unverified
// trailers left in place) they are plain byte values.
static ATTRIBUTE_TABLE: &[AttributeSpec] = &[
    AttributeSpec { code: 0x0001, name: "mapped_address", shape: AttributeShape::Address },
    AttributeSpec { code: 0x0002, name: "response_address", shape: AttributeShape::Address },
    AttributeSpec { code: 0x0003, name: "change_request", shape: AttributeShape::ChangeRequest },
    AttributeSpec { code: 0x0004, name: "source_address", shape: AttributeShape::Address },
    AttributeSpec { code: 0x0005, name: "changed_address", shape: AttributeShape::Address },
    AttributeSpec { code: 0x0006, name: "username", shape: AttributeShape::Value },
    AttributeSpec { code: 0x0007, name: "password", shape: AttributeShape::Value },
    AttributeSpec { code: 0x0008, name: "message_integrity", shape: AttributeShape::Value },
    AttributeSpec { code: 0x0009, name: "error_code", shape: AttributeShape::ErrorCode },
    AttributeSpec { code: 0x000a, name: "unknown_attributes", shape: AttributeShape::Value },
    AttributeSpec { code: 0x000b, name: "reflected_from", shape: AttributeShape::Address },
    AttributeSpec { code: 0x000c, name: "channel_number", shape: AttributeShape::Value },
    AttributeSpec { code: 0x000d, name: "lifetime", shape: AttributeShape::Value },
    AttributeSpec { code: 0x0012, name: "xor_peer_address", shape: AttributeShape::XorAddress },
    AttributeSpec { code: 0x0013, name: "data", shape: AttributeShape::Value },
    AttributeSpec { code: 0x0014, name: "realm", shape: AttributeShape::Value },
    AttributeSpec { code: 0x0015, name: "nonce", shape: AttributeShape::Value },
    AttributeSpec { code: 0x0016, name: "xor_relayed_address", shape: AttributeShape::XorAddress },
    AttributeSpec { code: 0x0017, name: "requested_address_family", shape: AttributeShape::Value },
    AttributeSpec { code: 0x0018, name: "even_port", shape: AttributeShape::Value },
    AttributeSpec { code: 0x0019, name: "requested_transport", shape: AttributeShape::Value },
    AttributeSpec { code: 0x001a, name: "dont_fragment", shape: AttributeShape::Value },
    AttributeSpec { code: 0x0020, name: "xor_mapped_address", shape: AttributeShape::XorAddress },
    AttributeSpec { code: 0x0022, name: "reservation_token", shape: AttributeShape::Value },
    AttributeSpec { code: 0x0024, name: "priority", shape: AttributeShape::Value },
    AttributeSpec { code: 0x0025, name: "use_candidate", shape: AttributeShape::Value },
    AttributeSpec { code: 0x002a, name: "connection_id", shape: AttributeShape::Value },
    AttributeSpec { code: 0x8020, name: "x_vovida_xor_mapped_address", shape: AttributeShape::XorAddress },
    AttributeSpec { code: 0x8022, name: "software", shape: AttributeShape::Value },
    AttributeSpec { code: 0x8023, name: "alternate_server", shape: AttributeShape::Address },
    AttributeSpec { code: 0x8028, name: "fingerprint", shape: AttributeShape::Value },
    AttributeSpec { code: 0x8029, name: "ice_controlled", shape: AttributeShape::Value },
    AttributeSpec { code: 0x802a, name: "ice_controlling", shape: AttributeShape::Value },
];

/// Looks up a registry row by attribute type code.
pub fn attribute_by_code(code: u16) -> Option<&'static AttributeSpec> {
    ATTRIBUTE_TABLE.iter().find(|spec| spec.code == code)
}

/// Looks up a registry row by symbolic attribute name.
pub fn attribute_by_name(name: &str) -> Option<&'static AttributeSpec> {
    ATTRIBUTE_TABLE.iter().find(|spec| spec.name == name)
}
