use std::net::SocketAddr;

use crate::registry;

/// Decoded payload of a [STUN message attribute](https://tools.ietf.org/html/rfc5389#section-15).
///
/// After the STUN header are zero or more attributes. Each attribute
/// MUST be TLV encoded, with a 16-bit type, 16-bit length, and value.
/// Each STUN attribute MUST end on a 32-bit boundary. The value in the
/// length field MUST contain the length of the Value part of the
/// attribute, prior to padding, measured in bytes.
///
/// Which variant an attribute decodes into is determined by the shape its
/// type code carries in the [registry](crate::registry): a type code with no
/// registry row keeps its payload as [`AttributeValue::Raw`]. The registry
/// shape also drives encoding, so the variant of a caller-built attribute
/// must match the shape of its type code.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum AttributeValue {
    /// Opaque payload bytes, exactly as on the wire. Used both for `value`
    /// shaped attributes (USERNAME, SOFTWARE, REALM, NONCE, TURN DATA, ...)
    /// and for type codes absent from the registry.
    Raw(Vec<u8>),
    /// A transport address: MAPPED-ADDRESS and friends, as well as the
    /// XOR-obfuscated variants (the obfuscation is applied on the wire only;
    /// the decoded value is always the plain address).
    Address(SocketAddr),
    /// ERROR-CODE ([RFC5389 Section 15.6](https://tools.ietf.org/html/rfc5389#section-15.6)):
    /// a code in the range 300-699 and a UTF-8 reason phrase.
    ErrorCode {
        /// Numeric error code, hundreds digit 3-6.
        code: u16,
        /// Human readable reason phrase.
        reason: String,
    },
    /// CHANGE-REQUEST ([RFC3489 Section 11.2.4](https://tools.ietf.org/html/rfc3489#section-11.2.4)):
    /// which of the response source IP and port the server is asked to vary.
    ChangeRequest {
        /// Ask the server to respond from a different IP address.
        ip: bool,
        /// Ask the server to respond from a different port.
        port: bool,
    },
}

/// One attribute of a STUN message: a type code paired with its decoded value.
///
/// Attributes keep their wire order inside
/// [`StunMessage`](crate::StunMessage); the by-name mapping view is provided
/// by [`StunMessage::attribute`](crate::StunMessage::attribute).
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct StunAttribute {
    /// Attribute type code as it appears on the wire.
    pub code: u16,
    /// Decoded payload.
    pub value: AttributeValue,
}

impl StunAttribute {
    /// Creates an attribute from its registry name.
    ///
    /// Returns `None` when the name is not in the registry. The value variant
    /// is checked against the registry shape at encode time, not here.
    pub fn new(name: &str, value: AttributeValue) -> Option<Self> {
        registry::attribute_by_name(name).map(|spec| Self {
            code: spec.code,
            value,
        })
    }

    /// Creates a raw attribute from a bare type code.
    ///
    /// Intended for extension attributes the registry doesn't cover.
    pub fn raw(code: u16, bytes: Vec<u8>) -> Self {
        Self {
            code,
            value: AttributeValue::Raw(bytes),
        }
    }

    /// Returns the registry name of this attribute, if it has one.
    pub fn name(&self) -> Option<&'static str> {
        registry::attribute_by_code(self.code).map(|spec| spec.name)
    }
}
