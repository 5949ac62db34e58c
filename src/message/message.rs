use crate::attribute::{AttributeValue, StunAttribute};
use crate::definitions::StunTransactionId;
use crate::header::StunHeader;
use crate::header::{StunMessageClass, StunMessageMethod};
use crate::registry;

/// STUN message [RFC5389](https://tools.ietf.org/html/rfc5389#section-6)
///
/// STUN messages are encoded in binary using network-oriented format
/// (most significant byte or octet first, also commonly known as big-endian).
/// All STUN messages MUST start with a 20-byte header followed by zero
/// or more TLV encoded attributes.
///```text
///        0                   1                   2                   3
///        0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
///       +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///       |0 0|     STUN Message Type     |         Message Length        |
///       +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///       |                         Magic Cookie                          |
///       +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///       |                                                               |
///       |                     Transaction ID (96 bits)                  |
///       |                                                               |
///       +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///```
/// A `StunMessage` is a plain value: construct one with the builder methods
/// and [`encode`](StunMessage::encode) it, or obtain one from
/// [`decode`](StunMessage::decode).
///
/// The two trailer attributes are not part of the attribute list. Decoding
/// verifies and strips them, recording the outcome in the
/// [`integrity`](StunMessage::integrity) and
/// [`fingerprint`](StunMessage::fingerprint) flags; encoding appends
/// MESSAGE-INTEGRITY whenever a non-empty key is set and FINGERPRINT whenever
/// the fingerprint flag is set.
///
/// Attributes keep their wire order, so a message without trailers re-encodes
/// byte-identically. The [`attribute`](StunMessage::attribute) accessor
/// provides the mapping view by registry name; when a name occurs more than
/// once the last occurrence wins.
#[derive(Debug, Clone)]
pub struct StunMessage {
    pub(crate) header: StunHeader,
    pub(crate) attributes: Vec<StunAttribute>,
    pub(crate) integrity: bool,
    pub(crate) fingerprint: bool,
    pub(crate) key: Option<Vec<u8>>,
}

impl StunMessage {
    /// Creates a new message with a random transaction id.
    pub fn new(method: StunMessageMethod, class: StunMessageClass) -> Self {
        let header = StunHeader::new(method, class, None);

        Self {
            header,
            attributes: Vec::new(),
            integrity: false,
            fingerprint: false,
            key: None,
        }
    }

    /// Creates a Binding Request
    pub fn create_request() -> Self {
        Self::default().set_message_class(StunMessageClass::Request)
    }

    /// Creates a Binding Success Response
    pub fn create_success_response() -> Self {
        Self::default().set_message_class(StunMessageClass::SuccessResponse)
    }

    /// Creates a Binding Error Response
    pub fn create_error_response() -> Self {
        Self::default().set_message_class(StunMessageClass::ErrorResponse)
    }

    /// Creates a Binding Indication
    pub fn create_indication() -> Self {
        Self::default().set_message_class(StunMessageClass::Indication)
    }

    /// Sets message transaction id
    pub fn set_transaction_id(mut self, transaction_id: StunTransactionId) -> Self {
        self.header.transaction_id = transaction_id;

        self
    }

    /// Sets message class
    pub fn set_message_class(mut self, class: StunMessageClass) -> Self {
        self.header.message_class = class;

        self
    }

    /// Sets message method
    pub fn set_message_method(mut self, method: StunMessageMethod) -> Self {
        self.header.message_method = method;

        self
    }

    /// Adds an attribute to the end of the list
    pub fn add_attribute(mut self, attr: StunAttribute) -> Self {
        self.attributes.push(attr);

        self
    }

    /// Sets the key used for the MESSAGE-INTEGRITY trailer
    ///
    /// The key is opaque to the codec. For long-term credentials derive it
    /// with [`long_term_integrity_key`](crate::long_term_integrity_key); for
    /// short-term credentials it is the SASLprep'd password bytes.
    /// A non-empty key makes [`encode`](StunMessage::encode) append the
    /// trailer.
    pub fn set_integrity_key(mut self, key: Vec<u8>) -> Self {
        self.key = Some(key);

        self
    }

    /// Requests a FINGERPRINT trailer on [`encode`](StunMessage::encode)
    pub fn set_fingerprint(mut self, fingerprint: bool) -> Self {
        self.fingerprint = fingerprint;

        self
    }

    /// Returns the message class
    pub fn class(&self) -> StunMessageClass {
        self.header.message_class
    }

    /// Returns the message method
    pub fn method(&self) -> StunMessageMethod {
        self.header.message_method
    }

    /// Returns the transaction id
    pub fn transaction_id(&self) -> StunTransactionId {
        self.header.transaction_id
    }

    /// Whether a valid MESSAGE-INTEGRITY trailer was verified on decode
    pub fn integrity(&self) -> bool {
        self.integrity
    }

    /// Whether a valid FINGERPRINT trailer was verified on decode (or is
    /// requested on encode)
    pub fn fingerprint(&self) -> bool {
        self.fingerprint
    }

    /// Returns the integrity key, if one is set
    pub fn key(&self) -> Option<&[u8]> {
        self.key.as_deref()
    }

    /// Returns an immutable reference to the message header
    pub fn get_header(&self) -> &StunHeader {
        &self.header
    }

    /// Returns the attributes in wire order
    pub fn attributes(&self) -> &[StunAttribute] {
        &self.attributes
    }

    /// Looks up an attribute value by its registry name.
    ///
    /// This is the mapping view over the ordered attribute list: when the
    /// same attribute occurs more than once, the last occurrence is returned.
    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        let code = registry::attribute_by_name(name)?.code;

        self.attributes
            .iter()
            .rev()
            .find(|attr| attr.code == code)
            .map(|attr| &attr.value)
    }
}

impl std::default::Default for StunMessage {
    /// Default STUN message.
    ///
    /// Class: Request
    /// Method: Binding
    /// Transaction ID: randomly generated
    fn default() -> Self {
        Self::new(StunMessageMethod::Binding, StunMessageClass::Request)
    }
}

impl PartialEq for StunMessage {
    /// Semantic equality: header length bookkeeping is ignored, everything
    /// observable (class, method, transaction id, attributes, trailer flags,
    /// key) is compared.
    fn eq(&self, other: &Self) -> bool {
        self.header.message_class == other.header.message_class
            && self.header.message_method == other.header.message_method
            && self.header.transaction_id == other.header.transaction_id
            && self.attributes == other.attributes
            && self.integrity == other.integrity
            && self.fingerprint == other.fingerprint
            && self.key == other.key
    }
}

impl Eq for StunMessage {}
