use num_derive::FromPrimitive;

#[derive(Debug, Copy, Clone, FromPrimitive, Ord, PartialOrd, Eq, PartialEq)]
/// [STUN message class](https://tools.ietf.org/html/rfc5389#section-6)
///
/// The message type defines the message class (request, success response,
/// failure response, or indication). The discriminant is the 2-bit class id
/// `C0 C1`; its placement inside the 16-bit message type field is handled by
/// the header codec.
pub enum StunMessageClass {
    /// STUN request
    Request = 0b00,
    /// STUN indication
    Indication = 0b01,
    /// STUN success response
    SuccessResponse = 0b10,
    /// STUN error response
    ErrorResponse = 0b11,
}

impl StunMessageClass {
    /// Returns the 2-bit class id.
    pub fn id(self) -> u16 {
        self as u16
    }

    /// Returns the registry name of the class.
    pub fn name(self) -> &'static str {
        match self {
            StunMessageClass::Request => "request",
            StunMessageClass::Indication => "indication",
            StunMessageClass::SuccessResponse => "success",
            StunMessageClass::ErrorResponse => "error",
        }
    }
}
