use crate::alloc::{AllocGate, Unlimited};
use crate::error::{Error, ErrorKind, Result};
use crate::protocol::Protocol;

pub trait Parse: Protocol {
    /// Parse a complete message from `input`, asking `gate` before every
    /// allocation.
    ///
    /// Returns the bytes left after the message together with the parsed
    /// message. Any structural error rejects the whole message.
    fn parse_with<'a>(
        &self,
        input: &'a [u8],
        gate: &dyn AllocGate,
    ) -> Result<(&'a [u8], Self::Message)>;

    /// Parse a complete message from `input` with unrestricted allocation.
    fn parse<'a>(&self, input: &'a [u8]) -> Result<(&'a [u8], Self::Message)> {
        self.parse_with(input, &Unlimited)
    }
}

/// Restrict `input` to the caller declared length.
///
/// Legacy callers pass a buffer together with a signed length. A negative
/// length, or one that runs past the end of the buffer, is rejected before a
/// single byte is read.
pub fn bounded_input(input: &[u8], len: isize) -> Result<&[u8]> {
    let len = usize::try_from(len).map_err(|_| Error::new(ErrorKind::InvalidLength))?;
    input
        .get(..len)
        .ok_or_else(|| Error::new(ErrorKind::InvalidLength))
}
