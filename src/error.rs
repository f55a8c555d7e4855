use nom::error::ErrorKind as NomErrorKind;
use nom::error::ParseError;

pub type Result<T> = std::result::Result<T, Error>;

/// Error type used by nom combinators inside the decoders.
///
/// Keeps the nom error code so it can be classified once it reaches
/// [`Error`].
#[derive(Debug, PartialEq, Eq)]
pub struct NomError<I> {
    pub input: I,
    pub code: NomErrorKind,
}

impl<I> NomError<I> {
    pub fn new(input: I, code: NomErrorKind) -> Self {
        Self { input, code }
    }
}

impl<I> ParseError<I> for NomError<I> {
    fn from_error_kind(input: I, kind: NomErrorKind) -> Self {
        Self::new(input, kind)
    }

    fn append(_: I, _: NomErrorKind, other: Self) -> Self {
        other
    }
}

/// Reason a domain name was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NameError {
    /// Length byte has the reserved 0b01 or 0b10 prefix
    BadLabelType(u8),
    /// Compression pointer does not point strictly backwards
    ForwardPointer { pointer: usize, target: usize },
    /// Reconstructed name exceeds the 255 octet wire limit
    TooLong,
    /// More compression pointers than the hop budget allows
    TooManyHops,
}

impl std::fmt::Display for NameError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            NameError::BadLabelType(len) => write!(f, "invalid label type 0x{:02x}", len),
            NameError::ForwardPointer { pointer, target } => write!(
                f,
                "compression pointer at {} targets non-decreasing offset {}",
                pointer, target
            ),
            NameError::TooLong => write!(f, "name exceeds maximum length"),
            NameError::TooManyHops => write!(f, "too many compression pointers"),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct Error {
    pub kind: ErrorKind,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind }
    }

    /// Input ended `size` bytes short of a declared field.
    pub fn incomplete_needed(size: usize) -> Self {
        Self::new(ErrorKind::Incomplete(nom::Needed::new(size)))
    }

    pub fn incomplete() -> Self {
        Self::new(ErrorKind::Incomplete(nom::Needed::Unknown))
    }

    pub fn mismatch(declared: usize, actual: usize) -> Self {
        Self::new(ErrorKind::LengthMismatch { declared, actual })
    }

    pub fn invalid_name(reason: NameError) -> Self {
        Self::new(ErrorKind::InvalidName(reason))
    }

    pub fn out_of_memory() -> Self {
        Self::new(ErrorKind::OutOfMemory)
    }

    /// Buffer ended before a declared field.
    pub fn is_truncation(&self) -> bool {
        matches!(self.kind, ErrorKind::Incomplete(_))
    }

    /// Declared content disagrees with the bytes that back it.
    pub fn is_structural(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::LengthMismatch { .. }
                | ErrorKind::InvalidName(_)
                | ErrorKind::InvalidData
                | ErrorKind::InvalidLength
        )
    }

    pub fn is_out_of_memory(&self) -> bool {
        self.kind == ErrorKind::OutOfMemory
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input ended before a declared field could be read
    Incomplete(nom::Needed),
    /// A declared length disagrees with the bytes its grammar consumed
    LengthMismatch { declared: usize, actual: usize },
    /// A domain name could not be decoded
    InvalidName(NameError),
    /// Field content violates the record grammar
    InvalidData,
    /// Caller supplied length is negative or larger than the buffer
    InvalidLength,
    /// An allocation site refused to allocate
    OutOfMemory,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::result::Result<(), std::fmt::Error> {
        match &self.kind {
            ErrorKind::Incomplete(nom::Needed::Size(size)) => {
                write!(f, "truncated input: {} more bytes needed", size)
            }
            ErrorKind::Incomplete(nom::Needed::Unknown) => write!(f, "truncated input"),
            ErrorKind::LengthMismatch { declared, actual } => write!(
                f,
                "declared length {} does not match decoded length {}",
                declared, actual
            ),
            ErrorKind::InvalidName(reason) => write!(f, "malformed name: {}", reason),
            ErrorKind::InvalidData => write!(f, "invalid field data"),
            ErrorKind::InvalidLength => write!(f, "invalid input length"),
            ErrorKind::OutOfMemory => write!(f, "out of memory"),
        }
    }
}

impl std::error::Error for Error {}

impl From<nom::Err<NomError<&[u8]>>> for Error {
    fn from(nom_err: nom::Err<NomError<&[u8]>>) -> Self {
        match nom_err {
            nom::Err::Incomplete(needed) => Error::new(ErrorKind::Incomplete(needed)),
            nom::Err::Error(err) | nom::Err::Failure(err) => match err.code {
                NomErrorKind::Eof | NomErrorKind::Complete => Error::incomplete(),
                _ => Error::new(ErrorKind::InvalidData),
            },
        }
    }
}

impl From<std::collections::TryReserveError> for Error {
    fn from(_: std::collections::TryReserveError) -> Self {
        Error::out_of_memory()
    }
}
