/*!
# rrwire: defensive DNS wire-format decoding

This library decodes DNS messages received from untrusted nameservers and
exposes them through a typed record model and a set of legacy per-type reply
adapters.

The base library contains the common types and traits used by the decoder
crates: the error taxonomy, the parser traits and the allocation gate that
lets every allocation site fail independently.

## Crates

- [DNS message decoding](/rrwire-dns)
- [Legacy reply adapters](/rrwire-reply)
*/

#![allow(clippy::unneeded_field_pattern)]

/// Fallible allocation
pub mod alloc;

/// Return common errors
pub mod error;

/// Parse Messages
pub mod parser;

/// Describe a Protocol
pub mod protocol;

#[cfg(feature = "ffi")]
pub mod ffi;
