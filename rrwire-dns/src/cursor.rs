//! Bounds-checked read position over a DNS message.
//!
//! A cursor always keeps the whole message around so compression pointers can
//! be followed, but it only reads up to its own `end`. Resource record payloads
//! are decoded from a [`Cursor::sub`] cursor whose `end` is the declared rdata
//! length, so a payload decoder can never read into the next record.

use nom::bytes::streaming::take;
use nom::number::streaming::{be_u16, be_u32, be_u8};

use rrwire::error::{Error, ErrorKind, NomError, Result};

use crate::IResult;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
    end: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            end: buf.len(),
        }
    }

    /// Absolute offset from the start of the message.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.end - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.pos == self.end
    }

    fn rest(&self) -> &'a [u8] {
        &self.buf[self.pos..self.end]
    }

    fn run<O, F>(&mut self, parser: F) -> Result<O>
    where
        F: FnOnce(&'a [u8]) -> IResult<'a, O>,
    {
        let rest = self.rest();
        let (left, out) = parser(rest)?;
        self.pos += rest.len() - left.len();
        Ok(out)
    }

    /// Exactly `n` bytes, or a truncation error naming the shortfall.
    pub fn read(&mut self, n: usize) -> Result<&'a [u8]> {
        self.run(take::<usize, &'a [u8], NomError<&'a [u8]>>(n))
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.run(be_u8)
    }

    pub fn read_u16_be(&mut self) -> Result<u16> {
        self.run(be_u16)
    }

    pub fn read_u32_be(&mut self) -> Result<u32> {
        self.run(be_u32)
    }

    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.read(n).map(|_| ())
    }

    /// Everything up to `end`.
    pub fn read_rest(&mut self) -> &'a [u8] {
        let rest = self.rest();
        self.pos = self.end;
        rest
    }

    /// Move back to an earlier absolute offset.
    ///
    /// Only strictly backwards moves are allowed; compression pointers rely
    /// on this to terminate. The bound of a [`Cursor::sub`] cursor is lifted
    /// so a pointer inside rdata can reach names anywhere in the message.
    pub fn seek(&mut self, offset: usize) -> Result<()> {
        if offset >= self.pos {
            return Err(Error::new(ErrorKind::InvalidData));
        }
        self.pos = offset;
        self.end = self.buf.len();
        Ok(())
    }

    /// Split off a cursor over the next `n` bytes and advance past them.
    pub fn sub(&mut self, n: usize) -> Result<Cursor<'a>> {
        let start = self.pos;
        self.skip(n)?;
        Ok(Cursor {
            buf: self.buf,
            pos: start,
            end: self.pos,
        })
    }
}
