//! Domain name decoding with compression pointer support.
//!
//! [RFC1035 4.1.4](https://tools.ietf.org/html/rfc1035#section-4.1.4)
//!
//! Names are returned in presentation form: labels joined by `.`, with `.`
//! and `\` inside a label escaped by a backslash and any other byte outside
//! the printable ASCII range written as `\DDD`. The root name is the empty
//! string.

use rrwire::alloc::{try_string, AllocGate};
use rrwire::error::{Error, NameError, Result};

use crate::cursor::Cursor;

/// Upper bound on the wire length of a reconstructed name, root label included
pub const MAX_NAME_WIRE_LEN: usize = 255;
/// Upper bound on compression pointers followed for a single name
pub const MAX_POINTER_HOPS: usize = 127;
/// Longest label a length byte can describe
pub const MAX_LABEL_LEN: usize = 63;

const MAX_LABELS: usize = MAX_NAME_WIRE_LEN / 2 + 1;
const POINTER_MASK: u8 = 0b1100_0000;

/// Walks the labels of a single name.
///
/// `limit` only ever decreases: every pointer must target an offset below
/// both its own position and the previous pointer target.
struct NameDecoder<'a> {
    walk: Cursor<'a>,
    limit: usize,
    resume: Option<usize>,
    hops_left: usize,
    wire_len: usize,
    labels: [&'a [u8]; MAX_LABELS],
    label_count: usize,
}

impl<'a> NameDecoder<'a> {
    fn new(start: Cursor<'a>) -> Self {
        NameDecoder {
            walk: start,
            limit: usize::MAX,
            resume: None,
            hops_left: MAX_POINTER_HOPS,
            wire_len: 0,
            labels: [&[][..]; MAX_LABELS],
            label_count: 0,
        }
    }

    fn run(&mut self) -> Result<()> {
        loop {
            let at = self.walk.position();
            let len = self.walk.read_u8()?;
            match len & POINTER_MASK {
                0b0000_0000 => {
                    self.wire_len += 1 + usize::from(len);
                    if self.wire_len > MAX_NAME_WIRE_LEN {
                        return Err(Error::invalid_name(NameError::TooLong));
                    }
                    if len == 0 {
                        return Ok(());
                    }
                    let label = self.walk.read(usize::from(len))?;
                    if self.label_count == MAX_LABELS {
                        return Err(Error::invalid_name(NameError::TooLong));
                    }
                    self.labels[self.label_count] = label;
                    self.label_count += 1;
                }
                POINTER_MASK => {
                    let low = self.walk.read_u8()?;
                    let target = (usize::from(len & !POINTER_MASK) << 8) | usize::from(low);
                    if target >= at || target >= self.limit {
                        return Err(Error::invalid_name(NameError::ForwardPointer {
                            pointer: at,
                            target,
                        }));
                    }
                    if self.hops_left == 0 {
                        return Err(Error::invalid_name(NameError::TooManyHops));
                    }
                    self.hops_left -= 1;
                    if self.resume.is_none() {
                        self.resume = Some(self.walk.position());
                    }
                    self.limit = target;
                    self.walk.seek(target)?;
                }
                _ => return Err(Error::invalid_name(NameError::BadLabelType(len))),
            }
        }
    }

    fn labels(&self) -> &[&'a [u8]] {
        &self.labels[..self.label_count]
    }
}

fn escaped_len(byte: u8) -> usize {
    match byte {
        b'.' | b'\\' => 2,
        0x21..=0x7e => 1,
        _ => 4,
    }
}

fn push_escaped(name: &mut String, byte: u8) {
    match byte {
        b'.' | b'\\' => {
            name.push('\\');
            name.push(char::from(byte));
        }
        0x21..=0x7e => name.push(char::from(byte)),
        _ => {
            name.push('\\');
            name.push(char::from(b'0' + byte / 100));
            name.push(char::from(b'0' + byte / 10 % 10));
            name.push(char::from(b'0' + byte % 10));
        }
    }
}

/// Decode the name starting at the cursor position.
///
/// On success the cursor sits right after the name as it appears in place:
/// after the terminating zero label, or after the first compression pointer.
pub fn parse_name(cursor: &mut Cursor, gate: &dyn AllocGate) -> Result<String> {
    let mut decoder = NameDecoder::new(cursor.clone());
    decoder.run()?;

    let labels = decoder.labels();
    let len = labels
        .iter()
        .map(|label| label.iter().map(|b| escaped_len(*b)).sum::<usize>())
        .sum::<usize>()
        + labels.len().saturating_sub(1);

    let mut name = try_string(gate, len)?;
    for (idx, label) in labels.iter().enumerate() {
        if idx > 0 {
            name.push('.');
        }
        for byte in label.iter() {
            push_escaped(&mut name, *byte);
        }
    }

    match decoder.resume {
        Some(resume) => cursor.skip(resume - cursor.position())?,
        None => *cursor = decoder.walk,
    }
    Ok(name)
}

#[cfg(test)]
mod test {
    use super::*;
    use rrwire::alloc::{FailingGate, Unlimited};
    use rrwire::error::ErrorKind;
    use rstest::rstest;

    fn decode_at(input: &[u8], offset: usize) -> Result<(String, usize)> {
        let mut cursor = Cursor::new(input);
        cursor.skip(offset)?;
        let name = parse_name(&mut cursor, &Unlimited)?;
        Ok((name, cursor.position()))
    }

    #[rstest(
        input,
        offset,
        expected,
        case::simple(
            &[
                0x07, b'e', b'x', b'a', b'm', b'p', b'l', b'e',
                0x03, b'c', b'o', b'm',
                0x00,
            ],
            0,
            Ok(("example.com".to_string(), 13))
        ),
        case::root(&[0x00], 0, Ok(("".to_string(), 1))),
        case::pointer_resumes_after_two_bytes(
            &[
                0x03, b'c', b'o', b'm', 0x00, // 0: com
                0x03, b'w', b'w', b'w', 0xc0, 0x00, // 5: www -> com
                0xff,
            ],
            5,
            Ok(("www.com".to_string(), 11))
        ),
        case::pointer_chain(
            &[
                0x03, b'c', b'o', b'm', 0x00, // 0: com
                0x01, b'b', 0xc0, 0x00, // 5: b -> com
                0x01, b'a', 0xc0, 0x05, // 9: a -> b
                0xc0, 0x09, // 13: -> a
            ],
            13,
            Ok(("a.b.com".to_string(), 15))
        ),
        case::escapes(
            &[0x04, b'a', b'.', b'\\', 0x07, 0x00],
            0,
            Ok(("a\\.\\\\\\007".to_string(), 6))
        ),
        case::binary_label(
            &[0x02, 0x00, b' ', 0x00],
            0,
            Ok(("\\000\\032".to_string(), 4))
        ),
        case::truncated_label(
            &[0x07, b'e', b'x', b'a'],
            0,
            Err(Error::incomplete_needed(4))
        ),
        case::missing_terminator(
            &[0x03, b'c', b'o', b'm'],
            0,
            Err(Error::incomplete_needed(1))
        ),
        case::truncated_pointer(
            &[0x00, 0xc0],
            1,
            Err(Error::incomplete_needed(1))
        ),
        case::bad_label_type(
            &[0x41, b'a'],
            0,
            Err(Error::invalid_name(NameError::BadLabelType(0x41)))
        ),
        case::extended_label_type(
            &[0x80, b'a'],
            0,
            Err(Error::invalid_name(NameError::BadLabelType(0x80)))
        ),
        case::self_pointer(
            &[0x00, 0xc0, 0x01],
            1,
            Err(Error::invalid_name(NameError::ForwardPointer { pointer: 1, target: 1 }))
        ),
        case::forward_pointer(
            &[0xc0, 0x02, 0x00],
            0,
            Err(Error::invalid_name(NameError::ForwardPointer { pointer: 0, target: 2 }))
        ),
        case::loop_through_earlier_target(
            &[
                0x03, b'f', b'o', b'o', 0xc0, 0x00, // 0: foo -> 0
                0xc0, 0x00, // 6: -> 0
            ],
            6,
            Err(Error::invalid_name(NameError::ForwardPointer { pointer: 4, target: 0 }))
        ),
    )]
    fn name(input: &[u8], offset: usize, expected: Result<(String, usize)>) {
        assert_eq!(decode_at(input, offset), expected);
    }

    #[test]
    fn too_long() {
        // 5 labels of 63 bytes: 320 wire bytes
        let mut input = Vec::new();
        for _ in 0..5 {
            input.push(63);
            input.extend_from_slice(&[b'a'; 63]);
        }
        input.push(0);
        assert_eq!(
            decode_at(&input, 0),
            Err(Error::invalid_name(NameError::TooLong))
        );
    }

    #[test]
    fn longest_name() {
        // 3 * 64 + 62 + 1 = 255 wire bytes
        let mut input = Vec::new();
        for _ in 0..3 {
            input.push(63);
            input.extend_from_slice(&[b'a'; 63]);
        }
        input.push(61);
        input.extend_from_slice(&[b'b'; 61]);
        input.push(0);
        assert_eq!(input.len(), MAX_NAME_WIRE_LEN);
        let (name, end) = decode_at(&input, 0).unwrap();
        assert_eq!(end, MAX_NAME_WIRE_LEN);
        assert_eq!(name.len(), 3 * 63 + 61 + 3);
    }

    #[test]
    fn too_long_through_pointers() {
        // 4 * 64 wire bytes of labels reached through a pointer
        let mut input = Vec::new();
        for _ in 0..4 {
            input.push(63);
            input.extend_from_slice(&[b'a'; 63]);
        }
        input.push(0);
        let start = input.len();
        input.extend_from_slice(&[0xc0, 0x00]);
        assert_eq!(
            decode_at(&input, start),
            Err(Error::invalid_name(NameError::TooLong))
        );
    }

    #[test]
    fn pointer_chain_exhausts_hops() {
        // a chain of bare pointers, each one pointing at the previous one
        let mut input = vec![0x00];
        for hop in 0..=MAX_POINTER_HOPS {
            let target = if hop == 0 { 0 } else { 1 + (hop - 1) * 2 };
            input.extend_from_slice(&[0xc0 | (target >> 8) as u8, target as u8]);
        }
        let start = input.len() - 2;
        let err = decode_at(&input, start).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidName(NameError::TooManyHops));

        // one hop fewer still decodes to the root name
        let (name, end) = decode_at(&input, start - 2).unwrap();
        assert_eq!(name, "");
        assert_eq!(end, start);
    }

    #[test]
    fn allocation_is_gated() {
        let input = [0x03, b'c', b'o', b'm', 0x00];
        let mut cursor = Cursor::new(&input);
        let gate = FailingGate::fail_at(1);
        assert_eq!(parse_name(&mut cursor, &gate), Err(Error::out_of_memory()));
        assert_eq!(cursor.position(), 0);

        let root = [0x00];
        let mut cursor = Cursor::new(&root);
        let gate = FailingGate::fail_at(1);
        assert_eq!(parse_name(&mut cursor, &gate), Ok(String::new()));
        assert_eq!(gate.seen(), 0);
    }
}
