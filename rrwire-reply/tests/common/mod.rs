//! Builds uncompressed DNS responses for the reply tests.
#![allow(dead_code)]

use byteorder::{BigEndian, WriteBytesExt};

pub const T_CNAME: u16 = 5;
pub const T_MX: u16 = 15;
pub const T_TXT: u16 = 16;
pub const C_IN: u16 = 1;

fn write_name(buf: &mut Vec<u8>, name: &str) {
    for label in name.split('.').filter(|label| !label.is_empty()) {
        buf.write_u8(label.len() as u8).unwrap();
        buf.extend_from_slice(label.as_bytes());
    }
    buf.write_u8(0).unwrap();
}

pub struct Packet {
    qid: u16,
    flags: u16,
    pub questions: Vec<Vec<u8>>,
    pub answers: Vec<Vec<u8>>,
}

impl Packet {
    /// Authoritative response with no error
    pub fn response(qid: u16) -> Self {
        Packet {
            qid,
            flags: 0x8400,
            questions: Vec::new(),
            answers: Vec::new(),
        }
    }

    pub fn question(mut self, name: &str, rtype: u16) -> Self {
        let mut buf = Vec::new();
        write_name(&mut buf, name);
        buf.write_u16::<BigEndian>(rtype).unwrap();
        buf.write_u16::<BigEndian>(C_IN).unwrap();
        self.questions.push(buf);
        self
    }

    pub fn answer(mut self, name: &str, rtype: u16, ttl: u32, rdata: &[u8]) -> Self {
        let mut buf = Vec::new();
        write_name(&mut buf, name);
        buf.write_u16::<BigEndian>(rtype).unwrap();
        buf.write_u16::<BigEndian>(C_IN).unwrap();
        buf.write_u32::<BigEndian>(ttl).unwrap();
        buf.write_u16::<BigEndian>(rdata.len() as u16).unwrap();
        buf.extend_from_slice(rdata);
        self.answers.push(buf);
        self
    }

    pub fn txt(self, name: &str, ttl: u32, strings: &[&[u8]]) -> Self {
        let mut rdata = Vec::new();
        for string in strings {
            rdata.write_u8(string.len() as u8).unwrap();
            rdata.extend_from_slice(string);
        }
        self.answer(name, T_TXT, ttl, &rdata)
    }

    pub fn cname(self, name: &str, ttl: u32, target: &str) -> Self {
        let mut rdata = Vec::new();
        write_name(&mut rdata, target);
        self.answer(name, T_CNAME, ttl, &rdata)
    }

    pub fn mx(self, name: &str, ttl: u32, preference: u16, exchange: &str) -> Self {
        let mut rdata = Vec::new();
        rdata.write_u16::<BigEndian>(preference).unwrap();
        write_name(&mut rdata, exchange);
        self.answer(name, T_MX, ttl, &rdata)
    }

    pub fn data(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.write_u16::<BigEndian>(self.qid).unwrap();
        buf.write_u16::<BigEndian>(self.flags).unwrap();
        buf.write_u16::<BigEndian>(self.questions.len() as u16).unwrap();
        buf.write_u16::<BigEndian>(self.answers.len() as u16).unwrap();
        buf.write_u16::<BigEndian>(0).unwrap();
        buf.write_u16::<BigEndian>(0).unwrap();
        for question in &self.questions {
            buf.extend_from_slice(question);
        }
        for answer in &self.answers {
            buf.extend_from_slice(answer);
        }
        buf
    }
}
