use num_enum::TryFromPrimitive;

use std::convert::TryFrom;

#[derive(Clone, Copy, Debug, PartialEq, Eq, TryFromPrimitive)]
#[repr(u16)]
pub enum RecordType {
    /// IPv4 host address
    A = 1,
    /// Authoritative name server
    NS = 2,
    /// Canonical name for an alias
    CNAME = 5,
    /// Start of a zone of authority
    SOA = 6,
    /// Domain name pointer
    PTR = 12,
    /// Host CPU and OS
    HINFO = 13,
    /// Mail exchange
    MX = 15,
    /// Text strings
    TXT = 16,
    /// Security signature, kept as raw rdata
    SIG = 24,
    /// IPv6 host address
    AAAA = 28,
    /// Server selection
    SRV = 33,
    /// Naming authority pointer
    NAPTR = 35,
    /// Delegation name
    DNAME = 39,
    /// EDNS pseudo record
    OPT = 41,
    /// Delegation signer
    DS = 43,
    /// SSH key fingerprint
    SSHFP = 44,
    /// DNSSEC signature
    RRSIG = 46,
    /// Next secure record
    NSEC = 47,
    /// DNSSEC public key
    DNSKEY = 48,
    /// DANE certificate association
    TLSA = 52,
    /// Service binding
    SVCB = 64,
    /// HTTPS service binding
    HTTPS = 65,
    /// Transaction signature
    TSIG = 250,
    /// Zone transfer
    AXFR = 252,
    /// Any record type
    ANY = 255,
    /// Uniform resource identifier
    URI = 256,
    /// Certification authority restriction
    CAA = 257,
    UNKNOWN,
}

impl RecordType {
    pub fn from_raw(val: u16) -> Self {
        RecordType::try_from(val).unwrap_or(RecordType::UNKNOWN)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, TryFromPrimitive)]
#[repr(u16)]
pub enum RecordClass {
    IN = 1,
    CH = 3,
    HS = 4,
    NONE = 254,
    ANY = 255,
    UNKNOWN,
}

impl RecordClass {
    pub fn from_raw(val: u16) -> Self {
        RecordClass::try_from(val).unwrap_or(RecordClass::UNKNOWN)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, TryFromPrimitive)]
#[repr(u16)]
pub enum OpCode {
    QUERY = 0,
    IQUERY = 1,
    STATUS = 2,
    NOTIFY = 4,
    UPDATE = 5,
    DSO = 6,
    UNKNOWN,
}

impl OpCode {
    pub fn from_raw(val: u16) -> Self {
        OpCode::try_from(val).unwrap_or(OpCode::UNKNOWN)
    }
}

/// Response code, including the values only reachable through the EDNS
/// extended rcode bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, TryFromPrimitive)]
#[repr(u16)]
pub enum ResponseCode {
    NOERROR = 0,
    FORMERR = 1,
    SERVFAIL = 2,
    NXDOMAIN = 3,
    NOTIMP = 4,
    REFUSED = 5,
    YXDOMAIN = 6,
    YXRRSET = 7,
    NXRRSET = 8,
    NOTAUTH = 9,
    NOTZONE = 10,
    /// Unsupported EDNS version
    BADVERS = 16,
    /// Bad or missing server cookie
    BADCOOKIE = 23,
    UNKNOWN,
}

impl ResponseCode {
    pub fn from_raw(val: u16) -> Self {
        ResponseCode::try_from(val).unwrap_or(ResponseCode::UNKNOWN)
    }
}

/// Indicates whether the message is a query or response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum QueryResponse {
    Query = 0,
    Response = 1,
}

/// Resource record sections of a message
#[derive(Clone, Copy, Debug, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum Section {
    Answer = 1,
    Authority = 2,
    Additional = 3,
}
