//! Static description of the rdata layout of every decoded record type.
//!
//! Each supported type maps to an ordered list of [`RecordField`]s and every
//! field has one [`FieldKind`], which decides the accessor that can read it.
//! Types missing from the table are kept as raw rdata and described by
//! [`RAW_FIELDS`].

use num_enum::TryFromPrimitive;

use crate::enums::RecordType;

/// Wire representation of a field, and the accessor family that reads it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// IPv4 address
    InAddr,
    /// IPv6 address
    InAddr6,
    U8,
    U16,
    U32,
    /// Domain name, possibly compressed
    Name,
    /// Single printable character-string
    Str,
    /// Binary data running to the end of the rdata
    Bin,
    /// Sequence of character-strings
    Abin,
    /// EDNS option list
    Opt,
}

/// Symbolic id of a record field: the record type code times 100 plus the
/// field position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, TryFromPrimitive)]
#[repr(u32)]
pub enum RecordField {
    AAddr = 101,
    NsNsdname = 201,
    CnameCname = 501,
    SoaMname = 601,
    SoaRname = 602,
    SoaSerial = 603,
    SoaRefresh = 604,
    SoaRetry = 605,
    SoaExpire = 606,
    SoaMinimum = 607,
    PtrDname = 1201,
    HinfoCpu = 1301,
    HinfoOs = 1302,
    MxPreference = 1501,
    MxExchange = 1502,
    TxtData = 1601,
    AaaaAddr = 2801,
    SrvPriority = 3301,
    SrvWeight = 3302,
    SrvPort = 3303,
    SrvTarget = 3304,
    NaptrOrder = 3501,
    NaptrPreference = 3502,
    NaptrFlags = 3503,
    NaptrServices = 3504,
    NaptrRegexp = 3505,
    NaptrReplacement = 3506,
    OptUdpSize = 4101,
    OptVersion = 4102,
    OptFlags = 4103,
    OptOptions = 4104,
    TlsaCertUsage = 5201,
    TlsaSelector = 5202,
    TlsaMatchingType = 5203,
    TlsaData = 5204,
    UriPriority = 25601,
    UriWeight = 25602,
    UriTarget = 25603,
    CaaCritical = 25701,
    CaaTag = 25702,
    CaaValue = 25703,
    /// Type code of a record kept as raw rdata
    RawRrType = 6553601,
    /// Undecoded rdata of a record kept raw
    RawRrData = 6553602,
}

impl RecordField {
    pub fn kind(self) -> FieldKind {
        use RecordField::*;
        match self {
            AAddr => FieldKind::InAddr,
            AaaaAddr => FieldKind::InAddr6,
            NsNsdname | CnameCname | SoaMname | SoaRname | PtrDname | MxExchange | SrvTarget
            | NaptrReplacement => FieldKind::Name,
            SoaSerial | SoaRefresh | SoaRetry | SoaExpire | SoaMinimum => FieldKind::U32,
            MxPreference | SrvPriority | SrvWeight | SrvPort | NaptrOrder | NaptrPreference
            | OptUdpSize | OptFlags | UriPriority | UriWeight | RawRrType => FieldKind::U16,
            OptVersion | TlsaCertUsage | TlsaSelector | TlsaMatchingType | CaaCritical => {
                FieldKind::U8
            }
            HinfoCpu | HinfoOs | NaptrFlags | NaptrServices | NaptrRegexp | CaaTag => {
                FieldKind::Str
            }
            TxtData => FieldKind::Abin,
            TlsaData | UriTarget | CaaValue | RawRrData => FieldKind::Bin,
            OptOptions => FieldKind::Opt,
        }
    }
}

/// Decoding rules for one record type
#[derive(Debug, PartialEq, Eq)]
pub struct Grammar {
    pub rtype: RecordType,
    /// Fields in wire order
    pub fields: &'static [RecordField],
    /// Defined by RFC 1035
    pub base: bool,
}

impl Grammar {
    /// Number of embedded domain names
    pub fn names(&self) -> usize {
        self.fields
            .iter()
            .filter(|field| field.kind() == FieldKind::Name)
            .count()
    }

    pub fn has(&self, field: RecordField) -> bool {
        self.fields.contains(&field)
    }
}

pub const RAW_FIELDS: &[RecordField] = &[RecordField::RawRrType, RecordField::RawRrData];

macro_rules! grammar {
    ($rtype:ident, $base:expr, [$($field:ident),* $(,)?]) => {
        Grammar {
            rtype: RecordType::$rtype,
            fields: &[$(RecordField::$field),*],
            base: $base,
        }
    };
}

static GRAMMARS: &[Grammar] = &[
    grammar!(A, true, [AAddr]),
    grammar!(NS, true, [NsNsdname]),
    grammar!(CNAME, true, [CnameCname]),
    grammar!(
        SOA,
        true,
        [SoaMname, SoaRname, SoaSerial, SoaRefresh, SoaRetry, SoaExpire, SoaMinimum]
    ),
    grammar!(PTR, true, [PtrDname]),
    grammar!(HINFO, true, [HinfoCpu, HinfoOs]),
    grammar!(MX, true, [MxPreference, MxExchange]),
    grammar!(TXT, true, [TxtData]),
    grammar!(AAAA, false, [AaaaAddr]),
    grammar!(SRV, false, [SrvPriority, SrvWeight, SrvPort, SrvTarget]),
    grammar!(
        NAPTR,
        false,
        [
            NaptrOrder,
            NaptrPreference,
            NaptrFlags,
            NaptrServices,
            NaptrRegexp,
            NaptrReplacement,
        ]
    ),
    grammar!(OPT, false, [OptUdpSize, OptVersion, OptFlags, OptOptions]),
    grammar!(
        TLSA,
        false,
        [TlsaCertUsage, TlsaSelector, TlsaMatchingType, TlsaData]
    ),
    grammar!(URI, false, [UriPriority, UriWeight, UriTarget]),
    grammar!(CAA, false, [CaaCritical, CaaTag, CaaValue]),
];

/// Grammar for `rtype`, or `None` when records of that type are kept raw.
pub fn grammar(rtype: RecordType) -> Option<&'static Grammar> {
    GRAMMARS.iter().find(|grammar| grammar.rtype == rtype)
}
