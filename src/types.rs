//! RFC-bounded DNS value types and name helpers.
//!
//! These types back the validation the emulator performs on hosted zone names,
//! record set names, record types and TTLs:
//! - RFC 1035: Domain Names - Implementation and Specification
//! - RFC 2181: Clarifications to the DNS Specification
//!
//! # Size Limits (from RFCs)
//!
//! | Field | Limit | Reference |
//! |-------|-------|-----------|
//! | Label | 1-63 octets | RFC 1035 §2.3.4 |
//! | Domain name | ≤255 octets | RFC 1035 §2.3.4 |
//! | TTL | 0 to 2^31-1 seconds | RFC 2181 §8 |
//!
//! Route53 compares names case-insensitively and treats `example.com` and
//! `example.com.` as the same name; [`normalize_name`] implements that rule.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Maximum length of a single DNS label (RFC 1035 §2.3.4).
pub const MAX_LABEL_LEN: usize = 63;

/// Maximum length of a full domain name including separators (RFC 1035 §2.3.4).
pub const MAX_DOMAIN_LEN: usize = 255;

/// Maximum TTL value per RFC 2181 §8: 2^31 - 1 seconds.
pub const MAX_TTL: u32 = 2_147_483_647;

/// A DNS label - a single component of a domain name.
///
/// Labels are limited to 63 octets (RFC 1035 §2.3.4).
///
/// This is a fixed-size, Copy type with no heap allocation.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(C)]
pub struct Label {
    /// Length of the label (1-63).
    len: u8,
    /// Label data, padded to max size.
    data: [u8; MAX_LABEL_LEN],
}

impl Label {
    /// Creates a new label from a byte slice.
    ///
    /// Returns `None` if the slice is empty or exceeds 63 bytes.
    #[inline]
    pub const fn new(bytes: &[u8]) -> Option<Self> {
        if bytes.is_empty() || bytes.len() > MAX_LABEL_LEN {
            return None;
        }

        let mut data = [0u8; MAX_LABEL_LEN];
        let mut i = 0;
        while i < bytes.len() {
            data[i] = bytes[i];
            i += 1;
        }

        Some(Self {
            len: bytes.len() as u8,
            data,
        })
    }

    /// Creates a new label from a string slice.
    ///
    /// Returns `None` if the string is empty or exceeds 63 bytes.
    #[inline]
    pub const fn from_str(s: &str) -> Option<Self> {
        Self::new(s.as_bytes())
    }

    /// Returns the label as a byte slice.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len as usize]
    }

    /// Returns the length of the label in bytes.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len as usize
    }

    /// Returns true if the label is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the label as a string slice, if valid UTF-8.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(self.as_bytes()).ok()
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            Some(s) => write!(f, "Label({:?})", s),
            None => write!(f, "Label({:?})", self.as_bytes()),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            Some(s) => write!(f, "{}", s),
            None => write!(f, "{:?}", self.as_bytes()),
        }
    }
}

/// A DNS domain name with fixed-size storage.
///
/// Domain names are limited to 255 octets total (RFC 1035 §2.3.4).
/// This includes the length octets for each label and the terminating zero.
#[derive(Clone, PartialEq, Eq, Hash)]
#[repr(C)]
pub struct DomainName {
    /// Length of the domain name in wire format.
    len: u8,
    /// Domain name data in wire format (length-prefixed labels, null terminated).
    data: [u8; MAX_DOMAIN_LEN],
}

impl DomainName {
    /// Creates a new domain name from a dotted string (e.g., "example.com").
    ///
    /// A single trailing dot is accepted. Returns `None` if the name has an
    /// empty label, a label over 63 octets, or exceeds 255 octets in total.
    pub fn from_dotted(s: &str) -> Option<Self> {
        let s = s.strip_suffix('.').unwrap_or(s);
        if s.is_empty() {
            // Root domain
            return Some(Self::default());
        }

        let mut data = [0u8; MAX_DOMAIN_LEN];
        let mut pos = 0usize;

        for label in s.split('.') {
            let label_bytes = label.as_bytes();
            if label_bytes.is_empty() || label_bytes.len() > MAX_LABEL_LEN {
                return None;
            }

            // Room for the length byte, the label and the null terminator
            if pos + 1 + label_bytes.len() >= MAX_DOMAIN_LEN {
                return None;
            }

            data[pos] = label_bytes.len() as u8;
            pos += 1;

            data[pos..pos + label_bytes.len()].copy_from_slice(label_bytes);
            pos += label_bytes.len();
        }

        data[pos] = 0;
        pos += 1;

        Some(Self {
            len: pos as u8,
            data,
        })
    }

    /// Returns the domain name in dotted notation, without a trailing dot.
    pub fn to_dotted(&self) -> String {
        let mut result = String::with_capacity(self.len as usize);
        for label in self.labels() {
            if !result.is_empty() {
                result.push('.');
            }
            result.push_str(&String::from_utf8_lossy(label.as_bytes()));
        }
        result
    }

    /// Returns the labels of the name, leftmost first.
    pub fn labels(&self) -> Vec<Label> {
        let mut labels = Vec::new();
        let mut pos = 0usize;

        while pos < self.len as usize {
            let label_len = self.data[pos] as usize;
            if label_len == 0 {
                break;
            }
            pos += 1;
            if let Some(label) = Label::new(&self.data[pos..pos + label_len]) {
                labels.push(label);
            }
            pos += label_len;
        }

        labels
    }

    /// Returns the wire-format length of the domain name.
    #[inline]
    pub const fn wire_len(&self) -> usize {
        self.len as usize
    }

    /// Returns the wire-format bytes.
    #[inline]
    pub fn as_wire_bytes(&self) -> &[u8] {
        &self.data[..self.len as usize]
    }

    /// Returns true if this is the root domain.
    #[inline]
    pub const fn is_root(&self) -> bool {
        self.len == 1 && self.data[0] == 0
    }
}

impl fmt::Debug for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DomainName({:?})", self.to_dotted())
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_dotted())
    }
}

impl Default for DomainName {
    fn default() -> Self {
        Self {
            len: 1,
            data: [0u8; MAX_DOMAIN_LEN], // Root domain
        }
    }
}

/// Normalizes a DNS name for comparison: ASCII lower-case, no trailing dot.
pub fn normalize_name(name: &str) -> String {
    name.strip_suffix('.').unwrap_or(name).to_ascii_lowercase()
}

/// Returns true if both names refer to the same DNS name.
pub fn names_equal(a: &str, b: &str) -> bool {
    normalize_name(a) == normalize_name(b)
}

/// Returns true if `name` is the zone apex or a name below it.
pub fn is_within_zone(name: &str, zone: &str) -> bool {
    let name = normalize_name(name);
    let zone = normalize_name(zone);
    if zone.is_empty() {
        return true;
    }
    name == zone || name.ends_with(&format!(".{}", zone))
}

/// Sort key used by `ListHostedZonesByName`: lower-cased labels in reverse
/// order, so `a.example.com` sorts as `[com, example, a]`.
///
/// Comparing label vectors orders names label by label; `example-x.com`
/// sorts after every name below `example.com`.
pub fn reversed_label_key(name: &str) -> Vec<String> {
    let normalized = normalize_name(name);
    if normalized.is_empty() {
        return Vec::new();
    }
    normalized.rsplit('.').map(str::to_string).collect()
}

/// DNS Time To Live value.
///
/// Per RFC 2181 §8, TTL is an unsigned 32-bit integer with a maximum
/// value of 2^31 - 1 (2,147,483,647) seconds. The MSB must be zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[derive(Serialize, Deserialize)]
#[repr(transparent)]
pub struct Ttl(u32);

impl Ttl {
    /// Zero TTL - record should not be cached (RFC 1035 §3.2.1).
    pub const ZERO: Ttl = Ttl(0);

    /// Five minutes, the Route53 console default.
    pub const FIVE_MINUTES: Ttl = Ttl(300);

    /// One hour TTL.
    pub const ONE_HOUR: Ttl = Ttl(3600);

    /// One day TTL.
    pub const ONE_DAY: Ttl = Ttl(86400);

    /// Maximum valid TTL per RFC 2181 §8.
    pub const MAX: Ttl = Ttl(MAX_TTL);

    /// Creates a new TTL, clamping to the RFC maximum if necessary.
    #[inline]
    pub const fn new(seconds: u32) -> Self {
        if seconds > MAX_TTL {
            Self(MAX_TTL)
        } else {
            Self(seconds)
        }
    }

    /// Creates a TTL from seconds, returning None if it exceeds the RFC maximum.
    #[inline]
    pub const fn try_new(seconds: u32) -> Option<Self> {
        if seconds > MAX_TTL {
            None
        } else {
            Some(Self(seconds))
        }
    }

    /// Parses a TTL from its decimal string form, rejecting out-of-range values.
    pub fn parse(s: &str) -> Option<Self> {
        s.trim().parse::<u32>().ok().and_then(Self::try_new)
    }

    /// Returns the TTL value in seconds.
    #[inline]
    pub const fn as_secs(&self) -> u32 {
        self.0
    }

    /// Returns true if the TTL is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl From<u32> for Ttl {
    #[inline]
    fn from(secs: u32) -> Self {
        Self::new(secs)
    }
}

impl From<Ttl> for u32 {
    #[inline]
    fn from(ttl: Ttl) -> Self {
        ttl.0
    }
}

impl fmt::Display for Ttl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Record types accepted in Route53 resource record sets.
///
/// Discriminants are the RFC type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize)]
#[repr(u16)]
pub enum RecordType {
    /// Host address (RFC 1035).
    A = 1,
    /// Authoritative name server (RFC 1035).
    NS = 2,
    /// Canonical name for an alias (RFC 1035).
    CNAME = 5,
    /// Start of authority (RFC 1035).
    SOA = 6,
    /// Domain name pointer (RFC 1035).
    PTR = 12,
    /// Mail exchange (RFC 1035).
    MX = 15,
    /// Text strings (RFC 1035).
    TXT = 16,
    /// IPv6 host address (RFC 3596).
    AAAA = 28,
    /// Server selection (RFC 2782).
    SRV = 33,
    /// Naming authority pointer (RFC 3403).
    NAPTR = 35,
    /// Delegation signer (RFC 4034).
    DS = 43,
    /// Sender policy framework (RFC 4408, deprecated but still accepted).
    SPF = 99,
    /// Certification Authority Authorization (RFC 8659).
    CAA = 257,
}

impl RecordType {
    /// All record types, in type-code order.
    pub const ALL: [RecordType; 13] = [
        Self::A,
        Self::NS,
        Self::CNAME,
        Self::SOA,
        Self::PTR,
        Self::MX,
        Self::TXT,
        Self::AAAA,
        Self::SRV,
        Self::NAPTR,
        Self::DS,
        Self::SPF,
        Self::CAA,
    ];

    /// Creates a RecordType from a u16 value.
    pub const fn from_u16(value: u16) -> Option<Self> {
        match value {
            1 => Some(Self::A),
            2 => Some(Self::NS),
            5 => Some(Self::CNAME),
            6 => Some(Self::SOA),
            12 => Some(Self::PTR),
            15 => Some(Self::MX),
            16 => Some(Self::TXT),
            28 => Some(Self::AAAA),
            33 => Some(Self::SRV),
            35 => Some(Self::NAPTR),
            43 => Some(Self::DS),
            99 => Some(Self::SPF),
            257 => Some(Self::CAA),
            _ => None,
        }
    }

    /// Creates a RecordType from a string, ignoring case.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Some(Self::A),
            "NS" => Some(Self::NS),
            "CNAME" => Some(Self::CNAME),
            "SOA" => Some(Self::SOA),
            "PTR" => Some(Self::PTR),
            "MX" => Some(Self::MX),
            "TXT" => Some(Self::TXT),
            "AAAA" => Some(Self::AAAA),
            "SRV" => Some(Self::SRV),
            "NAPTR" => Some(Self::NAPTR),
            "DS" => Some(Self::DS),
            "SPF" => Some(Self::SPF),
            "CAA" => Some(Self::CAA),
            _ => None,
        }
    }

    /// Returns the type code as a u16.
    #[inline]
    pub const fn as_u16(&self) -> u16 {
        *self as u16
    }

    /// Returns the type as a string.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::NS => "NS",
            Self::CNAME => "CNAME",
            Self::SOA => "SOA",
            Self::PTR => "PTR",
            Self::MX => "MX",
            Self::TXT => "TXT",
            Self::AAAA => "AAAA",
            Self::SRV => "SRV",
            Self::NAPTR => "NAPTR",
            Self::DS => "DS",
            Self::SPF => "SPF",
            Self::CAA => "CAA",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
