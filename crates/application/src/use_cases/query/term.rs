use pdns_cof_domain::canonical_name;
use std::fmt;
use std::net::IpAddr;

/// What a `/query/{term}` or `/fquery/{term}` path segment refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryTerm {
    /// An IPv4 or IPv6 literal, kept as written (lower-cased) because the
    /// reverse index is keyed by the rdata string the sensor reported.
    Address(String),
    /// A domain name, canonicalized like observation names.
    Name(String),
}

impl QueryTerm {
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        if trimmed.parse::<IpAddr>().is_ok() {
            return Some(QueryTerm::Address(trimmed.to_lowercase()));
        }
        let name = canonical_name(trimmed);
        (!name.is_empty()).then_some(QueryTerm::Name(name))
    }

    pub fn as_str(&self) -> &str {
        match self {
            QueryTerm::Address(a) => a,
            QueryTerm::Name(n) => n,
        }
    }

    pub fn is_address(&self) -> bool {
        matches!(self, QueryTerm::Address(_))
    }
}

impl fmt::Display for QueryTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
