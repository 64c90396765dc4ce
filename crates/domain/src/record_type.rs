use crate::errors::DomainError;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

/// Codes aggregated and served by default: A, NS, CNAME, MX, TXT, AAAA, SRV, RRSIG.
pub const DEFAULT_SUPPORTED_CODES: [u16; 8] = [1, 2, 5, 15, 16, 28, 33, 46];

/// Numeric code of TXT records, whose rdata gets one leading quote removed.
pub const TXT_CODE: u16 = 16;

/// IANA resource record TYPE assignments (RFC 1035 and successors).
const IANA_TYPES: &[(&str, u16)] = &[
    ("A", 1),
    ("NS", 2),
    ("MD", 3),
    ("MF", 4),
    ("CNAME", 5),
    ("SOA", 6),
    ("MB", 7),
    ("MG", 8),
    ("MR", 9),
    ("NULL", 10),
    ("WKS", 11),
    ("PTR", 12),
    ("HINFO", 13),
    ("MINFO", 14),
    ("MX", 15),
    ("TXT", 16),
    ("RP", 17),
    ("AFSDB", 18),
    ("X25", 19),
    ("ISDN", 20),
    ("RT", 21),
    ("NSAP", 22),
    ("NSAP-PTR", 23),
    ("SIG", 24),
    ("KEY", 25),
    ("PX", 26),
    ("GPOS", 27),
    ("AAAA", 28),
    ("LOC", 29),
    ("NXT", 30),
    ("EID", 31),
    ("NIMLOC", 32),
    ("SRV", 33),
    ("ATMA", 34),
    ("NAPTR", 35),
    ("KX", 36),
    ("CERT", 37),
    ("A6", 38),
    ("DNAME", 39),
    ("SINK", 40),
    ("OPT", 41),
    ("APL", 42),
    ("DS", 43),
    ("SSHFP", 44),
    ("IPSECKEY", 45),
    ("RRSIG", 46),
    ("NSEC", 47),
    ("DNSKEY", 48),
    ("DHCID", 49),
    ("NSEC3", 50),
    ("NSEC3PARAM", 51),
    ("TLSA", 52),
    ("HIP", 55),
    ("NINFO", 56),
    ("RKEY", 57),
    ("TALINK", 58),
    ("CDS", 59),
    ("SPF", 99),
    ("UINFO", 100),
    ("UID", 101),
    ("GID", 102),
    ("UNSPEC", 103),
    ("NID", 104),
    ("L32", 105),
    ("L64", 106),
    ("LP", 107),
    ("EUI48", 108),
    ("EUI64", 109),
    ("TKEY", 249),
    ("TSIG", 250),
    ("IXFR", 251),
    ("AXFR", 252),
    ("MAILB", 253),
    ("MAILA", 254),
    ("*", 255),
    ("URI", 256),
    ("CAA", 257),
    ("TA", 32768),
    ("DLV", 32769),
    ("Reserved", 65535),
];

/// One entry of a `records-type.json` file.
///
/// The file mirrors the IANA registry export, so codes arrive as strings and
/// every other column (`Reference`, `Meaning`, ...) is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordTypeEntry {
    #[serde(alias = "Type")]
    pub r#type: String,
    #[serde(alias = "Value")]
    pub value: String,
}

/// Static mapping between symbolic record type names and numeric codes,
/// restricted to a supported subset for aggregation and queries.
///
/// Built once at startup and shared behind an `Arc`; never mutated afterwards.
#[derive(Debug, Clone)]
pub struct RecordTypeRegistry {
    by_name: HashMap<String, u16>,
    by_code: BTreeMap<u16, String>,
    supported: BTreeSet<u16>,
}

impl RecordTypeRegistry {
    /// Registry over the built-in IANA table with the default supported set.
    pub fn builtin() -> Self {
        Self::builtin_with(&DEFAULT_SUPPORTED_CODES)
    }

    pub fn builtin_with(supported: &[u16]) -> Self {
        Self::from_pairs(
            IANA_TYPES.iter().map(|(n, c)| (n.to_string(), *c)),
            supported.iter().copied(),
        )
    }

    pub fn from_pairs<I, S>(pairs: I, supported: S) -> Self
    where
        I: IntoIterator<Item = (String, u16)>,
        S: IntoIterator<Item = u16>,
    {
        let mut by_name = HashMap::new();
        let mut by_code = BTreeMap::new();
        for (name, code) in pairs {
            by_name.insert(name.to_ascii_uppercase(), code);
            by_code.entry(code).or_insert(name);
        }
        let supported = supported
            .into_iter()
            .filter(|c| by_code.contains_key(c))
            .collect();

        Self {
            by_name,
            by_code,
            supported,
        }
    }

    /// Parses a `records-type.json` document (JSON array of `{type, value}`).
    pub fn from_json(json: &str, supported: &[u16]) -> Result<Self, DomainError> {
        let entries: Vec<RecordTypeEntry> = serde_json::from_str(json)
            .map_err(|e| DomainError::InvalidRegistry(e.to_string()))?;

        let mut pairs = Vec::with_capacity(entries.len());
        for entry in entries {
            let code = entry.value.trim().parse::<u16>().map_err(|_| {
                DomainError::InvalidRegistry(format!(
                    "type {} has non-numeric value {:?}",
                    entry.r#type, entry.value
                ))
            })?;
            pairs.push((entry.r#type, code));
        }

        if pairs.is_empty() {
            return Err(DomainError::InvalidRegistry(
                "registry file contains no record types".to_string(),
            ));
        }

        Ok(Self::from_pairs(pairs, supported.iter().copied()))
    }

    /// Resolves a symbolic type name ("AAAA", "aaaa") to its numeric code.
    pub fn code_for(&self, name: &str) -> Result<u16, DomainError> {
        self.by_name
            .get(name.trim().to_ascii_uppercase().as_str())
            .copied()
            .ok_or_else(|| DomainError::UnknownType(name.to_string()))
    }

    pub fn name_for(&self, code: u16) -> Option<&str> {
        self.by_code.get(&code).map(String::as_str)
    }

    pub fn is_supported(&self, code: u16) -> bool {
        self.supported.contains(&code)
    }

    /// Supported `(code, name)` pairs in ascending code order.
    pub fn supported(&self) -> impl Iterator<Item = (u16, &str)> + '_ {
        self.supported
            .iter()
            .filter_map(|code| self.name_for(*code).map(|name| (*code, name)))
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

impl Default for RecordTypeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Display for RecordTypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.supported().map(|(_, name)| name).collect();
        write!(
            f,
            "{} types, supported: {}",
            self.by_code.len(),
            names.join(",")
        )
    }
}
