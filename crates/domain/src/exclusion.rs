use aho_corasick::AhoCorasick;
use std::fmt;

/// Default exclusions: DNSBL and ASN lookup noise.
pub const DEFAULT_EXCLUSIONS: [&str; 2] = ["spamhaus.org", "asn.cymru.com"];

/// Substring filter applied to observation names before aggregation.
///
/// All patterns are compiled into one automaton, so a check costs a single
/// pass over the name regardless of how many substrings are configured.
#[derive(Clone)]
pub struct ExclusionList {
    patterns: Vec<String>,
    automaton: Option<AhoCorasick>,
}

impl ExclusionList {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns: Vec<String> = patterns
            .into_iter()
            .map(|p| p.as_ref().trim().to_ascii_lowercase())
            .filter(|p| !p.is_empty())
            .collect();

        // Plain substrings of bounded size never fail to compile.
        let automaton = if patterns.is_empty() {
            None
        } else {
            AhoCorasick::builder()
                .ascii_case_insensitive(true)
                .build(&patterns)
                .ok()
        };

        Self {
            patterns,
            automaton,
        }
    }

    pub fn empty() -> Self {
        Self::new(std::iter::empty::<&str>())
    }

    /// Returns the first configured substring contained in `name`.
    pub fn matching(&self, name: &str) -> Option<&str> {
        let automaton = self.automaton.as_ref()?;
        automaton
            .find(name)
            .map(|m| self.patterns[m.pattern().as_usize()].as_str())
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        self.matching(name).is_some()
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl Default for ExclusionList {
    fn default() -> Self {
        Self::new(DEFAULT_EXCLUSIONS)
    }
}

impl fmt::Debug for ExclusionList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExclusionList")
            .field("patterns", &self.patterns)
            .finish()
    }
}
