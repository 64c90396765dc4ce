use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use pdns_cof_application::ports::KeyValueStore;
use pdns_cof_domain::DomainError;
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone)]
enum Value {
    Str(String),
    Set(BTreeSet<String>),
    Hash(HashMap<String, i64>),
    Sorted(HashMap<String, f64>),
}

impl Value {
    fn kind(&self) -> &'static str {
        match self {
            Value::Str(_) => "string",
            Value::Set(_) => "set",
            Value::Hash(_) => "hash",
            Value::Sorted(_) => "zset",
        }
    }
}

fn wrong_type(key: &str, found: &Value) -> DomainError {
    DomainError::StoreUnavailable(format!(
        "WRONGTYPE operation against key {key} holding a {}",
        found.kind()
    ))
}

/// In-process store with the same semantics as the Redis commands the
/// aggregation layer issues. Used for `--memory` runs and tests.
///
/// Nothing is persisted; values live as long as the process.
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    data: DashMap<String, Value>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        match self.data.get(key).as_deref() {
            None => Ok(None),
            Some(Value::Str(s)) => Ok(Some(s.clone())),
            Some(other) => Err(wrong_type(key, other)),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
        self.data
            .insert(key.to_string(), Value::Str(value.to_string()));
        Ok(())
    }

    async fn set_if_absent(&self, key: &str, value: &str) -> Result<bool, DomainError> {
        match self.data.entry(key.to_string()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(Value::Str(value.to_string()));
                Ok(true)
            }
        }
    }

    async fn incr_by(&self, key: &str, delta: i64) -> Result<i64, DomainError> {
        let mut entry = self
            .data
            .entry(key.to_string())
            .or_insert_with(|| Value::Str("0".to_string()));
        match entry.value_mut() {
            Value::Str(current) => {
                let n: i64 = current
                    .trim()
                    .parse()
                    .map_err(|_| DomainError::CorruptValue {
                        key: key.to_string(),
                        value: current.clone(),
                    })?;
                let next = n.checked_add(delta).ok_or_else(|| DomainError::CorruptValue {
                    key: key.to_string(),
                    value: current.clone(),
                })?;
                *current = next.to_string();
                Ok(next)
            }
            other => Err(wrong_type(key, other)),
        }
    }

    async fn set_add(&self, key: &str, member: &str) -> Result<bool, DomainError> {
        let mut entry = self
            .data
            .entry(key.to_string())
            .or_insert_with(|| Value::Set(BTreeSet::new()));
        match entry.value_mut() {
            Value::Set(set) => Ok(set.insert(member.to_string())),
            other => Err(wrong_type(key, other)),
        }
    }

    async fn set_members(&self, key: &str) -> Result<Vec<String>, DomainError> {
        match self.data.get(key).as_deref() {
            None => Ok(Vec::new()),
            Some(Value::Set(set)) => Ok(set.iter().cloned().collect()),
            Some(other) => Err(wrong_type(key, other)),
        }
    }

    async fn set_cardinality(&self, key: &str) -> Result<u64, DomainError> {
        match self.data.get(key).as_deref() {
            None => Ok(0),
            Some(Value::Set(set)) => Ok(set.len() as u64),
            Some(other) => Err(wrong_type(key, other)),
        }
    }

    /// The cursor is an offset into the ordered member list.
    async fn set_scan(
        &self,
        key: &str,
        cursor: u64,
        count: usize,
    ) -> Result<(u64, Vec<String>), DomainError> {
        let members = self.set_members(key).await?;
        let start = (cursor as usize).min(members.len());
        let end = start.saturating_add(count.max(1)).min(members.len());
        let next = if end >= members.len() { 0 } else { end as u64 };
        Ok((next, members[start..end].to_vec()))
    }

    async fn hash_incr_by(&self, key: &str, field: &str, delta: i64) -> Result<i64, DomainError> {
        let mut entry = self
            .data
            .entry(key.to_string())
            .or_insert_with(|| Value::Hash(HashMap::new()));
        match entry.value_mut() {
            Value::Hash(hash) => {
                let slot = hash.entry(field.to_string()).or_insert(0);
                *slot = slot.checked_add(delta).ok_or_else(|| DomainError::CorruptValue {
                    key: format!("{key}.{field}"),
                    value: slot.to_string(),
                })?;
                Ok(*slot)
            }
            other => Err(wrong_type(key, other)),
        }
    }

    async fn sorted_incr_by(
        &self,
        key: &str,
        member: &str,
        delta: f64,
    ) -> Result<f64, DomainError> {
        let mut entry = self
            .data
            .entry(key.to_string())
            .or_insert_with(|| Value::Sorted(HashMap::new()));
        match entry.value_mut() {
            Value::Sorted(zset) => {
                let score = zset.entry(member.to_string()).or_insert(0.0);
                *score += delta;
                Ok(*score)
            }
            other => Err(wrong_type(key, other)),
        }
    }

    /// Highest score first; ties in reverse lexicographic order, like `ZREVRANGE`.
    async fn sorted_rev_range_with_scores(
        &self,
        key: &str,
    ) -> Result<Vec<(String, f64)>, DomainError> {
        let mut entries: Vec<(String, f64)> = match self.data.get(key).as_deref() {
            None => Vec::new(),
            Some(Value::Sorted(zset)) => zset.iter().map(|(m, s)| (m.clone(), *s)).collect(),
            Some(other) => return Err(wrong_type(key, other)),
        };
        entries.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| b.0.cmp(&a.0)));
        Ok(entries)
    }
}
