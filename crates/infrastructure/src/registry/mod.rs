use pdns_cof_domain::config::RegistryConfig;
use pdns_cof_domain::{DomainError, RecordTypeRegistry};
use std::path::Path;
use tracing::info;

/// Builds the record type registry from `records-type.json` when configured,
/// or from the built-in IANA table otherwise.
pub fn load_registry(config: &RegistryConfig) -> Result<RecordTypeRegistry, DomainError> {
    let registry = match config.records_type_file.as_deref() {
        Some(path) => load_from_file(path, &config.supported)?,
        None => RecordTypeRegistry::builtin_with(&config.supported),
    };

    if registry.supported().next().is_none() {
        return Err(DomainError::InvalidRegistry(
            "none of the supported codes is present in the registry".to_string(),
        ));
    }

    info!(registry = %registry, "Record type registry loaded");
    Ok(registry)
}

fn load_from_file(path: impl AsRef<Path>, supported: &[u16]) -> Result<RecordTypeRegistry, DomainError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)
        .map_err(|e| DomainError::IoError(format!("{}: {}", path.display(), e)))?;
    RecordTypeRegistry::from_json(&json, supported)
}
