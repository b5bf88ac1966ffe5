use tracing::debug;

/// Name shown when no meaningful credential name can be resolved.
pub const FALLBACK_CREDENTIAL_NAME: &str = "Credential";

/// Tag issuers leave on credential definitions they never bothered to name.
pub const DEFAULT_CRED_DEF_TAG: &str = "default";

/// Whether a candidate name is meaningful enough to display.
///
/// Rejects absent, blank, and placeholder names. The placeholder comparison
/// is an exact, case-sensitive match: a credential genuinely named
/// "Credential" is treated as a placeholder and replaced. Known limitation,
/// kept for compatibility with existing wallets.
pub fn is_valid_credential_name(name: Option<&str>) -> bool {
    match name {
        Some(name) => {
            name != DEFAULT_CRED_DEF_TAG
                && name != FALLBACK_CREDENTIAL_NAME
                && !name.trim().is_empty()
        }
        None => false,
    }
}

/// Picks the effective display name for a credential.
///
/// Waterfall: overlay-declared name, then credential-definition tag, then
/// schema name, then [`FALLBACK_CREDENTIAL_NAME`]. The first valid candidate
/// wins and later candidates are not consulted.
pub fn effective_credential_name(
    overlay_name: Option<&str>,
    cred_def_tag: Option<&str>,
    schema_name: Option<&str>,
) -> String {
    for candidate in [overlay_name, cred_def_tag, schema_name] {
        if is_valid_credential_name(candidate) {
            return candidate.unwrap_or_default().to_string();
        }
    }
    FALLBACK_CREDENTIAL_NAME.to_string()
}

/// Failure to interpret a legacy schema identifier.
#[derive(Debug, thiserror::Error)]
pub enum SchemaIdError {
    /// The identifier does not have the `did:marker:name:version` segment count.
    #[error("expected 4 segments in schema id, found {0}")]
    SegmentCount(usize),

    /// The marker segment is not the schema marker (`2`).
    #[error("unexpected schema id marker `{0}`")]
    Marker(String),

    /// The name segment is empty.
    #[error("schema id has an empty name segment")]
    EmptyName,
}

/// A legacy schema identifier, `did:2:name:version`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedSchemaId {
    pub did: String,
    pub name: String,
    pub version: String,
}

/// Parses a legacy schema identifier into its segments.
pub fn parse_legacy_schema_id(id: &str) -> Result<ParsedSchemaId, SchemaIdError> {
    let segments: Vec<&str> = id.split(':').collect();
    if segments.len() != 4 {
        return Err(SchemaIdError::SegmentCount(segments.len()));
    }
    if segments[1] != "2" {
        return Err(SchemaIdError::Marker(segments[1].to_string()));
    }
    if segments[2].is_empty() {
        return Err(SchemaIdError::EmptyName);
    }
    Ok(ParsedSchemaId {
        did: segments[0].to_string(),
        name: segments[2].to_string(),
        version: segments[3].to_string(),
    })
}

/// Derives a schema-name candidate from a schema identifier. A malformed
/// identifier is not an error here, just the absence of a candidate for the
/// name waterfall.
pub fn schema_name_from_id(id: &str) -> Option<String> {
    parse_legacy_schema_id(id)
        .map(|parsed| parsed.name)
        .map_err(|err| debug!(schema_id = id, %err, "schema id yields no name candidate"))
        .ok()
}
