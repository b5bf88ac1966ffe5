use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::field::Field;
use crate::core::overlay::OverlayBundle;

/// Identifiers of the credential whose overlay bundle is being resolved.
///
/// Either identifier may be missing — proof-request templates carry no
/// concrete credential yet — and resolvers must tolerate that.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CredentialIdentifiers {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_definition_id: Option<String>,
}

/// Caller-supplied display hints passed along to the resolver.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolveMeta {
    /// Label of the connection the credential came through.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Caller-suggested credential name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cred_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cred_connection_id: Option<String>,
}

/// Everything a resolver gets to work with for one credential.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ResolveParams {
    pub identifiers: CredentialIdentifiers,
    /// The credential's fields, empty in proof context or for templates.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<Field>,
    pub meta: ResolveMeta,
    /// BCP 47 language tag for localized labels.
    pub language: String,
}

/// The external collaborator that supplies presentation metadata (labels,
/// formats, branding, PII flags) for a credential's identifiers.
///
/// Resolution may hit the network or disk, hence the async boundary — this
/// is the mapping engine's only suspension point. Implementations must
/// tolerate partial identifiers and empty attribute lists, and may return a
/// bundle with any subset of fields populated. Retry and caching policy, if
/// any, belongs to the implementation; the engine calls at most once per
/// mapping and propagates failure untouched.
#[async_trait]
pub trait OverlayResolver: Send + Sync {
    async fn resolve_bundle(&self, params: ResolveParams) -> Result<OverlayBundle>;
}
