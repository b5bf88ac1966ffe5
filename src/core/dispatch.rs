use anyhow::{Context, Result};
use serde_json::Value;
use tracing::debug;

use crate::resolver::{CredentialIdentifiers, OverlayResolver, ResolveMeta, ResolveParams};

use super::card::{MapOptions, WalletCredentialCardData};
use super::credential::{AnoncredsCredential, CredentialRecord, W3cCredential, W3cCredentialPayload};
use super::field::{Attribute, Field};
use super::map_to_card::{
    issuer_display_name, map_anoncreds_to_card, map_w3c_to_card, W3cCardInput, SUBJECT_ID_KEY,
};
use super::name::{effective_credential_name, schema_name_from_id};
use super::overlay::OverlayBundle;

/// One mapping request: the credential to render plus everything the caller
/// already knows about it.
#[derive(Clone, Debug)]
pub struct CardRequest<'a> {
    pub credential: Option<&'a CredentialRecord>,
    /// Pre-resolved overlay to reuse instead of calling the resolver
    /// (subject-claim credentials only).
    pub overlay: Option<&'a OverlayBundle>,
    pub options: MapOptions,
    /// Caller-suggested credential name, forwarded to the resolver.
    pub cred_name: Option<String>,
    /// BCP 47 language tag for localized labels.
    pub language: String,
}

impl Default for CardRequest<'_> {
    fn default() -> Self {
        Self {
            credential: None,
            overlay: None,
            options: MapOptions::default(),
            cred_name: None,
            language: "en".to_string(),
        }
    }
}

/// Maps any supported credential to the unified card view-model.
///
/// Returns `Ok(None)` when no credential is named — callers treat that as
/// "nothing to render yet", not as an error. A resolver failure is the only
/// error path; it propagates untouched and no partial view-model is produced.
///
/// This function performs no caching: given a stable resolver response, the
/// same request always produces the same card.
pub async fn map_credential_to_card<R>(
    request: &CardRequest<'_>,
    resolver: &R,
) -> Result<Option<WalletCredentialCardData>>
where
    R: OverlayResolver + ?Sized,
{
    let Some(credential) = request.credential else {
        return Ok(None);
    };

    match credential {
        CredentialRecord::Anoncreds(record) => {
            dispatch_anoncreds(record, request, resolver).await.map(Some)
        }
        CredentialRecord::W3c(record) => dispatch_w3c(record, request, resolver).await.map(Some),
    }
}

async fn dispatch_anoncreds<R>(
    record: &AnoncredsCredential,
    request: &CardRequest<'_>,
    resolver: &R,
) -> Result<WalletCredentialCardData>
where
    R: OverlayResolver + ?Sized,
{
    let attributes = if request.options.proof_context {
        Vec::new()
    } else {
        record
            .attributes
            .iter()
            .map(|attr| Field::Attribute(Attribute::new(attr.name.clone(), attr.value.clone())))
            .collect()
    };

    let params = ResolveParams {
        identifiers: CredentialIdentifiers {
            schema_id: record.metadata.schema_id.clone(),
            credential_definition_id: record.metadata.credential_definition_id.clone(),
        },
        attributes,
        meta: ResolveMeta {
            alias: request.options.connection_label.clone(),
            cred_name: request.cred_name.clone(),
            cred_connection_id: record.connection_id.clone(),
        },
        language: request.language.clone(),
    };

    let mut bundle = resolver
        .resolve_bundle(params)
        .await
        .context("unable to resolve overlay bundle")?;

    // Run the name waterfall over the resolved name and the record's cached
    // metadata, deriving a schema-name candidate from the identifier when the
    // cache is cold.
    let schema_name = record.metadata.schema_name.clone().or_else(|| {
        record
            .metadata
            .schema_id
            .as_deref()
            .and_then(schema_name_from_id)
    });
    bundle.name = Some(effective_credential_name(
        bundle.name.as_deref(),
        record.metadata.cred_def_tag.as_deref(),
        schema_name.as_deref(),
    ));

    let mut options = request.options.clone();
    // The record itself may carry a revocation notice the caller has not
    // folded into its flags yet.
    options.revoked = options.revoked || record.revocation_notification.is_some();

    debug!(credential_id = %record.id, name = %bundle.name.as_deref().unwrap_or_default(),
        "mapping attribute-exchange credential");
    Ok(map_anoncreds_to_card(record, &bundle, &options))
}

async fn dispatch_w3c<R>(
    record: &W3cCredential,
    request: &CardRequest<'_>,
    resolver: &R,
) -> Result<WalletCredentialCardData>
where
    R: OverlayResolver + ?Sized,
{
    let mut bundle = match request.overlay {
        Some(bundle) => bundle.clone(),
        None => {
            let params = ResolveParams {
                identifiers: CredentialIdentifiers {
                    schema_id: None,
                    credential_definition_id: Some(record.id.clone()),
                },
                attributes: subject_fields(&record.credential),
                meta: ResolveMeta {
                    alias: record
                        .credential
                        .issuer
                        .as_ref()
                        .map(|issuer| issuer_display_name(Some(issuer))),
                    cred_name: record
                        .display
                        .name
                        .clone()
                        .or_else(|| record.credential.name.clone()),
                    cred_connection_id: None,
                },
                language: request.language.clone(),
            };
            resolver
                .resolve_bundle(params)
                .await
                .context("unable to resolve overlay bundle")?
        }
    };

    if bundle.branding.is_none() {
        debug!(credential_id = %record.id,
            "no branding resolved; synthesizing overlay from credential display");
        bundle.branding = OverlayBundle::from_display(&record.display).branding;
    }

    let input = W3cCardInput {
        credential: &record.credential,
        display: &record.display,
        bundle: &bundle,
    };
    Ok(map_w3c_to_card(&input, &record.id))
}

/// Flattens the claim object into resolver-facing fields, mirroring what the
/// mapper will later render: the reserved subject id is dropped and nested
/// objects are JSON-encoded.
fn subject_fields(credential: &W3cCredentialPayload) -> Vec<Field> {
    credential
        .credential_subject
        .iter()
        .filter(|(key, _)| key.as_str() != SUBJECT_ID_KEY)
        .map(|(key, raw)| {
            let value = match raw {
                Value::String(_) | Value::Number(_) => raw.clone(),
                other => Value::String(other.to_string()),
            };
            Field::Attribute(Attribute::new(key.clone(), Some(value)))
        })
        .collect()
}
