use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A stored credential held by the wallet.
///
/// Credentials come in structurally different families and the engine must
/// handle all of them. The discriminant is explicit so that dispatch over the
/// variants is an exhaustive `match` rather than runtime type inspection.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CredentialRecord {
    /// Attribute-exchange style credential: a flat list of named attribute
    /// values plus cached schema/definition metadata.
    Anoncreds(AnoncredsCredential),
    /// Subject-claim style credential: a nested claim object plus
    /// self-declared issuer/display metadata. SD-JWT and mdoc records share
    /// this shape once decoded.
    W3c(W3cCredential),
}

impl CredentialRecord {
    /// Stable identifier of the underlying record.
    pub fn id(&self) -> &str {
        match self {
            CredentialRecord::Anoncreds(record) => &record.id,
            CredentialRecord::W3c(record) => &record.id,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            CredentialRecord::Anoncreds(record) => record.created_at,
            CredentialRecord::W3c(record) => record.created_at,
        }
    }
}

/// An attribute-exchange style credential record.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AnoncredsCredential {
    pub id: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<String>,
    #[serde(default)]
    pub attributes: Vec<CredentialAttribute>,
    /// Present when the issuer has notified the holder of revocation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revocation_notification: Option<RevocationNotification>,
    /// Cached identifiers and resolved names, filled in as they become known.
    #[serde(default)]
    pub metadata: AnoncredsMetadata,
}

/// One named attribute value of an attribute-exchange credential.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CredentialAttribute {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

/// Issuer-sent revocation notice attached to a credential record.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct RevocationNotification {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received_at: Option<DateTime<Utc>>,
}

/// Cached schema/definition metadata of an attribute-exchange credential.
///
/// Any of these may be missing: records created before the metadata cache
/// was introduced carry only the identifiers, or nothing at all.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct AnoncredsMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_definition_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cred_def_tag: Option<String>,
}

/// A subject-claim style credential record.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct W3cCredential {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub credential: W3cCredentialPayload,
    /// Display metadata the credential (or its issuance metadata) declares
    /// about itself, used when no external overlay can be resolved.
    #[serde(default)]
    pub display: CredentialDisplay,
}

/// The claim payload of a subject-claim style credential.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct W3cCredentialPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<Issuer>,
    /// Type tags, most generic first. By convention the second entry is the
    /// most specific type and doubles as a name candidate.
    #[serde(rename = "type", default)]
    pub types: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "credentialSubject", default)]
    pub credential_subject: Map<String, Value>,
}

/// The issuer of a subject-claim credential: either a bare identifier or an
/// object carrying display details.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Issuer {
    Id(String),
    Object(IssuerObject),
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct IssuerObject {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Display metadata a subject-claim credential declares about itself.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct CredentialDisplay {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    /// Key of one claim to surface outside the main attribute list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_overlay_attribute: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn record_discriminant_roundtrips() {
        let record = CredentialRecord::Anoncreds(AnoncredsCredential {
            id: "cred-1".into(),
            created_at: Utc::now(),
            connection_id: None,
            attributes: vec![CredentialAttribute {
                name: "given_name".into(),
                value: Some(json!("Alice")),
            }],
            revocation_notification: None,
            metadata: AnoncredsMetadata::default(),
        });

        let value = serde_json::to_value(&record).expect("failed to serialize record");
        assert_eq!(value["kind"], "anoncreds");

        let parsed: CredentialRecord =
            serde_json::from_value(value).expect("failed to parse record");
        assert_eq!(parsed.id(), "cred-1");
    }

    #[test]
    fn issuer_parses_both_shapes() {
        let bare: Issuer = serde_json::from_value(json!("did:example:123")).unwrap();
        assert_eq!(bare, Issuer::Id("did:example:123".into()));

        let object: Issuer =
            serde_json::from_value(json!({"id": "did:example:123", "name": "Acme"})).unwrap();
        let Issuer::Object(object) = object else {
            panic!("expected issuer object");
        };
        assert_eq!(object.name.as_deref(), Some("Acme"));
    }
}
