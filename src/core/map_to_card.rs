use serde_json::Value;

use crate::utils::{host_name_from_url, is_image_data_uri, to_human_readable_string};

use super::card::{
    all_pii, CardAttribute, CardBranding, CardStatus, MapOptions, WalletCredentialCardData,
};
use super::credential::{AnoncredsCredential, CredentialDisplay, Issuer, W3cCredentialPayload};
use super::field::{Attribute, Field};
use super::name::FALLBACK_CREDENTIAL_NAME;
use super::normalize::{coerce_value, normalize_field};
use super::overlay::{AttributeFormat, OverlayBundle};

/// Issuer name shown when neither the overlay nor the connection supplies one.
pub const UNKNOWN_ISSUER_NAME: &str = "Unknown Contact";

/// Claim key reserved for the subject identifier; never rendered as an
/// attribute.
pub(crate) const SUBJECT_ID_KEY: &str = "id";

/// Maps an attribute-exchange credential and its resolved overlay bundle to
/// the unified card view-model.
///
/// In proof context the caller-supplied display items are rendered exactly in
/// the order given — disclosure order is meaningful. Outside proof context
/// the record's own attributes are rendered, with the overlay's primary and
/// secondary attribute hints pulled to the front.
pub fn map_anoncreds_to_card(
    record: &AnoncredsCredential,
    bundle: &OverlayBundle,
    opts: &MapOptions,
) -> WalletCredentialCardData {
    let display_items = opts.display_items.as_deref().unwrap_or_default();

    let items = if opts.proof_context && !display_items.is_empty() {
        display_items
            .iter()
            .map(|field| normalize_field(field, &bundle.labels, &bundle.formats, &bundle.flagged_pii))
            .collect()
    } else {
        let items: Vec<CardAttribute> = record
            .attributes
            .iter()
            .map(|attr| {
                // Stored attributes carry no separate label; the name doubles
                // as the raw label for overlay lookups.
                let field = Field::Attribute(Attribute {
                    name: Some(attr.name.clone()),
                    label: Some(attr.name.clone()),
                    value: attr.value.clone(),
                    has_error: false,
                });
                normalize_field(&field, &bundle.labels, &bundle.formats, &bundle.flagged_pii)
            })
            .collect();

        reorder_by_hints(
            items,
            bundle.primary_attribute_key.as_deref(),
            bundle.secondary_attribute_key.as_deref(),
        )
    };

    let status = if opts.revoked && !opts.proof_context {
        Some(CardStatus::Error)
    } else {
        opts.status
    };

    let issuer_name = bundle
        .issuer
        .clone()
        .or_else(|| opts.connection_label.clone())
        .unwrap_or_else(|| UNKNOWN_ISSUER_NAME.to_string());

    let branding = CardBranding::from_bundle(bundle);

    WalletCredentialCardData {
        id: record.id.clone(),
        issuer_name,
        credential_name: bundle
            .name
            .clone()
            .unwrap_or_else(|| FALLBACK_CREDENTIAL_NAME.to_string()),
        connection_label: opts.connection_label.clone(),
        branding_type: branding.overlay_type,
        branding,
        all_pii: all_pii(&items),
        items,
        primary_attribute_key: bundle.primary_attribute_key.clone(),
        secondary_attribute_key: bundle.secondary_attribute_key.clone(),
        proof_context: opts.proof_context,
        revoked: opts.revoked,
        not_in_wallet: opts.not_in_wallet,
        help_action_url: bundle.help_action_url.clone(),
        status,
        extra_overlay_attribute: None,
        hide_slice: opts.proof_context,
    }
}

/// Pulls the hinted primary and secondary items to the front, leaving the
/// remaining items in their original relative order. Hints that match no item
/// are ignored; a secondary hint equal to the primary is ignored.
fn reorder_by_hints(
    items: Vec<CardAttribute>,
    primary: Option<&str>,
    secondary: Option<&str>,
) -> Vec<CardAttribute> {
    if primary.is_none() && secondary.is_none() {
        return items;
    }
    let secondary = if secondary == primary { None } else { secondary };

    let primary_at = primary.and_then(|key| items.iter().position(|item| item.key == key));
    let secondary_at = secondary.and_then(|key| items.iter().position(|item| item.key == key));

    let mut front = Vec::new();
    let mut rest = Vec::new();
    for (i, item) in items.into_iter().enumerate() {
        if Some(i) == primary_at || Some(i) == secondary_at {
            front.push((i, item));
        } else {
            rest.push(item);
        }
    }
    // Primary first, then secondary, regardless of their stored order.
    front.sort_by_key(|(i, _)| (Some(*i) != primary_at, *i));

    front
        .into_iter()
        .map(|(_, item)| item)
        .chain(rest)
        .collect()
}

/// Inputs for mapping a subject-claim credential: the claim payload, its
/// self-declared display metadata, and the (resolved or synthesized) overlay
/// bundle.
#[derive(Clone, Copy, Debug)]
pub struct W3cCardInput<'a> {
    pub credential: &'a W3cCredentialPayload,
    pub display: &'a CredentialDisplay,
    pub bundle: &'a OverlayBundle,
}

/// Maps a subject-claim credential to the unified card view-model by
/// flattening the claim object.
pub fn map_w3c_to_card(input: &W3cCardInput<'_>, id: &str) -> WalletCredentialCardData {
    let W3cCardInput {
        credential,
        display,
        bundle,
    } = *input;

    let items: Vec<CardAttribute> = credential
        .credential_subject
        .iter()
        .filter(|(key, _)| key.as_str() != SUBJECT_ID_KEY)
        .map(|(key, raw)| subject_claim_to_attr(key, raw, bundle))
        .collect();

    let extra_overlay_attribute = display.primary_overlay_attribute.as_ref().and_then(|key| {
        credential.credential_subject.get(key).map(|value| {
            let field = Field::Attribute(Attribute::new(key.clone(), Some(value.clone())));
            normalize_field(&field, &bundle.labels, &bundle.formats, &bundle.flagged_pii)
        })
    });

    let branding = CardBranding::from_bundle(bundle);

    WalletCredentialCardData {
        id: id.to_string(),
        issuer_name: issuer_display_name(credential.issuer.as_ref()),
        credential_name: w3c_credential_name(credential),
        connection_label: None,
        branding_type: branding.overlay_type,
        branding,
        all_pii: all_pii(&items),
        items,
        primary_attribute_key: None,
        secondary_attribute_key: None,
        proof_context: false,
        revoked: false,
        not_in_wallet: false,
        help_action_url: bundle.help_action_url.clone(),
        status: None,
        extra_overlay_attribute,
        // Subject-claim cards never render the background slice; fixed
        // contract with the renderer.
        hide_slice: true,
    }
}

fn subject_claim_to_attr(key: &str, raw: &Value, bundle: &OverlayBundle) -> CardAttribute {
    let label = bundle
        .labels
        .get(key)
        .cloned()
        .unwrap_or_else(|| to_human_readable_string(key));

    // Nested claim objects are shown in their JSON encoding.
    let value = match raw {
        Value::String(_) | Value::Number(_) => raw.clone(),
        other => Value::String(other.to_string()),
    };

    let declared = bundle.formats.get(key).copied();
    let is_inline_image = value.as_str().is_some_and(is_image_data_uri);
    // An inline image wins over any declared format and the payload passes
    // through untouched.
    let (format, value) = if is_inline_image {
        (Some(AttributeFormat::Image), value)
    } else {
        (
            declared.or(Some(AttributeFormat::Text)),
            coerce_value(declared, value),
        )
    };

    CardAttribute {
        key: key.to_string(),
        label,
        value: Some(value),
        format,
        is_pii: bundle.flagged_pii.iter().any(|flagged| flagged == key),
        has_error: false,
        predicate: None,
    }
}

/// Resolves the issuer display name: plain-string issuer, then issuer object
/// name, then its identifier (shortened to a host name when it is a URL),
/// then the unknown-contact fallback.
pub(crate) fn issuer_display_name(issuer: Option<&Issuer>) -> String {
    match issuer {
        Some(Issuer::Id(id)) if !id.is_empty() => id.clone(),
        Some(Issuer::Object(object)) => object
            .name
            .clone()
            .or_else(|| {
                object
                    .id
                    .as_ref()
                    .map(|id| host_name_from_url(id).unwrap_or_else(|| id.clone()))
            })
            .unwrap_or_else(|| UNKNOWN_ISSUER_NAME.to_string()),
        _ => UNKNOWN_ISSUER_NAME.to_string(),
    }
}

/// Resolves the credential display name: declared name, then the second type
/// tag (the most specific one by convention, humanized, skipped when it is a
/// URL), then the generic fallback.
fn w3c_credential_name(credential: &W3cCredentialPayload) -> String {
    if let Some(name) = &credential.name {
        if !name.is_empty() {
            return name.clone();
        }
    }
    credential
        .types
        .get(1)
        .filter(|tag| !tag.is_empty() && !tag.starts_with("http"))
        .map(|tag| to_human_readable_string(tag.as_str()))
        .unwrap_or_else(|| FALLBACK_CREDENTIAL_NAME.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    use chrono::Utc;
    use serde_json::json;

    use crate::core::credential::{CredentialAttribute, IssuerObject};
    use crate::core::field::Predicate;
    use crate::core::overlay::{Branding, BrandingOverlayType, DEFAULT_PRIMARY_BACKGROUND};

    fn record(attr_names: &[&str]) -> AnoncredsCredential {
        AnoncredsCredential {
            id: "cred-1".into(),
            created_at: Utc::now(),
            connection_id: None,
            attributes: attr_names
                .iter()
                .map(|name| CredentialAttribute {
                    name: name.to_string(),
                    value: Some(json!(format!("{name}-value"))),
                })
                .collect(),
            revocation_notification: None,
            metadata: Default::default(),
        }
    }

    fn keys(card: &WalletCredentialCardData) -> Vec<&str> {
        card.items.iter().map(|item| item.key.as_str()).collect()
    }

    #[test]
    fn hinted_attributes_move_to_the_front() {
        let bundle = OverlayBundle {
            primary_attribute_key: Some("c".into()),
            secondary_attribute_key: Some("a".into()),
            ..Default::default()
        };

        let card = map_anoncreds_to_card(&record(&["a", "b", "c", "d"]), &bundle, &Default::default());
        assert_eq!(keys(&card), vec!["c", "a", "b", "d"]);
    }

    #[test]
    fn unmatched_and_duplicate_hints_are_ignored() {
        let bundle = OverlayBundle {
            primary_attribute_key: Some("b".into()),
            secondary_attribute_key: Some("b".into()),
            ..Default::default()
        };
        let card = map_anoncreds_to_card(&record(&["a", "b", "c"]), &bundle, &Default::default());
        assert_eq!(keys(&card), vec!["b", "a", "c"]);

        let bundle = OverlayBundle {
            primary_attribute_key: Some("missing".into()),
            ..Default::default()
        };
        let card = map_anoncreds_to_card(&record(&["a", "b"]), &bundle, &Default::default());
        assert_eq!(keys(&card), vec!["a", "b"]);
    }

    #[test]
    fn proof_context_preserves_display_item_order() {
        let bundle = OverlayBundle {
            primary_attribute_key: Some("z".into()),
            secondary_attribute_key: Some("x".into()),
            ..Default::default()
        };
        let opts = MapOptions {
            proof_context: true,
            display_items: Some(vec![
                Field::Attribute(Attribute::new("x", Some(json!(1)))),
                Field::Attribute(Attribute::new("y", Some(json!(2)))),
                Field::Attribute(Attribute::new("z", Some(json!(3)))),
            ]),
            ..Default::default()
        };

        let card = map_anoncreds_to_card(&record(&["ignored"]), &bundle, &opts);
        assert_eq!(keys(&card), vec!["x", "y", "z"]);
        assert!(card.hide_slice);
    }

    #[test]
    fn status_is_error_only_outside_proof_context() {
        let revoked = MapOptions {
            revoked: true,
            ..Default::default()
        };
        let card = map_anoncreds_to_card(&record(&["a"]), &Default::default(), &revoked);
        assert_eq!(card.status, Some(CardStatus::Error));
        assert!(card.revoked);

        let revoked_in_proof = MapOptions {
            revoked: true,
            proof_context: true,
            ..Default::default()
        };
        let card = map_anoncreds_to_card(&record(&["a"]), &Default::default(), &revoked_in_proof);
        assert_eq!(card.status, None);
    }

    #[test]
    fn caller_supplied_warning_passes_through() {
        let opts = MapOptions {
            status: Some(CardStatus::Warning),
            ..Default::default()
        };
        let card = map_anoncreds_to_card(&record(&["a"]), &Default::default(), &opts);
        assert_eq!(card.status, Some(CardStatus::Warning));

        // Revocation outside proof context overrides a caller warning.
        let opts = MapOptions {
            status: Some(CardStatus::Warning),
            revoked: true,
            ..Default::default()
        };
        let card = map_anoncreds_to_card(&record(&["a"]), &Default::default(), &opts);
        assert_eq!(card.status, Some(CardStatus::Error));
    }

    #[test]
    fn issuer_name_falls_back_through_connection_label() {
        let with_issuer = OverlayBundle {
            issuer: Some("Service BC".into()),
            ..Default::default()
        };
        let opts = MapOptions {
            connection_label: Some("BC Wallet Demo".into()),
            ..Default::default()
        };
        let card = map_anoncreds_to_card(&record(&[]), &with_issuer, &opts);
        assert_eq!(card.issuer_name, "Service BC");

        let card = map_anoncreds_to_card(&record(&[]), &Default::default(), &opts);
        assert_eq!(card.issuer_name, "BC Wallet Demo");

        let card = map_anoncreds_to_card(&record(&[]), &Default::default(), &Default::default());
        assert_eq!(card.issuer_name, UNKNOWN_ISSUER_NAME);
    }

    #[test]
    fn empty_bundle_degrades_to_raw_keys_and_default_background() {
        let card = map_anoncreds_to_card(
            &record(&["given_name", "family_name"]),
            &OverlayBundle::default(),
            &Default::default(),
        );

        assert_eq!(card.credential_name, FALLBACK_CREDENTIAL_NAME);
        assert_eq!(card.items[0].label, "given_name");
        assert_eq!(
            card.branding.primary_background_color.as_deref(),
            Some(DEFAULT_PRIMARY_BACKGROUND)
        );
    }

    #[test]
    fn all_pii_breaks_on_predicates() {
        let bundle = OverlayBundle {
            flagged_pii: vec!["a".into(), "b".into()],
            ..Default::default()
        };
        let card = map_anoncreds_to_card(&record(&["a", "b"]), &bundle, &Default::default());
        assert!(card.all_pii);

        let opts = MapOptions {
            proof_context: true,
            display_items: Some(vec![
                Field::Attribute(Attribute {
                    name: Some("a".into()),
                    label: Some("a".into()),
                    value: Some(json!("v")),
                    has_error: false,
                }),
                Field::Predicate(Predicate {
                    name: Some("age".into()),
                    p_type: Some(">=".into()),
                    p_value: Some(json!(18)),
                    ..Default::default()
                }),
            ]),
            ..Default::default()
        };
        let card = map_anoncreds_to_card(&record(&[]), &bundle, &opts);
        assert!(!card.all_pii);
    }

    fn w3c_payload() -> W3cCredentialPayload {
        serde_json::from_value(json!({
            "issuer": {"id": "https://issuer.example.com/v1", "name": "Acme University"},
            "type": ["VerifiableCredential", "StudentCard"],
            "credentialSubject": {}
        }))
        .unwrap()
    }

    #[test]
    fn w3c_claims_are_flattened_without_the_id_key() {
        let mut payload = w3c_payload();
        payload.credential_subject = serde_json::from_value(json!({
            "id": "did:example:holder",
            "given_name": "Alice",
            "address": {"street": "123 Main St"}
        }))
        .unwrap();

        let display = CredentialDisplay::default();
        let bundle = OverlayBundle::default();
        let card = map_w3c_to_card(
            &W3cCardInput {
                credential: &payload,
                display: &display,
                bundle: &bundle,
            },
            "w3c-1",
        );

        let card_keys: Vec<&str> = card.items.iter().map(|i| i.key.as_str()).collect();
        assert!(!card_keys.contains(&"id"));
        let given = card.items.iter().find(|i| i.key == "given_name").unwrap();
        assert_eq!(given.label, "Given Name");
        let address = card.items.iter().find(|i| i.key == "address").unwrap();
        assert_eq!(address.value, Some(json!(r#"{"street":"123 Main St"}"#)));
        assert!(card.hide_slice);
    }

    #[test]
    fn data_uri_claims_override_declared_formats() {
        let mut payload = w3c_payload();
        payload.credential_subject = serde_json::from_value(json!({
            "photo": "data:image/png;base64,AAAA"
        }))
        .unwrap();

        let mut formats = HashMap::new();
        formats.insert("photo".to_string(), AttributeFormat::Date);
        let bundle = OverlayBundle {
            formats,
            ..Default::default()
        };

        let display = CredentialDisplay::default();
        let card = map_w3c_to_card(
            &W3cCardInput {
                credential: &payload,
                display: &display,
                bundle: &bundle,
            },
            "w3c-1",
        );

        let photo = &card.items[0];
        assert_eq!(photo.format, Some(AttributeFormat::Image));
        assert_eq!(photo.value, Some(json!("data:image/png;base64,AAAA")));
    }

    #[test]
    fn w3c_date_formats_apply_when_parseable() {
        let mut payload = w3c_payload();
        payload.credential_subject = serde_json::from_value(json!({
            "issued_on": "2024-01-05",
            "note": "2024-13-45"
        }))
        .unwrap();

        let mut formats = HashMap::new();
        formats.insert("issued_on".to_string(), AttributeFormat::Date);
        formats.insert("note".to_string(), AttributeFormat::Date);
        let bundle = OverlayBundle {
            formats,
            ..Default::default()
        };

        let display = CredentialDisplay::default();
        let card = map_w3c_to_card(
            &W3cCardInput {
                credential: &payload,
                display: &display,
                bundle: &bundle,
            },
            "w3c-1",
        );

        let issued = card.items.iter().find(|i| i.key == "issued_on").unwrap();
        assert_eq!(issued.value, Some(json!("1/5/2024")));
        let note = card.items.iter().find(|i| i.key == "note").unwrap();
        assert_eq!(note.value, Some(json!("2024-13-45")));
    }

    #[test]
    fn w3c_issuer_name_waterfall() {
        assert_eq!(
            issuer_display_name(Some(&Issuer::Id("did:example:issuer".into()))),
            "did:example:issuer"
        );
        assert_eq!(
            issuer_display_name(Some(&Issuer::Object(IssuerObject {
                name: Some("Acme".into()),
                ..Default::default()
            }))),
            "Acme"
        );
        assert_eq!(
            issuer_display_name(Some(&Issuer::Object(IssuerObject {
                id: Some("https://issuer.example.com/v1".into()),
                ..Default::default()
            }))),
            "issuer.example.com"
        );
        assert_eq!(issuer_display_name(None), UNKNOWN_ISSUER_NAME);
    }

    #[test]
    fn w3c_name_falls_back_to_specific_type_tag() {
        let mut payload = w3c_payload();
        assert_eq!(w3c_credential_name(&payload), "Student Card");

        payload.name = Some("Campus ID".into());
        assert_eq!(w3c_credential_name(&payload), "Campus ID");

        payload.name = None;
        payload.types = vec!["VerifiableCredential".into(), "https://example.com/t".into()];
        assert_eq!(w3c_credential_name(&payload), FALLBACK_CREDENTIAL_NAME);

        payload.types = vec!["VerifiableCredential".into()];
        assert_eq!(w3c_credential_name(&payload), FALLBACK_CREDENTIAL_NAME);
    }

    #[test]
    fn extra_overlay_attribute_is_normalized_from_the_named_claim() {
        let mut payload = w3c_payload();
        payload.credential_subject = serde_json::from_value(json!({
            "student_number": "S-12345",
            "given_name": "Alice"
        }))
        .unwrap();

        let display = CredentialDisplay {
            primary_overlay_attribute: Some("student_number".into()),
            ..Default::default()
        };
        let mut labels = HashMap::new();
        labels.insert("student_number".to_string(), "Student #".to_string());
        let bundle = OverlayBundle {
            labels,
            ..Default::default()
        };

        let card = map_w3c_to_card(
            &W3cCardInput {
                credential: &payload,
                display: &display,
                bundle: &bundle,
            },
            "w3c-1",
        );

        let extra = card.extra_overlay_attribute.expect("extra attribute present");
        assert_eq!(extra.key, "student_number");
        assert_eq!(extra.label, "Student #");
        assert_eq!(extra.value, Some(json!("S-12345")));
    }

    #[test]
    fn synthesized_branding_flows_through_to_the_card() {
        let display = CredentialDisplay {
            background_color: Some("#222222".into()),
            ..Default::default()
        };
        let bundle = OverlayBundle::from_display(&display);
        let payload = w3c_payload();

        let card = map_w3c_to_card(
            &W3cCardInput {
                credential: &payload,
                display: &display,
                bundle: &bundle,
            },
            "w3c-1",
        );

        assert_eq!(card.branding_type, BrandingOverlayType::Branding01);
        assert_eq!(
            card.branding.primary_background_color.as_deref(),
            Some("#222222")
        );
    }

    #[test]
    fn explicit_branding_is_copied_verbatim() {
        let bundle = OverlayBundle {
            watermark: Some("DEMO".into()),
            branding: Some(Branding {
                overlay_type: BrandingOverlayType::Branding11,
                primary_background_color: Some("#003366".into()),
                secondary_background_color: Some("#EEEEEE".into()),
                logo: Some("https://issuer.example.com/logo.png".into()),
                background_image_slice: Some("https://issuer.example.com/slice.png".into()),
                background_image: None,
                preferred_text_color: Some("#FFFFFF".into()),
            }),
            ..Default::default()
        };

        let card = map_anoncreds_to_card(&record(&["a"]), &bundle, &Default::default());
        assert_eq!(card.branding.watermark.as_deref(), Some("DEMO"));
        assert_eq!(card.branding.primary_background_color.as_deref(), Some("#003366"));
        assert_eq!(card.branding_type, BrandingOverlayType::Branding11);
        assert_eq!(
            card.branding.background_image_slice.as_deref(),
            Some("https://issuer.example.com/slice.png")
        );
    }
}
