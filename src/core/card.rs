use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use super::field::Field;
use super::overlay::{AttributeFormat, Branding, BrandingOverlayType, OverlayBundle};

/// One normalized attribute or predicate, ready for rendering.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CardAttribute {
    /// Raw attribute key. Empty when the source never carried one.
    pub key: String,
    /// Display label after overlay overrides.
    pub label: String,
    /// Disclosed value, or the composed predicate text for predicates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<AttributeFormat>,
    #[serde(default)]
    pub is_pii: bool,
    #[serde(default)]
    pub has_error: bool,
    /// Present exactly when the source was a predicate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predicate: Option<PredicateInfo>,
}

/// Details of a normalized predicate.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PredicateInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub satisfied: Option<bool>,
    /// Composed comparison expression, e.g. `>= 18`.
    pub text: String,
}

/// Card-level status flag. `Error` is derived (revoked outside a proof
/// context); `Warning` only ever comes from the caller.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CardStatus {
    Error,
    Warning,
}

/// Branding data carried on the finished card: the overlay's artwork plus
/// the watermark, flattened into one renderer-facing struct.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct CardBranding {
    #[serde(default)]
    pub overlay_type: BrandingOverlayType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_image_slice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watermark: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_text_color: Option<String>,
}

impl CardBranding {
    /// Flattens a bundle's branding (with the default background applied)
    /// and watermark into card branding.
    pub fn from_bundle(bundle: &OverlayBundle) -> Self {
        let Branding {
            overlay_type,
            primary_background_color,
            secondary_background_color,
            logo,
            background_image_slice,
            background_image,
            preferred_text_color,
        } = bundle.branding_or_default();

        Self {
            overlay_type,
            primary_background_color,
            secondary_background_color,
            logo,
            background_image_slice,
            background_image,
            watermark: bundle.watermark.clone(),
            preferred_text_color,
        }
    }
}

/// The unified, renderer-agnostic view-model for one credential card.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WalletCredentialCardData {
    pub id: String,
    pub issuer_name: String,
    pub credential_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_label: Option<String>,
    pub branding: CardBranding,
    pub items: Vec<CardAttribute>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_attribute_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_attribute_key: Option<String>,
    pub branding_type: BrandingOverlayType,
    #[serde(default)]
    pub proof_context: bool,
    #[serde(default)]
    pub revoked: bool,
    #[serde(default)]
    pub not_in_wallet: bool,
    /// True iff `items` is non-empty and every item is a non-predicate
    /// flagged as PII.
    #[serde(default)]
    pub all_pii: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_action_url: Option<Url>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CardStatus>,
    /// One extra attribute surfaced outside the main list, when the overlay
    /// names a primary overlay attribute.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_overlay_attribute: Option<CardAttribute>,
    /// Layout hint for the renderer: suppress the background slice.
    #[serde(default)]
    pub hide_slice: bool,
}

/// Caller-supplied flags and proof-context inputs for a mapping call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MapOptions {
    /// True when rendering a verifier-selected subset of attributes.
    pub proof_context: bool,
    pub revoked: bool,
    pub not_in_wallet: bool,
    /// Caller-supplied status, used when revocation does not force an error.
    pub status: Option<CardStatus>,
    pub connection_label: Option<String>,
    /// The verifier-selected items to show in proof context, in the order
    /// they were requested.
    pub display_items: Option<Vec<Field>>,
}

/// Computes the all-PII aggregate: non-empty, and every item is a plain
/// attribute flagged as PII. A satisfied predicate does not disclose the
/// underlying datum, so any predicate breaks the aggregate.
pub(crate) fn all_pii(items: &[CardAttribute]) -> bool {
    !items.is_empty() && items.iter().all(|item| item.predicate.is_none() && item.is_pii)
}
