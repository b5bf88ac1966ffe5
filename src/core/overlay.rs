use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use url::Url;

use super::credential::CredentialDisplay;

/// Background color applied when neither the resolver nor the credential
/// itself supplies one (a light gray).
pub const DEFAULT_PRIMARY_BACKGROUND: &str = "#D3D3D3";

/// The fixed visual layout families a card may use. Picking between them is
/// a rendering concern; the engine only carries the tag through.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum BrandingOverlayType {
    /// The simple/legacy layout, also used for synthesized overlays.
    Branding01,
    #[default]
    Branding10,
    Branding11,
}

/// Display format hint for a single attribute value.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AttributeFormat {
    Text,
    Date,
    #[serde(rename = "datetime")]
    DateTime,
    Image,
}

/// Branding portion of an overlay bundle: colors and artwork for one card.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Branding {
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
    pub preferred_text_color: Option<String>,
}

/// Resolved presentation metadata for one credential.
///
/// Every field may be absent — a resolver that knows nothing about a
/// credential legitimately returns `OverlayBundle::default()` — and every
/// consumer of a bundle must degrade to documented defaults rather than fail.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct OverlayBundle {
    /// Display label overrides, keyed by raw attribute label.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub labels: HashMap<String, String>,
    /// Value format hints, keyed by raw attribute key.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub formats: HashMap<String, AttributeFormat>,
    /// Raw labels of attributes considered personally identifying.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flagged_pii: Vec<String>,
    /// Key of the attribute to surface first on the card.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_attribute_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_attribute_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watermark: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_action_url: Option<Url>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branding: Option<Branding>,
}

impl OverlayBundle {
    /// Synthesizes a minimal branding overlay from a credential's own
    /// declared display metadata.
    ///
    /// This is the fallback for subject-claim credentials with no externally
    /// resolvable bundle. It never fails: a display with nothing declared
    /// produces a bundle whose branding carries only the legacy layout tag.
    pub fn from_display(display: &CredentialDisplay) -> Self {
        Self {
            name: display.name.clone(),
            branding: Some(Branding {
                overlay_type: BrandingOverlayType::Branding01,
                primary_background_color: display.background_color.clone(),
                background_image: display.background_image.clone(),
                logo: display.logo.clone(),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    /// The branding to render with, defaulting the background color when the
    /// bundle supplies none.
    pub fn branding_or_default(&self) -> Branding {
        let mut branding = self.branding.clone().unwrap_or_default();
        if branding.primary_background_color.is_none() {
            branding.primary_background_color = Some(DEFAULT_PRIMARY_BACKGROUND.to_string());
        }
        branding
    }
}
