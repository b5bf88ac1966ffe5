//! Credential presentation normalization for digital wallet cards.
//!
//! A wallet stores credentials in several structurally different families —
//! attribute-exchange style records with a flat list of named values, and
//! subject-claim style records with a nested claim object — but renders all
//! of them as the same kind of card. This library is the mapping engine in
//! between: it takes a raw [`CredentialRecord`], combines it with a resolved
//! [`OverlayBundle`] of presentation metadata (display labels, value
//! formats, branding colors, PII flags, ordering hints), and produces one
//! uniform, renderer-agnostic [`WalletCredentialCardData`] view-model.
//!
//! [`CredentialRecord`]: crate::core::credential::CredentialRecord
//! [`OverlayBundle`]: crate::core::overlay::OverlayBundle
//! [`WalletCredentialCardData`]: crate::core::card::WalletCredentialCardData
//!
//! # Usage
//!
//! Implement [`OverlayResolver`] for whatever supplies your overlay bundles
//! (a remote branding registry, an on-disk cache, a fixture set), then hand
//! credentials to the dispatcher:
//!
//! ```ignore
//! use credential_card::core::dispatch::{map_credential_to_card, CardRequest};
//! use credential_card::core::card::MapOptions;
//! use credential_card::resolver::{OverlayResolver, ResolveParams};
//!
//! let request = CardRequest {
//!     credential: Some(&record),
//!     options: MapOptions {
//!         connection_label: Some("Service BC".to_string()),
//!         ..Default::default()
//!     },
//!     ..Default::default()
//! };
//!
//! match map_credential_to_card(&request, &resolver).await? {
//!     Some(card) => render(card),
//!     None => render_placeholder(),
//! }
//! ```
//!
//! [`OverlayResolver`]: crate::resolver::OverlayResolver
//!
//! # Design
//!
//! The engine is a pure function of (credential, overlay, options): no
//! caching, no shared state, and a single async suspension point — the call
//! out to the overlay resolver. Mapping different credentials concurrently
//! is safe and their completion order is irrelevant.
//!
//! Partial input is never an error. Missing labels, formats, colors, and
//! names all degrade to documented defaults, so a resolver that knows
//! nothing about a credential still yields a complete card. The only error
//! the engine surfaces is a failed resolver call, and in that case no
//! partial view-model is produced.
//!
//! # Pipeline
//!
//! 1. *Dispatch* ([`core::dispatch`]): discriminate on the credential
//!    family, resolve (or reuse) the overlay bundle, and for subject-claim
//!    credentials with no resolvable branding, synthesize a minimal overlay
//!    from the credential's own display metadata.
//! 2. *Family mappers* ([`core::map_to_card`]): build the ordered attribute
//!    list — honoring proof-context disclosure order, primary/secondary
//!    ordering hints, and revocation status for attribute-exchange records;
//!    flattening the claim object, detecting inline images, and extracting
//!    the extra overlay attribute for subject-claim records.
//! 3. *Normalization* ([`core::normalize`]): convert each raw field into a
//!    uniform card attribute, applying label overrides, predicate-text
//!    composition, and PII flags.
//! 4. *Naming* ([`core::name`]): pick a human-meaningful credential name via
//!    the overlay → definition-tag → schema-name → fallback waterfall.

pub mod core;
pub mod resolver;
pub mod utils;
