//! Target entity, DTOs, and dimension resolution.

use serde::{Deserialize, Serialize};

use crate::types::{TargetId, UserId};

/// Fallback width when neither `width` nor `scale` is usable.
pub const FALLBACK_WIDTH: &str = "20";

/// Fallback height when neither `height` nor `scale` is usable.
pub const FALLBACK_HEIGHT: &str = "30";

// ---------------------------------------------------------------------------
// Target kind
// ---------------------------------------------------------------------------

/// How a target is recognized by the AR engine.
///
/// Serialized with the record store's column values (`nft`, `marker`,
/// `image`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetKind {
    /// Natural-feature tracking: three companion descriptor objects
    /// sharing a base name.
    #[serde(rename = "nft")]
    FeatureTracked,
    /// A single precomputed `.patt` pattern file.
    #[serde(rename = "marker")]
    PatternMarker,
    /// The recognized content is itself a plain image.
    #[serde(rename = "image")]
    ImageMarker,
}

impl TargetKind {
    /// Record store column value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FeatureTracked => "nft",
            Self::PatternMarker => "marker",
            Self::ImageMarker => "image",
        }
    }

    /// Parse the record store column value.
    pub fn from_str_value(value: &str) -> Option<Self> {
        match value {
            "nft" => Some(Self::FeatureTracked),
            "marker" => Some(Self::PatternMarker),
            "image" => Some(Self::ImageMarker),
            _ => None,
        }
    }
}

impl std::fmt::Display for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A stored AR marker definition, one row in the `targets` table.
///
/// Field names map to the store's legacy column names via serde
/// renames. Exactly one of `pattern_url` / `feature_base_url` is
/// meaningful per kind; `primary_content_url` is kind-independent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    pub id: TargetId,
    #[serde(rename = "name")]
    pub display_name: String,
    #[serde(rename = "type")]
    pub kind: TargetKind,
    #[serde(rename = "user_id")]
    pub owner_id: UserId,
    /// URL prefix of the three descriptor objects; the actual objects
    /// live at `feature_base_url + ".iset"/".fset"/".fset3"`.
    #[serde(rename = "nfturlbase", default, skip_serializing_if = "Option::is_none")]
    pub feature_base_url: Option<String>,
    #[serde(rename = "patternurl", default, skip_serializing_if = "Option::is_none")]
    pub pattern_url: Option<String>,
    /// Public URL of the display asset.
    #[serde(rename = "contenturl", default, skip_serializing_if = "Option::is_none")]
    pub primary_content_url: Option<String>,
    /// Legacy `"<w> <h>"` placement field, consulted when
    /// `width`/`height` are absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(rename = "markerpreset", default, skip_serializing_if = "Option::is_none")]
    pub marker_preset: Option<String>,
}

impl Target {
    /// On-screen placement width.
    ///
    /// Resolution order: `width` → first token of `scale` →
    /// [`FALLBACK_WIDTH`].
    pub fn display_width(&self) -> String {
        resolve_dimension(self.width.as_deref(), self.scale.as_deref(), 0, FALLBACK_WIDTH)
    }

    /// On-screen placement height.
    ///
    /// Resolution order: `height` → second token of `scale` →
    /// [`FALLBACK_HEIGHT`].
    pub fn display_height(&self) -> String {
        resolve_dimension(
            self.height.as_deref(),
            self.scale.as_deref(),
            1,
            FALLBACK_HEIGHT,
        )
    }
}

fn resolve_dimension(
    explicit: Option<&str>,
    scale: Option<&str>,
    token_index: usize,
    fallback: &str,
) -> String {
    if let Some(value) = explicit {
        if !value.trim().is_empty() {
            return value.to_string();
        }
    }
    if let Some(scale) = scale {
        if let Some(token) = scale.split_whitespace().nth(token_index) {
            return token.to_string();
        }
    }
    fallback.to_string()
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Insert payload for a new target (the store assigns `id`).
#[derive(Debug, Clone, Serialize)]
pub struct NewTarget {
    #[serde(rename = "name")]
    pub display_name: String,
    #[serde(rename = "type")]
    pub kind: TargetKind,
    #[serde(rename = "user_id")]
    pub owner_id: UserId,
    #[serde(rename = "nfturlbase", skip_serializing_if = "Option::is_none")]
    pub feature_base_url: Option<String>,
    #[serde(rename = "patternurl", skip_serializing_if = "Option::is_none")]
    pub pattern_url: Option<String>,
    #[serde(rename = "contenturl", skip_serializing_if = "Option::is_none")]
    pub primary_content_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
}

impl NewTarget {
    /// A minimal payload with only the always-required columns.
    pub fn new(display_name: impl Into<String>, kind: TargetKind, owner_id: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            kind,
            owner_id: owner_id.into(),
            feature_base_url: None,
            pattern_url: None,
            primary_content_url: None,
            width: None,
            height: None,
        }
    }
}

/// Partial update for an existing target.
///
/// The session layer only ever sets `display_name`/`kind`; the
/// repository accepts any subset.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TargetChanges {
    #[serde(rename = "name", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<TargetKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<String>,
}

impl TargetChanges {
    /// True when no field is set (nothing to send).
    pub fn is_empty(&self) -> bool {
        serde_json::to_value(self)
            .map(|v| v.as_object().map(|o| o.is_empty()).unwrap_or(true))
            .unwrap_or(true)
    }
}
