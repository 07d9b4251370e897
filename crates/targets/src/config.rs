//! Tunables for the target workflows.

/// Default on-screen width recorded for new NFT targets.
pub const DEFAULT_FEATURE_MARKER_WIDTH: u32 = 616;

/// Default on-screen height recorded for new NFT targets.
pub const DEFAULT_FEATURE_MARKER_HEIGHT: u32 = 900;

/// Dimensions written into newly created feature-tracked records.
///
/// The defaults are the pixel size the AR toolkit reported for the
/// reference marker this workflow was tuned against (616x900). They
/// are not a universal answer; deployments tracking differently sized
/// markers should override them at repository construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerDimensions {
    pub width: u32,
    pub height: u32,
}

impl Default for MarkerDimensions {
    fn default() -> Self {
        Self {
            width: DEFAULT_FEATURE_MARKER_WIDTH,
            height: DEFAULT_FEATURE_MARKER_HEIGHT,
        }
    }
}

impl MarkerDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}
