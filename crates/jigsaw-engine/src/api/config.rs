use serde::{Deserialize, Serialize};

/// Size of the play surface in surface units (CSS pixels on the web).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

/// Space reserved by the surrounding UI around the play area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChromeInsets {
    /// Header band at the top; pieces never enter it.
    pub header_height: f32,
    /// Gap kept free above the bottom edge.
    pub bottom_margin: f32,
    /// Left/right margin as a fraction of viewport width.
    pub side_margin_ratio: f32,
    /// Fixed padding added to the tab buffer around scatter zones.
    pub zone_padding: f32,
}

impl ChromeInsets {
    pub fn side_margin(&self, viewport_width: f32) -> f32 {
        viewport_width * self.side_margin_ratio
    }
}

impl Default for ChromeInsets {
    fn default() -> Self {
        Self {
            header_height: 80.0,
            bottom_margin: 20.0,
            side_margin_ratio: 0.02,
            zone_padding: 10.0,
        }
    }
}

/// Target piece count as a function of level: `base + level * per_level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PieceCountPolicy {
    pub base: u32,
    pub per_level: u32,
}

impl PieceCountPolicy {
    pub fn target_for_level(&self, level: u32) -> u32 {
        self.base.saturating_add(level.saturating_mul(self.per_level))
    }
}

impl Default for PieceCountPolicy {
    fn default() -> Self {
        Self { base: 30, per_level: 15 }
    }
}

/// Engine configuration, fixed for the lifetime of a `PuzzleEngine`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PuzzleConfig {
    /// Initial play surface size. Updated later through `resize`.
    pub viewport: Viewport,
    pub chrome: ChromeInsets,
    /// Maximum distance from the target at release for a piece to lock.
    pub snap_distance: f32,
    pub piece_count: PieceCountPolicy,
    /// Seed of the default random source.
    pub seed: u64,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            chrome: ChromeInsets::default(),
            snap_distance: 30.0,
            piece_count: PieceCountPolicy::default(),
            seed: 42,
        }
    }
}

impl PuzzleConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn target_pieces(&self, level: u32) -> u32 {
        self.piece_count.target_for_level(level)
    }
}
