use serde::{Deserialize, Serialize};

/// Ordered list of source images, one per level, cycled when levels run out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelCatalog {
    /// Image locations as understood by the host (URLs or file paths).
    pub images: Vec<String>,
}

impl Default for LevelCatalog {
    fn default() -> Self {
        Self {
            images: (1..=5).map(|n| format!("assets/images/stage_{}.png", n)).collect(),
        }
    }
}

impl LevelCatalog {
    /// Parse a catalog from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Asset for 1-based `level`: index `(level - 1) mod len`.
    /// Level 0 is treated as level 1.
    pub fn asset_for_level(&self, level: u32) -> Option<(usize, &str)> {
        if self.images.is_empty() {
            return None;
        }
        let index = level.saturating_sub(1) as usize % self.images.len();
        Some((index, self.images[index].as_str()))
    }
}

/// Pixel dimensions of a decoded source image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: f32,
    pub height: f32,
}

impl ImageSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Width over height.
    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }
}
