//! Texture layers attached to tiles
//!
//! Each tile carries an ordered list of [`TextureLayer`]s. The index of a layer
//! is its authoring slot, so layer N means the same thing on every tile. An
//! empty layer (no frames) fills gaps instead of removing the index.

use serde::{Deserialize, Serialize};

/// Default time per animation frame in seconds
pub const DEFAULT_FRAME_TIME: f32 = 0.2;

/// One visual frame of a texture layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    /// Name of the texture in the resource catalog
    pub texture: String,
    /// Rotation in degrees
    #[serde(default)]
    pub rotation: f32,
    #[serde(default = "one")]
    pub scale_x: f32,
    #[serde(default = "one")]
    pub scale_y: f32,
    /// Horizontal offset as a fraction of the tile size
    #[serde(default)]
    pub offset_x: f32,
    /// Vertical offset as a fraction of the tile size
    #[serde(default)]
    pub offset_y: f32,
    /// RGBA tint
    #[serde(default = "white")]
    pub tint: [u8; 4],
    #[serde(default)]
    pub mirror_x: bool,
    #[serde(default)]
    pub mirror_y: bool,
}

fn one() -> f32 {
    1.0
}

fn white() -> [u8; 4] {
    [255, 255, 255, 255]
}

impl Frame {
    /// Create an untransformed frame for a texture
    pub fn new(texture: impl Into<String>) -> Self {
        Self {
            texture: texture.into(),
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            tint: white(),
            mirror_x: false,
            mirror_y: false,
        }
    }

    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn with_scale(mut self, x: f32, y: f32) -> Self {
        self.scale_x = x;
        self.scale_y = y;
        self
    }

    pub fn with_offset(mut self, x: f32, y: f32) -> Self {
        self.offset_x = x;
        self.offset_y = y;
        self
    }

    pub fn with_tint(mut self, tint: [u8; 4]) -> Self {
        self.tint = tint;
        self
    }

    pub fn with_mirror(mut self, mirror_x: bool, mirror_y: bool) -> Self {
        self.mirror_x = mirror_x;
        self.mirror_y = mirror_y;
        self
    }
}

/// An authoring layer on a tile: a static frame or an animation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextureLayer {
    #[serde(default)]
    pub frames: Vec<Frame>,
    #[serde(default)]
    pub animated: bool,
    /// Seconds each frame is shown while animating
    #[serde(default = "default_frame_time")]
    pub frame_time: f32,
    /// Playback position, only meaningful for animated layers
    #[serde(default)]
    pub current_frame: usize,
    /// Draw-order rank within the tile
    #[serde(default)]
    pub rank: i32,
}

fn default_frame_time() -> f32 {
    DEFAULT_FRAME_TIME
}

impl Default for TextureLayer {
    fn default() -> Self {
        Self::empty()
    }
}

impl TextureLayer {
    /// A layer with no frames, used to pad gaps
    pub fn empty() -> Self {
        Self {
            frames: Vec::new(),
            animated: false,
            frame_time: DEFAULT_FRAME_TIME,
            current_frame: 0,
            rank: 0,
        }
    }

    /// A static layer showing a single frame
    pub fn single(frame: Frame) -> Self {
        Self {
            frames: vec![frame],
            ..Self::empty()
        }
    }

    /// An animated layer cycling through `frames`
    pub fn animated(frames: Vec<Frame>, frame_time: f32) -> Self {
        Self {
            frames,
            animated: true,
            frame_time,
            ..Self::empty()
        }
    }

    pub fn with_rank(mut self, rank: i32) -> Self {
        self.rank = rank;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// The frame currently displayed, if any
    pub fn current(&self) -> Option<&Frame> {
        if self.animated {
            self.frames.get(self.current_frame % self.frames.len().max(1))
        } else {
            self.frames.first()
        }
    }

    /// Texture names referenced by this layer, in frame order
    pub fn texture_names(&self) -> impl Iterator<Item = &str> {
        self.frames.iter().map(|f| f.texture.as_str())
    }

    /// Compare authored content, ignoring playback state and draw rank
    pub fn pattern_eq(&self, other: &TextureLayer) -> bool {
        self.animated == other.animated
            && self.frames.len() == other.frames.len()
            && self.frames.iter().zip(&other.frames).all(|(a, b)| a == b)
    }
}
