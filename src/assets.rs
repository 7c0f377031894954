/// Sprite metadata — the only thing the simulation needs from "assets".
///
/// Image loading is somebody else's job.  What the game objects need is the
/// unscaled size of each sprite, the per-type scale factor and where the
/// anchor sits, so those are handed in explicitly through `AssetRegistry`.

use serde::Deserialize;

/// Which point of the sprite its (x, y) position refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub enum Anchor {
    BottomLeft,
    TopCenter,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
pub enum SpriteKind {
    Player,
    Bullet,
    Alien,
    Explosion,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct SpriteInfo {
    /// Unscaled image width.
    pub width: f32,
    /// Unscaled image height.
    pub height: f32,
    pub scale: f32,
    pub anchor: Anchor,
}

impl SpriteInfo {
    pub const fn new(width: f32, height: f32, scale: f32, anchor: Anchor) -> Self {
        Self { width, height, scale, anchor }
    }

    pub fn scaled_width(&self) -> f32 {
        self.width * self.scale
    }

    pub fn scaled_height(&self) -> f32 {
        self.height * self.scale
    }
}

// ── Built-in sprite table ─────────────────────────────────────────────────────

const PLAYER: SpriteInfo = SpriteInfo::new(40.0, 20.0, 1.0, Anchor::BottomLeft);
const BULLET: SpriteInfo = SpriteInfo::new(20.0, 40.0, 0.2, Anchor::TopCenter);
const ALIEN: SpriteInfo = SpriteInfo::new(40.0, 30.0, 1.0, Anchor::BottomLeft);
const EXPLOSION: SpriteInfo = SpriteInfo::new(40.0, 40.0, 1.0, Anchor::BottomLeft);

/// Sprite metadata for every kind the game draws.  Passed to the game
/// window at construction; nothing else carries sprite sizes around.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AssetRegistry {
    pub player: SpriteInfo,
    pub bullet: SpriteInfo,
    pub alien: SpriteInfo,
    pub explosion: SpriteInfo,
}

impl Default for AssetRegistry {
    fn default() -> Self {
        Self {
            player: PLAYER,
            bullet: BULLET,
            alien: ALIEN,
            explosion: EXPLOSION,
        }
    }
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the metadata for one sprite kind.
    pub fn with(mut self, kind: SpriteKind, info: SpriteInfo) -> Self {
        *self.slot(kind) = info;
        self
    }

    pub fn get(&self, kind: SpriteKind) -> SpriteInfo {
        match kind {
            SpriteKind::Player => self.player,
            SpriteKind::Bullet => self.bullet,
            SpriteKind::Alien => self.alien,
            SpriteKind::Explosion => self.explosion,
        }
    }

    fn slot(&mut self, kind: SpriteKind) -> &mut SpriteInfo {
        match kind {
            SpriteKind::Player => &mut self.player,
            SpriteKind::Bullet => &mut self.bullet,
            SpriteKind::Alien => &mut self.alien,
            SpriteKind::Explosion => &mut self.explosion,
        }
    }
}
