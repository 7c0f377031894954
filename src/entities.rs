/// Game objects — the player, its bullets and the aliens they shoot at.
///
/// Every object embeds a `GameObject`, which owns the position, the hitbox
/// and the alive → exploding → destroyed life cycle.  The concrete types only
/// add their own `update`.  Nothing here touches the terminal: drawing goes
/// through the `Canvas` trait and timers are deadlines on the simulation
/// clock.

use log::debug;

use crate::assets::{Anchor, AssetRegistry, SpriteInfo, SpriteKind};
use crate::clock::is_due;
use crate::config::GameConfig;
use crate::input::{InputState, KeyBindings};

// ── Drawing seam ──────────────────────────────────────────────────────────────

/// What a renderer receives for each visible object.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sprite {
    pub kind: SpriteKind,
    /// Anchor point.
    pub x: f32,
    pub y: f32,
    /// Scaled size.
    pub width: f32,
    pub height: f32,
    pub anchor: Anchor,
}

impl Sprite {
    fn new(kind: SpriteKind, info: SpriteInfo, x: f32, y: f32) -> Self {
        Self {
            kind,
            x,
            y,
            width: info.scaled_width(),
            height: info.scaled_height(),
            anchor: info.anchor,
        }
    }

    /// Bottom-left corner of the drawn rectangle.
    pub fn origin(&self) -> (f32, f32) {
        match self.anchor {
            Anchor::BottomLeft => (self.x, self.y),
            Anchor::TopCenter => (self.x - self.width / 2.0, self.y - self.height),
        }
    }
}

/// Anything sprites can be drawn onto.
pub trait Canvas {
    fn draw_sprite(&mut self, sprite: &Sprite);
}

// ── Base object ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct GameObject {
    /// Anchor point.  (0, 0) is the bottom-left of the world.
    pub x: f32,
    pub y: f32,
    kind: SpriteKind,
    info: SpriteInfo,
    explosion: SpriteInfo,
    explosion_time: f64,
    exploded: bool,
    destroyed: bool,
    /// Deadline at which an explosion turns into a destroy.
    explode_at: Option<f64>,
}

impl GameObject {
    pub fn new(kind: SpriteKind, x: f32, y: f32, assets: &AssetRegistry, explosion_time: f64) -> Self {
        Self {
            x,
            y,
            kind,
            info: assets.get(kind),
            explosion: assets.get(SpriteKind::Explosion),
            explosion_time,
            exploded: false,
            destroyed: false,
            explode_at: None,
        }
    }

    pub fn kind(&self) -> SpriteKind {
        self.kind
    }

    /// Hitbox width (scaled).  Fixed at construction, an explosion only
    /// changes what is drawn.
    pub fn width(&self) -> f32 {
        self.info.scaled_width()
    }

    pub fn height(&self) -> f32 {
        self.info.scaled_height()
    }

    pub fn anchor(&self) -> Anchor {
        self.info.anchor
    }

    pub fn is_exploded(&self) -> bool {
        self.exploded
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn explode_at(&self) -> Option<f64> {
        self.explode_at
    }

    /// Naive collision check: is our anchor point strictly inside the
    /// other object's rectangle?  The other rectangle starts at its anchor,
    /// so where each sprite keeps its anchor decides what counts as a hit.
    /// Touching an edge is not a hit.
    pub fn has_hit(&self, other: &GameObject) -> bool {
        let inside_x = self.x > other.x && self.x < other.x + other.width();
        let inside_y = self.y > other.y && self.y < other.y + other.height();
        inside_x && inside_y
    }

    /// The sprite as it should look right now; the explosion sprite once
    /// exploded.
    pub fn sprite(&self) -> Sprite {
        if self.exploded {
            Sprite::new(SpriteKind::Explosion, self.explosion, self.x, self.y)
        } else {
            Sprite::new(self.kind, self.info, self.x, self.y)
        }
    }

    pub fn draw(&self, canvas: &mut impl Canvas) {
        canvas.draw_sprite(&self.sprite());
    }

    /// Mark for removal.  Idempotent.
    pub fn destroy(&mut self) {
        if !self.destroyed {
            debug!("{:?} destroyed at ({:.1}, {:.1})", self.kind, self.x, self.y);
        }
        self.destroyed = true;
    }

    /// Switch to the explosion sprite and destroy after `explosion_time`.
    /// Only the first call schedules anything.
    pub fn explode(&mut self, now: f64) {
        if self.exploded {
            return;
        }
        self.exploded = true;
        self.explode_at = Some(now + self.explosion_time);
        debug!("{:?} exploded at ({:.1}, {:.1})", self.kind, self.x, self.y);
    }

    /// Apply a pending explosion → destroy once its deadline has passed.
    pub fn refresh(&mut self, now: f64) {
        if !self.destroyed && is_due(self.explode_at, now) {
            self.destroy();
        }
    }
}

/// Uniform access to the embedded `GameObject`, for code that handles
/// players, bullets and aliens alike.
pub trait Entity {
    fn object(&self) -> &GameObject;
    fn object_mut(&mut self) -> &mut GameObject;

    fn is_destroyed(&self) -> bool {
        self.object().is_destroyed()
    }

    fn draw(&self, canvas: &mut impl Canvas) {
        self.object().draw(canvas);
    }

    fn refresh(&mut self, now: f64) {
        self.object_mut().refresh(now);
    }
}

// ── Bullet ────────────────────────────────────────────────────────────────────

/// Ask the owner of the bullet list for a new bullet.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnRequest {
    /// Horizontal centre of the firer.
    pub x: f32,
    pub firer_height: f32,
}

#[derive(Clone, Debug)]
pub struct Bullet {
    pub object: GameObject,
    /// Pixels per second, always upward.
    pub speed: f32,
}

impl Bullet {
    /// A bullet whose top-centre anchor sits one bullet-height above the
    /// firer's height, so the whole sprite starts just above it.
    pub fn new(x: f32, firer_height: f32, assets: &AssetRegistry, config: &GameConfig) -> Self {
        let y = firer_height + assets.bullet.scaled_height();
        Self {
            object: GameObject::new(SpriteKind::Bullet, x, y, assets, config.explosion_time),
            speed: config.bullet_speed,
        }
    }

    pub fn spawn(request: &SpawnRequest, assets: &AssetRegistry, config: &GameConfig) -> Self {
        Self::new(request.x, request.firer_height, assets, config)
    }

    pub fn update(&mut self, dt: f32) {
        self.object.y += self.speed * dt;
    }

    /// The whole sprite is above the top edge of a world `world_height` tall.
    pub fn is_above(&self, world_height: f32) -> bool {
        self.object.sprite().origin().1 >= world_height
    }
}

impl Entity for Bullet {
    fn object(&self) -> &GameObject {
        &self.object
    }

    fn object_mut(&mut self) -> &mut GameObject {
        &mut self.object
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Cooldown {
    Ready,
    /// Fired recently; ready again at `until` (simulation seconds).
    Cooling { until: f64 },
}

#[derive(Clone, Debug)]
pub struct Player {
    pub object: GameObject,
    /// Pixels per second, sign chosen by the held key.
    pub speed: f32,
    pub cooldown_time: f64,
    pub bindings: KeyBindings,
    cooldown: Cooldown,
}

impl Player {
    pub fn new(assets: &AssetRegistry, config: &GameConfig) -> Self {
        let (x, y) = config.player_start;
        Self {
            object: GameObject::new(SpriteKind::Player, x, y, assets, config.explosion_time),
            speed: config.player_speed,
            cooldown_time: config.cooldown_time,
            bindings: config.key_bindings,
            cooldown: Cooldown::Ready,
        }
    }

    pub fn cooldown(&self) -> Cooldown {
        self.cooldown
    }

    pub fn is_cooling(&self) -> bool {
        matches!(self.cooldown, Cooldown::Cooling { .. })
    }

    /// One tick: release the cooldown if it is due, move if exactly one
    /// direction is held, and fire if allowed.  Returns the bullet to spawn,
    /// if any; the caller owns the bullet list.
    pub fn update(&mut self, input: &impl InputState, dt: f32, now: f64) -> Option<SpawnRequest> {
        if let Cooldown::Cooling { until } = self.cooldown {
            if now >= until {
                self.end_cooldown();
            }
        }

        let left = input.is_held(self.bindings.move_left);
        let right = input.is_held(self.bindings.move_right);
        if left && !right {
            self.move_by(-self.speed, dt);
        } else if right && !left {
            self.move_by(self.speed, dt);
        }

        if input.is_held(self.bindings.fire) && self.cooldown == Cooldown::Ready {
            let shot = self.fire();
            self.cooldown = Cooldown::Cooling {
                until: now + self.cooldown_time,
            };
            return Some(shot);
        }
        None
    }

    /// Move horizontally at `speed` (negative is left) for `dt` seconds.
    pub fn move_by(&mut self, speed: f32, dt: f32) {
        self.object.x += speed * dt;
    }

    /// Keep the whole sprite inside `[0, world_width]`.
    pub fn clamp_x(&mut self, world_width: f32) {
        let max_x = (world_width - self.object.width()).max(0.0);
        self.object.x = self.object.x.clamp(0.0, max_x);
    }

    pub fn end_cooldown(&mut self) {
        self.cooldown = Cooldown::Ready;
    }

    /// A bullet from the horizontal centre of the player.
    pub fn fire(&self) -> SpawnRequest {
        debug!("player fired at x={:.1}", self.object.x);
        SpawnRequest {
            x: self.object.x + self.object.width() / 2.0,
            firer_height: self.object.height(),
        }
    }
}

impl Entity for Player {
    fn object(&self) -> &GameObject {
        &self.object
    }

    fn object_mut(&mut self) -> &mut GameObject {
        &mut self.object
    }
}

// ── Alien ─────────────────────────────────────────────────────────────────────

/// A stationary target.  Aliens do nothing but get hit.
#[derive(Clone, Debug)]
pub struct Alien {
    pub object: GameObject,
}

impl Alien {
    pub fn new(x: f32, y: f32, assets: &AssetRegistry, config: &GameConfig) -> Self {
        Self {
            object: GameObject::new(SpriteKind::Alien, x, y, assets, config.explosion_time),
        }
    }
}

impl Entity for Alien {
    fn object(&self) -> &GameObject {
        &self.object
    }

    fn object_mut(&mut self) -> &mut GameObject {
        &mut self.object
    }
}
