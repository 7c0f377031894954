/// Game tunables.
///
/// Everything that used to be a class-level constant (speeds, timers, start
/// position, key bindings, sprite sizes) lives here.  Every field has a
/// default, so a config file only needs to mention what it changes.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::assets::AssetRegistry;
use crate::input::{KeyBindings, QUIT_KEY};

pub const MIN_TICK_RATE: f32 = 1.0;
pub const MAX_TICK_RATE: f32 = 1000.0;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Player horizontal speed, pixels per second.
    pub player_speed: f32,
    pub player_start: (f32, f32),
    /// Minimum time between shots, seconds.
    pub cooldown_time: f64,
    /// Bullet vertical speed, pixels per second.
    pub bullet_speed: f32,
    /// How long the explosion sprite lingers before the object is destroyed.
    pub explosion_time: f64,
    /// Updates per second the front end aims for.
    pub tick_rate: f32,
    pub world_width: f32,
    pub world_height: f32,
    /// Keep the player inside `[0, world_width - width]`.
    pub clamp_player: bool,
    /// Destroy bullets once they have fully left the top of the world.
    pub cull_offscreen_bullets: bool,
    /// Stationary targets the front end scatters at start-up.
    pub alien_count: usize,
    pub key_bindings: KeyBindings,
    pub sprites: AssetRegistry,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player_speed: 150.0,
            player_start: (20.0, 20.0),
            cooldown_time: 0.5,
            bullet_speed: 180.0,
            explosion_time: 0.2,
            tick_rate: 120.0,
            world_width: 640.0,
            world_height: 480.0,
            clamp_player: false,
            cull_offscreen_bullets: false,
            alien_count: 0,
            key_bindings: KeyBindings::default(),
            sprites: AssetRegistry::default(),
        }
    }
}

impl GameConfig {
    /// Read a JSON config file and validate it.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let mut config: GameConfig = serde_json::from_str(text)?;
        config.key_bindings = config.key_bindings.normalized();
        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("player_speed", self.player_speed),
            ("bullet_speed", self.bullet_speed),
            ("tick_rate", self.tick_rate),
            ("world_width", self.world_width),
            ("world_height", self.world_height),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                bail!("{name} must be positive, got {value}");
            }
        }

        let non_negative = [
            ("cooldown_time", self.cooldown_time),
            ("explosion_time", self.explosion_time),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0) {
                bail!("{name} must not be negative, got {value}");
            }
        }

        if !(MIN_TICK_RATE..=MAX_TICK_RATE).contains(&self.tick_rate) {
            bail!(
                "tick_rate must be between {MIN_TICK_RATE} and {MAX_TICK_RATE} Hz, got {}",
                self.tick_rate
            );
        }

        for (action, key) in self.key_bindings.iter() {
            if key.normalized() == QUIT_KEY {
                bail!("{action} cannot be bound to the quit key {key:?}");
            }
            if key.normalized() != key {
                bail!("{action} binding {key:?} can never be pressed, use {:?}", key.normalized());
            }
        }

        for info in [
            self.sprites.player,
            self.sprites.bullet,
            self.sprites.alien,
            self.sprites.explosion,
        ] {
            if !(info.scaled_width() > 0.0 && info.scaled_height() > 0.0) {
                bail!("sprite sizes must be positive, got {info:?}");
            }
        }
        Ok(())
    }

    /// Seconds per tick at the configured rate.
    pub fn tick_interval(&self) -> f32 {
        1.0 / self.tick_rate
    }
}
