/// The game window's side of the simulation.
///
/// `GameWindow` owns the clock, the player and the bullet and alien lists.
/// Each `tick` advances time, lets the player act, moves the bullets,
/// resolves hits and prunes whatever got destroyed.  Randomness only enters
/// through the RNG handed to `scatter_aliens`, so callers control determinism.

use log::{debug, info, warn};
use rand::Rng;

use crate::assets::AssetRegistry;
use crate::clock::SimClock;
use crate::config::GameConfig;
use crate::entities::{Alien, Bullet, Canvas, Entity, Player};
use crate::input::InputState;

/// Something that happened during a tick.
#[derive(Clone, Debug, PartialEq)]
pub enum FrameEvent {
    BulletFired { x: f32, y: f32 },
    AlienHit { x: f32, y: f32 },
    /// Destroyed objects removed from the lists this tick.
    Pruned { bullets: usize, aliens: usize },
}

#[derive(Clone, Debug)]
pub struct GameWindow {
    pub config: GameConfig,
    pub assets: AssetRegistry,
    pub clock: SimClock,
    pub player: Player,
    pub bullets: Vec<Bullet>,
    pub aliens: Vec<Alien>,
}

impl GameWindow {
    pub fn new(config: GameConfig) -> Self {
        let assets = config.sprites;
        Self::with_assets(config, assets)
    }

    /// Build the world with an explicit sprite table instead of the one in
    /// the config.
    pub fn with_assets(config: GameConfig, assets: AssetRegistry) -> Self {
        let player = Player::new(&assets, &config);
        info!(
            "world {}x{}, player at ({}, {})",
            config.world_width, config.world_height, player.object.x, player.object.y
        );
        Self {
            config,
            assets,
            clock: SimClock::new(),
            player,
            bullets: Vec::new(),
            aliens: Vec::new(),
        }
    }

    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    pub fn spawn_alien(&mut self, x: f32, y: f32) {
        self.aliens.push(Alien::new(x, y, &self.assets, &self.config));
    }

    /// Place `count` aliens at random spots in the upper half of the world.
    pub fn scatter_aliens(&mut self, count: usize, rng: &mut impl Rng) {
        let alien = self.assets.alien;
        let max_x = (self.config.world_width - alien.scaled_width()).max(1.0);
        let min_y = self.config.world_height / 2.0;
        let max_y = (self.config.world_height - alien.scaled_height()).max(min_y + 1.0);
        for _ in 0..count {
            let x = rng.gen_range(0.0..max_x);
            let y = rng.gen_range(min_y..max_y);
            self.spawn_alien(x, y);
        }
    }

    // ── Per-frame tick ───────────────────────────────────────────────────────

    /// Advance the simulation by `dt` seconds.
    pub fn tick(&mut self, input: &impl InputState, dt: f32) -> Vec<FrameEvent> {
        let dt = if dt.is_finite() && dt >= 0.0 {
            dt
        } else {
            warn!("ignoring invalid frame time {dt}");
            0.0
        };
        let now = self.clock.advance(dt);
        let mut events = Vec::new();

        // ── 1. Due timers, then drop what they destroyed ─────────────────────
        self.player.refresh(now);
        for bullet in &mut self.bullets {
            bullet.refresh(now);
        }
        for alien in &mut self.aliens {
            alien.refresh(now);
        }
        self.prune(&mut events);

        // ── 2. Player moves and maybe fires ──────────────────────────────────
        if !self.player.is_destroyed() {
            let spawn = self.player.update(input, dt, now);
            if self.config.clamp_player {
                self.player.clamp_x(self.config.world_width);
            }
            if let Some(request) = spawn {
                let bullet = Bullet::spawn(&request, &self.assets, &self.config);
                events.push(FrameEvent::BulletFired {
                    x: bullet.object.x,
                    y: bullet.object.y,
                });
                self.bullets.push(bullet);
            }
        }

        // ── 3. Move bullets ──────────────────────────────────────────────────
        for bullet in &mut self.bullets {
            bullet.update(dt);
            if self.config.cull_offscreen_bullets && bullet.is_above(self.config.world_height) {
                bullet.object.destroy();
            }
        }

        // ── 4. Bullets ↔ aliens ──────────────────────────────────────────────
        self.resolve_hits(now, &mut events);

        // ── 5. Drop destroyed objects ────────────────────────────────────────
        self.prune(&mut events);

        events
    }

    /// Every live bullet against every live alien that has not already
    /// exploded.  A bullet is spent on the first alien it hits.
    fn resolve_hits(&mut self, now: f64, events: &mut Vec<FrameEvent>) {
        for bullet in self.bullets.iter_mut().filter(|b| !b.is_destroyed()) {
            let target = self
                .aliens
                .iter_mut()
                .filter(|a| !a.is_destroyed() && !a.object.is_exploded())
                .find(|a| bullet.object.has_hit(&a.object));

            if let Some(alien) = target {
                debug!(
                    "bullet at ({:.1}, {:.1}) hit alien at ({:.1}, {:.1})",
                    bullet.object.x, bullet.object.y, alien.object.x, alien.object.y
                );
                alien.object.explode(now);
                bullet.object.destroy();
                events.push(FrameEvent::AlienHit {
                    x: alien.object.x,
                    y: alien.object.y,
                });
            }
        }
    }

    fn prune(&mut self, events: &mut Vec<FrameEvent>) {
        let bullets_before = self.bullets.len();
        let aliens_before = self.aliens.len();
        self.bullets.retain(|b| !b.is_destroyed());
        self.aliens.retain(|a| !a.is_destroyed());

        let bullets = bullets_before - self.bullets.len();
        let aliens = aliens_before - self.aliens.len();
        if bullets > 0 || aliens > 0 {
            events.push(FrameEvent::Pruned { bullets, aliens });
        }
    }

    // ── Drawing ──────────────────────────────────────────────────────────────

    /// Draw every object that is still alive: aliens, bullets, then the
    /// player on top.
    pub fn draw(&self, canvas: &mut impl Canvas) {
        for alien in self.aliens.iter().filter(|a| !a.is_destroyed()) {
            alien.draw(canvas);
        }
        for bullet in self.bullets.iter().filter(|b| !b.is_destroyed()) {
            bullet.draw(canvas);
        }
        if !self.player.is_destroyed() {
            self.player.draw(canvas);
        }
    }
}
