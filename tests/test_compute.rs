use std::collections::HashSet;

use approx::assert_relative_eq;
use invaders::assets::SpriteKind;
use invaders::compute::*;
use invaders::config::GameConfig;
use invaders::entities::{Canvas, Entity, Sprite};
use invaders::input::{Key, NoInput};

use rand::rngs::StdRng;
use rand::SeedableRng;
use test_log::test;

fn make_window() -> GameWindow {
    GameWindow::new(GameConfig::default())
}

fn held(keys: &[Key]) -> HashSet<Key> {
    keys.iter().copied().collect()
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

#[derive(Default)]
struct Recorder(Vec<Sprite>);

impl Canvas for Recorder {
    fn draw_sprite(&mut self, sprite: &Sprite) {
        self.0.push(*sprite);
    }
}

fn drawn_kinds(window: &GameWindow) -> Vec<SpriteKind> {
    let mut canvas = Recorder::default();
    window.draw(&mut canvas);
    canvas.0.iter().map(|s| s.kind).collect()
}

fn fired(events: &[FrameEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, FrameEvent::BulletFired { .. }))
        .count()
}

fn hits(events: &[FrameEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, FrameEvent::AlienHit { .. }))
        .count()
}

// ── Construction ──────────────────────────────────────────────────────────────

#[test]
fn new_window_is_empty() {
    let w = make_window();
    assert!(w.bullets.is_empty());
    assert!(w.aliens.is_empty());
    assert_eq!(w.now(), 0.0);
    assert_eq!((w.player.object.x, w.player.object.y), (20.0, 20.0));
}

#[test]
fn scatter_aliens_is_deterministic_and_in_bounds() {
    let mut a = make_window();
    let mut b = make_window();
    a.scatter_aliens(5, &mut seeded_rng());
    b.scatter_aliens(5, &mut seeded_rng());

    assert_eq!(a.aliens.len(), 5);
    for (x, y) in a.aliens.iter().zip(&b.aliens) {
        assert_eq!((x.object.x, x.object.y), (y.object.x, y.object.y));
    }
    for alien in &a.aliens {
        assert!(alien.object.x >= 0.0 && alien.object.x + alien.object.width() <= 640.0);
        assert!(alien.object.y >= 240.0 && alien.object.y + alien.object.height() <= 480.0);
    }
}

// ── Clock ─────────────────────────────────────────────────────────────────────

#[test]
fn tick_advances_clock() {
    let mut w = make_window();
    w.tick(&NoInput, 0.25);
    w.tick(&NoInput, 0.25);
    assert_eq!(w.now(), 0.5);
}

#[test]
fn invalid_frame_time_is_ignored() {
    let mut w = make_window();
    w.tick(&held(&[Key::Right]), f32::NAN);
    w.tick(&held(&[Key::Right]), -1.0);
    assert_eq!(w.now(), 0.0);
    assert_eq!(w.player.object.x, 20.0);
}

// ── Movement ──────────────────────────────────────────────────────────────────

#[test]
fn both_keys_held_never_moves() {
    let mut w = make_window();
    for _ in 0..60 {
        w.tick(&held(&[Key::Left, Key::Right]), 1.0 / 120.0);
    }
    assert_eq!(w.player.object.x, 20.0);
}

#[test]
fn player_runs_off_screen_without_clamping() {
    let mut w = make_window();
    w.tick(&held(&[Key::Left]), 1.0);
    assert_relative_eq!(w.player.object.x, -130.0);
}

#[test]
fn clamp_player_keeps_it_in_the_world() {
    let mut w = GameWindow::new(GameConfig {
        clamp_player: true,
        ..GameConfig::default()
    });
    w.tick(&held(&[Key::Left]), 1.0);
    assert_eq!(w.player.object.x, 0.0);

    for _ in 0..10 {
        w.tick(&held(&[Key::Right]), 1.0);
    }
    assert_eq!(w.player.object.x, 600.0);
}

// ── Firing ────────────────────────────────────────────────────────────────────

#[test]
fn fired_bullet_spawns_above_player_centre() {
    let mut w = make_window();
    w.player.object.x = 100.0;
    let events = w.tick(&held(&[Key::Space]), 0.0);

    assert_eq!(fired(&events), 1);
    assert_eq!(w.bullets.len(), 1);
    let bullet = &w.bullets[0];
    assert_relative_eq!(bullet.object.x, 120.0);
    // player height 20 + scaled bullet height 40 * 0.2
    assert_relative_eq!(bullet.object.y, 28.0);
    assert_eq!(
        events[0],
        FrameEvent::BulletFired { x: 120.0, y: 28.0 }
    );
}

#[test]
fn holding_fire_respects_cooldown() {
    let mut w = make_window();
    let fire = held(&[Key::Space]);
    let mut shot_times = Vec::new();

    for _ in 0..240 {
        let events = w.tick(&fire, 1.0 / 120.0);
        if fired(&events) > 0 {
            shot_times.push(w.now());
        }
    }

    assert_eq!(shot_times.len(), 4);
    assert_eq!(w.bullets.len(), 4);
    for pair in shot_times.windows(2) {
        assert!(pair[1] - pair[0] >= 0.5, "shots {pair:?} closer than the cooldown");
    }
}

#[test]
fn releasing_fire_does_not_end_cooldown_early() {
    let mut w = make_window();
    w.tick(&held(&[Key::Space]), 0.125);
    w.tick(&NoInput, 0.125);
    let events = w.tick(&held(&[Key::Space]), 0.125);
    assert_eq!(fired(&events), 0);
    assert!(w.player.is_cooling());

    w.tick(&NoInput, 0.25);
    assert!(!w.player.is_cooling());
    let events = w.tick(&held(&[Key::Space]), 0.125);
    assert_eq!(fired(&events), 1);
}

#[test]
fn bullets_climb_each_tick() {
    let mut w = make_window();
    w.tick(&held(&[Key::Space]), 0.0);
    w.tick(&NoInput, 1.0);
    assert_relative_eq!(w.bullets[0].object.y, 208.0);
}

#[test]
fn offscreen_bullets_stay_without_culling() {
    let mut w = make_window();
    w.tick(&held(&[Key::Space]), 0.0);
    w.tick(&NoInput, 10.0);
    assert_eq!(w.bullets.len(), 1);
    assert!(w.bullets[0].object.y > 480.0);
}

#[test]
fn offscreen_bullets_culled_when_enabled() {
    let mut w = GameWindow::new(GameConfig {
        cull_offscreen_bullets: true,
        ..GameConfig::default()
    });
    w.tick(&held(&[Key::Space]), 0.0);
    w.tick(&NoInput, 1.0);
    assert_eq!(w.bullets.len(), 1);

    let events = w.tick(&NoInput, 10.0);
    assert!(w.bullets.is_empty());
    assert!(events.contains(&FrameEvent::Pruned { bullets: 1, aliens: 0 }));
}

// ── Collisions and explosions ─────────────────────────────────────────────────

/// Alien straight above the player's gun: player x 20 + 40/2 = 40 is inside
/// the alien's 20..60 span, and the bullet reaches y 118 after 0.5 s.
fn window_with_target() -> GameWindow {
    let mut w = make_window();
    w.spawn_alien(20.0, 100.0);
    w
}

#[test]
fn bullet_hits_alien_and_alien_explodes_then_disappears() {
    let mut w = window_with_target();

    let events = w.tick(&held(&[Key::Space]), 0.25); // t = 0.25, y = 73
    assert_eq!(fired(&events), 1);
    assert_eq!(hits(&events), 0);

    let events = w.tick(&NoInput, 0.25); // t = 0.5, y = 118
    assert_eq!(hits(&events), 1);
    assert!(w.bullets.is_empty(), "spent bullet should be pruned");
    assert_eq!(w.aliens.len(), 1);
    assert!(w.aliens[0].object.is_exploded());
    assert_eq!(w.aliens[0].object.explode_at(), Some(0.7));

    w.tick(&NoInput, 0.125); // t = 0.625
    assert_eq!(w.aliens.len(), 1);
    assert!(!w.aliens[0].is_destroyed());
    assert!(drawn_kinds(&w).contains(&SpriteKind::Explosion));

    let events = w.tick(&NoInput, 0.125); // t = 0.75
    assert!(w.aliens.is_empty());
    assert!(events.contains(&FrameEvent::Pruned { bullets: 0, aliens: 1 }));
    assert_eq!(drawn_kinds(&w), vec![SpriteKind::Player]);
}

#[test]
fn exploding_alien_cannot_be_hit_again() {
    let mut w = window_with_target();
    w.tick(&held(&[Key::Space]), 0.25);
    w.tick(&NoInput, 0.25);
    assert!(w.aliens[0].object.is_exploded());

    // Drop a fresh bullet right inside the exploding alien.
    w.tick(&NoInput, 0.0);
    w.player.end_cooldown();
    let events = w.tick(&held(&[Key::Space]), 0.0);
    assert_eq!(fired(&events), 1);
    w.bullets[0].object.y = 110.0;

    let events = w.tick(&NoInput, 0.0);
    assert_eq!(hits(&events), 0);
    assert_eq!(w.bullets.len(), 1);
    assert_eq!(w.aliens[0].object.explode_at(), Some(0.7));
}

#[test]
fn one_bullet_only_takes_one_alien() {
    let mut w = make_window();
    w.spawn_alien(20.0, 100.0);
    w.spawn_alien(30.0, 100.0);
    w.tick(&held(&[Key::Space]), 0.25);
    let events = w.tick(&NoInput, 0.25);

    assert_eq!(hits(&events), 1);
    let exploded = w.aliens.iter().filter(|a| a.object.is_exploded()).count();
    assert_eq!(exploded, 1);
}

#[test]
fn destroyed_alien_is_not_drawn_or_hit() {
    let mut w = window_with_target();
    w.aliens[0].object.destroy();
    assert_eq!(drawn_kinds(&w), vec![SpriteKind::Player]);

    w.tick(&held(&[Key::Space]), 0.25);
    let events = w.tick(&NoInput, 0.25);
    assert_eq!(hits(&events), 0);
    assert!(w.aliens.is_empty());
    assert_eq!(w.bullets.len(), 1);
}

#[test]
fn destroyed_player_does_nothing() {
    let mut w = make_window();
    w.player.object.destroy();
    let events = w.tick(&held(&[Key::Space, Key::Right]), 1.0);

    assert_eq!(fired(&events), 0);
    assert_eq!(w.player.object.x, 20.0);
    assert!(drawn_kinds(&w).is_empty());
}

#[test]
fn draw_order_aliens_bullets_player() {
    let mut w = window_with_target();
    w.tick(&held(&[Key::Space]), 0.0);
    assert_eq!(
        drawn_kinds(&w),
        vec![SpriteKind::Alien, SpriteKind::Bullet, SpriteKind::Player]
    );
}
