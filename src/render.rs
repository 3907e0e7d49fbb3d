//! Drawing collaborator
//!
//! The simulation never touches pixels. Each tick the orchestrator walks the
//! session and hands image blits and filled rectangles to a `Renderer`
//! implemented by the host. A failed draw (e.g. image still loading) skips
//! that entity for the tick.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::assets;
use crate::sim::{Bounds, EnemyKind, Session};

/// Shared key of an image resource (its asset path)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageHandle(Arc<str>);

impl ImageHandle {
    pub fn new(path: impl Into<Arc<str>>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Destination rectangle in field pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl From<Bounds> for Rect {
    fn from(b: Bounds) -> Self {
        Self {
            x: b.x,
            y: b.y,
            width: b.width,
            height: b.height,
        }
    }
}

/// RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const RED: Color = Color::rgb(0xff, 0x00, 0x00);
    pub const GREEN: Color = Color::rgb(0x00, 0xff, 0x00);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("image `{0}` is not loaded")]
    NotLoaded(ImageHandle),
    #[error("backend draw failed: {0}")]
    Backend(String),
}

/// Host drawing surface
pub trait Renderer {
    fn draw_image(&mut self, image: &ImageHandle, dest: Rect) -> Result<(), RenderError>;
    fn fill_rect(&mut self, color: Color, dest: Rect) -> Result<(), RenderError>;
}

/// Renderer that draws nothing (headless runs)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn draw_image(&mut self, _image: &ImageHandle, _dest: Rect) -> Result<(), RenderError> {
        Ok(())
    }

    fn fill_rect(&mut self, _color: Color, _dest: Rect) -> Result<(), RenderError> {
        Ok(())
    }
}

/// Health bar geometry above damaged-capable enemies
const HEALTH_BAR_HEIGHT: f32 = 4.0;
const HEALTH_BAR_GAP: f32 = 2.0;

/// Sprite handles, built once per renderer owner
#[derive(Debug, Clone)]
pub struct SpriteSet {
    pub player: ImageHandle,
    pub enemy: ImageHandle,
    pub bullet: ImageHandle,
}

impl Default for SpriteSet {
    fn default() -> Self {
        Self {
            player: ImageHandle::new(assets::PLAYER_IMAGE),
            enemy: ImageHandle::new(assets::ENEMY_IMAGE),
            bullet: ImageHandle::new(assets::BULLET_IMAGE),
        }
    }
}

/// Draw every visible entity; returns the number of successful draw calls
pub fn render_session(
    session: &Session,
    sprites: &SpriteSet,
    renderer: &mut impl Renderer,
) -> usize {
    let mut drawn = 0;
    let mut draw = |result: Result<(), RenderError>| match result {
        Ok(()) => drawn += 1,
        Err(e) => log::trace!("Skipped draw: {e}"),
    };

    for enemy in session.enemies.iter().filter(|e| e.bounds.visible) {
        draw(renderer.draw_image(&sprites.enemy, enemy.bounds.into()));

        if enemy.kind != EnemyKind::Small {
            let back = Rect {
                x: enemy.bounds.x,
                y: enemy.bounds.y - HEALTH_BAR_HEIGHT - HEALTH_BAR_GAP,
                width: enemy.bounds.width,
                height: HEALTH_BAR_HEIGHT,
            };
            let front = Rect {
                width: back.width * enemy.health_fraction(),
                ..back
            };
            draw(renderer.fill_rect(Color::RED, back));
            draw(renderer.fill_rect(Color::GREEN, front));
        }
    }

    for bullet in session.bullets.iter().filter(|b| b.bounds.visible) {
        draw(renderer.draw_image(&sprites.bullet, bullet.bounds.into()));
    }

    if session.player.bounds.visible {
        draw(renderer.draw_image(&sprites.player, session.player.bounds.into()));
    }

    for animation in session.animations.iter().filter(|a| a.bounds.visible) {
        if let Some(frame) = animation.current_frame() {
            draw(renderer.draw_image(&frame.image, animation.bounds.into()));
        }
    }

    drawn
}
