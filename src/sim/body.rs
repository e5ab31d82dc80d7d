//! Shared physical shape of every simulated object
//!
//! Positions are the top-left corner of an axis-aligned box in screen space
//! (y grows downward, the ground line is a horizontal y value).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Packed 0xRRGGBB render hint. Not read by gameplay logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u32);

impl Rgb {
    pub const BRICK_RED: Rgb = Rgb(0xDC2626);
    pub const BOMB_SLATE: Rgb = Rgb(0x1E293B);
    pub const RAY_CYAN: Rgb = Rgb(0x06B6D4);
    pub const SHOTGUN_BLUE: Rgb = Rgb(0x2563EB);
    pub const LEGO_GREEN: Rgb = Rgb(0x16A34A);
    pub const MINIGUN_AMBER: Rgb = Rgb(0xF59E0B);
    pub const PLASMA_VIOLET: Rgb = Rgb(0x8B5CF6);
    pub const PLAYER_YELLOW: Rgb = Rgb(0xEAB308);
    pub const BOSS_SHOT: Rgb = Rgb(0xF43F5E);

    /// Palette used for explosion debris
    pub const DEBRIS: [Rgb; 4] = [
        Rgb(0xDC2626),
        Rgb(0x2563EB),
        Rgb(0xF59E0B),
        Rgb(0x10B981),
    ];
}

/// Position, velocity and axis-aligned extent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub color: Rgb,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2, color: Rgb) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size,
            color,
        }
    }

    /// Body of the given size whose center sits at `center`
    pub fn centered(center: Vec2, size: Vec2, color: Rgb) -> Self {
        Self::new(center - size / 2.0, size, color)
    }

    pub fn with_vel(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    /// Strict AABB overlap; boxes that only touch along an edge do not collide
    #[inline]
    pub fn overlaps(&self, other: &Body) -> bool {
        self.pos.x < other.pos.x + other.size.x
            && self.pos.x + self.size.x > other.pos.x
            && self.pos.y < other.pos.y + other.size.y
            && self.pos.y + self.size.y > other.pos.y
    }

    /// Explicit Euler step
    #[inline]
    pub fn integrate(&mut self) {
        self.pos += self.vel;
    }

    /// Whether the bottom edge has sunk below the ground line
    #[inline]
    pub fn below_ground(&self, ground_y: f32) -> bool {
        self.bottom() > ground_y
    }

    /// Snap the bottom edge onto the ground line
    #[inline]
    pub fn rest_on_ground(&mut self, ground_y: f32) {
        self.pos.y = ground_y - self.size.y;
    }
}
