//! A room bound to one grid cell.

use serde::{Deserialize, Serialize};

use super::coord::{Side, Vec2};
use super::door::Door;
use super::template::{RoomRole, RoomTemplate, SpawnDesc};
use crate::TILE_SIZE;

/// Deep copy of a template, stamped with its place in the level graph.
///
/// Created once by the generator; afterwards only the transition engine
/// touches it (door state, lock changes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomInstance {
    pub template_id: String,
    pub role: RoomRole,
    pub is_boss: bool,
    /// Secret-layer rooms never combat-lock and their exits bypass key
    /// checks.
    pub is_secret: bool,
    /// Footprint in tiles.
    pub width: u32,
    pub height: u32,
    /// One slot per [`Side`], `Side::index()` order.
    pub doors: [Option<Door>; 4],
    pub enemies: Vec<SpawnDesc>,
    pub items: Vec<SpawnDesc>,
    pub chests: Vec<SpawnDesc>,
    pub reward: Option<String>,
}

impl RoomInstance {
    /// Clone `template` into a fresh instance. Template door hints become
    /// inactive doors; the stitcher decides which of them actually connect.
    pub fn from_template(template: &RoomTemplate) -> Self {
        let mut doors = [None; 4];
        for side in Side::ALL {
            if let Some(hint) = template.doors[side.index()] {
                let offset = hint
                    .offset
                    .unwrap_or_else(|| side_midpoint(side, template.width, template.height));
                doors[side.index()] = Some(Door::sealed(offset));
            }
        }
        Self {
            template_id: template.id.clone(),
            role: template.role,
            is_boss: template.role == RoomRole::Boss,
            is_secret: template.role.is_secret_variant(),
            width: template.width,
            height: template.height,
            doors,
            enemies: template.enemies.clone(),
            items: template.items.clone(),
            chests: template.chests.clone(),
            reward: template.reward.clone(),
        }
    }

    pub fn pixel_width(&self) -> f32 {
        self.width as f32 * TILE_SIZE
    }

    pub fn pixel_height(&self) -> f32 {
        self.height as f32 * TILE_SIZE
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.pixel_width() / 2.0, self.pixel_height() / 2.0)
    }

    pub fn door(&self, side: Side) -> Option<&Door> {
        self.doors[side.index()].as_ref()
    }

    pub fn door_mut(&mut self, side: Side) -> Option<&mut Door> {
        self.doors[side.index()].as_mut()
    }

    /// Door slot for `side`, synthesizing a sealed midpoint door if the
    /// template declared none.
    pub fn ensure_door(&mut self, side: Side) -> &mut Door {
        let midpoint = self.side_midpoint(side);
        self.doors[side.index()].get_or_insert_with(|| Door::sealed(midpoint))
    }

    /// Default door offset for `side`: the middle of that wall.
    pub fn side_midpoint(&self, side: Side) -> f32 {
        side_midpoint(side, self.width, self.height)
    }

    /// World position of the door on `side`, if present.
    pub fn door_position(&self, side: Side) -> Option<Vec2> {
        let offset = self.door(side)?.offset;
        Some(match side {
            Side::North => Vec2::new(offset, 0.0),
            Side::South => Vec2::new(offset, self.pixel_height()),
            Side::West => Vec2::new(0.0, offset),
            Side::East => Vec2::new(self.pixel_width(), offset),
        })
    }
}

fn side_midpoint(side: Side, width: u32, height: u32) -> f32 {
    match side {
        Side::North | Side::South => width as f32 * TILE_SIZE / 2.0,
        Side::East | Side::West => height as f32 * TILE_SIZE / 2.0,
    }
}
