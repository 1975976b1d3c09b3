//! Room blueprints and the role-tagged template catalog.
//!
//! Templates are loaded by the asset layer before generation starts and are
//! never mutated afterwards; the generator deep-copies them into
//! [`crate::dungeon::RoomInstance`]s.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use super::coord::Side;
use crate::{DEFAULT_ROOM_TILES_X, DEFAULT_ROOM_TILES_Y};

/// Role tag deciding where a template may be placed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum RoomRole {
    Start = 0,
    #[default]
    Normal = 1,
    Boss = 2,
    Shop = 3,
    Upgrade = 4,
    Secret = 5,
    Trophy = 6,
    Home = 7,
    Matrix = 8,
}

impl RoomRole {
    /// Roles that mark a room as part of the secret layer of the map.
    pub const fn is_secret_variant(&self) -> bool {
        matches!(
            self,
            RoomRole::Secret | RoomRole::Trophy | RoomRole::Home | RoomRole::Matrix
        )
    }
}

/// Template-declared door on one side. An offset of `None` means "use the
/// midpoint of the side".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DoorHint {
    pub offset: Option<f32>,
}

/// A spawn spot inside a room: what to create and where.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnDesc {
    pub template: String,
    pub x: f32,
    pub y: f32,
}

impl SpawnDesc {
    pub fn new(template: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            template: template.into(),
            x,
            y,
        }
    }
}

/// Static room blueprint. Dimensions are in tiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomTemplate {
    pub id: String,
    pub role: RoomRole,
    pub width: u32,
    pub height: u32,
    pub doors: [Option<DoorHint>; 4],
    pub enemies: Vec<SpawnDesc>,
    pub items: Vec<SpawnDesc>,
    pub chests: Vec<SpawnDesc>,
    /// Reward descriptor handed to the reward hook when this room clears.
    pub reward: Option<String>,
}

impl RoomTemplate {
    pub fn new(id: impl Into<String>, role: RoomRole) -> Self {
        Self {
            id: id.into(),
            role,
            width: DEFAULT_ROOM_TILES_X,
            height: DEFAULT_ROOM_TILES_Y,
            doors: [None; 4],
            enemies: Vec::new(),
            items: Vec::new(),
            chests: Vec::new(),
            reward: None,
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Declare a door on `side` at the side midpoint.
    pub fn with_door(mut self, side: Side) -> Self {
        self.doors[side.index()] = Some(DoorHint { offset: None });
        self
    }

    /// Declare a door on `side` at a fixed offset along that side.
    pub fn with_door_at(mut self, side: Side, offset: f32) -> Self {
        self.doors[side.index()] = Some(DoorHint {
            offset: Some(offset),
        });
        self
    }

    pub fn with_enemy(mut self, template: impl Into<String>, x: f32, y: f32) -> Self {
        self.enemies.push(SpawnDesc::new(template, x, y));
        self
    }

    pub fn with_item(mut self, template: impl Into<String>, x: f32, y: f32) -> Self {
        self.items.push(SpawnDesc::new(template, x, y));
        self
    }

    pub fn with_chest(mut self, template: impl Into<String>, x: f32, y: f32) -> Self {
        self.chests.push(SpawnDesc::new(template, x, y));
        self
    }

    pub fn with_reward(mut self, reward: impl Into<String>) -> Self {
        self.reward = Some(reward.into());
        self
    }
}

/// All loaded templates, indexed by id, with insertion order preserved.
///
/// Insertion order matters: role lookups and the normal draw pool walk the
/// templates in the order they were registered, so two runs that load the
/// same catalog draw from identical pools.
#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
    templates: Vec<RoomTemplate>,
    by_id: HashMap<String, usize>,
}

impl TemplateCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template. A duplicate id replaces the earlier entry in
    /// place, keeping its position in the ordering.
    pub fn insert(&mut self, template: RoomTemplate) {
        if let Some(&slot) = self.by_id.get(&template.id) {
            log::warn!("template {:?} registered twice; replacing", template.id);
            self.templates[slot] = template;
        } else {
            self.by_id.insert(template.id.clone(), self.templates.len());
            self.templates.push(template);
        }
    }

    pub fn get(&self, id: &str) -> Option<&RoomTemplate> {
        self.by_id.get(id).map(|&slot| &self.templates[slot])
    }

    /// First registered template carrying `role`.
    pub fn first_of_role(&self, role: RoomRole) -> Option<&RoomTemplate> {
        self.templates.iter().find(|t| t.role == role)
    }

    /// The draw pool for generic cells: every `Normal` template, in
    /// registration order. Reserved roles never leak into this pool.
    pub fn normal_pool(&self) -> Vec<&RoomTemplate> {
        self.templates
            .iter()
            .filter(|t| t.role == RoomRole::Normal)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RoomTemplate> {
        self.templates.iter()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

// Serde carries the catalog as the ordered template list; loading rebuilds
// the id index through `insert`, so duplicates in a JSON file replace in
// place just like repeated registration.
impl Serialize for TemplateCatalog {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.templates.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TemplateCatalog {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let templates = Vec::<RoomTemplate>::deserialize(deserializer)?;
        let mut catalog = TemplateCatalog::new();
        for template in templates {
            catalog.insert(template);
        }
        Ok(catalog)
    }
}
