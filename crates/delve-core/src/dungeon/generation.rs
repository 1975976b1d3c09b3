//! Level graph generation.
//!
//! One call to [`generate`] turns a seed-primed RNG, the template catalog,
//! and the feature config into a fully stitched [`LevelMap`]. Steps run in
//! a fixed order: golden path walk, branch growth, upgrade slot, shop,
//! trophy cluster, standalone secrets, template binding, door stitching.
//! Every random decision routes through the one [`DeterministicRng`], so a
//! seed rebuilds the identical floor.
//!
//! Placement of an optional room can fail (no template loaded, no cell
//! qualifies). That is never fatal: the feature is logged and skipped and
//! generation carries on.

use delve_rng::DeterministicRng;
use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use super::coord::{Coord, Side};
use super::golden::GoldenPath;
use super::levelmap::{LevelMap, RoomEntry};
use super::room::RoomInstance;
use super::stitch::stitch_doors;
use super::template::{RoomRole, RoomTemplate, TemplateCatalog};
use crate::config::GenerationConfig;
use crate::errors::GenerationError;

/// Where the upgrade room always goes: directly west of the start cell.
pub const UPGRADE_SLOT: Coord = Coord::new(-1, 0);

/// A standalone secret room and the cell it hangs off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecretPlacement {
    pub cell: Coord,
    pub host: Coord,
    /// Template bound to the cell, already resolved against the catalog.
    pub template: String,
}

/// Coordinates of every placed special room. `None` means the feature was
/// disabled or skipped this run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialRooms {
    pub boss: Coord,
    pub shop: Option<Coord>,
    pub upgrade: Option<Coord>,
    pub trophy: Option<Coord>,
    /// The plain cell the trophy room hangs off.
    pub trophy_host: Option<Coord>,
    pub home: Option<Coord>,
    pub matrix: Option<Coord>,
    pub secrets: Vec<SecretPlacement>,
}

impl SpecialRooms {
    fn new(boss: Coord) -> Self {
        Self {
            boss,
            shop: None,
            upgrade: None,
            trophy: None,
            trophy_host: None,
            home: None,
            matrix: None,
            secrets: Vec::new(),
        }
    }

    /// Role a special placement dictates for `coord`, if any.
    pub fn role_of(&self, coord: Coord) -> Option<RoomRole> {
        if coord == self.boss {
            return Some(RoomRole::Boss);
        }
        if self.shop == Some(coord) {
            return Some(RoomRole::Shop);
        }
        if self.upgrade == Some(coord) {
            return Some(RoomRole::Upgrade);
        }
        if self.trophy == Some(coord) {
            return Some(RoomRole::Trophy);
        }
        if self.home == Some(coord) {
            return Some(RoomRole::Home);
        }
        if self.matrix == Some(coord) {
            return Some(RoomRole::Matrix);
        }
        if self.secrets.iter().any(|s| s.cell == coord) {
            return Some(RoomRole::Secret);
        }
        None
    }

    /// Whether `coord` belongs to the secret layer (trophy cluster or a
    /// standalone secret room).
    pub fn is_secret_cell(&self, coord: Coord) -> bool {
        self.trophy == Some(coord)
            || self.home == Some(coord)
            || self.matrix == Some(coord)
            || self.secrets.iter().any(|s| s.cell == coord)
    }

    /// Cells that may not host further special rooms.
    fn is_reserved(&self, coord: Coord) -> bool {
        self.shop == Some(coord) || self.upgrade == Some(coord) || self.is_secret_cell(coord)
    }
}

/// A generated floor, ready for the transition engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedLevel {
    pub map: LevelMap,
    pub golden: GoldenPath,
    pub special: SpecialRooms,
}

/// Occupied-cell bookkeeping during generation. The `Vec` keeps insertion
/// order because candidate filters walk it; the set answers adjacency
/// queries.
struct Layout {
    occupied: Vec<Coord>,
    lookup: HashSet<Coord>,
}

impl Layout {
    fn new() -> Self {
        Self {
            occupied: Vec::new(),
            lookup: HashSet::new(),
        }
    }

    fn occupy(&mut self, coord: Coord) {
        if self.lookup.insert(coord) {
            self.occupied.push(coord);
        }
    }

    fn contains(&self, coord: Coord) -> bool {
        self.lookup.contains(&coord)
    }

    /// Unoccupied neighbors in fixed N/E/S/W order.
    fn free_neighbors(&self, coord: Coord) -> Vec<Coord> {
        coord
            .neighbors()
            .into_iter()
            .filter(|c| !self.contains(*c))
            .collect()
    }

    /// Sides of `coord` that face an unoccupied cell, in fixed order.
    fn free_sides(&self, coord: Coord) -> Vec<Side> {
        Side::ALL
            .into_iter()
            .filter(|&side| !self.contains(coord.step(side)))
            .collect()
    }

    fn occupied_neighbor_count(&self, coord: Coord) -> usize {
        coord
            .neighbors()
            .into_iter()
            .filter(|c| self.contains(*c))
            .count()
    }
}

/// Build a full floor. `room_count` is the target number of golden path
/// steps beyond the start; the walk may stop short if it boxes itself in.
pub fn generate(
    room_count: usize,
    rng: &mut DeterministicRng,
    catalog: &TemplateCatalog,
    config: &GenerationConfig,
) -> Result<GeneratedLevel, GenerationError> {
    if room_count == 0 {
        return Err(GenerationError::BadRoomCount(room_count));
    }
    let start_template = catalog
        .first_of_role(RoomRole::Start)
        .ok_or(GenerationError::MissingStartTemplate)?;

    let mut layout = Layout::new();
    let path = walk_golden_path(room_count, rng, &mut layout);
    let boss = path[path.len() - 1];
    let mut special = SpecialRooms::new(boss);

    grow_branches(&path, rng, &mut layout);

    if config.upgrade_room {
        place_upgrade(catalog, &mut layout, &mut special);
    }
    if config.shop {
        place_shop(rng, catalog, &mut layout, &mut special);
    }

    let mut secret_queue: &[String] = &config.secret_rooms;
    if config.trophy_room {
        let placed = place_trophy_cluster(rng, catalog, config, &mut layout, &mut special);
        if placed && !secret_queue.is_empty() {
            // the cluster consumes the first configured secret slot
            secret_queue = &secret_queue[1..];
        }
    }
    for id in secret_queue {
        place_secret(id, rng, catalog, &mut layout, &mut special);
    }

    let mut map = bind_templates(rng, catalog, &layout, &path, &special, start_template);
    let golden = GoldenPath::new(path);
    stitch_doors(&mut map, &layout.occupied, &special);

    let faults = map.validate();
    if !faults.is_empty() {
        log::error!("generated level failed its integrity sweep: {faults:?}");
        debug_assert!(faults.is_empty(), "level integrity: {faults:?}");
    }

    Ok(GeneratedLevel {
        map,
        golden,
        special,
    })
}

/// Step 1: random walk from the origin. Each step draws uniformly among
/// unvisited neighbors; the last cell reached is the boss room.
fn walk_golden_path(
    room_count: usize,
    rng: &mut DeterministicRng,
    layout: &mut Layout,
) -> Vec<Coord> {
    let mut path = vec![Coord::ORIGIN];
    layout.occupy(Coord::ORIGIN);
    let mut cursor = Coord::ORIGIN;
    for _ in 0..room_count {
        let free = layout.free_neighbors(cursor);
        let Some(&next) = rng.choose(&free) else {
            log::warn!("golden path walk boxed in after {} cells", path.len());
            break;
        };
        layout.occupy(next);
        path.push(next);
        cursor = next;
    }
    path
}

/// Step 2: each interior path cell has a 50% chance to sprout a dead-end
/// branch of 1-3 cells. Branches stop early when boxed in.
fn grow_branches(path: &[Coord], rng: &mut DeterministicRng, layout: &mut Layout) {
    if path.len() <= 2 {
        return;
    }
    for &cell in &path[1..path.len() - 1] {
        if !rng.chance(0.5) {
            continue;
        }
        let length = rng.rnd(3);
        let mut tip = cell;
        for _ in 0..length {
            let free = layout.free_neighbors(tip);
            let Some(&next) = rng.choose(&free) else {
                break;
            };
            layout.occupy(next);
            tip = next;
        }
    }
}

/// Step 3: the upgrade room, always directly west of the start.
fn place_upgrade(catalog: &TemplateCatalog, layout: &mut Layout, special: &mut SpecialRooms) {
    if catalog.first_of_role(RoomRole::Upgrade).is_none() {
        log::warn!("upgrade room enabled but no upgrade template is loaded; skipping");
        return;
    }
    if layout.contains(UPGRADE_SLOT) {
        log::warn!("upgrade slot {UPGRADE_SLOT} already occupied; skipping upgrade room");
        return;
    }
    layout.occupy(UPGRADE_SLOT);
    special.upgrade = Some(UPGRADE_SLOT);
}

/// Step 4: the shop takes over an existing cell, preferring dead ends and
/// never sitting next door to the start.
fn place_shop(
    rng: &mut DeterministicRng,
    catalog: &TemplateCatalog,
    layout: &mut Layout,
    special: &mut SpecialRooms,
) {
    if catalog.first_of_role(RoomRole::Shop).is_none() {
        log::warn!("shop enabled but no shop template is loaded; skipping");
        return;
    }
    let candidates: Vec<Coord> = layout
        .occupied
        .iter()
        .copied()
        .filter(|&c| c != Coord::ORIGIN && c != special.boss && Some(c) != special.upgrade)
        .filter(|&c| c.manhattan(Coord::ORIGIN) > 1)
        .collect();
    let dead_ends: Vec<Coord> = candidates
        .iter()
        .copied()
        .filter(|&c| layout.occupied_neighbor_count(c) == 1)
        .collect();
    let pool = if dead_ends.is_empty() {
        &candidates
    } else {
        &dead_ends
    };
    match rng.choose(pool) {
        Some(&cell) => special.shop = Some(cell),
        None => log::info!("no eligible shop cell on this floor; shop skipped"),
    }
}

/// Step 5: the trophy cluster. A host cell gets a fresh trophy neighbor,
/// which in turn must have room for every enabled child; the host is drawn
/// uniformly among cells passing that two-hop check, children then attach
/// first-fit with no further draws.
fn place_trophy_cluster(
    rng: &mut DeterministicRng,
    catalog: &TemplateCatalog,
    config: &GenerationConfig,
    layout: &mut Layout,
    special: &mut SpecialRooms,
) -> bool {
    if catalog.first_of_role(RoomRole::Trophy).is_none() {
        log::warn!("trophy room enabled but no trophy template is loaded; skipping cluster");
        return false;
    }
    let home_on = config.home_room && {
        let loaded = catalog.first_of_role(RoomRole::Home).is_some();
        if !loaded {
            log::warn!("home room enabled but no home template is loaded; skipping");
        }
        loaded
    };
    let matrix_on = config.matrix_room && {
        let loaded = catalog.first_of_role(RoomRole::Matrix).is_some();
        if !loaded {
            log::warn!("matrix room enabled but no matrix template is loaded; skipping");
        }
        loaded
    };
    let children = usize::from(home_on) + usize::from(matrix_on);

    let mut hosts: Vec<(Coord, Coord)> = Vec::new();
    for &cell in &layout.occupied {
        if cell == Coord::ORIGIN
            || cell == special.boss
            || Some(cell) == special.shop
            || Some(cell) == special.upgrade
        {
            continue;
        }
        if let Some(slot) = first_fit_slot(layout, cell, children) {
            hosts.push((cell, slot));
        }
    }
    let Some(&(host, slot)) = rng.choose(&hosts) else {
        log::info!("no host cell can carry the trophy cluster; skipping");
        return false;
    };
    debug_assert!(Some(host) != special.shop, "trophy host collides with shop");

    layout.occupy(slot);
    special.trophy = Some(slot);
    special.trophy_host = Some(host);
    if home_on {
        if let Some(&child) = layout.free_neighbors(slot).first() {
            layout.occupy(child);
            special.home = Some(child);
        }
    }
    if matrix_on {
        if let Some(&child) = layout.free_neighbors(slot).first() {
            layout.occupy(child);
            special.matrix = Some(child);
        }
    }
    true
}

/// First free neighbor of `host` that itself has at least `children` free
/// neighbors left over.
fn first_fit_slot(layout: &Layout, host: Coord, children: usize) -> Option<Coord> {
    for side in Side::ALL {
        let slot = host.step(side);
        if layout.contains(slot) {
            continue;
        }
        let capacity = slot
            .neighbors()
            .into_iter()
            .filter(|&n| !layout.contains(n))
            .count();
        if capacity >= children {
            return Some(slot);
        }
    }
    None
}

/// Step 6: one standalone secret room, hung off a uniformly drawn host via
/// a uniformly drawn free side.
fn place_secret(
    id: &str,
    rng: &mut DeterministicRng,
    catalog: &TemplateCatalog,
    layout: &mut Layout,
    special: &mut SpecialRooms,
) {
    let template = catalog
        .get(id)
        .or_else(|| catalog.first_of_role(RoomRole::Secret));
    let Some(template) = template else {
        log::warn!("secret room {id:?} has no usable template; skipping");
        return;
    };

    let hosts: Vec<Coord> = layout
        .occupied
        .iter()
        .copied()
        .filter(|&c| !special.is_reserved(c))
        .filter(|&c| !layout.free_sides(c).is_empty())
        .collect();
    let Some(&host) = rng.choose(&hosts) else {
        log::info!("no host cell with a free neighbor for secret room {id:?}; skipping");
        return;
    };
    debug_assert!(Some(host) != special.shop, "secret host collides with shop");

    let sides = layout.free_sides(host);
    let Some(&side) = rng.choose(&sides) else {
        return;
    };
    let cell = host.step(side);
    layout.occupy(cell);
    special.secrets.push(SecretPlacement {
        cell,
        host,
        template: template.id.clone(),
    });
}

/// Step 7: bind one template to every occupied cell. Specials take their
/// designated template; generic cells draw from the normal pool, falling
/// back to the start template if the pool is empty.
fn bind_templates(
    rng: &mut DeterministicRng,
    catalog: &TemplateCatalog,
    layout: &Layout,
    path: &[Coord],
    special: &SpecialRooms,
    start_template: &RoomTemplate,
) -> LevelMap {
    let normal_pool = catalog.normal_pool();
    let mut map = LevelMap::new();
    for &coord in &layout.occupied {
        let role = if coord == path[0] {
            RoomRole::Start
        } else {
            special.role_of(coord).unwrap_or(RoomRole::Normal)
        };
        let template = match role {
            RoomRole::Start => start_template,
            RoomRole::Normal => match rng.choose(&normal_pool) {
                Some(&t) => t,
                None => {
                    log::warn!("normal template pool is empty; using the start template at {coord}");
                    start_template
                }
            },
            RoomRole::Secret => special
                .secrets
                .iter()
                .find(|s| s.cell == coord)
                .and_then(|s| catalog.get(&s.template))
                .unwrap_or_else(|| {
                    log::warn!("secret template for {coord} vanished; using the start template");
                    start_template
                }),
            reserved => catalog.first_of_role(reserved).unwrap_or_else(|| {
                log::warn!("no {reserved} template loaded; using the start template at {coord}");
                start_template
            }),
        };
        let mut room = RoomInstance::from_template(template);
        room.role = role;
        room.is_boss = coord == special.boss;
        room.is_secret = role.is_secret_variant();
        map.insert(coord, RoomEntry::new(room));
    }
    map
}
