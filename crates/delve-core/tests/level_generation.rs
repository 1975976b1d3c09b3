use delve_core::config::GenerationConfig;
use delve_core::dungeon::{
    generate, Coord, DoorLock, GeneratedLevel, RoomRole, RoomTemplate, Side, TemplateCatalog,
};
use delve_core::DeterministicRng;
use proptest::prelude::*;

fn full_catalog() -> TemplateCatalog {
    let mut catalog = TemplateCatalog::new();
    catalog.insert(RoomTemplate::new("start", RoomRole::Start));
    catalog.insert(RoomTemplate::new("boss-arena", RoomRole::Boss));
    catalog.insert(
        RoomTemplate::new("cavern", RoomRole::Normal)
            .with_enemy("grunt", 120.0, 80.0)
            .with_enemy("ranged", 320.0, 200.0),
    );
    catalog.insert(RoomTemplate::new("hallway", RoomRole::Normal).with_size(24, 16));
    catalog.insert(RoomTemplate::new("shop", RoomRole::Shop));
    catalog.insert(RoomTemplate::new("forge", RoomRole::Upgrade));
    catalog.insert(RoomTemplate::new("trophy-hall", RoomRole::Trophy));
    catalog.insert(RoomTemplate::new("home", RoomRole::Home));
    catalog.insert(RoomTemplate::new("matrix", RoomRole::Matrix));
    catalog.insert(RoomTemplate::new("vault", RoomRole::Secret));
    catalog
}

fn everything_on() -> GenerationConfig {
    GenerationConfig {
        secret_rooms: vec!["vault".into(), "vault".into()],
        ..GenerationConfig::full()
    }
}

fn build(seed: &str, rooms: usize, config: &GenerationConfig) -> GeneratedLevel {
    let mut rng = DeterministicRng::with_seed(seed);
    generate(rooms, &mut rng, &full_catalog(), config).expect("generation failed")
}

fn active_sides(level: &GeneratedLevel, coord: Coord) -> usize {
    let room = &level.map.get(coord).unwrap().room;
    let mut count = 0;
    for side in Side::ALL {
        if let Some(door) = room.door(side)
            && door.is_active()
        {
            count += 1;
        }
    }
    count
}

#[test]
fn test_identical_seeds_build_identical_floors() {
    let config = everything_on();
    let a = build("emberfall", 9, &config);
    let b = build("emberfall", 9, &config);
    assert_eq!(a, b);
    // and byte-identical once serialized
    let ja = serde_json::to_string(&a).unwrap();
    let jb = serde_json::to_string(&b).unwrap();
    assert_eq!(ja, jb);
}

#[test]
fn test_different_seeds_diverge() {
    let config = everything_on();
    let a = build("emberfall", 9, &config);
    let b = build("emberfeld", 9, &config);
    assert_ne!(a, b);
}

#[test]
fn test_barebones_floor_has_no_specials() {
    // seed "42", five rooms, every optional feature off
    let level = build("42", 5, &GenerationConfig::default());
    assert!(level.special.shop.is_none());
    assert!(level.special.upgrade.is_none());
    assert!(level.special.trophy.is_none());
    assert!(level.special.home.is_none());
    assert!(level.special.matrix.is_none());
    assert!(level.special.secrets.is_empty());
    let mut bosses = Vec::new();
    for coord in level.map.sorted_coords() {
        let role = level.map.get(coord).unwrap().room.role;
        assert!(
            matches!(role, RoomRole::Start | RoomRole::Normal | RoomRole::Boss),
            "unexpected role {role} at {coord}"
        );
        if role == RoomRole::Boss {
            bosses.push(coord);
        }
        // every cell stays reachable through at least one live door
        assert!(active_sides(&level, coord) >= 1, "{coord} is sealed off");
    }
    assert_eq!(bosses, vec![level.golden.boss_cell()]);
}

#[test]
fn test_golden_path_runs_origin_to_boss_in_unit_steps() {
    for seed in ["a", "b", "c", "d", "e"] {
        let level = build(seed, 7, &everything_on());
        let cells = level.golden.cells();
        assert_eq!(cells[0], Coord::ORIGIN);
        assert_eq!(level.golden.boss_cell(), level.special.boss);
        for pair in cells.windows(2) {
            assert_eq!(pair[0].manhattan(pair[1]), 1, "seed {seed}");
        }
        let mut seen = cells.to_vec();
        seen.sort_by_key(|c| (c.y, c.x));
        seen.dedup();
        assert_eq!(seen.len(), cells.len(), "path revisits a cell, seed {seed}");
    }
}

#[test]
fn test_every_floor_is_internally_consistent() {
    for seed in ["q", "r", "s", "t", "u", "v", "w"] {
        let level = build(seed, 10, &everything_on());
        let faults = level.map.validate();
        assert!(faults.is_empty(), "seed {seed}: {faults:?}");
    }
}

#[test]
fn test_no_cell_is_sealed_off() {
    // hidden doors count: a secret room's only way out is active but unseen
    for seed in ["n1", "n2", "n3", "n4", "n5", "n6", "n7", "n8"] {
        let level = build(seed, 10, &everything_on());
        for coord in level.map.sorted_coords() {
            assert!(
                active_sides(&level, coord) >= 1,
                "{coord} is sealed off, seed {seed}"
            );
        }
    }
}

#[test]
fn test_boss_and_upgrade_doors_are_never_hidden() {
    for seed in ["h1", "h2", "h3", "h4", "h5"] {
        let level = build(seed, 9, &everything_on());
        let mut watched = vec![level.special.boss];
        watched.extend(level.special.upgrade);
        for coord in watched {
            let room = &level.map.get(coord).unwrap().room;
            for side in Side::ALL {
                if let Some(door) = room.door(side) {
                    assert!(
                        !door.is_hidden(),
                        "hidden door on {} room at {coord}, seed {seed}",
                        room.role
                    );
                }
            }
        }
    }
}

#[test]
fn test_unique_locks_only_join_trophy_to_its_children() {
    for seed in ["k1", "k2", "k3", "k4", "k5", "k6"] {
        let level = build(seed, 10, &everything_on());
        for coord in level.map.sorted_coords() {
            let room = &level.map.get(coord).unwrap().room;
            for side in Side::ALL {
                let Some(door) = room.door(side) else { continue };
                if !door.is_active() || !door.lock.is_unique() {
                    continue;
                }
                let pair = (Some(coord), Some(coord.step(side)));
                let expected = match door.lock {
                    DoorLock::HouseKey => (level.special.trophy, level.special.home),
                    _ => (level.special.trophy, level.special.matrix),
                };
                let swapped = (expected.1, expected.0);
                assert!(
                    pair == expected || pair == swapped,
                    "stray {:?} lock at {coord} {side}, seed {seed}",
                    door.lock
                );
                assert!(!door.is_hidden());
            }
        }
    }
}

#[test]
fn test_secret_cells_touch_only_their_host() {
    for seed in ["x1", "x2", "x3", "x4", "x5"] {
        let level = build(seed, 9, &everything_on());
        for placement in &level.special.secrets {
            let room = &level.map.get(placement.cell).unwrap().room;
            assert!(room.is_secret);
            let mut active = Vec::new();
            for side in Side::ALL {
                if let Some(door) = room.door(side)
                    && door.is_active()
                {
                    active.push(side);
                }
            }
            assert_eq!(active.len(), 1, "seed {seed}");
            assert_eq!(placement.cell.step(active[0]), placement.host);
            // the way out starts hidden but can never cost a key
            let way_out = room.door(active[0]).unwrap();
            assert!(way_out.is_hidden());
            assert!(way_out.is_forced_open());

            let host_room = &level.map.get(placement.host).unwrap().room;
            let back = placement.host.side_toward(placement.cell).unwrap();
            let host_door = host_room.door(back).unwrap();
            assert!(host_door.is_active());
            assert!(host_door.is_hidden());
            assert_eq!(host_door.lock, DoorLock::None);
        }
    }
}

#[test]
fn test_trophy_room_connects_exactly_its_cluster() {
    for seed in ["y1", "y2", "y3", "y4", "y5", "y6", "y7"] {
        let level = build(seed, 10, &everything_on());
        let Some(trophy) = level.special.trophy else {
            continue;
        };
        let room = &level.map.get(trophy).unwrap().room;
        let mut linked = Vec::new();
        for side in Side::ALL {
            if let Some(door) = room.door(side)
                && door.is_active()
            {
                linked.push(trophy.step(side));
            }
        }
        let mut expected = vec![level.special.trophy_host.unwrap()];
        expected.extend(level.special.home);
        expected.extend(level.special.matrix);
        linked.sort_by_key(|c| (c.y, c.x));
        expected.sort_by_key(|c| (c.y, c.x));
        assert_eq!(linked, expected, "seed {seed}");
        return;
    }
    panic!("trophy never placed across seven seeds");
}

#[test]
fn test_render_sketches_the_floor() {
    let level = build("sketch", 6, &everything_on());
    let picture = level.map.render();
    assert!(picture.contains('S'));
    assert!(picture.contains('B'));
    assert!(!picture.is_empty());
}

#[test]
fn test_generated_level_serde_round_trip() {
    let level = build("persist", 8, &everything_on());
    let text = serde_json::to_string(&level).unwrap();
    let back: GeneratedLevel = serde_json::from_str(&text).unwrap();
    assert_eq!(back, level);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_any_seed_yields_a_valid_deterministic_floor(
        seed in "[a-z0-9]{1,12}",
        rooms in 1usize..12,
    ) {
        let config = everything_on();
        let a = build(&seed, rooms, &config);
        let b = build(&seed, rooms, &config);
        prop_assert_eq!(&a, &b);
        prop_assert!(a.map.validate().is_empty());
        prop_assert_eq!(a.golden.cells()[0], Coord::ORIGIN);
        prop_assert!(a.golden.len() <= rooms + 1);
        prop_assert!(a.map.len() >= a.golden.len());
        for coord in a.map.sorted_coords() {
            prop_assert!(active_sides(&a, coord) >= 1, "{} is sealed off", coord);
        }
    }
}
