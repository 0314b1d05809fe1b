use std::{io::Write, path::Path, time::Duration};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use star_taxi_core::{Appearance, FrameInput, Heading, Key, LevelOutcome, Tuning, Vec2};
use star_taxi_world::{query, Entity, Level, LevelLayout, CRASHED_MESSAGE, OUT_OF_FUEL_MESSAGE};
use tempfile::NamedTempFile;

const FRAME: Duration = Duration::from_millis(16);

fn level_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temporary level file");
    file.write_all(contents.as_bytes())
        .expect("level contents written");
    file
}

fn idle() -> FrameInput {
    FrameInput::default()
}

#[test]
fn custom_level_file_places_every_entity() {
    let file = level_file(
        "TAXI cab 400, 300\n\
         PLANET home 100, 100\n\
         PLANET away 700, 500\n\
         GAS_CLOUD fuel 250, 250\n\
         WARP_STAR star 600, 100\n",
    );
    let mut rng = ChaCha8Rng::seed_from_u64(3);

    let level = Level::load(&mut rng, &Tuning::default(), Some(file.path()));

    assert_eq!(query::taxi(&level).body().position(), Vec2::new(400.0, 300.0));
    let planets: Vec<_> = query::planets(&level)
        .iter()
        .map(|planet| (planet.body().position(), planet.is_destination()))
        .collect();
    assert_eq!(
        planets,
        vec![
            (Vec2::new(100.0, 100.0), true),
            (Vec2::new(700.0, 500.0), false),
        ]
    );
    assert_eq!(query::gas_clouds(&level).len(), 1);
    assert_eq!(
        query::gas_clouds(&level)[0].body().position(),
        Vec2::new(250.0, 250.0)
    );
    assert_eq!(query::warp_stars(&level).len(), 1);
    assert_eq!(query::destination_index(&level), 0);
    assert_eq!(level.hud_message(), "Fuel: 300000.0\nFares: 0/2");
}

#[test]
fn unreadable_or_malformed_files_fall_back_to_random_levels() {
    let tuning = Tuning::default();
    let malformed = level_file("TAXI cab 400, 300\nPLANET p nowhere, 100\n");

    for path in [Path::new("no/such/level.txt"), malformed.path()] {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let level = Level::load(&mut rng, &tuning, Some(path));

        assert_eq!(query::planets(&level).len(), 6);
        assert_eq!(query::gas_clouds(&level).len(), 6);
        assert_eq!(query::warp_stars(&level).len(), 6);
        assert_eq!(query::taxi(&level).body().position(), Vec2::new(400.0, 300.0));
    }
}

#[test]
fn random_level_spreads_planets_apart() {
    let tuning = Tuning::default();
    let mut rng = ChaCha8Rng::seed_from_u64(0xfeed);

    let level = Level::load(&mut rng, &tuning, None);
    let bounds = query::bounds(&level);
    let planets = query::planets(&level);

    assert_eq!(planets.len(), 6);
    assert!(planets[0].is_destination());
    assert!(planets[1..].iter().all(|planet| !planet.is_destination()));
    for (index, planet) in planets.iter().enumerate() {
        assert!(bounds.contains(planet.body().position()));
        for other in &planets[index + 1..] {
            assert!(!planet.body().overlaps(other.body()));
        }
    }
    for star in query::warp_stars(&level) {
        assert!(bounds.contains(star.body().position()));
    }
    for cloud in query::gas_clouds(&level) {
        assert!(bounds.contains(cloud.body().position()));
    }
}

#[test]
fn identical_seeds_replay_identically() {
    let replay = |seed: u64| {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut level = Level::generate(&mut rng, &Tuning::default());
        let inputs = [
            idle().holding(Key::Right),
            idle().holding(Key::Up).holding(Key::Left),
            idle().holding(Key::S),
            idle(),
        ];
        let mut outcomes = Vec::new();
        for input in inputs.iter().cycle().take(120) {
            outcomes.push(level.update(FRAME, input));
        }
        (query::sprites(&level), level.hud_message(), outcomes)
    };

    assert_eq!(replay(42), replay(42));
}

#[test]
fn touching_a_gas_cloud_refuels_and_removes_it_in_the_same_frame() {
    let tuning = Tuning::default();
    let mut level = Level::from_layout(
        &LevelLayout {
            taxi: Vec2::new(400.0, 300.0),
            planets: vec![Vec2::new(100.0, 100.0)],
            gas_clouds: vec![Vec2::new(400.0, 300.0)],
            warp_stars: Vec::new(),
        },
        &tuning,
    );

    assert_eq!(level.update(FRAME, &idle()), LevelOutcome::Continue);

    assert!(query::gas_clouds(&level).is_empty());
    assert_eq!(query::taxi(&level).fuel(), 300_020.0);
    assert_eq!(level.update(FRAME, &idle()), LevelOutcome::Continue);
    assert_eq!(query::taxi(&level).fuel(), 300_020.0);
}

#[test]
fn fares_are_delivered_in_order_until_the_level_advances() {
    let tuning = Tuning::default();
    let mut level = Level::from_layout(
        &LevelLayout {
            taxi: Vec2::new(100.0, 300.0),
            planets: vec![
                Vec2::new(100.0, 300.0),
                Vec2::new(200.0, 300.0),
                Vec2::new(300.0, 300.0),
            ],
            ..LevelLayout::default()
        },
        &tuning,
    );
    let east = idle().holding(Key::Right);

    assert_eq!(level.update(Duration::from_millis(1), &idle()), LevelOutcome::Continue);
    assert_eq!(query::destination_index(&level), 1);
    assert!(query::planets(&level)[1].is_destination());
    assert!(level.hud_message().ends_with("Fares: 1/3"));

    assert_eq!(level.update(Duration::from_millis(500), &east), LevelOutcome::Continue);
    assert_eq!(query::destination_index(&level), 2);
    assert!(query::planets(&level)[2].is_destination());

    assert_eq!(level.update(Duration::from_millis(1000), &east), LevelOutcome::Advance);
    assert_eq!(query::destination_index(&level), 3);
    assert!(level.is_complete());
}

#[test]
fn running_dry_waits_for_the_confirm_key() {
    let tuning = Tuning {
        taxi: star_taxi_core::TaxiTuning {
            starting_fuel: -5e-7,
            ..Default::default()
        },
        ..Tuning::default()
    };
    let mut level = Level::from_layout(
        &LevelLayout {
            taxi: Vec2::new(400.0, 300.0),
            planets: vec![Vec2::new(100.0, 100.0)],
            ..LevelLayout::default()
        },
        &tuning,
    );

    assert_eq!(level.hud_message(), OUT_OF_FUEL_MESSAGE);
    assert_eq!(
        level.update(FRAME, &idle().holding(Key::Right)),
        LevelOutcome::Continue
    );
    assert_eq!(query::taxi(&level).body().position(), Vec2::new(400.0, 300.0));
    assert_eq!(
        level.update(FRAME, &idle().pressing(Key::Space)),
        LevelOutcome::Quit
    );
}

#[test]
fn warping_into_a_planet_wrecks_the_taxi() {
    let tuning = Tuning::default();
    let mut level = Level::from_layout(
        &LevelLayout {
            taxi: Vec2::new(400.0, 300.0),
            planets: vec![Vec2::new(100.0, 100.0), Vec2::new(460.0, 380.0)],
            gas_clouds: Vec::new(),
            warp_stars: vec![Vec2::new(300.0, 400.0)],
        },
        &tuning,
    );
    let click = idle()
        .pressing(Key::Pointer)
        .pointing_at(Vec2::new(300.0, 400.0));

    assert_eq!(level.update(FRAME, &click), LevelOutcome::Continue);
    assert!(query::taxi(&level).is_travelling_at_warp());

    assert_eq!(
        level.update(Duration::from_millis(500), &idle()),
        LevelOutcome::Continue
    );
    let taxi = query::taxi(&level);
    assert!(taxi.has_crashed());
    assert_eq!(taxi.appearance(), Appearance::Explosion);
    assert_eq!(level.hud_message(), CRASHED_MESSAGE);
    assert_eq!(query::destination_index(&level), 0);

    let wreck = taxi.body().position();
    assert_eq!(
        level.update(FRAME, &idle().holding(Key::Left)),
        LevelOutcome::Continue
    );
    assert_eq!(query::taxi(&level).body().position(), wreck);
    assert_eq!(
        level.update(FRAME, &idle().pressing(Key::Space)),
        LevelOutcome::Quit
    );
}

#[test]
fn overlapping_warp_stars_all_respond_and_the_last_sets_the_heading() {
    let tuning = Tuning::default();
    let mut level = Level::from_layout(
        &LevelLayout {
            taxi: Vec2::new(400.0, 300.0),
            planets: vec![Vec2::new(100.0, 100.0)],
            gas_clouds: Vec::new(),
            warp_stars: vec![Vec2::new(300.0, 400.0), Vec2::new(310.0, 400.0)],
        },
        &tuning,
    );
    let click = idle()
        .pressing(Key::Pointer)
        .pointing_at(Vec2::new(305.0, 400.0));

    assert_eq!(level.update(FRAME, &click), LevelOutcome::Continue);

    let taxi = query::taxi(&level);
    assert!(taxi.is_travelling_at_warp());
    assert_eq!(
        taxi.body().heading(),
        Heading::from_vector(Vec2::new(310.0, 400.0))
    );
}

#[test]
fn taxi_wraps_across_screen_edges() {
    let tuning = Tuning::default();
    let mut level = Level::from_layout(
        &LevelLayout {
            taxi: Vec2::new(5.0, 300.0),
            planets: vec![Vec2::new(400.0, 100.0)],
            ..LevelLayout::default()
        },
        &tuning,
    );

    assert_eq!(
        level.update(Duration::from_millis(100), &idle().holding(Key::A)),
        LevelOutcome::Continue
    );

    let position = query::taxi(&level).body().position();
    assert!((position.x - 795.0).abs() < 1e-3);
    assert_eq!(position.y, 300.0);
}

#[test]
fn sprites_draw_the_taxi_last() {
    let level = Level::from_layout(
        &LevelLayout {
            taxi: Vec2::new(400.0, 300.0),
            planets: vec![Vec2::new(100.0, 100.0), Vec2::new(700.0, 100.0)],
            gas_clouds: vec![Vec2::new(200.0, 500.0)],
            warp_stars: vec![Vec2::new(600.0, 500.0)],
        },
        &Tuning::default(),
    );

    let appearances: Vec<_> = query::sprites(&level)
        .iter()
        .map(|sprite| sprite.appearance)
        .collect();
    assert_eq!(
        appearances,
        vec![
            Appearance::Destination,
            Appearance::Planet,
            Appearance::GasCloud,
            Appearance::WarpStar,
            Appearance::Taxi,
        ]
    );
}
