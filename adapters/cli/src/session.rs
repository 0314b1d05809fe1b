//! Level sequencing for a single play session.

use std::{collections::VecDeque, ops::ControlFlow, path::PathBuf, time::Duration};

use rand_chacha::ChaCha8Rng;
use star_taxi_core::{FrameInput, LevelOutcome, Tuning};
use star_taxi_rendering::{Palette, Scene};
use star_taxi_world::{query, Level};
use tracing::info;

pub(crate) const LEVEL_COMPLETE_BANNER: &str = "Level complete!";
pub(crate) const GAME_OVER_BANNER: &str = "Game over.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AfterTransition {
    NextLevel,
    Exit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Playing,
    Transition {
        remaining: Duration,
        then: AfterTransition,
    },
}

/// Plays queued level files in order, then random levels, until the player quits.
///
/// Every level draws its random content from the same generator, so a session
/// replays exactly from its seed.
#[derive(Debug)]
pub(crate) struct Session {
    rng: ChaCha8Rng,
    tuning: Tuning,
    level_files: VecDeque<PathBuf>,
    transition: Duration,
    level: Level,
    levels_started: usize,
    phase: Phase,
}

impl Session {
    pub(crate) fn new(
        mut rng: ChaCha8Rng,
        tuning: Tuning,
        level_files: Vec<PathBuf>,
        transition: Duration,
    ) -> Self {
        let mut level_files = VecDeque::from(level_files);
        let level = next_level(&mut rng, &tuning, &mut level_files, 1);

        Self {
            rng,
            tuning,
            level_files,
            transition,
            level,
            levels_started: 1,
            phase: Phase::Playing,
        }
    }

    /// Runs one frame. Breaks once the game-over pause has elapsed.
    pub(crate) fn advance(&mut self, elapsed: Duration, input: &FrameInput) -> ControlFlow<()> {
        match self.phase {
            Phase::Playing => {
                match self.level.update(elapsed, input) {
                    LevelOutcome::Continue => {}
                    LevelOutcome::Advance => {
                        info!(level = self.levels_started, "level complete");
                        self.begin_transition(AfterTransition::NextLevel);
                    }
                    LevelOutcome::Quit => {
                        info!(levels = self.levels_started, "game over");
                        self.begin_transition(AfterTransition::Exit);
                    }
                }
                ControlFlow::Continue(())
            }
            Phase::Transition { remaining, then } => {
                if let Some(left) = remaining.checked_sub(elapsed).filter(|left| !left.is_zero()) {
                    self.phase = Phase::Transition {
                        remaining: left,
                        then,
                    };
                    return ControlFlow::Continue(());
                }

                match then {
                    AfterTransition::NextLevel => {
                        self.levels_started += 1;
                        self.level = next_level(
                            &mut self.rng,
                            &self.tuning,
                            &mut self.level_files,
                            self.levels_started,
                        );
                        self.phase = Phase::Playing;
                        ControlFlow::Continue(())
                    }
                    AfterTransition::Exit => ControlFlow::Break(()),
                }
            }
        }
    }

    fn begin_transition(&mut self, then: AfterTransition) {
        self.phase = Phase::Transition {
            remaining: self.transition,
            then,
        };
    }

    /// Banner to overlay on the scene, if a transition is running.
    pub(crate) fn banner(&self) -> Option<&'static str> {
        match self.phase {
            Phase::Playing => None,
            Phase::Transition {
                then: AfterTransition::NextLevel,
                ..
            } => Some(LEVEL_COMPLETE_BANNER),
            Phase::Transition {
                then: AfterTransition::Exit,
                ..
            } => Some(GAME_OVER_BANNER),
        }
    }

    /// Number of levels started so far, including the current one.
    pub(crate) fn levels_started(&self) -> usize {
        self.levels_started
    }

    /// Copies the current level state into `scene`.
    pub(crate) fn populate(&self, scene: &mut Scene, palette: &Palette) {
        scene.set_sprites(&query::sprites(&self.level), palette);
        scene.hud = self.level.hud_message();
        scene.banner = self.banner().map(str::to_owned);
    }
}

fn next_level(
    rng: &mut ChaCha8Rng,
    tuning: &Tuning,
    level_files: &mut VecDeque<PathBuf>,
    number: usize,
) -> Level {
    match level_files.pop_front() {
        Some(path) => {
            info!(level = number, path = %path.display(), "starting level from file");
            Level::load(rng, tuning, Some(&path))
        }
        None => {
            info!(level = number, "starting random level");
            Level::load(rng, tuning, None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use star_taxi_core::{Key, ScreenBounds, TaxiTuning, Vec2};
    use star_taxi_world::Entity;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const FRAME: Duration = Duration::from_millis(16);
    const PAUSE: Duration = Duration::from_millis(100);

    fn level_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temporary level file");
        file.write_all(contents.as_bytes())
            .expect("level contents written");
        file
    }

    /// Level that completes on its first frame: the taxi starts on the only planet.
    fn instant_win() -> NamedTempFile {
        level_file("TAXI cab 50, 50\nPLANET home 50, 50\n")
    }

    fn session(files: &[&NamedTempFile], tuning: Tuning) -> Session {
        Session::new(
            ChaCha8Rng::seed_from_u64(9),
            tuning,
            files.iter().map(|file| file.path().to_path_buf()).collect(),
            PAUSE,
        )
    }

    #[test]
    fn level_files_play_in_order_before_random_levels() {
        let first = instant_win();
        let second = level_file("TAXI cab 300, 200\nPLANET away 300, 200\nPLANET far 700, 500\n");
        let mut session = session(&[&first, &second], Tuning::default());

        assert_eq!(
            query::taxi(&session.level).body().position(),
            Vec2::new(50.0, 50.0)
        );
        assert_eq!(session.advance(FRAME, &FrameInput::default()), ControlFlow::Continue(()));
        assert_eq!(session.banner(), Some(LEVEL_COMPLETE_BANNER));

        assert_eq!(session.advance(PAUSE, &FrameInput::default()), ControlFlow::Continue(()));
        assert_eq!(session.levels_started(), 2);
        assert!(session.banner().is_none());
        assert_eq!(
            query::taxi(&session.level).body().position(),
            Vec2::new(300.0, 200.0)
        );
        assert_eq!(query::planets(&session.level).len(), 2);

        assert_eq!(session.advance(FRAME, &FrameInput::default()), ControlFlow::Continue(()));
        assert_eq!(query::destination_index(&session.level), 1);
    }

    #[test]
    fn random_levels_follow_once_files_run_out() {
        let only = instant_win();
        let mut session = session(&[&only], Tuning::default());

        let _ = session.advance(FRAME, &FrameInput::default());
        let _ = session.advance(PAUSE, &FrameInput::default());

        assert_eq!(session.levels_started(), 2);
        let level = &session.level;
        assert_eq!(query::planets(level).len(), 6);
        assert_eq!(
            query::taxi(level).body().position(),
            ScreenBounds::default().center()
        );
    }

    #[test]
    fn transition_freezes_the_level_until_the_pause_elapses() {
        let only = instant_win();
        let mut session = session(&[&only], Tuning::default());
        let _ = session.advance(FRAME, &FrameInput::default());

        let thrust = FrameInput::default().holding(Key::Right);
        assert_eq!(
            session.advance(Duration::from_millis(60), &thrust),
            ControlFlow::Continue(())
        );
        assert_eq!(session.levels_started(), 1);
        assert_eq!(
            query::taxi(&session.level).body().position(),
            Vec2::new(50.0, 50.0)
        );
        assert_eq!(session.banner(), Some(LEVEL_COMPLETE_BANNER));

        assert_eq!(
            session.advance(Duration::from_millis(40), &thrust),
            ControlFlow::Continue(())
        );
        assert_eq!(session.levels_started(), 2);
    }

    #[test]
    fn quitting_shows_game_over_then_ends_the_session() {
        let tuning = Tuning {
            taxi: TaxiTuning {
                starting_fuel: 0.0,
                ..TaxiTuning::default()
            },
            ..Tuning::default()
        };
        let mut session = session(&[], tuning);
        let confirm = FrameInput::default().pressing(Key::Space);

        assert_eq!(session.advance(FRAME, &confirm), ControlFlow::Continue(()));
        assert_eq!(session.banner(), Some(GAME_OVER_BANNER));
        assert_eq!(session.advance(FRAME, &confirm), ControlFlow::Continue(()));
        assert_eq!(session.advance(PAUSE, &confirm), ControlFlow::Break(()));
        assert_eq!(session.levels_started(), 1);
    }

    #[test]
    fn populate_mirrors_level_state_into_the_scene() {
        let only = instant_win();
        let mut session = session(&[&only], Tuning::default());
        let palette = Palette::default();
        let mut scene = Scene::new(ScreenBounds::default()).expect("valid bounds");

        session.populate(&mut scene, &palette);
        assert_eq!(scene.sprites.len(), 2);
        assert_eq!(scene.hud, "Fuel: 300000.0\nFares: 0/1");
        assert!(scene.banner.is_none());

        let _ = session.advance(FRAME, &FrameInput::default());
        session.populate(&mut scene, &palette);
        assert_eq!(scene.hud, "Fuel: 300000.0\nFares: 1/1");
        assert_eq!(scene.banner.as_deref(), Some(LEVEL_COMPLETE_BANNER));
    }

    #[test]
    fn same_seed_produces_the_same_random_levels() {
        let first = session(&[], Tuning::default());
        let second = session(&[], Tuning::default());

        assert_eq!(
            query::sprites(&first.level),
            query::sprites(&second.level)
        );
    }
}
