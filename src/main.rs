//! Demo race: one AI car replanning its route every frame

use std::env;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use trackplan::prelude::*;

const TRACK: &str = "
~~~~~~~~~~~~~~~~~~~~~~~~
~S.................#...~
~.~~~~~~~~~~~~~~~~~~~~.~
~.~~~~~~~~~~~~~~~~~~~~.~
~.~~~~~~~.......~~~~~~.~
~.~~~~~~~.~~~~~.~~~~~~.~
~.........~~~~~.......G~
~~~~~~~~~~~~~~~~~~~~~~~~
";

const MAX_FRAMES: u32 = 400;

/// Demo state: the track, the car and its driver
struct DemoRace {
    track: TrackMap,
    goal: Vec2,
    pose: CarPose,
    driver: PlannerDriver,
    stats: PlannerStats,
    rng: StdRng,
}

impl DemoRace {
    fn new(config: &PlannerConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let parsed = TrackMap::from_ascii(TRACK)?;
        let start = parsed.start.ok_or("track has no start cell")?;
        let goal = parsed.goal.ok_or("track has no goal cell")?;

        log::info!(
            "Track {}x{} with {} drivable cells",
            parsed.map.width,
            parsed.map.height,
            parsed.map.drivable_count()
        );

        Ok(Self {
            track: parsed.map,
            goal: goal.as_vec2(),
            pose: CarPose::new(start.as_vec2(), 0.0),
            driver: PlannerDriver::from_config(config),
            stats: PlannerStats::new(),
            rng: StdRng::seed_from_u64(7),
        })
    }

    fn finished(&self) -> bool {
        self.pose.position == self.goal
    }

    /// Plan, decide, and move the car one cell
    fn update(&mut self, frame: u32) {
        let roll = self.rng.gen_range(0..u32::MAX);
        let track = &self.track;
        let decision = self
            .driver
            .drive(0, &self.pose, self.goal, |c| track.is_drivable(c), roll);

        self.stats.record(
            &decision.path.stats,
            decision.path.termination,
            decision.target.is_some(),
        );

        log::debug!(
            "frame {frame}: at {} -> {:?} ({} waypoints)",
            self.pose.position,
            decision.action,
            decision.path.len()
        );

        // No physics here: gas moves one cell along the plan, and a plan that
        // already reaches the goal lets the car coast in.
        let moving = decision.action.gas || decision.path.reached_goal();
        if let Some(&next) = decision.path.waypoints.first().filter(|_| moving) {
            let heading = next - self.pose.position;
            self.pose = CarPose::new(next, heading.y.atan2(heading.x));
        }

        if frame % 20 == 0 {
            log::info!("{}", self.stats.format_stats());
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = match env::args().nth(1) {
        Some(path) => {
            log::info!("Loading planner config from {path}");
            PlannerConfig::load_ron(path)?
        }
        None => PlannerConfig::default(),
    };

    let mut race = DemoRace::new(&config)?;
    let start = race.pose.position.as_ivec2();
    if race.track.has_line_of_sight(start, race.goal.as_ivec2()) {
        log::info!("Goal is in a straight line from the start");
    }

    for frame in 0..MAX_FRAMES {
        if race.finished() {
            log::info!("AI reached the goal after {frame} frames");
            break;
        }
        race.update(frame);
    }

    if !race.finished() {
        log::warn!("AI did not reach the goal in {MAX_FRAMES} frames");
    }
    log::info!("{}", race.stats.format_stats());
    Ok(())
}
