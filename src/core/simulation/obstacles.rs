//=========================================================================
// Obstacle Spawner & Lifecycle Manager
//=========================================================================
//
// Spawns scrolling obstacles and decorations on a randomized timer,
// moves them with the world, and retires them once off-screen.
//
// Per-frame update:
//   1. timer.tick(dt)
//   2. timer due?  → spawn one entity at the right edge, redraw timer
//   3. sweep       → every live entity moves by frame_delta * parallax
//   4. retire      → entities past their own width are destroyed
//
// Retirement compacts the live list once after the sweep (Vec::retain),
// so removing one entity never skips or repeats its neighbour.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;
use std::fmt;

use log::{debug, warn};
use rand::Rng;

//=== Internal Dependencies ===============================================

use super::config::SimConfig;

//=== ObstacleKind ========================================================

/// Visual kind of a scrolling entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObstacleKind {
    /// Ground cactus.
    GroundObstacle,

    /// Cosmetic tall cactus; behaves exactly like `GroundObstacle`.
    GroundObstacleTall,

    /// Background cloud, scrolled with parallax at a random height.
    Cloud,
}

impl ObstacleKind {
    pub fn is_cloud(self) -> bool {
        matches!(self, Self::Cloud)
    }

    /// Draws a kind: half ground (half of those tall), half cloud.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.gen_bool(0.5) {
            if rng.gen_bool(0.5) {
                Self::GroundObstacleTall
            } else {
                Self::GroundObstacle
            }
        } else {
            Self::Cloud
        }
    }
}

//=== EntityHandle & EntityHost ===========================================

/// Opaque handle to a renderable entity owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityHandle(u64);

impl EntityHandle {
    pub fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Creates and destroys the renderable counterpart of an obstacle.
///
/// Creation cannot fail from the simulation's point of view; a host that
/// cannot create an entity has a fatal problem of its own.
pub trait EntityHost: Send {
    fn create_entity(&mut self, kind: ObstacleKind) -> EntityHandle;
    fn destroy_entity(&mut self, handle: EntityHandle);
}

//=== EntityRegistry ======================================================

/// Default host: hands out increasing handles and tracks live ones.
#[derive(Debug, Default)]
pub struct EntityRegistry {
    next_id: u64,
    live: HashSet<EntityHandle>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_live(&self, handle: EntityHandle) -> bool {
        self.live.contains(&handle)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

impl EntityHost for EntityRegistry {
    fn create_entity(&mut self, _kind: ObstacleKind) -> EntityHandle {
        let handle = EntityHandle(self.next_id);
        self.next_id += 1;
        self.live.insert(handle);
        handle
    }

    fn destroy_entity(&mut self, handle: EntityHandle) {
        if !self.live.remove(&handle) {
            warn!(target: "sim::obstacles", "Destroy requested for unknown entity {}", handle);
        }
    }
}

//=== Obstacle ============================================================

/// One live scrolling entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    handle: EntityHandle,
    kind: ObstacleKind,
    horizontal_position: f64,
    vertical_position: f64,
    width: f64,
    parallax: f64,
}

impl Obstacle {
    pub fn handle(&self) -> EntityHandle {
        self.handle
    }

    pub fn kind(&self) -> ObstacleKind {
        self.kind
    }

    pub fn horizontal_position(&self) -> f64 {
        self.horizontal_position
    }

    /// Height above the baseline; zero for ground obstacles.
    pub fn vertical_position(&self) -> f64 {
        self.vertical_position
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    /// Fully past the left edge.
    fn is_offscreen(&self) -> bool {
        self.horizontal_position <= -self.width
    }
}

//=== SpawnTimer ==========================================================

/// Countdown to the next spawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnTimer {
    remaining: f64,
}

impl SpawnTimer {
    pub fn new(initial: f64) -> Self {
        Self { remaining: initial }
    }

    pub fn tick(&mut self, dt: f64) {
        self.remaining -= dt;
    }

    /// True once `remaining` has dropped to `lookahead`.
    pub fn is_due(&self, lookahead: f64) -> bool {
        self.remaining <= lookahead
    }

    /// Redraws `remaining` uniformly from `[min, max] / speed_multiplier`
    /// and returns it.
    pub fn redraw<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        min: f64,
        max: f64,
        speed_multiplier: f64,
    ) -> f64 {
        self.remaining = rng.gen_range(min..=max) / speed_multiplier;
        self.remaining
    }

    pub fn remaining(&self) -> f64 {
        self.remaining
    }
}

//=== SpawnFrame ==========================================================

/// World values the spawner reads each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnFrame {
    pub viewport_width: f64,
    pub speed_multiplier: f64,
    /// Distance the world scrolled this frame.
    pub frame_delta: f64,
}

//=== SpawnReport =========================================================

/// What changed in the live set during one update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpawnReport {
    pub spawned: Option<EntityHandle>,
    pub retired: Vec<EntityHandle>,
}

//=== ObstacleSpawner =====================================================

/// Owns every live obstacle, in spawn order.
#[derive(Debug)]
pub struct ObstacleSpawner {
    timer: SpawnTimer,
    live: Vec<Obstacle>,
    spawned_total: u64,
    retired_total: u64,
}

impl ObstacleSpawner {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            timer: SpawnTimer::new(config.initial_spawn_delay),
            live: Vec::new(),
            spawned_total: 0,
            retired_total: 0,
        }
    }

    //--- Update Loop ------------------------------------------------------

    /// Runs one frame: timer, spawn decision, sweep, retirement.
    pub fn update<R, H>(
        &mut self,
        dt: f64,
        frame: SpawnFrame,
        config: &SimConfig,
        rng: &mut R,
        host: &mut H,
    ) -> SpawnReport
    where
        R: Rng + ?Sized,
        H: EntityHost + ?Sized,
    {
        let mut report = SpawnReport::default();

        self.timer.tick(dt);
        if self.timer.is_due(config.spawn_lookahead) {
            let kind = ObstacleKind::random(rng);
            report.spawned = Some(self.spawn(kind, frame.viewport_width, config, rng, host));
            self.timer.redraw(
                rng,
                config.min_spawn_interval,
                config.max_spawn_interval,
                frame.speed_multiplier,
            );
        }

        report.retired = self.sweep(frame.frame_delta, host);
        report
    }

    /// Creates one entity of `kind` just past the right edge.
    pub fn spawn<R, H>(
        &mut self,
        kind: ObstacleKind,
        viewport_width: f64,
        config: &SimConfig,
        rng: &mut R,
        host: &mut H,
    ) -> EntityHandle
    where
        R: Rng + ?Sized,
        H: EntityHost + ?Sized,
    {
        let profile = config.obstacle(kind);
        let vertical_position = if kind.is_cloud() {
            rng.gen_range(config.min_cloud_y..=config.max_cloud_y)
        } else {
            0.0
        };

        let handle = host.create_entity(kind);
        self.live.push(Obstacle {
            handle,
            kind,
            horizontal_position: viewport_width,
            vertical_position,
            width: profile.width,
            parallax: profile.parallax,
        });
        self.spawned_total += 1;

        debug!(
            target: "sim::obstacles",
            "Spawned {:?} {} at x={} y={}",
            kind,
            handle,
            viewport_width,
            vertical_position
        );
        handle
    }

    /// Moves every live entity left by `frame_delta` (scaled by its
    /// parallax), then retires the ones that left the screen.
    pub fn sweep<H: EntityHost + ?Sized>(
        &mut self,
        frame_delta: f64,
        host: &mut H,
    ) -> Vec<EntityHandle> {
        for obstacle in &mut self.live {
            obstacle.horizontal_position -= frame_delta * obstacle.parallax;
        }

        let mut retired = Vec::new();
        self.live.retain(|obstacle| {
            if obstacle.is_offscreen() {
                host.destroy_entity(obstacle.handle);
                retired.push(obstacle.handle);
                false
            } else {
                true
            }
        });

        if !retired.is_empty() {
            self.retired_total += retired.len() as u64;
            debug!(target: "sim::obstacles", "Retired {} entities: {:?}", retired.len(), retired);
        }

        retired
    }

    //--- Queries ----------------------------------------------------------

    /// Live entities in spawn order.
    pub fn live(&self) -> &[Obstacle] {
        &self.live
    }

    pub fn timer(&self) -> &SpawnTimer {
        &self.timer
    }

    pub fn spawned_total(&self) -> u64 {
        self.spawned_total
    }

    pub fn retired_total(&self) -> u64 {
        self.retired_total
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    //--- Test Helpers -----------------------------------------------------

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn frame(frame_delta: f64, speed_multiplier: f64) -> SpawnFrame {
        SpawnFrame {
            viewport_width: 1280.0,
            speed_multiplier,
            frame_delta,
        }
    }

    fn config_with_ground_width(width: f64) -> SimConfig {
        let mut config = SimConfig::default();
        config.ground_obstacle.width = width;
        config
    }

    //=====================================================================
    // Spawn Timer
    //=====================================================================

    #[test]
    fn first_spawn_waits_for_lookahead() {
        let config = SimConfig::default();
        let mut spawner = ObstacleSpawner::new(&config);
        let mut host = EntityRegistry::new();
        let mut rng = rng();

        // 2.0 initial, fires at 0.5 → needs 1.5s.
        for _ in 0..14 {
            let report = spawner.update(0.1, frame(0.0, 1.0), &config, &mut rng, &mut host);
            assert!(report.spawned.is_none());
        }
        let report = spawner.update(0.125, frame(0.0, 1.0), &config, &mut rng, &mut host);
        assert!(report.spawned.is_some());
        assert_eq!(spawner.live().len(), 1);
    }

    #[test]
    fn redraw_stays_in_scaled_range() {
        let config = SimConfig::default();
        let mut rng = rng();
        let mut timer = SpawnTimer::new(0.0);

        for multiplier in [1.0, 2.0] {
            let min = config.min_spawn_interval / multiplier;
            let max = config.max_spawn_interval / multiplier;
            for _ in 0..1000 {
                let interval = timer.redraw(
                    &mut rng,
                    config.min_spawn_interval,
                    config.max_spawn_interval,
                    multiplier,
                );
                assert!(interval >= min && interval <= max, "{} outside [{}, {}]", interval, min, max);
            }
        }
    }

    #[test]
    fn faster_locomotion_spawns_more_often() {
        let config = SimConfig::default();
        let mut host = EntityRegistry::new();

        let mut walking = ObstacleSpawner::new(&config);
        let mut running = ObstacleSpawner::new(&config);
        let (mut rng_a, mut rng_b) = (rng(), rng());

        for _ in 0..600 {
            walking.update(0.05, frame(0.0, 1.0), &config, &mut rng_a, &mut host);
            running.update(0.05, frame(0.0, 2.0), &config, &mut rng_b, &mut host);
        }

        assert!(running.spawned_total() > walking.spawned_total());
    }

    //=====================================================================
    // Spawning
    //=====================================================================

    #[test]
    fn spawn_places_entity_at_right_edge() {
        let config = SimConfig::default();
        let mut spawner = ObstacleSpawner::new(&config);
        let mut host = EntityRegistry::new();

        let handle = spawner.spawn(ObstacleKind::GroundObstacle, 1280.0, &config, &mut rng(), &mut host);

        let obstacle = &spawner.live()[0];
        assert_eq!(obstacle.handle(), handle);
        assert_eq!(obstacle.horizontal_position(), 1280.0);
        assert_eq!(obstacle.vertical_position(), 0.0);
        assert!(host.is_live(handle));
    }

    #[test]
    fn clouds_spawn_inside_band() {
        let config = SimConfig::default();
        let mut spawner = ObstacleSpawner::new(&config);
        let mut host = EntityRegistry::new();
        let mut rng = rng();

        for _ in 0..200 {
            spawner.spawn(ObstacleKind::Cloud, 1280.0, &config, &mut rng, &mut host);
        }

        for cloud in spawner.live() {
            let y = cloud.vertical_position();
            assert!(y >= config.min_cloud_y && y <= config.max_cloud_y);
        }
    }

    #[test]
    fn random_kind_covers_every_variant() {
        let mut rng = rng();
        let kinds: HashSet<ObstacleKind> = (0..200).map(|_| ObstacleKind::random(&mut rng)).collect();
        assert_eq!(kinds.len(), 3);
    }

    //=====================================================================
    // Sweep & Retirement
    //=====================================================================

    #[test]
    fn clouds_move_at_half_speed() {
        let config = SimConfig::default();
        let mut spawner = ObstacleSpawner::new(&config);
        let mut host = EntityRegistry::new();
        let mut rng = rng();

        spawner.spawn(ObstacleKind::GroundObstacle, 1000.0, &config, &mut rng, &mut host);
        spawner.spawn(ObstacleKind::Cloud, 1000.0, &config, &mut rng, &mut host);
        spawner.sweep(100.0, &mut host);

        assert_eq!(spawner.live()[0].horizontal_position(), 900.0);
        assert_eq!(spawner.live()[1].horizontal_position(), 950.0);
    }

    #[test]
    fn entity_retired_on_frame_it_passes_width() {
        let config = config_with_ground_width(80.0);
        let mut spawner = ObstacleSpawner::new(&config);
        let mut host = EntityRegistry::new();
        let handle = spawner.spawn(ObstacleKind::GroundObstacle, 1280.0, &config, &mut rng(), &mut host);

        for frame in 1..=135 {
            let retired = spawner.sweep(10.0, &mut host);
            assert!(retired.is_empty(), "retired early on frame {}", frame);
        }
        assert_eq!(spawner.live()[0].horizontal_position(), -70.0);

        let retired = spawner.sweep(10.0, &mut host);
        assert_eq!(retired, vec![handle]);
        assert!(spawner.live().is_empty());
        assert!(!host.is_live(handle));

        for _ in 0..10 {
            assert!(spawner.sweep(10.0, &mut host).is_empty());
            assert!(spawner.live().iter().all(|o| o.handle() != handle));
        }
        assert_eq!(spawner.retired_total(), 1);
    }

    #[test]
    fn simultaneous_retirements_processed_once_each() {
        let config = SimConfig::default();
        let mut spawner = ObstacleSpawner::new(&config);
        let mut host = EntityRegistry::new();
        let mut rng = rng();

        // Alternate entities that leave together with ones that stay.
        let mut leaving = Vec::new();
        for i in 0..6 {
            let x = if i % 2 == 0 { 0.0 } else { 5000.0 };
            let handle = spawner.spawn(ObstacleKind::GroundObstacle, x, &config, &mut rng, &mut host);
            if i % 2 == 0 {
                leaving.push(handle);
            }
        }

        let mut retired = spawner.sweep(500.0, &mut host);
        retired.sort();

        assert_eq!(retired, leaving);
        assert_eq!(spawner.live().len(), 3);
        assert_eq!(host.live_count(), 3);
    }

    #[test]
    fn live_list_keeps_spawn_order() {
        let config = SimConfig::default();
        let mut spawner = ObstacleSpawner::new(&config);
        let mut host = EntityRegistry::new();
        let mut rng = rng();

        let handles: Vec<_> = (0..4)
            .map(|_| spawner.spawn(ObstacleKind::Cloud, 1280.0, &config, &mut rng, &mut host))
            .collect();
        spawner.sweep(1.0, &mut host);

        let live: Vec<_> = spawner.live().iter().map(Obstacle::handle).collect();
        assert_eq!(live, handles);
    }

    #[test]
    fn registry_ignores_unknown_destroy() {
        let mut host = EntityRegistry::new();
        let handle = host.create_entity(ObstacleKind::Cloud);
        host.destroy_entity(handle);
        host.destroy_entity(handle);
        assert_eq!(host.live_count(), 0);
    }
}
