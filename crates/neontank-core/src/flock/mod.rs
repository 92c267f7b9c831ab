use crate::config::{ConfigError, FlockConfig};
use crate::constants::FLOCK_RNG_STREAM;
use crate::fish::{FishHealth, FishId};
use crate::rng;
use crate::spatial;
use rand::Rng;
use rand_chacha::ChaCha12Rng;
use rstar::RTree;
use std::collections::HashSet;
use std::f64::consts::TAU;

pub mod steering;

use steering::{lerp, vitality, Vec2};

/// Kinematic state for one fish, keyed 1:1 with a live [`FishHealth`] by
/// id. The controller mirrors the environment's roster; it never creates
/// or destroys the health entities themselves.
#[derive(Clone, Debug)]
pub struct FlockEntity {
    pub id: FishId,
    pub position: Vec2,
    pub velocity: Vec2,
    pub base_speed: f64,
    /// Last committed horizontal direction, -1 or +1.
    pub last_direction: i8,
    /// Remaining seconds before another horizontal flip is honored.
    pub direction_cooldown: f64,
    /// Current wander direction, held until the timer expires.
    pub wander: Vec2,
    pub wander_timer: f64,
}

/// Per-frame steering over the mirrored flock: alignment, cohesion, and
/// separation from neighbors, boundary avoidance, periodic wander, and
/// direction-change hysteresis, all scaled by each fish's vitality.
///
/// Runs in continuous time, not the environment's fixed-step domain.
pub struct FlockController {
    entities: Vec<FlockEntity>,
    config: FlockConfig,
    rng: ChaCha12Rng,
}

impl FlockController {
    pub fn new(config: FlockConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            entities: Vec::new(),
            config,
            rng: rng::derive_stream(seed, FLOCK_RNG_STREAM),
        })
    }

    pub fn config(&self) -> &FlockConfig {
        &self.config
    }

    pub fn entities(&self) -> &[FlockEntity] {
        &self.entities
    }

    /// Diff the entity set against the live roster: despawn entities whose
    /// fish is gone, spawn entities for new fish. Both lists are ascending
    /// by id (the environment assigns ids monotonically and removes from
    /// the newest end), so entities stay index-aligned with the roster.
    pub fn sync_roster(&mut self, fish: &[FishHealth]) {
        let live: HashSet<FishId> = fish.iter().map(|f| f.id()).collect();
        let before = self.entities.len();
        self.entities.retain(|e| live.contains(&e.id));
        let despawned = before - self.entities.len();

        let have: HashSet<FishId> = self.entities.iter().map(|e| e.id).collect();
        let mut spawned = 0usize;
        for f in fish {
            if !have.contains(&f.id()) {
                let entity = self.spawn_entity(f.id());
                self.entities.push(entity);
                spawned += 1;
            }
        }
        if spawned > 0 || despawned > 0 {
            log::debug!("flock sync: +{spawned} -{despawned}, now {}", self.entities.len());
        }
    }

    /// One render frame: mirror the roster, then recompute each entity's
    /// velocity from its health and the current flock state.
    pub fn update_frame(&mut self, delta_seconds: f64, fish: &[FishHealth]) {
        self.sync_roster(fish);
        if !(delta_seconds.is_finite() && delta_seconds > 0.0) || self.entities.is_empty() {
            return;
        }
        debug_assert_eq!(self.entities.len(), fish.len());

        let vitalities: Vec<f64> = fish
            .iter()
            .map(|f| vitality(f.value, self.config.vitality_floor_health, self.config.vitality_span))
            .collect();

        // Timers first: cooldowns always run down; wander only re-draws
        // for active fish, which bounds how often noise can change course.
        for (entity, &vit) in self.entities.iter_mut().zip(&vitalities) {
            entity.direction_cooldown = (entity.direction_cooldown - delta_seconds).max(0.0);
            if vit > 0.0 {
                entity.wander_timer -= delta_seconds;
                if entity.wander_timer <= 0.0 {
                    entity.wander = random_wander(&mut self.rng);
                    entity.wander_timer = draw_wander_interval(&mut self.rng, &self.config, vit);
                }
            }
        }

        // Propose velocities against a stable snapshot of the flock, then
        // apply, so no entity reacts to this frame's partial updates.
        let tree = spatial::build_index(
            self.entities
                .iter()
                .enumerate()
                .map(|(i, e)| (i as u64, [e.position.x, e.position.y])),
        );
        let proposals: Vec<Vec2> = self
            .entities
            .iter()
            .enumerate()
            .map(|(i, entity)| {
                let vit = vitalities[i];
                if vit <= 0.0 {
                    self.calm_velocity(entity)
                } else {
                    self.steer(i, entity, vit, &tree, delta_seconds)
                }
            })
            .collect();

        for (i, entity) in self.entities.iter_mut().enumerate() {
            let vit = vitalities[i];
            let mut velocity = proposals[i];

            let sign: i8 = if velocity.x == 0.0 {
                entity.last_direction
            } else if velocity.x > 0.0 {
                1
            } else {
                -1
            };
            let mut new_direction = entity.last_direction;
            let mut cooldown_reset = None;
            if sign != entity.last_direction {
                if entity.direction_cooldown > 0.0 {
                    // Flip not yet allowed; keep the committed heading.
                    velocity.x = velocity.x.abs() * f64::from(entity.last_direction);
                } else {
                    new_direction = sign;
                    cooldown_reset = Some(lerp(
                        self.config.direction_cooldown_max,
                        self.config.direction_cooldown_min,
                        vit,
                    ));
                }
            }

            if velocity.sub(entity.velocity).len() > self.config.commit_epsilon {
                entity.velocity = velocity;
                entity.last_direction = new_direction;
                if let Some(cooldown) = cooldown_reset {
                    entity.direction_cooldown = cooldown;
                }
            }
        }
    }

    /// Integrate positions for a headless driver. A renderer normally owns
    /// this; positions are kept inside the world bounds.
    pub fn advance_positions(&mut self, delta_seconds: f64) {
        if !(delta_seconds.is_finite() && delta_seconds > 0.0) {
            return;
        }
        let bounds = self.config.bounds;
        for entity in &mut self.entities {
            entity.position.x =
                (entity.position.x + entity.velocity.x * delta_seconds).clamp(bounds.x, bounds.right());
            entity.position.y =
                (entity.position.y + entity.velocity.y * delta_seconds).clamp(bounds.y, bounds.bottom());
        }
    }

    /// Sick/calm state: straight horizontal swim, no vertical drift, no
    /// steering.
    fn calm_velocity(&self, entity: &FlockEntity) -> Vec2 {
        let speed = self.config.low_health_speed.max(0.75 * entity.base_speed);
        Vec2::new(f64::from(entity.last_direction) * speed, 0.0)
    }

    fn steer(
        &self,
        index: usize,
        entity: &FlockEntity,
        vit: f64,
        tree: &RTree<spatial::EntityLocation>,
        delta_seconds: f64,
    ) -> Vec2 {
        let cfg = &self.config;
        let pos = entity.position;

        let mut align_sum = Vec2::ZERO;
        let mut cohesion_sum = Vec2::ZERO;
        let mut cohesion_count = 0usize;
        let mut separation_sum = Vec2::ZERO;
        spatial::for_each_neighbor(
            tree,
            [pos.x, pos.y],
            cfg.neighbor_radius,
            index as u64,
            |loc, dist| {
                let other = &self.entities[loc.id as usize];
                align_sum = align_sum.add(other.velocity);
                cohesion_sum = cohesion_sum.add(other.position);
                cohesion_count += 1;
                if dist < cfg.separation_radius {
                    let away = pos.sub(other.position).norm();
                    separation_sum =
                        separation_sum.add(away.scale(1.0 - dist / cfg.separation_radius));
                }
            },
        );

        let alignment = align_sum.norm();
        let cohesion = if cohesion_count > 0 {
            cohesion_sum
                .scale(1.0 / cohesion_count as f64)
                .sub(pos)
                .norm()
        } else {
            Vec2::ZERO
        };
        let separation = separation_sum.limit(1.0);
        let avoidance = self.boundary_avoidance(pos, vit);

        let desired = alignment
            .scale(cfg.weight_alignment * vit)
            .add(cohesion.scale(cfg.weight_cohesion * vit))
            .add(separation.scale(cfg.weight_separation_base - cfg.weight_separation_ease * vit))
            .add(avoidance.scale(cfg.weight_avoidance * vit))
            .add(entity.wander.scale(cfg.weight_wander * vit));

        // Degenerate blend: keep swimming the way we were headed.
        let direction = if desired.len() <= 1e-9 {
            Vec2::new(f64::from(entity.last_direction), 0.0)
        } else {
            desired.norm()
        };

        let target_speed = entity.base_speed * (1.0 + cfg.speed_boost * vit);
        let blend = ((cfg.steer_smoothing_base + cfg.steer_smoothing_vitality * vit)
            * delta_seconds)
            .clamp(0.0, 1.0);
        let mut velocity = entity
            .velocity
            .add(direction.scale(target_speed).sub(entity.velocity).scale(blend));

        let floor = cfg.min_speed.min(target_speed);
        let speed = velocity.len();
        if speed <= 1e-9 {
            velocity = direction.scale(floor);
        } else if speed < floor {
            velocity = velocity.scale(floor / speed);
        } else if speed > target_speed {
            velocity = velocity.scale(target_speed / speed);
        }

        let max_vertical =
            target_speed * (cfg.vertical_frac_base + cfg.vertical_frac_vitality * vit);
        velocity.y = velocity.y.clamp(-max_vertical, max_vertical);
        velocity
    }

    /// Inward push that grows as the fish nears a wall; the padding itself
    /// widens with vitality so healthy fish turn earlier.
    fn boundary_avoidance(&self, pos: Vec2, vit: f64) -> Vec2 {
        let bounds = self.config.bounds;
        let margin = self.config.boundary_margin * (0.5 + 0.5 * vit);
        let mut steer = Vec2::ZERO;

        let left = pos.x - bounds.x;
        if left < margin {
            steer.x += 1.0 - (left / margin).clamp(0.0, 1.0);
        }
        let right = bounds.right() - pos.x;
        if right < margin {
            steer.x -= 1.0 - (right / margin).clamp(0.0, 1.0);
        }
        let top = pos.y - bounds.y;
        if top < margin {
            steer.y += 1.0 - (top / margin).clamp(0.0, 1.0);
        }
        let bottom = bounds.bottom() - pos.y;
        if bottom < margin {
            steer.y -= 1.0 - (bottom / margin).clamp(0.0, 1.0);
        }
        steer
    }

    fn spawn_entity(&mut self, id: FishId) -> FlockEntity {
        let cfg = &self.config;
        let bounds = cfg.bounds;
        let inset_x = cfg.boundary_margin.min(bounds.width / 4.0);
        let inset_y = cfg.boundary_margin.min(bounds.height / 4.0);
        let position = Vec2::new(
            self.rng
                .random_range(bounds.x + inset_x..=bounds.right() - inset_x),
            self.rng
                .random_range(bounds.y + inset_y..=bounds.bottom() - inset_y),
        );
        let direction: i8 = if self.rng.random_bool(0.5) { 1 } else { -1 };
        let base_speed = self
            .rng
            .random_range(cfg.base_speed_min..=cfg.base_speed_max);
        let wander = random_wander(&mut self.rng);
        // Spawn vitality is unknown until the first frame; draw the first
        // wander interval at the midpoint.
        let wander_timer = draw_wander_interval(&mut self.rng, cfg, 0.5);
        FlockEntity {
            id,
            position,
            velocity: Vec2::new(f64::from(direction) * base_speed, 0.0),
            base_speed,
            last_direction: direction,
            direction_cooldown: 0.0,
            wander,
            wander_timer,
        }
    }
}

/// Unit-ish wander direction with damped vertical bias.
fn random_wander(rng: &mut ChaCha12Rng) -> Vec2 {
    let angle = rng.random_range(0.0..TAU);
    Vec2::new(angle.cos(), 0.5 * angle.sin())
}

/// Next wander hold time; sluggish (low-vitality) fish hold course longer.
fn draw_wander_interval(rng: &mut ChaCha12Rng, cfg: &FlockConfig, vit: f64) -> f64 {
    let base = rng.random_range(cfg.wander_interval_min..=cfg.wander_interval_max);
    base * (1.0 + cfg.wander_sluggish_scale * (1.0 - vit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fish::FishHealth;

    fn make_fish(id: u64, health: f64) -> FishHealth {
        FishHealth::new(FishId::new(id), health, 20.0)
    }

    fn make_controller() -> FlockController {
        FlockController::new(FlockConfig::default(), 7).unwrap()
    }

    #[test]
    fn mirrors_roster_additions_and_removals() {
        let mut flock = make_controller();
        let roster: Vec<FishHealth> = (0..4).map(|i| make_fish(i, 80.0)).collect();
        flock.sync_roster(&roster);
        assert_eq!(flock.entities().len(), 4);

        // Fish 1 and 3 die; 4 is added.
        let roster = vec![make_fish(0, 80.0), make_fish(2, 80.0), make_fish(4, 80.0)];
        flock.sync_roster(&roster);
        let ids: Vec<u64> = flock.entities().iter().map(|e| e.id.raw()).collect();
        assert_eq!(ids, vec![0, 2, 4]);
    }

    #[test]
    fn sync_preserves_surviving_entity_state() {
        let mut flock = make_controller();
        let roster: Vec<FishHealth> = (0..3).map(|i| make_fish(i, 80.0)).collect();
        flock.sync_roster(&roster);
        let kept = flock.entities()[1].clone();
        let roster = vec![make_fish(1, 80.0)];
        flock.sync_roster(&roster);
        assert_eq!(flock.entities().len(), 1);
        assert_eq!(flock.entities()[0].position, kept.position);
        assert_eq!(flock.entities()[0].base_speed, kept.base_speed);
    }

    #[test]
    fn low_health_fish_swims_flat_and_slow() {
        let mut flock = make_controller();
        let roster = vec![make_fish(0, 60.0)];
        flock.update_frame(0.016, &roster);
        let entity = &flock.entities()[0];
        assert_eq!(entity.velocity.y, 0.0);
        let expected = flock.config.low_health_speed.max(0.75 * entity.base_speed);
        assert!((entity.velocity.x.abs() - expected).abs() < 1e-9);
        assert_eq!(
            entity.velocity.x.signum() as i8,
            entity.last_direction,
            "calm swim keeps the last committed direction"
        );
    }

    #[test]
    fn healthy_fish_gets_steered() {
        let mut flock = make_controller();
        let roster: Vec<FishHealth> = (0..5).map(|i| make_fish(i, 100.0)).collect();
        for _ in 0..60 {
            flock.update_frame(0.016, &roster);
            flock.advance_positions(0.016);
        }
        for entity in flock.entities() {
            assert!(entity.velocity.x.is_finite() && entity.velocity.y.is_finite());
            let target = entity.base_speed * (1.0 + flock.config.speed_boost);
            assert!(entity.velocity.len() <= target + 1e-6);
            assert!(entity.velocity.len() > 0.0);
        }
    }

    #[test]
    fn coincident_entities_stay_finite() {
        let mut flock = make_controller();
        let roster: Vec<FishHealth> = (0..2).map(|i| make_fish(i, 100.0)).collect();
        flock.sync_roster(&roster);
        let shared = Vec2::new(400.0, 300.0);
        for entity in &mut flock.entities {
            entity.position = shared;
        }
        flock.update_frame(0.016, &roster);
        for entity in flock.entities() {
            assert!(entity.velocity.x.is_finite());
            assert!(entity.velocity.y.is_finite());
        }
    }

    #[test]
    fn direction_cannot_flip_twice_within_cooldown() {
        let mut flock = make_controller();
        let roster = vec![make_fish(0, 100.0)];
        flock.sync_roster(&roster);

        // Park the fish deep in the left margin heading left: avoidance
        // forces a flip to the right. The long frame saturates the
        // velocity blend so the flip happens in one update.
        {
            let entity = &mut flock.entities[0];
            entity.position = Vec2::new(flock.config.bounds.x + 5.0, 300.0);
            entity.velocity = Vec2::new(-30.0, 0.0);
            entity.last_direction = -1;
            entity.direction_cooldown = 0.0;
        }
        flock.update_frame(0.5, &roster);
        assert_eq!(flock.entities()[0].last_direction, 1);
        assert!(flock.entities()[0].velocity.x > 0.0);
        assert!(flock.entities()[0].direction_cooldown > 0.0);

        // Teleport into the right margin: steering now pushes left, but
        // the cooldown has not expired, so the heading must hold.
        {
            let entity = &mut flock.entities[0];
            entity.position = Vec2::new(flock.config.bounds.right() - 5.0, 300.0);
        }
        flock.update_frame(0.2, &roster);
        assert_eq!(flock.entities()[0].last_direction, 1);
        assert!(flock.entities()[0].velocity.x > 0.0);
    }

    #[test]
    fn flip_is_honored_after_cooldown_expires() {
        let mut flock = make_controller();
        let roster = vec![make_fish(0, 100.0)];
        flock.sync_roster(&roster);
        {
            let entity = &mut flock.entities[0];
            entity.position = Vec2::new(flock.config.bounds.right() - 5.0, 300.0);
            entity.velocity = Vec2::new(30.0, 0.0);
            entity.last_direction = 1;
            // Cooldown shorter than the frame delta below.
            entity.direction_cooldown = 0.01;
        }
        flock.update_frame(0.1, &roster);
        assert_eq!(flock.entities()[0].last_direction, -1);
        assert!(flock.entities()[0].velocity.x < 0.0);
    }

    #[test]
    fn same_seed_is_deterministic() {
        let roster: Vec<FishHealth> = (0..6).map(|i| make_fish(i, 90.0)).collect();
        let mut a = FlockController::new(FlockConfig::default(), 99).unwrap();
        let mut b = FlockController::new(FlockConfig::default(), 99).unwrap();
        for _ in 0..30 {
            a.update_frame(0.016, &roster);
            a.advance_positions(0.016);
            b.update_frame(0.016, &roster);
            b.advance_positions(0.016);
        }
        for (ea, eb) in a.entities().iter().zip(b.entities()) {
            assert_eq!(ea.position, eb.position);
            assert_eq!(ea.velocity, eb.velocity);
        }
    }

    #[test]
    fn degenerate_frame_delta_is_a_no_op() {
        let mut flock = make_controller();
        let roster = vec![make_fish(0, 100.0)];
        flock.sync_roster(&roster);
        let before = flock.entities()[0].velocity;
        flock.update_frame(0.0, &roster);
        assert_eq!(flock.entities()[0].velocity, before);
        flock.update_frame(f64::NAN, &roster);
        assert_eq!(flock.entities()[0].velocity, before);
    }
}
