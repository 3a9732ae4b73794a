// ─────────────────────────────────────────────────────────────────────
// Maxwell's Demon Kernel — Simulation Clock
// ─────────────────────────────────────────────────────────────────────
//! Owns the simulation state and advances it one tick at a time.
//!
//! Tick pipeline:
//!   1. Start-of-tick x recorded, perfect-mode gating (door opens iff a
//!      homeward particle is in band)
//!   2. Pairwise collision pass
//!   3. Per particle: integrate → midline crossing / door-area hit → walls
//!   4. Door-state edge and perfect-mode crossing charges
//!   5. Occupancy, entropy, and temperature read-outs
//!   6. History, then event fan-out to subscribers
//!
//! Crossings are judged against the start-of-tick x, so a particle pushed
//! over the midline by collision separation meets the wall like any other.
//!
//! The tick path is total: degenerate numerics fall back to zero and are
//! logged, nothing is returned as an error.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use demon_observers::{
    multiplicity_curve, microstate_count, system_entropy, ChamberOccupancy, MultiplicityCurve,
    ThermoReading, ThermodynamicsObserver,
};
use demon_physics::{CollisionResolver, Particle};
use demon_types::{
    Chamber, ChamberCounts, DemonError, DemonResult, ParticleKind, SimulationConfig,
    SimulationEvent, Snapshot, ThermoSummary,
};

use crate::events::EventSink;
use crate::history::History;
use crate::ledger::{demon_budget, ChargeSource, DemonLedger};
use crate::partition::ChamberPartition;

/// What happened during one tick (or a run of ticks).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    /// Index of the last tick covered.
    pub tick: u64,
    pub collisions: usize,
    pub door_hits: usize,
    pub crossing_charges: usize,
    /// Latest door state change, if any.
    pub door_transition: Option<bool>,
    /// Demon entropy added, after budget clamping.
    pub entropy_charged: f64,
}

impl TickReport {
    /// Fold a later report into this one.
    pub fn absorb(&mut self, later: &TickReport) {
        self.tick = later.tick;
        self.collisions += later.collisions;
        self.door_hits += later.door_hits;
        self.crossing_charges += later.crossing_charges;
        if later.door_transition.is_some() {
            self.door_transition = later.door_transition;
        }
        self.entropy_charged += later.entropy_charged;
    }
}

/// Everything a tick mutates. Rebuilt as a whole on reconfiguration.
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub config: SimulationConfig,
    pub particles: Vec<Particle>,
    pub partition: ChamberPartition,
    pub ledger: DemonLedger,
    pub history: History,
    pub counts: ChamberCounts,
    pub summary: ThermoSummary,
    /// Ticks completed since the last reconfiguration.
    pub tick: u64,
}

impl SimulationState {
    fn new(config: SimulationConfig, particles: Vec<Particle>) -> Self {
        Self {
            partition: ChamberPartition::from_config(&config),
            ledger: DemonLedger::from_config(&config),
            history: History::new(config.history_capacity),
            counts: ChamberCounts::default(),
            summary: ThermoSummary::default(),
            tick: 0,
            particles,
            config,
        }
    }

    fn microstates(&self) -> f64 {
        microstate_count(
            self.config.width,
            self.config.height,
            self.config.particle_radius,
        )
    }
}

fn rng_for(config: &SimulationConfig) -> StdRng {
    match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Slow particles first, then fast ones.
fn spawn_population(rng: &mut StdRng, config: &SimulationConfig) -> Vec<Particle> {
    let slow = (0..config.blue_count).map(|_| ParticleKind::Slow);
    let fast = (0..config.red_count).map(|_| ParticleKind::Fast);
    slow.chain(fast)
        .map(|kind| Particle::spawn(rng, kind, config))
        .collect()
}

fn check_particle(index: usize, particle: &Particle, config: &SimulationConfig) -> DemonResult<()> {
    let finite = particle.position.is_finite()
        && particle.velocity.is_finite()
        && particle.radius().is_finite();
    if !finite {
        return Err(DemonError::Population(format!(
            "particle {index} has non-finite state"
        )));
    }
    if particle.radius() <= 0.0 {
        return Err(DemonError::Population(format!(
            "particle {index} has radius {}",
            particle.radius()
        )));
    }
    let (x, y) = (particle.position.x, particle.position.y);
    if !(0.0..=config.width).contains(&x) || !(0.0..=config.height).contains(&y) {
        return Err(DemonError::Population(format!(
            "particle {index} at ({x}, {y}) lies outside the {}x{} box",
            config.width, config.height
        )));
    }
    Ok(())
}

pub struct SimulationClock {
    state: SimulationState,
    resolver: CollisionResolver,
    observer: ThermodynamicsObserver,
    rng: StdRng,
    sinks: Vec<Arc<dyn EventSink>>,
    last_events: Vec<SimulationEvent>,
}

impl SimulationClock {
    /// Random population from `config`. Invalid fields are clamped.
    pub fn new(config: SimulationConfig) -> Self {
        let config = config.sanitized();
        let mut rng = rng_for(&config);
        let particles = spawn_population(&mut rng, &config);
        Self::assemble(config, particles, rng)
    }

    /// Explicit population. The slow/fast counts in `config` are replaced
    /// by the classification of `particles`.
    pub fn with_particles(
        mut config: SimulationConfig,
        particles: Vec<Particle>,
    ) -> DemonResult<Self> {
        config.validate()?;
        for (index, particle) in particles.iter().enumerate() {
            check_particle(index, particle, &config)?;
        }
        let slow = particles
            .iter()
            .filter(|p| p.classify(config.speed_threshold) == ParticleKind::Slow)
            .count();
        config.blue_count = slow;
        config.red_count = particles.len() - slow;

        let rng = rng_for(&config);
        Ok(Self::assemble(config, particles, rng))
    }

    fn assemble(config: SimulationConfig, particles: Vec<Particle>, rng: StdRng) -> Self {
        log::info!(
            "simulation ready: {} slow, {} fast, {}x{} box, budget {:.3}",
            config.blue_count,
            config.red_count,
            config.width,
            config.height,
            demon_budget(&config)
        );
        let mut clock = Self {
            state: SimulationState::new(config, particles),
            resolver: CollisionResolver::new(),
            observer: ThermodynamicsObserver::new(),
            rng,
            sinks: Vec::new(),
            last_events: Vec::new(),
        };
        clock.measure();
        clock
    }

    /// Advance one tick.
    pub fn tick(&mut self) -> TickReport {
        self.state.tick += 1;
        let tick = self.state.tick;
        let mut report = TickReport {
            tick,
            ..Default::default()
        };
        let mut events = Vec::new();
        let charged_before = self.state.ledger.accumulated();

        let SimulationState {
            config,
            particles,
            partition,
            ledger,
            ..
        } = &mut self.state;

        // 1. Gating
        for particle in particles.iter_mut() {
            particle.begin_tick();
        }
        partition.gate(particles);

        // 2. Collisions
        let contacts = self.resolver.resolve(particles);
        report.collisions = contacts.len();
        events.extend(contacts.iter().map(|c| SimulationEvent::Collision {
            tick,
            a: c.a,
            b: c.b,
        }));

        // 3. Motion, wall, door
        let (width, height) = (config.width, config.height);
        for (index, particle) in particles.iter_mut().enumerate() {
            particle.integrate();
            if let Some(crossing) = partition.enforce(particle) {
                let billed = crossing.in_door_band
                    && config.charge_door_hits
                    && partition.measures_door_hits()
                    && partition.register_door_hit(particle, tick);
                if billed {
                    ledger.charge(ChargeSource::DoorHit);
                    report.door_hits += 1;
                    events.push(SimulationEvent::DoorHit {
                        tick,
                        particle: index,
                    });
                }
            }
            particle.bounce_walls(width, height);
        }

        // 4. Ledger
        if let Some(open) = ledger.observe_door(partition.is_open()) {
            log::debug!("tick {tick}: door {}", if open { "opened" } else { "closed" });
            if open && !partition.perfect_mode() {
                ledger.charge(ChargeSource::DoorOpen);
            }
            report.door_transition = Some(open);
            events.push(SimulationEvent::DoorTransition { tick, open });
        }

        if partition.perfect_mode() {
            let mid = partition.midline();
            for (index, particle) in particles.iter_mut().enumerate() {
                let home = partition.home_of(particle);
                if Chamber::of(particle.position.x, mid) != home {
                    particle.charged_for_crossing = false;
                    continue;
                }
                let arrived = Chamber::of(particle.previous_x, mid) != home;
                if arrived && !particle.charged_for_crossing {
                    particle.charged_for_crossing = true;
                    ledger.charge(ChargeSource::Crossing);
                    report.crossing_charges += 1;
                    events.push(SimulationEvent::CrossingCharged {
                        tick,
                        particle: index,
                    });
                }
            }
        }
        report.entropy_charged = ledger.accumulated() - charged_before;

        // 5. Read-outs
        self.measure();

        // 6. History and subscribers
        self.state.history.record(tick, &self.state.summary);
        for event in &events {
            for sink in &self.sinks {
                sink.on_event(event);
            }
        }
        self.last_events = events;

        report
    }

    /// Advance `ticks` ticks and return the combined report.
    pub fn run(&mut self, ticks: u64) -> TickReport {
        let mut total = TickReport {
            tick: self.state.tick,
            ..Default::default()
        };
        for _ in 0..ticks {
            let report = self.tick();
            total.absorb(&report);
        }
        total
    }

    /// Recount chambers and refresh the scalar read-outs.
    fn measure(&mut self) -> ThermoReading {
        let state = &mut self.state;
        let mid = state.partition.midline();
        let threshold = state.config.speed_threshold;

        let mut counts = ChamberCounts::default();
        for particle in &state.particles {
            counts.record(
                Chamber::of(particle.position.x, mid),
                particle.classify(threshold),
            );
        }

        let n = state.microstates();
        let (left_k, left_b) = counts.occupancy(Chamber::Left);
        let (right_k, right_b) = counts.occupancy(Chamber::Right);
        let left = ChamberOccupancy::new(n, left_k, left_b);
        let right = ChamberOccupancy::new(n, right_k, right_b);

        let reading = self.observer.observe(&state.particles, mid);

        state.counts = counts;
        state.summary = ThermoSummary {
            system_entropy: system_entropy(&left, &right),
            left_entropy: left.entropy(),
            right_entropy: right.entropy(),
            demon_entropy: state.ledger.accumulated(),
            demon_budget: state.ledger.budget(),
            system_temperature: reading.system.temperature,
            left_temperature: reading.left.temperature,
            right_temperature: reading.right.temperature,
            total_energy: reading.system.energy,
            left_energy: reading.left.energy,
            right_energy: reading.right.energy,
        };
        reading
    }

    /// Flip the door. Ignored in perfect mode; returns whether it flipped.
    /// The opening is billed on the next tick.
    pub fn toggle_door(&mut self) -> bool {
        self.state.partition.toggle()
    }

    /// Set the door state directly. Ignored in perfect mode.
    pub fn set_door_open(&mut self, open: bool) -> bool {
        self.state.partition.set_open(open)
    }

    /// Switch gating mode without resetting the population or ledger.
    pub fn set_perfect_mode(&mut self, enabled: bool) {
        if self.state.partition.perfect_mode() == enabled {
            return;
        }
        self.state.partition.set_perfect_mode(enabled);
        self.state.config.perfect_mode = enabled;
        log::info!("perfect mode {}", if enabled { "on" } else { "off" });
    }

    /// Replace the population, ledger, and history.
    pub fn reconfigure(&mut self, config: SimulationConfig) {
        let config = config.sanitized();
        if let Some(seed) = config.seed {
            self.rng = StdRng::seed_from_u64(seed);
        }
        let particles = spawn_population(&mut self.rng, &config);
        log::info!(
            "reconfigured: {} slow, {} fast, radius {}, threshold {}",
            config.blue_count,
            config.red_count,
            config.particle_radius,
            config.speed_threshold
        );
        self.state = SimulationState::new(config, particles);
        self.observer.reset();
        self.last_events.clear();
        self.measure();
    }

    /// New box dimensions. Particles are moved inside, the door band is
    /// rescaled, and the budget is recomputed with the accumulated demon
    /// entropy kept (clamped to the new budget).
    ///
    /// The particle radius never changes here: each side is held to at
    /// least one diameter plus a pixel so the population still fits.
    pub fn resize(&mut self, width: f64, height: f64) {
        let mut config = self.state.config.clone();
        let min_extent = 2.0 * config.particle_radius + 1.0;
        if width < min_extent || height < min_extent {
            log::warn!("resize {width}x{height} too small for radius {}", config.particle_radius);
        }
        config.width = width.max(min_extent);
        config.height = height.max(min_extent);
        let config = config.sanitized();

        self.state.partition.resize(config.width, config.height);
        for particle in &mut self.state.particles {
            particle.confine(config.width, config.height);
        }
        self.state.ledger.set_budget(demon_budget(&config));
        log::info!(
            "resized to {}x{}, budget {:.3}",
            config.width,
            config.height,
            self.state.ledger.budget()
        );
        self.state.config = config;
        self.measure();
    }

    /// Register a subscriber for every subsequent event.
    pub fn subscribe(&mut self, sink: Arc<dyn EventSink>) {
        self.sinks.push(sink);
    }

    pub fn snapshot(&self) -> Snapshot {
        let state = &self.state;
        let threshold = state.config.speed_threshold;
        let (door_top, door_bottom) = state.partition.door_band();
        Snapshot {
            tick: state.tick,
            particles: state.particles.iter().map(|p| p.view(threshold)).collect(),
            door_open: state.partition.is_open(),
            door_top,
            door_bottom,
            perfect_mode: state.partition.perfect_mode(),
            counts: state.counts,
            summary: state.summary,
        }
    }

    /// Entropy vs. slow particles on the left for the current population,
    /// with the current split marked.
    pub fn multiplicity(&self) -> MultiplicityCurve {
        let counts = &self.state.counts;
        multiplicity_curve(
            self.state.microstates(),
            counts.left_slow + counts.right_slow,
            counts.left_fast + counts.right_fast,
            counts.left_slow,
        )
    }

    pub fn summary(&self) -> &ThermoSummary {
        &self.state.summary
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.state.config
    }

    pub fn particles(&self) -> &[Particle] {
        &self.state.particles
    }

    pub fn ledger(&self) -> &DemonLedger {
        &self.state.ledger
    }

    pub fn history(&self) -> &History {
        &self.state.history
    }

    pub fn tick_count(&self) -> u64 {
        self.state.tick
    }

    pub fn door_open(&self) -> bool {
        self.state.partition.is_open()
    }

    pub fn perfect_mode(&self) -> bool {
        self.state.partition.perfect_mode()
    }

    /// Events produced by the most recent tick.
    pub fn last_events(&self) -> &[SimulationEvent] {
        &self.last_events
    }

    /// Total kinetic energy in display-scaled eV.
    pub fn total_energy_ev(&self) -> f64 {
        self.observer.reading().total_energy_ev()
    }
}
