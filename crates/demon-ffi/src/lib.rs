// ─────────────────────────────────────────────────────────────────────
// Maxwell's Demon Kernel — PyO3 FFI Bindings
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
// Note: #[deny(unsafe_code)] not applied — PyO3 proc macros generate
// unsafe blocks internally. All hand-written code in this crate is safe.
//! Python-callable wrappers around the Maxwell's Demon kernel.
//!
//! Exposes `SimulationConfig`, `Simulation`, and the entropy functions
//! to the display layer.
//!
//! # FFI Safety
//!
//! - GIL acquired via `Python::with_gil` before every Python callback.
//! - Exceptions raised by a subscriber are logged and dropped; they never
//!   interrupt a tick.
//! - Config is validated strictly here (`SimulationConfig::validate()`);
//!   everything past the constructor is total.
//!
//! Usage from Python:
//! ```python
//! from demon_kernel import Simulation, SimulationConfig
//!
//! sim = Simulation(SimulationConfig(blue_count=10, red_count=10, seed=7))
//! sim.subscribe(lambda event: print(event["type"]))
//! sim.toggle_door()
//! sim.run(60)
//! print(sim.demon_entropy, sim.system_entropy)
//! ```

use std::sync::Arc;

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use demon_core::{CallbackSink, SimulationClock, TickReport};
use demon_observers::{entropy, MultiplicityCurve};
use demon_types::{
    Chamber, ParticleKind, SimulationConfig, SimulationEvent, Snapshot, ThermoSummary,
};

fn parse_chamber(name: &str) -> PyResult<Chamber> {
    match name.to_ascii_lowercase().as_str() {
        "left" => Ok(Chamber::Left),
        "right" => Ok(Chamber::Right),
        other => Err(PyValueError::new_err(format!(
            "slow_chamber must be 'left' or 'right', got '{other}'"
        ))),
    }
}

fn kind_name(kind: ParticleKind) -> &'static str {
    match kind {
        ParticleKind::Slow => "slow",
        ParticleKind::Fast => "fast",
    }
}

fn chamber_name(chamber: Chamber) -> &'static str {
    match chamber {
        Chamber::Left => "left",
        Chamber::Right => "right",
    }
}

// ─── Dict conversions ───────────────────────────────────────────────

fn summary_to_dict<'py>(py: Python<'py>, s: &ThermoSummary) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("system_entropy", s.system_entropy)?;
    dict.set_item("left_entropy", s.left_entropy)?;
    dict.set_item("right_entropy", s.right_entropy)?;
    dict.set_item("demon_entropy", s.demon_entropy)?;
    dict.set_item("demon_budget", s.demon_budget)?;
    dict.set_item("combined_gauge_fraction", s.combined_gauge_fraction())?;
    dict.set_item("system_temperature", s.system_temperature)?;
    dict.set_item("left_temperature", s.left_temperature)?;
    dict.set_item("right_temperature", s.right_temperature)?;
    dict.set_item("total_energy", s.total_energy)?;
    dict.set_item("left_energy", s.left_energy)?;
    dict.set_item("right_energy", s.right_energy)?;
    Ok(dict)
}

fn snapshot_to_dict<'py>(py: Python<'py>, snap: &Snapshot) -> PyResult<Bound<'py, PyDict>> {
    let particles = snap
        .particles
        .iter()
        .map(|p| {
            let d = PyDict::new(py);
            d.set_item("x", p.x)?;
            d.set_item("y", p.y)?;
            d.set_item("vx", p.vx)?;
            d.set_item("vy", p.vy)?;
            d.set_item("speed", p.speed)?;
            d.set_item("direction", p.direction)?;
            d.set_item("radius", p.radius)?;
            d.set_item("kind", kind_name(p.kind))?;
            Ok(d)
        })
        .collect::<PyResult<Vec<_>>>()?;

    let counts = PyDict::new(py);
    counts.set_item("left_slow", snap.counts.left_slow)?;
    counts.set_item("left_fast", snap.counts.left_fast)?;
    counts.set_item("right_slow", snap.counts.right_slow)?;
    counts.set_item("right_fast", snap.counts.right_fast)?;

    let dict = PyDict::new(py);
    dict.set_item("tick", snap.tick)?;
    dict.set_item("particles", particles)?;
    dict.set_item("door_open", snap.door_open)?;
    dict.set_item("door_band", (snap.door_top, snap.door_bottom))?;
    dict.set_item("perfect_mode", snap.perfect_mode)?;
    dict.set_item("counts", counts)?;
    dict.set_item("summary", summary_to_dict(py, &snap.summary)?)?;
    Ok(dict)
}

fn event_to_dict<'py>(py: Python<'py>, event: &SimulationEvent) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("tick", event.tick())?;
    match *event {
        SimulationEvent::Collision { a, b, .. } => {
            dict.set_item("type", "collision")?;
            dict.set_item("a", a)?;
            dict.set_item("b", b)?;
        }
        SimulationEvent::DoorHit { particle, .. } => {
            dict.set_item("type", "door_hit")?;
            dict.set_item("particle", particle)?;
        }
        SimulationEvent::DoorTransition { open, .. } => {
            dict.set_item("type", "door_transition")?;
            dict.set_item("open", open)?;
        }
        SimulationEvent::CrossingCharged { particle, .. } => {
            dict.set_item("type", "crossing_charged")?;
            dict.set_item("particle", particle)?;
        }
    }
    Ok(dict)
}

fn report_to_dict<'py>(py: Python<'py>, report: &TickReport) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("tick", report.tick)?;
    dict.set_item("collisions", report.collisions)?;
    dict.set_item("door_hits", report.door_hits)?;
    dict.set_item("crossing_charges", report.crossing_charges)?;
    dict.set_item("door_transition", report.door_transition)?;
    dict.set_item("entropy_charged", report.entropy_charged)?;
    Ok(dict)
}

fn curve_to_dict<'py>(py: Python<'py>, curve: &MultiplicityCurve) -> PyResult<Bound<'py, PyDict>> {
    let points: Vec<(usize, usize, f64)> = curve
        .points
        .iter()
        .map(|p| (p.slow_left, p.fast_left, p.entropy))
        .collect();
    let dict = PyDict::new(py);
    dict.set_item("points", points)?;
    dict.set_item("current_slow_left", curve.current_slow_left)?;
    dict.set_item("current_entropy", curve.current_entropy)?;
    dict.set_item("current_index", curve.current_index)?;
    Ok(dict)
}

// ─── PySimulationConfig ─────────────────────────────────────────────

/// Python-visible simulation configuration.
#[pyclass(name = "SimulationConfig")]
#[derive(Clone)]
struct PySimulationConfig {
    inner: SimulationConfig,
}

#[pymethods]
impl PySimulationConfig {
    #[new]
    #[pyo3(signature = (
        width = 800.0,
        height = 600.0,
        blue_count = 10,
        red_count = 5,
        particle_radius = 10.0,
        speed_threshold = 3.5,
        speed_multiplier = 1.0,
        perfect_mode = false,
        slow_chamber = "left",
        landauer_cost = 0.693,
        charge_door_hits = true,
        history_capacity = 300,
        seed = None,
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        width: f64,
        height: f64,
        blue_count: usize,
        red_count: usize,
        particle_radius: f64,
        speed_threshold: f64,
        speed_multiplier: f64,
        perfect_mode: bool,
        slow_chamber: &str,
        landauer_cost: f64,
        charge_door_hits: bool,
        history_capacity: usize,
        seed: Option<u64>,
    ) -> PyResult<Self> {
        let config = SimulationConfig {
            width,
            height,
            blue_count,
            red_count,
            particle_radius,
            speed_threshold,
            speed_multiplier,
            perfect_mode,
            slow_chamber: parse_chamber(slow_chamber)?,
            landauer_cost,
            charge_door_hits,
            history_capacity,
            seed,
            ..Default::default()
        };
        config
            .validate()
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(Self { inner: config })
    }

    /// Construct from JSON string. Missing fields take their defaults.
    #[staticmethod]
    fn from_json(json: &str) -> PyResult<Self> {
        let config =
            SimulationConfig::from_json(json).map_err(|e| PyValueError::new_err(e.to_string()))?;
        config
            .validate()
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(Self { inner: config })
    }

    fn to_json(&self) -> PyResult<String> {
        self.inner
            .to_json()
            .map_err(|e| PyValueError::new_err(e.to_string()))
    }

    #[getter]
    fn blue_count(&self) -> usize {
        self.inner.blue_count
    }

    #[getter]
    fn red_count(&self) -> usize {
        self.inner.red_count
    }

    #[getter]
    fn slow_chamber(&self) -> &'static str {
        chamber_name(self.inner.slow_chamber)
    }

    fn __repr__(&self) -> String {
        format!(
            "SimulationConfig(blue={}, red={}, radius={}, threshold={}, perfect_mode={})",
            self.inner.blue_count,
            self.inner.red_count,
            self.inner.particle_radius,
            self.inner.speed_threshold,
            self.inner.perfect_mode
        )
    }
}

// ─── PySimulation ───────────────────────────────────────────────────

/// Python-visible simulation clock.
#[pyclass(name = "Simulation")]
struct PySimulation {
    inner: SimulationClock,
}

#[pymethods]
impl PySimulation {
    #[new]
    #[pyo3(signature = (config = None))]
    fn new(config: Option<PySimulationConfig>) -> Self {
        let cfg = config.map(|c| c.inner).unwrap_or_default();
        Self {
            inner: SimulationClock::new(cfg),
        }
    }

    #[staticmethod]
    fn from_json(json: &str) -> PyResult<Self> {
        let config = PySimulationConfig::from_json(json)?;
        Ok(Self::new(Some(config)))
    }

    /// Advance one tick. Returns the tick report as a dict.
    fn tick<'py>(&mut self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let report = self.inner.tick();
        report_to_dict(py, &report)
    }

    /// Advance `ticks` ticks. Returns the combined report.
    fn run<'py>(&mut self, py: Python<'py>, ticks: u64) -> PyResult<Bound<'py, PyDict>> {
        let report = self.inner.run(ticks);
        report_to_dict(py, &report)
    }

    /// Flip the door. Returns False (and does nothing) in perfect mode.
    fn toggle_door(&mut self) -> bool {
        self.inner.toggle_door()
    }

    fn set_door_open(&mut self, open: bool) -> bool {
        self.inner.set_door_open(open)
    }

    fn set_perfect_mode(&mut self, enabled: bool) {
        self.inner.set_perfect_mode(enabled);
    }

    /// Replace population, ledger, and history.
    fn reconfigure(&mut self, config: PySimulationConfig) {
        self.inner.reconfigure(config.inner);
    }

    fn resize(&mut self, width: f64, height: f64) {
        self.inner.resize(width, height);
    }

    fn snapshot<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        snapshot_to_dict(py, &self.inner.snapshot())
    }

    fn summary<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        summary_to_dict(py, self.inner.summary())
    }

    /// Rolling series: `{"entropy": [(tick, system, demon)],
    /// "temperature": [(tick, left, right)]}`.
    fn history<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let history = self.inner.history();
        let entropy: Vec<(u64, f64, f64)> = history
            .entropy()
            .map(|p| (p.tick, p.system, p.demon))
            .collect();
        let temperature: Vec<(u64, f64, f64)> = history
            .temperature()
            .map(|p| (p.tick, p.left, p.right))
            .collect();
        let dict = PyDict::new(py);
        dict.set_item("entropy", entropy)?;
        dict.set_item("temperature", temperature)?;
        Ok(dict)
    }

    fn multiplicity<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        curve_to_dict(py, &self.inner.multiplicity())
    }

    /// Call `callback(event_dict)` for every subsequent event.
    fn subscribe(&mut self, callback: PyObject) {
        let sink = CallbackSink::new(move |event| {
            Python::with_gil(|py| {
                let result = event_to_dict(py, event).and_then(|d| callback.call1(py, (d,)));
                if let Err(e) = result {
                    log::warn!("event subscriber raised: {e}");
                }
            })
        });
        self.inner.subscribe(Arc::new(sink));
    }

    /// Events produced by the most recent tick.
    fn last_events<'py>(&self, py: Python<'py>) -> PyResult<Vec<Bound<'py, PyDict>>> {
        self.inner
            .last_events()
            .iter()
            .map(|e| event_to_dict(py, e))
            .collect()
    }

    #[getter]
    fn tick_count(&self) -> u64 {
        self.inner.tick_count()
    }

    #[getter]
    fn door_open(&self) -> bool {
        self.inner.door_open()
    }

    #[getter]
    fn perfect_mode(&self) -> bool {
        self.inner.perfect_mode()
    }

    #[getter]
    fn system_entropy(&self) -> f64 {
        self.inner.summary().system_entropy
    }

    #[getter]
    fn demon_entropy(&self) -> f64 {
        self.inner.summary().demon_entropy
    }

    #[getter]
    fn demon_budget(&self) -> f64 {
        self.inner.summary().demon_budget
    }

    #[getter]
    fn system_temperature(&self) -> f64 {
        self.inner.summary().system_temperature
    }

    #[getter]
    fn left_temperature(&self) -> f64 {
        self.inner.summary().left_temperature
    }

    #[getter]
    fn right_temperature(&self) -> f64 {
        self.inner.summary().right_temperature
    }

    #[getter]
    fn total_energy(&self) -> f64 {
        self.inner.summary().total_energy
    }

    #[getter]
    fn total_energy_ev(&self) -> f64 {
        self.inner.total_energy_ev()
    }

    fn __repr__(&self) -> String {
        let s = self.inner.summary();
        format!(
            "Simulation(tick={}, particles={}, door_open={}, S_sys={:.3}, S_demon={:.3}/{:.3})",
            self.inner.tick_count(),
            self.inner.particles().len(),
            self.inner.door_open(),
            s.system_entropy,
            s.demon_entropy,
            s.demon_budget
        )
    }
}

// ─── Entropy functions ──────────────────────────────────────────────

#[pyfunction]
fn log_factorial(n: f64) -> f64 {
    entropy::log_factorial(n)
}

#[pyfunction]
fn combinatorial_entropy(k: f64, b: f64) -> f64 {
    entropy::combinatorial_entropy(k, b)
}

#[pyfunction]
fn spatial_entropy(n: f64, k: f64, b: f64) -> f64 {
    entropy::spatial_entropy(n, k, b)
}

#[pyfunction]
fn chamber_entropy(n: f64, k: f64, b: f64) -> f64 {
    entropy::chamber_entropy(n, k, b)
}

#[pyfunction]
fn maximum_entropy(k: usize) -> f64 {
    entropy::maximum_entropy(k)
}

#[pyfunction]
fn microstate_count(width: f64, height: f64, radius: f64) -> f64 {
    entropy::microstate_count(width, height, radius)
}

#[pyfunction]
#[pyo3(signature = (n, total_slow, total_fast, current_slow_left = 0))]
fn multiplicity_curve<'py>(
    py: Python<'py>,
    n: f64,
    total_slow: usize,
    total_fast: usize,
    current_slow_left: usize,
) -> PyResult<Bound<'py, PyDict>> {
    let curve =
        demon_observers::multiplicity_curve(n, total_slow, total_fast, current_slow_left);
    curve_to_dict(py, &curve)
}

#[pymodule]
fn demon_kernel(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Simulation
    m.add_class::<PySimulationConfig>()?;
    m.add_class::<PySimulation>()?;
    // Entropy model
    m.add_function(wrap_pyfunction!(log_factorial, m)?)?;
    m.add_function(wrap_pyfunction!(combinatorial_entropy, m)?)?;
    m.add_function(wrap_pyfunction!(spatial_entropy, m)?)?;
    m.add_function(wrap_pyfunction!(chamber_entropy, m)?)?;
    m.add_function(wrap_pyfunction!(maximum_entropy, m)?)?;
    m.add_function(wrap_pyfunction!(microstate_count, m)?)?;
    m.add_function(wrap_pyfunction!(multiplicity_curve, m)?)?;
    Ok(())
}
