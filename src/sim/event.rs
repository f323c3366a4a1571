use super::runner::Sample;

// ---------------------------------------------------------------------------
// Simulation events
// ---------------------------------------------------------------------------

/// Kinds of simulation events.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    SaturationReached { wheel: usize },
    DischargeStarted { wheel: usize },
    DischargeFinished { wheel: usize },
    Custom(String),
}

/// A discrete event that occurred during simulation.
#[derive(Debug, Clone)]
pub struct SimEvent {
    pub time: f64,
    pub kind: EventKind,
}

/// Trait for passive event detectors.
/// Implementations inspect consecutive samples and report events.
pub trait EventDetector {
    fn check(&mut self, prev: &Sample, current: &Sample) -> Option<EventKind>;
}

/// Run every detector over consecutive sample pairs.
pub fn detect_events(samples: &[Sample], detectors: &mut [&mut dyn EventDetector]) -> Vec<SimEvent> {
    let mut events = Vec::new();
    for pair in samples.windows(2) {
        for det in detectors.iter_mut() {
            if let Some(kind) = det.check(&pair[0], &pair[1]) {
                events.push(SimEvent { time: pair[1].state.time, kind });
            }
        }
    }
    events
}

/// Fires once per wheel when any axis crosses `threshold` (fraction of the limit).
pub struct SaturationDetector {
    pub threshold: f64,
    fired: Vec<bool>,
}

impl SaturationDetector {
    pub fn new(threshold: f64) -> Self {
        Self { threshold, fired: Vec::new() }
    }
}

impl EventDetector for SaturationDetector {
    fn check(&mut self, prev: &Sample, current: &Sample) -> Option<EventKind> {
        if self.fired.len() < current.wheels.len() {
            self.fired.resize(current.wheels.len(), false);
        }
        for (idx, (before, now)) in prev.wheels.iter().zip(&current.wheels).enumerate() {
            if !self.fired[idx]
                && before.saturation.max() < self.threshold
                && now.saturation.max() >= self.threshold
            {
                self.fired[idx] = true;
                return Some(EventKind::SaturationReached { wheel: idx });
            }
        }
        None
    }
}

/// Reports discharge engage and disengage edges.
pub struct DischargeDetector;

impl EventDetector for DischargeDetector {
    fn check(&mut self, prev: &Sample, current: &Sample) -> Option<EventKind> {
        prev.wheels
            .iter()
            .zip(&current.wheels)
            .enumerate()
            .find_map(|(idx, (before, now))| match (before.discharge_engaged, now.discharge_engaged) {
                (false, true) => Some(EventKind::DischargeStarted { wheel: idx }),
                (true, false) => Some(EventKind::DischargeFinished { wheel: idx }),
                _ => None,
            })
    }
}
