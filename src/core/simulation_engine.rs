use super::config::{ClockMode, SimulationConfig};
use super::dispatcher::{Dispatcher, DrainOutcome};
use super::errors::WorkshopError;
use super::event_scheduler::EventScheduler;
use super::models::Assignment;
use super::scenario::RunSource;
use super::specialty::Specialty;
use super::statistics::StatisticsSnapshot;
use super::types::{MechanicId, SimTime};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Observer trait for simulation events
pub trait SimulationObserver {
    /// Called when simulated time advances
    fn on_time_advance(&mut self, _old_time: SimTime, _new_time: SimTime) {}

    /// Called when a job is handed to a mechanic
    fn on_assignment(&mut self, _assignment: &Assignment) {}

    /// Called when a job finishes; `vehicle_attended` is true for the vehicle's last job
    fn on_completion(&mut self, _assignment: &Assignment, _vehicle_attended: bool) {}

    /// Called when the hiring policy adds a mechanic
    fn on_hire(&mut self, _mechanic: MechanicId, _specialty: Specialty) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    Initialized,
    Running,
    Completed,
}

/// Why a run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// Queue empty and nothing in service
    Drained,
    /// The configured time limit was reached
    TimeLimit,
    /// Jobs queued that no mechanic can ever take
    Stalled,
}

/// Outcome of a completed run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub scenario: String,
    pub statistics: StatisticsSnapshot,
    /// Wall-clock time spent running
    pub elapsed: Duration,
    /// Simulated time when the run stopped
    pub simulated_time: SimTime,
    pub initial_roster: usize,
    pub final_pool_size: usize,
    pub stop_reason: StopReason,
}

/// Message from a real-time service thread back to the engine
struct Completion {
    assignment: Assignment,
    vehicle_attended: bool,
}

fn lock(dispatcher: &Mutex<Dispatcher>) -> MutexGuard<'_, Dispatcher> {
    dispatcher.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct SimulationEngine {
    run_id: Uuid,
    scenario: String,
    config: SimulationConfig,
    dispatcher: Arc<Mutex<Dispatcher>>,
    state: EngineState,
    current_time: SimTime,
    observers: Vec<Box<dyn SimulationObserver>>,
}

impl SimulationEngine {
    /// Resolve `source` into a roster and a queue of jobs.
    ///
    /// All configuration errors surface here; a constructed engine always runs.
    pub fn new(source: RunSource<'_>, config: SimulationConfig) -> Result<Self, WorkshopError> {
        config.validate()?;

        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut resolved = source.resolve(&config, &mut rng)?;
        resolved.vehicles.sort_by_key(|vehicle| vehicle.arrival);

        let mut dispatcher = Dispatcher::new(resolved.roster, resolved.vehicles.len(), config.hiring);
        for vehicle in &resolved.vehicles {
            dispatcher.admit(vehicle, 0);
        }

        let run_id = Uuid::new_v4();
        debug!(
            "[run {}] '{}' initialized: {} mechanics, {} vehicles, {} jobs",
            run_id,
            resolved.name,
            dispatcher.pool().size(),
            resolved.vehicles.len(),
            dispatcher.queue().len()
        );

        Ok(Self {
            run_id,
            scenario: resolved.name,
            config,
            dispatcher: Arc::new(Mutex::new(dispatcher)),
            state: EngineState::Initialized,
            current_time: 0,
            observers: Vec::new(),
        })
    }

    /// Add an observer to the simulation
    pub fn add_observer(&mut self, observer: Box<dyn SimulationObserver>) {
        self.observers.push(observer);
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Get current simulation time
    pub fn current_time(&self) -> SimTime {
        self.current_time
    }

    pub fn pool_size(&self) -> usize {
        lock(&self.dispatcher).pool().size()
    }

    pub fn queued_jobs(&self) -> usize {
        lock(&self.dispatcher).queue().len()
    }

    /// Run until every job is done, the time limit is hit, or the queue stalls.
    pub fn run(&mut self) -> Result<RunReport, WorkshopError> {
        if self.state != EngineState::Initialized {
            return Err(WorkshopError::InvalidState(format!(
                "run requested in state {:?}",
                self.state
            )));
        }
        self.state = EngineState::Running;
        info!("[run {}] Starting scenario '{}'", self.run_id, self.scenario);

        let started = Instant::now();
        let stop_reason = match self.config.clock {
            ClockMode::Simulated => self.run_simulated(),
            ClockMode::RealTime { unit } => self.run_real_time(unit),
        };
        let elapsed = started.elapsed();

        let dispatcher = lock(&self.dispatcher);
        let statistics = dispatcher.snapshot(self.current_time);
        let report = RunReport {
            run_id: self.run_id,
            scenario: self.scenario.clone(),
            elapsed,
            simulated_time: self.current_time,
            initial_roster: dispatcher.pool().initial_size(),
            final_pool_size: dispatcher.pool().size(),
            stop_reason,
            statistics,
        };
        drop(dispatcher);
        self.state = EngineState::Completed;

        info!(
            "[run {}] '{}' finished ({:?}) at t={}: {}/{} vehicles attended, {} hired, {:?} elapsed",
            report.run_id,
            report.scenario,
            report.stop_reason,
            report.simulated_time,
            report.statistics.attended_vehicles,
            report.statistics.total_vehicles,
            report.statistics.mechanics_hired,
            report.elapsed
        );
        Ok(report)
    }

    fn notify_drain(&mut self, outcome: &DrainOutcome) {
        for observer in &mut self.observers {
            for (mechanic, specialty) in &outcome.hires {
                observer.on_hire(*mechanic, *specialty);
            }
            for assignment in &outcome.assignments {
                observer.on_assignment(assignment);
            }
        }
    }

    fn notify_time_advance(&mut self, old_time: SimTime, new_time: SimTime) {
        for observer in &mut self.observers {
            observer.on_time_advance(old_time, new_time);
        }
    }

    fn notify_completion(&mut self, assignment: &Assignment, vehicle_attended: bool) {
        for observer in &mut self.observers {
            observer.on_completion(assignment, vehicle_attended);
        }
    }

    /// Classify a run that has nothing left in service
    fn idle_stop_reason(&self) -> StopReason {
        if lock(&self.dispatcher).queue().is_empty() {
            StopReason::Drained
        } else {
            warn!(
                "[run {}] Stalled at t={} with {} jobs no mechanic can take",
                self.run_id,
                self.current_time,
                self.queued_jobs()
            );
            StopReason::Stalled
        }
    }

    /// Discrete-event loop: drain, then jump to the next completion time.
    fn run_simulated(&mut self) -> StopReason {
        let mut scheduler = EventScheduler::new();

        loop {
            let outcome = lock(&self.dispatcher).drain(self.current_time);
            self.notify_drain(&outcome);
            for assignment in outcome.assignments {
                scheduler.schedule_completion(assignment);
            }

            let Some(next_delay) = scheduler.peek_next_delay() else {
                return self.idle_stop_reason();
            };

            if let Some(limit) = self.config.time_limit {
                if self.current_time.saturating_add(next_delay) > limit {
                    let old_time = self.current_time;
                    self.current_time = limit.max(self.current_time);
                    if old_time != self.current_time {
                        self.notify_time_advance(old_time, self.current_time);
                    }
                    warn!(
                        "[run {}] Time limit {} reached with {} jobs in service",
                        self.run_id,
                        limit,
                        scheduler.len()
                    );
                    return StopReason::TimeLimit;
                }
            }

            scheduler.advance_time(next_delay);
            let old_time = self.current_time;
            self.current_time = self.current_time.saturating_add(next_delay);
            if old_time != self.current_time {
                self.notify_time_advance(old_time, self.current_time);
            }
            debug!("=== Simulation Time {} ===", self.current_time);

            for assignment in scheduler.get_next_time_events() {
                let attended = lock(&self.dispatcher).complete(&assignment, self.current_time);
                self.notify_completion(&assignment, attended);
            }
        }
    }

    /// Wall-clock loop: every job sleeps on its own thread and reports back
    /// over a channel. Drains and completions share the dispatcher mutex, so a
    /// completion that lands mid-drain is recorded after that drain and picked
    /// up by the next one.
    fn run_real_time(&mut self, unit: Duration) -> StopReason {
        let (tx, rx) = mpsc::channel::<Completion>();
        let cancelled = Arc::new(AtomicBool::new(false));
        let started = Instant::now();
        let deadline = self
            .config
            .time_limit
            .and_then(|limit| started.checked_add(scale(unit, limit)));
        let mut outstanding = 0usize;

        let reason = loop {
            let now = (started.elapsed().as_nanos() / unit.as_nanos().max(1)) as SimTime;
            let outcome = lock(&self.dispatcher).drain(now);
            self.notify_drain(&outcome);
            for assignment in outcome.assignments {
                outstanding += 1;
                self.spawn_service(assignment, unit, tx.clone(), Arc::clone(&cancelled));
            }

            if outstanding == 0 {
                break self.idle_stop_reason();
            }

            let received = match deadline {
                Some(deadline) => {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    rx.recv_timeout(remaining)
                }
                None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
            };

            match received {
                Ok(completion) => {
                    outstanding -= 1;
                    let finished = completion.assignment.finishes_at();
                    if finished > self.current_time {
                        let old_time = self.current_time;
                        self.current_time = finished;
                        self.notify_time_advance(old_time, finished);
                    }
                    self.notify_completion(&completion.assignment, completion.vehicle_attended);
                }
                Err(RecvTimeoutError::Timeout) => {
                    let limit = self.config.time_limit.unwrap_or(self.current_time);
                    warn!(
                        "[run {}] Time limit {} reached with {} jobs in service",
                        self.run_id, limit, outstanding
                    );
                    self.current_time = self.current_time.max(limit);
                    break StopReason::TimeLimit;
                }
                Err(RecvTimeoutError::Disconnected) => {
                    warn!("[run {}] Service threads disconnected", self.run_id);
                    break self.idle_stop_reason();
                }
            }
        };

        // Threads still sleeping see the flag under the lock and drop their result.
        let _guard = lock(&self.dispatcher);
        cancelled.store(true, Ordering::SeqCst);
        reason
    }

    fn spawn_service(
        &self,
        assignment: Assignment,
        unit: Duration,
        tx: mpsc::Sender<Completion>,
        cancelled: Arc<AtomicBool>,
    ) {
        let dispatcher = Arc::clone(&self.dispatcher);
        thread::spawn(move || {
            thread::sleep(scale(unit, assignment.job.duration));
            let vehicle_attended = {
                let mut dispatcher = lock(&dispatcher);
                if cancelled.load(Ordering::SeqCst) {
                    return;
                }
                dispatcher.complete(&assignment, assignment.finishes_at())
            };
            let _ = tx.send(Completion {
                assignment,
                vehicle_attended,
            });
        });
    }
}

/// Wall-clock length of `units` simulated units
fn scale(unit: Duration, units: SimTime) -> Duration {
    Duration::from_nanos((unit.as_nanos() as u64).saturating_mul(units))
}

/// Build an engine for `source` and run it to completion.
pub fn run_simulation(
    source: RunSource<'_>,
    config: &SimulationConfig,
) -> Result<RunReport, WorkshopError> {
    SimulationEngine::new(source, config.clone())?.run()
}
