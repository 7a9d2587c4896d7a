//! Simulation engine.
//!
//! Owns two ping-pong [`BitField`] buffers selected by generation parity,
//! a snapshot for reset, and the observer registry. Each state-changing
//! operation triggers exactly one synchronous broadcast.

use std::time::{Duration, Instant};

use petri_field::BitField;
use tracing::{debug, info, instrument, trace};

use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::observer::{Observer, Observers, SharedObserver};

/// Engine lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Cells are edited directly; no clock is installed.
    Editing,
    /// A clock is installed and due ticks advance the generation.
    Running,
    /// The clock is cancelled; generation and buffers are frozen.
    Paused,
}

/// Double-buffered Game of Life simulation (B3/S23).
///
/// The active buffer is `buffers[generation % 2]`; the other slot holds
/// the prior generation and is the read-only source of the next tick.
/// Both buffers always share dimensions and wraparound flag.
pub struct Simulation {
    buffers: [BitField; 2],
    generation: u64,
    ups: f64,
    wrap_around: bool,
    /// Active buffer as of the most recent transition into Running.
    snapshot: BitField,
    /// Present exactly while Running.
    clock: Option<Clock>,
    state: RunState,
    observers: Observers<dyn Observer>,
}

impl Simulation {
    /// Create an engine over an all-dead grid of the given dimensions.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        let field = BitField::new(width, height)?;
        info!(width, height, "simulation created");
        Ok(Self {
            buffers: [field.clone(), field.clone()],
            generation: 0,
            ups: 1.0,
            wrap_around: false,
            snapshot: field,
            clock: None,
            state: RunState::Editing,
            observers: Observers::default(),
        })
    }

    /// Grid width in cells.
    pub fn width(&self) -> usize {
        self.buffers[0].width()
    }

    /// Grid height in cells.
    pub fn height(&self) -> usize {
        self.buffers[0].height()
    }

    /// Current generation number.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Configured tick rate in updates per second.
    pub fn ups(&self) -> f64 {
        self.ups
    }

    /// Whether neighbor counting treats the grid as toroidal.
    pub fn wrap_around(&self) -> bool {
        self.wrap_around
    }

    /// Current lifecycle state.
    pub fn run_state(&self) -> RunState {
        self.state
    }

    /// True while a clock is installed and ticks are due periodically.
    pub fn is_running(&self) -> bool {
        self.clock.is_some()
    }

    /// The active buffer, `buffers[generation % 2]`.
    pub fn grid(&self) -> &BitField {
        &self.buffers[self.active_slot()]
    }

    /// When the next tick comes due, while Running.
    pub fn next_tick_at(&self) -> Option<Instant> {
        self.clock.as_ref().map(Clock::next_deadline)
    }

    /// Register an observer; it is notified on every subsequent broadcast.
    pub fn register_observer(&mut self, observer: &SharedObserver) {
        self.observers.register(observer);
    }

    /// Remove an observer by identity; false if it was never registered.
    pub fn remove_observer(&mut self, observer: &SharedObserver) -> bool {
        self.observers.remove(observer)
    }

    /// Toggle one cell of the active buffer and broadcast.
    ///
    /// Permitted in every state. While Running, the edit lands in the
    /// generation the next tick overwrites.
    pub fn toggle_cell(&mut self, x: usize, y: usize) -> Result<()> {
        self.buffers[self.active_slot()].toggle(x, y)?;
        debug!(x, y, generation = self.generation, "cell toggled");
        self.broadcast_edit();
        Ok(())
    }

    /// Resize both buffers and the snapshot, preserving the overlap.
    ///
    /// Generation counter and wraparound flag are unchanged. Broadcasts
    /// even when the dimensions did not change.
    pub fn set_size(&mut self, width: usize, height: usize) -> Result<()> {
        self.buffers[0].resize(width, height)?;
        self.buffers[1].resize(width, height)?;
        self.snapshot.resize(width, height)?;
        debug!(width, height, "grid resized");
        self.broadcast_edit();
        Ok(())
    }

    /// Mirror the wraparound flag into both buffers.
    ///
    /// Takes effect at the next tick's neighbor counting.
    pub fn set_wrap_around(&mut self, wrap_around: bool) {
        self.wrap_around = wrap_around;
        self.buffers[0].set_wrap_around(wrap_around);
        self.buffers[1].set_wrap_around(wrap_around);
        debug!(wrap_around, "wraparound changed");
    }

    /// Change the tick rate.
    ///
    /// While Running, the clock is replaced in place: the pending deadline
    /// is discarded and a fresh interval starts now, so no tick is lost or
    /// duplicated by the swap.
    pub fn set_updates_per_second(&mut self, rate: f64) -> Result<()> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(Error::InvalidRate { rate });
        }
        self.ups = rate;
        if self.clock.is_some() {
            self.clock = Some(Clock::new(self.tick_interval(), Instant::now()));
        }
        debug!(rate, running = self.clock.is_some(), "tick rate changed");
        Ok(())
    }

    /// Begin periodic generation advances.
    ///
    /// Broadcasts once immediately so observers render the pre-simulation
    /// state, snapshots the active buffer for [`Simulation::reset`], and
    /// installs the clock. No-op while already Running.
    pub fn start(&mut self) {
        if self.state == RunState::Running {
            return;
        }
        self.broadcast_edit();
        self.snapshot = self.buffers[self.active_slot()].clone();
        self.clock = Some(Clock::new(self.tick_interval(), Instant::now()));
        self.state = RunState::Running;
        info!(generation = self.generation, ups = self.ups, "simulation started");
    }

    /// Cancel the clock, freezing generation and buffers as they are.
    ///
    /// No-op unless Running.
    pub fn pause(&mut self) {
        if self.state != RunState::Running {
            return;
        }
        self.clock = None;
        self.state = RunState::Paused;
        info!(generation = self.generation, "simulation paused");
    }

    /// Stop ticking and restore the snapshot at generation 0.
    ///
    /// Only slot 0 receives the snapshot; with the counter back at 0 that
    /// is the active slot, and the other slot is stale until the first
    /// tick rewrites it. The restored buffer picks up the current
    /// wraparound flag so both slots keep matching.
    pub fn reset(&mut self) {
        self.clock = None;
        self.generation = 0;
        let mut restored = self.snapshot.clone();
        restored.set_wrap_around(self.wrap_around);
        self.buffers[0] = restored;
        self.state = RunState::Editing;
        info!("simulation reset");
        self.broadcast_edit();
    }

    /// Advance the simulation by one generation.
    ///
    /// Returns the new generation number. The prior generation's buffer
    /// is read-only for the whole step and is broadcast as `previous`.
    #[instrument(skip(self), fields(generation = self.generation + 1))]
    pub fn tick(&mut self) -> Result<u64> {
        self.generation += 1;
        let dst_slot = self.active_slot();

        let (head, tail) = self.buffers.split_at_mut(1);
        let (dst, src) = if dst_slot == 0 {
            (&mut head[0], &tail[0])
        } else {
            (&mut tail[0], &head[0])
        };

        for y in 0..src.height() {
            for x in 0..src.width() {
                match src.neighbor_count(x, y)? {
                    // Underpopulation.
                    0 | 1 => dst.unset(x, y)?,
                    // Survival: keep whatever the source had.
                    2 => {
                        if src.get(x, y)? {
                            dst.set(x, y)?;
                        } else {
                            dst.unset(x, y)?;
                        }
                    }
                    // Birth and survival.
                    3 => dst.set(x, y)?,
                    // Overpopulation.
                    _ => dst.unset(x, y)?,
                }
            }
        }

        let current = &self.buffers[dst_slot];
        let previous = &self.buffers[dst_slot ^ 1];
        trace!(population = current.population(), "generation advanced");
        self.observers
            .notify_each(|observer| observer.notify(current, previous));
        Ok(self.generation)
    }

    /// Perform every tick due on the clock; returns how many ran.
    ///
    /// The host's event loop calls this between external events; it may
    /// sleep until [`Simulation::next_tick_at`] in between.
    pub fn pump(&mut self) -> Result<u64> {
        self.pump_at(Instant::now())
    }

    /// [`Simulation::pump`] against an explicit clock reading.
    pub fn pump_at(&mut self, now: Instant) -> Result<u64> {
        let due = match self.clock.as_mut() {
            Some(clock) => clock.advance(now),
            None => 0,
        };
        for _ in 0..due {
            self.tick()?;
        }
        if due > 0 {
            trace!(due, generation = self.generation, "pumped");
        }
        Ok(due)
    }

    fn active_slot(&self) -> usize {
        (self.generation % 2) as usize
    }

    fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.ups)
    }

    /// Broadcast a non-advance change: current and previous are the same
    /// buffer, since no prior generation was involved.
    fn broadcast_edit(&self) {
        let current = &self.buffers[self.active_slot()];
        self.observers
            .notify_each(|observer| observer.notify(current, current));
    }
}
