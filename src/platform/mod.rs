//! Platform abstraction layer
//!
//! Handles native/browser differences for:
//! - Time (monotonic game clock)
//! - Input sampling
//! - Logging setup

use std::cell::Cell;

use crate::Millis;
use crate::sim::TickInput;

/// Monotonic clock driving all interval gating
pub trait Clock {
    fn now(&self) -> Millis;
}

/// Wall clock, measured from construction
#[derive(Debug, Clone)]
pub struct SystemClock {
    #[cfg(not(target_arch = "wasm32"))]
    start: std::time::Instant,
    #[cfg(target_arch = "wasm32")]
    start: f64,
}

impl SystemClock {
    #[cfg(not(target_arch = "wasm32"))]
    pub fn new() -> Self {
        Self {
            start: std::time::Instant::now(),
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn new() -> Self {
        Self {
            start: performance_now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
fn performance_now() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

impl Clock for SystemClock {
    #[cfg(not(target_arch = "wasm32"))]
    fn now(&self) -> Millis {
        self.start.elapsed().as_millis() as Millis
    }

    #[cfg(target_arch = "wasm32")]
    fn now(&self) -> Millis {
        (performance_now() - self.start).max(0.0) as Millis
    }
}

/// Hand-advanced clock for tests and headless runs
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Millis>,
}

impl ManualClock {
    pub fn new(start: Millis) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    pub fn advance(&self, ms: Millis) {
        self.now.set(self.now.get() + ms);
    }

    /// Move to `ms`; never goes backwards
    pub fn set(&self, ms: Millis) {
        self.now.set(self.now.get().max(ms));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Millis {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Millis {
        (**self).now()
    }
}

/// Source of the two input signals. Sampled once per tick.
pub trait InputSource {
    /// Continuous pointer height, if the pointer is over the field
    fn pointer_y(&self) -> Option<f32>;
    /// Edge-triggered: true at most once per press
    fn action_pressed(&mut self) -> bool;

    fn sample(&mut self) -> TickInput {
        TickInput {
            pointer_y: self.pointer_y(),
            action: self.action_pressed(),
        }
    }
}

/// Input fed by platform event handlers. The latest pointer sample wins and
/// a press is latched until the next tick consumes it.
#[derive(Debug, Clone, Default)]
pub struct LatchedInput {
    pointer_y: Option<f32>,
    pressed: bool,
}

impl LatchedInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_pointer(&mut self, y: f32) {
        self.pointer_y = Some(y);
    }

    pub fn clear_pointer(&mut self) {
        self.pointer_y = None;
    }

    pub fn press(&mut self) {
        self.pressed = true;
    }
}

impl InputSource for LatchedInput {
    fn pointer_y(&self) -> Option<f32> {
        self.pointer_y
    }

    fn action_pressed(&mut self) -> bool {
        std::mem::take(&mut self.pressed)
    }
}

/// Install the logger for this platform. Safe to call more than once.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

/// Install the logger for this platform. Safe to call more than once.
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}
