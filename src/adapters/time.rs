//! Monotonic uptime clock.
//!
//! - **`espidf`** wraps `esp_timer_get_time()` (microseconds since boot).
//! - **host** measures from the moment the clock was created with
//!   `std::time::Instant`.
//!
//! Only used to seed the random patterns when the config pins no seed.

/// Uptime clock.
pub struct Uptime {
    #[cfg(not(feature = "espidf"))]
    start: std::time::Instant,
}

impl Default for Uptime {
    fn default() -> Self {
        Self::new()
    }
}

impl Uptime {
    pub fn new() -> Self {
        Self {
            #[cfg(not(feature = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    /// Microseconds since boot.
    #[cfg(feature = "espidf")]
    pub fn micros(&self) -> u64 {
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64
    }

    /// Microseconds since this clock was created.
    #[cfg(not(feature = "espidf"))]
    pub fn micros(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }

    pub fn millis(&self) -> u64 {
        self.micros() / 1_000
    }

    /// A non-zero 32-bit seed folded from the current uptime.
    pub fn seed(&self) -> u32 {
        fold_seed(self.micros())
    }
}

fn fold_seed(us: u64) -> u32 {
    let mixed = us ^ (us >> 29) ^ 0x9E37_79B9;
    let seed = (mixed as u32) ^ ((mixed >> 32) as u32);
    if seed == 0 { 1 } else { seed }
}
