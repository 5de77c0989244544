use std::time::{Duration, Instant};

/// Frame timing snapshot handed to scene updates.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameTime {
    /// Time since the previous tick, in seconds (clamped).
    pub dt: f32,

    /// Sum of every `dt` handed out so far, in seconds.
    pub elapsed: f32,

    /// Monotonic frame counter, starting at 0.
    pub frame_index: u64,
}

impl FrameTime {
    /// Snapshot for a fixed-step update, independent of wall time.
    pub fn fixed(dt: f32, frame_index: u64) -> Self {
        Self {
            dt,
            elapsed: dt * frame_index as f32,
            frame_index,
        }
    }
}

/// Frame clock producing `FrameTime` snapshots.
///
/// One clock per render loop. Delta time is clamped so a debugger pause or a minimized
/// window does not feed a huge step into scene updates.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    elapsed: f32,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Clock clamped to `[100µs, 250ms]` per tick.
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: Instant::now(),
            elapsed: 0.0,
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Resets the tick baseline without touching `elapsed` or the frame counter.
    ///
    /// Call after the loop was suspended so the next `dt` does not include the gap.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let dt = now.saturating_duration_since(self.last).clamp(self.dt_min, self.dt_max);
        self.last = now;

        let dt = dt.as_secs_f32();
        self.elapsed += dt;

        let ft = FrameTime {
            dt,
            elapsed: self.elapsed,
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_index_counts_from_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick().frame_index, 0);
        assert_eq!(clock.tick().frame_index, 1);
        assert_eq!(clock.tick().frame_index, 2);
    }

    #[test]
    fn dt_respects_clamps() {
        let min = Duration::from_millis(5);
        let max = Duration::from_millis(10);
        let mut clock = FrameClock::with_clamps(min, max);

        let ft = clock.tick();
        assert!(ft.dt >= min.as_secs_f32() - f32::EPSILON);
        assert!(ft.dt <= max.as_secs_f32() + f32::EPSILON);
    }

    #[test]
    fn elapsed_accumulates_dt() {
        let mut clock = FrameClock::new();
        let a = clock.tick();
        let b = clock.tick();
        assert!((b.elapsed - (a.dt + b.dt)).abs() < 1e-6);
    }

    #[test]
    fn fixed_step_snapshot() {
        let ft = FrameTime::fixed(0.5, 4);
        assert_eq!(ft.elapsed, 2.0);
        assert_eq!(ft.frame_index, 4);
    }
}
