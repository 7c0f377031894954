/// Simulation clock.
///
/// Time only moves forward, and only when the owner of the game loop says so.
/// Deferred actions (explosion → destroy, cooldown release) store an absolute
/// deadline on this clock instead of registering callbacks.

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SimClock {
    now: f64,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds of simulated time since the clock was created.
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Advance by `dt` seconds and return the new time.  Negative or NaN
    /// steps are ignored so the clock stays monotonic.
    pub fn advance(&mut self, dt: f32) -> f64 {
        if dt > 0.0 {
            self.now += f64::from(dt);
        }
        self.now
    }
}

/// True once `now` has reached `deadline`.
pub fn is_due(deadline: Option<f64>, now: f64) -> bool {
    deadline.map(|at| now >= at).unwrap_or(false)
}
