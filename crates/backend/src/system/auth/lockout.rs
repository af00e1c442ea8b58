use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Failed attempts allowed before the first lockout
pub const FREE_ATTEMPTS: u32 = 3;

/// Lockout length after the 3rd, 4th, ... failure; the last step repeats
const LOCKOUT_STEPS_SECS: &[u64] = &[10, 15, 30, 60, 120, 180];

/// A client with no failure for this long, and no active lockout, starts over
pub const FORGET_AFTER: Duration = Duration::from_secs(15 * 60);

#[derive(Debug, Clone, Copy)]
struct Attempts {
    failures: u32,
    last_failure: Instant,
    locked_until: Option<Instant>,
}

impl Attempts {
    fn is_stale(&self, now: Instant) -> bool {
        let unlocked = self.locked_until.map_or(true, |until| until <= now);
        unlocked && now.saturating_duration_since(self.last_failure) >= FORGET_AFTER
    }
}

/// Escalating sign-in lockout per client
#[derive(Debug, Default)]
pub struct LockoutTracker {
    clients: HashMap<String, Attempts>,
}

/// Lockout imposed after `failures` consecutive failures
pub fn lockout_for(failures: u32) -> Option<Duration> {
    if failures < FREE_ATTEMPTS {
        return None;
    }
    let step = ((failures - FREE_ATTEMPTS) as usize).min(LOCKOUT_STEPS_SECS.len() - 1);
    Some(Duration::from_secs(LOCKOUT_STEPS_SECS[step]))
}

impl LockoutTracker {
    /// `Err(remaining)` while the client is locked out
    pub fn check(&self, client: &str, now: Instant) -> Result<(), Duration> {
        match self.clients.get(client).and_then(|a| a.locked_until) {
            Some(until) if until > now => Err(until - now),
            _ => Ok(()),
        }
    }

    /// Count a failure; returns the lockout it triggered, if any.
    /// Stale clients are dropped first.
    pub fn record_failure(&mut self, client: &str, now: Instant) -> Option<Duration> {
        self.clients.retain(|_, attempts| !attempts.is_stale(now));

        let attempts = self.clients.entry(client.to_string()).or_insert(Attempts {
            failures: 0,
            last_failure: now,
            locked_until: None,
        });
        attempts.failures += 1;
        attempts.last_failure = now;
        let lockout = lockout_for(attempts.failures);
        attempts.locked_until = lockout.map(|d| now + d);
        lockout
    }

    pub fn record_success(&mut self, client: &str) {
        self.clients.remove(client);
    }

    pub fn tracked_clients(&self) -> usize {
        self.clients.len()
    }
}
