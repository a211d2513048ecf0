//! Synchronization primitives
//!
//! The counting barrier used by the static-striping strategy, and the start
//! gate that turns a failed worker spawn into a clean abort instead of a
//! barrier deadlock. Each primitive is one mutex plus one condition
//! variable with a single short critical section; neither exposes its
//! counters outside the abstraction.

use std::sync::{Condvar, Mutex};

#[derive(Debug)]
struct BarrierState {
    arrived: usize,
    generation: u64,
}

/// Reusable counting barrier for a fixed set of participants.
///
/// `arrive_and_wait` blocks every caller until all participants have
/// arrived; the last arriver resets the count and wakes the rest, so the
/// barrier is immediately ready for another round. Waiters key on a
/// generation counter rather than the arrival count, which keeps reuse safe
/// in the presence of spurious wakeups.
///
/// # Precondition
///
/// Every spawned participant calls `arrive_and_wait` exactly once per
/// round. If fewer than `participants` distinct callers ever arrive, the
/// rest wait forever; that is a fatal programming error by contract, not a
/// recoverable condition.
#[derive(Debug)]
pub struct CountingBarrier {
    state: Mutex<BarrierState>,
    cond: Condvar,
    participants: usize,
}

impl CountingBarrier {
    /// Barrier for `participants` callers.
    ///
    /// # Panics
    ///
    /// Panics if `participants` is zero.
    pub fn new(participants: usize) -> Self {
        assert!(participants > 0, "barrier needs at least one participant");
        Self {
            state: Mutex::new(BarrierState {
                arrived: 0,
                generation: 0,
            }),
            cond: Condvar::new(),
            participants,
        }
    }

    /// Block until every participant has arrived.
    ///
    /// Returns `true` for exactly one caller per round (the one that
    /// completed the barrier), mirroring the leader election of
    /// `std::sync::Barrier`.
    pub fn arrive_and_wait(&self) -> bool {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.arrived += 1;
        if state.arrived == self.participants {
            state.arrived = 0;
            state.generation = state.generation.wrapping_add(1);
            self.cond.notify_all();
            true
        } else {
            let generation = state.generation;
            while state.generation == generation {
                state = self
                    .cond
                    .wait(state)
                    .unwrap_or_else(|e| e.into_inner());
            }
            false
        }
    }

    /// Number of participants the barrier was built for.
    pub fn participants(&self) -> usize {
        self.participants
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GateState {
    Closed,
    Open,
    Aborted,
}

/// One-shot latch that parks workers until the coordinator releases them.
///
/// Workers call [`wait`](StartGate::wait) as their first action; the
/// coordinator calls [`open`](StartGate::open) once every spawn has
/// succeeded, or [`abort`](StartGate::abort) when one fails. Aborted
/// workers return before touching the barrier, so a partial spawn surfaces
/// as an error instead of a deadlock.
#[derive(Debug)]
pub struct StartGate {
    state: Mutex<GateState>,
    cond: Condvar,
}

impl StartGate {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(GateState::Closed),
            cond: Condvar::new(),
        }
    }

    /// Release all waiting workers to run.
    pub fn open(&self) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        *state = GateState::Open;
        self.cond.notify_all();
    }

    /// Release all waiting workers to exit without running.
    pub fn abort(&self) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        *state = GateState::Aborted;
        self.cond.notify_all();
    }

    /// Block until the gate resolves; `true` means run, `false` means exit.
    pub fn wait(&self) -> bool {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        while *state == GateState::Closed {
            state = self
                .cond
                .wait(state)
                .unwrap_or_else(|e| e.into_inner());
        }
        *state == GateState::Open
    }
}

impl Default for StartGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_barrier_single_participant_never_blocks() {
        let barrier = CountingBarrier::new(1);
        assert!(barrier.arrive_and_wait());
        assert!(barrier.arrive_and_wait()); // reusable
    }

    #[test]
    fn test_barrier_releases_all_participants() {
        let barrier = CountingBarrier::new(4);
        let passed = AtomicUsize::new(0);

        crossbeam::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|_| {
                    barrier.arrive_and_wait();
                    passed.fetch_add(1, Ordering::SeqCst);
                });
            }
        })
        .unwrap();

        assert_eq!(passed.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_barrier_elects_one_leader_per_round() {
        let barrier = CountingBarrier::new(3);
        let leaders = AtomicUsize::new(0);

        crossbeam::thread::scope(|s| {
            for _ in 0..3 {
                s.spawn(|_| {
                    if barrier.arrive_and_wait() {
                        leaders.fetch_add(1, Ordering::SeqCst);
                    }
                });
            }
        })
        .unwrap();

        assert_eq!(leaders.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_barrier_reusable_across_rounds() {
        let rounds = 5;
        let barrier = CountingBarrier::new(2);
        let checkpoints = AtomicUsize::new(0);

        crossbeam::thread::scope(|s| {
            for _ in 0..2 {
                s.spawn(|_| {
                    for _ in 0..rounds {
                        barrier.arrive_and_wait();
                        checkpoints.fetch_add(1, Ordering::SeqCst);
                    }
                });
            }
        })
        .unwrap();

        assert_eq!(checkpoints.load(Ordering::SeqCst), 2 * rounds);
    }

    #[test]
    #[should_panic(expected = "at least one participant")]
    fn test_barrier_zero_participants_panics() {
        CountingBarrier::new(0);
    }

    #[test]
    fn test_gate_open_releases_waiters() {
        let gate = StartGate::new();
        let released = AtomicUsize::new(0);

        crossbeam::thread::scope(|s| {
            for _ in 0..3 {
                s.spawn(|_| {
                    if gate.wait() {
                        released.fetch_add(1, Ordering::SeqCst);
                    }
                });
            }
            gate.open();
        })
        .unwrap();

        assert_eq!(released.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_gate_abort_stops_waiters() {
        let gate = StartGate::new();
        let ran = AtomicUsize::new(0);

        crossbeam::thread::scope(|s| {
            for _ in 0..3 {
                s.spawn(|_| {
                    if gate.wait() {
                        ran.fetch_add(1, Ordering::SeqCst);
                    }
                });
            }
            gate.abort();
        })
        .unwrap();

        assert_eq!(ran.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_gate_resolved_before_wait() {
        let gate = StartGate::new();
        gate.open();
        assert!(gate.wait());

        let gate = StartGate::new();
        gate.abort();
        assert!(!gate.wait());
    }
}
