//! Start-line rendezvous for worker threads.
//!
//! Workers establish their sessions at different speeds, but the timed
//! window must open for all of them at the same instant. Each worker
//! calls [`StartBarrier::wait`] once after its session is up; the last
//! arrival releases everyone.
//!
//! Unlike `std::sync::Barrier`, the rendezvous can be abandoned. A
//! worker that cannot establish its session, or a harness giving up on
//! a partial launch, calls [`StartBarrier::abort`]. That releases all
//! current and future waiters with [`BarrierWait::Aborted`] instead of
//! stranding them behind a party that will never arrive.

use parking_lot::{Condvar, Mutex};

/// Outcome of waiting at the start line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarrierWait {
    /// Every party arrived; the timed window is open.
    Released,
    /// The rendezvous was abandoned; skip the timed loop.
    Aborted,
}

#[derive(Debug, Default)]
struct BarrierState {
    arrived: usize,
    released: bool,
    aborted: bool,
}

/// Single-use rendezvous for a fixed number of parties.
#[derive(Debug)]
pub struct StartBarrier {
    parties: usize,
    state: Mutex<BarrierState>,
    cvar: Condvar,
}

impl StartBarrier {
    /// Barrier for `parties` workers. A single-party barrier releases
    /// its one caller immediately.
    pub fn new(parties: usize) -> Self {
        Self {
            parties,
            state: Mutex::new(BarrierState::default()),
            cvar: Condvar::new(),
        }
    }

    /// Block until every party has arrived or the rendezvous is
    /// abandoned. If both happen, abort wins for any party still
    /// waiting.
    pub fn wait(&self) -> BarrierWait {
        let mut state = self.state.lock();
        if state.aborted {
            return BarrierWait::Aborted;
        }

        state.arrived += 1;
        if state.arrived >= self.parties {
            state.released = true;
            self.cvar.notify_all();
            return BarrierWait::Released;
        }

        while !state.released && !state.aborted {
            self.cvar.wait(&mut state);
        }

        if state.aborted {
            BarrierWait::Aborted
        } else {
            BarrierWait::Released
        }
    }

    /// Abandon the rendezvous. Sticky: every current waiter wakes with
    /// `Aborted` and every future `wait` returns it immediately.
    pub fn abort(&self) {
        let mut state = self.state.lock();
        state.aborted = true;
        self.cvar.notify_all();
    }
}
