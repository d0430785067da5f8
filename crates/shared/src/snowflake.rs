//! Time-ordered 64-bit id generation.
//!
//! Layout (most significant first): milliseconds since [`EPOCH_MILLIS`], 6 bits of
//! worker id, 6 bits of per-millisecond sequence. Ids from one generator are strictly
//! increasing and distinct workers never collide. The narrow low part keeps ids below
//! 2^53 for decades, so JavaScript admin clients can hold them as plain numbers.

use std::sync::Mutex;

use chrono::Utc;
use thiserror::Error;

/// Custom epoch: 2020-02-19T18:20:02Z.
pub const EPOCH_MILLIS: i64 = 1_582_136_402_000;

const WORKER_BITS: u32 = 6;
const SEQUENCE_BITS: u32 = 6;

pub const MAX_WORKER_ID: u16 = (1 << WORKER_BITS) - 1;
const MAX_SEQUENCE: i64 = (1 << SEQUENCE_BITS) - 1;

#[derive(Debug, Error)]
pub enum SnowflakeError {
    #[error("worker id {0} exceeds 63")]
    WorkerIdOutOfRange(u16),
}

#[derive(Debug)]
struct State {
    last_millis: i64,
    sequence: i64,
}

/// Process-wide id generator. Share it behind an `Arc`.
#[derive(Debug)]
pub struct IdGenerator {
    worker_id: i64,
    state: Mutex<State>,
}

impl IdGenerator {
    pub fn new(worker_id: u16) -> Result<Self, SnowflakeError> {
        if worker_id > MAX_WORKER_ID {
            return Err(SnowflakeError::WorkerIdOutOfRange(worker_id));
        }

        Ok(Self {
            worker_id: i64::from(worker_id),
            state: Mutex::new(State {
                last_millis: 0,
                sequence: 0,
            }),
        })
    }

    pub fn worker_id(&self) -> u16 {
        self.worker_id as u16
    }

    /// Returns the next id.
    pub fn next_id(&self) -> i64 {
        self.next_id_at(current_millis())
    }

    fn next_id_at(&self, now: i64) -> i64 {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let millis = if now > state.last_millis {
            state.sequence = 0;
            now
        } else {
            state.sequence = (state.sequence + 1) & MAX_SEQUENCE;
            match (state.sequence, now == state.last_millis) {
                (0, true) => wait_next_millis(state.last_millis),
                // The clock stepped back: borrow the next millisecond instead of
                // blocking until wall time catches up.
                (0, false) => state.last_millis + 1,
                _ => state.last_millis,
            }
        };

        state.last_millis = millis;
        compose(millis, self.worker_id, state.sequence)
    }
}

fn current_millis() -> i64 {
    Utc::now().timestamp_millis() - EPOCH_MILLIS
}

/// Spins out the rest of the current millisecond; only called when `last` is now.
fn wait_next_millis(last: i64) -> i64 {
    loop {
        let now = current_millis();
        if now > last {
            return now;
        }
        std::thread::yield_now();
    }
}

fn compose(millis: i64, worker_id: i64, sequence: i64) -> i64 {
    (millis << (WORKER_BITS + SEQUENCE_BITS)) | (worker_id << SEQUENCE_BITS) | sequence
}

/// Milliseconds since the Unix epoch at which `id` was generated.
pub fn timestamp_millis(id: i64) -> i64 {
    (id >> (WORKER_BITS + SEQUENCE_BITS)) + EPOCH_MILLIS
}
