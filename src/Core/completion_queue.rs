// Completion queue that engines post finished batches to.
//
// Bounded lock-free MPMC ring of Completion records. Producers (engines)
// claim a tail sequence, consumers claim a head sequence; the per-slot
// sequence number tells each side when a slot is free or filled.

use std::cell::UnsafeCell;
use std::collections::VecDeque;
use std::mem::MaybeUninit;
use std::sync::atomic::Ordering::{AcqRel, Acquire, Relaxed, Release};
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64};
use std::time::{Duration, Instant};

use crossbeam_utils::CachePadded;
use log::{debug, trace};
use parking_lot::Mutex;

use crate::error::CallError;
use crate::Batch::{Completion, CompletionQueueTag};
use crate::Core::futex::{futex_wait, futex_wait_timeout, futex_wake_all};
use crate::Structs::Tag;

/// A single slot in the ring.
struct Slot {
    /// - A producer claims a `tail` sequence and waits for the `sequence` in
    ///   the target slot to equal `tail`.
    /// - After writing, it sets the `sequence` to `tail + 1`.
    /// - A consumer waits for the `sequence` in its `head` slot to equal
    ///   `head + 1`, reads, then sets it to `head + capacity`.
    sequence: AtomicU64,
    completion: UnsafeCell<MaybeUninit<Completion>>,
}

pub(crate) struct CompletionRing {
    slots: Box<[Slot]>,
    pub(crate) capacity: usize,
    mask: usize,
    tail: CachePadded<AtomicU64>,
    head: CachePadded<AtomicU64>,
}

// Slot contents are only touched by the thread that won the sequence CAS.
unsafe impl Send for CompletionRing {}
unsafe impl Sync for CompletionRing {}

impl CompletionRing {
    fn new(capacity: usize) -> Self {
        let slots = (0..capacity)
            .map(|k| Slot {
                sequence: AtomicU64::new(k as u64),
                completion: UnsafeCell::new(MaybeUninit::uninit()),
            })
            .collect();
        Self {
            slots,
            capacity,
            mask: capacity - 1,
            tail: CachePadded::new(AtomicU64::new(0)),
            head: CachePadded::new(AtomicU64::new(0)),
        }
    }

    /// Publish `completion`. Hands it back if the ring is full.
    fn enqueue(&self, completion: Completion) -> Result<(), Completion> {
        loop {
            let tail = self.tail.load(Relaxed);
            let slot = &self.slots[(tail as usize) & self.mask];
            let seq = slot.sequence.load(Acquire);
            let dif = seq as i64 - tail as i64;

            if dif == 0 {
                if self
                    .tail
                    .compare_exchange_weak(tail, tail + 1, AcqRel, Relaxed)
                    .is_ok()
                {
                    // We own this slot now
                    unsafe {
                        (*slot.completion.get()).write(completion);
                    }
                    slot.sequence.store(tail + 1, Release);
                    return Ok(());
                }
            } else if dif < 0 {
                // full
                return Err(completion);
            } else {
                // someone else is producing; backoff and retry
                std::hint::spin_loop();
            }
        }
    }

    /// Take the oldest completion, if any.
    fn dequeue(&self) -> Option<Completion> {
        loop {
            let head = self.head.load(Relaxed);
            let slot = &self.slots[(head as usize) & self.mask];
            let seq = slot.sequence.load(Acquire);
            let dif = seq as i64 - (head as i64 + 1);

            if dif == 0 {
                if self
                    .head
                    .compare_exchange_weak(head, head + 1, AcqRel, Relaxed)
                    .is_ok()
                {
                    let completion = unsafe { (*slot.completion.get()).assume_init_read() };
                    // free slot for future producers
                    slot.sequence.store(head + self.capacity as u64, Release);
                    return Some(completion);
                }
            } else if dif < 0 {
                // empty
                return None;
            } else {
                // producer not finished; retry
                std::hint::spin_loop();
            }
        }
    }
}

impl Drop for CompletionRing {
    fn drop(&mut self) {
        while self.dequeue().is_some() {}
    }
}

/// Outcome of [`CompletionQueue::pluck`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluckResult {
    /// The batch finalized and asked to be surfaced.
    Event { tag: Tag, ok: bool },
    /// The batch finalized but swallowed its completion.
    Suppressed,
    /// Nothing arrived for the batch within the timeout.
    Timeout,
    /// The queue shut down before the batch completed.
    Shutdown,
}

/// Queue of finished batches, shared between engines and the threads
/// waiting on them.
pub struct CompletionQueue {
    pub(crate) ring: CompletionRing,
    /// Bumped on every post and on shutdown; waiters futex on it.
    pub(crate) signal: AtomicU32,
    pub(crate) shutdown: AtomicBool,
    /// Completions a plucker pulled off the ring while looking for another tag.
    pub(crate) stashed: Mutex<VecDeque<Completion>>,
}

impl CompletionQueue {
    /// Create a queue with room for `capacity` in-flight completions.
    pub fn new(capacity: usize) -> Result<Self, CallError> {
        if capacity == 0 || (capacity & (capacity - 1)) != 0 {
            return Err(CallError::InvalidCapacity(capacity));
        }
        Ok(Self {
            ring: CompletionRing::new(capacity),
            signal: AtomicU32::new(0),
            shutdown: AtomicBool::new(false),
            stashed: Mutex::new(VecDeque::new()),
        })
    }

    /// Engine side: report a finished batch.
    pub fn post(&self, completion: Completion) -> Result<(), CallError> {
        if self.is_shutdown() {
            return Err(CallError::Shutdown);
        }
        let tag = completion.tag;
        if self.ring.enqueue(completion).is_err() {
            return Err(CallError::QueueFull);
        }
        trace!("posted completion {:?}", tag);
        self.notify();
        Ok(())
    }

    /// Take the next raw completion without blocking.
    ///
    /// The completion has not been finalized; the caller must hand it to the
    /// batch that owns its tag.
    pub fn try_next(&self) -> Option<Completion> {
        if let Some(completion) = self.stashed.lock().pop_front() {
            return Some(completion);
        }
        self.ring.dequeue()
    }

    /// Block until a raw completion is available. `None` once shut down and drained.
    pub fn next(&self) -> Option<Completion> {
        loop {
            let seen = self.signal.load(Acquire);
            if let Some(completion) = self.try_next() {
                return Some(completion);
            }
            if self.is_shutdown() {
                return None;
            }
            futex_wait(&self.signal, seen);
        }
    }

    /// Like [`next`](Self::next), but gives up after `timeout`.
    pub fn next_timeout(&self, timeout: Duration) -> Option<Completion> {
        let start = Instant::now();
        loop {
            let seen = self.signal.load(Acquire);
            if let Some(completion) = self.try_next() {
                return Some(completion);
            }
            let remaining = timeout.saturating_sub(start.elapsed());
            if self.is_shutdown() || remaining.is_zero() {
                return None;
            }
            futex_wait_timeout(&self.signal, seen, remaining);
        }
    }

    /// Block until `batch` completes, then finalize it.
    pub fn pluck(&self, batch: &mut dyn CompletionQueueTag) -> PluckResult {
        self.pluck_inner(batch, None)
    }

    /// Like [`pluck`](Self::pluck), but gives up after `timeout`.
    pub fn pluck_timeout(&self, batch: &mut dyn CompletionQueueTag, timeout: Duration) -> PluckResult {
        self.pluck_inner(batch, Some(timeout))
    }

    fn pluck_inner(&self, batch: &mut dyn CompletionQueueTag, timeout: Option<Duration>) -> PluckResult {
        let tag = batch.tag();
        let start = Instant::now();
        loop {
            let seen = self.signal.load(Acquire);
            if let Some(mut completion) = self.take_matching(tag) {
                return if batch.finalize_result(&mut completion) {
                    PluckResult::Event {
                        tag: completion.tag,
                        ok: completion.ok,
                    }
                } else {
                    trace!("completion {:?} suppressed by its batch", tag);
                    PluckResult::Suppressed
                };
            }
            if self.is_shutdown() {
                return PluckResult::Shutdown;
            }
            match timeout {
                Some(timeout) => {
                    let remaining = timeout.saturating_sub(start.elapsed());
                    if remaining.is_zero() {
                        return PluckResult::Timeout;
                    }
                    futex_wait_timeout(&self.signal, seen, remaining);
                }
                None => futex_wait(&self.signal, seen),
            }
        }
    }

    /// Find the completion for `tag`, stashing anything else drained on the way.
    fn take_matching(&self, tag: Tag) -> Option<Completion> {
        let mut stashed = self.stashed.lock();
        if let Some(pos) = stashed.iter().position(|c| c.tag == tag) {
            return stashed.remove(pos);
        }

        let before = stashed.len();
        let mut found = None;
        while let Some(completion) = self.ring.dequeue() {
            if completion.tag == tag {
                found = Some(completion);
                break;
            }
            stashed.push_back(completion);
        }
        if stashed.len() > before {
            // other waiters may be parked on completions we just moved
            drop(stashed);
            self.notify();
        }
        found
    }

    /// Stop accepting completions and wake every waiter.
    ///
    /// Completions already queued can still be drained with `try_next`/`next`.
    pub fn shutdown(&self) {
        if !self.shutdown.swap(true, AcqRel) {
            debug!("completion queue shutting down");
        }
        self.notify();
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Acquire)
    }

    pub fn capacity(&self) -> usize {
        self.ring.capacity
    }

    fn notify(&self) {
        self.signal.fetch_add(1, Release);
        futex_wake_all(&self.signal);
    }
}
