use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use tracing::debug;

use crate::collections::element::Element;
use crate::collections::{
  BlockingQueueBase, BlockingQueueReader, BlockingQueueWriter, HasPeekBehavior, QueueBase, QueueError, QueueReader,
  QueueSize, QueueWriter,
};

/// A bounded blocking queue over a fixed ring buffer, with batch transfer
/// operations that move many elements under a single lock acquisition.
///
/// Bulk transfers are performed as at most two contiguous spans split at the
/// end of the slot array; they are not loops over the single-element
/// operations, and they may complete partially when less room (or fewer
/// elements) exists than requested.
#[derive(Debug, Clone)]
pub struct BatchedBoundedQueue<E> {
  inner: Arc<Inner<E>>,
}

#[derive(Debug)]
struct Inner<E> {
  capacity: usize,
  state: Mutex<RingState<E>>,
  not_empty: Condvar,
  not_full: Condvar,
}

#[derive(Debug)]
struct RingState<E> {
  slots: Box<[Option<E>]>,
  producer_idx: usize,
  consumer_idx: usize,
  count: usize,
  interrupted: bool,
}

impl<E> BatchedBoundedQueue<E> {
  /// Creates a queue with exactly `capacity` slots. A zero capacity is
  /// accepted and yields a queue that never accepts or yields elements.
  pub fn new(capacity: usize) -> Self {
    let mut slots = Vec::with_capacity(capacity);
    slots.resize_with(capacity, || None);
    Self {
      inner: Arc::new(Inner {
        capacity,
        state: Mutex::new(RingState {
          slots: slots.into_boxed_slice(),
          producer_idx: 0,
          consumer_idx: 0,
          count: 0,
          interrupted: false,
        }),
        not_empty: Condvar::new(),
        not_full: Condvar::new(),
      }),
    }
  }

  /// Traversal is deliberately unsupported: the physical slot order does not
  /// match logical FIFO order once the ring has wrapped, and handing out an
  /// iterator would expose it.
  pub fn iter(&self) -> Result<Vec<E>, QueueError<E>> {
    Err(QueueError::UnsupportedError)
  }
}

impl<E> Inner<E> {
  fn enqueue_one(&self, state: &mut RingState<E>, element: E) {
    state.slots[state.producer_idx] = Some(element);
    state.producer_idx += 1;
    if state.producer_idx == self.capacity {
      state.producer_idx = 0;
    }
    // empty -> non-empty transition
    if state.count == 0 {
      self.not_empty.notify_all();
    }
    state.count += 1;
  }

  fn dequeue_one(&self, state: &mut RingState<E>) -> Option<E> {
    if state.count == 0 {
      return None;
    }
    let element = state.slots[state.consumer_idx].take()?;
    state.consumer_idx += 1;
    if state.consumer_idx == self.capacity {
      state.consumer_idx = 0;
    }
    // full -> non-full transition
    if state.count == self.capacity {
      self.not_full.notify_all();
    }
    state.count -= 1;
    Some(element)
  }

  /// Writes exactly `to_insert` elements from `source` starting at the
  /// producer cursor, as at most two contiguous spans.
  fn transfer_in<I>(&self, state: &mut RingState<E>, mut source: I, to_insert: usize)
  where
    I: Iterator<Item = E>, {
    let first_span = to_insert.min(self.capacity - state.producer_idx);
    for offset in 0..first_span {
      state.slots[state.producer_idx + offset] = source.next();
    }
    for index in 0..(to_insert - first_span) {
      state.slots[index] = source.next();
    }
    state.producer_idx += to_insert;
    if state.producer_idx >= self.capacity {
      state.producer_idx -= self.capacity;
    }
    if state.count == 0 && to_insert > 0 {
      self.not_empty.notify_all();
    }
    state.count += to_insert;
  }

  /// Moves exactly `to_drain` elements into `dest` starting at the consumer
  /// cursor, clearing the vacated slots, as at most two contiguous spans.
  fn transfer_out(&self, state: &mut RingState<E>, dest: &mut Vec<E>, to_drain: usize) {
    let first_span = to_drain.min(self.capacity - state.consumer_idx);
    for offset in 0..first_span {
      if let Some(element) = state.slots[state.consumer_idx + offset].take() {
        dest.push(element);
      }
    }
    for index in 0..(to_drain - first_span) {
      if let Some(element) = state.slots[index].take() {
        dest.push(element);
      }
    }
    state.consumer_idx += to_drain;
    if state.consumer_idx >= self.capacity {
      state.consumer_idx -= self.capacity;
    }
    if state.count == self.capacity && to_drain > 0 {
      self.not_full.notify_all();
    }
    state.count -= to_drain;
  }
}

impl<E: Element> QueueBase<E> for BatchedBoundedQueue<E> {
  fn len(&self) -> QueueSize {
    let state = self.inner.state.lock();
    QueueSize::Limited(state.count)
  }

  fn capacity(&self) -> QueueSize {
    QueueSize::Limited(self.inner.capacity)
  }
}

impl<E: Element> QueueWriter<E> for BatchedBoundedQueue<E> {
  fn offer(&mut self, element: E) -> Result<(), QueueError<E>> {
    let mut state = self.inner.state.lock();
    if state.count == self.inner.capacity {
      return Err(QueueError::OfferError(element));
    }
    self.inner.enqueue_one(&mut state, element);
    Ok(())
  }
}

impl<E: Element> QueueReader<E> for BatchedBoundedQueue<E> {
  fn poll(&mut self) -> Result<Option<E>, QueueError<E>> {
    let mut state = self.inner.state.lock();
    Ok(self.inner.dequeue_one(&mut state))
  }

  fn clean_up(&mut self) {
    let mut state = self.inner.state.lock();
    if state.count == 0 {
      return;
    }
    let was_full = state.count == self.inner.capacity;
    for slot in state.slots.iter_mut() {
      *slot = None;
    }
    state.producer_idx = 0;
    state.consumer_idx = 0;
    state.count = 0;
    // one signal covers the full -> empty transition
    if was_full {
      self.inner.not_full.notify_all();
    }
  }
}

impl<E: Element + Clone> HasPeekBehavior<E> for BatchedBoundedQueue<E> {
  fn peek(&self) -> Result<Option<E>, QueueError<E>> {
    let state = self.inner.state.lock();
    if state.count == 0 {
      return Ok(None);
    }
    Ok(state.slots[state.consumer_idx].clone())
  }
}

impl<E: Element> BlockingQueueBase<E> for BatchedBoundedQueue<E> {
  fn remaining_capacity(&self) -> QueueSize {
    let state = self.inner.state.lock();
    QueueSize::Limited(self.inner.capacity - state.count)
  }

  fn is_interrupted(&self) -> bool {
    self.inner.state.lock().interrupted
  }
}

impl<E: Element> BlockingQueueWriter<E> for BatchedBoundedQueue<E> {
  fn put(&mut self, element: E) -> Result<(), QueueError<E>> {
    let mut state = self.inner.state.lock();
    while state.count == self.inner.capacity {
      if state.interrupted {
        return Err(QueueError::InterruptedError(Some(element)));
      }
      self.inner.not_full.wait(&mut state);
    }
    self.inner.enqueue_one(&mut state, element);
    Ok(())
  }

  fn offer_timeout(&mut self, element: E, timeout: Duration) -> Result<(), QueueError<E>> {
    // a timeout too large to express as a deadline means "wait forever"
    let deadline = Instant::now().checked_add(timeout);
    let mut state = self.inner.state.lock();
    while state.count == self.inner.capacity {
      if state.interrupted {
        return Err(QueueError::InterruptedError(Some(element)));
      }
      match deadline {
        Some(deadline) => {
          if timeout.is_zero() || Instant::now() >= deadline {
            return Err(QueueError::OfferError(element));
          }
          self.inner.not_full.wait_until(&mut state, deadline);
        }
        None => self.inner.not_full.wait(&mut state),
      }
    }
    self.inner.enqueue_one(&mut state, element);
    Ok(())
  }

  fn put_all(&mut self, elements: &mut Vec<E>) -> Result<usize, QueueError<E>> {
    let mut state = self.inner.state.lock();
    while state.count == self.inner.capacity {
      if state.interrupted {
        return Err(QueueError::InterruptedError(None));
      }
      self.inner.not_full.wait(&mut state);
    }
    let to_insert = (self.inner.capacity - state.count).min(elements.len());
    self.inner.transfer_in(&mut state, elements.drain(..to_insert), to_insert);
    Ok(to_insert)
  }

  fn put_slice(&mut self, elements: &[E]) -> Result<usize, QueueError<E>>
  where
    E: Clone, {
    let mut state = self.inner.state.lock();
    while state.count == self.inner.capacity {
      if state.interrupted {
        return Err(QueueError::InterruptedError(None));
      }
      self.inner.not_full.wait(&mut state);
    }
    let to_insert = (self.inner.capacity - state.count).min(elements.len());
    self.inner.transfer_in(&mut state, elements[..to_insert].iter().cloned(), to_insert);
    Ok(to_insert)
  }

  fn interrupt(&mut self) {
    let mut state = self.inner.state.lock();
    state.interrupted = true;
    debug!("interrupting blocked queue operations");
    self.inner.not_empty.notify_all();
    self.inner.not_full.notify_all();
  }
}

impl<E: Element> BlockingQueueReader<E> for BatchedBoundedQueue<E> {
  fn take(&mut self) -> Result<E, QueueError<E>> {
    let mut state = self.inner.state.lock();
    loop {
      if let Some(element) = self.inner.dequeue_one(&mut state) {
        return Ok(element);
      }
      if state.interrupted {
        return Err(QueueError::InterruptedError(None));
      }
      self.inner.not_empty.wait(&mut state);
    }
  }

  fn poll_timeout(&mut self, timeout: Duration) -> Result<Option<E>, QueueError<E>> {
    let deadline = Instant::now().checked_add(timeout);
    let mut state = self.inner.state.lock();
    loop {
      if let Some(element) = self.inner.dequeue_one(&mut state) {
        return Ok(Some(element));
      }
      if state.interrupted {
        return Err(QueueError::InterruptedError(None));
      }
      match deadline {
        Some(deadline) => {
          if timeout.is_zero() || Instant::now() >= deadline {
            return Ok(None);
          }
          self.inner.not_empty.wait_until(&mut state, deadline);
        }
        None => self.inner.not_empty.wait(&mut state),
      }
    }
  }

  fn take_all(&mut self, dest: &mut Vec<E>, max_elements: usize) -> Result<usize, QueueError<E>> {
    let mut state = self.inner.state.lock();
    while state.count == 0 {
      if state.interrupted {
        return Err(QueueError::InterruptedError(None));
      }
      self.inner.not_empty.wait(&mut state);
    }
    let to_drain = state.count.min(max_elements);
    self.inner.transfer_out(&mut state, dest, to_drain);
    Ok(to_drain)
  }

  fn poll_all(&mut self, dest: &mut Vec<E>, max_elements: usize, timeout: Duration) -> Result<usize, QueueError<E>> {
    let deadline = Instant::now().checked_add(timeout);
    let mut state = self.inner.state.lock();
    while state.count == 0 {
      if state.interrupted {
        return Err(QueueError::InterruptedError(None));
      }
      match deadline {
        Some(deadline) => {
          if timeout.is_zero() || Instant::now() >= deadline {
            return Ok(0);
          }
          self.inner.not_empty.wait_until(&mut state, deadline);
        }
        None => self.inner.not_empty.wait(&mut state),
      }
    }
    let to_drain = state.count.min(max_elements);
    self.inner.transfer_out(&mut state, dest, to_drain);
    Ok(to_drain)
  }

  fn drain_to(&mut self, dest: &mut Vec<E>, max_elements: usize) -> usize {
    let mut state = self.inner.state.lock();
    let to_drain = state.count.min(max_elements);
    self.inner.transfer_out(&mut state, dest, to_drain);
    to_drain
  }
}
