use std::cmp::Ordering;
use std::fmt::Debug;
use std::time::Duration;

use thiserror::Error;

mod batched_bounded_queue;

pub use self::batched_bounded_queue::*;

use crate::collections::element::Element;

/// An error that occurs when a queue operation fails.<br/>
/// キューの操作に失敗した場合に発生するエラー。
#[derive(Error, Debug, PartialEq)]
pub enum QueueError<E> {
  /// No space was available; the rejected element is handed back to the caller.<br/>
  /// 空きがなかった場合。拒否された要素は呼び出し元に返されます。
  #[error("Failed to offer an element: {0:?}")]
  OfferError(E),
  /// A blocking wait was aborted by an interrupt. The send side carries the
  /// element that was never inserted; the receive side carries `None`.<br/>
  /// ブロッキング待機が中断された場合。送信側は未挿入の要素を保持します。
  #[error("Interrupted while waiting: {0:?}")]
  InterruptedError(Option<E>),
  /// The operation is deliberately not supported by this queue.<br/>
  /// このキューが意図的にサポートしていない操作。
  #[error("Unsupported queue operation")]
  UnsupportedError,
}

/// The size of the queue.<br/>
/// キューのサイズ。
#[derive(Debug, Clone)]
pub enum QueueSize {
  /// The queue has no capacity limit.<br/>
  /// キューに容量制限がない。
  Limitless,
  /// The queue has a capacity limit.<br/>
  /// キューに容量制限がある。
  Limited(usize),
}

impl QueueSize {
  /// Returns whether the queue has no capacity limit.<br/>
  /// キューに容量制限がないかどうかを返します。
  pub fn is_limitless(&self) -> bool {
    matches!(self, QueueSize::Limitless)
  }

  /// Converts to an option type.<br/>
  /// オプション型に変換します。
  ///
  /// # Return Value / 戻り値
  /// - `None` - If the queue has no capacity limit. / キューに容量制限がない場合。
  /// - `Some(num)` - If the queue has a capacity limit. / キューに容量制限がある場合。
  pub fn to_option(&self) -> Option<usize> {
    match self {
      QueueSize::Limitless => None,
      QueueSize::Limited(c) => Some(*c),
    }
  }

  /// Converts to a usize type.<br/>
  /// usize型に変換します。
  ///
  /// # Return Value / 戻り値
  /// - `usize::MAX` - If the queue has no capacity limit. / キューに容量制限がない場合。
  /// - `num` - If the queue has a capacity limit. / キューに容量制限がある場合。
  pub fn to_usize(&self) -> usize {
    match self {
      QueueSize::Limitless => usize::MAX,
      QueueSize::Limited(c) => *c,
    }
  }
}

impl PartialEq<Self> for QueueSize {
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (QueueSize::Limitless, QueueSize::Limitless) => true,
      (QueueSize::Limited(l), QueueSize::Limited(r)) => l == r,
      _ => false,
    }
  }
}

impl PartialOrd<Self> for QueueSize {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    match (self, other) {
      (QueueSize::Limitless, QueueSize::Limitless) => Some(Ordering::Equal),
      (QueueSize::Limitless, _) => Some(Ordering::Greater),
      (_, QueueSize::Limitless) => Some(Ordering::Less),
      (QueueSize::Limited(l), QueueSize::Limited(r)) => l.partial_cmp(r),
    }
  }
}

/// A trait that defines the behavior of a queue.<br/>
/// キューの振る舞いを定義するトレイト。
pub trait QueueBase<E: Element>: Debug + Send + Sync {
  /// Returns whether this queue is empty.<br/>
  /// このキューが空かどうかを返します。
  fn is_empty(&self) -> bool {
    self.len() == QueueSize::Limited(0)
  }

  /// Returns whether this queue is non-empty.<br/>
  /// このキューが空でないかどうかを返します。
  fn non_empty(&self) -> bool {
    !self.is_empty()
  }

  /// Returns whether the queue size has reached its capacity.<br/>
  /// このキューのサイズが容量まで到達したかどうかを返します。
  fn is_full(&self) -> bool {
    self.capacity() == self.len()
  }

  /// Returns whether the queue size has not reached its capacity.<br/>
  /// このキューのサイズが容量まで到達してないかどうかを返します。
  fn non_full(&self) -> bool {
    !self.is_full()
  }

  /// Returns the length of this queue.<br/>
  /// このキューの長さを返します。
  fn len(&self) -> QueueSize;

  /// Returns the capacity of this queue.<br/>
  /// このキューの最大容量を返します。
  fn capacity(&self) -> QueueSize;
}

/// A trait that defines the writer-side behavior of a queue.<br/>
/// キューの書き込み側の振る舞いを定義するトレイト。
pub trait QueueWriter<E: Element>: QueueBase<E> {
  /// The specified element will be inserted into this queue,
  /// if the queue can be executed immediately without violating the capacity limit.<br/>
  /// 容量制限に違反せずにすぐ実行できる場合は、指定された要素をこのキューに挿入します。
  ///
  /// # Return Value / 戻り値
  /// - `Ok(())` - If the element is inserted successfully. / 要素が正常に挿入された場合。
  /// - `Err(QueueError::OfferError(element))` - If the element cannot be inserted. / 要素を挿入できなかった場合。
  fn offer(&mut self, element: E) -> Result<(), QueueError<E>>;

  /// The specified elements will be inserted into this queue,
  /// if the queue can be executed immediately without violating the capacity limit.<br/>
  /// 容量制限に違反せずにすぐ実行できる場合は、指定された複数の要素をこのキューに挿入します。
  fn offer_all(&mut self, elements: Vec<E>) -> Result<(), QueueError<E>> {
    for e in elements {
      self.offer(e)?;
    }
    Ok(())
  }
}

/// A trait that defines the reader-side behavior of a queue.<br/>
/// キューの読み込み側の振る舞いを定義するトレイト。
pub trait QueueReader<E: Element>: QueueBase<E> {
  /// Retrieves and deletes the head of the queue. Returns None if the queue is empty.<br/>
  /// キューの先頭を取得および削除します。キューが空の場合は None を返します。
  fn poll(&mut self) -> Result<Option<E>, QueueError<E>>;

  /// Discards every element and resets the queue to the empty state.<br/>
  /// すべての要素を破棄し、キューを空の状態に戻します。
  fn clean_up(&mut self);
}

/// A trait that defines the behavior of a queue that can be peeked.<br/>
/// Peekができるキューの振る舞いを定義するトレイト。
pub trait HasPeekBehavior<E: Element + Clone>: QueueReader<E> {
  /// Gets the head of the queue, but does not delete it. Returns None if the queue is empty.<br/>
  /// キューの先頭を取得しますが、削除しません。キューが空の場合は None を返します。
  fn peek(&self) -> Result<Option<E>, QueueError<E>>;
}

/// A trait that defines the behavior of a blocking queue.<br/>
/// ブロッキングキューの振る舞いを定義するトレイト。
pub trait BlockingQueueBase<E: Element>: QueueBase<E> {
  /// Returns the number of elements that can be inserted into this queue without blocking.<br/>
  /// ブロックせずにこのキューに挿入できる要素数を返します。
  fn remaining_capacity(&self) -> QueueSize;

  /// Returns whether the operation of this queue has been interrupted.<br/>
  /// このキューの操作が中断されたかどうかを返します。
  fn is_interrupted(&self) -> bool;
}

/// A trait that defines the writer-side behavior of a blocking queue,
/// including bulk transfers.<br/>
/// 一括転送を含む、ブロッキングキューの書き込み側の振る舞いを定義するトレイト。
pub trait BlockingQueueWriter<E: Element>: BlockingQueueBase<E> + QueueWriter<E> {
  /// Inserts the specified element into this queue. If necessary, waits until space is available.<br/>
  /// 指定された要素をこのキューに挿入します。必要に応じて、空きが生じるまで待機します。
  ///
  /// # Return Value / 戻り値
  /// - `Ok(())` - If the element is inserted successfully. / 要素が正常に挿入された場合。
  /// - `Err(QueueError::InterruptedError(Some(element)))` - If the wait is interrupted. / 待機が中断された場合。
  fn put(&mut self, element: E) -> Result<(), QueueError<E>>;

  /// Inserts the specified element, waiting up to `timeout` for space.
  /// A zero timeout on a full queue fails immediately.<br/>
  /// 指定された要素を挿入します。空きが生じるまで最大 `timeout` 待機します。
  ///
  /// # Return Value / 戻り値
  /// - `Ok(())` - If the element is inserted successfully. / 要素が正常に挿入された場合。
  /// - `Err(QueueError::OfferError(element))` - If the timeout elapses with no space. / タイムアウトした場合。
  /// - `Err(QueueError::InterruptedError(Some(element)))` - If the wait is interrupted. / 待機が中断された場合。
  fn offer_timeout(&mut self, element: E, timeout: Duration) -> Result<(), QueueError<E>>;

  /// Transfers as many elements as currently fit from the front of `elements`
  /// into this queue in one locked step, waiting first while the queue is
  /// completely full. Transferred elements are drained from the source; the
  /// remainder is left for the caller to re-offer.<br/>
  /// `elements` の先頭から、現在入る分だけを 1 回のロックで転送します。
  /// キューが完全に満杯の間は待機します。残りは呼び出し元に残されます。
  ///
  /// # Return Value / 戻り値
  /// - `Ok(count)` - The number of elements actually transferred. / 実際に転送された要素数。
  /// - `Err(QueueError::InterruptedError(None))` - If the wait is interrupted. / 待機が中断された場合。
  fn put_all(&mut self, elements: &mut Vec<E>) -> Result<usize, QueueError<E>>;

  /// Same as [`BlockingQueueWriter::put_all`], reading from a slice.
  /// Offset and length are expressed by subslicing.<br/>
  /// [`BlockingQueueWriter::put_all`] と同様に、スライスから読み込みます。
  fn put_slice(&mut self, elements: &[E]) -> Result<usize, QueueError<E>>
  where
    E: Clone;

  /// Interrupts the blocking operations of this queue.<br/>
  /// このキューのブロッキング操作を中断します。
  fn interrupt(&mut self);
}

/// A trait that defines the reader-side behavior of a blocking queue,
/// including bulk transfers.<br/>
/// 一括転送を含む、ブロッキングキューの読み込み側の振る舞いを定義するトレイト。
pub trait BlockingQueueReader<E: Element>: BlockingQueueBase<E> + QueueReader<E> {
  /// Retrieve the head of this queue and delete it. If necessary, wait until an element becomes available.<br/>
  /// このキューの先頭を取得して削除します。必要に応じて、要素が利用可能になるまで待機します。
  fn take(&mut self) -> Result<E, QueueError<E>>;

  /// Retrieve the head of this queue, waiting up to `timeout` for an element.
  /// Returns `Ok(None)` if the timeout elapses with the queue still empty.<br/>
  /// このキューの先頭を取得します。要素が現れるまで最大 `timeout` 待機します。
  fn poll_timeout(&mut self, timeout: Duration) -> Result<Option<E>, QueueError<E>>;

  /// Drains up to `max_elements` elements into `dest` in one locked step,
  /// waiting indefinitely while the queue is empty.<br/>
  /// 最大 `max_elements` 個の要素を 1 回のロックで `dest` に排出します。
  /// キューが空の間は待機します。
  fn take_all(&mut self, dest: &mut Vec<E>, max_elements: usize) -> Result<usize, QueueError<E>>;

  /// Drains up to `max_elements` elements into `dest` in one locked step,
  /// waiting up to `timeout` while the queue is empty. A zero timeout acts on
  /// the current state only and returns `Ok(0)` when nothing is available.<br/>
  /// 最大 `max_elements` 個の要素を `dest` に排出します。キューが空の間は
  /// 最大 `timeout` 待機します。タイムアウトがゼロの場合は待機しません。
  fn poll_all(&mut self, dest: &mut Vec<E>, max_elements: usize, timeout: Duration) -> Result<usize, QueueError<E>>;

  /// Non-blocking bulk drain: moves up to `max_elements` immediately available
  /// elements into `dest` and returns how many were moved.<br/>
  /// ブロックしない一括排出。すぐに利用可能な要素のみを `dest` に移動します。
  fn drain_to(&mut self, dest: &mut Vec<E>, max_elements: usize) -> usize;
}
