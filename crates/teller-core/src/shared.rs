//! Shared branch: one branch driven by many async callers.
//!
//! # 設計
//! - ブランチ全体を 1 つの Mutex で守る（enqueue / dequeue はロック中に完結する）
//! - 列ごとに Notify を持ち、客が並んだら待っている teller を起こす
//! - 待機（serve）はロックの外で行う

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};
use tracing::{debug, info};

use crate::branch::{BankBranch, BranchStatus, LineStatus};
use crate::domain::LineId;
use crate::error::BranchError;
use crate::select::{LazyHeapSelector, LineSelector};

/// Customer queue port (interface).
///
/// Tellers and front desks talk to this trait; `SharedBranch` is the in-process implementation.
#[async_trait]
pub trait CustomerQueue<T>: Send + Sync {
    /// Place a customer in the shortest line.
    async fn enqueue(&self, customer: T) -> LineId;

    /// Take the front customer of a line without waiting.
    async fn dequeue_from(&self, index: usize) -> Result<Option<T>, BranchError>;

    /// Wait for the next customer of a line.
    ///
    /// Returns `Ok(None)` once the branch is closed and the line has drained.
    async fn serve(&self, index: usize) -> Result<Option<T>, BranchError>;

    async fn status(&self) -> BranchStatus<T>;
}

struct SharedState<T, S> {
    branch: BankBranch<T, S>,
    closed: bool,
}

pub struct SharedBranch<T, S = LazyHeapSelector> {
    state: Arc<Mutex<SharedState<T, S>>>,
    arrivals: Arc<[Notify]>,
}

impl<T, S> Clone for SharedBranch<T, S> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            arrivals: Arc::clone(&self.arrivals),
        }
    }
}

impl<T, S: LineSelector> SharedBranch<T, S> {
    pub fn new(branch: BankBranch<T, S>) -> Self {
        let arrivals = (0..branch.lines()).map(|_| Notify::new()).collect();
        Self {
            state: Arc::new(Mutex::new(SharedState {
                branch,
                closed: false,
            })),
            arrivals,
        }
    }

    pub fn lines(&self) -> usize {
        self.arrivals.len()
    }

    /// Stop waiting tellers once their lines are empty.
    ///
    /// Arrivals are still accepted after closing.
    pub async fn close(&self) {
        self.state.lock().await.closed = true;
        for notify in self.arrivals.iter() {
            notify.notify_waiters();
            notify.notify_one();
        }
        info!("branch closed");
    }

    /// Owned copy of every line's status, taken under one lock.
    pub async fn describe_owned(&self) -> Vec<LineStatus<T>>
    where
        T: Clone,
    {
        let state = self.state.lock().await;
        state.branch.describe().iter().map(|s| s.cloned()).collect()
    }

    pub async fn total_waiting(&self) -> usize {
        self.state.lock().await.branch.total_waiting()
    }

    /// Text rendering of every line (see `BankBranch`'s `Display`).
    pub async fn render(&self) -> String
    where
        T: fmt::Display,
    {
        self.state.lock().await.branch.to_string()
    }
}

#[async_trait]
impl<T, S> CustomerQueue<T> for SharedBranch<T, S>
where
    T: Clone + Send + 'static,
    S: LineSelector + 'static,
{
    async fn enqueue(&self, customer: T) -> LineId {
        let line = self.state.lock().await.branch.enqueue(customer);
        // Notify outside the lock
        self.arrivals[line.index()].notify_one();
        line
    }

    async fn dequeue_from(&self, index: usize) -> Result<Option<T>, BranchError> {
        self.state.lock().await.branch.dequeue_from(index)
    }

    async fn serve(&self, index: usize) -> Result<Option<T>, BranchError> {
        let notify = self
            .arrivals
            .get(index)
            .ok_or_else(|| BranchError::out_of_range(index, self.arrivals.len()))?;

        loop {
            {
                let mut state = self.state.lock().await;
                if state.branch.len(index) > 0 {
                    return state.branch.dequeue_from(index);
                }
                if state.closed {
                    debug!(line = index, "line drained after close");
                    return Ok(None);
                }
            } // Lock released here

            notify.notified().await;
        }
    }

    async fn status(&self) -> BranchStatus<T> {
        self.state.lock().await.branch.status()
    }
}
