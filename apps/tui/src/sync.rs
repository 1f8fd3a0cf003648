//! Change notification and refetch scheduling.
//!
//! Every successful store mutation publishes a [`TableChange`] on the
//! [`ChangeBus`]. A forwarder task turns those into [`RefetchTask`]s on a
//! bounded queue, and the dashboard drains the queue once per tick with
//! [`drain_pending`], reloading each touched table once.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::Table;

/// Broadcast buffer for change notifications.
const DEFAULT_BUS_CAPACITY: usize = 256;

/// Upper bound on refetch tasks waiting for the dashboard.
pub const REFETCH_QUEUE_CAPACITY: usize = 32;

/// A table was modified at `at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableChange {
    pub table: Table,
    pub at: Instant,
}

impl TableChange {
    pub fn now(table: Table) -> Self {
        Self {
            table,
            at: Instant::now(),
        }
    }
}

/// In-process fan-out of table changes.
#[derive(Debug, Clone)]
pub struct ChangeBus {
    sender: broadcast::Sender<TableChange>,
}

impl ChangeBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish a change to all current subscribers. With no subscriber the
    /// change is dropped.
    pub fn publish(&self, table: Table) {
        let _ = self.sender.send(TableChange::now(table));
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TableChange> {
        self.sender.subscribe()
    }
}

impl Default for ChangeBus {
    fn default() -> Self {
        Self::new(DEFAULT_BUS_CAPACITY)
    }
}

/// What the dashboard has to reload, and since when its copy is stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefetchTask {
    Table { table: Table, since: Instant },
    /// Notifications were lost; reload everything.
    All { since: Instant },
}

impl From<TableChange> for RefetchTask {
    fn from(change: TableChange) -> Self {
        Self::Table {
            table: change.table,
            since: change.at,
        }
    }
}

/// The coalesced result of draining the refetch queue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefetchPlan {
    pub tables: BTreeSet<Table>,
    pub oldest_change: Option<Instant>,
    pub task_count: usize,
}

impl RefetchPlan {
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    fn absorb(&mut self, task: RefetchTask) {
        let since = match task {
            RefetchTask::Table { table, since } => {
                self.tables.insert(table);
                since
            }
            RefetchTask::All { since } => {
                self.tables.extend(Table::ALL);
                since
            }
        };
        self.oldest_change = Some(self.oldest_change.map_or(since, |oldest| oldest.min(since)));
        self.task_count += 1;
    }

    /// How long the oldest change has been waiting.
    pub fn staleness(&self, now: Instant) -> Duration {
        self.oldest_change
            .map_or(Duration::ZERO, |oldest| now.saturating_duration_since(oldest))
    }
}

/// Creates the bounded refetch queue and spawns the task feeding it from `changes`.
///
/// The forwarder waits for queue space rather than dropping work, and exits
/// once the bus or the queue is closed.
pub fn spawn_refetch_forwarder(
    changes: broadcast::Receiver<TableChange>,
) -> (mpsc::Receiver<RefetchTask>, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(REFETCH_QUEUE_CAPACITY);
    let handle = tokio::spawn(forward_changes(changes, tx));
    (rx, handle)
}

async fn forward_changes(
    mut changes: broadcast::Receiver<TableChange>,
    tx: mpsc::Sender<RefetchTask>,
) {
    loop {
        let task = match changes.recv().await {
            Ok(change) => {
                debug!(table = change.table.as_str(), "table changed");
                RefetchTask::from(change)
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "change bus lagged, scheduling full refetch");
                RefetchTask::All {
                    since: Instant::now(),
                }
            }
            Err(broadcast::error::RecvError::Closed) => {
                info!("change bus closed, refetch forwarder stopping");
                break;
            }
        };

        if tx.send(task).await.is_err() {
            info!("refetch queue closed, forwarder stopping");
            break;
        }
    }
}

/// Takes every task currently queued without waiting.
pub fn drain_pending(rx: &mut mpsc::Receiver<RefetchTask>) -> RefetchPlan {
    let mut plan = RefetchPlan::default();
    while let Ok(task) = rx.try_recv() {
        plan.absorb(task);
    }
    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn wait_for_tasks(rx: &mut mpsc::Receiver<RefetchTask>, count: usize) -> RefetchPlan {
        let mut plan = RefetchPlan::default();
        while plan.task_count < count {
            match tokio::time::timeout(Duration::from_secs(1), rx.recv()).await {
                Ok(Some(task)) => plan.absorb(task),
                _ => break,
            }
        }
        plan
    }

    #[tokio::test]
    async fn publish_reaches_refetch_queue() {
        let bus = ChangeBus::default();
        let (mut rx, _handle) = spawn_refetch_forwarder(bus.subscribe());

        bus.publish(Table::Attendance);

        let plan = wait_for_tasks(&mut rx, 1).await;
        assert_eq!(plan.tables, BTreeSet::from([Table::Attendance]));
        assert_eq!(plan.task_count, 1);
    }

    #[tokio::test]
    async fn repeated_changes_coalesce_per_table() {
        let bus = ChangeBus::default();
        let (mut rx, _handle) = spawn_refetch_forwarder(bus.subscribe());

        bus.publish(Table::Students);
        bus.publish(Table::Students);
        bus.publish(Table::ExportLogs);

        let plan = wait_for_tasks(&mut rx, 3).await;
        assert_eq!(plan.task_count, 3);
        assert_eq!(
            plan.tables,
            BTreeSet::from([Table::Students, Table::ExportLogs])
        );
        assert!(plan.oldest_change.is_some());
    }

    #[tokio::test]
    async fn lagged_receiver_schedules_full_refetch() {
        let bus = ChangeBus::new(1);
        let changes = bus.subscribe();

        // Overflow the broadcast buffer before the forwarder starts reading.
        bus.publish(Table::Students);
        bus.publish(Table::Teachers);
        bus.publish(Table::Batches);

        let (mut rx, _handle) = spawn_refetch_forwarder(changes);
        let plan = wait_for_tasks(&mut rx, 2).await;

        assert_eq!(plan.tables.len(), Table::ALL.len());
    }

    #[test]
    fn drain_pending_on_empty_queue_is_empty() {
        let (_tx, mut rx) = mpsc::channel::<RefetchTask>(4);
        let plan = drain_pending(&mut rx);
        assert!(plan.is_empty());
        assert_eq!(plan.staleness(Instant::now()), Duration::ZERO);
    }

    #[test]
    fn drain_pending_tracks_oldest_change() {
        let (tx, mut rx) = mpsc::channel(4);
        let earlier = Instant::now();
        let later = earlier + Duration::from_millis(50);

        let _ = tx.try_send(RefetchTask::Table {
            table: Table::DailyReports,
            since: later,
        });
        let _ = tx.try_send(RefetchTask::Table {
            table: Table::Attendance,
            since: earlier,
        });

        let plan = drain_pending(&mut rx);
        assert_eq!(plan.oldest_change, Some(earlier));
        assert_eq!(plan.staleness(later), Duration::from_millis(50));
    }
}
