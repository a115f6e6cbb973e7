use std::future::Future;

use futures::{StreamExt, stream::BoxStream};
use strum::Display;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

use crate::Result;

/// A query that emits its current result, then a fresh result after every
/// write to one of the tables it reads. Dropping the stream unsubscribes.
pub type LiveQuery<T> = BoxStream<'static, Result<T>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Table {
    Location,
    Aisle,
    Product,
    AisleProduct,
}

impl Table {
    pub const ALL: &'static [Table] = &[
        Table::Location,
        Table::Aisle,
        Table::Product,
        Table::AisleProduct,
    ];
}

/// Change log of a store. Writers publish the tables they touched once the
/// write is committed; live queries listen and re-run.
#[derive(Clone)]
pub struct Changes(broadcast::Sender<Table>);

impl Default for Changes {
    fn default() -> Self {
        Self::new()
    }
}

impl Changes {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(128);

        Self(sender)
    }

    pub fn notify(&self, tables: &[Table]) {
        for table in tables {
            tracing::trace!(%table, "table changed");
            // no subscriber is not an error
            let _ = self.0.send(*table);
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Table> {
        self.0.subscribe()
    }

    /// Builds a [`LiveQuery`] running `fetch` once up front and again after
    /// each change to any of `tables`. Bursts of changes are coalesced into a
    /// single re-run.
    pub fn watch<T, F, Fut>(&self, tables: &'static [Table], fetch: F) -> LiveQuery<T>
    where
        T: Send + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        // subscribe before the first fetch so no write can slip between them
        let receiver = self.0.subscribe();

        futures::stream::unfold(
            (receiver, fetch, true),
            move |(mut receiver, fetch, first)| async move {
                if !first {
                    wait_for_change(&mut receiver, tables).await?;
                }

                let item = fetch().await;

                Some((item, (receiver, fetch, false)))
            },
        )
        .boxed()
    }
}

/// Resolves once a relevant change arrived, `None` when the change log is gone.
async fn wait_for_change(
    receiver: &mut broadcast::Receiver<Table>,
    tables: &'static [Table],
) -> Option<()> {
    loop {
        match receiver.recv().await {
            Ok(table) if tables.contains(&table) => break,
            Ok(_) => continue,
            Err(RecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "live query lagged behind, re-running");
                break;
            }
            Err(RecvError::Closed) => return None,
        }
    }

    loop {
        match receiver.try_recv() {
            Ok(_) | Err(TryRecvError::Lagged(_)) => continue,
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
        }
    }

    Some(())
}
