//! Bounded concurrent resolution with ordered output

use std::collections::HashMap;
use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::Arc;

use futures::future::join;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::config::Endpoints;
use crate::pipeline::item::{Item, ItemError, Outcome, ResolutionResult, Side};
use crate::version::error::ResolveError;
use crate::version::fetch::Fetcher;
use crate::version::package::PackageResolver;
use crate::version::packages::build_package;
use crate::version::source::{SourceResolver, resolve_latest};
use crate::version::sources::build_source;

type Resolvers = (Box<dyn SourceResolver>, Box<dyn PackageResolver>);

/// Number of slots used when none is configured
pub fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// Resolves a list of items against one shared [`Fetcher`]
pub struct Pipeline {
    fetcher: Arc<dyn Fetcher>,
    endpoints: Endpoints,
    concurrency: usize,
}

impl Pipeline {
    pub fn new(fetcher: Arc<dyn Fetcher>, endpoints: Endpoints) -> Self {
        Self {
            fetcher,
            endpoints,
            concurrency: default_concurrency(),
        }
    }

    /// Limit how many items resolve at once (at least one).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Resolve every item, returning results in input order.
    pub async fn process(&self, items: Vec<Item>) -> Vec<ResolutionResult> {
        self.process_until(items, std::future::pending()).await
    }

    /// Like [`Pipeline::process`], but stops when `shutdown` completes.
    ///
    /// Items finished before shutdown keep their results; the rest fail
    /// with [`ResolveError::Cancelled`]. The output always has one result
    /// per input item.
    pub async fn process_until<F>(&self, items: Vec<Item>, shutdown: F) -> Vec<ResolutionResult>
    where
        F: Future<Output = ()>,
    {
        info!(
            "Resolving {} items with concurrency {}",
            items.len(),
            self.concurrency
        );

        let mut names = Vec::with_capacity(items.len());
        let mut slots: Vec<Option<Outcome>> = items.iter().map(|_| None).collect();
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();
        let mut task_slots = HashMap::new();

        for (index, item) in items.into_iter().enumerate() {
            // Configuration errors never take a slot
            match prepare(&item, &self.endpoints) {
                Ok((source, package)) => {
                    let fetcher = Arc::clone(&self.fetcher);
                    let semaphore = Arc::clone(&semaphore);
                    let handle = tasks.spawn(async move {
                        let _permit = semaphore.acquire_owned().await;
                        resolve_item(source.as_ref(), package.as_ref(), fetcher.as_ref()).await
                    });
                    task_slots.insert(handle.id(), index);
                }
                Err(error) => {
                    warn!("Skipping {}: {}", item.name, error);
                    slots[index] = Some(Outcome::Failed(error));
                }
            }
            names.push(item.name);
        }

        let mut shutdown = std::pin::pin!(shutdown);
        loop {
            tokio::select! {
                joined = tasks.join_next_with_id() => match joined {
                    Some(joined) => record(&mut slots, &task_slots, joined),
                    None => break,
                },
                _ = &mut shutdown => {
                    warn!("Pipeline cancelled with {} items unfinished", tasks.len());
                    tasks.abort_all();
                    while let Some(joined) = tasks.join_next_with_id().await {
                        record(&mut slots, &task_slots, joined);
                    }
                    break;
                }
            }
        }

        let results: Vec<ResolutionResult> = names
            .into_iter()
            .zip(slots)
            .map(|(name, outcome)| ResolutionResult {
                name,
                outcome: outcome.unwrap_or_else(|| {
                    Outcome::Failed(ItemError::new(Side::Pipeline, ResolveError::Cancelled))
                }),
            })
            .collect();

        let failed = results.iter().filter(|r| !r.is_resolved()).count();
        info!(
            "Resolved {} items, {} failed",
            results.len() - failed,
            failed
        );
        results
    }
}

/// Store a finished task's outcome in its slot.
fn record(
    slots: &mut [Option<Outcome>],
    task_slots: &HashMap<tokio::task::Id, usize>,
    joined: Result<(tokio::task::Id, Outcome), tokio::task::JoinError>,
) {
    let (id, outcome) = match joined {
        Ok((id, outcome)) => (id, outcome),
        Err(e) if e.is_cancelled() => (
            e.id(),
            Outcome::Failed(ItemError::new(Side::Pipeline, ResolveError::Cancelled)),
        ),
        Err(e) => {
            warn!("Resolution task failed: {}", e);
            (
                e.id(),
                Outcome::Failed(ItemError::new(
                    Side::Pipeline,
                    ResolveError::Task(e.to_string()),
                )),
            )
        }
    };

    if let Some(&index) = task_slots.get(&id) {
        slots[index] = Some(outcome);
    }
}

/// Build both resolvers for an item, tagging config errors with their side.
fn prepare(item: &Item, endpoints: &Endpoints) -> Result<Resolvers, ItemError> {
    let source = build_source(&item.name, &item.source, endpoints)
        .map_err(|e| ItemError::new(Side::Source, e))?;

    let descriptor = item.package.as_ref().ok_or_else(|| {
        ItemError::new(
            Side::Package,
            ResolveError::Config("no package given and no default_package set".to_string()),
        )
    })?;
    let package = build_package(&item.name, descriptor, endpoints)
        .map_err(|e| ItemError::new(Side::Package, e))?;

    Ok((source, package))
}

/// Resolve source and package concurrently; a source error wins over a package error.
async fn resolve_item(
    source: &dyn SourceResolver,
    package: &dyn PackageResolver,
    fetcher: &dyn Fetcher,
) -> Outcome {
    debug!(
        "Resolving {} source {} against {} package {}",
        source.kind().as_str(),
        source.name(),
        package.kind().as_str(),
        package.name()
    );

    let (software, packaged) = join(resolve_latest(source, fetcher), package.resolve(fetcher)).await;

    match (software, packaged) {
        (Ok(software), Ok(package)) => Outcome::Resolved { software, package },
        (Err(error), _) => Outcome::Failed(ItemError::new(Side::Source, error)),
        (_, Err(error)) => Outcome::Failed(ItemError::new(Side::Package, error)),
    }
}
