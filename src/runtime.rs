//! Runtime - single-threaded task execution for native hosts
//!
//! Wallet futures are `!Send`, so native hosts run the connector on a
//! current-thread tokio runtime inside a `LocalSet`.

use futures::future::LocalBoxFuture;
use std::future::Future;
use tokio::task::LocalSet;

use crate::core::connector::Spawn;

/// Spawns onto the surrounding `LocalSet`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalSpawner;

impl Spawn for LocalSpawner {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        tokio::task::spawn_local(task);
    }
}

/// Drive `future` to completion on a fresh current-thread runtime.
pub fn run_local<F: Future>(future: F) -> std::io::Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(LocalSet::new().block_on(&runtime, future))
}

/// Let spawned local tasks run until they park.
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}
