//! Bridge: where the rest of the application observes the connection

use futures::future::LocalBoxFuture;
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use super::selection::Status;
use super::signer::Signer;
use super::wallet::{Account, WalletSummary};

/// Callable that disconnects the widget it came from.
#[derive(Clone)]
pub struct DisconnectHandle {
    run: Rc<dyn Fn() -> LocalBoxFuture<'static, ()>>,
}

impl DisconnectHandle {
    pub fn new(run: impl Fn() -> LocalBoxFuture<'static, ()> + 'static) -> Self {
        Self { run: Rc::new(run) }
    }

    pub async fn disconnect(&self) {
        (self.run)().await
    }
}

impl fmt::Debug for DisconnectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DisconnectHandle")
    }
}

/// Published state. `disconnect` and `signer` are only set while connected.
#[derive(Debug, Clone)]
pub struct BridgeState {
    pub wallet: Option<WalletSummary>,
    pub account: Option<Account>,
    pub status: Status,
    pub disconnect: Option<DisconnectHandle>,
    pub signer: Option<Signer>,
}

impl BridgeState {
    pub fn disconnected() -> Self {
        Self {
            wallet: None,
            account: None,
            status: Status::Disconnected,
            disconnect: None,
            signer: None,
        }
    }

    pub fn snapshot(&self) -> BridgeSnapshot {
        BridgeSnapshot {
            wallet: self.wallet.clone(),
            account: self.account.clone(),
            status: self.status,
        }
    }
}

/// Plain-data part of the bridge state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BridgeSnapshot {
    pub wallet: Option<WalletSummary>,
    pub account: Option<Account>,
    pub status: Status,
}

pub trait Bridge {
    fn publish(&self, state: &BridgeState);
}

/// Keeps the latest published state in memory.
#[derive(Clone, Default)]
pub struct SharedBridge {
    current: Rc<RefCell<Option<BridgeState>>>,
    publishes: Rc<Cell<usize>>,
}

impl SharedBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<BridgeState> {
        self.current.borrow().clone()
    }

    pub fn publish_count(&self) -> usize {
        self.publishes.get()
    }
}

impl Bridge for SharedBridge {
    fn publish(&self, state: &BridgeState) {
        *self.current.borrow_mut() = Some(state.clone());
        self.publishes.set(self.publishes.get() + 1);
    }
}
