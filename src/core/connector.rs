//! Connector: the widget's state owner
//!
//! Wires registry and wallet events, user actions and auto-reconnect into
//! the `Selection` state machine. After every transition it renders the
//! button, renders the picker and publishes to the bridge, in that order,
//! and only after the state has been updated.

use futures::future::LocalBoxFuture;
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::{Rc, Weak};

use super::bridge::{Bridge, BridgeState, DisconnectHandle};
use super::discovery::{find_wallet, list_connectable_wallets};
use super::error::{WalletError, WalletResult};
use super::registry::{RegistryEvent, WalletRegistry};
use super::selection::{ConnectTicket, Selection, Status};
use super::signer::{ExecutionClient, Signer};
use super::storage::{PreferenceStore, PreferredWallet};
use super::subscription::Subscription;
use super::view::{button_model, picker_model, WidgetView};
use super::wallet::{choose_account, features, Account, WalletChange, WalletRef, WalletSummary};
use crate::config::WidgetConfig;

/// Runs detached futures on the current thread.
pub trait Spawn {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>);
}

/// Collaborators the connector talks to.
#[derive(Clone)]
pub struct Services {
    pub registry: Rc<dyn WalletRegistry>,
    pub preferences: Rc<dyn PreferenceStore>,
    pub client: Rc<dyn ExecutionClient>,
    pub view: Rc<dyn WidgetView>,
    pub bridge: Rc<dyn Bridge>,
    pub spawner: Rc<dyn Spawn>,
}

struct Inner {
    config: WidgetConfig,
    registry: Rc<dyn WalletRegistry>,
    preferred: PreferredWallet,
    client: Rc<dyn ExecutionClient>,
    view: Rc<dyn WidgetView>,
    bridge: Rc<dyn Bridge>,
    spawner: Rc<dyn Spawn>,
    selection: RefCell<Selection>,
    picker_open: Cell<bool>,
    started: Cell<bool>,
    stopped: Cell<bool>,
    registry_subs: RefCell<Vec<Subscription>>,
    wallet_sub: RefCell<Option<Subscription>>,
    auto_attempted: RefCell<HashSet<String>>,
}

#[derive(Clone)]
pub struct Connector {
    inner: Rc<Inner>,
}

impl Connector {
    pub fn new(config: WidgetConfig, services: Services) -> Self {
        let preferred = PreferredWallet::new(services.preferences, config.storage_key.clone());
        Self {
            inner: Rc::new(Inner {
                config,
                registry: services.registry,
                preferred,
                client: services.client,
                view: services.view,
                bridge: services.bridge,
                spawner: services.spawner,
                selection: RefCell::new(Selection::new()),
                picker_open: Cell::new(false),
                started: Cell::new(false),
                stopped: Cell::new(false),
                registry_subs: RefCell::new(Vec::new()),
                wallet_sub: RefCell::new(None),
                auto_attempted: RefCell::new(HashSet::new()),
            }),
        }
    }

    fn from_weak(weak: &Weak<Inner>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.inner.config
    }

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    /// Subscribe to the registry, draw the initial state and kick off
    /// auto-reconnect. Calling it again is a no-op.
    pub fn start(&self) {
        if self.inner.started.replace(true) {
            return;
        }
        let weak = Rc::downgrade(&self.inner);
        let on_register = {
            let weak = weak.clone();
            Rc::new(move || {
                if let Some(connector) = Connector::from_weak(&weak) {
                    connector.handle_register();
                }
            })
        };
        let on_unregister = Rc::new(move || {
            if let Some(connector) = Connector::from_weak(&weak) {
                connector.handle_unregister();
            }
        });
        let subs = vec![
            self.inner.registry.on(RegistryEvent::Register, on_register),
            self.inner.registry.on(RegistryEvent::Unregister, on_unregister),
        ];
        self.inner.registry_subs.borrow_mut().extend(subs);

        self.refresh();
        self.spawn_auto_reconnect();
    }

    /// Detach every subscription. External wallet sessions are left alone.
    /// A connect still in flight resolves without touching the widget.
    pub fn stop(&self) {
        self.inner.stopped.set(true);
        let subs: Vec<Subscription> = self.inner.registry_subs.borrow_mut().drain(..).collect();
        for mut sub in subs {
            sub.cancel();
        }
        self.unwatch_wallet();
        tracing::debug!("connector stopped");
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    pub fn list_connectable_wallets(&self) -> Vec<WalletRef> {
        list_connectable_wallets(self.inner.registry.as_ref())
    }

    pub fn status(&self) -> Status {
        self.inner.selection.borrow().status()
    }

    pub fn wallet(&self) -> Option<WalletRef> {
        self.inner.selection.borrow().wallet().cloned()
    }

    pub fn account(&self) -> Option<Account> {
        self.inner.selection.borrow().account().cloned()
    }

    pub fn is_picker_open(&self) -> bool {
        self.inner.picker_open.get()
    }

    /// Signer bound to the current selection. Fails with `NotConnected`
    /// when called without a wallet and account.
    pub fn signer(&self) -> Signer {
        let selection = self.inner.selection.borrow();
        Signer::new(
            selection.wallet().cloned(),
            selection.account().cloned(),
            self.inner.client.clone(),
            self.inner.config.chain(),
        )
    }

    pub fn disconnect_handle(&self) -> DisconnectHandle {
        let weak = Rc::downgrade(&self.inner);
        DisconnectHandle::new(move || -> LocalBoxFuture<'static, ()> {
            let connector = Connector::from_weak(&weak);
            Box::pin(async move {
                if let Some(connector) = connector {
                    connector.disconnect().await;
                }
            })
        })
    }

    pub fn bridge_state(&self) -> BridgeState {
        let (wallet, account, status) = {
            let selection = self.inner.selection.borrow();
            (
                selection.wallet().map(|w| WalletSummary::of(w.as_ref())),
                selection.account().cloned(),
                selection.status(),
            )
        };
        let connected = status == Status::Connected;
        BridgeState {
            wallet,
            account,
            status,
            disconnect: connected.then(|| self.disconnect_handle()),
            signer: connected.then(|| self.signer()),
        }
    }

    // =========================================================================
    // TRANSITIONS
    // =========================================================================

    /// Connect to `wallet`. Dropped while another attempt is in flight.
    /// `persist` marks a user choice: it is remembered on success and the
    /// remembered choice is forgotten on failure. Auto-reconnect passes
    /// false and asks the wallet not to prompt.
    pub async fn connect(&self, wallet: WalletRef, persist: bool) {
        let ticket = match self.inner.selection.borrow_mut().begin_connect() {
            Some(ticket) => ticket,
            None => {
                tracing::debug!(wallet = %wallet.name(), "connect already in flight, ignoring");
                return;
            }
        };
        self.refresh();

        let name = wallet.name();
        tracing::info!(wallet = %name, silent = !persist, "connecting");
        let chain = self.inner.config.chain();
        let result = wallet.connect(!persist).await.and_then(|accounts| {
            choose_account(&accounts, chain)
                .ok_or(WalletError::NoAccountAuthorized { wallet: name.clone() })
        });
        self.finish_connect(ticket, wallet, result, persist);
    }

    fn finish_connect(
        &self,
        ticket: ConnectTicket,
        wallet: WalletRef,
        result: WalletResult<Account>,
        persist: bool,
    ) {
        if self.is_stopped() {
            tracing::debug!(wallet = %wallet.name(), "connect resolved after stop, discarding");
            return;
        }
        match result {
            Ok(account) => {
                let address = account.address.clone();
                let applied = self
                    .inner
                    .selection
                    .borrow_mut()
                    .complete_connect(ticket, wallet.clone(), account);
                if !applied {
                    tracing::debug!(wallet = %wallet.name(), "connect resolved after disconnect, discarding");
                    return;
                }
                self.inner.auto_attempted.borrow_mut().remove(&wallet.id());
                self.watch_wallet(&wallet);
                if persist {
                    self.inner.preferred.save(&wallet.id());
                }
                tracing::info!(wallet = %wallet.name(), %address, "connected");
            }
            Err(e) => {
                tracing::warn!(wallet = %wallet.name(), error = %e, "connect failed");
                if !self.inner.selection.borrow_mut().fail_connect(ticket) {
                    return;
                }
                self.unwatch_wallet();
                if persist {
                    self.inner.preferred.clear();
                }
            }
        }
        self.refresh();
    }

    /// Drop the selection, forget the preference, then ask the wallet to
    /// disconnect. Wallet errors are logged only.
    pub async fn disconnect(&self) {
        let previous = self.inner.selection.borrow_mut().clear();
        self.unwatch_wallet();
        self.inner.preferred.clear();
        self.inner.picker_open.set(false);
        self.refresh();

        let Some(wallet) = previous else {
            return;
        };
        tracing::info!(wallet = %wallet.name(), "disconnected");
        if wallet.has_feature(features::DISCONNECT) {
            if let Err(e) = wallet.disconnect().await {
                tracing::warn!(wallet = %wallet.name(), error = %e, "wallet disconnect failed");
            }
        }
    }

    /// Silently reconnect to the remembered wallet when nothing is selected
    /// or in flight. A wallet whose attempt failed is not tried again; a
    /// successful connect makes it eligible once more.
    pub async fn auto_reconnect(&self) {
        if self.is_stopped() {
            return;
        }
        {
            let selection = self.inner.selection.borrow();
            if selection.wallet().is_some() || selection.is_connecting() {
                return;
            }
        }
        let Some(preferred) = self.inner.preferred.load() else {
            return;
        };
        let Some(wallet) = find_wallet(&self.list_connectable_wallets(), &preferred) else {
            tracing::debug!(wallet = %preferred, "preferred wallet not available yet");
            return;
        };
        if !self.inner.auto_attempted.borrow_mut().insert(preferred) {
            return;
        }
        self.connect(wallet, false).await;
    }

    // =========================================================================
    // USER ACTIONS
    // =========================================================================

    pub fn toggle_picker(&self) {
        let open = !self.inner.picker_open.get();
        self.inner.picker_open.set(open);
        self.render();
    }

    pub fn close_picker(&self) {
        if self.inner.picker_open.replace(false) {
            self.render();
        }
    }

    /// Picker click: close the picker and connect to the wallet with `id`.
    pub fn select_wallet(&self, id: &str) -> bool {
        let Some(wallet) = find_wallet(&self.list_connectable_wallets(), id) else {
            tracing::warn!(wallet = %id, "selected wallet is not available");
            return false;
        };
        self.close_picker();
        let connector = self.clone();
        self.inner
            .spawner
            .spawn(Box::pin(async move { connector.connect(wallet, true).await }));
        true
    }

    pub fn request_disconnect(&self) {
        let connector = self.clone();
        self.inner
            .spawner
            .spawn(Box::pin(async move { connector.disconnect().await }));
    }

    // =========================================================================
    // EVENT HANDLERS
    // =========================================================================

    fn handle_register(&self) {
        if self.is_stopped() {
            return;
        }
        self.render();
        self.spawn_auto_reconnect();
    }

    fn handle_unregister(&self) {
        if self.is_stopped() {
            return;
        }
        let removed = {
            let selection = self.inner.selection.borrow();
            selection
                .wallet()
                .map(|active| {
                    let id = active.id();
                    !self.inner.registry.get().iter().any(|w| w.id() == id)
                })
                .unwrap_or(false)
        };
        if !removed {
            self.render();
            return;
        }
        let previous = self.inner.selection.borrow_mut().drop_wallet();
        self.unwatch_wallet();
        if let Some(wallet) = previous {
            tracing::info!(wallet = %wallet.name(), "active wallet unregistered");
        }
        self.refresh();
    }

    fn handle_change(&self, wallet_id: &str, change: WalletChange) {
        if self.is_stopped() || !self.inner.selection.borrow().is_active(wallet_id) {
            return;
        }
        let Some(accounts) = change.accounts else {
            return;
        };
        let chosen = choose_account(&accounts, self.inner.config.chain());
        if chosen.is_some() && chosen.as_ref() == self.inner.selection.borrow().account() {
            return;
        }
        let disconnected = chosen.is_none();
        self.inner.selection.borrow_mut().set_account(chosen);
        if disconnected {
            tracing::info!(wallet = %wallet_id, "wallet reported no accounts");
            self.unwatch_wallet();
        }
        self.refresh();
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    fn is_stopped(&self) -> bool {
        self.inner.stopped.get()
    }

    fn spawn_auto_reconnect(&self) {
        if self.is_stopped() {
            return;
        }
        {
            let selection = self.inner.selection.borrow();
            if selection.wallet().is_some() || selection.is_connecting() {
                return;
            }
        }
        let connector = self.clone();
        self.inner
            .spawner
            .spawn(Box::pin(async move { connector.auto_reconnect().await }));
    }

    fn watch_wallet(&self, wallet: &WalletRef) {
        self.unwatch_wallet();
        let weak = Rc::downgrade(&self.inner);
        let id = wallet.id();
        let handler = Rc::new(move |change: WalletChange| {
            if let Some(connector) = Connector::from_weak(&weak) {
                connector.handle_change(&id, change);
            }
        });
        *self.inner.wallet_sub.borrow_mut() = wallet.on_change(handler);
    }

    fn unwatch_wallet(&self) {
        let sub = self.inner.wallet_sub.borrow_mut().take();
        if let Some(mut sub) = sub {
            sub.cancel();
        }
    }

    fn render(&self) {
        let wallets = self.list_connectable_wallets();
        let labels = &self.inner.config.labels;
        let (button, picker) = {
            let selection = self.inner.selection.borrow();
            (
                button_model(&selection, labels),
                picker_model(&wallets, &selection, self.inner.picker_open.get(), labels),
            )
        };
        self.inner.view.render_button(&button);
        self.inner.view.render_picker(&picker);
    }

    fn refresh(&self) {
        self.render();
        let state = self.bridge_state();
        tracing::debug!(status = state.status.as_str(), "publishing state");
        self.inner.bridge.publish(&state);
    }
}
