//! Shared fixtures for integration tests: scriptable wallet, recording
//! view and bridge, counting preferences and a fake execution client.

#![allow(dead_code)]

use async_trait::async_trait;
use futures::channel::oneshot;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use sui_connect::{
    features, Account, Bridge, BridgeState, ButtonModel, ChangeHandler, Connector,
    ExecutedTransaction, ExecutionClient, LocalSpawner, MemoryPreferences, MemoryRegistry,
    PickerModel, PreferenceStore, ResponseOptions, Services, SharedBridge, SignTransactionInput,
    SignedTransaction, Subscription, TransactionResponse, WalletChange, WalletError,
    WalletHandle, WalletResult, WidgetConfig, WidgetView,
};

pub const ADDRESS: &str = "0xabc1234567890def";

pub fn account(address: &str, chains: &[&str]) -> Account {
    Account::new(address, chains.iter().map(|c| c.to_string()).collect())
}

// =============================================================================
// Wallet
// =============================================================================

pub struct MockWallet {
    name: String,
    features: Vec<String>,
    connect_result: RefCell<WalletResult<Vec<Account>>>,
    gate: RefCell<Option<oneshot::Receiver<()>>>,
    handler: Rc<RefCell<Option<ChangeHandler>>>,
    pub connect_calls: Cell<usize>,
    pub silent_calls: Cell<usize>,
    pub disconnect_calls: Cell<usize>,
    pub sign_inputs: RefCell<Vec<(String, SignTransactionInput)>>,
    pub sign_error: RefCell<Option<WalletError>>,
}

impl MockWallet {
    /// Connectable wallet that signs with `sui:signAndExecuteTransaction`
    /// and authorizes one mainnet account.
    pub fn new(name: &str) -> Rc<Self> {
        Self::with_features(
            name,
            &[
                features::CONNECT,
                features::DISCONNECT,
                features::EVENTS,
                features::SIGN_AND_EXECUTE_TRANSACTION,
            ],
        )
    }

    pub fn with_features(name: &str, feature_names: &[&str]) -> Rc<Self> {
        Rc::new(Self {
            name: name.to_string(),
            features: feature_names.iter().map(|f| f.to_string()).collect(),
            connect_result: RefCell::new(Ok(vec![account(ADDRESS, &["sui:mainnet"])])),
            gate: RefCell::new(None),
            handler: Rc::new(RefCell::new(None)),
            connect_calls: Cell::new(0),
            silent_calls: Cell::new(0),
            disconnect_calls: Cell::new(0),
            sign_inputs: RefCell::new(Vec::new()),
            sign_error: RefCell::new(None),
        })
    }

    pub fn set_connect_result(&self, result: WalletResult<Vec<Account>>) {
        *self.connect_result.borrow_mut() = result;
    }

    /// Hold the next `connect` until the returned sender fires.
    pub fn hold_connect(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.gate.borrow_mut() = Some(rx);
        tx
    }

    pub fn is_watched(&self) -> bool {
        self.handler.borrow().is_some()
    }

    /// Fire a `change` event at the registered listener, if any.
    pub fn emit_change(&self, accounts: Option<Vec<Account>>) {
        let handler = self.handler.borrow().clone();
        if let Some(handler) = handler {
            handler(WalletChange { accounts });
        }
    }
}

#[async_trait(?Send)]
impl WalletHandle for MockWallet {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn features(&self) -> Vec<String> {
        self.features.clone()
    }

    fn accounts(&self) -> Vec<Account> {
        self.connect_result.borrow().clone().unwrap_or_default()
    }

    async fn connect(&self, silent: bool) -> WalletResult<Vec<Account>> {
        self.connect_calls.set(self.connect_calls.get() + 1);
        if silent {
            self.silent_calls.set(self.silent_calls.get() + 1);
        }
        let gate = self.gate.borrow_mut().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        self.connect_result.borrow().clone()
    }

    async fn disconnect(&self) -> WalletResult<()> {
        self.disconnect_calls.set(self.disconnect_calls.get() + 1);
        Ok(())
    }

    async fn sign_transaction(
        &self,
        feature: &str,
        input: SignTransactionInput,
    ) -> WalletResult<SignedTransaction> {
        self.sign_inputs.borrow_mut().push((feature.to_string(), input));
        if let Some(e) = self.sign_error.borrow().clone() {
            return Err(e);
        }
        Ok(SignedTransaction { bytes: "dHhieXRlcw==".into(), signature: "c2ln".into() })
    }

    async fn sign_and_execute(
        &self,
        feature: &str,
        input: SignTransactionInput,
    ) -> WalletResult<ExecutedTransaction> {
        self.sign_inputs.borrow_mut().push((feature.to_string(), input));
        if let Some(e) = self.sign_error.borrow().clone() {
            return Err(e);
        }
        Ok(ExecutedTransaction { digest: "D1gest".into(), bytes: None, signature: None })
    }

    fn on_change(&self, handler: ChangeHandler) -> Option<Subscription> {
        if !self.has_feature(features::EVENTS) {
            return None;
        }
        *self.handler.borrow_mut() = Some(handler);
        let slot = self.handler.clone();
        Some(Subscription::new(move || {
            slot.borrow_mut().take();
        }))
    }
}

// =============================================================================
// View and bridge
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Button(String),
    Picker(bool),
    Publish(sui_connect::Status),
}

#[derive(Default)]
pub struct RecordingView {
    pub events: Rc<RefCell<Vec<Event>>>,
    pub buttons: RefCell<Vec<ButtonModel>>,
    pub pickers: RefCell<Vec<PickerModel>>,
}

impl RecordingView {
    pub fn last_button(&self) -> ButtonModel {
        self.buttons.borrow().last().cloned().expect("button rendered")
    }

    pub fn last_picker(&self) -> PickerModel {
        self.pickers.borrow().last().cloned().expect("picker rendered")
    }

    pub fn render_count(&self) -> usize {
        self.buttons.borrow().len()
    }
}

impl WidgetView for RecordingView {
    fn render_button(&self, model: &ButtonModel) {
        self.events.borrow_mut().push(Event::Button(model.label.clone()));
        self.buttons.borrow_mut().push(model.clone());
    }

    fn render_picker(&self, model: &PickerModel) {
        self.events.borrow_mut().push(Event::Picker(model.open));
        self.pickers.borrow_mut().push(model.clone());
    }
}

pub struct RecordingBridge {
    pub events: Rc<RefCell<Vec<Event>>>,
    pub inner: SharedBridge,
}

impl Bridge for RecordingBridge {
    fn publish(&self, state: &BridgeState) {
        self.events.borrow_mut().push(Event::Publish(state.status));
        self.inner.publish(state);
    }
}

// =============================================================================
// Preferences and client
// =============================================================================

#[derive(Default)]
pub struct CountingPreferences {
    pub inner: MemoryPreferences,
    pub writes: Cell<usize>,
    pub removes: Cell<usize>,
}

impl PreferenceStore for CountingPreferences {
    fn get(&self, key: &str) -> WalletResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> WalletResult<()> {
        self.writes.set(self.writes.get() + 1);
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> WalletResult<()> {
        self.removes.set(self.removes.get() + 1);
        self.inner.remove(key)
    }
}

#[derive(Default)]
pub struct MockClient {
    pub executed: RefCell<Vec<(String, String, ResponseOptions)>>,
    pub waited: RefCell<Vec<String>>,
}

#[async_trait(?Send)]
impl ExecutionClient for MockClient {
    async fn execute_transaction(
        &self,
        bytes: &str,
        signature: &str,
        options: ResponseOptions,
    ) -> WalletResult<TransactionResponse> {
        self.executed
            .borrow_mut()
            .push((bytes.to_string(), signature.to_string(), options));
        Ok(TransactionResponse::new("ExecD1gest"))
    }

    async fn wait_for_transaction(
        &self,
        digest: &str,
        _options: ResponseOptions,
    ) -> WalletResult<TransactionResponse> {
        self.waited.borrow_mut().push(digest.to_string());
        Ok(TransactionResponse::new(digest))
    }
}

// =============================================================================
// Harness
// =============================================================================

pub struct Harness {
    pub connector: Connector,
    pub registry: Rc<MemoryRegistry>,
    pub preferences: Rc<CountingPreferences>,
    pub client: Rc<MockClient>,
    pub view: Rc<RecordingView>,
    pub bridge: SharedBridge,
    pub events: Rc<RefCell<Vec<Event>>>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(WidgetConfig::new())
    }

    pub fn with_config(config: WidgetConfig) -> Self {
        sui_connect::init_logging();
        let registry = Rc::new(MemoryRegistry::new());
        let preferences = Rc::new(CountingPreferences::default());
        let client = Rc::new(MockClient::default());
        let events = Rc::new(RefCell::new(Vec::new()));
        let view = Rc::new(RecordingView { events: events.clone(), ..Default::default() });
        let bridge = SharedBridge::new();
        let services = Services {
            registry: registry.clone(),
            preferences: preferences.clone(),
            client: client.clone(),
            view: view.clone(),
            bridge: Rc::new(RecordingBridge { events: events.clone(), inner: bridge.clone() }),
            spawner: Rc::new(LocalSpawner),
        };
        Self {
            connector: Connector::new(config, services),
            registry,
            preferences,
            client,
            view,
            bridge,
            events,
        }
    }

    /// Store a preferred wallet id without counting it as a write.
    pub fn remember(&self, wallet_id: &str) {
        let key = self.connector.config().storage_key.clone();
        let _ = self.preferences.inner.set(&key, wallet_id);
    }

    pub fn remembered(&self) -> Option<String> {
        let key = self.connector.config().storage_key.clone();
        self.preferences.inner.get(&key).ok().flatten()
    }

    pub fn published(&self) -> BridgeState {
        self.bridge.current().expect("state published")
    }

    pub fn publish_count(&self) -> usize {
        self.bridge.publish_count()
    }
}
