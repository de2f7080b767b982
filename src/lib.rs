//! sui-connect: wallet connection widget for Sui dapps.
//!
//! # Architecture
//!
//! ```text
//! mount(container)                      (wasm: DOM, localStorage, window)
//!   │
//!   └── Connector (core, platform-neutral)
//!         ├── WalletRegistry   → discovery (connect + sign features, sorted)
//!         ├── Selection        → Disconnected / Connecting / Connected
//!         ├── PreferredWallet  → auto-reconnect on load and on register
//!         ├── WidgetView       → button + picker render models
//!         └── Bridge           → {wallet, account, status, disconnect, signAndExecute}
//!                                     │
//!                                     └── Signer → wallet feature → ExecutionClient (RpcClient)
//! ```
//!
//! Every transition updates the selection first, then renders the button,
//! then the picker, then publishes to the bridge.
//!
//! # Features
//!
//! - `native` - tokio local spawner, stderr logging, RPC client (default; tests)
//! - `wasm` - browser widget via wasm-bindgen (`--no-default-features --features wasm`)
//!
//! # Usage
//!
//! ```ignore
//! use sui_connect::{Connector, Services, WidgetConfig, Network};
//!
//! let connector = Connector::new(WidgetConfig::new().with_network(Network::Testnet), services);
//! connector.start();
//! let response = connector.signer().sign_and_execute(SignRequest::new(tx)).await?;
//! ```

// =============================================================================
// Shared modules (compile everywhere)
// =============================================================================
pub mod config;
pub mod core;

#[cfg(any(feature = "native", feature = "wasm"))]
pub mod rpc;

// =============================================================================
// Native-only modules
// =============================================================================
#[cfg(feature = "native")]
pub mod logging;
#[cfg(feature = "native")]
pub mod runtime;

// =============================================================================
// WASM-only modules (browser, wasm-bindgen)
// =============================================================================
#[cfg(feature = "wasm")]
pub mod wasm;

// =============================================================================
// Re-exports: Shared
// =============================================================================
pub use config::{Labels, Network, WidgetConfig};
pub use crate::core::bridge::{Bridge, BridgeSnapshot, BridgeState, DisconnectHandle, SharedBridge};
pub use crate::core::connector::{Connector, Services, Spawn};
pub use crate::core::discovery::{connectable_wallets, is_connectable, list_connectable_wallets};
pub use crate::core::error::{WalletError, WalletResult};
pub use crate::core::registry::{MemoryRegistry, RegistryEvent, WalletRegistry};
pub use crate::core::selection::{Selection, Status};
pub use crate::core::signer::{ExecutionClient, ResponseOptions, SignRequest, Signer, TransactionResponse};
pub use crate::core::storage::{MemoryPreferences, PreferenceStore, PreferredWallet};
pub use crate::core::subscription::Subscription;
pub use crate::core::transaction::Transaction;
pub use crate::core::view::{truncate_address, ButtonModel, PickerEntry, PickerModel, WidgetView};
pub use crate::core::wallet::{
    choose_account, features, Account, ChangeHandler, ExecutedTransaction, SignTransactionInput,
    SignedTransaction, WalletChange, WalletHandle, WalletRef, WalletSummary,
};

#[cfg(any(feature = "native", feature = "wasm"))]
pub use rpc::RpcClient;

// =============================================================================
// Re-exports: Native
// =============================================================================
#[cfg(feature = "native")]
pub use logging::{init_logging, init_logging_with, LogFormat};
#[cfg(feature = "native")]
pub use runtime::{run_local, settle, LocalSpawner};

// =============================================================================
// Re-exports: WASM
// =============================================================================
#[cfg(feature = "wasm")]
pub use wasm::{mount, WidgetHandle};
