//! Wallet registry: the set of wallets currently injected into the page

use std::cell::RefCell;
use std::rc::Rc;

use super::subscription::Subscription;
use super::wallet::WalletRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistryEvent {
    Register,
    Unregister,
}

pub type RegistryHandler = Rc<dyn Fn()>;

pub trait WalletRegistry {
    /// Snapshot of the registered wallets, in registration order.
    fn get(&self) -> Vec<WalletRef>;

    fn on(&self, event: RegistryEvent, handler: RegistryHandler) -> Subscription;
}

struct Listener {
    id: u64,
    event: RegistryEvent,
    handler: RegistryHandler,
}

#[derive(Default)]
struct RegistryState {
    wallets: Vec<WalletRef>,
    listeners: Vec<Listener>,
    next_listener: u64,
}

/// In-memory registry. Backs the browser registry and stands in for it in tests.
#[derive(Clone, Default)]
pub struct MemoryRegistry {
    state: Rc<RefCell<RegistryState>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a wallet and notify `Register` listeners. A wallet whose id is
    /// already registered is ignored. The returned handle unregisters it.
    pub fn register(&self, wallet: WalletRef) -> Subscription {
        let id = wallet.id();
        {
            let mut state = self.state.borrow_mut();
            if state.wallets.iter().any(|w| w.id() == id) {
                tracing::debug!(wallet = %id, "wallet already registered");
                return Subscription::noop();
            }
            state.wallets.push(wallet);
        }
        tracing::debug!(wallet = %id, "wallet registered");
        self.emit(RegistryEvent::Register);

        let registry = self.clone();
        Subscription::new(move || {
            registry.unregister(&id);
        })
    }

    /// Remove a wallet by id and notify `Unregister` listeners.
    pub fn unregister(&self, id: &str) -> bool {
        let removed = {
            let mut state = self.state.borrow_mut();
            let before = state.wallets.len();
            state.wallets.retain(|w| w.id() != id);
            state.wallets.len() != before
        };
        if removed {
            tracing::debug!(wallet = %id, "wallet unregistered");
            self.emit(RegistryEvent::Unregister);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.state.borrow().wallets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn emit(&self, event: RegistryEvent) {
        // Handlers may read the registry; release the borrow before calling them.
        let handlers: Vec<RegistryHandler> = self
            .state
            .borrow()
            .listeners
            .iter()
            .filter(|l| l.event == event)
            .map(|l| l.handler.clone())
            .collect();
        for handler in handlers {
            handler();
        }
    }
}

impl WalletRegistry for MemoryRegistry {
    fn get(&self) -> Vec<WalletRef> {
        self.state.borrow().wallets.clone()
    }

    fn on(&self, event: RegistryEvent, handler: RegistryHandler) -> Subscription {
        let id = {
            let mut state = self.state.borrow_mut();
            let id = state.next_listener;
            state.next_listener += 1;
            state.listeners.push(Listener { id, event, handler });
            id
        };
        let state = Rc::downgrade(&self.state);
        Subscription::new(move || {
            if let Some(state) = state.upgrade() {
                state.borrow_mut().listeners.retain(|l| l.id != id);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::stub::stub_wallet;
    use std::cell::Cell;

    fn counter(registry: &MemoryRegistry, event: RegistryEvent) -> (Rc<Cell<u32>>, Subscription) {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let sub = registry.on(event, Rc::new(move || c.set(c.get() + 1)));
        (count, sub)
    }

    #[test]
    fn register_and_unregister_notify() {
        let registry = MemoryRegistry::new();
        let (registered, _r) = counter(&registry, RegistryEvent::Register);
        let (unregistered, _u) = counter(&registry, RegistryEvent::Unregister);

        let mut handle = registry.register(stub_wallet("A", &[]));
        registry.register(stub_wallet("B", &[]));
        assert_eq!(registered.get(), 2);
        assert_eq!(registry.len(), 2);

        handle.cancel();
        handle.cancel();
        assert_eq!(unregistered.get(), 1);
        assert_eq!(registry.get()[0].name(), "B");
    }

    #[test]
    fn duplicate_ids_are_ignored() {
        let registry = MemoryRegistry::new();
        let (registered, _r) = counter(&registry, RegistryEvent::Register);
        registry.register(stub_wallet("A", &[]));
        let dup = registry.register(stub_wallet("A", &[]));
        assert!(!dup.is_active());
        assert_eq!(registry.len(), 1);
        assert_eq!(registered.get(), 1);
    }

    #[test]
    fn cancelled_listener_is_not_called() {
        let registry = MemoryRegistry::new();
        let (registered, mut sub) = counter(&registry, RegistryEvent::Register);
        sub.cancel();
        registry.register(stub_wallet("A", &[]));
        assert_eq!(registered.get(), 0);
    }

    #[test]
    fn handlers_can_read_registry() {
        let registry = MemoryRegistry::new();
        let seen = Rc::new(Cell::new(0));
        let (r, s) = (registry.clone(), seen.clone());
        let _sub = registry.on(RegistryEvent::Register, Rc::new(move || s.set(r.get().len())));
        registry.register(stub_wallet("A", &[]));
        assert_eq!(seen.get(), 1);
    }
}
