use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use alloy::primitives::Address;
use tracing::{debug, warn};

use token_admin_core::AddressResolverPort;

/// The contract address currently in force and the chain it was resolved for, shared between
/// the resolver and the contract adapter.
#[derive(Debug, Clone, Default)]
pub struct ContractAddressCell(Arc<RwLock<Resolved>>);

#[derive(Debug, Clone, Copy, Default)]
struct Resolved {
    chain_id: u64,
    address: Option<Address>,
}

impl ContractAddressCell {
    fn snapshot(&self) -> Resolved {
        match self.0.read() {
            Ok(g) => *g,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    pub fn get(&self) -> Option<Address> {
        self.snapshot().address
    }

    pub fn chain_id(&self) -> u64 {
        self.snapshot().chain_id
    }

    pub fn set(&self, chain_id: u64, address: Option<Address>) {
        let resolved = Resolved { chain_id, address };
        match self.0.write() {
            Ok(mut g) => *g = resolved,
            Err(poisoned) => *poisoned.into_inner() = resolved,
        }
    }
}

/// Resolves the deployed contract from a fixed chain id to address table.
#[derive(Debug, Clone)]
pub struct StaticAddressResolver {
    addresses: BTreeMap<u64, Address>,
    current: ContractAddressCell,
}

impl StaticAddressResolver {
    pub fn new(addresses: BTreeMap<u64, Address>, initial_chain_id: u64) -> Self {
        let current = ContractAddressCell::default();
        current.set(initial_chain_id, addresses.get(&initial_chain_id).copied());
        Self { addresses, current }
    }

    pub fn cell(&self) -> ContractAddressCell {
        self.current.clone()
    }
}

impl AddressResolverPort for StaticAddressResolver {
    fn update_contract_address(&self, chain_id: u64) {
        let address = self.addresses.get(&chain_id).copied();
        match address {
            Some(address) => debug!(chain_id, %address, "contract address selected"),
            None => warn!(chain_id, "no contract address configured for chain"),
        }
        self.current.set(chain_id, address);
    }

    fn contract_address(&self) -> Option<Address> {
        self.current.get()
    }
}
