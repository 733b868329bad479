pub mod config;
pub mod contract;
pub mod eip1193;
pub mod resolver;

pub use config::{AdapterConfig, ConfigError, RuntimeProfile};
pub use contract::TokenContractAdapter;
pub use eip1193::Eip1193Adapter;
pub use resolver::{ContractAddressCell, StaticAddressResolver};
