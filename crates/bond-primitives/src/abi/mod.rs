//! Solidity bindings for the contracts the client talks to.

pub mod account;
pub mod entrypoint;
pub mod erc20;
pub mod protocol;

pub use account::{IAccount, IAccountFactory};
pub use entrypoint::{IEntryPoint, UserOperation};
pub use erc20::IERC20;
pub use protocol::IProtocol;
