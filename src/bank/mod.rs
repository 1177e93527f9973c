//! Banking module: ledger records, transfer validation and execution, and the
//! invocation surface.
mod account;
mod balance;
mod chaincode;
mod executor;
mod permission;
mod seed;
mod state;
mod store;
mod transaction;
mod types;
mod view;

pub use account::*;
pub use balance::*;
pub use chaincode::*;
pub use executor::*;
pub use permission::*;
pub use seed::*;
pub use state::*;
pub use store::*;
pub use transaction::*;
pub use types::*;
pub use view::*;
