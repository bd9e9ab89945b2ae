//! # Tontine SDK
//!
//! Client for tontines deployed on Aptos. Reads tontine resources and status
//! views from a fullnode, memberships from the off-chain index and display
//! names from the name service, then derives what the connected account may
//! do with the rules in `tontine-core`.
//!
//! ```no_run
//! use tontine_sdk::{ClientConfig, TontineClient};
//! use tontine_types::Address;
//!
//! # async fn run() -> tontine_sdk::SdkResult<()> {
//! let config = ClientConfig::from_env()?;
//! let client = TontineClient::from_config(&config)?;
//! let tontine = Address::parse("0x7070")?;
//! let user = Address::parse("0xa11ce")?;
//! let view = client.load_view(&tontine, Some(&user)).await?;
//! for decision in view.decisions.iter().flat_map(|d| d.iter()) {
//!     println!("{}: {:?}", decision.action, decision.tooltip());
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod core;
pub mod instructions;
pub mod ports;

pub use crate::client::{
    LedgerClient, MembershipIndexClient, NameClient, Performed, TontineClient, TontineView,
};
pub use crate::core::{ClientConfig, Network, SdkError, SdkResult};
pub use crate::instructions::{CreateTontineRequest, EntryFunctionPayload, PayloadBuilder};
pub use crate::ports::{LedgerReader, MembershipIndex, NameResolver, NoNames, TransactionSubmitter, TxnHash};
