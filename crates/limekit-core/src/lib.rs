//! # limekit-core
//!
//! Transaction lifecycle, per-screen controllers, gateway traits and the
//! shared plumbing (config, notifications, price feed) used by the limekit
//! front-ends.

pub mod authorization;
pub mod chain;
pub mod config;
pub mod debounce;
pub mod events;
pub mod forms;
pub mod gateway;
pub mod lifecycle;
pub mod notify;
pub mod price;
pub mod screens;
pub mod subscription;
pub mod types;
pub mod units;
pub mod view;

pub use lifecycle::{AttemptError, AttemptHandle, SubmitError, TransactionAttempt, TxStatus};
pub use subscription::Subscription;
