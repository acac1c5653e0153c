//! An asynchronous, `no_std` client vocabulary for the NVEC embedded controller.
//!
//! The embedded controller (EC) on these boards scans the keyboard, reports
//! events and accepts commands over a request/response protocol. This crate
//! describes that protocol: request categories, keyboard sub-commands, status
//! codes, event kinds and fixed-capacity frames. It also defines the
//! `EcTransport` trait a platform implements to carry those frames.
//!
//! The crate does not talk to hardware itself. Board drivers such as
//! `nvec-keyboard-async` are written against `EcTransport`.
//!
//! # Usage
//!
//! ```no_run
//! # async fn enable<T: nvec_async::EcTransport>(ec: &T) -> Result<(), nvec_async::EcError<T::Error>> {
//! use nvec_async::op::{KeyboardSubtype, Request};
//!
//! ec.open().await.map_err(nvec_async::EcError::Transport)?;
//! let request = Request::keyboard(KeyboardSubtype::Enable, &[])?;
//! let response = ec.request(&request).await?;
//! log::debug!("keyboard enabled, status {:?}", response.status);
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), no_std)]

pub mod op;

mod ec;
pub use ec::*;
