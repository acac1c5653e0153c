//! An asynchronous, `no_std` driver for the keyboard behind the NVEC embedded controller.
//!
//! The embedded controller scans the keyboard matrix and reports every key
//! as a Scan Code Set 1 sequence. This crate provides a `KeyboardDriver` that
//! starts scanning, arms wake-on-keypress, decodes the sequences into key
//! events and programs the keyboard LEDs.
//!
//! # Usage
//!
//! To use this driver, you need an embedded controller transport that
//! implements `nvec_async::EcTransport`, and optionally a wake source such as
//! `wake::PinWakeSource` over the controller's wake line.
//!
//! ```no_run
//! use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
//! use embassy_sync::channel::Channel;
//! use nvec_async::EcTransport;
//! use nvec_keyboard_async::keyboard::{KeyMessage, KeyboardConfig, KeyboardDriver};
//! use nvec_keyboard_async::leds::Leds;
//!
//! async fn keyboard<T: EcTransport>(ec: &T) {
//!     let config = KeyboardConfig::default();
//!     let Ok(driver) = KeyboardDriver::without_wake(ec, &config).await else {
//!         log::warn!("Keyboard unavailable");
//!         return;
//!     };
//!
//!     let keys: Channel<CriticalSectionRawMutex, KeyMessage, 4> = Channel::new();
//!     let consume = async {
//!         while let KeyMessage::Key(key) = keys.receive().await {
//!             // Scroll Lock
//!             if key.scan_code == 0x46 && key.is_make() {
//!                 let _ = driver.toggle_leds(Leds::SCROLL_LOCK).await;
//!             }
//!         }
//!     };
//!     embassy_futures::join::join(driver.run(keys.sender()), consume).await;
//! }
//! ```

#![cfg_attr(not(test), no_std)]

pub mod err;
pub mod hold_switch;
pub mod keyboard;
pub mod leds;
pub mod scancode;
pub mod wake;
