#![forbid(unsafe_code)]

//! Core: counter engine, view lifecycle, routing, and the application
//! controller for the Tally single-page counter demo.
//!
//! # Role in Tally
//! `tally-core` is the host-agnostic layer. Everything that can be
//! decided without a browser lives here: the numeric engine, the route
//! table, the history log, the widget rules, and the controller that
//! turns user intent into ordered [`app::HostAction`] lists.
//!
//! # Primary responsibilities
//! - **CounterEngine**: wrapping `i32` counter plus operation count.
//! - **BackendBinding**: explicit uninitialized/ready/failed gate in
//!   front of the engine.
//! - **RouteTable / HistoryLog**: path resolution and the modeled
//!   browser history stack.
//! - **AppCore**: the single controller composing all of the above.
//!
//! # How it fits in the system
//! `tally-web` wraps [`app::AppCore`] behind `wasm-bindgen` and executes
//! the emitted actions against the real DOM and History API.
//! `tally-server` is independent of this crate; it only serves the
//! static shell. Because nothing here touches the browser, the whole
//! crate tests natively.

pub mod app;
pub mod battery;
pub mod binding;
pub mod clock;
pub mod engine;
pub mod history;
pub mod lifecycle;
pub mod markup;
pub mod route;
pub mod snapshot;
pub mod widget;

pub use app::{AppConfig, AppCore, HostAction};
pub use binding::{BackendBinding, BackendUnavailable};
pub use engine::CounterEngine;
pub use snapshot::StateSnapshot;
