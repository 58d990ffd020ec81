//! Pointer-gesture capture and recognition engine for the browser.
//!
//! This crate is compiled to WebAssembly and runs inside a page. It watches
//! for the platform's activation button being held and dragged, quantizes the
//! drawn trajectory into a direction string over `{U, D, L, R}`, renders a
//! fading trail while the gesture is in flight, and hands the finished
//! pattern to the host for dispatch. The host is responsible only for
//! supplying configuration and acting on completed gestures.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | DOM wiring and the exported [`engine::GestureEngine`] |
//! | [`tracker`] | Pure gesture state machine ([`tracker::TrackerCore`]) |
//! | [`pattern`] | Direction quantization and pattern utilities |
//! | [`platform`] | Platform/input-kind detection and activation profiles |
//! | [`input`] | The unified pointer event shape |
//! | [`coords`] | Coordinate correction, viewport, cancellation zone |
//! | [`trail`] | Trail point model and fade-out math |
//! | [`render`] | Canvas trail surface (the only Canvas2D consumer) |
//! | [`overlay`] | Hint and cancel-zone DOM overlays |
//! | [`config`] | Runtime settings and built-in defaults |
//! | [`consts`] | Shared numeric constants (thresholds, delays, margins) |

pub mod config;
pub mod consts;
pub mod coords;
mod dom;
pub mod engine;
pub mod input;
pub mod overlay;
pub mod pattern;
pub mod platform;
pub mod render;
pub mod tracker;
pub mod trail;
