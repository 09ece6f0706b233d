//! Room planner: place furniture photos on top of a photo of your room.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It owns the
//! whole interaction: loading the furniture catalog, placing items over the
//! room photo, selecting, dragging, resizing, and rotating them, and keeping
//! the DOM in sync with the resulting scene. The host JavaScript layer only
//! forwards DOM events to [`web::RoomPlanner`] and fetches the catalog.
//!
//! Everything except [`dom`] and [`web`] is plain Rust and is tested natively.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Event router, [`engine::EngineCore`], and host [`engine::Action`]s |
//! | [`scene`] | Room surface, placed items, z-order, and selection |
//! | [`manipulation`] | Drag, resize, and rotate gestures |
//! | [`hit`] | Hit-testing placed items and their handles |
//! | [`input`] | Input event types and the gesture state machine |
//! | [`catalog`] | Catalog sources, parsing, and the picker |
//! | [`render`] | Reconciling the scene against a render surface |
//! | [`dom`] | The browser render surface |
//! | [`web`] | The `wasm-bindgen` entry point |
//! | [`geom`] | Points, sizes, and rotation math |
//! | [`config`] | Environment-driven configuration |
//! | [`telemetry`] | Tracing subscriber setup |
//! | [`consts`] | Shared numeric constants (default sizes, handle radii, etc.) |

pub mod catalog;
pub mod config;
pub mod consts;
pub mod dom;
pub mod engine;
pub mod geom;
pub mod hit;
pub mod input;
pub mod manipulation;
pub mod render;
pub mod scene;
pub mod telemetry;
pub mod web;
