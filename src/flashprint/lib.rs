//! # Flashprint Architecture
//!
//! Flashprint keeps a catalog of two-sided study cards and lays selected cards
//! out for manual duplex printing. It is a library with a CLI client, not a
//! CLI with some library code attached.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, writes page files      │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Owns view state: selection filter, translator            │
//! │  - Returns structured Result types                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)        Layout (layout/)      │
//! │  - Card store operations              - Pure page geometry  │
//! │  - Print jobs and bookkeeping         - PaintSurface trait  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - Abstract DataStore trait                                 │
//! │  - FileStore (production), InMemoryStore (testing)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Printing
//!
//! A print run is three steps with a clear boundary between them:
//!
//! 1. [`commands::print::prepare`] captures the selected cards, expanded by
//!    copy count, plus their ids and the layout parameters.
//! 2. [`layout::layout`] turns the captured cards into front/back page pairs.
//!    Pure; previews can run it as often as they like.
//! 3. [`commands::print::mark_printed`] records the print for the captured ids
//!    only, in one commit.
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code never writes to stdout/stderr, never exits the
//! process and never assumes a terminal. Time is passed in where it matters
//! (the search debounce, print timestamps) so tests stay deterministic.
//!
//! ## Testing Strategy
//!
//! 1. **Commands** (`commands/*.rs`): thorough unit tests against
//!    `InMemoryStore`. Most tests live here.
//! 2. **Layout** (`layout/`): geometry properties over every sheet size.
//! 3. **API** (`api.rs`): dispatch and end-to-end scenarios.
//! 4. **CLI** (`cli/`, `tests/`): argument parsing, rendering, and binary runs.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each command
//! - [`filter`]: Debounced search text and view mode
//! - [`query`]: View queries and catalog ordering
//! - [`layout`]: Duplex page layout and the SVG surface
//! - [`model`]: Core data types (`Card`, `CardTable`, `RenderCard`)
//! - [`settings`]: Layout and UI settings
//! - [`store`]: Storage abstraction and implementations
//! - [`translate`]: Optional back-text auto-fill
//! - [`error`]: Error types
//! - `cli`: Argument parsing and printing for the binary (not part of the lib API)

pub mod api;
pub mod commands;
pub mod error;
pub mod filter;
pub mod layout;
pub mod model;
pub mod query;
pub mod settings;
pub mod store;
pub mod translate;
