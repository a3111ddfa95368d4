//! Data layer: core types, ingestion and filtering.
//!
//! Architecture:
//! ```text
//!   session .csv
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  classify rows, check subject + targets
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  drop observations outside the display bounds
//!   └──────────┘
//!        │
//!        ▼
//!   ┌────────────────┐
//!   │ SessionDataset │  targets + (tracker, label) series
//!   └────────────────┘
//! ```

pub mod error;
pub mod filter;
pub mod loader;
pub mod model;

pub use error::SessionError;
pub use filter::DisplayBounds;
pub use loader::{load_file, RowKind, SessionLoader};
pub use model::{Observation, Position, SeriesKey, SessionDataset};
