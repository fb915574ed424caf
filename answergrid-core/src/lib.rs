//! # Answergrid Core
//!
//! Editing model for "paint-by-answer" grid activities: a square grid whose
//! cells hold answer tokens, each token bound to a question and a display
//! color. This crate owns the data model and every mutation path; it renders
//! nothing itself — layout and export live in the sibling crates.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              answergrid-core                │
//! ├──────────────────┬──────────────────────────┤
//! │  Grid Engine     │  History Store           │
//! │  - Snapshots     │  - Flat entries + cursor │
//! │  - Brush stamps  │  - Truncate on write     │
//! │  - Token erase   │  - Overwrite on reload   │
//! ├──────────────────┼──────────────────────────┤
//! │  Bindings        │  Session / Store         │
//! │  - Token → color │  - Stroke lifecycle      │
//! │  - Token → ref   │  - Question sync         │
//! │  - Duplicates    │  - Activity documents    │
//! └──────────────────┴──────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod binding;
pub mod color;
pub mod error;
pub mod grid;
pub mod history;
pub mod question;
pub mod session;
pub mod store;

pub use binding::{resolve_bindings, AnswerBindings};
pub use color::{next_available, standard_palette, PaintColor};
pub use error::{CoreError, CoreResult};
pub use grid::{BrushTool, GridSnapshot, BRUSH_SIZES, SUPPORTED_GRID_SIZES};
pub use history::History;
pub use question::{
    AnswerOption, OptionId, Question, QuestionId, QuestionKind, QuestionType,
};
pub use session::{EditorSession, DEFAULT_GRID_SIZE, UNTITLED_ACTIVITY};
pub use store::{
    ActivityDocument, ActivityStore, OptionDocument, QuestionDocument, StoreError,
};

/// Core crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
