//! Rota Core - reviewer selection and reassignment for pull requests
//!
//! This crate assigns active teammates as reviewers when a pull request is
//! opened, replaces reviewers on request, and repairs every open pull
//! request when a whole team is deactivated. Storage is abstracted behind
//! the [`Store`] trait; an in-memory implementation ships here and a SQLite
//! one lives in `rota-db`.

pub mod config;
pub mod error;
pub mod model;
pub mod selection;
pub mod service;
pub mod store;

pub use config::{CliOverrides, Config, SelectionConfig, StoreBackend, StoreConfig};
pub use error::{ConflictKind, Error, ErrorBody, ErrorCode, Result};
pub use model::{
    DeactivationReport, PrStatus, PullRequest, Reassignment, Stats, Team, TeamMember, User,
    TARGET_REVIEWERS,
};
pub use selection::ReviewerPicker;
pub use service::ReviewService;
pub use store::{InMemoryStore, Store};
