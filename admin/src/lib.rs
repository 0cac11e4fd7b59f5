//! # Sethmo Admin - content console for the Sethmo Group website
//!
//! Staff edit the website's structured content (hero banner, sectors, team,
//! news, careers, inbox, site settings) against the Sethmo content API.
//! Every page of the console follows one pattern: fetch a JSON document,
//! edit it locally, POST the whole document back.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ ContentType │────▶│ CollectionEditor │────▶│ ContentApi  │────▶│ Content API │
//! │  (registry) │     │ DocumentEditor   │     │  (reqwest)  │     │   (REST)    │
//! └─────────────┘     └──────────────────┘     └─────────────┘     └─────────────┘
//!                        │ validation  │ status feed
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sethmo_admin::{content, CollectionEditor, Config, HttpContentApi};
//!
//! #[tokio::main]
//! async fn main() {
//!     let api = HttpContentApi::new(&Config::from_env().unwrap()).unwrap();
//!     let mut jobs = CollectionEditor::new(api, &content::CAREERS);
//!     jobs.load().await;
//!     println!("{} open positions", jobs.len());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types per concern
//! - [`config`] - Environment configuration
//! - [`api`] - Content API trait, HTTP client and wire types
//! - [`session`] - Login session and its on-disk store
//! - [`content`] - Content-type registry, templates and seed data
//! - [`validation`] - Required-field rules (embedded JSON Schemas)
//! - [`editor`] - Collection editor state machine and status feed
//! - [`document`] - Singleton document editor
//! - [`inbox`] - Contact messages
//! - [`dashboard`] - Overview statistics

// Core modules
pub mod config;
pub mod error;

// Content API
pub mod api;
pub mod session;

// Content types
pub mod content;
pub mod validation;

// Editors
pub mod dashboard;
pub mod document;
pub mod editor;
pub mod inbox;

// =============================================================================
// Re-exports - Errors
// =============================================================================

pub use error::{
    ApiError, ApiResult, ConfigError, ContentError, SessionError, SessionResult, ValidationError,
};

// =============================================================================
// Re-exports - Configuration & API
// =============================================================================

pub use config::Config;

pub use api::{
    describe_error_body, Activity, ContentApi, DashboardStats, HttpContentApi, LoginResponse,
    UploadResponse, UploadTarget,
};

pub use session::{Session, SessionStore};

// =============================================================================
// Re-exports - Content
// =============================================================================

pub use content::{
    collection_type, content_type, document_type, upload_target, ContentType, CONTENT_TYPES,
};

pub use validation::{is_valid, required_fields, validate_records};

// =============================================================================
// Re-exports - Editors
// =============================================================================

pub use editor::{
    server_id, AssumeYes, CollectionEditor, Confirm, Entry, EntryKey, Phase, StatusLevel,
    StatusMessage,
};

pub use document::DocumentEditor;
pub use inbox::Inbox;
