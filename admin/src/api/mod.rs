//! Content API collaborator.
//!
//! # Endpoints
//!
//! | Method | Path                        | Used by                          |
//! |--------|-----------------------------|----------------------------------|
//! | GET    | `/<resource>`               | every editor's `load()`          |
//! | POST   | `/<resource>`               | every editor's `save()`          |
//! | DELETE | `/<resource>/<id>`          | team, news, messages             |
//! | PUT    | `/messages/<id>/read`       | inbox                            |
//! | POST   | `/<resource>/upload`        | hero, home-business              |
//! | POST   | `/upload?section=<name>`    | generic uploads                  |
//! | POST   | `/auth/login`               | session                          |
//! | POST   | `/auth/change-password`     | session (bearer token)           |
//! | GET    | `/dashboard/stats`          | dashboard                        |

pub mod client;
pub mod types;

#[cfg(test)]
pub(crate) mod fake;

pub use client::{describe_error_body, ContentApi, HttpContentApi};
pub use types::*;
