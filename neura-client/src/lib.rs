//! # neuraCanavas Client
//!
//! Hands sketches to the image generation backend.
//!
//! ## Endpoint
//!
//! - `POST <base>/generate` with `{ "image_data", "prompt" }`
//! - answers `{ "generated_image" }` on success, `{ "error" }` otherwise
//!
//! The base URL comes from `NEURA_API_URL` and defaults to
//! `http://localhost:5000`.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;
pub mod flow;

pub use client::{GenerationBackend, GenerationClient};
pub use config::{ClientConfig, API_URL_ENV, DEFAULT_API_URL};
pub use error::{ClientError, ClientResult};
pub use flow::{shared, GenerationFlow, SharedSession};
