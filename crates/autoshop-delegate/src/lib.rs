//! # autoshop-delegate
//!
//! The concrete `Delegate`s the pipeline's stages call.
//!
//! - `ChatDelegate`: one request per prompt to an OpenAI-compatible
//!   chat-completions service, with a per-stage persona as system message
//! - `OfflineDelegate`: deterministic local replies for dry runs
//!
//! `ShopConfig` loads service settings, retry policy and persona overrides
//! from TOML.
//!
//! ```rust,ignore
//! let config = ShopConfig::from_file(Path::new("autoshop.toml"))?;
//! let pipeline = Pipeline::new(stage_delegates(&config)?).with_retry(config.retry.clone());
//! ```

pub mod chat;
pub mod config;
pub mod offline;
pub mod persona;

pub use chat::{extract_reply, stage_delegates, ChatDelegate};
pub use config::{ServiceConfig, ShopConfig};
pub use offline::{offline_delegates, OfflineDelegate};
pub use persona::default_persona;
