//! # lab core
//!
//! Decides which GitLab domain, credential and project a `lab` command
//! operates on.
//!
//! This crate provides:
//! - Domain types for remotes and tokens
//! - Filtering remotes down to supported hosting domains
//! - Remote selection driven by remembered preferences or a prompt
//! - Lazy token acquisition persisted in the preference store
//! - Parsing `namespace/project` out of GitLab web URLs
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use lab_core::{PreferenceStore, ScriptedPrompt, StaticCatalog, TargetRequest, resolve_target};
//!
//! let mut prefs = PreferenceStore::load_default()?;
//! let mut prompt = ScriptedPrompt::new(["glpat-example"]);
//! let catalog = StaticCatalog(remotes);
//!
//! if let Some(target) = resolve_target(&catalog, &mut prefs, &mut prompt, &TargetRequest::new())? {
//!     println!("{} {}", target.api_url(), target.project_path());
//! }
//! ```

pub mod model;
pub mod store;
pub mod prompt;
pub mod filter;
pub mod select;
pub mod token;
pub mod project_path;
pub mod resolve;

// Re-export commonly used types at crate root
pub use model::{
    Protocol,
    RemoteInfo,
    Token,
};

pub use store::{
    FileBackend,
    MemoryBackend,
    PreferenceBackend,
    PreferenceStore,
    Preferences,
    StoreError,
};

pub use prompt::{
    PromptError,
    ScriptedPrompt,
    UserPrompt,
};

pub use filter::{filter_supported, is_supported_domain};

pub use select::{select_remote, SelectError};

pub use token::{resolve_token, TokenError};

pub use project_path::{parse_project_path, ProjectPathError};

pub use resolve::{
    RemoteCatalog,
    ResolveError,
    ResolvedTarget,
    StaticCatalog,
    TargetRequest,
    resolve_target,
};
