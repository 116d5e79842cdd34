//! The minting, resolution, and update engines.
//!
//! Engines are stateless and request-scoped: each holds a handle to the
//! [`Registry`](crate::registry::Registry) collaborator and nothing else.
//! Correctness under concurrent minting rests entirely on the registry's
//! uniqueness-enforcing create-if-absent, so the engines work unchanged
//! across multiple processes sharing one store.

pub mod mint;
pub mod resolve;
pub mod update;

pub use mint::{MintError, MintRequest, MintedArk, Minter, NoidSource, SecureNoids};
pub use resolve::{Inflection, Resolution, ResolveError, Resolver};
pub use update::{UpdateError, Updater};

/// Process-wide engine tuning.
///
/// The retry bound and the global fallback resolver are explicit
/// configuration rather than hidden literals, so tests can shrink the
/// bound and point the fallback elsewhere.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Maximum mint attempts before giving up.
    pub mint_attempts: u32,

    /// Length of the generated noid, excluding the check character.
    pub noid_length: usize,

    /// Resolver of last resort for identifiers under unknown authorities.
    pub fallback_resolver: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            mint_attempts: 10,
            noid_length: 8,
            fallback_resolver: "https://n2t.net".to_string(),
        }
    }
}
