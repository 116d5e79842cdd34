//! The minting engine: generates new, globally-unique identifiers.

use std::sync::Arc;

use arklet_ark::{format_ark, generate_noid, noid_check_digit};
use thiserror::Error;
use tracing::{error, warn};

use crate::engine::EngineSettings;
use crate::registry::{ArkRecord, Registry, RegistryError};

/// Source of opaque names for the minting loop.
///
/// The default [`SecureNoids`] draws from a CSPRNG; tests inject scripted
/// sources to force collisions deterministically.
pub trait NoidSource: Send + Sync {
    fn noid(&self, length: usize) -> String;
}

/// Production noid source: uniform random betanumeric strings.
pub struct SecureNoids;

impl NoidSource for SecureNoids {
    fn noid(&self, length: usize) -> String {
        generate_noid(length)
    }
}

/// A request to mint one identifier under an authority and shoulder.
#[derive(Debug, Clone)]
pub struct MintRequest {
    pub naan: i64,
    pub shoulder: String,
    pub url: String,
    pub metadata: String,
    pub commitment: String,
}

/// A successfully minted identifier, with the number of collisions it took.
#[derive(Debug, Clone)]
pub struct MintedArk {
    pub record: ArkRecord,
    pub collisions: u32,
}

/// Minting failures.
#[derive(Debug, Error)]
pub enum MintError {
    /// Every attempt collided with an existing identifier. A server-side
    /// fault: repeated collisions indicate near-exhaustion of the
    /// namespace, not a bad request.
    #[error("gave up minting after {collisions} collision(s)")]
    Exhausted { collisions: u32 },

    /// The registry failed for a reason other than a collision.
    #[error(transparent)]
    Storage(RegistryError),
}

/// The minting engine.
///
/// Authorization is a precondition enforced by the caller: the requesting
/// credential's authority must already have been checked against
/// `MintRequest::naan`.
pub struct Minter {
    registry: Arc<dyn Registry>,
    noids: Arc<dyn NoidSource>,
    mint_attempts: u32,
    noid_length: usize,
}

impl Minter {
    pub fn new(registry: Arc<dyn Registry>, settings: &EngineSettings) -> Self {
        Self::with_noid_source(registry, settings, Arc::new(SecureNoids))
    }

    /// Builds a minter with an explicit noid source.
    pub fn with_noid_source(
        registry: Arc<dyn Registry>,
        settings: &EngineSettings,
        noids: Arc<dyn NoidSource>,
    ) -> Self {
        Self {
            registry,
            noids,
            mint_attempts: settings.mint_attempts,
            noid_length: settings.noid_length,
        }
    }

    /// Mints a new identifier, retrying on collision up to the configured
    /// bound.
    ///
    /// Each attempt generates a fresh noid, computes the check digit over
    /// `{naan}{shoulder}{noid}`, and tries an atomic create-if-absent. A
    /// [`RegistryError::Conflict`] counts as a collision and retries; any
    /// other storage error aborts immediately.
    pub async fn mint(&self, request: MintRequest) -> Result<MintedArk, MintError> {
        let mut collisions = 0u32;

        for _ in 0..self.mint_attempts {
            let noid = self.noids.noid(self.noid_length);
            let base = format_ark(request.naan, &request.shoulder, &noid);
            let check_digit = noid_check_digit(&base);

            let record = ArkRecord {
                ark: format!("{base}{check_digit}"),
                naan: request.naan,
                shoulder: request.shoulder.clone(),
                assigned_name: format!("{noid}{check_digit}"),
                url: request.url.clone(),
                metadata: request.metadata.clone(),
                commitment: request.commitment.clone(),
            };

            match self.registry.create_ark(&record).await {
                Ok(()) => {
                    if collisions > 0 {
                        warn!(collisions, ark = %record.ark, "ARK minted after collision(s)");
                    }
                    return Ok(MintedArk { record, collisions });
                }
                Err(e) if e.is_conflict() => {
                    collisions += 1;
                }
                Err(e) => return Err(MintError::Storage(e)),
            }
        }

        error!(collisions, naan = request.naan, shoulder = %request.shoulder,
            "Gave up minting after collision(s)");
        Err(MintError::Exhausted { collisions })
    }
}
