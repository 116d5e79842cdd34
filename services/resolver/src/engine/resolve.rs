//! The resolution engine: walks the three-tier fallback chain.
//!
//! local record -> local authority -> global fallback resolver. Every
//! syntactically valid identifier resolves to some target; the only hard
//! failures are malformed input and storage faults.

use std::sync::Arc;

use arklet_ark::{parse_ark, ArkError};
use thiserror::Error;

use crate::engine::EngineSettings;
use crate::registry::{ArkRecord, Registry, RegistryError};

/// A request modifier selecting an alternate response representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Inflection {
    /// Plain resolution: redirect to the bound URL.
    #[default]
    None,
    /// Rendered metadata view instead of a redirect.
    Info,
    /// Structured metadata payload instead of a redirect.
    Json,
}

/// The outcome of resolving an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Redirect the client to this target.
    Redirect(String),

    /// A local record whose metadata was requested via inflection.
    Metadata(ArkRecord),

    /// The identifier is known but reserved: no URL is bound yet, so it is
    /// deliberately not redirectable.
    NotFound,
}

/// Resolution failures.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The identifier string did not parse. Always a client error.
    #[error(transparent)]
    Malformed(#[from] ArkError),

    /// The registry failed.
    #[error("resolution failed: {0}")]
    Storage(#[source] RegistryError),
}

/// The resolution engine.
pub struct Resolver {
    registry: Arc<dyn Registry>,
    fallback_resolver: String,
}

impl Resolver {
    pub fn new(registry: Arc<dyn Registry>, settings: &EngineSettings) -> Self {
        Self {
            registry,
            fallback_resolver: settings.fallback_resolver.clone(),
        }
    }

    /// Resolves a raw identifier string.
    ///
    /// 1. A local record with a bound URL redirects there (or yields its
    ///    metadata when an inflection was requested). An unbound record is
    ///    NotFound.
    /// 2. No record, but a known authority: defer to that authority's own
    ///    resolver.
    /// 3. Unknown authority: defer to the global fallback resolver.
    pub async fn resolve(
        &self,
        raw: &str,
        inflection: Inflection,
    ) -> Result<Resolution, ResolveError> {
        let parsed = parse_ark(raw)?;
        let key = parsed.resolver_key();

        if let Some(record) = self
            .registry
            .get_ark(&key)
            .await
            .map_err(ResolveError::Storage)?
        {
            if record.url.is_empty() {
                return Ok(Resolution::NotFound);
            }
            return Ok(match inflection {
                Inflection::None => Resolution::Redirect(record.url.clone()),
                Inflection::Info | Inflection::Json => Resolution::Metadata(record),
            });
        }

        let target = match self
            .registry
            .get_naan(parsed.naan)
            .await
            .map_err(ResolveError::Storage)?
        {
            Some(naan) => format!("{}/ark:/{}/{}", naan.url, naan.naan, parsed.name),
            None => format!(
                "{}/ark:/{}/{}",
                self.fallback_resolver, parsed.naan, parsed.name
            ),
        };

        Ok(Resolution::Redirect(target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{MemoryRegistry, Naan};

    fn registry_with_naan() -> MemoryRegistry {
        let registry = MemoryRegistry::new();
        registry.add_naan(Naan {
            naan: 1,
            name: "Archive".to_string(),
            description: "A NAAN".to_string(),
            url: "https://example.com".to_string(),
        });
        registry
    }

    fn resolver(registry: &MemoryRegistry) -> Resolver {
        Resolver::new(Arc::new(registry.clone()), &EngineSettings::default())
    }

    async fn add_ark(registry: &MemoryRegistry, url: &str) -> String {
        let record = ArkRecord {
            ark: "1/t2x4fh2b".to_string(),
            naan: 1,
            shoulder: "/t2".to_string(),
            assigned_name: "x4fh2b".to_string(),
            url: url.to_string(),
            metadata: "some metadata".to_string(),
            commitment: "forever".to_string(),
        };
        registry.create_ark(&record).await.unwrap();
        record.ark
    }

    #[tokio::test]
    async fn test_bound_record_redirects() {
        let registry = registry_with_naan();
        add_ark(&registry, "https://example.com/item").await;

        let resolution = resolver(&registry)
            .resolve("ark:/1/t2x4fh2b", Inflection::None)
            .await
            .unwrap();
        assert_eq!(
            resolution,
            Resolution::Redirect("https://example.com/item".to_string())
        );
    }

    #[tokio::test]
    async fn test_unbound_record_is_not_found() {
        let registry = registry_with_naan();
        add_ark(&registry, "").await;

        let resolution = resolver(&registry)
            .resolve("ark:/1/t2x4fh2b", Inflection::None)
            .await
            .unwrap();
        assert_eq!(resolution, Resolution::NotFound);
    }

    #[tokio::test]
    async fn test_inflection_yields_metadata_instead_of_redirect() {
        let registry = registry_with_naan();
        add_ark(&registry, "https://example.com/item").await;

        for inflection in [Inflection::Info, Inflection::Json] {
            let resolution = resolver(&registry)
                .resolve("ark:/1/t2x4fh2b", inflection)
                .await
                .unwrap();
            match resolution {
                Resolution::Metadata(record) => {
                    assert_eq!(record.metadata, "some metadata");
                }
                other => panic!("expected metadata, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_inflection_on_unbound_record_is_still_not_found() {
        let registry = registry_with_naan();
        add_ark(&registry, "").await;

        let resolution = resolver(&registry)
            .resolve("ark:/1/t2x4fh2b", Inflection::Info)
            .await
            .unwrap();
        assert_eq!(resolution, Resolution::NotFound);
    }

    #[tokio::test]
    async fn test_unknown_record_defers_to_authority_resolver() {
        let registry = registry_with_naan();

        let resolution = resolver(&registry)
            .resolve("ark:/1/t2unknown", Inflection::None)
            .await
            .unwrap();
        assert_eq!(
            resolution,
            Resolution::Redirect("https://example.com/ark:/1/t2unknown".to_string())
        );
    }

    #[tokio::test]
    async fn test_unknown_authority_defers_to_global_resolver() {
        let registry = MemoryRegistry::new();

        let resolution = resolver(&registry)
            .resolve("ark:/99999/t2unknown", Inflection::None)
            .await
            .unwrap();
        assert_eq!(
            resolution,
            Resolution::Redirect("https://n2t.net/ark:/99999/t2unknown".to_string())
        );
    }

    #[tokio::test]
    async fn test_fallback_resolver_is_configurable() {
        let registry = MemoryRegistry::new();
        let settings = EngineSettings {
            fallback_resolver: "https://resolver.test".to_string(),
            ..EngineSettings::default()
        };
        let resolver = Resolver::new(Arc::new(registry), &settings);

        let resolution = resolver
            .resolve("ark:/5/x", Inflection::None)
            .await
            .unwrap();
        assert_eq!(
            resolution,
            Resolution::Redirect("https://resolver.test/ark:/5/x".to_string())
        );
    }

    #[tokio::test]
    async fn test_malformed_identifier_fails_fast() {
        let registry = MemoryRegistry::new();
        let err = resolver(&registry)
            .resolve("not-an-ark", Inflection::None)
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::Malformed(_)));
    }
}
