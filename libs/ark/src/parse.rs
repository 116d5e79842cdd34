//! ARK string parsing and formatting.

use serde::{Deserialize, Serialize};

use crate::ArkError;

/// The components of a parsed ARK string.
///
/// `name` is everything in the second path segment: the shoulder (without
/// its leading slash) folded together with the assigned name. Splitting the
/// shoulder back out would require knowing the authority's shoulder table,
/// which parsing deliberately does not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedArk {
    /// Whatever preceded the `ark:` marker (scheme, host, or empty).
    pub scheme_prefix: String,

    /// The Name Assigning Authority Number.
    pub naan: i64,

    /// The name segment following the NAAN.
    pub name: String,
}

impl ParsedArk {
    /// The key under which the identifier record is stored: `{naan}/{name}`.
    ///
    /// Because the shoulder starts with `/` and the parsed name carries the
    /// shoulder without that slash, this reconstructs the full identifier
    /// string exactly.
    #[must_use]
    pub fn resolver_key(&self) -> String {
        format!("{}/{}", self.naan, self.name)
    }
}

impl std::fmt::Display for ParsedArk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ark:/{}/{}", self.naan, self.name)
    }
}

/// Parses an ARK string into its components.
///
/// Accepts both the bare form (`ark:/99999/x4fh2`) and a prefixed form
/// (`https://n2t.net/ark:/99999/x4fh2`), and tolerates any number of
/// leading slashes immediately after the marker. Only the first two path
/// segments are significant; a trailing path is ignored.
pub fn parse_ark(raw: &str) -> Result<ParsedArk, ArkError> {
    let parts: Vec<&str> = raw.split("ark:").collect();
    let [scheme_prefix, rest] = parts.as_slice() else {
        return Err(ArkError::MissingMarker);
    };

    let rest = rest.trim_start_matches('/');
    let mut segments = rest.split('/');
    let (Some(naan_str), Some(name)) = (segments.next(), segments.next()) else {
        return Err(ArkError::TooFewSegments);
    };

    let naan: i64 = naan_str
        .parse()
        .map_err(|_| ArkError::InvalidNaan(naan_str.to_string()))?;
    if naan < 0 {
        return Err(ArkError::InvalidNaan(naan_str.to_string()));
    }

    Ok(ParsedArk {
        scheme_prefix: scheme_prefix.to_string(),
        naan,
        name: name.to_string(),
    })
}

/// Formats a full identifier string from its parts.
///
/// Plain concatenation: the shoulder must self-delimit by starting with a
/// separator character, so no delimiter is inserted here.
#[must_use]
pub fn format_ark(naan: i64, shoulder: &str, name: &str) -> String {
    format!("{naan}{shoulder}{name}")
}
