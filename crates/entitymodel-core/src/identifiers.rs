//! Name checks for entity types and properties.

use std::collections::HashMap;
use std::sync::{OnceLock, PoisonError, RwLock};

use regex::Regex;

use crate::error::ConstructionError;

/// Thread-safe cache of compiled identifier patterns.
///
/// Models usually share one pattern, so it is compiled on first use and
/// kept for the lifetime of the program.
struct RegexCache {
    cache: RwLock<HashMap<String, Regex>>,
}

impl RegexCache {
    fn new() -> Self {
        Self {
            cache: RwLock::new(HashMap::new()),
        }
    }

    fn get_or_compile(&self, pattern: &str) -> Result<Regex, regex::Error> {
        {
            let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(regex) = cache.get(pattern) {
                return Ok(regex.clone());
            }
        }

        let regex = Regex::new(pattern)?;
        {
            let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
            cache.insert(pattern.to_string(), regex.clone());
        }
        Ok(regex)
    }
}

fn regex_cache() -> &'static RegexCache {
    static CACHE: OnceLock<RegexCache> = OnceLock::new();
    CACHE.get_or_init(RegexCache::new)
}

/// Check `name` against an optional identifier pattern.
///
/// Empty names are always rejected. An invalid pattern is logged and treated
/// as "accept any non-empty name" so a bad configuration does not make every
/// model unbuildable.
pub fn check_identifier(name: &str, pattern: Option<&str>) -> Result<(), ConstructionError> {
    let invalid = || ConstructionError::InvalidIdentifier {
        name: name.to_string(),
        pattern: pattern.unwrap_or("<non-empty>").to_string(),
    };

    if name.is_empty() {
        return Err(invalid());
    }

    let Some(pattern) = pattern else {
        return Ok(());
    };

    match regex_cache().get_or_compile(pattern) {
        Ok(regex) if regex.is_match(name) => Ok(()),
        Ok(_) => Err(invalid()),
        Err(e) => {
            tracing::warn!(
                pattern = pattern,
                error = %e,
                "Invalid identifier pattern in model config, accepting name"
            );
            Ok(())
        }
    }
}
