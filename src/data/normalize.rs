use anyhow::{bail, Result};
use std::collections::HashMap;

/// Renamed or relocated franchises mapped onto one identity.
const BUILTIN_ALIASES: [(&str, &str); 4] = [
    ("Phoenix Coyotes", "Arizona Coyotes"),
    ("Montréal Canadiens", "Montreal Canadiens"),
    ("Mighty Ducks of Anaheim", "Anaheim Ducks"),
    ("Atlanta Thrashers", "Winnipeg Jets"),
];

/// Team-name normaliser so a franchise keeps one history across renames.
#[derive(Debug, Clone)]
pub struct TeamNames {
    aliases: HashMap<String, String>,
}

impl Default for TeamNames {
    fn default() -> Self {
        TeamNames {
            aliases: BUILTIN_ALIASES
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
        }
    }
}

impl TeamNames {
    /// Built-in aliases plus `FROM=TO` overrides.
    pub fn with_aliases<S: AsRef<str>>(extra: &[S]) -> Result<Self> {
        let mut names = Self::default();
        for spec in extra {
            let (from, to) = parse_alias(spec.as_ref())?;
            names.aliases.insert(from, to);
        }
        Ok(names)
    }

    pub fn normalize(&self, raw: &str) -> String {
        let name = raw.trim().trim_end_matches('*').trim_end();
        match self.aliases.get(name) {
            Some(canonical) => canonical.clone(),
            None => name.to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }
}

/// Split a `FROM=TO` alias, trimming both halves.
pub fn parse_alias(spec: &str) -> Result<(String, String)> {
    let Some((from, to)) = spec.split_once('=') else {
        bail!("team alias '{}' must look like FROM=TO", spec);
    };
    let (from, to) = (from.trim(), to.trim());
    if from.is_empty() || to.is_empty() {
        bail!("team alias '{}' has an empty side", spec);
    }
    Ok((from.to_string(), to.to_string()))
}
