//! Particle-name lookup by PDG Monte-Carlo number.
//!
//! A built-in table covers the species SMASH dilepton output typically
//! references (leptons, light mesons, nucleons and low-lying resonances).
//! Additional names can be loaded from a JSON object keyed by id.

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use crate::error::{OscarError, Result};
use crate::models::DILEPTON_PSEUDO_ID;

/// Returned by [`ParticleTable::name`] when the id is not known.
pub const UNKNOWN_PARTICLE: &str = "Unknown particle";

/// Label used for the electron/positron pseudo id.
pub const DILEPTON_LABEL: &str = "e+e- pair";

fn default_name_map() -> HashMap<i32, String> {
    let entries: [(i32, &str); 34] = [
        (11, "e-"),
        (-11, "e+"),
        (13, "mu-"),
        (-13, "mu+"),
        (22, "gamma"),
        (111, "pi0"),
        (211, "pi+"),
        (-211, "pi-"),
        (113, "rho(770)0"),
        (213, "rho(770)+"),
        (-213, "rho(770)-"),
        (221, "eta"),
        (223, "omega(782)"),
        (331, "eta'(958)"),
        (333, "phi(1020)"),
        (130, "K(L)0"),
        (310, "K(S)0"),
        (311, "K0"),
        (321, "K+"),
        (-321, "K-"),
        (2212, "p"),
        (-2212, "p~"),
        (2112, "n"),
        (-2112, "n~"),
        (2224, "Delta(1232)++"),
        (2214, "Delta(1232)+"),
        (2114, "Delta(1232)0"),
        (1114, "Delta(1232)-"),
        (12212, "N(1440)+"),
        (12112, "N(1440)0"),
        (102214, "N(1520)+"),
        (102114, "N(1520)0"),
        (3122, "Lambda"),
        (3212, "Sigma0"),
    ];
    entries
        .into_iter()
        .map(|(id, name)| (id, name.to_string()))
        .collect()
}

/// Id → human-readable name lookup.
#[derive(Debug, Clone)]
pub struct ParticleTable {
    names: HashMap<i32, String>,
}

impl Default for ParticleTable {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ParticleTable {
    /// Create a table from the built-in names, with `overrides` taking
    /// precedence where given.
    pub fn new(overrides: Option<HashMap<i32, String>>) -> Self {
        let mut names = default_name_map();
        if let Some(extra) = overrides {
            names.extend(extra);
        }
        Self { names }
    }

    /// Load overrides from a JSON object such as `{"113": "rho0"}`.
    ///
    /// Keys that are not integers are skipped.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| OscarError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let raw: HashMap<String, String> = serde_json::from_str(&content)?;

        let mut overrides = HashMap::with_capacity(raw.len());
        for (key, name) in raw {
            match key.trim().parse::<i32>() {
                Ok(id) => {
                    overrides.insert(id, name);
                }
                Err(_) => debug!("Skipping non-numeric particle id {:?}", key),
            }
        }
        Ok(Self::new(Some(overrides)))
    }

    /// Name for `id`, or [`UNKNOWN_PARTICLE`].
    pub fn name(&self, id: i32) -> String {
        self.names
            .get(&id)
            .cloned()
            .unwrap_or_else(|| UNKNOWN_PARTICLE.to_string())
    }

    /// Like [`name`](Self::name) but also labels the dilepton pseudo id.
    pub fn label(&self, id: i32) -> String {
        if id == DILEPTON_PSEUDO_ID {
            DILEPTON_LABEL.to_string()
        } else {
            self.name(id)
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
