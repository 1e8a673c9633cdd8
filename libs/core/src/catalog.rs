//! Static action catalog.
//!
//! Canned carousels, button templates, the proposal email trigger, and the
//! postback-to-utterance table live in a YAML data file so catalog edits
//! never touch relay logic. [`Catalog::builtin`] parses the copy embedded at
//! compile time from `config/catalog.yaml`.

use std::{collections::BTreeMap, fs, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::reply::{Card, CardButton};

const BUILTIN_CATALOG: &str = include_str!("../../../config/catalog.yaml");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("read catalog {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parse catalog: {0}")]
    Parse(#[from] serde_yaml_bw::Error),
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Catalog {
    #[serde(default)]
    actions: BTreeMap<String, ActionEntry>,
    #[serde(default)]
    postbacks: BTreeMap<String, PostbackEntry>,
}

/// One catalog action: a canned reply or the proposal email trigger.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ActionEntry {
    Cards { cards: Vec<Card> },
    Buttons { text: String, buttons: Vec<CardButton> },
    ProposalEmail { proposal_email: ProposalEmailSpec },
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProposalEmailSpec {
    /// Name fragments; the most recent output context must contain one.
    pub contexts: Vec<String>,
    pub subject: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PostbackEntry {
    /// Canned utterance forwarded to the NLU service.
    pub utterance: String,
    /// Fetch the sender profile and send a personalized welcome first.
    #[serde(default)]
    pub greet: bool,
}

impl Catalog {
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_yaml_bw::from_str(&raw)?)
    }

    /// Parses the catalog embedded at compile time.
    pub fn builtin() -> Result<Self, CatalogError> {
        Ok(serde_yaml_bw::from_str(BUILTIN_CATALOG)?)
    }

    pub fn action(&self, name: &str) -> Option<&ActionEntry> {
        self.actions.get(name)
    }

    pub fn postback(&self, payload: &str) -> Option<&PostbackEntry> {
        self.postbacks.get(payload)
    }
}
