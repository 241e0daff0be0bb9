//! Externally reviewable lookup tables for screening and listing priority.
//!
//! The embedded defaults live in `lexicons.json` and are parsed once via
//! `lazy_static`. A run can swap in its own file with [`Lexicons::from_path`].

use std::collections::{HashMap, HashSet};
use std::path::Path;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// Exchange tables used to assign listing tiers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingTierTable {
    /// Symbol suffixes (without dot) that always rank as a primary listing
    #[serde(default)]
    pub primary_suffixes: Vec<String>,
    /// Exchange codes that always rank as a primary listing
    #[serde(default)]
    pub primary_exchanges: Vec<String>,
    /// Country → exchange codes where that country's companies have their primary listing
    #[serde(default)]
    pub home_exchanges: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub major_exchanges: Vec<String>,
    /// Substrings that mark an exchange code as major (e.g. "SAUDI")
    #[serde(default)]
    pub major_exchange_markers: Vec<String>,
    #[serde(default)]
    pub regional_exchanges: Vec<String>,
}

/// Screening lexicons.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lexicons {
    /// Whole words that mark a name as a fund/ETF/index product
    #[serde(default)]
    pub fund_tokens: Vec<String>,
    /// Whole words that mark a name as a REIT
    #[serde(default)]
    pub reit_tokens: Vec<String>,
    /// Symbols the upstream chronically misreports
    #[serde(default)]
    pub bad_symbols: Vec<String>,
    /// Each pattern matches when every fragment occurs in the uppercased name
    #[serde(default)]
    pub bad_name_patterns: Vec<Vec<String>>,
    #[serde(default)]
    pub listing_tiers: ListingTierTable,

    #[serde(skip)]
    bad_symbol_set: HashSet<String>,
}

lazy_static! {
    static ref EMBEDDED: Lexicons = {
        let lexicons: Lexicons = serde_json::from_str(include_str!("lexicons.json"))
            .expect("lexicons.json must be valid");
        lexicons.normalized()
    };
}

impl Lexicons {
    /// The lexicons compiled into the binary.
    pub fn embedded() -> Self {
        EMBEDDED.clone()
    }

    /// Load lexicons from a JSON file with the same shape as the embedded one.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
            .map_err(|e| Error::Catalog(format!("{}: {}", path.display(), e)))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let lexicons: Lexicons = serde_json::from_str(json)?;
        if lexicons.fund_tokens.is_empty() {
            return Err(Error::Catalog("fund_tokens must not be empty".to_string()));
        }
        Ok(lexicons.normalized())
    }

    /// Uppercase every entry and build lookup sets.
    fn normalized(mut self) -> Self {
        fn upper_all(values: &mut [String]) {
            for value in values.iter_mut() {
                *value = value.trim().to_uppercase();
            }
        }

        upper_all(&mut self.fund_tokens);
        upper_all(&mut self.reit_tokens);
        upper_all(&mut self.bad_symbols);
        for pattern in &mut self.bad_name_patterns {
            upper_all(pattern);
        }

        let tiers = &mut self.listing_tiers;
        upper_all(&mut tiers.primary_suffixes);
        upper_all(&mut tiers.primary_exchanges);
        upper_all(&mut tiers.major_exchanges);
        upper_all(&mut tiers.major_exchange_markers);
        upper_all(&mut tiers.regional_exchanges);
        tiers.home_exchanges = std::mem::take(&mut tiers.home_exchanges)
            .into_iter()
            .map(|(country, mut exchanges)| {
                upper_all(&mut exchanges);
                (country.trim().to_uppercase(), exchanges)
            })
            .collect();

        self.bad_symbol_set = self.bad_symbols.iter().cloned().collect();
        self
    }

    pub fn is_fund_name(&self, name: &str) -> bool {
        self.fund_tokens.iter().any(|token| contains_word(name, token))
    }

    pub fn is_reit_name(&self, name: &str) -> bool {
        self.reit_tokens.iter().any(|token| contains_word(name, token))
    }

    /// True when the symbol or the name is on the known-bad list.
    pub fn is_known_bad(&self, symbol: &str, name: &str) -> bool {
        if self.bad_symbol_set.contains(&symbol.trim().to_uppercase()) {
            return true;
        }
        let name = name.to_uppercase();
        self.bad_name_patterns.iter().any(|pattern| {
            !pattern.is_empty() && pattern.iter().all(|fragment| name.contains(fragment.as_str()))
        })
    }
}

/// Whole-word, case-insensitive match.
///
/// Words are whitespace-separated and trimmed of `.,!?;:`, so "Global Fund,"
/// matches FUND while "Fundamental" and "ETFX" do not.
pub fn contains_word(text: &str, word: &str) -> bool {
    text.split_whitespace()
        .map(|w| w.trim_matches(|c| ".,!?;:".contains(c)))
        .any(|w| w.eq_ignore_ascii_case(word))
}
