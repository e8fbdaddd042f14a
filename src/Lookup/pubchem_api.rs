//! # PubChem name lookup
//!
//! ## Aim
//! Turns a common compound name ("ethanol", "carbon dioxide") into a SMILES
//! string using the PubChem PUG REST service.
//!
//! ## Main Data Structures and Logic
//! - `PubChemResolver<C>`: resolver generic over the HTTP client (a fake client in tests)
//! - `construct_url()`: `{base}/compound/name/{name}/property/CanonicalSMILES/JSON`,
//!   the name percent-encoded as a single path segment
//! - the first record of `PropertyTable.Properties` is read; PubChem has renamed the
//!   canonical SMILES property over time, so several keys are tried in order
//!
//! ## Usage
//! ```rust, ignore
//! let resolver = PubChemResolver::new();
//! let smiles = resolver.get_smiles("ethanol")?; // "CCO"
//! ```
use crate::Lookup::http_client::{HttpClient, LookupError};
use log::{debug, info};
use reqwest::blocking::Client;
use serde_json::Value;
use url::Url;

pub const PUBCHEM_BASE_URL: &str = "https://pubchem.ncbi.nlm.nih.gov/rest/pug";
/// property keys holding a SMILES string, most preferred first
pub const SMILES_KEYS: [&str; 4] = [
    "CanonicalSMILES",
    "SMILES",
    "ConnectivitySMILES",
    "IsomericSMILES",
];

pub struct PubChemResolver<C: HttpClient> {
    client: C,
    base_url: String,
}

impl PubChemResolver<Client> {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: PUBCHEM_BASE_URL.to_string(),
        }
    }
}

impl Default for PubChemResolver<Client> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: HttpClient> PubChemResolver<C> {
    pub fn with_client(client: C) -> Self {
        Self {
            client,
            base_url: PUBCHEM_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    pub fn construct_url(&self, name: &str) -> Result<Url, LookupError> {
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|_| {
                LookupError::UnexpectedResponse(format!(
                    "{} cannot be used as a base URL",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend([
                "compound",
                "name",
                name,
                "property",
                "CanonicalSMILES",
                "JSON",
            ]);
        Ok(url)
    }

    /// SMILES of the compound called `name`
    pub fn get_smiles(&self, name: &str) -> Result<String, LookupError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LookupError::NotFound(name.to_string()));
        }
        let url = self.construct_url(name)?;
        debug!("PubChem request: {}", url);
        let response = self.client.get(url.as_str())?;
        match response.status {
            404 => return Err(LookupError::NotFound(name.to_string())),
            status if !response.is_success() => {
                return Err(LookupError::UnexpectedResponse(format!(
                    "HTTP status {} for '{}'",
                    status, name
                )));
            }
            _ => {}
        }
        let smiles = extract_smiles(&response.body, name)?;
        info!("PubChem: {} -> {}", name, smiles);
        Ok(smiles)
    }
}

/// Reads the SMILES of the first record of a PUG REST property table
pub fn extract_smiles(body: &str, name: &str) -> Result<String, LookupError> {
    let data: Value = serde_json::from_str(body)?;
    let record = data
        .get("PropertyTable")
        .and_then(|table| table.get("Properties"))
        .and_then(|properties| properties.get(0))
        .ok_or_else(|| LookupError::NotFound(name.to_string()))?;
    SMILES_KEYS
        .iter()
        .find_map(|key| record.get(*key).and_then(Value::as_str))
        .map(|smiles| smiles.trim().to_string())
        .filter(|smiles| !smiles.is_empty())
        .ok_or_else(|| {
            let reason = format!("no SMILES property in the record for '{}'", name);
            LookupError::UnexpectedResponse(reason)
        })
}
