//! # Reaction diagrams
//!
//! ## Aim
//! Draws a reaction SMILES (`r1.r2>>p1.p2`) as an SVG picture with the CDK
//! Depict web service and stores the picture on disk so it can be opened in
//! the system viewer.
//!
//! ## Usage
//! ```rust, ignore
//! let renderer = CdkDepictRenderer::new();
//! let svg = renderer.render("[HH].O=O>>O")?;
//! let path = save_diagram(&svg, None)?;
//! ```
use crate::Lookup::http_client::{HttpClient, LookupError};
use log::{debug, info};
use reqwest::blocking::Client;
use std::io::Write;
use std::path::{Path, PathBuf};
use url::Url;

pub const DEPICTION_BASE_URL: &str = "https://www.simolecule.com/cdkdepict";

pub trait DiagramRenderer {
    /// SVG text of the reaction
    fn render(&self, reaction_smiles: &str) -> Result<String, LookupError>;
}

pub struct CdkDepictRenderer<C: HttpClient> {
    client: C,
    base_url: String,
}

impl CdkDepictRenderer<Client> {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: DEPICTION_BASE_URL.to_string(),
        }
    }
}

impl Default for CdkDepictRenderer<Client> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: HttpClient> CdkDepictRenderer<C> {
    pub fn with_client(client: C) -> Self {
        Self {
            client,
            base_url: DEPICTION_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    pub fn construct_url(&self, reaction_smiles: &str) -> Result<Url, LookupError> {
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|_| {
                LookupError::UnexpectedResponse(format!(
                    "{} cannot be used as a base URL",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(["depict", "bow", "svg"]);
        url.query_pairs_mut()
            .append_pair("smi", reaction_smiles)
            .append_pair("abbr", "on")
            .append_pair("hdisp", "bridgehead")
            .append_pair("zoom", "1.6")
            .append_pair("annotate", "none");
        Ok(url)
    }
}

impl<C: HttpClient> DiagramRenderer for CdkDepictRenderer<C> {
    fn render(&self, reaction_smiles: &str) -> Result<String, LookupError> {
        let url = self.construct_url(reaction_smiles.trim())?;
        debug!("depiction request: {}", url);
        let response = self.client.get(url.as_str())?;
        if !response.is_success() {
            return Err(LookupError::UnexpectedResponse(format!(
                "HTTP status {} while drawing {}",
                response.status, reaction_smiles
            )));
        }
        if !response.body.contains("<svg") {
            return Err(LookupError::UnexpectedResponse(
                "depiction service did not return an SVG picture".to_string(),
            ));
        }
        Ok(response.body)
    }
}

/// Writes the picture to `reaction_*.svg` in `dir` (system temp dir if `None`)
/// and returns the path of the kept file.
pub fn save_diagram(svg: &str, dir: Option<&Path>) -> Result<PathBuf, LookupError> {
    let dir = dir.map(Path::to_path_buf).unwrap_or_else(std::env::temp_dir);
    std::fs::create_dir_all(&dir)?;
    let mut file = tempfile::Builder::new()
        .prefix("reaction_")
        .suffix(".svg")
        .tempfile_in(&dir)?;
    file.write_all(svg.as_bytes())?;
    file.flush()?;
    let (_, path) = file.keep().map_err(|e| LookupError::Io(e.error))?;
    info!("reaction diagram saved to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Lookup::http_client::fake::FakeHttpClient;

    const WATER_URL: &str = "https://www.simolecule.com/cdkdepict/depict/bow/svg?smi=%5BHH%5D.O%3DO%3E%3EO&abbr=on&hdisp=bridgehead&zoom=1.6&annotate=none";

    #[test]
    fn test_url_construction() {
        let renderer = CdkDepictRenderer::with_client(FakeHttpClient::new());
        assert_eq!(
            renderer.construct_url("[HH].O=O>>O").unwrap().as_str(),
            WATER_URL
        );
    }

    #[test]
    fn test_render() {
        let svg = "<?xml version='1.0'?><svg xmlns='http://www.w3.org/2000/svg'></svg>";
        let client = FakeHttpClient::new().respond(WATER_URL, 200, svg);
        let renderer = CdkDepictRenderer::with_client(client);
        assert_eq!(renderer.render("[HH].O=O>>O").unwrap(), svg);
    }

    #[test]
    fn test_render_errors() {
        let client = FakeHttpClient::new().respond(WATER_URL, 200, "Error: bad SMILES");
        let renderer = CdkDepictRenderer::with_client(client);
        assert!(matches!(
            renderer.render("[HH].O=O>>O"),
            Err(LookupError::UnexpectedResponse(_))
        ));
        assert!(matches!(
            renderer.render("C>>C"),
            Err(LookupError::UnexpectedResponse(_))
        ));
    }

    #[test]
    fn test_save_diagram() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_diagram("<svg></svg>", Some(dir.path())).unwrap();
        assert!(path.starts_with(dir.path()));
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("reaction_"));
        assert!(name.ends_with(".svg"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<svg></svg>");
    }
}
