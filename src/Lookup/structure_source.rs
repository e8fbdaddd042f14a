use crate::Lookup::http_client::{HttpClient, LookupError};
use crate::Lookup::pubchem_api::PubChemResolver;
use enum_dispatch::enum_dispatch;
use reqwest::blocking::Client;

/// Anything that turns what the user typed into a SMILES string
#[enum_dispatch]
pub trait NameResolver {
    fn resolve(&self, query: &str) -> Result<String, LookupError>;
    fn describe(&self) -> &'static str;
}

impl<C: HttpClient> NameResolver for PubChemResolver<C> {
    fn resolve(&self, query: &str) -> Result<String, LookupError> {
        self.get_smiles(query)
    }
    fn describe(&self) -> &'static str {
        "compound name (PubChem)"
    }
}

/// The query is already a SMILES string
#[derive(Debug, Clone, Copy, Default)]
pub struct LiteralSmiles;

impl NameResolver for LiteralSmiles {
    fn resolve(&self, query: &str) -> Result<String, LookupError> {
        Ok(query.trim().to_string())
    }
    fn describe(&self) -> &'static str {
        "SMILES"
    }
}

#[enum_dispatch(NameResolver)]
pub enum StructureSource {
    PubChem(PubChemResolver<Client>),
    Literal(LiteralSmiles),
}

pub enum SourceType {
    PubChem,
    Literal,
}

pub fn create_source(source_type: SourceType, pubchem_base_url: &str) -> StructureSource {
    match source_type {
        SourceType::PubChem => {
            StructureSource::from(PubChemResolver::new().with_base_url(pubchem_base_url))
        }
        SourceType::Literal => StructureSource::from(LiteralSmiles),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Lookup::http_client::fake::FakeHttpClient;

    #[test]
    fn test_literal_smiles() {
        let source = create_source(SourceType::Literal, "http://localhost");
        assert_eq!(source.resolve("  O=C=O ").unwrap(), "O=C=O");
        assert_eq!(source.describe(), "SMILES");
    }

    #[test]
    fn test_pubchem_source() {
        let source = create_source(
            SourceType::PubChem,
            "https://pubchem.ncbi.nlm.nih.gov/rest/pug",
        );
        assert!(matches!(source, StructureSource::PubChem(_)));
        assert_eq!(source.describe(), "compound name (PubChem)");
    }

    #[test]
    fn test_generic_resolver() {
        let body = r#"{"PropertyTable":{"Properties":[{"CID":280,"CanonicalSMILES":"C(=O)=O"}]}}"#;
        let client = FakeHttpClient::new().respond(
            "https://pubchem.ncbi.nlm.nih.gov/rest/pug/compound/name/carbon%20dioxide/property/CanonicalSMILES/JSON",
            200,
            body,
        );
        let resolver = PubChemResolver::with_client(client);
        assert_eq!(resolver.resolve("carbon dioxide").unwrap(), "C(=O)=O");
    }
}
