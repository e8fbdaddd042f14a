/// HTTP client trait used by the web services (implemented for
/// `reqwest::blocking::Client`, replaced by canned responses in tests) and the
/// `LookupError` type.
pub mod http_client;
/// eng
/// Resolves common compound names to SMILES with the PubChem PUG REST service:
/// `{base}/compound/name/{name}/property/CanonicalSMILES/JSON`
pub mod pubchem_api;
/// `NameResolver` trait and the `StructureSource` enum choosing between PubChem
/// lookup and direct SMILES entry.
pub mod structure_source;
/// Reaction diagrams drawn by the CDK Depict service and saved as SVG files
pub mod depiction_api;
