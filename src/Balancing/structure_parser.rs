use crate::Balancing::balance_errors::StructureError;
use crate::Balancing::periodic_table::{atomic_mass, default_valences, find_element};
use log::debug;
use purr::graph::{Atom, Bond, Builder};
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

/// element symbol -> number of atoms, zero counts are never stored
pub type ElementComposition = HashMap<String, usize>;

/// One atom of a parsed SMILES string
#[derive(Debug, Clone, PartialEq)]
pub struct SmilesAtom {
    pub symbol: &'static str,
    pub aromatic: bool,
    /// written inside [] - hydrogens are then given explicitly
    pub bracket: bool,
    /// attached hydrogens: explicit for bracket atoms, implicit otherwise
    pub hydrogens: u32,
    pub charge: i32,
    bond_orders: u32,
}

impl SmilesAtom {
    fn new(symbol: &'static str, aromatic: bool, bond_orders: u32) -> Self {
        Self {
            symbol,
            aromatic,
            bracket: false,
            hydrogens: 0,
            charge: 0,
            bond_orders,
        }
    }

    /// Sum of the orders of the bonds written in the string, ring closures
    /// included. Bonds between aromatic atoms count as single.
    pub fn bond_orders(&self) -> u32 {
        self.bond_orders
    }

    // implicit hydrogens only fill the lowest default valence; a higher one
    // must be reached exactly by the written bonds, as in CS(=O)C or CN(=O)=O
    fn check_valence(&self, index: usize) -> Result<(), StructureError> {
        let valences = default_valences(self.symbol);
        let fits = match (self.aromatic, valences.first(), valences.last()) {
            (_, None, _) | (_, _, None) => true,
            (true, _, Some(&max)) => self.bond_orders < max,
            (false, Some(&lowest), _) => {
                self.bond_orders <= lowest || valences.contains(&self.bond_orders)
            }
        };
        if fits {
            Ok(())
        } else {
            Err(StructureError::InvalidValence {
                symbol: self.symbol.to_string(),
                atom: index,
                bonds: self.bond_orders,
            })
        }
    }
}

/// Atoms of a molecule with their hydrogens resolved
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedStructure {
    pub atoms: Vec<SmilesAtom>,
}

impl ParsedStructure {
    pub fn composition(&self) -> ElementComposition {
        let mut counts = ElementComposition::new();
        for atom in &self.atoms {
            *counts.entry(atom.symbol.to_string()).or_insert(0) += 1;
            if atom.hydrogens > 0 {
                *counts.entry("H".to_string()).or_insert(0) += atom.hydrogens as usize;
            }
        }
        counts
    }

    pub fn net_charge(&self) -> i32 {
        self.atoms.iter().map(|atom| atom.charge).sum()
    }

    /// Hill notation: C first, then H, then the rest alphabetically; without
    /// carbon everything is alphabetical. A net charge is appended.
    pub fn molecular_formula(&self) -> String {
        let mut counts: BTreeMap<String, usize> = self.composition().into_iter().collect();
        let mut formula = String::new();
        if let Some(carbon) = counts.remove("C") {
            append_element(&mut formula, "C", carbon);
            if let Some(hydrogen) = counts.remove("H") {
                append_element(&mut formula, "H", hydrogen);
            }
        }
        for (symbol, count) in &counts {
            append_element(&mut formula, symbol, *count);
        }
        let charge = self.net_charge();
        match charge {
            0 => {}
            1 => formula.push('+'),
            -1 => formula.push('-'),
            c if c > 0 => formula.push_str(&format!("+{}", c)),
            c => formula.push_str(&format!("-{}", c.abs())),
        }
        formula
    }

    /// g/mol
    pub fn molar_mass(&self) -> f64 {
        self.composition()
            .iter()
            .map(|(symbol, count)| atomic_mass(symbol).unwrap_or(0.0) * *count as f64)
            .sum()
    }
}

fn append_element(formula: &mut String, symbol: &str, count: usize) {
    formula.push_str(symbol);
    if count > 1 {
        formula.push_str(&count.to_string());
    }
}

fn bracket_atom_regex() -> &'static Regex {
    static BRACKET_ATOM: OnceLock<Regex> = OnceLock::new();
    BRACKET_ATOM.get_or_init(|| {
        Regex::new(
            r"^\[(?P<isotope>\d+)?(?P<symbol>\*|[A-Z][a-z]?|se|as|te|b|c|n|o|p|s)(?P<chiral>@(?:@|TH[12]|AL[12]|SP[123]|TB\d{1,2}|OH\d{1,2})?)?(?P<hcount>H\d*)?(?P<charge>[+-]+\d*)?(?::\d+)?\]$",
        )
        .unwrap()
    })
}

// "" for an elided bond
fn bond_order(bond: &Bond) -> u32 {
    match bond.kind.to_string().as_str() {
        "=" => 2,
        "#" => 3,
        "$" => 4,
        _ => 1,
    }
}

fn capitalize(symbol: &str) -> String {
    let mut chars = symbol.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

// "+", "++", "+2", "-", "--", "-3"; a run may not mix signs
fn parse_charge(charge: &str) -> Option<i32> {
    let signs = charge.chars().take_while(|c| *c == '+' || *c == '-').count();
    let (run, digits) = charge.split_at(signs);
    let first = run.chars().next()?;
    if run.chars().any(|c| c != first) {
        return None;
    }
    let sign = if first == '+' { 1 } else { -1 };
    if digits.is_empty() {
        Some(sign * signs as i32)
    } else if signs == 1 {
        digits.parse::<i32>().ok().map(|magnitude| sign * magnitude)
    } else {
        None
    }
}

/// Reads the text of a bracket atom such as `[13CH4]`, `[nH]` or `[Fe+3]`
fn bracket_atom(
    text: &str,
    index: usize,
    bond_orders: u32,
) -> Result<SmilesAtom, StructureError> {
    let malformed = || StructureError::MalformedBracketAtom {
        text: text.to_string(),
        atom: index,
    };
    let captures = bracket_atom_regex().captures(text).ok_or_else(malformed)?;

    let raw_symbol = &captures["symbol"];
    if raw_symbol == "*" {
        return Err(StructureError::WildcardAtom(index));
    }
    let aromatic = raw_symbol.starts_with(|c: char| c.is_ascii_lowercase());
    let symbol = capitalize(raw_symbol);
    let element = find_element(&symbol).ok_or(StructureError::UnknownElement {
        symbol: symbol.clone(),
        atom: index,
    })?;

    let hydrogens = match captures.name("hcount") {
        Some(h) if h.as_str().len() > 1 => h.as_str()[1..].parse().map_err(|_| malformed())?,
        Some(_) => 1,
        None => 0,
    };
    let charge = match captures.name("charge") {
        Some(charge) => parse_charge(charge.as_str()).ok_or_else(malformed)?,
        None => 0,
    };

    let mut atom = SmilesAtom::new(element.symbol, aromatic, bond_orders);
    atom.bracket = true;
    atom.hydrogens = hydrogens;
    atom.charge = charge;
    Ok(atom)
}

/// Element, hydrogens and charge of one atom of the molecular graph
fn resolve_atom(index: usize, atom: &Atom) -> Result<SmilesAtom, StructureError> {
    let text = atom.kind.to_string();
    let bond_orders = atom.bonds.iter().map(bond_order).sum();
    if text.starts_with('[') {
        return bracket_atom(&text, index, bond_orders);
    }
    if text == "*" {
        return Err(StructureError::WildcardAtom(index));
    }

    let aromatic = text.starts_with(|c: char| c.is_ascii_lowercase());
    let symbol = capitalize(&text);
    let element = find_element(&symbol).ok_or(StructureError::UnknownElement {
        symbol: symbol.clone(),
        atom: index,
    })?;
    let mut resolved = SmilesAtom::new(element.symbol, aromatic, bond_orders);
    resolved.check_valence(index)?;
    resolved.hydrogens = u32::from(atom.suppressed_hydrogens());
    Ok(resolved)
}

/// Parses a SMILES string into atoms with resolved hydrogens
pub fn parse_structure(smiles: &str) -> Result<ParsedStructure, StructureError> {
    let smiles = smiles.trim();
    if smiles.is_empty() {
        return Err(StructureError::Empty);
    }
    let mut builder = Builder::new();
    purr::read::read(smiles, &mut builder, None)
        .map_err(|err| StructureError::Syntax(format!("{:?}", err)))?;
    let graph = builder
        .build()
        .map_err(|err| StructureError::Topology(format!("{:?}", err)))?;
    if graph.is_empty() {
        return Err(StructureError::Empty);
    }

    let atoms = graph
        .iter()
        .enumerate()
        .map(|(index, atom)| resolve_atom(index, atom))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ParsedStructure { atoms })
}

/// Element composition of a SMILES string, hydrogens included
pub fn parse(smiles: &str) -> Result<ElementComposition, StructureError> {
    let composition = parse_structure(smiles)?.composition();
    debug!("composition of {}: {:?}", smiles, composition);
    Ok(composition)
}

pub fn is_valid_structure(smiles: &str) -> bool {
    parse_structure(smiles).is_ok()
}

pub fn molecular_formula(smiles: &str) -> Result<String, StructureError> {
    Ok(parse_structure(smiles)?.molecular_formula())
}

pub fn molar_mass(smiles: &str) -> Result<f64, StructureError> {
    Ok(parse_structure(smiles)?.molar_mass())
}
