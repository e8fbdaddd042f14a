//! # Balancing API
//!
//! ## Aim
//! One call from a list of reactant SMILES and a list of product SMILES to a
//! balanced reaction with minimal positive integer coefficients.
//!
//! ## Main Data Structures and Logic
//! - `BalancedSpecies`: structure, Hill formula, molar mass and coefficient of one species
//! - `BalancedReaction`: both sides plus the stoichiometry matrix they were solved from
//! - `balance_chemical_equation()`: parse -> element matrix -> integer program -> verification
//!
//! ## Usage
//! ```rust
//! use StoichBalancer::Balancing::balance_api::balance_chemical_equation;
//! use StoichBalancer::Balancing::balance_solver::LatticeSearchEngine;
//!
//! let reactants = vec!["[HH]".to_string(), "O=O".to_string()];
//! let products = vec!["O".to_string()];
//! let reaction =
//!     balance_chemical_equation(&reactants, &products, &LatticeSearchEngine::default()).unwrap();
//! assert_eq!(reaction.equation_string().unwrap(), "2 H2 + O2 → 2 H2O");
//! ```
use crate::Balancing::balance_errors::{BalanceError, Side, SolveFailure};
use crate::Balancing::balance_solver::{IlpEngine, solve};
use crate::Balancing::reaction_formatter::{create_reaction_smiles, format_reaction};
use crate::Balancing::stoichiometry_matrix::{StoichiometryMatrix, build_matrix};
use crate::Balancing::structure_parser::{ElementComposition, ParsedStructure, parse_structure};
use log::{error, info};
use prettytable::{Cell, Row, Table};

/// One molecule of a balanced reaction
#[derive(Debug, Clone, PartialEq)]
pub struct BalancedSpecies {
    pub structure: String,
    pub formula: String,
    /// g/mol
    pub molar_mass: f64,
    pub coefficient: u64,
    pub composition: ElementComposition,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BalancedReaction {
    pub reactants: Vec<BalancedSpecies>,
    pub products: Vec<BalancedSpecies>,
    pub stoichiometry: StoichiometryMatrix,
}

impl BalancedReaction {
    /// Reactant coefficients followed by product coefficients
    pub fn coefficients(&self) -> Vec<u64> {
        self.reactants
            .iter()
            .chain(self.products.iter())
            .map(|species| species.coefficient)
            .collect()
    }

    /// `2 H2 + O2 → 2 H2O`
    pub fn equation_string(&self) -> Result<String, BalanceError> {
        let pairs = |side: &[BalancedSpecies]| -> Result<Vec<(i64, String)>, BalanceError> {
            side.iter()
                .map(|species| {
                    let coefficient = i64::try_from(species.coefficient).map_err(|_| {
                        BalanceError::UnbalanceableReaction(SolveFailure::NonIntegral)
                    })?;
                    Ok((coefficient, species.formula.clone()))
                })
                .collect()
        };
        format_reaction(&pairs(&self.reactants)?, &pairs(&self.products)?)
    }

    /// `r1.r2>>p1.p2` built from the input structures
    pub fn reaction_smiles(&self) -> String {
        let structures = |side: &[BalancedSpecies]| -> Vec<String> {
            side.iter().map(|species| species.structure.clone()).collect()
        };
        create_reaction_smiles(&structures(&self.reactants), &structures(&self.products))
    }

    /// For every element: (symbol, atoms on the reactant side, atoms on the product side)
    pub fn element_totals(&self) -> Vec<(String, u64, u64)> {
        let total = |side: &[BalancedSpecies], element: &str| -> u64 {
            side.iter()
                .map(|species| {
                    let atoms = species.composition.get(element).copied().unwrap_or(0);
                    species.coefficient * atoms as u64
                })
                .sum()
        };
        self.stoichiometry
            .elements
            .iter()
            .map(|element| {
                (
                    element.clone(),
                    total(&self.reactants, element),
                    total(&self.products, element),
                )
            })
            .collect()
    }

    /// Prints species, element balance and the stoichiometry matrix as tables
    pub fn pretty_print(&self) {
        self.species_table().printstd();
        self.element_table().printstd();
        let names: Vec<String> = self
            .reactants
            .iter()
            .chain(self.products.iter())
            .map(|species| species.formula.clone())
            .collect();
        self.stoichiometry.to_table(&names).printstd();
    }

    pub fn species_table(&self) -> Table {
        let mut table = Table::new();
        table.add_row(Row::new(vec![
            Cell::new("Side"),
            Cell::new("Coefficient"),
            Cell::new("Formula"),
            Cell::new("SMILES"),
            Cell::new("Molar mass, g/mol"),
        ]));
        let sides = [
            (Side::Reactants, &self.reactants),
            (Side::Products, &self.products),
        ];
        for (side, species_list) in sides {
            for species in species_list.iter() {
                table.add_row(Row::new(vec![
                    Cell::new(side.as_str()),
                    Cell::new(&species.coefficient.to_string()),
                    Cell::new(&species.formula),
                    Cell::new(&species.structure),
                    Cell::new(&format!("{:.3}", species.molar_mass)),
                ]));
            }
        }
        table
    }

    pub fn element_table(&self) -> Table {
        let mut table = Table::new();
        table.add_row(Row::new(vec![
            Cell::new("Element"),
            Cell::new("Reactant atoms"),
            Cell::new("Product atoms"),
        ]));
        for (element, left, right) in self.element_totals() {
            table.add_row(Row::new(vec![
                Cell::new(&element),
                Cell::new(&left.to_string()),
                Cell::new(&right.to_string()),
            ]));
        }
        table
    }
}

fn parse_side(side: Side, structures: &[String]) -> Result<Vec<ParsedStructure>, BalanceError> {
    if structures.is_empty() {
        return Err(BalanceError::EmptyReactionSide(side));
    }
    structures
        .iter()
        .enumerate()
        .map(|(index, structure)| {
            parse_structure(structure).map_err(|source| BalanceError::InvalidStructure {
                side,
                index,
                structure: structure.clone(),
                source,
            })
        })
        .collect()
}

fn pair_species(
    structures: &[String],
    parsed: &[ParsedStructure],
    coefficients: &[u64],
) -> Vec<BalancedSpecies> {
    structures
        .iter()
        .zip(parsed)
        .zip(coefficients)
        .map(|((structure, parsed), &coefficient)| BalancedSpecies {
            structure: structure.trim().to_string(),
            formula: parsed.molecular_formula(),
            molar_mass: parsed.molar_mass(),
            coefficient,
            composition: parsed.composition(),
        })
        .collect()
}

/// Balances a reaction given as SMILES of reactants and products.
///
/// Every structure is parsed before anything else, so an invalid one fails
/// with `InvalidStructure` before the matrix is built; element sets that
/// differ fail with `ElementMismatch` before the engine is called.
pub fn balance_chemical_equation<E: IlpEngine + ?Sized>(
    reactant_smiles: &[String],
    product_smiles: &[String],
    engine: &E,
) -> Result<BalancedReaction, BalanceError> {
    info!(
        "balancing {:?} -> {:?}",
        reactant_smiles, product_smiles
    );
    let reactants = parse_side(Side::Reactants, reactant_smiles)?;
    let products = parse_side(Side::Products, product_smiles)?;

    let reactant_counts: Vec<ElementComposition> =
        reactants.iter().map(|parsed| parsed.composition()).collect();
    let product_counts: Vec<ElementComposition> =
        products.iter().map(|parsed| parsed.composition()).collect();
    let stoichiometry = build_matrix(&reactant_counts, &product_counts)?;

    let coefficients = solve(&stoichiometry.matrix, engine)?;
    if !stoichiometry.is_balanced_by(&coefficients) {
        error!("coefficients {:?} do not balance the matrix", coefficients);
        return Err(BalanceError::UnbalanceableReaction(
            SolveFailure::InvalidSolution,
        ));
    }
    let (reactant_coeffs, product_coeffs) = coefficients.split_at(reactant_smiles.len());
    info!("coefficients found: {:?}", coefficients);

    Ok(BalancedReaction {
        reactants: pair_species(reactant_smiles, &reactants, reactant_coeffs),
        products: pair_species(product_smiles, &products, product_coeffs),
        stoichiometry,
    })
}
