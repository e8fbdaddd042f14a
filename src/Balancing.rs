/// Chemical elements: symbols, standard atomic masses and the default valences
/// used to fill implicit hydrogens of SMILES atoms.
pub mod periodic_table;
/// Error types shared by the balancing modules: structure parsing errors,
/// solver failures and the reaction level `BalanceError`.
pub mod balance_errors;
/// eng
/// The module takes a SMILES string and produces:
/// 1) the list of atoms with resolved implicit and bracket hydrogens
/// 2) the element composition of the molecule, hydrogens included
/// 3) the molecular formula in Hill order and the molar mass
///
/// Syntax and ring closures are read by `purr` into a molecular graph; the
/// module resolves elements, hydrogens and charges of its atoms. Wildcard
/// atoms and organic subset atoms bonded beyond their valence are rejected.
/// # Examples
/// ```
/// use StoichBalancer::Balancing::structure_parser::{parse, molecular_formula};
/// let composition = parse("CCO").unwrap();
/// assert_eq!(composition["C"], 2);
/// assert_eq!(composition["H"], 6);
/// assert_eq!(molecular_formula("c1ccccc1").unwrap(), "C6H6");
/// ```
pub mod structure_parser;
/// Builds the element x species matrix of a reaction: rows are elements sorted
/// by symbol, reactant columns hold atom counts, product columns hold negated
/// atom counts. Element sets that differ between sides are reported before any
/// matrix is built.
pub mod stoichiometry_matrix;
/// Minimal positive integer coefficients for a stoichiometry matrix. The
/// integer program goes through the `IlpEngine` trait; `LatticeSearchEngine`
/// is the exact built-in engine.
pub mod balance_solver;
/// Text rendering of balanced reactions (`2 H2 + O2 → 2 H2O`) and reaction
/// SMILES (`r1.r2>>p1.p2`) for depiction.
pub mod reaction_formatter;
/// Parse -> matrix -> solve -> verify pipeline returning a `BalancedReaction`
pub mod balance_api;
mod balance_api_tests;
