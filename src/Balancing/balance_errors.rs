use std::fmt;
use thiserror::Error;

/// Side of the reaction arrow a molecule belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Reactants,
    Products,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Reactants => "reactants",
            Side::Products => "products",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a SMILES string does not encode a structure. Atom indices count atoms
/// in order of appearance, starting at zero.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureError {
    #[error("empty structure string")]
    Empty,
    /// rejected by the SMILES reader, carries its diagnostic
    #[error("invalid SMILES syntax: {0}")]
    Syntax(String),
    /// bonds that cannot be assembled into a graph, e.g. an open ring bond
    #[error("inconsistent SMILES bonds: {0}")]
    Topology(String),
    #[error("unknown element '{symbol}' at atom #{}", .atom + 1)]
    UnknownElement { symbol: String, atom: usize },
    #[error("wildcard atom #{} has no element", .0 + 1)]
    WildcardAtom(usize),
    #[error("malformed bracket atom '{text}' at atom #{}", .atom + 1)]
    MalformedBracketAtom { text: String, atom: usize },
    #[error("{symbol} (atom #{}) has bond order {bonds}, above its valence", .atom + 1)]
    InvalidValence {
        symbol: String,
        atom: usize,
        bonds: u32,
    },
}

/// How the integer programming engine failed to produce coefficients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveFailure {
    /// No assignment of positive integers balances the matrix
    Infeasible,
    /// The engine gave up before proving an optimum
    Timeout,
    /// The engine reported values that are not positive integers
    NonIntegral,
    /// The engine reported coefficients that leave some element unbalanced
    InvalidSolution,
}

impl fmt::Display for SolveFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveFailure::Infeasible => write!(f, "no positive integer coefficients exist"),
            SolveFailure::Timeout => {
                write!(f, "solver budget exhausted before an optimum was proved")
            }
            SolveFailure::NonIntegral => write!(f, "solver returned non-integral coefficients"),
            SolveFailure::InvalidSolution => {
                write!(f, "solver returned coefficients that do not balance the reaction")
            }
        }
    }
}

/// Errors of the balancing core
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BalanceError {
    #[error("invalid structure '{structure}' ({side} #{}): {source}", .index + 1)]
    InvalidStructure {
        side: Side,
        index: usize,
        structure: String,
        source: StructureError,
    },
    #[error("{}", element_mismatch_message(.only_in_reactants, .only_in_products))]
    ElementMismatch {
        only_in_reactants: Vec<String>,
        only_in_products: Vec<String>,
    },
    #[error("failed to balance the reaction: {0}")]
    UnbalanceableReaction(SolveFailure),
    #[error("the {0} side of the reaction is empty")]
    EmptyReactionSide(Side),
    #[error("malformed component #{} on the {side} side: {reason}", .index + 1)]
    MalformedComponent {
        side: Side,
        index: usize,
        reason: String,
    },
}

fn element_mismatch_message(only_in_reactants: &[String], only_in_products: &[String]) -> String {
    let mut message = "Element mismatch found:".to_string();
    if !only_in_reactants.is_empty() {
        message.push_str(&format!(
            " elements {:?} are in reactants but not in products.",
            only_in_reactants
        ));
    }
    if !only_in_products.is_empty() {
        message.push_str(&format!(
            " elements {:?} are in products but not in reactants.",
            only_in_products
        ));
    }
    message
}
