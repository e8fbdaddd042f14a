use crate::Balancing::balance_errors::{BalanceError, Side};
use crate::Balancing::structure_parser::ElementComposition;
use log::{debug, info};
use nalgebra::{DMatrix, DVector};
use prettytable::{Cell, Row, Table};
use std::collections::BTreeSet;

/// Element rows x species columns. Reactant columns come first, product
/// columns follow with negated counts, so a balanced coefficient vector is in
/// the null space of `matrix`.
#[derive(Debug, Clone, PartialEq)]
pub struct StoichiometryMatrix {
    /// row labels, sorted lexicographically
    pub elements: Vec<String>,
    pub matrix: DMatrix<i64>,
    pub n_reactants: usize,
}

impl StoichiometryMatrix {
    pub fn n_species(&self) -> usize {
        self.matrix.ncols()
    }

    pub fn n_products(&self) -> usize {
        self.matrix.ncols() - self.n_reactants
    }

    /// True when every element row dotted with the coefficients gives zero
    pub fn is_balanced_by(&self, coefficients: &[u64]) -> bool {
        if coefficients.len() != self.n_species() {
            return false;
        }
        let mut x = DVector::<i64>::zeros(coefficients.len());
        for (i, &c) in coefficients.iter().enumerate() {
            match i64::try_from(c) {
                Ok(c) => x[i] = c,
                Err(_) => return false,
            }
        }
        let residual = &self.matrix * &x;
        residual.iter().all(|&r| r == 0)
    }

    /// Table with one row per element and one column per species
    pub fn to_table(&self, species_names: &[String]) -> Table {
        let mut table = Table::new();
        let mut header = vec![Cell::new("Element")];
        for j in 0..self.n_species() {
            let name = species_names
                .get(j)
                .cloned()
                .unwrap_or_else(|| format!("x{}", j));
            header.push(Cell::new(&name));
        }
        table.add_row(Row::new(header));
        for (i, element) in self.elements.iter().enumerate() {
            let mut row = vec![Cell::new(element)];
            for j in 0..self.n_species() {
                row.push(Cell::new(&self.matrix[(i, j)].to_string()));
            }
            table.add_row(Row::new(row));
        }
        table
    }
}

fn element_set(
    side: Side,
    compositions: &[ElementComposition],
) -> Result<BTreeSet<&str>, BalanceError> {
    if compositions.is_empty() {
        return Err(BalanceError::EmptyReactionSide(side));
    }
    let mut elements = BTreeSet::new();
    for (index, composition) in compositions.iter().enumerate() {
        if composition.values().all(|&count| count == 0) {
            return Err(BalanceError::MalformedComponent {
                side,
                index,
                reason: "empty element composition".to_string(),
            });
        }
        elements.extend(
            composition
                .iter()
                .filter(|(_, count)| **count > 0)
                .map(|(symbol, _)| symbol.as_str()),
        );
    }
    Ok(elements)
}

/// Assembles the signed element composition matrix of a reaction. Fails with
/// `ElementMismatch` when some element shows up on only one side.
pub fn build_matrix(
    reactants: &[ElementComposition],
    products: &[ElementComposition],
) -> Result<StoichiometryMatrix, BalanceError> {
    let reactant_elements = element_set(Side::Reactants, reactants)?;
    let product_elements = element_set(Side::Products, products)?;

    if reactant_elements != product_elements {
        let only_in_reactants: Vec<String> = reactant_elements
            .difference(&product_elements)
            .map(|s| s.to_string())
            .collect();
        let only_in_products: Vec<String> = product_elements
            .difference(&reactant_elements)
            .map(|s| s.to_string())
            .collect();
        info!(
            "element mismatch: only in reactants {:?}, only in products {:?}",
            only_in_reactants, only_in_products
        );
        return Err(BalanceError::ElementMismatch {
            only_in_reactants,
            only_in_products,
        });
    }

    let elements: Vec<String> = reactant_elements.iter().map(|s| s.to_string()).collect();
    let n_reactants = reactants.len();
    let matrix = DMatrix::from_fn(elements.len(), n_reactants + products.len(), |i, j| {
        let element = elements[i].as_str();
        if j < n_reactants {
            reactants[j].get(element).copied().unwrap_or(0) as i64
        } else {
            -(products[j - n_reactants].get(element).copied().unwrap_or(0) as i64)
        }
    });
    debug!("stoichiometry matrix for elements {:?}: {}", elements, matrix);
    Ok(StoichiometryMatrix {
        elements,
        matrix,
        n_reactants,
    })
}
