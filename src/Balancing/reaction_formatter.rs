use crate::Balancing::balance_errors::{BalanceError, Side};

pub const REACTION_ARROW: &str = " → ";
pub const COMPONENT_SEPARATOR: &str = " + ";

fn format_component(
    side: Side,
    index: usize,
    coefficient: i64,
    formula: &str,
) -> Result<String, BalanceError> {
    if coefficient < 1 {
        return Err(BalanceError::MalformedComponent {
            side,
            index,
            reason: format!("coefficient {} is not a positive integer", coefficient),
        });
    }
    let formula = formula.trim();
    if formula.is_empty() {
        return Err(BalanceError::MalformedComponent {
            side,
            index,
            reason: "empty formula".to_string(),
        });
    }
    if coefficient == 1 {
        Ok(formula.to_string())
    } else {
        Ok(format!("{} {}", coefficient, formula))
    }
}

fn format_side<S: AsRef<str>>(
    side: Side,
    components: &[(i64, S)],
) -> Result<String, BalanceError> {
    if components.is_empty() {
        return Err(BalanceError::EmptyReactionSide(side));
    }
    let rendered = components
        .iter()
        .enumerate()
        .map(|(index, (coefficient, formula))| {
            format_component(side, index, *coefficient, formula.as_ref())
        })
        .collect::<Result<Vec<String>, BalanceError>>()?;
    Ok(rendered.join(COMPONENT_SEPARATOR))
}

/// Renders (coefficient, formula) pairs as `2 H2 + O2 → 2 H2O`; a coefficient
/// of 1 is not written.
pub fn format_reaction<S: AsRef<str>>(
    reactants: &[(i64, S)],
    products: &[(i64, S)],
) -> Result<String, BalanceError> {
    let reactants = format_side(Side::Reactants, reactants)?;
    let products = format_side(Side::Products, products)?;
    Ok(format!("{}{}{}", reactants, REACTION_ARROW, products))
}

/// Reaction SMILES `r1.r2>>p1.p2` used for depiction
pub fn create_reaction_smiles<S: AsRef<str>>(reactants: &[S], products: &[S]) -> String {
    let join = |side: &[S]| {
        side.iter()
            .map(|s| s.as_ref().trim())
            .collect::<Vec<&str>>()
            .join(".")
    };
    format!("{}>>{}", join(reactants), join(products))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_reaction() {
        assert_eq!(
            format_reaction(&[(1, "H2O")], &[(1, "H2O")]).unwrap(),
            "H2O → H2O"
        );
        assert_eq!(
            format_reaction(&[(2, "H2"), (1, "O2")], &[(2, "H2O")]).unwrap(),
            "2 H2 + O2 → 2 H2O"
        );
    }

    #[test]
    fn test_empty_sides() {
        let empty: [(i64, &str); 0] = [];
        assert_eq!(
            format_reaction(&empty, &[(1, "H2O")]).unwrap_err(),
            BalanceError::EmptyReactionSide(Side::Reactants)
        );
        assert_eq!(
            format_reaction(&[(1, "H2O")], &empty).unwrap_err(),
            BalanceError::EmptyReactionSide(Side::Products)
        );
    }

    #[test]
    fn test_malformed_components() {
        let err = format_reaction(&[(2, "H2"), (0, "O2")], &[(2, "H2O")]).unwrap_err();
        assert!(matches!(
            err,
            BalanceError::MalformedComponent {
                side: Side::Reactants,
                index: 1,
                ..
            }
        ));
        let err = format_reaction(&[(2, "H2")], &[(-2, "H2O")]).unwrap_err();
        assert!(matches!(
            err,
            BalanceError::MalformedComponent {
                side: Side::Products,
                index: 0,
                ..
            }
        ));
        let err = format_reaction(&[(1, " ")], &[(1, "H2O")]).unwrap_err();
        assert!(matches!(err, BalanceError::MalformedComponent { .. }));
    }

    #[test]
    fn test_reaction_smiles() {
        assert_eq!(
            create_reaction_smiles(&["[HH]", "O=O"], &["O"]),
            "[HH].O=O>>O"
        );
    }
}
