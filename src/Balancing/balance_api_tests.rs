/////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// TESTS
//////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use crate::Balancing::balance_api::balance_chemical_equation;
    use crate::Balancing::balance_errors::{BalanceError, Side, SolveFailure, StructureError};
    use crate::Balancing::balance_solver::{IlpEngine, LatticeSearchEngine, SolveOutcome};
    use approx::assert_relative_eq;
    use malachite::Rational;
    use nalgebra::DMatrix;

    fn smiles(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    struct PanickingEngine;
    impl IlpEngine for PanickingEngine {
        fn minimize_sum(&self, _matrix: &DMatrix<i64>, _lower_bound: i64) -> SolveOutcome {
            panic!("the engine must not be reached");
        }
    }

    struct FixedEngine(SolveOutcome);
    impl IlpEngine for FixedEngine {
        fn minimize_sum(&self, _matrix: &DMatrix<i64>, _lower_bound: i64) -> SolveOutcome {
            self.0.clone()
        }
    }

    #[test]
    fn test_water_formation() {
        let engine = LatticeSearchEngine::default();
        let reaction =
            balance_chemical_equation(&smiles(&["[HH]", "O=O"]), &smiles(&["O"]), &engine).unwrap();
        assert_eq!(reaction.coefficients(), vec![2, 1, 2]);
        assert_eq!(reaction.equation_string().unwrap(), "2 H2 + O2 → 2 H2O");
        assert_eq!(reaction.reaction_smiles(), "[HH].O=O>>O");
        assert_eq!(
            reaction.element_totals(),
            vec![("H".to_string(), 4, 4), ("O".to_string(), 2, 2)]
        );
        assert_eq!(reaction.reactants[0].formula, "H2");
        assert_eq!(reaction.products[0].formula, "H2O");
    }

    #[test]
    fn test_methane_combustion() {
        let engine = LatticeSearchEngine::default();
        let reaction = balance_chemical_equation(
            &smiles(&["C", "O=O"]),
            &smiles(&["O=C=O", "O"]),
            &engine,
        )
        .unwrap();
        assert_eq!(reaction.coefficients(), vec![1, 2, 1, 2]);
        assert_eq!(
            reaction.equation_string().unwrap(),
            "CH4 + 2 O2 → CO2 + 2 H2O"
        );
    }

    #[test]
    fn test_benzene_combustion() {
        let engine = LatticeSearchEngine::default();
        let reaction = balance_chemical_equation(
            &smiles(&["c1ccccc1", "O=O"]),
            &smiles(&["O=C=O", "O"]),
            &engine,
        )
        .unwrap();
        assert_eq!(reaction.coefficients(), vec![2, 15, 12, 6]);
    }

    #[test]
    fn test_photosynthesis() {
        let engine = LatticeSearchEngine::default();
        let reaction = balance_chemical_equation(
            &smiles(&["O=C=O", "O"]),
            &smiles(&["OCC1OC(O)C(O)C(O)C1O", "O=O"]),
            &engine,
        )
        .unwrap();
        assert_eq!(reaction.coefficients(), vec![6, 6, 1, 6]);
        assert_eq!(
            reaction.equation_string().unwrap(),
            "6 CO2 + 6 H2O → C6H12O6 + 6 O2"
        );
    }

    #[test]
    fn test_mass_is_conserved() {
        let engine = LatticeSearchEngine::default();
        let reaction = balance_chemical_equation(
            &smiles(&["CCO", "O=O"]),
            &smiles(&["O=C=O", "O"]),
            &engine,
        )
        .unwrap();
        assert_eq!(reaction.coefficients(), vec![1, 3, 2, 3]);
        let mass = |side: &[crate::Balancing::balance_api::BalancedSpecies]| -> f64 {
            side.iter()
                .map(|species| species.coefficient as f64 * species.molar_mass)
                .sum()
        };
        assert_relative_eq!(
            mass(&reaction.reactants),
            mass(&reaction.products),
            max_relative = 1e-9
        );
        for (_, left, right) in reaction.element_totals() {
            assert_eq!(left, right);
        }
    }

    #[test]
    fn test_element_mismatch_does_not_reach_the_engine() {
        let err = balance_chemical_equation(
            &smiles(&["[HH]", "O=O"]),
            &smiles(&["O", "C"]),
            &PanickingEngine,
        )
        .unwrap_err();
        assert_eq!(
            err,
            BalanceError::ElementMismatch {
                only_in_reactants: vec![],
                only_in_products: vec!["C".to_string()],
            }
        );
        assert!(err.to_string().contains("[\"C\"] are in products"));
    }

    #[test]
    fn test_invalid_structure_is_reported_with_atom_index() {
        let err = balance_chemical_equation(
            &smiles(&["[HH]", "O=O"]),
            &smiles(&["O", "CN(C)(C)C"]),
            &PanickingEngine,
        )
        .unwrap_err();
        assert_eq!(
            err,
            BalanceError::InvalidStructure {
                side: Side::Products,
                index: 1,
                structure: "CN(C)(C)C".to_string(),
                source: StructureError::InvalidValence {
                    symbol: "N".to_string(),
                    atom: 1,
                    bonds: 4,
                },
            }
        );
    }

    #[test]
    fn test_empty_sides() {
        let engine = LatticeSearchEngine::default();
        assert_eq!(
            balance_chemical_equation(&[], &smiles(&["O"]), &engine).unwrap_err(),
            BalanceError::EmptyReactionSide(Side::Reactants)
        );
        assert_eq!(
            balance_chemical_equation(&smiles(&["O"]), &[], &engine).unwrap_err(),
            BalanceError::EmptyReactionSide(Side::Products)
        );
    }

    #[test]
    fn test_infeasible_reaction() {
        // H2O -> H2O2 has the same elements but no positive solution
        let err = balance_chemical_equation(
            &smiles(&["O"]),
            &smiles(&["OO"]),
            &LatticeSearchEngine::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            BalanceError::UnbalanceableReaction(SolveFailure::Infeasible)
        );
    }

    #[test]
    fn test_engine_failures_are_propagated() {
        let reactants = smiles(&["[HH]", "O=O"]);
        let products = smiles(&["O"]);
        let err = balance_chemical_equation(
            &reactants,
            &products,
            &FixedEngine(SolveOutcome::Timeout),
        )
        .unwrap_err();
        assert_eq!(err, BalanceError::UnbalanceableReaction(SolveFailure::Timeout));

        let wrong = (1..=3i64).map(Rational::from).collect::<Vec<Rational>>();
        let err = balance_chemical_equation(
            &reactants,
            &products,
            &FixedEngine(SolveOutcome::Optimal(wrong)),
        )
        .unwrap_err();
        assert_eq!(
            err,
            BalanceError::UnbalanceableReaction(SolveFailure::InvalidSolution)
        );

        let fractional = vec![
            Rational::from_signeds(1i64, 2i64),
            Rational::from(1i64),
            Rational::from(1i64),
        ];
        let err = balance_chemical_equation(
            &reactants,
            &products,
            &FixedEngine(SolveOutcome::Optimal(fractional)),
        )
        .unwrap_err();
        assert_eq!(
            err,
            BalanceError::UnbalanceableReaction(SolveFailure::NonIntegral)
        );
    }

    #[test]
    fn test_balancing_is_repeatable() {
        let engine = LatticeSearchEngine::default();
        let reactants = smiles(&["[K+].[O-][Mn](=O)(=O)=O", "Cl"]);
        let products = smiles(&["[K+].[Cl-]", "Cl[Mn]Cl", "O", "ClCl"]);
        let first = balance_chemical_equation(&reactants, &products, &engine).unwrap();
        let second = balance_chemical_equation(&reactants, &products, &engine).unwrap();
        assert_eq!(first.coefficients(), vec![2, 16, 2, 2, 8, 5]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_structures_are_trimmed() {
        let engine = LatticeSearchEngine::default();
        let reaction =
            balance_chemical_equation(&smiles(&[" [HH] ", "O=O"]), &smiles(&["O "]), &engine)
                .unwrap();
        assert_eq!(reaction.reaction_smiles(), "[HH].O=O>>O");
    }

    #[test]
    fn test_tables() {
        let engine = LatticeSearchEngine::default();
        let reaction =
            balance_chemical_equation(&smiles(&["[HH]", "O=O"]), &smiles(&["O"]), &engine).unwrap();
        assert_eq!(reaction.species_table().len(), 4);
        assert_eq!(reaction.element_table().len(), 3);
        reaction.pretty_print();
    }
}
