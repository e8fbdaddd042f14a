//! Minimal positive integer coefficients for a stoichiometry matrix.
//!
//! The problem is the integer program
//!
//! ```text
//! minimize   Σ x_j
//! subject to A·x = 0,  x_j >= 1,  x_j integer
//! ```
//!
//! The engine sits behind the [`IlpEngine`] trait so the balancing code only
//! sees a tagged [`SolveOutcome`]. [`LatticeSearchEngine`] is the built-in
//! exact engine: it reduces `A` to reduced row echelon form over rationals,
//! writes every pivot variable as a linear function of the free variables and
//! enumerates free assignments by increasing sum until the optimum is proved.
//!
//! Minimizing the coefficient sum is a heuristic for the "smallest whole
//! number ratio" chemists write. When a reaction is made of several
//! independent sub-reactions the minimum may not be the conventional one, and
//! several assignments may share the same minimal sum; the first one found is
//! returned.
//!
//! Infeasibility is proved before the search only when a single pivot, or the
//! sum of all pivots, cannot be raised by positive free variables. Other
//! infeasible systems run until the iteration budget and report `Timeout`.
use crate::Balancing::balance_errors::{BalanceError, SolveFailure};
use log::{debug, info, warn};
use malachite::num::arithmetic::traits::{Abs, Lcm};
use malachite::num::basic::traits::{One, Zero};
use malachite::{Natural, Rational};
use nalgebra::DMatrix;

/// Result reported by an integer programming engine
#[derive(Debug, Clone, PartialEq)]
pub enum SolveOutcome {
    /// optimal values, one per matrix column
    Optimal(Vec<Rational>),
    Infeasible,
    Timeout,
}

/// Boundary to an integer linear programming engine
pub trait IlpEngine {
    /// Minimizes the sum of the variables subject to `matrix · x = 0` and
    /// `x_j >= lower_bound`, all `x_j` integer.
    fn minimize_sum(&self, matrix: &DMatrix<i64>, lower_bound: i64) -> SolveOutcome;
}

/// Exact engine enumerating the integer lattice of the null space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatticeSearchEngine {
    /// candidate assignments examined before giving up
    pub max_iterations: u64,
}

impl Default for LatticeSearchEngine {
    fn default() -> Self {
        Self {
            max_iterations: 2_000_000,
        }
    }
}

impl LatticeSearchEngine {
    pub fn new(max_iterations: u64) -> Self {
        Self { max_iterations }
    }
}

// x_column = Σ numerators[k] * x_free[k] / denominator
#[derive(Debug, Clone)]
struct PivotExpression {
    column: usize,
    numerators: Vec<i64>,
    denominator: i64,
}

impl PivotExpression {
    fn evaluate(&self, free_values: &[i128]) -> Option<i128> {
        let mut total: i128 = 0;
        for (numerator, value) in self.numerators.iter().zip(free_values) {
            total = total.checked_add((*numerator as i128).checked_mul(*value)?)?;
        }
        if total % self.denominator as i128 == 0 {
            Some(total / self.denominator as i128)
        } else {
            None
        }
    }
}

/// Reduced row echelon form over exact rationals; returns the reduced rows and
/// the pivot column of every non-zero row.
pub fn reduced_row_echelon(matrix: &DMatrix<i64>) -> (Vec<Vec<Rational>>, Vec<usize>) {
    let (m, n) = matrix.shape();
    let mut rows: Vec<Vec<Rational>> = (0..m)
        .map(|i| (0..n).map(|j| Rational::from(matrix[(i, j)])).collect())
        .collect();
    let mut pivots = Vec::new();
    let mut row = 0;
    for col in 0..n {
        if row == m {
            break;
        }
        let mut i_max = row;
        for i in (row + 1)..m {
            if (&rows[i][col]).abs() > (&rows[i_max][col]).abs() {
                i_max = i;
            }
        }
        if rows[i_max][col] == Rational::ZERO {
            continue;
        }
        rows.swap(row, i_max);

        let pivot = rows[row][col].clone();
        for value in rows[row].iter_mut() {
            *value /= &pivot;
        }
        for i in 0..m {
            if i == row || rows[i][col] == Rational::ZERO {
                continue;
            }
            let factor = rows[i][col].clone();
            for j in col..n {
                let delta = &factor * &rows[row][j];
                rows[i][j] -= delta;
            }
        }
        pivots.push(col);
        row += 1;
    }
    (rows, pivots)
}

// next vector of non-negative parts with the same sum, lexicographically
// descending from [total, 0, .., 0] to [0, .., 0, total]
fn next_weak_composition(parts: &mut [u64]) -> bool {
    let k = parts.len();
    if k < 2 {
        return false;
    }
    let Some(i) = (0..k - 1).rev().find(|&i| parts[i] > 0) else {
        return false;
    };
    parts[i] -= 1;
    let tail: u64 = parts[i + 1..].iter().sum::<u64>() + 1;
    for part in parts[i + 1..].iter_mut() {
        *part = 0;
    }
    parts[i + 1] = tail;
    true
}

impl LatticeSearchEngine {
    fn pivot_expressions(
        rows: &[Vec<Rational>],
        pivots: &[usize],
        free: &[usize],
        lower_bound: i64,
    ) -> Result<Vec<PivotExpression>, SolveOutcome> {
        let mut expressions = Vec::with_capacity(pivots.len());
        let mut total = vec![Rational::ZERO; free.len()];
        for (row, &column) in pivots.iter().enumerate() {
            let coefficients: Vec<Rational> =
                free.iter().map(|&f| -rows[row][f].clone()).collect();
            // positive free variables can never lift this pivot to the bound
            if lower_bound > 0 && coefficients.iter().all(|c| c <= &Rational::ZERO) {
                debug!("pivot column {} cannot become positive", column);
                return Err(SolveOutcome::Infeasible);
            }
            for (sum, c) in total.iter_mut().zip(coefficients.iter()) {
                *sum += c;
            }
            let mut lcm = Natural::ONE;
            for c in coefficients.iter() {
                lcm = lcm.lcm(c.denominator_ref());
            }
            let scale = Rational::from(&lcm);
            let numerators: Option<Vec<i64>> = coefficients
                .iter()
                .map(|c| i64::try_from(&(c * &scale)).ok())
                .collect();
            match (numerators, i64::try_from(&scale).ok()) {
                (Some(numerators), Some(denominator)) => expressions.push(PivotExpression {
                    column,
                    numerators,
                    denominator,
                }),
                _ => {
                    warn!("pivot expression of column {} overflows i64", column);
                    return Err(SolveOutcome::Timeout);
                }
            }
        }
        // the pivots together must reach pivots.len() * lower_bound, which a
        // sum with no positive free coefficient cannot do
        if lower_bound > 0 && !pivots.is_empty() && total.iter().all(|c| c <= &Rational::ZERO) {
            debug!("sum of the pivot columns cannot become positive");
            return Err(SolveOutcome::Infeasible);
        }
        Ok(expressions)
    }
}

impl IlpEngine for LatticeSearchEngine {
    fn minimize_sum(&self, matrix: &DMatrix<i64>, lower_bound: i64) -> SolveOutcome {
        let n = matrix.ncols();
        let (rows, pivots) = reduced_row_echelon(matrix);
        let free: Vec<usize> = (0..n).filter(|j| !pivots.contains(j)).collect();
        debug!("pivot columns {:?}, free columns {:?}", pivots, free);
        if free.is_empty() {
            // only the zero vector solves the system
            return SolveOutcome::Infeasible;
        }
        let expressions = match Self::pivot_expressions(&rows, &pivots, &free, lower_bound) {
            Ok(expressions) => expressions,
            Err(outcome) => return outcome,
        };

        let k = free.len();
        let lower = lower_bound as i128;
        // every free and every pivot variable contributes at least the bound
        let floor = (k + expressions.len()) as i128 * lower;
        let mut best: Option<(i128, Vec<i128>, Vec<i128>)> = None;
        let mut iterations: u64 = 0;

        for level in 0u64.. {
            if let Some((objective, _, _)) = &best {
                if floor + level as i128 >= *objective {
                    break;
                }
            }
            let mut offsets = vec![0u64; k];
            offsets[0] = level;
            loop {
                iterations += 1;
                if iterations > self.max_iterations {
                    warn!(
                        "lattice search stopped after {} candidates without proving an optimum",
                        self.max_iterations
                    );
                    return SolveOutcome::Timeout;
                }
                let free_values: Vec<i128> = offsets.iter().map(|&y| lower + y as i128).collect();
                let pivot_values: Option<Vec<i128>> = expressions
                    .iter()
                    .map(|e| e.evaluate(&free_values).filter(|&v| v >= lower))
                    .collect();
                if let Some(pivot_values) = pivot_values {
                    let objective: i128 =
                        free_values.iter().sum::<i128>() + pivot_values.iter().sum::<i128>();
                    let improves = match &best {
                        Some((best_objective, _, _)) => objective < *best_objective,
                        None => true,
                    };
                    if improves {
                        best = Some((objective, free_values, pivot_values));
                    }
                }
                if !next_weak_composition(&mut offsets) {
                    break;
                }
            }
        }

        let Some((objective, free_values, pivot_values)) = best else {
            return SolveOutcome::Infeasible;
        };
        let mut values = vec![Rational::ZERO; n];
        for (&column, value) in free.iter().zip(free_values) {
            match i64::try_from(value) {
                Ok(v) => values[column] = Rational::from(v),
                Err(_) => return SolveOutcome::Timeout,
            }
        }
        for (expression, value) in expressions.iter().zip(pivot_values) {
            match i64::try_from(value) {
                Ok(v) => values[expression.column] = Rational::from(v),
                Err(_) => return SolveOutcome::Timeout,
            }
        }
        info!(
            "optimum {} proved after {} candidate assignments",
            objective, iterations
        );
        SolveOutcome::Optimal(values)
    }
}

/// Minimal positive integer coefficients balancing `matrix`, one per column.
/// The engine's values are accepted only if they are exact positive integers
/// that zero every row.
pub fn solve<E: IlpEngine + ?Sized>(
    matrix: &DMatrix<i64>,
    engine: &E,
) -> Result<Vec<u64>, BalanceError> {
    if matrix.ncols() == 0 {
        return Err(BalanceError::UnbalanceableReaction(SolveFailure::Infeasible));
    }
    let values = match engine.minimize_sum(matrix, 1) {
        SolveOutcome::Optimal(values) => values,
        SolveOutcome::Infeasible => {
            return Err(BalanceError::UnbalanceableReaction(SolveFailure::Infeasible));
        }
        SolveOutcome::Timeout => {
            return Err(BalanceError::UnbalanceableReaction(SolveFailure::Timeout));
        }
    };
    if values.len() != matrix.ncols() {
        return Err(BalanceError::UnbalanceableReaction(
            SolveFailure::InvalidSolution,
        ));
    }

    let mut coefficients = Vec::with_capacity(values.len());
    for value in values.iter() {
        match u64::try_from(value) {
            Ok(c) if c >= 1 => coefficients.push(c),
            _ => {
                warn!("engine returned {} which is not a positive integer", value);
                return Err(BalanceError::UnbalanceableReaction(SolveFailure::NonIntegral));
            }
        }
    }

    for i in 0..matrix.nrows() {
        let row_sum: i128 = coefficients
            .iter()
            .enumerate()
            .map(|(j, &c)| matrix[(i, j)] as i128 * c as i128)
            .sum();
        if row_sum != 0 {
            return Err(BalanceError::UnbalanceableReaction(
                SolveFailure::InvalidSolution,
            ));
        }
    }
    Ok(coefficients)
}
