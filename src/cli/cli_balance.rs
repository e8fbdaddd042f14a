use crate::Balancing::balance_api::{BalancedReaction, balance_chemical_equation};
use crate::Balancing::balance_errors::BalanceError;
use crate::Balancing::balance_solver::IlpEngine;
use crate::Balancing::structure_parser::is_valid_structure;
use crate::Lookup::depiction_api::{DiagramRenderer, save_diagram};
use crate::Lookup::http_client::LookupError;
use crate::Lookup::structure_source::NameResolver;
use crate::Utils::show_this_pic::open_with_default_viewer;
use crate::settings::BalancerSettings;
use log::{info, warn};
use std::io::{self, BufRead, Write};

/// How an interactive balancing session ended
#[derive(Debug)]
pub enum SessionOutcome {
    Balanced(BalancedReaction),
    Failed(BalanceError),
    /// input ended before every species was entered
    Cancelled,
}

/// One trimmed line, `None` at end of input
pub fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn prompt<W: Write>(output: &mut W, text: &str) -> io::Result<()> {
    write!(output, "\x1b[36m{}\x1b[0m ", text)?;
    output.flush()
}

/// Asks until the answer is an integer between 1 and `max`
pub fn get_nonzero_integer<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    text: &str,
    max: usize,
) -> io::Result<Option<usize>> {
    loop {
        prompt(output, text)?;
        let Some(line) = read_line(input)? else {
            return Ok(None);
        };
        match line.parse::<i64>() {
            Ok(value) if value > 0 => {
                let value = value as usize;
                if value <= max {
                    return Ok(Some(value));
                }
                writeln!(output, "Number of species should not exceed {}.", max)?;
            }
            _ => writeln!(output, "Invalid input. Please enter a non-zero integer.")?,
        }
    }
}

/// Asks until `source` turns the answer into a SMILES string the parser accepts
pub fn get_valid_structure<R: BufRead, W: Write, S: NameResolver + ?Sized>(
    input: &mut R,
    output: &mut W,
    text: &str,
    source: &S,
) -> io::Result<Option<String>> {
    loop {
        prompt(output, text)?;
        let Some(query) = read_line(input)? else {
            return Ok(None);
        };
        if query.is_empty() {
            continue;
        }
        match source.resolve(&query) {
            Ok(smiles) if is_valid_structure(&smiles) => return Ok(Some(smiles)),
            Ok(smiles) => {
                info!("rejected structure {:?} for {:?}", smiles, query);
                writeln!(output, "Invalid SMILES format. Please enter a valid SMILES string.")?;
            }
            Err(LookupError::NotFound(name)) => {
                writeln!(output, "No data found for '{}'. Please try another name.", name)?;
            }
            Err(e) => {
                warn!("lookup of {:?} failed: {}", query, e);
                writeln!(output, "Lookup failed: {}", e)?;
            }
        }
    }
}

fn collect_side<R: BufRead, W: Write, S: NameResolver + ?Sized>(
    input: &mut R,
    output: &mut W,
    label: &str,
    count: usize,
    source: &S,
) -> io::Result<Option<Vec<String>>> {
    let mut structures = Vec::with_capacity(count);
    for i in 0..count {
        writeln!(output, "{} {}:", label, i + 1)?;
        let prompt = format!("{} ({}):", label, source.describe());
        match get_valid_structure(input, output, &prompt, source)? {
            Some(smiles) => structures.push(smiles),
            None => return Ok(None),
        }
    }
    Ok(Some(structures))
}

fn show_diagram<W: Write, D: DiagramRenderer + ?Sized>(
    output: &mut W,
    renderer: &D,
    reaction: &BalancedReaction,
    settings: &BalancerSettings,
) -> io::Result<()> {
    let saved = renderer
        .render(&reaction.reaction_smiles())
        .and_then(|svg| save_diagram(&svg, settings.diagram_dir.as_deref()));
    match saved {
        Ok(path) => {
            writeln!(output, "representation of the reaction: {}", path.display())?;
            if settings.open_viewer {
                if let Err(e) = open_with_default_viewer(&path) {
                    warn!("could not open {}: {}", path.display(), e);
                    writeln!(output, "Could not open the diagram: {}", e)?;
                }
            }
        }
        Err(e) => {
            warn!("diagram of {} failed: {}", reaction.reaction_smiles(), e);
            writeln!(output, "Could not draw the reaction: {}", e)?;
        }
    }
    Ok(())
}

/// Asks for the species of a reaction, balances it and prints the result.
/// Chemistry failures are printed and returned, never panicked on.
pub fn run_balancing_session<R, W, S, E, D>(
    input: &mut R,
    output: &mut W,
    source: &S,
    engine: &E,
    renderer: Option<&D>,
    settings: &BalancerSettings,
) -> io::Result<SessionOutcome>
where
    R: BufRead,
    W: Write,
    S: NameResolver + ?Sized,
    E: IlpEngine + ?Sized,
    D: DiagramRenderer + ?Sized,
{
    let max = settings.max_species_per_side;
    let Some(n_reactants) = get_nonzero_integer(input, output, "Number of reactants:", max)? else {
        return Ok(SessionOutcome::Cancelled);
    };
    let Some(n_products) = get_nonzero_integer(input, output, "Number of products:", max)? else {
        return Ok(SessionOutcome::Cancelled);
    };
    let Some(reactants) = collect_side(input, output, "Reactant", n_reactants, source)? else {
        return Ok(SessionOutcome::Cancelled);
    };
    let Some(products) = collect_side(input, output, "Product", n_products, source)? else {
        return Ok(SessionOutcome::Cancelled);
    };
    writeln!(output, "Reactants: {:?}", reactants)?;
    writeln!(output, "Products: {:?}", products)?;

    let reaction = match balance_chemical_equation(&reactants, &products, engine) {
        Ok(reaction) => reaction,
        Err(e) => {
            warn!("balancing failed: {}", e);
            writeln!(output, "\x1b[31m{}\x1b[0m", e)?;
            return Ok(SessionOutcome::Failed(e));
        }
    };
    match reaction.equation_string() {
        Ok(equation) => writeln!(output, "\nstoichiometric reaction is {}\n", equation)?,
        Err(e) => {
            writeln!(output, "\x1b[31m{}\x1b[0m", e)?;
            return Ok(SessionOutcome::Failed(e));
        }
    }
    reaction.species_table().print(output)?;
    reaction.element_table().print(output)?;

    if settings.render_diagram {
        if let Some(renderer) = renderer {
            show_diagram(output, renderer, &reaction, settings)?;
        }
    }
    Ok(SessionOutcome::Balanced(reaction))
}
