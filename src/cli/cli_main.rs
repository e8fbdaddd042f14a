use super::cli_balance::{SessionOutcome, read_line, run_balancing_session};
use crate::Lookup::depiction_api::CdkDepictRenderer;
use crate::Lookup::structure_source::{SourceType, create_source};
use crate::settings::SettingsManager;
use std::io::{self, BufRead, Write};

pub fn run_interactive_menu() -> io::Result<()> {
    let manager = SettingsManager::new();
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    run_menu(&mut input, &mut output, &manager)
}

/// Main menu loop; returns when the user exits or input ends
pub fn run_menu<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    manager: &SettingsManager,
) -> io::Result<()> {
    loop {
        show_main_menu(output)?;
        let Some(choice) = read_line(input)? else {
            writeln!(output, "Goodbye!")?;
            return Ok(());
        };
        match choice.as_str() {
            "1" => balance_menu(input, output, manager, SourceType::PubChem)?,
            "2" => balance_menu(input, output, manager, SourceType::Literal)?,
            "3" => {
                writeln!(output, "settings file: {}", manager.config_file())?;
                manager.get_settings().to_table().print(output)?;
            }
            "0" => {
                writeln!(output, "Goodbye!")?;
                return Ok(());
            }
            _ => writeln!(output, "Invalid choice. Please try again.")?,
        }
    }
}

fn balance_menu<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    manager: &SettingsManager,
    source_type: SourceType,
) -> io::Result<()> {
    let settings = manager.get_settings();
    let source = create_source(source_type, &settings.pubchem_base_url);
    let renderer = CdkDepictRenderer::new().with_base_url(&settings.depiction_base_url);
    let engine = manager.solver_engine();
    let outcome = run_balancing_session(
        input,
        output,
        &source,
        &engine,
        Some(&renderer),
        settings,
    )?;
    if let SessionOutcome::Cancelled = outcome {
        writeln!(output, "\nInput ended, returning to the main menu.")?;
    }
    Ok(())
}
/* colors
Blue (\x1b[34m) - Welcome header text

Yellow (\x1b[33m) - Menu options (1, 2, 3, 0)

Cyan (\x1b[36m) - "Enter your choice:" prompt

Reset (\x1b[0m) - Returns to normal color after each colored section
*/
fn show_main_menu<W: Write>(output: &mut W) -> io::Result<()> {
    writeln!(
        output,
        "\x1b[34m\n Welcome to StoichBalancer: balancing of chemical equations\n
    from compound names or SMILES strings \n \x1b[0m"
    )?;
    writeln!(output, "\x1b[33m1. Balance reaction by compound names (PubChem)\x1b[0m")?;
    writeln!(output, "\x1b[33m2. Balance reaction by SMILES\x1b[0m")?;
    writeln!(output, "\x1b[33m3. Show settings\x1b[0m")?;
    writeln!(output, "\x1b[33m0. Exit\x1b[0m")?;
    write!(output, "\x1b[36mEnter your choice: \x1b[0m")?;
    output.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run(script: &str) -> String {
        let manager = SettingsManager::with_config_file("no_such_balancer_config.json");
        let mut input = Cursor::new(script.to_string());
        let mut output = Vec::new();
        run_menu(&mut input, &mut output, &manager).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_exit_and_invalid_choice() {
        let text = run("7\n0\n");
        assert!(text.contains("Invalid choice. Please try again."));
        assert!(text.ends_with("Goodbye!\n"));
    }

    #[test]
    fn test_show_settings() {
        let text = run("3\n");
        assert!(text.contains("max_species_per_side"));
        assert!(text.contains("no_such_balancer_config.json"));
    }

    #[test]
    fn test_end_of_input_inside_a_session() {
        let text = run("2\n1\n");
        assert!(text.contains("Input ended, returning to the main menu."));
        assert!(text.ends_with("Goodbye!\n"));
    }
}
