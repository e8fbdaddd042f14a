/// Main menu of the interactive program
pub mod cli_main;
/// Prompts of a balancing session: species counts, structures by name or
/// SMILES, the balanced equation, tables and the reaction diagram.
pub mod cli_balance;
