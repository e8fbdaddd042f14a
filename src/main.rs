use StoichBalancer::cli::cli_main::run_interactive_menu;
use StoichBalancer::settings::SettingsManager;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

pub fn main() {
    let level = SettingsManager::new().get_settings().level_filter();
    // stderr keeps the log apart from the prompts on stdout
    let config = ConfigBuilder::new()
        .add_filter_allow_str("StoichBalancer")
        .build();
    if let Err(e) = TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto) {
        eprintln!("logger not installed: {}", e);
    }
    if let Err(e) = run_interactive_menu() {
        eprintln!("I/O error: {}", e);
        std::process::exit(1);
    }
}
