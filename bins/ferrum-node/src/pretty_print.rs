//! Print displays for the node CLI.

use colored::Colorize;
use ferrum_chain::ChainConfig;

pub fn print_startup_banner(dev: bool) {
    let mode = if dev {
        "TRACE".yellow()
    } else {
        "NORMAL".bright_blue()
    };
    println!(
        "\n{}",
        "╔═════════════════════════════════════════════╗".bright_cyan()
    );
    println!(
        "{} {}  {}",
        "║".bright_cyan(),
        " FERRUM EXECUTION CORE ".bold(),
        "║".bright_cyan()
    );
    println!("{} {}      {}", "║".bright_cyan(), mode, "║".bright_cyan());
    println!(
        "{}",
        "╚═════════════════════════════════════════════╝".bright_cyan()
    );
    println!();
}

pub fn print_config(config: &ChainConfig) {
    println!("\n{}", "FERRUM NODE CONFIGURATION".bold());
    println!("-------------------------");
    println!("Minimum gas limit: {}", config.minimum_gas_limit);
    println!("Gas limit bound divisor: {}", config.gas_limit_bound_divisor);
    println!("Difficulty floor: {}", config.difficulty_floor);
    println!("Bomb delay: {} blocks", config.bomb_delay);
    println!("Bomb exponent divisor: {}", config.bomb_exponent_divisor);
    println!("-------------------------\n");
}
