mod cli;

use colored::Colorize;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{} {}", "Error:".red(), e);
        // A corrupt credential file leaves nothing to retry
        std::process::exit(if e.is_fatal() { 2 } else { 1 });
    }
}
