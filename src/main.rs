//! practicelog main entrypoint.

use practicelog::ui::messages;
use practicelog::{init_logging, run};

fn main() {
    init_logging();
    if let Err(e) = run() {
        messages::error(format!("Error: {}", e));
        std::process::exit(1);
    }
}
