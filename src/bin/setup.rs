//! Interactive setup wizard entry point.

use std::io;
use tmw_apparel_form::setup::{run_setup, SetupPaths};

fn main() {
    println!("🚀 Te Mata Wānanga Apparel Form Setup");
    println!("=====================================\n");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut input = stdin.lock();
    let mut output = stdout.lock();

    // Setup faults exit non-zero so deploy scripts can tell them apart from a
    // completed run; validation failures are advisory and still exit 0.
    if let Err(e) = run_setup(&mut input, &mut output, &SetupPaths::default()) {
        eprintln!("\n❌ Setup failed: {e:#}");
        std::process::exit(1);
    }
}
