//! Backend listing.

use anyhow::Result;
use hsb_compute::{Backend, select_best_backend};

/// Prints detected compute backends.
pub fn run(verbose: bool) -> Result<()> {
    print!("{}", hsb_compute::describe_backends());
    if verbose {
        let best = select_best_backend();
        println!("auto selects: {}", best.name());
        for backend in [Backend::Cpu, Backend::Wgpu] {
            println!(
                "  {:<5} {}",
                backend.name(),
                if backend.is_available() { "available" } else { "unavailable" }
            );
        }
    }
    Ok(())
}
