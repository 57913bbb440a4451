//! Petaler headless runner.
//!
//! Activates a pet against a logging surface and pumps its worker events for
//! a while, so the animation, interaction and dialogue streams can be
//! watched in the log.
//!
//! # Running
//!
//! ```sh
//! RUST_LOG=debug cargo run -- --pet bugsy --routine greet --run-for 20
//! ```

use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use log::{error, info, warn};

use petaler::controller::PetController;
use petaler::resources::appconfig::AppConfig;
use petaler::surface::LogSurface;

const PUMP_INTERVAL: Duration = Duration::from_millis(20);

/// Petaler desktop pet runner
#[derive(Parser)]
#[command(version, about = "Runs a desktop pet headless and logs what it does.")]
struct Cli {
    /// INI configuration file.
    #[arg(long, value_name = "PATH", default_value = "./petaler.ini")]
    config: PathBuf,

    /// Pet to activate (defaults to the configured or first available pet).
    #[arg(long)]
    pet: Option<String>,

    /// Print the available pets and exit.
    #[arg(long)]
    list_pets: bool,

    /// Switch to this pet halfway through the run.
    #[arg(long, value_name = "PET")]
    switch_to: Option<String>,

    /// Play this action group as an interactive routine after activation.
    #[arg(long, value_name = "GROUP")]
    routine: Option<String>,

    /// Seconds to run before quitting.
    #[arg(long, value_name = "SECS", default_value_t = 30.0)]
    run_for: f64,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = AppConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        warn!("{}; using defaults", e);
    }

    if cli.list_pets {
        match config.available_pets() {
            Ok(pets) => {
                for pet in pets {
                    println!("{}", pet);
                }
            }
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    let pet = match cli.pet.clone().map(|p| Ok(Some(p))).unwrap_or_else(|| config.startup_pet()) {
        Ok(Some(pet)) => pet,
        Ok(None) => {
            eprintln!("Error: no pets found in {}", config.roles_dir.display());
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let run_for = match Duration::try_from_secs_f64(cli.run_for) {
        Ok(d) => d,
        Err(_) => {
            eprintln!("Error: --run-for must be a non-negative number of seconds");
            std::process::exit(1);
        }
    };

    let mut controller = PetController::new(config, LogSurface::new());
    if let Err(e) = controller.activate(&pet) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
    if let Some(group) = &cli.routine {
        controller.show_routine(group);
    }

    let start = Instant::now();
    let mut switch_to = cli.switch_to.clone();
    while start.elapsed() < run_for {
        controller.pump();

        let faults = controller.take_faults();
        if let Some(fault) = faults.first() {
            warn!("restarting pet after {} fault(s), first: {}", faults.len(), fault);
            if let Err(e) = controller.restart() {
                error!("restart failed: {}", e);
                std::process::exit(1);
            }
        }

        if start.elapsed() >= run_for / 2 {
            if let Some(next) = switch_to.take() {
                info!("switching to pet '{}'", next);
                if let Err(e) = controller.switch_to(&next) {
                    eprintln!("Error: {e}");
                    std::process::exit(1);
                }
            }
        }

        thread::sleep(PUMP_INTERVAL);
    }

    controller.quit();
    info!(
        "done after {:.1}s, {} repaints",
        start.elapsed().as_secs_f64(),
        controller.surface().repaints()
    );
}
