/* 3rd party libraries */
use clap::Parser;
use crossbeam_channel as cbc;
use log::{error, info};
use std::io::BufRead;
use std::path::PathBuf;
use std::thread::Builder;

/* Custom libraries */
use elevator_dispatch::config;
use elevator_dispatch::console::{self, Command};
use elevator_dispatch::unwrap_or_exit;
use elevator_dispatch::Simulation;

#[derive(Parser, Debug)]
#[clap(about = "Simulates dispatch of a bank of elevators")]
struct Args {
    /// Path to the configuration file
    #[clap(short, long, default_value = "config.toml")]
    config: PathBuf,
}

/* Main */
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    // Load the configuration
    let config = unwrap_or_exit!(config::load_config(&args.config));

    // Start the elevator units and the dispatcher
    let simulation = unwrap_or_exit!(Simulation::start(&config));

    // Read commands from stdin on a separate thread
    let (command_tx, command_rx) = cbc::unbounded::<String>();
    let stdin_thread = Builder::new().name("stdin".into());
    unwrap_or_exit!(stdin_thread.spawn(move || {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if command_tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    error!("Error reading from stdin: {}", e);
                    break;
                }
            }
        }
    }));

    info!("type 'cab <elevator> <floor>', 'hall <floor> <up|down>', 'fault <elevator>', 'status' or 'quit'");

    let render_interval = config.presentation.render_interval();
    let mut last_summary: Vec<String> = Vec::new();

    // Main loop
    loop {
        cbc::select! {
            recv(command_rx) -> line => {
                match line {
                    Ok(line) if line.trim().is_empty() => {}
                    Ok(line) => match line.parse::<Command>() {
                        Ok(Command::Quit) => break,
                        Ok(command) => console::execute(simulation.intake(), || simulation.snapshot(), command),
                        Err(e) => error!("{}", e),
                    },
                    // stdin closed
                    Err(_) => break,
                }
            }
            default(render_interval) => {
                let summary = console::summary(&simulation.snapshot());
                if summary != last_summary {
                    for line in summary.iter() {
                        info!("{}", line);
                    }
                    last_summary = summary;
                }
            }
        }
    }

    simulation.shutdown();
}
