//! pincheck operator binary.
//!
//! Drives the conformance harness against the in-memory backend
//! simulator: list the case catalogue, set test parameters, dispatch
//! cases and print the run report. Each invocation is one fresh run.

use clap::{Parser, Subcommand};
use pincheck_backend::SimBackend;
use pincheck_control::Control;
use pincheck_harness::Harness;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "pincheck", about = "Pinmux/GPIO conformance harness", version)]
struct Cli {
    /// Let the simulated backend accept double claims, so the
    /// exclusivity cases can be observed failing.
    #[arg(long, global = true)]
    permissive_backend: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the case catalogue with stable ids.
    List,
    /// List the control-surface attribute names.
    Attrs,
    /// Read one attribute.
    Get { attr: String },
    /// Write one attribute (writing `exec` dispatches a case).
    Set { attr: String, value: String },
    /// Dispatch one or more cases and print the report.
    Run {
        /// Case ids to dispatch, in order.
        cases: Vec<usize>,

        /// Line index under test.
        #[arg(long, default_value_t = 0)]
        gpio_index: u32,
        /// Function code for the mux round-trip.
        #[arg(long, default_value_t = 1)]
        funcs: u32,
        /// Data bit (0 or 1).
        #[arg(long, default_value_t = 1)]
        dat: u32,
        /// Drive strength level.
        #[arg(long, default_value_t = 1)]
        dlevel: u32,
        /// Pull mode.
        #[arg(long, default_value_t = 1)]
        pul: u32,
        /// Interrupt trigger selector.
        #[arg(long, default_value_t = 0)]
        trigger: u32,
        /// Target device name for handle-level cases.
        #[arg(long, default_value = "card0_boot_para")]
        dev_name: String,

        /// Emit the report as JSON instead of the table.
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let backend = if cli.permissive_backend {
        SimBackend::new().permit_double_claim()
    } else {
        SimBackend::new()
    };
    let mut control = Control::new(Harness::new(Arc::new(backend)));

    match cli.command {
        Command::List => {
            for (id, case) in control.harness().registry().iter() {
                println!("{:2}  {}", id.index(), case.name());
            }
            ExitCode::SUCCESS
        }
        Command::Attrs => {
            for name in Control::attribute_names() {
                println!("{}", name);
            }
            ExitCode::SUCCESS
        }
        Command::Get { attr } => match control.read(&attr) {
            Ok(value) => {
                println!("{}", value);
                ExitCode::SUCCESS
            }
            Err(err) => {
                eprintln!("error: {}", err);
                ExitCode::FAILURE
            }
        },
        Command::Set { attr, value } => match control.write(&attr, &value) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("error: {}", err);
                ExitCode::FAILURE
            }
        },
        Command::Run {
            cases,
            gpio_index,
            funcs,
            dat,
            dlevel,
            pul,
            trigger,
            dev_name,
            json,
        } => {
            let params = [
                ("gpio_index", gpio_index.to_string()),
                ("funcs", funcs.to_string()),
                ("dat", dat.to_string()),
                ("dlevel", dlevel.to_string()),
                ("pul", pul.to_string()),
                ("trigger", trigger.to_string()),
                ("dev_name", dev_name),
            ];
            for (attr, value) in params {
                if let Err(err) = control.write(attr, &value) {
                    eprintln!("error: {}: {}", attr, err);
                    return ExitCode::FAILURE;
                }
            }

            let ids: Vec<usize> = if cases.is_empty() {
                (0..control.harness().registry().len()).collect()
            } else {
                cases
            };

            let mut any_rejected = false;
            for id in ids {
                match control.harness_mut().dispatch(id) {
                    Ok(outcome) => println!("case {:2}: {}", id, outcome),
                    Err(err) => {
                        any_rejected = true;
                        eprintln!("case {:2}: {}", id, err);
                    }
                }
            }

            let report = control.harness().report();
            if json {
                match serde_json::to_string_pretty(&report) {
                    Ok(text) => println!("{}", text),
                    Err(err) => {
                        eprintln!("error: {}", err);
                        return ExitCode::FAILURE;
                    }
                }
            } else {
                print!("{}", report);
            }

            if report.summary.failed == 0 && !any_rejected {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
    }
}
