use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use std::process::{Command, Stdio};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "x")]
#[command(about = "Development automation for saturn-rs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all CI checks (fmt, clippy, build, test)
    Ci {
        #[arg(long)]
        verbose: bool,
    },
    /// Quick checks before commit (fmt, clippy)
    Check {
        #[arg(long)]
        verbose: bool,
    },
    /// Format code
    Fmt {
        #[arg(long)]
        check: bool,
    },
    /// Run clippy
    Clippy {
        #[arg(long)]
        fix: bool,
    },
    /// Build the project
    Build {
        #[arg(long)]
        release: bool,
    },
    /// Run tests
    Test {
        #[arg(long)]
        doc: bool,
        /// Run only SH-2 module tests
        #[arg(long)]
        sh2: bool,
        /// Run only VDP2 module tests
        #[arg(long)]
        vdp2: bool,
        /// Run only compositor tests
        #[arg(long)]
        compositor: bool,
        /// Run with the strict VRAM timing table enabled
        #[arg(long)]
        strict_timings: bool,
    },
    /// Run benchmarks
    Bench,
    /// Run the headless emulator for a number of frames
    Headless {
        /// Number of frames to run
        #[arg(short = 'n', long, default_value = "600")]
        frames: u64,
        /// Build in release mode
        #[arg(long)]
        release: bool,
    },
    /// Pre-commit hook (fmt, clippy, test)
    PreCommit,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ci { verbose } => {
            run_step("fmt", &["fmt", "--all", "--", "--check"], verbose)?;
            run_step(
                "clippy",
                &["clippy", "--all-targets", "--", "-D", "warnings"],
                verbose,
            )?;
            run_step("build", &["build", "--all-targets"], verbose)?;
            run_step("test", &["test"], verbose)?;
            println!("{}", "CI checks passed".green().bold());
        }
        Commands::Check { verbose } => {
            run_step("fmt", &["fmt", "--all", "--", "--check"], verbose)?;
            run_step(
                "clippy",
                &["clippy", "--all-targets", "--", "-D", "warnings"],
                verbose,
            )?;
            println!("{}", "Checks passed".green().bold());
        }
        Commands::Fmt { check } => {
            if check {
                run_step("fmt", &["fmt", "--all", "--", "--check"], true)?;
            } else {
                run_step("fmt", &["fmt", "--all"], true)?;
            }
        }
        Commands::Clippy { fix } => {
            if fix {
                run_step("clippy", &["clippy", "--fix", "--allow-dirty"], true)?;
            } else {
                run_step(
                    "clippy",
                    &["clippy", "--all-targets", "--", "-D", "warnings"],
                    true,
                )?;
            }
        }
        Commands::Build { release } => {
            if release {
                run_step("build", &["build", "--release"], true)?;
            } else {
                run_step("build", &["build"], true)?;
            }
        }
        Commands::Test {
            doc,
            sh2,
            vdp2,
            compositor,
            strict_timings,
        } => {
            let mut args: Vec<&str> = vec!["test"];
            if strict_timings {
                args.extend(["--features", "strict-vram-timings"]);
            }
            if sh2 {
                args.push("sh2");
            } else if vdp2 {
                args.push("vdp2");
            } else if compositor {
                args.push("compositor");
            }
            if doc {
                args.push("--doc");
            }
            run_step("test", &args, true)?;
        }
        Commands::Bench => {
            run_step("bench", &["bench"], true)?;
        }
        Commands::Headless { frames, release } => {
            let frames_arg = format!("SATURN_RS_FRAMES={}", frames);
            println!("{} ({})", "Running headless".cyan().bold(), frames_arg);
            let mut args: Vec<&str> = vec!["run", "--bin", "saturn-rs"];
            if release {
                args.insert(1, "--release");
            }
            run_step("headless", &args, true)?;
        }
        Commands::PreCommit => {
            run_step("fmt", &["fmt", "--all", "--", "--check"], false)?;
            run_step(
                "clippy",
                &["clippy", "--all-targets", "--", "-D", "warnings"],
                false,
            )?;
            run_step("test", &["test"], false)?;
            println!("{}", "Pre-commit checks passed".green().bold());
        }
    }

    Ok(())
}

fn run_step(name: &str, args: &[&str], verbose: bool) -> Result<()> {
    println!("{} cargo {}", "Running".cyan().bold(), args.join(" "));
    let start = Instant::now();

    let mut command = Command::new("cargo");
    command.args(args);
    if !verbose {
        command.stdout(Stdio::null());
    }

    let status = command.status()?;
    let elapsed = start.elapsed();

    if status.success() {
        println!("{} {} ({:.1?})", "ok".green().bold(), name, elapsed);
        Ok(())
    } else {
        println!("{} {} ({:.1?})", "FAILED".red().bold(), name, elapsed);
        anyhow::bail!("step '{}' failed", name)
    }
}
