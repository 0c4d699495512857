/// Cascade CSS processor CLI

use std::path::PathBuf;

use anyhow::{Context, Result};
use cascade_codegen::{ProcessOptions, Processor, DEFAULT_ROOT_VALUE};
use cascade_parser::ast_dump::dump_stylesheet;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "cascadec")]
#[command(about = "Cascade CSS processor - parses a stylesheet and writes it back, optionally minimized")]
#[command(version)]
struct Args {
    /// Input CSS file
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Write the generated CSS here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Drop comments and optional whitespace
    #[arg(long)]
    minimize: bool,

    /// Rewrite px lengths in declaration values to rem
    #[arg(long)]
    px2rem: bool,

    /// Pixels per rem used by --px2rem
    #[arg(long, value_name = "PX", default_value_t = DEFAULT_ROOT_VALUE)]
    root_value: u32,

    /// Recover from malformed CSS instead of failing
    #[arg(long)]
    ignore_errors: bool,

    /// Print the AST and exit (debug mode)
    #[arg(long)]
    dump_ast: bool,

    /// Print the AST as JSON and exit
    #[arg(long)]
    json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    // Build processor options
    let options = ProcessOptions::new(&args.input)
        .minimize(args.minimize)
        .px2rem(args.px2rem)
        .root_value(args.root_value)
        .ignore_errors(args.ignore_errors)
        .verbose(args.verbose);

    let processor = Processor::new(options);
    let output = processor
        .process()
        .with_context(|| format!("failed to process {}", args.input.display()))?;

    if args.json {
        let json = serde_json::to_string_pretty(&output.stylesheet.to_json())
            .context("failed to serialize AST")?;
        println!("{}", json);
        return Ok(());
    }

    if args.dump_ast {
        print!("{}", dump_stylesheet(&output.stylesheet));
        return Ok(());
    }

    match &args.output {
        Some(path) => {
            std::fs::write(path, &output.css)
                .with_context(|| format!("failed to write {}", path.display()))?;
            if args.verbose {
                eprintln!(
                    "Wrote {} bytes to {} ({} rules, {} declarations)",
                    output.css.len(),
                    path.display(),
                    output.stats.rules,
                    output.stats.declarations
                );
            }
        }
        None => print!("{}", output.css),
    }

    Ok(())
}
