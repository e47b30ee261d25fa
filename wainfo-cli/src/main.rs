use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand};
use patharg::{InputArg, OutputArg};
use regex::Regex;
use std::io::{self, Read, Write};
use std::process::exit;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use wainfo::diff::{DiffOptions, FunctionStatus, diff_modules};
use wainfo::embed::{Image, embed};
use wainfo::rewrite::{DEFAULT_ZERO_RUN, RewriteOptions, SegmentMode, rewrite_data_section};
use wainfo::{Config, Disassembler, FunctionFilter, Module, decode_module_with};

#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Increase diagnostic output; repeat for more. RUST_LOG overrides it.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Print a summary of a module, and optionally its functions.
    Info {
        /// The module to inspect. If not provided or is '-', read from
        /// standard input.
        #[arg(default_value_t)]
        input: InputArg,

        /// Disassemble the selected functions.
        #[arg(short, long)]
        disassemble: bool,

        /// List types, imports, exports, globals and segments.
        #[arg(long)]
        details: bool,

        #[command(flatten)]
        filter: FilterArgs,

        /// Prefix disassembled instructions with their offset.
        #[arg(short, long)]
        offsets: bool,

        /// Count the selected functions that call the function NAME.
        #[arg(long, value_name = "NAME")]
        calls: Option<String>,
    },

    /// Compare two modules. Exits with 1 when they differ and 2 on errors.
    Diff {
        left: InputArg,
        right: InputArg,

        /// Compare the disassembly of the selected functions too.
        #[arg(short, long)]
        disassemble: bool,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Replace the Data section of a module with the contents of a file.
    Edit {
        input: InputArg,
        output: OutputArg,

        /// File holding the new contents of the memory.
        #[arg(long, value_name = "FILE")]
        data_section: InputArg,

        /// Memory offset of the first byte of the file.
        #[arg(long, default_value_t = 0)]
        data_offset: i32,

        /// Split the contents at runs of zero bytes.
        #[arg(long)]
        auto_split: bool,

        /// Emit passive segments instead of active ones.
        #[arg(long)]
        passive: bool,

        /// Shortest run of zero bytes that splits the contents.
        #[arg(long, default_value_t = DEFAULT_ZERO_RUN)]
        zero_run: usize,
    },

    /// Embed a payload into a template module.
    Embed {
        template: InputArg,
        payload: InputArg,
        output: OutputArg,

        /// Path recorded for the payload. Defaults to its file name.
        #[arg(long)]
        path: Option<String>,
    },
}

#[derive(clap::Args)]
struct FilterArgs {
    /// Select functions whose name matches REGEX.
    #[arg(short = 'f', long, value_name = "REGEX")]
    function_filter: Option<Regex>,

    /// Select the function whose body contains OFFSET, decimal or 0x hex.
    #[arg(long, value_name = "OFFSET", value_parser = parse_offset)]
    function_offset: Option<u64>,
}

impl FilterArgs {
    fn filter(&self) -> FunctionFilter {
        FunctionFilter {
            name: self.function_filter.clone(),
            offset: self.function_offset,
        }
    }
}

fn parse_offset(s: &str) -> Result<u64, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid offset `{s}`: {e}"))
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(code) => exit(code),
        Err(err) => abort(err),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<i32> {
    match &cli.command {
        Command::Info {
            input,
            disassemble,
            details,
            filter,
            offsets,
            calls,
        } => {
            let config = Config {
                verbosity: cli.verbose,
                read_code: *disassemble || calls.is_some() || filter.filter().offset.is_some(),
            };
            let module = read_module(input, &config)?;
            info(&module, input, *disassemble, *details, &filter.filter(), *offsets, calls.as_deref())?;
            Ok(0)
        }
        Command::Diff {
            left,
            right,
            disassemble,
            filter,
        } => {
            let config = Config {
                verbosity: cli.verbose,
                read_code: *disassemble,
            };
            let left_module = read_module(left, &config)?;
            let right_module = read_module(right, &config)?;
            let options = DiffOptions {
                functions: *disassemble,
                filter: filter.filter(),
            };

            let report = diff_modules(&left_module, &right_module, &options)
                .context("failed comparing modules")?;
            for difference in &report.differences {
                println!("{difference}");
            }
            for function in &report.functions {
                match function.status {
                    FunctionStatus::Equal => {}
                    FunctionStatus::Different => println!("function {} differs", function.name),
                    FunctionStatus::OnlyInLeft => println!("function {} only in {left}", function.name),
                    FunctionStatus::OnlyInRight => println!("function {} only in {right}", function.name),
                }
            }
            if report.is_equal() {
                println!("modules are equal");
            }
            Ok(report.exit_code())
        }
        Command::Edit {
            input,
            output,
            data_section,
            data_offset,
            auto_split,
            passive,
            zero_run,
        } => {
            let module = read_module(input, &Config::default())?;
            let blob = read_all(data_section)?;
            let options = RewriteOptions {
                auto_split: *auto_split,
                base_offset: *data_offset,
                mode: if *passive {
                    SegmentMode::Passive
                } else {
                    SegmentMode::Active
                },
                zero_run: *zero_run,
            };

            let out = output
                .create()
                .with_context(|| format!("failed to create `{output}`"))?;
            let mut out = rewrite_data_section(&module, &blob, &options, out)
                .with_context(|| format!("failed rewriting the Data section of `{input}`"))?;
            out.flush()?;
            Ok(0)
        }
        Command::Embed {
            template,
            payload,
            output,
            path,
        } => {
            let module = read_module(template, &Config::default())?;
            let content = read_all(payload)?;
            let path = match (path, payload) {
                (Some(path), _) => path.clone(),
                (None, InputArg::Path(p)) => p
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .context("payload path has no file name")?,
                (None, InputArg::Stdin) => bail!("--path is required when the payload is read from standard input"),
            };

            let out = output
                .create()
                .with_context(|| format!("failed to create `{output}`"))?;
            let image = Image {
                path: &path,
                content: &content,
            };
            let mut out = embed(&module, image, out)
                .with_context(|| format!("failed embedding `{payload}` into `{template}`"))?;
            out.flush()?;
            Ok(0)
        }
    }
}

fn read_all(input: &InputArg) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    input
        .open()
        .and_then(|mut r| r.read_to_end(&mut bytes))
        .with_context(|| format!("failed to read `{input}`"))?;
    Ok(bytes)
}

fn read_module(input: &InputArg, config: &Config) -> Result<Module> {
    let reader = input
        .open()
        .with_context(|| format!("failed to open `{input}`"))?;
    let module = decode_module_with(reader, config)
        .with_context(|| format!("failed to decode module `{input}`"))?;
    for warning in &module.warnings {
        eprintln!("warning: {warning}");
    }
    Ok(module)
}

fn info(
    module: &Module,
    input: &InputArg,
    disassemble: bool,
    details: bool,
    filter: &FunctionFilter,
    offsets: bool,
    calls: Option<&str>,
) -> Result<()> {
    let disasm = Disassembler::new(module).with_offsets(offsets);
    print!("{}", disasm.summary(&input.to_string())?);

    if details {
        print!("{}", disasm.details()?);
    }

    let selected = module.filter_functions(filter);

    if disassemble {
        for &idx in &selected {
            println!("{}", disasm.function(idx)?);
        }
    }

    if let Some(callee) = calls {
        let Some(&callee_idx) = module.names.function_indices.get(callee) else {
            bail!("no function named `{callee}`; the module needs a name section");
        };

        let mut count = 0;
        for &idx in &selected {
            let sites = module.function_calls(idx, callee_idx)?;
            if !sites.is_empty() {
                count += 1;
                tracing::info!(
                    function = %module.function_name(idx),
                    calls = sites.len(),
                    size = module.codes[idx as usize].size,
                    "calls {callee}"
                );
            }
        }
        let percent = if selected.is_empty() {
            0.0
        } else {
            100.0 * f64::from(count) / selected.len() as f64
        };
        println!(
            "{count} function(s) call {callee}, {percent:.2}% of {} functions",
            selected.len()
        );
    }

    Ok(())
}

/// Exit status of any error, distinct from the 0 and 1 of `diff`.
const EXIT_ERROR: i32 = 2;

fn abort(err: anyhow::Error) -> ! {
    eprintln!("ERROR: {err}");

    let causes: Vec<_> = err.chain().skip(1).collect();
    if !causes.is_empty() {
        eprintln!("\nCaused by:");
        for (i, cause) in causes.iter().enumerate() {
            eprintln!("    {i}: {cause}");
        }
    }

    exit(EXIT_ERROR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wainfo::diff::{DiffReport, FunctionDiff};

    #[test]
    fn error_exit_code_differs_from_diff_results() {
        let equal = DiffReport::default();
        let different = DiffReport {
            differences: Vec::new(),
            functions: vec![FunctionDiff {
                name: "f".to_string(),
                status: FunctionStatus::Different,
            }],
        };

        assert_eq!(equal.exit_code(), 0);
        assert_eq!(different.exit_code(), 1);
        assert_ne!(EXIT_ERROR, equal.exit_code());
        assert_ne!(EXIT_ERROR, different.exit_code());
    }
}
