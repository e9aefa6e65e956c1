//! CLI entry point for Go documentation lookup.

use clap::Parser;
use clap::error::ErrorKind;
use gdoc::io::{ExitCode, Request, USAGE, normalize_args};
use gdoc::{DocError, DocLookup, KindFilter, OutputFilter, Settings};
use std::path::PathBuf;

/// Find documentation for names
#[derive(Parser, Debug)]
#[command(
    name = "gdoc",
    version = env!("CARGO_PKG_VERSION"),
    about = "Find documentation for names",
    override_help = USAGE
)]
struct Cli {
    /// Show doc for consts only
    #[arg(short = 'c', long = "const")]
    constant: bool,

    /// Show doc for funcs only
    #[arg(short = 'f', long = "func")]
    function: bool,

    /// Show doc for interfaces only
    #[arg(short = 'i', long)]
    interface: bool,

    /// Show doc for methods only
    #[arg(short = 'm', long)]
    method: bool,

    /// Show top-level package doc only
    #[arg(long = "package", alias = "pkg")]
    package: bool,

    /// Show doc for structs only
    #[arg(short = 's', long = "struct")]
    structure: bool,

    /// Show doc for types only
    #[arg(short = 't', long = "type")]
    type_decl: bool,

    /// Show doc for vars only
    #[arg(short = 'v', long = "var")]
    variable: bool,

    /// Restrict output to documentation only
    #[arg(long)]
    doc: bool,

    /// Restrict output to source file only
    #[arg(long)]
    src: bool,

    /// Restrict output to godoc URL only
    #[arg(long)]
    url: bool,

    /// Single argument is a regular expression for a name
    #[arg(short = 'r')]
    regex: bool,

    /// Path to custom settings.toml file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// `name`, `pkg.name`, `pkg name` or, with -package, `pkg`
    args: Vec<String>,
}

impl Cli {
    fn kinds(&self) -> KindFilter {
        let mut kinds = KindFilter::empty();
        kinds.set(KindFilter::CONST, self.constant);
        kinds.set(KindFilter::FUNC, self.function);
        kinds.set(KindFilter::INTERFACE, self.interface);
        kinds.set(KindFilter::METHOD, self.method);
        kinds.set(KindFilter::PACKAGE, self.package);
        kinds.set(KindFilter::STRUCT, self.structure);
        kinds.set(KindFilter::TYPE, self.type_decl);
        kinds.set(KindFilter::VAR, self.variable);
        kinds
    }

    fn outputs(&self) -> OutputFilter {
        let mut outputs = OutputFilter::empty();
        outputs.set(OutputFilter::DOC, self.doc);
        outputs.set(OutputFilter::SOURCE, self.src);
        outputs.set(OutputFilter::URL, self.url);
        outputs
    }
}

fn main() {
    let code = match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("gdoc: {e:#}");
            ExitCode::GeneralError
        }
    };
    std::process::exit(code.into());
}

fn run() -> anyhow::Result<ExitCode> {
    let cli = match Cli::try_parse_from(normalize_args(std::env::args())) {
        Ok(cli) => cli,
        Err(e) if e.kind() == ErrorKind::DisplayVersion => {
            print!("{e}");
            return Ok(ExitCode::Success);
        }
        Err(e) => {
            if let Some(reason) = e.kind().as_str() {
                eprintln!("gdoc: {reason}");
            }
            eprint!("{USAGE}");
            return Ok(ExitCode::UsageError);
        }
    };

    let settings = match &cli.config {
        Some(path) => match Settings::load_from(path) {
            Ok(settings) => settings,
            Err(e) => {
                return Ok(report(&DocError::Config {
                    reason: format!("{}: {e}", path.display()),
                }));
            }
        },
        None => Settings::load().unwrap_or_else(|e| {
            eprintln!("Configuration error: {e}");
            Settings::default()
                .with_go_env(std::env::var_os("GOROOT"), std::env::var_os("GOPATH"))
        }),
    };
    init_tracing(settings.debug)?;

    let query = match Request::from_args(&cli.args, cli.package, cli.regex)
        .and_then(|request| request.into_query(cli.kinds(), cli.outputs(), settings.export_rule))
    {
        Ok(query) => query,
        Err(e) => return Ok(report(&e)),
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match DocLookup::new(&query, &settings).run(&mut out) {
        Ok(_) => Ok(ExitCode::Success),
        Err(e) => Ok(report(&e)),
    }
}

fn report(error: &DocError) -> ExitCode {
    eprintln!("gdoc: {error}");
    if error.shows_usage() {
        eprint!("{USAGE}");
    }
    ExitCode::from_error(error)
}

/// Logs go to stderr; `GDOC_LOG` overrides the level.
fn init_tracing(debug: bool) -> anyhow::Result<()> {
    let level = if debug { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_env("GDOC_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))
}
