//! archimate-label CLI
//!
//! Usage:
//!   archimate-label [OPTIONS] [TEMPLATE]
//!
//! Options:
//!   -c, --config <FILE>  Render configuration (TOML format)
//!   -o, --object <ID>    Sample-model object to render against
//!   --check              Report template problems instead of rendering
//!   -g, --grammar        Show template grammar reference
//!   -l, --list           List the objects of the sample model
//!   -v, --verbose        Raise the log level (repeat for more)
//!   -h, --help           Print help

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use thiserror::Error;

use archimate_label::sample::sample_model;
use archimate_label::{check, ConfigError, Model, ModelError, RenderConfig, Renderer};

#[derive(Parser)]
#[command(name = "archimate-label")]
#[command(about = "Render ArchiMate label templates against a sample model")]
struct Cli {
    /// Template text (reads from stdin if not provided)
    template: Option<String>,

    /// Render configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Identifier of the sample-model object to render against
    #[arg(short, long, default_value = "customer")]
    object: String,

    /// Report template problems instead of rendering
    #[arg(long)]
    check: bool,

    /// Show template grammar reference
    #[arg(short, long)]
    grammar: bool,

    /// List the objects of the sample model
    #[arg(short, long)]
    list: bool,

    /// Raise the log level (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("Error loading config '{path}': {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },
    #[error("Error reading template from stdin: {0}")]
    Stdin(#[from] io::Error),
    #[error("Error building sample model: {0}")]
    Model(#[from] ModelError),
    #[error("No object with id '{0}' in the sample model (see --list)")]
    UnknownObject(String),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, CliError> {
    if cli.grammar {
        print_grammar();
        return Ok(ExitCode::SUCCESS);
    }

    let config = match &cli.config {
        Some(path) => RenderConfig::from_file(path).map_err(|source| CliError::Config {
            path: path.clone(),
            source,
        })?,
        None => RenderConfig::default(),
    };
    let model = sample_model()?;
    let renderer = Renderer::with_config(config);

    if cli.list {
        for line in listing(&model, &renderer) {
            println!("{}", line);
        }
        return Ok(ExitCode::SUCCESS);
    }

    // If no template and stdin is a terminal (interactive), show intro help
    if cli.template.is_none() && io::stdin().is_terminal() {
        print_intro();
        return Ok(ExitCode::SUCCESS);
    }

    let template = match cli.template {
        Some(text) => text,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer.trim_end_matches(['\n', '\r']).to_string()
        }
    };

    let warnings = check(&template);
    if cli.check {
        for warning in &warnings {
            eprintln!("{}", warning.format(&template, "template"));
        }
        return Ok(if warnings.is_empty() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }
    for warning in &warnings {
        log::warn!("{}", warning);
    }

    let label = renderer
        .render_id(&model, &cli.object, &template)
        .ok_or_else(|| CliError::UnknownObject(cli.object.clone()))?;
    println!("{}", label);
    Ok(ExitCode::SUCCESS)
}

/// One line per object in traversal order: the identifier `--object`
/// accepts, then type and name
fn listing(model: &Model, renderer: &Renderer) -> Vec<String> {
    model
        .walk()
        .into_iter()
        .filter_map(|key| {
            let id = model.get(key)?.id();
            Some(format!("{}\t{}", id, renderer.render(model, key, "${type}\t${name}")))
        })
        .collect()
}

fn print_intro() {
    println!(
        r#"archimate-label - Render ArchiMate label templates

USAGE:
    archimate-label [OPTIONS] [TEMPLATE]
    echo '<template>' | archimate-label

OPTIONS:
    -o, --object <ID>  Object to render against (default: customer)
    --check            Report template problems
    -g, --grammar      Show template grammar reference
    -l, --list         List sample-model objects
    -c, --config       Render configuration (TOML file)
    -v, --verbose      More logging
    -h, --help         Print help

QUICK START:
    archimate-label -o assignment '$source{{name}} -> $target{{name}}'

This prints "Customer -> Client".
Run --grammar for syntax reference or --list for objects to try."#
    );
}

fn print_grammar() {
    println!(
        r#"LABEL TEMPLATE GRAMMAR
======================

DIRECTIVES
----------
Text is copied as is. A directive is replaced by an attribute of the
current object or of an object reached from it:

    $prefix{{attribute}}

A '$' that does not start a well-formed directive is kept as text.

PREFIXES
--------
(none)              The current object
source, target      Ends of a relationship or connection
parent              Container of a diagram object
mfolder             Folder holding the underlying concept
vfolder             Folder holding the enclosing view
view                The enclosing view
model               The model
<rel>:source        Source of the first <rel> relationship of the concept
<rel>:target        Target of the first <rel> relationship of the concept

Prefixes are case-insensitive. <rel> is one of:
    composition, aggregation, assignment, realization, serving, access,
    influence, triggering, flow, specialization, association

ATTRIBUTES
----------
type                Type label ("Business Actor", "Assignment relation", ...)
name                Name
documentation       Documentation text
id                  Identifier of the object itself (an element object
                    has its own, separate from its concept's)
content             Text of a note
property:KEY        Value of property KEY

Anything that cannot be resolved renders as empty text.

EXAMPLES
--------
[${{type}}] ${{name}}
$source{{name}} -> $target{{name}}
Played by $assignment:source{{name}} ($mfolder{{name}})"#
    );
}
