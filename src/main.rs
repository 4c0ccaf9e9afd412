use std::path::{Path, PathBuf};
use std::process::exit;

use clap::Parser;
use log::{info, warn};

use gdext_header::output::{signatures, to_json, write_artifact};
use gdext_header::{load_header, HeaderError, HeaderFile, PreprocessorConfig, SymbolValue};

const DEFAULT_HEADER: &str = "godot_headers/godot/gdextension_interface.h";

#[derive(Parser, Debug)]
#[command(name = "gdext-header")]
#[command(about = "Parse the GDExtension interface header into a typed AST", long_about = None)]
struct Cli {
    /// Project directory, or the header file itself
    project: PathBuf,

    /// Header location relative to the project directory
    #[arg(long, value_name = "REL", default_value = DEFAULT_HEADER)]
    header: PathBuf,

    /// Define a preprocessor symbol (NAME, NAME=0 or NAME=1)
    #[arg(short = 'D', long = "define", value_name = "NAME[=VALUE]", value_parser = parse_define, action = clap::ArgAction::Append)]
    defines: Vec<(String, SymbolValue)>,

    /// Undefine a preprocessor symbol, applied after every -D
    #[arg(short = 'U', long = "undefine", value_name = "NAME", action = clap::ArgAction::Append)]
    undefines: Vec<String>,

    /// Check syntax only
    #[arg(long)]
    check: bool,

    /// Print canonical C declarations to stdout
    #[arg(long)]
    signatures: bool,

    /// Write the AST as JSON
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// An existing file given as the project is taken as the header
    fn header_path(&self) -> PathBuf {
        if self.project.is_file() {
            self.project.clone()
        } else {
            self.project.join(&self.header)
        }
    }

    fn preprocessor_config(&self) -> PreprocessorConfig {
        let mut config = PreprocessorConfig::new();
        for (name, value) in &self.defines {
            config.define_value(name, *value);
        }
        for name in &self.undefines {
            config.undefine(name);
        }
        // Keep line numbers in errors pointing at the original header
        config.preserve_lines(true);
        config
    }
}

fn parse_define(flag: &str) -> Result<(String, SymbolValue), String> {
    let (name, value) = match flag.split_once('=') {
        Some((name, value)) => (name, SymbolValue::from_definition(value)),
        None => (flag, SymbolValue::True),
    };
    let valid = name.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(format!("invalid symbol name '{}'", name));
    }
    Ok((name.to_string(), value))
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(e) = run(&cli) {
        eprintln!("error: {}", e);
        exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), HeaderError> {
    let path = cli.header_path();
    info!("Processing: {}", path.display());

    let config = cli.preprocessor_config();
    let header = load_header(&path, &config)?;

    for duplicate in header.duplicate_functions() {
        warn!("dropping duplicate function typedef {}", duplicate.name);
    }

    if cli.check {
        println!("✓ {} - Syntax OK", path.display());
        return Ok(());
    }

    if cli.signatures {
        print!("{}", signatures(&header));
    }

    if let Some(output) = &cli.output {
        write_artifact(output, &to_json(&header)?)?;
        info!("→ {}", output.display());
    }

    if !cli.signatures && cli.output.is_none() {
        print_summary(&path, &header);
    }

    Ok(())
}

fn print_summary(path: &Path, header: &HeaderFile) {
    println!("{}", path.display());
    println!("  enums:     {}", header.collect_enums().len());
    println!("  aliases:   {}", header.collect_aliases().len());
    println!("  functions: {}", header.collect_functions().len());
    println!("  structs:   {}", header.collect_structs().len());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_define() {
        assert_eq!(parse_define("FOO").unwrap(), ("FOO".to_string(), SymbolValue::True));
        assert_eq!(parse_define("FOO=0").unwrap(), ("FOO".to_string(), SymbolValue::False));
        assert_eq!(parse_define("FOO=1").unwrap(), ("FOO".to_string(), SymbolValue::True));
        assert!(parse_define("1FOO").is_err());
        assert!(parse_define("=1").is_err());
    }

    #[test]
    fn test_cli_builds_config() {
        let cli = Cli::try_parse_from([
            "gdext-header",
            "project",
            "-D",
            "A",
            "-D",
            "B=0",
            "-D",
            "C",
            "-U",
            "C",
        ])
        .unwrap();

        let config = cli.preprocessor_config();
        assert_eq!(config.symbols.get("A"), SymbolValue::True);
        assert_eq!(config.symbols.get("B"), SymbolValue::False);
        assert!(!config.symbols.is_defined("C"));
        assert!(config.preserve_lines);
    }

    #[test]
    fn test_header_path_defaults_under_project() {
        let cli = Cli::try_parse_from(["gdext-header", "/nonexistent/project"]).unwrap();
        assert_eq!(
            cli.header_path(),
            Path::new("/nonexistent/project").join(DEFAULT_HEADER)
        );
    }
}
