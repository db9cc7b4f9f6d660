//! `tripdeck`: open an itinerary file in the terminal editor and write the result back out.

use std::fmt::Write as FmtWrite;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::{ArgAction, Parser};
use color_eyre::eyre::{Report, Result, WrapErr, eyre};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use tripdeck::{
    DocumentFormat, ItineraryDocument, OutputDestination, OutputOptions, Tripdeck, UiOptions,
    check_date_format, emit, io::document_schema, parse_itinerary,
};

const LOG_ENV: &str = "TRIPDECK_LOG";

#[derive(Debug, Parser)]
#[command(
    name = "tripdeck",
    version,
    about = "Edit a trip itinerary as cards in the terminal"
)]
struct Cli {
    /// Itinerary file, or "-" for stdin. The demo trip opens when omitted
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    input: Option<String>,

    /// Output destinations ("-" writes to stdout). Accepts multiple values per flag use.
    #[arg(short = 'o', long = "output", value_name = "DEST", num_args = 1.., action = ArgAction::Append)]
    outputs: Vec<String>,

    /// Title shown at the top of the UI
    #[arg(long = "title", value_name = "TEXT")]
    title: Option<String>,

    /// chrono format string for the date inputs
    #[arg(long = "date-format", value_name = "FMT")]
    date_format: Option<String>,

    /// Hide the key help in the footer
    #[arg(long = "no-help")]
    no_help: bool,

    /// Validate the input and write it to the outputs without opening the editor
    #[arg(long = "check")]
    check: bool,

    /// Print the JSON Schema of itinerary documents and exit
    #[arg(long = "print-schema", conflicts_with_all = ["input", "check"])]
    print_schema: bool,

    /// Emit compact JSON/TOML rather than pretty formatting
    #[arg(long = "no-pretty")]
    no_pretty: bool,

    /// Overwrite output files even if they already exist
    #[arg(short = 'f', long = "force", short_alias = 'y', alias = "yes")]
    force: bool,

    /// Write logs to this file (filter with TRIPDECK_LOG, default "info")
    #[arg(long = "log-file", value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    if let Some(path) = cli.log_file.as_deref() {
        init_logging(path)?;
    }

    if cli.print_schema {
        let schema = document_schema()?;
        let rendered = if cli.no_pretty {
            serde_json::to_string(&schema)?
        } else {
            serde_json::to_string_pretty(&schema)?
        };
        println!("{rendered}");
        return Ok(());
    }

    let mut diagnostics = DiagnosticCollector::default();

    let input_format = resolve_input_format(cli.input.as_deref(), &mut diagnostics);
    let document = match input_format {
        Some(format) => load_input(cli.input.as_deref(), format, &mut diagnostics),
        None => None,
    };

    let (output_settings, output_paths) =
        build_output_options(&cli, input_format.flatten(), &mut diagnostics);
    ensure_output_paths_available(&output_paths, cli.force, &mut diagnostics);
    if let Some(format) = cli.date_format.as_deref()
        && let Err(err) = check_date_format(format)
    {
        diagnostics.push_option(err.to_string());
    }

    diagnostics.into_result()?;

    let document = document.unwrap_or_else(ItineraryDocument::demo);
    info!(points = document.points.len(), check = cli.check, "itinerary loaded");

    let document = if cli.check {
        document
    } else {
        run_editor(&cli, document)?
    };

    emit(&document, &output_settings).map_err(Report::msg)?;
    Ok(())
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|err| eyre!("failed to install logger: {err}"))?;
    Ok(())
}

fn run_editor(cli: &Cli, document: ItineraryDocument) -> Result<ItineraryDocument> {
    let catalog = document.catalog.clone();
    let mut options = UiOptions::default().with_help(!cli.no_help);
    if let Some(format) = cli.date_format.as_ref() {
        options = options.with_date_format(format.clone());
    }
    options.validate()?;

    let mut deck = Tripdeck::from_document(document).with_options(options);
    if let Some(title) = cli.title.as_ref() {
        deck = deck.with_title(title.clone());
    }

    let points = deck.run().map_err(Report::msg)?;
    let mut edited = ItineraryDocument::new(points);
    edited.catalog = catalog;
    Ok(edited)
}

/// `None` means the input is unusable; `Some(None)` means no extension hint.
fn resolve_input_format(
    input: Option<&str>,
    diagnostics: &mut DiagnosticCollector,
) -> Option<Option<DocumentFormat>> {
    let Some(spec) = input else {
        return Some(None);
    };
    if spec == "-" {
        return Some(None);
    }
    match format_from_extension(Path::new(spec)) {
        ExtensionFormat::Known(format) => Some(Some(format)),
        ExtensionFormat::UnsupportedFeature {
            format_name,
            feature_flag,
        } => {
            diagnostics.push_input(format!(
                "'{spec}' requires {format_name} support, but this build lacks the '{feature_flag}' feature"
            ));
            None
        }
        ExtensionFormat::Unknown => Some(None),
    }
}

fn load_input(
    input: Option<&str>,
    hint: Option<DocumentFormat>,
    diagnostics: &mut DiagnosticCollector,
) -> Option<ItineraryDocument> {
    let spec = input?;
    let contents = match read_input(spec) {
        Ok(contents) => contents,
        Err(err) => {
            diagnostics.push_input(format!("{err:#}"));
            return None;
        }
    };
    match parse_contents(&contents, hint) {
        Ok(document) => Some(document),
        Err(err) => {
            diagnostics.push_input(format!("{err:#}"));
            None
        }
    }
}

fn read_input(spec: &str) -> Result<String> {
    if spec == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .wrap_err("failed to read from stdin")?;
        return Ok(buffer);
    }
    fs::read_to_string(spec).wrap_err_with(|| format!("failed to read file {spec}"))
}

/// A known extension decides the format; otherwise every available format is tried in turn.
fn parse_contents(contents: &str, hint: Option<DocumentFormat>) -> Result<ItineraryDocument> {
    if let Some(format) = hint {
        return parse_itinerary(contents, format).map_err(|err| eyre!("{err:#}"));
    }
    let mut first_error = None;
    for candidate in DocumentFormat::available_formats() {
        match parse_itinerary(contents, candidate) {
            Ok(document) => {
                debug!(format = %candidate, "input format detected");
                return Ok(document);
            }
            Err(err) => {
                first_error.get_or_insert(err);
            }
        }
    }
    let primary = first_error.map(|err| format!("{err:#}")).unwrap_or_default();
    Err(eyre!(
        "failed to parse input: tried {} (first error: {primary})",
        format_list()
    ))
}

fn format_list() -> String {
    let items: Vec<String> = DocumentFormat::available_formats()
        .into_iter()
        .map(|fmt| fmt.to_string())
        .collect();
    items.join(", ")
}

#[derive(Default)]
struct DiagnosticCollector {
    messages: Vec<String>,
}

impl DiagnosticCollector {
    fn push_input(&mut self, message: impl Into<String>) {
        self.messages.push(format!("input: {}", message.into()));
    }

    fn push_output(&mut self, message: impl Into<String>) {
        self.messages.push(format!("output: {}", message.into()));
    }

    fn push_option(&mut self, message: impl Into<String>) {
        self.messages.push(format!("option: {}", message.into()));
    }

    fn into_result(self) -> Result<()> {
        if self.messages.is_empty() {
            return Ok(());
        }
        let mut body = String::from("encountered input/output issues:\n");
        for (idx, msg) in self.messages.iter().enumerate() {
            let _ = writeln!(body, "  {}. {}", idx + 1, msg);
        }
        Err(eyre!(body))
    }
}

/// Without `-o` the result goes to stdout in the input's format.
fn build_output_options(
    cli: &Cli,
    input_hint: Option<DocumentFormat>,
    diagnostics: &mut DiagnosticCollector,
) -> (OutputOptions, Vec<PathBuf>) {
    let mut destinations = Vec::new();
    for raw in &cli.outputs {
        if raw.trim().is_empty() {
            diagnostics.push_output("output destination cannot be empty");
            continue;
        }
        if raw == "-" {
            destinations.push(OutputDestination::Stdout);
        } else {
            destinations.push(OutputDestination::file(raw));
        }
    }
    if cli.outputs.is_empty() {
        destinations.push(OutputDestination::Stdout);
    }

    let file_paths: Vec<PathBuf> = destinations
        .iter()
        .filter_map(|dest| match dest {
            OutputDestination::File(path) => Some(path.clone()),
            OutputDestination::Stdout => None,
        })
        .collect();

    let format = if file_paths.is_empty() {
        input_hint.unwrap_or_default()
    } else {
        infer_format_from_files(&file_paths, diagnostics).unwrap_or_default()
    };

    let options = OutputOptions::new(format)
        .with_pretty(!cli.no_pretty)
        .with_destinations(destinations);
    (options, file_paths)
}

fn infer_format_from_files(
    file_paths: &[PathBuf],
    diagnostics: &mut DiagnosticCollector,
) -> Option<DocumentFormat> {
    let mut detected: Option<DocumentFormat> = None;
    for path in file_paths {
        match format_from_extension(path) {
            ExtensionFormat::Known(format) => match detected {
                Some(existing) if existing != format => diagnostics.push_output(format!(
                    "output file {} uses {format} but other destinations use {existing}; align extensions",
                    path.display()
                )),
                Some(_) => {}
                None => detected = Some(format),
            },
            ExtensionFormat::UnsupportedFeature {
                format_name,
                feature_flag,
            } => diagnostics.push_output(format!(
                "output file {} requires {format_name} support, but this build was compiled without the '{feature_flag}' feature",
                path.display()
            )),
            ExtensionFormat::Unknown => diagnostics.push_output(format!(
                "cannot infer format from output file {}; use .json/.yaml/.toml",
                path.display()
            )),
        }
    }
    detected
}

fn format_from_extension(path: &Path) -> ExtensionFormat {
    let Some(ext) = path.extension() else {
        return ExtensionFormat::Unknown;
    };
    let normalized = ext.to_string_lossy().to_ascii_lowercase();
    match normalized.as_str() {
        "json" => ExtensionFormat::Known(DocumentFormat::Json),
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => ExtensionFormat::Known(DocumentFormat::Yaml),
        #[cfg(not(feature = "yaml"))]
        "yaml" | "yml" => ExtensionFormat::UnsupportedFeature {
            format_name: "yaml",
            feature_flag: "yaml",
        },
        #[cfg(feature = "toml")]
        "toml" => ExtensionFormat::Known(DocumentFormat::Toml),
        #[cfg(not(feature = "toml"))]
        "toml" => ExtensionFormat::UnsupportedFeature {
            format_name: "toml",
            feature_flag: "toml",
        },
        _ => ExtensionFormat::Unknown,
    }
}

#[derive(Debug)]
enum ExtensionFormat {
    Known(DocumentFormat),
    #[allow(dead_code)]
    UnsupportedFeature {
        format_name: &'static str,
        feature_flag: &'static str,
    },
    Unknown,
}

fn ensure_output_paths_available(
    paths: &[PathBuf],
    force: bool,
    diagnostics: &mut DiagnosticCollector,
) {
    if force {
        return;
    }
    for path in paths {
        if path.exists() {
            diagnostics.push_output(format!(
                "file {} already exists (pass --force to overwrite)",
                path.display()
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_extensions_fall_back_to_sniffing() {
        let mut diagnostics = DiagnosticCollector::default();
        assert_eq!(
            resolve_input_format(Some("trip.txt"), &mut diagnostics),
            Some(None)
        );
        assert_eq!(
            resolve_input_format(Some("trip.json"), &mut diagnostics),
            Some(Some(DocumentFormat::Json))
        );
        assert!(diagnostics.messages.is_empty());
    }

    #[test]
    fn mixed_output_extensions_are_reported() {
        let mut diagnostics = DiagnosticCollector::default();
        let paths = vec![PathBuf::from("a.json"), PathBuf::from("b.txt")];
        let detected = infer_format_from_files(&paths, &mut diagnostics);
        assert_eq!(detected, Some(DocumentFormat::Json));
        assert_eq!(diagnostics.messages.len(), 1);
        assert!(diagnostics.into_result().is_err());
    }

    #[test]
    fn untyped_input_is_sniffed_as_json() {
        let document = parse_contents(r#"{"points": []}"#, None).unwrap();
        assert!(document.points.is_empty());
    }

    #[test]
    fn sniffing_reports_every_format_tried() {
        let err = parse_contents("{ not json", None).unwrap_err();
        assert!(err.to_string().contains("tried json"));
    }
}
