//! merge graphql endpoints and generate typescript types
//!
//! fetches every endpoint's schema via introspection, merges them, and
//! writes one operation file plus one types file per input document,
//! optionally with a barrel index.
//!
//! command help reference (kept in sync with `graphweld-codegen --help`):
#[doc = concat!("```text\n", include_str!("graphweld-codegen-help.txt"), "\n```")]
pub const CLI_HELP: &str = include_str!("graphweld-codegen-help.txt");

use graphweld::{
    compose, BarrelEntry, EndpointSchema, GenConfig, GeneratedDocument, Generator, MergeOutcome,
    INTROSPECTION_OPERATION_NAME, INTROSPECTION_QUERY,
};
use reqwest::blocking::Client as BlockingClient;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct Args {
    urls: Vec<String>,
    documents: Vec<PathBuf>,
    out_dir: PathBuf,
    default_scalar: Option<String>,
    scalars: Vec<(String, String)>,
    barrel: bool,
}

enum ParseArgsError {
    Help,
    Message(String),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = match parse_args(std::env::args().collect()) {
        Ok(args) => args,
        Err(ParseArgsError::Help) => {
            print!("{CLI_HELP}");
            return;
        }
        Err(ParseArgsError::Message(err)) => {
            eprintln!("{err}\n\n{CLI_HELP}");
            std::process::exit(1);
        }
    };

    let outcome = match fetch_and_merge(&args.urls) {
        Ok(outcome) => outcome,
        Err(err) => {
            eprintln!("failed to merge endpoint schemas: {err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = generate_files(&args, &outcome) {
        eprintln!("codegen failed: {err}");
        std::process::exit(1);
    }
}

fn parse_args(args: Vec<String>) -> Result<Args, ParseArgsError> {
    let mut urls = Vec::new();
    let mut documents = Vec::new();
    let mut out_dir = None;
    let mut default_scalar = None;
    let mut scalars = Vec::new();
    let mut barrel = false;

    let mut iter = args.into_iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--url" => {
                urls.extend(iter.next());
            }
            "--document" => {
                documents.extend(iter.next().map(PathBuf::from));
            }
            "--out" => out_dir = iter.next().map(PathBuf::from),
            "--default-scalar" => default_scalar = iter.next(),
            "--scalar" => {
                let entry = iter
                    .next()
                    .ok_or_else(|| ParseArgsError::Message("--scalar needs NAME=TYPE".to_string()))?;
                let (name, mapped) = entry.split_once('=').ok_or_else(|| {
                    ParseArgsError::Message(format!("invalid scalar override: {entry}"))
                })?;
                scalars.push((name.to_string(), mapped.to_string()));
            }
            "--barrel" => barrel = true,
            "--help" | "-h" => return Err(ParseArgsError::Help),
            _ => return Err(ParseArgsError::Message(format!("unknown argument: {arg}"))),
        }
    }

    let out_dir =
        out_dir.ok_or_else(|| ParseArgsError::Message("--out is required".to_string()))?;

    if urls.is_empty() {
        return Err(ParseArgsError::Message(
            "at least one --url is required".to_string(),
        ));
    }

    Ok(Args {
        urls,
        documents,
        out_dir,
        default_scalar,
        scalars,
        barrel,
    })
}

fn fetch_and_merge(urls: &[String]) -> Result<MergeOutcome, String> {
    let client = BlockingClient::builder()
        .timeout(Duration::from_secs(30))
        .user_agent(concat!("graphweld-codegen/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|err| err.to_string())?;

    let body = serde_json::json!({
        "operationName": INTROSPECTION_OPERATION_NAME,
        "query": INTROSPECTION_QUERY,
    });

    let mut fetched = Vec::new();
    for url in urls {
        let response = match client.post(url).json(&body).send() {
            Ok(response) => response,
            Err(err) => {
                eprintln!("skipping {url}: {err}");
                continue;
            }
        };
        if !response.status().is_success() {
            eprintln!("skipping {url}: http status {}", response.status());
            continue;
        }
        let text = match response.text() {
            Ok(text) => text,
            Err(err) => {
                eprintln!("skipping {url}: {err}");
                continue;
            }
        };
        match EndpointSchema::from_response(url, &text) {
            Ok(endpoint_schema) => fetched.push(endpoint_schema),
            Err(err) => eprintln!("skipping {url}: {err}"),
        }
    }

    compose(fetched).map_err(|err| err.to_string())
}

fn generate_files(args: &Args, outcome: &MergeOutcome) -> Result<(), String> {
    let mut config = GenConfig::new();
    if let Some(default_scalar) = &args.default_scalar {
        config = config.with_default_scalar(default_scalar.clone());
    }
    for (name, mapped) in &args.scalars {
        config = config.with_scalar(name.clone(), mapped.clone());
    }

    let generator = Generator::new(&outcome.composed, config);
    let mut records = Vec::new();

    for path in &args.documents {
        let text = fs::read_to_string(path)
            .map_err(|err| format!("failed to read {}: {err}", path.display()))?;
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| format!("cannot derive a name from {}", path.display()))?
            .to_string();

        let types = generator
            .generate(&[text.clone()], &[])
            .map_err(|err| format!("{}: {err}", path.display()))?;

        records.push(GeneratedDocument {
            operation_text: format!("export const {name}Schema = gql`{text}`"),
            result_type_text: types,
            variables_type_text: String::new(),
            name,
        });
    }

    graphweld::write_documents(&args.out_dir, &records).map_err(|err| err.to_string())?;

    if args.barrel {
        let entries: Vec<BarrelEntry> = records
            .iter()
            .map(|record| BarrelEntry {
                name: record.name.clone(),
                display_name: String::new(),
            })
            .collect();
        graphweld::write_barrel(&args.out_dir, &entries).map_err(|err| err.to_string())?;
    }

    Ok(())
}
