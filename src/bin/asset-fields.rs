//! Asset Fields CLI
//!
//! Command-line interface for resolving adapter and field names against a
//! field schema and building query projections.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use asset_fields::{
    find_adapter, find_by_name, find_field, load_json, load_schema_auto, qualify_field,
    resolve_adapter, resolve_request, AssetType, FieldRequest, NameMatch, QueryParams, Resolution, Schema, Source,
    ValidateOptions,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "asset-fields")]
#[command(about = "Resolve asset field and adapter names into query projections")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve an adapter name to its canonical identifier
    Adapter {
        /// Adapter name, short (active_directory) or canonical (active_directory_adapter)
        name: String,

        #[command(flatten)]
        source: SchemaArgs,

        /// Print INVALID_<name> instead of failing on unknown adapters
        #[arg(long)]
        no_error: bool,
    },

    /// Resolve a single field name; without --schema the name is only qualified
    Find {
        /// Field name, short or fully-qualified
        name: String,

        /// Adapter to search, or "generic"
        #[arg(long, short, default_value = "generic")]
        adapter: String,

        #[command(flatten)]
        source: SchemaArgs,

        /// Print INVALID_ sentinels instead of failing on unknown names
        #[arg(long)]
        no_error: bool,
    },

    /// Validate a set of field names and print the projection
    Validate {
        /// Field as NAME (generic) or SOURCE:NAME; repeatable, order is kept.
        /// A colon followed by a space (`OS: Type`), or a SOURCE containing
        /// whitespace, is part of a generic title; use generic:NAME to force
        #[arg(long = "field", short = 'f')]
        fields: Vec<String>,

        /// JSON file mapping source to field names, applied before --field
        #[arg(long)]
        request: Option<PathBuf>,

        #[command(flatten)]
        source: SchemaArgs,

        /// Do not inject default generic fields
        #[arg(long)]
        no_defaults: bool,

        /// Emit INVALID_ sentinels instead of failing on unknown names
        #[arg(long)]
        no_error: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Lines)]
        format: OutputFormat,

        /// Filter expression to include with --format params
        #[arg(long)]
        filter: Option<String>,

        /// Rows to skip, with --format params
        #[arg(long, default_value_t = 0)]
        row_start: u64,

        /// Rows per page, with --format params
        #[arg(long, default_value_t = 0)]
        page_size: u64,
    },

    /// List the known fields of the generic source or an adapter
    Fields {
        /// Adapter to list, or "generic"
        #[arg(long, short, default_value = "generic")]
        adapter: String,

        #[command(flatten)]
        source: SchemaArgs,
    },

    /// Find named objects (saved queries, enforcements) in a JSON array
    Lookup {
        /// Name, or pattern with --regex
        name: String,

        /// JSON file holding an array of objects with a "name" attribute
        #[arg(long)]
        file: PathBuf,

        /// Match as a case-insensitive regex
        #[arg(long)]
        regex: bool,

        /// Require exactly one match
        #[arg(long)]
        only1: bool,

        /// Object type named in errors
        #[arg(long, default_value = "Object")]
        object_type: String,
    },
}

#[derive(Args)]
struct SchemaArgs {
    /// Schema source: file path, URL, or "remote" to fetch from --url
    #[arg(long, short)]
    schema: Option<String>,

    /// Asset type the schema describes
    #[arg(long, default_value_t = AssetType::Devices)]
    asset_type: AssetType,

    /// Server base URL for --schema remote
    #[arg(long, env = "AX_URL")]
    url: Option<String>,

    /// API key for --schema remote
    #[arg(long, env = "AX_KEY", hide_env_values = true)]
    key: Option<String>,

    /// API secret for --schema remote
    #[arg(long, env = "AX_SECRET", hide_env_values = true)]
    secret: Option<String>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// One path per line
    Lines,
    /// JSON array
    Json,
    /// Comma-joined, as sent in the fields parameter
    Joined,
    /// Full query parameters as JSON
    Params,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Adapter {
            name,
            source,
            no_error,
        } => run_adapter(&name, &source, no_error),

        Commands::Find {
            name,
            adapter,
            source,
            no_error,
        } => run_find(&name, &adapter, &source, no_error),

        Commands::Validate {
            fields,
            request,
            source,
            no_defaults,
            no_error,
            format,
            filter,
            row_start,
            page_size,
        } => run_validate(ValidateArgs {
            fields,
            request,
            source,
            no_defaults,
            no_error,
            format,
            filter,
            row_start,
            page_size,
        }),

        Commands::Fields { adapter, source } => run_fields(&adapter, &source),

        Commands::Lookup {
            name,
            file,
            regex,
            only1,
            object_type,
        } => run_lookup(&name, &file, regex, only1, &object_type),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load the schema named by `--schema`, if any.
fn load_schema_arg(args: &SchemaArgs) -> Result<Option<Schema>, u8> {
    let Some(source) = args.schema.as_deref() else {
        return Ok(None);
    };

    let schema = if source == "remote" {
        fetch_remote(args)?
    } else {
        load_schema_auto(source).map_err(|e| {
            eprintln!("Error: loading schema: {}", e);
            e.exit_code() as u8
        })?
    };

    debug!(
        source,
        generic = schema.generic.len(),
        adapters = schema.specific.len(),
        "loaded schema"
    );
    Ok(Some(schema))
}

#[cfg(feature = "remote")]
fn fetch_remote(args: &SchemaArgs) -> Result<Schema, u8> {
    let (Some(url), Some(key), Some(secret)) = (&args.url, &args.key, &args.secret) else {
        eprintln!("Error: --schema remote needs --url, --key and --secret (or AX_URL, AX_KEY, AX_SECRET)");
        return Err(2);
    };

    let config = asset_fields::ApiConfig::new(url.as_str(), key.as_str(), secret.as_str());
    asset_fields::fetch_known_fields(&config, args.asset_type).map_err(|e| {
        eprintln!("Error: fetching schema: {}", e);
        e.exit_code() as u8
    })
}

#[cfg(not(feature = "remote"))]
fn fetch_remote(_args: &SchemaArgs) -> Result<Schema, u8> {
    eprintln!("Error: --schema remote requires the remote feature");
    Err(2)
}

fn require_schema(args: &SchemaArgs) -> Result<Schema, u8> {
    load_schema_arg(args)?.ok_or_else(|| {
        eprintln!("Error: --schema is required");
        2u8
    })
}

fn run_adapter(name: &str, args: &SchemaArgs, no_error: bool) -> Result<(), u8> {
    let schema = load_schema_arg(args)?;
    let known = schema.as_ref().map(Schema::adapter_names);

    let canonical = find_adapter(name, known.as_deref(), !no_error).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    println!("{}", canonical);
    Ok(())
}

fn run_find(name: &str, adapter: &str, args: &SchemaArgs, no_error: bool) -> Result<(), u8> {
    let (adapter, field) = match load_schema_arg(args)? {
        Some(schema) => find_field(name, adapter, &schema, !no_error).map_err(|e| {
            eprintln!("Error: {}", e);
            e.exit_code() as u8
        })?,
        None => qualify_field(name, &Source::parse(adapter)),
    };

    println!("{}\t{}", adapter, field);
    Ok(())
}

struct ValidateArgs {
    fields: Vec<String>,
    request: Option<PathBuf>,
    source: SchemaArgs,
    no_defaults: bool,
    no_error: bool,
    format: OutputFormat,
    filter: Option<String>,
    row_start: u64,
    page_size: u64,
}

fn run_validate(args: ValidateArgs) -> Result<(), u8> {
    let schema = require_schema(&args.source)?;

    let mut request = match &args.request {
        Some(path) => {
            let value = load_json(path).map_err(|e| {
                eprintln!("Error: loading request: {}", e);
                e.exit_code() as u8
            })?;
            FieldRequest::from_value(&value).map_err(|e| {
                eprintln!("Error: {}", e);
                e.exit_code() as u8
            })?
        }
        None => FieldRequest::new(),
    };

    for field in &args.fields {
        let (source, name) = parse_field_arg(field);
        request.push(source, [name]);
    }

    let options = ValidateOptions::new(args.source.asset_type)
        .default_fields(!args.no_defaults)
        .fields_error(!args.no_error);

    let resolved = resolve_request(&schema, &request, &options).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let paths: Vec<String> = resolved.iter().map(Resolution::value).collect();

    match args.format {
        OutputFormat::Lines => {
            for path in &paths {
                println!("{}", path);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::Value::from(paths));
        }
        OutputFormat::Joined => {
            println!("{}", paths.join(","));
        }
        OutputFormat::Params => {
            let params = QueryParams::new()
                .filter(args.filter.unwrap_or_default())
                .fields(paths.as_slice())
                .row_start(args.row_start)
                .page_size(args.page_size);
            let output = serde_json::to_string(&params).map_err(|e| {
                eprintln!("Error serializing output: {}", e);
                2u8
            })?;
            println!("{}", output);
        }
    }

    Ok(())
}

/// Split `SOURCE:NAME`; a bare name is generic.
///
/// Titles such as `OS: Type` or `Network Interfaces: IPs` stay generic: the
/// text before the colon is a source only when it is non-empty with no
/// whitespace and the name does not start with whitespace.
fn parse_field_arg(arg: &str) -> (Source, String) {
    match arg.split_once(':') {
        Some((source, name))
            if !source.is_empty()
                && !source.contains(char::is_whitespace)
                && !name.starts_with(char::is_whitespace) =>
        {
            (Source::parse(source), name.to_string())
        }
        _ => (Source::Generic, arg.to_string()),
    }
}

fn run_fields(adapter: &str, args: &SchemaArgs) -> Result<(), u8> {
    let schema = require_schema(args)?;

    let source = match Source::parse(adapter) {
        Source::Generic => Source::Generic,
        Source::Adapter(name) => {
            let known = schema.adapter_names();
            let canonical = resolve_adapter(&name, Some(&known))
                .into_result()
                .map_err(|e| {
                    eprintln!("Error: {}", e);
                    e.exit_code() as u8
                })?;
            Source::Adapter(canonical)
        }
    };

    for field in schema.fields(&source).unwrap_or_default() {
        println!(
            "{}\t{}\t{}\t{}",
            field.short_name(),
            field.name,
            field.title,
            field.field_type
        );
    }

    Ok(())
}

fn run_lookup(
    name: &str,
    file: &Path,
    regex: bool,
    only1: bool,
    object_type: &str,
) -> Result<(), u8> {
    let value = load_json(file).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let Some(items) = value.as_array() else {
        eprintln!("Error: {}: expected an array of objects", file.display());
        return Err(2);
    };

    let matcher = if regex {
        NameMatch::regex(name).map_err(|e| {
            eprintln!("Error: {}", e);
            e.exit_code() as u8
        })?
    } else {
        NameMatch::exact(name)
    };

    let found = find_by_name(items.as_slice(), &matcher, only1, object_type).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    for item in found {
        println!("{}", item);
    }

    Ok(())
}
