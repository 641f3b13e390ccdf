use crate::catalog::TypeCatalog;
use crate::detector::{Convention, ConventionDetector};
use crate::error::Error;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// Model doclet - document the data models reachable from API types
#[derive(Parser, Debug)]
#[command(name = "model-doclet")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Type catalog file, Rust source file, or directory containing either
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Root type to document, by qualified or unique simple name (repeatable).
    /// Defaults to every non-enum type in the input.
    #[arg(short = 'r', long = "root", value_name = "TYPE")]
    pub roots: Vec<String>,

    /// Output format (yaml or json)
    #[arg(short = 'f', long = "format", value_enum, default_value = "yaml")]
    pub output_format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Options file (YAML or JSON)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_path: Option<PathBuf>,

    /// Naming convention to honour (repeatable; if not specified, auto-detect)
    #[arg(long = "convention", value_enum)]
    pub conventions: Vec<Convention>,

    /// API version reported in the output
    #[arg(long = "api-version", default_value = "1.0.0")]
    pub api_version: String,

    /// Base path reported in the output
    #[arg(long = "base-path")]
    pub base_path: Option<String>,

    /// Comma-separated types never expanded into models
    #[arg(long = "opaque-types", value_name = "TYPES")]
    pub opaque_types: Option<String>,

    /// Comma-separated name prefixes never expanded into models
    #[arg(long = "opaque-packages", value_name = "PREFIXES")]
    pub opaque_packages: Option<String>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// YAML format
    Yaml,
    /// JSON format
    Json,
}

/// Parse command line arguments
pub fn parse_args() -> Result<CliArgs> {
    let args = CliArgs::parse();
    parse_args_from_parsed(args)
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.input.exists() {
        anyhow::bail!("Input path does not exist: {}", args.input.display());
    }
    if let Some(ref config_path) = args.config_path {
        if !config_path.is_file() {
            anyhow::bail!("Options file does not exist: {}", config_path.display());
        }
    }

    info!("Input: {}", args.input.display());
    info!("Output format: {:?}", args.output_format);
    if let Some(ref output) = args.output_path {
        info!("Output file: {}", output.display());
    } else {
        info!("Output: stdout");
    }
    if args.roots.is_empty() {
        info!("Roots: all types");
    } else {
        info!("Roots: {}", args.roots.join(", "));
    }

    Ok(args)
}

/// Load the type catalog described by `input`.
///
/// A directory is scanned for catalog files and Rust sources; catalog declarations are
/// added before those resolved from Rust, and the first declaration of a name wins.
pub fn load_input(input: &Path) -> Result<TypeCatalog> {
    use crate::parser::{AstParser, ParsedFile};
    use crate::scanner::{is_catalog_file, is_rust_file, FileScanner};
    use crate::type_resolver::TypeResolver;

    if input.is_dir() {
        info!("Scanning input directory...");
        let scan_result = FileScanner::new(input.to_path_buf()).scan()?;
        info!(
            "Found {} catalog files and {} Rust files",
            scan_result.catalog_files.len(),
            scan_result.rust_files.len()
        );
        if scan_result.is_empty() {
            anyhow::bail!("No type catalogs or Rust files found in {}", input.display());
        }

        let mut catalog = TypeCatalog::new();
        for catalog_file in &scan_result.catalog_files {
            let loaded = TypeCatalog::load(catalog_file)
                .with_context(|| format!("Failed to load catalog {}", catalog_file.display()))?;
            catalog.extend(loaded);
        }

        let parsed_files: Vec<ParsedFile> = AstParser::parse_files(&scan_result.rust_files)
            .into_iter()
            .filter_map(Result::ok)
            .collect();
        catalog.extend(TypeResolver::new(parsed_files).resolve());

        return Ok(catalog);
    }

    if is_rust_file(input) {
        let parsed = AstParser::parse_file(input)?;
        return Ok(TypeResolver::new(vec![parsed]).resolve());
    }

    let is_structured = matches!(
        input.extension().and_then(|s| s.to_str()),
        Some("yaml" | "yml" | "json")
    );
    if is_catalog_file(input) || is_structured {
        let catalog = TypeCatalog::load(input)
            .with_context(|| format!("Failed to load catalog {}", input.display()))?;
        return Ok(catalog);
    }

    anyhow::bail!(
        "Unsupported input {}: expected a type catalog (.yaml, .yml, .json), a .rs file or a directory",
        input.display()
    )
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    use crate::config::ParserOptions;
    use crate::definitions_builder::DefinitionsBuilder;
    use crate::model_parser::ApiModelParser;
    use crate::oracle::TypeRef;
    use crate::serializer::{serialize_json, serialize_yaml, write_to_file};

    info!("Starting model documentation...");

    // Step 1: Load type declarations
    info!("Loading type declarations...");
    let catalog = load_input(&args.input)?;
    info!("Loaded {} type declarations", catalog.len());
    if catalog.is_empty() {
        warn!("No type declarations found in {}", args.input.display());
    }

    // Step 2: Options, with command-line values added on top
    let mut options = match &args.config_path {
        Some(path) => ParserOptions::load(path)
            .with_context(|| format!("Failed to load options from {}", path.display()))?,
        None => ParserOptions::default(),
    };
    if let Some(ref list) = args.opaque_types {
        options.add_opaque_types(list);
    }
    if let Some(ref list) = args.opaque_packages {
        options.add_opaque_packages(list);
    }
    if !args.conventions.is_empty() {
        options.conventions = args.conventions.clone();
    }

    // Step 3: Naming conventions
    let detection = ConventionDetector::detect(&catalog);
    let conventions = options.effective_conventions(&detection.conventions);
    if options.conventions.is_empty() {
        info!("Detected conventions: {:?}", detection.conventions);
    }
    info!("Using conventions: {:?}", conventions);

    let policy = options.opacity_policy();
    let translator = options.translator(&detection.conventions);
    let parser = ApiModelParser::new(&policy, &translator, &catalog);

    // Step 4: Roots
    let roots: Vec<TypeRef> = if args.roots.is_empty() {
        catalog
            .declarations()
            .filter(|declaration| !declaration.is_enum())
            .map(|declaration| declaration.type_ref())
            .collect()
    } else {
        args.roots
            .iter()
            .map(|name| {
                catalog
                    .find(name)
                    .map(|declaration| declaration.type_ref())
                    .ok_or_else(|| Error::UnknownRootType(name.clone()))
            })
            .collect::<Result<_, _>>()?
    };
    info!("Documenting {} root types", roots.len());

    // Step 5: Walk each root and collect its models
    let mut builder = DefinitionsBuilder::new().with_info(args.api_version.clone(), args.base_path.clone());
    for root in &roots {
        let models = parser.parse(root);
        debug!("Root {} yielded models {:?}", root, models.ids());
        builder.add_models(models);
    }
    let model_count = builder.model_count();
    let document = builder.build();
    info!("Definitions document built successfully");

    // Step 6: Serialize to requested format
    info!("Serializing to {:?} format...", args.output_format);
    let content = match args.output_format {
        OutputFormat::Yaml => serialize_yaml(&document)?,
        OutputFormat::Json => serialize_json(&document)?,
    };

    // Step 7: Output to file or stdout
    if let Some(output_path) = &args.output_path {
        info!("Writing output to: {}", output_path.display());
        write_to_file(&content, output_path)?;
    } else {
        println!("{}", content);
    }

    info!("Summary:");
    info!("  - Declarations: {}", catalog.len());
    info!("  - Roots: {}", roots.len());
    info!("  - Models: {}", model_count);

    Ok(())
}
