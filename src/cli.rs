//! Minimal CLI: load type catalogs → (schema | check)
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use indexmap::IndexMap;
use tracing::{info, warn};

use schema_synth::{Generator, Options, Schema, TypeCatalog};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// derive JSON-schema documents from JSON type catalogs
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// generate and print schemas
    Schema(SchemaOut),
    /// generate every declared type and report the ones that fail
    Check(CheckOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// One or more catalog files. May be literal paths or quoted glob patterns.
    /// Later files override earlier declarations of the same name.
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,

    #[command(flatten)]
    options: Options,
}

#[derive(clap::Parser, Debug)]
struct SchemaOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// only emit the schema of this type (all declared types if omitted)
    #[arg(long)]
    root: Option<String>,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// single-line output
    #[arg(long, default_value_t = false)]
    compact: bool,
}

#[derive(clap::Parser, Debug)]
struct CheckOut {
    #[command(flatten)]
    input_settings: InputSettings,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load_catalog(&self) -> anyhow::Result<TypeCatalog> {
        let source_paths = resolve_file_path_patterns(&self.input)
            .context("failed to resolve input file paths")?;
        let mut catalog = TypeCatalog::new();
        for source_path in source_paths {
            let loaded = load_catalog_file(&source_path)?;
            info!(path = %source_path.display(), types = loaded.len(), "loaded catalog");
            for name in catalog.merge(loaded) {
                warn!(path = %source_path.display(), name = %name, "type redeclared; later declaration wins");
            }
        }
        Ok(catalog)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> anyhow::Result<()> {
        match &self.cmd {
            Command::Schema(target) => {
                let catalog = target.input_settings.load_catalog()?;
                let mut generator =
                    Generator::new(&catalog).with_options(target.input_settings.options);

                let document = match target.root.as_deref() {
                    Some(root) => generator
                        .generate_named(root)
                        .with_context(|| format!("cannot describe `{root}`"))?
                        .to_json(),
                    None => {
                        let schemas = generate_all(&catalog, &mut generator)?;
                        serde_json::to_value(schemas)?
                    }
                };

                let schema_src = if target.compact {
                    serde_json::to_string(&document)?
                } else {
                    serde_json::to_string_pretty(&document)?
                };
                if let Some(out) = target.out.as_ref() {
                    if let Some(parent) = out.parent() {
                        std::fs::create_dir_all(parent)
                            .with_context(|| format!("cannot create {}", parent.display()))?;
                    }
                    std::fs::write(out, &schema_src)
                        .with_context(|| format!("cannot write {}", out.display()))?;
                } else {
                    println!("{schema_src}");
                }
                Ok(())
            }
            Command::Check(target) => {
                let catalog = target.input_settings.load_catalog()?;
                let mut generator =
                    Generator::new(&catalog).with_options(target.input_settings.options);

                let mut failures = 0usize;
                for name in catalog.names() {
                    match generator.generate_named(name) {
                        Ok(_) => eprintln!("ok      {name}"),
                        Err(error) => {
                            failures += 1;
                            eprintln!("FAILED  {name}: {error}");
                        }
                    }
                }
                if failures > 0 {
                    bail!("{failures} of {} types cannot be described", catalog.len());
                }
                Ok(())
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn generate_all(
    catalog: &TypeCatalog,
    generator: &mut Generator<'_>,
) -> anyhow::Result<IndexMap<String, Schema>> {
    let mut out = IndexMap::with_capacity(catalog.len());
    for name in catalog.names() {
        let schema = generator
            .generate_named(name)
            .with_context(|| format!("cannot describe `{name}`"))?;
        out.insert(name.to_string(), schema);
    }
    Ok(out)
}

fn load_catalog_file(path: &Path) -> anyhow::Result<TypeCatalog> {
    let source = std::fs::read(path)
        .with_context(|| format!("failed to read catalog file {}", path.display()))?;
    schema_synth::path_de::from_slice_with_path(&source)
        .with_context(|| format!("failed to parse catalog file {}", path.display()))
}

fn resolve_file_path_patterns<I>(patterns: I) -> anyhow::Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                matched_any = true;
                out.push(entry?);
            }
            if !matched_any {
                // Pattern was explicitly a glob but matched nothing -> surface as an error
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
