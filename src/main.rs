//! Filtrawy CLI - Photo Filter Engine
//!
//! Applies filters to single images or whole directories.

use anyhow::{bail, Context, Result};
use filtrawy::batch::sheet_inputs;
use filtrawy::prelude::*;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("filtrawy");

    if args.len() < 2 {
        print_usage(program);
        return ExitCode::FAILURE;
    }

    let result = match args[1].as_str() {
        "list" => {
            list_filters();
            Ok(())
        }
        "search" => match args.get(2) {
            Some(query) => {
                search_filters(query);
                Ok(())
            }
            None => Err(anyhow::anyhow!("Please specify a search query")),
        },
        "info" => match args.get(2) {
            Some(name) => filter_info(name),
            None => Err(anyhow::anyhow!("Please specify a filter name")),
        },
        "apply" => apply(&args[2..]),
        "batch" => batch(&args[2..]),
        "sheet" => sheet(&args[2..]),
        "analyze" => match args.get(2) {
            Some(path) => analyze_image(Path::new(path)),
            None => Err(anyhow::anyhow!("Please specify an input image")),
        },
        "help" | "--help" | "-h" => {
            print_usage(program);
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            print_usage(program);
            return ExitCode::FAILURE;
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn print_usage(program: &str) {
    println!("🎨 Filtrawy v{}", filtrawy::VERSION);
    println!();
    println!("Usage: {program} <command> [options]");
    println!();
    println!("Commands:");
    println!("  list                                  List all available filters");
    println!("  search <query>                        Find filters by name, description or tag");
    println!("  info <filter>                         Show detailed info about a filter");
    println!("  apply <in> <out> <filter> [options]   Filter one image");
    println!("  batch <in_dir> <out_dir> <filter> [options]");
    println!("                                        Filter every image in a directory");
    println!("  sheet <out> <cols> <WxH> <paths...>   Build a contact sheet");
    println!("  analyze <in>                          Print image statistics as JSON");
    println!("  help                                  Show this help message");
    println!();
    println!("Options:");
    println!("  --param <name>=<value>   Set a filter parameter (repeatable)");
    println!("  --params <file>          Load parameters from a .json or .toml file");
    println!("  --workers <n>            Batch worker threads (default: 4)");
    println!("  --pattern <glob>         Batch file name filter");
    println!("  --prefix <text>          Batch output prefix (default: processed_)");
}

fn list_filters() {
    let registry = FilterRegistry::with_builtins();

    println!("Available filters ({} total):", registry.len());
    println!();

    for (category, filters) in registry.grouped_by_category() {
        println!("  📁 {}", category.display_name());
        for metadata in filters {
            println!("      • {:<24} {}", metadata.id, metadata.description);
        }
        println!();
    }
}

fn search_filters(query: &str) {
    let registry = FilterRegistry::with_builtins();
    let results = registry.search(query);

    if results.is_empty() {
        println!("No filters match '{query}'");
        return;
    }
    println!("Filters matching '{query}':");
    for metadata in results {
        println!("  • {:<24} {}", metadata.id, metadata.description);
    }
}

fn filter_info(name: &str) -> Result<()> {
    let registry = FilterRegistry::with_builtins();
    let kind = registry.lookup(name)?;
    let metadata = registry
        .metadata_for(kind)
        .with_context(|| format!("No metadata registered for '{kind}'"))?;

    println!("Filter: {}", metadata.name);
    println!("ID: {}", metadata.id);
    println!("Category: {}", metadata.category.display_name());
    println!();
    println!("Description:");
    println!("  {}", metadata.description);

    if !metadata.parameters.is_empty() {
        println!();
        println!("Parameters:");
        for definition in metadata.parameter_definitions() {
            println!(
                "  • {} [{} .. {}] = {}",
                definition.name, definition.min, definition.max, definition.default_value
            );
            if !definition.description.is_empty() {
                println!("    {}", definition.description);
            }
        }
    }
    if !metadata.tags.is_empty() {
        println!();
        println!("Tags: {}", metadata.tags.join(", "));
    }
    Ok(())
}

/// Options shared by `apply` and `batch`.
#[derive(Default)]
struct CommonOptions {
    params: ParameterSet,
    workers: Option<usize>,
    pattern: Option<String>,
    prefix: Option<String>,
}

fn parse_options(args: &[String]) -> Result<CommonOptions> {
    let mut options = CommonOptions::default();
    let mut overrides: Vec<(String, f64)> = Vec::new();

    let mut i = 0;
    while i < args.len() {
        let value = args.get(i + 1);
        match (args[i].as_str(), value) {
            ("--param", Some(pair)) => {
                let (name, raw) = pair
                    .split_once('=')
                    .with_context(|| format!("Expected name=value, got '{pair}'"))?;
                let number: f64 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("Invalid number for '{name}': '{raw}'"))?;
                overrides.push((name.trim().to_string(), number));
            }
            ("--params", Some(path)) => {
                options.params = ParameterSet::load(path)
                    .with_context(|| format!("Failed to load parameters from {path}"))?;
            }
            ("--workers", Some(n)) => {
                options.workers = Some(n.parse().with_context(|| format!("Invalid worker count '{n}'"))?);
            }
            ("--pattern", Some(p)) => options.pattern = Some(p.clone()),
            ("--prefix", Some(p)) => options.prefix = Some(p.clone()),
            (flag, _) => bail!("Unknown or incomplete option: {flag}"),
        }
        i += 2;
    }

    // Individual overrides win over a parameter file regardless of order.
    for (name, value) in overrides {
        options.params.set_by_name(&name, value)?;
    }
    Ok(options)
}

fn apply(args: &[String]) -> Result<()> {
    let [input, output, filter, rest @ ..] = args else {
        bail!("Usage: apply <in> <out> <filter> [--param name=value]... [--params file]");
    };
    let options = parse_options(rest)?;
    let kind: FilterKind = filter.parse()?;

    let image = load_rgb(input).with_context(|| format!("Failed to load {input}"))?;
    let filtered = kind
        .apply(&image, &options.params)
        .with_context(|| format!("Filter '{kind}' failed"))?;
    save_rgb(&filtered, output).with_context(|| format!("Failed to save {output}"))?;

    println!("✅ {input} -> {output} ({kind})");
    Ok(())
}

fn batch(args: &[String]) -> Result<()> {
    let [input_dir, output_dir, filter, rest @ ..] = args else {
        bail!("Usage: batch <in_dir> <out_dir> <filter> [--workers N] [--pattern GLOB]");
    };
    let options = parse_options(rest)?;
    let kind: FilterKind = filter.parse()?;

    let mut batch_options = BatchOptions::new()
        .with_params(options.params)
        .with_progress(Arc::new(|event: BatchProgress| {
            if let BatchProgress::ItemFinished { path, success, finished, total, .. } = event {
                let mark = if success { "✓" } else { "✗" };
                println!("  [{finished}/{total}] {mark} {}", path.display());
            }
        }));
    if let Some(workers) = options.workers {
        batch_options = batch_options.with_workers(workers);
    }
    if let Some(pattern) = options.pattern {
        batch_options = batch_options.with_pattern(pattern);
    }
    if let Some(prefix) = options.prefix {
        batch_options = batch_options.with_prefix(prefix);
    }

    let report = BatchRunner::new(input_dir, output_dir)
        .with_options(batch_options)
        .run(kind)
        .with_context(|| format!("Batch over {input_dir} failed"))?;

    println!();
    println!("Processed {} files: {} succeeded, {} failed", report.len(), report.succeeded(), report.failed());
    for item in report.failures() {
        println!("  ✗ {}: {}", item.path.display(), item.error.as_deref().unwrap_or("unknown error"));
    }
    Ok(())
}

fn sheet(args: &[String]) -> Result<()> {
    let [output, columns, size, inputs @ ..] = args else {
        bail!("Usage: sheet <out> <cols> <WxH> <paths...>");
    };
    let columns: u32 = columns
        .parse()
        .with_context(|| format!("Invalid column count '{columns}'"))?;
    let thumb = parse_dimensions(size).with_context(|| format!("Invalid size '{size}', expected WxH"))?;

    let mut paths: Vec<PathBuf> = Vec::new();
    for input in inputs {
        let path = PathBuf::from(input);
        if path.is_dir() {
            paths.extend(sheet_inputs(&path)?);
        } else {
            paths.push(path);
        }
    }
    if paths.is_empty() {
        bail!("No input images given");
    }

    let canvas = contact_sheet(&paths, columns, thumb)?;
    save_rgb(&canvas, output).with_context(|| format!("Failed to save {output}"))?;
    println!("✅ Contact sheet {}x{} -> {output}", canvas.width(), canvas.height());
    Ok(())
}

fn analyze_image(path: &Path) -> Result<()> {
    let image = load_rgb(path).with_context(|| format!("Failed to load {}", path.display()))?;
    let stats = analyze(&image)?;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

fn parse_dimensions(s: &str) -> Option<(u32, u32)> {
    let (w, h) = s.split_once(['x', 'X'])?;
    Some((w.trim().parse().ok()?, h.trim().parse().ok()?))
}
