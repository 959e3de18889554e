//! vision-tokens — 图像输入 Token 与费用计算命令行工具
//!
//! Usage:
//!   vision-tokens calc --model <name> [--models <file>] [--json] <W>x<H>[*N] ...
//!   vision-tokens models [--models <file>]
//!   vision-tokens version

use anyhow::{anyhow, bail, Context};
use std::path::PathBuf;

use vision_token_calc::tokens::recalculate;
use vision_token_calc::{BillingScheme, ImageRecord, ModelCatalog};

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let result = match args[1].as_str() {
        "calc" => cmd_calc(&args[2..]),
        "models" => cmd_models(&args[2..]),
        "version" | "--version" | "-V" => {
            cmd_version();
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn print_usage() {
    println!(
        r#"vision-tokens — 图像 Token 计算工具

USAGE:
    vision-tokens <COMMAND> [OPTIONS]

COMMANDS:
    calc --model <name> <W>x<H>[*N] ...   Calculate tokens and cost for images
         [--models <file>] [--json]        (*N bills the image N times)
    models [--models <file>]              List known models
    version                               Show version information
    help                                  Show this help message

ENVIRONMENT:
    VISION_TOKENS_MODELS                  Catalog file overlaid on the built-in models
    RUST_LOG                              Log filter (e.g. debug)"#
    );
}

fn cmd_version() {
    println!("vision-tokens {}", env!("CARGO_PKG_VERSION"));
}

struct CalcArgs {
    model: String,
    models_file: Option<PathBuf>,
    json: bool,
    images: Vec<ImageRecord>,
}

fn parse_calc_args(args: &[String]) -> anyhow::Result<CalcArgs> {
    let mut model = None;
    let mut models_file = None;
    let mut json = false;
    let mut images = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--model" | "-m" => {
                model = Some(iter.next().ok_or_else(|| anyhow!("--model needs a value"))?.clone());
            }
            "--models" => {
                let path = iter.next().ok_or_else(|| anyhow!("--models needs a path"))?;
                models_file = Some(PathBuf::from(path));
            }
            "--json" => json = true,
            spec => images.push(parse_image(spec)?),
        }
    }

    let model = model.ok_or_else(|| anyhow!("missing --model <name>"))?;
    if images.is_empty() {
        bail!("no images given (expected e.g. 1024x768 or 1024x768*2)");
    }
    Ok(CalcArgs {
        model,
        models_file,
        json,
        images,
    })
}

/// `WxH` or `WxH*N`.
fn parse_image(spec: &str) -> anyhow::Result<ImageRecord> {
    let (size, multiplier) = match spec.split_once('*') {
        Some((size, n)) => (
            size,
            n.parse::<u32>()
                .with_context(|| format!("invalid multiplier in '{spec}'"))?,
        ),
        None => (spec, 1),
    };
    let (w, h) = size
        .split_once(['x', 'X'])
        .ok_or_else(|| anyhow!("invalid image '{spec}' (expected WxH)"))?;
    let width = w
        .trim()
        .parse::<u32>()
        .with_context(|| format!("invalid width in '{spec}'"))?;
    let height = h
        .trim()
        .parse::<u32>()
        .with_context(|| format!("invalid height in '{spec}'"))?;
    Ok(ImageRecord::new(width, height).with_multiplier(multiplier))
}

fn load_catalog(models_file: Option<&PathBuf>) -> anyhow::Result<ModelCatalog> {
    let mut catalog = ModelCatalog::load()?;
    if let Some(path) = models_file {
        let extra = ModelCatalog::from_path(path)
            .with_context(|| format!("loading {}", path.display()))?;
        catalog.merge(extra);
    }
    Ok(catalog)
}

fn resolve_models_flag(args: &[String]) -> Option<PathBuf> {
    for (i, arg) in args.iter().enumerate() {
        if arg == "--models" {
            if let Some(path) = args.get(i + 1) {
                return Some(PathBuf::from(path));
            }
        }
    }
    None
}

fn cmd_calc(args: &[String]) -> anyhow::Result<()> {
    let args = parse_calc_args(args)?;
    let catalog = load_catalog(args.models_file.as_ref())?;
    let model = catalog.require(&args.model)?;
    let calc = recalculate(model, &args.images)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&calc)?);
        return Ok(());
    }

    println!(
        "Model: {} ({}, ${}/M tokens)",
        model.name,
        model.calculation_type().as_str(),
        model.cost_per_million_tokens
    );
    let unit = match model.scheme {
        BillingScheme::Tile(_) => "tiles",
        BillingScheme::Patch(_) => "patches",
    };
    for (i, image) in calc.images.iter().enumerate() {
        if let Some(est) = image.estimate {
            println!(
                "  [{}] {}x{} x{} -> {}x{}, {}x{} {} ({} total), {} tokens",
                i,
                image.width,
                image.height,
                image.multiplier,
                est.resized_width,
                est.resized_height,
                est.tiles_wide,
                est.tiles_high,
                unit,
                est.total_tiles,
                est.tokens
            );
        }
    }
    if let BillingScheme::Tile(t) = model.scheme {
        println!("  base tokens: {}", t.base_tokens);
    }
    println!("Total tokens: {}", calc.total_tokens);
    println!("Total cost:   ${}", calc.total_cost);
    Ok(())
}

fn cmd_models(args: &[String]) -> anyhow::Result<()> {
    let catalog = load_catalog(resolve_models_flag(args).as_ref())?;
    println!("{:<16} {:<6} {:>10}  parameters", "MODEL", "TYPE", "$/M");
    for model in catalog.iter() {
        let params = match model.scheme {
            BillingScheme::Tile(t) => format!(
                "{} tokens/tile, base {}, max {}px, short side {}px, tile {}px",
                t.tokens_per_tile,
                t.base_tokens,
                t.max_image_dimension,
                t.image_min_size_length,
                t.tile_size_length
            ),
            BillingScheme::Patch(p) => format!(
                "patch {}px, max {} patches, x{}",
                p.patch_size, p.max_patches, p.multiplier
            ),
        };
        println!(
            "{:<16} {:<6} {:>10.2}  {}",
            model.name,
            model.calculation_type().as_str(),
            model.cost_per_million_tokens,
            params
        );
    }
    Ok(())
}
