//! czi-tiles - Inspect CZI documents and composite regions of them.

use clap::Parser;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use czi_tiles::{
    config::{Command, Config, InfoArgs, RenderArgs},
    export::write_to_path,
    format::{CziReader, OpenOptions},
    io::FileRangeReader,
    repository::SubBlockRepository,
    CodecDispatch, TileAccessor,
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    match config.command {
        Command::Info(args) => run_info(args).await,
        Command::Render(args) => run_render(args).await,
    }
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "czi_tiles=debug"
    } else {
        "czi_tiles=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn open_document(
    path: &Path,
    options: OpenOptions,
) -> Result<CziReader<FileRangeReader>, String> {
    let reader = FileRangeReader::open(path)
        .await
        .map_err(|e| format!("{}: {}", path.display(), e))?;
    CziReader::open(reader, options)
        .await
        .map_err(|e| format!("{}: {}", path.display(), e))
}

// =============================================================================
// Info Command
// =============================================================================

async fn run_info(args: InfoArgs) -> ExitCode {
    let document = match open_document(&args.file, args.open.open_options()).await {
        Ok(d) => d,
        Err(e) => {
            error!("Failed to open document: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match print_info(&document, &args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn print_info(document: &CziReader<FileRangeReader>, args: &InfoArgs) -> Result<(), String> {
    let directory = document.directory();
    let statistics = directory.statistics().map_err(|e| e.to_string())?;
    let pyramid = directory.pyramid_statistics().map_err(|e| e.to_string())?;

    let metadata = if args.metadata {
        document
            .read_metadata_xml()
            .await
            .map_err(|e| format!("Failed to read metadata: {}", e))?
    } else {
        None
    };

    if args.json {
        let json = serde_json::json!({
            "file": args.file.display().to_string(),
            "version": document.file_header().version(),
            "statistics": statistics,
            "pyramid": pyramid,
            "metadata": metadata,
        });
        let text = serde_json::to_string_pretty(&json).map_err(|e| e.to_string())?;
        println!("{}", text);
        return Ok(());
    }

    println!("File:        {}", args.file.display());
    println!("Version:     {}", document.file_header().version());
    println!("Sub-blocks:  {}", statistics.count);
    match statistics.bounding_box {
        Some(bbox) => println!("Bounds:      {}", bbox),
        None => println!("Bounds:      (empty)"),
    }
    if let Some(bbox) = statistics.bounding_box_layer0 {
        println!("Layer 0:     {}", bbox);
    }
    match statistics.m_index_range() {
        Some((min, max)) => println!("M-index:     {}..={}", min, max),
        None => println!("M-index:     (none)"),
    }
    println!("Dimensions:  {}", statistics.dim_bounds);

    for (scene, boxes) in &statistics.scene_bounding_boxes {
        let bbox = boxes
            .bounding_box
            .map(|r| r.to_string())
            .unwrap_or_else(|| "(empty)".to_string());
        println!("Scene {}:     {}", scene, bbox);
    }

    println!();
    println!("Pyramid:");
    for (scene, layers) in &pyramid.scene_pyramid_statistics {
        let label = if *scene == czi_tiles::directory::NO_SCENE_KEY {
            "no scene".to_string()
        } else {
            format!("scene {}", scene)
        };
        println!("  {}", label);
        for layer in layers {
            let info = layer.layer_info;
            if info.is_unclassified() {
                println!("    unclassified: {} sub-block(s)", layer.count);
            } else if info.is_layer0() {
                println!("    layer 0: {} sub-block(s)", layer.count);
            } else {
                println!(
                    "    layer {} (factor {}): {} sub-block(s)",
                    info.layer, info.minification_factor, layer.count
                );
            }
        }
    }

    if let Some(xml) = metadata {
        println!();
        println!("{}", xml);
    }

    Ok(())
}

// =============================================================================
// Render Command
// =============================================================================

async fn run_render(args: RenderArgs) -> ExitCode {
    let document = match open_document(&args.file, args.open.open_options()).await {
        Ok(d) => d,
        Err(e) => {
            error!("Failed to open document: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let accessor = TileAccessor::new(Arc::new(document), CodecDispatch::new());
    let options = args.accessor_options();

    info!(
        "Rendering {} of plane {} as {}",
        args.roi, args.plane, args.pixel_type
    );

    let bitmap = match accessor
        .get(args.pixel_type, args.roi, &args.plane, &options)
        .await
    {
        Ok(b) => b,
        Err(e) => {
            error!("Failed to compose region: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match write_to_path(&bitmap, &args.output, args.quality).await {
        Ok(written) => {
            info!("Wrote {} ({} bytes)", args.output.display(), written);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to write image: {}", e);
            ExitCode::FAILURE
        }
    }
}
