use anyhow::{Context as _, Result};
use clap::Parser;
use dota_prep::{
    config::Config,
    convert::{ConvertReport, ObbConverter},
    ratio::Ratio,
    report::Skips,
    split::TrainValSplitter,
    stats::DatasetStats,
    tiling::{Tiler, TilingReport},
};
use log::{info, LevelFilter};
use prettytable::{cell, row, Table};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

/// Dataset preparation for DOTA aerial imagery.
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
enum Opts {
    /// Convert DOTA oriented labels into normalized axis-aligned labels.
    Convert {
        /// directory of source images
        #[arg(long)]
        images_dir: PathBuf,
        /// directory of DOTA label files
        #[arg(long)]
        dota_labels_dir: PathBuf,
        /// directory to write converted label files
        #[arg(long)]
        output_labels_dir: PathBuf,
        /// keep objects flagged as difficult
        #[arg(long)]
        keep_difficult: bool,
        /// json5 configuration file
        #[arg(long)]
        config_file: Option<PathBuf>,
    },
    /// Cut images into overlapping tiles with re-projected labels.
    Tile {
        /// directory of source images
        #[arg(long)]
        images_dir: PathBuf,
        /// directory of normalized label files
        #[arg(long)]
        labels_dir: PathBuf,
        /// directory to write tile images
        #[arg(long)]
        output_images_dir: PathBuf,
        /// directory to write tile label files
        #[arg(long)]
        output_labels_dir: PathBuf,
        /// tile side length in pixels
        #[arg(long)]
        tile_size: Option<u32>,
        /// overlap of adjacent tiles in pixels
        #[arg(long)]
        overlap: Option<u32>,
        /// minimum clipped box width and height in pixels
        #[arg(long)]
        min_box_size: Option<u32>,
        /// json5 configuration file
        #[arg(long)]
        config_file: Option<PathBuf>,
    },
    /// Partition tile pairs into train and validation sets.
    Split {
        /// directory of tile images
        #[arg(long)]
        images_dir: PathBuf,
        /// directory of tile label files
        #[arg(long)]
        labels_dir: PathBuf,
        /// directory to create images/{train,val} and labels/{train,val} in
        #[arg(long)]
        output_dir: PathBuf,
        /// fraction of samples for validation
        #[arg(long)]
        val_ratio: Option<f64>,
        /// shuffle seed
        #[arg(long)]
        seed: Option<u64>,
        /// json5 configuration file
        #[arg(long)]
        config_file: Option<PathBuf>,
    },
    /// Print statistics of a labeled image set.
    Stats {
        /// directory of images
        #[arg(long)]
        images_dir: PathBuf,
        /// directory of normalized label files
        #[arg(long)]
        labels_dir: PathBuf,
        /// write the statistics as JSON to this file
        #[arg(long)]
        output_file: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    init_logger();

    match Opts::parse() {
        Opts::Convert {
            images_dir,
            dota_labels_dir,
            output_labels_dir,
            keep_difficult,
            config_file,
        } => {
            let mut config = load_config(config_file.as_deref())?;
            if keep_difficult {
                config.convert.ignore_difficult = false;
            }

            let converter = ObbConverter::new(
                images_dir,
                dota_labels_dir,
                output_labels_dir,
                &config.convert,
            )?;
            let report = converter.convert_all()?;
            print_convert_report(&report);
        }
        Opts::Tile {
            images_dir,
            labels_dir,
            output_images_dir,
            output_labels_dir,
            tile_size,
            overlap,
            min_box_size,
            config_file,
        } => {
            let mut config = load_config(config_file.as_deref())?;
            if let Some(tile_size) = tile_size {
                config.tiling.tile_size = tile_size;
            }
            if let Some(overlap) = overlap {
                config.tiling.overlap = overlap;
            }
            if let Some(min_box_size) = min_box_size {
                config.tiling.min_box_size = min_box_size;
            }

            let tiler = Tiler::new(
                images_dir,
                labels_dir,
                output_images_dir,
                output_labels_dir,
                &config.tiling,
            )?;
            let report = tiler.tile_all()?;
            print_tiling_report(&report);
        }
        Opts::Split {
            images_dir,
            labels_dir,
            output_dir,
            val_ratio,
            seed,
            config_file,
        } => {
            let mut config = load_config(config_file.as_deref())?;
            if let Some(val_ratio) = val_ratio {
                config.split.val_ratio = Ratio::try_from(val_ratio)?;
            }
            if let Some(seed) = seed {
                config.split.seed = seed;
            }

            let splitter =
                TrainValSplitter::new(images_dir, labels_dir, output_dir, &config.split)?;
            let summary = splitter.split()?;

            let mut table = Table::new();
            table.add_row(row!["subset", "samples"]);
            table.add_row(row!["train", summary.train]);
            table.add_row(row!["val", summary.val]);
            table.add_row(row!["without labels", summary.labels_missing]);
            table.printstd();
        }
        Opts::Stats {
            images_dir,
            labels_dir,
            output_file,
        } => {
            let stats = DatasetStats::compute(images_dir, labels_dir)?;
            print_stats(&stats);

            if let Some(output_file) = output_file {
                let text = serde_json::to_string_pretty(&stats)?;
                fs::write(&output_file, text)
                    .with_context(|| format!("unable to write '{}'", output_file.display()))?;
                info!("statistics saved to '{}'", output_file.display());
            }
        }
    }

    Ok(())
}

fn init_logger() {
    let mut builder = pretty_env_logger::formatted_builder();
    match env::var("RUST_LOG") {
        Ok(filters) => builder.parse_filters(&filters),
        Err(_) => builder.filter_level(LevelFilter::Info),
    };
    builder.init();
}

fn load_config(config_file: Option<&Path>) -> Result<Config> {
    match config_file {
        Some(path) => Config::open(path),
        None => Ok(Config::default()),
    }
}

fn print_convert_report(report: &ConvertReport) {
    let mut table = Table::new();
    table.add_row(row!["label files", report.files]);
    table.add_row(row!["label files written", report.files_written]);
    table.add_row(row!["objects written", report.objects_written]);
    table.add_row(row!["difficult objects dropped", report.difficult_dropped]);
    table.add_row(row!["degenerate boxes dropped", report.degenerate_dropped]);
    table.printstd();
    print_skips(&report.skips);
}

fn print_tiling_report(report: &TilingReport) {
    let mut table = Table::new();
    table.add_row(row!["images", report.images]);
    table.add_row(row!["tiles written", report.tiles_written]);
    table.add_row(row!["empty tiles discarded", report.tiles_discarded]);
    table.add_row(row!["boxes written", report.boxes_written]);
    table.printstd();
    print_skips(&report.skips);
}

fn print_skips(skips: &Skips) {
    if skips.is_empty() {
        return;
    }

    let mut table = Table::new();
    table.add_row(row!["skip reason", "count"]);
    skips.counts().for_each(|(reason, count)| {
        table.add_row(row![reason, count]);
    });
    table.printstd();
}

fn print_stats(stats: &DatasetStats) {
    {
        let mut table = Table::new();
        table.add_row(row!["images", stats.total_images]);
        table.add_row(row!["labeled objects", stats.total_objects]);
        table.add_row(row!["empty images", stats.empty_images.len()]);
        table.add_row(row!["malformed lines", stats.malformed_lines]);
        table.add_row(row!["skipped images", stats.skipped_images]);
        table.printstd();
    }

    // per-class statistics
    {
        let mut table = Table::new();
        table.add_row(row![
            "class", "name", "objects", "images", "avg w", "avg h", "avg w/h"
        ]);
        stats.classes.iter().for_each(|(class, class_stats)| {
            table.add_row(row![
                class,
                class_stats.name,
                class_stats.objects,
                class_stats.images,
                format!("{:.4}", class_stats.bbox_width_avg),
                format!("{:.4}", class_stats.bbox_height_avg),
                format!("{:.4}", class_stats.aspect_ratio_avg),
            ]);
        });
        table.printstd();
    }

    // object density
    {
        let mut table = Table::new();
        table.add_row(row!["image", "objects"]);
        stats.densest(10).into_iter().for_each(|(name, count)| {
            table.add_row(row![name, count]);
        });
        table.printstd();
    }
}
