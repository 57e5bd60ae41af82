use clap::{Parser, Subcommand};
use qr_locator::Locator;
use qr_locator::pipeline::{CandidateOutcome, locate_traced};
use qr_locator::tools::{
    annotate, binary_stats, dataset_iter, detection_rate, evaluate_dataset, grayscale_and_binary,
    grayscale_stats, load_rgb, locate_image, save_rgb, write_eval_csv,
};
use qr_locator::error::LocateError;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "qrtool", version, about = "QR position-box locator tools")]
struct Cli {
    /// Enable debug logging (RUST_LOG still takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Locate a QR code in a single image
    Detect {
        #[arg(long)]
        image: PathBuf,
        /// Save a copy with the bounding box drawn
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print grayscale/binary stats and every candidate's validation outcome
    DebugDetect {
        #[arg(long)]
        image: PathBuf,
    },
    /// Run over a directory of images and write a results CSV
    Eval {
        #[arg(long)]
        root: PathBuf,
        #[arg(long, default_value = "results/self.csv")]
        csv: PathBuf,
        /// Directory for annotated copies
        #[arg(long)]
        out_dir: Option<PathBuf>,
        #[arg(long)]
        limit: Option<usize>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let locator = Locator::from_env();
    let result = match cli.command {
        Command::Detect { image, out } => detect_cmd(&locator, &image, out.as_deref()),
        Command::DebugDetect { image } => debug_detect_cmd(&locator, &image),
        Command::Eval {
            root,
            csv,
            out_dir,
            limit,
        } => eval_cmd(&locator, &root, &csv, out_dir.as_deref(), limit),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn detect_cmd(locator: &Locator, image: &Path, out: Option<&Path>) -> Result<(), LocateError> {
    let mut img = load_rgb(image)?;
    let start = Instant::now();
    let detection = locate_image(locator, &img);
    let elapsed = start.elapsed();

    println!("Image: {} ({}x{})", image.display(), img.width(), img.height());
    println!("Position boxes accepted: {}", detection.accepted);
    match detection.bounding_box() {
        Some(rect) => {
            println!(
                "QR code at ({:.1}, {:.1}), {:.1}x{:.1} (area {:.0}), angle {:.1} deg",
                rect.center.x,
                rect.center.y,
                rect.width,
                rect.height,
                rect.area(),
                rect.angle
            );
        }
        None => println!("No QR code located"),
    }
    println!("Took {:.2} ms", elapsed.as_secs_f64() * 1000.0);

    if let Some(out) = out {
        annotate(&mut img, &detection);
        save_rgb(&img, out)?;
        println!("Saved {}", out.display());
    }
    Ok(())
}

fn debug_detect_cmd(locator: &Locator, image: &Path) -> Result<(), LocateError> {
    let img = load_rgb(image)?;
    let (width, height) = (img.width() as usize, img.height() as usize);
    println!("Image: {} ({}x{})", image.display(), width, height);

    let (gray, binary) = grayscale_and_binary(&img);
    let gray_stats = grayscale_stats(&gray);
    println!(
        "Grayscale range: {}-{}, average: {}",
        gray_stats.min, gray_stats.max, gray_stats.avg
    );
    let stats = binary_stats(&binary);
    println!(
        "Binary: dark_pixels={} total={} dark_ratio={:.2}%",
        stats.dark_pixels,
        stats.total_pixels,
        stats.dark_ratio * 100.0
    );

    let trace = locate_traced(&gray, width, height, locator.config());
    println!(
        "Contours: {}, candidates after shape filter: {}",
        trace.contour_count,
        trace.candidates.len()
    );
    for report in &trace.candidates {
        let marker = if report.outcome == CandidateOutcome::Accepted {
            "*"
        } else {
            " "
        };
        println!(
            " {} contour {:>4}: center=({:.1}, {:.1}) size={:.1}x{:.1} angle={:.1} -> {:?}",
            marker,
            report.contour_index,
            report.rect.center.x,
            report.rect.center.y,
            report.rect.width,
            report.rect.height,
            report.rect.angle,
            report.outcome
        );
    }
    println!(
        "Position boxes accepted: {} ({})",
        trace.detection.accepted,
        if trace.detection.is_empty() {
            "detection failed"
        } else {
            "QR code located"
        }
    );
    Ok(())
}

fn eval_cmd(
    locator: &Locator,
    root: &Path,
    csv: &Path,
    out_dir: Option<&Path>,
    limit: Option<usize>,
) -> Result<(), LocateError> {
    let images: Vec<PathBuf> = dataset_iter(root, limit).collect();
    println!("Evaluating {} images under {}", images.len(), root.display());

    let start = Instant::now();
    let records = evaluate_dataset(locator, &images, out_dir)?;
    for record in &records {
        println!(
            "  {:<32} {} (boxes: {})",
            record.name,
            if record.detected { "OK  " } else { "FAIL" },
            record.accepted
        );
    }

    if let Some(parent) = csv.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(csv)?);
    write_eval_csv(&mut writer, "self", &records)?;

    println!(
        "\nResult: {}/{} ({:.1}%) in {:.2}s, CSV written to {}",
        records.iter().filter(|r| r.detected).count(),
        records.len(),
        detection_rate(&records),
        start.elapsed().as_secs_f64(),
        csv.display()
    );
    Ok(())
}
