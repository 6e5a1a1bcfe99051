//! # iAVs CLI Application
//!
//! Command-line front end for the iAVs sizing engine. Dimensions are given in
//! the selected display unit; anything left out keeps its default. Prints a
//! text report, optionally the JSON bundle, and optionally writes a PDF
//! summary.
//!
//! ```text
//! iavs --unit ft --tank-length 4 --tank-width 5 --tank-depth 4 --price 1.2 --pdf design.pdf
//! ```

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use iavs_core::calculations::biofilter::BiofilterResult;
use iavs_core::calculations::liner::{LinerDimensions, LinerSet, SheetLayout};
use iavs_core::calculations::risk::RiskBand;
use iavs_core::pdf::render_summary_pdf;
use iavs_core::settings::{self, InputRange};
use iavs_core::{BiofilterField, CalcResult, DesignSession, DesignSummary, TankField, Unit};

#[derive(Parser, Debug)]
#[command(name = "iavs", version, about = "Size an iAVs fish tank, sand biofilter, liners and pump")]
struct Args {
    /// Display unit: m, cm, in or ft
    #[arg(long, short, default_value = "m")]
    unit: Unit,

    /// Tank length
    #[arg(long)]
    tank_length: Option<f64>,

    /// Tank width
    #[arg(long)]
    tank_width: Option<f64>,

    /// Tank water depth
    #[arg(long)]
    tank_depth: Option<f64>,

    /// Tank corner radius (clamped to half the shortest side)
    #[arg(long)]
    corner_radius: Option<f64>,

    /// Bottom profile, 0 (flat) to 100 (full curve) percent
    #[arg(long)]
    curve_depth: Option<f64>,

    /// Biofilter width
    #[arg(long)]
    bio_width: Option<f64>,

    /// Biofilter length
    #[arg(long)]
    bio_length: Option<f64>,

    /// Sand depth at the shallow end of the biofilter
    #[arg(long)]
    sand_depth: Option<f64>,

    /// Biofilter freeboard above the sand
    #[arg(long)]
    freeboard: Option<f64>,

    /// Biofilter floor slope in cm per m
    #[arg(long)]
    slope: Option<f64>,

    /// Leave the overlap margin off the tank liner
    #[arg(long)]
    no_tank_overlap: bool,

    /// Leave the overlap margin off the biofilter liner
    #[arg(long)]
    no_biofilter_overlap: bool,

    /// Tank liner overlap (defaults to the unit's standard margin)
    #[arg(long)]
    tank_overlap: Option<f64>,

    /// Biofilter liner overlap (defaults to the unit's standard margin)
    #[arg(long)]
    biofilter_overlap: Option<f64>,

    /// Liner price per square unit; enables cost estimates
    #[arg(long)]
    price: Option<f64>,

    /// Pump head height (defaults to the biofilter container height)
    #[arg(long)]
    head_height: Option<f64>,

    /// Also show liners with corner, curve and slope allowances
    #[arg(long)]
    precise: bool,

    /// Prompt for tank and biofilter dimensions not given as flags
    #[arg(long, short)]
    interactive: bool,

    /// Print the full result bundle as JSON
    #[arg(long)]
    json: bool,

    /// Write a PDF summary to this path
    #[arg(long)]
    pdf: Option<PathBuf>,
}

fn prompt_f64(prompt: &str, default: f64) -> f64 {
    print!("{}", prompt);
    if io::stdout().flush().is_err() {
        return default;
    }

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return default;
    }

    input.trim().parse().unwrap_or(default)
}

/// Flag value, else an interactive prompt, else nothing
fn resolve(flag: Option<f64>, interactive: bool, label: &str, suffix: &str, current: f64) -> Option<f64> {
    match flag {
        Some(value) => Some(value),
        None if interactive => Some(prompt_f64(&format!("{} ({}) [{:.2}]: ", label, suffix, current), current)),
        None => None,
    }
}

/// Clamp to an input range the way a slider would, logging the correction
fn clamped(field: &str, value: f64, range: InputRange) -> f64 {
    let result = range.clamp(value);
    if result != value {
        warn!(field, requested = value, used = result, "value outside input range, clamped");
    }
    result
}

fn build_session(args: &Args) -> CalcResult<DesignSession> {
    let mut session = DesignSession::new();
    session.set_unit(args.unit);
    let unit = args.unit;
    let sym = unit.symbol();
    let interactive = args.interactive;

    let tank_ranges = settings::tank_ranges(unit);
    let tank_fields = [
        (TankField::Length, args.tank_length, "Tank length", tank_ranges.footprint),
        (TankField::Width, args.tank_width, "Tank width", tank_ranges.footprint),
        (TankField::Depth, args.tank_depth, "Tank depth", tank_ranges.depth),
    ];
    for (field, flag, label, range) in tank_fields {
        if let Some(value) = resolve(flag, interactive, label, sym, session.tank_field(field)) {
            session.set_tank_field(field, clamped(label, value, range))?;
        }
    }

    // radius range depends on the footprint set above
    let current = session.tank_field(TankField::CornerRadius);
    if let Some(value) = resolve(args.corner_radius, interactive, "Corner radius", sym, current) {
        let range = settings::corner_radius_range(session.tank(), unit);
        session.set_tank_field(TankField::CornerRadius, clamped("Corner radius", value, range))?;
    }
    let current = session.tank_field(TankField::CurveDepth);
    if let Some(value) = resolve(args.curve_depth, interactive, "Bottom profile", "%", current) {
        session.set_tank_field(
            TankField::CurveDepth,
            clamped("Bottom profile", value, settings::CURVE_DEPTH_RANGE),
        )?;
    }

    let bio_ranges = settings::biofilter_ranges(unit);
    let bio_fields = [
        (BiofilterField::Width, args.bio_width, "Biofilter width", sym, bio_ranges.width),
        (BiofilterField::Length, args.bio_length, "Biofilter length", sym, bio_ranges.length),
        (BiofilterField::ShallowDepth, args.sand_depth, "Sand depth", sym, bio_ranges.shallow_depth),
        (BiofilterField::Freeboard, args.freeboard, "Freeboard", sym, bio_ranges.freeboard),
        (BiofilterField::Slope, args.slope, "Slope", "cm/m", settings::SLOPE_RANGE),
    ];
    for (field, flag, label, suffix, range) in bio_fields {
        if let Some(value) = resolve(flag, interactive, label, suffix, session.biofilter_field(field)) {
            session.set_biofilter_field(field, clamped(label, value, range))?;
        }
    }

    session.set_tank_overlap_enabled(!args.no_tank_overlap);
    session.set_biofilter_overlap_enabled(!args.no_biofilter_overlap);
    if let Some(amount) = args.tank_overlap {
        session.set_tank_overlap_amount(amount)?;
    }
    if let Some(amount) = args.biofilter_overlap {
        session.set_biofilter_overlap_amount(amount)?;
    }

    if let Some(price) = args.price {
        session.set_pricing_enabled(true);
        session.set_price(price)?;
    }

    if let Some(head) = args.head_height {
        session.set_head_height(clamped("Head height", head, settings::head_height_range(unit)))?;
    }

    Ok(session)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let session = match build_session(&args) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            return ExitCode::FAILURE;
        }
    };

    let summary = session.summary();
    print_report(&summary, args.precise);

    if args.json {
        println!();
        println!("JSON Output (for API use):");
        match summary.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    if let Some(path) = &args.pdf {
        match render_summary_pdf(&summary) {
            Ok(bytes) => match std::fs::write(path, bytes) {
                Ok(()) => println!("PDF summary written to {}", path.display()),
                Err(e) => {
                    eprintln!("Error: could not write {}: {}", path.display(), e);
                    return ExitCode::FAILURE;
                }
            },
            Err(e) if e.is_recoverable() => {
                eprintln!("Error: {}", e);
                eprintln!("The report above is still valid; fix the problem and run again to get the PDF.");
                return ExitCode::FAILURE;
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}

fn print_report(summary: &DesignSummary, precise: bool) {
    let unit = summary.input.unit;
    let tank = &summary.input.tank;
    let bio = &summary.input.biofilter;
    let display = &summary.display;
    let volume_label = &display.volume_label;

    println!("═══════════════════════════════════════");
    println!("  iAVs SYSTEM DESIGN ({})", unit.spec().name);
    println!("═══════════════════════════════════════");
    println!();
    println!("Fish Tank:");
    println!(
        "  Size:     {} x {} x {} deep",
        unit.format_length(tank.length),
        unit.format_length(tank.width),
        unit.format_length(tank.depth)
    );
    println!(
        "  Corners:  {} radius (max {:.2}, optimal {:.2}-{:.2})",
        unit.format_length(summary.tank.effective_corner_radius_mm),
        display.max_corner_radius,
        display.optimal_radius_range.0,
        display.optimal_radius_range.1
    );
    println!("  Bottom:   {:.0}% curve", tank.curve_depth);
    println!("  Area:     {}", unit.format_area(summary.tank.top_surface_area_m2));
    println!("  Volume:   {:.0} {}", display.tank_volume, volume_label);
    println!();
    println!("Tank Checks:");
    let risk = &summary.tank_risk;
    println!("  Depth:         {}", status_icon(risk.depth));
    println!("  Corner radius: {}", status_icon(risk.corner_radius));
    match risk.aspect_ratio_value {
        Some(ratio) => println!("  Aspect ratio:  {:.2} {}", ratio, status_icon(risk.aspect_ratio)),
        None => println!("  Aspect ratio:  n/a {}", status_icon(risk.aspect_ratio)),
    }
    println!("  Bottom:        {}", status_icon(risk.curve_depth));
    println!();

    let result = &summary.biofilter;
    println!("Biofilter:");
    println!(
        "  Size:     {} x {}, slope {:.0} cm/m",
        unit.format_length(bio.width),
        unit.format_length(bio.length),
        bio.slope
    );
    println!(
        "  Sand:     {} to {} deep",
        unit.format_length(bio.shallow_depth),
        unit.format_length(result.deep_depth_mm)
    );
    println!("  Height:   {} incl. freeboard", unit.format_length(result.total_container_height_mm));
    println!("  Area:     {}", area_line(unit, result));
    println!(
        "  Sand:     {:.0} {} ({:.2} t) {}",
        unit.display_volume(result.sand_volume_liters),
        volume_label,
        result.sand_weight_tonnes,
        status_icon(result.sand_volume_band)
    );
    println!("  Volume:   {}", container_volume_line(unit, result));
    println!();

    print_liners("Liners:", unit, &summary.liners);
    if precise {
        print_liners("Liners (with corner, curve and slope allowance):", unit, &summary.precise_liners);
    }
    let costs = &summary.liner_costs;
    if let (Some(tank_cost), Some(bio_cost), Some(separate), Some(combined)) =
        (costs.tank, costs.biofilter, costs.separate_total, costs.combined_sheet)
    {
        println!("Liner Cost:");
        println!("  Tank:      {:.2}", tank_cost);
        println!("  Biofilter: {:.2}", bio_cost);
        println!("  Separate:  {:.2}", separate);
        println!("  Combined:  {:.2}", combined);
        println!();
    }

    let stocking = &summary.stocking;
    let (min_stock, max_stock) = stocking.displayed_range();
    println!("Fish Stocking:");
    println!("  Fingerlings: {} - {}", min_stock, max_stock);
    println!(
        "  Efficiency:  {:.0}%  Biofilter sufficiency: {:.0}%",
        stocking.design_efficiency * 100.0,
        stocking.sufficiency_ratio * 100.0
    );
    if !stocking.adjustment_message.is_empty() {
        println!("  {}", stocking.adjustment_message);
    }
    println!();

    let pump = &summary.pump;
    println!("Pump:");
    println!(
        "  Flow:   {:.0} - {:.0} {}/h",
        unit.display_volume(pump.flow.min_lph),
        unit.display_volume(pump.flow.max_lph),
        volume_label
    );
    println!(
        "  Head:   {}{}",
        unit.format_length(pump.head_height_mm),
        if pump.head_height_overridden { " (manual)" } else { "" }
    );
    println!();

    if !summary.warnings.is_empty() {
        println!("Warnings:");
        for warning in &summary.warnings {
            println!("  {} {}", status_icon(warning.band()), warning);
        }
        println!();
    }

    println!("═══════════════════════════════════════");
    println!("  OVERALL: {}", summary.overall_band().label().to_uppercase());
    println!("═══════════════════════════════════════");
}

fn area_line(unit: Unit, result: &BiofilterResult) -> String {
    format!(
        "{} (target {}) {}",
        unit.format_area(result.surface_area_m2),
        unit.format_area(result.target_surface_area_m2),
        status_icon(result.surface_area_band)
    )
}

/// Container volume with its signed difference from twice the tank volume
fn container_volume_line(unit: Unit, result: &BiofilterResult) -> String {
    format!(
        "{:.0} {} ({:+.0}% vs target {:.0}) {}",
        unit.display_volume(result.total_biofilter_volume_liters),
        unit.volume_label(),
        result.container_volume_difference_percent,
        unit.display_volume(result.target_sand_volume_liters),
        status_icon(result.container_volume_band)
    )
}

fn print_liners(title: &str, unit: Unit, liners: &LinerSet) {
    println!("{}", title);
    println!("  Tank:      {}", sheet(unit, &liners.tank));
    println!("  Biofilter: {}", sheet(unit, &liners.biofilter));
    let layout = match liners.combined.layout {
        SheetLayout::SideBySide => "side by side",
        SheetLayout::Stacked => "end to end",
    };
    println!("  Combined:  {} ({})", sheet(unit, &liners.combined.dimensions()), layout);
    println!();
}

fn sheet(unit: Unit, liner: &LinerDimensions) -> String {
    format!(
        "{} x {} = {:.2} {}²",
        unit.format_length(liner.length_mm),
        unit.format_length(liner.width_mm),
        liner.area_in(unit),
        unit.symbol()
    )
}

fn status_icon(band: RiskBand) -> &'static str {
    match band {
        RiskBand::Optimal => "[OK]",
        RiskBand::Caution => "[CAUTION]",
        RiskBand::Danger => "[DANGER]",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iavs_core::{calculate, DesignInput};

    #[test]
    fn test_container_volume_line() {
        let summary = calculate(&DesignInput::default());
        assert_eq!(
            container_volume_line(Unit::M, &summary.biofilter),
            "2400 Liters (+20% vs target 2002) [OK]"
        );

        let input = DesignInput { unit: Unit::Ft, ..DesignInput::default() };
        let summary = calculate(&input);
        let line = container_volume_line(Unit::Ft, &summary.biofilter);
        assert!(line.starts_with("634 Gallons (+20% vs target 529)"), "{line}");
    }

    #[test]
    fn test_area_line_follows_unit() {
        let summary = calculate(&DesignInput::default());
        assert!(area_line(Unit::M, &summary.biofilter).starts_with("6.00 m² (target 6.01 m²)"));
        assert!(area_line(Unit::Ft, &summary.biofilter).starts_with("64.58 ft² (target 64.64 ft²)"));
    }
}
