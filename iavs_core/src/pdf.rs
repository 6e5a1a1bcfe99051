//! # PDF Generation Module
//!
//! Renders a [`DesignSummary`] to a one-document PDF report using Typst.
//!
//! ## Architecture
//!
//! - The Typst template is embedded as a string constant
//! - Data is injected via placeholder replacement before compilation
//! - Only fonts bundled with `typst-assets` are used
//! - Output is raw PDF bytes (`Vec<u8>`)
//!
//! Rendering never touches calculation state; a failure is reported as a
//! recoverable [`CalcError::RenderFailed`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use iavs_core::calculations::summary::{calculate, DesignInput};
//! use iavs_core::pdf::render_summary_pdf;
//!
//! let summary = calculate(&DesignInput::default());
//! let pdf_bytes = render_summary_pdf(&summary).unwrap();
//! std::fs::write("iavs_summary.pdf", pdf_bytes).unwrap();
//! ```

use chrono::Utc;
use tracing::{debug, warn};
use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};
use typst_pdf::PdfOptions;

use crate::calculations::biofilter::BiofilterResult;
use crate::calculations::liner::{LinerDimensions, SheetLayout};
use crate::calculations::risk::RiskBand;
use crate::calculations::summary::DesignSummary;
use crate::errors::{CalcError, CalcResult};
use crate::units::Unit;

// ============================================================================
// Typst World Implementation
// ============================================================================

/// A minimal Typst world for compiling documents without external files.
struct PdfWorld {
    /// The main source document
    main: Source,
    /// Font book
    book: LazyHash<FontBook>,
    /// Available fonts
    fonts: Vec<Font>,
    /// Library (standard functions)
    library: LazyHash<Library>,
}

impl PdfWorld {
    fn new(source: String) -> Self {
        let fonts = Self::load_fonts();
        let book = FontBook::from_fonts(&fonts);

        PdfWorld {
            main: Source::detached(source),
            book: LazyHash::new(book),
            fonts,
            library: LazyHash::new(Library::default()),
        }
    }

    fn load_fonts() -> Vec<Font> {
        typst_assets::fonts()
            .flat_map(|font_bytes| Font::iter(Bytes::new(font_bytes.to_vec())))
            .collect()
    }
}

impl World for PdfWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &self.book
    }

    fn main(&self) -> FileId {
        self.main.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main.id() {
            Ok(self.main.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        self.fonts.get(index).cloned()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        let now = Utc::now();
        Datetime::from_ymd(
            now.format("%Y").to_string().parse().ok()?,
            now.format("%m").to_string().parse().ok()?,
            now.format("%d").to_string().parse().ok()?,
        )
    }
}

// ============================================================================
// PDF Template
// ============================================================================

/// Typst template for the design summary
const SUMMARY_TEMPLATE: &str = r##"
#set page(
  paper: "a4",
  margin: (top: 2cm, bottom: 2cm, left: 2cm, right: 2cm),
  header: align(right)[
    #text(size: 9pt, fill: gray)[iAVs System Calculator]
  ],
  footer: context [
    #line(length: 100%, stroke: 0.5pt + gray)
    #v(4pt)
    #grid(
      columns: (1fr, 1fr),
      align(left)[#text(size: 9pt)[Page #counter(page).display()]],
      align(right)[#text(size: 9pt)[{{DATE}}]],
    )
  ]
)

#set text(font: "DejaVu Sans Mono", size: 10pt)

#let band(label) = {
  if label == "Optimal" { text(fill: rgb("#1b7f3b"))[#label] }
  else if label == "Caution" { text(fill: rgb("#b58900"))[#label] }
  else { text(fill: rgb("#c0392b"))[#label] }
}

#align(center)[
  #block(width: 100%, fill: rgb("#f0f0f0"), inset: 12pt, radius: 4pt)[
    #text(size: 18pt, weight: "bold")[iAVs System Design Summary]
    #v(4pt)
    #text(size: 11pt)[Units: {{UNIT_NAME}} #h(1em) Overall: #band("{{OVERALL}}")]
  ]
]

#v(12pt)

== Fish Tank

#table(
  columns: (1fr, auto),
  inset: 6pt,
  stroke: 0.5pt,
  align: (left, right),
  table.header([*Parameter*], [*Value*]),
{{TANK_ROWS}}
)

#table(
  columns: (1fr, auto),
  inset: 6pt,
  stroke: 0.5pt,
  align: (left, center),
  table.header([*Check*], [*Rating*]),
{{RISK_ROWS}}
)

== Biofilter

#table(
  columns: (1fr, auto),
  inset: 6pt,
  stroke: 0.5pt,
  align: (left, right),
  table.header([*Parameter*], [*Value*]),
{{BIOFILTER_ROWS}}
)

== Liners

#table(
  columns: (1fr, auto, auto),
  inset: 6pt,
  stroke: 0.5pt,
  align: (left, right, right),
  table.header([*Sheet*], [*Size*], [*Area*]),
{{LINER_ROWS}}
)

{{COST_BLOCK}}

== Initial Fish Stocking

#block(width: 100%, fill: rgb("#eef6fb"), inset: 10pt, radius: 4pt)[
  #text(size: 14pt, weight: "bold")[{{STOCKING_RANGE}} fingerlings]
  #v(2pt)
  #text(size: 9pt)[Design efficiency {{EFFICIENCY}}, biofilter sufficiency {{SUFFICIENCY}}]
]

{{STOCKING_NOTE}}

== Pump

#table(
  columns: (1fr, auto),
  inset: 6pt,
  stroke: 0.5pt,
  align: (left, right),
  table.header([*Parameter*], [*Value*]),
{{PUMP_ROWS}}
)

== Design Warnings

{{WARNINGS}}

#v(16pt)
#line(length: 100%, stroke: 0.5pt)
#text(size: 8pt, fill: gray)[
  Sizing guidance only. Verify the design against the iAVs handbook before building.
]
"##;

// ============================================================================
// PDF Rendering Functions
// ============================================================================

/// Render a design summary to PDF.
///
/// # Returns
///
/// * `Ok(Vec<u8>)` - PDF file as bytes
/// * `Err(CalcError::RenderFailed)` - If Typst compilation or PDF export fails
pub fn render_summary_pdf(summary: &DesignSummary) -> CalcResult<Vec<u8>> {
    let source = build_summary_source(summary);
    let result = compile_pdf(source);
    match &result {
        Ok(bytes) => debug!(bytes = bytes.len(), "design summary rendered"),
        Err(e) => warn!(error = %e, "design summary rendering failed"),
    }
    result
}

fn compile_pdf(source: String) -> CalcResult<Vec<u8>> {
    let world = PdfWorld::new(source);

    let warned = typst::compile(&world);

    let document = warned.output.map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        CalcError::render_failed("compile", error_msgs.join("; "))
    })?;

    typst_pdf::pdf(&document, &PdfOptions::default()).map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        CalcError::render_failed("export", error_msgs.join("; "))
    })
}

/// Fill the summary template
fn build_summary_source(summary: &DesignSummary) -> String {
    let unit = summary.input.unit;
    let stocking = &summary.stocking;
    let (min_stock, max_stock) = stocking.displayed_range();

    SUMMARY_TEMPLATE
        .replace("{{DATE}}", &Utc::now().format("%Y-%m-%d").to_string())
        .replace("{{UNIT_NAME}}", &escape_typst(unit.spec().name))
        .replace("{{OVERALL}}", summary.overall_band().label())
        .replace("{{TANK_ROWS}}", &tank_rows(summary))
        .replace("{{RISK_ROWS}}", &risk_rows(summary))
        .replace("{{BIOFILTER_ROWS}}", &biofilter_rows(summary))
        .replace("{{LINER_ROWS}}", &liner_rows(summary))
        .replace("{{COST_BLOCK}}", &cost_block(summary))
        .replace("{{STOCKING_RANGE}}", &format!("{min_stock} - {max_stock}"))
        .replace("{{EFFICIENCY}}", &format!("{:.0}%", stocking.design_efficiency * 100.0))
        .replace("{{SUFFICIENCY}}", &format!("{:.0}%", stocking.sufficiency_ratio * 100.0))
        .replace("{{STOCKING_NOTE}}", &stocking_note(summary))
        .replace("{{PUMP_ROWS}}", &pump_rows(summary))
        .replace("{{WARNINGS}}", &warning_list(summary))
}

fn row(label: &str, value: &str) -> String {
    format!("  [{}], [{}],", escape_typst(label), escape_typst(value))
}

fn volume(unit: Unit, liters: f64) -> String {
    format!("{:.0} {}", unit.display_volume(liters), unit.volume_label())
}

fn container_volume(unit: Unit, bio: &BiofilterResult) -> String {
    format!(
        "{} ({:+.0}% vs target {:.0})",
        volume(unit, bio.total_biofilter_volume_liters),
        bio.container_volume_difference_percent,
        unit.display_volume(bio.target_sand_volume_liters)
    )
}

fn tank_rows(summary: &DesignSummary) -> String {
    let unit = summary.input.unit;
    let tank = &summary.input.tank;
    [
        row("Length", &unit.format_length(tank.length)),
        row("Width", &unit.format_length(tank.width)),
        row("Depth", &unit.format_length(tank.depth)),
        row("Corner radius", &unit.format_length(summary.tank.effective_corner_radius_mm)),
        row("Bottom profile", &format!("{:.0}%", tank.curve_depth)),
        row("Surface area", &unit.format_area(summary.tank.top_surface_area_m2)),
        row("Volume", &volume(unit, summary.tank.volume_liters)),
    ]
    .join("\n")
}

fn band_row(label: &str, band: RiskBand) -> String {
    format!("  [{}], [#band(\"{}\")],", escape_typst(label), band.label())
}

fn risk_rows(summary: &DesignSummary) -> String {
    let risk = &summary.tank_risk;
    [
        band_row("Depth", risk.depth),
        band_row("Corner radius", risk.corner_radius),
        band_row("Aspect ratio", risk.aspect_ratio),
        band_row("Bottom profile", risk.curve_depth),
        band_row("Sand volume", summary.biofilter.sand_volume_band),
        band_row("Biofilter surface area", summary.biofilter.surface_area_band),
        band_row("Container volume", summary.biofilter.container_volume_band),
    ]
    .join("\n")
}

fn biofilter_rows(summary: &DesignSummary) -> String {
    let unit = summary.input.unit;
    let dims = &summary.input.biofilter;
    let bio = &summary.biofilter;
    [
        row("Width", &unit.format_length(dims.width)),
        row("Length", &unit.format_length(dims.length)),
        row("Sand depth (shallow end)", &unit.format_length(dims.shallow_depth)),
        row("Sand depth (deep end)", &unit.format_length(bio.deep_depth_mm)),
        row("Slope", &format!("{:.0} cm/m", dims.slope)),
        row("Freeboard", &unit.format_length(dims.freeboard)),
        row("Container height", &unit.format_length(bio.total_container_height_mm)),
        row(
            "Surface area",
            &format!(
                "{} (target {})",
                unit.format_area(bio.surface_area_m2),
                unit.format_area(bio.target_surface_area_m2)
            ),
        ),
        row("Sand volume", &volume(unit, bio.sand_volume_liters)),
        row("Container volume", &container_volume(unit, bio)),
        row("Sand weight", &format!("{:.2} t ({:.0} kg)", bio.sand_weight_tonnes, bio.sand_weight_kg)),
    ]
    .join("\n")
}

fn sheet_row(label: &str, unit: Unit, sheet: &LinerDimensions) -> String {
    let size = format!(
        "{} x {}",
        unit.format_length(sheet.length_mm),
        unit.format_length(sheet.width_mm)
    );
    let area = format!("{:.2} {}²", sheet.area_in(unit), unit.symbol());
    format!("  [{}], [{}], [{}],", escape_typst(label), escape_typst(&size), escape_typst(&area))
}

fn liner_rows(summary: &DesignSummary) -> String {
    let unit = summary.input.unit;
    let liners = &summary.liners;
    let layout = match liners.combined.layout {
        SheetLayout::SideBySide => "Combined sheet (side by side)",
        SheetLayout::Stacked => "Combined sheet (end to end)",
    };
    [
        sheet_row("Fish tank", unit, &liners.tank),
        sheet_row("Biofilter", unit, &liners.biofilter),
        sheet_row(layout, unit, &liners.combined.dimensions()),
    ]
    .join("\n")
}

fn cost_block(summary: &DesignSummary) -> String {
    let costs = &summary.liner_costs;
    match (costs.separate_total, costs.combined_sheet) {
        (Some(separate), Some(combined)) => format!(
            "Estimated liner cost: {:.2} as two sheets, {:.2} as one combined sheet.",
            separate, combined
        ),
        _ => String::new(),
    }
}

fn stocking_note(summary: &DesignSummary) -> String {
    let stocking = &summary.stocking;
    if stocking.is_tank_too_small() {
        return "_Tanks under 500 Liters are not recommended for stocking fish._".to_string();
    }
    if stocking.adjustment_message.is_empty() {
        String::new()
    } else {
        format!("_{}_", escape_typst(&stocking.adjustment_message))
    }
}

fn pump_rows(summary: &DesignSummary) -> String {
    let unit = summary.input.unit;
    let pump = &summary.pump;
    let flow = format!(
        "{:.0} - {:.0} {}/h",
        unit.display_volume(pump.flow.min_lph),
        unit.display_volume(pump.flow.max_lph),
        unit.volume_label()
    );
    let head = if pump.head_height_overridden {
        format!("{} (manual)", unit.format_length(pump.head_height_mm))
    } else {
        unit.format_length(pump.head_height_mm)
    };
    [row("Flow rate", &flow), row("Head height", &head)].join("\n")
}

fn warning_list(summary: &DesignSummary) -> String {
    if summary.warnings.is_empty() {
        return "No design warnings.".to_string();
    }
    summary
        .warnings
        .iter()
        .map(|w| format!("- #band(\"{}\") {}", w.band().label(), escape_typst(w.message())))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Escape special Typst characters in free text
fn escape_typst(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '*' => "\\*".to_string(),
            '_' => "\\_".to_string(),
            '#' => "\\#".to_string(),
            '$' => "\\$".to_string(),
            '@' => "\\@".to_string(),
            '<' => "\\<".to_string(),
            '>' => "\\>".to_string(),
            '[' => "\\[".to_string(),
            ']' => "\\]".to_string(),
            '\\' => "\\\\".to_string(),
            '`' => "\\`".to_string(),
            _ => c.to_string(),
        })
        .collect()
}
