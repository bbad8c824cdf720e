//! Shared human and JSON rendering of designs and results

use crate::output::OutputWriter;
use crate::output_types::{DraftOutput, LayerRow, ResultLayerRow, SummaryRow};
use uvalue_core::assets::description_image_url;
use uvalue_core::geometry::GraphicGeometry;
use uvalue_core::models::{CalculationResult, FilmCoefficients, MaterialCatalog, ThermalBranch};
use uvalue_core::AssemblyDesign;

pub fn draft_output(design: &AssemblyDesign, catalog: &MaterialCatalog, scale: f64) -> DraftOutput {
    let geometry = GraphicGeometry::compute(design, catalog, scale);
    let problems: Vec<String> = design.validate().iter().map(ToString::to_string).collect();

    DraftOutput {
        city: design.city.clone(),
        assembly: design.assembly.as_str().to_string(),
        layers: geometry
            .layers
            .iter()
            .enumerate()
            .map(|(i, layer)| LayerRow {
                position: i + 1,
                id: layer.id.to_string(),
                material: catalog.resolve(&layer.material).display_name().to_string(),
                thickness_mm: layer.thickness_mm,
                width: layer.width,
            })
            .collect(),
        total_thickness_mm: geometry.total_thickness_mm,
        total_width: geometry.total_width,
        ruler_ticks: geometry.ticks,
        calculable: problems.is_empty(),
        problems,
    }
}

/// Print a design summary in human mode
pub fn print_draft(draft: DraftOutput, output: &OutputWriter) {
    output.section("Design");
    output.kv("City", if draft.city.is_empty() { "(not set)" } else { draft.city.as_str() });
    output.kv("Assembly", &draft.assembly);
    output.kv("Total thickness", format!("{} mm", draft.total_thickness_mm));

    output.section("Layers (outside → inside)");
    output.table(draft.layers);

    if !draft.ruler_ticks.is_empty() {
        let ticks: Vec<String> = draft.ruler_ticks.iter().map(|t| format!("{}mm", t.mm)).collect();
        output.kv("Ruler", ticks.join(" | "));
    }

    if draft.calculable {
        output.success("Ready to calculate");
    } else {
        for problem in &draft.problems {
            output.warning(problem);
        }
    }
}

/// Print per-layer and summary tables for a result
pub fn print_result(
    result: &CalculationResult,
    catalog: &MaterialCatalog,
    films: FilmCoefficients,
    backend_base: &str,
    output: &OutputWriter,
) {
    output.section(format!("Layers ({})", method_label(&result.dynamic, "Dynamic")));
    let rows: Vec<ResultLayerRow> = result
        .dynamic
        .layers
        .iter()
        .map(|layer| {
            let entry = catalog.resolve(&layer.material).entry();
            ResultLayerRow {
                material: layer.material.clone(),
                thickness_mm: layer.thickness_mm,
                conductivity: layer.conductivity,
                density: entry.and_then(|e| e.density),
                resistance: layer.resistance,
                description_image: entry
                    .and_then(|e| e.description_image())
                    .and_then(|file| description_image_url(backend_base, file)),
            }
        })
        .collect();
    output.table(rows);

    output.section("Summary");
    output.table(summary_rows(&result.static_branch, &result.dynamic));

    if films.is_known() {
        output.kv("Film coefficients", format!("Hi {} / Ho {} W/m²·K", films.hi, films.ho));
    }
}

fn summary_rows(static_branch: &ThermalBranch, dynamic: &ThermalBranch) -> Vec<SummaryRow> {
    let row = |metric: &str, s: Option<f64>, d: Option<f64>| SummaryRow {
        metric: metric.to_string(),
        static_value: s.map(round4),
        dynamic_value: d.map(round4),
    };

    vec![
        row("Rsi (m²·K/W)", Some(static_branch.rsi), Some(dynamic.rsi)),
        row("Rse (m²·K/W)", Some(static_branch.rse), Some(dynamic.rse)),
        row("Rs (m²·K/W)", static_branch.rs, dynamic.rs),
        row(
            "U surface-to-surface (W/m²·K)",
            Some(static_branch.u_surface_to_surface),
            Some(dynamic.u_surface_to_surface),
        ),
        row("U overall (W/m²·K)", Some(static_branch.u_overall), Some(dynamic.u_overall)),
        row("Heat capacity (kJ/m²·K)", static_branch.heat_capacity, dynamic.heat_capacity),
    ]
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

fn method_label<'a>(branch: &'a ThermalBranch, fallback: &'a str) -> &'a str {
    if branch.method.trim().is_empty() {
        fallback
    } else {
        &branch.method
    }
}
