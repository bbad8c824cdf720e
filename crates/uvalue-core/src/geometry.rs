//! Graphic geometry for the section drawing and its ruler

use crate::assembly::AssemblyDesign;
use crate::models::{LayerId, MaterialCatalog};
use serde::Serialize;

/// Display units per millimeter when nothing else is configured
pub const DEFAULT_SCALE: f64 = 2.0;

/// Smallest width a layer is drawn with, so thin layers stay visible
pub const MIN_LAYER_WIDTH: f64 = 1.0;

/// Spacing of intermediate ruler ticks
pub const RULER_TICK_INTERVAL_MM: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphicLayer {
    pub id: LayerId,
    pub material: String,
    pub thickness_mm: f64,
    pub width: f64,
    pub graphic_image: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RulerTick {
    pub mm: f64,
    pub offset: f64,
}

/// Layers in drawing order (outside face first) plus ruler totals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphicGeometry {
    pub layers: Vec<GraphicLayer>,
    pub total_thickness_mm: f64,
    pub total_width: f64,
    pub ticks: Vec<RulerTick>,
}

impl GraphicGeometry {
    pub fn compute(design: &AssemblyDesign, catalog: &MaterialCatalog, scale: f64) -> Self {
        let layers: Vec<GraphicLayer> = design
            .layers
            .iter()
            .map(|layer| GraphicLayer {
                id: layer.id,
                material: layer.material.clone(),
                thickness_mm: layer.thickness_mm,
                width: layer_width(layer.thickness_mm, scale),
                graphic_image: catalog
                    .resolve(&layer.material)
                    .entry()
                    .and_then(|entry| entry.graphic_image())
                    .map(str::to_string),
            })
            .collect();

        let total_thickness_mm = design.total_thickness_mm();
        let total_width = layers.iter().map(|layer| layer.width).sum();
        let ticks = ruler_ticks(total_width, total_thickness_mm, RULER_TICK_INTERVAL_MM);

        Self { layers, total_thickness_mm, total_width, ticks }
    }
}

/// Width proportional to thickness, never below [`MIN_LAYER_WIDTH`]
pub fn layer_width(thickness_mm: f64, scale: f64) -> f64 {
    let width = thickness_mm * scale;
    if width.is_finite() && width > MIN_LAYER_WIDTH {
        width
    } else {
        MIN_LAYER_WIDTH
    }
}

/// Intermediate ruler ticks every `interval_mm`, positioned in display units
pub fn ruler_ticks(total_width: f64, total_thickness_mm: f64, interval_mm: f64) -> Vec<RulerTick> {
    if total_thickness_mm.is_nan() || total_thickness_mm <= 0.0 || interval_mm <= 0.0 || !total_width.is_finite() {
        return Vec::new();
    }

    let per_mm = total_width / total_thickness_mm;
    let count = (total_thickness_mm / interval_mm).floor() as usize;

    (1..=count)
        .map(|i| {
            let mm = i as f64 * interval_mm;
            RulerTick { mm, offset: mm * per_mm }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Layer, MaterialEntry};

    #[test]
    fn test_widths_follow_thickness() {
        let design = AssemblyDesign {
            city: String::new(),
            assembly: Default::default(),
            layers: vec![Layer::new("Brick", 110.0), Layer::new("Foil", 0.2)],
        };
        let geometry = GraphicGeometry::compute(&design, &MaterialCatalog::new(), 2.0);

        assert_eq!(geometry.layers[0].width, 220.0);
        assert_eq!(geometry.layers[1].width, MIN_LAYER_WIDTH);
        assert_eq!(geometry.total_width, 221.0);
        assert!((geometry.total_thickness_mm - 110.2).abs() < 1e-9);
    }

    #[test]
    fn test_graphic_image_from_catalog() {
        let mut brick = MaterialEntry::new("Brick");
        brick.graphic_image = Some("brick.png".to_string());
        let catalog = MaterialCatalog::from_entries(vec![brick]);

        let design = AssemblyDesign {
            city: String::new(),
            assembly: Default::default(),
            layers: vec![Layer::new("Brick", 110.0), Layer::new("Mystery", 10.0)],
        };
        let geometry = GraphicGeometry::compute(&design, &catalog, DEFAULT_SCALE);

        assert_eq!(geometry.layers[0].graphic_image.as_deref(), Some("brick.png"));
        assert_eq!(geometry.layers[1].graphic_image, None);
    }

    #[test]
    fn test_ruler_ticks() {
        let ticks = ruler_ticks(200.0, 160.0, 50.0);
        let mm: Vec<f64> = ticks.iter().map(|t| t.mm).collect();
        assert_eq!(mm, vec![50.0, 100.0, 150.0]);
        assert_eq!(ticks[0].offset, 62.5);

        assert!(ruler_ticks(200.0, 0.0, 50.0).is_empty());
        assert!(ruler_ticks(200.0, 40.0, 50.0).is_empty());
    }

    #[test]
    fn test_empty_design_has_empty_geometry() {
        let geometry =
            GraphicGeometry::compute(&AssemblyDesign::new(), &MaterialCatalog::new(), DEFAULT_SCALE);
        assert!(geometry.layers.is_empty());
        assert_eq!(geometry.total_width, 0.0);
        assert!(geometry.ticks.is_empty());
    }
}
