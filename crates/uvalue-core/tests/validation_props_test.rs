//! Property tests for design validation and graphic geometry

use proptest::prelude::*;
use uvalue_core::geometry::{GraphicGeometry, MIN_LAYER_WIDTH};
use uvalue_core::models::{AssemblyType, Layer, MaterialCatalog};
use uvalue_core::{AssemblyDesign, ValidationIssue};

fn material() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("  ".to_string()),
        Just("Brick".to_string()),
        Just("Mineral Wool".to_string()),
    ]
}

fn thickness() -> impl Strategy<Value = f64> {
    prop_oneof![
        -50.0f64..500.0,
        Just(0.0),
        Just(f64::NAN),
        Just(f64::INFINITY),
    ]
}

fn layers() -> impl Strategy<Value = Vec<Layer>> {
    prop::collection::vec(
        (material(), thickness()).prop_map(|(m, t)| Layer::new(m, t)),
        0..12,
    )
}

fn city() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), Just("Ahmedabad".to_string())]
}

proptest! {
    #[test]
    fn empty_city_or_layers_is_never_calculable(layers in layers(), city in city()) {
        let design = AssemblyDesign { city: city.clone(), assembly: AssemblyType::Wall, layers };
        if city.is_empty() || design.layers.is_empty() {
            prop_assert!(!design.is_calculable());
            prop_assert!(design.ensure_calculable().is_err());
        }
    }

    #[test]
    fn one_issue_per_missing_material_and_bad_thickness(layers in layers()) {
        let design = AssemblyDesign {
            city: "Ahmedabad".to_string(),
            assembly: AssemblyType::RoofUp,
            layers,
        };

        let expected_materials = design.layers.iter().filter(|l| !l.has_material()).count();
        let expected_thickness = design.layers.iter().filter(|l| !l.has_valid_thickness()).count();

        let issues = design.validate();
        let mut materials = 0;
        let mut thicknesses = 0;
        let mut last_position = 0;

        for issue in &issues {
            let position = match issue {
                ValidationIssue::MissingMaterial { position } => { materials += 1; *position }
                ValidationIssue::InvalidThickness { position } => { thicknesses += 1; *position }
                ValidationIssue::NoLayers => continue,
                ValidationIssue::MissingCity => unreachable!("city is set"),
            };
            prop_assert!(position >= last_position, "issues must follow layer order");
            last_position = position;
        }

        prop_assert_eq!(materials, expected_materials);
        prop_assert_eq!(thicknesses, expected_thickness);
        prop_assert_eq!(design.is_calculable(), issues.is_empty());
    }

    #[test]
    fn validation_is_stable(layers in layers(), city in city()) {
        let design = AssemblyDesign { city, assembly: AssemblyType::Wall, layers };
        let before = design.clone();
        prop_assert_eq!(design.validate(), design.validate());
        let _ = design.to_request(Default::default());
        prop_assert_eq!(design.layers.len(), before.layers.len());
    }

    #[test]
    fn geometry_preserves_order_and_minimum_width(layers in layers(), scale in 0.1f64..5.0) {
        let design = AssemblyDesign { city: String::new(), assembly: AssemblyType::Wall, layers };
        let geometry = GraphicGeometry::compute(&design, &MaterialCatalog::new(), scale);

        prop_assert_eq!(geometry.layers.len(), design.layers.len());
        for (graphic, layer) in geometry.layers.iter().zip(&design.layers) {
            prop_assert_eq!(graphic.id, layer.id);
            prop_assert!(graphic.width >= MIN_LAYER_WIDTH);
        }

        let sum: f64 = geometry.layers.iter().map(|l| l.width).sum();
        prop_assert!((geometry.total_width - sum).abs() < 1e-6);
    }
}
