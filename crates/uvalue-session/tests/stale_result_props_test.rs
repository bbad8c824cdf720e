//! Property tests for result invalidation

use proptest::prelude::*;
use std::sync::Arc;
use uvalue_core::draft::MemoryDraftStore;
use uvalue_core::models::{AssemblyType, CalculationResult, Layer};
use uvalue_session::{CalcState, Completion, DesignController};

fn sample_result() -> CalculationResult {
    let branch = serde_json::json!({
        "Rsi": 0.13, "Rse": 0.04, "Rs": 0.5,
        "U_surface_to_surface": 2.0, "U_overall": 1.4,
        "heat_capacity_kJ_m2K": 50.0,
        "layers": []
    });
    let body = serde_json::json!({ "static": branch.clone(), "dynamic": branch });
    CalculationResult::from_json(&body.to_string()).unwrap()
}

#[derive(Debug, Clone)]
enum Edit {
    City(String),
    Assembly(AssemblyType),
    Thickness(f64),
    Material(String),
    Add,
    RemoveFirst,
}

fn edit_strategy() -> impl Strategy<Value = Edit> {
    prop_oneof![
        "[A-Z][a-z]{2,8}".prop_map(Edit::City),
        prop_oneof![Just(AssemblyType::Wall), Just(AssemblyType::RoofUp)].prop_map(Edit::Assembly),
        (1.0f64..500.0).prop_map(Edit::Thickness),
        "[A-Z][a-z]{2,8}".prop_map(Edit::Material),
        Just(Edit::Add),
        Just(Edit::RemoveFirst),
    ]
}

/// Apply an edit; returns whether the inputs actually changed
fn apply(controller: &mut DesignController, edit: &Edit) -> bool {
    match edit {
        Edit::City(city) => controller.set_city(city.clone()),
        Edit::Assembly(assembly) => controller.set_assembly(*assembly),
        Edit::Thickness(thickness) => {
            let mut layer = controller.design().layers[0].clone();
            layer.thickness_mm = *thickness;
            controller.update_layer(layer).unwrap()
        }
        Edit::Material(material) => {
            let mut layer = controller.design().layers[0].clone();
            layer.material = material.clone();
            controller.update_layer(layer).unwrap()
        }
        Edit::Add => {
            controller.add_layer();
            true
        }
        Edit::RemoveFirst => {
            let id = controller.design().layers[0].id;
            controller.remove_layer(id).unwrap();
            true
        }
    }
}

fn computed_controller() -> DesignController {
    let mut controller = DesignController::new(Arc::new(MemoryDraftStore::new()));
    controller.set_city("Ahmedabad");
    controller.push_layer(Layer::new("Brick", 110.0)).unwrap();
    controller.push_layer(Layer::new("Gypsum", 12.0)).unwrap();
    let pending = controller.begin_calculation().unwrap();
    controller.complete_calculation(pending.seq, sample_result());
    controller
}

proptest! {
    #[test]
    fn prop_changing_edit_clears_result(edit in edit_strategy()) {
        let mut controller = computed_controller();
        let seq = controller.seq();

        if apply(&mut controller, &edit) {
            prop_assert_eq!(controller.state(), &CalcState::Idle);
            prop_assert!(controller.result().is_none());
            prop_assert!(controller.seq() > seq);
        } else {
            prop_assert!(controller.result().is_some());
            prop_assert_eq!(controller.seq(), seq);
        }
    }

    #[test]
    fn prop_in_flight_response_after_edit_is_stale(edit in edit_strategy()) {
        let mut controller = computed_controller();
        let pending = controller.begin_calculation().unwrap();

        if apply(&mut controller, &edit) {
            let outcome = controller.complete_calculation(pending.seq, sample_result());
            prop_assert_eq!(outcome, Completion::Stale);
            prop_assert!(controller.result().is_none());
        }
    }

    #[test]
    fn prop_seq_never_decreases(edits in prop::collection::vec(edit_strategy(), 1..20)) {
        let mut controller = computed_controller();
        let mut last = controller.seq();

        for edit in &edits {
            if controller.design().layers.is_empty()
                && matches!(edit, Edit::Thickness(_) | Edit::Material(_) | Edit::RemoveFirst)
            {
                continue;
            }
            apply(&mut controller, edit);
            prop_assert!(controller.seq() >= last);
            last = controller.seq();
        }
    }
}
