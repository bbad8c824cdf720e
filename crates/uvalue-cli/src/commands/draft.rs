//! Draft editing commands

use super::render::{draft_output, print_draft};
use super::CommandEnv;
use crate::cli::{DraftArgs, DraftCommand};
use crate::errors::layer_not_found;
use crate::output::OutputWriter;
use anyhow::Result;
use uvalue_core::models::{Layer, LayerId, MaterialCatalog};
use uvalue_core::ports::DraftStore;
use uvalue_core::AssemblyDesign;
use uvalue_session::DesignController;

pub fn execute(args: DraftArgs, env: &CommandEnv, output: &OutputWriter) -> Result<()> {
    if let DraftCommand::Clear = args.command {
        env.drafts().clear().map_err(|e| env.explain(e))?;
        output.success(format!("Cleared draft {}", env.draft_path.display()));
        return Ok(());
    }

    let mut controller = env.controller();

    match args.command {
        DraftCommand::Show | DraftCommand::Clear => {}
        DraftCommand::SetCity(args) => {
            if controller.set_city(args.city.trim()) {
                tracing::info!("City set to {}", args.city.trim());
            }
        }
        DraftCommand::SetAssembly(args) => {
            controller.set_assembly(args.assembly);
        }
        DraftCommand::AddLayer(args) => {
            let mut layer = Layer::placeholder();
            if let Some(material) = args.material {
                layer.material = material;
            }
            if let Some(thickness) = args.thickness {
                layer.thickness_mm = thickness;
            }
            let id = controller.push_layer(layer).map_err(|e| env.explain(e))?;
            tracing::debug!("Added layer {}", id);
        }
        DraftCommand::UpdateLayer(args) => {
            let mut layer = find_layer(controller.design(), &args.layer)?.clone();
            if let Some(material) = args.material {
                layer.material = material;
            }
            if let Some(thickness) = args.thickness {
                layer.thickness_mm = thickness;
            }
            controller.update_layer(layer).map_err(|e| env.explain(e))?;
        }
        DraftCommand::RemoveLayer(args) => {
            let id = find_layer(controller.design(), &args.layer)?.id;
            let removed = controller.remove_layer(id).map_err(|e| env.explain(e))?;
            if !output.is_json() {
                output.success(format!("Removed layer {} ({})", removed.id, removed.material));
            }
        }
    }

    show(&controller, env, output)
}

fn show(controller: &DesignController, env: &CommandEnv, output: &OutputWriter) -> Result<()> {
    let draft = draft_output(
        controller.design(),
        &MaterialCatalog::new(),
        env.config.graphic_scale.value,
    );

    if output.is_json() {
        output.result(draft)?;
    } else {
        print_draft(draft, output);
    }
    Ok(())
}

/// Resolve a layer by 1-based position or by id
fn find_layer<'a>(design: &'a AssemblyDesign, reference: &str) -> Result<&'a Layer> {
    let reference = reference.trim();

    let by_position = reference
        .parse::<usize>()
        .ok()
        .and_then(|position| position.checked_sub(1))
        .and_then(|index| design.layers.get(index));
    if let Some(layer) = by_position {
        return Ok(layer);
    }

    design
        .layers
        .iter()
        .find(|layer| layer.id.to_string() == reference || is_id_prefix(layer.id, reference))
        .ok_or_else(|| layer_not_found(reference, design.layers.len()).into())
}

/// Ids are long; accept an unambiguous leading fragment of at least 8 characters
fn is_id_prefix(id: LayerId, reference: &str) -> bool {
    reference.len() >= 8 && id.to_string().starts_with(reference)
}
