//! Load command implementation

use super::render::{draft_output, print_draft, print_result};
use super::CommandEnv;
use crate::cli::LoadArgs;
use crate::output::OutputWriter;
use crate::output_types::LoadOutput;
use crate::progress::{create_spinner, finish_error, finish_success, finish_warning};
use anyhow::Result;
use uvalue_core::models::MaterialCatalog;
use uvalue_core::ports::EnvelopeService;
use uvalue_session::{parse_share_param, HydrationOutcome};

pub async fn execute(args: LoadArgs, env: &CommandEnv, output: &OutputWriter) -> Result<()> {
    let input = args.design.trim();
    let public_id = parse_share_param(input).unwrap_or_else(|| input.to_string());

    let client = env.client()?;
    let mut controller = env.controller();

    let spinner = create_spinner(&format!("Loading shared design {}...", public_id), output.is_json());
    let outcome = match controller.hydrate_from_share(&client, &public_id).await {
        Ok(outcome) => outcome,
        Err(e) => {
            finish_error(&spinner, "Load failed");
            return Err(env.explain(e));
        }
    };

    match outcome {
        HydrationOutcome::Hydrated => finish_success(&spinner, "Loaded"),
        HydrationOutcome::NotFound => finish_warning(&spinner, "Not found"),
        _ => finish_warning(&spinner, "Skipped"),
    }

    let hydrated = outcome == HydrationOutcome::Hydrated;
    let scale = env.config.graphic_scale.value;

    if output.is_json() {
        if outcome == HydrationOutcome::NotFound {
            output.warning(format!("No saved design with id {}", public_id));
        }
        return output.result(LoadOutput {
            public_id,
            outcome,
            design: hydrated
                .then(|| draft_output(controller.design(), &MaterialCatalog::new(), scale)),
            result: controller.result().filter(|_| hydrated).cloned(),
        });
    }

    match outcome {
        HydrationOutcome::Hydrated => {
            let catalog = match client.materials().await {
                Ok(entries) => MaterialCatalog::from_entries(entries),
                Err(e) => {
                    tracing::warn!("Material catalog unavailable: {}", e);
                    MaterialCatalog::new()
                }
            };
            let films = controller.refresh_films(&client).await;

            print_draft(draft_output(controller.design(), &catalog, scale), output);
            if let Some(result) = controller.result() {
                print_result(result, &catalog, films, &env.config.backend_base(), output);
            }
            println!();
            output.success(format!(
                "Draft replaced with shared design {} ({})",
                public_id,
                env.draft_path.display()
            ));
        }
        HydrationOutcome::NotFound => {
            output.warning(format!("No saved design with id {}; the draft is unchanged", public_id));
        }
        HydrationOutcome::AlreadyHydrated | HydrationOutcome::SkippedExistingResult => {
            output.info("This session already has a result; the shared design was not applied");
        }
        HydrationOutcome::Cancelled => output.warning("Load cancelled"),
    }
    Ok(())
}
