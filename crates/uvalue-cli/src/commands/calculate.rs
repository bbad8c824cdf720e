//! Calculate command implementation

use super::render::print_result;
use super::wait::{cancel_on_ctrl_c, warm_up_session};
use super::CommandEnv;
use crate::cli::CalculateArgs;
use crate::errors::design_not_calculable;
use crate::output::OutputWriter;
use crate::output_types::CalculateOutput;
use crate::progress::{create_spinner, finish_error, finish_success, finish_warning};
use anyhow::Result;
use uvalue_core::models::{MaterialCatalog, SavedDesignRef};
use uvalue_core::ports::EnvelopeService;
use uvalue_session::{share_locator, SaveOutcome};

pub async fn execute(args: CalculateArgs, env: &CommandEnv, output: &OutputWriter) -> Result<()> {
    let mut controller = env.controller();

    // Invalid designs never reach the network
    let problems: Vec<String> = controller.validation().iter().map(ToString::to_string).collect();
    if !problems.is_empty() {
        return Err(design_not_calculable(&problems).into());
    }

    let client = env.client()?;
    let cancel = cancel_on_ctrl_c();

    if !args.no_wait {
        warm_up_session(&client, env, controller.context_mut(), &cancel, output).await;
        if cancel.is_cancelled() {
            output.warning("Calculation cancelled");
            return Ok(());
        }
    }

    let spinner = create_spinner("Calculating...", output.is_json());
    let (report, materials) = futures::join!(controller.calculate(&client), client.materials());

    let report = match report {
        Ok(Some(report)) => report,
        Ok(None) => {
            finish_warning(&spinner, "Superseded");
            return Ok(());
        }
        Err(e) => {
            finish_error(&spinner, "Calculation failed");
            return Err(env.explain(e));
        }
    };
    finish_success(&spinner, "Calculated");

    let catalog = match materials {
        Ok(entries) => MaterialCatalog::from_entries(entries),
        Err(e) => {
            tracing::warn!("Material catalog unavailable: {}", e);
            MaterialCatalog::new()
        }
    };
    let films = controller.refresh_films(&client).await;

    let (saved, save_warning) = match report.save {
        SaveOutcome::Saved(saved) => (Some(saved), None),
        SaveOutcome::Failed { message } => (
            None,
            Some(format!("Result was not saved, so there is no shareable link: {}", message)),
        ),
        SaveOutcome::Stale => (None, None),
    };
    let share_link = saved
        .as_ref()
        .map(|saved| share_link(args.share_base.as_deref(), saved));

    if output.is_json() {
        if let Some(warning) = &save_warning {
            output.warning(warning);
        }
        return output.result(CalculateOutput {
            result: report.result,
            films,
            warm_state: controller.context().warm_state(),
            elapsed_ms: controller.context().uptime().as_millis(),
            saved,
            share_link,
            save_warning,
        });
    }

    print_result(&report.result, &catalog, films, &env.config.backend_base(), output);
    output.kv("Elapsed", format!("{:.1}s", controller.context().uptime().as_secs_f64()));

    match (&share_link, &save_warning) {
        (Some(link), _) => {
            println!();
            output.success(format!("Shareable link: {}", link));
        }
        (None, Some(warning)) => output.warning(warning),
        (None, None) => {}
    }
    Ok(())
}

/// Prefer a caller-supplied page, then the server's own locator, then the bare id
fn share_link(share_base: Option<&str>, saved: &SavedDesignRef) -> String {
    match (share_base, &saved.url) {
        (Some(base), _) => share_locator(base, &saved.public_id),
        (None, Some(url)) if !url.trim().is_empty() => url.clone(),
        _ => saved.public_id.clone(),
    }
}
