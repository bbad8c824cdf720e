use super::CommandEnv;
use crate::cli::DoctorArgs;
use crate::output::OutputWriter;
use crate::output_types::DoctorOutput;
use anyhow::Result;
use console::style;
use uvalue_client::{ApiClient, LivenessProbe, ProbeTarget};
use uvalue_core::ports::DraftStore;

pub async fn execute(args: DoctorArgs, env: &CommandEnv, output: &OutputWriter) -> Result<()> {
    let config_error = env.config.validate().err().map(|e| e.to_string());

    let (health, cities) = match &config_error {
        None => {
            let client = ApiClient::from_config(&env.config).map_err(|e| env.explain(e))?;
            let timeout = env.config.read_timeout();
            futures::join!(
                client.probe(ProbeTarget::Health, timeout),
                client.probe(ProbeTarget::Cities, timeout)
            )
        }
        Some(_) => (false, false),
    };

    let draft = env.drafts().load();
    let draft_layers = draft.as_ref().ok().and_then(|d| d.as_ref()).map(|d| d.layers.len());

    if output.is_json() {
        return output.result(DoctorOutput {
            api_base: env.config.api_base(),
            backend_base: env.config.backend_base(),
            config_error,
            health,
            cities,
            draft_path: env.draft_path.display().to_string(),
            draft_layers,
        });
    }

    println!("\n{}", style("uvalue Health Check").bold().underlined());
    println!("{}", style("═".repeat(60)).dim());
    println!();

    let mut checks_passed = 0;
    let mut total_checks = 0;

    // Check config
    total_checks += 1;
    match &config_error {
        None => {
            println!("{} Config: Valid configuration", style("✓").green());
            checks_passed += 1;

            if args.verbose {
                println!("  API base: {}", env.config.api_base());
                println!("  Assets base: {}", env.config.backend_base());
                println!(
                    "  Readiness: up to {}s, polling every {}ms",
                    env.config.ready_max_wait().as_secs(),
                    env.config.ready_poll_interval().as_millis()
                );
            }
        }
        Some(e) => {
            println!("{} Config: {}", style("✗").red(), e);
            println!("  → Inspect: uvalue config");
        }
    }

    println!();
    println!("{}", style("Backend Check").bold());
    println!("{}", style("─".repeat(60)).dim());

    // Check /health
    total_checks += 1;
    if health {
        println!("{} /health: Responding", style("✓").green());
        checks_passed += 1;
    } else {
        println!("{} /health: No answer", style("⚠").yellow());
    }

    // Check /cities
    total_checks += 1;
    if cities {
        println!("{} /cities: Responding", style("✓").green());
        checks_passed += 1;
    } else {
        println!("{} /cities: No answer", style("✗").red());
        if !health {
            println!("  → The backend may be asleep; run: uvalue wait");
            println!("  → Or point elsewhere: export UVALUE_API_BASE=\"http://127.0.0.1:8000/api\"");
        }
    }

    println!();
    println!("{}", style("Draft Check").bold());
    println!("{}", style("─".repeat(60)).dim());

    // Check draft
    total_checks += 1;
    match &draft {
        Ok(Some(design)) => {
            checks_passed += 1;
            let problems = design.validate();
            if problems.is_empty() {
                println!(
                    "{} Draft: {} layers, ready to calculate",
                    style("✓").green(),
                    design.layers.len()
                );
            } else {
                println!(
                    "{} Draft: {} layers, {} problem(s)",
                    style("⚠").yellow(),
                    design.layers.len(),
                    problems.len()
                );
                if args.verbose {
                    for problem in &problems {
                        println!("    • {}", problem);
                    }
                }
                println!("  → Review: uvalue draft show");
            }
        }
        Ok(None) => {
            checks_passed += 1;
            println!("{} Draft: None yet at {}", style("✓").green(), env.draft_path.display());
            println!("  → Start: uvalue draft set-city <CITY>");
        }
        Err(e) => {
            println!("{} Draft: {}", style("✗").red(), e);
            println!("  → Reset: uvalue draft clear");
        }
    }

    // Summary
    println!();
    println!("{}", style("═".repeat(60)).dim());

    let percentage = (checks_passed as f64 / total_checks as f64 * 100.0) as usize;
    let status_icon = if percentage >= 80 {
        style("✓").green()
    } else if percentage >= 50 {
        style("⚠").yellow()
    } else {
        style("✗").red()
    };

    println!(
        "{} Health: {}/{} checks passed ({}%)",
        status_icon, checks_passed, total_checks, percentage
    );
    println!();

    if checks_passed < total_checks {
        println!(
            "{}",
            style("Some issues were found. Follow the suggestions above to fix them.").yellow()
        );
    } else {
        println!("{}", style("All checks passed! The backend is reachable.").green());
    }

    Ok(())
}
