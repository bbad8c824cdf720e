//! Wait command implementation

use super::CommandEnv;
use crate::cli::WaitArgs;
use crate::output::OutputWriter;
use crate::output_types::WaitOutput;
use crate::progress::{create_spinner, finish_error, finish_success, finish_warning};
use anyhow::Result;
use uvalue_client::{ApiClient, Readiness, ReadinessProber};
use uvalue_core::cancel::CancelFlag;
use uvalue_core::config::CliConfigOverrides;
use uvalue_session::SessionContext;

pub async fn execute(args: WaitArgs, mut env: CommandEnv, output: &OutputWriter) -> Result<()> {
    env.config.update_from_cli(CliConfigOverrides {
        ready_max_wait_ms: args.max_wait_ms,
        ready_poll_ms: args.poll_ms,
        ..Default::default()
    });
    let client = env.client()?;

    let cancel = cancel_on_ctrl_c();
    let readiness = warm_up(&client, &env, &cancel, output).await;

    match readiness {
        Ok(Readiness::Ready { target, elapsed }) => {
            if output.is_json() {
                output.result(WaitOutput {
                    ready: true,
                    via: Some(target.path().to_string()),
                    elapsed_ms: elapsed.as_millis(),
                })?;
            } else {
                output.success(format!(
                    "Backend ready via {} after {:.1}s",
                    target.path(),
                    elapsed.as_secs_f64()
                ));
            }
            Ok(())
        }
        Ok(Readiness::Cancelled) => {
            output.warning("Wait cancelled");
            Ok(())
        }
        Err(e) => Err(env.explain(e)),
    }
}

/// Run the readiness prober behind a spinner
pub async fn warm_up(
    client: &ApiClient,
    env: &CommandEnv,
    cancel: &CancelFlag,
    output: &OutputWriter,
) -> uvalue_core::Result<Readiness> {
    let prober = ReadinessProber::new(
        client.clone(),
        env.config.ready_max_wait(),
        env.config.ready_poll_interval(),
    );

    let spinner = create_spinner("Waking up the backend...", output.is_json());
    let readiness = prober.await_ready(cancel).await;

    match &readiness {
        Ok(Readiness::Ready { .. }) => finish_success(&spinner, "Backend is awake"),
        Ok(Readiness::Cancelled) => finish_warning(&spinner, "Cancelled"),
        Err(e) => finish_error(&spinner, &e.to_string()),
    }
    readiness
}

/// Warm up before the first request of a session; a timeout only degrades
pub async fn warm_up_session(
    client: &ApiClient,
    env: &CommandEnv,
    context: &mut SessionContext,
    cancel: &CancelFlag,
    output: &OutputWriter,
) {
    if !context.needs_warmup() {
        return;
    }

    match warm_up(client, env, cancel, output).await {
        Ok(Readiness::Ready { .. }) => context.record_ready(),
        Ok(Readiness::Cancelled) => {}
        Err(e) => {
            context.record_unresponsive();
            output.warning(format!("{}; trying anyway", e));
        }
    }
}

/// Cancel flag raised by Ctrl-C
pub fn cancel_on_ctrl_c() -> CancelFlag {
    let cancel = CancelFlag::new();
    let flag = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::debug!("Interrupted; cancelling");
            flag.cancel();
        }
    });
    cancel
}
