use console::style;
use std::fmt;
use uvalue_core::UvalueError;

/// Enhanced error type with suggestions
pub struct CliError {
    pub message: String,
    pub context: Option<String>,
    pub suggestions: Vec<String>,
    pub help_command: Option<String>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
            help_command: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_help(mut self, command: impl Into<String>) -> Self {
        self.help_command = Some(command.into());
        self
    }

    pub fn display(&self) {
        eprintln!("{} {}\n", style("✗").red().bold(), style(&self.message).red().bold());

        if let Some(ref context) = self.context {
            eprintln!("{}", context);
            eprintln!();
        }

        if !self.suggestions.is_empty() {
            eprintln!("{}", style("To fix this:").yellow().bold());
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, suggestion);
            }
            eprintln!();
        }

        if let Some(ref help_cmd) = self.help_command {
            eprintln!("{} {}", style("Need help?").cyan(), style(help_cmd).cyan().bold());
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// The design cannot be submitted yet
pub fn design_not_calculable(problems: &[String]) -> CliError {
    let listing = problems
        .iter()
        .map(|p| format!("  • {}", p))
        .collect::<Vec<_>>()
        .join("\n");

    CliError::new("Design is not ready to calculate")
        .with_context(format!("Nothing was sent to the backend.\n\n{}", listing))
        .with_suggestion("Pick a city: uvalue draft set-city <CITY>")
        .with_suggestion("Add layers: uvalue draft add-layer --material <NAME> --thickness <MM>")
        .with_help("Run: uvalue draft show")
}

/// The backend never answered the readiness probes
pub fn backend_unresponsive(api_base: &str, waited_secs: u64) -> CliError {
    CliError::new("Backend did not wake up")
        .with_context(format!(
            "No answer from /health or /cities within {}s.\n\nAPI base: {}",
            waited_secs, api_base
        ))
        .with_suggestion("Try again; hosted backends can take a minute to cold-start")
        .with_suggestion("Wait longer: uvalue wait --max-wait-ms 180000")
        .with_suggestion("Check the API base: uvalue --api-base <URL> doctor")
        .with_help("Run: uvalue doctor")
}

/// The backend could not be reached at all
pub fn backend_unreachable(api_base: &str, error: &str) -> CliError {
    CliError::new("Cannot reach the calculation backend")
        .with_context(format!("API base: {}\n\nError: {}", api_base, error))
        .with_suggestion("Check that the backend is running")
        .with_suggestion("Set the API base: export UVALUE_API_BASE=\"http://127.0.0.1:8000/api\"")
        .with_help("Run: uvalue doctor")
}

/// A layer reference matched nothing in the draft
pub fn layer_not_found(reference: &str, layer_count: usize) -> CliError {
    CliError::new(format!("Layer not found: {}", reference))
        .with_context(format!(
            "Layers are addressed by id or by 1-based position.\n\nThe draft has {} layer(s).",
            layer_count
        ))
        .with_suggestion("List layers with their ids: uvalue draft show")
        .with_help("Run: uvalue draft --help")
}

/// Create error for invalid configuration
pub fn invalid_config(key: &str, reason: &str) -> CliError {
    CliError::new(format!("Invalid configuration: {}", key))
        .with_context(format!("Configuration value is invalid.\n\nReason: {}", reason))
        .with_suggestion("Check uvalue.toml for typos")
        .with_suggestion("Check UVALUE_* environment variables")
        .with_help("Run: uvalue config")
}

/// Map a library error to a CliError with remediation hints
pub fn from_uvalue(error: &UvalueError, api_base: &str) -> CliError {
    match error {
        UvalueError::Validation { problems } => design_not_calculable(problems),
        UvalueError::ReadinessTimeout { waited } => backend_unresponsive(api_base, waited.as_secs()),
        UvalueError::Network { .. } | UvalueError::Timeout { .. } => {
            backend_unreachable(api_base, &error.to_string())
        }
        UvalueError::LayerNotFound { id } => layer_not_found(id, 0),
        UvalueError::ConfigInvalid { key, reason } => invalid_config(key, reason),
        UvalueError::ConfigMissing { key } => invalid_config(key, "value is missing"),
        UvalueError::HttpStatus { status, body } if (400..500).contains(status) => {
            CliError::new(format!("The backend rejected the request (HTTP {})", status))
                .with_context(body.trim().to_string())
                .with_suggestion("Check material names against: uvalue materials")
                .with_suggestion("Check the city against: uvalue cities")
        }
        other => CliError::new(other.to_string()),
    }
}

/// Convert anyhow::Error to CliError with context
pub fn from_anyhow(error: anyhow::Error, api_base: &str) -> CliError {
    if let Some(cli_error) = error.downcast_ref::<CliError>() {
        return CliError {
            message: cli_error.message.clone(),
            context: cli_error.context.clone(),
            suggestions: cli_error.suggestions.clone(),
            help_command: cli_error.help_command.clone(),
        };
    }
    if let Some(uvalue_error) = error.downcast_ref::<UvalueError>() {
        return from_uvalue(uvalue_error, api_base);
    }

    let message = error.to_string();
    if message.contains("permission denied") || message.contains("Permission denied") {
        CliError::new("Permission denied")
            .with_context(format!("Error: {}", message))
            .with_suggestion("Check permissions on the draft file")
            .with_suggestion("Or point at another draft: uvalue --draft <PATH> ...")
    } else {
        CliError::new(message)
    }
}
