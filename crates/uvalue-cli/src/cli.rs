use clap::{Parser, Subcommand};
use std::path::PathBuf;
use uvalue_core::models::AssemblyType;

/// uvalue - Building envelope U-value calculator client
#[derive(Parser, Debug)]
#[command(name = "uvalue")]
#[command(about = "Compose wall and roof assemblies and calculate their thermal performance", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to a TOML configuration file (defaults to ./uvalue.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Calculation API root, e.g. http://127.0.0.1:8000/api
    #[arg(long, global = true, value_name = "URL")]
    pub api_base: Option<String>,

    /// Local draft file
    #[arg(long, global = true, value_name = "PATH", default_value = ".uvalue/draft.json")]
    pub draft: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Wait until the backend answers
    Wait(WaitArgs),

    /// List the material catalog
    Materials,

    /// List selectable cities
    Cities,

    /// Show surface film coefficients for the draft's city and assembly
    Films,

    /// Edit the local draft design
    Draft(DraftArgs),

    /// Calculate the draft design and save it for sharing
    Calculate(CalculateArgs),

    /// Replace the draft with a shared design
    Load(LoadArgs),

    /// Run health checks and diagnostics
    Doctor(DoctorArgs),

    /// Show the effective configuration and where each value came from
    Config,
}

#[derive(Parser, Debug)]
pub struct WaitArgs {
    /// Give up after this many milliseconds
    #[arg(long, value_name = "MS")]
    pub max_wait_ms: Option<u64>,

    /// Pause between probe cycles
    #[arg(long, value_name = "MS")]
    pub poll_ms: Option<u64>,
}

#[derive(Parser, Debug)]
pub struct DraftArgs {
    #[command(subcommand)]
    pub command: DraftCommand,
}

#[derive(Subcommand, Debug)]
pub enum DraftCommand {
    /// Show the draft, its validation problems and section geometry
    Show,

    /// Select the climate location
    SetCity(SetCityArgs),

    /// Select the assembly type
    SetAssembly(SetAssemblyArgs),

    /// Append a layer at the inside face
    AddLayer(AddLayerArgs),

    /// Change a layer's material or thickness
    UpdateLayer(UpdateLayerArgs),

    /// Remove a layer
    RemoveLayer(RemoveLayerArgs),

    /// Forget the draft
    Clear,
}

#[derive(Parser, Debug)]
pub struct SetCityArgs {
    /// City name as listed by `uvalue cities`
    pub city: String,
}

#[derive(Parser, Debug)]
pub struct SetAssemblyArgs {
    /// wall or roof_up
    pub assembly: AssemblyType,
}

#[derive(Parser, Debug)]
pub struct AddLayerArgs {
    /// Material name (left empty when omitted)
    #[arg(long)]
    pub material: Option<String>,

    /// Thickness in millimeters
    #[arg(long, value_name = "MM", value_parser = parse_thickness)]
    pub thickness: Option<f64>,
}

#[derive(Parser, Debug)]
pub struct UpdateLayerArgs {
    /// Layer id or 1-based position (1 = outside face)
    pub layer: String,

    /// New material name
    #[arg(long)]
    pub material: Option<String>,

    /// New thickness in millimeters
    #[arg(long, value_name = "MM", value_parser = parse_thickness)]
    pub thickness: Option<f64>,
}

#[derive(Parser, Debug)]
pub struct RemoveLayerArgs {
    /// Layer id or 1-based position (1 = outside face)
    pub layer: String,
}

#[derive(Parser, Debug)]
pub struct CalculateArgs {
    /// Page the shareable link points at; the link is `{share_base}?design={id}`
    #[arg(long, value_name = "URL")]
    pub share_base: Option<String>,

    /// Submit without waiting for the backend to warm up
    #[arg(long)]
    pub no_wait: bool,
}

#[derive(Parser, Debug)]
pub struct LoadArgs {
    /// Public id, or a shareable link containing `?design=<id>`
    pub design: String,
}

#[derive(Parser, Debug)]
pub struct DoctorArgs {
    /// Show detailed diagnostic information
    #[arg(long)]
    pub verbose: bool,
}

/// Thickness must be a finite number; sign and zero are left to draft validation
fn parse_thickness(value: &str) -> Result<f64, String> {
    let thickness: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", value))?;
    if thickness.is_finite() {
        Ok(thickness)
    } else {
        Err(format!("'{}' is not a finite thickness", value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_assembly_argument() {
        let cli = Cli::try_parse_from(["uvalue", "draft", "set-assembly", "roof_up"]).unwrap();
        match cli.command {
            Commands::Draft(DraftArgs { command: DraftCommand::SetAssembly(args) }) => {
                assert_eq!(args.assembly, AssemblyType::RoofUp);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_thickness_must_be_finite() {
        for bad in ["nan", "inf", "-inf", "NaN", "ten"] {
            let parsed =
                Cli::try_parse_from(["uvalue", "draft", "add-layer", "--thickness", bad]);
            assert!(parsed.is_err(), "accepted thickness {}", bad);

            let parsed =
                Cli::try_parse_from(["uvalue", "draft", "update-layer", "1", "--thickness", bad]);
            assert!(parsed.is_err(), "accepted thickness {}", bad);
        }

        let cli = Cli::try_parse_from(["uvalue", "draft", "add-layer", "--thickness", "12.5"]).unwrap();
        match cli.command {
            Commands::Draft(DraftArgs { command: DraftCommand::AddLayer(args) }) => {
                assert_eq!(args.thickness, Some(12.5));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "uvalue",
            "materials",
            "--json",
            "--api-base",
            "http://localhost:9000/api",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.api_base.as_deref(), Some("http://localhost:9000/api"));
        assert_eq!(cli.draft, PathBuf::from(".uvalue/draft.json"));
    }
}
