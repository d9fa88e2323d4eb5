use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use devjobs_core::DevJobsConfig;

const TEMPLATE: &str = include_str!("../../.devjobs-config.template.toml");

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write the commented config template to ~/.devjobs/config.toml
    Init(InitArgs),
    /// Get a config value by dot-notation key
    Get(GetArgs),
    /// List all config values (defaults included)
    List,
    /// Load and validate the config file
    Validate,
    /// Show config file path
    Path,
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Force overwrite existing config
    #[arg(long, short)]
    pub force: bool,
}

#[derive(Parser, Debug)]
pub struct GetArgs {
    /// Dot-notation key (e.g., "api.base_url")
    pub key: String,
}

pub fn run_config(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Init(args) => run_init(args),
        ConfigCommands::Get(args) => run_get(args),
        ConfigCommands::List => run_list(),
        ConfigCommands::Validate => run_validate(),
        ConfigCommands::Path => run_path(),
    }
}

fn run_init(args: InitArgs) -> Result<()> {
    let config_path = DevJobsConfig::config_path();

    if config_path.exists() && !args.force {
        return Err(anyhow::anyhow!(
            "Config already exists at {:?}\n\nUse --force to overwrite",
            config_path
        ));
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(&config_path, TEMPLATE)
        .context(format!("Failed to write config file: {:?}", config_path))?;

    println!("✅ Created config at: {:?}", config_path);
    println!("\nNext steps:");
    println!("  1. Edit the config: $EDITOR {:?}", config_path);
    println!("  2. Point api.base_url at your backend");
    println!("  3. Run: devjobs config validate");

    Ok(())
}

fn run_get(args: GetArgs) -> Result<()> {
    let config = DevJobsConfig::load()?;
    let value = config
        .get(&args.key)?
        .ok_or_else(|| anyhow::anyhow!("Unknown config key: {}", args.key))?;
    println!("{}", value);
    Ok(())
}

fn run_list() -> Result<()> {
    let config = DevJobsConfig::load()?;
    println!("{}", config.to_toml()?);
    Ok(())
}

fn run_validate() -> Result<()> {
    let config = DevJobsConfig::load()?;
    println!("   ✓ Config loaded successfully");
    println!("   API: {}", config.api.base_url);
    devjobs_client::ApiClient::from_config(&config).context("api.base_url is not usable")?;
    println!("   ✓ api.base_url parses");
    println!("\n✅ Configuration valid!");
    Ok(())
}

fn run_path() -> Result<()> {
    println!("{}", DevJobsConfig::config_path().display());
    Ok(())
}
