//! Lane-phase dataset CLI
//!
//! Downloads a player's matches, filters them, and builds labeled lane-phase datasets.

use clap::{Parser, Subcommand};
use lanephase::{Config, Result};

#[derive(Parser)]
#[command(name = "lanephase")]
#[command(about = "Lane-phase snapshot extraction and behavior labeling", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new project with default config
    Init,
    /// Show configuration and data status
    Status,
    /// Look up the player's puuid by Riot ID and store it
    Account {
        /// Riot API key
        #[arg(long, env = "RIOT_API_KEY", hide_env_values = true)]
        api_key: String,
        /// Game name (overrides config)
        #[arg(long)]
        name: Option<String>,
        /// Tag line (overrides config)
        #[arg(long)]
        tag: Option<String>,
    },
    /// Download recent match and timeline payloads
    Download {
        /// Riot API key
        #[arg(long, env = "RIOT_API_KEY", hide_env_values = true)]
        api_key: String,
        /// Number of recent matches to request
        #[arg(long)]
        count: Option<u32>,
    },
    /// Filter downloaded matches into the clean index
    Clean,
    /// Build lane-phase snapshots for every indexed match
    Build,
    /// Label the snapshot dataset
    Label,
    /// Run clean, build and label in sequence
    Run,
    /// List the matches in the clean index
    List,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load or create config
    let config = if std::path::Path::new(&cli.config).exists() {
        match Config::load(&cli.config) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    };

    let result = match cli.command {
        Commands::Init => commands::init(&cli.config),
        Commands::Status => commands::status(&config),
        Commands::Account { api_key, name, tag } => {
            commands::account(&config, &api_key, name, tag)
        }
        Commands::Download { api_key, count } => commands::download(&config, &api_key, count),
        Commands::Clean => commands::clean(&config),
        Commands::Build => commands::build(&config).map(|_| ()),
        Commands::Label => commands::label(&config),
        Commands::Run => commands::run(&config),
        Commands::List => commands::list(&config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

mod commands {
    use super::*;
    use chrono::{DateTime, Utc};
    use lanephase::data::riot_api::RiotClient;
    use lanephase::data::store::{load_puuid, save_puuid};
    use lanephase::data::DataLayout;
    use lanephase::features::{BehaviorLabeler, MatchFilter};
    use lanephase::pipeline;
    use lanephase::LaneError;

    pub fn init(config_path: &str) -> Result<()> {
        let config = Config::default();
        config.save(config_path)?;
        println!("Created default config at {}", config_path);

        let layout = DataLayout::from_config(&config);
        layout.ensure_dirs()?;
        println!(
            "Created {} and {}",
            layout.matches_dir.display(),
            layout.timelines_dir.display()
        );

        println!("\nNext steps:");
        println!("  1. Set game_name and tag_line in {}", config_path);
        println!("  2. Export RIOT_API_KEY and run 'lanephase account'");
        println!("  3. Run 'lanephase download' to fetch matches");
        println!("  4. Run 'lanephase run' to build the labeled dataset");

        Ok(())
    }

    pub fn status(config: &Config) -> Result<()> {
        let layout = DataLayout::from_config(config);
        let count_files = |dir: &std::path::Path| {
            std::fs::read_dir(dir)
                .map(|entries| entries.filter_map(|e| e.ok()).count())
                .unwrap_or(0)
        };

        println!("Lane Phase Status");
        println!("───────────────────────────────");
        println!(
            "  Player:     {}",
            match (&config.player.game_name, &config.player.tag_line) {
                (Some(name), Some(tag)) => format!("{}#{}", name, tag),
                _ => "(not set)".to_string(),
            }
        );
        println!(
            "  PUUID file: {} ({})",
            config.player.puuid_file,
            if std::path::Path::new(&config.player.puuid_file).exists() {
                "present"
            } else {
                "missing"
            }
        );
        println!(
            "  API key:    {}",
            if std::env::var("RIOT_API_KEY").is_ok() {
                "set"
            } else {
                "not set"
            }
        );
        println!(
            "  Regions:    {} / {}",
            config.api.platform_region, config.api.routing_region
        );
        println!("  Role:       {}", config.filter.role);
        println!("  Matches:    {}", count_files(&layout.matches_dir));
        println!("  Timelines:  {}", count_files(&layout.timelines_dir));
        for path in [&layout.index_path, &layout.snapshots_path, &layout.labeled_path] {
            let state = if path.exists() { "present" } else { "missing" };
            println!("  {}: {}", path.display(), state);
        }

        Ok(())
    }

    pub fn account(
        config: &Config,
        api_key: &str,
        name: Option<String>,
        tag: Option<String>,
    ) -> Result<()> {
        let name = name.or_else(|| config.player.game_name.clone());
        let tag = tag.or_else(|| config.player.tag_line.clone());
        let (Some(name), Some(tag)) = (name, tag) else {
            return Err(LaneError::Config(
                "Riot ID game name and tag line are not set".to_string(),
            ));
        };

        let client = RiotClient::new(api_key, &config.api)?;
        let account = client.account_by_riot_id(&name, &tag)?;
        println!("PUUID: {}", account.puuid);

        save_puuid(&config.player.puuid_file, &account.puuid)?;
        println!("PUUID saved to {}", config.player.puuid_file);

        Ok(())
    }

    pub fn download(config: &Config, api_key: &str, count: Option<u32>) -> Result<()> {
        let puuid = load_puuid(&config.player.puuid_file)?;
        let layout = DataLayout::from_config(config);

        println!("PUUID: {}", puuid);
        println!("Routing region: {}", config.api.routing_region);

        let client = RiotClient::new(api_key, &config.api)?;
        let report =
            client.download_recent(&puuid, count.unwrap_or(config.api.match_count), &layout)?;

        println!(
            "Listed {} matches: {} downloaded, {} already present, {} failed",
            report.listed, report.downloaded, report.already_present, report.failed
        );
        Ok(())
    }

    pub fn clean(config: &Config) -> Result<()> {
        let puuid = load_puuid(&config.player.puuid_file)?;
        println!("Loaded PUUID: {}", puuid);

        let layout = DataLayout::from_config(config);
        let filter = MatchFilter::new(config.filter.clone());
        let (_, report) = pipeline::clean_matches(&layout, &puuid, &filter)?;

        println!(
            "Scanned {} matches: {} kept, {} skipped",
            report.scanned, report.kept, report.skipped
        );
        println!("Index written to {}", layout.index_path.display());
        Ok(())
    }

    /// Returns the number of snapshot rows written
    pub fn build(config: &Config) -> Result<usize> {
        let puuid = load_puuid(&config.player.puuid_file)?;
        let layout = DataLayout::from_config(config);

        let (_, report) = pipeline::build_dataset(
            &layout,
            &puuid,
            config.filter.role,
            config.lane_phase.max_time_s,
        )?;

        println!(
            "Processed {}/{} matches ({} skipped)",
            report.processed, report.matches, report.skipped
        );
        if report.rows == 0 {
            println!("No snapshots generated. Check paths/index/puuid.");
        } else {
            println!(
                "Wrote {} snapshots to {}",
                report.rows,
                layout.snapshots_path.display()
            );
        }
        Ok(report.rows)
    }

    pub fn label(config: &Config) -> Result<()> {
        let layout = DataLayout::from_config(config);
        let labeler = BehaviorLabeler::new(config.labeling.clone());
        let counts = pipeline::label_dataset(&layout, &labeler)?;

        println!(
            "Labeled {} rows: {} aggressive, {} safe, {} neutral",
            counts.total(),
            counts.aggressive,
            counts.safe,
            counts.neutral
        );
        println!("Saved labeled dataset to {}", layout.labeled_path.display());
        Ok(())
    }

    pub fn run(config: &Config) -> Result<()> {
        clean(config)?;
        if build(config)? == 0 {
            println!("Skipping labeling: no snapshots");
            return Ok(());
        }
        label(config)
    }

    pub fn list(config: &Config) -> Result<()> {
        let layout = DataLayout::from_config(config);
        let index = pipeline::load_index(&layout)?;

        println!("Found {} {} matches in index.\n", index.len(), config.filter.role);
        for entry in &index {
            let played = DateTime::<Utc>::from_timestamp_millis(entry.game_creation)
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "unknown".to_string());
            println!(
                "{} | {} | {} | KDA: {} | CS: {} | {}",
                entry.match_id,
                played,
                entry.champion_name,
                entry.kda(),
                entry.cs,
                if entry.win { "WIN" } else { "LOSS" }
            );
        }
        Ok(())
    }
}
