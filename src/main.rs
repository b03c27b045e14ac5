use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use snake_stream::game::GameConfig;
use snake_stream::modes::{HumanMode, StreamMode};
use snake_stream::observation::ObservationKind;
use snake_stream::provider::ProviderSpec;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "snake_stream")]
#[command(version, about = "Snake simulation streamed as JSON events")]
struct Cli {
    /// Decision source steering the snake
    #[arg(long, default_value = "random")]
    provider: ProviderArg,

    /// Policy artifact (required for --provider policy)
    #[arg(long)]
    policy: Option<PathBuf>,

    /// JSON config file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width
    #[arg(long)]
    width: Option<usize>,

    /// Grid height
    #[arg(long)]
    height: Option<usize>,

    /// Milliseconds between ticks
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Milliseconds a provider gets per tick
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Seed for food placement and the random provider
    #[arg(long)]
    seed: Option<u64>,

    /// View published with each state update
    #[arg(long)]
    observation: Option<ObservationArg>,

    /// Episodes to run (non-human providers)
    #[arg(long, default_value = "1")]
    episodes: usize,

    #[arg(long, allow_hyphen_values = true)]
    food_reward: Option<f32>,

    #[arg(long, allow_hyphen_values = true)]
    step_penalty: Option<f32>,

    #[arg(long, allow_hyphen_values = true)]
    wall_penalty: Option<f32>,

    #[arg(long, allow_hyphen_values = true)]
    body_penalty: Option<f32>,
}

#[derive(Clone, ValueEnum)]
enum ProviderArg {
    /// Steer with the keyboard
    Human,
    /// Random walk
    Random,
    /// Trained linear policy
    Policy,
}

#[derive(Clone, ValueEnum)]
enum ObservationArg {
    Grid,
    Features,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::from_json_file(path)?,
            None => GameConfig::default(),
        };

        if let Some(width) = self.width {
            config.grid_width = width;
        }
        if let Some(height) = self.height {
            config.grid_height = height;
        }
        if let Some(tick_ms) = self.tick_ms {
            config.tick_interval_ms = tick_ms;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.action_timeout_ms = timeout_ms;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(observation) = &self.observation {
            config.observation = match observation {
                ObservationArg::Grid => ObservationKind::Grid,
                ObservationArg::Features => ObservationKind::Features,
            };
        }
        if let Some(food) = self.food_reward {
            config.rewards.food = food;
        }
        if let Some(step) = self.step_penalty {
            config.rewards.step = step;
        }
        if let Some(wall) = self.wall_penalty {
            config.rewards.wall = wall;
        }
        if let Some(body) = self.body_penalty {
            config.rewards.body = body;
        }

        config.validate().context("Invalid game configuration")?;
        Ok(config)
    }

    fn provider_spec(&self) -> Result<ProviderSpec> {
        let spec = match self.provider {
            ProviderArg::Human => ProviderSpec::Human,
            ProviderArg::Random => ProviderSpec::Random { seed: self.seed },
            ProviderArg::Policy => ProviderSpec::Policy {
                path: self
                    .policy
                    .clone()
                    .context("--policy <PATH> is required with --provider policy")?,
            },
        };
        Ok(spec)
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = cli.game_config()?;
    let spec = cli.provider_spec()?;
    info!(
        provider = spec.kind(),
        width = config.grid_width,
        height = config.grid_height,
        tick_ms = config.tick_interval_ms,
        "Starting snake_stream"
    );

    match spec {
        ProviderSpec::Human => {
            let mut human_mode = HumanMode::new(config);
            human_mode.run().await?;
        }
        spec => {
            let mut stream_mode = StreamMode::new(config, spec, cli.episodes);
            stream_mode.run().await?;
        }
    }

    Ok(())
}
