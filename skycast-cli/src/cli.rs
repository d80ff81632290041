use anyhow::Result;
use clap::{Parser, Subcommand};
use inquire::InquireError;
use skycast_core::{
    Config, IpApiGeolocator, OpenWeatherLookup, Phase, Session, Target, ViewState,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Weather viewer CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Fetch weather once and print it.
    Show {
        /// City name; if absent, the current device location is used.
        city: Option<String>,
    },

    /// Interactive viewer: pick from the configured locations repeatedly.
    Watch,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city } => show(city).await,
            Command::Watch => watch().await,
        }
    }
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let api_key = inquire::Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()?;
    config.set_api_key(api_key);
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

fn build_session(config: &Config) -> Result<Session> {
    let api_key = config.require_api_key()?.to_owned();

    Ok(Session::new(
        Box::new(IpApiGeolocator),
        Box::new(OpenWeatherLookup::new(api_key)),
    ))
}

async fn show(city: Option<String>) -> Result<()> {
    let config = Config::load()?;
    let mut session = build_session(&config)?;

    let target = match city {
        Some(name) => Target::NamedCity(name),
        None => Target::CurrentLocation,
    };

    println!("Fetching weather for {target}...");
    let state = session.refresh(target).await;
    print_state(state);

    if state.phase == Phase::Failed {
        std::process::exit(1);
    }
    Ok(())
}

async fn watch() -> Result<()> {
    let config = Config::load()?;
    let mut session = build_session(&config)?;

    // The viewer opens on the device location, like the initial page load.
    println!("Fetching weather for {}...", Target::CurrentLocation);
    let state = session.refresh(Target::CurrentLocation).await;
    print_state(state);

    loop {
        let choice = inquire::Select::new("Pick a location:", menu_items(&config)).prompt();

        match choice {
            Ok(MenuItem::Target(target)) => {
                println!("Fetching weather for {target}...");
                let state = session.refresh(target).await;
                print_state(state);
            }
            Ok(MenuItem::Quit)
            | Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        }
    }
}

#[derive(Debug, Clone)]
enum MenuItem {
    Target(Target),
    Quit,
}

impl std::fmt::Display for MenuItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MenuItem::Target(target) => write!(f, "{target}"),
            MenuItem::Quit => f.write_str("Quit"),
        }
    }
}

fn menu_items(config: &Config) -> Vec<MenuItem> {
    config
        .targets()
        .into_iter()
        .map(MenuItem::Target)
        .chain(std::iter::once(MenuItem::Quit))
        .collect()
}

fn print_state(state: &ViewState) {
    match state.phase {
        Phase::Loading => println!("Loading..."),
        Phase::Ready => {
            if let Some(snapshot) = &state.snapshot {
                println!(
                    "{}: {:.1}°C, {} (observed {})",
                    snapshot.location_label,
                    snapshot.temperature_c,
                    snapshot.condition,
                    snapshot.observation_time.format("%Y-%m-%d %H:%M UTC"),
                );
            }
        }
        Phase::Failed => {
            if let Some(message) = &state.error_message {
                eprintln!("{message}");
            }
        }
    }
}
