use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use tank_cli::config::load_settings;
use tank_cli::sim::{rng_for, school_from_roster, swim, SwimOptions};
use tank_cli::store::{FishStore, DEFAULT_PATH};
use tank_core::StopFlag;
use tank_shared::{FishRecord, FishUpdate, NewFish, RenderFrame};

#[derive(Parser, Debug)]
#[command(author, version, about = "Keep a fish tank and watch it swim", long_about = None)]
struct Args {
    /// Roster file holding the fish
    #[arg(long, default_value = DEFAULT_PATH)]
    data: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a fish to the tank
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        image_url: String,
        /// slow, medium or fast
        #[arg(long, default_value = "medium")]
        personality: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// List every fish
    List,
    /// Show one fish
    Show { id: String },
    /// Change some of a fish's details
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        image_url: Option<String>,
        #[arg(long)]
        personality: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Take a fish out of the tank
    Remove { id: String },
    /// Run the tank headless and print one line per frame
    Swim {
        /// Stop after this many frames (default: until Ctrl-C)
        #[arg(long)]
        frames: Option<u64>,
        #[arg(long, default_value_t = 60.0)]
        fps: f64,
        /// Seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,
        /// Print frames as JSON arrays
        #[arg(long)]
        json: bool,
        /// JSON file overriding the tank tuning
        #[arg(long)]
        settings: Option<PathBuf>,
    },
}

fn print_fish(fish: &FishRecord) {
    println!("{}  {}  [{}]", fish.id, fish.name, fish.personality);
    println!("    image:   {}", fish.image_url);
    if !fish.description.is_empty() {
        println!("    about:   {}", fish.description);
    }
    println!("    added:   {}", fish.created_at.to_rfc3339());
}

fn frame_line(index: u64, frames: &[RenderFrame]) -> String {
    let fish: Vec<String> = frames
        .iter()
        .map(|f| {
            let arrow = if f.scale_x < 0.0 { '<' } else { '>' };
            format!(
                "{} {} ({:.2}, {:.2}) {:+.1}deg",
                f.id, arrow, f.left, f.top, f.tilt
            )
        })
        .collect();
    format!("frame {}: {}", index, fish.join(" | "))
}

async fn run_swim(
    store: &FishStore,
    options: SwimOptions,
    json: bool,
    settings: Option<PathBuf>,
) -> Result<()> {
    let settings = load_settings(settings.as_deref())?;
    let roster = store.all()?;
    if roster.is_empty() {
        log::warn!("The tank at {} is empty", store.path().display());
    }

    let mut rng = rng_for(options.seed);
    let school = school_from_roster(
        &roster,
        &settings.profile(),
        &settings.tank_config(),
        &mut rng,
    );

    let stop = StopFlag::new();
    let ctrl_c = stop.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("Interrupted, stopping");
            ctrl_c.stop();
        }
    });

    let stdout = std::io::stdout();
    let emitted = swim(school, &settings, &options, rng, stop, |index, frames| {
        let mut out = stdout.lock();
        if json {
            serde_json::to_writer(&mut out, frames)?;
            writeln!(out)?;
        } else {
            writeln!(out, "{}", frame_line(index, frames))?;
        }
        Ok(())
    })
    .await?;

    log::info!("Rendered {} frames", emitted);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    let store = FishStore::new(&args.data);
    log::debug!("Roster: {}", store.path().display());

    match args.command {
        Command::Add {
            name,
            image_url,
            personality,
            description,
        } => {
            let fish = store
                .create(NewFish {
                    name,
                    image_url,
                    personality,
                    description,
                })
                .context("Failed to add fish")?;
            println!("Fish \"{}\" has been added to the tank ({})", fish.name, fish.id);
        }
        Command::List => {
            let roster = store.all()?;
            if roster.is_empty() {
                println!("The tank is empty.");
            }
            for fish in &roster {
                print_fish(fish);
            }
        }
        Command::Show { id } => match store.get(&id)? {
            Some(fish) => print_fish(&fish),
            None => bail!("Fish not found: {}", id),
        },
        Command::Edit {
            id,
            name,
            image_url,
            personality,
            description,
        } => {
            let update = FishUpdate {
                name,
                image_url,
                personality,
                description,
            };
            if update.is_empty() {
                log::warn!("Nothing to change for {}", id);
            }
            match store.update(&id, update)? {
                Some(fish) => println!("Fish \"{}\" has been updated", fish.name),
                None => bail!("Fish not found: {}", id),
            }
        }
        Command::Remove { id } => {
            let name = store.get(&id)?.map(|fish| fish.name);
            if !store.delete(&id)? {
                bail!("Fish not found: {}", id);
            }
            println!(
                "Fish \"{}\" has been removed from the tank",
                name.unwrap_or(id)
            );
        }
        Command::Swim {
            frames,
            fps,
            seed,
            json,
            settings,
        } => {
            let options = SwimOptions { fps, frames, seed };
            run_swim(&store, options, json, settings)
                .await
                .context("Swim error")?;
        }
    }

    Ok(())
}
