use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use client::{ClientConfig, ClientError, HttpRaceApi, RaceLifecycle};
use domain::{PlaceRule, Race, RaceId, RosterBuilder, SlotId, StudentId};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "races")]
#[command(about = "Race Tournament Manager", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, env = "RACE_API_URL")]
    api_url: Option<String>,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List all races
    List,
    /// Show one race with its lanes
    Show { id: i64 },
    /// Create a race, one lane per student in the given order
    Create {
        #[arg(long)]
        name: String,

        #[arg(long = "student", required = true)]
        students: Vec<i64>,
    },
    /// Enter finishing places and complete the race
    Results {
        id: i64,

        /// SLOT_ID=PLACE, once per lane
        #[arg(long = "place", value_parser = parse_place_arg)]
        places: Vec<(i64, String)>,

        /// Accept tied places
        #[arg(long)]
        per_field: bool,
    },
    /// Mark a race completed without sending places
    Complete { id: i64 },
    /// List all students
    Students,
    /// Add a student
    AddStudent {
        #[arg(long)]
        name: String,

        #[arg(long)]
        age: i32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("races={},client={}", log_level, log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = ClientConfig::from_env().context("Failed to load client configuration")?;
    if let Some(url) = cli.api_url {
        config.api_url = url.trim_end_matches('/').to_string();
    }
    tracing::debug!("Using race API at {}", config.api_url);

    let api = HttpRaceApi::new(&config).context("Failed to build HTTP client")?;
    let mut lifecycle = RaceLifecycle::new(api).with_place_rule(config.place_rule);

    match cli.command {
        Commands::List => handle_list(&mut lifecycle).await,
        Commands::Show { id } => handle_show(&mut lifecycle, RaceId(id)).await,
        Commands::Create { name, students } => handle_create(&mut lifecycle, name, students).await,
        Commands::Results {
            id,
            places,
            per_field,
        } => {
            if per_field {
                lifecycle = lifecycle.with_place_rule(PlaceRule::PerField);
            }
            handle_results(&mut lifecycle, RaceId(id), places).await
        }
        Commands::Complete { id } => {
            let race = lifecycle.complete_race(RaceId(id)).await?;
            print_race(&race);
            Ok(())
        }
        Commands::Students => {
            let students = lifecycle.list_students().await?;
            if students.is_empty() {
                println!("No students yet.");
            }
            for student in students {
                println!("{:>5}  {} ({})", student.id.0, student.name, student.age);
            }
            Ok(())
        }
        Commands::AddStudent { name, age } => {
            let student = lifecycle.create_student(&name, age).await?;
            println!("Created student {}: {}", student.id, student.name);
            Ok(())
        }
    }
}

async fn handle_list(lifecycle: &mut RaceLifecycle<HttpRaceApi>) -> anyhow::Result<()> {
    match lifecycle.list_races().await {
        Ok(races) => {
            if races.is_empty() {
                println!("No races yet.");
            }
            for race in races.iter() {
                println!(
                    "{:>5}  {:<30} {:<12} {} lanes",
                    race.id.0,
                    race.name,
                    race.status.label(),
                    race.participant_count()
                );
            }
            Ok(())
        }
        Err(e) => {
            println!("No races loaded.");
            if e.is_retryable() {
                println!("The server could not be reached; run the command again to retry.");
            }
            Err(e.into())
        }
    }
}

async fn handle_show(lifecycle: &mut RaceLifecycle<HttpRaceApi>, id: RaceId) -> anyhow::Result<()> {
    let race = lifecycle.refresh_race(id).await?;
    print_race(&race);
    Ok(())
}

async fn handle_create(
    lifecycle: &mut RaceLifecycle<HttpRaceApi>,
    name: String,
    student_ids: Vec<i64>,
) -> anyhow::Result<()> {
    let students = lifecycle.list_students().await?.to_vec();

    let mut roster = RosterBuilder::with_name(name);
    while roster.slots().len() < student_ids.len() {
        roster.add_slot();
    }

    let slots: Vec<SlotId> = roster.slots().iter().map(|s| s.id).collect();
    for (slot, student_id) in slots.into_iter().zip(student_ids) {
        let student = students
            .iter()
            .find(|s| s.id == StudentId(student_id))
            .with_context(|| format!("Student {} does not exist", student_id))?;
        roster.bind_student(slot, student)?;
    }

    let race = lifecycle.create_race(&roster).await?;
    println!("Created race {}: {}", race.id, race.name);
    print_race(&race);
    Ok(())
}

async fn handle_results(
    lifecycle: &mut RaceLifecycle<HttpRaceApi>,
    id: RaceId,
    places: Vec<(i64, String)>,
) -> anyhow::Result<()> {
    let mut editor = lifecycle.open_results(id).await?;

    for (slot_id, place) in places {
        editor.set_place(SlotId(slot_id), place)?;
    }

    if let Err(e) = editor.validate() {
        bail!("Results not submitted: {}", e);
    }

    match lifecycle.submit_results(&mut editor).await {
        Ok(race) => {
            print_race(&race);
            Ok(())
        }
        Err(ClientError::Completion { race, source }) => {
            print_race(&race);
            println!("Places were saved, but the race is still '{}'.", race.status.label());
            println!("Run `races complete {}` to retry the completion.", race.id);
            Err(anyhow::anyhow!(
                "Completing race {} failed: {}",
                race.id,
                source.user_message()
            ))
        }
        Err(e) => Err(anyhow::anyhow!(e.user_message())),
    }
}

fn print_race(race: &Race) {
    println!("{} [{}]", race.name, race.status.label());
    println!("{:>5}  {:>5}  {:<25} {}", "lane", "slot", "name", "place");
    for participant in &race.participants {
        println!(
            "{:>5}  {:>5}  {:<25} {}",
            participant.lane,
            participant.id.0,
            participant.display_name(),
            participant
                .place
                .map(|p| p.to_string())
                .unwrap_or_else(|| "-".to_string())
        );
    }
}

fn parse_place_arg(arg: &str) -> Result<(i64, String), String> {
    let (slot, place) = arg
        .split_once('=')
        .ok_or_else(|| format!("Expected SLOT_ID=PLACE, got '{}'", arg))?;
    let slot = slot
        .trim()
        .parse::<i64>()
        .map_err(|_| format!("Invalid slot id '{}'", slot))?;
    Ok((slot, place.trim().to_string()))
}
