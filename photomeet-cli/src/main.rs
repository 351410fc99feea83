use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::prelude::*;

use photomeet_core::{
    ActivityId, ApplicationId, Decision, DemoControls, DomainError, SessionStore, UserId,
};

mod seed;

/// Photomeet: activity participation, review and rating walkthroughs
#[derive(Parser, Debug)]
#[command(name = "photomeet")]
#[command(about = "Activity participation, review and rating walkthroughs", long_about = None)]
struct Cli {
    /// Log at debug level
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the scripted lifecycle walkthrough against seeded data
    Demo(DemoArgs),
    /// Print every seeded activity with its roster and review counts
    Roster(RosterArgs),
}

#[derive(Parser, Debug)]
struct DemoArgs {
    /// Seed file to load instead of the embedded fixture
    #[arg(long)]
    seed: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct RosterArgs {
    /// Seed file to load instead of the embedded fixture
    #[arg(long)]
    seed: Option<PathBuf>,

    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,
}

/// Assert that a domain call was refused, printing the refusal.
fn expect_refusal<T>(result: Result<T, DomainError>, what: &str) -> Result<()> {
    match result {
        Ok(_) => bail!("{what} unexpectedly succeeded"),
        Err(err) => {
            println!("   refused as expected: {err}");
            Ok(())
        }
    }
}

fn run_demo(args: DemoArgs) -> Result<()> {
    let seed = seed::load(args.seed.as_deref())?;
    let mut store = seed::build_store(&seed)?;

    let id = ActivityId::from("act-sunset-walk");
    let organizer = store
        .session(&id)
        .context("the demo walkthrough needs the act-sunset-walk activity in the seed")?
        .activity()
        .organizer
        .clone();

    println!("== Applying ==");
    let ada = UserId::from("ada_frames");
    store.submit_application(&id, &ada, "Mostly film, happy to carry a tripod.")?;
    println!("   {ada} applied; role is now {}", store.current_role(&id, &ada)?);
    expect_refusal(
        store.submit_application(&id, &ada, "Asking again just in case."),
        "a second application",
    )?;

    println!("== Reviewing ==");
    let counts = store.counts(&id, &organizer)?;
    println!(
        "   {} applications on file ({} pending, {} accepted, {} rejected)",
        counts.total(),
        counts.pending,
        counts.accepted,
        counts.rejected
    );
    let ada_application = store
        .applicants(&id, &organizer)?
        .iter()
        .find(|application| application.applicant == ada)
        .map(|application| application.id.clone())
        .context("the walkthrough application went missing")?;
    let selected = store.select_applicant(&id, &organizer, &ada_application)?;
    println!("   reviewing {}: \"{}\"", selected.applicant, selected.message);
    let status = store.decide(&id, &organizer, &ada_application, Decision::Accepted)?;
    println!(
        "   decided {ada_application}: {status}; role is now {}",
        store.current_role(&id, &ada)?
    );
    expect_refusal(
        store.decide(
            &id,
            &organizer,
            &ApplicationId::from("unknown-id"),
            Decision::Accepted,
        ),
        "deciding an unknown application",
    )?;

    println!("== Rating ==");
    expect_refusal(
        store.request_rating(&id, &ada, &organizer, 5, None),
        "rating before the activity ended",
    )?;
    DemoControls::new(&mut store).force_ended(&id)?;
    println!("   activity forced into the ended phase");
    store.request_rating(
        &id,
        &ada,
        &organizer,
        5,
        Some("Great route and pacing.".to_string()),
    )?;
    store.request_rating(&id, &ada, &organizer, 4, None)?;
    println!("   {ada} rated the organizer twice; the second score replaced the first");
    expect_refusal(
        store.request_rating(&id, &organizer, &ada, 5, None),
        "an organizer rating",
    )?;
    for rating in store.ratings(&id)? {
        match &rating.comment {
            Some(comment) => println!(
                "   {} -> {}: {} (\"{comment}\")",
                rating.rater, rating.ratee, rating.score
            ),
            None => println!("   {} -> {}: {}", rating.rater, rating.ratee, rating.score),
        }
    }

    println!("== Cancelling ==");
    let market = ActivityId::from("act-night-market");
    let market_organizer = store
        .session(&market)
        .context("the demo walkthrough needs the act-night-market activity in the seed")?
        .activity()
        .organizer
        .clone();
    // Two hours before the start: inside the notice window.
    let too_late: DateTime<Utc> = "2030-07-12T19:00:00Z".parse()?;
    expect_refusal(
        store.cancel_activity(&market, &market_organizer, too_late),
        "a last-minute cancellation",
    )?;
    let well_ahead: DateTime<Utc> = "2030-07-10T09:00:00Z".parse()?;
    store.cancel_activity(&market, &market_organizer, well_ahead)?;
    println!("   {market} cancelled with enough notice");
    expect_refusal(
        store.submit_application(&market, &ada, "Is this still on?"),
        "applying to a cancelled activity",
    )?;

    println!("== Final state ==");
    print_store(&store, false)?;
    Ok(())
}

fn run_roster(args: RosterArgs) -> Result<()> {
    let seed = seed::load(args.seed.as_deref())?;
    let store = seed::build_store(&seed)?;
    print_store(&store, args.json)
}

fn print_store(store: &SessionStore, json: bool) -> Result<()> {
    if json {
        let mut entries = Vec::new();
        for activity in store.activities() {
            let counts = store.counts(&activity.id, &activity.organizer)?;
            entries.push(serde_json::json!({
                "id": activity.id,
                "title": activity.title,
                "status": activity.status,
                "organizer": activity.organizer,
                "members": store.members(&activity.id)?,
                "applicants": store.applicants(&activity.id, &activity.organizer)?,
                "counts": counts,
            }));
        }
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for activity in store.activities() {
        println!("{} \"{}\" [{}]", activity.id, activity.title, activity.status);
        println!("   organizer: {}", activity.organizer);
        let members = store.members(&activity.id)?;
        if members.is_empty() {
            println!("   members: none yet");
        } else {
            let joined: Vec<String> = members.iter().map(ToString::to_string).collect();
            println!("   members: {}", joined.join(", "));
        }
        let counts = store.counts(&activity.id, &activity.organizer)?;
        println!(
            "   applications: {} pending, {} accepted, {} rejected",
            counts.pending, counts.accepted, counts.rejected
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    match cli.command {
        Commands::Demo(args) => run_demo(args),
        Commands::Roster(args) => run_roster(args),
    }
}
