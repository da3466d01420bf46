//! voley_core - command line driver
//!
//! ```text
//! voley_core [--env dev] status   <transfer_id>
//! voley_core [--env dev] list     <championship_id> [pending|rejected|in_progress|completed]
//! voley_core [--env dev] approve  <transfer_id> <role> <actor_id>
//! voley_core [--env dev] reject   <transfer_id> <role> <actor_id>
//! voley_core [--env dev] withdraw <transfer_id> <role> <actor_id>
//! voley_core [--env dev] watch    championship|match <id>
//! voley_core [--env dev] route    <category> <actor_id>
//! ```

use anyhow::{Context, Result, anyhow, bail};
use std::sync::Arc;
use tracing::info;

use voley_core::config::AppConfig;
use voley_core::realtime::ChannelScope;
use voley_core::transfer::{ListScope, TransferRequest, TransferStatus, TransferStore, classify};
use voley_core::{
    ActingRole, ActionGateway, Actor, NotificationRouter, RealtimeEvent, ScreenSession,
    SessionDeps,
};

const USAGE: &str = "usage: voley_core [--env <env>] <status|list|approve|reject|withdraw|watch|route> ...";

fn get_env(args: &[String]) -> String {
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

/// Arguments with the program name and `--env <value>` removed
fn positional(args: &[String]) -> Vec<String> {
    let mut out = vec![];
    let mut skip = false;
    for arg in args.iter().skip(1) {
        if skip {
            skip = false;
            continue;
        }
        if arg == "--env" || arg == "-e" {
            skip = true;
            continue;
        }
        out.push(arg.clone());
    }
    out
}

fn arg<'a>(args: &'a [String], idx: usize, name: &str) -> Result<&'a str> {
    args.get(idx)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("missing <{}>\n{}", name, USAGE))
}

fn parse_status(s: &str) -> Result<TransferStatus> {
    match s.to_lowercase().as_str() {
        "pending" => Ok(TransferStatus::Pending),
        "rejected" => Ok(TransferStatus::Rejected),
        "in_progress" => Ok(TransferStatus::InProgress),
        "completed" => Ok(TransferStatus::Completed),
        other => bail!("unknown status filter: {}", other),
    }
}

fn actor_from(args: &[String]) -> Result<Actor> {
    let role: ActingRole = arg(args, 2, "role")?
        .parse()
        .map_err(|e: String| anyhow!(e))?;
    Ok(Actor::new(role, arg(args, 3, "actor_id")?))
}

fn print_transfer(record: &TransferRequest) {
    let origin = record
        .origin_club
        .as_ref()
        .map(|c| c.name.as_str())
        .unwrap_or("-");
    println!(
        "{:<12} {:<12} {:<20} {:<20} -> {:<20} {}",
        record.id,
        classify(record).as_str(),
        record.request_type().as_str(),
        origin,
        record.destination_club.name,
        record.player.name,
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    let raw: Vec<String> = std::env::args().collect();
    let env = get_env(&raw);
    let args = positional(&raw);

    let app_config = AppConfig::load(&env).with_context(|| format!("loading {} config", env))?;
    let _log_guard = voley_core::logging::init_logging(&app_config);

    info!(
        env = %env,
        version = env!("CARGO_PKG_VERSION"),
        git = env!("GIT_HASH"),
        "Starting voley_core"
    );

    let command = args.first().map(String::as_str).unwrap_or("");
    if command == "route" {
        let category = arg(&args, 1, "category")?;
        let actor_id = arg(&args, 2, "actor_id")?;
        match NotificationRouter::route(category, actor_id) {
            Some(route) => println!("{}", route),
            None => println!("(ignored)"),
        }
        return Ok(());
    }

    let deps = SessionDeps::from_config(&app_config).context("building API client")?;

    match command {
        "status" => {
            let transfer_id = arg(&args, 1, "transfer_id")?;
            let store = TransferStore::new(deps.transfer_api.clone());
            let record = store.refresh(transfer_id).await?;
            print_transfer(&record);
        }
        "list" => {
            let championship_id = arg(&args, 1, "championship_id")?;
            let filter = args.get(2).map(|s| parse_status(s)).transpose()?;
            let store = TransferStore::new(deps.transfer_api.clone());
            store
                .refresh_championship(championship_id, ListScope::All)
                .await?;
            let records = match filter {
                Some(status) => store.filter(championship_id, status),
                None => store.listing(championship_id),
            };
            for record in &records {
                print_transfer(record);
            }
        }
        "approve" | "reject" | "withdraw" => {
            let transfer_id = arg(&args, 1, "transfer_id")?;
            let actor = actor_from(&args)?;
            let store = Arc::new(TransferStore::new(deps.transfer_api.clone()));
            let gateway = ActionGateway::new(deps.transfer_api.clone(), store.clone());

            let result = match command {
                "approve" => gateway.approve(transfer_id, &actor).await,
                "reject" => gateway.reject(transfer_id, &actor).await,
                _ => gateway.withdraw(transfer_id, &actor).await,
            };
            if let Err(e) = result {
                bail!("[{}] {} (kind: {})", e.code(), e, e.kind());
            }
            match store.get(transfer_id) {
                Some(record) => print_transfer(&record),
                None => println!("{} {}", transfer_id, command),
            }
        }
        "watch" => {
            let kind = arg(&args, 1, "championship|match")?;
            let id = arg(&args, 2, "id")?.to_string();
            let scope = match kind {
                "championship" => ChannelScope::Championship(id.clone()),
                "match" => ChannelScope::Match(id.clone()),
                other => bail!("unknown scope: {}\n{}", other, USAGE),
            };

            let mut session = ScreenSession::open(scope.clone(), &deps);
            let mut events = session
                .take_events()
                .ok_or_else(|| anyhow!("realtime is disabled in the {} config", env))?;

            if let ChannelScope::Championship(ref champ) = scope {
                for record in session
                    .transfers()
                    .refresh_championship(champ, ListScope::All)
                    .await?
                {
                    print_transfer(&record);
                }
            } else {
                let m = session.matches().refresh(&id).await?;
                println!("{} {} vs {} at {}", m.id, m.home_team, m.away_team, m.schedule.scheduled_at);
            }

            loop {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => break,
                    event = events.recv() => match event {
                        Some(RealtimeEvent::Invalidate(inv)) => {
                            println!("{} {:?}", inv.kind, inv.targets());
                            if let ChannelScope::Championship(ref champ) = scope {
                                for record in session.transfers().listing(champ) {
                                    print_transfer(&record);
                                }
                            } else if let Some(m) = session.matches().get(&id) {
                                println!("{} {} vs {} at {}", m.id, m.home_team, m.away_team, m.schedule.scheduled_at);
                            }
                        }
                        Some(other) => println!("{:?}", other),
                        None => break,
                    },
                }
            }
            session.close().await;
        }
        "" => bail!("{}", USAGE),
        other => bail!("unknown command: {}\n{}", other, USAGE),
    }

    Ok(())
}
