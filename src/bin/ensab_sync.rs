//! ensab-sync - command-line access to the member API
//!
//! ```text
//! ensab-sync show <id>                       print a stored family as JSON
//! ensab-sync new <name> [lineage ...]        store a new family, print its route
//! ensab-sync diff <baseline.json> <live.json> list the calls a commit would make
//! ensab-sync push <baseline.json> <live.json> commit the difference, with retries
//! ```
//!
//! The API root comes from `ENSAB_API_URL` or the config file; log output is
//! controlled by `RUST_LOG`.
use std::error::Error;
use std::path::Path;

use ensab::family_tree::navigation::family_route_with_id;
use ensab::family_tree::{
    CommitError, CommitPlan, Config, EditSession, HttpTransport, RemoteCall, RetryPolicy,
};
use ensab::shared::RawMember;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

const USAGE: &str = "usage: ensab-sync <show ID | new NAME [LINEAGE...] | diff BASE LIVE | push BASE LIVE>";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = Config::load()?;
    let transport = HttpTransport::new(config.clone());

    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["show", id] => {
            let id: Uuid = id.parse()?;
            let session = EditSession::load(&transport, id, config).await?;
            println!("{}", session.live().to_raw().to_json_pretty()?);
        }
        ["new", name, lineages @ ..] => {
            let prefix = config.route_prefix().to_string();
            let mut session = EditSession::new_family(name, config);
            let root = session.root_id();
            for lineage in lineages {
                session.add_sons(root, lineage, true);
            }
            session
                .commit_confirmed(&transport, &RetryPolicy::default())
                .await?;
            match family_route_with_id(&prefix, &session.live().name, root) {
                Some(route) => println!("{}", route),
                None => println!("{}", root),
            }
        }
        ["diff", baseline, live] => {
            let session = resume(baseline, live, config)?;
            print_plan(&session.plan());
        }
        ["push", baseline, live] => {
            let mut session = resume(baseline, live, config)?;
            match session
                .commit_confirmed(&transport, &RetryPolicy::default())
                .await
            {
                Ok(report) => println!("{} calls confirmed", report.confirmed.len()),
                Err(CommitError::Partial { failed, confirmed }) => {
                    for (call, error) in &failed {
                        eprintln!("failed: {} {} ({})", call.method(), call.path(), error);
                    }
                    return Err(format!(
                        "{} calls confirmed, {} failed",
                        confirmed.len(),
                        failed.len()
                    )
                    .into());
                }
            }
        }
        _ => {
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    }

    Ok(())
}

fn resume(baseline: &str, live: &str, config: Config) -> Result<EditSession, Box<dyn Error>> {
    let baseline = read_tree(Path::new(baseline))?;
    let live = read_tree(Path::new(live))?;
    Ok(EditSession::resume(baseline, live, config))
}

fn read_tree(path: &Path) -> Result<RawMember, Box<dyn Error>> {
    let text = std::fs::read_to_string(path)?;
    Ok(RawMember::from_json(&text)?)
}

fn print_plan(plan: &CommitPlan) {
    if plan.is_empty() {
        println!("nothing to commit");
        return;
    }
    for call in plan.iter() {
        let detail = match call {
            RemoteCall::CreateFamily(family) => format!("{} members", family.len()),
            RemoteCall::AppendChildren { sons, .. } => format!("{} subtrees", sons.len()),
            RemoteCall::UpdateFields(updates) => format!("{} members", updates.len()),
            RemoteCall::Delete(_) => String::new(),
        };
        println!("{:<6} {} {}", call.method().to_string(), call.path(), detail);
    }
}
