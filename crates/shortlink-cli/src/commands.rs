use crate::cli::Command;
use shortlink_storage::{Alias, Storage, Target};
use std::io::Write;
use tracing::info;

/// Runs one command against `storage`, writing its result to `out`.
pub async fn execute(
    storage: &dyn Storage,
    command: Command,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match command {
        Command::Save { target, alias } => {
            let alias = Alias::new(alias)?;
            let target = Target::new(target)?;
            let id = storage.save(&target, &alias).await?;
            info!(alias = %alias, id = id.get(), "url saved");
            writeln!(out, "{id}")?;
        }
        Command::Get { alias } => {
            let alias = Alias::new(alias)?;
            let target = storage.get(&alias).await?;
            writeln!(out, "{target}")?;
        }
        Command::Update { alias, target } => {
            let alias = Alias::new(alias)?;
            let target = Target::new(target)?;
            storage.update(&alias, &target).await?;
            info!(alias = %alias, "url updated");
            writeln!(out, "updated {alias}")?;
        }
        Command::Delete { alias } => {
            let alias = Alias::new(alias)?;
            storage.delete(&alias).await?;
            info!(alias = %alias, "url deleted");
            writeln!(out, "deleted {alias}")?;
        }
        Command::List { json } => {
            let entries = storage.list().await?;
            if json {
                serde_json::to_writer_pretty(&mut *out, &entries)?;
                writeln!(out)?;
            } else {
                for entry in &entries {
                    writeln!(out, "{}\t{}", entry.alias, entry.target)?;
                }
            }
        }
    }

    Ok(())
}
