//! `mark-read` command implementation.

use anyhow::{Context as _, Result};
use catalog::ReadStatusStore;
use tracing::info;

use super::Context;
use crate::cli::MarkReadArgs;

/// Execute the `mark-read` command
pub fn run_mark_read(ctx: &Context, args: &MarkReadArgs) -> Result<()> {
    let mut store = ReadStatusStore::load(&ctx.store_path);

    let read = if args.toggle {
        store.toggle(&args.event)
    } else {
        store.set_read(&args.event, !args.unread);
        !args.unread
    };
    store
        .save()
        .with_context(|| format!("Failed to save {}", ctx.store_path.display()))?;

    info!(event = %args.event, read, "Read status updated");
    println!("{}: {}", args.event, if read { "read" } else { "unread" });
    Ok(())
}
