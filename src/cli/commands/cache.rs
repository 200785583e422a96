use anyhow::{Context, Result};

use super::Session;
use crate::cache::CacheStore;
use crate::cli::CacheCommand;
use crate::paths;
use crate::ui::Style;

pub async fn run_cache(command: CacheCommand, session: &Session) -> Result<()> {
    let cache = CacheStore::open(
        paths::speech_cache_dir()?,
        session.config.tts.cache_expiration_days,
    )
    .await;

    match command {
        CacheCommand::Info => {
            let stats = cache.stats().await;
            println!("{}", Style::header("Speech cache"));
            println!("  {} {}", Style::label("dir:    "), Style::value(cache.dir().display()));
            println!("  {} {}", Style::label("entries:"), stats.entries);
            println!("  {} {}", Style::label("size:   "), format_bytes(stats.total_bytes));
            println!(
                "  {} {} days",
                Style::label("expiry: "),
                session.config.tts.cache_expiration_days
            );
        }
        CacheCommand::Sweep => {
            let removed = cache.sweep().await;
            println!("{} {removed} expired entries removed", Style::success("✓"));
        }
        CacheCommand::Clear => {
            cache
                .clear_all()
                .await
                .context("Failed to clear speech cache")?;
            println!("{} Speech cache cleared", Style::success("✓"));
        }
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    let bytes = bytes as f64;
    if bytes < KIB {
        format!("{bytes} B")
    } else if bytes < KIB * KIB {
        format!("{:.1} KB", bytes / KIB)
    } else {
        format!("{:.1} MB", bytes / KIB / KIB)
    }
}
