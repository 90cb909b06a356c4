use colored::{ColoredString, Colorize};

use promptkit::config::Config;
use promptkit::error::Result;
use promptkit::packs::{FileStatus, PackInstaller};

// ── Pack commands ───────────────────────────────────────────────────────

pub fn cmd_list(config: &Config, json: bool) -> Result<()> {
    let installer = PackInstaller::new(&config.packs_dir);
    let available = installer.store().list_available()?;
    let installed = installer.list_installed(&config.repo_root);

    if json {
        let out = serde_json::json!({
            "available": available,
            "installed": installed,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("{}", "Available packs:".bold());
    if available.is_empty() {
        println!("- (none)");
    }
    for pack in &available {
        println!("- {} {}: {}", pack.name, pack.version, pack.description);
    }

    println!("\n{}", "Installed packs:".bold());
    if installed.is_empty() {
        println!("- (none)");
    }
    for pack in &installed {
        println!("- {} {} (source: {})", pack.name, pack.version, pack.source);
    }

    Ok(())
}

pub fn cmd_install(config: &Config, pack: &str, force: bool, json: bool) -> Result<()> {
    let installer = PackInstaller::new(&config.packs_dir);

    let report = installer.install(&config.repo_root, pack, force)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} Installed pack '{}' v{}",
        "✓".green(),
        report.pack.bold(),
        report.version
    );
    for file in &report.files {
        println!("  {}: {}", file.target, paint_status(file.status));
    }
    println!("AGENTS.md: {}", report.agents_md);

    Ok(())
}

fn paint_status(status: FileStatus) -> ColoredString {
    let label = status.to_string();
    match status {
        FileStatus::Created => label.green(),
        FileStatus::Overwritten => label.yellow(),
        FileStatus::Unchanged => label.dimmed(),
    }
}
