use log::{error, info, warn};
use std::fs;
use std::path::Path;
use std::process;

use crate::config::AppConfig;

/// Run all boot checks. Call this before Rocket launches.
/// Creates missing directories, warns about unwritable ones, and
/// aborts if the database directory cannot be used.
pub fn run(config: &AppConfig) {
    info!("Formdesk boot check starting...");

    let mut warnings = 0u32;
    let mut errors = 0u32;

    let db_dir = Path::new(&config.db_path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let upload_dir = Path::new(&config.upload_dir);

    // ── 1. Directories ─────────────────────────────────
    for dir in [db_dir, upload_dir] {
        if !dir.exists() {
            match fs::create_dir_all(dir) {
                Ok(_) => info!("  Created directory: {}", dir.display()),
                Err(e) => {
                    error!("  FAILED to create directory {}: {}", dir.display(), e);
                    errors += 1;
                }
            }
        }
    }

    // ── 2. Database directory writable ──────────────────
    if db_dir.exists() && !writable(db_dir) {
        error!("  Database directory not writable: {}", db_dir.display());
        errors += 1;
    }

    // ── 3. Uploads directory writable ───────────────────
    if upload_dir.exists() && !writable(upload_dir) {
        warn!(
            "  Uploads directory not writable: {} (file uploads will fail)",
            upload_dir.display()
        );
        warnings += 1;
    }

    // ── 4. Rocket.toml exists ───────────────────────────
    if !Path::new("Rocket.toml").exists() {
        warn!("  Rocket.toml not found, using default config");
        warnings += 1;
    }

    // ── Summary ─────────────────────────────────────────
    if errors > 0 {
        error!(
            "Boot check FAILED: {} error(s), {} warning(s). Aborting.",
            errors, warnings
        );
        process::exit(1);
    }

    if warnings > 0 {
        warn!(
            "Boot check passed with {} warning(s). Some features may not work correctly.",
            warnings
        );
    } else {
        info!("Boot check passed. All systems go.");
    }
}

fn writable(dir: &Path) -> bool {
    let test_file = dir.join(".write_test");
    match fs::write(&test_file, "test") {
        Ok(_) => {
            let _ = fs::remove_file(&test_file);
            true
        }
        Err(_) => false,
    }
}
