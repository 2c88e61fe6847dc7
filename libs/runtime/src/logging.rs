use crate::config::{LoggingConfig, Section};
use std::{
    collections::HashMap,
    io::{IsTerminal, Write},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};
use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_subscriber::{filter::Targets, fmt};

use file_rotate::{
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
    ContentLimit, FileRotate,
};

const DEFAULT_SECTION: &str = "default";
const DEFAULT_MAX_SIZE_MB: u64 = 100;
const DEFAULT_MAX_BACKUPS: usize = 3;

fn parse_tracing_level(s: &str) -> Option<Level> {
    match s.to_ascii_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        "off" | "none" => None,
        _ => Some(Level::INFO),
    }
}

fn level_filter(s: &str) -> LevelFilter {
    parse_tracing_level(s)
        .map(LevelFilter::from_level)
        .unwrap_or(LevelFilter::OFF)
}

/// `true` if `target` is `crate_name` itself or one of its submodules.
fn matches_crate_prefix(target: &str, crate_name: &str) -> bool {
    target == crate_name
        || target
            .strip_prefix(crate_name)
            .is_some_and(|rest| rest.starts_with("::"))
}

// -------- rotating file writer --------

#[derive(Clone)]
struct RotWriter(Arc<Mutex<FileRotate<AppendTimestamp>>>);

impl Write for RotWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0
            .lock()
            .map_err(|_| std::io::Error::other("log file writer poisoned"))?
            .write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.0
            .lock()
            .map_err(|_| std::io::Error::other("log file writer poisoned"))?
            .flush()
    }
}

/// Drops writes when no file is configured for a target.
struct RoutedWriter(Option<RotWriter>);

impl Write for RoutedWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match &mut self.0 {
            Some(w) => w.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match &mut self.0 {
            Some(w) => w.flush(),
            None => Ok(()),
        }
    }
}

/// Routes records to per-subsystem files by target prefix, else to the default file.
#[derive(Default)]
struct FileRouter {
    default: Option<RotWriter>,
    by_prefix: HashMap<String, RotWriter>,
}

impl FileRouter {
    fn resolve_for(&self, target: &str) -> Option<RotWriter> {
        self.by_prefix
            .iter()
            .find(|(name, _)| matches_crate_prefix(target, name))
            .map(|(_, w)| w.clone())
            .or_else(|| self.default.clone())
    }

    fn is_empty(&self) -> bool {
        self.default.is_none() && self.by_prefix.is_empty()
    }
}

impl<'a> fmt::MakeWriter<'a> for FileRouter {
    type Writer = RoutedWriter;

    fn make_writer(&'a self) -> Self::Writer {
        RoutedWriter(self.default.clone())
    }

    fn make_writer_for(&'a self, meta: &tracing::Metadata<'_>) -> Self::Writer {
        RoutedWriter(self.resolve_for(meta.target()))
    }
}

/// Relative log paths are anchored at `base_dir` (the server home directory).
fn resolve_log_path(file: &str, base_dir: &Path) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

fn create_rotating_writer_at_path(
    log_path: &Path,
    max_bytes: usize,
    max_backups: usize,
) -> std::io::Result<RotWriter> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let rot = FileRotate::new(
        log_path,
        AppendTimestamp::default(FileLimit::MaxFiles(max_backups)),
        ContentLimit::BytesSurpassed(max_bytes),
        Compression::None,
        #[cfg(unix)]
        None,
    );
    Ok(RotWriter(Arc::new(Mutex::new(rot))))
}

fn writer_for_section(name: &str, section: &Section, base_dir: &Path) -> Option<RotWriter> {
    if section.file.trim().is_empty() {
        return None;
    }
    let max_bytes = section.max_size_mb.unwrap_or(DEFAULT_MAX_SIZE_MB) * 1024 * 1024;
    let max_backups = section.max_backups.unwrap_or(DEFAULT_MAX_BACKUPS);
    let log_path = resolve_log_path(&section.file, base_dir);

    match create_rotating_writer_at_path(&log_path, max_bytes as usize, max_backups) {
        Ok(w) => Some(w),
        Err(e) => {
            // the subscriber is not installed yet
            eprintln!(
                "Failed to open log file for '{}': {} ({})",
                name,
                log_path.display(),
                e
            );
            None
        }
    }
}

/// Console filter: the "default" section sets the fallback level, every other
/// section overrides it for its own target prefix.
fn console_targets(cfg: &LoggingConfig) -> Targets {
    let default = cfg
        .get(DEFAULT_SECTION)
        .map(|s| level_filter(&s.console_level))
        .unwrap_or(LevelFilter::INFO);

    cfg.iter()
        .filter(|(name, _)| name.as_str() != DEFAULT_SECTION)
        .fold(Targets::new().with_default(default), |t, (name, s)| {
            t.with_target(name.clone(), level_filter(&s.console_level))
        })
}

fn file_targets(cfg: &LoggingConfig) -> Targets {
    let default = cfg
        .get(DEFAULT_SECTION)
        .filter(|s| !s.file.trim().is_empty())
        .map(|s| level_filter(&s.file_level))
        .unwrap_or(LevelFilter::OFF);

    cfg.iter()
        .filter(|(name, _)| name.as_str() != DEFAULT_SECTION)
        .fold(Targets::new().with_default(default), |t, (name, s)| {
            // a section without its own file still logs into the default file
            let level = if s.file_level.trim().is_empty() {
                default
            } else {
                level_filter(&s.file_level)
            };
            t.with_target(name.clone(), level)
        })
}

fn build_file_router(cfg: &LoggingConfig, base_dir: &Path) -> FileRouter {
    let mut router = FileRouter::default();
    for (name, section) in cfg {
        let Some(writer) = writer_for_section(name, section, base_dir) else {
            continue;
        };
        if name == DEFAULT_SECTION {
            router.default = Some(writer);
        } else {
            router.by_prefix.insert(name.clone(), writer);
        }
    }
    router
}

/// Install the global subscriber.
///
/// Console output is human readable (ANSI only on a terminal); file output is JSON.
/// `base_dir` resolves relative log file paths, usually `server.home_dir`.
pub fn init_logging_from_config(cfg: &LoggingConfig, base_dir: &Path) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer, Registry};

    // Bridge `log` → `tracing` before installing the subscriber
    let _ = tracing_log::LogTracer::init();

    let console_layer = fmt::layer()
        .with_ansi(std::io::stdout().is_terminal())
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_filter(console_targets(cfg));

    let router = build_file_router(cfg, base_dir);
    if router.is_empty() {
        let _ = Registry::default().with(console_layer).try_init();
        return;
    }

    let file_layer = fmt::layer()
        .json()
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_current_span(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_writer(router)
        .with_filter(file_targets(cfg));

    let _ = Registry::default()
        .with(console_layer)
        .with(file_layer)
        .try_init();
}
