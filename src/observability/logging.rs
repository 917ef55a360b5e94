//! Structured logging.

use std::io::IsTerminal;

use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Crate targets whose events pass at the configured level: the library
/// and the `run-tests` / `auth-suite` binaries.
const TARGETS: &[&str] = &["app_entrypoint", "run_tests", "auth_suite"];

/// Filter used when `RUST_LOG` is not set.
pub fn default_directive(level: &str) -> String {
    let level = level.to_ascii_lowercase();
    std::iter::once("warn".to_string())
        .chain(TARGETS.iter().map(|target| format!("{target}={level}")))
        .collect::<Vec<_>>()
        .join(",")
}

/// Plain-line fmt layer: no timestamps (the container runtime adds them),
/// colour only when `ansi` is set.
pub fn fmt_layer<S, W>(writer: W, ansi: bool) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi)
        .without_time()
        .with_target(false)
}

/// Initialize the global tracing subscriber.
///
/// Safe to call more than once; later calls are ignored.
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(level)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer(std::io::stdout, std::io::stdout().is_terminal()))
        .try_init();
}

/// In-memory writer for asserting on log output.
#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct LogCapture(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

#[cfg(test)]
impl LogCapture {
    pub(crate) fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    pub(crate) fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }
}

#[cfg(test)]
impl std::io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(
            default_directive("DEBUG"),
            "warn,app_entrypoint=debug,run_tests=debug,auth_suite=debug"
        );
    }

    #[test]
    fn test_binary_targets_enabled() {
        let filter = default_directive("info");
        assert!(filter.contains("auth_suite=info"));
        assert!(filter.contains("run_tests=info"));
    }

    #[test]
    fn test_plain_lines_without_time_or_colour() {
        let capture = LogCapture::default();
        let subscriber = tracing_subscriber::registry().with(fmt_layer(capture.clone(), false));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(step = "migrate", "Running step");
        });

        let out = capture.contents();
        assert!(!out.contains('\x1b'));
        assert!(out.trim_start().starts_with("INFO Running step"), "got: {out}");
        assert!(out.contains("step=") && out.contains("migrate"));
    }

    #[test]
    fn test_init_twice() {
        init("info");
        init("debug");
    }
}
