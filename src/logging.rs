//! Tracing installation for native hosts.
//!
//! Browser builds should call `elementa::web::install_logging` instead, which
//! writes to the developer console.

use std::io::{self, Write};
use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::{self, writer::MakeWriter};
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable holding `EnvFilter` directives.
pub const LOG_ENV: &str = "ELEMENTA_LOG";

const TRACING_PREFIX: &str = "[elementa] ";
const DEFAULT_DIRECTIVES: &str = "info";

static TRACING_INSTALLED: OnceLock<bool> = OnceLock::new();

/// Installs a stderr subscriber filtered by [`LOG_ENV`] (idempotent).
///
/// Returns whether this subscriber became the global default; later calls
/// report the outcome of the first one.
pub fn install() -> bool {
    let directives = std::env::var(LOG_ENV).unwrap_or_else(|_| DEFAULT_DIRECTIVES.to_string());
    install_with(&directives)
}

/// Installs a stderr subscriber filtered by `directives` (idempotent).
///
/// Invalid directives fall back to `info`. Returns whether this subscriber
/// became the global default; only the first call installs anything, and
/// later calls report its outcome.
pub fn install_with(directives: &str) -> bool {
    *TRACING_INSTALLED.get_or_init(|| {
        let filter =
            EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));
        let console = fmt::layer()
            .with_writer(PrefixedWriter)
            .with_ansi(false)
            .with_filter(filter);

        let installed = tracing_subscriber::registry().with(console).try_init().is_ok();
        if !installed {
            eprintln!("Elementa tracing subscriber failed to initialize");
        }
        installed
    })
}

struct PrefixedWriter;

impl<'a> MakeWriter<'a> for PrefixedWriter {
    type Writer = PrefixedWriterInner<io::Stderr>;

    fn make_writer(&'a self) -> Self::Writer {
        PrefixedWriterInner {
            inner: io::stderr(),
            wrote_prefix: false,
        }
    }
}

struct PrefixedWriterInner<W> {
    inner: W,
    wrote_prefix: bool,
}

impl<W: Write> Write for PrefixedWriterInner<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !self.wrote_prefix {
            self.inner.write_all(TRACING_PREFIX.as_bytes())?;
            self.wrote_prefix = true;
        }
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
