//! Routes `tracing` output to the browser console.

use std::{io, sync::Once};

use tracing::{Level, Metadata};
use wasm_bindgen::JsValue;
use tracing_subscriber::{EnvFilter, fmt::MakeWriter, prelude::*, util::SubscriberInitExt};

const TRACING_PREFIX: &str = "[elementa] ";

static TRACING_INSTALLED: Once = Once::new();

/// Installs a console subscriber and the panic hook (idempotent).
///
/// `directives` uses the `EnvFilter` syntax, e.g. `"info,elementa_core=debug"`;
/// invalid directives fall back to `info`.
pub fn install_logging(directives: &str) {
    TRACING_INSTALLED.call_once(|| {
        console_error_panic_hook::set_once();

        let filter = EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new("info"));
        let console = tracing_subscriber::fmt::layer()
            .without_time()
            .with_ansi(false)
            .with_writer(ConsoleWriter)
            .with_filter(filter);

        if tracing_subscriber::registry().with(console).try_init().is_err() {
            web_sys::console::warn_1(&"Elementa tracing subscriber was already set".into());
        }
    });
}

struct ConsoleWriter;

impl<'a> MakeWriter<'a> for ConsoleWriter {
    type Writer = ConsoleLine;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleLine::new(Level::INFO)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleLine::new(*meta.level())
    }
}

/// Buffers one formatted event and hands it to `console` on drop.
struct ConsoleLine {
    level: Level,
    buffer: Vec<u8>,
}

impl ConsoleLine {
    fn new(level: Level) -> Self {
        Self {
            level,
            buffer: TRACING_PREFIX.as_bytes().to_vec(),
        }
    }
}

impl io::Write for ConsoleLine {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleLine {
    fn drop(&mut self) {
        let line = String::from_utf8_lossy(&self.buffer);
        let line = JsValue::from_str(line.trim_end());
        match self.level {
            Level::ERROR => web_sys::console::error_1(&line),
            Level::WARN => web_sys::console::warn_1(&line),
            Level::INFO => web_sys::console::info_1(&line),
            _ => web_sys::console::debug_1(&line),
        }
    }
}
