/**
 * MIT License
 *
 * Copyright (c) 2025 Takatoshi Kondo
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */
use once_cell::sync::OnceCell;
use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

static SUBSCRIBER: OnceCell<()> = OnceCell::new();

/// Initialize the process-wide `tracing` subscriber used by [`TracingLogger`].
///
/// Idempotent: subsequent calls after the first are no-ops. Respects
/// `RUST_LOG` if set, falling back to `default_level`.
pub fn init_tracing(default_level: Level) {
    SUBSCRIBER.get_or_init(|| {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::from(default_level.to_string()));

        fmt().with_env_filter(env_filter).with_target(true).init();
    });
}

/// A structured key-value context bag attached to a single log line.
///
/// Kept as an owned `Vec` rather than a borrowed slice so a [`Logger`] can be
/// boxed and stored without lifetime parameters on the client.
#[derive(Debug, Clone, Default)]
pub struct Context(Vec<(&'static str, String)>);

impl Context {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn with(mut self, key: &'static str, value: impl ToString) -> Self {
        self.0.push((key, value.to_string()));
        self
    }

    fn as_json(&self) -> String {
        let map: serde_json::Map<String, serde_json::Value> = self
            .0
            .iter()
            .map(|(k, v)| ((*k).to_string(), serde_json::Value::String(v.clone())))
            .collect();
        serde_json::Value::Object(map).to_string()
    }
}

/// The leveled logging capability consumed by the core (component I of the
/// ambient stack). Never required for correctness: a no-op implementation is
/// always acceptable, which is why every method takes `&self` rather than
/// returning a `Result`.
pub trait Logger {
    fn debug(&self, message: &str, ctx: &Context);
    fn info(&self, message: &str, ctx: &Context);
    fn notice(&self, message: &str, ctx: &Context);
    fn error(&self, message: &str, ctx: &Context);
}

/// Discards every log line. Used by tests and embedders that want silence.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn debug(&self, _message: &str, _ctx: &Context) {}
    fn info(&self, _message: &str, _ctx: &Context) {}
    fn notice(&self, _message: &str, _ctx: &Context) {}
    fn error(&self, _message: &str, _ctx: &Context) {}
}

/// Forwards every log line to the `tracing` crate. This is the default
/// [`Logger`] used by [`crate::mqtt::client::MqttClient::new`] when the
/// caller supplies none.
///
/// Does not call [`init_tracing`] itself; if no subscriber is installed,
/// `tracing`'s own no-op default applies and nothing is emitted.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn debug(&self, message: &str, ctx: &Context) {
        tracing::debug!(context = %ctx.as_json(), "{message}");
    }

    fn info(&self, message: &str, ctx: &Context) {
        tracing::info!(context = %ctx.as_json(), "{message}");
    }

    fn notice(&self, message: &str, ctx: &Context) {
        // tracing has no NOTICE level; map to INFO with an explicit marker.
        tracing::info!(context = %ctx.as_json(), notice = true, "{message}");
    }

    fn error(&self, message: &str, ctx: &Context) {
        tracing::error!(context = %ctx.as_json(), "{message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_logger_accepts_all_levels() {
        let logger = NoopLogger;
        let ctx = Context::new().with("packet_id", 5u16);
        logger.debug("x", &ctx);
        logger.info("x", &ctx);
        logger.notice("x", &ctx);
        logger.error("x", &ctx);
    }

    #[test]
    fn context_serializes_to_json_object() {
        let ctx = Context::new().with("topic", "a/b").with("qos", 1u8);
        let json = ctx.as_json();
        assert!(json.contains("\"topic\":\"a/b\""));
        assert!(json.contains("\"qos\":\"1\""));
    }
}
