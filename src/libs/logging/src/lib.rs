// Copyright (c) 2019-2022 Alibaba Cloud
// Copyright (c) 2019-2022 Ant Group
//
// SPDX-License-Identifier: Apache-2.0
//

use std::io;
use std::process;

use slog::{o, Drain, Level, Logger};

const LOG_LEVELS: &[(&str, Level)] = &[
    ("trace", Level::Trace),
    ("debug", Level::Debug),
    ("info", Level::Info),
    ("warn", Level::Warning),
    ("error", Level::Error),
    ("critical", Level::Critical),
];

const DEFAULT_SUBSYSTEM: &str = "root";

/// Creates a JSON logger writing to `writer`. The returned guard flushes the
/// async drain when dropped and must be kept alive as long as the logger.
pub fn create_logger<W>(
    name: &str,
    source: &str,
    level: Level,
    writer: W,
) -> (Logger, slog_async::AsyncGuard)
where
    W: io::Write + Send + Sync + 'static,
{
    let json_drain = slog_json::Json::new(writer)
        .add_default_keys()
        .build()
        .fuse();

    let filter_drain = json_drain.filter_level(level).fuse();

    let (async_drain, guard) = slog_async::Async::new(filter_drain)
        .thread_name("slog-async-logger".into())
        .build_with_guard();

    let logger = Logger::root(
        async_drain.fuse(),
        o!("version" => env!("CARGO_PKG_VERSION"),
            "subsystem" => DEFAULT_SUBSYSTEM,
            "pid" => process::id().to_string(),
            "name" => name.to_string(),
            "source" => source.to_string()),
    );

    (logger, guard)
}

/// Creates a human readable logger on stderr for interactive use.
pub fn create_term_logger(level: Level) -> (Logger, slog_async::AsyncGuard) {
    let decorator = slog_term::TermDecorator::new().stderr().build();
    let term_drain = slog_term::FullFormat::new(decorator).build().fuse();
    let filter_drain = term_drain.filter_level(level).fuse();

    let (async_drain, guard) = slog_async::Async::new(filter_drain)
        .thread_name("slog-async-logger".into())
        .build_with_guard();

    (Logger::root(async_drain.fuse(), o!()), guard)
}

pub fn slog_level_from_str(level: &str) -> Result<Level, String> {
    LOG_LEVELS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(level))
        .map(|(_, l)| *l)
        .ok_or_else(|| format!("invalid log level {:?}", level))
}

pub fn slog_level_to_str(level: Level) -> &'static str {
    LOG_LEVELS
        .iter()
        .find(|(_, l)| *l == level)
        .map(|(name, _)| *name)
        .unwrap_or("info")
}
