use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub const DEFAULT_LOG_FILE_NAME: &str = "course-catalog.log";

#[derive(Debug, Clone)]
pub struct LoggerOptions {
    pub verbose: bool,
    pub level: Option<String>,
    pub json: bool,
    pub log_dir: Option<String>,
    pub file_name: String,
}

impl Default for LoggerOptions {
    fn default() -> Self {
        Self {
            verbose: false,
            level: None,
            json: false,
            log_dir: None,
            file_name: DEFAULT_LOG_FILE_NAME.to_string(),
        }
    }
}

/// 持有檔案寫入執行緒，程式結束前不能丟掉
#[must_use = "dropping the guard stops the log file writer"]
pub struct LogGuard {
    _file_guard: Option<WorkerGuard>,
}

fn default_filter(options: &LoggerOptions) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directive = match (&options.level, options.verbose) {
            (_, true) => "course_catalog=debug,tower_http=debug,info".to_string(),
            (Some(level), false) => format!("course_catalog={},tower_http=info", level),
            (None, false) => "course_catalog=info,tower_http=info".to_string(),
        };
        EnvFilter::new(directive)
    })
}

pub fn init_logger(options: &LoggerOptions) -> LogGuard {
    let mut layers = Vec::with_capacity(2);

    // span 結束時輸出耗時，取代 console span exporter
    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_span_events(FmtSpan::CLOSE);

    let console_layer = if options.json {
        console_layer.json().flatten_event(true).boxed()
    } else {
        console_layer.compact().boxed()
    };
    layers.push(console_layer);

    let mut file_guard = None;
    if let Some(log_dir) = &options.log_dir {
        let log_dir = Path::new(log_dir);
        if let Err(e) = std::fs::create_dir_all(log_dir) {
            eprintln!("Failed to create log directory {}: {}", log_dir.display(), e);
        } else {
            let file_appender =
                RollingFileAppender::new(Rotation::DAILY, log_dir, &options.file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            file_guard = Some(guard);

            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_span_events(FmtSpan::CLOSE)
                .json()
                .flatten_event(true)
                .boxed();
            layers.push(file_layer);
        }
    }

    // 測試中可能重複初始化，忽略已設定的情況
    let _ = tracing_subscriber::registry()
        .with(default_filter(options))
        .with(layers)
        .try_init();

    LogGuard {
        _file_guard: file_guard,
    }
}
