//! CLI runner - executes commands

use crate::api::{Status, TimelineKind, TimelineSource};
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::PagerConfig;
use crate::content::PagedContent;
use crate::coordinator::{Direction, ErrorHandler, FetchCompletion, FetchOutcome, PagedTimeline};
use crate::error::{Error, Result};
use crate::http::HttpClient;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Log level: `--verbose` wins, then the config file, then INFO
    pub fn log_level(&self) -> tracing::Level {
        if self.cli.verbose {
            return tracing::Level::DEBUG;
        }
        self.cli
            .config
            .as_ref()
            .and_then(|path| PagerConfig::from_file(path).ok())
            .map_or(tracing::Level::INFO, |config| config.log_level.into())
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Fetch { older, newer } => self.fetch(*older, *newer).await,
            Commands::Request => self.request(),
            Commands::Timelines => {
                self.timelines();
                Ok(())
            }
        }
    }

    /// Resolve the effective config: file, then environment, then flags
    fn config(&self) -> Result<PagerConfig> {
        let mut config = match (&self.cli.config, &self.cli.instance) {
            (Some(path), _) => PagerConfig::from_file(path)?,
            (None, Some(instance)) => PagerConfig::new(instance.clone()),
            (None, None) => return Err(Error::missing_field("instance")),
        };

        if let Some(instance) = &self.cli.instance {
            config.instance.clone_from(instance);
        }
        if let Some(timeline) = &self.cli.timeline {
            config.timeline = timeline.clone();
        }
        if let Some(limit) = self.cli.limit {
            config.limit = Some(limit);
        }
        config = config.with_env_token();
        if let Some(token) = &self.cli.token {
            config.access_token = Some(token.clone());
        }

        config.validate()?;
        Ok(config)
    }

    fn source(&self, config: &PagerConfig) -> Result<TimelineSource<Status>> {
        let client = Arc::new(HttpClient::with_config(config.http_client_config())?);
        let mut source = TimelineSource::new(client, config.timeline());
        if let Some(limit) = config.limit {
            source = source.with_limit(limit);
        }
        if let Some(token) = &config.access_token {
            source = source.with_access_token(token.clone());
        }
        Ok(source)
    }

    async fn fetch(&self, older: usize, newer: usize) -> Result<()> {
        let config = self.config()?;
        let source = self.source(&config)?;
        info!(
            "Reading {} timeline on {}",
            config.timeline.title(),
            config.instance
        );

        let handler: ErrorHandler = Arc::new(|e: &Error| {
            error!(error = %e, "Timeline fetch failed");
        });
        let timeline = PagedTimeline::with_error_handler(source.root_cursor(), handler);

        step(&timeline, Direction::Refresh).await?;
        for _ in 0..older {
            if !step(&timeline, Direction::Older).await? {
                break;
            }
        }
        for _ in 0..newer {
            if !step(&timeline, Direction::Newer).await? {
                break;
            }
        }

        let content = timeline.snapshot().await;
        info!(
            "Loaded {} pages, {} statuses",
            content.len(),
            content.elements().count()
        );
        self.print(&content)
    }

    fn print(&self, content: &PagedContent<Status>) -> Result<()> {
        for (position, page) in content.iter().enumerate() {
            match self.cli.format {
                OutputFormat::Json => {
                    let line = json!({
                        "page": page.id().get(),
                        "position": position,
                        "has_previous": page.has_previous(),
                        "has_next": page.has_next(),
                        "elements": page.elements(),
                    });
                    println!("{}", serde_json::to_string(&line)?);
                }
                OutputFormat::Pretty => {
                    println!("== {} ({} statuses) ==", page.id(), page.len());
                    for status in page.elements() {
                        println!(
                            "{:>20}  {:<24}  @{}",
                            status.id,
                            status.created_at().unwrap_or("-"),
                            status.account().unwrap_or("?")
                        );
                    }
                }
            }
        }
        Ok(())
    }

    fn request(&self) -> Result<()> {
        let config = self.config()?;
        let request = self.source(&config)?.root_blueprint()?.build()?;
        let url = request
            .url
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        let headers: Vec<(String, String)> = request
            .headers
            .iter()
            .map(|(name, value)| (name.clone(), mask_header(name, value)))
            .collect();

        match self.cli.format {
            OutputFormat::Json => {
                let out = json!({
                    "method": request.method,
                    "url": url,
                    "headers": headers,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            }
            OutputFormat::Pretty => {
                println!("{} {}", request.method, url);
                for (name, value) in headers {
                    println!("{name}: {value}");
                }
            }
        }
        Ok(())
    }

    fn timelines(&self) {
        let kinds = TimelineKind::SIMPLE.into_iter().chain([
            TimelineKind::Hashtag("NAME".to_string()),
            TimelineKind::List("ID".to_string()),
        ]);
        for kind in kinds {
            let path = kind.path().unwrap_or_else(|| "-".to_string());
            match self.cli.format {
                OutputFormat::Json => {
                    let line = json!({
                        "name": kind.to_string(),
                        "title": kind.title(),
                        "path": path,
                        "query": kind.query().map(|(k, v)| format!("{k}={v}")),
                        "requires_auth": kind.requires_auth(),
                    });
                    println!("{line}");
                }
                OutputFormat::Pretty => {
                    println!("{:<12} {:<12} {}", kind.to_string(), kind.title(), path);
                }
            }
        }
    }
}

/// Run one fetch to completion. `Ok(false)` when the direction is exhausted.
async fn step(timeline: &PagedTimeline<Status>, direction: Direction) -> Result<bool> {
    let outcome = match direction {
        Direction::Older => timeline.fetch_older().await,
        Direction::Newer => timeline.fetch_newer().await,
        Direction::Refresh => timeline.refresh().await,
    };
    match outcome {
        FetchOutcome::Started(handle) => match handle.wait().await {
            FetchCompletion::Inserted(_) => Ok(true),
            FetchCompletion::Failed => Err(Error::Other(format!("{direction} fetch failed"))),
        },
        FetchOutcome::NoMoreContent => {
            info!("No {direction} content");
            Ok(false)
        }
        FetchOutcome::AlreadyFetching => Ok(false),
    }
}

fn mask_header(name: &str, value: &str) -> String {
    if name.eq_ignore_ascii_case("authorization") {
        "Bearer ***".to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn runner(args: &[&str]) -> Runner {
        let mut argv = vec!["timeline-pager"];
        argv.extend_from_slice(args);
        Runner::new(Cli::parse_from(argv))
    }

    #[test]
    fn test_config_requires_instance() {
        let err = runner(&["request"]).config().unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { .. }));
    }

    #[test]
    fn test_flags_override_config() {
        let config = runner(&[
            "--instance",
            "a.example",
            "--timeline",
            "tag:rust",
            "--limit",
            "5",
            "--token",
            "t",
            "request",
        ])
        .config()
        .unwrap();

        assert_eq!(config.instance, "a.example");
        assert_eq!(config.timeline, TimelineKind::Hashtag("rust".to_string()));
        assert_eq!(config.limit, Some(5));
        assert_eq!(config.access_token.as_deref(), Some("t"));
    }

    #[test]
    fn test_invalid_limit_is_rejected() {
        let err = runner(&["-i", "a.example", "-l", "100", "request"])
            .config()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue { .. }));
    }

    #[test]
    fn test_verbose_log_level() {
        assert_eq!(
            runner(&["-v", "timelines"]).log_level(),
            tracing::Level::DEBUG
        );
        assert_eq!(runner(&["timelines"]).log_level(), tracing::Level::INFO);
    }

    #[test]
    fn test_mask_header() {
        assert_eq!(mask_header("Authorization", "Bearer abc"), "Bearer ***");
        assert_eq!(mask_header("Accept", "*/*"), "*/*");
    }
}
