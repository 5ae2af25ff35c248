use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::cluster::ClusterStrategy;
use crate::pipeline::feed::FeedOptions;
use crate::scoring::visibility::VisibilityRules;

/// Central configuration loaded from environment variables.
///
/// Every value has a default, so an empty environment is valid. The .env
/// file is loaded automatically at startup via dotenvy.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Show conversations whose relevance is above this (FEEDPAPER_MIN_RELEVANCE)
    pub min_relevance: f64,
    /// Show conversations with more upvotes than this (FEEDPAPER_MIN_UPVOTES)
    pub min_upvotes: u64,
    /// Show any conversation involving a followed account (FEEDPAPER_SHOW_FOLLOWED)
    pub show_followed: bool,
    /// Keep promoted posts in the feed (FEEDPAPER_INCLUDE_PROMOTED)
    pub include_promoted: bool,
    /// Which clustering algorithm to run (FEEDPAPER_CLUSTER_STRATEGY)
    pub strategy: ClusterStrategy,
}

impl Default for Config {
    fn default() -> Self {
        let rules = VisibilityRules::default();
        Self {
            min_relevance: rules.min_relevance,
            min_upvotes: rules.min_upvotes,
            show_followed: rules.show_followed,
            include_promoted: false,
            strategy: ClusterStrategy::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|name: &str| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Unset or blank variables fall back to defaults; values that are set
    /// but unparseable are errors naming the variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let strategy = match get("FEEDPAPER_CLUSTER_STRATEGY") {
            Some(raw) => raw
                .parse::<ClusterStrategy>()
                .map_err(anyhow::Error::msg)
                .context("Invalid FEEDPAPER_CLUSTER_STRATEGY")?,
            None => defaults.strategy,
        };

        Ok(Self {
            min_relevance: parse_or(
                get("FEEDPAPER_MIN_RELEVANCE"),
                "FEEDPAPER_MIN_RELEVANCE",
                defaults.min_relevance,
            )?,
            min_upvotes: parse_or(
                get("FEEDPAPER_MIN_UPVOTES"),
                "FEEDPAPER_MIN_UPVOTES",
                defaults.min_upvotes,
            )?,
            show_followed: parse_flag(
                get("FEEDPAPER_SHOW_FOLLOWED"),
                "FEEDPAPER_SHOW_FOLLOWED",
                defaults.show_followed,
            )?,
            include_promoted: parse_flag(
                get("FEEDPAPER_INCLUDE_PROMOTED"),
                "FEEDPAPER_INCLUDE_PROMOTED",
                defaults.include_promoted,
            )?,
            strategy,
        })
    }

    /// Feed options with this configuration's thresholds. The date window
    /// is left unbounded; the CLI fills it in.
    pub fn feed_options(&self) -> FeedOptions {
        FeedOptions {
            include_promoted: self.include_promoted,
            strategy: self.strategy,
            visibility: VisibilityRules {
                min_relevance: self.min_relevance,
                min_upvotes: self.min_upvotes,
                show_followed: self.show_followed,
            },
            ..FeedOptions::default()
        }
    }
}

fn parse_or<T>(raw: Option<String>, name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid {name}: {raw:?}")),
        None => Ok(default),
    }
}

fn parse_flag(raw: Option<String>, name: &str, default: bool) -> Result<bool> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => anyhow::bail!("Invalid {name}: {raw:?} (expected true or false)"),
    }
}
