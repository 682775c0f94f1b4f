//! Executable resolution with per-process memoization.
//!
//! On Unix the program name is handed to the shell unchanged. On Windows the
//! system `convert.exe` can shadow ImageMagick's, so the resolver asks `where`
//! for every match and keeps the first one inside the ImageMagick
//! installation folder. Newer installs only ship the unified `magick`
//! launcher; when no per-tool binary qualifies, that launcher is searched for
//! instead and cached under the original program name.

pub mod cache;
pub mod strategy;

pub use cache::ResolutionCache;
pub use strategy::{ResolveStrategy, SearchSettings};

use std::sync::Arc;
use tracing::debug;

use crate::error::{ExecError, Result};
use crate::platform::Platform;
use crate::subprocess::{ProcessCommandBuilder, ProcessRunner};

pub struct Resolver {
    platform: Platform,
    strategy: ResolveStrategy,
    runner: Arc<dyn ProcessRunner>,
    cache: ResolutionCache,
}

impl Resolver {
    /// Build a resolver for `platform`, selecting its strategy once.
    pub fn new(
        platform: Platform,
        settings: SearchSettings,
        runner: Arc<dyn ProcessRunner>,
    ) -> Self {
        Self {
            platform,
            strategy: ResolveStrategy::for_platform(platform, settings),
            runner,
            cache: ResolutionCache::new(),
        }
    }

    /// Build a resolver for the platform this binary runs on.
    pub fn detect(settings: SearchSettings, runner: Arc<dyn ProcessRunner>) -> Self {
        Self::new(Platform::detect(), settings, runner)
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn strategy(&self) -> &ResolveStrategy {
        &self.strategy
    }

    /// Previously resolved path for `program`, without resolving it.
    pub fn cached(&self, program: &str) -> Option<String> {
        self.cache.get(program)
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Turn `program` into the path used to launch it.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when neither the program nor the
    /// fallback launcher is found under the installation folder, and passes
    /// through failures to run the path search itself.
    pub async fn resolve(&self, program: &str) -> Result<String> {
        if let Some(path) = self.cache.get(program) {
            return Ok(path);
        }

        let path = match &self.strategy {
            ResolveStrategy::Passthrough => program.to_string(),
            ResolveStrategy::SearchAndFilter(settings) => {
                self.search_and_filter(program, settings).await?
            }
        };

        debug!("Resolved '{}' to '{}'", program, path);
        self.cache.insert(program, &path);
        Ok(path)
    }

    async fn search_and_filter(
        &self,
        program: &str,
        settings: &SearchSettings,
    ) -> Result<String> {
        if let Some(path) = self.search(program, settings).await? {
            return Ok(path);
        }

        debug!(
            "No '{}' found under '{}', trying '{}'",
            program, settings.install_marker, settings.fallback_launcher
        );

        self.search(&settings.fallback_launcher, settings)
            .await?
            .ok_or_else(|| {
                ExecError::configuration(format!(
                    "Could not find {}.exe. Is it installed in the default \"{}\" folder?",
                    settings.fallback_launcher, settings.install_marker
                ))
            })
    }

    /// Run `where <name>` and pick the first match in the installation folder.
    ///
    /// `where` exits non-zero when nothing matches, which is treated as an
    /// empty candidate list.
    async fn search(&self, name: &str, settings: &SearchSettings) -> Result<Option<String>> {
        let output = self
            .runner
            .run(ProcessCommandBuilder::new("where").arg(name).build())
            .await?;

        if !output.status.success() {
            debug!("'where {}' found nothing ({})", name, output.status);
            return Ok(None);
        }

        let candidates = strategy::parse_candidates(&output.stdout);
        debug!("'where {}' returned {} candidate(s)", name, candidates.len());

        Ok(
            strategy::select_candidate(&candidates, &settings.install_marker)
                .map(str::to_string),
        )
    }
}
