//! Batch command: runs one descriptor across a numbered range of catalogs.

use super::run::{RunCommand, RunSummary};
use crate::descriptor::RunDescriptor;
use crate::flightclub::{build_resolver, CatalogSource, FlightClubClient, ItemResolver};
use anyhow::{bail, Context, Result};
use std::num::NonZeroU32;
use std::ops::RangeInclusive;
use std::path::Path;
use tracing::info;

/// Default site template; `{}` is replaced with the model number.
pub const DEFAULT_SITE_TEMPLATE: &str = "air-jordans/air-jordan-{}";

/// Model numbers the default template has catalogs for.
pub const JORDAN_MODELS: RangeInclusive<u32> = 1..=23;

/// The numbered range a batch walks through.
#[derive(Debug, Clone)]
pub struct BatchPlan {
    pub from: u32,
    pub to: u32,
    pub site_template: String,
    /// First file number; the descriptor's own `start` when `None`.
    pub start: Option<NonZeroU32>,
}

impl BatchPlan {
    /// Checks the range and template.
    pub fn validate(&self) -> Result<()> {
        if self.from > self.to {
            bail!("Invalid range: from ({}) is greater than to ({})", self.from, self.to);
        }

        if !self.site_template.contains("{}") {
            bail!("Site template '{}' has no '{{}}' placeholder", self.site_template);
        }

        if self.site_template == DEFAULT_SITE_TEMPLATE
            && !(JORDAN_MODELS.contains(&self.from) && JORDAN_MODELS.contains(&self.to))
        {
            bail!(
                "Air Jordan models range from {} to {}, got {}..={}",
                JORDAN_MODELS.start(),
                JORDAN_MODELS.end(),
                self.from,
                self.to
            );
        }

        Ok(())
    }

    /// Site for one number of the range.
    pub fn site_for(&self, number: u32) -> String {
        self.site_template.replace("{}", &number.to_string())
    }
}

/// Outcome of a batch: one run summary per number.
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    pub runs: Vec<(u32, RunSummary)>,
}

impl BatchSummary {
    /// Last file number written across all runs.
    pub fn last_number(&self) -> Option<u32> {
        self.runs.last().map(|(_, summary)| summary.last_number)
    }

    pub fn written(&self) -> usize {
        self.runs.iter().map(|(_, summary)| summary.written).sum()
    }

    pub fn excluded(&self) -> usize {
        self.runs.iter().map(|(_, summary)| summary.excluded).sum()
    }
}

/// Rewrites the descriptor for each number and chains the file counter.
pub struct BatchCommand {
    run: RunCommand,
}

impl BatchCommand {
    /// Creates a batch command around a run command.
    pub fn new(run: RunCommand) -> Self {
        Self { run }
    }

    /// Runs the batch against Flight Club.
    pub async fn execute(&self, path: &Path, plan: &BatchPlan) -> Result<BatchSummary> {
        let config = self.run.config();
        let client = FlightClubClient::new(config).context("Failed to create HTTP client")?;
        let resolver = build_resolver(config)?;

        self.execute_with(&client, resolver.as_ref(), path, plan).await
    }

    /// Runs the batch with a provided catalog source and resolver (for testing).
    pub async fn execute_with(
        &self,
        source: &impl CatalogSource,
        resolver: &dyn ItemResolver,
        path: &Path,
        plan: &BatchPlan,
    ) -> Result<BatchSummary> {
        plan.validate()?;

        let base = RunDescriptor::load(path)?;
        let mut next_start = Some(plan.start.unwrap_or(base.start));
        let mut summary = BatchSummary::default();

        for number in plan.from..=plan.to {
            let site = plan.site_for(number);
            let start = next_start
                .with_context(|| format!("Ran out of file numbers before {}", site))?;
            info!("Preparing to generate shoe files for {}", site);

            RunDescriptor { site, start, ..base.clone() }.persist(path)?;

            // Run from what is on disk, as a single run would
            let descriptor = RunDescriptor::load(path)?;
            let result = self.run.execute_with(source, resolver, &descriptor).await?;

            next_start = result.next_start();
            summary.runs.push((number, result));
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::flightclub::CatalogResolver;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Returns a catalog with as many items as the model number in the site.
    struct NumberedCatalog {
        requested: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl CatalogSource for NumberedCatalog {
        async fn catalog(&self, site: &str) -> Result<String> {
            self.requested.lock().unwrap().push(site.to_string());
            let count: usize = site.rsplit('-').next().unwrap().parse().unwrap();
            let items: Vec<String> = (0..count)
                .map(|i| format!(r#"{{"id": "{}-{}", "name": "Shoe {}-{}", "image": "x.jpg"}}"#, count, i, count, i))
                .collect();
            Ok(format!("<script>'impressions': [{}]</script>", items.join(",")))
        }
    }

    fn plan(from: u32, to: u32) -> BatchPlan {
        BatchPlan { from, to, site_template: DEFAULT_SITE_TEMPLATE.to_string(), start: None }
    }

    fn write_descriptor(dir: &TempDir, start: u32) -> std::path::PathBuf {
        let path = dir.path().join("exec.json");
        let out = dir.path().join("out");
        RunDescriptor::new("placeholder", out.to_str().unwrap(), Vec::new(), NonZeroU32::new(start).unwrap())
            .persist(&path)
            .unwrap();
        path
    }

    #[test]
    fn test_plan_validation() {
        assert!(plan(1, 23).validate().is_ok());
        assert!(plan(5, 5).validate().is_ok());
        assert!(plan(4, 2).validate().is_err());
        assert!(plan(0, 3).validate().is_err());
        assert!(plan(1, 24).validate().is_err());

        let custom = BatchPlan { site_template: "nike/dunk-{}".to_string(), ..plan(30, 40) };
        assert!(custom.validate().is_ok());

        let no_placeholder = BatchPlan { site_template: "nike/dunk".to_string(), ..plan(1, 2) };
        assert!(no_placeholder.validate().is_err());
    }

    #[test]
    fn test_site_for() {
        assert_eq!(plan(1, 2).site_for(11), "air-jordans/air-jordan-11");
    }

    #[tokio::test]
    async fn test_batch_chains_numbers() {
        let dir = TempDir::new().unwrap();
        let path = write_descriptor(&dir, 5);
        let source = NumberedCatalog { requested: Mutex::new(Vec::new()) };
        let command = BatchCommand::new(RunCommand::new(Config::default()));

        let summary = command.execute_with(&source, &CatalogResolver, &path, &plan(1, 3)).await.unwrap();

        // 1 + 2 + 3 items starting at 5
        assert_eq!(summary.written(), 6);
        assert_eq!(summary.last_number(), Some(10));
        let lasts: Vec<u32> = summary.runs.iter().map(|(_, s)| s.last_number).collect();
        assert_eq!(lasts, vec![5, 7, 10]);

        for n in 5..=10 {
            assert!(dir.path().join("out").join(format!("{}.json", n)).exists());
        }

        let requested = source.requested.lock().unwrap().clone();
        assert_eq!(
            requested,
            vec!["air-jordans/air-jordan-1", "air-jordans/air-jordan-2", "air-jordans/air-jordan-3"]
        );

        // The descriptor on disk reflects the last iteration
        let saved = RunDescriptor::load(&path).unwrap();
        assert_eq!(saved.site, "air-jordans/air-jordan-3");
        assert_eq!(saved.start.get(), 8);
    }

    #[tokio::test]
    async fn test_batch_start_override() {
        let dir = TempDir::new().unwrap();
        let path = write_descriptor(&dir, 5);
        let source = NumberedCatalog { requested: Mutex::new(Vec::new()) };
        let command = BatchCommand::new(RunCommand::new(Config::default()));

        let plan = BatchPlan { start: NonZeroU32::new(100), ..plan(2, 2) };
        let summary = command.execute_with(&source, &CatalogResolver, &path, &plan).await.unwrap();

        assert_eq!(summary.last_number(), Some(101));
    }

    #[tokio::test]
    async fn test_batch_stops_when_numbers_run_out() {
        let dir = TempDir::new().unwrap();
        let path = write_descriptor(&dir, 1);
        let source = NumberedCatalog { requested: Mutex::new(Vec::new()) };
        let command = BatchCommand::new(RunCommand::new(Config::default()));

        // The one item of model 1 takes the last number, nothing is left for model 2
        let plan = BatchPlan { start: Some(NonZeroU32::MAX), ..plan(1, 2) };
        let err = command.execute_with(&source, &CatalogResolver, &path, &plan).await.unwrap_err();

        assert!(err.to_string().contains("Ran out of file numbers before air-jordans/air-jordan-2"));
        assert_eq!(source.requested.lock().unwrap().len(), 1);
        assert!(dir.path().join("out").join(format!("{}.json", u32::MAX)).exists());
    }

    #[tokio::test]
    async fn test_batch_invalid_range_touches_nothing() {
        let dir = TempDir::new().unwrap();
        let path = write_descriptor(&dir, 1);
        let source = NumberedCatalog { requested: Mutex::new(Vec::new()) };
        let command = BatchCommand::new(RunCommand::new(Config::default()));

        let result = command.execute_with(&source, &CatalogResolver, &path, &plan(3, 1)).await;
        assert!(result.is_err());
        assert!(source.requested.lock().unwrap().is_empty());
        assert_eq!(RunDescriptor::load(&path).unwrap().site, "placeholder");
    }
}
