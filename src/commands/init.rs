//! Interactive descriptor creation and selection.

use crate::config::Config;
use crate::descriptor::{parse_tag_list, RunDescriptor};
use crate::prompt::Prompter;
use anyhow::Result;
use std::num::NonZeroU32;
use std::path::PathBuf;
use tracing::{info, warn};

/// Builds descriptors from prompted answers.
pub struct InitCommand<'a> {
    config: &'a Config,
}

impl<'a> InitCommand<'a> {
    /// Creates an init command.
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Prompts for every descriptor field. Returns the target path and the descriptor.
    pub fn prompt_descriptor(&self, prompter: &mut impl Prompter) -> Result<(PathBuf, RunDescriptor)> {
        let path = PathBuf::from(prompter.input("Path to write to", false)?);

        let site_prompt = format!("Site directory: {}/", self.config.site_root());
        let site = prompter.input(&site_prompt, false)?.trim().trim_start_matches('/').to_string();

        // An empty answer becomes "./" in RunDescriptor::new
        let dir = prompter.input("Directory to place shoe files", true)?;

        let exclude_list = if prompter.confirm("Use exclude tags?")? {
            Self::prompt_tags(prompter)?
        } else {
            Vec::new()
        };

        let answer = prompter.input("Starting file number", true)?;
        let start = answer.trim().parse::<NonZeroU32>().unwrap_or_else(|_| {
            warn!("Invalid value '{}', defaulting to 1", answer.trim());
            NonZeroU32::MIN
        });

        Ok((path, RunDescriptor::new(site, dir, exclude_list, start)))
    }

    /// Asks for the tag list until it parses.
    fn prompt_tags(prompter: &mut impl Prompter) -> Result<Vec<String>> {
        loop {
            let answer = prompter
                .input("List of exclude tags (separated by comma, requires quotations)", true)?;
            match parse_tag_list(&answer) {
                Ok(tags) => return Ok(tags),
                Err(e) => warn!("{}. Example: 'retro', 'low'", e),
            }
        }
    }

    /// Prompts for a descriptor and writes it. Returns the path written.
    pub fn execute(&self, prompter: &mut impl Prompter) -> Result<PathBuf> {
        let (path, descriptor) = self.prompt_descriptor(prompter)?;
        descriptor.persist(&path)?;
        info!("Wrote execution file {}", path.display());
        Ok(path)
    }

    /// Obtains a validated descriptor, prompting when no path is given.
    ///
    /// Without a path the user either creates a new descriptor (after which
    /// the flow restarts by loading it) or names an existing one.
    pub fn obtain(
        &self,
        prompter: &mut impl Prompter,
        path: Option<PathBuf>,
    ) -> Result<(PathBuf, RunDescriptor)> {
        let mut path = path;
        loop {
            if let Some(path) = path {
                let descriptor = RunDescriptor::load(&path)?;
                return Ok((path, descriptor));
            }

            path = if prompter.confirm("Create execution JSON file?")? {
                Some(self.execute(prompter)?)
            } else {
                Some(PathBuf::from(prompter.input("Path to execution JSON", false)?))
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::DescriptorError;
    use std::collections::VecDeque;
    use tempfile::TempDir;

    /// Answers prompts from a script, in order.
    struct ScriptedPrompter {
        inputs: VecDeque<String>,
        confirms: VecDeque<bool>,
    }

    impl ScriptedPrompter {
        fn new(inputs: &[&str], confirms: &[bool]) -> Self {
            Self {
                inputs: inputs.iter().map(|s| s.to_string()).collect(),
                confirms: confirms.iter().copied().collect(),
            }
        }
    }

    impl Prompter for ScriptedPrompter {
        fn input(&mut self, _prompt: &str, _allow_empty: bool) -> Result<String> {
            self.inputs.pop_front().ok_or_else(|| anyhow::anyhow!("script ran out of inputs"))
        }

        fn confirm(&mut self, _prompt: &str) -> Result<bool> {
            self.confirms.pop_front().ok_or_else(|| anyhow::anyhow!("script ran out of answers"))
        }
    }

    #[test]
    fn test_prompt_descriptor_full() {
        let config = Config::default();
        let mut prompter = ScriptedPrompter::new(
            &["exec.json", "air-jordans/air-jordan-1", "./out/", "'retro', 'gs'", "5"],
            &[true],
        );

        let (path, descriptor) = InitCommand::new(&config).prompt_descriptor(&mut prompter).unwrap();
        assert_eq!(path, PathBuf::from("exec.json"));
        assert_eq!(descriptor.site, "air-jordans/air-jordan-1");
        assert_eq!(descriptor.dir, "./out/");
        assert_eq!(descriptor.exclude_list, vec!["retro", "gs"]);
        assert_eq!(descriptor.start.get(), 5);
    }

    #[test]
    fn test_prompt_descriptor_defaults() {
        let config = Config::default();
        let mut prompter =
            ScriptedPrompter::new(&["exec.json", "/air-jordans/air-jordan-4", "", "abc"], &[false]);

        let (_, descriptor) = InitCommand::new(&config).prompt_descriptor(&mut prompter).unwrap();
        assert_eq!(descriptor.site, "air-jordans/air-jordan-4");
        assert_eq!(descriptor.dir, "./");
        assert!(descriptor.exclude_list.is_empty());
        assert_eq!(descriptor.start.get(), 1);
    }

    #[test]
    fn test_prompt_descriptor_zero_start_defaults_to_one() {
        let config = Config::default();
        let mut prompter = ScriptedPrompter::new(&["exec.json", "x", "./", "0"], &[false]);

        let (_, descriptor) = InitCommand::new(&config).prompt_descriptor(&mut prompter).unwrap();
        assert_eq!(descriptor.start.get(), 1);
    }

    #[test]
    fn test_malformed_tag_list_is_asked_again() {
        let config = Config::default();
        let mut prompter = ScriptedPrompter::new(
            &["exec.json", "x", "./", "retro, low", "__import__('os')", "'retro', 'low'", "1"],
            &[true],
        );

        let (_, descriptor) = InitCommand::new(&config).prompt_descriptor(&mut prompter).unwrap();
        assert_eq!(descriptor.exclude_list, vec!["retro", "low"]);
    }

    #[test]
    fn test_execute_persists_descriptor() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("exec.json");
        let config = Config::default();
        let mut prompter = ScriptedPrompter::new(
            &[path.to_str().unwrap(), "air-jordans/air-jordan-1", "./out/", "3"],
            &[false],
        );

        let written = InitCommand::new(&config).execute(&mut prompter).unwrap();
        assert_eq!(written, path);

        let loaded = RunDescriptor::load(&path).unwrap();
        assert_eq!(loaded.site, "air-jordans/air-jordan-1");
        assert_eq!(loaded.start.get(), 3);
    }

    #[test]
    fn test_obtain_with_path_skips_prompts() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("exec.json");
        RunDescriptor::new("x", "./", Vec::new(), NonZeroU32::MIN).persist(&path).unwrap();

        let config = Config::default();
        let mut prompter = ScriptedPrompter::new(&[], &[]);

        let (loaded_path, descriptor) =
            InitCommand::new(&config).obtain(&mut prompter, Some(path.clone())).unwrap();
        assert_eq!(loaded_path, path);
        assert_eq!(descriptor.site, "x");
    }

    #[test]
    fn test_obtain_create_then_restart_loads_it() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("new.json");
        let config = Config::default();
        let mut prompter = ScriptedPrompter::new(
            &[path.to_str().unwrap(), "air-jordans/air-jordan-2", "./", "1"],
            &[true, false],
        );

        let (loaded_path, descriptor) = InitCommand::new(&config).obtain(&mut prompter, None).unwrap();
        assert_eq!(loaded_path, path);
        assert_eq!(descriptor.site, "air-jordans/air-jordan-2");
    }

    #[test]
    fn test_obtain_prompted_path_validation_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, r#"{"site": "x", "exclude_list": [], "start": 1}"#).unwrap();

        let config = Config::default();
        let mut prompter = ScriptedPrompter::new(&[path.to_str().unwrap()], &[false]);

        let err = InitCommand::new(&config).obtain(&mut prompter, None).unwrap_err();
        let err = err.downcast::<DescriptorError>().unwrap();
        assert!(matches!(err, DescriptorError::MissingField("dir")));
    }
}
