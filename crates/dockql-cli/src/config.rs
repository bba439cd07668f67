use crate::cli::ScoreArgs;
use crate::error::{CliError, Result};
use dockql::engine::similarity::RmsdMode;
use dockql::workflows::score::ScoreConfig;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// A scoring configuration as read from a TOML file, with every field
/// optional so command-line flags can fill the gaps.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct PartialScoreConfig {
    pub receptor_chains: Option<Vec<char>>,
    pub ligand_chains: Option<Vec<char>>,
    pub fnat_cutoff: Option<f64>,
    pub irmsd_cutoff: Option<f64>,
    pub mode: Option<RmsdMode>,
}

impl PartialScoreConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!(
                "Cannot read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| {
            CliError::Config(format!(
                "Cannot parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        debug!(path = %path.display(), config = ?config, "Loaded score configuration file.");
        Ok(config)
    }

    /// Resolves the final configuration: defaults, then the file, then the
    /// command-line flags on top.
    pub fn merge_with_cli(self, args: &ScoreArgs) -> ScoreConfig {
        let mut config = ScoreConfig::default();

        if let Some(chains) = self.receptor_chains {
            config.receptor_chains = chains;
        }
        if let Some(chains) = self.ligand_chains {
            config.ligand_chains = chains;
        }
        if let Some(cutoff) = self.fnat_cutoff {
            config.fnat_cutoff = cutoff;
        }
        if let Some(cutoff) = self.irmsd_cutoff {
            config.irmsd_cutoff = cutoff;
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }

        if !args.receptor_chains.is_empty() {
            config.receptor_chains = args.receptor_chains.clone();
        }
        if !args.ligand_chains.is_empty() {
            config.ligand_chains = args.ligand_chains.clone();
        }
        if let Some(cutoff) = args.fnat_cutoff {
            config.fnat_cutoff = cutoff;
        }
        if let Some(cutoff) = args.irmsd_cutoff {
            config.irmsd_cutoff = cutoff;
        }
        if args.exact {
            config.mode = RmsdMode::Direct;
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn bare_args() -> ScoreArgs {
        ScoreArgs {
            reference: "native.pdb".into(),
            decoys: vec!["model.pdb".into()],
            receptor_chains: Vec::new(),
            ligand_chains: Vec::new(),
            fnat_cutoff: None,
            irmsd_cutoff: None,
            exact: false,
            output: None,
            config: None,
        }
    }

    #[test]
    fn empty_file_and_flags_give_the_default_config() {
        let config = PartialScoreConfig::default().merge_with_cli(&bare_args());
        assert_eq!(config, ScoreConfig::default());
    }

    #[test]
    fn file_values_override_defaults() {
        let partial: PartialScoreConfig = toml::from_str(
            r#"
            receptor-chains = ["A", "B"]
            ligand-chains = ["C"]
            fnat-cutoff = 4.5
            mode = "direct"
            "#,
        )
        .unwrap();

        let config = partial.merge_with_cli(&bare_args());
        assert_eq!(config.receptor_chains, vec!['A', 'B']);
        assert_eq!(config.ligand_chains, vec!['C']);
        assert_eq!(config.fnat_cutoff, 4.5);
        assert_eq!(config.irmsd_cutoff, ScoreConfig::default().irmsd_cutoff);
        assert_eq!(config.mode, RmsdMode::Direct);
    }

    #[test]
    fn cli_flags_override_file_values() {
        let partial: PartialScoreConfig = toml::from_str(
            r#"
            receptor-chains = ["A"]
            fnat-cutoff = 4.5
            irmsd-cutoff = 12.0
            "#,
        )
        .unwrap();

        let args = ScoreArgs {
            receptor_chains: vec!['B'],
            fnat_cutoff: Some(6.0),
            exact: true,
            ..bare_args()
        };

        let config = partial.merge_with_cli(&args);
        assert_eq!(config.receptor_chains, vec!['B']);
        assert_eq!(config.fnat_cutoff, 6.0);
        assert_eq!(config.irmsd_cutoff, 12.0);
        assert_eq!(config.mode, RmsdMode::Direct);
    }

    #[test]
    fn unknown_file_keys_are_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("score.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "contact-cutoff = 5.0").unwrap();

        let result = PartialScoreConfig::from_file(&path);
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn missing_file_reports_a_config_error() {
        let result = PartialScoreConfig::from_file(Path::new("/nonexistent/score.toml"));
        assert!(matches!(result, Err(CliError::Config(_))));
    }
}
