use log::debug;
use serde::{Deserialize, Serialize};
use snafu::prelude::*;

use std::fs;
use std::path::{Path, PathBuf};

use crate::master::*;

/// Name of the master workbook when no output path is given.
pub const DEFAULT_OUTPUT_FILE_NAME: &str = "master_resultados.xlsx";

/// The content of a JSON configuration file.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ConsolidationSettings {
    #[serde(rename = "rootDirectory")]
    pub root_directory: Option<String>,
    #[serde(rename = "outputPath")]
    pub output_path: Option<String>,
}

/// The parameters of a run.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ConsolidationConfig {
    pub root_directory: PathBuf,
    pub output_path: PathBuf,
}

impl ConsolidationConfig {
    /// Writes the master workbook in the root directory.
    pub fn new(root_directory: PathBuf) -> ConsolidationConfig {
        let output_path = root_directory.join(DEFAULT_OUTPUT_FILE_NAME);
        ConsolidationConfig {
            root_directory,
            output_path,
        }
    }

    pub fn with_output(self, output_path: PathBuf) -> ConsolidationConfig {
        ConsolidationConfig {
            output_path,
            ..self
        }
    }
}

pub fn read_settings(path: &Path) -> MasterResult<ConsolidationSettings> {
    let p = path.display().to_string();
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path: p.clone() })?;
    debug!("read_settings: {:?}", contents);
    serde_json::from_str(&contents).context(ParsingJsonSnafu { path: p })
}

/// Relative paths in a configuration file are relative to the file itself.
fn relative_to(base: Option<&Path>, p: &str) -> PathBuf {
    let path = PathBuf::from(p);
    match base {
        Some(b) if path.is_relative() => b.join(path),
        _ => path,
    }
}

/// Combines the configuration file (if any) with the command line options.
///
/// The command line options take precedence. A root directory must be provided
/// by one or the other.
pub fn resolve_config(
    config: Option<&str>,
    root: Option<&str>,
    out: Option<&str>,
) -> MasterResult<ConsolidationConfig> {
    let (settings, base) = match config {
        Some(c) => {
            let path = Path::new(c);
            let settings = read_settings(path)?;
            debug!("resolve_config: settings: {:?}", settings);
            (Some(settings), path.parent().map(|p| p.to_path_buf()))
        }
        None => (None, None),
    };
    let base = base.as_deref();

    let root_directory: PathBuf = match (root, settings.as_ref().and_then(|s| s.root_directory.as_ref())) {
        (Some(r), _) => PathBuf::from(r),
        (None, Some(r)) => relative_to(base, r),
        (None, None) => return MissingRootConfigSnafu {}.fail(),
    };

    let res = ConsolidationConfig::new(root_directory);
    let res = match (out, settings.as_ref().and_then(|s| s.output_path.as_ref())) {
        (Some(o), _) => res.with_output(PathBuf::from(o)),
        (None, Some(o)) => res.with_output(relative_to(base, o)),
        (None, None) => res,
    };
    debug!("resolve_config: {:?}", res);
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(dir: &Path, contents: &str) -> String {
        let p = dir.join("config.json");
        fs::write(&p, contents).unwrap();
        p.display().to_string()
    }

    #[test]
    fn default_output_in_root() {
        let c = resolve_config(None, Some("/data/coops"), None).unwrap();
        assert_eq!(c.root_directory, PathBuf::from("/data/coops"));
        assert_eq!(
            c.output_path,
            PathBuf::from("/data/coops/master_resultados.xlsx")
        );
    }

    #[test]
    fn paths_relative_to_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(
            dir.path(),
            r#"{ "rootDirectory": "fontes", "outputPath": "saida/master.xlsx" }"#,
        );
        let c = resolve_config(Some(&config), None, None).unwrap();
        assert_eq!(c.root_directory, dir.path().join("fontes"));
        assert_eq!(c.output_path, dir.path().join("saida/master.xlsx"));
    }

    #[test]
    fn command_line_overrides_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(dir.path(), r#"{ "rootDirectory": "fontes" }"#);
        let c = resolve_config(Some(&config), Some("/other"), Some("/tmp/m.xlsx")).unwrap();
        assert_eq!(c.root_directory, PathBuf::from("/other"));
        assert_eq!(c.output_path, PathBuf::from("/tmp/m.xlsx"));

        let c = resolve_config(Some(&config), None, None).unwrap();
        assert_eq!(
            c.output_path,
            dir.path().join("fontes").join(DEFAULT_OUTPUT_FILE_NAME)
        );
    }

    #[test]
    fn missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(dir.path(), r#"{ "outputPath": "m.xlsx" }"#);
        assert!(matches!(
            resolve_config(Some(&config), None, None),
            Err(MasterError::MissingRootConfig {})
        ));
        assert!(matches!(
            resolve_config(None, None, None),
            Err(MasterError::MissingRootConfig {})
        ));
    }

    #[test]
    fn bad_config_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(dir.path(), "{ rootDirectory: ");
        assert!(matches!(
            resolve_config(Some(&config), None, None),
            Err(MasterError::ParsingJson { .. })
        ));
        let missing = dir.path().join("none.json").display().to_string();
        assert!(matches!(
            resolve_config(Some(&missing), None, None),
            Err(MasterError::OpeningJson { .. })
        ));
    }
}
