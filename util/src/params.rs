//! Generic parameters functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::de::DeserializeOwned;
use std::fs::read_to_string;
use std::path::{Path, PathBuf};
use thiserror::Error;
use toml;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// An error that occurs during loading of a parameter file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("The software root environment variable (TRACKER_SW_ROOT) is not set")]
    SwRootNotSet,

    #[error("Cannot load the parmeter file: {0}")]
    FileLoadError(std::io::Error),

    #[error("Cannot read the parameter file: {0}")]
    DeserialiseError(toml::de::Error),
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Load a parameter file
///
/// The file path is relative to the "$TRACKER_SW_ROOT/params" directory,
/// unless it is absolute.
pub fn load<P>(param_file_path: &str) -> Result<P, LoadError>
where
    P: DeserializeOwned,
{
    load_path(resolve(param_file_path)?)
}

/// Find the parameter file a `load` of `param_file_path` would read.
pub fn resolve(param_file_path: &str) -> Result<PathBuf, LoadError> {
    let file = Path::new(param_file_path);
    if file.is_absolute() {
        return Ok(file.to_path_buf());
    }

    // Get the params dir
    let mut path = crate::host::get_sw_root().map_err(|_| LoadError::SwRootNotSet)?;
    path.push("params");
    path.push(file);

    Ok(path)
}

/// Load a parameter file from an explicit path, bypassing the params directory.
pub fn load_path<P, F>(path: F) -> Result<P, LoadError>
where
    P: DeserializeOwned,
    F: AsRef<Path>,
{
    // Load the file into a string
    let params_str = match read_to_string(path) {
        Ok(s) => s,
        Err(e) => return Err(LoadError::FileLoadError(e)),
    };

    from_str(params_str.as_str())
}

/// Parse parameters from a TOML string.
pub fn from_str<P>(params_str: &str) -> Result<P, LoadError>
where
    P: DeserializeOwned,
{
    toml::from_str(params_str).map_err(LoadError::DeserialiseError)
}

#[cfg(test)]
mod test {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Example {
        name: String,
        limit_ms: u64,
    }

    #[test]
    fn test_from_str() {
        let p: Example = from_str("name = \"az\"\nlimit_ms = 30000\n").unwrap();
        assert_eq!(
            p,
            Example {
                name: String::from("az"),
                limit_ms: 30000
            }
        );
    }

    #[test]
    fn test_from_str_missing_field() {
        let r: Result<Example, _> = from_str("name = \"az\"\n");
        assert!(matches!(r, Err(LoadError::DeserialiseError(_))));
    }

    #[test]
    fn test_resolve_absolute_path() {
        assert_eq!(
            resolve("/etc/tracker/track_exec.toml").unwrap(),
            PathBuf::from("/etc/tracker/track_exec.toml")
        );

        // Absolute paths are read directly, whatever the software root
        let r: Result<Example, _> = load("/definitely/not/a/params/file.toml");
        assert!(matches!(r, Err(LoadError::FileLoadError(_))));
    }

    #[test]
    fn test_load_path_missing_file() {
        let r: Result<Example, _> = load_path("/definitely/not/a/params/file.toml");
        assert!(matches!(r, Err(LoadError::FileLoadError(_))));
    }
}
