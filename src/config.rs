use std::env;
use std::fs;
use std::iter::FromIterator;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, ErrorKind};
use crate::geometry::{GeometrySpec, Rect};

const CONFIG_PATH_ENV_VAR: &str = "MAGPIE_CONFIG_FILE";

pub(crate) fn find_configfile_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();

    if let Ok(path) = env::var(CONFIG_PATH_ENV_VAR) {
        locations.push(PathBuf::from(path));
    }

    if let Ok(home) = env::var("HOME") {
        let home = PathBuf::from(home);

        let config_xdg = if let Ok(dir) = env::var("XDG_CONFIG_HOME") {
            PathBuf::from_iter([dir, "magpie".to_string(), "config.toml".to_string()].iter())
        } else {
            PathBuf::from_iter(
                [
                    home.as_path(),
                    Path::new(".config"),
                    Path::new("magpie"),
                    Path::new("config.toml"),
                ]
                .iter(),
            )
        };

        locations.push(config_xdg);
        locations.push(PathBuf::from_iter([&home, &PathBuf::from(".magpie.toml")].iter()));
    }

    locations
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub geometry: GeometrySpec,
    pub page: PageConfig,
    pub document: DocumentConfig,
    pub labels: Labels,
}

/// Fixed page offsets; everything here is independent of the grid's shape.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub width: i32,
    pub height: i32,
    pub grid_x: i32,
    pub grid_y: i32,
    pub title_area: Rect,
    pub illustration_area: Rect,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    pub title: String,
    pub author: String,
    pub producer: String,
    pub dpi: f32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Labels {
    pub weekdays: Vec<String>,
    pub months: Vec<String>,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            geometry: GeometrySpec::default(),
            page: PageConfig::default(),
            document: DocumentConfig::default(),
            labels: Labels::default(),
        }
    }
}

impl Default for PageConfig {
    fn default() -> PageConfig {
        // A4 portrait at 150 dpi
        PageConfig {
            width: 1240,
            height: 1754,
            grid_x: 245,
            grid_y: 1080,
            title_area: Rect::new(245, 40, 750, 80),
            illustration_area: Rect::new(245, 150, 750, 880),
        }
    }
}

impl Default for DocumentConfig {
    fn default() -> DocumentConfig {
        DocumentConfig {
            title: "Wall calendar".to_string(),
            author: "magpie".to_string(),
            producer: concat!("magpie ", env!("CARGO_PKG_VERSION")).to_string(),
            dpi: 150.0,
        }
    }
}

impl Default for Labels {
    fn default() -> Labels {
        Labels {
            weekdays: ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            months: [
                "January",
                "February",
                "March",
                "April",
                "May",
                "June",
                "July",
                "August",
                "September",
                "October",
                "November",
                "December",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

impl Config {
    /// Loads the given file, the first discovered config file, or defaults.
    pub fn load(path: Option<&Path>) -> Result<Config, Error> {
        let path = match path {
            Some(path) => Some(path.to_path_buf()),
            None => find_configfile_locations().into_iter().find(|p| p.exists()),
        };

        let config = match path {
            Some(path) => {
                let content = fs::read_to_string(&path).map_err(|err| {
                    Error::new(
                        ErrorKind::AssetUnavailable,
                        &format!("config file '{}': {}", path.display(), err),
                    )
                })?;
                toml::from_str(&content)?
            }
            None => Config::default(),
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), Error> {
        if self.labels.weekdays.len() != 7 {
            return Err(Error::new(
                ErrorKind::InvalidArgument,
                "expected 7 weekday labels",
            ));
        }
        if self.labels.months.len() != 12 {
            return Err(Error::new(
                ErrorKind::InvalidArgument,
                "expected 12 month labels",
            ));
        }
        if self.document.dpi <= 0.0 {
            return Err(Error::new(ErrorKind::InvalidArgument, "dpi must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.labels.weekdays.len(), 7);
        assert_eq!(config.labels.months.len(), 12);
    }

    #[test]
    fn toml_overrides_merge_with_defaults() {
        let config: Config = toml::from_str(
            r#"
            [geometry]
            grid_width = 800

            [document]
            author = "somebody"
            "#,
        )
        .unwrap();

        assert_eq!(config.geometry.grid_width, 800);
        assert_eq!(config.geometry.week_column_width, 46);
        assert_eq!(config.document.author, "somebody");
    }

    #[test]
    fn label_lists_must_be_complete() {
        let mut config = Config::default();
        config.labels.weekdays.pop();
        assert!(config.validate().is_err());
    }
}
