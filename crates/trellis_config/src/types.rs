//! Configuration types deserialized from `trellis.toml`.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};

/// Default hardware source directory, relative to the project root.
pub const DEFAULT_SRC: &str = "user/src";
/// Default simulation directory, relative to the project root.
pub const DEFAULT_SIM: &str = "user/sim";

/// The top-level project configuration parsed from `trellis.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    /// Project metadata.
    pub project: ProjectMeta,
    /// Directory layout of the hardware sources.
    #[serde(default)]
    pub arch: ArchConfig,
    /// Library roots scanned in addition to the hardware directories.
    #[serde(default)]
    pub library: LibraryConfig,
    /// External fast-parse collaborator.
    #[serde(default)]
    pub parser: ParserConfig,
}

/// Project metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectMeta {
    /// The project name.
    pub name: String,
    /// A brief description of the project.
    #[serde(default)]
    pub description: String,
}

/// Architecture section; only the hardware layout is used.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArchConfig {
    /// Hardware source and simulation directories.
    #[serde(default)]
    pub hardware: HardwareConfig,
}

/// Source and simulation directories.
///
/// Relative entries are resolved against the project root.
#[derive(Debug, Clone, Deserialize)]
pub struct HardwareConfig {
    /// Synthesizable sources.
    #[serde(default = "default_src")]
    pub src: String,
    /// Testbenches and simulation-only models.
    #[serde(default = "default_sim")]
    pub sim: String,
}

impl Default for HardwareConfig {
    fn default() -> Self {
        Self {
            src: default_src(),
            sim: default_sim(),
        }
    }
}

fn default_src() -> String {
    DEFAULT_SRC.to_string()
}

fn default_sim() -> String {
    DEFAULT_SIM.to_string()
}

/// Library roots.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LibraryConfig {
    /// Library directories or files. Accepts a single string or a list.
    #[serde(default, deserialize_with = "deserialize_string_or_vec")]
    pub paths: Vec<String>,
}

/// How to run the fast-parse collaborator.
///
/// The command receives the absolute file path as its last argument and must
/// print one parsed-file JSON document on stdout.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParserConfig {
    /// Executable name or path. `None` disables parsing.
    pub command: Option<String>,
    /// Extra arguments placed before the file path. Accepts a string or a list.
    #[serde(default, deserialize_with = "deserialize_string_or_vec")]
    pub args: Vec<String>,
}

/// Deserializes a field that can be either a single string or a list of strings.
fn deserialize_string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(vec![v.to_string()])
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut vec = Vec::new();
            while let Some(val) = seq.next_element::<String>()? {
                vec.push(val);
            }
            Ok(vec)
        }
    }

    deserializer.deserialize_any(StringOrVec)
}
