/// Load and wiring failures.
///
/// Everything that can go wrong happens while maps are read and mechanics are
/// installed. Once a world is running, triggers never fail.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorldError {
    #[error("could not read map file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("map '{map}' is not valid TOML: {source}")]
    Parse {
        map: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("map '{map}': object '{object}' names unknown group '{group}'")]
    UnknownGroup { map: String, object: String, group: String },

    #[error("map '{map}': object '{object}' appears twice in group '{group}'")]
    DuplicateObject { map: String, object: String, group: String },

    #[error("no map named '{0}' is loaded")]
    MissingMap(String),

    #[error("map '{map}' has no object '{object}' in group '{group}'")]
    MissingObject { map: String, object: String, group: String },

    #[error("map '{map}' has no layer '{layer}'")]
    MissingLayer { map: String, layer: String },

    #[error("lever on '{0}' cannot use its own map as the peer")]
    SamePeer(String),

    #[error("map '{map}': lever gid {gid} outside {min}..={max}")]
    LeverGidOutOfRange { map: String, gid: u32, min: u32, max: u32 },
}
