//! User configuration for blockpool.
//!
//! Settings are read from `~/.blockpool/config.ini`. A missing file yields the
//! defaults; a present file only needs the keys it wants to override.
//!
//! ```ini
//! [pool]
//! threads = 0
//!
//! [compression]
//! format = bc7
//! quality = 0.5
//! alpha = false
//! ```

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::{DEFAULT_ALPHA, DEFAULT_FORMAT, DEFAULT_THREADS};
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{CompressionSettings, ConfigFile, PoolSettings};
