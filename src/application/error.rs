//! Application-level errors (wraps codec errors, adds file context)

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::codec::DecodeError;

/// Why a load was rejected. In every case the previously loaded world
/// stays in place.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("cannot read world file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Why a save failed. Serialization itself cannot fail because the
/// in-memory tree is kept schema-valid by construction; only the sink
/// can.
#[derive(Error, Debug)]
pub enum SaveError {
    #[error("cannot write world file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write world document: {0}")]
    Sink(#[from] io::Error),
}
