//! World service: owns the current world and its file lifecycle.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::{fs, io};

use tracing::{debug, instrument};

use crate::application::error::{LoadError, SaveError};
use crate::codec::DocumentCodec;
use crate::domain::{Region, World};

/// Sole owner of the current world. Loads replace the world atomically
/// at the very end of a successful decode, so no partial document is
/// ever observable; saves never mutate it.
pub struct WorldService {
    world: World,
}

impl WorldService {
    pub fn new(initial_name: &str) -> Self {
        Self {
            world: World::new(initial_name),
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Discard the current world and install a fresh empty one.
    #[instrument(level = "debug", skip(self))]
    pub fn reset(&mut self, name: &str) {
        debug!("resetting world");
        self.world = World::new(name);
    }

    /// Read, decode and validate a world file; swap it in on success.
    #[instrument(level = "debug", skip(self))]
    pub fn load_path(&mut self, path: &Path) -> Result<(), LoadError> {
        let bytes = fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.load_bytes(&bytes)
    }

    /// Decode and validate an in-memory document; swap it in on success.
    /// On failure the current world is untouched.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<(), LoadError> {
        let world = DocumentCodec::decode(bytes)?;
        debug!(world = %world.name(), regions = world.region_count(), "world replaced");
        self.world = world;
        Ok(())
    }

    /// Serialize the current world to a file.
    #[instrument(level = "debug", skip(self))]
    pub fn save_path(&self, path: &Path) -> Result<(), SaveError> {
        let write_all = || -> io::Result<()> {
            let file = File::create(path)?;
            let mut writer = BufWriter::new(file);
            DocumentCodec::encode_to(&mut writer, &self.world)?;
            writer.flush()
        };
        write_all().map_err(|source| SaveError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Serialize the current world to an arbitrary sink.
    pub fn save_to<W: Write>(&self, sink: W) -> Result<(), SaveError> {
        DocumentCodec::encode_to(sink, &self.world)?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Query surface for a view layer
    // -----------------------------------------------------------------------

    pub fn has_region(&self, id: &str) -> bool {
        self.world.has_region(id)
    }

    pub fn find(&self, id: &str) -> Option<&Region> {
        self.world.find(id)
    }

    pub fn path_from_root(&self, id: &str) -> Option<Vec<&Region>> {
        self.world.path_from_root(id)
    }

    pub fn children_sorted(&self, id: &str) -> Option<Vec<&Region>> {
        self.world.children_sorted(id)
    }
}
