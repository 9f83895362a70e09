//! Output files that are either written in place or committed atomically

use std::{
    fs::{self, File, OpenOptions},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;

use crate::image::error::ImageError;

#[derive(Debug)]
enum Target {
    Direct(File),
    Staged(NamedTempFile),
}

impl Write for Target {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Target::Direct(file) => file.write(buf),
            Target::Staged(file) => file.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Target::Direct(file) => file.flush(),
            Target::Staged(file) => file.flush(),
        }
    }
}

/// Fails when `path` can never receive the output: it is a directory, or it
/// exists and cannot be opened for writing. Nothing is truncated.
pub fn check_destination(path: &Path) -> Result<(), ImageError> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Err(ImageError::Io {
            path: path.to_path_buf(),
            source: io::Error::other("destination is a directory"),
        }),
        Ok(_) => OpenOptions::new()
            .write(true)
            .open(path)
            .map(drop)
            .map_err(ImageError::io(path)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(ImageError::io(path)(err)),
    }
}

/// A buffered output file.
///
/// In atomic mode the data goes to a temporary file next to the destination
/// and only replaces it on [`StagedOutput::persist`]. Dropping an output
/// before that deletes the temporary file.
#[derive(Debug)]
pub struct OutputFile {
    path: PathBuf,
    writer: BufWriter<Target>,
}

impl OutputFile {
    pub fn create(path: &Path, atomic: bool) -> Result<Self, ImageError> {
        check_destination(path)?;

        let target = if atomic {
            Target::Staged(stage_next_to(path)?)
        } else {
            Target::Direct(File::create(path).map_err(ImageError::io(path))?)
        };

        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(target),
        })
    }

    /// Flushes and syncs everything written so far.
    pub fn finish(self) -> Result<StagedOutput, ImageError> {
        let Self { path, writer } = self;
        let target = writer.into_inner().map_err(|e| ImageError::Io {
            path: path.clone(),
            source: e.into_error(),
        })?;

        let file = match &target {
            Target::Direct(file) => file,
            Target::Staged(staged) => staged.as_file(),
        };
        file.sync_all().map_err(ImageError::io(&path))?;

        Ok(StagedOutput { path, target })
    }
}

impl Write for OutputFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// A fully written output waiting to be moved into place
#[derive(Debug)]
#[must_use = "an atomic output is discarded unless persisted"]
pub struct StagedOutput {
    path: PathBuf,
    target: Target,
}

impl StagedOutput {
    pub fn persist(self) -> Result<(), ImageError> {
        match self.target {
            Target::Direct(_) => Ok(()),
            Target::Staged(staged) => {
                staged.persist(&self.path).map_err(|e| ImageError::Io {
                    path: self.path.clone(),
                    source: e.error,
                })?;
                Ok(())
            }
        }
    }
}

/// Temporary file in the destination's directory, created with the
/// permissions a plain `File::create` would give the destination.
fn stage_next_to(path: &Path) -> Result<NamedTempFile, ImageError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut builder = tempfile::Builder::new();
    builder.prefix(".wav2bin-");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // masked by the umask like any other new file
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let staged = builder.tempfile_in(dir).map_err(ImageError::io(path))?;

    // replacing a file keeps its mode
    if let Ok(existing) = fs::metadata(path) {
        staged
            .as_file()
            .set_permissions(existing.permissions())
            .map_err(ImageError::io(path))?;
    }

    Ok(staged)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::TempDir;

    use crate::image::{
        error::ImageError,
        output::{OutputFile, check_destination},
    };

    #[test]
    fn atomic_output_appears_on_persist() -> anyhow::Result<()> {
        let tmp = TempDir::new()?;
        let path = tmp.path().join("out.bin");

        let mut out = OutputFile::create(&path, true)?;
        out.write_all(b"abc")?;
        let staged = out.finish()?;
        assert!(!path.exists());

        staged.persist()?;
        assert_eq!(std::fs::read(&path)?, b"abc");
        Ok(())
    }

    #[test]
    fn atomic_output_is_discarded_without_persist() -> anyhow::Result<()> {
        let tmp = TempDir::new()?;
        let path = tmp.path().join("out.bin");
        std::fs::write(&path, b"previous")?;

        {
            let mut out = OutputFile::create(&path, true)?;
            out.write_all(b"partial")?;
            let _staged = out.finish()?;
        }

        assert_eq!(std::fs::read(&path)?, b"previous");
        assert_eq!(std::fs::read_dir(tmp.path())?.count(), 1);
        Ok(())
    }

    #[test]
    fn direct_output_truncates_in_place() -> anyhow::Result<()> {
        let tmp = TempDir::new()?;
        let path = tmp.path().join("out.cue");
        std::fs::write(&path, b"a much longer previous content")?;

        let mut out = OutputFile::create(&path, false)?;
        out.write_all(b"new")?;
        out.finish()?.persist()?;

        assert_eq!(std::fs::read(&path)?, b"new");
        Ok(())
    }

    #[test]
    fn create_fails_for_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("missing").join("out.bin");

        for atomic in [true, false] {
            let err = OutputFile::create(&path, atomic).err().unwrap();
            assert!(err.to_string().contains("out.bin"), "{err}");
        }
    }

    #[test]
    fn directory_destination_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("disc.bin");
        std::fs::create_dir(&path).unwrap();

        assert!(matches!(
            check_destination(&path),
            Err(ImageError::Io { .. })
        ));
        for atomic in [true, false] {
            let err = OutputFile::create(&path, atomic).err().unwrap();
            assert!(matches!(err, ImageError::Io { .. }));
        }
    }

    #[test]
    fn new_and_existing_destinations_pass_the_check() -> anyhow::Result<()> {
        let tmp = TempDir::new()?;
        let path = tmp.path().join("disc.cue");
        check_destination(&path)?;

        std::fs::write(&path, b"keep me")?;
        check_destination(&path)?;
        assert_eq!(std::fs::read(&path)?, b"keep me");
        Ok(())
    }

    #[cfg(unix)]
    mod unix {
        use std::{io::Write, os::unix::fs::PermissionsExt, path::Path};

        use tempfile::TempDir;

        use crate::image::output::OutputFile;

        fn mode(path: &Path) -> u32 {
            std::fs::metadata(path).unwrap().permissions().mode() & 0o777
        }

        fn write(path: &Path, atomic: bool) -> anyhow::Result<()> {
            let mut out = OutputFile::create(path, atomic)?;
            out.write_all(b"data")?;
            out.finish()?.persist()?;
            Ok(())
        }

        #[test]
        fn atomic_and_direct_outputs_get_the_same_mode() -> anyhow::Result<()> {
            let tmp = TempDir::new()?;
            let atomic = tmp.path().join("atomic.bin");
            let direct = tmp.path().join("direct.bin");

            write(&atomic, true)?;
            write(&direct, false)?;

            assert_eq!(mode(&atomic), mode(&direct));
            Ok(())
        }

        #[test]
        fn replacing_a_file_keeps_its_mode() -> anyhow::Result<()> {
            let tmp = TempDir::new()?;
            let path = tmp.path().join("disc.bin");
            std::fs::write(&path, b"old")?;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o640))?;

            write(&path, true)?;

            assert_eq!(mode(&path), 0o640);
            assert_eq!(std::fs::read(&path)?, b"data");
            Ok(())
        }
    }
}
