//! Expands the input list given on the command line

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::image::error::ImageError;

const WAV_EXTENSIONS: &[&str] = &["wav", "wave"];

pub fn is_wav_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| WAV_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Lists the WAV files directly inside `dir`, sorted by file name
pub fn scan_dir(dir: &Path) -> Result<Vec<PathBuf>, ImageError> {
    let mut paths = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| ImageError::Io {
            path: dir.to_path_buf(),
            source: e.into(),
        })?;
        if entry.file_type().is_file() && is_wav_file(entry.path()) {
            paths.push(entry.into_path());
        }
    }
    Ok(paths)
}

/// Replaces every directory argument with the WAV files inside it.
///
/// Anything else, including paths that do not exist, is kept as given so
/// the assembler reports it against the exact argument.
pub fn expand(args: &[PathBuf]) -> Result<Vec<PathBuf>, ImageError> {
    let mut paths = Vec::with_capacity(args.len());
    for arg in args {
        if arg.is_dir() {
            let found = scan_dir(arg)?;
            log::info!("{}: {} WAV file(s)", arg.display(), found.len());
            paths.extend(found);
        } else {
            paths.push(arg.clone());
        }
    }

    if paths.is_empty() {
        return Err(ImageError::NoInputs);
    }
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use tempfile::TempDir;

    use crate::image::{
        error::ImageError,
        inputs::{expand, is_wav_file},
    };

    #[test]
    fn wav_extension_is_case_insensitive() {
        assert!(is_wav_file(Path::new("a.wav")));
        assert!(is_wav_file(Path::new("b.WAV")));
        assert!(is_wav_file(Path::new("c.Wave")));
        assert!(!is_wav_file(Path::new("d.flac")));
        assert!(!is_wav_file(Path::new("wav")));
    }

    #[test]
    fn directories_expand_sorted() -> anyhow::Result<()> {
        let tmp = TempDir::new()?;
        let dir = tmp.path();

        std::fs::write(dir.join("02 b.wav"), b"")?;
        std::fs::write(dir.join("01 a.WAV"), b"")?;
        std::fs::write(dir.join("notes.txt"), b"")?;
        std::fs::create_dir(dir.join("nested.wav"))?;
        std::fs::create_dir(dir.join("sub"))?;
        std::fs::write(dir.join("sub").join("00 hidden.wav"), b"")?;

        let single = PathBuf::from("standalone.bin");
        let paths = expand(&[dir.to_path_buf(), single.clone()])?;

        assert_eq!(
            paths,
            vec![dir.join("01 a.WAV"), dir.join("02 b.wav"), single]
        );
        Ok(())
    }

    #[test]
    fn missing_paths_pass_through() -> anyhow::Result<()> {
        let missing = PathBuf::from("/definitely/not/here.wav");
        assert_eq!(expand(&[missing.clone()])?, vec![missing]);
        Ok(())
    }

    #[test]
    fn empty_expansion_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let err = expand(&[tmp.path().to_path_buf()]).unwrap_err();
        assert!(matches!(err, ImageError::NoInputs));

        assert!(matches!(expand(&[]), Err(ImageError::NoInputs)));
    }
}
