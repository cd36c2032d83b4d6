//! Sequential file processor
//!
//! Handles the core loop of:
//! - Walking the scan root in native traversal order
//! - Classifying each file by its capture date and camera model
//! - Copying it into the destination tree (or reporting, in dry-run mode)
//!
//! Files are handled strictly one at a time; no per-file failure halts the
//! run.

use crate::classify::{self, UNKNOWN_BUCKET};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::metadata;
use crate::report::Reporter;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Statistics accumulated over a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStatistics {
    /// Files with complete classification metadata
    pub classified: usize,
    /// Files routed to the UNKNOWN bucket
    pub unclassified: usize,
    /// Sum of all processed file sizes, regardless of outcome
    pub total_bytes: u64,
}

impl RunStatistics {
    /// Total size in megabytes
    pub fn total_megabytes(&self) -> f64 {
        self.total_bytes as f64 / (1024.0 * 1024.0)
    }

    pub fn summary(&self) -> String {
        format!(
            "Classified: {}, Unclassified: {}, Total size: {:.2} MB",
            self.classified,
            self.unclassified,
            self.total_megabytes()
        )
    }
}

/// How a single file resolved during classification
#[derive(Debug)]
pub enum ClassifyOutcome {
    /// Complete metadata, routed to the derived subtree
    Classified { destination: PathBuf },
    /// Readable image missing the capture date or model
    Incomplete { destination: PathBuf },
    /// The file could not be opened as an image
    Unreadable { destination: PathBuf, error: Error },
}

impl ClassifyOutcome {
    /// Destination directory this outcome routes to
    pub fn destination(&self) -> &Path {
        match self {
            ClassifyOutcome::Classified { destination }
            | ClassifyOutcome::Incomplete { destination }
            | ClassifyOutcome::Unreadable { destination, .. } => destination,
        }
    }

    pub fn is_classified(&self) -> bool {
        matches!(self, ClassifyOutcome::Classified { .. })
    }
}

/// Main processor for classifying and copying image files
pub struct Processor {
    scan_path: PathBuf,
    destination: PathBuf,
    dry_run: bool,
    verbose: bool,
    stats: RunStatistics,
}

impl Processor {
    /// Create a new processor with the given configuration
    pub fn new(config: &Config) -> Result<Self> {
        let scan_path = config
            .scan_path
            .clone()
            .ok_or_else(|| Error::Config("no scan path configured".into()))?;

        Ok(Self {
            scan_path,
            destination: config.destination.clone(),
            dry_run: config.dry_run,
            verbose: config.verbose,
            stats: RunStatistics::default(),
        })
    }

    /// Run the classification pipeline over every file under the scan root
    ///
    /// Returns the final statistics; the same values are handed to the
    /// reporter's summary before returning.
    pub fn run(&mut self, reporter: &mut dyn Reporter) -> RunStatistics {
        reporter.run_started(&self.scan_path, self.dry_run);

        if !self.scan_path.exists() {
            warn!(path = %self.scan_path.display(), "Scan path does not exist");
        }

        for entry in WalkDir::new(&self.scan_path)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }
            self.process_file(entry.path(), reporter);
        }

        info!("{}", self.stats.summary());
        reporter.summary(&self.stats);

        self.stats.clone()
    }

    /// Get the statistics accumulated so far
    pub fn stats(&self) -> &RunStatistics {
        &self.stats
    }

    /// Handle one file: stat, classify, copy. Never fails the run.
    fn process_file(&mut self, path: &Path, reporter: &mut dyn Reporter) {
        let size = match fs::metadata(path) {
            Ok(m) => m.len(),
            Err(e) => {
                warn!(?path, error = %e, "Could not stat file, counting zero bytes");
                0
            }
        };
        // Counted unconditionally, even for files that fail every later step
        self.stats.total_bytes += size;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if self.verbose {
            reporter.processing(&name, size);
        }

        let outcome = self.classify_file(path);
        match &outcome {
            ClassifyOutcome::Classified { destination } => {
                self.stats.classified += 1;
                debug!(?path, destination = %destination.display(), "Classified");
            }
            ClassifyOutcome::Incomplete { .. } => {
                self.stats.unclassified += 1;
                warn!(?path, "No metadata extracted");
                reporter.unclassified(&name, "no metadata extracted");
            }
            ClassifyOutcome::Unreadable { error, .. } => {
                self.stats.unclassified += 1;
                warn!(?path, error = %error, "Not an image file");
                reporter.unclassified(&name, "not an image file");
            }
        }

        // Corrupted metadata strings can smuggle NUL bytes into the path
        let destination = classify::strip_null_bytes(outcome.destination());

        if self.dry_run {
            reporter.copying(&name, &destination, true);
            return;
        }

        match copy_into(path, &destination) {
            Ok(_) => reporter.copying(&name, &destination, false),
            Err(e) => {
                warn!(?path, destination = %destination.display(), error = %e, "Copy failed, continuing");
            }
        }
    }

    /// Classify a single file into a typed outcome
    fn classify_file(&self, path: &Path) -> ClassifyOutcome {
        let exif = match metadata::read_metadata(path) {
            Ok(exif) => exif,
            Err(error) => {
                return ClassifyOutcome::Unreadable {
                    destination: self.destination.join(UNKNOWN_BUCKET),
                    error,
                };
            }
        };

        let extracted = metadata::extract(&exif);
        let classification = classify::classify(&self.destination, &extracted);

        if classification.classified {
            ClassifyOutcome::Classified {
                destination: classification.destination,
            }
        } else {
            ClassifyOutcome::Incomplete {
                destination: classification.destination,
            }
        }
    }
}

/// Copy a file into a destination directory, preserving its file name
///
/// The directory tree is created as needed; existing directories are not an
/// error. A file already present under the same name is overwritten.
fn copy_into(source: &Path, dest_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dest_dir)?;

    let filename = source
        .file_name()
        .ok_or_else(|| Error::Config("invalid source filename".into()))?;
    let dest = dest_dir.join(filename);

    copy_file(source, &dest)?;

    // Preserve modification time
    if let Ok(source_meta) = fs::metadata(source)
        && let Ok(mtime) = source_meta.modified()
    {
        let _ = filetime::set_file_mtime(&dest, filetime::FileTime::from_system_time(mtime));
    }

    Ok(dest)
}

/// Copy file contents with buffered I/O
fn copy_file(source: &Path, dest: &Path) -> Result<()> {
    let src_file = File::open(source)?;
    let dest_file = File::create(dest)?;

    let mut reader = BufReader::with_capacity(256 * 1024, src_file);
    let mut writer = BufWriter::with_capacity(256 * 1024, dest_file);

    let mut buffer = vec![0u8; 256 * 1024];
    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        writer.write_all(&buffer[..bytes_read])?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::minimal_tiff;
    use std::path::PathBuf;

    /// Reporter that records calls for assertions
    #[derive(Debug, Default)]
    struct RecordingReporter {
        processing: Vec<(String, u64)>,
        unclassified: Vec<String>,
        copied: Vec<(String, PathBuf, bool)>,
        summaries: Vec<RunStatistics>,
    }

    impl Reporter for RecordingReporter {
        fn run_started(&mut self, _scan_path: &Path, _dry_run: bool) {}

        fn processing(&mut self, name: &str, size: u64) {
            self.processing.push((name.to_string(), size));
        }

        fn unclassified(&mut self, name: &str, _reason: &str) {
            self.unclassified.push(name.to_string());
        }

        fn copying(&mut self, name: &str, destination: &Path, dry_run: bool) {
            self.copied
                .push((name.to_string(), destination.to_path_buf(), dry_run));
        }

        fn summary(&mut self, stats: &RunStatistics) {
            self.summaries.push(stats.clone());
        }
    }

    fn config(scan: &Path, dest: &Path, dry_run: bool) -> Config {
        Config {
            scan_path: Some(scan.to_path_buf()),
            destination: dest.to_path_buf(),
            dry_run,
            verbose: false,
        }
    }

    #[test]
    fn test_run_statistics_megabytes() {
        let stats = RunStatistics {
            classified: 1,
            unclassified: 0,
            total_bytes: 3 * 1024 * 1024 + 512 * 1024,
        };
        assert!((stats.total_megabytes() - 3.5).abs() < 1e-9);
        assert!(stats.summary().contains("3.50 MB"));
    }

    #[test]
    fn test_dry_run_mutates_nothing() {
        let scan = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();

        let a = minimal_tiff("2023:07:15 10:00:00", "Canon EOS 5D");
        let b = minimal_tiff("2021:12:24 18:30:00", "NIKON D750");
        fs::write(scan.path().join("a.tif"), &a).unwrap();
        fs::write(scan.path().join("b.tif"), &b).unwrap();
        fs::write(scan.path().join("notes.txt"), b"not an image").unwrap();

        let mut processor = Processor::new(&config(scan.path(), dest.path(), true)).unwrap();
        let mut reporter = RecordingReporter::default();
        let stats = processor.run(&mut reporter);

        assert_eq!(stats.classified, 2);
        assert_eq!(stats.unclassified, 1);
        assert_eq!(
            stats.total_bytes,
            (a.len() + b.len() + b"not an image".len()) as u64
        );

        // Nothing created under the destination
        assert_eq!(fs::read_dir(dest.path()).unwrap().count(), 0);

        // Every file still reported a would-be destination
        assert_eq!(reporter.copied.len(), 3);
        assert!(reporter.copied.iter().all(|(_, _, dry)| *dry));
        assert_eq!(reporter.summaries.len(), 1);
    }

    #[test]
    fn test_copy_lands_in_classified_tree() {
        let scan = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();

        let data = minimal_tiff("2023:07:15 10:00:00", "Canon EOS 5D");
        fs::write(scan.path().join("IMG_0001.tif"), &data).unwrap();

        let mut processor = Processor::new(&config(scan.path(), dest.path(), false)).unwrap();
        let mut reporter = RecordingReporter::default();
        let stats = processor.run(&mut reporter);

        assert_eq!(stats.classified, 1);
        assert_eq!(stats.unclassified, 0);

        let copied = dest
            .path()
            .join("2023")
            .join("07_July")
            .join("CANON_EOS_5D")
            .join("IMG_0001.tif");
        assert!(copied.is_file());
        assert_eq!(fs::read(&copied).unwrap(), data);
    }

    #[test]
    fn test_non_image_routed_to_unknown() {
        let scan = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();

        fs::write(scan.path().join("readme.md"), b"plain text").unwrap();

        let mut processor = Processor::new(&config(scan.path(), dest.path(), false)).unwrap();
        let mut reporter = RecordingReporter::default();
        let stats = processor.run(&mut reporter);

        assert_eq!(stats.classified, 0);
        assert_eq!(stats.unclassified, 1);
        assert_eq!(reporter.unclassified, vec!["readme.md".to_string()]);
        assert!(dest.path().join("UNKNOWN").join("readme.md").is_file());
    }

    #[test]
    fn test_recursive_traversal_and_byte_total() {
        let scan = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();

        let nested = scan.path().join("2023").join("camera");
        fs::create_dir_all(&nested).unwrap();
        let data = minimal_tiff("2023:07:15 10:00:00", "Canon EOS 5D");
        fs::write(nested.join("deep.tif"), &data).unwrap();
        fs::write(scan.path().join("top.bin"), [0u8; 100]).unwrap();

        let mut processor = Processor::new(&config(scan.path(), dest.path(), true)).unwrap();
        let mut reporter = RecordingReporter::default();
        let stats = processor.run(&mut reporter);

        assert_eq!(stats.classified, 1);
        assert_eq!(stats.unclassified, 1);
        assert_eq!(stats.total_bytes, data.len() as u64 + 100);
    }

    #[test]
    fn test_verbose_gates_processing_events() {
        let scan = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        fs::write(scan.path().join("x.bin"), [0u8; 10]).unwrap();

        let mut quiet = config(scan.path(), dest.path(), true);
        quiet.verbose = false;
        let mut reporter = RecordingReporter::default();
        Processor::new(&quiet).unwrap().run(&mut reporter);
        assert!(reporter.processing.is_empty());

        let mut loud = config(scan.path(), dest.path(), true);
        loud.verbose = true;
        let mut reporter = RecordingReporter::default();
        Processor::new(&loud).unwrap().run(&mut reporter);
        assert_eq!(reporter.processing, vec![("x.bin".to_string(), 10)]);
    }

    #[test]
    fn test_processor_requires_scan_path() {
        let config = Config::default();
        assert!(Processor::new(&config).is_err());
    }
}
