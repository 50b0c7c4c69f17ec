//! File utilities for safe and robust file operations.
//!
//! The quality scorer walks arbitrary cloned plugin trees, so reads must
//! tolerate binary blobs and broken encodings. Unreadable files are
//! skipped by callers, never fatal.

use std::fs;
use std::path::Path;

use tracing::warn;

use crate::core::errors::{PlugdexError, Result};

/// Safe file reading with UTF-8 validation and fallback handling
pub struct FileReader;

impl FileReader {
    /// Read a file to string, handling non-UTF-8 files gracefully
    pub fn read_to_string(file_path: &Path) -> Result<String> {
        if Self::is_likely_binary(file_path)? {
            return Err(PlugdexError::validation(format!(
                "File appears to be binary: {}",
                file_path.display()
            )));
        }

        match fs::read_to_string(file_path) {
            Ok(content) => Ok(content),
            Err(e) => {
                if e.kind() == std::io::ErrorKind::InvalidData {
                    // Re-read as bytes and convert with lossy UTF-8
                    let bytes = fs::read(file_path)
                        .map_err(|err| PlugdexError::io("Failed to read file as bytes", err))?;

                    let content = String::from_utf8_lossy(&bytes).to_string();
                    warn!(
                        "File contained invalid UTF-8, converted with lossy encoding: {}",
                        file_path.display()
                    );
                    Ok(content)
                } else {
                    Err(PlugdexError::io("Failed to read file", e))
                }
            }
        }
    }

    /// Check if a file is likely to be binary based on extension and content sampling
    pub fn is_likely_binary(file_path: &Path) -> Result<bool> {
        if let Some(extension) = file_path.extension().and_then(|ext| ext.to_str()) {
            let binary_extensions = [
                // Archives
                "zip", "tar", "gz", "bz2", "xz", "7z", "rar",
                // Images
                "png", "jpg", "jpeg", "gif", "bmp", "svg", "ico", "webp",
                // Audio/Video
                "mp3", "mp4", "avi", "wav", "mov", "mkv",
                // Executables
                "exe", "dll", "so", "dylib", "bin",
                // Others
                "sqlite", "db", "woff", "woff2", "ttf", "eot", "pdf",
            ];

            if binary_extensions
                .iter()
                .any(|&ext| extension.eq_ignore_ascii_case(ext))
            {
                return Ok(true);
            }
        }

        let metadata = fs::metadata(file_path)
            .map_err(|e| PlugdexError::io("Failed to read file metadata", e))?;

        // Don't process very large files
        if metadata.len() > 10 * 1024 * 1024 {
            return Ok(true);
        }

        if metadata.len() == 0 {
            return Ok(false);
        }

        // Sample first 1024 bytes to check for binary content
        let sample_size = std::cmp::min(1024, metadata.len() as usize);
        let mut buffer = vec![0u8; sample_size];

        use std::io::Read;
        let mut file = fs::File::open(file_path)
            .map_err(|e| PlugdexError::io("Failed to open file for sampling", e))?;

        file.read_exact(&mut buffer)
            .map_err(|e| PlugdexError::io("Failed to read file sample", e))?;

        // More than 1% null bytes means likely binary
        let null_bytes = buffer.iter().filter(|&&b| b == 0).count();
        let null_percentage = (null_bytes as f64 / buffer.len() as f64) * 100.0;

        Ok(null_percentage > 1.0)
    }
}
