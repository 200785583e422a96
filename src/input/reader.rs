use anyhow::{Context, Result, bail};
use std::fs;
use std::io::{self, Read};

const MAX_INPUT_SIZE: usize = 1024 * 1024; // 1MB

/// Reads the text a command operates on.
pub struct InputReader;

impl InputReader {
    /// Inline text wins over a file; with neither, stdin is read.
    ///
    /// Every source is held to the same size limit. Fails on empty or
    /// whitespace-only input.
    pub fn read_text(text: Option<&str>, file_path: Option<&str>) -> Result<String> {
        let input = match (text, file_path) {
            (Some(text), _) => {
                ensure_within_limit(text.len(), "--text")?;
                text.to_string()
            }
            (None, Some(path)) => Self::read_file(path)?,
            (None, None) => Self::read_stdin()?,
        };

        if input.trim().is_empty() {
            bail!("Error: Input is empty");
        }
        Ok(input)
    }

    fn read_file(path: &str) -> Result<String> {
        let metadata =
            fs::metadata(path).with_context(|| format!("Failed to access file: {path}"))?;
        ensure_within_limit(usize::try_from(metadata.len()).unwrap_or(usize::MAX), path)?;

        fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))
    }

    fn read_stdin() -> Result<String> {
        // One byte past the limit is enough to tell an oversized input apart.
        let mut buffer = Vec::new();
        io::stdin()
            .lock()
            .take(MAX_INPUT_SIZE as u64 + 1)
            .read_to_end(&mut buffer)
            .context("Failed to read from stdin")?;
        ensure_within_limit(buffer.len(), "stdin")?;

        String::from_utf8(buffer).context("Input is not valid UTF-8")
    }
}

fn ensure_within_limit(size: usize, source: &str) -> Result<()> {
    if size > MAX_INPUT_SIZE {
        bail!(
            "Error: Input from {source} ({:.1} MB) exceeds maximum allowed size (1 MB).\n\n\
             Consider splitting it into smaller parts.",
            size as f64 / 1024.0 / 1024.0
        );
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn file_with(content: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{content}").unwrap();
        temp_file
    }

    fn read_path(temp_file: &NamedTempFile) -> Result<String> {
        InputReader::read_text(None, Some(temp_file.path().to_str().unwrap()))
    }

    #[test]
    fn test_reads_file() {
        let temp_file = file_with("Translate me, please\n");
        assert_eq!(read_path(&temp_file).unwrap(), "Translate me, please\n");
    }

    #[test]
    fn test_missing_file_is_error() {
        let result = InputReader::read_text(None, Some("/nonexistent/path/to/file.txt"));
        assert!(result.unwrap_err().to_string().contains("Failed to access file"));
    }

    #[test]
    fn test_inline_text_wins() {
        let content = InputReader::read_text(Some("hello"), Some("/nonexistent/file.txt")).unwrap();
        assert_eq!(content, "hello");
    }

    #[test]
    fn test_blank_inline_text_is_rejected() {
        let result = InputReader::read_text(Some("  \n"), None);
        assert!(result.unwrap_err().to_string().contains("empty"));
    }

    #[test]
    fn test_empty_file_is_rejected() {
        let temp_file = NamedTempFile::new().unwrap();
        assert!(read_path(&temp_file).is_err());
    }

    #[test]
    fn test_mixed_script_file() {
        let content = "سلام دنیا\nThis clipboard has مخلوط text";
        assert_eq!(read_path(&file_with(content)).unwrap(), content);
    }

    #[test]
    fn test_oversized_file_is_rejected() {
        let temp_file = file_with(&"x".repeat(MAX_INPUT_SIZE + 1));
        let err = read_path(&temp_file).unwrap_err();
        assert!(err.to_string().contains("exceeds maximum"));
    }

    #[test]
    fn test_file_at_limit_is_accepted() {
        let temp_file = file_with(&"x".repeat(MAX_INPUT_SIZE));
        assert_eq!(read_path(&temp_file).unwrap().len(), MAX_INPUT_SIZE);
    }

    #[test]
    fn test_oversized_inline_text_is_rejected() {
        let text = "x".repeat(MAX_INPUT_SIZE + 1);
        let err = InputReader::read_text(Some(&text), None).unwrap_err();
        assert!(err.to_string().contains("--text"));
    }

    #[test]
    fn test_inline_text_at_limit_is_accepted() {
        let text = "x".repeat(MAX_INPUT_SIZE);
        assert_eq!(
            InputReader::read_text(Some(&text), None).unwrap().len(),
            MAX_INPUT_SIZE
        );
    }
}
