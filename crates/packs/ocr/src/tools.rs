use std::path::{Path, PathBuf};
use std::process::Stdio;

use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tracing::{debug, instrument};

use crate::error::OcrError;

/// Paths of the external programs the pack drives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrTools {
    pub tesseract: PathBuf,
    pub pdftoppm: PathBuf,
}

impl Default for OcrTools {
    fn default() -> Self {
        Self {
            tesseract: PathBuf::from("tesseract"),
            pdftoppm: PathBuf::from("pdftoppm"),
        }
    }
}

/// One tesseract invocation.
#[derive(Debug, Clone)]
pub struct Recognition<'a> {
    pub image: &'a Path,
    pub data_path: &'a str,
    pub language: &'a str,
    pub deskew: bool,
}

impl OcrTools {
    /// Recognize an image and return the plain text.
    pub async fn recognize_text(&self, job: &Recognition<'_>) -> Result<String, OcrError> {
        self.tesseract(job, None).await
    }

    /// Recognize an image and return tesseract's TSV report.
    pub async fn recognize_tsv(&self, job: &Recognition<'_>) -> Result<String, OcrError> {
        self.tesseract(job, Some("tsv")).await
    }

    #[instrument(skip(self, job), fields(image = %job.image.display(), language = job.language))]
    async fn tesseract(
        &self,
        job: &Recognition<'_>,
        config: Option<&str>,
    ) -> Result<String, OcrError> {
        let mut command = Command::new(&self.tesseract);
        command
            .arg(job.image)
            .arg("stdout")
            .arg("--tessdata-dir")
            .arg(job.data_path)
            .arg("-l")
            .arg(job.language.to_ascii_lowercase());
        if job.deskew {
            // Automatic segmentation with orientation and script detection.
            command.args(["--psm", "1"]);
        }
        if let Some(config) = config {
            command.arg(config);
        }
        run(command, &self.tesseract).await
    }

    /// Render one 1-based page of a PDF to `<prefix>.png`.
    #[instrument(skip(self, prefix), fields(pdf = %pdf.display()))]
    pub async fn rasterize_page(
        &self,
        pdf: &Path,
        page: usize,
        dpi: u32,
        prefix: &Path,
    ) -> Result<PathBuf, OcrError> {
        let page = page.to_string();
        let mut command = Command::new(&self.pdftoppm);
        command
            .arg("-r")
            .arg(dpi.to_string())
            .args(["-f", page.as_str(), "-l", page.as_str()])
            .args(["-png", "-singlefile"])
            .arg(pdf)
            .arg(prefix);
        run(command, &self.pdftoppm).await?;
        Ok(prefix.with_extension("png"))
    }
}

async fn run(mut command: Command, program: &Path) -> Result<String, OcrError> {
    let tool = program.display().to_string();
    let output = command
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|source| OcrError::Spawn {
            tool: tool.clone(),
            source,
        })?;
    if !output.status.success() {
        return Err(OcrError::Tool {
            tool,
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
        });
    }
    debug!(tool = %tool, bytes = output.stdout.len(), "tool finished");
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tools_deserialize_with_defaults() {
        let tools: OcrTools = toml::from_str("tesseract = \"/opt/ocr/tesseract\"").unwrap();
        assert_eq!(tools.tesseract, PathBuf::from("/opt/ocr/tesseract"));
        assert_eq!(tools.pdftoppm, PathBuf::from("pdftoppm"));
    }

    #[tokio::test]
    async fn missing_binary_is_a_spawn_error() {
        let tools = OcrTools {
            tesseract: PathBuf::from("/nonexistent/tesseract"),
            ..OcrTools::default()
        };
        let job = Recognition {
            image: Path::new("scan.png"),
            data_path: "/tessdata",
            language: "ENG",
            deskew: false,
        };
        let err = tools.recognize_text(&job).await.unwrap_err();
        assert!(matches!(err, OcrError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_tool_reports_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let script = crate::testing::script(dir.path(), "tesseract", "echo 'bad language' >&2\nexit 1");
        let tools = OcrTools {
            tesseract: script,
            ..OcrTools::default()
        };
        let job = Recognition {
            image: Path::new("scan.png"),
            data_path: "/tessdata",
            language: "xyz",
            deskew: true,
        };
        let err = tools.recognize_text(&job).await.unwrap_err();
        assert!(err.to_string().contains("bad language"));
    }
}
