use std::path::{Path, PathBuf};

use actionpack_action::{Action, ActionError, run_blocking};
use actionpack_core::strings::to_boolean_lenient;
use actionpack_core::{ActionSpec, InputSpec, Inputs, ResultMap, Validation};
use tracing::{info, instrument};

use crate::blocks::{TextBlock, group_blocks, to_json};
use crate::error::OcrError;
use crate::pdf::{PageSelection, page_count};
use crate::tools::{OcrTools, Recognition};

pub const FILE_PATH: &str = "filePath";
pub const DATA_PATH: &str = "dataPath";
pub const LANGUAGE: &str = "language";
pub const TEXT_BLOCKS: &str = "textBlocks";
pub const DESKEW: &str = "deskew";
pub const DPI: &str = "dpi";
pub const FROM_PAGE: &str = "fromPage";
pub const TO_PAGE: &str = "toPage";
pub const PAGE_INDEX: &str = "pageIndex";

pub const TEXT_STRING: &str = "textString";
pub const TEXT_JSON: &str = "textJson";

pub const DEFAULT_LANGUAGE: &str = "ENG";
pub const DEFAULT_TEXT_BLOCKS: &str = "false";
pub const DEFAULT_DESKEW: &str = "false";
pub const DEFAULT_DPI: &str = "300";
pub const DEFAULT_PAGE: &str = "0";

fn common_inputs(spec: ActionSpec) -> ActionSpec {
    spec.input(
        InputSpec::new(FILE_PATH)
            .required()
            .describe("Path of the document to read."),
    )
    .input(
        InputSpec::new(DATA_PATH)
            .required()
            .describe("Directory holding the tesseract language data."),
    )
    .input(InputSpec::new(LANGUAGE).default_value(DEFAULT_LANGUAGE))
    .input(
        InputSpec::new(TEXT_BLOCKS)
            .describe("true to also return the text grouped by block as JSON.")
            .default_value(DEFAULT_TEXT_BLOCKS),
    )
    .input(
        InputSpec::new(DESKEW)
            .describe("true to detect page orientation before recognition.")
            .default_value(DEFAULT_DESKEW),
    )
    .output(TEXT_STRING, "The recognized text.")
    .output(TEXT_JSON, "The recognized text grouped by block.")
}

/// Inputs shared by both actions once validated.
struct Common {
    file: PathBuf,
    data_path: String,
    language: String,
    text_blocks: bool,
    deskew: bool,
}

impl Common {
    fn validation(inputs: &Inputs) -> (Validation, Self) {
        let text_blocks = inputs.get_or(TEXT_BLOCKS, DEFAULT_TEXT_BLOCKS);
        let deskew = inputs.get_or(DESKEW, DEFAULT_DESKEW);
        let validation = Validation::new()
            .required(FILE_PATH, inputs.get(FILE_PATH))
            .required(DATA_PATH, inputs.get(DATA_PATH))
            .boolean(TEXT_BLOCKS, text_blocks.trim())
            .boolean(DESKEW, deskew.trim());
        let common = Self {
            file: PathBuf::from(inputs.get(FILE_PATH).trim()),
            data_path: inputs.get(DATA_PATH).trim().to_owned(),
            language: inputs.get_or(LANGUAGE, DEFAULT_LANGUAGE).trim().to_owned(),
            text_blocks: to_boolean_lenient(&text_blocks),
            deskew: to_boolean_lenient(&deskew),
        };
        (validation, common)
    }

    fn recognition<'a>(&'a self, image: &'a Path) -> Recognition<'a> {
        Recognition {
            image,
            data_path: &self.data_path,
            language: &self.language,
            deskew: self.deskew,
        }
    }

    fn ensure_file(&self) -> Result<(), OcrError> {
        if self.file.is_file() {
            Ok(())
        } else {
            Err(OcrError::FileNotFound(self.file.display().to_string()))
        }
    }
}

fn result(text: String, blocks: Option<&[TextBlock]>) -> ResultMap {
    let map = ResultMap::success(text.clone()).with(TEXT_STRING, text);
    match blocks {
        Some(blocks) => map.with(TEXT_JSON, to_json(blocks)),
        None => map,
    }
}

/// Recognize the text of an image file.
pub struct ExtractTextFromImage {
    spec: ActionSpec,
    tools: OcrTools,
}

impl ExtractTextFromImage {
    pub fn new() -> Self {
        Self::with_tools(OcrTools::default())
    }

    pub fn with_tools(tools: OcrTools) -> Self {
        let spec = common_inputs(ActionSpec::new(
            "Extract Text From Image",
            "Extracts the text of an image file with tesseract.",
        ));
        Self { spec, tools }
    }
}

impl Default for ExtractTextFromImage {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for ExtractTextFromImage {
    fn spec(&self) -> &ActionSpec {
        &self.spec
    }

    #[instrument(name = "ocr.image", skip_all, fields(file = inputs.get(FILE_PATH)))]
    async fn execute(&self, inputs: &Inputs) -> Result<ResultMap, ActionError> {
        let (validation, common) = Common::validation(inputs);
        validation.finish()?;
        common.ensure_file()?;

        let job = common.recognition(&common.file);
        let text = self.tools.recognize_text(&job).await?;
        let blocks = if common.text_blocks {
            Some(group_blocks(&self.tools.recognize_tsv(&job).await?, 1))
        } else {
            None
        };
        info!(chars = text.len(), "image recognized");
        Ok(result(text, blocks.as_deref()))
    }
}

/// Recognize the text of selected pages of a PDF document.
pub struct ExtractTextFromPdf {
    spec: ActionSpec,
    tools: OcrTools,
}

impl ExtractTextFromPdf {
    pub fn new() -> Self {
        Self::with_tools(OcrTools::default())
    }

    pub fn with_tools(tools: OcrTools) -> Self {
        let spec = common_inputs(ActionSpec::new(
            "Extract Text From PDF",
            "Rasterizes PDF pages and extracts their text with tesseract.",
        ))
        .input(
            InputSpec::new(DPI)
                .describe("Resolution used to render each page.")
                .default_value(DEFAULT_DPI),
        )
        .input(
            InputSpec::new(FROM_PAGE)
                .describe("First 1-based page to read, 0 for the first page.")
                .default_value(DEFAULT_PAGE),
        )
        .input(
            InputSpec::new(TO_PAGE)
                .describe("Last 1-based page to read, 0 for the last page.")
                .default_value(DEFAULT_PAGE),
        )
        .input(
            InputSpec::new(PAGE_INDEX)
                .describe("Comma separated 1-based pages to read. Overrides the page range.")
                .default_value(DEFAULT_PAGE),
        );
        Self { spec, tools }
    }
}

impl Default for ExtractTextFromPdf {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for ExtractTextFromPdf {
    fn spec(&self) -> &ActionSpec {
        &self.spec
    }

    #[instrument(name = "ocr.pdf", skip_all, fields(file = inputs.get(FILE_PATH)))]
    async fn execute(&self, inputs: &Inputs) -> Result<ResultMap, ActionError> {
        let dpi = inputs.get_or(DPI, DEFAULT_DPI);
        let from_page = inputs.get_or(FROM_PAGE, DEFAULT_PAGE);
        let to_page = inputs.get_or(TO_PAGE, DEFAULT_PAGE);
        let (validation, common) = Common::validation(inputs);
        validation
            .positive_integer(DPI, &dpi)
            .non_negative_integer(FROM_PAGE, &from_page)
            .non_negative_integer(TO_PAGE, &to_page)
            .finish()?;
        common.ensure_file()?;

        let selection = PageSelection {
            from_page: from_page.trim().parse().unwrap_or(0),
            to_page: to_page.trim().parse().unwrap_or(0),
            page_index: inputs.get_or(PAGE_INDEX, DEFAULT_PAGE),
        };
        let dpi: u32 = dpi.trim().parse().unwrap_or(300);

        let pdf = common.file.clone();
        let count = run_blocking(move || Ok(page_count(&pdf)?)).await?;
        let pages = selection.resolve(count)?;
        info!(count, selected = pages.len(), "reading PDF pages");

        // Rendered pages live only as long as this directory.
        let workdir = tempfile::tempdir().map_err(OcrError::from)?;
        let mut text = String::new();
        let mut blocks = Vec::new();
        for page in pages {
            let number = page + 1;
            let prefix = workdir.path().join(format!("page-{number}"));
            let image = self
                .tools
                .rasterize_page(&common.file, number, dpi, &prefix)
                .await?;
            let job = common.recognition(&image);
            text.push_str(&self.tools.recognize_text(&job).await?);
            if common.text_blocks {
                blocks.extend(group_blocks(&self.tools.recognize_tsv(&job).await?, number));
            }
        }

        Ok(result(text, common.text_blocks.then_some(blocks.as_slice())))
    }
}
