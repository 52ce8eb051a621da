use std::collections::BTreeMap;

use serde::Serialize;

/// Text of one tesseract block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextBlock {
    pub page: usize,
    pub block: u32,
    pub text: String,
}

// Column positions of tesseract's TSV report.
const LEVEL: usize = 0;
const BLOCK_NUM: usize = 2;
const PAR_NUM: usize = 3;
const LINE_NUM: usize = 4;
const TEXT: usize = 11;
const WORD_LEVEL: &str = "5";

/// Group the words of a TSV report by block.
///
/// Words on the same line are joined with spaces, lines with `\n`. Blocks
/// without any recognized word are dropped.
pub fn group_blocks(tsv: &str, page: usize) -> Vec<TextBlock> {
    let mut lines: BTreeMap<(u32, u32, u32), Vec<&str>> = BTreeMap::new();
    for row in tsv.lines().skip(1) {
        let columns: Vec<&str> = row.split('\t').collect();
        if columns.len() <= TEXT || columns[LEVEL] != WORD_LEVEL {
            continue;
        }
        let word = columns[TEXT].trim();
        if word.is_empty() {
            continue;
        }
        let number = |i: usize| columns[i].parse::<u32>().unwrap_or(0);
        lines
            .entry((number(BLOCK_NUM), number(PAR_NUM), number(LINE_NUM)))
            .or_default()
            .push(word);
    }

    let mut blocks: Vec<TextBlock> = Vec::new();
    for ((block, _, _), words) in lines {
        let line = words.join(" ");
        match blocks.last_mut() {
            Some(last) if last.block == block => {
                last.text.push('\n');
                last.text.push_str(&line);
            }
            _ => blocks.push(TextBlock {
                page,
                block,
                text: line,
            }),
        }
    }
    blocks
}

/// Serialize blocks for the `textJson` output.
pub fn to_json(blocks: &[TextBlock]) -> String {
    serde_json::to_string(blocks).unwrap_or_else(|_| "[]".to_owned())
}
