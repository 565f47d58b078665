//! Document loading from files and readers.
//!
//! The format is picked from the file name, looking past a trailing `.gz`.
//! Gzipped input is detected by extension for files and by magic bytes for
//! readers.

use crate::document::parser::{parse_json, parse_jsonl, parse_yaml};
use crate::value::Value;
use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use log::debug;
use std::fs;
use std::io::Read;
use std::path::Path;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Document formats understood by the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    JsonLines,
    Yaml,
}

impl Format {
    /// Detects the format from a file name, ignoring a `.gz` suffix.
    ///
    /// - `data.jsonl`, `data.ndjson.gz` → `JsonLines`
    /// - `data.yml`, `data.yaml.gz` → `Yaml`
    /// - `data.json` → `Json`
    ///
    /// Returns `None` for anything else.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let name = path.as_ref().to_string_lossy().to_lowercase();
        let base = name.strip_suffix(".gz").unwrap_or(&name);

        if base.ends_with(".jsonl") || base.ends_with(".ndjson") {
            Some(Format::JsonLines)
        } else if base.ends_with(".yaml") || base.ends_with(".yml") {
            Some(Format::Yaml)
        } else if base.ends_with(".json") {
            Some(Format::Json)
        } else {
            None
        }
    }
}

/// Loads and parses a document file into a value graph.
///
/// # Examples
///
/// ```no_run
/// use objpath::file::loader::load_file;
///
/// let root = load_file("orders.json.gz").unwrap();
/// let skus: Vec<String> = objpath::list(&root, "/orders/lines/sku").unwrap();
/// ```
///
/// # Errors
///
/// Fails when the file cannot be read or decompressed, or when its contents
/// do not parse in the detected format.
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Value> {
    let path = path.as_ref();

    let is_gzipped = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"));

    let content = if is_gzipped {
        read_gzipped_file(path)?
    } else {
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?
    };

    let format = Format::from_path(path);
    debug!("loading {} as {:?}", path.display(), format);

    parse_str(&content, format).with_context(|| format!("Failed to load {}", path.display()))
}

/// Reads a whole document from `reader`, decompressing gzip input.
///
/// The format is sniffed: JSON first, then JSON lines, then YAML.
pub fn load_reader<R: Read>(mut reader: R) -> Result<Value> {
    let mut buffer = Vec::new();
    reader
        .read_to_end(&mut buffer)
        .context("Failed to read input")?;

    let content = if buffer.starts_with(&GZIP_MAGIC) {
        decompress_gzip_bytes(&buffer)?
    } else {
        String::from_utf8(buffer).context("Invalid UTF-8 in input")?
    };

    parse_str(&content, None)
}

/// Parses `content` in `format`, or sniffs it when the format is unknown.
pub fn parse_str(content: &str, format: Option<Format>) -> Result<Value> {
    match format {
        Some(Format::Json) => parse_json(content),
        Some(Format::JsonLines) => parse_jsonl(content),
        Some(Format::Yaml) => parse_yaml(content),
        None => {
            if let Ok(value) = parse_json(content) {
                return Ok(value);
            }
            if let Ok(value) = parse_jsonl(content) {
                return Ok(value);
            }
            parse_yaml(content).context("Input is neither JSON, JSON lines nor YAML")
        }
    }
}

fn read_gzipped_file(path: &Path) -> Result<String> {
    let file = fs::File::open(path)
        .with_context(|| format!("Failed to open gzipped file {}", path.display()))?;
    let mut decoder = GzDecoder::new(file);
    let mut content = String::new();
    decoder
        .read_to_string(&mut content)
        .context("Failed to decompress gzipped file - file may be corrupted")?;
    Ok(content)
}

fn decompress_gzip_bytes(bytes: &[u8]) -> Result<String> {
    let mut decoder = GzDecoder::new(bytes);
    let mut content = String::new();
    decoder
        .read_to_string(&mut content)
        .context("Failed to decompress gzipped input")?;
    Ok(content)
}
