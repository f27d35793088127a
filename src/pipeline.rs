use std::fs;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::Context;

use deck::{DeckBuilder, DeckConfig, PptxWriter};

/// Single-document conversion: read, parse, build slides, write the
/// presentation.
pub struct Pipeline {
    input: PathBuf,
    output: PathBuf,
    config: DeckConfig,
}

impl Pipeline {
    pub fn new(input: PathBuf, output: PathBuf) -> Self {
        Pipeline {
            input,
            output,
            config: DeckConfig::default(),
        }
    }

    pub fn with_config(mut self, config: DeckConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(&self) -> anyhow::Result<()> {
        println!("[1/3] 💡 Reading {}...", self.input.display());
        let source = fs::read_to_string(&self.input)
            .with_context(|| format!("could not read {}", self.input.display()))?;
        let ast = deck_parser::parse(&source);

        println!("[2/3] 🃏 Building slides...");
        let deck = DeckBuilder::new(self.config.clone())
            .build(&ast)
            .context("could not convert the document")?;

        println!("[3/3] 📽 Writing {}...", self.output.display());
        if let Some(parent) = self.output.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("could not create {}", parent.display()))?;
            }
        }
        let file = fs::File::create(&self.output)
            .with_context(|| format!("could not create {}", self.output.display()))?;
        PptxWriter::new().write(&deck, BufWriter::new(file))?;

        println!("🌟 Done.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Pipeline;
    use std::fs;

    #[test]
    fn converts_a_document_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("talk.md");
        fs::write(&input, "# Talk\n\n## Part\n\nhello **world**\n").unwrap();
        let output = dir.path().join("out/talk.pptx");

        Pipeline::new(input, output.clone()).build().unwrap();

        let bytes = fs::read(&output).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn missing_input_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = Pipeline::new(dir.path().join("absent.md"), dir.path().join("out.pptx"))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("could not read"));
    }

    #[test]
    fn unsupported_documents_fail_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("talk.md");
        fs::write(&input, "![a picture](img.png)\n").unwrap();

        let err = Pipeline::new(input, dir.path().join("out.pptx"))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("could not convert"));
    }
}
