use config::Config;
use filter::EventFilterSyntax;
use settings::{decode_file, AcceptAll, Document, SourceError};
use tracing::{info, warn};

/// A decoded blob together with the configuration it was loaded with.
pub struct Session {
    config: Config,
    document: Document,
}

impl Session {
    /// Decodes the blob named by `config`.
    pub fn open(config: Config) -> Result<Self, SourceError> {
        let document = load(&config)?;
        Ok(Self { config, document })
    }

    #[cfg(test)]
    pub(crate) fn with_document(config: Config, document: Document) -> Self {
        Self { config, document }
    }

    /// Decodes the blob again. On failure the previous document is kept.
    pub fn reload(&mut self) -> Result<usize, SourceError> {
        self.document = load(&self.config)?;
        Ok(self.document.len())
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

fn load(config: &Config) -> Result<Document, SourceError> {
    let path = &config.blob_path;
    let limit = config.max_blob_bytes;
    let document = if config.validate_filters {
        decode_file(path, limit, &EventFilterSyntax)?
    } else {
        decode_file(path, limit, &AcceptAll)?
    };

    for block in document.blocks().filter(|b| b.has_deferred_error()) {
        warn!(block = %block.name_lossy(), "settings block carries a compiler error");
    }
    info!(
        path = %path.display(),
        blocks = document.len(),
        full_size = document.full_size(),
        "loaded settings blob"
    );
    Ok(document)
}
