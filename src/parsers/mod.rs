pub mod chutzpah;

use crate::error::Result;
use crate::model::CoverageReport;

/// Every input format parser implements this trait.
pub trait Parser {
    /// Parse the input bytes into our in-memory coverage model.
    fn parse(&self, input: &[u8]) -> Result<CoverageReport>;
}

/// Decode the first few KiB of the input for content sniffing.
pub(crate) fn sniff_head(content: &[u8]) -> String {
    let end = content.len().min(4096);
    String::from_utf8_lossy(&content[..end]).into_owned()
}
