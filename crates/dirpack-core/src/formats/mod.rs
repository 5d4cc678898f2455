//! Archive format implementations.

pub mod detect;
pub mod marker;
pub mod tgz;
pub mod traits;
pub mod zip;

pub use detect::ArchiveFormat;
pub use detect::detect_format;
pub use detect::detect_or_sniff;
pub use detect::sniff_format;
pub use tgz::TgzHandler;
pub use traits::FormatHandler;
pub use zip::ZipHandler;

static ZIP: ZipHandler = ZipHandler::new();
static TGZ: TgzHandler = TgzHandler::new();

/// Returns the handler for `format`.
#[must_use]
pub fn handler(format: ArchiveFormat) -> &'static dyn FormatHandler {
    match format {
        ArchiveFormat::Zip => &ZIP,
        ArchiveFormat::Tgz => &TGZ,
    }
}
