use std::path::Path;

/// Suffix routed to the firmware directory.
pub const FIRMWARE_SUFFIX: &str = ".sip.ld";
/// Suffix routed to the bootrom directory.
pub const BOOTROM_SUFFIX: &str = ".bootrom.ld";

/// The two artifact categories the store accepts. Anything else is invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Firmware,
    Bootrom,
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArtifactKind::Firmware => write!(f, "firmware"),
            ArtifactKind::Bootrom => write!(f, "bootrom"),
        }
    }
}

/// Classify a filename by suffix alone. Content is never inspected; the
/// suffix is the whole routing contract.
pub fn classify(name: &str) -> Option<ArtifactKind> {
    if name.ends_with(FIRMWARE_SUFFIX) {
        Some(ArtifactKind::Firmware)
    } else if name.ends_with(BOOTROM_SUFFIX) {
        Some(ArtifactKind::Bootrom)
    } else {
        None
    }
}

/// Reduce a user-supplied name to its final path component, dropping any
/// directory segments. Returns `None` for inputs with no usable component
/// (empty, `..`, a bare separator).
pub fn base_name(raw: &str) -> Option<&str> {
    Path::new(raw).file_name()?.to_str()
}
