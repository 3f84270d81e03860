//! CLI command implementations.

pub(crate) mod convert;
pub(crate) mod generate;

pub(crate) use convert::ConvertArgs;
pub(crate) use generate::GenerateArgs;

use std::io::Read;
use std::path::Path;

/// Read a file, or stdin when the path is `-`.
pub(crate) fn read_input(path: &Path) -> std::io::Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    std::fs::read_to_string(path)
}
