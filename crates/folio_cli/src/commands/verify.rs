//! Verify command implementation.

use super::open_store;
use folio_core::CoreError;
use std::path::Path;

/// Verification result.
#[derive(Debug)]
pub struct VerifyResult {
    /// Number of documents that loaded.
    pub documents: usize,
    /// The first problem found, if any.
    pub error: Option<String>,
}

impl VerifyResult {
    fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Loads the data file in strict mode.
///
/// Corruption is reported in the result; any other failure is an error.
pub fn verify(root: &Path, name: &str) -> Result<VerifyResult, CoreError> {
    let mut store = open_store(root, name, true)?;
    match store.load() {
        Ok(report) => Ok(VerifyResult {
            documents: report.loaded,
            error: None,
        }),
        Err(CoreError::Corruption { message }) => Ok(VerifyResult {
            documents: 0,
            error: Some(message),
        }),
        Err(e) => Err(e),
    }
}

/// Runs the verify command.
pub fn run(root: &Path, name: &str) -> Result<(), Box<dyn std::error::Error>> {
    println!("Verifying {name} in {}", root.display());
    println!();

    let result = verify(root, name)?;
    if result.is_ok() {
        println!("  Documents: {}", result.documents);
        println!();
        println!("✓ Data file verification passed");
        Ok(())
    } else {
        if let Some(error) = &result.error {
            println!("  Error: {error}");
        }
        println!();
        println!("✗ Data file verification failed");
        Err("Verification failed".into())
    }
}
