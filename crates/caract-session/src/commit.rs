use std::path::PathBuf;

use caract_types::Mode;
use serde::Serialize;

/// Confirmation of a committed session.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CommitReceipt {
    pub mode: Mode,
    /// Key of the written row (flux or client).
    pub flux_or_client: String,
    pub date: String,
    /// 1-based ledger row index the session landed on.
    pub row: u32,
    /// Photo folder name, shared by every photo of the session.
    pub folder: String,
    pub photos: Vec<PathBuf>,
}

impl CommitReceipt {
    /// One-line operator message.
    pub fn summary(&self) -> String {
        format!(
            "{} {} recorded on row {} ({} photo(s) in {})",
            self.flux_or_client,
            self.date,
            self.row,
            self.photos.len(),
            self.folder
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_mentions_identity_and_row() {
        let receipt = CommitReceipt {
            mode: Mode::Incoming,
            flux_or_client: "SNCF".into(),
            date: "01-01-2025".into(),
            row: 7,
            folder: "SNCF_01-01-2025".into(),
            photos: vec![PathBuf::from("a.jpg")],
        };
        assert_eq!(
            receipt.summary(),
            "SNCF 01-01-2025 recorded on row 7 (1 photo(s) in SNCF_01-01-2025)"
        );
    }
}
