//! File-backed access log.

use tally_traits::AccessLog;

/// Appends one `master_id,account_id` line per recorded access.
///
/// Best-effort: the `AccessLog` contract has no failure channel, so write
/// errors are dropped.
pub struct FileAccessLog {
    path: String,
}

impl FileAccessLog {
    pub fn new(path: String) -> Self {
        Self { path }
    }
}

impl AccessLog for FileAccessLog {
    fn record_account_access(&mut self, master_id: &str, account_id: &str) {
        use std::fs::OpenOptions;
        use std::io::Write;
        if let Ok(mut file) = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
        {
            let _ = writeln!(file, "{master_id},{account_id}");
        }
    }
}
