use std::collections::HashMap;
use std::error::Error;

use tally_core::access_log::FileAccessLog;
use tally_core::{MASTER_ACCOUNT_ID, Tally};
use tally_traits::{AccessLog, Account, AccountStore, StoreError};

struct MapStore {
    balances: HashMap<String, i64>,
}

impl AccountStore for MapStore {
    fn fetch_account(&mut self, id: &str) -> Result<Account, Box<dyn Error + Send + Sync>> {
        match self.balances.get(id) {
            Some(&balance_minor) => Ok(Account {
                id: id.to_string(),
                balance_minor,
            }),
            None => Err(Box::new(StoreError::Permanent(format!("no account {id}")))),
        }
    }
}

#[test]
fn file_log_appends_one_line_per_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("access.log");
    let mut log = FileAccessLog::new(path.to_string_lossy().into_owned());

    log.record_account_access("master", "master");
    log.record_account_access("master", "a");

    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents, "master,master\nmaster,a\n");
}

#[test]
fn file_log_records_a_whole_summation_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("access.log");

    let store = MapStore {
        balances: HashMap::from([
            (MASTER_ACCOUNT_ID.to_string(), 0),
            ("a".to_string(), 100),
            ("b".to_string(), -20),
        ]),
    };
    let mut tally = Tally::builder()
        .with_store(store)
        .with_access_log(FileAccessLog::new(path.to_string_lossy().into_owned()))
        .build()
        .unwrap();

    let total = tally.sum_accounts(&["a", "b"]).unwrap();

    assert_eq!(total, 100);
    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines, vec!["master,master", "master,a", "master,b"]);
}
