#![allow(dead_code)]

use std::{
    fs,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

use crm_api::config::Config;
use crm_api::lifecycle::{Bootstrap, Ready};

/// A SQLite file unique to one test, removed (with its sidecars) on drop.
pub struct TempDb {
    path: PathBuf,
}

impl TempDb {
    pub fn new(tag: &str) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before UNIX_EPOCH")
            .as_nanos();

        let mut path = std::env::temp_dir();
        path.push(format!(
            "crm-api-{tag}-{}-{}.sqlite",
            std::process::id(),
            nanos
        ));
        Self { path }
    }

    pub fn url(&self) -> String {
        format!("sqlite:{}", self.path.display())
    }

    pub fn config(&self) -> Config {
        let mut cfg = Config::default();
        cfg.database.url = self.url();
        cfg
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
        for suffix in ["-wal", "-shm", "-journal"] {
            let mut sidecar = self.path.clone().into_os_string();
            sidecar.push(suffix);
            let _ = fs::remove_file(sidecar);
        }
    }
}

pub async fn ready(cfg: Config) -> Ready {
    Bootstrap::new(cfg)
        .initialize()
        .await
        .expect("bootstrap failed")
}
