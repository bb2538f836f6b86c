use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

pub const GOLF_RULES: &str = r#"
[vocabulary]
brands = ["Ping", "Callaway"]

[[rules]]
match = "default"
resale = { multiplier = 1.5 }

[[rules]]
match = "brand"
value = "TaylorMade"
resale = { multiplier = 1.8 }

[[rules]]
match = "model"
value = "TaylorMade M6"
resale = { fixed = 150 }
"#;

/// A config file and rules file side by side in a temporary directory.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new(config: &str, rules: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::write(dir.path().join("config.toml"), config).expect("write config");
        fs::write(dir.path().join("rules.toml"), rules).expect("write rules");
        Self { dir }
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }

    pub fn rules_path(&self) -> PathBuf {
        self.dir.path().join("rules.toml")
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}
