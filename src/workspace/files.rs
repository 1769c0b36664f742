// src/workspace/files.rs

//! Project folder probing and metadata parsing.
//!
//! A valid project folder looks like:
//!
//! ```text
//! <location>/
//!   app_src/
//!     appinfo.json           (always)
//!     sources.json           (Mojo apps)
//!     depends.js             (Enyo apps)
//!     tools/deploy.sh        (Enyo 2 apps)
//!   bin/                     (packaging output)
//!   app_service/             (optional service add-on)
//!   app_package/             (optional package add-on)
//! ```

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

use crate::errors::Result;
use crate::fs::FileSystem;

/// Parsed `appinfo.json`. Only the fields the tool consumes are modelled;
/// unknown fields are ignored.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppInfo {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub main: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub miniicon: Option<String>,
}

/// Which JS framework generation a project is built on. Devices advertise
/// Enyo support through their OS version; projects through their file layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameworkGeneration {
    Mojo,
    Enyo1,
    Enyo2,
}

impl FrameworkGeneration {
    pub fn is_enyo(self) -> bool {
        !matches!(self, FrameworkGeneration::Mojo)
    }
}

/// Check a project folder for the structure sketched in the module docs.
pub fn project_folder_valid(fs: &dyn FileSystem, location: &str) -> bool {
    let root = Path::new(location);
    if !fs.is_dir(root) {
        return false;
    }
    if !fs.is_dir(&root.join("app_src")) || !fs.is_dir(&root.join("bin")) {
        return false;
    }
    if !fs.is_file(&root.join("app_src/appinfo.json")) {
        return false;
    }
    // Mojo apps list sources in sources.json; Enyo apps in depends.js.
    fs.is_file(&root.join("app_src/sources.json")) || fs.is_file(&root.join("app_src/depends.js"))
}

pub fn read_app_info(fs: &dyn FileSystem, location: &str) -> Result<AppInfo> {
    let path = Path::new(location).join("app_src/appinfo.json");
    let data = fs.read_to_string(&path)?;
    Ok(serde_json::from_str(&data)?)
}

pub fn framework_generation(fs: &dyn FileSystem, location: &str) -> FrameworkGeneration {
    let root = Path::new(location);
    if fs.is_file(&root.join("app_src/depends.js")) {
        if fs.is_file(&root.join("app_src/tools/deploy.sh")) {
            FrameworkGeneration::Enyo2
        } else {
            FrameworkGeneration::Enyo1
        }
    } else {
        FrameworkGeneration::Mojo
    }
}

/// Source file locations for a Mojo app: every `app...js` entry named in
/// `sources.json`, relative to `app_src/`.
pub fn mojo_sources(fs: &dyn FileSystem, location: &str) -> Vec<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"app[^,]+\.js").expect("sources regex"));

    let path = Path::new(location).join("app_src/sources.json");
    let Ok(data) = fs.read_to_string(&path) else {
        return Vec::new();
    };

    re.find_iter(&data)
        .map(|m| m.as_str().replace('\\', ""))
        .collect()
}

/// Source file locations for an Enyo app, gathered by recursively following
/// `depends.js` files starting at `app_src/`. The `depends.js` files
/// themselves are not part of the result.
pub fn enyo_sources(fs: &dyn FileSystem, location: &str) -> Vec<String> {
    let mut sources = Vec::new();
    collect_depends_sources(fs, &format!("{location}/app_src/"), &mut sources);
    sources
}

fn collect_depends_sources(fs: &dyn FileSystem, dir: &str, out: &mut Vec<String>) {
    static ENTRY_RE: OnceLock<Regex> = OnceLock::new();
    static APP_SRC_PREFIX_RE: OnceLock<Regex> = OnceLock::new();
    let entry_re = ENTRY_RE.get_or_init(|| Regex::new(r#""(.+?)""#).expect("depends regex"));
    let prefix_re =
        APP_SRC_PREFIX_RE.get_or_init(|| Regex::new(r"^.*?/app_src/").expect("prefix regex"));

    let depends = format!("{dir}depends.js");
    let Ok(data) = fs.read_to_string(Path::new(&depends)) else {
        return;
    };

    for caps in entry_re.captures_iter(&data) {
        let entry = &caps[1];
        if entry.ends_with(".js") {
            // Keep the path relative to app_src/, as used everywhere else.
            let absolute = format!("{dir}{entry}");
            out.push(prefix_re.replace(&absolute, "").into_owned());
        } else if entry.ends_with('/') {
            collect_depends_sources(fs, &format!("{dir}{entry}"), out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    fn valid_project(fs: &MockFileSystem, location: &str) {
        fs.add_dir(format!("{location}/app_src"));
        fs.add_dir(format!("{location}/bin"));
        fs.add_file(
            format!("{location}/app_src/appinfo.json"),
            r#"{"id": "com.example.app", "version": "1.0.0", "title": "Example"}"#,
        );
        fs.add_file(
            format!("{location}/app_src/sources.json"),
            r#"[{"source": "app\/assistants\/main-assistant.js"}, {"source": "app\/models\/data.js"}]"#,
        );
    }

    #[test]
    fn valid_folder_is_accepted() {
        let fs = MockFileSystem::new();
        valid_project(&fs, "/projects/example");
        assert!(project_folder_valid(&fs, "/projects/example"));
    }

    #[test]
    fn missing_bin_folder_is_rejected() {
        let fs = MockFileSystem::new();
        valid_project(&fs, "/projects/example");
        assert!(!project_folder_valid(&fs, "/projects/other"));
    }

    #[test]
    fn appinfo_is_parsed() {
        let fs = MockFileSystem::new();
        valid_project(&fs, "/projects/example");
        let info = read_app_info(&fs, "/projects/example").unwrap();
        assert_eq!(info.id.as_deref(), Some("com.example.app"));
        assert_eq!(info.version.as_deref(), Some("1.0.0"));
        assert_eq!(info.title.as_deref(), Some("Example"));
        assert!(info.main.is_none());
    }

    #[test]
    fn mojo_sources_are_collected_with_backslashes_stripped() {
        let fs = MockFileSystem::new();
        valid_project(&fs, "/projects/example");
        let sources = mojo_sources(&fs, "/projects/example");
        assert_eq!(
            sources,
            vec![
                "app/assistants/main-assistant.js".to_string(),
                "app/models/data.js".to_string(),
            ]
        );
    }

    #[test]
    fn enyo_sources_follow_nested_depends_files() {
        let fs = MockFileSystem::new();
        fs.add_file(
            "/p/app_src/depends.js",
            r#"enyo.depends("main.js", "views/");"#,
        );
        fs.add_file(
            "/p/app_src/views/depends.js",
            r#"enyo.depends("list-view.js");"#,
        );
        let sources = enyo_sources(&fs, "/p");
        assert_eq!(
            sources,
            vec!["main.js".to_string(), "views/list-view.js".to_string()]
        );
    }

    #[test]
    fn framework_generation_from_layout() {
        let fs = MockFileSystem::new();
        valid_project(&fs, "/mojo");
        assert_eq!(framework_generation(&fs, "/mojo"), FrameworkGeneration::Mojo);

        fs.add_file("/enyo1/app_src/depends.js", "enyo.depends();");
        assert_eq!(
            framework_generation(&fs, "/enyo1"),
            FrameworkGeneration::Enyo1
        );

        fs.add_file("/enyo2/app_src/depends.js", "enyo.depends();");
        fs.add_file("/enyo2/app_src/tools/deploy.sh", "#!/bin/sh\n");
        assert_eq!(
            framework_generation(&fs, "/enyo2"),
            FrameworkGeneration::Enyo2
        );
    }
}
