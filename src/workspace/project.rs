// src/workspace/project.rs

//! Project records: the in-memory view of one project folder.

use crate::errors::{DevpilotError, Result};
use crate::fs::FileSystem;
use crate::types::ProjectKey;
use crate::workspace::files::{self, FrameworkGeneration};

/// An open project. The folder location is the stable key; everything else
/// is refreshed from the backing files before each operation that depends
/// on it.
#[derive(Debug, Clone)]
pub struct Project {
    location: String,
    name: String,
    id: String,
    version: String,
    main: Option<String>,
    framework: FrameworkGeneration,
    has_service: bool,
    has_package: bool,
    sources: Vec<String>,
}

impl Project {
    /// Open a project folder, validating its layout and reading metadata.
    pub fn open(fs: &dyn FileSystem, location: &str) -> Result<Self> {
        let location = location.trim_end_matches('/').to_string();
        if !files::project_folder_valid(fs, &location) {
            return Err(DevpilotError::InvalidProject(location));
        }
        let mut project = Self {
            location,
            name: String::new(),
            id: String::new(),
            version: String::new(),
            main: None,
            framework: FrameworkGeneration::Mojo,
            has_service: false,
            has_package: false,
            sources: Vec::new(),
        };
        project.refresh(fs)?;
        Ok(project)
    }

    /// Re-read metadata from the backing files so the in-memory view is in
    /// sync with the real source before an operation uses it.
    pub fn refresh(&mut self, fs: &dyn FileSystem) -> Result<()> {
        let info = files::read_app_info(fs, &self.location)?;
        self.name = info.title.unwrap_or_else(|| "Untitled project".to_string());
        self.id = info.id.unwrap_or_else(|| "?".to_string());
        self.version = info.version.unwrap_or_else(|| "0".to_string());
        self.main = info.main;

        self.framework = files::framework_generation(fs, &self.location);
        self.sources = files::mojo_sources(fs, &self.location);
        if self.sources.is_empty() {
            self.sources = files::enyo_sources(fs, &self.location);
        }

        let root = std::path::Path::new(&self.location);
        self.has_service = fs.is_dir(&root.join("app_service"));
        self.has_package = fs.is_dir(&root.join("app_package"));
        Ok(())
    }

    pub fn key(&self) -> ProjectKey {
        self.location.clone()
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Entry point document named in `appinfo.json` (used for opening the
    /// app in a desktop browser).
    pub fn main(&self) -> Option<&str> {
        self.main.as_deref()
    }

    pub fn framework(&self) -> FrameworkGeneration {
        self.framework
    }

    pub fn is_enyo(&self) -> bool {
        self.framework.is_enyo()
    }

    pub fn has_service(&self) -> bool {
        self.has_service
    }

    pub fn has_package(&self) -> bool {
        self.has_package
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Folder the packaging tool reads from.
    pub fn app_src_dir(&self) -> String {
        format!("{}/app_src", self.location)
    }

    /// Folder the packaging tool writes artifacts to.
    pub fn bin_dir(&self) -> String {
        format!("{}/bin", self.location)
    }

    /// Deterministic path of the installable package artifact for the
    /// current id and version.
    pub fn artifact_path(&self) -> String {
        format!("{}/bin/{}_{}_all.ipk", self.location, self.id, self.version)
    }

    /// Deploy script used by Enyo 2 projects; absent otherwise.
    pub fn deploy_script(&self) -> String {
        format!("{}/app_src/tools/deploy.sh", self.location)
    }
}
