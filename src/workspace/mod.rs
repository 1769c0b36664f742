// src/workspace/mod.rs

//! Shared registry of open projects and known devices.
//!
//! The original design kept these as ambient global collections; here they
//! live in an explicit [`Workspace`] that is handed to task handlers as part
//! of their context. Handlers read snapshots (clones) and apply updates
//! through the methods below, so no lock is ever held across an `await`.

pub mod device;
pub mod files;
pub mod project;

use std::sync::Mutex;

use tracing::{debug, warn};

use crate::errors::Result;
use crate::fs::FileSystem;
use crate::types::{DeviceId, ProjectKey};

pub use device::{beautify_device_name, version_to_int, Device, InstalledApp, OFFLINE_DEVICE_ID};
pub use files::{AppInfo, FrameworkGeneration};
pub use project::Project;

/// Registry of open projects and known devices.
#[derive(Debug, Default)]
pub struct Workspace {
    devices: Mutex<Vec<Device>>,
    projects: Mutex<Vec<Project>>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure the emulator entry exists. It starts offline (id `"0"`) until
    /// a device scan discovers a running emulator.
    pub fn seed_emulator(&self) {
        self.upsert_device("emulator", OFFLINE_DEVICE_ID, "tcp");
    }

    /// Add a device, or refresh an existing one.
    ///
    /// The emulator is matched by name (its id changes between sessions);
    /// physical devices are matched by id. Existing entries get their id and
    /// location refreshed in place, so a rescan never duplicates a device.
    pub fn upsert_device(&self, name: &str, id: &str, location: &str) {
        let mut devices = self.devices.lock().unwrap();

        let emulator = beautify_device_name(name) == "Emulator";
        let existing = devices.iter_mut().find(|d| {
            if emulator {
                d.is_emulator()
            } else {
                d.id() == id
            }
        });

        match existing {
            Some(device) => {
                device.set_id(id);
                device.set_location(Some(location));
                debug!(name = %device.name(), id, "device refreshed");
            }
            None => {
                let device = Device::new(name, id, location);
                debug!(name = %device.name(), id, "device added");
                devices.push(device);
            }
        }
    }

    /// Drop a device that disappeared from a scan. The emulator entry is
    /// never removed; it is reset to the offline placeholder instead.
    pub fn remove_device(&self, id: &str) {
        let mut devices = self.devices.lock().unwrap();
        let Some(index) = devices.iter().position(|d| d.id() == id) else {
            return;
        };
        if devices[index].is_emulator() {
            let emulator = &mut devices[index];
            emulator.set_id(OFFLINE_DEVICE_ID);
            emulator.set_location(None);
            emulator.set_version(None);
            emulator.set_installed_apps(None);
            debug!("emulator reset to offline");
        } else {
            let removed = devices.remove(index);
            debug!(name = %removed.name(), id, "device removed");
        }
    }

    /// Ids of all currently known devices (the offline emulator reports the
    /// placeholder id).
    pub fn available_device_ids(&self) -> Vec<DeviceId> {
        self.devices
            .lock()
            .unwrap()
            .iter()
            .map(|d| d.id().to_string())
            .collect()
    }

    /// Whether the given device can currently be talked to. The offline
    /// emulator never counts as available.
    pub fn is_device_available(&self, id: &str) -> bool {
        if id == OFFLINE_DEVICE_ID {
            return false;
        }
        self.devices.lock().unwrap().iter().any(|d| d.id() == id)
    }

    /// Look up a device snapshot by id, falling back to a case-insensitive
    /// name match ("emulator" works regardless of its current id).
    pub fn find_device(&self, key: &str) -> Option<Device> {
        let devices = self.devices.lock().unwrap();
        devices
            .iter()
            .find(|d| d.id() == key)
            .or_else(|| devices.iter().find(|d| d.name().eq_ignore_ascii_case(key)))
            .cloned()
    }

    pub fn devices_snapshot(&self) -> Vec<Device> {
        self.devices.lock().unwrap().clone()
    }

    pub fn set_installed_apps(&self, id: &str, apps: Option<Vec<InstalledApp>>) {
        if let Some(device) = self.devices.lock().unwrap().iter_mut().find(|d| d.id() == id) {
            device.set_installed_apps(apps);
        }
    }

    pub fn set_device_version(&self, id: &str, version: Option<&str>) {
        if let Some(device) = self.devices.lock().unwrap().iter_mut().find(|d| d.id() == id) {
            device.set_version(version);
        }
    }

    pub fn set_device_log_level(&self, id: &str, level: &str) {
        if let Some(device) = self.devices.lock().unwrap().iter_mut().find(|d| d.id() == id) {
            device.set_log_level(level);
        }
    }

    /// Open a project folder and register it. Re-opening an already known
    /// location refreshes it instead of duplicating the entry.
    pub fn open_project(&self, fs: &dyn FileSystem, location: &str) -> Result<ProjectKey> {
        let project = Project::open(fs, location)?;
        let key = project.key();

        let mut projects = self.projects.lock().unwrap();
        match projects.iter_mut().find(|p| p.key() == key) {
            Some(existing) => *existing = project,
            None => projects.push(project),
        }
        Ok(key)
    }

    /// Refresh a project from its backing files and return the new snapshot.
    pub fn refresh_project(&self, fs: &dyn FileSystem, key: &str) -> Option<Project> {
        let mut projects = self.projects.lock().unwrap();
        let project = projects.iter_mut().find(|p| p.key() == key)?;
        if let Err(err) = project.refresh(fs) {
            warn!(key, error = %err, "project refresh failed");
        }
        Some(project.clone())
    }

    pub fn project_snapshot(&self, key: &str) -> Option<Project> {
        self.projects
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.key() == key)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rescan_updates_device_in_place() {
        let workspace = Workspace::new();
        workspace.upsert_device("topaz", "aaa", "usb");
        workspace.upsert_device("topaz", "aaa", "tcp 55234");
        let devices = workspace.devices_snapshot();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].location(), "tcp 55234");
    }

    #[test]
    fn emulator_is_matched_by_name_not_id() {
        let workspace = Workspace::new();
        workspace.seed_emulator();
        workspace.upsert_device("emulator", "c69dda", "tcp 52199");
        let devices = workspace.devices_snapshot();
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].id(), "c69dda");
        assert!(workspace.is_device_available("c69dda"));
    }

    #[test]
    fn emulator_is_reset_not_removed() {
        let workspace = Workspace::new();
        workspace.seed_emulator();
        workspace.upsert_device("emulator", "c69dda", "tcp 52199");
        workspace.remove_device("c69dda");
        let devices = workspace.devices_snapshot();
        assert_eq!(devices.len(), 1);
        assert!(devices[0].is_offline());
        assert!(!workspace.is_device_available(OFFLINE_DEVICE_ID));
    }

    #[test]
    fn find_device_matches_id_then_name() {
        let workspace = Workspace::new();
        workspace.seed_emulator();
        workspace.upsert_device("topaz", "aaa", "usb");
        assert_eq!(workspace.find_device("aaa").unwrap().name(), "HP TouchPad");
        assert!(workspace.find_device("Emulator").unwrap().is_emulator());
        assert!(workspace.find_device("nope").is_none());
    }
}
