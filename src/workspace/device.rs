// src/workspace/device.rs

//! Device records and the naming/version rules attached to them.

use regex::Regex;
use std::sync::OnceLock;

use crate::types::DeviceId;

/// Placeholder id carried by the emulator entry while no emulator is
/// running. An offline emulator never counts as an available device.
pub const OFFLINE_DEVICE_ID: &str = "0";

/// One application found installed on a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledApp {
    pub name: String,
    pub id: String,
    pub version: String,
}

impl InstalledApp {
    pub fn new(name: &str, id: &str, version: &str) -> Self {
        Self {
            name: name.to_string(),
            id: id.to_string(),
            version: version.to_string(),
        }
    }
}

/// A known device: either the emulator or physical hardware discovered by a
/// device scan.
#[derive(Debug, Clone)]
pub struct Device {
    name: String,
    id: DeviceId,
    location: String,
    version: String,
    enyo_enabled: bool,
    is_emulator: bool,
    log_level: Option<String>,
    installed_apps: Option<Vec<InstalledApp>>,
}

impl Device {
    pub fn new(name: &str, id: &str, location: &str) -> Self {
        let display_name = beautify_device_name(name);
        let is_emulator = display_name == "Emulator";
        let mut device = Self {
            name: display_name,
            id: id.to_string(),
            location: location.to_string(),
            version: String::new(),
            enyo_enabled: false,
            is_emulator,
            log_level: None,
            installed_apps: None,
        };
        // Version and app data arrive asynchronously from a list-apps task.
        device.set_version(None);
        device
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_id(&mut self, id: &str) {
        self.id = id.to_string();
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn set_location(&mut self, location: Option<&str>) {
        self.location = location.unwrap_or("tcp").to_string();
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Set the OS version and recompute Enyo support from it. The Enyo
    /// framework is only available on devices running version 1.4.5 and up.
    pub fn set_version(&mut self, version: Option<&str>) {
        self.version = version.unwrap_or("0").to_string();
        self.enyo_enabled = version_to_int(&self.version) >= 145;
    }

    pub fn is_enyo_enabled(&self) -> bool {
        self.enyo_enabled
    }

    pub fn is_emulator(&self) -> bool {
        self.is_emulator
    }

    pub fn is_offline(&self) -> bool {
        self.id == OFFLINE_DEVICE_ID
    }

    pub fn log_level(&self) -> Option<&str> {
        self.log_level.as_deref()
    }

    pub fn set_log_level(&mut self, level: &str) {
        self.log_level = Some(level.to_string());
    }

    pub fn installed_apps(&self) -> Option<&[InstalledApp]> {
        self.installed_apps.as_deref()
    }

    pub fn set_installed_apps(&mut self, apps: Option<Vec<InstalledApp>>) {
        self.installed_apps = apps;
    }

    pub fn installed_app(&self, id: &str) -> Option<&InstalledApp> {
        self.installed_apps
            .as_deref()
            .and_then(|apps| apps.iter().find(|app| app.id == id))
    }
}

/// Map a hardware codename reported by the device enumeration tool to the
/// marketing name. Unknown names are kept as reported (trimmed).
pub fn beautify_device_name(raw: &str) -> String {
    let name = raw.trim().to_lowercase();

    // More specific codenames first: "castleplus" also contains "castle".
    let marketing = if name.contains("castleplus") {
        "Palm Pre Plus"
    } else if name.contains("verizon") && name.contains("pixie") {
        "Palm Pixi Plus"
    } else if name.contains("castle") {
        "Palm Pre"
    } else if name.contains("pixie") {
        "Palm Pixi"
    } else if name.contains("roadrunner") {
        "Palm Pre2"
    } else if name.contains("broadway") {
        "HP Veer"
    } else if name.contains("mantaray") {
        "HP Pre3"
    } else if name.contains("topaz") {
        "HP TouchPad"
    } else if name.contains("opal") {
        "HP TouchPad Go"
    } else if name.contains("stingray") {
        "Stingray"
    } else if name.contains("windsor") {
        "Windsor"
    } else if name.contains("sdk") || name.contains("emulator") {
        "Emulator"
    } else {
        return raw.trim().to_string();
    };
    marketing.to_string()
}

/// Convert a dotted version string to a comparable integer: the major part
/// keeps all digits, minor and patch contribute one digit each, anything
/// after the patch digit is truncated.
///
/// `0.5.6` -> 56, `1.4.5` -> 145, `2.1.0.519` -> 210, `10.3.435` -> 1034.
pub fn version_to_int(version: &str) -> i32 {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^(\d+)\.(\d)\.(\d)").expect("version regex"));

    match re.captures(version.trim()) {
        Some(caps) => format!("{}{}{}", &caps[1], &caps[2], &caps[3])
            .parse()
            .unwrap_or(0),
        None => version.trim().parse().unwrap_or(0),
    }
}
