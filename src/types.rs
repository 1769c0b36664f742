use std::fmt;

/// Unique identifier of a device: the hardware NDUID reported by the device
/// enumeration tool. The offline emulator carries the placeholder id `"0"`.
pub type DeviceId = String;

/// Stable key for an open project: its folder location. The app id lives in
/// the project metadata and can change when `appinfo.json` is edited, so it
/// is not suitable as a key.
pub type ProjectKey = String;

/// Reference to the subject of a task: either an open project or a known
/// device. Tasks carry these instead of deep references so the queue never
/// owns a project or device lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemRef {
    Project(ProjectKey),
    Device(DeviceId),
}

impl ItemRef {
    pub fn is_device(&self) -> bool {
        matches!(self, ItemRef::Device(_))
    }
}

impl fmt::Display for ItemRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemRef::Project(key) => write!(f, "project {key}"),
            ItemRef::Device(id) => write!(f, "device {id}"),
        }
    }
}
