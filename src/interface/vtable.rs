// Mon Oct 12 2026 - Alex

use bitflags::bitflags;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

bitflags! {
    /// Platform families the generated code must run on.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct PlatformDetection: u8 {
        const WINDOWS = 0b01;
        const SYSTEM_V = 0b10;
        const ANY = Self::WINDOWS.bits() | Self::SYSTEM_V.bits();
    }
}

/// Slot a method is invoked through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VtableOffset {
    Constant(i32),
    /// Chosen at runtime from the detected platform.
    PlatformDependent { windows: i32, default: i32 },
}

impl VtableOffset {
    pub fn resolve(offset: i32, windows_offset: i32, platforms: PlatformDetection) -> Self {
        if platforms.contains(PlatformDetection::ANY) && offset != windows_offset {
            Self::PlatformDependent {
                windows: windows_offset,
                default: offset,
            }
        } else if platforms.contains(PlatformDetection::WINDOWS) {
            Self::Constant(windows_offset)
        } else {
            Self::Constant(offset)
        }
    }
}

impl fmt::Display for VtableOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(slot) => write!(f, "{}", slot),
            Self::PlatformDependent { windows, default } => {
                write!(f, "(IsWindows ? {} : {})", windows, default)
            }
        }
    }
}

/// Number of slots occupied by an interface and all of its bases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SlotTotals {
    pub default: u32,
    pub windows: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VTableEntry {
    pub index: u32,
    pub windows_index: u32,
    pub method_name: String,
    pub declaring_interface: String,
}

impl fmt::Display for VTableEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}|win {}] {}::{}", self.index, self.windows_index, self.declaring_interface, self.method_name)
    }
}

/// Slots declared by one interface, after its base slots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VTableLayout {
    pub interface: String,
    pub base: SlotTotals,
    pub entries: Vec<VTableEntry>,
}

impl VTableLayout {
    pub fn totals(&self) -> SlotTotals {
        let count = self.entries.len() as u32;
        SlotTotals {
            default: self.base.default + count,
            windows: self.base.windows + count,
        }
    }
}

impl fmt::Display for VTableLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "VTable for {} (base slots {}/{})", self.interface, self.base.default, self.base.windows)?;
        for entry in &self.entries {
            writeln!(f, "  {}", entry)?;
        }
        Ok(())
    }
}

/// Numbers the declared methods of one interface.
///
/// With MSVC ordering, overloads sharing a name are grouped at the position
/// of the first declaration and emitted in reverse on Windows.
pub struct VTableBuilder {
    interface: String,
    base: SlotTotals,
    methods: Vec<String>,
    msvc_ordering: bool,
}

impl VTableBuilder {
    pub fn new(interface: &str, base: SlotTotals) -> Self {
        Self {
            interface: interface.to_string(),
            base,
            methods: Vec::new(),
            msvc_ordering: true,
        }
    }

    pub fn with_msvc_ordering(mut self, enabled: bool) -> Self {
        self.msvc_ordering = enabled;
        self
    }

    pub fn add_method(mut self, name: &str) -> Self {
        self.methods.push(name.to_string());
        self
    }

    pub fn build(self) -> VTableLayout {
        let windows_order = if self.msvc_ordering {
            let mut groups: IndexMap<&str, Vec<usize>> = IndexMap::new();
            for (index, name) in self.methods.iter().enumerate() {
                groups.entry(name.as_str()).or_default().push(index);
            }
            groups.into_values().flat_map(|group| group.into_iter().rev()).collect::<Vec<_>>()
        } else {
            (0..self.methods.len()).collect()
        };

        let mut windows_index = vec![0u32; self.methods.len()];
        for (position, &declared) in windows_order.iter().enumerate() {
            windows_index[declared] = position as u32;
        }

        let entries = self
            .methods
            .iter()
            .enumerate()
            .map(|(index, name)| VTableEntry {
                index: self.base.default + index as u32,
                windows_index: self.base.windows + windows_index[index],
                method_name: name.clone(),
                declaring_interface: self.interface.clone(),
            })
            .collect();

        VTableLayout {
            interface: self.interface,
            base: self.base,
            entries,
        }
    }
}
