// Mon Oct 12 2026 - Alex

use serde::Serialize;
use std::fmt;

/// Marshalling strategy chosen for one field, parameter or return value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MarshalShape {
    Callback,
    BoolBitfield,
    Bitfield,
    BoolToIntArray,
    BoolToInt,
    FixedInterfaceArray,
    DynamicInterfaceArray,
    InterfaceArray,
    NativeStructArray,
    OptionalPointer,
    NativeStruct,
    Interface,
    FixedValueArray,
    DynamicValueArray,
    PinnedArray,
    PassThrough,
}

impl MarshalShape {
    pub fn name(self) -> &'static str {
        match self {
            Self::Callback => "callback",
            Self::BoolBitfield => "bool-bitfield",
            Self::Bitfield => "bitfield",
            Self::BoolToIntArray => "bool-to-int-array",
            Self::BoolToInt => "bool-to-int",
            Self::FixedInterfaceArray => "fixed-interface-array",
            Self::DynamicInterfaceArray => "dynamic-interface-array",
            Self::InterfaceArray => "interface-array",
            Self::NativeStructArray => "native-struct-array",
            Self::OptionalPointer => "optional-pointer",
            Self::NativeStruct => "native-struct",
            Self::Interface => "interface",
            Self::FixedValueArray => "fixed-value-array",
            Self::DynamicValueArray => "dynamic-value-array",
            Self::PinnedArray => "pinned-array",
            Self::PassThrough => "pass-through",
        }
    }

    /// Whether an aggregate holding a member of this shape needs a separate native layout.
    pub fn needs_native_shadow(self) -> bool {
        self != Self::PassThrough
    }

    pub fn is_array(self) -> bool {
        matches!(
            self,
            Self::BoolToIntArray
                | Self::FixedInterfaceArray
                | Self::DynamicInterfaceArray
                | Self::InterfaceArray
                | Self::NativeStructArray
                | Self::FixedValueArray
                | Self::DynamicValueArray
                | Self::PinnedArray
        )
    }
}

impl fmt::Display for MarshalShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
