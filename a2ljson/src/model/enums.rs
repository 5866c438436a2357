use serde::{Deserialize, Serialize};

/// Common interface of all enumerations that appear as keyword parameters
pub trait A2lEnum: Sized + Copy + Default {
    /// look up the variant for an A2L tag
    fn from_tag(tag: &str) -> Option<Self>;

    /// the A2L tag of this variant
    fn tag(self) -> &'static str;
}

// a2l_enum!
// Each enumeration is declared as a list of `Variant => "TAG"` pairs. The first variant
// is the default, which the builder substitutes when a value is missing or unknown.
macro_rules! a2l_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $first:ident => $first_tag:tt
            $(, $variant:ident => $tag:tt)* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        pub enum $name {
            #[default]
            #[serde(rename = $first_tag)]
            $first,
            $(
                #[serde(rename = $tag)]
                $variant,
            )*
        }

        impl $name {
            /// all A2L tags of this enumeration in declaration order
            pub const TAGS: &'static [&'static str] = &[$first_tag $(, $tag)*];
        }

        impl A2lEnum for $name {
            fn from_tag(tag: &str) -> Option<Self> {
                match tag {
                    $first_tag => Some(Self::$first),
                    $($tag => Some(Self::$variant),)*
                    _ => None,
                }
            }

            fn tag(self) -> &'static str {
                match self {
                    Self::$first => $first_tag,
                    $(Self::$variant => $tag,)*
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.tag())
            }
        }
    };
}

a2l_enum! {
    /// Description of the addressing of table values or axis point values.
    AddrType {
        Pbyte => "PBYTE",
        Pword => "PWORD",
        Plong => "PLONG",
        Plonglong => "PLONGLONG",
        Direct => "DIRECT",
    }
}

a2l_enum! {
    /// Axis description type of an `AXIS_DESCR`
    AxisDescrAttribute {
        CurveAxis => "CURVE_AXIS",
        ComAxis => "COM_AXIS",
        FixAxis => "FIX_AXIS",
        ResAxis => "RES_AXIS",
        StdAxis => "STD_AXIS",
    }
}

a2l_enum! {
    ByteOrderEnum {
        LittleEndian => "LITTLE_ENDIAN",
        BigEndian => "BIG_ENDIAN",
        MsbLast => "MSB_LAST",
        MsbFirst => "MSB_FIRST",
        MsbFirstMswLast => "MSB_FIRST_MSW_LAST",
        MsbLastMswFirst => "MSB_LAST_MSW_FIRST",
    }
}

a2l_enum! {
    CalibrationAccess {
        Calibration => "CALIBRATION",
        NoCalibration => "NO_CALIBRATION",
        NotInMcdSystem => "NOT_IN_MCD_SYSTEM",
        OfflineCalibration => "OFFLINE_CALIBRATION",
    }
}

a2l_enum! {
    /// The shape of the data described by a `CHARACTERISTIC`
    CharacteristicType {
        Ascii => "ASCII",
        Curve => "CURVE",
        Map => "MAP",
        Cuboid => "CUBOID",
        Cube4 => "CUBE_4",
        Cube5 => "CUBE_5",
        ValBlk => "VAL_BLK",
        Value => "VALUE",
    }
}

a2l_enum! {
    ConversionType {
        Identical => "IDENTICAL",
        Form => "FORM",
        Linear => "LINEAR",
        RatFunc => "RAT_FUNC",
        TabIntp => "TAB_INTP",
        TabNointp => "TAB_NOINTP",
        TabVerb => "TAB_VERB",
    }
}

a2l_enum! {
    /// Description of the basic data types in the ECU program.
    DataType {
        Ubyte => "UBYTE",
        Sbyte => "SBYTE",
        Uword => "UWORD",
        Sword => "SWORD",
        Ulong => "ULONG",
        Slong => "SLONG",
        AUint64 => "A_UINT64",
        AInt64 => "A_INT64",
        Float16Ieee => "FLOAT16_IEEE",
        Float32Ieee => "FLOAT32_IEEE",
        Float64Ieee => "FLOAT64_IEEE",
    }
}

a2l_enum! {
    /// Description of the word lengths in the ECU program.
    DataTypeSize {
        Byte => "BYTE",
        Word => "WORD",
        Long => "LONG",
    }
}

a2l_enum! {
    DepositMode {
        Absolute => "ABSOLUTE",
        Difference => "DIFFERENCE",
    }
}

a2l_enum! {
    IndexMode {
        AlternateCurves => "ALTERNATE_CURVES",
        AlternateWithX => "ALTERNATE_WITH_X",
        AlternateWithY => "ALTERNATE_WITH_Y",
        ColumnDir => "COLUMN_DIR",
        RowDir => "ROW_DIR",
    }
}

a2l_enum! {
    /// Description of the axis point sequence in the memory.
    IndexOrder {
        IndexIncr => "INDEX_INCR",
        IndexDecr => "INDEX_DECR",
    }
}

a2l_enum! {
    MemoryAttribute {
        Intern => "INTERN",
        Extern => "EXTERN",
    }
}

a2l_enum! {
    MemoryType {
        Eeprom => "EEPROM",
        Eprom => "EPROM",
        Flash => "FLASH",
        Ram => "RAM",
        Rom => "ROM",
        Register => "REGISTER",
        NotInEcu => "NOT_IN_ECU",
    }
}

a2l_enum! {
    MonotonyType {
        MonDecrease => "MON_DECREASE",
        MonIncrease => "MON_INCREASE",
        StrictDecrease => "STRICT_DECREASE",
        StrictIncrease => "STRICT_INCREASE",
        Monotonous => "MONOTONOUS",
        StrictMon => "STRICT_MON",
        NotMon => "NOT_MON",
    }
}

a2l_enum! {
    /// Type of the content of a `MEMORY_SEGMENT`
    PrgType {
        CalibrationVariables => "CALIBRATION_VARIABLES",
        Code => "CODE",
        Data => "DATA",
        ExcludeFromFlash => "EXCLUDE_FROM_FLASH",
        OfflineData => "OFFLINE_DATA",
        Reserved => "RESERVED",
        Seram => "SERAM",
        Variables => "VARIABLES",
    }
}

a2l_enum! {
    UnitType {
        Derived => "DERIVED",
        ExtendedSi => "EXTENDED_SI",
    }
}
